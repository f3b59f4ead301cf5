//! Application state: lesson processor, lesson repository, game agents.
//!
//! This module owns:
//!   - the validated game template table
//!   - the lesson processor and the repository injected into it
//!   - the optional remote game agent and the local fallback agent
//!   - the agent name reported by /health

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::{load_agent_config_from_env, AgentConfig};
use crate::errors::ProcessingError;
use crate::extract::MimeExtractor;
use crate::game_agent::{GameAgent, LocalGameAgent};
use crate::openai::OpenAI;
use crate::processor::LessonProcessor;
use crate::store::{InMemoryLessonStore, LessonRepository};
use crate::templates::GameTemplateTable;

#[derive(Clone)]
pub struct AppState {
    pub agent_name: String,
    pub processor: LessonProcessor,
    /// Remote game agent; None runs everything through `local_agent`.
    pub game_agent: Option<Arc<dyn GameAgent>>,
    pub local_agent: LocalGameAgent,
}

impl AppState {
    /// Build state from env: load config, validate templates, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self, ProcessingError> {
        let cfg = load_agent_config_from_env().unwrap_or_default();

        let openai = OpenAI::from_env(cfg.prompts.clone());
        let game_agent: Option<Arc<dyn GameAgent>> = match openai {
            Some(oa) => {
                info!(target: "funlearn_agent", base_url = %oa.base_url, fast_model = %oa.fast_model, strong_model = %oa.strong_model, "OpenAI game agent enabled.");
                Some(Arc::new(oa))
            }
            None => {
                info!(target: "funlearn_agent", "OpenAI disabled (no OPENAI_API_KEY). Using local game agent.");
                None
            }
        };

        Self::with_parts(cfg, GameTemplateTable::builtin(), Arc::new(InMemoryLessonStore::new()), game_agent)
    }

    /// Assemble state from explicit parts. Fails if the template table is malformed.
    pub fn with_parts(
        cfg: AgentConfig,
        templates: GameTemplateTable,
        lessons: Arc<dyn LessonRepository>,
        game_agent: Option<Arc<dyn GameAgent>>,
    ) -> Result<Self, ProcessingError> {
        templates.validate()?;
        let processor = LessonProcessor::new(
            Arc::new(MimeExtractor),
            Arc::new(templates),
            lessons,
        );
        Ok(Self {
            agent_name: cfg.agent_name,
            processor,
            game_agent,
            local_agent: LocalGameAgent,
        })
    }
}
