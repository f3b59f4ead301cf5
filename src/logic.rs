//! Game-agent behaviors used by the HTTP handlers.
//!
//! The remote agent is tried first when configured; any failure falls back to
//! the local agent so callers always get a playable game or a verdict.

use tracing::{error, info, instrument, warn};

use crate::domain::ValidationResult;
use crate::game_agent::{check_syntax, invalid_result, validate_locally, GameAgent};
use crate::protocol::{GameSource, GenerateGameOut};
use crate::state::AppState;

#[instrument(level = "info", skip(state, content), fields(content_len = content.len()))]
pub async fn do_generate_game(state: &AppState, content: &str) -> GenerateGameOut {
    if let Some(agent) = &state.game_agent {
        match agent.generate_game_code(content).await {
            Ok(game_script) => {
                info!(target: "game_agent", agent = agent.name(), script_len = game_script.len(), "Game generated by agent");
                return GenerateGameOut {
                    game_script,
                    message: "Game generated successfully".into(),
                    source: GameSource::Agent,
                };
            }
            Err(e) => {
                warn!(target: "game_agent", agent = agent.name(), error = %e, "Agent generation failed; using fallback generator.");
            }
        }
    }

    // Local generation cannot fail.
    let game_script = state
        .local_agent
        .generate_game_code(content)
        .await
        .unwrap_or_default();
    info!(target: "game_agent", script_len = game_script.len(), "Game generated by fallback generator");
    GenerateGameOut {
        game_script,
        message: "Game generated using fallback generator".into(),
        source: GameSource::Fallback,
    }
}

/// Static check first; only structurally sound code reaches the remote scorer.
#[instrument(level = "info", skip(state, code), fields(code_len = code.len()))]
pub async fn do_validate_game(state: &AppState, code: &str) -> ValidationResult {
    if let Err(e) = check_syntax(code) {
        info!(target: "game_agent", reason = %e, "Game code failed static check");
        return invalid_result(&e);
    }

    if let Some(agent) = &state.game_agent {
        match agent.validate_game_code(code).await {
            Ok(verdict) => return verdict,
            Err(e) => {
                error!(target: "game_agent", agent = agent.name(), error = %e, "Agent validation failed; using local scoring.");
            }
        }
    }

    // Local scoring cannot fail.
    state
        .local_agent
        .validate_game_code(code)
        .await
        .unwrap_or_else(|_| validate_locally(code))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::config::AgentConfig;
    use crate::errors::AgentError;
    use crate::store::InMemoryLessonStore;
    use crate::templates::GameTemplateTable;

    /// Scripted remote agent that counts calls.
    pub(crate) struct MockAgent {
        pub fail: bool,
        pub calls: AtomicUsize,
    }

    impl MockAgent {
        pub(crate) fn new(fail: bool) -> Self {
            Self { fail, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl GameAgent for MockAgent {
        fn name(&self) -> &str {
            "mock"
        }

        async fn generate_game_code(&self, _content: &str) -> Result<String, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AgentError::NoCode)
            } else {
                Ok("function mockGame() { return 1; }".into())
            }
        }

        async fn validate_game_code(&self, _source: &str) -> Result<ValidationResult, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AgentError::Http { status: 503, message: "unavailable".into() })
            } else {
                Ok(ValidationResult { is_valid: true, score: 85, feedback: "Nice interactivity.".into() })
            }
        }
    }

    pub(crate) fn state_with(agent: Option<Arc<dyn GameAgent>>) -> AppState {
        AppState::with_parts(
            AgentConfig::default(),
            GameTemplateTable::builtin(),
            Arc::new(InMemoryLessonStore::new()),
            agent,
        )
        .unwrap()
    }

    const LECTURE: &str = "Variables store data values that can change. Functions are reusable blocks of code.";

    #[tokio::test]
    async fn remote_agent_is_preferred() {
        let state = state_with(Some(Arc::new(MockAgent::new(false))));
        let out = do_generate_game(&state, LECTURE).await;
        assert_eq!(out.source, GameSource::Agent);
        assert_eq!(out.game_script, "function mockGame() { return 1; }");
        assert_eq!(out.message, "Game generated successfully");
    }

    #[tokio::test]
    async fn failing_agent_falls_back() {
        let state = state_with(Some(Arc::new(MockAgent::new(true))));
        let out = do_generate_game(&state, LECTURE).await;
        assert_eq!(out.source, GameSource::Fallback);
        assert!(out.game_script.contains("initGame"));
    }

    #[tokio::test]
    async fn no_agent_uses_fallback() {
        let state = state_with(None);
        let out = do_generate_game(&state, LECTURE).await;
        assert_eq!(out.source, GameSource::Fallback);
        assert_eq!(out.message, "Game generated using fallback generator");
    }

    #[tokio::test]
    async fn invalid_code_never_reaches_agent() {
        let agent = Arc::new(MockAgent::new(false));
        let state = state_with(Some(agent.clone() as Arc<dyn GameAgent>));
        let verdict = do_validate_game(&state, "function broken() {").await;
        assert!(!verdict.is_valid);
        assert_eq!(verdict.score, 0);
        assert_eq!(agent.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_code_is_scored_by_agent() {
        let state = state_with(Some(Arc::new(MockAgent::new(false))));
        let verdict = do_validate_game(&state, "function foo(){return 1;}").await;
        assert!(verdict.is_valid);
        assert_eq!(verdict.score, 85);
    }

    #[tokio::test]
    async fn no_agent_scores_with_local_agent() {
        let state = state_with(None);
        let code = "let score = 0; function tap() { document.body.onclick = tap; }";
        let verdict = do_validate_game(&state, code).await;
        assert_eq!(verdict, validate_locally(code));
        assert_eq!(verdict.score, 90);
    }

    #[tokio::test]
    async fn agent_validation_failure_scores_locally() {
        let state = state_with(Some(Arc::new(MockAgent::new(true))));
        let verdict = do_validate_game(&state, "function foo(){return 1;}").await;
        assert!(verdict.is_valid);
        assert_eq!(verdict.score, 50);
        assert_eq!(verdict.feedback, "Valid: JavaScript code structure looks good");
    }
}
