//! Loading agent configuration (name + game agent prompts) from TOML.
//!
//! See `AgentConfig` and `Prompts` for expected schema. Every field is
//! optional; missing ones take the defaults below.

use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_AGENT_NAME: &str = "FunLearn Kids ADK Agent";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
  pub agent_name: String,
  pub prompts: Prompts,
}

impl Default for AgentConfig {
  fn default() -> Self {
    Self { agent_name: DEFAULT_AGENT_NAME.into(), prompts: Prompts::default() }
  }
}

/// Prompts used by the remote game agent.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  // Game code generation
  pub game_system: String,
  pub game_user_template: String,
  // Game code validation
  pub validator_system: String,
  pub validator_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      game_system: "You are a JavaScript educational game generator. \
You receive lecture content and transform it into interactive JavaScript games. \
Your goal is to make learning engaging through gamification.\n\
Create different types of games based on the content:\n\
1. Quiz games for factual content\n\
2. Memory games for concepts\n\
3. Puzzle games for problem-solving\n\
4. Simulation games for processes\n\
Always generate clean, executable JavaScript code that runs in a browser environment. \
The code should be self-contained. Use modern web APIs, create interactive elements, \
and provide feedback to users. Keep games simple but engaging. \
Return the code in a single ```javascript fenced block.".into(),
      game_user_template: "Generate a JavaScript educational game based on this lecture content: {content}".into(),
      validator_system: "You are a JavaScript game code validator. Decide whether the code has proper \
JavaScript syntax, is executable in a browser, contains interactive game elements, and uses sensible \
HTML/CSS if included. Judge educational value, interactivity and user experience with a score from \
0 to 100. Invalid games score 0. Reply ONLY with JSON: \
{\"is_valid\": boolean, \"score\": number, \"feedback\": string}".into(),
      validator_user_template: "Validate this JavaScript game code:\n{code}".into(),
    }
  }
}

/// Attempt to load `AgentConfig` from AGENT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_agent_config_from_env() -> Option<AgentConfig> {
  let path = std::env::var("AGENT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_agent_config(&s) {
      Ok(cfg) => {
        info!(target: "funlearn_agent", %path, agent = %cfg.agent_name, "Loaded agent config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "funlearn_agent", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "funlearn_agent", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

pub fn parse_agent_config(s: &str) -> Result<AgentConfig, toml::de::Error> {
  toml::from_str::<AgentConfig>(s)
}

/// Listen port from PORT, default 8000.
pub fn port_from_env() -> u16 {
  std::env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()).unwrap_or(8000)
}
