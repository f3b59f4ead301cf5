//! Public HTTP request/response structs (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::ProcessedLesson;

#[derive(Serialize)]
pub struct HealthOut {
    pub status: &'static str,
    pub agent: String,
    pub processed_lessons: usize,
}

#[derive(Serialize)]
pub struct LessonsOut {
    pub lessons: Vec<ProcessedLesson>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateGameIn {
    #[serde(rename = "lectureContent", default)]
    pub lecture_content: Option<String>,
}

/// Where a generated game came from.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameSource {
    Agent,
    Fallback,
}

#[derive(Debug, Serialize)]
pub struct GenerateGameOut {
    #[serde(rename = "gameScript")]
    pub game_script: String,
    pub message: String,
    pub source: GameSource,
}

#[derive(Debug, Deserialize)]
pub struct ValidateGameIn {
    pub code: String,
}
