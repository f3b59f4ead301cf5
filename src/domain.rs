//! Domain models: subjects, difficulty tiers, game types, lessons and their games.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse topic of a lesson, derived from its text.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Math,
    Reading,
    Science,
    /// No keyword matched; gets the single fallback quiz.
    General,
}

impl Subject {
    pub fn as_str(self) -> &'static str {
        match self {
            Subject::Math => "math",
            Subject::Reading => "reading",
            Subject::Science => "science",
            Subject::General => "general",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grade-derived tier.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of activity a template can describe.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Quiz,
    Puzzle,
    Memory,
    Vocabulary,
    Comprehension,
    WordPuzzle,
    Exploration,
    Experiment,
    Facts,
}

impl GameType {
    pub fn as_str(self) -> &'static str {
        match self {
            GameType::Quiz => "quiz",
            GameType::Puzzle => "puzzle",
            GameType::Memory => "memory",
            GameType::Vocabulary => "vocabulary",
            GameType::Comprehension => "comprehension",
            GameType::WordPuzzle => "word_puzzle",
            GameType::Exploration => "exploration",
            GameType::Experiment => "experiment",
            GameType::Facts => "facts",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uploaded file as sent by the frontend.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub mime: String,
    #[serde(default)]
    pub size: Option<u64>,
    /// Base64 payload. Required for text types, ignored for the placeholder types.
    #[serde(default)]
    pub content: Option<String>,
}

/// Incoming lesson payload. Transient, never stored as-is.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LessonSubmission {
    pub file: FileDescriptor,
    pub grade: i64,
    pub timestamp: String,
}

/// A templated description of an activity, not executable code.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub game_type: GameType,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub grade: i64,
    pub instructions: String,
}

/// Everything derived from a submission before it gets an id.
#[derive(Clone, Debug)]
pub struct LessonDraft {
    pub grade: i64,
    pub subject: Subject,
    pub content: String,
    pub games: Vec<GameDescriptor>,
    pub timestamp: String,
}

/// Stored lesson. Immutable once inserted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessedLesson {
    pub id: String,
    pub grade: i64,
    pub subject: Subject,
    pub content: String,
    pub games: Vec<GameDescriptor>,
    pub timestamp: String,
}

impl ProcessedLesson {
    pub fn from_draft(id: String, draft: LessonDraft) -> Self {
        Self {
            id,
            grade: draft.grade,
            subject: draft.subject,
            content: draft.content,
            games: draft.games,
            timestamp: draft.timestamp,
        }
    }
}

/// Verdict on a piece of generated game code.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// 0-100; invalid code always scores 0.
    pub score: u8,
    pub feedback: String,
}
