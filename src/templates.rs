//! Built-in game template table: subject -> ordered (game type, template) pairs.
//!
//! Templates may reference `{grade}` and `{difficulty}` only. The table is
//! validated once at startup so rendering cannot fail at request time.

use tracing::info;

use crate::domain::{Difficulty, GameType, Subject};
use crate::errors::ProcessingError;
use crate::util::{fill_template, placeholders};

const ALLOWED_PLACEHOLDERS: &[&str] = &["grade", "difficulty"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameTemplate {
    pub game_type: GameType,
    pub template: String,
}

impl GameTemplate {
    fn new(game_type: GameType, template: &str) -> Self {
        Self { game_type, template: template.to_string() }
    }

    /// Substitute grade/difficulty. Fails on any other placeholder.
    pub fn render(
        &self,
        subject: Subject,
        grade: i64,
        difficulty: Difficulty,
    ) -> Result<String, ProcessingError> {
        self.check(subject)?;
        let grade = grade.to_string();
        Ok(fill_template(
            &self.template,
            &[("grade", &grade), ("difficulty", difficulty.as_str())],
        ))
    }

    fn check(&self, subject: Subject) -> Result<(), ProcessingError> {
        match placeholders(&self.template)
            .into_iter()
            .find(|p| !ALLOWED_PLACEHOLDERS.contains(p))
        {
            Some(unknown) => Err(ProcessingError::MalformedTemplate {
                subject: subject.to_string(),
                game_type: self.game_type.to_string(),
                placeholder: unknown.to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GameTemplateTable {
    entries: Vec<(Subject, Vec<GameTemplate>)>,
}

impl GameTemplateTable {
    /// The fixed table shipped with the service.
    pub fn builtin() -> Self {
        use GameType::*;
        Self {
            entries: vec![
                (
                    Subject::Math,
                    vec![
                        GameTemplate::new(Quiz, "Create a math quiz with {difficulty} level questions"),
                        GameTemplate::new(Puzzle, "Generate a math puzzle for grade {grade}"),
                        GameTemplate::new(Memory, "Create a memory game with numbers"),
                    ],
                ),
                (
                    Subject::Reading,
                    vec![
                        GameTemplate::new(Vocabulary, "Generate vocabulary games for grade {grade}"),
                        GameTemplate::new(Comprehension, "Create reading comprehension questions"),
                        GameTemplate::new(WordPuzzle, "Make a word puzzle game"),
                    ],
                ),
                (
                    Subject::Science,
                    vec![
                        GameTemplate::new(Exploration, "Create science exploration activities"),
                        GameTemplate::new(Experiment, "Design simple experiments for grade {grade}"),
                        GameTemplate::new(Facts, "Generate fun science facts quiz"),
                    ],
                ),
            ],
        }
    }

    #[cfg(test)]
    pub fn from_entries(entries: Vec<(Subject, Vec<GameTemplate>)>) -> Self {
        Self { entries }
    }

    /// Templates for a subject, or None when the subject has no table entry.
    pub fn templates_for(&self, subject: Subject) -> Option<&[GameTemplate]> {
        self.entries
            .iter()
            .find(|(s, _)| *s == subject)
            .map(|(_, t)| t.as_slice())
    }

    /// Startup check: every listed subject has entries and every template
    /// only uses known placeholders.
    pub fn validate(&self) -> Result<(), ProcessingError> {
        for (subject, templates) in &self.entries {
            if templates.is_empty() {
                return Err(ProcessingError::EmptySubject(subject.to_string()));
            }
            for t in templates {
                t.check(*subject)?;
            }
        }
        let total: usize = self.entries.iter().map(|(_, t)| t.len()).sum();
        info!(target: "lesson", subjects = self.entries.len(), templates = total, "Game template table validated");
        Ok(())
    }
}
