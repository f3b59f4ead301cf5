//! Lesson processing: extract -> classify -> generate -> store.
//!
//! The lesson is only stored once every step has succeeded, so a failed
//! submission never consumes an id or leaves a partial record.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use crate::classify::{classify_difficulty, classify_subject};
use crate::domain::{Difficulty, GameDescriptor, LessonDraft, LessonSubmission, Subject};
use crate::errors::LessonProcessingError;
use crate::extract::ContentExtractor;
use crate::generator::generate_games;
use crate::store::LessonRepository;
use crate::templates::GameTemplateTable;

#[derive(Clone, Debug, Serialize)]
pub struct ContentSummary {
    pub subject: Subject,
    pub difficulty: Difficulty,
    pub summary: String,
}

/// What `POST /process-lesson` returns.
#[derive(Clone, Debug, Serialize)]
pub struct ProcessingResult {
    #[serde(rename = "lessonId")]
    pub lesson_id: String,
    pub games: Vec<GameDescriptor>,
    pub content: ContentSummary,
}

#[derive(Clone)]
pub struct LessonProcessor {
    extractor: Arc<dyn ContentExtractor>,
    templates: Arc<GameTemplateTable>,
    lessons: Arc<dyn LessonRepository>,
}

impl LessonProcessor {
    pub fn new(
        extractor: Arc<dyn ContentExtractor>,
        templates: Arc<GameTemplateTable>,
        lessons: Arc<dyn LessonRepository>,
    ) -> Self {
        Self { extractor, templates, lessons }
    }

    pub fn lessons(&self) -> &Arc<dyn LessonRepository> {
        &self.lessons
    }

    #[instrument(level = "info", skip(self, submission), fields(file = %submission.file.name, mime = %submission.file.mime, grade = submission.grade))]
    pub async fn process_lesson(
        &self,
        submission: LessonSubmission,
    ) -> Result<ProcessingResult, LessonProcessingError> {
        let LessonSubmission { file, grade, timestamp } = submission;

        let content = self.extractor.extract(&file)?;
        let subject = classify_subject(&content);
        let difficulty = classify_difficulty(grade);
        let games = generate_games(&self.templates, subject, grade, difficulty)?;
        let summary = format!("Grade {grade} {subject} lesson with {} games", games.len());

        let lesson = self
            .lessons
            .insert(LessonDraft { grade, subject, content, games, timestamp })
            .await;

        info!(target: "lesson", id = %lesson.id, %subject, %difficulty, games = lesson.games.len(), "Lesson processed");

        Ok(ProcessingResult {
            lesson_id: lesson.id,
            games: lesson.games,
            content: ContentSummary { subject, difficulty, summary },
        })
    }
}

#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    use super::*;
    use crate::domain::{FileDescriptor, GameType};
    use crate::extract::MimeExtractor;
    use crate::store::InMemoryLessonStore;
    use crate::templates::GameTemplate;

    fn processor_with(table: GameTemplateTable) -> LessonProcessor {
        LessonProcessor::new(
            Arc::new(MimeExtractor),
            Arc::new(table),
            Arc::new(InMemoryLessonStore::new()),
        )
    }

    fn text_submission(text: &str, grade: i64) -> LessonSubmission {
        LessonSubmission {
            file: FileDescriptor {
                name: "lesson.txt".into(),
                mime: "text/plain".into(),
                size: Some(text.len() as u64),
                content: Some(STANDARD.encode(text)),
            },
            grade,
            timestamp: "2024-05-01T10:00:00Z".into(),
        }
    }

    #[tokio::test]
    async fn math_lesson_end_to_end() {
        let p = processor_with(GameTemplateTable::builtin());
        let out = p
            .process_lesson(text_submission("Let's add and subtract numbers", 3))
            .await
            .unwrap();

        assert_eq!(out.lesson_id, "lesson_1");
        assert_eq!(out.content.subject, Subject::Math);
        assert_eq!(out.content.difficulty, Difficulty::Intermediate);
        assert_eq!(out.content.summary, "Grade 3 math lesson with 3 games");
        let ids: Vec<&str> = out.games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["math_quiz_3", "math_puzzle_3", "math_memory_3"]);

        let stored = p.lessons().get("lesson_1").await.unwrap();
        assert_eq!(stored.content, "Let's add and subtract numbers");
        assert_eq!(stored.timestamp, "2024-05-01T10:00:00Z");
    }

    #[tokio::test]
    async fn reading_beats_science_for_story_about_animals() {
        let p = processor_with(GameTemplateTable::builtin());
        let out = p
            .process_lesson(text_submission("The cat sat on a mat, a story about animals", 1))
            .await
            .unwrap();
        assert_eq!(out.content.subject, Subject::Reading);
        assert_eq!(out.content.difficulty, Difficulty::Beginner);
    }

    #[tokio::test]
    async fn pdf_placeholder_is_general() {
        let p = processor_with(GameTemplateTable::builtin());
        let mut sub = text_submission("", 6);
        sub.file.name = "colors.pdf".into();
        sub.file.mime = "application/pdf".into();
        let out = p.process_lesson(sub).await.unwrap();
        assert_eq!(out.content.subject, Subject::General);
        assert_eq!(out.games.len(), 1);
        assert_eq!(out.games[0].id, "general_quiz_6");
        assert_eq!(out.content.summary, "Grade 6 general lesson with 1 games");
    }

    #[tokio::test]
    async fn identical_submissions_are_not_deduplicated() {
        let p = processor_with(GameTemplateTable::builtin());
        let a = p.process_lesson(text_submission("numbers", 2)).await.unwrap();
        let b = p.process_lesson(text_submission("numbers", 2)).await.unwrap();
        assert_eq!(a.lesson_id, "lesson_1");
        assert_eq!(b.lesson_id, "lesson_2");
        assert_eq!(p.lessons().count().await, 2);
    }

    #[tokio::test]
    async fn failed_extraction_stores_nothing() {
        let p = processor_with(GameTemplateTable::builtin());
        let mut bad = text_submission("", 3);
        bad.file.content = Some("@@@".into());
        let err = p.process_lesson(bad).await.unwrap_err();
        assert!(err.to_string().starts_with("Error processing lesson: invalid base64"));
        assert_eq!(p.lessons().count().await, 0);

        // The next success still gets the first id.
        let ok = p.process_lesson(text_submission("math", 3)).await.unwrap();
        assert_eq!(ok.lesson_id, "lesson_1");
    }

    #[tokio::test]
    async fn text_file_without_content_stores_nothing() {
        let p = processor_with(GameTemplateTable::builtin());
        let mut bad = text_submission("", 3);
        bad.file.content = None;
        let err = p.process_lesson(bad).await.unwrap_err();
        assert_eq!(err.to_string(), "Error processing lesson: text file 'lesson.txt' has no content");
        assert_eq!(p.lessons().count().await, 0);
    }

    #[tokio::test]
    async fn malformed_template_fails_without_storing() {
        let table = GameTemplateTable::from_entries(vec![(
            Subject::Math,
            vec![GameTemplate {
                game_type: GameType::Quiz,
                template: "Quiz on {chapter}".into(),
            }],
        )]);
        let p = processor_with(table);
        let err = p.process_lesson(text_submission("math", 3)).await.unwrap_err();
        assert!(err.to_string().contains("unknown placeholder 'chapter'"));
        assert_eq!(p.lessons().count().await, 0);
    }

    #[tokio::test]
    async fn result_serializes_with_wire_names() {
        let p = processor_with(GameTemplateTable::builtin());
        let out = p.process_lesson(text_submission("plants", 4)).await.unwrap();
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["lessonId"], "lesson_1");
        assert_eq!(v["content"]["subject"], "science");
        assert_eq!(v["content"]["difficulty"], "intermediate");
        assert_eq!(v["games"].as_array().unwrap().len(), 3);
    }
}
