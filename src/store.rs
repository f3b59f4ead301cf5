//! Lesson repository: insertion-ordered, in-memory, safe under concurrent requests.
//!
//! Ids are `lesson_{n}` with n the 1-based insertion sequence. The sequence
//! is bumped and the lesson inserted under the same write lock, and there is
//! no removal, so ids are never reused.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::domain::{LessonDraft, ProcessedLesson};

#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// Assign the next id and store the lesson atomically.
    async fn insert(&self, draft: LessonDraft) -> ProcessedLesson;
    async fn get(&self, id: &str) -> Option<ProcessedLesson>;
    /// All lessons in insertion order.
    async fn list(&self) -> Vec<ProcessedLesson>;
    async fn count(&self) -> usize;
}

#[derive(Default)]
struct Lessons {
    ordered: Vec<ProcessedLesson>,
    by_id: HashMap<String, usize>,
    last_seq: u64,
}

#[derive(Default)]
pub struct InMemoryLessonStore {
    inner: RwLock<Lessons>,
}

impl InMemoryLessonStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LessonRepository for InMemoryLessonStore {
    #[instrument(level = "debug", skip(self, draft), fields(subject = %draft.subject, games = draft.games.len()))]
    async fn insert(&self, draft: LessonDraft) -> ProcessedLesson {
        let mut lessons = self.inner.write().await;
        lessons.last_seq += 1;
        let id = format!("lesson_{}", lessons.last_seq);
        let lesson = ProcessedLesson::from_draft(id.clone(), draft);
        let idx = lessons.ordered.len();
        lessons.ordered.push(lesson.clone());
        lessons.by_id.insert(id.clone(), idx);
        info!(target: "lesson", %id, total = lessons.ordered.len(), "Lesson stored");
        lesson
    }

    async fn get(&self, id: &str) -> Option<ProcessedLesson> {
        let lessons = self.inner.read().await;
        lessons.by_id.get(id).map(|&i| lessons.ordered[i].clone())
    }

    async fn list(&self) -> Vec<ProcessedLesson> {
        self.inner.read().await.ordered.clone()
    }

    async fn count(&self) -> usize {
        self.inner.read().await.ordered.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::Subject;

    fn draft(content: &str) -> LessonDraft {
        LessonDraft {
            grade: 3,
            subject: Subject::General,
            content: content.into(),
            games: vec![],
            timestamp: "2024-01-01T00:00:00Z".into(),
        }
    }

    #[tokio::test]
    async fn ids_follow_insertion_order() {
        let store = InMemoryLessonStore::new();
        let a = store.insert(draft("a")).await;
        let b = store.insert(draft("b")).await;
        assert_eq!(a.id, "lesson_1");
        assert_eq!(b.id, "lesson_2");

        let listed: Vec<String> = store.list().await.into_iter().map(|l| l.content).collect();
        assert_eq!(listed, vec!["a", "b"]);
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn get_by_id() {
        let store = InMemoryLessonStore::new();
        store.insert(draft("first")).await;
        let got = store.get("lesson_1").await.unwrap();
        assert_eq!(got.content, "first");
        assert!(store.get("lesson_2").await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_get_unique_sequential_ids() {
        let store = Arc::new(InMemoryLessonStore::new());
        let handles: Vec<_> = (0..50)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.insert(draft(&i.to_string())).await.id })
            })
            .collect();

        let mut seqs = Vec::new();
        for h in handles {
            let id = h.await.unwrap();
            seqs.push(id.trim_start_matches("lesson_").parse::<u64>().unwrap());
        }
        seqs.sort_unstable();
        assert_eq!(seqs, (1..=50).collect::<Vec<u64>>());

        let listed = store.list().await;
        for (i, lesson) in listed.iter().enumerate() {
            assert_eq!(lesson.id, format!("lesson_{}", i + 1));
        }
    }
}
