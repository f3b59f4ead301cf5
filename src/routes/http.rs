//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use tracing::{info, instrument, warn};

use crate::domain::{LessonSubmission, ProcessedLesson, ValidationResult};
use crate::errors::{AppError, LessonProcessingError};
use crate::logic::{do_generate_game, do_validate_game};
use crate::processor::ProcessingResult;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> Json<HealthOut> {
    Json(HealthOut {
        status: "healthy",
        agent: state.agent_name.clone(),
        processed_lessons: state.processor.lessons().count().await,
    })
}

/// A body that fails to parse is reported like any other processing failure.
#[instrument(level = "info", skip(state, body))]
pub async fn http_process_lesson(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LessonSubmission>, JsonRejection>,
) -> Result<Json<ProcessingResult>, AppError> {
    let Json(submission) = body.map_err(|e| LessonProcessingError(e.body_text()))?;
    let result = state.processor.process_lesson(submission).await?;
    info!(target: "lesson", id = %result.lesson_id, games = result.games.len(), "HTTP lesson processed");
    Ok(Json(result))
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_lessons(State(state): State<Arc<AppState>>) -> Json<LessonsOut> {
    Json(LessonsOut { lessons: state.processor.lessons().list().await })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_lesson(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProcessedLesson>, AppError> {
    state
        .processor
        .lessons()
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Lesson {id} not found")))
}

/// An unreadable body is a generation failure, not a client error.
#[instrument(level = "info", skip(state, body))]
pub async fn http_generate_game(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GenerateGameIn>, JsonRejection>,
) -> Result<Json<GenerateGameOut>, AppError> {
    let Json(body) = body.map_err(|e| {
        warn!(target: "game_agent", error = %e.body_text(), "Rejected generate-game body");
        AppError::Internal("Failed to generate game".into())
    })?;
    let content = body
        .lecture_content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("No lecture content provided".into()))?;
    let out = do_generate_game(&state, &content).await;
    info!(target: "game_agent", source = ?out.source, script_len = out.game_script.len(), "HTTP game generated");
    Ok(Json(out))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_validate_game(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ValidateGameIn>, JsonRejection>,
) -> Result<Json<ValidationResult>, AppError> {
    let Json(body) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let verdict = do_validate_game(&state, &body.code).await;
    info!(target: "game_agent", code_len = body.code.len(), is_valid = verdict.is_valid, score = verdict.score, "HTTP game validated");
    Ok(Json(verdict))
}
