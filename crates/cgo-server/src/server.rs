//! HTTP surface: classification and the local session.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use cgo_core::board::{Task, TaskId};
use cgo_core::markdown::to_markdown;
use cgo_core::session::Session;
use cgo_core::{Bucket, Buckets, ClassificationResult, DailyFocusItem, Locale};
use cgo_suggest::Source;

use crate::error::ApiError;
use crate::state::ServerState;

/// Build the HTTP router.
pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/classify", post(classify_handler))
        .route("/api/quota", get(quota_handler))
        .route("/api/session", get(session_handler))
        .route("/api/session/input", put(input_handler))
        .route("/api/session/language", put(language_handler))
        .route("/api/session/organize", post(organize_handler))
        .route("/api/session/markdown", get(markdown_handler))
        .route("/api/session/reset", post(reset_handler))
        .route("/api/session/tasks/{id}/move", post(move_handler))
        .route(
            "/api/session/tasks/{id}",
            delete(delete_handler).patch(update_handler),
        )
        .route("/api/session/buckets/{bucket}/reorder", post(reorder_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ClassifyRequest {
    tasks: Vec<String>,
    #[serde(default)]
    language: Locale,
}

#[derive(Debug, Deserialize)]
struct InputRequest {
    text: String,
}

#[derive(Debug, Deserialize)]
struct LanguageRequest {
    language: Locale,
}

#[derive(Debug, Deserialize)]
struct MoveRequest {
    to: Bucket,
}

#[derive(Debug, Deserialize)]
struct ReorderRequest {
    from: TaskId,
    to: TaskId,
}

#[derive(Debug, Deserialize)]
struct UpdateRequest {
    text: String,
}

/// The session as the front end sees it: tasks with their ids.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub buckets: Buckets<Task>,
    pub daily_focus: Vec<DailyFocusItem>,
    pub input_text: String,
    pub language: Locale,
    pub has_organized: bool,
}

impl From<&Session> for SessionView {
    fn from(s: &Session) -> Self {
        Self {
            buckets: s.board().lanes().clone(),
            daily_focus: s.daily_focus().to_vec(),
            input_text: s.input_text().to_string(),
            language: s.language(),
            has_organized: s.has_organized(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrganizeResponse {
    source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback_reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining: Option<u32>,
    session: SessionView,
}

#[derive(Debug, Serialize)]
struct MutationResponse {
    changed: bool,
    session: SessionView,
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

/// Classify a task list without touching the session.
async fn classify_handler(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<Json<ClassificationResult>, ApiError> {
    let req: ClassifyRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::invalid(format!("expected {{tasks: [string], language?}}: {e}")))?;

    info!(
        tasks = req.tasks.len(),
        language = req.language.as_str(),
        engine = state.engine.name(),
        "classify request"
    );

    state
        .engine
        .classify(&req.tasks, req.language)
        .await
        .map(Json)
        .map_err(|e| {
            warn!(kind = e.kind(), error = %e, "classify failed");
            ApiError::from(e)
        })
}

async fn quota_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let limiter = state.limiter.lock().await;
    let decision = limiter.can_make_request();
    Json(json!({
        "allowed": decision.allowed,
        "reason": decision.reason,
        "remaining": limiter.get_remaining_requests(),
        "dailyLimit": limiter.policy().daily_limit,
        "engine": state.engine.name(),
    }))
}

async fn session_handler(State(state): State<Arc<ServerState>>) -> Json<SessionView> {
    let session = state.session.lock().await;
    Json(SessionView::from(&*session))
}

async fn input_handler(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<InputRequest>,
) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.set_input(req.text);
    state.persist(&session);
    Json(SessionView::from(&*session))
}

async fn language_handler(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<LanguageRequest>,
) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.set_language(req.language);
    state.persist(&session);
    Json(SessionView::from(&*session))
}

/// Classify the session input and replace the board with the result.
///
/// The quota gate only applies when the remote model would be called, and a
/// request is only counted when the model actually answered. The session
/// lock is not held while waiting on the model.
async fn organize_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<OrganizeResponse>, ApiError> {
    let _guard = state.begin_organize().ok_or(ApiError::Busy)?;

    let (lines, language) = {
        let session = state.session.lock().await;
        (session.lines(), session.language())
    };
    if lines.is_empty() {
        return Err(ApiError::invalid("input is empty"));
    }

    if state.engine.is_remote() {
        let decision = state.limiter.lock().await.can_make_request();
        if !decision.allowed {
            info!(reason = ?decision.reason, remaining = ?decision.remaining, "quota denied");
            return Err(ApiError::Quota(decision));
        }
    }

    let classified = state
        .engine
        .classify_or_fallback(&lines, language)
        .await?;

    let remaining = if classified.source == Source::Model {
        let mut limiter = state.limiter.lock().await;
        if let Err(e) = limiter.increment_request_count() {
            warn!(error = %e, "failed to record quota usage");
        }
        limiter.get_remaining_requests()
    } else {
        None
    };

    info!(
        source = ?classified.source,
        tasks = lines.len(),
        fallback = classified.failure.as_ref().map(|e| e.kind()),
        "organized"
    );

    let mut session = state.session.lock().await;
    session.organize(classified.result);
    state.persist(&session);

    Ok(Json(OrganizeResponse {
        source: classified.source,
        fallback_reason: classified.failure.as_ref().map(|e| e.kind()),
        remaining,
        session: SessionView::from(&*session),
    }))
}

async fn markdown_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let session = state.session.lock().await;
    let body = to_markdown(&session.buckets(), session.language());
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        body,
    )
}

async fn reset_handler(State(state): State<Arc<ServerState>>) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.reset();
    state.persist(&session);
    Json(SessionView::from(&*session))
}

/// Apply one board mutation and answer with whether it changed anything.
async fn mutate(
    state: &ServerState,
    op: impl FnOnce(&mut Session) -> bool,
) -> Json<MutationResponse> {
    let mut session = state.session.lock().await;
    let changed = op(&mut session);
    if changed {
        state.persist(&session);
    }
    Json(MutationResponse {
        changed,
        session: SessionView::from(&*session),
    })
}

async fn move_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<TaskId>,
    Json(req): Json<MoveRequest>,
) -> Json<MutationResponse> {
    mutate(&state, |s| s.move_task(id, req.to)).await
}

async fn reorder_handler(
    State(state): State<Arc<ServerState>>,
    Path(bucket): Path<Bucket>,
    Json(req): Json<ReorderRequest>,
) -> Json<MutationResponse> {
    mutate(&state, |s| s.reorder(bucket, req.from, req.to)).await
}

async fn delete_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<TaskId>,
) -> Json<MutationResponse> {
    mutate(&state, |s| s.remove(id)).await
}

async fn update_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<TaskId>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let text = req.text.trim().to_string();
    if text.is_empty() {
        return Err(ApiError::invalid("task text is empty"));
    }
    Ok(mutate(&state, |s| s.update(id, text)).await)
}
