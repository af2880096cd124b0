//! Request handlers for the operator gateway.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::errors::BrokerError;
use crate::domain::models::{HumanResponse, RenderAnnouncement, Selection, Task, TaskStatus};
use crate::services::{BrokerStats, InteractionCoordinator};

const INDEX_HTML: &str = include_str!("index.html");

const DEFAULT_WAIT_MS: u64 = 25_000;
const MAX_WAIT_MS: u64 = 60_000;

/// Shared state for the gateway.
pub struct GatewayState {
    pub coordinator: Arc<InteractionCoordinator>,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
        }),
    )
}

fn invalid_body(rejection: &JsonRejection) -> ApiError {
    warn!(error = %rejection.body_text(), "invalid request body");
    api_error(StatusCode::BAD_REQUEST, "INVALID_BODY", rejection.body_text())
}

fn broker_error(err: &BrokerError) -> ApiError {
    let (status, code) = match err {
        BrokerError::NothingToAnswer | BrokerError::ConversationNotFound(_) => {
            (StatusCode::NOT_FOUND, "NOT_FOUND")
        }
        BrokerError::EmptyInput => (StatusCode::BAD_REQUEST, "MISSING_FIELD"),
    };
    api_error(status, code, err.to_string())
}

/// Plain `{status, message}` success body.
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
    pub message: String,
}

impl StatusMessage {
    fn success(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            status: "success",
            message: message.into(),
        })
    }
}

/// Body of `POST /tasks`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualTaskRequest {
    #[serde(default)]
    pub custom_input: Option<String>,
    #[serde(rename = "continue", default = "default_continue")]
    pub continue_flag: bool,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

const fn default_continue() -> bool {
    true
}

/// Body of `POST /tasks/delete`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTaskRequest {
    #[serde(default)]
    pub task_id: Option<String>,
}

/// Optional body of `POST /render-tasks/abandon`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbandonRequest {
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitParams {
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct FormatRequest {
    #[serde(default)]
    pub format: String,
}

// Handler functions

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn add_manual_task(
    State(state): State<Arc<GatewayState>>,
    body: Result<Json<ManualTaskRequest>, JsonRejection>,
) -> Result<Json<StatusMessage>, ApiError> {
    let Json(req) = body.map_err(|e| invalid_body(&e))?;
    let Some(custom_input) = req.custom_input else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "MISSING_FIELD",
            "customInput is required",
        ));
    };

    let response = state
        .coordinator
        .broker()
        .push_manual(&custom_input, req.continue_flag, req.conversation_id)
        .await
        .map_err(|e| broker_error(&e))?;

    info!(task_id = %response.task_id, "manual task added");
    Ok(StatusMessage::success("Task added to queue"))
}

pub async fn list_pending_tasks(State(state): State<Arc<GatewayState>>) -> Json<Vec<Task>> {
    let registry = state.coordinator.broker().registry();
    Json(registry.list_by_status(TaskStatus::Pending).await)
}

pub async fn task_status(State(state): State<Arc<GatewayState>>) -> Json<Vec<Task>> {
    Json(state.coordinator.broker().registry().list_all().await)
}

pub async fn delete_task(
    State(state): State<Arc<GatewayState>>,
    body: Result<Json<DeleteTaskRequest>, JsonRejection>,
) -> Result<Json<StatusMessage>, ApiError> {
    let Json(req) = body.map_err(|e| invalid_body(&e))?;
    let task_id = req
        .task_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "MISSING_FIELD", "taskId is required"))?;

    if state.coordinator.broker().registry().delete(&task_id).await {
        Ok(StatusMessage::success("Task deleted"))
    } else {
        Err(api_error(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Task not found: {task_id}"),
        ))
    }
}

pub async fn clear_tasks(State(state): State<Arc<GatewayState>>) -> Json<serde_json::Value> {
    let count = state.coordinator.broker().registry().clear().await;
    info!(count, "tasks cleared");
    Json(json!({
        "status": "success",
        "message": format!("Cleared {count} tasks"),
        "count": count,
    }))
}

pub async fn render_tasks(State(state): State<Arc<GatewayState>>) -> Json<Vec<RenderAnnouncement>> {
    let announcements = state.coordinator.broker().announcements().await;
    debug!(count = announcements.len(), "render tasks listed");
    Json(announcements)
}

pub async fn select_render_task(
    State(state): State<Arc<GatewayState>>,
    body: Result<Json<Selection>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(selection) = body.map_err(|e| invalid_body(&e))?;
    let response = state
        .coordinator
        .broker()
        .submit_response(selection)
        .await
        .map_err(|e| broker_error(&e))?;

    Ok(Json(json!({
        "status": "success",
        "message": "Response sent",
        "response": response,
    })))
}

pub async fn abandon_render_task(
    State(state): State<Arc<GatewayState>>,
    body: String,
) -> Result<Json<StatusMessage>, ApiError> {
    let req: AbandonRequest = if body.trim().is_empty() {
        AbandonRequest::default()
    } else {
        serde_json::from_str(&body)
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, "INVALID_BODY", e.to_string()))?
    };

    state
        .coordinator
        .broker()
        .abandon(req.conversation_id.as_deref())
        .await
        .map_err(|e| broker_error(&e))?;
    Ok(StatusMessage::success("Task abandoned"))
}

pub async fn wait_render_task(
    State(state): State<Arc<GatewayState>>,
    Query(params): Query<WaitParams>,
) -> Response {
    let timeout = Duration::from_millis(params.timeout_ms.unwrap_or(DEFAULT_WAIT_MS).min(MAX_WAIT_MS));
    match state.coordinator.broker().next_notification(timeout).await {
        Some(announcement) => Json(announcement).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub async fn response_history(State(state): State<Arc<GatewayState>>) -> Json<Vec<HumanResponse>> {
    Json(state.coordinator.broker().history().await)
}

pub async fn stats(State(state): State<Arc<GatewayState>>) -> Json<BrokerStats> {
    Json(state.coordinator.broker().stats().await)
}

pub async fn get_format(State(state): State<Arc<GatewayState>>) -> Json<serde_json::Value> {
    Json(json!({ "format": state.coordinator.format().await }))
}

pub async fn set_format(
    State(state): State<Arc<GatewayState>>,
    body: Result<Json<FormatRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(req) = body.map_err(|e| invalid_body(&e))?;
    state
        .coordinator
        .set_format(&req.format)
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, "MISSING_FIELD", e.to_string()))?;

    Ok(Json(json!({
        "status": "success",
        "message": "Format updated",
        "format": req.format,
    })))
}
