//! The two task endpoints: start (spawn-and-return) and poll.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use threadsift_common::{AnalysisMode, ForumMode, SortOrder, TimeWindow};
use threadsift_core::{TaskHandle, TaskRequest, TaskState};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StartTaskBody {
    pub keyword: String,
    #[serde(default)]
    pub timeframe: TimeWindow,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub subreddits: ForumMode,
    #[serde(default)]
    pub blocked_keywords: Option<Vec<String>>,
    #[serde(default)]
    pub analysis_mode: AnalysisMode,
}

fn default_limit() -> u32 {
    10
}

/// Upper bound on the final post count a client may request. Keeps the
/// over-fetch quota (limit x multiplier, split per forum) inside what the
/// search API will actually serve.
const MAX_LIMIT: u32 = 100;

/// Reset the observable state, schedule one task on a detached worker, and
/// return immediately. The task body never reports through this response;
/// clients follow it on `/task-status`.
pub async fn start_task(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StartTaskBody>,
) -> impl IntoResponse {
    let keyword = body.keyword.trim().to_string();
    if keyword.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "keyword must not be empty"})),
        )
            .into_response();
    }
    if body.limit == 0 || body.limit > MAX_LIMIT {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": format!("limit must be between 1 and {MAX_LIMIT}")})),
        )
            .into_response();
    }

    // Absent blocklist means the configured default; an explicit empty list
    // means "filter nothing".
    let blocklist = body
        .blocked_keywords
        .map(|words| words.into_iter().map(|w| w.to_lowercase()).collect())
        .unwrap_or_else(|| state.default_blocklist.clone());

    let request = TaskRequest {
        keyword: keyword.clone(),
        timeframe: body.timeframe,
        sort: body.sort_order,
        limit: body.limit,
        forum_mode: body.subreddits,
        blocklist,
        analysis_mode: body.analysis_mode,
    };

    info!(
        keyword = keyword.as_str(),
        mode = ?request.analysis_mode,
        forum_mode = ?request.forum_mode,
        "Scheduling task"
    );

    let handle = TaskHandle::new();
    handle.set("Task initializing", 0);
    state.board.publish(&handle);

    let runner = state.runner.clone();
    tokio::spawn(async move {
        runner.run(request, handle).await;
    });

    (StatusCode::OK, Json(json!({"message": "Task started"}))).into_response()
}

/// Always returns a well-formed snapshot; failure is visible only through
/// the status text and `progress == 100` with an empty `report_url`.
pub async fn task_status(State(state): State<Arc<AppState>>) -> Json<TaskState> {
    Json(state.board.current())
}
