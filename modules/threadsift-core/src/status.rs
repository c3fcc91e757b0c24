//! Per-task status state and the process-wide board the HTTP layer polls.
//!
//! Each task owns an isolated `TaskHandle`; the `StatusBoard` only tracks
//! which handle is currently observable (last writer wins). Concurrent task
//! bodies therefore cannot interleave writes into each other's state, while
//! the polling surface keeps its "one task at a time" contract.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use threadsift_common::ForumInfo;

/// Snapshot of one task's externally visible state.
#[derive(Debug, Clone, Serialize)]
pub struct TaskState {
    pub status: String,
    pub progress: u8,
    pub report_url: String,
    #[serde(rename = "ai_subreddits")]
    pub recommended_forums: Option<Vec<ForumInfo>>,
}

impl Default for TaskState {
    fn default() -> Self {
        Self {
            status: "Waiting for a task to start".to_string(),
            progress: 0,
            report_url: String::new(),
            recommended_forums: None,
        }
    }
}

/// Handle to one in-flight task's state. Cheap to clone; every stage of the
/// runner publishes milestones through it.
#[derive(Clone, Default)]
pub struct TaskHandle {
    state: Arc<Mutex<TaskState>>,
}

impl TaskHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a stage milestone. Progress is monotone within a task:
    /// a stale smaller value never rewinds the bar.
    pub fn set(&self, status: impl Into<String>, progress: u8) {
        let mut state = self.lock();
        state.status = status.into();
        state.progress = state.progress.max(progress.min(100));
    }

    /// Attach the AI-recommended forum list as side-channel data.
    pub fn set_forums(&self, forums: Vec<ForumInfo>) {
        self.lock().recommended_forums = Some(forums);
    }

    /// Terminal success: status, progress 100 and the artifact location.
    pub fn complete(&self, status: impl Into<String>, report_url: impl Into<String>) {
        let mut state = self.lock();
        state.status = status.into();
        state.progress = 100;
        state.report_url = report_url.into();
    }

    /// Terminal failure: the reason becomes the status and progress is
    /// forced to 100 so pollers stop waiting. No report URL is set.
    pub fn fail(&self, reason: impl std::fmt::Display) {
        let mut state = self.lock();
        state.status = format!("Task failed: {reason}");
        state.progress = 100;
    }

    pub fn snapshot(&self) -> TaskState {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TaskState> {
        // A task body that panicked mid-set leaves consistent-enough state
        // for a status readout.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Process-wide registry of the currently observable task.
#[derive(Default)]
pub struct StatusBoard {
    current: Mutex<Option<TaskHandle>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `handle` the observable task, discarding whatever the previous
    /// task had published. Last writer wins.
    pub fn publish(&self, handle: &TaskHandle) {
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *current = Some(handle.clone());
    }

    /// Snapshot of the current task, or the idle default before any task
    /// has started.
    pub fn current(&self) -> TaskState {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(TaskHandle::snapshot)
            .unwrap_or_default()
    }
}
