//! The fetch-rank-filter-budget pipeline.
//!
//! Everything with a real invariant lives here: fair per-forum quotas,
//! stable ranking with blocklist filtering, the character-budgeted comment
//! corpus, structured-response parsing with a defined fallback, and
//! monotone progress reporting for one long-running task at a time.

pub mod comments;
pub mod fetch;
pub mod mode;
pub mod render;
pub mod report;
pub mod resolver;
pub mod runner;
pub mod select;
pub mod status;

pub use mode::ModeProfile;
pub use report::AnalysisReport;
pub use runner::{TaskRequest, TaskRunner};
pub use status::{StatusBoard, TaskHandle, TaskState};
