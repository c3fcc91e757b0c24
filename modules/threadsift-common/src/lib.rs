pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::TaskError;
pub use types::{AnalysisMode, ForumInfo, ForumMode, SortOrder, TimeWindow};
