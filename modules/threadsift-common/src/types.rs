use serde::{Deserialize, Serialize};

// --- Enums ---

/// Which analysis the summarization stage runs. Selected once at task start;
/// carries the query-augmentation strategy, the expected response schema and
/// the report headings together (see `threadsift-core`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    PainPoints,
    HotTopics,
}

impl Default for AnalysisMode {
    fn default() -> Self {
        AnalysisMode::PainPoints
    }
}

/// How the forum set for a task is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForumMode {
    /// The curated list from configuration.
    Default,
    /// Ask the AI to recommend forums; falls back to `Default` on failure.
    Smart,
    /// The `all` sentinel: search without forum scoping.
    Unrestricted,
}

impl Default for ForumMode {
    fn default() -> Self {
        ForumMode::Smart
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Relevance,
    Hot,
    Top,
    New,
    Comments,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Relevance
    }
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::Hot => "hot",
            SortOrder::Top => "top",
            SortOrder::New => "new",
            SortOrder::Comments => "comments",
        }
    }

    /// Only time-bounded sorts accept a time window parameter.
    pub fn is_time_bounded(&self) -> bool {
        matches!(self, SortOrder::Top | SortOrder::Relevance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl Default for TimeWindow {
    fn default() -> Self {
        TimeWindow::Year
    }
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

// --- Forum annotation ---

/// A resolved forum with its display translation, published to the polling
/// client as side-channel data when smart resolution succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumInfo {
    pub name: String,
    pub translation: String,
}
