use thiserror::Error;

/// Everything that can end a task.
///
/// The empty-result kinds carry distinct remediation advice, so they must
/// stay separate variants rather than collapsing into one "nothing found"
/// message. All variants are caught at the task boundary and become a final
/// status string; none of them crosses into the HTTP layer.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("No forums resolved to search; check the default subreddit configuration")]
    NoForums,

    #[error("No posts found for '{0}'. Try hot-topics mode or a different keyword")]
    NoResults(String),

    #[error("Every fetched post was excluded by the blocklist. Loosen the blocked keywords or try another keyword")]
    AllBlocked,

    #[error("No comments found under the selected posts")]
    EmptyCorpus,

    #[error("AI analysis response contained no parseable JSON object")]
    MalformedResponse,

    #[error("Comment fetch failed: {0}")]
    Search(String),

    #[error("AI request failed: {0}")]
    Ai(String),

    #[error("Failed to write report artifact: {0}")]
    Io(#[from] std::io::Error),
}
