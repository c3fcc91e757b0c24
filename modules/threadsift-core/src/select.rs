//! Rank the merged pool, drop blocklisted titles, keep the top N.

use tracing::info;

use reddit_client::Post;
use threadsift_common::TaskError;

/// Stable-sort by score descending (ties keep pool order), reject any post
/// whose lowercased title contains a blocklist substring, stop at `limit`.
///
/// "Nothing was fetched" and "everything was filtered out" are distinct
/// errors: the first suggests a different mode or keyword, the second
/// suggests loosening the blocklist.
pub fn select_top_posts(
    mut pool: Vec<Post>,
    blocklist: &[String],
    limit: usize,
    keyword: &str,
) -> Result<Vec<Post>, TaskError> {
    if pool.is_empty() {
        return Err(TaskError::NoResults(keyword.to_string()));
    }

    pool.sort_by(|a, b| b.score.cmp(&a.score));

    let selected: Vec<Post> = pool
        .into_iter()
        .filter(|post| {
            let title = post.title.to_lowercase();
            !blocklist.iter().any(|blocked| title.contains(blocked))
        })
        .take(limit)
        .collect();

    if selected.is_empty() {
        return Err(TaskError::AllBlocked);
    }

    info!(selected = selected.len(), "Posts selected for analysis");
    Ok(selected)
}
