//! Quota-fair fan-out search across the resolved forum set.
//!
//! The quota is a fixed fair-share split computed once per task; it is not
//! rebalanced when a forum fails or underpopulates, so the merged pool may
//! fall short of the target sample size. Per-forum failures are isolated:
//! logged, counted, and discarded by the collector.

use tracing::{info, warn};

use reddit_client::{ForumSearch, Post};
use threadsift_common::{SortOrder, TaskError, TimeWindow};

use crate::mode::ModeProfile;

/// Over-fetch factor: the raw pool targets this many times the final count
/// so ranking and blocklist filtering have room to discard.
pub const FETCH_MULTIPLIER: u32 = 3;

/// Fair-share quota: `ceil(sample_size / forum_count)`, never below 1.
pub fn per_forum_quota(sample_size: u32, forum_count: usize) -> u32 {
    sample_size.div_ceil(forum_count as u32).max(1)
}

/// The merged raw pool plus how many forums dropped out along the way.
pub struct FetchOutcome {
    pub pool: Vec<Post>,
    pub failed_forums: usize,
}

pub struct QuotaFetcher<'a> {
    client: &'a dyn ForumSearch,
}

impl<'a> QuotaFetcher<'a> {
    pub fn new(client: &'a dyn ForumSearch) -> Self {
        Self { client }
    }

    /// Issue one quota-bounded search per forum and merge the successes.
    ///
    /// An empty forum set is a configuration error; an empty merged pool is
    /// not — that case is detected by the selection stage, which knows how
    /// to word it for the user.
    pub async fn fetch(
        &self,
        forums: &[String],
        keyword: &str,
        profile: &ModeProfile,
        requested_sort: SortOrder,
        window: TimeWindow,
        limit: u32,
    ) -> Result<FetchOutcome, TaskError> {
        if forums.is_empty() {
            return Err(TaskError::NoForums);
        }

        // Saturate rather than trust the caller's limit; the HTTP layer
        // caps it, but the quota math must stay panic-free regardless.
        let sample_size = limit.saturating_mul(FETCH_MULTIPLIER);
        let quota = per_forum_quota(sample_size, forums.len());
        let query = profile.search_query(keyword);
        let sort = profile.effective_sort(requested_sort);
        let time_filter = sort.is_time_bounded().then(|| window.as_str());

        info!(
            forums = forums.len(),
            quota,
            sample_size,
            sort = sort.as_str(),
            "Fetching posts across forums"
        );

        let mut pool = Vec::new();
        let mut failed_forums = 0usize;
        for forum in forums {
            match self
                .client
                .search(forum, &query, sort.as_str(), time_filter, quota)
                .await
            {
                Ok(posts) => pool.extend(posts),
                Err(e) => {
                    warn!(forum = forum.as_str(), error = %e, "Forum search failed, skipping");
                    failed_forums += 1;
                }
            }
        }

        info!(
            pool = pool.len(),
            failed_forums, "Fetch round complete"
        );
        Ok(FetchOutcome {
            pool,
            failed_forums,
        })
    }
}
