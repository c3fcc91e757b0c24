//! One task's lifecycle, start to terminal state.
//!
//! The runner owns the stage sequence and the milestone reporting; the
//! boundary wrapper turns every stage error into a final failed status so
//! nothing escapes into the worker or the serving process.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use ai_client::Completion;
use reddit_client::ForumSearch;
use threadsift_common::{AnalysisMode, ForumMode, SortOrder, TaskError, TimeWindow};

use crate::comments::CommentAggregator;
use crate::fetch::QuotaFetcher;
use crate::mode::ModeProfile;
use crate::render::{artifact_name, render_report};
use crate::report::summarize;
use crate::resolver::ForumResolver;
use crate::select::select_top_posts;
use crate::status::TaskHandle;

/// Milestone percentages per stage. Deliberately coarse markers, not a
/// computed ETA; the resolver owns the 10-15 band for smart discovery.
mod milestone {
    pub const SEARCHING: u8 = 25;
    pub const RANKING: u8 = 40;
    pub const AGGREGATING: u8 = 50;
    pub const SUMMARIZING: u8 = 65;
    pub const RENDERING: u8 = 90;
    pub const SAVING: u8 = 95;
}

/// Everything one task needs, fixed at start.
#[derive(Debug, Clone)]
pub struct TaskRequest {
    pub keyword: String,
    pub timeframe: TimeWindow,
    pub sort: SortOrder,
    pub limit: u32,
    pub forum_mode: ForumMode,
    pub blocklist: Vec<String>,
    pub analysis_mode: AnalysisMode,
}

pub struct TaskRunner {
    ai: Arc<dyn Completion>,
    search: Arc<dyn ForumSearch>,
    default_forums: String,
    reports_dir: PathBuf,
}

impl TaskRunner {
    pub fn new(
        ai: Arc<dyn Completion>,
        search: Arc<dyn ForumSearch>,
        default_forums: impl Into<String>,
        reports_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ai,
            search,
            default_forums: default_forums.into(),
            reports_dir: reports_dir.into(),
        }
    }

    /// Run one task to its terminal state. Never panics the worker: any
    /// stage error becomes a failed status with progress forced to 100.
    pub async fn run(&self, request: TaskRequest, handle: TaskHandle) {
        info!(
            keyword = request.keyword.as_str(),
            mode = ?request.analysis_mode,
            "Task starting"
        );
        match self.run_inner(&request, &handle).await {
            Ok(report_url) => {
                info!(report_url = report_url.as_str(), "Task completed");
                handle.complete("Completed", report_url);
            }
            Err(e) => {
                error!(error = %e, keyword = request.keyword.as_str(), "Task failed");
                handle.fail(e);
            }
        }
    }

    async fn run_inner(
        &self,
        request: &TaskRequest,
        handle: &TaskHandle,
    ) -> Result<String, TaskError> {
        let profile = ModeProfile::for_mode(request.analysis_mode);

        // Stage: resolve forums (infallible; smart mode degrades internally)
        let resolver = ForumResolver::new(self.ai.as_ref(), &self.default_forums);
        let forums = resolver
            .resolve(&request.keyword, request.forum_mode, handle)
            .await;

        // Stage: quota-fair fetch
        handle.set(
            format!("Searching across {} forum(s)", forums.len()),
            milestone::SEARCHING,
        );
        let fetcher = QuotaFetcher::new(self.search.as_ref());
        let outcome = fetcher
            .fetch(
                &forums,
                &request.keyword,
                profile,
                request.sort,
                request.timeframe,
                request.limit,
            )
            .await?;

        // Stage: rank, filter, select
        let fetch_note = if outcome.failed_forums > 0 {
            format!(
                "Posts fetched ({} forum(s) failed), ranking and filtering",
                outcome.failed_forums
            )
        } else {
            "Posts fetched, ranking and filtering".to_string()
        };
        handle.set(fetch_note, milestone::RANKING);
        let selected = select_top_posts(
            outcome.pool,
            &request.blocklist,
            request.limit as usize,
            &request.keyword,
        )?;

        // Stage: aggregate comments under the character budget
        handle.set(
            format!("Fetching comments from {} post(s)", selected.len()),
            milestone::AGGREGATING,
        );
        let aggregator = CommentAggregator::new(self.search.as_ref());
        let corpus = aggregator.aggregate(&selected).await?;

        // Stage: summarize
        handle.set(
            format!(
                "Corpus ready ({} comments), requesting AI analysis",
                corpus.comment_count
            ),
            milestone::SUMMARIZING,
        );
        let report = summarize(self.ai.as_ref(), profile, &request.keyword, &corpus.text).await?;

        // Stage: render and persist the artifact
        handle.set("Analysis complete, rendering report", milestone::RENDERING);
        let html = render_report(&report, &request.keyword, &forums, profile);

        handle.set("Report rendered, saving artifact", milestone::SAVING);
        let filename = artifact_name(&request.keyword, Utc::now());
        tokio::fs::create_dir_all(&self.reports_dir).await?;
        tokio::fs::write(self.reports_dir.join(&filename), html).await?;

        Ok(format!("/reports/{filename}"))
    }
}
