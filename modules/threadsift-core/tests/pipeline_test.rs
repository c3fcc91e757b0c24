//! End-to-end pipeline runs against in-memory stand-ins for Reddit and the
//! AI service: a happy path that lands an artifact, and the defined failure
//! paths (nothing fetched, unparseable analysis, degraded smart mode).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;

use ai_client::Completion;
use reddit_client::{Comment, ForumSearch, Post};
use threadsift_common::{AnalysisMode, ForumMode, SortOrder, TimeWindow};
use threadsift_core::{TaskHandle, TaskRequest, TaskRunner};

// --- Stubs ---

/// Routes each prompt by its distinguishing phrasing: forum recommendation,
/// translation, or analysis.
struct StubAi {
    forum_reply: Option<String>,
    translation_reply: Option<String>,
    analysis_reply: String,
}

impl StubAi {
    fn analysis_only(reply: &str) -> Self {
        Self {
            forum_reply: None,
            translation_reply: None,
            analysis_reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl Completion for StubAi {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        if prompt.contains("joined by '+'") {
            return self
                .forum_reply
                .clone()
                .ok_or_else(|| anyhow!("forum recommendation unavailable"));
        }
        if prompt.contains("JSON object whose keys") {
            return self
                .translation_reply
                .clone()
                .ok_or_else(|| anyhow!("translation unavailable"));
        }
        Ok(self.analysis_reply.clone())
    }
}

struct StubSearch {
    posts: Vec<Post>,
    comments: HashMap<String, Vec<Comment>>,
    fail_searches: bool,
    searched_forums: Mutex<Vec<String>>,
    comment_fetches: AtomicUsize,
}

impl StubSearch {
    fn with_posts(posts: Vec<Post>, comments: HashMap<String, Vec<Comment>>) -> Self {
        Self {
            posts,
            comments,
            fail_searches: false,
            searched_forums: Mutex::new(Vec::new()),
            comment_fetches: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            posts: Vec::new(),
            comments: HashMap::new(),
            fail_searches: true,
            searched_forums: Mutex::new(Vec::new()),
            comment_fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ForumSearch for StubSearch {
    async fn search(
        &self,
        subreddit: &str,
        _query: &str,
        _sort: &str,
        _time_filter: Option<&str>,
        _limit: u32,
    ) -> anyhow::Result<Vec<Post>> {
        self.searched_forums
            .lock()
            .unwrap()
            .push(subreddit.to_string());
        if self.fail_searches {
            return Err(anyhow!("rate limited"));
        }
        Ok(self
            .posts
            .iter()
            .filter(|p| p.subreddit == subreddit)
            .cloned()
            .collect())
    }

    async fn comments(&self, post: &Post) -> anyhow::Result<Vec<Comment>> {
        self.comment_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.comments.get(&post.id).cloned().unwrap_or_default())
    }
}

// --- Fixtures ---

fn post(id: &str, subreddit: &str, title: &str, score: i64) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        score,
        permalink: format!("https://www.reddit.com/r/{subreddit}/{id}"),
        subreddit: subreddit.to_string(),
    }
}

fn comment(body: &str) -> Comment {
    Comment {
        body: body.to_string(),
        score: 5,
        replies: 1,
        permalink: "https://www.reddit.com/r/x/c/1".to_string(),
    }
}

const VALID_ANALYSIS: &str = r##"Here is the analysis you asked for:
{
    "executiveSummary": { "overallSentiment": "Users mostly complain about noise.", "keyFindings": ["noise", "price"] },
    "identifiedPainPoints": [
        { "title": "Fan noise", "usageScenario": "overnight use", "description": "Loud under load", "count": 7 }
    ],
    "chartData": { "labels": ["Fan noise"], "data": [7], "colors": ["#D2B48C"] },
    "commentExamples": [
        { "painPointTitle": "Fan noise", "commentTranslation": "It whines constantly.", "score": 12, "replies": 2, "permalink": "https://www.reddit.com/r/x/c/1" }
    ]
}"##;

fn request(keyword: &str, forum_mode: ForumMode) -> TaskRequest {
    TaskRequest {
        keyword: keyword.to_string(),
        timeframe: TimeWindow::Year,
        sort: SortOrder::Relevance,
        limit: 5,
        forum_mode,
        blocklist: vec!["politics".to_string()],
        analysis_mode: AnalysisMode::PainPoints,
    }
}

fn temp_reports_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("threadsift-test-{tag}-{}", std::process::id()))
}

// --- Tests ---

#[tokio::test]
async fn happy_path_renders_an_artifact_and_completes() {
    let mut comments = HashMap::new();
    comments.insert("p1".to_string(), vec![comment("too loud"), comment("returned mine")]);
    let search = Arc::new(StubSearch::with_posts(
        vec![
            post("p1", "homelab", "mini pc noise", 40),
            post("p2", "homelab", "politics rant", 90),
        ],
        comments,
    ));
    let ai = Arc::new(StubAi::analysis_only(VALID_ANALYSIS));

    let reports_dir = temp_reports_dir("happy");
    let runner = TaskRunner::new(ai, search.clone(), "homelab", &reports_dir);
    let handle = TaskHandle::new();
    runner.run(request("mini pc", ForumMode::Default), handle.clone()).await;

    let state = handle.snapshot();
    assert_eq!(state.progress, 100);
    assert_eq!(state.status, "Completed");
    assert!(state.report_url.starts_with("/reports/report_mini_pc_"));

    let filename = state.report_url.trim_start_matches("/reports/");
    let html = std::fs::read_to_string(reports_dir.join(filename)).unwrap();
    assert!(html.contains("Fan noise"));
    assert!(html.contains("r/homelab"));
    std::fs::remove_dir_all(&reports_dir).ok();
}

#[tokio::test]
async fn all_forums_failing_reports_no_results_without_aggregating() {
    let search = Arc::new(StubSearch::failing());
    let ai = Arc::new(StubAi::analysis_only(VALID_ANALYSIS));

    let reports_dir = temp_reports_dir("failing");
    let runner = TaskRunner::new(ai, search.clone(), "homelab+selfhosted", &reports_dir);
    let handle = TaskHandle::new();
    runner.run(request("mini pc", ForumMode::Default), handle.clone()).await;

    let state = handle.snapshot();
    assert_eq!(state.progress, 100);
    assert!(state.status.contains("No posts found"));
    assert!(state.report_url.is_empty());
    // Comment aggregation never ran.
    assert_eq!(search.comment_fetches.load(Ordering::SeqCst), 0);
    assert!(!reports_dir.exists());
}

#[tokio::test]
async fn braceless_analysis_response_is_fatal_and_writes_nothing() {
    let mut comments = HashMap::new();
    comments.insert("p1".to_string(), vec![comment("fine machine")]);
    let search = Arc::new(StubSearch::with_posts(
        vec![post("p1", "homelab", "mini pc", 10)],
        comments,
    ));
    let ai = Arc::new(StubAi::analysis_only("I am unable to produce a report."));

    let reports_dir = temp_reports_dir("malformed");
    let runner = TaskRunner::new(ai, search, "homelab", &reports_dir);
    let handle = TaskHandle::new();
    runner.run(request("mini pc", ForumMode::Default), handle.clone()).await;

    let state = handle.snapshot();
    assert_eq!(state.progress, 100);
    assert!(state.status.contains("parseable JSON"));
    assert!(state.report_url.is_empty());
    assert!(!reports_dir.exists());
}

#[tokio::test]
async fn smart_mode_with_prose_forum_reply_falls_back_to_default_list() {
    let search = Arc::new(StubSearch::failing());
    let ai = Arc::new(StubAi {
        forum_reply: Some("Sure! Try r/homelab and r/selfhosted.".to_string()),
        translation_reply: None,
        analysis_reply: VALID_ANALYSIS.to_string(),
    });

    let reports_dir = temp_reports_dir("fallback");
    let runner = TaskRunner::new(ai, search.clone(), "homelab+selfhosted", &reports_dir);
    let handle = TaskHandle::new();
    runner.run(request("mini pc", ForumMode::Smart), handle.clone()).await;

    // Degraded to the curated default list, then failed downstream on the
    // empty pool; the degradation itself never fails the resolution.
    let searched = search.searched_forums.lock().unwrap().clone();
    assert_eq!(searched, vec!["homelab".to_string(), "selfhosted".to_string()]);
    assert!(handle.snapshot().status.contains("No posts found"));
}

#[tokio::test]
async fn smart_mode_publishes_annotated_forums_with_placeholder_translations() {
    let mut comments = HashMap::new();
    comments.insert("p1".to_string(), vec![comment("solid build")]);
    let search = Arc::new(StubSearch::with_posts(
        vec![post("p1", "homelab", "mini pc", 10)],
        comments,
    ));
    // Forum recommendation succeeds; translation returns no JSON object.
    let ai = Arc::new(StubAi {
        forum_reply: Some("r/homelab".to_string()),
        translation_reply: Some("homelab means home laboratory".to_string()),
        analysis_reply: VALID_ANALYSIS.to_string(),
    });

    let reports_dir = temp_reports_dir("annotated");
    let runner = TaskRunner::new(ai, search, "unused-default", &reports_dir);
    let handle = TaskHandle::new();
    runner.run(request("mini pc", ForumMode::Smart), handle.clone()).await;

    let state = handle.snapshot();
    let forums = state.recommended_forums.expect("side-channel data published");
    assert_eq!(forums.len(), 1);
    assert_eq!(forums[0].name, "homelab");
    assert_eq!(forums[0].translation, "translation unavailable");
    assert_eq!(state.progress, 100);
    assert_eq!(state.status, "Completed");
    std::fs::remove_dir_all(&reports_dir).ok();
}
