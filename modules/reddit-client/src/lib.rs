pub mod error;
pub mod types;

pub use error::{RedditError, Result};
pub use types::{Comment, Post};

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use types::{flatten_comments, CommentNode, LinkData, Listing, Thing};

const AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_URL: &str = "https://oauth.reddit.com";

/// Refresh the token this long before it actually expires.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// How deep a single comment-tree fetch goes. One page, never expanded.
const COMMENT_FETCH_LIMIT: u32 = 500;

// =============================================================================
// ForumSearch — the seam the pipeline is tested against
// =============================================================================

/// Search a forum and expand a post's comment tree.
///
/// `subreddit` may be the sentinel `"all"`, meaning no forum scoping.
/// `time_filter` is only meaningful for time-bounded sorts (`top`,
/// `relevance`) and is ignored otherwise.
#[async_trait]
pub trait ForumSearch: Send + Sync {
    async fn search(
        &self,
        subreddit: &str,
        query: &str,
        sort: &str,
        time_filter: Option<&str>,
        limit: u32,
    ) -> anyhow::Result<Vec<Post>>;

    async fn comments(&self, post: &Post) -> anyhow::Result<Vec<Comment>>;
}

// =============================================================================
// RedditClient
// =============================================================================

/// Script-app credentials (password grant).
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct RedditClient {
    http: reqwest::Client,
    credentials: Credentials,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(credentials.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            credentials,
            token: Mutex::new(None),
        })
    }

    /// Return a valid bearer token, fetching a fresh one when the cached
    /// token is missing or close to expiry.
    async fn access_token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        if let Some(cached) = guard.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.value.clone());
            }
        }

        debug!("Requesting Reddit access token");
        let resp = self
            .http
            .post(AUTH_URL)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[
                ("grant_type", "password"),
                ("username", self.credentials.username.as_str()),
                ("password", self.credentials.password.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RedditError::Auth(format!("status {status}: {body}")));
        }

        let token: TokenResponse = resp.json().await?;
        let expires_at = Instant::now()
            + Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        let value = token.access_token.clone();
        *guard = Some(CachedToken {
            value: token.access_token,
            expires_at,
        });
        Ok(value)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let token = self.access_token().await?;
        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RedditError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }

    /// Search one subreddit (or all of Reddit for the `"all"` sentinel).
    pub async fn search_posts(
        &self,
        subreddit: &str,
        query: &str,
        sort: &str,
        time_filter: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Post>> {
        let limit_str = limit.to_string();
        let mut params = vec![
            ("q", query),
            ("sort", sort),
            ("limit", limit_str.as_str()),
            ("raw_json", "1"),
        ];
        if let Some(t) = time_filter {
            params.push(("t", t));
        }

        // The "all" sentinel searches site-wide without forum scoping.
        let url = if subreddit == "all" {
            format!("{API_URL}/search")
        } else {
            params.push(("restrict_sr", "1"));
            format!("{API_URL}/r/{subreddit}/search")
        };

        let listing: Thing<Listing<Thing<LinkData>>> = self.get_json(&url, &params).await?;
        let posts: Vec<Post> = listing
            .data
            .children
            .into_iter()
            .filter(|child| child.kind == "t3")
            .map(|child| child.data.into_post())
            .collect();

        info!(subreddit, count = posts.len(), "Search returned posts");
        Ok(posts)
    }

    /// Fetch one post's comment tree, flattened.
    /// Deferred pages (`more` nodes) are not expanded.
    pub async fn fetch_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        let url = format!("{API_URL}/comments/{post_id}");
        let limit_str = COMMENT_FETCH_LIMIT.to_string();
        let params = [("limit", limit_str.as_str()), ("raw_json", "1")];

        // The endpoint returns a two-element array: the post listing, then
        // the comment listing.
        let pages: Vec<serde_json::Value> = self.get_json(&url, &params).await?;
        let comment_page = pages.into_iter().nth(1).ok_or_else(|| {
            RedditError::Parse("comments response missing the comment listing".into())
        })?;
        let listing: Thing<Listing<CommentNode>> = serde_json::from_value(comment_page)?;

        let mut comments = Vec::new();
        flatten_comments(&listing.data.children, &mut comments);
        debug!(post_id, count = comments.len(), "Flattened comment tree");
        Ok(comments)
    }
}

#[async_trait]
impl ForumSearch for RedditClient {
    async fn search(
        &self,
        subreddit: &str,
        query: &str,
        sort: &str,
        time_filter: Option<&str>,
        limit: u32,
    ) -> anyhow::Result<Vec<Post>> {
        Ok(self
            .search_posts(subreddit, query, sort, time_filter, limit)
            .await?)
    }

    async fn comments(&self, post: &Post) -> anyhow::Result<Vec<Comment>> {
        Ok(self.fetch_comments(&post.id).await?)
    }
}
