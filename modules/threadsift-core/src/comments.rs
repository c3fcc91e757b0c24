//! Comment aggregation: expand each selected post's flattened tree and
//! serialize the lot into one character-budgeted corpus.

use serde_json::json;
use tracing::{info, warn};

use ai_client::util::truncate_to_char_boundary;
use reddit_client::{Comment, ForumSearch, Post};
use threadsift_common::TaskError;

/// Hard cap on the corpus handed to the summarization call.
pub const CORPUS_CHAR_BUDGET: usize = 30_000;

/// The serialized corpus and how many comments fed it (pre-truncation).
pub struct Corpus {
    pub text: String,
    pub comment_count: usize,
}

pub struct CommentAggregator<'a> {
    client: &'a dyn ForumSearch,
}

impl<'a> CommentAggregator<'a> {
    pub fn new(client: &'a dyn ForumSearch) -> Self {
        Self { client }
    }

    /// Fetch every selected post's flattened comments and serialize them.
    ///
    /// A failing post is skipped, not fatal; zero comments across all posts
    /// is the `EmptyCorpus` error. Per-post order is preserved; there is no
    /// cross-post ordering guarantee beyond the selection order.
    pub async fn aggregate(&self, posts: &[Post]) -> Result<Corpus, TaskError> {
        let mut comments: Vec<Comment> = Vec::new();
        for post in posts {
            match self.client.comments(post).await {
                Ok(batch) => comments.extend(batch),
                Err(e) => {
                    warn!(post_id = post.id.as_str(), error = %e, "Comment fetch failed, skipping post");
                }
            }
        }

        if comments.is_empty() {
            return Err(TaskError::EmptyCorpus);
        }

        let full = render_corpus(&comments);
        let text = truncate_to_char_boundary(&full, CORPUS_CHAR_BUDGET).to_string();
        info!(
            comments = comments.len(),
            corpus_chars = text.len(),
            truncated = full.len() > text.len(),
            "Comment corpus assembled"
        );

        Ok(Corpus {
            text,
            comment_count: comments.len(),
        })
    }
}

/// One JSON object per line. Truncation later is a hard prefix cut, so the
/// last line of a capped corpus may stop mid-record; the model copes.
pub fn render_corpus(comments: &[Comment]) -> String {
    comments
        .iter()
        .map(|c| {
            json!({
                "body": c.body,
                "score": c.score,
                "replies": c.replies,
                "permalink": c.permalink,
            })
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(body: &str, score: i64) -> Comment {
        Comment {
            body: body.to_string(),
            score,
            replies: 0,
            permalink: "https://www.reddit.com/r/x/c/1".to_string(),
        }
    }

    #[test]
    fn corpus_is_one_json_line_per_comment() {
        let corpus = render_corpus(&[comment("first", 3), comment("second", 1)]);
        let lines: Vec<&str> = corpus.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value.get("body").is_some());
            assert!(value.get("permalink").is_some());
        }
    }

    #[test]
    fn truncated_corpus_is_an_exact_prefix() {
        let comments: Vec<Comment> = (0..2000)
            .map(|i| comment(&format!("comment number {i} with some padding text"), i))
            .collect();
        let full = render_corpus(&comments);
        assert!(full.len() > CORPUS_CHAR_BUDGET);

        let capped = truncate_to_char_boundary(&full, CORPUS_CHAR_BUDGET);
        assert!(capped.len() <= CORPUS_CHAR_BUDGET);
        assert!(full.starts_with(capped));
    }

    #[test]
    fn multibyte_bodies_never_split_a_character() {
        let comments: Vec<Comment> = (0..3000).map(|_| comment("评论内容测试", 1)).collect();
        let full = render_corpus(&comments);
        let capped = truncate_to_char_boundary(&full, CORPUS_CHAR_BUDGET);
        assert!(capped.len() <= CORPUS_CHAR_BUDGET);
        assert!(std::str::from_utf8(capped.as_bytes()).is_ok());
    }
}
