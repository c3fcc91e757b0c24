use serde::Deserialize;

// --- Public domain types ---

/// A search hit, normalized out of Reddit's `t3` link wrapper.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub score: i64,
    pub permalink: String,
    pub subreddit: String,
}

/// One flattened comment from a post's reply tree.
#[derive(Debug, Clone)]
pub struct Comment {
    pub body: String,
    pub score: i64,
    pub replies: usize,
    pub permalink: String,
}

// --- Listing envelope wire types ---

/// Reddit wraps every object in `{"kind": ..., "data": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Thing<T> {
    pub kind: String,
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    pub children: Vec<T>,
}

/// The `data` of a `t3` (link) child in a search listing.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub score: i64,
    pub permalink: String,
    pub subreddit: String,
}

impl LinkData {
    pub fn into_post(self) -> Post {
        Post {
            id: self.id,
            title: self.title,
            score: self.score,
            permalink: format!("https://www.reddit.com{}", self.permalink),
            subreddit: self.subreddit,
        }
    }
}

/// A child of a comment listing: a real comment or a deferred-page
/// placeholder (`kind: "more"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum CommentNode {
    #[serde(rename = "t1")]
    Comment(CommentData),
    #[serde(rename = "more")]
    More(MoreData),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentData {
    pub body: String,
    #[serde(default)]
    pub score: i64,
    pub permalink: String,
    #[serde(default)]
    pub replies: Replies,
}

/// A `more` placeholder. Only carried so the tree parses; never expanded.
#[derive(Debug, Clone, Deserialize)]
pub struct MoreData {
    #[serde(default)]
    pub count: i64,
}

/// The `replies` field is a nested Listing when present and the empty
/// string when not.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Replies {
    Listing(Box<Thing<Listing<CommentNode>>>),
    Empty(String),
}

impl Default for Replies {
    fn default() -> Self {
        Replies::Empty(String::new())
    }
}

impl Replies {
    fn children(&self) -> &[CommentNode] {
        match self {
            Replies::Listing(thing) => &thing.data.children,
            Replies::Empty(_) => &[],
        }
    }

    fn direct_comment_count(&self) -> usize {
        self.children()
            .iter()
            .filter(|c| matches!(c, CommentNode::Comment(_)))
            .count()
    }
}

/// Flatten a comment tree depth-first, preserving listing order.
///
/// `more` placeholders contribute zero comments: the tree is taken as
/// delivered in the first page, never expanded with follow-up fetches.
pub fn flatten_comments(nodes: &[CommentNode], out: &mut Vec<Comment>) {
    for node in nodes {
        match node {
            CommentNode::Comment(data) => {
                out.push(Comment {
                    body: data.body.clone(),
                    score: data.score,
                    replies: data.replies.direct_comment_count(),
                    permalink: format!("https://www.reddit.com{}", data.permalink),
                });
                flatten_comments(data.replies.children(), out);
            }
            CommentNode::More(more) => {
                tracing::debug!(deferred = more.count, "Skipping 'more' placeholder node");
            }
        }
    }
}
