//! Forum resolution: curated list, the `all` sentinel, or AI discovery.
//!
//! Smart mode never fails the task. Forum discovery is an optimization,
//! so every failure path here degrades to the curated default list with a
//! status note instead of propagating.

use std::collections::HashMap;

use regex::Regex;
use tracing::{info, warn};

use ai_client::util::extract_json_object;
use ai_client::Completion;
use threadsift_common::{ForumInfo, ForumMode};

use crate::status::TaskHandle;

/// Upper bound the AI is asked for in smart mode.
const MAX_SMART_FORUMS: usize = 15;

/// Annotation used when the translation call returns nothing usable.
const TRANSLATION_PLACEHOLDER: &str = "translation unavailable";

/// Sentinel forum meaning "search without forum scoping".
pub const UNRESTRICTED_SENTINEL: &str = "all";

pub struct ForumResolver<'a> {
    ai: &'a dyn Completion,
    default_forums: &'a str,
}

impl<'a> ForumResolver<'a> {
    /// `default_forums` is the curated `+`-joined list from configuration.
    pub fn new(ai: &'a dyn Completion, default_forums: &'a str) -> Self {
        Self { ai, default_forums }
    }

    /// Produce the ordered forum set for one task. Infallible by contract.
    pub async fn resolve(&self, keyword: &str, mode: ForumMode, handle: &TaskHandle) -> Vec<String> {
        match mode {
            ForumMode::Default => split_forum_string(self.default_forums),
            ForumMode::Unrestricted => vec![UNRESTRICTED_SENTINEL.to_string()],
            ForumMode::Smart => match self.smart_resolve(keyword, handle).await {
                Ok(forums) => forums,
                Err(e) => {
                    warn!(error = %e, "Smart forum discovery failed, using the default list");
                    handle.set(
                        format!("Smart forum discovery failed ({e}); using the default list"),
                        15,
                    );
                    split_forum_string(self.default_forums)
                }
            },
        }
    }

    async fn smart_resolve(&self, keyword: &str, handle: &TaskHandle) -> anyhow::Result<Vec<String>> {
        handle.set("Asking the AI for relevant forums", 10);

        let prompt = format!(
            "For the keyword \"{keyword}\", recommend up to {MAX_SMART_FORUMS} of the most \
             relevant Reddit subreddits. Your answer must be a single string of subreddit \
             names joined by '+', with no other text."
        );
        let response = self.ai.complete(&prompt).await?;
        let joined: String = response.trim().replace('\n', "");

        // Strict shape check before anything downstream trusts the names.
        let shape = Regex::new(r"^[a-zA-Z0-9_/]+(\+[a-zA-Z0-9_/]+)*$").expect("valid regex");
        if !shape.is_match(&joined) {
            anyhow::bail!("recommended forum list has an unexpected format: '{joined}'");
        }

        let forums = split_forum_string(&joined);
        info!(count = forums.len(), "AI recommended forums");

        handle.set("Forum list received, requesting translations", 12);
        let annotated = self.translate_forums(&forums).await;
        handle.set_forums(annotated);
        handle.set("AI-recommended forums ready", 15);

        Ok(forums)
    }

    /// Ask for a name→translation JSON object. A response with no parseable
    /// object degrades every entry to a fixed placeholder; this call can
    /// not fail the resolution.
    async fn translate_forums(&self, forums: &[String]) -> Vec<ForumInfo> {
        let prompt = format!(
            "Translate each of these Reddit subreddit names into a short plain-English \
             description of the community. Respond with a single JSON object whose keys are \
             the names and whose values are the descriptions: {}",
            forums.join(", ")
        );

        let translations: HashMap<String, String> = match self.ai.complete(&prompt).await {
            Ok(response) => extract_json_object(&response)
                .and_then(|region| serde_json::from_str(region).ok())
                .unwrap_or_else(|| {
                    warn!("Translation response contained no parseable JSON object");
                    HashMap::new()
                }),
            Err(e) => {
                warn!(error = %e, "Translation call failed");
                HashMap::new()
            }
        };

        forums
            .iter()
            .map(|name| ForumInfo {
                name: name.clone(),
                translation: translations
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| TRANSLATION_PLACEHOLDER.to_string()),
            })
            .collect()
    }
}

/// Split a `+`-joined forum string into normalized names: empty segments
/// dropped, a leading `r/` prefix stripped.
pub fn split_forum_string(joined: &str) -> Vec<String> {
    joined
        .split('+')
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_start_matches("r/").to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_strips_prefix_markers() {
        let forums = split_forum_string("r/rust+programming++r/learnrust");
        assert_eq!(forums, vec!["rust", "programming", "learnrust"]);
    }

    #[test]
    fn default_mode_is_idempotent() {
        let a = split_forum_string("alpha+beta+gamma");
        let b = split_forum_string("alpha+beta+gamma");
        assert_eq!(a, b);
    }

    #[test]
    fn shape_regex_rejects_prose_answers() {
        let shape = Regex::new(r"^[a-zA-Z0-9_/]+(\+[a-zA-Z0-9_/]+)*$").unwrap();
        assert!(shape.is_match("rust+r/programming+home_automation"));
        assert!(!shape.is_match("Sure! Here are some subreddits: rust+programming"));
        assert!(!shape.is_match("rust, programming"));
        assert!(!shape.is_match(""));
    }
}
