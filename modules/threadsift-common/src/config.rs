use std::env;

/// The curated fallback forum list, used in `default` mode and whenever
/// smart resolution degrades.
pub const DEFAULT_SUBREDDITS: &str =
    "homeimprovement+interiordesign+Apartmentliving+malelivingspace+femalelivingspace+homeautomation";

/// Title substrings that disqualify a post when the caller supplies no
/// blocklist of their own.
pub const DEFAULT_BLOCKED_KEYWORDS: &[&str] = &[
    "shower", "politics", "trump", "war", "navy", "smoke", "military", "game",
];

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Reddit script-app credentials
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
    pub reddit_user_agent: String,
    pub reddit_username: String,
    pub reddit_password: String,

    // AI provider
    pub gemini_api_key: String,
    pub gemini_model: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Where rendered report artifacts land (served statically)
    pub reports_dir: String,

    // Task defaults
    pub default_subreddits: String,
    pub default_blocklist: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing — the
    /// process refuses to start rather than running degraded.
    pub fn from_env() -> Self {
        Self {
            reddit_client_id: required_env("REDDIT_CLIENT_ID"),
            reddit_client_secret: required_env("REDDIT_CLIENT_SECRET"),
            reddit_user_agent: required_env("REDDIT_USER_AGENT"),
            reddit_username: required_env("REDDIT_USERNAME"),
            reddit_password: required_env("REDDIT_PASSWORD"),
            gemini_api_key: required_env("GEMINI_API_KEY"),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
            reports_dir: env::var("REPORTS_DIR").unwrap_or_else(|_| "static".to_string()),
            default_subreddits: env::var("DEFAULT_SUBREDDITS")
                .unwrap_or_else(|_| DEFAULT_SUBREDDITS.to_string()),
            default_blocklist: env::var("BLOCKED_KEYWORDS")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_lowercase())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| {
                    DEFAULT_BLOCKED_KEYWORDS
                        .iter()
                        .map(|s| s.to_string())
                        .collect()
                }),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
