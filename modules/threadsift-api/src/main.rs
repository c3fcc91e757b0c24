use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::Gemini;
use reddit_client::{Credentials, RedditClient};
use threadsift_common::Config;
use threadsift_core::{StatusBoard, TaskRunner};

mod routes;

pub struct AppState {
    pub board: StatusBoard,
    pub runner: Arc<TaskRunner>,
    pub default_blocklist: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("threadsift_core=info".parse()?)
                .add_directive("threadsift_api=info".parse()?),
        )
        .init();

    // Refuses to start when credentials are missing.
    let config = Config::from_env();

    let gemini = Gemini::new(config.gemini_api_key.clone(), config.gemini_model.clone());
    let reddit = RedditClient::new(Credentials {
        client_id: config.reddit_client_id.clone(),
        client_secret: config.reddit_client_secret.clone(),
        user_agent: config.reddit_user_agent.clone(),
        username: config.reddit_username.clone(),
        password: config.reddit_password.clone(),
    })?;

    let runner = Arc::new(TaskRunner::new(
        Arc::new(gemini),
        Arc::new(reddit),
        config.default_subreddits.clone(),
        config.reports_dir.clone(),
    ));

    let state = Arc::new(AppState {
        board: StatusBoard::new(),
        runner,
        default_blocklist: config.default_blocklist.clone(),
    });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Task surface
        .route("/start-task", post(routes::start_task))
        .route("/task-status", get(routes::task_status))
        // Rendered artifacts
        .nest_service("/reports", ServeDir::new(&config.reports_dir))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.web_host, config.web_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = addr.as_str(), "threadsift API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
