pub mod api;
pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod media;
pub mod placeholder;
pub mod render;
pub mod seo;
pub mod state;
pub mod storage;

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use auth::FirebaseVerifier;
use config::Config;
use media::{R2Config, R2MediaStore};
use state::AppState;

/// 初始化日志，过滤规则来自环境变量 `INKWELL_LOG`
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("INKWELL_LOG"))
        .init();
}

pub async fn run() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env();
    let verifier = FirebaseVerifier::new(&config.firebase_project_id);
    let media = R2MediaStore::new(&R2Config::from_env());

    let app = AppState::new(
        storage::init_db_from_env().await,
        render::GithubApiRenderer::default(),
        Arc::new(verifier),
        Arc::new(media),
        config,
    );

    api::run_server(app).await
}
