use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use super::Querier;

use crate::{
    config::Config,
    seo::{SitemapGenerator, SitemapSource, WebManifest, generate_robots},
    state::AppState,
    storage::DBPool,
};

/// 配置站点根路径下的 SEO 路由。
///
/// - `GET /sitemap.xml`
/// - `GET /robots.txt`
/// - `GET /manifest.webmanifest`
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
        .route("/manifest.webmanifest", get(manifest))
}

async fn sitemap_source(pool: &DBPool) -> Result<SitemapSource, sqlx::Error> {
    let (posts, categories, authors) =
        tokio::try_join!(pool.sitemap_entries(), pool.categories(), pool.authors())?;

    Ok(SitemapSource {
        posts,
        categories: categories.into_iter().map(|c| c.slug).collect(),
        authors: authors.into_iter().map(|a| a.slug).collect(),
    })
}

/// 生成 sitemap，获取内容失败时退回只含首页和 `/blog` 的版本
async fn sitemap(State(pool): State<DBPool>, State(config): State<Arc<Config>>) -> impl IntoResponse {
    let generator = SitemapGenerator::new(&config.site);

    let body = match sitemap_source(&pool).await {
        Ok(source) => generator.generate(&source),
        Err(e) => {
            tracing::error!(%e, "failed to load sitemap content, using fallback");
            generator.fallback()
        }
    };

    ([(header::CONTENT_TYPE, "application/xml")], body)
}

async fn robots(State(config): State<Arc<Config>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        generate_robots(&config.site),
    )
}

async fn manifest(State(config): State<Arc<Config>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        Json(WebManifest::from(&config.site)),
    )
}
