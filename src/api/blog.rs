use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};

use super::{Error, Querier, Result};

use crate::{
    config::Config,
    seo::{PageMetadata, post_metadata},
    state::AppState,
    storage::{DBPool, PostDetail, PostSummary},
};

use std::sync::Arc;

/// 配置文章相关路由。
///
/// 路由包括：
/// - `GET /posts`：文章列表
/// - `GET /blog/{slug}`：获取单篇文章
/// - `GET /blog/{slug}/metadata`：获取文章页 SEO 元信息
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/posts", get(post_list))
        .route("/blog/{slug}", get(post))
        .route("/blog/{slug}/metadata", get(post_meta))
}

/// 分类或作者的引用
#[derive(Debug, Serialize)]
pub struct TermRef {
    pub slug: String,
    pub name: String,
}

/// 文章元信息，用于列表展示。
#[derive(Debug, Serialize)]
pub struct PostMeta {
    pub slug: String,
    pub title: String,
    pub url: String,
    pub category: TermRef,
    pub author: TermRef,
    pub date: String,
    pub datetime: i64,
    pub image: Option<String>,
    pub excerpt: String,
}

impl From<PostSummary> for PostMeta {
    fn from(p: PostSummary) -> Self {
        Self {
            slug: p.slug,
            title: p.title,
            url: p.url,
            category: TermRef {
                slug: p.category_slug,
                name: p.category,
            },
            author: TermRef {
                slug: p.author_slug,
                name: p.author,
            },
            date: p.date,
            datetime: p.datetime.timestamp_millis(),
            image: p.image,
            excerpt: p.excerpt,
        }
    }
}

/// 完整文章，包括元信息和正文。
#[derive(Debug, Serialize)]
pub struct PostFull {
    #[serde(flatten)]
    meta: PostMeta,

    content: String,
    created_at: i64,
    updated_at: i64,
}

impl From<PostDetail> for PostFull {
    fn from(p: PostDetail) -> Self {
        Self {
            meta: PostMeta {
                slug: p.slug,
                title: p.title,
                url: p.url,
                category: TermRef {
                    slug: p.category_slug,
                    name: p.category,
                },
                author: TermRef {
                    slug: p.author_slug,
                    name: p.author,
                },
                date: p.date,
                datetime: p.datetime.timestamp_millis(),
                image: p.image,
                excerpt: p.excerpt,
            },
            content: p.content,
            created_at: p.created_at.timestamp_millis(),
            updated_at: p.updated_at.timestamp_millis(),
        }
    }
}

fn check_slug(slug: &str) -> Result<&str> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(Error::bad_request("slug is required"));
    }
    Ok(slug)
}

/// 根据 slug 获取单篇文章。
///
/// 返回 [`PostFull`]，如果文章不存在返回 404。
async fn post(Path(slug): Path<String>, State(pool): State<DBPool>) -> Result<Json<PostFull>> {
    let post = pool
        .post(check_slug(&slug)?)
        .await?
        .ok_or(Error::not_found())?;

    Ok(Json(post.into()))
}

/// 文章页的标题、描述、canonical、Open Graph 与 JSON-LD
async fn post_meta(
    Path(slug): Path<String>,
    State(pool): State<DBPool>,
    State(config): State<Arc<Config>>,
) -> Result<Json<PageMetadata>> {
    let post = pool
        .post(check_slug(&slug)?)
        .await?
        .ok_or(Error::not_found())?;

    Ok(Json(post_metadata(&config.site, &post)))
}

/// 查询参数，用于文章列表分页。
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PageParams {
    pub limit: i32,
    pub page: i32,
}

impl PageParams {
    pub const MAX_LIMIT: i32 = 50;

    pub fn limit(&self) -> i32 {
        self.limit.clamp(1, Self::MAX_LIMIT)
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self { limit: 12, page: 1 }
    }
}

/// 获取文章列表。
///
/// 按发布时间倒序分页，返回 [`PostMeta`] 列表。
async fn post_list(
    Query(params): Query<PageParams>,
    State(pool): State<DBPool>,
) -> Result<Json<Vec<PostMeta>>> {
    let data = pool
        .post_list(params.page, params.limit(), None, None)
        .await?;
    Ok(Json(data.into_iter().map(PostMeta::from).collect()))
}
