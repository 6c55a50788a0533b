use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::Query;
use serde::Serialize;

use super::blog::{PageParams, PostMeta};
use super::{Error, Querier, Result};

use crate::{
    state::AppState,
    storage::{DBPool, Taxonomy},
};

/// 配置分类与作者归档路由。
///
/// - `GET /categories`、`GET /authors`：全部分类或作者及文章数
/// - `GET /categories/{slug}/posts`、`GET /authors/{slug}/posts`：归档页文章
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/categories", get(category_list))
        .route("/categories/{slug}/posts", get(category_posts))
        .route("/authors", get(author_list))
        .route("/authors/{slug}/posts", get(author_posts))
}

#[derive(Debug, Serialize)]
pub struct Term {
    slug: String,
    name: String,
    post_count: i64,
}

impl From<Taxonomy> for Term {
    fn from(t: Taxonomy) -> Self {
        Self {
            slug: t.slug,
            name: t.name,
            post_count: t.post_count,
        }
    }
}

/// 归档页：分类或作者及其文章
#[derive(Debug, Serialize)]
pub struct Archive {
    slug: String,
    name: Option<String>,
    page: i32,
    posts: Vec<PostMeta>,
}

#[derive(Clone, Copy)]
enum ArchiveKind {
    Category,
    Author,
}

async fn archive(
    pool: &DBPool,
    kind: ArchiveKind,
    slug: String,
    params: PageParams,
) -> Result<Archive> {
    let slug = slug.trim().to_lowercase();
    let page = params.page.max(1);

    let posts = match kind {
        ArchiveKind::Category => {
            pool.post_list(page, params.limit(), Some(slug.as_str()), None)
                .await?
        }
        ArchiveKind::Author => {
            pool.post_list(page, params.limit(), None, Some(slug.as_str()))
                .await?
        }
    };

    // 第一页没有任何文章说明该分类或作者不存在
    if posts.is_empty() && page == 1 {
        return Err(Error::not_found());
    }

    let name = posts.first().map(|p| match kind {
        ArchiveKind::Category => p.category.clone(),
        ArchiveKind::Author => p.author.clone(),
    });

    Ok(Archive {
        slug,
        name,
        page,
        posts: posts.into_iter().map(PostMeta::from).collect(),
    })
}

async fn category_list(State(pool): State<DBPool>) -> Result<Json<Vec<Term>>> {
    let data = pool.categories().await?;
    Ok(Json(data.into_iter().map(Term::from).collect()))
}

async fn author_list(State(pool): State<DBPool>) -> Result<Json<Vec<Term>>> {
    let data = pool.authors().await?;
    Ok(Json(data.into_iter().map(Term::from).collect()))
}

async fn category_posts(
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
    State(pool): State<DBPool>,
) -> Result<Json<Archive>> {
    archive(&pool, ArchiveKind::Category, slug, params)
        .await
        .map(Json)
}

async fn author_posts(
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
    State(pool): State<DBPool>,
) -> Result<Json<Archive>> {
    archive(&pool, ArchiveKind::Author, slug, params)
        .await
        .map(Json)
}
