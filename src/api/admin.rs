use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};

use super::guard::{Admin, Authenticated};
use super::{ApiError, Error, Querier, Result};

use crate::{
    config::Config,
    content::{Post, PostBuilder, PostDraft},
    media::{MediaObject, MediaStore, normalize_folder},
    render::GithubApiRenderer,
    state::AppState,
    storage::{DBPool, SqlxStore, Store},
};

/// 配置后台路由，除 `/admin/setup` 外都需要管理员身份。
///
/// - `POST /admin/setup`：初始化第一个管理员
/// - `POST /admin/ensure-folder`：确保媒体目录存在
/// - `GET /admin/media`：列出媒体目录
/// - `POST /admin/posts`：以 JSON 草稿新增或更新文章
/// - `POST /admin/posts/import`：以带 front matter 的 Markdown 新增或更新文章
/// - `DELETE /admin/posts/{slug}`：删除文章
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/admin/setup", post(setup))
        .route("/admin/ensure-folder", post(ensure_folder))
        .route("/admin/media", get(media_list))
        .route("/admin/posts", post(post_upsert))
        .route("/admin/posts/import", post(post_import))
        .route("/admin/posts/{slug}", delete(post_remove))
}

#[derive(Debug, Deserialize)]
pub struct SetupRequest {
    setup_token: String,
}

#[derive(Debug, Serialize)]
pub struct SetupResponse {
    uid: String,
    created: bool,
}

/// 初始化管理员
///
/// 需要合法的登录身份以及与 `ADMIN_SETUP_TOKEN` 一致的口令。
/// 尚无管理员时登记调用者（201）；调用者已是管理员时返回 200；否则 409。
async fn setup(
    Authenticated(identity): Authenticated,
    State(config): State<Arc<Config>>,
    State(pool): State<DBPool>,
    Json(req): Json<SetupRequest>,
) -> Result<(StatusCode, Json<SetupResponse>)> {
    let expected = config
        .admin_setup_token
        .as_deref()
        .ok_or(ApiError::Forbidden)?;
    if req.setup_token != expected {
        tracing::warn!(uid = %identity.uid, "admin setup with wrong token");
        return Err(ApiError::Forbidden.into());
    }

    let email = identity.email.as_deref().unwrap_or_default();
    if config.is_admin_email(email) || pool.is_admin(&identity.uid).await? {
        return Ok((
            StatusCode::OK,
            Json(SetupResponse {
                uid: identity.uid,
                created: false,
            }),
        ));
    }

    if pool.admin_count().await? > 0 {
        return Err(ApiError::Conflict("admin already initialized").into());
    }

    // 计数之后仍可能有并发的初始化请求，写入时再判断一次
    let mut store = SqlxStore::new(pool);
    store.add_first_admin(&identity.uid, email);
    if store.commit().await? == 0 {
        return Err(ApiError::Conflict("admin already initialized").into());
    }

    tracing::info!(uid = %identity.uid, "first admin registered");
    Ok((
        StatusCode::CREATED,
        Json(SetupResponse {
            uid: identity.uid,
            created: true,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct FolderRequest {
    folder: String,
}

#[derive(Debug, Serialize)]
pub struct FolderResponse {
    folder: String,
    created: bool,
}

/// 确保媒体目录存在，已存在时不做任何修改
async fn ensure_folder(
    Admin(_): Admin,
    State(media): State<Arc<dyn MediaStore>>,
    Json(req): Json<FolderRequest>,
) -> Result<Json<FolderResponse>> {
    let folder = normalize_folder(&req.folder)?;
    let created = media.ensure_folder(&folder).await?;
    Ok(Json(FolderResponse { folder, created }))
}

#[derive(Debug, Deserialize)]
pub struct MediaParams {
    folder: String,
}

async fn media_list(
    Admin(_): Admin,
    Query(params): Query<MediaParams>,
    State(media): State<Arc<dyn MediaStore>>,
) -> Result<Json<Vec<MediaObject>>> {
    let folder = normalize_folder(&params.folder)?;
    Ok(Json(media.list(&folder).await?))
}

#[derive(Debug, Serialize)]
pub struct SavedPost {
    slug: String,
    url: String,
}

async fn save(pool: DBPool, post: Post) -> Result<Json<SavedPost>> {
    let mut store = SqlxStore::new(pool);
    store.upsert_post(&post);
    store.commit().await?;

    tracing::info!(slug = %post.slug, "post saved");
    Ok(Json(SavedPost {
        url: post.url(),
        slug: post.slug,
    }))
}

async fn post_upsert(
    Admin(_): Admin,
    State(pool): State<DBPool>,
    State(renderer): State<GithubApiRenderer>,
    Json(draft): Json<PostDraft>,
) -> Result<Json<SavedPost>> {
    let post = PostBuilder::from(draft)
        .build_with_renderer(&renderer)
        .await?;
    save(pool, post).await
}

async fn post_import(
    Admin(_): Admin,
    State(pool): State<DBPool>,
    State(renderer): State<GithubApiRenderer>,
    body: String,
) -> Result<Json<SavedPost>> {
    let post = PostBuilder::from_markdown(&body)?
        .build_with_renderer(&renderer)
        .await?;
    save(pool, post).await
}

async fn post_remove(
    Admin(_): Admin,
    Path(slug): Path<String>,
    State(pool): State<DBPool>,
) -> Result<StatusCode> {
    let mut store = SqlxStore::new(pool);
    store.remove_post(slug.trim());

    if store.commit().await? == 0 {
        return Err(Error::not_found());
    }

    tracing::info!(%slug, "post removed");
    Ok(StatusCode::NO_CONTENT)
}
