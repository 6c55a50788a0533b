use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    auth::TokenVerifier,
    config::Config,
    media::MediaStore,
    render::GithubApiRenderer,
    storage::DBPool,
};

/// 应用程序上下文
///
/// [`AppState`] 封装了数据库连接池、Markdown 渲染器、登录校验器、媒体存储与配置，提供统一访问入口。
#[derive(Clone, FromRef)]
pub struct AppState {
    pool: DBPool,
    renderer: GithubApiRenderer,
    verifier: Arc<dyn TokenVerifier>,
    media: Arc<dyn MediaStore>,
    config: Arc<Config>,
}

impl AppState {
    /// 创建一个新的 [`AppState`] 实例
    pub fn new(
        pool: DBPool,
        renderer: GithubApiRenderer,
        verifier: Arc<dyn TokenVerifier>,
        media: Arc<dyn MediaStore>,
        config: Config,
    ) -> Self {
        Self {
            pool,
            renderer,
            verifier,
            media,
            config: Arc::new(config),
        }
    }

    /// 获取查询对象
    pub fn querier(&self) -> &DBPool {
        &self.pool
    }

    pub fn verifier(&self) -> &dyn TokenVerifier {
        self.verifier.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
