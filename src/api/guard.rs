use axum::{extract::FromRequestParts, http::request::Parts};

use super::{ApiError, Error, Querier};
use crate::{
    auth::{Identity, bearer_token},
    state::AppState,
};

/// 携带合法 Firebase ID Token 的请求
pub struct Authenticated(pub Identity);

/// 已登录且具备管理员权限的请求
///
/// 邮箱在 `ADMIN_EMAILS` 白名单中，或 uid 已登记在 `admins` 表中。
pub struct Admin(pub Identity);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Error> {
        let token = bearer_token(&parts.headers)?;
        let identity = state.verifier().verify(token).await?;
        Ok(Self(identity))
    }
}

impl FromRequestParts<AppState> for Admin {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Error> {
        let Authenticated(identity) = Authenticated::from_request_parts(parts, state).await?;

        let by_email = identity
            .email
            .as_deref()
            .is_some_and(|e| state.config().is_admin_email(e));

        if by_email || state.querier().is_admin(&identity.uid).await? {
            Ok(Self(identity))
        } else {
            tracing::warn!(uid = %identity.uid, "non-admin rejected");
            Err(ApiError::Forbidden.into())
        }
    }
}
