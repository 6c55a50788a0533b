use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header, jwk::JwkSet};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{Identity, TokenVerifier};
use crate::error::{ApiError, Result};

/// Google 发布的 Firebase ID Token 公钥
const FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// 响应没有给出 `max-age` 时的缓存时间
const DEFAULT_KEY_TTL: Duration = Duration::from_secs(3600);

/// 两次拉取公钥之间的最短间隔
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    iat: i64,
    #[serde(default)]
    auth_time: Option<i64>,
    #[serde(default)]
    email: Option<String>,
}

struct CachedKeys {
    keys: HashMap<String, DecodingKey>,
    expires_at: Instant,
    /// 上一次尝试拉取的时间，失败也会记录
    last_refresh: Option<Instant>,
}

/// Firebase Authentication ID Token 校验器
///
/// 校验 RS256 签名、`aud`（项目 ID）、`iss`、过期时间，以及 `iat`、`auth_time` 不晚于当前时间。
///
/// 公钥按响应头 `Cache-Control: max-age` 缓存。缓存过期或遇到未知 `kid` 时刷新，
/// 但两次拉取至少间隔 [`MIN_REFRESH_INTERVAL`]；拉取失败时继续使用已缓存的公钥。
pub struct FirebaseVerifier {
    client: reqwest::Client,
    project_id: String,
    jwks_url: String,
    cache: RwLock<CachedKeys>,
}

impl FirebaseVerifier {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            project_id: project_id.into(),
            jwks_url: FIREBASE_JWKS_URL.to_string(),
            cache: RwLock::new(CachedKeys {
                keys: HashMap::new(),
                expires_at: Instant::now(),
                last_refresh: None,
            }),
        }
    }

    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = url.into();
        self
    }

    fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }

    async fn key(&self, kid: &str) -> Result<DecodingKey> {
        {
            let cache = self.cache.read().await;
            if cache.expires_at > Instant::now() {
                if let Some(key) = cache.keys.get(kid) {
                    return Ok(key.clone());
                }
            }
        }

        if self.claim_refresh().await {
            if let Err(e) = self.refresh().await {
                tracing::warn!(%e, "failed to refresh firebase keys");
                let cache = self.cache.read().await;
                return cache.keys.get(kid).cloned().ok_or(e);
            }
        }

        let cache = self.cache.read().await;
        cache
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized.into())
    }

    /// 占用一次拉取机会，距上次拉取不足 [`MIN_REFRESH_INTERVAL`] 时返回 `false`
    async fn claim_refresh(&self) -> bool {
        let mut cache = self.cache.write().await;
        let now = Instant::now();
        if cache
            .last_refresh
            .is_some_and(|t| now.duration_since(t) < MIN_REFRESH_INTERVAL)
        {
            return false;
        }
        cache.last_refresh = Some(now);
        true
    }

    #[tracing::instrument(name = "refresh firebase keys", skip(self))]
    async fn refresh(&self) -> Result<()> {
        let resp = self
            .client
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?;

        let ttl = max_age(resp.headers()).unwrap_or(DEFAULT_KEY_TTL);
        let jwks: JwkSet = resp.json().await?;

        self.install(&jwks, ttl).await;
        Ok(())
    }

    async fn install(&self, jwks: &JwkSet, ttl: Duration) {
        let keys: HashMap<String, DecodingKey> = jwks
            .keys
            .iter()
            .filter_map(|jwk| {
                let kid = jwk.common.key_id.clone()?;
                match DecodingKey::from_jwk(jwk) {
                    Ok(key) => Some((kid, key)),
                    Err(e) => {
                        tracing::warn!(%e, %kid, "skip unusable jwk");
                        None
                    }
                }
            })
            .collect();

        tracing::debug!(count = keys.len(), ?ttl, "firebase keys refreshed");

        let mut cache = self.cache.write().await;
        cache.keys = keys;
        cache.expires_at = Instant::now() + ttl;
    }
}

#[async_trait::async_trait]
impl TokenVerifier for FirebaseVerifier {
    async fn verify(&self, token: &str) -> Result<Identity> {
        let header = decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(ApiError::Unauthorized.into());
        }
        let kid = header.kid.ok_or(ApiError::Unauthorized)?;
        let key = self.key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.project_id.as_str()]);
        validation.set_issuer(&[self.issuer()]);
        validation.set_required_spec_claims(&["exp", "iat", "sub", "aud", "iss"]);

        let claims = decode::<FirebaseClaims>(token, &key, &validation)?.claims;
        if claims.sub.is_empty() {
            return Err(ApiError::Unauthorized.into());
        }

        let latest = chrono::Utc::now().timestamp() + validation.leeway as i64;
        if claims.iat > latest || claims.auth_time.is_some_and(|t| t > latest) {
            tracing::debug!(uid = %claims.sub, "token issued in the future");
            return Err(ApiError::Unauthorized.into());
        }

        Ok(Identity {
            uid: claims.sub,
            email: claims.email,
        })
    }
}

/// 解析 `Cache-Control` 中的 `max-age`
fn max_age(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(header::CACHE_CONTROL)?
        .to_str()
        .ok()?
        .split(',')
        .filter_map(|d| d.trim().strip_prefix("max-age="))
        .find_map(|v| v.parse().ok())
        .map(Duration::from_secs)
}
