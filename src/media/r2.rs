use std::env;

use aws_credential_types::Credentials;
use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Region},
    error::DisplayErrorContext,
    primitives::ByteStream,
};
use chrono::DateTime;

use super::{MediaObject, MediaStore};
use crate::error::{Error, Result};

/// Cloudflare R2 连接配置
#[derive(Debug, Clone)]
pub struct R2Config {
    pub account_id: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
}

impl R2Config {
    /// 从环境变量 `R2_ACCOUNT_ID`、`R2_ACCESS_KEY_ID`、`R2_SECRET_ACCESS_KEY`、`R2_BUCKET` 读取
    ///
    /// - Panics
    ///
    /// 任一变量缺失时 panic
    pub fn from_env() -> Self {
        Self {
            account_id: env::var("R2_ACCOUNT_ID").expect("R2_ACCOUNT_ID not set"),
            access_key_id: env::var("R2_ACCESS_KEY_ID").expect("R2_ACCESS_KEY_ID not set"),
            secret_access_key: env::var("R2_SECRET_ACCESS_KEY")
                .expect("R2_SECRET_ACCESS_KEY not set"),
            bucket: env::var("R2_BUCKET").expect("R2_BUCKET not set"),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("https://{}.r2.cloudflarestorage.com", self.account_id)
    }
}

/// 基于 S3 兼容接口的 R2 媒体存储
///
/// 目录以零字节对象 `{folder}/` 表示。
#[derive(Clone)]
pub struct R2MediaStore {
    client: Client,
    bucket: String,
}

fn storage_error<E: std::error::Error>(e: E) -> Error {
    Error::Storage(DisplayErrorContext(&e).to_string())
}

impl R2MediaStore {
    pub fn new(config: &R2Config) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "r2-static",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(config.endpoint())
            .region(Region::new("auto"))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait::async_trait]
impl MediaStore for R2MediaStore {
    #[tracing::instrument(name = "r2 ensure folder", skip(self))]
    async fn ensure_folder(&self, folder: &str) -> Result<bool> {
        let prefix = format!("{}/", folder);

        let listed = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&prefix)
            .max_keys(1)
            .send()
            .await
            .map_err(storage_error)?;

        if !listed.contents().is_empty() {
            return Ok(false);
        }

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&prefix)
            .content_length(0)
            .body(ByteStream::from_static(b""))
            .send()
            .await
            .map_err(storage_error)?;

        tracing::info!(%prefix, "folder created");
        Ok(true)
    }

    async fn list(&self, folder: &str) -> Result<Vec<MediaObject>> {
        let prefix = format!("{}/", folder);
        let mut objects = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(storage_error)?;

            objects.extend(
                page.contents()
                    .iter()
                    .filter_map(|o| {
                        let key = o.key()?;
                        (key != prefix).then(|| {
                            MediaObject::new(
                                key.to_string(),
                                o.size().unwrap_or_default(),
                                o.last_modified().and_then(|t| {
                                    DateTime::from_timestamp(t.secs(), t.subsec_nanos())
                                }),
                            )
                        })
                    }),
            );

            match page.next_continuation_token() {
                Some(token) if page.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string())
                }
                _ => break,
            }
        }

        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_r2_endpoint() {
        let config = R2Config {
            account_id: "abc123".to_string(),
            access_key_id: "key".to_string(),
            secret_access_key: "secret".to_string(),
            bucket: "media".to_string(),
        };

        assert_eq!(config.endpoint(), "https://abc123.r2.cloudflarestorage.com");

        // 构建客户端不会发起网络请求
        let store = R2MediaStore::new(&config);
        assert_eq!(store.bucket, "media");
    }
}
