mod r2;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result};

pub use self::r2::{R2Config, R2MediaStore};

/// 对象存储中的一个媒体文件
#[derive(Debug, Clone, Serialize)]
pub struct MediaObject {
    pub key: String,
    pub size: i64,
    /// 毫秒时间戳
    pub last_modified: Option<i64>,
}

impl MediaObject {
    pub fn new(key: String, size: i64, last_modified: Option<DateTime<Utc>>) -> Self {
        Self {
            key,
            size,
            last_modified: last_modified.map(|t| t.timestamp_millis()),
        }
    }
}

/// 媒体对象存储
#[async_trait::async_trait]
pub trait MediaStore: Send + Sync {
    /// 确保目录存在，返回是否新建
    ///
    /// `folder` 需要先经过 [`normalize_folder`]。
    async fn ensure_folder(&self, folder: &str) -> Result<bool>;

    /// 列出目录下的对象（不含目录占位对象本身）
    async fn list(&self, folder: &str) -> Result<Vec<MediaObject>>;
}

/// 规范化目录名
///
/// 去掉首尾 `/`，每一段只允许 `[A-Za-z0-9._-]`，且不能是 `.` 或 `..`。
pub fn normalize_folder(name: &str) -> Result<String> {
    let name = name.trim().trim_matches('/');
    if name.is_empty() {
        return Err(Error::bad_request("folder name is required"));
    }

    for segment in name.split('/') {
        let valid = !segment.is_empty()
            && segment != "."
            && segment != ".."
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(Error::bad_request(format!("invalid folder name: {}", name)));
        }
    }

    Ok(name.to_string())
}
