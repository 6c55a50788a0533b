use std::{env, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// 运行时配置
///
/// 由环境变量与站点配置文件（TOML）共同组成。
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP 监听地址
    pub bind_addr: String,
    /// Firebase 项目 ID，用于校验 ID Token 的 `aud` 与 `iss`
    pub firebase_project_id: String,
    /// 管理员邮箱白名单（已转小写）
    pub admin_emails: Vec<String>,
    /// 初始化管理员时需要提供的口令，未设置时禁止初始化
    pub admin_setup_token: Option<String>,
    /// 站点元信息
    pub site: SiteConfig,
}

impl Config {
    /// 从环境变量构建配置
    ///
    /// | 变量                  | 必须 | 默认值          |
    /// |-----------------------|------|-----------------|
    /// | `FIREBASE_PROJECT_ID` | 是   | -               |
    /// | `BIND_ADDR`           | 否   | `0.0.0.0:3000`  |
    /// | `ADMIN_EMAILS`        | 否   | 空              |
    /// | `ADMIN_SETUP_TOKEN`   | 否   | 无              |
    /// | `SITE_CONFIG`         | 否   | 内置默认站点    |
    ///
    /// - Panics
    ///
    /// 必须的变量缺失或站点配置文件无法解析时 panic
    pub fn from_env() -> Self {
        let site = match env::var("SITE_CONFIG") {
            Ok(path) => SiteConfig::load(&path).expect("failed to load SITE_CONFIG"),
            Err(_) => SiteConfig::default(),
        };

        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            firebase_project_id: env::var("FIREBASE_PROJECT_ID")
                .expect("FIREBASE_PROJECT_ID not set"),
            admin_emails: parse_admin_emails(&env::var("ADMIN_EMAILS").unwrap_or_default()),
            admin_setup_token: env::var("ADMIN_SETUP_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            site,
        }
    }

    /// 判断邮箱是否在管理员白名单中（忽略大小写）
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        !email.is_empty() && self.admin_emails.iter().any(|e| *e == email)
    }
}

fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// 站点元信息，用于 sitemap、robots、manifest 与结构化数据
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub short_name: String,
    pub description: String,
    /// 站点根地址，不带结尾的 `/`
    pub base_url: String,
    pub language: String,
    pub theme_color: String,
    pub background_color: String,
    /// 结构化数据中的发布方
    pub publisher: String,
    pub logo: Option<String>,
    /// 除首页和 `/blog` 以外需要出现在 sitemap 中的静态页面
    pub static_pages: Vec<String>,
    pub robots_disallow: Vec<String>,
    pub icons: Vec<ManifestIcon>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Inkwell".to_string(),
            short_name: "Inkwell".to_string(),
            description: "Articles, guides and product news.".to_string(),
            base_url: "http://localhost:3000".to_string(),
            language: "en".to_string(),
            theme_color: "#111827".to_string(),
            background_color: "#ffffff".to_string(),
            publisher: "Inkwell".to_string(),
            logo: None,
            static_pages: vec!["/about".to_string(), "/contact".to_string()],
            robots_disallow: vec!["/admin".to_string(), "/api/".to_string()],
            icons: vec![
                ManifestIcon {
                    src: "/icon-192.png".to_string(),
                    sizes: "192x192".to_string(),
                    mime: "image/png".to_string(),
                },
                ManifestIcon {
                    src: "/icon-512.png".to_string(),
                    sizes: "512x512".to_string(),
                    mime: "image/png".to_string(),
                },
            ],
        }
    }
}

impl SiteConfig {
    /// 从 TOML 文件加载站点配置，未出现的字段使用默认值
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut site: SiteConfig = toml::from_str(content)?;
        site.base_url = site.base_url.trim_end_matches('/').to_string();
        Ok(site)
    }

    /// 拼接站点绝对地址
    pub fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}
