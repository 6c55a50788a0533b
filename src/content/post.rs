use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::{excerpt_from_html, slugify};
use crate::error::{Error, Result};

/// 摘要缺省时从正文截取的最大字符数
const EXCERPT_LEN: usize = 160;

/// 文章元信息
///
/// 既是 Markdown 文件头部的 YAML front matter，也是后台提交 JSON 的公共部分。
#[derive(Debug, Deserialize)]
pub struct FrontMatter {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub category: String,
    pub author: String,
    #[serde(deserialize_with = "parse_to_utc")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
}

/// 后台提交的文章草稿，`content` 为 Markdown 正文
#[derive(Debug, Deserialize)]
pub struct PostDraft {
    #[serde(flatten)]
    pub front_matter: FrontMatter,
    pub content: String,
}

/// 校验并渲染完成、可以写入数据库的文章
#[derive(Debug)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub category: String,
    pub author: String,
    pub datetime: DateTime<Utc>,
    pub image: Option<String>,
    pub excerpt: String,
    pub rendered_content: String,
}

impl Post {
    pub fn url(&self) -> String {
        post_url(&self.slug)
    }

    pub fn display_date(&self) -> String {
        display_date(&self.datetime)
    }

    pub fn category_slug(&self) -> String {
        slugify(&self.category)
    }

    pub fn author_slug(&self) -> String {
        slugify(&self.author)
    }
}

/// 文章的站内路径
pub fn post_url(slug: &str) -> String {
    format!("/blog/{}", slug)
}

/// 展示用日期，例如 `January 5, 2024`
pub fn display_date(datetime: &DateTime<Utc>) -> String {
    datetime.format("%B %-d, %Y").to_string()
}

/// Markdown 渲染器
pub trait Renderer: Send + Sync {
    fn render<T: AsRef<str>>(
        &self,
        content: T,
    ) -> impl std::future::Future<Output = Result<String>>;
}

pub struct PostBuilder {
    front_matter: FrontMatter,
    body: String,
}

impl From<PostDraft> for PostBuilder {
    fn from(draft: PostDraft) -> Self {
        Self {
            front_matter: draft.front_matter,
            body: draft.content,
        }
    }
}

impl PostBuilder {
    /// 从带 YAML front matter 的 Markdown 文档构建
    pub fn from_markdown(content: &str) -> Result<Self> {
        let (yaml_str, body) = Self::extract_front_matter_and_body(content)?;
        let front_matter: FrontMatter = serde_yaml::from_str(yaml_str)?;

        Ok(Self {
            front_matter,
            body: body.to_string(),
        })
    }

    /// 最终使用的 slug：显式给出的 slug 优先，否则由标题生成
    pub fn slug(&self) -> String {
        match &self.front_matter.slug {
            Some(slug) if !slug.trim().is_empty() => slugify(slug),
            _ => slugify(&self.front_matter.title),
        }
    }

    /// 从原始 Markdown 内容中提取 Front Matter 字符串和正文。
    fn extract_front_matter_and_body(content: &str) -> Result<(&str, &str)> {
        const DELIM: &str = "---";

        let content = content.trim_start();

        if !content.starts_with(DELIM) {
            return Err(Error::Custom("Missing required YAML front matter"));
        }

        let rest = &content[DELIM.len()..];
        let end_pos = rest.find(DELIM).ok_or(Error::Custom(
            "Front matter does not terminate with expected delimiter ---",
        ))?;

        let yaml_str = &rest[..end_pos];
        let body_str = rest[end_pos + DELIM.len()..].trim_start();

        Ok((yaml_str.trim(), body_str))
    }

    fn required(value: &str, msg: &'static str) -> Result<String> {
        let value = value.trim();
        if value.is_empty() {
            Err(Error::Custom(msg))
        } else {
            Ok(value.to_string())
        }
    }

    pub async fn build_with_renderer<R: Renderer>(self, renderer: &R) -> Result<Post> {
        let slug = self.slug();
        if slug.is_empty() {
            return Err(Error::Custom("post slug is empty"));
        }

        let fm = self.front_matter;
        let title = Self::required(&fm.title, "post title is required")?;
        let category = Self::required(&fm.category, "post category is required")?;
        let author = Self::required(&fm.author, "post author is required")?;

        let rendered_content = renderer.render(&self.body).await?;

        let excerpt = match fm.excerpt.as_deref().map(str::trim) {
            Some(e) if !e.is_empty() => e.to_string(),
            _ => excerpt_from_html(&rendered_content, EXCERPT_LEN),
        };

        let image = fm.image.filter(|i| !i.trim().is_empty());

        Ok(Post {
            slug,
            title,
            category,
            author,
            datetime: fm.date,
            image,
            excerpt,
            rendered_content,
        })
    }
}

fn parse_to_utc<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(naive_dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive_dt.and_utc());
        }
    }

    for fmt in &["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|naive_dt| naive_dt.and_utc())
                .ok_or_else(|| serde::de::Error::custom("cannot build datetime"));
        }
    }

    Err(serde::de::Error::custom(format!("cannot parse date: {}", s)))
}
