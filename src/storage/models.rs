use chrono::{DateTime, Utc};

/// 文章详情
///
/// 包含文章完整内容以及分类、作者信息。
#[derive(Debug, sqlx::FromRow)]
pub struct PostDetail {
    /// 文章唯一标识
    pub slug: String,
    /// 标题
    pub title: String,
    /// 站内路径
    pub url: String,
    pub category: String,
    pub category_slug: String,
    pub author: String,
    pub author_slug: String,
    /// 展示用日期
    pub date: String,
    /// 发布时间
    pub datetime: DateTime<Utc>,
    /// 封面图
    pub image: Option<String>,
    /// 渲染后的 HTML
    pub content: String,
    pub excerpt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 文章列表项
///
/// 用于列表和归档页展示，不包含正文。
#[derive(Debug, sqlx::FromRow)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub url: String,
    pub category: String,
    pub category_slug: String,
    pub author: String,
    pub author_slug: String,
    pub date: String,
    pub datetime: DateTime<Utc>,
    pub image: Option<String>,
    pub excerpt: String,
}

/// 分类或作者
#[derive(Debug, sqlx::FromRow)]
pub struct Taxonomy {
    pub slug: String,
    pub name: String,
    pub post_count: i64,
}

/// sitemap 中一篇文章所需的信息
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SitemapEntry {
    pub slug: String,
    pub updated_at: DateTime<Utc>,
}
