use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::json;

use crate::{config::SiteConfig, storage::PostDetail};

/// 文章页的页面元信息
#[derive(Debug, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub open_graph: OpenGraph,
    /// `BlogPosting` 结构化数据（JSON-LD）
    pub json_ld: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct OpenGraph {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub description: String,
    pub url: String,
    pub site_name: String,
    pub image: Option<String>,
    pub published_time: String,
    pub modified_time: String,
    pub author: String,
    pub section: String,
}

/// 站内相对路径的图片转为绝对地址
fn absolute_url(site: &SiteConfig, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        site.url_for(url)
    }
}

/// 根据文章生成页面元信息与 JSON-LD
pub fn post_metadata(site: &SiteConfig, post: &PostDetail) -> PageMetadata {
    let canonical = site.url_for(&post.url);
    let image = post.image.as_deref().map(|i| absolute_url(site, i));
    let published = post.datetime.to_rfc3339_opts(SecondsFormat::Secs, true);
    let modified = post.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true);

    let mut json_ld = json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": post.title,
        "description": post.excerpt,
        "datePublished": published,
        "dateModified": modified,
        "articleSection": post.category,
        "author": {
            "@type": "Person",
            "name": post.author,
            "url": site.url_for(&format!("/author/{}", post.author_slug)),
        },
        "publisher": {
            "@type": "Organization",
            "name": site.publisher,
        },
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": canonical,
        },
    });

    if let Some(image) = &image {
        json_ld["image"] = json!([image]);
    }
    if let Some(logo) = &site.logo {
        json_ld["publisher"]["logo"] = json!({
            "@type": "ImageObject",
            "url": absolute_url(site, logo),
        });
    }

    PageMetadata {
        title: format!("{} | {}", post.title, site.name),
        description: post.excerpt.clone(),
        canonical: canonical.clone(),
        open_graph: OpenGraph {
            kind: "article",
            title: post.title.clone(),
            description: post.excerpt.clone(),
            url: canonical,
            site_name: site.name.clone(),
            image,
            published_time: published,
            modified_time: modified,
            author: post.author.clone(),
            section: post.category.clone(),
        },
        json_ld,
    }
}
