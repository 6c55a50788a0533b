use chrono::{DateTime, SecondsFormat, Utc};

use crate::{config::SiteConfig, content::post_url, storage::SitemapEntry};

/// sitemap 条目的更新频率
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// sitemap 中的一条 URL
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    pub loc: String,
    pub lastmod: Option<DateTime<Utc>>,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

/// 生成 sitemap 所需的动态数据
#[derive(Debug, Default)]
pub struct SitemapSource {
    pub posts: Vec<SitemapEntry>,
    /// 分类 slug
    pub categories: Vec<String>,
    /// 作者 slug
    pub authors: Vec<String>,
}

/// sitemap 生成器
pub struct SitemapGenerator<'a> {
    site: &'a SiteConfig,
}

impl<'a> SitemapGenerator<'a> {
    pub fn new(site: &'a SiteConfig) -> Self {
        Self { site }
    }

    /// 根据站点配置和数据库中的内容生成全部 URL
    pub fn urls(&self, source: &SitemapSource) -> Vec<SitemapUrl> {
        let mut urls = vec![
            self.url("/", None, ChangeFreq::Daily, 1.0),
            self.url("/blog", None, ChangeFreq::Daily, 0.9),
        ];

        urls.extend(
            self.site
                .static_pages
                .iter()
                .map(|page| self.url(page, None, ChangeFreq::Monthly, 0.5)),
        );

        urls.extend(source.posts.iter().map(|post| {
            self.url(
                &post_url(&post.slug),
                Some(post.updated_at),
                ChangeFreq::Weekly,
                0.8,
            )
        }));

        urls.extend(source.categories.iter().map(|slug| {
            self.url(&format!("/category/{}", slug), None, ChangeFreq::Weekly, 0.6)
        }));

        urls.extend(source.authors.iter().map(|slug| {
            self.url(&format!("/author/{}", slug), None, ChangeFreq::Weekly, 0.6)
        }));

        urls
    }

    /// 生成完整 sitemap XML
    pub fn generate(&self, source: &SitemapSource) -> String {
        let urls = self.urls(source);
        tracing::debug!(count = urls.len(), "generating sitemap");
        Self::to_xml(&urls)
    }

    /// 内容获取失败时使用的 sitemap，只包含首页和 `/blog`
    pub fn fallback(&self) -> String {
        Self::to_xml(&[
            self.url("/", None, ChangeFreq::Daily, 1.0),
            self.url("/blog", None, ChangeFreq::Daily, 0.9),
        ])
    }

    fn url(
        &self,
        path: &str,
        lastmod: Option<DateTime<Utc>>,
        changefreq: ChangeFreq,
        priority: f32,
    ) -> SitemapUrl {
        SitemapUrl {
            loc: self.site.url_for(path),
            lastmod,
            changefreq,
            priority,
        }
    }

    fn to_xml(urls: &[SitemapUrl]) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        for url in urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&url.loc)));
            if let Some(lastmod) = &url.lastmod {
                xml.push_str(&format!(
                    "    <lastmod>{}</lastmod>\n",
                    lastmod.to_rfc3339_opts(SecondsFormat::Secs, true)
                ));
            }
            xml.push_str(&format!(
                "    <changefreq>{}</changefreq>\n",
                url.changefreq.as_str()
            ));
            xml.push_str(&format!("    <priority>{:.1}</priority>\n", url.priority));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
