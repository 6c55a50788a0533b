use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;

use crate::content::Renderer;
use crate::error::Result;

const MARKDOWN_ENDPOINT: &str = "https://api.github.com/markdown";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// 文章正文渲染器，调用 GitHub Markdown 接口（`gfm` 模式）把 Markdown 转为 HTML。
///
/// 后台保存或导入文章时使用，渲染结果直接写入 `posts.content`。
#[derive(Clone)]
pub struct GithubApiRenderer {
    client: reqwest::Client,
    endpoint: String,
}

impl Default for GithubApiRenderer {
    /// 读取 `GITHUB_MARKDOWN_RENDER_KEY`
    ///
    /// - Panics
    ///
    /// 变量未设置时 panic
    fn default() -> Self {
        Self::new(
            std::env::var("GITHUB_MARKDOWN_RENDER_KEY")
                .expect("GITHUB_MARKDOWN_RENDER_KEY not set"),
        )
    }
}

impl GithubApiRenderer {
    pub fn new(token: impl AsRef<str>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(api_headers(token.as_ref()))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            endpoint: MARKDOWN_ENDPOINT.to_string(),
        }
    }

    /// 改用其它兼容接口，测试中指向本地地址
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

fn api_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
    headers.insert("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));

    // token 含非法字符时不带认证，按匿名额度请求
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
        headers.insert(AUTHORIZATION, value);
    }
    headers
}

#[derive(Serialize)]
struct MarkdownRequest<'a> {
    text: &'a str,
    mode: &'static str,
}

impl Renderer for GithubApiRenderer {
    async fn render<T: AsRef<str>>(&self, content: T) -> Result<String> {
        let html = self
            .client
            .post(&self.endpoint)
            .json(&MarkdownRequest {
                text: content.as_ref(),
                mode: "gfm",
            })
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_headers() {
        let headers = api_headers("secret");
        assert_eq!(headers[AUTHORIZATION], "Bearer secret");
        assert_eq!(headers[ACCEPT], "application/vnd.github+json");

        let headers = api_headers("bad\ntoken");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_upstream_error() {
        let renderer = GithubApiRenderer::new("token").with_endpoint("http://127.0.0.1:9/markdown");
        let result = renderer.render("# title").await;
        assert!(matches!(result, Err(crate::error::Error::Reqwest(_))));
    }

    /// 需要网络和有效 token
    #[tokio::test]
    #[ignore = "需要访问 github api"]
    async fn test_render_post_body() {
        let html = GithubApiRenderer::default()
            .render("## Hello\n\n- [x] done")
            .await
            .expect("render failed");
        assert!(html.contains("<h2"));
    }
}
