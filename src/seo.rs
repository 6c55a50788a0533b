//! 面向搜索引擎与浏览器的站点元数据：sitemap、robots、manifest 与结构化数据。

mod manifest;
mod robots;
mod sitemap;
mod structured_data;

pub use self::{
    manifest::WebManifest,
    robots::generate_robots,
    sitemap::{ChangeFreq, SitemapGenerator, SitemapSource, SitemapUrl},
    structured_data::{OpenGraph, PageMetadata, post_metadata},
};
