use serde::Serialize;

use crate::config::{ManifestIcon, SiteConfig};

/// Web App Manifest
#[derive(Debug, Serialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_url: &'static str,
    pub display: &'static str,
    pub background_color: String,
    pub theme_color: String,
    pub lang: String,
    pub icons: Vec<ManifestIcon>,
}

impl From<&SiteConfig> for WebManifest {
    fn from(site: &SiteConfig) -> Self {
        Self {
            name: site.name.clone(),
            short_name: site.short_name.clone(),
            description: site.description.clone(),
            start_url: "/",
            display: "standalone",
            background_color: site.background_color.clone(),
            theme_color: site.theme_color.clone(),
            lang: site.language.clone(),
            icons: site.icons.clone(),
        }
    }
}
