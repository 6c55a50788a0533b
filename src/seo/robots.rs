use crate::config::SiteConfig;

/// 生成 robots.txt
pub fn generate_robots(site: &SiteConfig) -> String {
    let mut out = String::from("User-agent: *\nAllow: /\n");

    for path in &site.robots_disallow {
        out.push_str(&format!("Disallow: {}\n", path));
    }

    out.push_str(&format!("\nSitemap: {}\n", site.url_for("/sitemap.xml")));
    out
}
