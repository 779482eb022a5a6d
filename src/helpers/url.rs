//! URL helper functions

use crate::config::SiteConfig;

/// Prefix a site path with the configured root
///
/// # Examples
/// ```ignore
/// url_for(&config, "/blog/first/") // -> "/docs/blog/first/" with root "/docs/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    if is_external(path) {
        return path.to_string();
    }

    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Absolute URL including the site domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    if is_external(path) {
        return path.to_string();
    }
    format!("{}{}", config.url.trim_end_matches('/'), url_for(config, path))
}

/// Resolve a media URL returned by the CMS against its base URL.
///
/// Uploads are served as `/uploads/...` relative to the CMS host.
pub fn media_url(base_url: Option<&str>, url: &str) -> String {
    match base_url {
        Some(base) if !is_external(url) => {
            format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
        }
        _ => url.to_string(),
    }
}

fn is_external(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com".to_string(),
            root: "/docs/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/blog/first/"), "/docs/blog/first/");
        assert_eq!(url_for(&config, ""), "/docs/");
        assert_eq!(url_for(&config, "https://cdn.test/a.png"), "https://cdn.test/a.png");
        assert_eq!(url_for(&SiteConfig::default(), "about/"), "/about/");
    }

    #[test]
    fn test_full_url_for() {
        assert_eq!(
            full_url_for(&test_config(), "/about/"),
            "https://example.com/docs/about/"
        );
    }

    #[test]
    fn test_media_url() {
        assert_eq!(
            media_url(Some("http://cms:1337/"), "/uploads/a.png"),
            "http://cms:1337/uploads/a.png"
        );
        assert_eq!(
            media_url(Some("http://cms:1337"), "https://cdn.test/a.png"),
            "https://cdn.test/a.png"
        );
        assert_eq!(media_url(None, "/uploads/a.png"), "/uploads/a.png");
    }
}
