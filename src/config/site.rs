//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    /// Build output
    pub public_dir: String,
    /// Static assets copied verbatim into the output
    pub static_dir: String,

    // Backends
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub strapi: StrapiConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Pressroom".to_string(),
            description: String::new(),
            author: String::new(),
            language: "en".to_string(),

            url: "http://localhost:4321".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            public_dir: "dist".to_string(),
            static_dir: "public".to_string(),

            api: ApiConfig::default(),
            strapi: StrapiConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.apply_env();
        Ok(config)
    }

    /// Apply `STRAPI_URL` / `STRAPI_TOKEN` overrides from the environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var("STRAPI_URL").ok(),
            std::env::var("STRAPI_TOKEN").ok(),
        );
    }

    fn apply_overrides(&mut self, url: Option<String>, token: Option<String>) {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            tracing::debug!("Using STRAPI_URL from environment");
            self.strapi.url = Some(url);
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.strapi.token = Some(token);
        }
    }
}

/// Content API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// JSON file with documents loaded into the store at startup
    pub seed: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 1337,
            seed: None,
        }
    }
}

/// Remote collection loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrapiConfig {
    /// Base URL of the CMS; the remote collection is empty when unset
    pub url: Option<String>,
    pub token: Option<String>,
    pub content_type: String,
    /// Plural API name, defaults to `<content_type>s`
    pub plural: Option<String>,
    pub page_size: usize,
}

impl Default for StrapiConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            content_type: "article".to_string(),
            plural: None,
            page_size: 25,
        }
    }
}

impl StrapiConfig {
    pub fn plural_name(&self) -> String {
        self.plural
            .clone()
            .unwrap_or_else(|| format!("{}s", self.content_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Pressroom");
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.static_dir, "public");
        assert_eq!(config.api.port, 1337);
        assert_eq!(config.strapi.content_type, "article");
        assert!(config.strapi.url.is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Acme Marketing
public_dir: public
api:
  port: 8080
strapi:
  url: http://cms.local
  page_size: 10
analytics: plausible
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Acme Marketing");
        assert_eq!(config.public_dir, "public");
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.api.host, "127.0.0.1");
        assert_eq!(config.strapi.url.as_deref(), Some("http://cms.local"));
        assert_eq!(config.strapi.page_size, 10);
        assert!(config.extra.contains_key("analytics"));
    }

    #[test]
    fn test_plural_name() {
        let mut strapi = StrapiConfig::default();
        assert_eq!(strapi.plural_name(), "articles");
        strapi.plural = Some("news".to_string());
        assert_eq!(strapi.plural_name(), "news");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SiteConfig::default();
        config.apply_overrides(Some("http://cms.example".into()), Some(String::new()));
        assert_eq!(config.strapi.url.as_deref(), Some("http://cms.example"));
        assert!(config.strapi.token.is_none());
    }
}
