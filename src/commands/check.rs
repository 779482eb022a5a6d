//! Validate every collection without rendering

use anyhow::Result;

use crate::content::{load_collections, CollectionName};
use crate::Site;

pub async fn run(site: &Site) -> Result<()> {
    let collections = load_collections(site).await?;

    // Remote entries only need an id to load; the typed view is checked here
    for entry in collections.strapi_posts() {
        entry.article()?;
    }

    for name in CollectionName::ALL {
        println!("  {:<20} {} entries", name.as_str(), collections.len(name));
        tracing::debug!("{}: {}", name, collections.ids(name).join(", "));
    }
    println!("All collections are valid.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_check_reports_invalid_data_entry() {
        let dir = TempDir::new().unwrap();
        let about = dir.path().join("content/about");
        fs::create_dir_all(&about).unwrap();
        fs::write(about.join("me.json"), r#"{ "name": "Ada", "bio": "Hi" }"#).unwrap();

        let site = Site::with_config(dir.path(), SiteConfig::default());
        let err = run(&site).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("about"));
        assert!(message.contains("me"));
    }

    #[tokio::test]
    async fn test_check_empty_site() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());
        assert!(run(&site).await.is_ok());
    }
}
