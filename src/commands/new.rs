//! Scaffold a new blog post

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::{BlogPost, CollectionName};
use crate::Site;

/// Create `<content>/blog/<slug>.md` with front matter for `title`
pub fn run(site: &Site, title: &str) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let dir = site.collection_dir(CollectionName::Blog);
    fs::create_dir_all(&dir)?;

    let file_path = dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let front_matter = serde_yaml::to_string(&BlogPost {
        title: title.to_string(),
        description: String::new(),
    })?;
    let content = format!("---\n{}---\n\n", front_matter);

    fs::write(&file_path, content)
        .with_context(|| format!("Failed to write {:?}", file_path))?;
    println!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::loader::ContentLoader;
    use tempfile::TempDir;

    #[test]
    fn test_new_post_is_loadable() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());

        let path = run(&site, "Hello: World").unwrap();
        assert_eq!(path, site.collection_dir(CollectionName::Blog).join("hello-world.md"));

        let entries = ContentLoader::new(&site).load_blog().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].data.title, "Hello: World");
        assert_eq!(entries[0].data.description, "");
    }

    #[test]
    fn test_new_post_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());
        run(&site, "Twice").unwrap();
        assert!(run(&site, "Twice").is_err());
        assert!(run(&site, "!!!").is_err());
    }
}
