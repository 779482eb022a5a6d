//! Initialize a new site

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Pressroom configuration

# Site
title: Pressroom
description: Marketing site and blog
author: ''
language: en

# URL
url: http://localhost:4321
root: /

# Directory
content_dir: content
public_dir: dist
static_dir: public

# Content API (`pressroom api`)
api:
  host: 127.0.0.1
  port: 1337
  seed: data/articles.json

# Remote CMS for the strapiPostsLoader collection.
# STRAPI_URL and STRAPI_TOKEN override these values.
strapi:
  # url: http://localhost:1337
  content_type: article
  page_size: 25
"#;

const HELLO_POST: &str = r#"---
title: Hello World
description: The first post on this site.
---

Welcome! Posts live in `content/blog/` as markdown with `title` and
`description` front matter.

```bash
pressroom new "My next post"
pressroom build
```
"#;

const LANDING: &str = r#"title: Build something people want
description: A short pitch for the product.
sections:
  - title: Fast
    content: Pages are rendered ahead of time.
  - title: Typed
    content: Every collection is validated before anything is written.
cta:
  text: Read the blog
  link: /blog/
"#;

const ABOUT: &str = r#"name: Jane Doe
image: /img/avatar.png
bio: Writes about shipping software.
socialLinks:
  - platform: GitHub
    url: https://github.com/
    icon: github
"#;

const ARTICLES: &str = r#"[
  {
    "title": "Hello from the content API",
    "description": "Served by pressroom api",
    "slug": "hello-from-the-content-api",
    "cover": {
      "url": "/uploads/cover.png",
      "alternativeText": "Cover image",
      "name": "cover.png",
      "width": 1200,
      "height": 630
    },
    "blocks": [
      { "__component": "shared.rich-text", "body": "Articles are **markdown** blocks." },
      { "__component": "shared.quote", "title": "Editor", "body": "Ship it." }
    ]
  }
]
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("{:?} already contains a site", target_dir);
    }

    let files = [
        ("_config.yml", CONFIG),
        ("content/blog/hello-world.md", HELLO_POST),
        ("content/landing/home.yml", LANDING),
        ("content/about/me.yml", ABOUT),
        ("data/articles.json", ARTICLES),
    ];

    for (relative, content) in files {
        let path = target_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;
        tracing::debug!("Created: {:?}", path);
    }
    fs::create_dir_all(target_dir.join("public"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::load_store;
    use crate::content::load_collections;
    use crate::Site;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_scaffold_is_valid() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let site = Site::new(dir.path()).unwrap();
        let collections = load_collections(&site).await.unwrap();
        assert_eq!(collections.blog().len(), 1);
        assert_eq!(collections.landing()[0].data.sections.len(), 2);
        assert_eq!(collections.about()[0].data.social_links[0].platform, "GitHub");

        let store = load_store(&site).unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
