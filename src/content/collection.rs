//! Content collections and their accessors

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::article::Article;
use super::schema::{About, BlogPost, Landing};
use crate::error::SchemaError;

/// The collections a site declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionName {
    Blog,
    Landing,
    About,
    StrapiPostsLoader,
}

/// How a collection's entries are sourced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    /// Markdown files with front matter
    Content,
    /// JSON or YAML data files
    Data,
    /// Fetched from the CMS by a loader
    Remote,
}

impl CollectionName {
    pub const ALL: [CollectionName; 4] = [
        CollectionName::Blog,
        CollectionName::Landing,
        CollectionName::About,
        CollectionName::StrapiPostsLoader,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionName::Blog => "blog",
            CollectionName::Landing => "landing",
            CollectionName::About => "about",
            CollectionName::StrapiPostsLoader => "strapiPostsLoader",
        }
    }

    pub fn kind(&self) -> CollectionKind {
        match self {
            CollectionName::Blog => CollectionKind::Content,
            CollectionName::Landing | CollectionName::About => CollectionKind::Data,
            CollectionName::StrapiPostsLoader => CollectionKind::Remote,
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown collection: {}. Available: blog, landing, about, strapiPostsLoader",
                    s
                )
            })
    }
}

/// A validated entry of a local collection
#[derive(Debug, Clone, Serialize)]
pub struct Entry<T> {
    /// Path relative to the collection directory, without extension
    pub id: String,
    pub data: T,
    /// Rendered HTML body (content collections only)
    pub body: Option<String>,
    #[serde(skip)]
    pub source: PathBuf,
}

/// An entry produced by the remote loader
#[derive(Debug, Clone, Serialize)]
pub struct RemoteEntry {
    pub id: String,
    pub data: Map<String, Value>,
}

impl RemoteEntry {
    /// Typed article view of the entry
    pub fn article(&self) -> Result<Article, SchemaError> {
        serde_json::from_value(Value::Object(self.data.clone())).map_err(|e| {
            SchemaError::new(
                CollectionName::StrapiPostsLoader.as_str(),
                &self.id,
                e.to_string(),
            )
        })
    }
}

/// All collections of a site, validated and ready for rendering
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub blog: Vec<Entry<BlogPost>>,
    pub landing: Vec<Entry<Landing>>,
    pub about: Vec<Entry<About>>,
    pub strapi_posts: Vec<RemoteEntry>,
}

impl Collections {
    pub fn blog(&self) -> &[Entry<BlogPost>] {
        &self.blog
    }

    pub fn landing(&self) -> &[Entry<Landing>] {
        &self.landing
    }

    pub fn about(&self) -> &[Entry<About>] {
        &self.about
    }

    pub fn strapi_posts(&self) -> &[RemoteEntry] {
        &self.strapi_posts
    }

    /// Number of entries in a collection
    pub fn len(&self, name: CollectionName) -> usize {
        match name {
            CollectionName::Blog => self.blog.len(),
            CollectionName::Landing => self.landing.len(),
            CollectionName::About => self.about.len(),
            CollectionName::StrapiPostsLoader => self.strapi_posts.len(),
        }
    }

    /// Entry ids of a collection, in load order
    pub fn ids(&self, name: CollectionName) -> Vec<&str> {
        match name {
            CollectionName::Blog => self.blog.iter().map(|e| e.id.as_str()).collect(),
            CollectionName::Landing => self.landing.iter().map(|e| e.id.as_str()).collect(),
            CollectionName::About => self.about.iter().map(|e| e.id.as_str()).collect(),
            CollectionName::StrapiPostsLoader => {
                self.strapi_posts.iter().map(|e| e.id.as_str()).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_names_round_trip() {
        for name in CollectionName::ALL {
            assert_eq!(name.as_str().parse::<CollectionName>().unwrap(), name);
        }
        assert!("posts".parse::<CollectionName>().is_err());
    }

    #[test]
    fn test_collection_kinds() {
        assert_eq!(CollectionName::Blog.kind(), CollectionKind::Content);
        assert_eq!(CollectionName::About.kind(), CollectionKind::Data);
        assert_eq!(CollectionName::StrapiPostsLoader.kind(), CollectionKind::Remote);
    }

    #[test]
    fn test_remote_entry_article_view() {
        let entry = RemoteEntry {
            id: "abc".to_string(),
            data: json!({ "id": 1, "title": "Hi" }).as_object().unwrap().clone(),
        };
        assert_eq!(entry.article().unwrap().title, "Hi");

        let broken = RemoteEntry {
            id: "def".to_string(),
            data: json!({ "id": 2 }).as_object().unwrap().clone(),
        };
        let err = broken.article().unwrap_err();
        assert_eq!(err.collection, "strapiPostsLoader");
        assert_eq!(err.entry, "def");
    }

    #[test]
    fn test_accessors_report_ids() {
        let collections = Collections {
            blog: vec![Entry {
                id: "first".to_string(),
                data: BlogPost {
                    title: "First".to_string(),
                    description: "One".to_string(),
                },
                body: None,
                source: PathBuf::from("content/blog/first.md"),
            }],
            ..Default::default()
        };
        assert_eq!(collections.len(CollectionName::Blog), 1);
        assert_eq!(collections.ids(CollectionName::Blog), vec!["first"]);
        assert_eq!(collections.len(CollectionName::StrapiPostsLoader), 0);
    }
}
