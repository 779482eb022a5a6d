//! Content loader - loads local collections from the content directory

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::collection::{CollectionKind, CollectionName, Entry};
use super::frontmatter;
use super::schema::{BlogPost, Schema};
use super::MarkdownRenderer;
use crate::error::{LoadError, SchemaError};
use crate::Site;

/// Loads and validates the local collections of a site.
///
/// Loading is fail-fast: the first entry that cannot be read, parsed or
/// validated aborts the whole collection.
pub struct ContentLoader<'a> {
    site: &'a Site,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    pub fn new(site: &'a Site) -> Self {
        Self {
            site,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load the `blog` content collection
    pub fn load_blog(&self) -> Result<Vec<Entry<BlogPost>>, LoadError> {
        let dir = self.site.collection_dir(CollectionName::Blog);
        let mut entries = Vec::new();
        let mut ids = EntryIds::new(CollectionName::Blog);

        for path in collection_files(&dir, CollectionName::Blog.kind()) {
            let content = read(&path)?;
            let id = ids.claim(&dir, &path)?;

            let (front_matter, body) =
                frontmatter::parse(&content).map_err(|message| LoadError::Parse {
                    path: path.clone(),
                    message,
                })?;
            let data = BlogPost::validate(&id, front_matter)?;
            let html = self
                .renderer
                .render(body)
                .map_err(|e| LoadError::Parse {
                    path: path.clone(),
                    message: e.to_string(),
                })?;

            tracing::debug!("Loaded blog entry {}", id);
            entries.push(Entry {
                id,
                data,
                body: Some(html),
                source: path,
            });
        }

        Ok(entries)
    }

    /// Load a data collection (`landing`, `about`)
    pub fn load_data<T: Schema>(&self) -> Result<Vec<Entry<T>>, LoadError> {
        let dir = self.site.collection_dir(T::COLLECTION);
        let mut entries = Vec::new();
        let mut ids = EntryIds::new(T::COLLECTION);

        for path in collection_files(&dir, T::COLLECTION.kind()) {
            let content = read(&path)?;
            let id = ids.claim(&dir, &path)?;
            let value = parse_data_file(&path, &content)?;
            let data = T::validate(&id, value)?;

            tracing::debug!("Loaded {} entry {}", T::COLLECTION, id);
            entries.push(Entry {
                id,
                data,
                body: None,
                source: path,
            });
        }

        Ok(entries)
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Files belonging to a collection, sorted by path
fn collection_files(dir: &Path, kind: CollectionKind) -> Vec<PathBuf> {
    if !dir.exists() {
        tracing::debug!("Collection directory {:?} does not exist", dir);
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && !is_hidden(dir, p) && has_extension(p, kind))
        .collect();

    files.sort();
    files
}

/// Files and directories starting with `_` or `.` are not entries
fn is_hidden(dir: &Path, path: &Path) -> bool {
    path.strip_prefix(dir)
        .unwrap_or(path)
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .any(|c| c.starts_with('_') || c.starts_with('.'))
}

fn has_extension(path: &Path, kind: CollectionKind) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match kind {
        CollectionKind::Content => matches!(ext, "md" | "markdown"),
        CollectionKind::Data => matches!(ext, "json" | "yaml" | "yml"),
        CollectionKind::Remote => false,
    }
}

/// Entry id: relative path without extension, each segment slugified
fn entry_id(dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(dir).unwrap_or(path).with_extension("");
    relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .map(slug::slugify)
        .collect::<Vec<_>>()
        .join("/")
}

/// Ids handed out within one collection; each must be non-empty and unique
struct EntryIds {
    collection: CollectionName,
    seen: HashMap<String, PathBuf>,
}

impl EntryIds {
    fn new(collection: CollectionName) -> Self {
        Self {
            collection,
            seen: HashMap::new(),
        }
    }

    fn claim(&mut self, dir: &Path, path: &Path) -> Result<String, LoadError> {
        let id = entry_id(dir, path);
        if id.is_empty() || id.split('/').any(str::is_empty) {
            return Err(SchemaError::new(
                self.collection.as_str(),
                path.display().to_string(),
                "file name does not produce a usable id",
            )
            .into());
        }
        if let Some(first) = self.seen.get(&id) {
            return Err(SchemaError::new(
                self.collection.as_str(),
                id.as_str(),
                format!(
                    "{} and {} map to the same id",
                    first.display(),
                    path.display()
                ),
            )
            .into());
        }
        self.seen.insert(id.clone(), path.to_path_buf());
        Ok(id)
    }
}

fn parse_data_file(path: &Path, content: &str) -> Result<Value, LoadError> {
    let parse_error = |message: String| LoadError::Parse {
        path: path.to_path_buf(),
        message,
    };

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        _ => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
            frontmatter::yaml_to_json(yaml).map_err(parse_error)
        }
    }
}
