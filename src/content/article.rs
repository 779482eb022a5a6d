//! Typed view of a CMS article and its dynamic-zone blocks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Component names of the blocks an article can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockKind {
    #[serde(rename = "shared.media")]
    SharedMedia,
    #[serde(rename = "shared.slider")]
    SharedSlider,
    #[serde(rename = "shared.quote")]
    SharedQuote,
    #[serde(rename = "shared.rich-text")]
    SharedRichText,
}

impl BlockKind {
    pub const ALL: [BlockKind; 4] = [
        BlockKind::SharedMedia,
        BlockKind::SharedSlider,
        BlockKind::SharedQuote,
        BlockKind::SharedRichText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::SharedMedia => "shared.media",
            BlockKind::SharedSlider => "shared.slider",
            BlockKind::SharedQuote => "shared.quote",
            BlockKind::SharedRichText => "shared.rich-text",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded media file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub url: String,
    #[serde(default)]
    pub alternative_text: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// A dynamic-zone block, tagged by its `__component`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__component")]
pub enum Block {
    #[serde(rename = "shared.media")]
    Media {
        #[serde(default)]
        file: Option<Media>,
    },
    #[serde(rename = "shared.slider")]
    Slider {
        #[serde(default)]
        files: Vec<Media>,
    },
    #[serde(rename = "shared.quote")]
    Quote {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        body: Option<String>,
    },
    #[serde(rename = "shared.rich-text")]
    RichText {
        #[serde(default)]
        body: Option<String>,
    },
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Media { .. } => BlockKind::SharedMedia,
            Block::Slider { .. } => BlockKind::SharedSlider,
            Block::Quote { .. } => BlockKind::SharedQuote,
            Block::RichText { .. } => BlockKind::SharedRichText,
        }
    }
}

/// An article as returned by the content API with its populate spec applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: u64,
    #[serde(default)]
    pub document_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cover: Option<Media>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Article {
    /// URL segment for the article page
    pub fn url_slug(&self) -> String {
        match &self.slug {
            Some(slug) if !slug.is_empty() => slug::slugify(slug),
            _ => slug::slugify(&self.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_article_with_blocks() {
        let article: Article = serde_json::from_value(json!({
            "id": 3,
            "documentId": "abc123",
            "title": "Launch Day",
            "slug": "launch-day",
            "publishedAt": "2024-05-01T09:00:00.000Z",
            "cover": { "id": 9, "url": "/uploads/cover.png", "width": 800, "height": 600 },
            "blocks": [
                { "__component": "shared.rich-text", "id": 1, "body": "Hello" },
                { "__component": "shared.quote", "id": 2, "title": "Ada", "body": "Ship it" },
                { "__component": "shared.media", "id": 3, "file": { "url": "/uploads/a.png" } },
                { "__component": "shared.slider", "id": 4, "files": [{ "url": "/uploads/b.png" }] }
            ]
        }))
        .unwrap();

        assert_eq!(article.document_id.as_deref(), Some("abc123"));
        assert_eq!(article.cover.as_ref().unwrap().width, Some(800));
        let kinds: Vec<_> = article.blocks.iter().map(Block::kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::SharedRichText,
                BlockKind::SharedQuote,
                BlockKind::SharedMedia,
                BlockKind::SharedSlider,
            ]
        );
    }

    #[test]
    fn test_unknown_component_rejected() {
        let result: Result<Block, _> =
            serde_json::from_value(json!({ "__component": "shared.video", "url": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_url_slug_falls_back_to_title() {
        let article: Article =
            serde_json::from_value(json!({ "id": 1, "title": "Hello There World" })).unwrap();
        assert_eq!(article.url_slug(), "hello-there-world");
    }

    #[test]
    fn test_block_kind_names() {
        assert_eq!(BlockKind::SharedRichText.as_str(), "shared.rich-text");
        assert_eq!(
            serde_json::to_value(BlockKind::SharedSlider).unwrap(),
            json!("shared.slider")
        );
    }
}
