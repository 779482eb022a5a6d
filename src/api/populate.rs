//! The article populate specification and the middleware that applies it
//!
//! Every `find`/`findOne` on articles expands the same relations: the cover
//! image (selected media fields only) and the `blocks` dynamic zone, where
//! each block component gets its own population.

use lazy_static::lazy_static;
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::middleware::{Middleware, Next, Proceed, RequestContext};
use super::query::Query;
use crate::content::BlockKind;
use crate::error::ApiError;

/// Media attributes exposed when a media relation is populated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaField {
    Url,
    AlternativeText,
    Name,
    Width,
    Height,
}

pub const MEDIA_FIELDS: [MediaField; 5] = [
    MediaField::Url,
    MediaField::AlternativeText,
    MediaField::Name,
    MediaField::Width,
    MediaField::Height,
];

/// `{ fields: [...] }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSelection {
    pub fields: Vec<MediaField>,
}

impl FieldSelection {
    pub fn media() -> Self {
        Self {
            fields: MEDIA_FIELDS.to_vec(),
        }
    }
}

/// Population of one dynamic-zone component, keyed by its block kind
#[derive(Debug, Clone, PartialEq)]
pub enum BlockPopulate {
    Media { file: FieldSelection },
    Slider { files: FieldSelection },
    Quote,
    RichText,
}

impl BlockPopulate {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockPopulate::Media { .. } => BlockKind::SharedMedia,
            BlockPopulate::Slider { .. } => BlockKind::SharedSlider,
            BlockPopulate::Quote => BlockKind::SharedQuote,
            BlockPopulate::RichText => BlockKind::SharedRichText,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            BlockPopulate::Media { file } => json!({ "populate": { "file": file } }),
            BlockPopulate::Slider { files } => json!({ "populate": { "files": files } }),
            BlockPopulate::Quote | BlockPopulate::RichText => json!({ "populate": true }),
        }
    }
}

/// Relations expanded for an article
#[derive(Debug, Clone, PartialEq)]
pub struct PopulateSpec {
    pub cover: FieldSelection,
    pub blocks: Vec<BlockPopulate>,
}

impl PopulateSpec {
    /// The fixed article expansion
    pub fn article() -> Self {
        Self {
            cover: FieldSelection::media(),
            blocks: vec![
                BlockPopulate::Media {
                    file: FieldSelection::media(),
                },
                BlockPopulate::Slider {
                    files: FieldSelection::media(),
                },
                BlockPopulate::Quote,
                BlockPopulate::RichText,
            ],
        }
    }

    /// The value of the `populate` query key
    pub fn to_value(&self) -> Value {
        let on: Map<String, Value> = self
            .blocks
            .iter()
            .map(|block| (block.kind().as_str().to_string(), block.to_value()))
            .collect();

        json!({
            "cover": self.cover,
            "blocks": { "on": on },
        })
    }

    /// The query fragment merged into requests: `{ populate: ... }`
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.insert("populate".to_string(), self.to_value());
        query
    }
}

lazy_static! {
    /// Built once, identical for every request
    pub static ref ARTICLE_POPULATE: Query = PopulateSpec::article().to_query();
}

/// Shallow merge: keys of `overlay` replace keys of `query`; nothing is merged deeply
pub fn merge_query(mut query: Query, overlay: &Query) -> Query {
    for (key, value) in overlay {
        query.insert(key.clone(), value.clone());
    }
    query
}

/// Middleware merging [`ARTICLE_POPULATE`] into the request query
pub struct PopulateArticle;

impl Middleware for PopulateArticle {
    fn name(&self) -> &'static str {
        "api::article.populate-article"
    }

    fn handle(&self, mut ctx: RequestContext, next: Next) -> Result<Proceed, ApiError> {
        if let Some(requested) = ctx.query.get("populate") {
            if requested != &ARTICLE_POPULATE["populate"] {
                tracing::debug!("Replacing caller populate {} with article populate", requested);
            }
        }

        ctx.query = merge_query(std::mem::take(&mut ctx.query), &ARTICLE_POPULATE);
        tracing::info!("In populate-article middleware.");

        Ok(next.run(ctx))
    }
}
