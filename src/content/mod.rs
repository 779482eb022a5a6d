//! Content module - collection schemas, loaders and validation

pub mod article;
pub mod collection;
mod frontmatter;
pub mod loader;
mod markdown;
pub mod schema;
pub mod strapi;

pub use article::{Article, Block, BlockKind, Media};
pub use collection::{CollectionKind, CollectionName, Collections, Entry, RemoteEntry};
pub use markdown::MarkdownRenderer;
pub use schema::{About, BlogPost, Cta, Landing, Schema, Section, SocialLink};

use crate::error::LoadError;
use crate::Site;
use loader::ContentLoader;
use strapi::StrapiLoader;

/// Load and validate every collection of the site
pub async fn load_collections(site: &Site) -> Result<Collections, LoadError> {
    let (blog, landing, about) = {
        let loader = ContentLoader::new(site);
        (
            loader.load_blog()?,
            loader.load_data::<Landing>()?,
            loader.load_data::<About>()?,
        )
    };
    let strapi_posts = load_remote(site).await?;

    tracing::info!(
        "Loaded {} blog, {} landing, {} about and {} remote entries",
        blog.len(),
        landing.len(),
        about.len(),
        strapi_posts.len()
    );

    Ok(Collections {
        blog,
        landing,
        about,
        strapi_posts,
    })
}

/// Load the remote collection, or nothing when no CMS is configured
pub async fn load_remote(site: &Site) -> Result<Vec<RemoteEntry>, LoadError> {
    let Some(url) = &site.config.strapi.url else {
        tracing::warn!(
            "No strapi.url configured, collection {} is empty",
            CollectionName::StrapiPostsLoader
        );
        return Ok(Vec::new());
    };

    StrapiLoader::new(url, &site.config.strapi)?.load().await
}
