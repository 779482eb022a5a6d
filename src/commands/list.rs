//! List the entries of a collection

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::content::{load_remote, About, CollectionName, Landing};
use crate::Site;

/// `(id, title)` rows of a collection, in load order
pub async fn entries(site: &Site, name: CollectionName) -> Result<Vec<(String, String)>> {
    let rows = match name {
        CollectionName::Blog => ContentLoader::new(site)
            .load_blog()?
            .into_iter()
            .map(|e| (e.id, e.data.title))
            .collect(),
        CollectionName::Landing => ContentLoader::new(site)
            .load_data::<Landing>()?
            .into_iter()
            .map(|e| (e.id, e.data.title))
            .collect(),
        CollectionName::About => ContentLoader::new(site)
            .load_data::<About>()?
            .into_iter()
            .map(|e| (e.id, e.data.name))
            .collect(),
        CollectionName::StrapiPostsLoader => load_remote(site)
            .await?
            .into_iter()
            .map(|e| {
                let title = e
                    .data
                    .get("title")
                    .and_then(|t| t.as_str())
                    .unwrap_or("")
                    .to_string();
                (e.id, title)
            })
            .collect(),
    };
    Ok(rows)
}

/// Print a collection; `collection` is one of the collection names
pub async fn run(site: &Site, collection: &str) -> Result<()> {
    let name: CollectionName = collection.parse().map_err(anyhow::Error::msg)?;
    let rows = entries(site, name).await?;

    println!("{} ({}):", name, rows.len());
    for (id, title) in rows {
        println!("  {} - {}", id, title);
    }

    Ok(())
}
