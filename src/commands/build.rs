//! Build the static site

use anyhow::Result;
use std::time::Instant;

use crate::content::load_collections;
use crate::generator::Generator;
use crate::Site;

/// Load every collection, then render all pages
pub async fn run(site: &Site) -> Result<()> {
    let start = Instant::now();

    let collections = load_collections(site).await?;
    let pages = Generator::new(site)?.generate(&collections)?;

    tracing::info!(
        "Built {} pages in {:.2}s",
        pages,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
