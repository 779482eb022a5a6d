//! Content API server
//!
//! Serves the `article` content type. `find` and `findOne` run the
//! populate-article middleware before the core handler; `create`, `update`
//! and `delete` use the core handler directly.

pub mod middleware;
pub mod populate;
pub mod query;
pub mod router;
pub mod store;

use anyhow::{Context, Result};
use axum::{http::StatusCode, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::Site;
use middleware::MiddlewareId;
use router::{create_core_router, Action, RouterConfig};
use store::DocumentStore;

/// Middleware configuration of the article routes
pub fn article_router_config() -> RouterConfig {
    RouterConfig::new()
        .with_middlewares(Action::Find, vec![MiddlewareId::PopulateArticle])
        .with_middlewares(Action::FindOne, vec![MiddlewareId::PopulateArticle])
}

/// Article routes under `/api/articles`
pub fn article_routes(store: Arc<DocumentStore>) -> Router {
    create_core_router("article", "articles", article_router_config(), store)
}

/// The full API application
pub fn app(store: Arc<DocumentStore>) -> Router {
    Router::new()
        .route("/_health", get(|| async { StatusCode::NO_CONTENT }))
        .merge(article_routes(store))
        .layer(TraceLayer::new_for_http())
}

/// Build the article store from the configured seed file, if any
pub fn load_store(site: &Site) -> Result<DocumentStore> {
    match &site.config.api.seed {
        Some(seed) => DocumentStore::load_seed(site.base_dir.join(seed)),
        None => {
            tracing::warn!("No api.seed configured, starting with an empty article store");
            Ok(DocumentStore::new())
        }
    }
}

/// Start the content API server
pub async fn start(site: &Site, host: &str, port: u16) -> Result<()> {
    let store = Arc::new(load_store(site)?);

    let bind_host = if host == "localhost" { "127.0.0.1" } else { host };
    let addr: SocketAddr = format!("{}:{}", bind_host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Content API running at http://{}:{}/api/articles", host, port);
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, app(store)).await?;
    Ok(())
}
