//! Development server: serves the build output and rebuilds on change

use anyhow::{Context, Result};
use axum::Router;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::Site;

/// Static file router over the public directory
pub fn app(public_dir: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
}

/// Start the development server
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", ip, port))?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let site = site.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_and_rebuild(site).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(&site.public_dir)).await?;

    Ok(())
}

/// Paths whose changes trigger a rebuild
fn watch_targets(site: &Site) -> Vec<(PathBuf, RecursiveMode)> {
    let static_dir = site.base_dir.join(&site.config.static_dir);
    let seed = site.config.api.seed.as_ref().map(|s| site.base_dir.join(s));

    [
        Some((site.content_dir.clone(), RecursiveMode::Recursive)),
        Some((static_dir, RecursiveMode::Recursive)),
        Some((site.config_path(), RecursiveMode::NonRecursive)),
        seed.map(|s| (s, RecursiveMode::NonRecursive)),
    ]
    .into_iter()
    .flatten()
    .filter(|(path, _)| path.exists())
    .collect()
}

/// Editor droppings and VCS metadata never trigger a rebuild
fn is_relevant(path: &Path) -> bool {
    let in_git = path
        .components()
        .any(|c| c.as_os_str() == ".git");
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    !in_git && name != ".DS_Store" && !name.ends_with('~') && !name.ends_with(".swp")
}

/// Watch the site sources and rebuild after each debounced batch of changes
pub async fn watch_and_rebuild(site: Site) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<DebounceEventResult>();

    // Create debouncer to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), move |res| {
        let _ = tx.send(res);
    })?;

    for (path, mode) in watch_targets(&site) {
        debouncer.watcher().watch(&path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    while let Some(result) = rx.recv().await {
        let events = match result {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
                continue;
            }
        };

        let changed: Vec<_> = events
            .iter()
            .map(|e| e.path.as_path())
            .filter(|p| is_relevant(p))
            .collect();
        if changed.is_empty() {
            continue;
        }

        for path in &changed {
            tracing::info!("File changed: {}", path.display());
        }

        // Reload the config so edits to _config.yml take effect
        let current = match Site::new(&site.base_dir) {
            Ok(current) => current,
            Err(e) => {
                tracing::error!("Failed to reload config: {:#}", e);
                continue;
            }
        };

        match current.build().await {
            Ok(()) => tracing::info!("Rebuilt successfully"),
            Err(e) => tracing::error!("Build failed: {:#}", e),
        }
    }

    Ok(())
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(Path::new("content/blog/post.md")));
        assert!(!is_relevant(Path::new("content/.git/index")));
        assert!(!is_relevant(Path::new("content/blog/post.md~")));
        assert!(!is_relevant(Path::new("content/blog/.post.md.swp")));
        assert!(!is_relevant(Path::new("public/.DS_Store")));
        assert!(is_relevant(Path::new("content/blog/my.github-tips.md")));
        assert!(is_relevant(Path::new("public/.gitkeep")));
    }

    #[test]
    fn test_watch_targets_skip_missing() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("content")).unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());

        let targets = watch_targets(&site);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].0, dir.path().join("content"));
    }

    #[tokio::test]
    async fn test_serves_public_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("blog")).unwrap();
        fs::write(dir.path().join("blog/index.html"), "<h1>Blog</h1>").unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = app(dir.path());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let body = reqwest::get(format!("http://{}/blog/", addr))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "<h1>Blog</h1>");

        let missing = reqwest::get(format!("http://{}/nope/", addr)).await.unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
