//! CLI entry point for pressroom

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pressroom::Site;

#[derive(Parser)]
#[command(name = "pressroom")]
#[command(version)]
#[command(about = "Marketing site builder and content API", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new blog post
    New {
        /// Title of the new post
        title: String,
    },

    /// Load every collection and render the site
    #[command(alias = "b")]
    Build {
        /// Keep running and rebuild on change
        #[arg(short, long)]
        watch: bool,
    },

    /// Build, serve the output and rebuild on change
    Dev {
        /// Port to listen on
        #[arg(short, long, default_value = "4321")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Serve only, without watching for changes
        #[arg(long)]
        r#static: bool,
    },

    /// Start the content API server
    Api {
        /// Port to listen on (defaults to api.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to api.host)
        #[arg(long)]
        host: Option<String>,
    },

    /// Validate every collection without rendering
    Check,

    /// List the entries of a collection
    List {
        /// Collection name (blog, landing, about, strapiPostsLoader)
        #[arg(default_value = "blog")]
        collection: String,
    },

    /// Remove the build output
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "pressroom=debug,info"
    } else {
        "pressroom=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            pressroom::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { title } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            site.new_post(&title)?;
        }

        Commands::Build { watch } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Building site...");
            site.build().await?;
            println!("Built successfully!");

            if watch {
                tracing::info!("Watching for file changes...");
                pressroom::server::watch_and_rebuild(site).await?;
            }
        }

        Commands::Dev {
            port,
            ip,
            open,
            r#static,
        } => {
            let site = Site::new(&base_dir)?;

            // Build first
            tracing::info!("Building site...");
            site.build().await?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            pressroom::server::start(&site, &ip, port, !r#static, open).await?;
        }

        Commands::Api { port, host } => {
            let site = Site::new(&base_dir)?;
            let host = host.unwrap_or_else(|| site.config.api.host.clone());
            let port = port.unwrap_or(site.config.api.port);

            tracing::info!("Starting content API at http://{}:{}", host, port);
            pressroom::api::start(&site, &host, port).await?;
        }

        Commands::Check => {
            let site = Site::new(&base_dir)?;
            site.check().await?;
        }

        Commands::List { collection } => {
            let site = Site::new(&base_dir)?;
            pressroom::commands::list::run(&site, &collection).await?;
        }

        Commands::Clean => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("pressroom version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
