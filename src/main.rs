mod cache;
mod error;
mod feed;
mod filter;
mod mapper;
mod models;
mod routes;
mod state;
#[cfg(test)]
mod test_support;
mod upstream;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use clap::Parser;
use mapper::RatingPolicy;
use state::AppState;
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use upstream::UpstreamClient;

/// App catalog and review feed proxy
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server listen address
    #[arg(long, env = "LISTEN_URL", default_value = "0.0.0.0")]
    listen_url: String,

    /// Server listen port
    #[arg(long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Upstream catalog feed URL
    #[arg(long, env = "APPLE_API_URL")]
    apps_api_url: String,

    /// Upstream review feed base URL; the app id and paging are appended
    #[arg(
        long,
        env = "APPLE_REVIEWS_BASE_URL",
        default_value = "https://itunes.apple.com/us/rss/customerreviews"
    )]
    reviews_base_url: String,

    /// Catalog snapshot file
    #[arg(long, env = "APPS_STORAGE_FILE", default_value = "data/apps.json")]
    apps_storage_file: PathBuf,

    /// Directory for per-app review dumps
    #[arg(long, env = "REVIEWS_STORAGE_DIR", default_value = "data/reviews")]
    reviews_storage_dir: PathBuf,

    /// Upstream request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value = "10")]
    request_timeout: u64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Append logs to this file instead of stdout
    #[arg(long, env = "LOG_FILE_PATH")]
    log_file_path: Option<PathBuf>,

    /// Version reported by /health (defaults to the crate version)
    #[arg(long, env = "APP_VERSION")]
    app_version: Option<String>,

    /// Front-end origin allowed by CORS (any origin when unset)
    #[arg(long, env = "CORS_ORIGIN")]
    cors_origin: Option<String>,

    /// Drop reviews with a non-numeric rating instead of failing the request
    #[arg(
        long,
        env = "SKIP_INVALID_RATINGS",
        default_value_t = false,
        action = clap::ArgAction::Set
    )]
    skip_invalid_ratings: bool,
}

impl Args {
    fn rating_policy(&self) -> RatingPolicy {
        if self.skip_invalid_ratings {
            RatingPolicy::SkipReview
        } else {
            RatingPolicy::AbortBatch
        }
    }
}

/// Initializes tracing to stdout, or to `log_file` when one is given
fn init_tracing(log_level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("app_feed_proxy={log_level},tower_http={log_level}").into()
    });

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory: {}", parent.display())
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;

            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stdout_layer = if file_layer.is_none() {
        Some(tracing_subscriber::fmt::layer())
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(())
}

fn cors_layer(origin: Option<&str>) -> Result<CorsLayer> {
    let allow_origin = match origin {
        Some(origin) => AllowOrigin::exact(
            HeaderValue::from_str(origin).context("Invalid CORS origin")?,
        ),
        None => AllowOrigin::any(),
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    // Parse CLI arguments (with environment variable fallbacks)
    let args = Args::parse();

    init_tracing(&args.log_level, args.log_file_path.as_deref())?;

    tracing::info!("Starting app feed proxy");
    tracing::info!("Configuration:");
    tracing::info!("  Listen URL: {}", args.listen_url);
    tracing::info!("  Listen Port: {}", args.port);
    tracing::info!("  Apps API URL: {}", args.apps_api_url);
    tracing::info!("  Reviews Base URL: {}", args.reviews_base_url);
    tracing::info!("  Apps Storage File: {}", args.apps_storage_file.display());
    tracing::info!(
        "  Reviews Storage Dir: {}",
        args.reviews_storage_dir.display()
    );
    tracing::info!("  Request Timeout: {}s", args.request_timeout);
    match args.cors_origin {
        Some(ref origin) => tracing::info!("  CORS Origin: {}", origin),
        None => tracing::info!("  CORS Origin: any"),
    }
    if args.skip_invalid_ratings {
        tracing::info!("  Invalid Ratings: skipped");
    } else {
        tracing::info!("  Invalid Ratings: fail the request");
    }

    let upstream = UpstreamClient::new(
        args.apps_api_url.clone(),
        args.reviews_base_url.clone(),
        Duration::from_secs(args.request_timeout),
    )
    .context("Failed to build HTTP client")?;

    let cors = cors_layer(args.cors_origin.as_deref())?;

    // Create shared application state
    let state = AppState {
        upstream,
        apps_cache_file: args.apps_storage_file.clone(),
        reviews_dump_dir: args.reviews_storage_dir.clone(),
        rating_policy: args.rating_policy(),
        version: Arc::new(
            args.app_version
                .clone()
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
        ),
    };

    let app = routes::router(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    // Bind to address
    let addr = format!("{}:{}", args.listen_url, args.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("Server started successfully");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
