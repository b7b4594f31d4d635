use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use spendtrack::{AppState, build_router, extraction::GeminiClient, shutdown_signal};

/// The REST API server for spendtrack.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// How many seconds to wait for the extraction service before rejecting
    /// a receipt scan.
    #[arg(long, default_value_t = 60)]
    extraction_timeout: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let api_key =
        env::var("GEMINI_API_KEY").expect("The environment variable 'GEMINI_API_KEY' must be set");

    let connection = Connection::open(&args.db_path).expect("Could not open the database file");

    let state = AppState::new(
        connection,
        Arc::new(GeminiClient::new(api_key)),
        Duration::from_secs(args.extraction_timeout),
    )
    .expect("Could not initialize the database");

    let router = build_router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Could not bind to the server address");

    tracing::info!("HTTP server listening on {}", addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}
