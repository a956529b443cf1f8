use std::{
    fs::OpenOptions,
    net::SocketAddr,
    sync::Arc,
    time::Duration,
};

use axum::{
    Router,
    extract::{FromRef, MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use sales_dashboard::{
    AppState, DEFAULT_SEED_URL, PaginationConfig, ReportingConfig, SeedConfig, SeedState,
    build_router, graceful_shutdown, seed_database,
};

/// The REST API server for the sales dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The URL of the JSON dataset used to seed the database.
    #[arg(long, default_value = DEFAULT_SEED_URL)]
    seed_url: String,

    /// How many seconds to wait for the seed source.
    #[arg(long, default_value_t = 30)]
    seed_timeout_secs: u64,

    /// The year that month names such as "March" refer to.
    #[arg(long, default_value_t = 2022)]
    reference_year: i32,

    /// Restrict the transaction listing to the requested month.
    #[arg(long)]
    listing_month_filter: bool,

    /// The origin allowed to make cross-origin requests.
    #[arg(long, default_value = "http://localhost:3001")]
    allowed_origin: String,

    /// Seed the database once before serving requests.
    #[arg(long)]
    seed_on_startup: bool,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let conn = Connection::open(&args.db_path).expect("Could not open the database.");
    let state = AppState::new(
        conn,
        SeedConfig {
            url: args.seed_url,
            timeout: Duration::from_secs(args.seed_timeout_secs),
        },
        ReportingConfig {
            reference_year: args.reference_year,
            listing_month_filter: args.listing_month_filter,
        },
        PaginationConfig::default(),
    )
    .expect("Could not initialize the application state.");

    if args.seed_on_startup {
        match seed_database(&SeedState::from_ref(&state)).await {
            Ok(count) => tracing::info!("Seeded {count} transactions on startup"),
            Err(error) => tracing::error!("Could not seed database on startup: {error}"),
        }
    }

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state, &args.allowed_origin));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Server stopped unexpectedly.");
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they are converted into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
