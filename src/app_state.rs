//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use reqwest::Client;
use rusqlite::Connection;

use crate::{
    Error,
    config::{ReportingConfig, SeedConfig},
    db::initialize,
    pagination::PaginationConfig,
    seed::build_http_client,
    transaction::count_all_transactions,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The client used to download seed data.
    pub http_client: Client,

    /// Where the seed data comes from.
    pub seed_config: SeedConfig,

    /// How month names and the listing month filter are interpreted.
    pub reporting_config: ReportingConfig,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the transaction table.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the HTTP
    /// client cannot be built.
    pub fn new(
        db_connection: Connection,
        seed_config: SeedConfig,
        reporting_config: ReportingConfig,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;
        tracing::info!(
            "database has {} transactions",
            count_all_transactions(&db_connection)?
        );

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            http_client: build_http_client(&seed_config)?,
            seed_config,
            reporting_config,
            pagination_config,
        })
    }
}
