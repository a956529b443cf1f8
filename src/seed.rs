//! Replaces the stored transactions with the dataset from the seed source.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use reqwest::Client;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    config::SeedConfig,
    db::run_query,
    transaction::{Transaction, replace_all_transactions},
};

/// The state needed for seeding the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection that receives the seed data.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The HTTP client used to fetch the dataset.
    pub http_client: Client,
    /// Where to fetch the dataset from.
    pub seed_config: SeedConfig,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            http_client: state.http_client.clone(),
            seed_config: state.seed_config.clone(),
        }
    }
}

/// The response body for a successful seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedResponse {
    /// A human readable confirmation.
    pub message: String,
    /// The number of records now in the database.
    pub count: usize,
}

/// Download the dataset from `url`.
///
/// # Errors
/// Returns [Error::SeedFetch] if the request fails, the response status is
/// not a success, or the body is not a list of transactions, and
/// [Error::InvalidSeedRecord] if a record has a negative or non-finite price.
pub async fn fetch_seed_data(client: &Client, url: &str) -> Result<Vec<Transaction>, Error> {
    let transactions: Vec<Transaction> = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|error| Error::SeedFetch(error.to_string()))?
        .json()
        .await
        .map_err(|error| Error::SeedFetch(error.to_string()))?;

    if let Some(invalid) = transactions
        .iter()
        .find(|transaction| !transaction.price.is_finite() || transaction.price < 0.0)
    {
        return Err(Error::InvalidSeedRecord(format!(
            "transaction {} has invalid price {}",
            invalid.id, invalid.price
        )));
    }

    Ok(transactions)
}

/// Fetch the dataset and replace every stored transaction with it.
///
/// The dataset is fully downloaded and validated before the database is
/// touched, so a failed fetch leaves the stored records as they were.
///
/// # Errors
/// Returns any error from [fetch_seed_data] or from writing the records.
pub async fn seed_database(state: &SeedState) -> Result<usize, Error> {
    let transactions = fetch_seed_data(&state.http_client, &state.seed_config.url).await?;
    tracing::info!(
        "fetched {} transactions from {}",
        transactions.len(),
        state.seed_config.url
    );

    let count = run_query(state.db_connection.clone(), move |connection| {
        replace_all_transactions(&transactions, connection)
    })
    .await?;
    tracing::info!("seeded database with {count} transactions");

    Ok(count)
}

/// Route handler that reseeds the database.
pub async fn initialize_endpoint(
    State(state): State<SeedState>,
) -> Result<Json<SeedResponse>, Error> {
    let count = seed_database(&state)
        .await
        .inspect_err(|error| tracing::error!("could not seed database: {error}"))?;

    Ok(Json(SeedResponse {
        message: "Database initialized with seed data".to_owned(),
        count,
    }))
}

/// Create the HTTP client used for fetching seed data.
///
/// # Errors
/// Returns [Error::SeedFetch] if the client cannot be built.
pub fn build_http_client(seed_config: &SeedConfig) -> Result<Client, Error> {
    Client::builder()
        .timeout(seed_config.timeout)
        .build()
        .map_err(|error| Error::SeedFetch(error.to_string()))
}
