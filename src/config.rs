//! Settings that control how reports are built and where seed data comes from.

use std::time::Duration;

/// The URL of the product transaction dataset used to seed the database.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// How report queries interpret request parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportingConfig {
    /// The year that month names refer to, e.g. "March" means March of this year.
    pub reference_year: i32,
    /// Whether the transaction listing is restricted to the requested month.
    ///
    /// When `false` the listing ignores `month` and searches all records.
    pub listing_month_filter: bool,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            reference_year: 2022,
            listing_month_filter: false,
        }
    }
}

/// Where and how to fetch the seed dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    /// The URL that returns the dataset as a JSON array.
    pub url: String,
    /// How long to wait for the seed source before giving up.
    pub timeout: Duration,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SEED_URL.to_owned(),
            timeout: Duration::from_secs(30),
        }
    }
}
