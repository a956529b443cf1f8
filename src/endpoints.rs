//! The API endpoints URIs.

/// The root route which redirects to the dashboard page.
pub const ROOT: &str = "/";
/// The server-rendered dashboard page.
pub const DASHBOARD_VIEW: &str = "/dashboard";

/// The route that reseeds the database from the seed source.
pub const INITIALIZE: &str = "/initialize";
/// The route for listing and searching transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for the sales statistics of a month.
pub const STATISTICS: &str = "/statistics";
/// The route for the price histogram of a month.
pub const BAR_CHART: &str = "/bar-chart";
/// The route for the category breakdown of a month.
pub const PIE_CHART: &str = "/pie-chart";
/// The route for the listing and all reports of a month in one response.
pub const COMBINED: &str = "/combined";
