//! Application router configuration.

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    middleware,
    response::Redirect,
    routing::get,
};
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    dashboard::get_dashboard_page,
    endpoints,
    logging::logging_middleware,
    not_found::get_404_not_found,
    report::{
        get_bar_chart_endpoint, get_combined_endpoint, get_pie_chart_endpoint,
        get_statistics_endpoint,
    },
    seed::initialize_endpoint,
    transaction::get_transactions_endpoint,
};

/// Return a router with all the app's routes.
///
/// Cross-origin GET and POST requests are allowed from `allowed_origin`, if
/// it is a valid header value.
pub fn build_router(state: AppState, allowed_origin: &str) -> Router {
    let api_routes = Router::new()
        .route(
            endpoints::INITIALIZE,
            get(initialize_endpoint).post(initialize_endpoint),
        )
        .route(endpoints::TRANSACTIONS, get(get_transactions_endpoint))
        .route(endpoints::STATISTICS, get(get_statistics_endpoint))
        .route(endpoints::BAR_CHART, get(get_bar_chart_endpoint))
        .route(endpoints::PIE_CHART, get(get_pie_chart_endpoint))
        .route(endpoints::COMBINED, get(get_combined_endpoint));

    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page));

    api_routes
        .merge(view_routes)
        .fallback(get_404_not_found)
        .layer(cors_layer(allowed_origin))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(error) => {
            tracing::warn!("ignoring invalid CORS origin {allowed_origin:?}: {error}");
            cors
        }
    }
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
