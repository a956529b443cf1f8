//! Dashboard HTTP handler and view rendering.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    dashboard::{
        charts::{DashboardChart, category_chart, charts_script, charts_view, price_range_chart},
        tables::{statistics_table, transactions_table},
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, ECHARTS_URL, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        PAGE_CONTAINER_STYLE, base, link,
    },
    pagination::Page,
    report::{CombinedReport, CombinedState, build_month_report},
    transaction::{ListingQuery, month_names, parse_month},
};

/// The month shown when the page is opened without one.
const DEFAULT_MONTH: &str = "March";

/// The heading used when the requested month is not a month name.
const UNKNOWN_MONTH_LABEL: &str = "Unknown month";

/// The query parameters accepted by the dashboard page.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DashboardQuery {
    /// A month name such as "March".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    /// Free text used to search the transaction table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// The 1-based page of the transaction table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    /// The month as requested, kept for paging links.
    month: String,
    /// The canonical month name, or a placeholder for unrecognised input.
    month_label: String,
    search: String,
    page: Page,
    report: CombinedReport,
}

/// Display a page with the transactions and reports of a month.
pub async fn get_dashboard_page(
    State(state): State<CombinedState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let data = build_dashboard_data(&state, query)
        .await
        .inspect_err(|error| tracing::error!("could not build dashboard: {error}"))?;

    Ok(dashboard_view(&data).into_response())
}

async fn build_dashboard_data(
    state: &CombinedState,
    query: DashboardQuery,
) -> Result<DashboardData, Error> {
    let month = query
        .month
        .filter(|month| !month.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MONTH.to_owned());
    let month_label = parse_month(&month)
        .map(|month| month.to_string())
        .unwrap_or_else(|| UNKNOWN_MONTH_LABEL.to_owned());
    let search = query.search.unwrap_or_default();
    let page = Page::from_params(query.page.as_deref(), None, &state.pagination_config);

    let listing_query = ListingQuery {
        search: Some(search.clone()),
        page: Some(page.number.to_string()),
        per_page: Some(page.size.to_string()),
        month: Some(month.clone()),
    };
    let report = build_month_report(state, Some(&month), &listing_query).await?;

    Ok(DashboardData {
        month,
        month_label,
        search,
        page,
        report,
    })
}

/// The dashboard URL for `page` that keeps the current month and search.
fn page_url(data: &DashboardData, page: u64) -> String {
    let query = DashboardQuery {
        month: Some(data.month.clone()),
        search: Some(data.search.clone()).filter(|search| !search.is_empty()),
        page: Some(page.to_string()),
    };

    match serde_urlencoded::to_string(&query) {
        Ok(query_string) => format!("{}?{query_string}", endpoints::DASHBOARD_VIEW),
        Err(error) => {
            tracing::error!("could not encode dashboard query: {error}");
            endpoints::DASHBOARD_VIEW.to_owned()
        }
    }
}

fn filter_form(data: &DashboardData) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="w-full flex flex-col md:flex-row gap-4 items-end mb-6"
        {
            div class="w-full"
            {
                label for="search" class=(FORM_LABEL_STYLE) { "Search transaction" }
                input
                    type="search"
                    name="search"
                    id="search"
                    value=(data.search)
                    placeholder="Title, description or price"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="w-full md:w-60"
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }
                select name="month" id="month" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for name in month_names() {
                        option value=(name) selected[name == data.month_label] { (name) }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
        }
    }
}

fn pager(data: &DashboardData) -> Markup {
    let has_previous = data.page.number > 1;
    let has_next = data.report.transactions.len() as u64 == data.page.size;

    html! {
        nav class="w-full flex justify-between items-center my-4" aria-label="Pagination"
        {
            span
            {
                @if has_previous {
                    (link(&page_url(data, data.page.number - 1), "Previous"))
                }
            }

            span class="text-sm" { "Page " (data.page.number) }

            span
            {
                @if has_next {
                    (link(&page_url(data, data.page.number + 1), "Next"))
                }
            }
        }
    }
}

fn dashboard_view(data: &DashboardData) -> Markup {
    let charts = [
        DashboardChart::new(
            "price-range-chart",
            &price_range_chart(&data.month_label, &data.report.bar_chart),
        ),
        DashboardChart::new(
            "category-chart",
            &category_chart(&data.month_label, &data.report.pie_chart),
        ),
    ];

    let content = html!(
        div class={(PAGE_CONTAINER_STYLE) " max-w-screen-xl"}
        {
            h1 class="text-2xl font-bold mb-6" { "Transaction Dashboard" }

            (filter_form(data))
            (transactions_table(&data.report.transactions))
            (pager(data))

            div class="w-full flex flex-col items-center gap-4"
            {
                (statistics_table(&data.month_label, &data.report.statistics))
                (charts_view(&charts))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}
