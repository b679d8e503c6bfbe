//! Dashboard page rendering
//!
//! Endpoints:
//! - page_dashboard: Page shell that loads the summary fragment
//!
//! Helper functions:
//! - render_dashboard: Summary cards and category bars for a view state

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;

use fintrack_core::{CategorySpend, DashboardData, ViewState};
use fintrack_utils::{escape_html, format_currency};

use crate::{error_banner, page_response, AppState};

/// Dashboard page - mounts a fresh view and lets HTMX fetch the data
pub async fn page_dashboard(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let ticket = state.views.dashboard.write().await.mount();
    let user = state.auth.user().await;
    Html(page_response(
        &headers,
        "Dashboard",
        "/",
        user.as_deref(),
        &loading_placeholder(ticket.generation()),
    ))
}

pub(crate) fn loading_placeholder(generation: u64) -> String {
    format!(
        "<div id='dashboard-content' hx-get='/dashboard/summary?view={}' hx-trigger='load' hx-swap='outerHTML'>\
         <div class='text-gray-500'>Loading dashboard data...</div></div>",
        generation
    )
}

pub(crate) fn render_dashboard(state: &ViewState<DashboardData>, generation: u64) -> String {
    match state {
        ViewState::Loading => loading_placeholder(generation),
        ViewState::Failed(message) => format!("<div id='dashboard-content'>{}</div>", error_banner(message)),
        ViewState::Ready(data) => render_ready(data),
    }
}

fn render_ready(data: &DashboardData) -> String {
    let summary = &data.summary;
    let cards = [
        ("Income", "income", "text-green-600", summary.total_income),
        ("Expenses", "expenses", "text-red-600", summary.total_expenses),
        ("Balance", "balance", "text-indigo-600", summary.net_balance),
    ]
    .iter()
    .map(|(title, class, color, amount)| {
        format!(
            r#"<div class='summary-card {} bg-white rounded-xl border p-5'>
                <h3 class='text-sm text-gray-500 mb-1'>{}</h3>
                <div class='amount text-2xl font-bold {}'>{}</div>
            </div>"#,
            class,
            title,
            color,
            format_currency(*amount)
        )
    })
    .collect::<String>();

    let categories = if data.top_categories.is_empty() {
        "<p class='text-gray-500'>No expense data available.</p>".to_string()
    } else {
        format!(
            "<div class='category-list space-y-3'>{}</div>",
            data.top_categories.iter().map(render_category).collect::<String>()
        )
    };

    format!(
        r#"<div id='dashboard-content' class='dashboard-page'>
    <h2 class='text-2xl font-bold mb-6'>Financial Dashboard</h2>
    <div class='summary-cards grid grid-cols-1 md:grid-cols-3 gap-4 mb-6'>{}</div>
    <div class='dashboard-section bg-white rounded-xl border p-5'>
        <h3 class='text-lg font-semibold mb-4'>Top Expense Categories</h3>
        {}
    </div>
</div>"#,
        cards, categories
    )
}

fn render_category(category: &CategorySpend) -> String {
    let color = escape_html(&category.color);
    format!(
        r#"<div class='category-item'>
    <div class='category-info flex justify-between text-sm mb-1'>
        <div class='category-name flex items-center gap-2'>
            <span class='category-color inline-block w-3 h-3 rounded-full' style='background-color: {}'></span>{}
        </div>
        <div class='category-amount'>{}</div>
    </div>
    <div class='category-bar-container h-2 bg-gray-100 rounded'>
        <div class='category-bar h-2 rounded' style='width: {:.2}%; background-color: {}'></div>
    </div>
</div>"#,
        color,
        escape_html(&category.name),
        format_currency(category.amount),
        category.percentage,
        color
    )
}
