//! Dashboard endpoints
//!
//! Endpoints:
//! - htmx_dashboard_summary: Summary cards and top categories (HTML fragment)
//! - api_summary: Cashflow summary (JSON)

use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use std::collections::HashMap;

use fintrack_core::{CashflowSummary, DashboardData};

use super::page::render_dashboard;
use crate::routes::load_view;
use crate::{view_param, AppState, WebError};

/// HTMX: Load the dashboard for the mount named by `?view=`
pub async fn htmx_dashboard_summary(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let generation = view_param(&params);
    let api = state.api.clone();

    load_view(&state.views.dashboard, generation, move || async move {
        match tokio::try_join!(api.list_transactions(), api.list_categories()) {
            Ok((transactions, categories)) => Ok(DashboardData::compute(&transactions, &categories)),
            Err(e) => {
                log::error!("Error fetching dashboard data: {}", e);
                Err("Failed to load dashboard data".to_string())
            }
        }
    })
    .await;

    // an older mount (another tab) gets the current state
    let view = state.views.dashboard.read().await;
    Html(render_dashboard(view.state(), view.generation()))
}

/// Cashflow totals over every transaction (JSON API)
pub async fn api_summary(State(state): State<AppState>) -> Result<Json<CashflowSummary>, WebError> {
    let transactions = state.api.list_transactions().await?;
    Ok(Json(CashflowSummary::from_transactions(&transactions)))
}
