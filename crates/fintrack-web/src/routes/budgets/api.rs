//! Budgets HTMX endpoints
//!
//! Endpoints:
//! - htmx_budgets_list: Load budgets for a mount (HTML fragment)
//! - htmx_budget_form_toggle: Switch between cards and form (HTML fragment)
//! - htmx_budget_store: Create a budget (HTMX)
//! - htmx_budget_delete: Delete a budget (HTMX)
//! - htmx_budget_retry: Mount again after a failed load (HTML fragment)

use axum::extract::{Path, Query, State};
use axum::response::Html;
use std::collections::HashMap;

use fintrack_core::period::today;
use fintrack_core::{BudgetForm, BudgetsData, FieldErrors};

use super::page::{loading_placeholder, render_budgets};
use crate::routes::load_view;
use crate::{form_value, parse_form, view_param, AppState};

/// HTMX: Load budgets, categories and transactions for the mount named by `?view=`
pub async fn htmx_budgets_list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let generation = view_param(&params);
    let api = state.api.clone();

    load_view(&state.views.budgets, generation, move || async move {
        match tokio::try_join!(api.list_budgets(), api.list_categories(), api.list_transactions()) {
            Ok((budgets, categories, transactions)) => Ok(BudgetsData {
                budgets,
                categories,
                transactions,
            }),
            Err(e) => {
                log::error!("Error fetching budgets: {}", e);
                Err("Failed to load budgets".to_string())
            }
        }
    })
    .await;

    // an older mount (another tab) gets the current state
    let view = state.views.budgets.read().await;
    Html(render_budgets(&view, &BudgetForm::blank(today()), &FieldErrors::new()))
}

/// HTMX: Start over after a failed load
pub async fn htmx_budget_retry(State(state): State<AppState>) -> Html<String> {
    let ticket = state.views.budgets.write().await.mount();
    Html(loading_placeholder(ticket.generation()))
}

/// HTMX: Show or hide the create form
pub async fn htmx_budget_form_toggle(State(state): State<AppState>) -> Html<String> {
    let mut view = state.views.budgets.write().await;
    view.toggle_form();
    view.clear_notice();
    Html(render_budgets(&view, &BudgetForm::blank(today()), &FieldErrors::new()))
}

/// HTMX: Validate the form, create the budget and prepend its card
pub async fn htmx_budget_store(State(state): State<AppState>, body: String) -> Html<String> {
    let params = parse_form(&body);
    let form = BudgetForm {
        category_id: form_value(&params, "category_id"),
        amount: form_value(&params, "amount"),
        start_date: form_value(&params, "start_date"),
        end_date: form_value(&params, "end_date"),
    };

    let generation = {
        let view = state.views.budgets.read().await;
        if view.data().is_none() {
            return Html(render_budgets(&view, &form, &FieldErrors::new()));
        }
        view.generation()
    };

    let new_budget = match form.parse() {
        Ok(new_budget) => new_budget,
        Err(errors) => {
            let view = state.views.budgets.read().await;
            return Html(render_budgets(&view, &form, &errors));
        }
    };

    let result = state.api.create_budget(&new_budget).await;

    let mut view = state.views.budgets.write().await;
    if view.generation() != generation {
        return Html(render_budgets(&view, &BudgetForm::blank(today()), &FieldErrors::new()));
    }
    match result {
        Ok(created) => {
            log::info!("Created budget {}", created.id);
            if let Some(data) = view.data_mut() {
                data.prepend(created);
            }
            view.close_form();
            view.clear_notice();
            Html(render_budgets(&view, &BudgetForm::blank(today()), &FieldErrors::new()))
        }
        Err(e) => {
            log::error!("Error creating budget: {}", e);
            view.set_notice("Failed to create budget");
            Html(render_budgets(&view, &form, &FieldErrors::new()))
        }
    }
}

/// HTMX: Delete a confirmed budget and drop exactly that card
pub async fn htmx_budget_delete(State(state): State<AppState>, Path(id): Path<i64>) -> Html<String> {
    let result = state.api.delete_budget(id).await;

    let mut view = state.views.budgets.write().await;
    match result {
        Ok(()) => {
            if let Some(data) = view.data_mut() {
                data.remove(id);
            }
            view.clear_notice();
        }
        Err(e) => {
            log::error!("Error deleting budget {}: {}", id, e);
            view.set_notice("Failed to delete budget");
        }
    }
    Html(render_budgets(&view, &BudgetForm::blank(today()), &FieldErrors::new()))
}

#[cfg(test)]
mod tests {
    use crate::testing::{harness, Harness};
    use chrono::NaiveDate;
    use fintrack_client::{ErrorKind, MockStore};
    use fintrack_core::Budget;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    async fn loaded(store: MockStore) -> (Harness, String) {
        let h = harness(store, true).await;
        let page = h.get("/budgets").await;
        assert!(page.body.contains("Loading..."));
        let generation = Harness::view_from(&page.body);
        let body = h.htmx_get(&format!("/budgets/list?view={}", generation)).await.body;
        (h, body)
    }

    #[tokio::test]
    async fn test_empty_budgets_message() {
        let (_, body) = loaded(MockStore::empty()).await;
        assert!(body.contains("No budgets found. Create one to get started!"));
        assert!(!body.contains("Loading..."));
    }

    #[tokio::test]
    async fn test_cards_use_real_spending() {
        let (_, body) = loaded(MockStore::seeded()).await;

        // Housing: 12,000 spent against 1,300
        let housing = body.find("id='budget-1'").unwrap();
        let card = &body[housing..body.find("id='budget-2'").unwrap()];
        assert!(card.contains(">Housing</div>"));
        assert!(card.contains("₹1,300.00"));
        assert!(card.contains("₹12,000.00"));
        assert!(card.contains("-₹10,700.00"));
        assert!(card.contains("width: 100.00%; background-color: #ef4444"));
        assert!(card.contains("923% spent"));
        assert!(card.contains("1/6/2025 - 30/6/2025"));

        // Entertainment has no expenses
        let entertainment = &body[body.find("id='budget-4'").unwrap()..];
        assert!(entertainment.contains("width: 0.00%; background-color: #22c55e"));
        assert!(entertainment.contains("0% spent"));
    }

    #[tokio::test]
    async fn test_load_failure_offers_retry() {
        let h = harness(MockStore::seeded(), true).await;
        let generation = Harness::view_from(&h.get("/budgets").await.body);
        h.store.fail_with(Some(ErrorKind::Unavailable));
        let reply = h.htmx_get(&format!("/budgets/list?view={}", generation)).await;
        assert!(reply.body.contains("Failed to load budgets"));
        assert!(reply.body.contains(">Retry</button>"));

        h.store.fail_with(None);
        let retry = h.post_form("/budgets/retry", "").await;
        assert!(retry.body.contains("Loading..."));
        let next = Harness::view_from(&retry.body);
        assert!(next > generation);
        let reply = h.htmx_get(&format!("/budgets/list?view={}", next)).await;
        assert!(reply.body.contains("budget-card"));
    }

    #[tokio::test]
    async fn test_toggle_form_defaults() {
        let (h, _) = loaded(MockStore::seeded()).await;
        let reply = h.post_form("/budgets/form", "").await;
        assert!(reply.body.contains("Select a category"));
        assert!(reply.body.contains("Save Budget"));
        assert!(reply.body.contains(">Cancel</button>"));
        let today = fintrack_core::period::today().format("%Y-%m-%d").to_string();
        assert!(reply.body.contains(&format!("name='start_date' value='{}'", today)));
    }

    #[tokio::test]
    async fn test_create_requires_category() {
        let (h, _) = loaded(MockStore::seeded()).await;
        h.post_form("/budgets/form", "").await;
        let reply = h
            .post_form("/budgets", "category_id=&amount=100&start_date=2025-06-01&end_date=2025-06-30")
            .await;
        assert!(reply.body.contains("Category is required"));
        assert_eq!(h.store.call_count("budgets.create"), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_sub_cent_amount() {
        let (h, _) = loaded(MockStore::seeded()).await;
        h.post_form("/budgets/form", "").await;
        let reply = h
            .post_form(
                "/budgets",
                "category_id=1&amount=0.0000000000000000000000001&start_date=2025-06-01&end_date=2025-06-30",
            )
            .await;
        assert!(reply.body.contains("Amount can have at most 2 decimal places"));
        assert_eq!(h.store.call_count("budgets.create"), 0);
        assert_eq!(h.store.budgets().len(), 4);
    }

    #[tokio::test]
    async fn test_tiny_stored_budget_renders_capped() {
        let store = MockStore::seeded();
        store.insert_budget(Budget {
            id: 9,
            category_id: 1,
            amount: Decimal::from_str("0.0000000000000000000000001").unwrap(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            user_id: None,
        });
        let (_, body) = loaded(store).await;
        let card = &body[body.find("id='budget-9'").unwrap()..];
        assert!(card.contains("9999% spent"));
        assert!(card.contains("width: 100.00%; background-color: #ef4444"));
    }

    #[tokio::test]
    async fn test_create_prepends_with_loaded_spending() {
        let (h, _) = loaded(MockStore::seeded()).await;
        h.post_form("/budgets/form", "").await;
        let reply = h
            .post_form("/budgets", "category_id=4&amount=5000&start_date=2025-06-01&end_date=2025-06-30")
            .await;

        assert_eq!(h.store.budgets().len(), 5);
        let first_card = reply.body.find("<div id='budget-").unwrap();
        assert!(reply.body[first_card..].starts_with("<div id='budget-5'"));
        // Electric bill 3,200.50 of 5,000
        assert!(reply.body.contains("64% spent"));
        assert!(!reply.body.contains("Save Budget"));
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let (h, body) = loaded(MockStore::seeded()).await;
        assert!(body.contains("hx-confirm='Are you sure you want to delete this budget?'"));

        let reply = h.delete("/budgets/2").await;
        assert!(!reply.body.contains("id='budget-2'"));
        for kept in [1, 3, 4] {
            assert!(reply.body.contains(&format!("id='budget-{}'", kept)));
        }
        let ids: Vec<i64> = h.store.budgets().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[tokio::test]
    async fn test_delete_failure_leaves_cards() {
        let (h, _) = loaded(MockStore::seeded()).await;
        h.store.fail_with(Some(ErrorKind::Server));
        let reply = h.delete("/budgets/2").await;
        assert!(reply.body.contains("Failed to delete budget"));
        assert!(reply.body.contains("id='budget-2'"));
    }
}
