//! Transactions HTMX endpoints
//!
//! Endpoints:
//! - htmx_transactions_list: Load the list for a mount (HTML fragment)
//! - htmx_transaction_form_toggle: Switch between list and form (HTML fragment)
//! - htmx_transaction_store: Create a transaction (HTMX)
//! - htmx_transaction_delete: Delete a transaction (HTMX)

use axum::extract::{Path, Query, State};
use axum::response::Html;
use std::collections::HashMap;

use fintrack_core::period::today;
use fintrack_core::{FieldErrors, TransactionForm, TransactionsData};

use super::page::render_transactions;
use crate::routes::load_view;
use crate::{form_value, parse_form, view_param, AppState};

/// HTMX: Load transactions and categories for the mount named by `?view=`
pub async fn htmx_transactions_list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let generation = view_param(&params);
    let api = state.api.clone();

    load_view(&state.views.transactions, generation, move || async move {
        match tokio::try_join!(api.list_transactions(), api.list_categories()) {
            Ok((transactions, categories)) => Ok(TransactionsData {
                transactions,
                categories,
            }),
            Err(e) => {
                log::error!("Error fetching transactions: {}", e);
                Err("Failed to load transactions".to_string())
            }
        }
    })
    .await;

    // an older mount (another tab) gets the current state
    let view = state.views.transactions.read().await;
    Html(render_transactions(&view, &TransactionForm::blank(today()), &FieldErrors::new()))
}

/// HTMX: Show or hide the create form
pub async fn htmx_transaction_form_toggle(State(state): State<AppState>) -> Html<String> {
    let mut view = state.views.transactions.write().await;
    view.toggle_form();
    view.clear_notice();
    Html(render_transactions(&view, &TransactionForm::blank(today()), &FieldErrors::new()))
}

/// HTMX: Validate the form, create the transaction and prepend it to the list
pub async fn htmx_transaction_store(State(state): State<AppState>, body: String) -> Html<String> {
    let params = parse_form(&body);
    let form = TransactionForm {
        amount: form_value(&params, "amount"),
        description: form_value(&params, "description"),
        date: form_value(&params, "date"),
        kind: form_value(&params, "type"),
        category_id: form_value(&params, "category_id"),
        currency: form_value(&params, "currency"),
    };

    let generation = {
        let view = state.views.transactions.read().await;
        if view.data().is_none() {
            return Html(render_transactions(&view, &form, &FieldErrors::new()));
        }
        view.generation()
    };

    let new_transaction = match form.parse() {
        Ok(new_transaction) => new_transaction,
        Err(errors) => {
            let view = state.views.transactions.read().await;
            return Html(render_transactions(&view, &form, &errors));
        }
    };

    let result = state.api.create_transaction(&new_transaction).await;

    let mut view = state.views.transactions.write().await;
    if view.generation() != generation {
        return Html(render_transactions(&view, &TransactionForm::blank(today()), &FieldErrors::new()));
    }
    match result {
        Ok(created) => {
            log::info!("Created transaction {}", created.id);
            if let Some(data) = view.data_mut() {
                data.prepend(created);
            }
            view.close_form();
            view.clear_notice();
            Html(render_transactions(&view, &TransactionForm::blank(today()), &FieldErrors::new()))
        }
        Err(e) => {
            log::error!("Error creating transaction: {}", e);
            view.set_notice("Failed to create transaction");
            Html(render_transactions(&view, &form, &FieldErrors::new()))
        }
    }
}

/// HTMX: Delete a confirmed transaction and drop exactly that row
pub async fn htmx_transaction_delete(State(state): State<AppState>, Path(id): Path<i64>) -> Html<String> {
    let result = state.api.delete_transaction(id).await;

    let mut view = state.views.transactions.write().await;
    match result {
        Ok(()) => {
            if let Some(data) = view.data_mut() {
                data.remove(id);
            }
            view.clear_notice();
        }
        Err(e) => {
            log::error!("Error deleting transaction {}: {}", id, e);
            view.set_notice("Failed to delete transaction");
        }
    }
    Html(render_transactions(&view, &TransactionForm::blank(today()), &FieldErrors::new()))
}

#[cfg(test)]
mod tests {
    use crate::testing::{harness, Harness};
    use chrono::NaiveDate;
    use fintrack_client::{ErrorKind, MockStore};
    use fintrack_core::{Transaction, TransactionType};
    use rust_decimal::Decimal;

    async fn loaded(store: MockStore) -> (Harness, String) {
        let h = harness(store, true).await;
        let page = h.get("/transactions").await;
        assert!(page.body.contains("Loading transactions..."));
        let generation = Harness::view_from(&page.body);
        let body = h.htmx_get(&format!("/transactions/list?view={}", generation)).await.body;
        (h, body)
    }

    #[tokio::test]
    async fn test_list_renders_rows() {
        let h = harness(MockStore::seeded(), true).await;
        let generation = Harness::view_from(&h.get("/transactions").await.body);
        let reply = h.htmx_get(&format!("/transactions/list?view={}", generation)).await;

        assert!(reply.body.contains("id='transactions-content'"));
        assert!(reply.body.contains("Monthly rent"));
        assert!(reply.body.contains("-12,000.00"));
        assert!(reply.body.contains("+90,000.00"));
        assert!(reply.body.contains("5/6/2025"));
        assert!(reply.body.contains(">Housing</span>"));
        assert!(reply.body.contains("Add Transaction"));
        assert_eq!(h.store.call_count("transactions.list"), 1);
        assert_eq!(h.store.call_count("categories.list"), 1);
    }

    #[tokio::test]
    async fn test_unknown_category_tag() {
        let store = MockStore::empty();
        store.insert_transaction(Transaction {
            id: 1,
            amount: Decimal::from(50),
            description: "Mystery".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            kind: TransactionType::Expense,
            category_id: Some(99),
            currency: "INR".to_string(),
            user_id: None,
        });
        let (_, body) = loaded(store).await;
        assert!(body.contains("Uncategorized"));
        assert!(body.contains("#ccc"));
    }

    #[tokio::test]
    async fn test_older_tab_renders_loaded_list() {
        let h = harness(MockStore::seeded(), true).await;
        let first = Harness::view_from(&h.get("/transactions").await.body);
        let second = Harness::view_from(&h.get("/transactions").await.body);
        h.htmx_get(&format!("/transactions/list?view={}", second)).await;

        let reply = h.htmx_get(&format!("/transactions/list?view={}", first)).await;
        assert!(reply.body.contains("Monthly rent"));
        assert_eq!(h.store.call_count("transactions.list"), 1);
    }

    #[tokio::test]
    async fn test_empty_state() {
        let (_, body) = loaded(MockStore::empty()).await;
        assert!(body.contains("No transactions found. Add your first transaction!"));
        assert!(!body.contains("<table"));
    }

    #[tokio::test]
    async fn test_load_failure() {
        let h = harness(MockStore::seeded(), true).await;
        let generation = Harness::view_from(&h.get("/transactions").await.body);
        h.store.fail_with(Some(ErrorKind::Unavailable));
        let reply = h.htmx_get(&format!("/transactions/list?view={}", generation)).await;
        assert!(reply.body.contains("Failed to load transactions"));
        assert!(!reply.body.contains("<table"));
    }

    #[tokio::test]
    async fn test_toggle_form() {
        let (h, _) = loaded(MockStore::seeded()).await;
        let open = h.post_form("/transactions/form", "").await;
        assert!(open.body.contains("New Transaction"));
        assert!(open.body.contains("-- Select Category --"));
        assert!(open.body.contains("name='currency' value='INR'"));
        assert!(open.body.contains(">Cancel</button>"));

        let closed = h.post_form("/transactions/form", "").await;
        assert!(!closed.body.contains("New Transaction"));
        assert!(closed.body.contains("Add Transaction"));
    }

    #[tokio::test]
    async fn test_create_prepends_and_closes_form() {
        let (h, _) = loaded(MockStore::seeded()).await;
        h.post_form("/transactions/form", "").await;
        let reply = h
            .post_form(
                "/transactions",
                "amount=250.50&type=expense&date=2025-06-12&category_id=3&description=Team+lunch&currency=INR",
            )
            .await;

        assert_eq!(h.store.call_count("transactions.create"), 1);
        assert_eq!(h.store.transactions().len(), 6);
        let first_row = reply.body.find("<tr id='transaction-").unwrap();
        assert!(reply.body[first_row..].starts_with("<tr id='transaction-6'"));
        assert!(reply.body.contains("Team lunch"));
        assert!(reply.body.contains("-250.50"));
        assert!(!reply.body.contains("New Transaction"));
    }

    #[tokio::test]
    async fn test_create_validation_blocks_request() {
        let (h, _) = loaded(MockStore::seeded()).await;
        h.post_form("/transactions/form", "").await;
        let reply = h
            .post_form("/transactions", "amount=&type=expense&date=2025-06-12&description=Snacks")
            .await;
        assert!(reply.body.contains("Amount is required"));
        assert!(reply.body.contains("value='Snacks'"));
        assert_eq!(h.store.call_count("transactions.create"), 0);
    }

    #[tokio::test]
    async fn test_create_failure_keeps_list() {
        let (h, _) = loaded(MockStore::seeded()).await;
        h.post_form("/transactions/form", "").await;
        h.store.fail_with(Some(ErrorKind::Server));
        let reply = h
            .post_form("/transactions", "amount=10&type=income&date=2025-06-12&description=Refund")
            .await;
        assert!(reply.body.contains("Failed to create transaction"));
        assert!(reply.body.contains("Monthly rent"));
        assert_eq!(h.store.transactions().len(), 5);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation_prompt() {
        let (h, body) = loaded(MockStore::seeded()).await;
        assert!(body.contains(
            "hx-delete='/transactions/3' hx-confirm='Are you sure you want to delete this transaction?'"
        ));
        assert_eq!(h.store.call_count("transactions.delete"), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let (h, _) = loaded(MockStore::seeded()).await;
        let reply = h.delete("/transactions/3").await;

        let ids: Vec<i64> = h.store.transactions().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);
        assert!(!reply.body.contains("Grocery shopping"));
        for kept in ["Monthly rent", "Salary", "Gas", "Electric bill"] {
            assert!(reply.body.contains(kept), "{}", kept);
        }
    }

    #[tokio::test]
    async fn test_delete_failure_leaves_list() {
        let (h, _) = loaded(MockStore::seeded()).await;
        h.store.fail_with(Some(ErrorKind::NotFound));
        let reply = h.delete("/transactions/3").await;
        assert!(reply.body.contains("Failed to delete transaction"));
        assert!(reply.body.contains("Grocery shopping"));
    }
}
