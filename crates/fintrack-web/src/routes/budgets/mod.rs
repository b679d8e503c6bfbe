//! Budget routes - Budget progress cards, create form, delete
//!
//! Structure:
//! - api.rs: HTMX fragment endpoints
//! - page.rs: Page shell and fragment rendering

pub mod api;
pub mod page;

pub use api::{
    htmx_budget_delete, htmx_budget_form_toggle, htmx_budget_retry, htmx_budget_store,
    htmx_budgets_list,
};
pub use page::page_budgets;
