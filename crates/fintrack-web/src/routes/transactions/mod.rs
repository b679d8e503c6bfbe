//! Transaction routes - Transaction list, create form, delete
//!
//! Features:
//! - List transactions with their category tags
//! - Toggle between the list and the create form
//! - Delete after a browser confirmation prompt
//!
//! Structure:
//! - api.rs: HTMX fragment endpoints
//! - page.rs: Page shell and fragment rendering

pub mod api;
pub mod page;

pub use api::{
    htmx_transaction_delete, htmx_transaction_form_toggle, htmx_transaction_store,
    htmx_transactions_list,
};
pub use page::page_transactions;
