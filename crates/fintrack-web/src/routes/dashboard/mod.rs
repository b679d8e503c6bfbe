//! Dashboard routes - Cashflow summary and top expense categories
//!
//! Structure:
//! - api.rs: Summary fragment and JSON summary
//! - page.rs: Page shell and fragment rendering

pub mod api;
pub mod page;

pub use api::{api_summary, htmx_dashboard_summary};
pub use page::page_dashboard;
