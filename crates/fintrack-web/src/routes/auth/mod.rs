//! Auth routes - Login, registration, logout
//!
//! Structure:
//! - api.rs: Form submissions and logout
//! - page.rs: Login and registration cards

pub mod api;
pub mod page;

pub use api::{htmx_login_submit, htmx_logout, htmx_register_submit};
pub use page::{page_login, page_register};
