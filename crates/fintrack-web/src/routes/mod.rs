//! Route modules for the web front-end
//!
//! Each page module follows the same structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: HTMX fragment endpoints (and JSON where offered)
//! - page.rs: Full page rendering

pub mod auth;
pub mod budgets;
pub mod dashboard;
pub mod transactions;

use std::future::Future;
use tokio::sync::RwLock;

use fintrack_core::{FieldErrors, PageView};
use fintrack_utils::escape_html;

/// Run `loader` for the mount identified by `generation` and store its outcome.
///
/// Nothing is fetched when that mount is no longer pending. The lock is not
/// held while the loader runs, so a teardown in the meantime wins.
pub(crate) async fn load_view<D, F, Fut>(view: &RwLock<PageView<D>>, generation: u64, loader: F)
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<D, String>>,
{
    let ticket = view.read().await.pending_ticket(generation);
    let Some(ticket) = ticket else {
        return;
    };
    let result = loader().await;
    view.write().await.resolve(ticket, result);
}

/// Inline message under a form field
pub(crate) fn field_error(errors: &FieldErrors, field: &str) -> String {
    errors
        .get(field)
        .map(|message| {
            format!(
                "<p class='field-error text-sm text-red-600 mt-1'>{}</p>",
                escape_html(message)
            )
        })
        .unwrap_or_default()
}

/// `<option>` list with `selected` on the matching value
pub(crate) fn select_options<'a>(
    placeholder: &str,
    options: impl Iterator<Item = (String, &'a str)>,
    selected: &str,
) -> String {
    let mut html = format!("<option value=''>{}</option>", escape_html(placeholder));
    for (value, label) in options {
        let marker = if value == selected { " selected" } else { "" };
        html.push_str(&format!(
            "<option value='{}'{}>{}</option>",
            escape_html(&value),
            marker,
            escape_html(label)
        ));
    }
    html
}

pub(crate) const INPUT_CLASS: &str = "w-full px-3 py-2 border rounded-lg focus:ring-2 focus:ring-indigo-500";
pub(crate) const PRIMARY_BUTTON: &str = "px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700";
pub(crate) const SECONDARY_BUTTON: &str = "px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200";
