//! Transactions page rendering
//!
//! Endpoints:
//! - page_transactions: Page shell that loads the list fragment
//!
//! Helper functions:
//! - render_transactions: Toolbar, form and table for a view state

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;

use fintrack_core::{
    Category, CategoryIndex, FieldErrors, PageView, Transaction, TransactionForm, TransactionsData,
    ViewState,
};
use fintrack_utils::{escape_html, format_amount, format_naive_date};

use crate::routes::{field_error, select_options, INPUT_CLASS, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::{error_banner, page_response, AppState};

const CONTENT_TARGET: &str = "hx-target='#transactions-content' hx-swap='outerHTML'";

/// Transactions page - mounts a fresh view and lets HTMX fetch the list
pub async fn page_transactions(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let ticket = state.views.transactions.write().await.mount();
    let user = state.auth.user().await;
    Html(page_response(
        &headers,
        "Transactions",
        "/transactions",
        user.as_deref(),
        &loading_placeholder(ticket.generation()),
    ))
}

pub(crate) fn loading_placeholder(generation: u64) -> String {
    format!(
        "<div id='transactions-content' hx-get='/transactions/list?view={}' hx-trigger='load' hx-swap='outerHTML'>\
         <div class='text-gray-500'>Loading transactions...</div></div>",
        generation
    )
}

/// Render the page content; `form` and `errors` fill the create form when it is open
pub(crate) fn render_transactions(
    view: &PageView<TransactionsData>,
    form: &TransactionForm,
    errors: &FieldErrors,
) -> String {
    let data = match view.state() {
        ViewState::Loading => return loading_placeholder(view.generation()),
        ViewState::Failed(message) => {
            return format!("<div id='transactions-content'>{}</div>", error_banner(message))
        }
        ViewState::Ready(data) => data,
    };

    let toggle_label = if view.form_open() { "Cancel" } else { "Add Transaction" };
    let notice = view.notice().map(error_banner).unwrap_or_default();
    let form_html = if view.form_open() {
        render_form(form, errors, &data.categories)
    } else {
        String::new()
    };

    format!(
        r#"<div id='transactions-content' class='transactions-page'>
    <div class='flex items-center justify-between mb-4'>
        <h2 class='text-2xl font-bold'>Transactions</h2>
        <button hx-post='/transactions/form' {} class='{}'>{}</button>
    </div>
    {}
    {}
    {}
</div>"#,
        CONTENT_TARGET,
        PRIMARY_BUTTON,
        toggle_label,
        notice,
        form_html,
        render_table(data)
    )
}

fn render_form(form: &TransactionForm, errors: &FieldErrors, categories: &[Category]) -> String {
    let type_options = ["expense", "income"]
        .iter()
        .map(|kind| {
            let selected = if form.kind == *kind { " selected" } else { "" };
            let label = if *kind == "expense" { "Expense" } else { "Income" };
            format!("<option value='{}'{}>{}</option>", kind, selected, label)
        })
        .collect::<String>();
    let category_options = select_options(
        "-- Select Category --",
        categories.iter().map(|c| (c.id.to_string(), c.name.as_str())),
        &form.category_id,
    );
    let general = errors.general_message().map(error_banner).unwrap_or_default();

    format!(
        r#"<div class='transaction-form-card bg-white rounded-xl border p-5 mb-6'>
    <h3 class='text-lg font-semibold mb-4'>New Transaction</h3>
    {general}
    <form hx-post='/transactions' {target} class='grid grid-cols-1 md:grid-cols-2 gap-4'>
        <div>
            <label for='amount' class='block text-sm font-medium mb-1'>Amount</label>
            <input type='number' id='amount' name='amount' value='{amount}' step='0.01' min='0' placeholder='0.00' required class='{input}'>
            {amount_error}
        </div>
        <div>
            <label for='type' class='block text-sm font-medium mb-1'>Type</label>
            <select id='type' name='type' class='{input}'>{type_options}</select>
            {type_error}
        </div>
        <div>
            <label for='date' class='block text-sm font-medium mb-1'>Date</label>
            <input type='date' id='date' name='date' value='{date}' required class='{input}'>
            {date_error}
        </div>
        <div>
            <label for='category_id' class='block text-sm font-medium mb-1'>Category</label>
            <select id='category_id' name='category_id' class='{input}'>{category_options}</select>
            {category_error}
        </div>
        <div class='md:col-span-2'>
            <label for='description' class='block text-sm font-medium mb-1'>Description</label>
            <input type='text' id='description' name='description' value='{description}' placeholder='What was this for?' required class='{input}'>
            {description_error}
        </div>
        <input type='hidden' name='currency' value='{currency}'>
        <div class='md:col-span-2 flex gap-2'>
            <button type='submit' class='{primary}'>Save Transaction</button>
            <button type='button' hx-post='/transactions/form' {target} class='{secondary}'>Cancel</button>
        </div>
    </form>
</div>"#,
        general = general,
        target = CONTENT_TARGET,
        input = INPUT_CLASS,
        primary = PRIMARY_BUTTON,
        secondary = SECONDARY_BUTTON,
        amount = escape_html(&form.amount),
        amount_error = field_error(errors, "amount"),
        type_options = type_options,
        type_error = field_error(errors, "type"),
        date = escape_html(&form.date),
        date_error = field_error(errors, "date"),
        category_options = category_options,
        category_error = field_error(errors, "category_id"),
        description = escape_html(&form.description),
        description_error = field_error(errors, "description"),
        currency = escape_html(&form.currency),
    )
}

fn render_table(data: &TransactionsData) -> String {
    if data.transactions.is_empty() {
        return "<div class='bg-white rounded-xl border p-8 text-center text-gray-500'>\
                No transactions found. Add your first transaction!</div>"
            .to_string();
    }

    let index = CategoryIndex::new(&data.categories);
    let rows = data
        .transactions
        .iter()
        .map(|tx| render_row(tx, &index))
        .collect::<String>();

    format!(
        r#"<div class='bg-white rounded-xl border overflow-hidden'>
    <table class='transactions-table w-full text-sm'>
        <thead class='bg-gray-50 text-left text-gray-500'>
            <tr><th class='px-4 py-2'>Date</th><th class='px-4 py-2'>Description</th><th class='px-4 py-2'>Category</th><th class='px-4 py-2 text-right'>Amount</th><th class='px-4 py-2'>Actions</th></tr>
        </thead>
        <tbody>{}</tbody>
    </table>
</div>"#,
        rows
    )
}

fn render_row(tx: &Transaction, index: &CategoryIndex<'_>) -> String {
    let category = tx
        .category_id
        .map(|id| {
            format!(
                "<span class='category-tag px-2 py-0.5 rounded text-white text-xs' style='background-color: {}'>{}</span>",
                escape_html(index.color_or(id, "#ccc")),
                escape_html(index.name_or(id, "Uncategorized"))
            )
        })
        .unwrap_or_default();
    let (sign, class) = if tx.is_income() {
        ("+", "income text-green-600")
    } else {
        ("-", "expense text-red-600")
    };

    format!(
        r#"<tr id='transaction-{id}' class='border-t'>
    <td class='px-4 py-2'>{date}</td>
    <td class='px-4 py-2'>{description}</td>
    <td class='px-4 py-2'>{category}</td>
    <td class='px-4 py-2 text-right font-medium {class}'>{sign}{amount}</td>
    <td class='px-4 py-2'>
        <button hx-delete='/transactions/{id}' hx-confirm='Are you sure you want to delete this transaction?' {target} class='delete-button text-red-600 hover:underline'>Delete</button>
    </td>
</tr>"#,
        id = tx.id,
        date = format_naive_date(tx.date),
        description = escape_html(&tx.description),
        category = category,
        class = class,
        sign = sign,
        amount = format_amount(tx.amount),
        target = CONTENT_TARGET,
    )
}
