//! Budgets page rendering
//!
//! Endpoints:
//! - page_budgets: Page shell that loads the budgets fragment
//!
//! Helper functions:
//! - render_budgets: Toolbar, form and progress cards for a view state

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;

use fintrack_core::{BudgetForm, BudgetProgress, BudgetsData, CategoryIndex, FieldErrors, PageView, ViewState};
use fintrack_utils::{escape_html, format_currency, format_naive_date};

use crate::routes::{field_error, select_options, INPUT_CLASS, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::{error_banner, page_response, AppState};

const CONTENT_TARGET: &str = "hx-target='#budgets-content' hx-swap='outerHTML'";
const HEADING: &str = "<h2 class='text-2xl font-bold'>Budgets</h2>";

/// Budgets page - mounts a fresh view and lets HTMX fetch the data
pub async fn page_budgets(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let ticket = state.views.budgets.write().await.mount();
    let user = state.auth.user().await;
    Html(page_response(
        &headers,
        "Budgets",
        "/budgets",
        user.as_deref(),
        &loading_placeholder(ticket.generation()),
    ))
}

pub(crate) fn loading_placeholder(generation: u64) -> String {
    format!(
        "<div id='budgets-content' class='budgets-page' hx-get='/budgets/list?view={}' hx-trigger='load' hx-swap='outerHTML'>\
         {}<p class='text-gray-500 mt-4'>Loading...</p></div>",
        generation, HEADING
    )
}

pub(crate) fn render_budgets(view: &PageView<BudgetsData>, form: &BudgetForm, errors: &FieldErrors) -> String {
    let data = match view.state() {
        ViewState::Loading => return loading_placeholder(view.generation()),
        ViewState::Failed(message) => {
            return format!(
                "<div id='budgets-content' class='budgets-page space-y-4'>{}{}\
                 <button hx-post='/budgets/retry' {} class='{}'>Retry</button></div>",
                HEADING,
                error_banner(message),
                CONTENT_TARGET,
                PRIMARY_BUTTON
            )
        }
        ViewState::Ready(data) => data,
    };

    let toggle_label = if view.form_open() { "Cancel" } else { "Create Budget" };
    let notice = view.notice().map(error_banner).unwrap_or_default();
    let form_html = if view.form_open() {
        render_form(form, errors, data)
    } else {
        String::new()
    };

    let list = if data.budgets.is_empty() {
        "<div class='no-budgets bg-white rounded-xl border p-8 text-center text-gray-500'>\
         <p>No budgets found. Create one to get started!</p></div>"
            .to_string()
    } else {
        let index = CategoryIndex::new(&data.categories);
        let cards = data
            .progress()
            .iter()
            .map(|progress| render_card(progress, &index))
            .collect::<String>();
        format!("<div class='budgets-list grid grid-cols-1 md:grid-cols-2 gap-4'>{}</div>", cards)
    };

    format!(
        r#"<div id='budgets-content' class='budgets-page'>
    <div class='budgets-header flex items-center justify-between mb-4'>
        {}
        <button hx-post='/budgets/form' {} class='{}'>{}</button>
    </div>
    {}
    {}
    {}
</div>"#,
        HEADING, CONTENT_TARGET, PRIMARY_BUTTON, toggle_label, notice, form_html, list
    )
}

fn render_form(form: &BudgetForm, errors: &FieldErrors, data: &BudgetsData) -> String {
    let category_options = select_options(
        "Select a category",
        data.categories.iter().map(|c| (c.id.to_string(), c.name.as_str())),
        &form.category_id,
    );
    let general = errors.general_message().map(error_banner).unwrap_or_default();

    format!(
        r#"<div class='budget-form-card bg-white rounded-xl border p-5 mb-6'>
    {general}
    <form hx-post='/budgets' {target} class='budget-form grid grid-cols-1 md:grid-cols-2 gap-4'>
        <div class='md:col-span-2'>
            <label for='category_id' class='block text-sm font-medium mb-1'>Category</label>
            <select id='category_id' name='category_id' required class='{input}'>{category_options}</select>
            {category_error}
        </div>
        <div class='md:col-span-2'>
            <label for='amount' class='block text-sm font-medium mb-1'>Budget Amount</label>
            <input type='number' id='amount' name='amount' value='{amount}' min='0' step='0.01' placeholder='0.00' required class='{input}'>
            {amount_error}
        </div>
        <div>
            <label for='start_date' class='block text-sm font-medium mb-1'>Start Date</label>
            <input type='date' id='start_date' name='start_date' value='{start_date}' required class='{input}'>
            {start_error}
        </div>
        <div>
            <label for='end_date' class='block text-sm font-medium mb-1'>End Date</label>
            <input type='date' id='end_date' name='end_date' value='{end_date}' required class='{input}'>
            {end_error}
        </div>
        <div class='md:col-span-2 flex gap-2'>
            <button type='submit' class='{primary}'>Save Budget</button>
            <button type='button' hx-post='/budgets/form' {target} class='{secondary}'>Cancel</button>
        </div>
    </form>
</div>"#,
        general = general,
        target = CONTENT_TARGET,
        input = INPUT_CLASS,
        primary = PRIMARY_BUTTON,
        secondary = SECONDARY_BUTTON,
        category_options = category_options,
        category_error = field_error(errors, "category_id"),
        amount = escape_html(&form.amount),
        amount_error = field_error(errors, "amount"),
        start_date = escape_html(&form.start_date),
        start_error = field_error(errors, "start_date"),
        end_date = escape_html(&form.end_date),
        end_error = field_error(errors, "end_date"),
    )
}

fn render_card(progress: &BudgetProgress, index: &CategoryIndex<'_>) -> String {
    let budget = &progress.budget;
    format!(
        r#"<div id='budget-{id}' class='budget-card bg-white rounded-xl border p-5'>
    <div class='budget-header flex items-center justify-between mb-3'>
        <div class='budget-category px-3 py-1 rounded-full text-white text-sm' style='background-color: {color}'>{name}</div>
        <div class='budget-actions'>
            <button hx-delete='/budgets/{id}' hx-confirm='Are you sure you want to delete this budget?' {target} aria-label='Delete budget' class='icon-button text-red-600 hover:underline'>Delete</button>
        </div>
    </div>
    <div class='budget-details text-sm mb-3'>
        <div class='budget-amount flex justify-between'><span>Total Budget</span><span class='value font-semibold'>{total}</span></div>
        <div class='budget-period text-gray-500'><span>{start} - {end}</span></div>
    </div>
    <div class='budget-progress-container'>
        <div class='budget-metrics flex justify-between text-sm mb-2'>
            <div class='metric'><span class='label text-gray-500'>Spent</span> <span class='value'>{spent}</span></div>
            <div class='metric'><span class='label text-gray-500'>Remaining</span> <span class='value'>{remaining}</span></div>
        </div>
        <div class='progress-wrapper h-2 bg-gray-100 rounded'>
            <div class='progress-bar h-2 rounded' style='width: {width:.2}%; background-color: {bar_color}'></div>
        </div>
        <div class='progress-label text-xs text-gray-500 mt-1'>{label}</div>
    </div>
</div>"#,
        id = budget.id,
        color = escape_html(index.color_or(budget.category_id, "#888")),
        name = escape_html(index.name_or(budget.category_id, "Unknown Category")),
        target = CONTENT_TARGET,
        total = format_currency(budget.amount),
        start = format_naive_date(budget.start_date),
        end = format_naive_date(budget.end_date),
        spent = format_currency(progress.spent),
        remaining = format_currency(progress.remaining),
        width = progress.bar_width(),
        bar_color = progress.level().color(),
        label = progress.label(),
    )
}
