//! Login and registration pages
//!
//! Endpoints:
//! - page_login: Login card
//! - page_register: Registration card

use axum::http::HeaderMap;
use axum::response::Html;

use fintrack_core::{FieldErrors, RegisterForm};
use fintrack_utils::escape_html;

use crate::routes::{field_error, INPUT_CLASS, PRIMARY_BUTTON};
use crate::{auth_page_response, error_banner};

const FORM_TARGET: &str = "hx-target='#auth-page' hx-swap='outerHTML'";

pub async fn page_login(headers: HeaderMap) -> Html<String> {
    Html(auth_page_response(&headers, "Login", &render_login("", None)))
}

pub async fn page_register(headers: HeaderMap) -> Html<String> {
    Html(auth_page_response(
        &headers,
        "Register",
        &render_register(&RegisterForm::default(), &FieldErrors::new()),
    ))
}

fn card(title: &str, body: &str) -> String {
    format!(
        r#"<div class='auth-card w-full max-w-md bg-white rounded-xl border shadow-sm p-8'>
    <h2 class='text-2xl font-bold text-center mb-6'>{}</h2>
    {}
</div>"#,
        title, body
    )
}

/// Login card with an optional error message
pub(crate) fn render_login(email: &str, error: Option<&str>) -> String {
    let error = error.map(error_banner).unwrap_or_default();
    card(
        "Login",
        &format!(
            r#"{error}
    <form method='post' action='/login' hx-post='/login' {target} class='login-form space-y-4'>
        <div>
            <label for='email' class='block text-sm font-medium mb-1'>Email</label>
            <input type='email' id='email' name='email' value='{email}' placeholder='Enter your email' required class='{input}'>
        </div>
        <div>
            <label for='password' class='block text-sm font-medium mb-1'>Password</label>
            <input type='password' id='password' name='password' placeholder='Enter your password' required class='{input}'>
        </div>
        <button type='submit' class='w-full {primary}'>
            <span class='htmx-indicator'>Logging in...</span> Login
        </button>
    </form>
    <div class='login-footer text-sm text-center text-gray-500 mt-4'>
        Don't have an account? <a href='/register' class='text-indigo-600 hover:underline'>Register</a>
    </div>"#,
            error = error,
            target = FORM_TARGET,
            email = escape_html(email),
            input = INPUT_CLASS,
            primary = PRIMARY_BUTTON,
        ),
    )
}

/// Registration card with inline field errors
pub(crate) fn render_register(form: &RegisterForm, errors: &FieldErrors) -> String {
    let general = errors.general_message().map(error_banner).unwrap_or_default();
    card(
        "Create an Account",
        &format!(
            r#"{general}
    <form method='post' action='/register' hx-post='/register' {target} class='register-form space-y-4'>
        <div>
            <label for='email' class='block text-sm font-medium mb-1'>Email</label>
            <input type='email' id='email' name='email' value='{email}' placeholder='Enter your email' class='{input}'>
            {email_error}
        </div>
        <div>
            <label for='password' class='block text-sm font-medium mb-1'>Password</label>
            <input type='password' id='password' name='password' placeholder='Create a password' class='{input}'>
            {password_error}
        </div>
        <div>
            <label for='confirm_password' class='block text-sm font-medium mb-1'>Confirm Password</label>
            <input type='password' id='confirm_password' name='confirm_password' placeholder='Confirm your password' class='{input}'>
            {confirm_error}
        </div>
        <button type='submit' class='w-full {primary}'>
            <span class='htmx-indicator'>Creating account...</span> Register
        </button>
    </form>
    <div class='register-footer text-sm text-center text-gray-500 mt-4'>
        Already have an account? <a href='/login' class='text-indigo-600 hover:underline'>Login</a>
    </div>"#,
            general = general,
            target = FORM_TARGET,
            email = escape_html(&form.email),
            input = INPUT_CLASS,
            primary = PRIMARY_BUTTON,
            email_error = field_error(errors, "email"),
            password_error = field_error(errors, "password"),
            confirm_error = field_error(errors, "confirm_password"),
        ),
    )
}

/// Shown after a successful registration; the browser moves on after 3 seconds
pub(crate) fn render_registered() -> String {
    card(
        "Create an Account",
        r#"<div class='success-message p-3 rounded-lg bg-green-50 border border-green-200 text-green-700'>
        <p>Registration successful! Redirecting to login page...</p>
    </div>
    <script>setTimeout(function () { window.location.href = '/login'; }, 3000);</script>"#,
    )
}
