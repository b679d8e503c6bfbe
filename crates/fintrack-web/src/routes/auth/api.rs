//! Auth form submissions
//!
//! Endpoints:
//! - htmx_login_submit: Validate, log in, store the token
//! - htmx_register_submit: Validate inline, register
//! - htmx_logout: Drop the token and every page state

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};

use fintrack_core::{LoginForm, RegisterForm};

use super::page::{render_login, render_register, render_registered};
use crate::{auth_page_response, form_value, parse_form, redirect, AppState};

const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";

/// Login submission - sends the user to the dashboard on success
pub async fn htmx_login_submit(State(state): State<AppState>, headers: HeaderMap, body: String) -> Response {
    let params = parse_form(&body);
    let form = LoginForm {
        email: form_value(&params, "email").trim().to_string(),
        password: form_value(&params, "password"),
    };
    let login_page = |message: &str| {
        Html(auth_page_response(&headers, "Login", &render_login(&form.email, Some(message)))).into_response()
    };

    if let Err(errors) = form.validate() {
        return login_page(errors.general_message().unwrap_or(LOGIN_FAILED));
    }

    let token = match state.api.login(&form.email, &form.password).await {
        Ok(token) => token,
        Err(e) => {
            log::error!("Login failed: {}", e);
            return login_page(e.detail().unwrap_or(LOGIN_FAILED));
        }
    };

    if let Err(e) = state.auth.login(&token.access_token, Some(form.email.clone())).await {
        log::error!("Failed to store session: {}. {}", e, e.suggestion());
        return login_page(LOGIN_FAILED);
    }
    state.views.teardown_all().await;
    log::info!("Logged in as {}", form.email);
    redirect(&headers, "/")
}

/// Registration submission - validation errors never reach the API
pub async fn htmx_register_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Html<String> {
    let params = parse_form(&body);
    let form = RegisterForm {
        email: form_value(&params, "email"),
        password: form_value(&params, "password"),
        confirm_password: form_value(&params, "confirm_password"),
    };

    if let Err(errors) = form.validate() {
        return Html(auth_page_response(&headers, "Register", &render_register(&form, &errors)));
    }

    match state.api.register(&form.email, &form.password).await {
        Ok(_) => {
            log::info!("Registered {}", form.email);
            Html(auth_page_response(&headers, "Register", &render_registered()))
        }
        Err(e) => {
            log::error!("Registration failed: {}", e);
            let errors = fintrack_core::FieldErrors::general(e.detail().unwrap_or(REGISTRATION_FAILED));
            Html(auth_page_response(&headers, "Register", &render_register(&form, &errors)))
        }
    }
}

/// Logout - clears the token and tears down every page
pub async fn htmx_logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(e) = state.auth.logout().await {
        log::error!("Failed to clear stored session: {}. {}", e, e.suggestion());
    }
    state.views.teardown_all().await;
    redirect(&headers, "/login")
}
