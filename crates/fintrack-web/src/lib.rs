//! Web front-end with HTMX support
//!
//! Routes are organized into modules:
//! - routes::auth: Login, registration, logout
//! - routes::dashboard: Cashflow summary and top expense categories
//! - routes::transactions: Transaction list, create form, delete
//! - routes::budgets: Budget progress cards, create form, delete

pub mod error;
pub mod routes;

use axum::{
    extract::{FromRef, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get, post},
    Json, Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;

use fintrack_client::ApiRef;
use fintrack_config::Config;
use fintrack_core::{AuthContext, PageViews};
use fintrack_utils::escape_html;

pub use error::WebError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub api: ApiRef,
    pub auth: AuthContext,
    /// One set of page views for the whole server. Every browser tab shares
    /// it, so a fragment from an older mount renders whatever is current.
    pub views: Arc<PageViews>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(api: ApiRef, auth: AuthContext, config: Config) -> Self {
        Self {
            api,
            auth,
            views: Arc::new(PageViews::new()),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for AuthContext {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use crate::routes::auth::{htmx_login_submit, htmx_logout, htmx_register_submit, page_login, page_register};
    use crate::routes::budgets::{
        htmx_budget_delete, htmx_budget_form_toggle, htmx_budget_retry, htmx_budget_store,
        htmx_budgets_list, page_budgets,
    };
    use crate::routes::dashboard::{api_summary, htmx_dashboard_summary, page_dashboard};
    use crate::routes::transactions::{
        htmx_transaction_delete, htmx_transaction_form_toggle, htmx_transaction_store,
        htmx_transactions_list, page_transactions,
    };

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/summary", get(api_summary))
        // Auth pages
        .route("/login", get(page_login).post(htmx_login_submit))
        .route("/register", get(page_register).post(htmx_register_submit))
        .route("/logout", post(htmx_logout))
        // HTMX page routes
        .route("/", get(page_dashboard))
        .route("/transactions", get(page_transactions).post(htmx_transaction_store))
        .route("/budgets", get(page_budgets).post(htmx_budget_store))
        // HTMX partial routes
        .route("/dashboard/summary", get(htmx_dashboard_summary))
        .route("/transactions/list", get(htmx_transactions_list))
        .route("/transactions/form", post(htmx_transaction_form_toggle))
        .route("/transactions/:id", delete(htmx_transaction_delete))
        .route("/budgets/list", get(htmx_budgets_list))
        .route("/budgets/form", post(htmx_budget_form_toggle))
        .route("/budgets/retry", post(htmx_budget_retry))
        .route("/budgets/:id", delete(htmx_budget_delete))
        .fallback(unknown_path)
        .layer(middleware::from_fn_with_state(state.clone(), route_gate))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Authenticated users land on the dashboard for any unknown path
async fn unknown_path(headers: HeaderMap) -> Response {
    redirect(&headers, "/")
}

const PUBLIC_PATHS: [&str; 2] = ["/login", "/register"];

/// Route gating driven by the auth context alone
async fn route_gate(State(auth): State<AuthContext>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if path == "/api/health" {
        return next.run(request).await;
    }

    let authenticated = auth.is_authenticated().await;
    let public = PUBLIC_PATHS.contains(&path.as_str());

    match (authenticated, public) {
        (true, true) => redirect(request.headers(), "/"),
        (false, false) if path.starts_with("/api/") => WebError::Unauthorized.into_response(),
        (false, false) => redirect(request.headers(), "/login"),
        _ => next.run(request).await,
    }
}

/// Full-page navigation; HTMX requests get an `HX-Redirect` header instead
pub fn redirect(headers: &HeaderMap, to: &str) -> Response {
    if is_htmx_request(headers) {
        let mut response = StatusCode::OK.into_response();
        if let Ok(value) = HeaderValue::from_str(to) {
            response.headers_mut().insert("hx-redirect", value);
        }
        response
    } else {
        Redirect::to(to).into_response()
    }
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en-IN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Finance Tracker</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        escape_html(title),
        content
    )
}

/// Top bar with the app title and the logout button
pub fn header_bar(user: Option<&str>) -> String {
    let user_label = user
        .map(|u| format!("<span class='text-sm text-gray-500'>{}</span>", escape_html(u)))
        .unwrap_or_default();
    format!(
        r#"<header class='flex items-center justify-between px-6 py-3 bg-white border-b'>
    <h1 class='text-xl font-bold text-indigo-600'>Finance Tracker</h1>
    <div class='flex items-center gap-4'>
        {}
        <form method='post' action='/logout'>
            <button type='submit' class='px-3 py-1.5 text-sm border rounded-lg hover:bg-gray-50'>Logout</button>
        </form>
    </div>
</header>"#,
        user_label
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/", "Dashboard"),
        ("/transactions", "Transactions"),
        ("/budgets", "Budgets"),
    ];

    let mut nav = String::from("<nav class='bg-white border-r h-full'><ul class='py-2 space-y-1 px-2'>");
    for (path, label) in &links {
        let is_active = if *path == "/" {
            current_path == "/"
        } else {
            current_path.starts_with(path)
        };
        let active_class = if is_active {
            "active bg-indigo-50 text-indigo-600"
        } else {
            "text-gray-600 hover:bg-gray-50"
        };
        nav.push_str(&format!(
            "<li><a href='{}' class='block px-3 py-2 rounded-lg {}'>{}</a></li>",
            path, active_class, label
        ));
    }
    nav.push_str("</ul></nav>");
    nav
}

pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Authenticated page: full shell on navigation, bare content for HTMX
pub fn page_response(
    headers: &HeaderMap,
    title: &str,
    current_path: &str,
    user: Option<&str>,
    inner_content: &str,
) -> String {
    if is_htmx_request(headers) {
        format!("<main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>", inner_content)
    } else {
        base_html(
            title,
            &format!(
                r#"<div class='flex flex-col h-screen'>
    {}
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-56 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
                header_bar(user),
                nav_sidebar(current_path),
                inner_content
            ),
        )
    }
}

/// Login and registration pages render without the shell
pub fn auth_page_response(headers: &HeaderMap, title: &str, inner_content: &str) -> String {
    let body = format!(
        "<div id='auth-page' class='min-h-screen flex items-center justify-center p-6'>{}</div>",
        inner_content
    );
    if is_htmx_request(headers) {
        body
    } else {
        base_html(title, &body)
    }
}

/// Message banner shown above page content
pub fn error_banner(message: &str) -> String {
    format!(
        "<div class='error-message mb-4 p-3 rounded-lg bg-red-50 border border-red-200 text-red-700'>{}</div>",
        escape_html(message)
    )
}

/// Decode an `application/x-www-form-urlencoded` body
pub fn parse_form(body: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in body.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = urlencoding::decode(&key.replace('+', " "))
            .map(|s| s.into_owned())
            .unwrap_or_default();
        let value = urlencoding::decode(&value.replace('+', " "))
            .map(|s| s.into_owned())
            .unwrap_or_default();
        params.insert(key, value);
    }
    params
}

/// Read a form field, empty when absent
pub fn form_value(params: &HashMap<String, String>, key: &str) -> String {
    params.get(key).cloned().unwrap_or_default()
}

/// Page generation carried by fragment requests as `?view=N`
pub fn view_param(params: &HashMap<String, String>) -> u64 {
    params.get("view").and_then(|v| v.parse().ok()).unwrap_or(0)
}

/// Serve the router until Ctrl-C
pub async fn start_server(state: AppState) -> std::io::Result<()> {
    let addr = state.config.bind_address();
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Finance Tracker on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Dashboard)");
    log::info!("  - /transactions (Transactions)");
    log::info!("  - /budgets (Budgets)");
    log::info!("  - /login, /register (Authentication)");
    log::info!("  - /api/health, /api/summary (JSON)");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use fintrack_client::MockStore;
    use fintrack_core::MemoryTokenStore;
    use tower::ServiceExt;

    pub struct Harness {
        pub state: AppState,
        pub store: Arc<MockStore>,
    }

    pub async fn harness(store: MockStore, authenticated: bool) -> Harness {
        let store = Arc::new(store);
        let auth = AuthContext::new(Arc::new(MemoryTokenStore::new()));
        if authenticated {
            auth.login("test-token", Some("me@example.com".to_string())).await.unwrap();
        }
        let state = AppState::new(store.clone(), auth, Config::default());
        Harness { state, store }
    }

    pub struct Reply {
        pub status: StatusCode,
        pub headers: HeaderMap,
        pub body: String,
    }

    impl Reply {
        pub fn location(&self) -> Option<&str> {
            self.headers.get("location").and_then(|v| v.to_str().ok())
        }
    }

    impl Harness {
        pub async fn send(&self, request: Request<Body>) -> Reply {
            let response = create_router(self.state.clone()).oneshot(request).await.unwrap();
            let status = response.status();
            let headers = response.headers().clone();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            Reply {
                status,
                headers,
                body: String::from_utf8(bytes.to_vec()).unwrap(),
            }
        }

        pub async fn get(&self, uri: &str) -> Reply {
            self.send(Request::get(uri).body(Body::empty()).unwrap()).await
        }

        pub async fn htmx_get(&self, uri: &str) -> Reply {
            self.send(Request::get(uri).header("hx-request", "true").body(Body::empty()).unwrap())
                .await
        }

        pub async fn post_form(&self, uri: &str, body: &str) -> Reply {
            self.send(
                Request::post(uri)
                    .header("hx-request", "true")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
        }

        pub async fn delete(&self, uri: &str) -> Reply {
            self.send(Request::delete(uri).header("hx-request", "true").body(Body::empty()).unwrap())
                .await
        }

        /// Current generation of a page after its shell was requested
        pub fn view_from(body: &str) -> u64 {
            let marker = "?view=";
            let start = body.find(marker).map(|i| i + marker.len()).unwrap();
            body[start..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
                .parse()
                .unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::harness;
    use super::*;
    use fintrack_client::MockStore;

    #[tokio::test]
    async fn test_health_is_public() {
        let h = harness(MockStore::empty(), false).await;
        let reply = h.get("/api/health").await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn test_unauthenticated_redirects_to_login() {
        let h = harness(MockStore::seeded(), false).await;
        for path in ["/", "/transactions", "/budgets", "/nowhere"] {
            let reply = h.get(path).await;
            assert_eq!(reply.status, StatusCode::SEE_OTHER, "{}", path);
            assert_eq!(reply.location(), Some("/login"));
        }
        assert_eq!(h.get("/login").await.status, StatusCode::OK);
        assert_eq!(h.get("/register").await.status, StatusCode::OK);
        assert!(h.store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unauthenticated_json_is_401() {
        let h = harness(MockStore::seeded(), false).await;
        assert_eq!(h.get("/api/summary").await.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_authenticated_redirects_away_from_auth_pages() {
        let h = harness(MockStore::seeded(), true).await;
        for path in ["/login", "/register", "/does/not/exist"] {
            let reply = h.get(path).await;
            assert_eq!(reply.status, StatusCode::SEE_OTHER, "{}", path);
            assert_eq!(reply.location(), Some("/"));
        }
    }

    #[tokio::test]
    async fn test_htmx_redirect_header() {
        let h = harness(MockStore::seeded(), false).await;
        let reply = h.htmx_get("/budgets").await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.headers.get("hx-redirect").unwrap(), "/login");
    }

    #[tokio::test]
    async fn test_shell_has_header_and_sidebar() {
        let h = harness(MockStore::seeded(), true).await;
        let reply = h.get("/transactions").await;
        assert!(reply.body.contains("Finance Tracker"));
        assert!(reply.body.contains("Logout"));
        assert!(reply.body.contains("<a href='/transactions' class='block px-3 py-2 rounded-lg active"));
        assert!(reply.body.contains("<a href='/' class='block px-3 py-2 rounded-lg text-gray-600"));
    }

    #[test]
    fn test_parse_form() {
        let params = parse_form("email=me%40example.com&description=Grocery+run&empty=&flag");
        assert_eq!(params["email"], "me@example.com");
        assert_eq!(params["description"], "Grocery run");
        assert_eq!(params["empty"], "");
        assert_eq!(params["flag"], "");
        assert_eq!(form_value(&params, "missing"), "");
    }

    #[test]
    fn test_view_param() {
        let mut params = HashMap::new();
        assert_eq!(view_param(&params), 0);
        params.insert("view".to_string(), "7".to_string());
        assert_eq!(view_param(&params), 7);
    }
}
