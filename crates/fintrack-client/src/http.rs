//! REST transport built on reqwest

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use fintrack_config::ApiConfig;
use fintrack_core::{
    AuthContext, Budget, Category, NewBudget, NewCategory, NewTransaction, RegisterResponse,
    TokenResponse, Transaction,
};

use crate::error::{ClientError, ClientResult};
use crate::FinanceApi;

/// FastAPI error body; `detail` is a string or a list of validation items
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

fn detail_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
            .map(str::to_string)
            .reduce(|a, b| format!("{}; {}", a, b)),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Finance API over HTTP
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
    auth: AuthContext,
}

impl HttpApi {
    /// Build a client for `config.base_url` that authenticates through `auth`
    pub fn new(config: &ApiConfig, auth: AuthContext) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the bearer token when the session holds one
    async fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.auth.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder, resource: &str) -> ClientResult<Response> {
        let response = self.authorized(builder).await.send().await.map_err(|e| {
            log::debug!("Request to {} failed: {}", resource, e);
            ClientError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail)
                .and_then(detail_text),
            Err(_) => None,
        };
        log::debug!("{} answered HTTP {}", resource, status.as_u16());
        Err(ClientError::from_status(status.as_u16(), resource, detail))
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder, resource: &str) -> ClientResult<T> {
        let response = self.execute(builder, resource).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.fetch(self.client.get(self.url(path)), path).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.fetch(self.client.post(self.url(path)).json(body), path).await
    }

    async fn put<B: Serialize + Sync, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.fetch(self.client.put(self.url(path)).json(body), path).await
    }

    /// DELETE; whatever body the server sends back is ignored
    async fn delete(&self, path: &str) -> ClientResult<()> {
        self.execute(self.client.delete(self.url(path)), path).await?;
        Ok(())
    }
}

impl std::fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApi").field("base_url", &self.base_url).finish()
    }
}

#[async_trait]
impl FinanceApi for HttpApi {
    async fn login(&self, email: &str, password: &str) -> ClientResult<TokenResponse> {
        // OAuth2 password flow: form-encoded, email goes in `username`
        let builder = self
            .client
            .post(self.url("auth/token"))
            .form(&[("username", email), ("password", password)]);
        self.fetch(builder, "auth/token").await
    }

    async fn register(&self, email: &str, password: &str) -> ClientResult<RegisterResponse> {
        self.post("auth/register", &Credentials { email, password }).await
    }

    async fn list_transactions(&self) -> ClientResult<Vec<Transaction>> {
        self.get("transactions").await
    }

    async fn get_transaction(&self, id: i64) -> ClientResult<Transaction> {
        self.get(&format!("transactions/{}", id)).await
    }

    async fn create_transaction(&self, data: &NewTransaction) -> ClientResult<Transaction> {
        self.post("transactions", data).await
    }

    async fn update_transaction(&self, id: i64, data: &NewTransaction) -> ClientResult<Transaction> {
        self.put(&format!("transactions/{}", id), data).await
    }

    async fn delete_transaction(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("transactions/{}", id)).await
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.get("categories").await
    }

    async fn create_category(&self, data: &NewCategory) -> ClientResult<Category> {
        self.post("categories", data).await
    }

    async fn update_category(&self, id: i64, data: &NewCategory) -> ClientResult<Category> {
        self.put(&format!("categories/{}", id), data).await
    }

    async fn delete_category(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("categories/{}", id)).await
    }

    async fn list_budgets(&self) -> ClientResult<Vec<Budget>> {
        self.get("budgets").await
    }

    async fn get_budget(&self, id: i64) -> ClientResult<Budget> {
        self.get(&format!("budgets/{}", id)).await
    }

    async fn create_budget(&self, data: &NewBudget) -> ClientResult<Budget> {
        self.post("budgets", data).await
    }

    async fn update_budget(&self, id: i64, data: &NewBudget) -> ClientResult<Budget> {
        self.put(&format!("budgets/{}", id), data).await
    }

    async fn delete_budget(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("budgets/{}", id)).await
    }
}
