//! Finance API client
//!
//! [`FinanceApi`] is the seam every page talks through. [`HttpApi`] calls the
//! REST service, [`MockStore`] answers from an in-memory demo dataset, and
//! [`Fallback`] combines the two under an explicit [`FallbackPolicy`].

use async_trait::async_trait;
use std::sync::Arc;

use fintrack_core::{
    Budget, Category, NewBudget, NewCategory, NewTransaction, RegisterResponse, TokenResponse,
    Transaction,
};

pub mod error;
pub mod fallback;
pub mod http;
pub mod mock;

pub use error::{ClientError, ClientResult, ErrorKind};
pub use fallback::Fallback;
pub use fintrack_config::FallbackPolicy;
pub use http::HttpApi;
pub use mock::MockStore;

/// API reference type
pub type ApiRef = Arc<dyn FinanceApi>;

/// Operations offered by the finance REST API
#[async_trait]
pub trait FinanceApi: Send + Sync {
    // ==================== Auth ====================

    /// Exchange credentials for a bearer token
    async fn login(&self, email: &str, password: &str) -> ClientResult<TokenResponse>;

    async fn register(&self, email: &str, password: &str) -> ClientResult<RegisterResponse>;

    // ==================== Transactions ====================

    async fn list_transactions(&self) -> ClientResult<Vec<Transaction>>;

    async fn get_transaction(&self, id: i64) -> ClientResult<Transaction>;

    async fn create_transaction(&self, data: &NewTransaction) -> ClientResult<Transaction>;

    async fn update_transaction(&self, id: i64, data: &NewTransaction) -> ClientResult<Transaction>;

    async fn delete_transaction(&self, id: i64) -> ClientResult<()>;

    // ==================== Categories ====================

    async fn list_categories(&self) -> ClientResult<Vec<Category>>;

    async fn create_category(&self, data: &NewCategory) -> ClientResult<Category>;

    async fn update_category(&self, id: i64, data: &NewCategory) -> ClientResult<Category>;

    async fn delete_category(&self, id: i64) -> ClientResult<()>;

    // ==================== Budgets ====================

    async fn list_budgets(&self) -> ClientResult<Vec<Budget>>;

    async fn get_budget(&self, id: i64) -> ClientResult<Budget>;

    async fn create_budget(&self, data: &NewBudget) -> ClientResult<Budget>;

    async fn update_budget(&self, id: i64, data: &NewBudget) -> ClientResult<Budget>;

    async fn delete_budget(&self, id: i64) -> ClientResult<()>;
}

#[async_trait]
impl<T: FinanceApi + ?Sized> FinanceApi for Arc<T> {
    async fn login(&self, email: &str, password: &str) -> ClientResult<TokenResponse> {
        (**self).login(email, password).await
    }

    async fn register(&self, email: &str, password: &str) -> ClientResult<RegisterResponse> {
        (**self).register(email, password).await
    }

    async fn list_transactions(&self) -> ClientResult<Vec<Transaction>> {
        (**self).list_transactions().await
    }

    async fn get_transaction(&self, id: i64) -> ClientResult<Transaction> {
        (**self).get_transaction(id).await
    }

    async fn create_transaction(&self, data: &NewTransaction) -> ClientResult<Transaction> {
        (**self).create_transaction(data).await
    }

    async fn update_transaction(&self, id: i64, data: &NewTransaction) -> ClientResult<Transaction> {
        (**self).update_transaction(id, data).await
    }

    async fn delete_transaction(&self, id: i64) -> ClientResult<()> {
        (**self).delete_transaction(id).await
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        (**self).list_categories().await
    }

    async fn create_category(&self, data: &NewCategory) -> ClientResult<Category> {
        (**self).create_category(data).await
    }

    async fn update_category(&self, id: i64, data: &NewCategory) -> ClientResult<Category> {
        (**self).update_category(id, data).await
    }

    async fn delete_category(&self, id: i64) -> ClientResult<()> {
        (**self).delete_category(id).await
    }

    async fn list_budgets(&self) -> ClientResult<Vec<Budget>> {
        (**self).list_budgets().await
    }

    async fn get_budget(&self, id: i64) -> ClientResult<Budget> {
        (**self).get_budget(id).await
    }

    async fn create_budget(&self, data: &NewBudget) -> ClientResult<Budget> {
        (**self).create_budget(data).await
    }

    async fn update_budget(&self, id: i64, data: &NewBudget) -> ClientResult<Budget> {
        (**self).update_budget(id, data).await
    }

    async fn delete_budget(&self, id: i64) -> ClientResult<()> {
        (**self).delete_budget(id).await
    }
}
