//! Opt-in mock fallback
//!
//! `Fallback` tries the primary API first. When the call fails and the
//! configured [`FallbackPolicy`] admits the failure, it logs a warning and
//! answers from the secondary instead. Everything else propagates.

use async_trait::async_trait;

use fintrack_config::FallbackPolicy;
use fintrack_core::{
    Budget, Category, NewBudget, NewCategory, NewTransaction, RegisterResponse, TokenResponse,
    Transaction,
};

use crate::error::{ClientError, ClientResult, ErrorKind};
use crate::FinanceApi;

/// Primary API with a secondary used under `policy`
#[derive(Debug)]
pub struct Fallback<P, S> {
    primary: P,
    secondary: S,
    policy: FallbackPolicy,
}

impl<P, S> Fallback<P, S> {
    pub fn new(primary: P, secondary: S, policy: FallbackPolicy) -> Self {
        Self {
            primary,
            secondary,
            policy,
        }
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }

    /// Whether `error` may be answered from the secondary
    pub fn admits(&self, error: &ClientError) -> bool {
        match self.policy {
            FallbackPolicy::Never => false,
            FallbackPolicy::Offline => error.kind() == ErrorKind::Unavailable,
            FallbackPolicy::Always => true,
        }
    }

    fn should_fall_back(&self, error: &ClientError, what: &str) -> bool {
        if self.admits(error) {
            log::warn!("Using mock {} ({})", what, error);
            true
        } else {
            false
        }
    }
}

/// Run `$call` on the primary and, when admitted, again on the secondary
macro_rules! with_fallback {
    ($self:ident, $what:expr, $api:ident => $call:expr) => {{
        let result = {
            let $api = &$self.primary;
            $call.await
        };
        match result {
            Err(error) if $self.should_fall_back(&error, $what) => {
                let $api = &$self.secondary;
                $call.await
            }
            other => other,
        }
    }};
}

#[async_trait]
impl<P: FinanceApi, S: FinanceApi> FinanceApi for Fallback<P, S> {
    async fn login(&self, email: &str, password: &str) -> ClientResult<TokenResponse> {
        with_fallback!(self, "authentication", api => api.login(email, password))
    }

    async fn register(&self, email: &str, password: &str) -> ClientResult<RegisterResponse> {
        with_fallback!(self, "registration", api => api.register(email, password))
    }

    async fn list_transactions(&self) -> ClientResult<Vec<Transaction>> {
        with_fallback!(self, "transaction data", api => api.list_transactions())
    }

    async fn get_transaction(&self, id: i64) -> ClientResult<Transaction> {
        with_fallback!(self, "transaction data", api => api.get_transaction(id))
    }

    async fn create_transaction(&self, data: &NewTransaction) -> ClientResult<Transaction> {
        with_fallback!(self, "transaction data - create operation", api => api.create_transaction(data))
    }

    async fn update_transaction(&self, id: i64, data: &NewTransaction) -> ClientResult<Transaction> {
        with_fallback!(self, "transaction data - update operation", api => api.update_transaction(id, data))
    }

    async fn delete_transaction(&self, id: i64) -> ClientResult<()> {
        with_fallback!(self, "transaction data - delete operation", api => api.delete_transaction(id))
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        with_fallback!(self, "category data", api => api.list_categories())
    }

    async fn create_category(&self, data: &NewCategory) -> ClientResult<Category> {
        with_fallback!(self, "category data - create operation", api => api.create_category(data))
    }

    async fn update_category(&self, id: i64, data: &NewCategory) -> ClientResult<Category> {
        with_fallback!(self, "category data - update operation", api => api.update_category(id, data))
    }

    async fn delete_category(&self, id: i64) -> ClientResult<()> {
        with_fallback!(self, "category data - delete operation", api => api.delete_category(id))
    }

    async fn list_budgets(&self) -> ClientResult<Vec<Budget>> {
        with_fallback!(self, "budget data", api => api.list_budgets())
    }

    async fn get_budget(&self, id: i64) -> ClientResult<Budget> {
        with_fallback!(self, "budget data", api => api.get_budget(id))
    }

    async fn create_budget(&self, data: &NewBudget) -> ClientResult<Budget> {
        with_fallback!(self, "budget data - create operation", api => api.create_budget(data))
    }

    async fn update_budget(&self, id: i64, data: &NewBudget) -> ClientResult<Budget> {
        with_fallback!(self, "budget data - update operation", api => api.update_budget(id, data))
    }

    async fn delete_budget(&self, id: i64) -> ClientResult<()> {
        with_fallback!(self, "budget data - delete operation", api => api.delete_budget(id))
    }
}
