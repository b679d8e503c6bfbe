//! Core finance model and page state
//!
//! Entities exchanged with the finance API, the figures derived from them,
//! form validation, the authentication context and the page view lifecycle.

pub mod auth;
pub mod error;
pub mod forms;
pub mod metrics;
pub mod models;
pub mod period;
pub mod types;
pub mod view;

pub use auth::{AuthContext, FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreRef};
pub use error::{CoreError, CoreResult};
pub use forms::{BudgetForm, FieldErrors, LoginForm, RegisterForm, TransactionForm};
pub use metrics::{
    budget_spent, top_expense_categories, BudgetProgress, CashflowSummary, CategoryIndex,
    CategorySpend, TOP_CATEGORY_LIMIT,
};
pub use models::{
    Budget, Category, Identified, NewBudget, NewCategory, NewTransaction, RegisterResponse,
    TokenResponse, Transaction,
};
pub use period::Period;
pub use types::{ProgressLevel, TransactionType};
pub use view::{
    BudgetsData, DashboardData, LoadTicket, PageView, PageViews, TransactionsData, ViewState,
};
