//! In-memory demo dataset
//!
//! `MockStore` implements [`FinanceApi`] over plain vectors. It is built
//! explicitly (never implied by a failed request), keeps its writes for its
//! own lifetime, and journals every call so tests can assert which
//! operations were attempted.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use fintrack_core::{
    Budget, Category, Identified, NewBudget, NewCategory, NewTransaction, RegisterResponse,
    TokenResponse, Transaction, TransactionType,
};

use crate::error::{ClientError, ClientResult, ErrorKind};
use crate::FinanceApi;

/// Token handed out by the demo login
pub const DEMO_TOKEN: &str = "demo_token_for_development";

const DEMO_USER_ID: i64 = 1;

#[derive(Debug, Clone, Default)]
struct MockData {
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    budgets: Vec<Budget>,
}

/// Demo dataset and call journal
#[derive(Debug, Default)]
pub struct MockStore {
    data: RwLock<MockData>,
    calls: RwLock<Vec<String>>,
    failure: RwLock<Option<ErrorKind>>,
}

impl MockStore {
    /// Store holding the demo dataset
    pub fn seeded() -> Self {
        Self {
            data: RwLock::new(seed()),
            ..Self::default()
        }
    }

    /// Store with no records
    pub fn empty() -> Self {
        Self::default()
    }

    /// Restore the demo dataset and forget the journal
    pub fn reset(&self) {
        *write(&self.data) = seed();
        write(&self.calls).clear();
        *write(&self.failure) = None;
    }

    /// Make every following call fail with `kind` (None to recover)
    pub fn fail_with(&self, kind: Option<ErrorKind>) {
        *write(&self.failure) = kind;
    }

    /// Operations attempted so far, e.g. `"transactions.delete"`
    pub fn calls(&self) -> Vec<String> {
        read(&self.calls).clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        read(&self.calls).iter().filter(|c| c.as_str() == operation).count()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        read(&self.data).transactions.clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        read(&self.data).categories.clone()
    }

    pub fn budgets(&self) -> Vec<Budget> {
        read(&self.data).budgets.clone()
    }

    pub fn insert_transaction(&self, transaction: Transaction) {
        write(&self.data).transactions.push(transaction);
    }

    pub fn insert_budget(&self, budget: Budget) {
        write(&self.data).budgets.push(budget);
    }

    fn record(&self, operation: &str) -> ClientResult<()> {
        write(&self.calls).push(operation.to_string());
        match *read(&self.failure) {
            None => Ok(()),
            Some(kind) => Err(synthetic_error(kind, operation)),
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn synthetic_error(kind: ErrorKind, operation: &str) -> ClientError {
    match kind {
        ErrorKind::Unavailable => ClientError::Unavailable {
            message: format!("mock store offline during {}", operation),
        },
        ErrorKind::Unauthorized => ClientError::Unauthorized { status: 401, detail: None },
        ErrorKind::NotFound => ClientError::NotFound {
            resource: operation.to_string(),
        },
        ErrorKind::Rejected => ClientError::Rejected { status: 422, detail: None },
        ErrorKind::Server => ClientError::Server { status: 500, detail: None },
        ErrorKind::Decode => ClientError::Decode {
            message: operation.to_string(),
        },
    }
}

fn next_id<T: Identified>(items: &[T]) -> i64 {
    items.iter().map(Identified::id).max().unwrap_or(0) + 1
}

fn not_found(resource: &str, id: i64) -> ClientError {
    ClientError::NotFound {
        resource: format!("{}/{}", resource, id),
    }
}

#[async_trait]
impl FinanceApi for MockStore {
    async fn login(&self, email: &str, password: &str) -> ClientResult<TokenResponse> {
        self.record("auth.login")?;
        if email.is_empty() || password.is_empty() {
            return Err(ClientError::rejected("Invalid credentials"));
        }
        Ok(TokenResponse {
            access_token: DEMO_TOKEN.to_string(),
            token_type: Some("bearer".to_string()),
        })
    }

    async fn register(&self, email: &str, password: &str) -> ClientResult<RegisterResponse> {
        self.record("auth.register")?;
        if email.is_empty() || password.chars().count() < 6 {
            return Err(ClientError::rejected(
                "Invalid registration data. Password must be at least 6 characters.",
            ));
        }
        Ok(RegisterResponse {
            message: Some("User registered successfully".to_string()),
        })
    }

    async fn list_transactions(&self) -> ClientResult<Vec<Transaction>> {
        self.record("transactions.list")?;
        Ok(self.transactions())
    }

    async fn get_transaction(&self, id: i64) -> ClientResult<Transaction> {
        self.record("transactions.get")?;
        read(&self.data)
            .transactions
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| not_found("transactions", id))
    }

    async fn create_transaction(&self, data: &NewTransaction) -> ClientResult<Transaction> {
        self.record("transactions.create")?;
        let mut store = write(&self.data);
        let mut created = Transaction::from_new(next_id(&store.transactions), data);
        created.user_id = Some(DEMO_USER_ID);
        store.transactions.push(created.clone());
        Ok(created)
    }

    async fn update_transaction(&self, id: i64, data: &NewTransaction) -> ClientResult<Transaction> {
        self.record("transactions.update")?;
        let mut store = write(&self.data);
        let existing = store
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("transactions", id))?;
        let mut updated = Transaction::from_new(id, data);
        updated.user_id = existing.user_id;
        *existing = updated.clone();
        Ok(updated)
    }

    async fn delete_transaction(&self, id: i64) -> ClientResult<()> {
        self.record("transactions.delete")?;
        let mut store = write(&self.data);
        let index = store
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| not_found("transactions", id))?;
        store.transactions.remove(index);
        Ok(())
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.record("categories.list")?;
        Ok(self.categories())
    }

    async fn create_category(&self, data: &NewCategory) -> ClientResult<Category> {
        self.record("categories.create")?;
        let mut store = write(&self.data);
        let mut created = Category::from_new(next_id(&store.categories), data);
        created.user_id = Some(DEMO_USER_ID);
        store.categories.push(created.clone());
        Ok(created)
    }

    async fn update_category(&self, id: i64, data: &NewCategory) -> ClientResult<Category> {
        self.record("categories.update")?;
        let mut store = write(&self.data);
        let existing = store
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("categories", id))?;
        existing.name = data.name.clone();
        existing.color = data.color.clone();
        Ok(existing.clone())
    }

    async fn delete_category(&self, id: i64) -> ClientResult<()> {
        self.record("categories.delete")?;
        let mut store = write(&self.data);
        let index = store
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| not_found("categories", id))?;
        store.categories.remove(index);
        Ok(())
    }

    async fn list_budgets(&self) -> ClientResult<Vec<Budget>> {
        self.record("budgets.list")?;
        Ok(self.budgets())
    }

    async fn get_budget(&self, id: i64) -> ClientResult<Budget> {
        self.record("budgets.get")?;
        read(&self.data)
            .budgets
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| not_found("budgets", id))
    }

    async fn create_budget(&self, data: &NewBudget) -> ClientResult<Budget> {
        self.record("budgets.create")?;
        let mut store = write(&self.data);
        let mut created = Budget::from_new(next_id(&store.budgets), data);
        created.user_id = Some(DEMO_USER_ID);
        store.budgets.push(created.clone());
        Ok(created)
    }

    async fn update_budget(&self, id: i64, data: &NewBudget) -> ClientResult<Budget> {
        self.record("budgets.update")?;
        let mut store = write(&self.data);
        let existing = store
            .budgets
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| not_found("budgets", id))?;
        let mut updated = Budget::from_new(id, data);
        updated.user_id = existing.user_id;
        *existing = updated.clone();
        Ok(updated)
    }

    async fn delete_budget(&self, id: i64) -> ClientResult<()> {
        self.record("budgets.delete")?;
        let mut store = write(&self.data);
        let index = store
            .budgets
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| not_found("budgets", id))?;
        store.budgets.remove(index);
        Ok(())
    }
}

// ==================== Demo Dataset ====================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn seed() -> MockData {
    let tx = |id: i64, cents: i64, description: &str, day: u32, kind: TransactionType, category: i64| Transaction {
        id,
        amount: Decimal::new(cents, 2),
        description: description.to_string(),
        date: date(2025, 6, day),
        kind,
        category_id: Some(category),
        currency: "INR".to_string(),
        user_id: Some(DEMO_USER_ID),
    };

    let transactions = vec![
        tx(1, 1_200_000, "Monthly rent", 1, TransactionType::Expense, 1),
        tx(2, 9_000_000, "Salary", 5, TransactionType::Income, 10),
        tx(3, 250_075, "Grocery shopping", 7, TransactionType::Expense, 3),
        tx(4, 150_000, "Gas", 6, TransactionType::Expense, 2),
        tx(5, 320_050, "Electric bill", 3, TransactionType::Expense, 4),
    ];

    let categories = [
        ("Housing", "#4a6cf7"),
        ("Transportation", "#f59e0b"),
        ("Food", "#10b981"),
        ("Utilities", "#6366f1"),
        ("Entertainment", "#ec4899"),
        ("Health", "#ef4444"),
        ("Shopping", "#8b5cf6"),
        ("Personal Care", "#14b8a6"),
        ("Education", "#f97316"),
        ("Salary", "#22c55e"),
        ("Investments", "#64748b"),
        ("Gifts", "#a855f7"),
    ]
    .iter()
    .zip(1_i64..)
    .map(|((name, color), id)| Category {
        id,
        name: name.to_string(),
        color: color.to_string(),
        user_id: Some(DEMO_USER_ID),
    })
    .collect();

    let budget = |id: i64, category_id: i64, cents: i64| Budget {
        id,
        category_id,
        amount: Decimal::new(cents, 2),
        start_date: date(2025, 6, 1),
        end_date: date(2025, 6, 30),
        user_id: Some(DEMO_USER_ID),
    };

    let budgets = vec![
        budget(1, 1, 130_000),
        budget(2, 3, 40_000),
        budget(3, 2, 20_000),
        budget(4, 5, 15_000),
    ];

    MockData {
        transactions,
        categories,
        budgets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn new_tx(amount: &str) -> NewTransaction {
        NewTransaction {
            amount: Decimal::from_str(amount).unwrap(),
            description: "Coffee".to_string(),
            date: date(2025, 6, 10),
            kind: TransactionType::Expense,
            category_id: Some(3),
            currency: String::new(),
        }
    }

    #[tokio::test]
    async fn test_seeded_dataset() {
        let store = MockStore::seeded();
        let txs = store.list_transactions().await.unwrap();
        assert_eq!(txs.len(), 5);
        assert!(txs.iter().all(|t| t.currency == "INR"));
        assert_eq!(txs[2].amount, Decimal::from_str("2500.75").unwrap());

        let cats = store.list_categories().await.unwrap();
        assert_eq!(cats.len(), 12);
        assert_eq!(cats[7].name, "Personal Care");
        assert_eq!(cats[7].color, "#14b8a6");

        let budgets = store.list_budgets().await.unwrap();
        assert_eq!(budgets.len(), 4);
        assert_eq!(budgets[0].amount, Decimal::from(1300));
    }

    #[tokio::test]
    async fn test_create_uses_max_plus_one() {
        let store = MockStore::seeded();
        store.delete_transaction(3).await.unwrap();
        let created = store.create_transaction(&new_tx("42")).await.unwrap();
        assert_eq!(created.id, 6);
        assert_eq!(created.currency, "INR");
        assert_eq!(created.user_id, Some(1));
        assert_eq!(store.get_transaction(6).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_in_empty_store_starts_at_one() {
        let store = MockStore::empty();
        let created = store.create_transaction(&new_tx("1")).await.unwrap();
        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let store = MockStore::seeded();
        let err = store.update_transaction(99, &new_tx("1")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = store.delete_budget(99).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = store.get_budget(99).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let store = MockStore::seeded();
        let updated = store.update_transaction(4, &new_tx("1600")).await.unwrap();
        assert_eq!(updated.id, 4);
        assert_eq!(store.get_transaction(4).await.unwrap().amount, Decimal::from(1600));
    }

    #[tokio::test]
    async fn test_demo_auth_rules() {
        let store = MockStore::empty();
        let token = store.login("a@b.co", "pw").await.unwrap();
        assert_eq!(token.access_token, DEMO_TOKEN);

        let err = store.login("", "pw").await.unwrap_err();
        assert_eq!(err.detail(), Some("Invalid credentials"));

        let err = store.register("a@b.co", "12345").await.unwrap_err();
        assert_eq!(
            err.detail(),
            Some("Invalid registration data. Password must be at least 6 characters.")
        );
        assert!(store.register("a@b.co", "123456").await.is_ok());
    }

    #[tokio::test]
    async fn test_journal_and_reset() {
        let store = MockStore::seeded();
        store.delete_transaction(1).await.unwrap();
        store.list_transactions().await.unwrap();
        assert_eq!(store.calls(), vec!["transactions.delete", "transactions.list"]);
        assert_eq!(store.transactions().len(), 4);

        store.reset();
        assert!(store.calls().is_empty());
        assert_eq!(store.transactions().len(), 5);
    }

    #[tokio::test]
    async fn test_forced_failure() {
        let store = MockStore::seeded();
        store.fail_with(Some(ErrorKind::Unavailable));
        let err = store.list_budgets().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert_eq!(store.call_count("budgets.list"), 1);

        store.fail_with(None);
        assert!(store.list_budgets().await.is_ok());
    }
}
