//! Page view lifecycle
//!
//! A page is Loading until its fetch resolves, then Ready (list or form) or
//! Failed. Every mount bumps a generation counter; a fetch that resolves
//! after the page was torn down or mounted again carries an old ticket and
//! is dropped instead of overwriting newer state.

use serde::Serialize;
use tokio::sync::RwLock;

use super::metrics::{top_expense_categories, BudgetProgress, CashflowSummary, CategorySpend, TOP_CATEGORY_LIMIT};
use super::models::{Budget, Category, Identified, Transaction};

/// Proof that a load was started by a specific mount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Page data state
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<D> {
    Loading,
    Ready(D),
    Failed(String),
}

/// One mounted page
#[derive(Debug)]
pub struct PageView<D> {
    generation: u64,
    state: ViewState<D>,
    form_open: bool,
    notice: Option<String>,
}

impl<D> Default for PageView<D> {
    fn default() -> Self {
        Self {
            generation: 0,
            state: ViewState::Loading,
            form_open: false,
            notice: None,
        }
    }
}

impl<D> PageView<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh load; any earlier ticket becomes stale
    pub fn mount(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = ViewState::Loading;
        self.form_open = false;
        self.notice = None;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Ticket for a pending load of `generation`, if that load is still wanted
    pub fn pending_ticket(&self, generation: u64) -> Option<LoadTicket> {
        if generation == self.generation && self.generation > 0 && self.is_loading() {
            Some(LoadTicket { generation })
        } else {
            None
        }
    }

    /// Apply a finished load. Returns false when the ticket is stale.
    pub fn resolve(&mut self, ticket: LoadTicket, result: Result<D, String>) -> bool {
        if ticket.generation != self.generation || !self.is_loading() {
            log::debug!(
                "Discarding stale load (ticket {}, current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.state = match result {
            Ok(data) => ViewState::Ready(data),
            Err(message) => ViewState::Failed(message),
        };
        true
    }

    /// Leave the page: in-flight loads are invalidated and data dropped
    pub fn teardown(&mut self) {
        self.generation += 1;
        self.state = ViewState::Loading;
        self.form_open = false;
        self.notice = None;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &ViewState<D> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    pub fn data(&self) -> Option<&D> {
        match &self.state {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut D> {
        match &mut self.state {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn form_open(&self) -> bool {
        self.form_open
    }

    /// Switch between list and form; only a ready page has a form
    pub fn toggle_form(&mut self) -> bool {
        if self.data().is_some() {
            self.form_open = !self.form_open;
        }
        self.form_open
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
    }

    /// Message shown above a ready list after a failed write
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}

fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: i64) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

/// Dashboard figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub summary: CashflowSummary,
    pub top_categories: Vec<CategorySpend>,
}

impl DashboardData {
    pub fn compute(transactions: &[Transaction], categories: &[Category]) -> Self {
        Self {
            summary: CashflowSummary::from_transactions(transactions),
            top_categories: top_expense_categories(transactions, categories, TOP_CATEGORY_LIMIT),
        }
    }
}

/// Transactions page data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionsData {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
}

impl TransactionsData {
    pub fn prepend(&mut self, transaction: Transaction) {
        self.transactions.insert(0, transaction);
    }

    /// Remove the transaction with `id`; false if it was not listed
    pub fn remove(&mut self, id: i64) -> bool {
        remove_by_id(&mut self.transactions, id)
    }
}

/// Budgets page data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetsData {
    pub budgets: Vec<Budget>,
    pub categories: Vec<Category>,
    /// Used only to compute spending
    pub transactions: Vec<Transaction>,
}

impl BudgetsData {
    pub fn prepend(&mut self, budget: Budget) {
        self.budgets.insert(0, budget);
    }

    pub fn remove(&mut self, id: i64) -> bool {
        remove_by_id(&mut self.budgets, id)
    }

    /// Budgets in list order with their consumption
    pub fn progress(&self) -> Vec<BudgetProgress> {
        self.budgets
            .iter()
            .cloned()
            .map(|b| BudgetProgress::compute(b, &self.transactions))
            .collect()
    }
}

/// The mounted pages of one session
#[derive(Debug, Default)]
pub struct PageViews {
    pub dashboard: RwLock<PageView<DashboardData>>,
    pub transactions: RwLock<PageView<TransactionsData>>,
    pub budgets: RwLock<PageView<BudgetsData>>,
}

impl PageViews {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tear down every page, e.g. on logout
    pub async fn teardown_all(&self) {
        self.dashboard.write().await.teardown();
        self.transactions.write().await.teardown();
        self.budgets.write().await.teardown();
    }
}
