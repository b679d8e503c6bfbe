//! Derived figures for the dashboard and budget views
//!
//! Everything here is computed from already loaded collections; nothing is
//! sent back to the API.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::models::{Budget, Category, Transaction};
use super::types::{ProgressLevel, TransactionType};

/// Number of categories shown on the dashboard
pub const TOP_CATEGORY_LIMIT: usize = 5;

/// Largest magnitude a percentage is reported with
pub const PERCENT_CAP: f64 = 9999.0;

/// Income, expense and balance totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CashflowSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_balance: Decimal,
}

impl CashflowSummary {
    /// Sum the full transaction list by type
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let total_income = sum_of(transactions, TransactionType::Income);
        let total_expenses = sum_of(transactions, TransactionType::Expense);
        Self {
            total_income,
            total_expenses,
            net_balance: total_income.saturating_sub(total_expenses),
        }
    }
}

fn sum_of(transactions: &[Transaction], kind: TransactionType) -> Decimal {
    saturating_sum(transactions.iter().filter(|t| t.kind == kind).map(|t| t.amount))
}

/// Sum that sticks at `Decimal::MAX` / `Decimal::MIN` instead of overflowing
fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

/// Lookup of category names and colors by id
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex<'a> {
    by_id: HashMap<i64, &'a Category>,
}

impl<'a> CategoryIndex<'a> {
    pub fn new(categories: &'a [Category]) -> Self {
        Self {
            by_id: categories.iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn get(&self, id: i64) -> Option<&'a Category> {
        self.by_id.get(&id).copied()
    }

    /// Category name, or `fallback` when the id is unknown
    pub fn name_or(&self, id: i64, fallback: &'a str) -> &'a str {
        self.get(id).map(|c| c.name.as_str()).unwrap_or(fallback)
    }

    /// Category color, or `fallback` when the id is unknown
    pub fn color_or(&self, id: i64, fallback: &'a str) -> &'a str {
        self.get(id).map(|c| c.color.as_str()).unwrap_or(fallback)
    }
}

/// Expense share of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category_id: i64,
    pub name: String,
    pub color: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Share of total expenses, 0-100
    pub percentage: f64,
}

/// Expense categories ordered by amount, largest first.
///
/// Expenses without a category are skipped. Ties keep first-seen order.
pub fn top_expense_categories(
    transactions: &[Transaction],
    categories: &[Category],
    limit: usize,
) -> Vec<CategorySpend> {
    let index = CategoryIndex::new(categories);
    let total_expenses = sum_of(transactions, TransactionType::Expense);

    let mut order: Vec<i64> = Vec::new();
    let mut amounts: HashMap<i64, Decimal> = HashMap::new();
    for tx in transactions.iter().filter(|t| t.is_expense()) {
        let Some(category_id) = tx.category_id else {
            continue;
        };
        let entry = amounts.entry(category_id).or_insert_with(|| {
            order.push(category_id);
            Decimal::ZERO
        });
        *entry = entry.saturating_add(tx.amount);
    }

    let mut spends: Vec<CategorySpend> = order
        .into_iter()
        .map(|category_id| {
            let amount = amounts.get(&category_id).copied().unwrap_or_default();
            CategorySpend {
                category_id,
                name: index.name_or(category_id, "Unknown").to_string(),
                color: index.color_or(category_id, "#888").to_string(),
                amount,
                percentage: ratio_percent(amount, total_expenses),
            }
        })
        .collect();

    // sort_by is stable
    spends.sort_by(|a, b| b.amount.cmp(&a.amount));
    spends.truncate(limit);
    spends
}

/// `part` as a percentage of `whole`, within `-PERCENT_CAP..=PERCENT_CAP`
fn ratio_percent(part: Decimal, whole: Decimal) -> f64 {
    if whole <= Decimal::ZERO {
        return 0.0;
    }
    let capped = if part.is_sign_negative() { -PERCENT_CAP } else { PERCENT_CAP };
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|percent| percent.to_f64())
        .map(|percent| percent.clamp(-PERCENT_CAP, PERCENT_CAP))
        .unwrap_or(capped)
}

/// Expenses booked against the budget's category inside its period
pub fn budget_spent(budget: &Budget, transactions: &[Transaction]) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|t| t.is_expense())
            .filter(|t| t.category_id == Some(budget.category_id))
            .filter(|t| budget.covers(t.date))
            .map(|t| t.amount),
    )
}

/// Budget with its consumption figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub budget: Budget,
    #[serde(with = "rust_decimal::serde::float")]
    pub spent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining: Decimal,
    pub percentage: f64,
}

impl BudgetProgress {
    pub fn compute(budget: Budget, transactions: &[Transaction]) -> Self {
        let spent = budget_spent(&budget, transactions);
        Self::with_spent(budget, spent)
    }

    pub fn with_spent(budget: Budget, spent: Decimal) -> Self {
        let remaining = budget.amount.saturating_sub(spent);
        let percentage = ratio_percent(spent, budget.amount);
        Self {
            budget,
            spent,
            remaining,
            percentage,
        }
    }

    /// Progress bar width in percent, clamped to 0..=100
    pub fn bar_width(&self) -> f64 {
        self.percentage.clamp(0.0, 100.0)
    }

    pub fn level(&self) -> ProgressLevel {
        ProgressLevel::from_percentage(self.percentage)
    }

    /// e.g. "42% spent"
    pub fn label(&self) -> String {
        format!("{}% spent", self.percentage.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tx(id: i64, amount: &str, kind: TransactionType, category_id: Option<i64>, on: &str) -> Transaction {
        Transaction {
            id,
            amount: dec(amount),
            description: format!("tx {}", id),
            date: date(on),
            kind,
            category_id,
            currency: "INR".to_string(),
            user_id: None,
        }
    }

    fn cat(id: i64, name: &str, color: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            color: color.to_string(),
            user_id: None,
        }
    }

    fn budget(category_id: i64, amount: &str) -> Budget {
        Budget {
            id: 1,
            category_id,
            amount: dec(amount),
            start_date: date("2025-06-01"),
            end_date: date("2025-06-30"),
            user_id: None,
        }
    }

    #[test]
    fn test_cashflow_summary_is_exact() {
        let txs = vec![
            tx(1, "12000.00", TransactionType::Expense, Some(1), "2025-06-01"),
            tx(2, "90000.00", TransactionType::Income, Some(10), "2025-06-05"),
            tx(3, "2500.75", TransactionType::Expense, Some(3), "2025-06-07"),
            tx(4, "1500.00", TransactionType::Expense, Some(2), "2025-06-06"),
            tx(5, "3200.50", TransactionType::Expense, Some(4), "2025-06-03"),
        ];
        let summary = CashflowSummary::from_transactions(&txs);
        assert_eq!(summary.total_income, dec("90000"));
        assert_eq!(summary.total_expenses, dec("19201.25"));
        assert_eq!(summary.net_balance, dec("70798.75"));
        assert_eq!(summary.net_balance, summary.total_income - summary.total_expenses);
    }

    #[test]
    fn test_cashflow_summary_empty() {
        assert_eq!(CashflowSummary::from_transactions(&[]), CashflowSummary::default());
    }

    #[test]
    fn test_top_categories_order_and_fallback() {
        let cats = vec![cat(1, "Housing", "#4a6cf7"), cat(3, "Food", "#10b981")];
        let txs = vec![
            tx(1, "100", TransactionType::Expense, Some(3), "2025-06-01"),
            tx(2, "300", TransactionType::Expense, Some(1), "2025-06-02"),
            tx(3, "100", TransactionType::Expense, Some(9), "2025-06-03"),
            tx(4, "500", TransactionType::Income, Some(1), "2025-06-04"),
            tx(5, "100", TransactionType::Expense, None, "2025-06-05"),
        ];
        let top = top_expense_categories(&txs, &cats, TOP_CATEGORY_LIMIT);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].name, "Housing");
        assert_eq!(top[0].amount, dec("300"));
        assert!((top[0].percentage - 50.0).abs() < 1e-9);
        // ties keep first-seen order
        assert_eq!(top[1].category_id, 3);
        assert_eq!(top[2].name, "Unknown");
        assert_eq!(top[2].color, "#888");
    }

    #[test]
    fn test_top_categories_truncates() {
        let txs: Vec<Transaction> = (1..=7)
            .map(|i| tx(i, &format!("{}", i * 10), TransactionType::Expense, Some(i), "2025-06-01"))
            .collect();
        let top = top_expense_categories(&txs, &[], TOP_CATEGORY_LIMIT);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].category_id, 7);
        assert_eq!(top[4].category_id, 3);
    }

    #[test]
    fn test_budget_spent_window_and_category() {
        let txs = vec![
            tx(1, "500", TransactionType::Expense, Some(1), "2025-06-01"),
            tx(2, "250", TransactionType::Expense, Some(1), "2025-06-30"),
            tx(3, "999", TransactionType::Expense, Some(1), "2025-07-01"),
            tx(4, "111", TransactionType::Expense, Some(2), "2025-06-10"),
            tx(5, "777", TransactionType::Income, Some(1), "2025-06-10"),
        ];
        assert_eq!(budget_spent(&budget(1, "1000"), &txs), dec("750"));
    }

    #[test]
    fn test_budget_progress_levels_and_clamp() {
        let normal = BudgetProgress::with_spent(budget(1, "1000"), dec("700"));
        assert_eq!(normal.level(), ProgressLevel::Normal);
        assert_eq!(normal.remaining, dec("300"));
        assert_eq!(normal.label(), "70% spent");

        let warning = BudgetProgress::with_spent(budget(1, "1000"), dec("900"));
        assert_eq!(warning.level(), ProgressLevel::Warning);

        let over = BudgetProgress::with_spent(budget(1, "1300"), dec("12000"));
        assert_eq!(over.level(), ProgressLevel::Alert);
        assert_eq!(over.bar_width(), 100.0);
        assert!(over.remaining < Decimal::ZERO);
    }

    #[test]
    fn test_budget_progress_zero_amount() {
        let progress = BudgetProgress::with_spent(budget(1, "0"), dec("50"));
        assert_eq!(progress.percentage, 0.0);
        assert_eq!(progress.bar_width(), 0.0);
        assert_eq!(progress.level(), ProgressLevel::Normal);
    }

    #[test]
    fn test_budget_progress_tiny_amount_is_capped() {
        let progress = BudgetProgress::with_spent(budget(1, "0.0000000000000000000000001"), dec("500"));
        assert_eq!(progress.percentage, PERCENT_CAP);
        assert_eq!(progress.bar_width(), 100.0);
        assert_eq!(progress.level(), ProgressLevel::Alert);
        assert_eq!(progress.label(), "9999% spent");
    }

    #[test]
    fn test_cashflow_summary_saturates() {
        let txs = vec![
            tx(1, "79228162514264337593543950335", TransactionType::Income, None, "2025-06-01"),
            tx(2, "79228162514264337593543950335", TransactionType::Income, None, "2025-06-02"),
            tx(3, "79228162514264337593543950335", TransactionType::Expense, Some(1), "2025-06-03"),
            tx(4, "79228162514264337593543950335", TransactionType::Expense, Some(1), "2025-06-04"),
        ];
        let summary = CashflowSummary::from_transactions(&txs);
        assert_eq!(summary.total_income, Decimal::MAX);
        assert_eq!(summary.total_expenses, Decimal::MAX);
        assert_eq!(summary.net_balance, Decimal::ZERO);

        let top = top_expense_categories(&txs, &[], TOP_CATEGORY_LIMIT);
        assert_eq!(top[0].amount, Decimal::MAX);
        assert_eq!(top[0].percentage, 100.0);
    }

    #[test]
    fn test_category_index_fallbacks() {
        let cats = vec![cat(1, "Housing", "#4a6cf7")];
        let index = CategoryIndex::new(&cats);
        assert_eq!(index.name_or(1, "Uncategorized"), "Housing");
        assert_eq!(index.name_or(2, "Uncategorized"), "Uncategorized");
        assert_eq!(index.color_or(2, "#ccc"), "#ccc");
    }
}
