//! Core data models exchanged with the finance API

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::Period;
use super::types::TransactionType;

/// Currency used when a payload does not name one
pub const DEFAULT_CURRENCY: &str = "INR";

/// Color used when a category payload does not name one
pub const DEFAULT_CATEGORY_COLOR: &str = "#6c5ce7";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_category_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

/// Anything addressed by a numeric identifier
pub trait Identified {
    fn id(&self) -> i64;
}

/// Transaction information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Server identifier
    pub id: i64,
    /// Amount, always positive; direction comes from `kind`
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Booking date
    pub date: NaiveDate,
    /// Income or expense
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Category reference
    #[serde(default)]
    pub category_id: Option<i64>,
    /// ISO currency code
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Owning user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl Transaction {
    /// Build a stored transaction from a create payload
    pub fn from_new(id: i64, new: &NewTransaction) -> Self {
        Self {
            id,
            amount: new.amount,
            description: new.description.clone(),
            date: new.date,
            kind: new.kind,
            category_id: new.category_id,
            currency: if new.currency.is_empty() {
                default_currency()
            } else {
                new.currency.clone()
            },
            user_id: None,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

impl Identified for Transaction {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Transaction create/update payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category_id: Option<i64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Category information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// CSS color used for tags and bars
    #[serde(default = "default_category_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl Category {
    pub fn from_new(id: i64, new: &NewCategory) -> Self {
        Self {
            id,
            name: new.name.clone(),
            color: new.color.clone(),
            user_id: None,
        }
    }
}

impl Identified for Category {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Category create/update payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default = "default_category_color")]
    pub color: String,
}

/// Budget information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub category_id: i64,
    /// Spending ceiling for the period
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl Budget {
    pub fn from_new(id: i64, new: &NewBudget) -> Self {
        Self {
            id,
            category_id: new.category_id,
            amount: new.amount,
            start_date: new.start_date,
            end_date: new.end_date,
            user_id: None,
        }
    }

    /// Check if a date falls inside the budget period (inclusive)
    pub fn covers(&self, date: NaiveDate) -> bool {
        Period::new(self.start_date, self.end_date).contains(date)
    }
}

impl Identified for Budget {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Budget create/update payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBudget {
    pub category_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Response of the token endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// Response of the registration endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
}
