//! Form state, parsing and validation
//!
//! Each form keeps the raw submitted strings so that a rejected submission
//! can be re-rendered with the user's input intact.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::models::{NewBudget, NewTransaction, DEFAULT_CURRENCY};
use super::period::Period;
use super::types::TransactionType;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email regex"));

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest amount a form accepts
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Per-field validation messages plus an optional form-level message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldErrors {
    fields: BTreeMap<String, String>,
    general: Option<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form-level error without a specific field
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            fields: BTreeMap::new(),
            general: Some(message.into()),
        }
    }

    /// Record a message for `field`; the first message per field wins
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn general_message(&self) -> Option<&str> {
        self.general.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.general.is_none()
    }

    pub fn len(&self) -> usize {
        self.fields.len() + usize::from(self.general.is_some())
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Login form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(FieldErrors::general("Please provide both email and password"));
        }
        Ok(())
    }
}

/// Registration form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// All checks run so every field shows its message at once
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.email.is_empty() {
            errors.add("email", "Email is required");
        } else if !EMAIL_RE.is_match(&self.email) {
            errors.add("email", "Email format is invalid");
        }

        if self.password.is_empty() {
            errors.add("password", "Password is required");
        } else if self.password.chars().count() < 6 {
            errors.add("password", "Password must be at least 6 characters");
        }

        if self.password != self.confirm_password {
            errors.add("confirm_password", "Passwords do not match");
        }

        errors.into_result()
    }
}

/// New transaction form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    pub amount: String,
    pub description: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category_id: String,
    pub currency: String,
}

impl TransactionForm {
    /// Empty form: today's date, expense, INR
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            amount: String::new(),
            description: String::new(),
            date: today.format(DATE_FORMAT).to_string(),
            kind: TransactionType::Expense.to_string(),
            category_id: String::new(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    /// Convert the raw fields into a create payload
    pub fn parse(&self) -> Result<NewTransaction, FieldErrors> {
        let mut errors = FieldErrors::new();

        let amount = parse_amount(&self.amount, &mut errors);
        let date = parse_date(&self.date, "date", &mut errors);

        let kind = match TransactionType::from_str(&self.kind) {
            Ok(kind) => Some(kind),
            Err(_) => {
                errors.add("type", "Type must be income or expense");
                None
            }
        };

        let description = self.description.trim().to_string();
        if description.is_empty() {
            errors.add("description", "Description is required");
        }

        let category_id = match self.category_id.trim() {
            "" => None,
            raw => match raw.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("category_id", "Unknown category");
                    None
                }
            },
        };

        let currency = match self.currency.trim() {
            "" => DEFAULT_CURRENCY.to_string(),
            c => c.to_uppercase(),
        };

        match (amount, date, kind, errors.into_result()) {
            (Some(amount), Some(date), Some(kind), Ok(())) => Ok(NewTransaction {
                amount,
                description,
                date,
                kind,
                category_id,
                currency,
            }),
            (_, _, _, Err(errors)) => Err(errors),
            _ => Err(FieldErrors::general("Invalid transaction")),
        }
    }
}

/// New budget form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetForm {
    pub category_id: String,
    pub amount: String,
    pub start_date: String,
    pub end_date: String,
}

impl BudgetForm {
    /// Empty form covering today through next month
    pub fn blank(today: NaiveDate) -> Self {
        let period = Period::starting(today);
        Self {
            category_id: String::new(),
            amount: String::new(),
            start_date: period.start.format(DATE_FORMAT).to_string(),
            end_date: period.end.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn parse(&self) -> Result<NewBudget, FieldErrors> {
        let mut errors = FieldErrors::new();

        let category_id = match self.category_id.trim() {
            "" => {
                errors.add("category_id", "Category is required");
                None
            }
            raw => match raw.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("category_id", "Unknown category");
                    None
                }
            },
        };

        let amount = parse_amount(&self.amount, &mut errors);
        let start_date = parse_date(&self.start_date, "start_date", &mut errors);
        let end_date = parse_date(&self.end_date, "end_date", &mut errors);

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if Period::new(start, end).is_empty() {
                errors.add("end_date", "End date must not be before start date");
            }
        }

        match (category_id, amount, start_date, end_date, errors.into_result()) {
            (Some(category_id), Some(amount), Some(start_date), Some(end_date), Ok(())) => {
                Ok(NewBudget {
                    category_id,
                    amount,
                    start_date,
                    end_date,
                })
            }
            (_, _, _, _, Err(errors)) => Err(errors),
            _ => Err(FieldErrors::general("Invalid budget")),
        }
    }
}

fn parse_amount(raw: &str, errors: &mut FieldErrors) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add("amount", "Amount is required");
        return None;
    }
    match Decimal::from_str(raw) {
        Ok(amount) if amount <= Decimal::ZERO => {
            errors.add("amount", "Amount must be greater than zero");
            None
        }
        Ok(amount) if amount.normalize().scale() > 2 => {
            errors.add("amount", "Amount can have at most 2 decimal places");
            None
        }
        Ok(amount) if amount > Decimal::from(MAX_AMOUNT) => {
            errors.add("amount", "Amount must not exceed 1,000,000,000,000");
            None
        }
        Ok(amount) => Some(amount),
        Err(_) => {
            errors.add("amount", "Amount must be a number");
            None
        }
    }
}

fn parse_date(raw: &str, field: &str, errors: &mut FieldErrors) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, "Date must be in YYYY-MM-DD format");
            None
        }
    }
}
