//! Basic types for the finance model

use serde::{Deserialize, Serialize};

/// Transaction direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in (salary, refunds)
    Income,
    /// Money going out (rent, groceries)
    #[default]
    Expense,
}

impl std::str::FromStr for TransactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" | "expenses" => Ok(TransactionType::Expense),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

/// Progress bar level for budget consumption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressLevel {
    /// At most 70% consumed
    Normal,
    /// Above 70% and at most 90%
    Warning,
    /// Above 90%
    Alert,
}

impl ProgressLevel {
    /// Classify a consumption percentage
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > 90.0 {
            ProgressLevel::Alert
        } else if percentage > 70.0 {
            ProgressLevel::Warning
        } else {
            ProgressLevel::Normal
        }
    }

    /// Bar color
    pub fn color(&self) -> &'static str {
        match self {
            ProgressLevel::Normal => "#22c55e",
            ProgressLevel::Warning => "#f59e0b",
            ProgressLevel::Alert => "#ef4444",
        }
    }
}

impl std::fmt::Display for ProgressLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressLevel::Normal => write!(f, "normal"),
            ProgressLevel::Warning => write!(f, "warning"),
            ProgressLevel::Alert => write!(f, "alert"),
        }
    }
}
