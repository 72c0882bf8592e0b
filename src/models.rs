// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "Other";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ExpenseWire")]
pub struct ExpenseRecord {
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub month: String, // YYYY-MM
}

#[derive(Deserialize)]
struct ExpenseWire {
    #[serde(default)]
    description: Option<String>,
    amount: Decimal,
    #[serde(default)]
    category: Option<String>,
    date: NaiveDate,
}

impl From<ExpenseWire> for ExpenseRecord {
    fn from(w: ExpenseWire) -> Self {
        ExpenseRecord::new(
            w.description.unwrap_or_default(),
            w.amount,
            w.category.as_deref(),
            w.date,
        )
    }
}

impl ExpenseRecord {
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        category: Option<&str>,
        date: NaiveDate,
    ) -> Self {
        let category = match category.map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => DEFAULT_CATEGORY.to_string(),
        };
        ExpenseRecord {
            description: description.into(),
            amount,
            category,
            date,
            month: date.format("%Y-%m").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecord {
    pub month: String, // YYYY-MM
    pub limit_amount: Decimal,
    pub spent_amount: Decimal,
}

impl BudgetRecord {
    /// Placeholder used when a month has no budget or could not be fetched.
    pub fn zero(month: impl Into<String>) -> Self {
        BudgetRecord {
            month: month.into(),
            limit_amount: Decimal::ZERO,
            spent_amount: Decimal::ZERO,
        }
    }

    /// Unclamped; negative means overspent.
    pub fn remaining(&self) -> Decimal {
        self.limit_amount - self.spent_amount
    }

    pub fn progress_percent(&self) -> Decimal {
        crate::aggregate::progress_percent(self.spent_amount, self.limit_amount)
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent_amount > self.limit_amount
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub name: String,
    pub total: Decimal,
    pub transaction_count: usize,
    pub average: Decimal,
    pub share_of_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalView {
    pub month: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub remaining: Decimal,
    pub progress_percent: Decimal,
    pub achieved: bool,
}

/// One labelled value of a chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    pub total_saved: Decimal,
    pub avg_monthly_spending: Decimal,
    pub percent_used: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/expenses`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpense {
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub month: String,
}
