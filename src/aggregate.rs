// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived series for charts and summaries.
//!
//! Everything here is pure: inputs are borrowed and never mutated, and each
//! call recomputes its result from scratch.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::{
    BudgetRecord, CategorySummary, ExpenseRecord, GoalView, ReportSummary, SeriesPoint,
};
use crate::utils::recent_months;

/// `100 * part / whole`, clamped to `[0, 100]`; zero when `whole` is not positive.
pub fn progress_percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (part / whole * Decimal::ONE_HUNDRED).clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

pub fn total(records: &[ExpenseRecord]) -> Decimal {
    records.iter().map(|r| r.amount).sum()
}

/// Mean amount per transaction, zero for no records.
pub fn average_amount(records: &[ExpenseRecord]) -> Decimal {
    if records.is_empty() {
        return Decimal::ZERO;
    }
    total(records) / Decimal::from(records.len())
}

/// Per-category totals, largest first. Categories with equal totals keep
/// the order in which they were first seen.
pub fn summarize_by_category(records: &[ExpenseRecord]) -> Vec<CategorySummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut acc: Vec<(&str, Decimal, usize)> = Vec::new();
    for r in records {
        let slot = *index.entry(r.category.as_str()).or_insert_with(|| {
            acc.push((r.category.as_str(), Decimal::ZERO, 0));
            acc.len() - 1
        });
        acc[slot].1 += r.amount;
        acc[slot].2 += 1;
    }

    let grand: Decimal = acc.iter().map(|(_, t, _)| *t).sum();
    let mut out: Vec<CategorySummary> = acc
        .into_iter()
        .map(|(name, total, count)| CategorySummary {
            name: name.to_string(),
            total,
            transaction_count: count,
            average: total / Decimal::from(count),
            share_of_total: progress_percent(total, grand),
        })
        .collect();
    // stable: ties stay in insertion order
    out.sort_by(|a, b| b.total.cmp(&a.total));
    out
}

/// Daily totals for the `window_days` days ending at `reference`, oldest
/// first, zero-filled.
pub fn summarize_by_day(
    records: &[ExpenseRecord],
    reference: NaiveDate,
    window_days: usize,
) -> Vec<SeriesPoint> {
    let mut by_day: HashMap<NaiveDate, Decimal> = HashMap::new();
    for r in records {
        *by_day.entry(r.date).or_insert(Decimal::ZERO) += r.amount;
    }
    (0..window_days)
        .rev()
        .map(|back| {
            let day = reference - Duration::days(back as i64);
            SeriesPoint {
                label: day.format("%Y-%m-%d").to_string(),
                total: by_day.get(&day).copied().unwrap_or(Decimal::ZERO),
            }
        })
        .collect()
}

/// Monthly totals for the `window_months` months ending at the month of
/// `reference`, oldest first, zero-filled.
pub fn summarize_by_month(
    records: &[ExpenseRecord],
    reference: NaiveDate,
    window_months: usize,
) -> Vec<SeriesPoint> {
    let mut by_month: HashMap<&str, Decimal> = HashMap::new();
    for r in records {
        *by_month.entry(r.month.as_str()).or_insert(Decimal::ZERO) += r.amount;
    }
    recent_months(reference, window_months)
        .into_iter()
        .map(|m| {
            let total = by_month.get(m.as_str()).copied().unwrap_or(Decimal::ZERO);
            SeriesPoint { label: m, total }
        })
        .collect()
}

pub fn goal_view(b: &BudgetRecord) -> GoalView {
    GoalView {
        month: b.month.clone(),
        target_amount: b.limit_amount,
        current_amount: b.spent_amount,
        remaining: b.remaining(),
        progress_percent: progress_percent(b.spent_amount, b.limit_amount),
        achieved: b.spent_amount <= b.limit_amount,
    }
}

/// Goals for every month that has a limit set; input order is kept.
pub fn compute_goal_views(budgets: &[BudgetRecord]) -> Vec<GoalView> {
    budgets
        .iter()
        .filter(|b| !b.limit_amount.is_zero())
        .map(goal_view)
        .collect()
}

pub fn average_progress(goals: &[GoalView]) -> Decimal {
    if goals.is_empty() {
        return Decimal::ZERO;
    }
    let sum: Decimal = goals.iter().map(|g| g.progress_percent).sum();
    sum / Decimal::from(goals.len())
}

/// Unspent budget per month; overspent months count as zero.
pub fn monthly_savings(budgets: &[BudgetRecord]) -> Vec<SeriesPoint> {
    budgets
        .iter()
        .map(|b| SeriesPoint {
            label: b.month.clone(),
            total: b.remaining().max(Decimal::ZERO),
        })
        .collect()
}

pub fn summarize_period(budgets: &[BudgetRecord]) -> ReportSummary {
    let total_budget: Decimal = budgets.iter().map(|b| b.limit_amount).sum();
    let total_spent: Decimal = budgets.iter().map(|b| b.spent_amount).sum();
    let avg_monthly_spending = if budgets.is_empty() {
        Decimal::ZERO
    } else {
        total_spent / Decimal::from(budgets.len())
    };
    ReportSummary {
        total_budget,
        total_spent,
        total_saved: (total_budget - total_spent).max(Decimal::ZERO),
        avg_monthly_spending,
        percent_used: progress_percent(total_spent, total_budget),
    }
}

/// The `n` latest expenses, newest first.
pub fn most_recent(records: &[ExpenseRecord], n: usize) -> Vec<&ExpenseRecord> {
    let mut sorted: Vec<&ExpenseRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(n);
    sorted
}
