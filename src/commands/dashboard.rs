// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use clap::ArgMatches;
use rust_decimal::Decimal;
use serde::Serialize;

use super::categories::{category_rows, CATEGORY_HEADERS};
use super::expenses::expense_row;
use super::{check_batch, require_login};
use crate::aggregate::{
    average_amount, most_recent, summarize_by_category, summarize_by_day, summarize_by_month,
};
use crate::api::ApiClient;
use crate::models::{CategorySummary, ExpenseRecord, SeriesPoint};
use crate::session::SessionStore;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, month_of, pretty_table, recent_months};

const DAILY_WINDOW: usize = 7;
const MONTHLY_WINDOW: usize = 6;
const RECENT_COUNT: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub month: String,
    pub username: Option<String>,
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    pub remaining: Decimal,
    pub percent_used: Decimal,
    pub transactions: usize,
    pub average_expense: Decimal,
    pub categories: Vec<CategorySummary>,
    pub daily: Vec<SeriesPoint>,
    pub monthly: Vec<SeriesPoint>,
    pub recent: Vec<ExpenseRecord>,
}

pub async fn handle<S: SessionStore>(
    client: &ApiClient<S>,
    sub: &ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    require_login(client)?;
    let month = month_of(today);
    let months = recent_months(today, MONTHLY_WINDOW);

    let (budget, history) = futures::join!(client.budget(&month), client.expenses_for(&months));
    let budget = budget?;
    check_batch(&history)?;

    let current: Vec<ExpenseRecord> = history
        .records
        .iter()
        .filter(|(m, _)| *m == month)
        .flat_map(|(_, list)| list.iter().cloned())
        .collect();
    let all: Vec<ExpenseRecord> = history
        .records
        .into_iter()
        .flat_map(|(_, list)| list)
        .collect();

    let dash = Dashboard {
        username: client.gate().store().username(),
        total_budget: budget.limit_amount,
        total_spent: budget.spent_amount,
        remaining: budget.remaining(),
        percent_used: budget.progress_percent(),
        transactions: current.len(),
        average_expense: average_amount(&current),
        categories: summarize_by_category(&current),
        daily: summarize_by_day(&all, today, DAILY_WINDOW),
        monthly: summarize_by_month(&all, today, MONTHLY_WINDOW),
        recent: most_recent(&current, RECENT_COUNT).into_iter().cloned().collect(),
        month,
    };

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &dash)? {
        print_dashboard(&dash);
    }
    Ok(())
}

fn print_dashboard(d: &Dashboard) {
    if let Some(u) = &d.username {
        println!("Welcome back, {}! ({})", u, d.month);
    }
    println!(
        "{}",
        pretty_table(
            &["Budget", "Spent", "Remaining", "Used", "Transactions", "Avg expense"],
            vec![vec![
                fmt_money(&d.total_budget),
                fmt_money(&d.total_spent),
                fmt_money(&d.remaining),
                fmt_percent(&d.percent_used),
                d.transactions.to_string(),
                fmt_money(&d.average_expense),
            ]],
        )
    );
    if d.remaining.is_sign_negative() && !d.remaining.is_zero() {
        println!("You've exceeded your budget by {}", fmt_money(&d.remaining.abs()));
    }

    let series = |points: &[SeriesPoint]| -> Vec<Vec<String>> {
        points
            .iter()
            .map(|p| vec![p.label.clone(), fmt_money(&p.total)])
            .collect()
    };
    println!("{}", pretty_table(&["Day", "Spent"], series(&d.daily)));
    println!("{}", pretty_table(&["Month", "Spent"], series(&d.monthly)));

    if !d.categories.is_empty() {
        println!("{}", pretty_table(&CATEGORY_HEADERS, category_rows(&d.categories)));
    }
    if !d.recent.is_empty() {
        let rows = d.recent.iter().map(expense_row).collect();
        println!("{}", pretty_table(&["Date", "Description", "Category", "Amount"], rows));
    }
}
