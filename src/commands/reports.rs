// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use clap::ArgMatches;
use serde::Serialize;

use super::budgets::{budget_row, BUDGET_HEADERS};
use super::categories::{category_rows, CATEGORY_HEADERS};
use super::{check_batch, require_login};
use crate::aggregate::{
    monthly_savings, summarize_by_category, summarize_by_month, summarize_period,
};
use crate::api::ApiClient;
use crate::models::{BudgetRecord, CategorySummary, ReportSummary, SeriesPoint};
use crate::session::SessionStore;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, pretty_table, recent_months};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub months: Vec<String>,
    pub budget_vs_spent: Vec<BudgetRecord>,
    pub expense_trend: Vec<SeriesPoint>,
    pub category_breakdown: Vec<CategorySummary>,
    pub monthly_savings: Vec<SeriesPoint>,
    pub summary: ReportSummary,
}

pub async fn handle<S: SessionStore>(
    client: &ApiClient<S>,
    sub: &ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    require_login(client)?;
    let period: usize = sub
        .get_one::<String>("period")
        .map(|s| s.parse::<usize>())
        .transpose()?
        .unwrap_or(3);
    let months = recent_months(today, period);

    let (budgets, expenses) =
        futures::join!(client.budgets_for(&months), client.expenses_for(&months));
    if budgets.unauthorized || expenses.unauthorized {
        return Err(crate::error::ClientError::Unauthorized.into());
    }
    check_batch(&budgets)?;
    check_batch(&expenses)?;

    let all: Vec<_> = expenses
        .records
        .into_iter()
        .flat_map(|(_, list)| list)
        .collect();
    let report = Report {
        expense_trend: summarize_by_month(&all, today, period),
        category_breakdown: summarize_by_category(&all),
        monthly_savings: monthly_savings(&budgets.records),
        summary: summarize_period(&budgets.records),
        budget_vs_spent: budgets.records,
        months,
    };

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &Report) {
    let s = &report.summary;
    println!(
        "{}",
        pretty_table(
            &["Total budget", "Total spent", "Saved", "Avg monthly spend", "Used"],
            vec![vec![
                fmt_money(&s.total_budget),
                fmt_money(&s.total_spent),
                fmt_money(&s.total_saved),
                fmt_money(&s.avg_monthly_spending),
                fmt_percent(&s.percent_used),
            ]],
        )
    );

    let rows = report.budget_vs_spent.iter().map(budget_row).collect();
    println!("{}", pretty_table(&BUDGET_HEADERS, rows));

    let trend = report
        .expense_trend
        .iter()
        .zip(report.monthly_savings.iter())
        .map(|(t, sv)| vec![t.label.clone(), fmt_money(&t.total), fmt_money(&sv.total)])
        .collect();
    println!("{}", pretty_table(&["Month", "Expenses", "Saved"], trend));

    if !report.category_breakdown.is_empty() {
        println!(
            "{}",
            pretty_table(&CATEGORY_HEADERS, category_rows(&report.category_breakdown))
        );
    }

    if s.total_budget.is_zero() {
        println!("No budgets set in this period");
    } else if s.total_spent <= s.total_budget {
        println!("Within budget: {} of budget used", fmt_percent(&s.percent_used));
    } else {
        println!(
            "Over budget by {}",
            fmt_money(&(s.total_spent - s.total_budget))
        );
    }
}
