// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use clap::ArgMatches;
use rust_decimal::Decimal;

use super::{check_batch, require_login, value};
use crate::api::ApiClient;
use crate::models::BudgetRecord;
use crate::session::SessionStore;
use crate::utils::{
    fmt_money, fmt_percent, maybe_print_json, month_of, parse_month, pretty_table, recent_months,
};
use crate::validate;

pub async fn handle<S: SessionStore>(
    client: &ApiClient<S>,
    m: &ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    require_login(client)?;
    match m.subcommand() {
        Some(("get", sub)) => get(client, sub, today).await?,
        Some(("set", sub)) => set(client, sub).await?,
        Some(("list", sub)) => list(client, sub, today).await?,
        _ => {}
    }
    Ok(())
}

pub(crate) fn budget_row(b: &BudgetRecord) -> Vec<String> {
    vec![
        b.month.clone(),
        fmt_money(&b.limit_amount),
        fmt_money(&b.spent_amount),
        fmt_money(&b.remaining()),
        fmt_percent(&b.progress_percent()),
    ]
}

pub(crate) const BUDGET_HEADERS: [&str; 5] = ["Month", "Limit", "Spent", "Remaining", "Used"];

async fn get<S: SessionStore>(
    client: &ApiClient<S>,
    sub: &ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let month = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s.trim())?,
        None => month_of(today),
    };
    let budget = client.budget(&month).await?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &budget)? {
        println!("{}", pretty_table(&BUDGET_HEADERS, vec![budget_row(&budget)]));
        if budget.limit_amount.is_zero() {
            println!("No budget set for {}", month);
        } else if budget.is_over_budget() {
            println!(
                "You've exceeded your budget by {}",
                fmt_money(&budget.remaining().abs())
            );
        }
    }
    Ok(())
}

async fn set<S: SessionStore>(client: &ApiClient<S>, sub: &ArgMatches) -> Result<()> {
    let (month, limit) = validate::goal(value(sub, "month"), value(sub, "amount"))?;
    client.set_budget(&month, limit).await?;
    println!("Budget set for {} = {}", month, fmt_money(&limit));
    Ok(())
}

async fn list<S: SessionStore>(
    client: &ApiClient<S>,
    sub: &ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let count = *sub.get_one::<usize>("months").unwrap_or(&12);
    let months = recent_months(today, count);
    let batch = client.budgets_for(&months).await;
    check_batch(&batch)?;
    let budgets = batch.records;

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &budgets)? {
        let rows = budgets.iter().rev().map(budget_row).collect();
        println!("{}", pretty_table(&BUDGET_HEADERS, rows));
        let total_limit: Decimal = budgets.iter().map(|b| b.limit_amount).sum();
        let total_spent: Decimal = budgets.iter().map(|b| b.spent_amount).sum();
        println!(
            "Total budgeted {} / spent {}",
            fmt_money(&total_limit),
            fmt_money(&total_spent)
        );
    }
    Ok(())
}
