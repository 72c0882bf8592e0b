// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use clap::ArgMatches;

use super::{require_login, value};
use crate::aggregate::{average_amount, most_recent, summarize_by_category, total};
use crate::api::ApiClient;
use crate::models::ExpenseRecord;
use crate::session::SessionStore;
use crate::utils::{fmt_money, maybe_print_json, month_of, parse_month, pretty_table};
use crate::validate;

pub async fn handle<S: SessionStore>(
    client: &ApiClient<S>,
    m: &ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    require_login(client)?;
    match m.subcommand() {
        Some(("add", sub)) => add(client, sub).await?,
        Some(("list", sub)) => list(client, sub, today).await?,
        _ => {}
    }
    Ok(())
}

async fn add<S: SessionStore>(client: &ApiClient<S>, sub: &ArgMatches) -> Result<()> {
    let expense = validate::expense(
        value(sub, "description"),
        value(sub, "amount"),
        value(sub, "category"),
        value(sub, "date"),
    )?;
    client.add_expense(&expense).await?;
    println!(
        "Expense added: {} {} ({}) on {}",
        expense.description,
        fmt_money(&expense.amount),
        expense.category,
        expense.date
    );
    Ok(())
}

pub(crate) fn expense_row(e: &ExpenseRecord) -> Vec<String> {
    vec![
        e.date.to_string(),
        e.description.clone(),
        e.category.clone(),
        fmt_money(&e.amount),
    ]
}

/// Keep records whose category matches, ignoring case.
pub fn filter_by_category(
    records: Vec<ExpenseRecord>,
    category: Option<&str>,
) -> Vec<ExpenseRecord> {
    match category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => records
            .into_iter()
            .filter(|r| r.category.eq_ignore_ascii_case(c))
            .collect(),
        None => records,
    }
}

async fn list<S: SessionStore>(
    client: &ApiClient<S>,
    sub: &ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let month = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s.trim())?,
        None => month_of(today),
    };
    let records = client.expenses(&month).await?;
    let category = sub.get_one::<String>("category").map(String::as_str);
    let records = filter_by_category(records, category);

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &records)? {
        if records.is_empty() {
            println!("No expenses recorded for {}", month);
            return Ok(());
        }
        let rows = most_recent(&records, records.len())
            .into_iter()
            .map(expense_row)
            .collect();
        println!("{}", pretty_table(&["Date", "Description", "Category", "Amount"], rows));
        println!(
            "{} transaction{} | total {} | average {} | {} categories used",
            records.len(),
            if records.len() == 1 { "" } else { "s" },
            fmt_money(&total(&records)),
            fmt_money(&average_amount(&records)),
            summarize_by_category(&records).len()
        );
    }
    Ok(())
}
