// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use clap::ArgMatches;
use rust_decimal::Decimal;

use super::require_login;
use crate::aggregate::summarize_by_category;
use crate::api::ApiClient;
use crate::models::CategorySummary;
use crate::session::SessionStore;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, month_of, parse_month, pretty_table};

pub async fn handle<S: SessionStore>(
    client: &ApiClient<S>,
    m: &ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    require_login(client)?;
    if let Some(("summary", sub)) = m.subcommand() {
        summary(client, sub, today).await?;
    }
    Ok(())
}

pub(crate) fn category_rows(cats: &[CategorySummary]) -> Vec<Vec<String>> {
    cats.iter()
        .map(|c| {
            vec![
                c.name.clone(),
                fmt_money(&c.total),
                c.transaction_count.to_string(),
                fmt_money(&c.average),
                fmt_percent(&c.share_of_total),
            ]
        })
        .collect()
}

pub(crate) const CATEGORY_HEADERS: [&str; 5] = ["Category", "Total", "Count", "Average", "Share"];

async fn summary<S: SessionStore>(
    client: &ApiClient<S>,
    sub: &ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let month = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s.trim())?,
        None => month_of(today),
    };
    let records = client.expenses(&month).await?;
    let cats = summarize_by_category(&records);

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
        if cats.is_empty() {
            println!("No spending recorded for {}", month);
            return Ok(());
        }
        println!("{}", pretty_table(&CATEGORY_HEADERS, category_rows(&cats)));
        let spent: Decimal = cats.iter().map(|c| c.total).sum();
        println!(
            "Total spent {} across {} categories (avg {} per category)",
            fmt_money(&spent),
            cats.len(),
            fmt_money(&(spent / Decimal::from(cats.len())))
        );
    }
    Ok(())
}
