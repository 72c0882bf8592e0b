// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use clap::ArgMatches;

use super::{check_batch, require_login, value};
use crate::aggregate::{average_progress, compute_goal_views};
use crate::api::ApiClient;
use crate::session::SessionStore;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, pretty_table, recent_months};
use crate::validate;

const GOAL_WINDOW_MONTHS: usize = 12;

pub async fn handle<S: SessionStore>(
    client: &ApiClient<S>,
    m: &ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    require_login(client)?;
    match m.subcommand() {
        Some(("set", sub)) => {
            let (month, target) = validate::goal(value(sub, "month"), value(sub, "target"))?;
            client.set_budget(&month, target).await?;
            println!("Goal created for {}: spend at most {}", month, fmt_money(&target));
        }
        Some(("list", sub)) => list(client, sub, today).await?,
        _ => {}
    }
    Ok(())
}

async fn list<S: SessionStore>(
    client: &ApiClient<S>,
    sub: &ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let months = recent_months(today, GOAL_WINDOW_MONTHS);
    let batch = client.budgets_for(&months).await;
    check_batch(&batch)?;
    // newest month first
    let mut goals = compute_goal_views(&batch.records);
    goals.reverse();

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &goals)? {
        if goals.is_empty() {
            println!("No goals yet. Create one with `finally goal set`.");
            return Ok(());
        }
        let rows = goals
            .iter()
            .map(|g| {
                let remaining = if g.remaining.is_sign_negative() {
                    format!("over by {}", fmt_money(&g.remaining.abs()))
                } else {
                    fmt_money(&g.remaining)
                };
                vec![
                    g.month.clone(),
                    fmt_money(&g.target_amount),
                    fmt_money(&g.current_amount),
                    remaining,
                    fmt_percent(&g.progress_percent),
                    if g.achieved { "on track" } else { "exceeded" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Month", "Target", "Spent", "Remaining", "Progress", "Status"],
                rows
            )
        );
        let achieved = goals.iter().filter(|g| g.achieved).count();
        println!(
            "{} of {} goals on track, average progress {}",
            achieved,
            goals.len(),
            fmt_percent(&average_progress(&goals))
        );
    }
    Ok(())
}
