// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, Months, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

const UA: &str = concat!(
    "finally/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/finally)"
);

pub const DEFAULT_API_BASE: &str = "http://localhost:8082";
pub const API_BASE_ENV: &str = "FINALLY_API_URL";
pub const API_BASE_KEY: &str = "api_base_url";

pub fn http_client() -> Result<reqwest::Client> {
    let c = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    let d = chrono::NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(month_of(d))
}

pub fn fmt_money(d: &Decimal) -> String {
    if d.is_sign_negative() && !d.is_zero() {
        format!("-${:.2}", d.abs().round_dp(2))
    } else {
        format!("${:.2}", d.round_dp(2))
    }
}

pub fn fmt_percent(d: &Decimal) -> String {
    format!("{:.1}%", d.round_dp(1))
}

pub fn month_of(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// The `count` months ending at the month of `reference`, oldest first.
pub fn recent_months(reference: NaiveDate, count: usize) -> Vec<String> {
    let first =
        NaiveDate::from_ymd_opt(reference.year(), reference.month(), 1).unwrap_or(reference);
    (0..count)
        .rev()
        .filter_map(|back| first.checked_sub_months(Months::new(back as u32)))
        .map(month_of)
        .collect()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Flag, then environment, then stored setting, then the default.
pub fn resolve_api_base(conn: &Connection, flag: Option<&str>) -> Result<String> {
    let chosen = match flag {
        Some(f) => f.to_string(),
        None => match std::env::var(API_BASE_ENV) {
            Ok(v) if !v.trim().is_empty() => v,
            _ => get_setting(conn, API_BASE_KEY)?.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        },
    };
    Ok(chosen.trim().trim_end_matches('/').to_string())
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
