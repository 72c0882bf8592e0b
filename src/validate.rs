// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Form checks that run before anything is sent to the server.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::ClientError;
use crate::models::{Credentials, NewExpense, Registration};
use crate::utils::{month_of, parse_date, parse_month};

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn positive_amount(raw: &str, msg: &str) -> Result<Decimal, ClientError> {
    match raw.trim().parse::<Decimal>() {
        Ok(v) if v > Decimal::ZERO => Ok(v),
        _ => Err(ClientError::validation(msg)),
    }
}

pub fn credentials(username: &str, password: &str) -> Result<Credentials, ClientError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(ClientError::validation("Please enter username and password"));
    }
    Ok(Credentials {
        username: username.trim().to_string(),
        password: password.to_string(),
    })
}

/// All field problems are reported together, separated by "; ".
pub fn registration(
    username: &str,
    email: &str,
    password: &str,
) -> Result<Registration, ClientError> {
    let mut problems = Vec::new();
    if username.trim().is_empty() {
        problems.push("Username is required");
    }
    if email.trim().is_empty() {
        problems.push("Email is required");
    } else if !is_valid_email(email.trim()) {
        problems.push("Please enter a valid email");
    }
    if password.is_empty() {
        problems.push("Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        problems.push("Password must be at least 6 characters");
    }
    if !problems.is_empty() {
        return Err(ClientError::validation(problems.join("; ")));
    }
    Ok(Registration {
        username: username.trim().to_string(),
        email: email.trim().to_string(),
        password: password.to_string(),
    })
}

pub fn expense(
    description: &str,
    amount: &str,
    category: &str,
    date: &str,
) -> Result<NewExpense, ClientError> {
    if [description, amount, category, date]
        .iter()
        .any(|f| f.trim().is_empty())
    {
        return Err(ClientError::validation("Please fill in all fields"));
    }
    let amount = positive_amount(amount, "Please enter a valid amount")?;
    let date = parse_date(date.trim())
        .map_err(|_| ClientError::validation("Please enter a valid date (YYYY-MM-DD)"))?;
    Ok(NewExpense {
        description: description.trim().to_string(),
        amount,
        category: category.trim().to_string(),
        date,
        month: month_of(date),
    })
}

/// Month and target for a budget goal.
pub fn goal(month: &str, target: &str) -> Result<(String, Decimal), ClientError> {
    if month.trim().is_empty() || target.trim().is_empty() {
        return Err(ClientError::validation("Please fill in all fields"));
    }
    let month = parse_month(month.trim())
        .map_err(|_| ClientError::validation("Please choose a month as YYYY-MM"))?;
    let target = positive_amount(target, "Please enter a valid target amount")?;
    Ok((month, target))
}
