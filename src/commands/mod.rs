// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use clap::ArgMatches;
use tracing::debug;

use crate::api::{ApiClient, BatchOutcome};
use crate::error::ClientError;
use crate::session::SessionStore;

pub mod auth;
pub mod budgets;
pub mod categories;
pub mod config;
pub mod dashboard;
pub mod expenses;
pub mod goals;
pub mod profile;
pub mod reports;

pub(crate) fn value<'a>(m: &'a ArgMatches, id: &str) -> &'a str {
    m.get_one::<String>(id).map(String::as_str).unwrap_or("")
}

/// Gate for every page that needs a session.
pub fn require_login<S: SessionStore>(client: &ApiClient<S>) -> Result<()> {
    if client.gate().is_authenticated() {
        Ok(())
    } else {
        Err(anyhow!("Not signed in. Run `finally login` first."))
    }
}

/// A batch that saw a 403 fails as a whole so the session is cleared once.
pub(crate) fn check_batch<T>(batch: &BatchOutcome<T>) -> Result<()> {
    if batch.unauthorized {
        return Err(ClientError::Unauthorized.into());
    }
    if batch.degraded > 0 {
        eprintln!(
            "Note: {} month(s) could not be loaded and are shown as zero",
            batch.degraded
        );
    }
    Ok(())
}

/// Turn a failed command into a notification. A 403 clears the session and
/// sends the user back to login.
pub fn report_failure<S: SessionStore>(client: &ApiClient<S>, err: &anyhow::Error) {
    match err.downcast_ref::<ClientError>() {
        Some(ClientError::Unauthorized) => client.gate().handle_unauthorized(
            |notice| eprintln!("{}: {}", notice.title, notice.description),
            |route| eprintln!("Redirecting to {}. Run `finally login` to sign in again.", route),
        ),
        Some(e) => {
            debug!(error = %e, "command failed");
            eprintln!("Error: {}", e.user_message());
        }
        None => eprintln!("Error: {:#}", err),
    }
}
