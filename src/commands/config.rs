// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rusqlite::Connection;

use crate::utils::{get_setting, pretty_table, set_setting, API_BASE_KEY, DEFAULT_API_BASE};

pub fn handle(conn: &Connection, effective_base: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-api", sub)) => {
            let url = super::value(sub, "url").trim().trim_end_matches('/');
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                bail!("Invalid API URL '{}', expected http:// or https://", url);
            }
            set_setting(conn, API_BASE_KEY, url)?;
            println!("API base URL set to {}", url);
        }
        Some(("show", _)) => {
            let stored = get_setting(conn, API_BASE_KEY)?.unwrap_or_else(|| "-".into());
            let rows = vec![
                vec!["effective api url".to_string(), effective_base.to_string()],
                vec!["stored api url".to_string(), stored],
                vec!["default api url".to_string(), DEFAULT_API_BASE.to_string()],
                vec!["database".to_string(), crate::db::db_path()?.display().to_string()],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}
