// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use finally::api::ApiClient;
use finally::auth::AuthGate;
use finally::session::SqliteSessionStore;
use finally::{cli, commands, db, utils};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;
    let flag = matches.get_one::<String>("api-url").map(String::as_str);
    let base = utils::resolve_api_base(&conn, flag)?;
    let client = ApiClient::new(base, AuthGate::new(SqliteSessionStore::new(conn)))?;
    let today = chrono::Local::now().date_naive();

    let outcome = match matches.subcommand() {
        Some(("login", sub)) => commands::auth::login(&client, sub).await,
        Some(("logout", _)) => commands::auth::logout(&client),
        Some(("register", sub)) => commands::auth::register(&client, sub).await,
        Some(("status", _)) => commands::auth::status(&client),
        Some(("profile", sub)) => commands::profile::handle(&client, sub).await,
        Some(("config", sub)) => {
            commands::config::handle(client.gate().store().conn(), client.base_url(), sub)
        }
        Some(("dashboard", sub)) => commands::dashboard::handle(&client, sub, today).await,
        Some(("budget", sub)) => commands::budgets::handle(&client, sub, today).await,
        Some(("expense", sub)) => commands::expenses::handle(&client, sub, today).await,
        Some(("category", sub)) => commands::categories::handle(&client, sub, today).await,
        Some(("goal", sub)) => commands::goals::handle(&client, sub, today).await,
        Some(("report", sub)) => commands::reports::handle(&client, sub, today).await,
        _ => {
            cli::build_cli().print_help()?;
            println!();
            Ok(())
        }
    };

    if let Err(err) = outcome {
        commands::report_failure(&client, &err);
        std::process::exit(1);
    }
    Ok(())
}
