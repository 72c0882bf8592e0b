// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn month_arg(required: bool) -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .required(required)
}

pub fn build_cli() -> Command {
    Command::new("finally")
        .version(clap::crate_version!())
        .about("Budget planner client: budgets, expenses, goals and reports")
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .global(true)
                .value_name("URL")
                .help("Override the API base URL for this invocation"),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in and store the session")
                .arg(Arg::new("username").long("username").short('u').required(true))
                .arg(Arg::new("password").long("password").short('p').required(true)),
        )
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(
            Command::new("register")
                .about("Create an account")
                .arg(Arg::new("username").long("username").required(true))
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new("status").about("Show whether a valid session is stored"),
        )
        .subcommand(json_args(
            Command::new("profile").about("Show the signed-in user"),
        ))
        .subcommand(
            Command::new("config")
                .about("Client configuration")
                .subcommand(
                    Command::new("set-api")
                        .about("Store the API base URL")
                        .arg(Arg::new("url").required(true)),
                )
                .subcommand(Command::new("show").about("Show the effective configuration")),
        )
        .subcommand(json_args(
            Command::new("dashboard").about("Current month overview"),
        ))
        .subcommand(
            Command::new("budget")
                .about("Monthly budgets")
                .subcommand(json_args(
                    Command::new("get").about("Budget for one month").arg(month_arg(false)),
                ))
                .subcommand(
                    Command::new("set")
                        .about("Set the limit for a month")
                        .arg(month_arg(true))
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(json_args(
                    Command::new("list").about("Budgets for recent months").arg(
                        Arg::new("months")
                            .long("months")
                            .value_parser(value_parser!(usize))
                            .default_value("12"),
                    ),
                )),
        )
        .subcommand(
            Command::new("expense")
                .about("Expenses")
                .subcommand(
                    Command::new("add")
                        .about("Record an expense")
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD").required(true)),
                )
                .subcommand(json_args(
                    Command::new("list")
                        .about("Expenses for a month")
                        .arg(month_arg(false))
                        .arg(Arg::new("category").long("category")),
                )),
        )
        .subcommand(
            Command::new("category").about("Spending by category").subcommand(json_args(
                Command::new("summary")
                    .about("Totals per category for a month")
                    .arg(month_arg(false)),
            )),
        )
        .subcommand(
            Command::new("goal")
                .about("Monthly spending goals")
                .subcommand(
                    Command::new("set")
                        .about("Create or replace the goal for a month")
                        .arg(month_arg(true))
                        .arg(Arg::new("target").long("target").required(true)),
                )
                .subcommand(json_args(
                    Command::new("list").about("Goals for the last 12 months"),
                )),
        )
        .subcommand(json_args(
            Command::new("report").about("Budget versus spending over a period").arg(
                Arg::new("period")
                    .long("period")
                    .value_parser(["3", "6", "12"])
                    .default_value("3")
                    .help("Number of months"),
            ),
        ))
}
