// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
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

fn type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .value_parser(["income", "expense", "all"])
        .help("Transaction type filter")
}

pub fn build_cli() -> Command {
    Command::new("treasury")
        .about("Treasury Flow: accounts, income/expense ledger and balances")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("TREASURY_DB")
                .help("Path to the SQLite database (default: platform data dir)"),
        )
        .arg(
            Arg::new("session")
                .long("session")
                .global(true)
                .env("TREASURY_SESSION")
                .hide_env_values(true)
                .help("Session token (default: token saved by `login`)"),
        )
        .subcommand(Command::new("init").about("Create the database if missing"))
        .subcommand(
            Command::new("register")
                .about("Create a user")
                .arg(Arg::new("fullname").long("fullname").required(true))
                .arg(Arg::new("username").long("username").required(true))
                .arg(
                    Arg::new("password")
                        .long("password")
                        .help("Prompted for when omitted"),
                ),
        )
        .subcommand(
            Command::new("login")
                .about("Log in and remember the session")
                .arg(Arg::new("username").long("username").required(true))
                .arg(
                    Arg::new("password")
                        .long("password")
                        .help("Prompted for when omitted"),
                ),
        )
        .subcommand(Command::new("logout").about("End the current session"))
        .subcommand(Command::new("whoami").about("Show the logged-in user"))
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Balances, expense totals and recent transactions")
                .arg(
                    Arg::new("account")
                        .long("account")
                        .help("Account id, or 'all'"),
                )
                .arg(type_arg()),
        ))
        .subcommand(
            Command::new("profile")
                .about("Show or change your profile")
                .subcommand(
                    Command::new("name")
                        .about("Change full name")
                        .arg(Arg::new("fullname").required(true)),
                )
                .subcommand(
                    Command::new("username")
                        .about("Change username")
                        .arg(Arg::new("username").required(true)),
                )
                .subcommand(
                    Command::new("password")
                        .about("Change password (ends all sessions)")
                        .arg(Arg::new("old").long("old"))
                        .arg(Arg::new("new").long("new"))
                        .arg(Arg::new("confirm").long("confirm")),
                ),
        )
        .subcommand(
            Command::new("account")
                .about("Manage money accounts")
                .subcommand(
                    Command::new("add")
                        .about("Open an account from the catalog")
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .help("CASH, E-WALLET or BANK"),
                        )
                        .arg(Arg::new("detail").long("detail").required(true))
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .allow_hyphen_values(true)
                                .default_value("0")
                                .help("Opening balance, e.g. 1.500.000,00"),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Set the opening balance")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .required(true)
                                .allow_hyphen_values(true),
                        ),
                )
                .subcommand(
                    Command::new("rm").about("Delete an unused account").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(json_flags(Command::new("list").about("List accounts with balances")))
                .subcommand(Command::new("catalog").about("Show the available account options")),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record income or expense")
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("YYYY-MM-DD (default: today)"),
                        )
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("income or expense"),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Positive amount, e.g. 20.000 or 12,50"),
                        )
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("Newest transactions first")
                        .arg(Arg::new("account").long("account"))
                        .arg(type_arg())
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export your ledger")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv or json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Read or change store-wide settings (set requires a login)")
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check your stored data for inconsistencies"))
}
