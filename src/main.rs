// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use treasury_flow::commands::auth::require_user;
use treasury_flow::{cli, commands, db, session};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_path = matches.get_one::<String>("db").map(PathBuf::from);
    let mut conn = db::open_or_init(db_path.as_deref())?;

    let token = match matches.get_one::<String>("session") {
        Some(t) => Some(t.trim().to_string()),
        None => session::load_token(&session::token_path()?)?,
    };
    let token = token.as_deref();

    match matches.subcommand() {
        Some(("init", _)) => match &db_path {
            Some(p) => println!("Database initialized at {}", p.display()),
            None => println!("Database initialized at {}", db::db_path()?.display()),
        },
        Some(("register", sub)) => commands::auth::handle_register(&conn, sub)?,
        Some(("login", sub)) => commands::auth::handle_login(&conn, sub)?,
        Some(("logout", _)) => commands::auth::handle_logout(&conn, token)?,
        Some(("whoami", _)) => {
            let user_id = require_user(&conn, token)?;
            let user = commands::auth::current_user(&conn, user_id)?;
            println!("{} ({})", user.fullname, user.username);
        }
        Some(("dashboard", sub)) => {
            let user_id = require_user(&conn, token)?;
            commands::dashboard::handle(&conn, user_id, sub)?
        }
        Some(("profile", sub)) => {
            let user_id = require_user(&conn, token)?;
            commands::profile::handle(&conn, user_id, sub)?
        }
        Some(("account", sub)) => {
            let user_id = require_user(&conn, token)?;
            commands::accounts::handle(&mut conn, user_id, sub)?
        }
        Some(("tx", sub)) => {
            let user_id = require_user(&conn, token)?;
            commands::transactions::handle(&mut conn, user_id, sub)?
        }
        Some(("export", sub)) => {
            let user_id = require_user(&conn, token)?;
            commands::exporter::handle(&conn, user_id, sub)?
        }
        Some(("config", sub)) => {
            // settings are store-wide; changing one still needs a login
            if matches!(sub.subcommand_name(), Some("set")) {
                require_user(&conn, token)?;
            }
            commands::config::handle(&conn, sub)?
        }
        Some(("doctor", _)) => {
            let user_id = require_user(&conn, token)?;
            commands::doctor::handle(&conn, user_id)?
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
