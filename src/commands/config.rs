// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_session_ttl_hours, set_session_ttl_hours};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            match key {
                "session-ttl-hours" => println!("{}", get_session_ttl_hours(conn)?),
                other => bail!("Unknown setting '{}'", other),
            }
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap().trim();
            match key {
                "session-ttl-hours" => {
                    let hours: i64 = value
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Invalid number of hours '{}'", value))?;
                    set_session_ttl_hours(conn, hours)?;
                    println!("session-ttl-hours = {}", hours);
                }
                other => bail!("Unknown setting '{}'", other),
            }
        }
        _ => {}
    }
    Ok(())
}
