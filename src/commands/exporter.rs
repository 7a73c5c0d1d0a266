// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::TransactionRow;
use crate::db::get_decimal;
use crate::error::TreasuryResult;
use anyhow::{Result, bail};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, user_id, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    let rows = ledger_rows(conn, user_id)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "account", "type", "amount", "description"])?;
            for r in &rows {
                wtr.write_record([
                    r.date.to_string(),
                    r.account.clone(),
                    r.kind.as_str().to_string(),
                    r.amount.to_string(),
                    r.description.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    tracing::info!(user_id, rows = rows.len(), format = %fmt, "ledger exported");
    println!("Exported {} transaction(s) to {}", rows.len(), out);
    Ok(())
}

/// The user's whole ledger in chronological order.
pub fn ledger_rows(conn: &Connection, user_id: i64) -> TreasuryResult<Vec<TransactionRow>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.date, t.account_id, a.name, t.type, t.amount, t.description
         FROM transactions t JOIN accounts a ON t.account_id=a.id
         WHERE t.user_id=?1
         ORDER BY t.date, t.id",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok(TransactionRow {
            id: r.get(0)?,
            date: r.get(1)?,
            account_id: r.get(2)?,
            account: r.get(3)?,
            kind: r.get(4)?,
            amount: get_decimal(r, 5)?,
            description: r.get(6)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
