// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::{
    TransactionFilter, TransactionRow, recent_transactions, transactions_table,
};
use crate::error::TreasuryResult;
use crate::ledger::{LedgerSummary, summarize};
use crate::utils::{fmt_rupiah, maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    #[serde(flatten)]
    pub summary: LedgerSummary,
    pub recent: Vec<TransactionRow>,
}

pub fn handle(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let filter = TransactionFilter::parse(
        sub.get_one::<String>("account").map(String::as_str),
        sub.get_one::<String>("type").map(String::as_str),
    )?;
    let today = chrono::Local::now().date_naive();
    let dash = build_dashboard(conn, user_id, today, &filter)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &dash)? {
        return Ok(());
    }

    let s = &dash.summary;
    println!(
        "{}",
        pretty_table(
            &["Total balance", "Total expense", "Expense today", "Expense 7 days"],
            vec![vec![
                fmt_rupiah(&s.total_balance),
                fmt_rupiah(&s.total_expense),
                fmt_rupiah(&s.expense_today),
                fmt_rupiah(&s.expense_week),
            ]],
        )
    );
    let accounts = s
        .accounts
        .iter()
        .map(|a| vec![a.account_id.to_string(), a.name.clone(), fmt_rupiah(&a.balance)])
        .collect();
    println!("{}", pretty_table(&["ID", "Account", "Balance"], accounts));
    println!("{}", transactions_table(&dash.recent));
    Ok(())
}

pub fn build_dashboard(
    conn: &Connection,
    user_id: i64,
    today: NaiveDate,
    filter: &TransactionFilter,
) -> TreasuryResult<Dashboard> {
    Ok(Dashboard {
        summary: summarize(conn, user_id, today)?,
        recent: recent_transactions(conn, user_id, filter)?,
    })
}
