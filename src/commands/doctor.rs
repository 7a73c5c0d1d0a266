// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, user_id: i64) -> Result<()> {
    let rows = find_issues(conn, user_id)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

fn push_amount_issue(rows: &mut Vec<Vec<String>>, id: i64, raw: &str) {
    match raw.trim().parse::<Decimal>() {
        Ok(d) if d > Decimal::ZERO => {}
        Ok(_) => rows.push(vec![
            "non_positive_amount".into(),
            format!("transaction {} = {}", id, raw),
        ]),
        Err(_) => rows.push(vec![
            "bad_amount".into(),
            format!("transaction {} = '{}'", id, raw),
        ]),
    }
}

/// Scans the rows of one user for ledger invariant violations.
///
/// Only that user's transactions and accounts are inspected.
pub fn find_issues(conn: &Connection, user_id: i64) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Entries whose account is owned by someone else
    let mut stmt = conn.prepare(
        "SELECT t.id, t.user_id, a.user_id FROM transactions t
         JOIN accounts a ON t.account_id=a.id
         WHERE t.user_id != a.user_id AND (t.user_id=?1 OR a.user_id=?1)",
    )?;
    let mut cur = stmt.query(params![user_id])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let owner: i64 = r.get(1)?;
        let acct_owner: i64 = r.get(2)?;
        rows.push(vec![
            "cross_user_account".into(),
            format!(
                "transaction {} (user {}) -> account of user {}",
                id, owner, acct_owner
            ),
        ]);
    }

    // 2) Amounts that are unreadable or not strictly positive
    let mut stmt2 =
        conn.prepare("SELECT id, amount FROM transactions WHERE user_id=?1 ORDER BY id")?;
    let mut cur2 = stmt2.query(params![user_id])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let raw: String = r.get(1)?;
        push_amount_issue(&mut rows, id, &raw);
    }

    // 3) Unreadable opening balances
    let mut stmt3 =
        conn.prepare("SELECT id, initial_balance FROM accounts WHERE user_id=?1 ORDER BY id")?;
    let mut cur3 = stmt3.query(params![user_id])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        let raw: String = r.get(1)?;
        if raw.trim().parse::<Decimal>().is_err() {
            rows.push(vec!["bad_balance".into(), format!("account {} = '{}'", id, raw)]);
        }
    }

    Ok(rows)
}
