// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::catalog::{self, CATALOG};
use crate::error::{TreasuryError, TreasuryResult};
use crate::ledger::{AccountBalance, account_balances};
use crate::models::Account;
use crate::utils::{fmt_rupiah, maybe_print_json, parse_amount, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use rust_decimal::Decimal;

pub fn handle(conn: &mut Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let category = sub.get_one::<String>("category").unwrap().trim();
            let detail = sub.get_one::<String>("detail").unwrap().trim();
            let balance = parse_amount(sub.get_one::<String>("balance").unwrap())?;
            let acct = create_account(conn, user_id, category, detail, balance)?;
            println!(
                "Account '{}' added with opening balance {}",
                acct.name,
                fmt_rupiah(&acct.initial_balance)
            );
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let balance = parse_amount(sub.get_one::<String>("balance").unwrap())?;
            if update_balance(conn, user_id, id, balance)? {
                println!("Opening balance of account {} set to {}", id, fmt_rupiah(&balance));
            } else {
                tracing::warn!(account_id = id, "balance edit matched no account of this user");
                println!("No account {} to update", id);
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let name = delete_account(conn, user_id, id)?;
            println!("{} deleted", name);
        }
        Some(("list", sub)) => list(conn, user_id, sub)?,
        Some(("catalog", _)) => {
            let rows = CATALOG
                .iter()
                .map(|e| vec![e.category.key().to_string(), e.details.join(", ")])
                .collect();
            println!("{}", pretty_table(&["Category", "Options"], rows));
        }
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let balances = list_accounts(conn, user_id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &balances)? {
        let rows = balances
            .iter()
            .map(|b| {
                vec![
                    b.account_id.to_string(),
                    b.name.clone(),
                    fmt_rupiah(&b.initial_balance),
                    fmt_rupiah(&b.balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Account", "Opening", "Balance"], rows)
        );
    }
    Ok(())
}

/// The user's accounts with their computed balances, ordered by name.
pub fn list_accounts(conn: &Connection, user_id: i64) -> TreasuryResult<Vec<AccountBalance>> {
    account_balances(conn, user_id)
}

/// Opens a new account for a catalog category/detail pair.
///
/// The name check and the insert share one write transaction so two
/// concurrent creations cannot both pass the check.
pub fn create_account(
    conn: &mut Connection,
    user_id: i64,
    category: &str,
    detail: &str,
    initial_balance: Decimal,
) -> TreasuryResult<Account> {
    let name = catalog::account_name(category, detail)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM accounts WHERE user_id=?1 AND name=?2",
            params![user_id, &name],
            |r| r.get(0),
        )
        .optional()?;
    if existing.is_some() {
        return Err(TreasuryError::DuplicateAccount(name));
    }
    tx.execute(
        "INSERT INTO accounts(user_id, name, initial_balance) VALUES (?1, ?2, ?3)",
        params![user_id, &name, initial_balance.to_string()],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    tracing::info!(user_id, account_id = id, name = %name, "account created");
    Ok(Account {
        id,
        user_id,
        name,
        initial_balance,
    })
}

/// Overwrites the opening balance; transaction history is untouched.
///
/// Returns `false` when the id does not name one of the user's accounts.
pub fn update_balance(
    conn: &mut Connection,
    user_id: i64,
    account_id: i64,
    new_balance: Decimal,
) -> TreasuryResult<bool> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let n = tx.execute(
        "UPDATE accounts SET initial_balance=?1 WHERE id=?2 AND user_id=?3",
        params![new_balance.to_string(), account_id, user_id],
    )?;
    tx.commit()?;
    if n > 0 {
        tracing::info!(user_id, account_id, "opening balance updated");
    }
    Ok(n > 0)
}

/// Deletes an account that no transaction references, returning its name.
pub fn delete_account(
    conn: &mut Connection,
    user_id: i64,
    account_id: i64,
) -> TreasuryResult<String> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let name: String = tx
        .query_row(
            "SELECT name FROM accounts WHERE id=?1 AND user_id=?2",
            params![account_id, user_id],
            |r| r.get(0),
        )
        .optional()?
        .ok_or(TreasuryError::AccountNotFound(account_id))?;

    let count: i64 = tx.query_row(
        "SELECT COUNT(id) FROM transactions WHERE account_id=?1 AND user_id=?2",
        params![account_id, user_id],
        |r| r.get(0),
    )?;
    if count > 0 {
        return Err(TreasuryError::AccountInUse { name, count });
    }

    tx.execute(
        "DELETE FROM accounts WHERE id=?1 AND user_id=?2",
        params![account_id, user_id],
    )?;
    tx.commit()?;
    tracing::info!(user_id, account_id, "account deleted");
    Ok(name)
}
