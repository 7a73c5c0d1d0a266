// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Balance and expense aggregation over a user's ledger.
//!
//! Nothing here is cached: every figure is recomputed from the stored
//! `accounts` and `transactions` rows.

use chrono::{Duration, NaiveDate};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::db::get_decimal;
use crate::error::{TreasuryError, TreasuryResult};
use crate::models::{Account, TransactionKind};

/// Days covered by the weekly expense window, today included.
pub const WEEK_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize)]
pub struct AccountBalance {
    pub account_id: i64,
    pub name: String,
    pub initial_balance: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerSummary {
    pub accounts: Vec<AccountBalance>,
    pub total_balance: Decimal,
    pub total_expense: Decimal,
    pub expense_today: Decimal,
    pub expense_week: Decimal,
}

fn checked_total(acc: Decimal, value: Decimal, what: &str) -> TreasuryResult<Decimal> {
    acc.checked_add(value)
        .ok_or_else(|| TreasuryError::Overflow(what.to_string()))
}

/// Folds signed entries into the accounts' opening balances.
///
/// Entries for accounts missing from `accounts` are skipped. A balance that
/// leaves the `Decimal` range is reported as `Overflow`.
pub fn fold_balances<'a, I>(
    accounts: &[Account],
    entries: I,
) -> TreasuryResult<BTreeMap<i64, Decimal>>
where
    I: IntoIterator<Item = &'a (i64, TransactionKind, Decimal)>,
{
    let mut balances: BTreeMap<i64, Decimal> = accounts
        .iter()
        .map(|a| (a.id, a.initial_balance))
        .collect();
    for (account_id, kind, amount) in entries {
        match balances.get_mut(account_id) {
            Some(bal) => {
                *bal = checked_total(*bal, kind.apply(*amount), "account balance")?;
            }
            None => tracing::warn!(account_id, "entry references an unknown account; skipped"),
        }
    }
    Ok(balances)
}

pub fn user_accounts(conn: &Connection, user_id: i64) -> TreasuryResult<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, initial_balance FROM accounts WHERE user_id=?1 ORDER BY name",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok(Account {
            id: r.get(0)?,
            user_id: r.get(1)?,
            name: r.get(2)?,
            initial_balance: get_decimal(r, 3)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn user_entries(
    conn: &Connection,
    user_id: i64,
) -> TreasuryResult<Vec<(i64, TransactionKind, Decimal)>> {
    let mut stmt =
        conn.prepare("SELECT account_id, type, amount FROM transactions WHERE user_id=?1")?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok((r.get(0)?, r.get(1)?, get_decimal(r, 2)?))
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Current balance of every account the user owns.
pub fn account_balances(conn: &Connection, user_id: i64) -> TreasuryResult<Vec<AccountBalance>> {
    let accounts = user_accounts(conn, user_id)?;
    let entries = user_entries(conn, user_id)?;
    let balances = fold_balances(&accounts, &entries)?;
    Ok(accounts
        .into_iter()
        .map(|a| AccountBalance {
            balance: balances.get(&a.id).copied().unwrap_or(a.initial_balance),
            account_id: a.id,
            name: a.name,
            initial_balance: a.initial_balance,
        })
        .collect())
}

/// Sum of expenses dated within `from..=to`; an open `from` means since the beginning.
///
/// No matching rows sums to zero.
pub fn expense_between(
    conn: &Connection,
    user_id: i64,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> TreasuryResult<Decimal> {
    let mut stmt = conn.prepare(
        "SELECT amount FROM transactions
         WHERE user_id=?1 AND type='expense'
           AND (?2 IS NULL OR date >= ?2)
           AND (?3 IS NULL OR date <= ?3)",
    )?;
    let rows = stmt.query_map(params![user_id, from, to], |r| get_decimal(r, 0))?;
    let mut total = Decimal::ZERO;
    for amount in rows {
        total = checked_total(total, amount?, "expenses")?;
    }
    Ok(total)
}

pub fn summarize(
    conn: &Connection,
    user_id: i64,
    today: NaiveDate,
) -> TreasuryResult<LedgerSummary> {
    let accounts = account_balances(conn, user_id)?;
    let total_balance = accounts
        .iter()
        .try_fold(Decimal::ZERO, |acc, a| checked_total(acc, a.balance, "total balance"))?;
    let week_start = today - Duration::days(WEEK_WINDOW_DAYS - 1);

    let summary = LedgerSummary {
        total_balance,
        total_expense: expense_between(conn, user_id, None, None)?,
        expense_today: expense_between(conn, user_id, Some(today), Some(today))?,
        expense_week: expense_between(conn, user_id, Some(week_start), Some(today))?,
        accounts,
    };
    tracing::debug!(user_id, %today, accounts = summary.accounts.len(), "ledger summarized");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: i64, initial: i64) -> Account {
        Account {
            id,
            user_id: 1,
            name: format!("A{}", id),
            initial_balance: Decimal::from(initial),
        }
    }

    #[test]
    fn fold_is_order_independent() {
        let accounts = vec![account(1, 100_000), account(2, 0)];
        let mut entries = vec![
            (1, TransactionKind::Expense, Decimal::from(20_000)),
            (1, TransactionKind::Income, Decimal::from(50_000)),
            (2, TransactionKind::Expense, Decimal::new(250, 2)),
        ];
        let forward = fold_balances(&accounts, &entries).unwrap();
        entries.reverse();
        let backward = fold_balances(&accounts, &entries).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward[&1], Decimal::from(130_000));
        assert_eq!(forward[&2], Decimal::new(-250, 2));
    }

    #[test]
    fn fold_skips_foreign_accounts() {
        let accounts = vec![account(1, 10)];
        let entries = [(99, TransactionKind::Income, Decimal::from(5))];
        let balances = fold_balances(&accounts, &entries).unwrap();
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[&1], Decimal::from(10));
    }

    #[test]
    fn fold_reports_overflow_instead_of_panicking() {
        let accounts = vec![account(1, 0)];
        let entries = [
            (1, TransactionKind::Expense, Decimal::MAX),
            (1, TransactionKind::Expense, Decimal::MAX),
        ];
        assert!(matches!(
            fold_balances(&accounts, &entries),
            Err(TreasuryError::Overflow(_))
        ));
    }
}
