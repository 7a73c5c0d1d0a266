// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::get_decimal;
use crate::error::{TreasuryError, TreasuryResult};
use crate::models::TransactionKind;
use crate::utils::{fmt_rupiah, maybe_print_json, non_blank, parse_amount, parse_date, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Cap on the dashboard's recent-activity list.
pub const RECENT_LIMIT: usize = 25;

pub fn handle(conn: &mut Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user_id, sub)?,
        Some(("list", sub)) => list(conn, user_id, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let today = chrono::Local::now().date_naive().to_string();
    let date = sub
        .get_one::<String>("date")
        .map(String::as_str)
        .unwrap_or(today.as_str());
    let account = sub.get_one::<String>("account").map(String::as_str).unwrap_or("");
    let kind = sub.get_one::<String>("type").map(String::as_str).unwrap_or("");
    let amount = sub.get_one::<String>("amount").map(String::as_str).unwrap_or("");
    let description = sub.get_one::<String>("description").map(String::as_str);

    let receipt = record_transaction(conn, user_id, date, account, kind, amount, description)?;
    println!("{}", receipt);
    Ok(())
}

fn list(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let mut filter = TransactionFilter::parse(
        sub.get_one::<String>("account").map(String::as_str),
        sub.get_one::<String>("type").map(String::as_str),
    )?;
    if let Some(limit) = sub.get_one::<usize>("limit") {
        filter.limit = *limit;
    }
    let data = recent_transactions(conn, user_id, &filter)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", transactions_table(&data));
    }
    Ok(())
}

pub fn transactions_table(data: &[TransactionRow]) -> comfy_table::Table {
    let rows = data
        .iter()
        .map(|r| {
            vec![
                r.date.to_string(),
                r.account.clone(),
                r.kind.to_string(),
                fmt_rupiah(&r.amount),
                r.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    pretty_table(&["Date", "Account", "Type", "Amount", "Description"], rows)
}

/// Confirmation of a recorded ledger entry.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub account: String,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} recorded to {} on {}",
            self.kind,
            fmt_rupiah(&self.amount),
            self.account,
            self.date
        )
    }
}

/// Validates raw form input and appends one ledger entry.
///
/// Date, account and type must be present and well formed, and the amount
/// must be strictly positive (`Validation`); an amount that does not parse
/// is `InvalidAmount`. The account has to belong to `user_id`
/// (`AccountNotFound`). Existing rows are never modified.
pub fn record_transaction(
    conn: &mut Connection,
    user_id: i64,
    date: &str,
    account_id: &str,
    kind: &str,
    amount: &str,
    description: Option<&str>,
) -> TreasuryResult<Receipt> {
    let (Some(date), Some(account_id), Some(kind), Some(amount)) = (
        non_blank(Some(date)),
        non_blank(Some(account_id)),
        non_blank(Some(kind)),
        non_blank(Some(amount)),
    ) else {
        return Err(TreasuryError::validation(
            "Date, account, type and a positive amount are all required",
        ));
    };
    let amount = parse_amount(amount)?;
    if amount <= Decimal::ZERO {
        return Err(TreasuryError::validation("Amount must be greater than zero"));
    }
    let date = parse_date(date)?;
    let kind: TransactionKind = kind.parse()?;
    let account_id: i64 = account_id
        .parse()
        .map_err(|_| TreasuryError::validation(format!("Invalid account id '{}'", account_id)))?;
    let description = non_blank(description);

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let account: String = tx
        .query_row(
            "SELECT name FROM accounts WHERE id=?1 AND user_id=?2",
            params![account_id, user_id],
            |r| r.get(0),
        )
        .optional()?
        .ok_or(TreasuryError::AccountNotFound(account_id))?;
    tx.execute(
        "INSERT INTO transactions(user_id, date, account_id, type, amount, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![user_id, date, account_id, kind, amount.to_string(), description],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    tracing::info!(
        user_id,
        account_id,
        transaction_id = id,
        kind = kind.as_str(),
        "transaction recorded"
    );
    Ok(Receipt {
        id,
        date,
        kind,
        amount,
        account,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: NaiveDate,
    pub account_id: i64,
    pub account: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFilter {
    pub account_id: Option<i64>,
    pub kind: Option<TransactionKind>,
    pub limit: usize,
}

impl Default for TransactionFilter {
    fn default() -> Self {
        Self {
            account_id: None,
            kind: None,
            limit: RECENT_LIMIT,
        }
    }
}

impl TransactionFilter {
    /// Builds a filter from raw selector values; blank or `all` means unfiltered.
    pub fn parse(account: Option<&str>, kind: Option<&str>) -> TreasuryResult<Self> {
        fn selected(v: Option<&str>) -> Option<&str> {
            non_blank(v).filter(|s| !s.eq_ignore_ascii_case("all"))
        }
        let account_id = selected(account)
            .map(|s| {
                s.parse::<i64>()
                    .map_err(|_| TreasuryError::validation(format!("Invalid account id '{}'", s)))
            })
            .transpose()?;
        let kind = selected(kind).map(str::parse::<TransactionKind>).transpose()?;
        Ok(Self {
            account_id,
            kind,
            ..Self::default()
        })
    }
}

/// Newest-first listing of a user's ledger, narrowed by `filter`.
pub fn recent_transactions(
    conn: &Connection,
    user_id: i64,
    filter: &TransactionFilter,
) -> TreasuryResult<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, t.account_id, a.name, t.type, t.amount, t.description
         FROM transactions t JOIN accounts a ON t.account_id=a.id
         WHERE t.user_id=?",
    );
    let mut params_vec: Vec<Value> = vec![Value::Integer(user_id)];

    if let Some(account_id) = filter.account_id {
        sql.push_str(" AND t.account_id=?");
        params_vec.push(Value::Integer(account_id));
    }
    if let Some(kind) = filter.kind {
        sql.push_str(" AND t.type=?");
        params_vec.push(Value::Text(kind.as_str().to_string()));
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC LIMIT ?");
    params_vec.push(Value::Integer(filter.limit as i64));

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec))?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(TransactionRow {
            id: r.get(0)?,
            date: r.get(1)?,
            account_id: r.get(2)?,
            account: r.get(3)?,
            kind: r.get(4)?,
            amount: get_decimal(r, 5)?,
            description: r.get(6)?,
        });
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_treats_all_as_unfiltered() {
        let f = TransactionFilter::parse(Some("all"), Some("ALL")).unwrap();
        assert_eq!(f, TransactionFilter::default());
        let f = TransactionFilter::parse(Some(" 3 "), Some("expense")).unwrap();
        assert_eq!(f.account_id, Some(3));
        assert_eq!(f.kind, Some(TransactionKind::Expense));
        assert_eq!(f.limit, RECENT_LIMIT);
        assert!(TransactionFilter::parse(Some("x"), None).is_err());
    }
}
