// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::error::{TreasuryError, TreasuryResult};

pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Largest magnitude accepted for an amount or opening balance (10^18 Rupiah).
// 10^18 == 0x0DE0_B6B3_A764_0000; `Decimal::new` is not const.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

pub fn parse_date(s: &str) -> TreasuryResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        TreasuryError::validation(format!("Invalid date '{}', expected YYYY-MM-DD", s))
    })
}

/// Parses an amount written in Indonesian notation ("1.234.567,89").
///
/// Every '.' is a thousands separator and ',' is the decimal mark.
/// Magnitudes above [`MAX_AMOUNT`] are rejected.
pub fn parse_amount(s: &str) -> TreasuryResult<Decimal> {
    let normalized = s.trim().replace('.', "").replace(',', ".");
    if normalized.is_empty() {
        return Err(TreasuryError::InvalidAmount(s.to_string()));
    }
    let amount = normalized
        .parse::<Decimal>()
        .map_err(|_| TreasuryError::InvalidAmount(s.to_string()))?;
    if amount.abs() > MAX_AMOUNT {
        return Err(TreasuryError::InvalidAmount(s.to_string()));
    }
    Ok(amount)
}

/// Renders an amount as Rupiah, e.g. `Rp 1.234.567,89` or `-Rp 500,00`.
pub fn fmt_rupiah(d: &Decimal) -> String {
    let sign = if d.is_sign_negative() && !d.is_zero() {
        "-"
    } else {
        ""
    };
    let plain = format!("{:.2}", d.abs().round_dp(2));
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{}Rp {},{}", sign, grouped, frac_part)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn get_setting(conn: &Connection, key: &str) -> TreasuryResult<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> TreasuryResult<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Session lifetime; falls back to the default when unset or unreadable.
pub fn get_session_ttl_hours(conn: &Connection) -> TreasuryResult<i64> {
    let raw = get_setting(conn, "session_ttl_hours")?;
    Ok(raw
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|h| *h > 0)
        .unwrap_or(DEFAULT_SESSION_TTL_HOURS))
}

pub fn set_session_ttl_hours(conn: &Connection, hours: i64) -> TreasuryResult<()> {
    if hours <= 0 {
        return Err(TreasuryError::validation(
            "session_ttl_hours must be a positive number of hours",
        ));
    }
    set_setting(conn, "session_ttl_hours", &hours.to_string())
}

/// Treats blank strings as absent.
pub fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
