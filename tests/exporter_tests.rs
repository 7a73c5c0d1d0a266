// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::tempdir;
use treasury_flow::commands::{accounts, doctor, exporter, transactions};
use treasury_flow::{cli, db};

fn base_conn() -> Connection {
    let mut conn = db::open_in_memory().unwrap();
    conn.execute(
        "INSERT INTO users(id, fullname, username, password_hash)
         VALUES (1,'Budi','budi','x'), (2,'Sari','sari','x')",
        [],
    )
    .unwrap();
    let mine = accounts::create_account(&mut conn, 1, "BANK", "BCA", Decimal::ZERO).unwrap();
    let theirs = accounts::create_account(&mut conn, 2, "CASH", "Cash", Decimal::ZERO).unwrap();
    transactions::record_transaction(
        &mut conn,
        1,
        "2025-01-02",
        &mine.id.to_string(),
        "expense",
        "12.340,50",
        Some("Warung"),
    )
    .unwrap();
    transactions::record_transaction(
        &mut conn,
        2,
        "2025-01-01",
        &theirs.id.to_string(),
        "income",
        "1",
        None,
    )
    .unwrap();
    conn
}

fn export_matches(format: &str, out: &str) -> clap::ArgMatches {
    let matches = cli::build_cli().get_matches_from([
        "treasury",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ]);
    match matches.subcommand() {
        Some(("export", m)) => m.clone(),
        _ => panic!("export command not parsed"),
    }
}

#[test]
fn export_json_contains_only_own_ledger() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    exporter::handle(&conn, 1, &export_matches("json", &out_str)).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    let items = written.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["account"], json!("[BANK] BCA"));
    assert_eq!(items[0]["kind"], json!("expense"));
    assert_eq!(items[0]["amount"], json!("12340.50"));
    assert_eq!(items[0]["description"], json!("Warung"));
}

#[test]
fn export_csv_writes_header_and_rows() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    exporter::handle(&conn, 2, &export_matches("CSV", &out_str)).unwrap();

    let body = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = body.lines();
    assert_eq!(lines.next(), Some("date,account,type,amount,description"));
    assert_eq!(lines.next(), Some("2025-01-01,Cash,income,1,"));
    assert_eq!(lines.next(), None);
}

#[test]
fn export_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_str = dir.path().join("x").to_string_lossy().to_string();
    let err = exporter::handle(&conn, 1, &export_matches("xml", &out_str)).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
}

#[test]
fn doctor_is_clean_for_consistent_data() {
    let conn = base_conn();
    assert!(doctor::find_issues(&conn, 1).unwrap().is_empty());
    assert!(doctor::find_issues(&conn, 2).unwrap().is_empty());
}

fn issue_kinds(conn: &Connection, user_id: i64) -> Vec<String> {
    doctor::find_issues(conn, user_id)
        .unwrap()
        .into_iter()
        .map(|r| r[0].clone())
        .collect()
}

#[test]
fn doctor_flags_bad_rows_of_the_acting_user_only() {
    let conn = base_conn();
    conn.execute_batch(
        "PRAGMA foreign_keys = OFF;
         UPDATE transactions SET amount='-3' WHERE user_id=2;
         UPDATE accounts SET initial_balance='n/a' WHERE user_id=2;
         UPDATE transactions SET user_id=2 WHERE user_id=1;",
    )
    .unwrap();

    let sari = issue_kinds(&conn, 2);
    assert!(sari.contains(&"cross_user_account".to_string()));
    assert!(sari.contains(&"non_positive_amount".to_string()));
    assert!(sari.contains(&"bad_balance".to_string()));

    // user 1 only sees the foreign entry on their own account
    assert_eq!(issue_kinds(&conn, 1), vec!["cross_user_account".to_string()]);
    assert!(issue_kinds(&conn, 3).is_empty());
}
