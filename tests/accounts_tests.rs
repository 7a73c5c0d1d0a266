// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use treasury_flow::commands::{accounts, transactions};
use treasury_flow::{TreasuryError, cli, db, ledger};

fn setup() -> Connection {
    let conn = db::open_in_memory().unwrap();
    conn.execute(
        "INSERT INTO users(id, fullname, username, password_hash)
         VALUES (1,'Budi','budi','x'), (2,'Sari','sari','x')",
        [],
    )
    .unwrap();
    conn
}

#[test]
fn create_names_accounts_by_category() {
    let mut conn = setup();
    let cash = accounts::create_account(&mut conn, 1, "CASH", "Cash", Decimal::ZERO).unwrap();
    let wallet = accounts::create_account(&mut conn, 1, "E-WALLET", "DANA", Decimal::ZERO).unwrap();
    assert_eq!(cash.name, "Cash");
    assert_eq!(wallet.name, "[E-WALLET] DANA");
}

#[test]
fn duplicate_pair_rejected_for_same_user_only() {
    let mut conn = setup();
    accounts::create_account(&mut conn, 1, "BANK", "Mandiri", Decimal::ZERO).unwrap();
    let err = accounts::create_account(
        &mut conn,
        1,
        "BANK",
        "Mandiri",
        Decimal::from(5),
    )
    .unwrap_err();
    assert!(matches!(err, TreasuryError::DuplicateAccount(ref n) if n == "[BANK] Mandiri"));

    accounts::create_account(&mut conn, 2, "BANK", "Mandiri", Decimal::ZERO).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM accounts WHERE name='[BANK] Mandiri'", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn pair_outside_catalog_is_invalid_selection() {
    let mut conn = setup();
    let err = accounts::create_account(&mut conn, 1, "BANK", "Bank of Nowhere", Decimal::ZERO)
        .unwrap_err();
    assert!(matches!(err, TreasuryError::InvalidSelection { .. }));
    let err = accounts::create_account(&mut conn, 1, "CASH", "DANA", Decimal::ZERO).unwrap_err();
    assert!(matches!(err, TreasuryError::InvalidSelection { .. }));
}

#[test]
fn negative_opening_balance_is_allowed() {
    let mut conn = setup();
    let acct = accounts::create_account(&mut conn, 1, "BANK", "BRI", Decimal::from(-250)).unwrap();
    let balances = ledger::account_balances(&conn, 1).unwrap();
    assert_eq!(balances[0].account_id, acct.id);
    assert_eq!(balances[0].balance, Decimal::from(-250));
}

#[test]
fn update_balance_ignores_other_users_accounts() {
    let mut conn = setup();
    let acct = accounts::create_account(&mut conn, 1, "CASH", "Cash", Decimal::from(100)).unwrap();
    assert!(!accounts::update_balance(&mut conn, 2, acct.id, Decimal::from(1)).unwrap());
    assert!(!accounts::update_balance(&mut conn, 1, 9999, Decimal::from(1)).unwrap());
    let balances = ledger::account_balances(&conn, 1).unwrap();
    assert_eq!(balances[0].initial_balance, Decimal::from(100));
}

#[test]
fn delete_unused_account_succeeds() {
    let mut conn = setup();
    let acct = accounts::create_account(&mut conn, 1, "E-WALLET", "GoPay", Decimal::ZERO).unwrap();
    let name = accounts::delete_account(&mut conn, 1, acct.id).unwrap();
    assert_eq!(name, "[E-WALLET] GoPay");
    assert!(ledger::account_balances(&conn, 1).unwrap().is_empty());
}

#[test]
fn delete_with_transactions_reports_exact_count() {
    let mut conn = setup();
    let acct = accounts::create_account(&mut conn, 1, "CASH", "Cash", Decimal::ZERO).unwrap();
    let id = acct.id.to_string();
    for _ in 0..3 {
        transactions::record_transaction(&mut conn, 1, "2025-01-05", &id, "expense", "1", None)
            .unwrap();
    }
    match accounts::delete_account(&mut conn, 1, acct.id) {
        Err(TreasuryError::AccountInUse { name, count }) => {
            assert_eq!(name, "Cash");
            assert_eq!(count, 3);
        }
        other => panic!("expected AccountInUse, got {:?}", other),
    }
    assert_eq!(ledger::account_balances(&conn, 1).unwrap().len(), 1);
}

#[test]
fn delete_of_another_users_account_is_not_found() {
    let mut conn = setup();
    let acct = accounts::create_account(&mut conn, 1, "CASH", "Cash", Decimal::ZERO).unwrap();
    let err = accounts::delete_account(&mut conn, 2, acct.id).unwrap_err();
    assert!(matches!(err, TreasuryError::AccountNotFound(id) if id == acct.id));
    assert_eq!(ledger::account_balances(&conn, 1).unwrap().len(), 1);
}

#[test]
fn account_add_parses_indonesian_balance() {
    let mut conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "treasury",
        "account",
        "add",
        "--category",
        " BANK ",
        "--detail",
        "Jenius",
        "--balance",
        "1.500.000,50",
    ]);
    let Some(("account", acct_m)) = matches.subcommand() else {
        panic!("account command not parsed");
    };
    accounts::handle(&mut conn, 1, acct_m).unwrap();
    let balances = ledger::account_balances(&conn, 1).unwrap();
    assert_eq!(balances[0].name, "[BANK] Jenius");
    assert_eq!(
        balances[0].initial_balance,
        "1500000.50".parse::<Decimal>().unwrap()
    );
}

#[test]
fn account_add_rejects_unparseable_balance() {
    let mut conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "treasury", "account", "add", "--category", "CASH", "--detail", "Cash", "--balance", "lots",
    ]);
    let Some(("account", acct_m)) = matches.subcommand() else {
        panic!("account command not parsed");
    };
    let err = accounts::handle(&mut conn, 1, acct_m).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TreasuryError>(),
        Some(TreasuryError::InvalidAmount(_))
    ));
}

#[test]
fn list_accounts_is_scoped_and_sorted_by_name() {
    let mut conn = setup();
    accounts::create_account(&mut conn, 1, "CASH", "Cash", Decimal::ZERO).unwrap();
    accounts::create_account(&mut conn, 1, "BANK", "BCA", Decimal::ZERO).unwrap();
    accounts::create_account(&mut conn, 2, "BANK", "BNI", Decimal::ZERO).unwrap();
    let names: Vec<String> = accounts::list_accounts(&conn, 1)
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(names, vec!["Cash".to_string(), "[BANK] BCA".to_string()]);
}
