// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::{hash_password, revoke_all_sessions, verify_password};
use crate::commands::auth::{current_user, password_arg};
use crate::error::{TreasuryError, TreasuryResult};
use crate::session;
use crate::utils::non_blank;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};

pub fn handle(conn: &Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("name", sub)) => {
            let fullname = sub.get_one::<String>("fullname").unwrap();
            update_fullname(conn, user_id, fullname)?;
            println!("Full name updated");
        }
        Some(("username", sub)) => {
            let username = sub.get_one::<String>("username").unwrap();
            update_username(conn, user_id, username)?;
            println!("Username updated");
        }
        Some(("password", sub)) => {
            let old = password_arg(sub, "old", "Current password: ")?;
            let new = password_arg(sub, "new", "New password: ")?;
            let confirm = password_arg(sub, "confirm", "Confirm new password: ")?;
            change_password(conn, user_id, &old, &new, &confirm)?;
            session::clear_token(&session::token_path()?)?;
            println!("Password changed. Please log in again.");
        }
        _ => {
            let user = current_user(conn, user_id)?;
            println!("{} ({})", user.fullname, user.username);
        }
    }
    Ok(())
}

pub fn update_fullname(conn: &Connection, user_id: i64, fullname: &str) -> TreasuryResult<()> {
    let fullname = non_blank(Some(fullname))
        .ok_or_else(|| TreasuryError::validation("Full name is required"))?;
    conn.execute(
        "UPDATE users SET fullname=?1 WHERE id=?2",
        params![fullname, user_id],
    )?;
    tracing::info!(user_id, "full name updated");
    Ok(())
}

/// Renames the user; the new name must not belong to anybody else.
pub fn update_username(conn: &Connection, user_id: i64, username: &str) -> TreasuryResult<()> {
    let username =
        non_blank(Some(username)).ok_or_else(|| TreasuryError::validation("Username is required"))?;
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let other: Option<i64> = tx
        .query_row(
            "SELECT id FROM users WHERE username=?1 AND id != ?2",
            params![username, user_id],
            |r| r.get(0),
        )
        .optional()?;
    if other.is_some() {
        return Err(TreasuryError::UsernameTaken(username.to_string()));
    }
    tx.execute(
        "UPDATE users SET username=?1 WHERE id=?2",
        params![username, user_id],
    )?;
    tx.commit()?;
    tracing::info!(user_id, "username updated");
    Ok(())
}

/// Replaces the password and ends every open session of the user.
///
/// The new hash and the session purge commit together or not at all.
pub fn change_password(
    conn: &Connection,
    user_id: i64,
    old: &str,
    new: &str,
    confirm: &str,
) -> TreasuryResult<()> {
    let stored: String = conn
        .query_row(
            "SELECT password_hash FROM users WHERE id=?1",
            params![user_id],
            |r| r.get(0),
        )
        .optional()?
        .ok_or(TreasuryError::Unauthenticated)?;
    if !verify_password(old, &stored)? {
        return Err(TreasuryError::InvalidCredentials);
    }
    if new.is_empty() {
        return Err(TreasuryError::validation("New password cannot be empty"));
    }
    if new != confirm {
        return Err(TreasuryError::validation(
            "New password and confirmation do not match",
        ));
    }

    let password_hash = hash_password(new)?;

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    tx.execute(
        "UPDATE users SET password_hash=?1 WHERE id=?2",
        params![password_hash, user_id],
    )?;
    revoke_all_sessions(&tx, user_id)?;
    tx.commit()?;
    tracing::info!(user_id, "password changed");
    Ok(())
}
