// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::{self, hash_password, verify_password};
use crate::error::{TreasuryError, TreasuryResult};
use crate::models::User;
use crate::session;
use crate::utils::{get_session_ttl_hours, non_blank};
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};

pub fn handle_register(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fullname = sub.get_one::<String>("fullname").unwrap();
    let username = sub.get_one::<String>("username").unwrap();
    let password = password_arg(sub, "password", "Password: ")?;
    register(conn, fullname, username, &password)?;
    println!("Registered '{}'. Log in with `treasury login`.", username.trim());
    Ok(())
}

pub fn handle_login(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let username = sub.get_one::<String>("username").unwrap();
    let password = password_arg(sub, "password", "Password: ")?;
    let token = login(conn, username, &password)?;
    session::store_token(&session::token_path()?, &token)?;
    let user_id = auth::authenticate(conn, &token)?;
    let user = current_user(conn, user_id)?;
    println!("Welcome, {}", user.fullname);
    Ok(())
}

pub fn handle_logout(conn: &Connection, token: Option<&str>) -> Result<()> {
    if let Some(token) = token {
        logout(conn, token)?;
    }
    session::clear_token(&session::token_path()?)?;
    println!("Logged out");
    Ok(())
}

/// Reads a password argument, prompting on the terminal when it was omitted.
pub fn password_arg(sub: &clap::ArgMatches, id: &str, prompt: &str) -> Result<String> {
    match sub.get_one::<String>(id) {
        Some(p) => Ok(p.clone()),
        None => rpassword::prompt_password(prompt).context("Failed to read password"),
    }
}

/// Creates a user; the password is stored only as an Argon2 hash.
pub fn register(
    conn: &Connection,
    fullname: &str,
    username: &str,
    password: &str,
) -> TreasuryResult<i64> {
    const REQUIRED: &str = "Full name, username and password are all required";
    let (Some(fullname), Some(username)) = (non_blank(Some(fullname)), non_blank(Some(username)))
    else {
        return Err(TreasuryError::validation(REQUIRED));
    };
    if password.is_empty() {
        return Err(TreasuryError::validation(REQUIRED));
    }
    let password_hash = hash_password(password)?;

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let taken: Option<i64> = tx
        .query_row(
            "SELECT id FROM users WHERE username=?1",
            params![username],
            |r| r.get(0),
        )
        .optional()?;
    if taken.is_some() {
        return Err(TreasuryError::UsernameTaken(username.to_string()));
    }
    tx.execute(
        "INSERT INTO users(fullname, username, password_hash) VALUES (?1, ?2, ?3)",
        params![fullname, username, password_hash],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    tracing::info!(user_id = id, "user registered");
    Ok(id)
}

/// Verifies credentials and opens a session, returning its token.
pub fn login(conn: &Connection, username: &str, password: &str) -> TreasuryResult<String> {
    let row: Option<(i64, String)> = conn
        .query_row(
            "SELECT id, password_hash FROM users WHERE username=?1",
            params![username.trim()],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    let Some((user_id, password_hash)) = row else {
        return Err(TreasuryError::InvalidCredentials);
    };
    if !verify_password(password, &password_hash)? {
        tracing::debug!(user_id, "password mismatch");
        return Err(TreasuryError::InvalidCredentials);
    }
    let ttl = chrono::Duration::hours(get_session_ttl_hours(conn)?);
    auth::create_session(conn, user_id, ttl)
}

/// Resolves the acting user for commands that require a login.
pub fn require_user(conn: &Connection, token: Option<&str>) -> TreasuryResult<i64> {
    match token {
        Some(token) => auth::authenticate(conn, token),
        None => Err(TreasuryError::Unauthenticated),
    }
}

pub fn logout(conn: &Connection, token: &str) -> TreasuryResult<bool> {
    auth::revoke_session(conn, token)
}

pub fn current_user(conn: &Connection, user_id: i64) -> TreasuryResult<User> {
    conn.query_row(
        "SELECT id, fullname, username FROM users WHERE id=?1",
        params![user_id],
        |r| {
            Ok(User {
                id: r.get(0)?,
                fullname: r.get(1)?,
                username: r.get(2)?,
            })
        },
    )
    .optional()?
    .ok_or(TreasuryError::Unauthenticated)
}
