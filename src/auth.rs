// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Password hashing and the server-side session table.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::{TreasuryError, TreasuryResult};

/// Hashes a password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> TreasuryResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Constant-time check of `password` against a stored PHC string.
pub fn verify_password(password: &str, stored_hash: &str) -> TreasuryResult<bool> {
    let parsed = PasswordHash::new(stored_hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub fn create_session(conn: &Connection, user_id: i64, ttl: Duration) -> TreasuryResult<String> {
    let token = Uuid::new_v4().simple().to_string();
    let now = Utc::now();
    conn.execute(
        "INSERT INTO sessions(token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
        params![token, user_id, now, now + ttl],
    )?;
    tracing::info!(user_id, "session opened");
    Ok(token)
}

/// Resolves a session token to the user it was issued for.
///
/// Unknown and expired tokens both yield `Unauthenticated`; expired rows are
/// removed on the way out.
pub fn authenticate(conn: &Connection, token: &str) -> TreasuryResult<i64> {
    let row: Option<(i64, DateTime<Utc>)> = conn
        .query_row(
            "SELECT user_id, expires_at FROM sessions WHERE token=?1",
            params![token],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    match row {
        Some((user_id, expires_at)) if expires_at > Utc::now() => Ok(user_id),
        Some((user_id, _)) => {
            conn.execute("DELETE FROM sessions WHERE token=?1", params![token])?;
            tracing::debug!(user_id, "expired session removed");
            Err(TreasuryError::Unauthenticated)
        }
        None => Err(TreasuryError::Unauthenticated),
    }
}

pub fn revoke_session(conn: &Connection, token: &str) -> TreasuryResult<bool> {
    let n = conn.execute("DELETE FROM sessions WHERE token=?1", params![token])?;
    Ok(n > 0)
}

/// Drops every session of a user; returns how many were open.
pub fn revoke_all_sessions(conn: &Connection, user_id: i64) -> TreasuryResult<usize> {
    let n = conn.execute("DELETE FROM sessions WHERE user_id=?1", params![user_id])?;
    if n > 0 {
        tracing::info!(user_id, revoked = n, "sessions revoked");
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trip_and_salting() {
        let h1 = hash_password("rahasia").unwrap();
        let h2 = hash_password("rahasia").unwrap();
        assert_ne!(h1, h2);
        assert!(!h1.contains("rahasia"));
        assert!(verify_password("rahasia", &h1).unwrap());
        assert!(!verify_password("Rahasia", &h1).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string"),
            Err(TreasuryError::PasswordHash(_))
        ));
    }
}
