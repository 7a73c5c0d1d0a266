// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error taxonomy for ledger, account, and session operations.

use thiserror::Error;

/// Everything a single request can fail with.
///
/// All variants are recoverable at the command boundary; none is fatal to
/// the process.
#[derive(Error, Debug)]
pub enum TreasuryError {
    /// A required field is missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Numeric input that does not parse after locale normalization
    #[error("Invalid amount '{0}' (use Indonesian format: '.' for thousands, ',' for decimals)")]
    InvalidAmount(String),

    /// Sum of stored amounts exceeds what a balance can represent
    #[error("Balance overflow while totalling {0}")]
    Overflow(String),

    #[error("Account '{0}' already exists")]
    DuplicateAccount(String),

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    /// Category/detail pair outside the account catalog
    #[error("Invalid selection: '{detail}' is not offered under category '{category}'")]
    InvalidSelection { category: String, detail: String },

    #[error("Account {0} not found")]
    AccountNotFound(i64),

    /// Delete blocked by existing ledger entries
    #[error(
        "Cannot delete {name}: it still has {count} related transaction(s). Remove them first."
    )]
    AccountInUse { name: String, count: i64 },

    /// Never says which of username or password was wrong
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not logged in or session expired; run `treasury login`")]
    Unauthenticated,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Unclassified store-access failure
    #[error("Storage error: {0}")]
    Store(#[from] rusqlite::Error),
}

impl TreasuryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether the error was caused by user input rather than the store
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Store(_) | Self::PasswordHash(_) | Self::Overflow(_))
    }
}

impl From<argon2::password_hash::Error> for TreasuryError {
    fn from(e: argon2::password_hash::Error) -> Self {
        Self::PasswordHash(e.to_string())
    }
}

pub type TreasuryResult<T> = Result<T, TreasuryError>;
