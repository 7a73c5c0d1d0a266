// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The fixed table of account categories and the providers offered under each.

use crate::error::{TreasuryError, TreasuryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountCategory {
    Cash,
    EWallet,
    Bank,
}

pub struct CatalogEntry {
    pub category: AccountCategory,
    pub details: &'static [&'static str],
}

/// Each detail list is kept sorted.
pub static CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        category: AccountCategory::Cash,
        details: &["Cash"],
    },
    CatalogEntry {
        category: AccountCategory::EWallet,
        details: &[
            "Astrapay",
            "BluePay",
            "DANA",
            "GoPay",
            "I-Saku",
            "LinkAja",
            "OVO",
            "QRIS Merchant",
            "Sakuku",
            "ShopeePay",
        ],
    },
    CatalogEntry {
        category: AccountCategory::Bank,
        details: &[
            "BCA",
            "BJB",
            "BNI",
            "BRI",
            "BSI",
            "BTN",
            "Bank DKI",
            "Bank Mega",
            "Bank Neo Commerce",
            "CIMB Niaga",
            "CitiBank",
            "Commonwealth Bank",
            "DBS/Digibank",
            "HSBC",
            "Jenius",
            "Mandiri",
            "Maybank",
            "OCBC NISP",
            "Panin Bank",
            "Permata Bank",
            "SeaBank",
            "Standard Chartered",
            "Superbank",
        ],
    },
];

impl AccountCategory {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::EWallet => "E-WALLET",
            Self::Bank => "BANK",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        CATALOG
            .iter()
            .map(|e| e.category)
            .find(|c| c.key() == key)
    }

    pub fn details(&self) -> &'static [&'static str] {
        CATALOG
            .iter()
            .find(|e| e.category == *self)
            .map(|e| e.details)
            .unwrap_or(&[])
    }
}

/// Resolves a category/detail pair to the account display name.
///
/// Cash accounts are named by the detail alone; every other account is
/// `"[CATEGORY] detail"`.
pub fn account_name(category_key: &str, detail: &str) -> TreasuryResult<String> {
    let invalid = || TreasuryError::InvalidSelection {
        category: category_key.to_string(),
        detail: detail.to_string(),
    };
    let category = AccountCategory::from_key(category_key).ok_or_else(invalid)?;
    if !category.details().iter().any(|d| *d == detail) {
        return Err(invalid());
    }
    Ok(match category {
        AccountCategory::Cash => detail.to_string(),
        other => format!("[{}] {}", other.key(), detail),
    })
}
