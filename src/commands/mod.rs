// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod doctor;
pub mod exporter;
pub mod profile;
pub mod transactions;
