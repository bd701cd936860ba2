// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Blattwerk — Core types, unit conversions, and error definitions shared
// across all crates.

pub mod config;
pub mod error;
pub mod types;
pub mod units;

pub use config::AppConfig;
pub use error::BlattwerkError;
pub use types::*;
