// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Tunable settings for one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// DPI assumed when the PPD declares no parseable resolution. Degraded
    /// mode, not an error — images are still composited, at lower fidelity.
    pub fallback_dpi: u32,
    /// Directories searched for `<printer>.ppd`, in order. The second
    /// entry covers macOS, where /etc is a symlink into /private.
    pub ppd_directories: Vec<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fallback_dpi: 300,
            ppd_directories: vec![
                PathBuf::from("/etc/cups/ppd"),
                PathBuf::from("/private/etc/cups/ppd"),
            ],
        }
    }
}
