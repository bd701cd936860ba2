// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PPD file lookup. CUPS keeps the active PPD for each destination at
// <ppd-dir>/<printer>.ppd; the printer name is validated before it is
// spliced into a path.

use std::path::{Path, PathBuf};

use tracing::debug;

use blattwerk_core::error::Result;

use crate::validate::validate_printer_name;

/// Locate the PPD file for a printer in the configured directories.
///
/// Returns `Ok(None)` when no PPD exists — raw-queue printers have none,
/// and callers decide whether that is fatal for their operation.
pub fn find_ppd(printer: &str, directories: &[PathBuf]) -> Result<Option<PathBuf>> {
    let safe = validate_printer_name(printer)?;

    for dir in directories {
        let candidate = dir.join(format!("{safe}.ppd"));
        if candidate.is_file() {
            debug!(path = %candidate.display(), "found PPD");
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// Read a printer's PPD text, if it has one.
pub fn read_ppd(printer: &str, directories: &[PathBuf]) -> Result<Option<String>> {
    match find_ppd(printer, directories)? {
        Some(path) => Ok(Some(read_ppd_file(&path)?)),
        None => Ok(None),
    }
}

/// Read PPD text from a known path.
pub fn read_ppd_file(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}
