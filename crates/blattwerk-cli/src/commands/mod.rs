// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One module per subcommand, plus shared output helpers.

pub mod info;
pub mod list;
pub mod options;
pub mod print;

use serde_json::json;

use blattwerk_core::BlattwerkError;
use blattwerk_core::error::Result;

/// Print a fatal error, structured when JSON output was requested.
pub fn emit_error(err: &BlattwerkError, json: bool) {
    if json {
        let payload = match err {
            BlattwerkError::UnknownMedia {
                requested,
                available,
            } => json!({
                "ok": false,
                "error": err.to_string(),
                "requested": requested,
                "available": available,
            }),
            _ => json!({ "ok": false, "error": err.to_string() }),
        };
        println!("{payload}");
    } else {
        eprintln!("Error: {err}");
    }
}

/// Resolve the target printer: explicit flag or the system default.
pub fn resolve_printer(explicit: Option<&str>) -> Result<String> {
    match explicit {
        Some(name) => Ok(name.to_string()),
        None => blattwerk_cups::default_printer()?.ok_or(BlattwerkError::NoDefaultPrinter),
    }
}
