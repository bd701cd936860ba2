// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `blattwerk list` — enumerate CUPS destinations.

use blattwerk_core::error::Result;

pub fn run(json: bool) -> Result<()> {
    let printers = blattwerk_cups::list_printers()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&printers)?);
        return Ok(());
    }

    if printers.is_empty() {
        println!("No printers found.");
        return Ok(());
    }
    for p in &printers {
        let tag = if p.default { " (default)" } else { "" };
        let state = format!(
            "{}, {}",
            p.status,
            if p.enabled { "enabled" } else { "disabled" }
        );
        println!("  {}  [{state}]{tag}", p.name);
    }
    Ok(())
}
