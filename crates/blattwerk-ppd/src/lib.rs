// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// blattwerk-ppd — PPD capability interpretation and page geometry.
//
// Turns the text a printer subsystem reports about a printer (raw PPD file
// or an option-choice listing) into a structured `CapabilitySet`, then
// resolves the active paper size and printable rectangle for a job.

pub mod geometry;
pub mod interpreter;
pub mod records;

pub use geometry::resolve;
pub use interpreter::interpret;
pub use records::{CapabilityRecord, scan_choice_listing, scan_ppd};
