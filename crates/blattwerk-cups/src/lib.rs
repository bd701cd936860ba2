// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// blattwerk-cups — the system print spooler boundary.
//
// Everything here is thin, synchronous glue around the CUPS command-line
// tools: `lpstat` for discovery, `lpoptions` for the option listing, `lp`
// for submission, plus PPD file lookup and the two validation gates
// (printer names, file paths). The two blocking calls (capability query,
// job submission) are atomic and non-cancelable; no timeout is enforced
// here.

pub mod options;
pub mod ppd_source;
pub mod spooler;
pub mod validate;

pub use options::{JobOptions, derive_job_options};
pub use ppd_source::{find_ppd, read_ppd};
pub use spooler::{PrinterEntry, default_printer, list_printers, query_choice_listing, submit};
pub use validate::{is_image, is_pdf, validate_file_path, validate_printer_name};
