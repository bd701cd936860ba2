// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spooler commands: printer discovery via `lpstat`, option listing via
// `lpoptions`, job submission via `lp`. Output parsing is split from
// process spawning so it stays testable.

use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use blattwerk_core::error::{BlattwerkError, Result};

use crate::options::JobOptions;
use crate::validate::validate_printer_name;

static REQUEST_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"request id is (\S+)").expect("valid request-id pattern"));

const DEFAULT_DEST_PREFIX: &str = "system default destination:";

/// One destination reported by `lpstat -p -d`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrinterEntry {
    pub name: String,
    /// "idle", "busy", or "unknown".
    pub status: String,
    pub enabled: bool,
    pub default: bool,
}

/// Query the system default printer, if one is configured.
pub fn default_printer() -> Result<Option<String>> {
    let output = run(Command::new("lpstat").arg("-d"))?;
    Ok(parse_default_destination(&output))
}

/// List available printers with their state.
pub fn list_printers() -> Result<Vec<PrinterEntry>> {
    let output = run(Command::new("lpstat").args(["-p", "-d"]))
        .map_err(|_| BlattwerkError::Spooler("could not list printers".into()))?;
    Ok(parse_destinations(&output))
}

/// Fetch the option-choice listing for a printer (`lpoptions -p NAME -l`).
pub fn query_choice_listing(printer: &str) -> Result<String> {
    let safe = validate_printer_name(printer)?;
    run(Command::new("lpoptions").args(["-p", safe, "-l"]))
        .map_err(|_| BlattwerkError::Spooler(format!("could not get options for {safe}")))
}

/// Submit a document to a printer. Returns the spooler job id when the
/// submission output carries one.
///
/// This is a one-shot, non-idempotent, blocking call: no retry, no
/// timeout, no cancellation.
pub fn submit(path: &Path, printer: &str, options: &JobOptions) -> Result<Option<String>> {
    let safe = validate_printer_name(printer)?;

    let mut cmd = Command::new("lp");
    cmd.args(["-d", safe]).arg(path);
    cmd.args(options.to_args());

    debug!(printer = safe, path = %path.display(), "submitting job via lp");
    let output = cmd
        .output()
        .map_err(|err| BlattwerkError::Spooler(format!("failed to run lp: {err}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BlattwerkError::Spooler(format!(
            "print failed: {}",
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let job_id = parse_job_id(&stdout);
    info!(printer = safe, job_id = ?job_id, "job submitted");
    Ok(job_id)
}

/// Run a spooler query command, returning stdout on success.
fn run(cmd: &mut Command) -> Result<String> {
    let program = cmd.get_program().to_string_lossy().to_string();
    let output = cmd
        .output()
        .map_err(|err| BlattwerkError::Spooler(format!("failed to run {program}: {err}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BlattwerkError::Spooler(format!(
            "{program} failed: {}",
            stderr.trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse `lpstat -d` output for the default destination.
fn parse_default_destination(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        line.strip_prefix(DEFAULT_DEST_PREFIX)
            .map(|rest| rest.trim().to_string())
            .filter(|name| !name.is_empty())
    })
}

/// Parse `lpstat -p -d` output into printer entries.
fn parse_destinations(output: &str) -> Vec<PrinterEntry> {
    let default = parse_default_destination(output);

    output
        .lines()
        .filter_map(|line| {
            let rest = line.strip_prefix("printer ")?;
            let name = rest.split_whitespace().next()?.to_string();
            let status = if line.contains("idle") {
                "idle"
            } else if line.contains("printing") {
                "busy"
            } else {
                "unknown"
            };
            Some(PrinterEntry {
                default: default.as_deref() == Some(name.as_str()),
                enabled: line.contains("enabled"),
                status: status.to_string(),
                name,
            })
        })
        .collect()
}

/// Extract the job id from `lp` output like
/// `request id is Office_Mono-42 (1 file(s))`.
fn parse_job_id(output: &str) -> Option<String> {
    REQUEST_ID
        .captures(output)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LPSTAT_OUTPUT: &str = "\
printer Office_Mono is idle.  enabled since Mon 01 Jan 2026
printer Lab_Color now printing Lab_Color-17.  enabled since Mon 01 Jan 2026
printer Basement disabled since Mon 01 Jan 2026
system default destination: Office_Mono
";

    #[test]
    fn parses_default_destination() {
        assert_eq!(
            parse_default_destination(LPSTAT_OUTPUT),
            Some("Office_Mono".to_string())
        );
        assert_eq!(parse_default_destination("no destinations"), None);
    }

    #[test]
    fn parses_printer_entries() {
        let printers = parse_destinations(LPSTAT_OUTPUT);
        assert_eq!(printers.len(), 3);

        assert_eq!(printers[0].name, "Office_Mono");
        assert_eq!(printers[0].status, "idle");
        assert!(printers[0].enabled);
        assert!(printers[0].default);

        assert_eq!(printers[1].status, "busy");
        assert!(!printers[1].default);

        assert_eq!(printers[2].status, "unknown");
        assert!(!printers[2].enabled);
    }

    #[test]
    fn parses_job_id_from_lp_output() {
        assert_eq!(
            parse_job_id("request id is Office_Mono-42 (1 file(s))"),
            Some("Office_Mono-42".to_string())
        );
        assert_eq!(parse_job_id("lp: something went wrong"), None);
    }

    #[test]
    fn submit_rejects_bad_printer_name_before_spawning() {
        let err = submit(
            Path::new("/tmp/x.pdf"),
            "evil; rm -rf /",
            &JobOptions::new(),
        )
        .unwrap_err();
        assert!(matches!(err, BlattwerkError::InvalidPrinterName(_)));
    }
}
