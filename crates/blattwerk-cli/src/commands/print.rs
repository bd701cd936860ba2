// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `blattwerk print` — one file, one printer, one shot.
//
// PDFs pass through unchanged; geometry only shapes the submission
// options. Raster images are composited into a temporary print-ready PDF
// sized for the printer's current media. The temp file lives inside a
// `NamedTempFile` guard, so it is deleted on every exit path, including
// failure.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use blattwerk_core::AppConfig;
use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::{CapabilitySet, MediaRequest, PaperSize};
use blattwerk_document::PageCompositor;

use super::resolve_printer;

pub struct PrintArgs<'a> {
    pub file: &'a Path,
    pub printer: Option<&'a str>,
    pub media: Option<&'a str>,
    pub tray: Option<&'a str>,
    pub media_type: Option<&'a str>,
    pub overrides: &'a [String],
    pub config: &'a AppConfig,
    pub json: bool,
}

/// Submission outcome for JSON output.
#[derive(Debug, Serialize)]
struct JobReceipt<'a> {
    ok: bool,
    printer: &'a str,
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    job_id: Option<String>,
}

pub fn run(args: PrintArgs<'_>) -> Result<()> {
    let file = blattwerk_cups::validate_file_path(args.file)?;
    let printer = resolve_printer(args.printer)?;
    blattwerk_cups::validate_printer_name(&printer)?;

    let overrides = parse_overrides(args.overrides)?;
    let request = MediaRequest {
        size: args.media.map(str::to_string),
        tray: args.tray.map(str::to_string),
        media_type: args.media_type.map(str::to_string),
    };

    let caps = query_capabilities(&printer, args.config)?;
    let (paper, rect) = blattwerk_ppd::resolve(&caps, &request, args.config.fallback_dpi)?;
    let options = blattwerk_cups::derive_job_options(&paper, &caps, &request, &overrides);

    // Composite raster inputs to a temp PDF; guard deletes it on drop.
    let mut temp_guard: Option<tempfile::NamedTempFile> = None;
    let file_to_print: &Path = if blattwerk_cups::is_image(&file) {
        if !args.json {
            eprintln!("[blattwerk] Converting image to PDF...");
        }
        let mut compositor = PageCompositor::new(paper.clone(), rect);
        if let Some(stem) = file.file_stem() {
            compositor.set_title(stem.to_string_lossy());
        }
        let doc = compositor.compose_path(&file)?;

        let mut temp = tempfile::Builder::new()
            .prefix("blattwerk-")
            .suffix(".pdf")
            .tempfile()?;
        temp.write_all(&doc.pdf_bytes)?;
        temp.flush()?;

        info!(
            paper = %paper.name,
            page_w_px = doc.page_width_px,
            page_h_px = doc.page_height_px,
            "generated print-ready PDF"
        );
        if !args.json {
            eprintln!(
                "[blattwerk] Generated PDF: {} ({:.0}x{:.0}mm) at {}",
                paper.name, paper.width_mm, paper.height_mm, rect.resolution
            );
        }

        temp_guard = Some(temp);
        temp_guard.as_ref().map(|t| t.path()).unwrap_or(&file)
    } else {
        &file
    };

    let job_id = blattwerk_cups::submit(file_to_print, &printer, &options)?;
    drop(temp_guard);

    if args.json {
        let receipt = JobReceipt {
            ok: true,
            printer: &printer,
            file: file.display().to_string(),
            job_id,
        };
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        let id_str = job_id.map(|id| format!(" (job {id})")).unwrap_or_default();
        println!("[blattwerk] Sent to {printer}{id_str}");
    }
    Ok(())
}

/// Interpret the printer's PPD, or fall back to built-in conservative
/// capabilities when the printer has no PPD at all (raw queues).
fn query_capabilities(printer: &str, config: &AppConfig) -> Result<CapabilitySet> {
    match blattwerk_cups::read_ppd(printer, &config.ppd_directories)? {
        Some(ppd_text) => {
            let records = blattwerk_ppd::scan_ppd(&ppd_text);
            blattwerk_ppd::interpret(printer, &records)
        }
        None => {
            warn!(printer, "no PPD found — assuming A4 defaults");
            Ok(builtin_capabilities(printer))
        }
    }
}

/// Conservative capabilities for PPD-less printers: full-bleed A4,
/// unknown resolution (the resolver degrades to the fallback DPI).
fn builtin_capabilities(printer: &str) -> CapabilitySet {
    CapabilitySet {
        printer: printer.to_string(),
        manufacturer: None,
        model: None,
        resolution: None,
        color: None,
        paper_sizes: vec![PaperSize {
            name: "A4".into(),
            width_mm: 210.0,
            height_mm: 297.0,
            margins: Default::default(),
            default: true,
        }],
        trays: Vec::new(),
        duplex_modes: Vec::new(),
        default_duplex: None,
        throughput_ppm: None,
        options: BTreeMap::new(),
    }
}

/// Parse repeatable `key=value` override strings. A bare `key` becomes a
/// valueless flag option.
fn parse_overrides(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|item| {
            let (key, value) = item.split_once('=').unwrap_or((item.as_str(), ""));
            let key = key.trim();
            if key.is_empty() {
                return Err(BlattwerkError::Spooler(format!(
                    "malformed option override {item:?} — expected key=value"
                )));
            }
            Ok((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_overrides() {
        let raw = vec!["media=Letter".to_string(), "fit-to-page".to_string()];
        let parsed = parse_overrides(&raw).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("media".to_string(), "Letter".to_string()),
                ("fit-to-page".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn empty_key_is_rejected() {
        let raw = vec!["=oops".to_string()];
        assert!(parse_overrides(&raw).is_err());
    }

    #[test]
    fn builtin_capabilities_resolve_in_degraded_mode() {
        let caps = builtin_capabilities("rawqueue");
        let (paper, rect) =
            blattwerk_ppd::resolve(&caps, &MediaRequest::default(), 300).unwrap();
        assert_eq!(paper.name, "A4");
        // Full-bleed A4 at the 300dpi fallback.
        assert_eq!(rect.width_px, 2480);
        assert_eq!(rect.height_px, 3508);
    }
}
