// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `blattwerk info` — show a printer's interpreted capabilities.

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::{CapabilitySet, PaperSize};
use blattwerk_core::AppConfig;

use super::resolve_printer;

pub fn run(printer: Option<&str>, config: &AppConfig, json: bool) -> Result<()> {
    let printer = resolve_printer(printer)?;

    let ppd_text = blattwerk_cups::read_ppd(&printer, &config.ppd_directories)?
        .ok_or_else(|| BlattwerkError::Capability(format!("no PPD file found for {printer}")))?;
    let records = blattwerk_ppd::scan_ppd(&ppd_text);
    let caps = blattwerk_ppd::interpret(&printer, &records)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&caps)?);
        return Ok(());
    }

    print_human(&caps);
    Ok(())
}

fn print_human(caps: &CapabilitySet) {
    println!("Printer: {}\n", caps.printer);

    if let Some(v) = &caps.manufacturer {
        println!("  Manufacturer: {v}");
    }
    if let Some(v) = &caps.model {
        println!("  Model: {v}");
    }
    match &caps.resolution {
        Some(res) => println!("  Resolution: {res}"),
        None => println!("  Resolution: unknown"),
    }
    if let Some(color) = caps.color {
        println!("  Color: {}", if color { "yes" } else { "no" });
    }
    if let Some(ppm) = caps.throughput_ppm {
        println!("  Pages/min: {ppm}");
    }
    if let Some(paper) = caps.default_paper() {
        println!("  Default paper: {}", paper.name);
    }
    if let Some(duplex) = caps.default_duplex {
        println!("  Default duplex: {}", duplex.cups_sides_keyword());
    }
    if !caps.trays.is_empty() {
        println!("  Trays: {}", caps.trays.join(", "));
    }

    println!("\nPaper sizes ({}):\n", caps.paper_sizes.len());
    for paper in &caps.paper_sizes {
        let tag = if paper.default { " (default)" } else { "" };
        println!(
            "  {}: {:.0} x {:.0} mm  margins: {}{tag}",
            paper.name,
            paper.width_mm,
            paper.height_mm,
            format_margins(paper),
        );
    }
}

/// Compact margin display: a single number when all four sides match.
fn format_margins(paper: &PaperSize) -> String {
    let m = &paper.margins;
    let sides = [m.left_mm, m.bottom_mm, m.right_mm, m.top_mm];
    if sides.iter().all(|v| (v - sides[0]).abs() < 0.1) {
        format!("{:.1}mm", sides[0])
    } else {
        format!(
            "L{:.1} B{:.1} R{:.1} T{:.1}mm",
            m.left_mm, m.bottom_mm, m.right_mm, m.top_mm
        )
    }
}
