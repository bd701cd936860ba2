// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capability interpreter — folds a record stream into a `CapabilitySet`.
//
// All PPD point values are converted to millimetres here; nothing
// downstream ever sees a point.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::{
    CapabilitySet, DuplexMode, Margins, OptionValues, PaperSize, Resolution,
};
use blattwerk_core::units::pt_to_mm;

use crate::records::CapabilityRecord;

/// Interpret capability records into a `CapabilitySet` for one printer.
///
/// Individual malformed paper sizes are dropped with a warning; a record
/// stream with zero usable paper sizes is a hard failure, because no
/// geometry can ever be resolved from it.
pub fn interpret(printer: &str, records: &[CapabilityRecord]) -> Result<CapabilitySet> {
    let mut dimensions: Vec<(String, f64, f64)> = Vec::new();
    let mut areas: HashMap<String, (f64, f64, f64, f64)> = HashMap::new();
    let mut default_page: Option<String> = None;
    let mut resolution_token: Option<String> = None;
    let mut default_duplex_token: Option<String> = None;
    let mut duplex_modes: Vec<DuplexMode> = Vec::new();
    let mut color: Option<bool> = None;
    let mut trays: Vec<String> = Vec::new();
    let mut manufacturer: Option<String> = None;
    let mut model: Option<String> = None;
    let mut throughput_ppm: Option<u32> = None;
    let mut options: BTreeMap<String, OptionValues> = BTreeMap::new();

    for record in records {
        match record {
            CapabilityRecord::PaperDimension {
                name,
                width_pt,
                height_pt,
            } => dimensions.push((name.clone(), *width_pt, *height_pt)),
            CapabilityRecord::ImageableArea {
                name,
                llx_pt,
                lly_pt,
                urx_pt,
                ury_pt,
            } => {
                areas.insert(name.clone(), (*llx_pt, *lly_pt, *urx_pt, *ury_pt));
            }
            CapabilityRecord::DefaultPageSize(name) => default_page = Some(name.clone()),
            CapabilityRecord::DefaultResolution(token) => resolution_token = Some(token.clone()),
            CapabilityRecord::DefaultDuplex(token) => default_duplex_token = Some(token.clone()),
            CapabilityRecord::DuplexChoice(keyword) => {
                if let Some(mode) = DuplexMode::from_ppd_keyword(keyword) {
                    if !duplex_modes.contains(&mode) {
                        duplex_modes.push(mode);
                    }
                } else {
                    warn!(%keyword, "unrecognized duplex choice");
                }
            }
            CapabilityRecord::ColorDevice(supported) => color = Some(*supported),
            CapabilityRecord::InputSlot(name) => {
                if !trays.contains(name) {
                    trays.push(name.clone());
                }
            }
            CapabilityRecord::Manufacturer(value) => manufacturer = Some(value.clone()),
            CapabilityRecord::ModelName(value) => model = Some(value.clone()),
            CapabilityRecord::Throughput(ppm) => throughput_ppm = Some(*ppm),
            CapabilityRecord::OptionChoice {
                name,
                choice,
                label,
            } => {
                let entry = options.entry(name.clone()).or_insert_with(|| OptionValues {
                    label: label.clone(),
                    current: None,
                    choices: Vec::new(),
                });
                if entry.label.is_none() {
                    entry.label = label.clone();
                }
                if !entry.choices.contains(choice) {
                    entry.choices.push(choice.clone());
                }
            }
            CapabilityRecord::OptionCurrent { name, value } => {
                let entry = options.entry(name.clone()).or_insert_with(|| OptionValues {
                    label: None,
                    current: None,
                    choices: Vec::new(),
                });
                entry.current = Some(value.clone());
            }
        }
    }

    let paper_sizes = build_paper_sizes(&dimensions, &areas, default_page.as_deref());
    if paper_sizes.is_empty() {
        return Err(BlattwerkError::Capability(format!(
            "no valid paper sizes declared for printer {printer:?}"
        )));
    }

    let resolution = match &resolution_token {
        Some(token) => {
            let parsed = parse_resolution(token);
            if parsed.is_none() {
                warn!(%token, "unparseable resolution token — treating as unknown");
            }
            parsed
        }
        None => None,
    };

    // A DefaultDuplex of "None" means the duplex unit is off, not absent;
    // absence of the option entirely means the capability is unsupported.
    let default_duplex = default_duplex_token
        .as_deref()
        .and_then(DuplexMode::from_ppd_keyword);

    debug!(
        printer,
        sizes = paper_sizes.len(),
        trays = trays.len(),
        resolution = ?resolution,
        "interpreted printer capabilities"
    );

    Ok(CapabilitySet {
        printer: printer.to_string(),
        manufacturer,
        model,
        resolution,
        color,
        paper_sizes,
        trays,
        duplex_modes,
        default_duplex,
        throughput_ppm,
        options,
    })
}

/// Pair dimension and imageable-area records into validated `PaperSize`
/// entries, in declaration order. At most one entry gets the default flag.
fn build_paper_sizes(
    dimensions: &[(String, f64, f64)],
    areas: &HashMap<String, (f64, f64, f64, f64)>,
    default_page: Option<&str>,
) -> Vec<PaperSize> {
    let mut sizes = Vec::with_capacity(dimensions.len());
    let mut default_seen = false;

    for (name, width_pt, height_pt) in dimensions {
        if *width_pt <= 0.0 || *height_pt <= 0.0 {
            warn!(%name, width_pt = *width_pt, height_pt = *height_pt, "skipping paper size with non-positive dimensions");
            continue;
        }

        let width_mm = pt_to_mm(*width_pt);
        let height_mm = pt_to_mm(*height_pt);

        // ImageableArea gives lower-left and upper-right corners from the
        // page's bottom-left origin; margins are the leftover borders.
        let margins = match areas.get(name) {
            Some((llx, lly, urx, ury)) => Margins {
                left_mm: pt_to_mm(llx.max(0.0)),
                bottom_mm: pt_to_mm(lly.max(0.0)),
                right_mm: pt_to_mm((width_pt - urx).max(0.0)),
                top_mm: pt_to_mm((height_pt - ury).max(0.0)),
            },
            // No declared imageable area: assume full-bleed.
            None => Margins::default(),
        };

        let is_default = !default_seen
            && default_page.is_some_and(|d| d.eq_ignore_ascii_case(name));
        let paper = PaperSize {
            name: name.clone(),
            width_mm,
            height_mm,
            margins,
            default: is_default,
        };

        if !paper.is_printable() {
            warn!(%name, "skipping paper size with non-positive printable area");
            continue;
        }

        default_seen |= is_default;
        sizes.push(paper);
    }

    sizes
}

/// Parse a PPD resolution token: `600x600dpi`, `1200dpi`, etc.
///
/// Returns `None` for anything malformed — unknown resolution is a
/// distinct state, never a guessed number.
pub fn parse_resolution(token: &str) -> Option<Resolution> {
    let trimmed = token
        .trim()
        .trim_end_matches("dpi")
        .trim_end_matches("DPI")
        .trim();
    if trimmed.is_empty() {
        return None;
    }

    let res = match trimmed.split_once(['x', 'X']) {
        Some((h, v)) => Resolution {
            horizontal_dpi: h.trim().parse().ok()?,
            vertical_dpi: v.trim().parse().ok()?,
        },
        None => Resolution::square(trimmed.parse().ok()?),
    };

    if res.horizontal_dpi == 0 || res.vertical_dpi == 0 {
        return None;
    }
    Some(res)
}
