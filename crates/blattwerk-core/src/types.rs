// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for PPD-driven print geometry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::units;

/// Non-printable border of a physical page, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub left_mm: f64,
    pub right_mm: f64,
    pub top_mm: f64,
    pub bottom_mm: f64,
}

/// A paper size as declared by the printer's PPD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSize {
    /// PPD name token, e.g. "A4" or "Letter".
    pub name: String,
    pub width_mm: f64,
    pub height_mm: f64,
    pub margins: Margins,
    /// Whether this entry is the printer's default page size.
    pub default: bool,
}

impl PaperSize {
    /// Width of the imageable area in millimetres.
    pub fn printable_width_mm(&self) -> f64 {
        self.width_mm - self.margins.left_mm - self.margins.right_mm
    }

    /// Height of the imageable area in millimetres.
    pub fn printable_height_mm(&self) -> f64 {
        self.height_mm - self.margins.top_mm - self.margins.bottom_mm
    }

    /// A size is usable only when its printable area is strictly positive.
    pub fn is_printable(&self) -> bool {
        self.printable_width_mm() > 0.0 && self.printable_height_mm() > 0.0
    }
}

/// Device raster resolution in dots per inch, per axis. Non-square pixel
/// aspect is possible and must be honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub horizontal_dpi: u32,
    pub vertical_dpi: u32,
}

impl Resolution {
    pub fn square(dpi: u32) -> Self {
        Self {
            horizontal_dpi: dpi,
            vertical_dpi: dpi,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}dpi", self.horizontal_dpi, self.vertical_dpi)
    }
}

/// Duplex printing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplexMode {
    Simplex,
    LongEdge,
    ShortEdge,
}

impl DuplexMode {
    /// CUPS `sides` option value for `lp -o sides=...`.
    pub fn cups_sides_keyword(&self) -> &'static str {
        match self {
            Self::Simplex => "one-sided",
            Self::LongEdge => "two-sided-long-edge",
            Self::ShortEdge => "two-sided-short-edge",
        }
    }

    /// Parse a PPD `Duplex` choice keyword.
    pub fn from_ppd_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "None" | "Off" | "Simplex" => Some(Self::Simplex),
            "DuplexNoTumble" => Some(Self::LongEdge),
            "DuplexTumble" => Some(Self::ShortEdge),
            _ => None,
        }
    }
}

/// Caller-specified media selection for a job. All fields optional; when
/// absent the printer's defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaRequest {
    /// Explicit paper size name (matched case-insensitively).
    pub size: Option<String>,
    /// Input tray / slot name.
    pub tray: Option<String>,
    /// Media type hint (e.g. "Photo", "Plain").
    pub media_type: Option<String>,
}

impl MediaRequest {
    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.tray.is_none() && self.media_type.is_none()
    }
}

/// Current value and allowed choices for one printer option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionValues {
    /// Human-readable label, when the source reported one.
    pub label: Option<String>,
    /// Currently selected choice.
    pub current: Option<String>,
    /// Allowed choices in declaration order.
    pub choices: Vec<String>,
}

/// Everything we know about one printer, interpreted from its PPD or
/// option listing. Constructed fresh per invocation and read-only
/// thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilitySet {
    /// CUPS destination name.
    pub printer: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    /// `None` means the resolution is unknown — a distinct state, never
    /// represented as zero DPI.
    pub resolution: Option<Resolution>,
    /// `None` when the PPD carries no ColorDevice option at all.
    pub color: Option<bool>,
    /// Declared paper sizes in PPD order. All entries satisfy
    /// [`PaperSize::is_printable`]; at most one has `default` set.
    pub paper_sizes: Vec<PaperSize>,
    /// Input slot names in declaration order.
    pub trays: Vec<String>,
    /// Duplex modes the printer advertises. Empty when the PPD has no
    /// Duplex option (capability unsupported, not "off").
    pub duplex_modes: Vec<DuplexMode>,
    /// The PPD's default duplex selection, when one is declared.
    pub default_duplex: Option<DuplexMode>,
    /// Pages per minute, when declared.
    pub throughput_ppm: Option<u32>,
    /// Unrecognized options, preserved verbatim so they stay discoverable
    /// and can be passed through to the spooler.
    pub options: BTreeMap<String, OptionValues>,
}

impl CapabilitySet {
    /// The entry flagged as default, if any.
    pub fn default_paper(&self) -> Option<&PaperSize> {
        self.paper_sizes.iter().find(|p| p.default)
    }

    /// Case-insensitive lookup by size name.
    pub fn find_paper(&self, name: &str) -> Option<&PaperSize> {
        self.paper_sizes
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Names of all declared sizes, for error reporting.
    pub fn paper_names(&self) -> Vec<String> {
        self.paper_sizes.iter().map(|p| p.name.clone()).collect()
    }
}

/// The resolved imageable rectangle of a selected paper size, in both
/// millimetres and device pixels. Derived and transient — always computed
/// from a `PaperSize`, never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrintableRectangle {
    pub width_mm: f64,
    pub height_mm: f64,
    pub width_px: u32,
    pub height_px: u32,
    /// Offset of the rectangle from the page's left edge.
    pub offset_left_mm: f64,
    /// Offset of the rectangle from the page's top edge.
    pub offset_top_mm: f64,
    /// Resolution the pixel dimensions were computed at.
    pub resolution: Resolution,
}

impl PrintableRectangle {
    /// Derive the rectangle for a paper size at the given resolution.
    pub fn from_paper(paper: &PaperSize, resolution: Resolution) -> Self {
        let width_mm = paper.printable_width_mm();
        let height_mm = paper.printable_height_mm();
        Self {
            width_mm,
            height_mm,
            width_px: units::mm_to_px(width_mm, resolution.horizontal_dpi),
            height_px: units::mm_to_px(height_mm, resolution.vertical_dpi),
            offset_left_mm: paper.margins.left_mm,
            offset_top_mm: paper.margins.top_mm,
            resolution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a4() -> PaperSize {
        PaperSize {
            name: "A4".into(),
            width_mm: 210.0,
            height_mm: 297.0,
            margins: Margins {
                left_mm: 4.2,
                right_mm: 4.2,
                top_mm: 4.2,
                bottom_mm: 4.2,
            },
            default: true,
        }
    }

    #[test]
    fn printable_area_subtracts_margins() {
        let paper = a4();
        assert!((paper.printable_width_mm() - 201.6).abs() < 1e-9);
        assert!((paper.printable_height_mm() - 288.6).abs() < 1e-9);
        assert!(paper.is_printable());
    }

    #[test]
    fn oversized_margins_make_paper_unprintable() {
        let mut paper = a4();
        paper.margins.left_mm = 120.0;
        paper.margins.right_mm = 120.0;
        assert!(!paper.is_printable());
    }

    #[test]
    fn rectangle_pixel_dims_use_each_axis_dpi() {
        let rect = PrintableRectangle::from_paper(
            &a4(),
            Resolution {
                horizontal_dpi: 600,
                vertical_dpi: 300,
            },
        );
        assert_eq!(rect.width_px, 4762);
        // 288.6mm at 300dpi = 3408.7px
        assert_eq!(rect.height_px, 3409);
    }

    #[test]
    fn duplex_ppd_keywords() {
        assert_eq!(
            DuplexMode::from_ppd_keyword("DuplexNoTumble"),
            Some(DuplexMode::LongEdge)
        );
        assert_eq!(
            DuplexMode::from_ppd_keyword("DuplexTumble"),
            Some(DuplexMode::ShortEdge)
        );
        assert_eq!(DuplexMode::from_ppd_keyword("None"), Some(DuplexMode::Simplex));
        assert_eq!(DuplexMode::from_ppd_keyword("Sideways"), None);
    }

    #[test]
    fn find_paper_is_case_insensitive() {
        let caps = CapabilitySet {
            printer: "test".into(),
            manufacturer: None,
            model: None,
            resolution: None,
            color: None,
            paper_sizes: vec![a4()],
            trays: Vec::new(),
            duplex_modes: Vec::new(),
            default_duplex: None,
            throughput_ppm: None,
            options: BTreeMap::new(),
        };
        assert!(caps.find_paper("a4").is_some());
        assert!(caps.find_paper("letter").is_none());
    }
}
