// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry resolver — selects the active paper size and computes its
// printable rectangle at the printer's native resolution.

use tracing::{debug, warn};

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::{
    CapabilitySet, MediaRequest, PaperSize, PrintableRectangle, Resolution,
};

/// Resolve the paper size and printable rectangle for a job.
///
/// Selection order: an explicit `request.size` is matched by name
/// (case-insensitive); otherwise the capability set's default entry;
/// otherwise the first declared size. An explicit name that matches
/// nothing is fatal and reports the available names.
///
/// When the printer's resolution is unknown, `fallback_dpi` is assumed so
/// images can still be composited — degraded fidelity, not an error.
pub fn resolve(
    caps: &CapabilitySet,
    request: &MediaRequest,
    fallback_dpi: u32,
) -> Result<(PaperSize, PrintableRectangle)> {
    let paper = match &request.size {
        Some(name) => caps
            .find_paper(name)
            .ok_or_else(|| BlattwerkError::UnknownMedia {
                requested: name.clone(),
                available: caps.paper_names(),
            })?,
        None => caps
            .default_paper()
            .or_else(|| caps.paper_sizes.first())
            .ok_or_else(|| {
                BlattwerkError::Capability(format!(
                    "printer {:?} declares no paper sizes",
                    caps.printer
                ))
            })?,
    };

    if !paper.is_printable() {
        return Err(BlattwerkError::InvalidGeometry(format!(
            "paper size {:?} has a non-positive printable area ({:.1}x{:.1}mm)",
            paper.name,
            paper.printable_width_mm(),
            paper.printable_height_mm()
        )));
    }

    let resolution = match caps.resolution {
        Some(res) => res,
        None => {
            warn!(
                printer = %caps.printer,
                fallback_dpi,
                "printer resolution unknown — assuming fallback DPI"
            );
            Resolution::square(fallback_dpi)
        }
    };

    let rect = PrintableRectangle::from_paper(paper, resolution);
    if rect.width_px == 0 || rect.height_px == 0 {
        return Err(BlattwerkError::InvalidGeometry(format!(
            "paper size {:?} resolves to an empty pixel area at {}",
            paper.name, resolution
        )));
    }

    debug!(
        paper = %paper.name,
        width_px = rect.width_px,
        height_px = rect.height_px,
        "resolved print geometry"
    );

    Ok((paper.clone(), rect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blattwerk_core::types::Margins;
    use std::collections::BTreeMap;

    fn caps_with(papers: Vec<PaperSize>, resolution: Option<Resolution>) -> CapabilitySet {
        CapabilitySet {
            printer: "test".into(),
            manufacturer: None,
            model: None,
            resolution,
            color: None,
            paper_sizes: papers,
            trays: Vec::new(),
            duplex_modes: Vec::new(),
            default_duplex: None,
            throughput_ppm: None,
            options: BTreeMap::new(),
        }
    }

    fn a4_default() -> PaperSize {
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
    fn default_a4_at_600dpi() {
        let caps = caps_with(vec![a4_default()], Some(Resolution::square(600)));
        let (paper, rect) = resolve(&caps, &MediaRequest::default(), 300).unwrap();

        assert_eq!(paper.name, "A4");
        assert!((rect.width_mm - 201.6).abs() < 1e-9);
        assert!((rect.height_mm - 288.6).abs() < 1e-9);
        assert_eq!(rect.width_px, 4762);
        assert_eq!(rect.height_px, 6817);
        assert!((rect.offset_left_mm - 4.2).abs() < 1e-9);
        assert!((rect.offset_top_mm - 4.2).abs() < 1e-9);
    }

    #[test]
    fn unknown_media_lists_available_names() {
        let caps = caps_with(vec![a4_default()], Some(Resolution::square(600)));
        let request = MediaRequest {
            size: Some("Letter".into()),
            ..Default::default()
        };
        match resolve(&caps, &request, 300) {
            Err(BlattwerkError::UnknownMedia {
                requested,
                available,
            }) => {
                assert_eq!(requested, "Letter");
                assert_eq!(available, vec!["A4"]);
            }
            other => panic!("expected UnknownMedia, got {other:?}"),
        }
    }

    #[test]
    fn explicit_match_is_case_insensitive() {
        let caps = caps_with(vec![a4_default()], Some(Resolution::square(600)));
        let request = MediaRequest {
            size: Some("a4".into()),
            ..Default::default()
        };
        let (paper, _) = resolve(&caps, &request, 300).unwrap();
        assert_eq!(paper.name, "A4");
    }

    #[test]
    fn no_default_flag_falls_back_to_first_entry() {
        let mut first = a4_default();
        first.default = false;
        let mut second = a4_default();
        second.name = "Letter".into();
        second.default = false;

        let caps = caps_with(vec![first, second], Some(Resolution::square(600)));
        let (paper, _) = resolve(&caps, &MediaRequest::default(), 300).unwrap();
        assert_eq!(paper.name, "A4");
    }

    #[test]
    fn default_flag_wins_over_declaration_order() {
        let mut first = a4_default();
        first.default = false;
        let mut second = a4_default();
        second.name = "Letter".into();

        let caps = caps_with(vec![first, second], Some(Resolution::square(600)));
        let (paper, _) = resolve(&caps, &MediaRequest::default(), 300).unwrap();
        assert_eq!(paper.name, "Letter");
    }

    #[test]
    fn unknown_resolution_degrades_to_fallback_dpi() {
        let caps = caps_with(vec![a4_default()], None);
        let (_, rect) = resolve(&caps, &MediaRequest::default(), 300).unwrap();
        assert_eq!(rect.resolution, Resolution::square(300));
        // 201.6mm at 300dpi = 2381.1px
        assert_eq!(rect.width_px, 2381);
        assert_eq!(rect.height_px, 3409);
    }

    #[test]
    fn non_square_resolution_is_honoured_per_axis() {
        let caps = caps_with(
            vec![a4_default()],
            Some(Resolution {
                horizontal_dpi: 1200,
                vertical_dpi: 600,
            }),
        );
        let (_, rect) = resolve(&caps, &MediaRequest::default(), 300).unwrap();
        assert_eq!(rect.width_px, 9524);
        assert_eq!(rect.height_px, 6817);
    }

    #[test]
    fn resolving_twice_is_bit_identical() {
        let caps = caps_with(vec![a4_default()], Some(Resolution::square(600)));
        let first = resolve(&caps, &MediaRequest::default(), 300).unwrap();
        let second = resolve(&caps, &MediaRequest::default(), 300).unwrap();
        assert_eq!(first.1, second.1);
        assert_eq!(first.0, second.0);
    }

    #[test]
    fn unprintable_selection_is_invalid_geometry() {
        let mut paper = a4_default();
        paper.margins.left_mm = 110.0;
        paper.margins.right_mm = 110.0;
        let caps = caps_with(vec![paper], Some(Resolution::square(600)));
        let err = resolve(&caps, &MediaRequest::default(), 300).unwrap_err();
        assert!(matches!(err, BlattwerkError::InvalidGeometry(_)));
    }
}
