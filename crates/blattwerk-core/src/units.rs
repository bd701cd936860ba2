// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unit conversions between PPD-native points, millimetres, and device
// pixels. Every conversion in the workspace goes through these helpers —
// raw source-unit numbers never reach geometry logic directly.

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// PostScript points per inch. PPD `PaperDimension` and `ImageableArea`
/// values are expressed in points.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Millimetres per point.
pub const MM_PER_POINT: f64 = MM_PER_INCH / POINTS_PER_INCH;

/// Convert PostScript points to millimetres.
pub fn pt_to_mm(pt: f64) -> f64 {
    pt * MM_PER_POINT
}

/// Convert millimetres to PostScript points.
pub fn mm_to_pt(mm: f64) -> f64 {
    mm / MM_PER_POINT
}

/// Convert millimetres to device pixels at the given DPI, rounded to the
/// nearest whole pixel.
pub fn mm_to_px(mm: f64, dpi: u32) -> u32 {
    (mm * f64::from(dpi) / MM_PER_INCH).round() as u32
}

/// Convert device pixels at the given DPI back to millimetres.
pub fn px_to_mm(px: u32, dpi: u32) -> f64 {
    f64::from(px) * MM_PER_INCH / f64::from(dpi)
}
