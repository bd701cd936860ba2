// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// blattwerk-document — Composites a raster image onto a full printer
// sheet and encodes it as a single-page PDF at the device's native DPI.

pub mod compose;

pub use compose::{CompositedDocument, PageCompositor, fit_within};
