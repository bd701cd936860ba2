// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Blattwerk.

use thiserror::Error;

/// Top-level error type for all Blattwerk operations.
///
/// Printing is a one-shot, non-idempotent external action: every fatal
/// variant here aborts the invocation before (or instead of) submission.
/// Nothing is retried.
#[derive(Debug, Error)]
pub enum BlattwerkError {
    // -- Capability errors --
    #[error("unusable printer capabilities: {0}")]
    Capability(String),

    #[error("unknown media {requested:?} — available: {}", .available.join(", "))]
    UnknownMedia {
        requested: String,
        available: Vec<String>,
    },

    #[error("invalid page geometry: {0}")]
    InvalidGeometry(String),

    // -- Document errors --
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    // -- Spooler boundary --
    #[error("print spooler error: {0}")]
    Spooler(String),

    #[error("no default printer set — use --printer to specify one")]
    NoDefaultPrinter,

    #[error("invalid printer name: {0:?}")]
    InvalidPrinterName(String),

    #[error("file rejected: {0}")]
    FileRejected(String),

    // -- I/O and serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlattwerkError>;
