// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Validation gates at the spooler boundary.
//
// Printer names reach shell commands and filesystem paths, so they are
// restricted to the characters CUPS itself allows. File paths are
// resolved through symlinks before any check, so a link pointing outside
// the allowed roots is caught at its target.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use blattwerk_core::error::{BlattwerkError, Result};

/// Environment variable naming an additional allowed print root.
pub const WORKSPACE_ENV: &str = "BLATTWERK_WORKSPACE";

/// Raster formats the compositor accepts.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "webp"];

static PRINTER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.\-]+$").expect("valid printer-name pattern"));

/// Validate a CUPS destination name.
///
/// CUPS printer names contain only alphanumerics, hyphen, underscore,
/// and period; anything else could smuggle arguments into the spooler
/// commands or escape the PPD directory.
pub fn validate_printer_name(name: &str) -> Result<&str> {
    if PRINTER_NAME.is_match(name) {
        Ok(name)
    } else {
        Err(BlattwerkError::InvalidPrinterName(name.to_string()))
    }
}

/// Whether a path carries a raster-image extension.
pub fn is_image(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Whether a path carries the PDF extension.
pub fn is_pdf(path: &Path) -> bool {
    extension_of(path).as_deref() == Some("pdf")
}

/// Validate and resolve a file path for printing.
///
/// The path must exist, resolve (through symlinks) to a regular file
/// inside one of the allowed roots, and carry a printable extension.
pub fn validate_file_path(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(BlattwerkError::FileRejected(format!(
            "not a file: {}",
            path.display()
        )));
    }

    let resolved = path.canonicalize()?;
    if !resolved.is_file() {
        return Err(BlattwerkError::FileRejected(format!(
            "not a regular file: {}",
            path.display()
        )));
    }

    let roots = allowed_roots();
    if !roots.iter().any(|root| resolved.starts_with(root)) {
        return Err(BlattwerkError::FileRejected(format!(
            "file is outside the allowed directories (workspace, /tmp): {}",
            resolved.display()
        )));
    }

    // Check the resolved file's extension — the actual file on disk, not
    // the name of a symlink pointing at it.
    if !is_pdf(&resolved) && !is_image(&resolved) {
        return Err(BlattwerkError::FileRejected(format!(
            "unsupported file type {:?} — supported: pdf, {}",
            extension_of(&resolved).unwrap_or_default(),
            IMAGE_EXTENSIONS.join(", ")
        )));
    }

    Ok(resolved)
}

/// Directories from which printing is allowed: the workspace named by
/// `BLATTWERK_WORKSPACE` (if set), the current directory, and /tmp.
fn allowed_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(ws) = std::env::var(WORKSPACE_ENV) {
        if let Ok(resolved) = PathBuf::from(ws).canonicalize() {
            roots.push(resolved);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(resolved) = cwd.canonicalize() {
            if !roots.contains(&resolved) {
                roots.push(resolved);
            }
        }
    }
    if let Ok(tmp) = PathBuf::from("/tmp").canonicalize() {
        roots.push(tmp);
    }

    roots
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}
