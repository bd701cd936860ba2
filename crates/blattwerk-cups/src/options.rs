// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Job option assembly for `lp -o key=value` submission.
//
// Ordered, last-write-wins: resolver-derived defaults are set first, then
// caller overrides, so an explicit `-o media=Letter` beats the media the
// resolver chose.

use blattwerk_core::types::{CapabilitySet, DuplexMode, MediaRequest, PaperSize};

/// A flat, ordered mapping of CUPS option name -> value.
///
/// An empty value renders as a bare flag (`-o fit-to-page`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobOptions {
    entries: Vec<(String, String)>,
}

impl JobOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, replacing any existing value for the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Set a valueless flag option.
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.set(key, "");
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as `lp` command-line arguments: `-o key=value` pairs.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.entries.len() * 2);
        for (key, value) in &self.entries {
            args.push("-o".to_string());
            if value.is_empty() {
                args.push(key.clone());
            } else {
                args.push(format!("{key}={value}"));
            }
        }
        args
    }
}

/// Build the option set for one job: geometry-derived defaults first,
/// then caller-supplied `key=value` overrides (last write wins).
pub fn derive_job_options(
    paper: &PaperSize,
    caps: &CapabilitySet,
    request: &MediaRequest,
    overrides: &[(String, String)],
) -> JobOptions {
    let mut opts = JobOptions::new();

    opts.set("media", &paper.name);
    opts.set_flag("fit-to-page");

    // Only pass `sides` when the printer defaults to an actual two-sided
    // mode; a Simplex default is the spooler's own default anyway.
    if let Some(duplex) = caps.default_duplex {
        if duplex != DuplexMode::Simplex && !caps.duplex_modes.is_empty() {
            opts.set("sides", duplex.cups_sides_keyword());
        }
    }
    if let Some(tray) = &request.tray {
        opts.set("InputSlot", tray);
    }
    if let Some(media_type) = &request.media_type {
        opts.set("MediaType", media_type);
    }

    for (key, value) in overrides {
        opts.set(key, value);
    }

    opts
}

#[cfg(test)]
mod tests {
    use super::*;
    use blattwerk_core::types::{DuplexMode, Margins};
    use std::collections::BTreeMap;

    fn a4() -> PaperSize {
        PaperSize {
            name: "A4".into(),
            width_mm: 210.0,
            height_mm: 297.0,
            margins: Margins::default(),
            default: true,
        }
    }

    fn duplex_caps() -> CapabilitySet {
        CapabilitySet {
            printer: "test".into(),
            manufacturer: None,
            model: None,
            resolution: None,
            color: None,
            paper_sizes: vec![a4()],
            trays: vec!["Tray1".into()],
            duplex_modes: vec![DuplexMode::Simplex, DuplexMode::LongEdge],
            default_duplex: Some(DuplexMode::LongEdge),
            throughput_ppm: None,
            options: BTreeMap::new(),
        }
    }

    #[test]
    fn derives_media_and_sides() {
        let opts = derive_job_options(&a4(), &duplex_caps(), &MediaRequest::default(), &[]);
        assert_eq!(opts.get("media"), Some("A4"));
        assert_eq!(opts.get("sides"), Some("two-sided-long-edge"));
        assert_eq!(opts.get("fit-to-page"), Some(""));
    }

    #[test]
    fn no_sides_without_duplex_capability() {
        let mut caps = duplex_caps();
        caps.duplex_modes.clear();
        caps.default_duplex = None;
        let opts = derive_job_options(&a4(), &caps, &MediaRequest::default(), &[]);
        assert_eq!(opts.get("sides"), None);
    }

    #[test]
    fn caller_overrides_win() {
        let overrides = vec![
            ("media".to_string(), "Letter".to_string()),
            ("sides".to_string(), "one-sided".to_string()),
        ];
        let opts = derive_job_options(&a4(), &duplex_caps(), &MediaRequest::default(), &overrides);
        assert_eq!(opts.get("media"), Some("Letter"));
        assert_eq!(opts.get("sides"), Some("one-sided"));
    }

    #[test]
    fn duplicate_keys_are_last_write_wins() {
        let mut opts = JobOptions::new();
        opts.set("quality", "draft");
        opts.set("quality", "best");
        assert_eq!(opts.get("quality"), Some("best"));
        assert_eq!(opts.iter().count(), 1);
    }

    #[test]
    fn tray_and_media_type_pass_through() {
        let request = MediaRequest {
            size: None,
            tray: Some("Tray1".into()),
            media_type: Some("Photo".into()),
        };
        let opts = derive_job_options(&a4(), &duplex_caps(), &request, &[]);
        assert_eq!(opts.get("InputSlot"), Some("Tray1"));
        assert_eq!(opts.get("MediaType"), Some("Photo"));
    }

    #[test]
    fn renders_lp_arguments() {
        let mut opts = JobOptions::new();
        opts.set("media", "A4");
        opts.set_flag("fit-to-page");
        assert_eq!(
            opts.to_args(),
            vec!["-o", "media=A4", "-o", "fit-to-page"]
        );
    }
}
