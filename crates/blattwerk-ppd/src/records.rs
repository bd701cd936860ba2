// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capability record scanner.
//
// Two text shapes flatten into the same record stream: raw PPD files
// (`*Keyword Choice/Label: "value"`) and the option-choice listing that
// `lpoptions -l` produces (`Option/Label: choice *current choice`). The
// interpreter never sees either surface syntax, only `CapabilityRecord`s.

use tracing::warn;

/// One recognized (or residual) statement about a printer.
///
/// Recognized fields get dedicated variants; everything else lands in
/// `OptionChoice`/`OptionCurrent` so unrecognized-but-valid options still
/// round-trip to the submission boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityRecord {
    /// Physical sheet dimensions for a named size, in PPD points.
    PaperDimension {
        name: String,
        width_pt: f64,
        height_pt: f64,
    },
    /// Imageable-area corners for a named size: lower-left (llx, lly) and
    /// upper-right (urx, ury), in PPD points from the page's bottom-left.
    ImageableArea {
        name: String,
        llx_pt: f64,
        lly_pt: f64,
        urx_pt: f64,
        ury_pt: f64,
    },
    DefaultPageSize(String),
    /// Raw resolution token, e.g. "600x600dpi". Parsed later so a
    /// malformed token can become the unknown-resolution state.
    DefaultResolution(String),
    DefaultDuplex(String),
    DuplexChoice(String),
    ColorDevice(bool),
    InputSlot(String),
    Manufacturer(String),
    ModelName(String),
    Throughput(u32),
    /// A declared choice of an option we do not specifically model.
    OptionChoice {
        name: String,
        choice: String,
        label: Option<String>,
    },
    /// A current/default value of an option we do not specifically model.
    OptionCurrent { name: String, value: String },
}

/// Scan raw PPD text into capability records.
///
/// Malformed lines for modelled keywords (e.g. a PaperDimension with a
/// missing coordinate) are skipped with a warning; the rest of the file
/// still parses.
pub fn scan_ppd(text: &str) -> Vec<CapabilityRecord> {
    let mut records = Vec::new();

    for line in text.lines() {
        let Some(rest) = line.strip_prefix('*') else {
            continue;
        };
        // *% introduces a PPD comment.
        if rest.starts_with('%') {
            continue;
        }
        let Some((head, raw_value)) = rest.split_once(':') else {
            continue;
        };
        let value = unquote(raw_value.trim());

        // Head is either `Keyword` or `Keyword Choice[/Label]`.
        let mut head_parts = head.trim().splitn(2, char::is_whitespace);
        let keyword = match head_parts.next() {
            Some(k) if !k.is_empty() => k,
            _ => continue,
        };
        let choice_part = head_parts.next().map(str::trim);
        let (choice, label) = match choice_part {
            Some(c) => {
                let (choice, label) = split_choice_label(c);
                (Some(choice), label)
            }
            None => (None, None),
        };

        if let Some(record) = classify(keyword, choice, label, &value) {
            records.push(record);
        }
    }

    records
}

/// Scan an option-choice listing (the `lpoptions -l` shape) into records.
///
/// Each line reads `Option/Label: choice *current choice`; the starred
/// entry is the currently selected value.
pub fn scan_choice_listing(text: &str) -> Vec<CapabilityRecord> {
    let mut records = Vec::new();

    for line in text.lines() {
        let Some((head, values_str)) = line.split_once(':') else {
            continue;
        };
        if !head.contains('/') {
            continue;
        }
        let (name, label) = split_choice_label(head.trim());
        let label = label.or(Some(name.clone()));

        let mut current: Option<String> = None;
        let mut choices: Vec<String> = Vec::new();
        for token in values_str.split_whitespace() {
            match token.strip_prefix('*') {
                Some(starred) => {
                    current = Some(starred.to_string());
                    choices.push(starred.to_string());
                }
                None => choices.push(token.to_string()),
            }
        }

        match name.as_str() {
            "Duplex" => {
                for c in &choices {
                    records.push(CapabilityRecord::DuplexChoice(c.clone()));
                }
                if let Some(cur) = &current {
                    records.push(CapabilityRecord::DefaultDuplex(cur.clone()));
                }
            }
            "InputSlot" => {
                for c in &choices {
                    records.push(CapabilityRecord::InputSlot(c.clone()));
                }
                if let Some(cur) = current {
                    records.push(CapabilityRecord::OptionCurrent {
                        name: name.clone(),
                        value: cur,
                    });
                }
            }
            "Resolution" => {
                if let Some(cur) = &current {
                    records.push(CapabilityRecord::DefaultResolution(cur.clone()));
                }
                for c in choices {
                    records.push(CapabilityRecord::OptionChoice {
                        name: name.clone(),
                        choice: c,
                        label: label.clone(),
                    });
                }
            }
            _ => {
                for c in choices {
                    records.push(CapabilityRecord::OptionChoice {
                        name: name.clone(),
                        choice: c,
                        label: label.clone(),
                    });
                }
                if let Some(cur) = current {
                    records.push(CapabilityRecord::OptionCurrent { name, value: cur });
                }
            }
        }
    }

    records
}

/// Map one PPD statement onto a record. Returns `None` for lines that are
/// malformed beyond recovery (warned) or carry no information.
fn classify(
    keyword: &str,
    choice: Option<String>,
    label: Option<String>,
    value: &str,
) -> Option<CapabilityRecord> {
    match (keyword, choice) {
        ("PaperDimension", Some(name)) => match parse_floats::<2>(value) {
            Some([w, h]) => Some(CapabilityRecord::PaperDimension {
                name,
                width_pt: w,
                height_pt: h,
            }),
            None => {
                warn!(%name, value, "skipping malformed PaperDimension record");
                None
            }
        },
        ("ImageableArea", Some(name)) => match parse_floats::<4>(value) {
            Some([llx, lly, urx, ury]) => Some(CapabilityRecord::ImageableArea {
                name,
                llx_pt: llx,
                lly_pt: lly,
                urx_pt: urx,
                ury_pt: ury,
            }),
            None => {
                warn!(%name, value, "skipping malformed ImageableArea record");
                None
            }
        },
        ("DefaultPageSize", None) => Some(CapabilityRecord::DefaultPageSize(value.into())),
        ("DefaultResolution", None) => Some(CapabilityRecord::DefaultResolution(value.into())),
        ("DefaultDuplex", None) => Some(CapabilityRecord::DefaultDuplex(value.into())),
        ("Duplex", Some(name)) => Some(CapabilityRecord::DuplexChoice(name)),
        ("ColorDevice", None) => Some(CapabilityRecord::ColorDevice(
            value.eq_ignore_ascii_case("true"),
        )),
        ("InputSlot", Some(name)) => Some(CapabilityRecord::InputSlot(name)),
        ("Manufacturer", None) => Some(CapabilityRecord::Manufacturer(value.into())),
        ("ModelName", None) => Some(CapabilityRecord::ModelName(value.into())),
        ("Throughput", None) => value.parse().ok().map(CapabilityRecord::Throughput),
        // Residual statements: keep them verbatim in the generic mapping.
        (other, Some(choice)) => Some(CapabilityRecord::OptionChoice {
            name: other.into(),
            choice,
            label,
        }),
        (other, None) => match other.strip_prefix("Default") {
            Some(option) if !option.is_empty() => Some(CapabilityRecord::OptionCurrent {
                name: option.into(),
                value: value.into(),
            }),
            _ => Some(CapabilityRecord::OptionCurrent {
                name: other.into(),
                value: value.into(),
            }),
        },
    }
}

/// Split `Choice/Translation` into the choice token and optional label.
fn split_choice_label(token: &str) -> (String, Option<String>) {
    match token.split_once('/') {
        Some((choice, label)) => (choice.trim().to_string(), Some(label.trim().to_string())),
        None => (token.trim().trim_end_matches(':').to_string(), None),
    }
}

/// Strip one layer of surrounding double quotes.
fn unquote(value: &str) -> String {
    value.trim().trim_matches('"').trim().to_string()
}

/// Parse exactly N whitespace-separated floats.
fn parse_floats<const N: usize>(value: &str) -> Option<[f64; N]> {
    let mut out = [0.0; N];
    let mut parts = value.split_whitespace();
    for slot in &mut out {
        *slot = parts.next()?.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}
