// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `blattwerk options` — show the raw option listing for a printer.

use serde::Serialize;

use blattwerk_core::error::Result;
use blattwerk_ppd::CapabilityRecord;

use super::resolve_printer;

/// One option as displayed: name, label, current value, all choices.
#[derive(Debug, Serialize)]
struct OptionListing {
    option: String,
    label: Option<String>,
    current: Option<String>,
    values: Vec<String>,
}

pub fn run(printer: Option<&str>, json: bool) -> Result<()> {
    let printer = resolve_printer(printer)?;

    let listing_text = blattwerk_cups::query_choice_listing(&printer)?;
    let records = blattwerk_ppd::scan_choice_listing(&listing_text);
    let listings = collect_listings(&records);

    if json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    println!("Options for {printer}:\n");
    for opt in &listings {
        let name = opt.label.as_deref().unwrap_or(&opt.option);
        match &opt.current {
            Some(current) => println!("  {name} = {current}"),
            None => println!("  {name}"),
        }
        if opt.values.len() > 1 {
            println!("    Choices: {}", opt.values.join(", "));
        }
    }
    Ok(())
}

/// Fold choice/current records back into per-option listings, keeping
/// first-seen order.
fn collect_listings(records: &[CapabilityRecord]) -> Vec<OptionListing> {
    let mut listings: Vec<OptionListing> = Vec::new();

    for record in records {
        match record {
            CapabilityRecord::OptionChoice {
                name,
                choice,
                label,
            } => {
                let idx = entry_for(&mut listings, name, label.as_deref());
                if !listings[idx].values.contains(choice) {
                    listings[idx].values.push(choice.clone());
                }
            }
            CapabilityRecord::OptionCurrent { name, value } => {
                let idx = entry_for(&mut listings, name, None);
                listings[idx].current = Some(value.clone());
            }
            CapabilityRecord::DuplexChoice(choice) => {
                let idx = entry_for(&mut listings, "Duplex", None);
                if !listings[idx].values.contains(choice) {
                    listings[idx].values.push(choice.clone());
                }
            }
            CapabilityRecord::DefaultDuplex(value) => {
                let idx = entry_for(&mut listings, "Duplex", None);
                listings[idx].current = Some(value.clone());
            }
            CapabilityRecord::InputSlot(choice) => {
                let idx = entry_for(&mut listings, "InputSlot", None);
                if !listings[idx].values.contains(choice) {
                    listings[idx].values.push(choice.clone());
                }
            }
            CapabilityRecord::DefaultResolution(value) => {
                let idx = entry_for(&mut listings, "Resolution", None);
                listings[idx].current = Some(value.clone());
            }
            _ => {}
        }
    }

    listings
}

/// Index of the listing for `name`, creating it on first sight.
fn entry_for(listings: &mut Vec<OptionListing>, name: &str, label: Option<&str>) -> usize {
    if let Some(idx) = listings.iter().position(|l| l.option == name) {
        return idx;
    }
    listings.push(OptionListing {
        option: name.to_string(),
        label: label.map(str::to_string),
        current: None,
        values: Vec::new(),
    });
    listings.len() - 1
}
