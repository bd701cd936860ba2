// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Blattwerk — print images and PDFs to any CUPS printer, deriving paper
// geometry from the printer's own PPD at run time.
//
// Entry point. Initialises logging, parses the CLI, and dispatches to one
// command per invocation.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use blattwerk_core::AppConfig;

#[derive(Parser)]
#[command(
    name = "blattwerk",
    version,
    about = "Print images and PDFs to any CUPS printer, PPD-aware"
)]
struct Cli {
    /// Emit machine-readable JSON instead of human output.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available printers.
    List,
    /// Show printer specs (paper sizes, margins, capabilities).
    Info {
        /// Printer name (default: system default).
        #[arg(long)]
        printer: Option<String>,
    },
    /// Show the CUPS option listing for a printer.
    Options {
        /// Printer name (default: system default).
        #[arg(long)]
        printer: Option<String>,
    },
    /// Print a file (PDF or image).
    Print {
        /// File to print.
        file: PathBuf,
        /// Printer name (default: system default).
        #[arg(long)]
        printer: Option<String>,
        /// Explicit paper size name (e.g. A4, Letter).
        #[arg(long)]
        media: Option<String>,
        /// Input tray / slot name.
        #[arg(long)]
        tray: Option<String>,
        /// Media type hint (e.g. Photo, Plain).
        #[arg(long)]
        media_type: Option<String>,
        /// Extra spooler options as key=value, repeatable. Override
        /// anything derived from the printer's PPD.
        #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::default();

    let result = match &cli.command {
        Command::List => commands::list::run(cli.json),
        Command::Info { printer } => commands::info::run(printer.as_deref(), &config, cli.json),
        Command::Options { printer } => commands::options::run(printer.as_deref(), cli.json),
        Command::Print {
            file,
            printer,
            media,
            tray,
            media_type,
            options,
        } => commands::print::run(commands::print::PrintArgs {
            file,
            printer: printer.as_deref(),
            media: media.as_deref(),
            tray: tray.as_deref(),
            media_type: media_type.as_deref(),
            overrides: options,
            config: &config,
            json: cli.json,
        }),
    };

    match result {
        Ok(()) => {}
        Err(err) => {
            commands::emit_error(&err, cli.json);
            std::process::exit(1);
        }
    }
}
