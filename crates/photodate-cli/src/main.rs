use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use photodate_core::{CompanionOptions, EventCallback, OrganizeOptions, ReassignOptions, RunSummary};

#[derive(Parser)]
#[command(name = "photodate", version, about = "Sort photos into YYYY/MM/YYYY-MM-DD folders by capture date")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the run summary as JSON when done
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Move images (and files sharing their base name) into date folders
    Organize {
        /// Directory with the unsorted files
        source: PathBuf,
        /// Base of the YYYY/MM/YYYY-MM-DD tree
        destination: PathBuf,
    },
    /// Move YYYY-MM-* / YYYY_MM_* folders inside year folders into month folders
    Reassign {
        /// Directory holding the year folders
        root: PathBuf,
        #[arg(long, default_value_t = 2001)]
        first_year: i32,
        /// Inclusive
        #[arg(long, default_value_t = 2024)]
        last_year: i32,
    },
    /// Move edit sidecars (IMG_O1234.AAE) next to their sorted image (IMG_1234.*)
    Companions {
        /// Directory holding the sidecars; searched recursively for partners
        root: PathBuf,
        #[arg(long, default_value = "AAE")]
        extension: String,
        #[arg(long, default_value = "IMG_O")]
        prefix: String,
        #[arg(long, default_value = "IMG_")]
        replacement: String,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let t_total = std::time::Instant::now();
    let json = cli.json;

    let summary = run(cli.command, &|event| println!("{event}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, t_total.elapsed().as_secs_f64());
    }
    Ok(())
}

/// Run one batch command; an `Err` here ends the process with status 1.
fn run(command: Command, print: &EventCallback<'_>) -> anyhow::Result<RunSummary> {
    let summary = match command {
        Command::Organize {
            source,
            destination,
        } => photodate_core::organize(
            &OrganizeOptions {
                source,
                destination,
            },
            print,
        )?,
        Command::Reassign {
            root,
            first_year,
            last_year,
        } => photodate_core::reassign_folders(
            &ReassignOptions {
                root,
                first_year,
                last_year,
            },
            print,
        )?,
        Command::Companions {
            root,
            extension,
            prefix,
            replacement,
        } => photodate_core::relocate_companions(
            &CompanionOptions {
                root,
                extension,
                prefix,
                replacement,
            },
            print,
        )?,
    };
    Ok(summary)
}

fn print_summary(s: &RunSummary, secs: f64) {
    eprintln!(
        "Done! {} scanned, {} moved, {} skipped, {} without date, {} failed ({:.2}s)",
        s.scanned, s.moved, s.skipped, s.undated, s.failed, secs
    );
}
