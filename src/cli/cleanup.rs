use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cleanup::{cleanup, CanonicalizeReport, CleanupReport, SweepCounts};
use crate::cli::{load, OutputFormat};
use crate::parsing::writer::write_file;

#[derive(Args)]
pub struct CleanupArgs {
    /// GEDCOM file to clean (.ged or .ged.gz)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Id of the root individual, e.g. @I1@
    #[arg(required = true)]
    pub root: String,

    /// Where to write the cleaned tree (gzipped if it ends in .gz)
    #[arg(required = true)]
    pub output: PathBuf,
}

pub fn run(args: CleanupArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut store = load(&args.input, verbose)?;
    let report = cleanup(&mut store, &args.root)?;

    write_file(&store, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    if verbose {
        eprintln!("Wrote {} records to {}", store.len(), args.output.display());
    }

    match format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Tsv => print_tsv(&report),
    }
    Ok(())
}

fn print_text(report: &CleanupReport) {
    let sweep = |label: &str, counts: &SweepCounts| {
        println!(
            "{label}: found {}, traversed {}, removed {}",
            counts.found, counts.traversed, counts.removed
        );
    };
    sweep("Individuals", &report.reachability.individuals);
    sweep("Families", &report.reachability.families);

    let dedup = |label: &str, counts: &CanonicalizeReport| {
        println!(
            "{label}: found {}, canonical {}, traversed {}, removed {}",
            counts.found, counts.canonical, counts.traversed, counts.removed
        );
    };
    dedup("Notes", &report.notes);
    dedup("Sources", &report.sources);
}

fn print_tsv(report: &CleanupReport) {
    println!("kind\tfound\tcanonical\ttraversed\tremoved");
    for (kind, c) in [
        ("individuals", &report.reachability.individuals),
        ("families", &report.reachability.families),
    ] {
        println!("{kind}\t{}\t\t{}\t{}", c.found, c.traversed, c.removed);
    }
    for (kind, c) in [("notes", &report.notes), ("sources", &report.sources)] {
        println!(
            "{kind}\t{}\t{}\t{}\t{}",
            c.found, c.canonical, c.traversed, c.removed
        );
    }
}
