use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;

use crate::cli::{load, OutputFormat};
use crate::compare::{CompareConfig, ComparisonReport, GedcomCompare, MergeSource};
use crate::core::types::Side;
use crate::matching::scoring::ScoringWeights;
use crate::parsing::writer::write_file;

#[derive(Args)]
pub struct CompareArgs {
    /// Left GEDCOM file
    #[arg(required = true)]
    pub left: PathBuf,

    /// Id of the root individual in the left file
    #[arg(required = true)]
    pub left_root: String,

    /// Right GEDCOM file
    #[arg(required = true)]
    pub right: PathBuf,

    /// Id of the root individual in the right file
    #[arg(required = true)]
    pub right_root: String,

    /// Copy records found only on this side into the other tree
    #[arg(long, value_enum, default_value = "none")]
    pub merge: MergeSource,

    /// Where to write the merged tree (required with --merge left|right)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON file overriding the match scoring weights
    #[arg(long)]
    pub weights: Option<PathBuf>,
}

pub fn run(args: CompareArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if args.merge != MergeSource::None && args.output.is_none() {
        bail!("--output is required when merging");
    }

    let weights = match &args.weights {
        Some(path) => ScoringWeights::load_from_file(path)
            .with_context(|| format!("Failed to load weights from {}", path.display()))?,
        None => ScoringWeights::default(),
    };
    if verbose {
        eprintln!(
            "Weights: birth {}, death {}, name {}, marriage {}",
            weights.birth, weights.death, weights.name, weights.marriage
        );
    }

    let mut left = load(&args.left, verbose)?;
    let mut right = load(&args.right, verbose)?;

    let config = CompareConfig {
        merge: args.merge,
        weights,
    };
    let report = GedcomCompare::new(&mut left, &mut right, config)
        .compare_from(&args.left_root, &args.right_root)?;

    if let (Some(side), Some(output)) = (args.merge.destination(), &args.output) {
        let dest = match side {
            Side::Left => &left,
            Side::Right => &right,
        };
        write_file(dest, output).with_context(|| format!("Failed to write {}", output.display()))?;
        if verbose {
            eprintln!("Wrote merged {side} tree to {}", output.display());
        }
    }

    match format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Tsv => print_tsv(&report),
    }
    Ok(())
}

fn print_text(report: &ComparisonReport) {
    for pair in &report.pairs {
        println!("Comparing {} vs {}", pair.left, pair.right);
        for diff in &pair.differences {
            println!("\t{diff}");
        }
    }
    if report.merge_source != MergeSource::None {
        println!("\n{}", report.merge);
    }
}

fn print_tsv(report: &ComparisonReport) {
    println!("left_id\tright_id\ttype\tdetail");
    for pair in &report.pairs {
        for diff in &pair.differences {
            println!(
                "{}\t{}\t{}\t{}",
                pair.left.id,
                pair.right.id,
                diff.kind(),
                diff
            );
        }
    }
}
