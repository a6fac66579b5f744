use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::cli::{load, OutputFormat};
use crate::core::event::Event;
use crate::store::{EventValidation, Gedcom};

#[derive(Args)]
pub struct CheckArgs {
    /// GEDCOM file to check
    #[arg(required = true)]
    pub input: PathBuf,

    /// Only check events dated in or after this year
    #[arg(long)]
    pub from_year: Option<i32>,

    /// Only check events dated in or before this year
    #[arg(long)]
    pub to_year: Option<i32>,

    /// Detail every checked event must have
    #[arg(long, value_enum)]
    pub require: Requirement,
}

/// A detail an event can be required to carry
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Requirement {
    Date,
    Place,
    /// A source pointer that resolves to a record in the file
    Source,
    /// A note pointer that resolves to a record in the file
    Note,
}

impl Requirement {
    pub fn is_met(self, event: &Event<'_>, store: &Gedcom) -> bool {
        match self {
            Self::Date => event.date.is_some(),
            Self::Place => event.place.is_some(),
            Self::Source => event.source.is_some_and(|id| store.source(id).is_some()),
            Self::Note => event.note.is_some_and(|id| store.note(id).is_some()),
        }
    }
}

/// Whether an event falls within the optional year bounds.
///
/// With any bound set, events without a readable year are left out.
pub fn in_year_range(event: &Event<'_>, from: Option<i32>, to: Option<i32>) -> bool {
    if from.is_none() && to.is_none() {
        return true;
    }
    event
        .year()
        .is_some_and(|year| from.map_or(true, |f| year >= f) && to.map_or(true, |t| year <= t))
}

pub fn run(args: CheckArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let store = load(&args.input, verbose)?;
    let result = store.validate_events(
        |event| in_year_range(event, args.from_year, args.to_year),
        |event, store| args.require.is_met(event, store),
    );

    match format {
        OutputFormat::Text => print_text(&result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Tsv => print_tsv(&result),
    }
    Ok(())
}

fn print_text(result: &EventValidation) {
    for failure in &result.failed {
        println!("Validation failed for {} ({})", failure.owner, failure.kind);
    }
    println!(
        "{} of {} selected events failed validation ({} events total)",
        result.failed.len(),
        result.selected,
        result.total
    );
}

fn print_tsv(result: &EventValidation) {
    println!("owner\tevent");
    for failure in &result.failed {
        println!("{}\t{}", failure.owner, failure.kind.tag());
    }
}
