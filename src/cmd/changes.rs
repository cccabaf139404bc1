//! Changes command - year-over-year Band D movements

use crate::cmd::format::{format_gbp, format_gbp_signed, format_percent_signed};
use crate::cmd::{find_council, print_json, table, DataArgs};
use crate::core::stats::{biggest_decreases, biggest_increases};
use crate::core::{year_over_year_change, CouncilRecord, YearChange};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct ChangesCommand {
    /// Show the change for a single council (area code)
    #[arg(short, long)]
    council: Option<String>,

    /// Number of councils in each list
    #[arg(short = 'n', long, default_value_t = 10)]
    count: usize,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled)]
struct ChangeRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Council")]
    name: String,
    #[tabled(rename = "Previous")]
    previous: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Change")]
    amount: String,
    #[tabled(rename = "%")]
    percent: String,
}

#[derive(Debug, Serialize)]
struct ChangeOutput {
    id: String,
    name: String,
    previous_year: String,
    current_year: String,
    previous: Decimal,
    current: Decimal,
    amount: Decimal,
    percent: Decimal,
}

impl ChangeOutput {
    fn new(council: &CouncilRecord, change: &YearChange) -> Self {
        ChangeOutput {
            id: council.id.clone(),
            name: council.name.clone(),
            previous_year: change.previous_year.display(),
            current_year: change.current_year.display(),
            previous: change.previous,
            current: change.current,
            amount: change.amount,
            percent: change.percent.round_dp(2),
        }
    }
}

fn change_rows(changes: &[(&CouncilRecord, YearChange)]) -> Vec<ChangeRow> {
    changes
        .iter()
        .enumerate()
        .map(|(i, (council, change))| ChangeRow {
            rank: i + 1,
            name: council.name.clone(),
            previous: format_gbp(change.previous),
            current: format_gbp(change.current),
            amount: format_gbp_signed(change.amount),
            percent: format_percent_signed(change.percent),
        })
        .collect()
}

fn change_outputs(changes: &[(&CouncilRecord, YearChange)]) -> Vec<ChangeOutput> {
    changes
        .iter()
        .map(|(council, change)| ChangeOutput::new(council, change))
        .collect()
}

impl ChangesCommand {
    pub fn exec(&self, data: &DataArgs) -> anyhow::Result<()> {
        let directory = data.load()?;
        let year = directory.current_year();

        if let Some(id) = &self.council {
            let council = find_council(&directory, id)?;
            let change = year_over_year_change(&directory, council);
            if self.json {
                return print_json(&change.map(|c| ChangeOutput::new(council, &c)));
            }
            match change {
                Some(change) => println!(
                    "{}: {} ({}) -> {} ({}), {} ({})",
                    council.name,
                    format_gbp(change.previous),
                    change.previous_year,
                    format_gbp(change.current),
                    change.current_year,
                    format_gbp_signed(change.amount),
                    format_percent_signed(change.percent)
                ),
                None => println!(
                    "{}: no Band D figures for both {} and {}",
                    council.name,
                    year.previous(),
                    year
                ),
            }
            return Ok(());
        }

        let increases = biggest_increases(&directory, self.count);
        let decreases = biggest_decreases(&directory, self.count);

        if self.json {
            #[derive(Serialize)]
            struct Output {
                year: String,
                increases: Vec<ChangeOutput>,
                decreases: Vec<ChangeOutput>,
            }
            return print_json(&Output {
                year: year.display(),
                increases: change_outputs(&increases),
                decreases: change_outputs(&decreases),
            });
        }

        if increases.is_empty() {
            println!("No councils have Band D figures for both {} and {}", year.previous(), year);
            return Ok(());
        }

        println!();
        println!("BIGGEST INCREASES ({} -> {})", year.previous(), year);
        println!("{}", table(change_rows(&increases)));
        println!();
        println!("BIGGEST DECREASES ({} -> {})", year.previous(), year);
        println!("{}", table(change_rows(&decreases)));
        Ok(())
    }
}
