//! Stats command - national and per-type Band D statistics

use crate::cmd::format::{format_gbp, or_na};
use crate::cmd::{print_json, table, DataArgs};
use crate::core::{average_by_type, national_stats, type_averages, CouncilType, Ranked};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Only show the average for one council type (e.g., district, county)
    #[arg(short = 't', long = "type", value_parser = parse_council_type)]
    council_type: Option<CouncilType>,

    /// Number of councils in the highest/lowest lists
    #[arg(short = 'n', long, default_value_t = 5)]
    top: usize,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

pub fn parse_council_type(s: &str) -> Result<CouncilType, String> {
    CouncilType::from_code(s).ok_or_else(|| {
        let codes: Vec<_> = CouncilType::ALL.iter().map(|t| t.code()).collect();
        format!("unknown council type '{}', expected one of: {}", s, codes.join(", "))
    })
}

#[derive(Debug, Tabled)]
struct TypeRow {
    #[tabled(rename = "Type")]
    council_type: String,
    #[tabled(rename = "Councils")]
    count: usize,
    #[tabled(rename = "Average Band D")]
    average: String,
}

#[derive(Debug, Tabled, Serialize)]
pub struct RankRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Council")]
    name: String,
    #[tabled(rename = "Area Code")]
    id: String,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn rank_rows(ranked: &[Ranked], format: impl Fn(Decimal) -> String) -> Vec<RankRow> {
    ranked
        .iter()
        .enumerate()
        .map(|(i, r)| RankRow {
            rank: i + 1,
            name: r.council.name.clone(),
            id: r.council.id.clone(),
            value: format(r.value),
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct TypeAverageOutput {
    council_type: CouncilType,
    count: usize,
    average: Decimal,
}

#[derive(Debug, Serialize)]
struct StatsOutput {
    year: String,
    fingerprint: String,
    count: usize,
    average: Decimal,
    median: Decimal,
    min: Decimal,
    max: Decimal,
    highest: Vec<RankRow>,
    lowest: Vec<RankRow>,
    by_type: Vec<TypeAverageOutput>,
}

impl StatsCommand {
    pub fn exec(&self, data: &DataArgs) -> anyhow::Result<()> {
        let directory = data.load()?;
        let year = directory.current_year();

        if let Some(council_type) = self.council_type {
            let average = average_by_type(&directory, council_type);
            if self.json {
                #[derive(Serialize)]
                struct Output {
                    year: String,
                    council_type: CouncilType,
                    average: Option<Decimal>,
                }
                return print_json(&Output {
                    year: year.display(),
                    council_type,
                    average: average.map(|a| a.round_dp(2)),
                });
            }
            println!(
                "Average Band D for {} ({}): {}",
                council_type.label(),
                year,
                or_na(average, format_gbp)
            );
            return Ok(());
        }

        let Some(stats) = national_stats(&directory, self.top) else {
            println!("No Band D data available for {}", year);
            return Ok(());
        };
        let by_type = type_averages(&directory);

        if self.json {
            return print_json(&StatsOutput {
                year: year.display(),
                fingerprint: directory.fingerprint().to_string(),
                count: stats.count,
                average: stats.average.round_dp(2),
                median: stats.median,
                min: stats.min,
                max: stats.max,
                highest: rank_rows(&stats.highest, format_gbp),
                lowest: rank_rows(&stats.lowest, format_gbp),
                by_type: by_type
                    .iter()
                    .map(|t| TypeAverageOutput {
                        council_type: t.council_type,
                        count: t.count,
                        average: t.average.round_dp(2),
                    })
                    .collect(),
            });
        }

        println!();
        println!("NATIONAL BAND D STATISTICS ({})", year);
        println!();
        println!("  Councils: {}", stats.count);
        println!("  Average:  {}", format_gbp(stats.average));
        println!("  Median:   {}", format_gbp(stats.median));
        println!("  Lowest:   {}", format_gbp(stats.min));
        println!("  Highest:  {}", format_gbp(stats.max));
        println!();

        if !stats.highest.is_empty() {
            println!("Highest Band D");
            println!("{}", table(rank_rows(&stats.highest, format_gbp)));
            println!();
            println!("Lowest Band D");
            println!("{}", table(rank_rows(&stats.lowest, format_gbp)));
            println!();
        }

        println!("By council type");
        let rows: Vec<TypeRow> = by_type
            .iter()
            .map(|t| TypeRow {
                council_type: t.council_type.label().to_string(),
                count: t.count,
                average: format_gbp(t.average),
            })
            .collect();
        println!("{}", table(rows));
        println!();
        println!("Snapshot {}", &directory.fingerprint()[..12]);
        Ok(())
    }
}
