//! Efficiency command - spending per resident and administrative overhead

use crate::cmd::format::{format_gbp, format_percent, or_na};
use crate::cmd::stats::{rank_rows, RankRow};
use crate::cmd::{find_council, print_json, table, DataArgs};
use crate::core::{efficiency, efficiency_metrics, EfficiencyMeasure};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct EfficiencyCommand {
    /// Show the metrics for a single council (area code)
    #[arg(short, long)]
    council: Option<String>,

    /// Number of councils in each list
    #[arg(short = 'n', long, default_value_t = 5)]
    count: usize,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct EfficiencyOutput {
    lowest_per_capita: Vec<RankRow>,
    highest_per_capita: Vec<RankRow>,
    lowest_overhead: Vec<RankRow>,
    highest_overhead: Vec<RankRow>,
}

impl EfficiencyCommand {
    pub fn exec(&self, data: &DataArgs) -> anyhow::Result<()> {
        let directory = data.load()?;

        if let Some(id) = &self.council {
            let council = find_council(&directory, id)?;
            let metrics = efficiency_metrics(council);
            if self.json {
                #[derive(Serialize)]
                struct Output<'a> {
                    id: &'a str,
                    name: &'a str,
                    per_capita: Option<Decimal>,
                    admin_overhead_percent: Option<Decimal>,
                }
                return print_json(&Output {
                    id: &council.id,
                    name: &council.name,
                    per_capita: metrics.per_capita.map(|v| v.round_dp(2)),
                    admin_overhead_percent: metrics.admin_overhead_percent.map(|v| v.round_dp(2)),
                });
            }
            println!();
            println!("{} ({})", council.name, council.id);
            if !metrics.is_available() {
                println!("  Efficiency metrics need budget and population data");
                return Ok(());
            }
            println!(
                "  Spending per resident:   {}",
                or_na(metrics.per_capita, format_gbp)
            );
            println!(
                "  Administrative overhead: {}",
                or_na(metrics.admin_overhead_percent, format_percent)
            );
            return Ok(());
        }

        let n = self.count;
        let output = EfficiencyOutput {
            lowest_per_capita: rank_rows(
                &efficiency::lowest(&directory, EfficiencyMeasure::PerCapita, n),
                format_gbp,
            ),
            highest_per_capita: rank_rows(
                &efficiency::highest(&directory, EfficiencyMeasure::PerCapita, n),
                format_gbp,
            ),
            lowest_overhead: rank_rows(
                &efficiency::lowest(&directory, EfficiencyMeasure::AdminOverhead, n),
                format_percent,
            ),
            highest_overhead: rank_rows(
                &efficiency::highest(&directory, EfficiencyMeasure::AdminOverhead, n),
                format_percent,
            ),
        };

        if self.json {
            return print_json(&output);
        }

        let sections = [
            ("LOWEST SPENDING PER RESIDENT", output.lowest_per_capita),
            ("HIGHEST SPENDING PER RESIDENT", output.highest_per_capita),
            ("LOWEST ADMINISTRATIVE OVERHEAD", output.lowest_overhead),
            ("HIGHEST ADMINISTRATIVE OVERHEAD", output.highest_overhead),
        ];
        for (title, rows) in sections {
            println!();
            println!("{}", title);
            if rows.is_empty() {
                println!("  No councils have the data for this measure");
            } else {
                println!("{}", table(rows));
            }
        }
        Ok(())
    }
}
