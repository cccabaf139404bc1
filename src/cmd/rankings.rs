//! Rankings command - highest or lowest councils by a chosen measure

use crate::cmd::format::{format_gbp, format_percent};
use crate::cmd::stats::rank_rows;
use crate::cmd::{table, write_csv, DataArgs};
use crate::core::stats::{highest_band_d, lowest_band_d};
use crate::core::{efficiency, EfficiencyMeasure, Ranked};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct RankingsCommand {
    /// Measure to rank by
    #[arg(short, long, value_enum, default_value_t = RankBy::BandD)]
    by: RankBy,

    /// Show the lowest instead of the highest
    #[arg(long)]
    lowest: bool,

    /// Number of councils to show
    #[arg(short = 'n', long, default_value_t = 10)]
    count: usize,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum RankBy {
    /// Current Band D council tax
    #[default]
    BandD,
    /// Total service expenditure per resident
    PerCapita,
    /// Central services as a share of total expenditure
    Overhead,
}

impl RankBy {
    fn title(&self) -> &'static str {
        match self {
            RankBy::BandD => "Band D",
            RankBy::PerCapita => "spending per resident",
            RankBy::Overhead => "administrative overhead",
        }
    }
}

impl RankingsCommand {
    pub fn exec(&self, data: &DataArgs) -> anyhow::Result<()> {
        let directory = data.load()?;
        let n = self.count;

        let (ranked, format): (Vec<Ranked>, fn(Decimal) -> String) = match (self.by, self.lowest) {
            (RankBy::BandD, false) => (highest_band_d(&directory, n), format_gbp),
            (RankBy::BandD, true) => (lowest_band_d(&directory, n), format_gbp),
            (RankBy::PerCapita, false) => (
                efficiency::highest(&directory, EfficiencyMeasure::PerCapita, n),
                format_gbp,
            ),
            (RankBy::PerCapita, true) => (
                efficiency::lowest(&directory, EfficiencyMeasure::PerCapita, n),
                format_gbp,
            ),
            (RankBy::Overhead, false) => (
                efficiency::highest(&directory, EfficiencyMeasure::AdminOverhead, n),
                format_percent,
            ),
            (RankBy::Overhead, true) => (
                efficiency::lowest(&directory, EfficiencyMeasure::AdminOverhead, n),
                format_percent,
            ),
        };

        let rows = rank_rows(&ranked, format);
        if self.csv {
            return write_csv(rows);
        }
        if rows.is_empty() {
            println!("No councils have data for {}", self.by.title());
            return Ok(());
        }

        let direction = if self.lowest { "LOWEST" } else { "HIGHEST" };
        println!();
        println!(
            "{} {} BY {} ({})",
            direction,
            rows.len(),
            self.by.title().to_uppercase(),
            directory.current_year()
        );
        println!("{}", table(rows));
        Ok(())
    }
}
