//! Compare command - two councils side by side

use crate::cmd::format::{
    format_gbp, format_gbp_signed, format_percent, format_percent_signed, or_na,
};
use crate::cmd::{find_council, print_json, DataArgs};
use crate::core::{compare, CouncilProfile};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

#[derive(Args, Debug)]
pub struct CompareCommand {
    /// First council area code
    left: String,

    /// Second council area code
    right: String,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ProfileOutput {
    id: String,
    name: String,
    band_d: Option<Decimal>,
    combined_band_d: Option<Decimal>,
    change_percent: Option<Decimal>,
    type_average: Option<Decimal>,
    rank: Option<usize>,
    per_capita: Option<Decimal>,
    admin_overhead_percent: Option<Decimal>,
}

impl From<&CouncilProfile<'_>> for ProfileOutput {
    fn from(p: &CouncilProfile) -> Self {
        ProfileOutput {
            id: p.council.id.clone(),
            name: p.council.name.clone(),
            band_d: p.band_d,
            combined_band_d: p.combined_band_d,
            change_percent: p.change.map(|c| c.percent.round_dp(2)),
            type_average: p.type_average.map(|a| a.round_dp(2)),
            rank: p.rank.map(|(pos, _)| pos),
            per_capita: p.efficiency.per_capita.map(|v| v.round_dp(2)),
            admin_overhead_percent: p.efficiency.admin_overhead_percent.map(|v| v.round_dp(2)),
        }
    }
}

fn profile_column(p: &CouncilProfile) -> Vec<String> {
    vec![
        p.council.type_name().to_string(),
        or_na(p.band_d, format_gbp),
        or_na(p.combined_band_d, format_gbp),
        or_na(p.change.map(|c| c.percent), format_percent_signed),
        or_na(p.type_average, format_gbp),
        or_na(p.rank, |(pos, of)| format!("{} of {}", pos, of)),
        or_na(p.efficiency.per_capita, format_gbp),
        or_na(p.efficiency.admin_overhead_percent, format_percent),
    ]
}

const ROW_LABELS: [&str; 8] = [
    "Type",
    "Band D",
    "Including precepts",
    "Change on last year",
    "Type average",
    "Band D rank",
    "Spending per resident",
    "Administrative overhead",
];

impl CompareCommand {
    pub fn exec(&self, data: &DataArgs) -> anyhow::Result<()> {
        let directory = data.load()?;
        let left = find_council(&directory, &self.left)?;
        let right = find_council(&directory, &self.right)?;
        let comparison = compare(&directory, left, right);

        if self.json {
            #[derive(Serialize)]
            struct Output {
                year: String,
                left: ProfileOutput,
                right: ProfileOutput,
                band_d_difference: Option<Decimal>,
                national_average: Option<Decimal>,
            }
            return print_json(&Output {
                year: directory.current_year().display(),
                left: ProfileOutput::from(&comparison.left),
                right: ProfileOutput::from(&comparison.right),
                band_d_difference: comparison.band_d_difference(),
                national_average: comparison.national_average.map(|a| a.round_dp(2)),
            });
        }

        let mut builder = Builder::default();
        builder.push_record(["", left.name.as_str(), right.name.as_str()]);
        let left_column = profile_column(&comparison.left);
        let right_column = profile_column(&comparison.right);
        for ((label, l), r) in ROW_LABELS.iter().zip(left_column).zip(right_column) {
            builder.push_record([label.to_string(), l, r]);
        }

        println!();
        println!("COMPARISON ({})", directory.current_year());
        println!("{}", builder.build().with(Style::rounded()));
        println!();
        println!(
            "  Band D difference: {}",
            or_na(comparison.band_d_difference(), format_gbp_signed)
        );
        println!(
            "  National average:  {}",
            or_na(comparison.national_average, format_gbp)
        );
        Ok(())
    }
}

