//! Show command - everything known about one council

use crate::cmd::bands::band_rows;
use crate::cmd::format::{
    format_count, format_gbp, format_gbp_signed, format_percent, format_percent_signed,
    format_thousands, or_na,
};
use crate::cmd::{find_council, print_json, table, DataArgs};
use crate::core::{
    calculate_bands, council_spending_breakdown, profile, CouncilProfile, CouncilRecord,
    DetailedInfo, Directory,
};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct ShowCommand {
    /// Council area code (e.g., E07000223)
    id: String,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled)]
struct HistoryRow {
    #[tabled(rename = "Year")]
    year: String,
    #[tabled(rename = "Band D")]
    band_d: String,
}

#[derive(Debug, Tabled)]
struct SpendingRow {
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Spend")]
    spend: String,
    #[tabled(rename = "Share of Total")]
    share: String,
}

#[derive(Debug, Tabled)]
struct PreceptRow {
    #[tabled(rename = "Authority")]
    authority: String,
    #[tabled(rename = "Band D")]
    band_d: String,
}

/// Figures derived for one council, for JSON output
#[derive(Debug, Serialize)]
struct ShowOutput<'a> {
    year: String,
    council: &'a CouncilRecord,
    band_d: Option<Decimal>,
    combined_band_d: Option<Decimal>,
    change_amount: Option<Decimal>,
    change_percent: Option<Decimal>,
    type_average: Option<Decimal>,
    rank: Option<usize>,
    ranked_councils: Option<usize>,
    per_capita: Option<Decimal>,
    admin_overhead_percent: Option<Decimal>,
}

impl ShowCommand {
    pub fn exec(&self, data: &DataArgs) -> anyhow::Result<()> {
        let directory = data.load()?;
        let council = find_council(&directory, &self.id)?;
        let profile = profile(&directory, council);

        if self.json {
            print_json(&ShowOutput {
                year: directory.current_year().display(),
                council,
                band_d: profile.band_d,
                combined_band_d: profile.combined_band_d,
                change_amount: profile.change.map(|c| c.amount),
                change_percent: profile.change.map(|c| c.percent.round_dp(2)),
                type_average: profile.type_average.map(|a| a.round_dp(2)),
                rank: profile.rank.map(|(pos, _)| pos),
                ranked_councils: profile.rank.map(|(_, of)| of),
                per_capita: profile.efficiency.per_capita.map(|v| v.round_dp(2)),
                admin_overhead_percent: profile
                    .efficiency
                    .admin_overhead_percent
                    .map(|v| v.round_dp(2)),
            })
        } else {
            self.print_council(&directory, &profile)
        }
    }

    fn print_council(&self, directory: &Directory, profile: &CouncilProfile) -> anyhow::Result<()> {
        let council = profile.council;
        let year = directory.current_year();

        println!();
        println!("{} ({})", council.display_name().to_uppercase(), council.id);
        println!("{}", council.type_name());
        if let Some(population) = council.population {
            println!("Population: {}", format_count(population));
        }
        println!();

        println!("COUNCIL TAX {}", year);
        println!("  Band D:             {}", or_na(profile.band_d, format_gbp));
        if !council.precepts().is_empty() {
            println!(
                "  Including precepts: {}",
                or_na(profile.combined_band_d, format_gbp)
            );
        }
        match profile.change {
            Some(change) => println!(
                "  Change from {}: {} ({})",
                change.previous_year,
                format_gbp_signed(change.amount),
                format_percent_signed(change.percent)
            ),
            None => println!("  Change from {}: n/a", year.previous()),
        }
        println!(
            "  {} average: {}{}",
            council.council_type,
            or_na(profile.type_average, format_gbp),
            profile
                .difference_from_type_average()
                .map(|d| format!(" ({} vs average)", format_gbp_signed(d)))
                .unwrap_or_default()
        );
        if let Some((position, of)) = profile.rank {
            println!("  Rank: {} of {} (1 = highest)", position, of);
        }
        println!();

        if let Some(tax) = &council.council_tax {
            let history: Vec<HistoryRow> = tax
                .band_d
                .iter()
                .rev()
                .map(|(year, amount)| HistoryRow {
                    year: year.display(),
                    band_d: format_gbp(*amount),
                })
                .collect();
            if history.len() > 1 {
                println!("{}", table(history));
                println!();
            }
        }

        if let Some(band_d) = profile.band_d {
            println!("{}", table(band_rows(&calculate_bands(band_d)?)));
            println!();
        }

        match &council.budget {
            Some(budget) => {
                println!("BUDGET");
                println!(
                    "  Total service expenditure: {}",
                    format_thousands(budget.total_service_expenditure)
                );
                println!(
                    "  Spending per resident:     {}",
                    or_na(profile.efficiency.per_capita, format_gbp)
                );
                println!(
                    "  Administrative overhead:   {}",
                    or_na(profile.efficiency.admin_overhead_percent, format_percent)
                );
                println!();
                let rows: Vec<SpendingRow> = council_spending_breakdown(council)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|c| SpendingRow {
                        service: c.category.to_string(),
                        spend: format_thousands(c.total),
                        share: or_na(c.percent, format_percent),
                    })
                    .collect();
                if !rows.is_empty() {
                    println!("{}", table(rows));
                    println!();
                }
            }
            None => {
                println!("BUDGET");
                println!("  Budget data not available for this council");
                println!();
            }
        }

        if let Some(detailed) = &council.detailed {
            print_detailed(detailed);
        }
        Ok(())
    }
}

fn print_detailed(detailed: &DetailedInfo) {
    if !detailed.precepts.is_empty() {
        println!("PRECEPTS");
        let rows: Vec<PreceptRow> = detailed
            .precepts
            .iter()
            .map(|p| PreceptRow {
                authority: p.authority.clone(),
                band_d: format_gbp(p.band_d),
            })
            .collect();
        println!("{}", table(rows));
        println!();
    }

    if let Some(leadership) = &detailed.leadership {
        println!("LEADERSHIP");
        let entries = [
            ("Leader", &leadership.leader),
            ("Chief executive", &leadership.chief_executive),
            ("Political control", &leadership.political_control),
        ];
        for (label, value) in entries {
            if let Some(value) = value {
                println!("  {:18} {}", format!("{}:", label), value);
            }
        }
        println!();
    }

    if detailed.reserves.is_some() || detailed.savings_target.is_some() {
        println!("FINANCES");
        println!(
            "  Usable reserves:  {}",
            or_na(detailed.reserves, format_thousands)
        );
        println!(
            "  Savings target:   {}",
            or_na(detailed.savings_target, format_thousands)
        );
        println!();
    }

    if !detailed.services.is_empty() {
        println!("SERVICES");
        for service in &detailed.services {
            println!("  - {}", service);
        }
        println!();
    }

    if !detailed.documents.is_empty() {
        println!("DOCUMENTS");
        for doc in &detailed.documents {
            match doc.year {
                Some(year) => println!("  {} ({}): {}", doc.title, year, doc.url),
                None => println!("  {}: {}", doc.title, doc.url),
            }
        }
        println!();
    }
}
