//! Bands command - council tax for every band from a Band D figure

use crate::cmd::format::format_gbp;
use crate::cmd::{find_council, print_json, table, DataArgs};
use crate::core::{calculate_bands, Band, BandAmounts};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

/// Council tax is normally collected in ten monthly instalments
const INSTALMENTS: u32 = 10;

#[derive(Args, Debug)]
pub struct BandsCommand {
    /// Band D amount in GBP (e.g., 2171.45)
    #[arg(
        required_unless_present = "council",
        conflicts_with = "council",
        allow_negative_numbers = true
    )]
    band_d: Option<Decimal>,

    /// Use the current Band D of this council (area code)
    #[arg(short, long)]
    council: Option<String>,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled, Serialize)]
pub struct BandRow {
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Ratio")]
    ratio: String,
    #[tabled(rename = "Property Value (1991)")]
    valuation: String,
    #[tabled(rename = "Annual")]
    annual: String,
    #[tabled(rename = "Monthly (10)")]
    monthly: String,
}

pub fn band_rows(amounts: &BandAmounts) -> Vec<BandRow> {
    amounts
        .iter()
        .map(|(band, amount)| BandRow {
            band: band.to_string(),
            ratio: format!("{}/9", band.ninths()),
            valuation: band.valuation_range().to_string(),
            annual: format_gbp(amount),
            monthly: format_gbp(amount / Decimal::from(INSTALMENTS)),
        })
        .collect()
}

impl BandsCommand {
    pub fn exec(&self, data: &DataArgs) -> anyhow::Result<()> {
        let (label, band_d) = match (&self.council, self.band_d) {
            (Some(id), _) => {
                let directory = data.load()?;
                let council = find_council(&directory, id)?;
                let year = directory.current_year();
                let band_d = council.band_d(year).ok_or_else(|| {
                    anyhow::anyhow!("{} has no Band D figure for {}", council.name, year)
                })?;
                (format!("{} ({})", council.name, year), band_d)
            }
            (None, Some(band_d)) => (format!("Band D {}", format_gbp(band_d)), band_d),
            (None, None) => anyhow::bail!("Provide a Band D amount or --council"),
        };

        let amounts = calculate_bands(band_d)?;

        if self.json {
            #[derive(Serialize)]
            struct BandAmount {
                band: Band,
                annual: Decimal,
            }
            #[derive(Serialize)]
            struct Output<'a> {
                label: &'a str,
                band_d: Decimal,
                bands: Vec<BandAmount>,
            }
            return print_json(&Output {
                label: &label,
                band_d,
                bands: amounts
                    .iter()
                    .map(|(band, amount)| BandAmount {
                        band,
                        annual: amount.round_dp(2),
                    })
                    .collect(),
            });
        }

        println!();
        println!("COUNCIL TAX BANDS - {}", label);
        println!();
        println!("{}", table(band_rows(&amounts)));
        Ok(())
    }
}
