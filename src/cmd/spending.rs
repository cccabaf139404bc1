//! Spending command - service spending by category, nationally or for one council

use crate::cmd::format::{format_percent, format_thousands, or_na};
use crate::cmd::{find_council, print_json, table, DataArgs};
use crate::core::{
    council_spending_breakdown, service_spending_breakdown, CategorySpending, ServiceCategory,
};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct SpendingCommand {
    /// Break down a single council's budget (area code)
    #[arg(short, long)]
    council: Option<String>,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled)]
struct SpendingRow {
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Spend")]
    total: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Councils")]
    councils: usize,
}

#[derive(Debug, Serialize)]
struct CategoryOutput {
    category: ServiceCategory,
    label: &'static str,
    /// £000s
    total: Decimal,
    percent: Option<Decimal>,
    councils: usize,
}

impl From<&CategorySpending> for CategoryOutput {
    fn from(c: &CategorySpending) -> Self {
        CategoryOutput {
            category: c.category,
            label: c.category.label(),
            total: c.total,
            percent: c.percent.map(|p| p.round_dp(2)),
            councils: c.councils,
        }
    }
}

impl SpendingCommand {
    pub fn exec(&self, data: &DataArgs) -> anyhow::Result<()> {
        let directory = data.load()?;

        let (title, breakdown) = match &self.council {
            Some(id) => {
                let council = find_council(&directory, id)?;
                let breakdown = council_spending_breakdown(council).ok_or_else(|| {
                    anyhow::anyhow!("Budget data not available for {}", council.name)
                })?;
                (format!("SERVICE SPENDING - {}", council.name), breakdown)
            }
            None => (
                "SERVICE SPENDING - ALL COUNCILS".to_string(),
                service_spending_breakdown(&directory),
            ),
        };

        if self.json {
            let rows: Vec<CategoryOutput> = breakdown.iter().map(CategoryOutput::from).collect();
            return print_json(&rows);
        }
        if breakdown.is_empty() {
            println!("No service spending reported");
            return Ok(());
        }

        let rows: Vec<SpendingRow> = breakdown
            .iter()
            .map(|c| SpendingRow {
                service: c.category.to_string(),
                total: format_thousands(c.total),
                share: or_na(c.percent, format_percent),
                councils: c.councils,
            })
            .collect();

        println!();
        println!("{}", title);
        println!("{}", table(rows));
        Ok(())
    }
}
