//! Search command - find councils by name, type or area code

use crate::cmd::format::{format_gbp, or_na};
use crate::cmd::{table, write_csv, DataArgs};
use crate::core::{CouncilRecord, FinancialYear, SearchIndex};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Text to search for (empty lists councils alphabetically)
    #[arg(default_value = "")]
    query: String,

    /// Maximum number of results
    #[arg(short, long, default_value_t = 10)]
    limit: usize,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

#[derive(Debug, Clone, Tabled, Serialize)]
struct SearchRow {
    #[tabled(rename = "Area Code")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    council_type: String,
    #[tabled(rename = "Band D")]
    band_d: String,
}

impl SearchRow {
    fn new(council: &CouncilRecord, year: FinancialYear) -> Self {
        SearchRow {
            id: council.id.clone(),
            name: council.name.clone(),
            council_type: council.type_name().to_string(),
            band_d: or_na(council.band_d(year), format_gbp),
        }
    }
}

impl SearchCommand {
    pub fn exec(&self, data: &DataArgs) -> anyhow::Result<()> {
        let directory = data.load()?;
        let index = SearchIndex::new(&directory);
        let year = directory.current_year();

        let rows: Vec<SearchRow> = index
            .search(&self.query, self.limit)
            .into_iter()
            .map(|c| SearchRow::new(c, year))
            .collect();

        if self.csv {
            return write_csv(rows);
        }
        if rows.is_empty() {
            println!("No councils match '{}'", self.query.trim());
            return Ok(());
        }

        println!("{}", table(rows));
        Ok(())
    }
}
