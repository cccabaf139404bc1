pub mod bands;
pub mod changes;
pub mod compare;
pub mod distribution;
pub mod efficiency;
pub mod format;
pub mod rankings;
pub mod schema;
pub mod search;
pub mod show;
pub mod spending;
pub mod stats;
pub mod validate;

use crate::core::{self, CouncilRecord, Directory, FinancialYear, PopulationRow};
use anyhow::Context;
use clap::Args;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// Where the council snapshot is loaded from
#[derive(Args, Debug)]
pub struct DataArgs {
    /// Council dataset JSON file (or "-" for stdin)
    #[arg(
        long,
        global = true,
        env = "COUNCILC_DATA",
        default_value = "data/councils.json"
    )]
    data: PathBuf,

    /// Population lookup CSV file (name,population[,year])
    #[arg(long, global = true, env = "COUNCILC_POPULATION")]
    population: Option<PathBuf>,

    /// Financial year to treat as current (e.g., 2025 or 2025/26)
    #[arg(long, global = true)]
    year: Option<FinancialYear>,
}

impl DataArgs {
    /// Load the immutable Directory snapshot
    pub fn load(&self) -> anyhow::Result<Directory> {
        let dataset = with_reader(&self.data, |r| core::read_dataset_json(r))
            .with_context(|| format!("failed to read dataset {}", self.data.display()))?;

        let population: Vec<PopulationRow> = match &self.population {
            Some(path) => with_reader(path, |r| core::read_population_csv(r))
                .with_context(|| format!("failed to read population {}", path.display()))?,
            None => Vec::new(),
        };

        let directory = Directory::from_dataset(dataset, &population, self.year)?;
        log::debug!("Directory fingerprint {}", directory.fingerprint());
        Ok(directory)
    }
}

fn with_reader<T>(
    path: &Path,
    read: impl FnOnce(Box<dyn Read>) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
        read(Box::new(io::Cursor::new(buffer)))
    } else {
        let file = File::open(path)?;
        read(Box::new(BufReader::new(file)))
    }
}

/// Look up a council by id, failing with a readable error
pub fn find_council<'a>(directory: &'a Directory, id: &str) -> anyhow::Result<&'a CouncilRecord> {
    directory
        .get(id.trim())
        .with_context(|| format!("No council with id '{}' in the dataset", id.trim()))
}

/// Write serializable rows as CSV to stdout
pub fn write_csv<I, R>(rows: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = R>,
    R: serde::Serialize,
{
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render rows as a rounded table with right-aligned values
pub fn table<I, T>(rows: I) -> String
where
    I: IntoIterator<Item = T>,
    T: Tabled,
{
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string()
}
