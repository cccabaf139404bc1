//! Schema command - print expected input formats

use crate::core::{Dataset, PopulationRow};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the council dataset
    JsonSchema,
    /// CSV header row for the population lookup
    CsvHeader,
    /// Population CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(Dataset);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        println!("{}", PopulationRow::csv_header().join(","));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("Population CSV Format");
        println!("=====================");
        println!();
        for field in PopulationRow::csv_schema() {
            let req = if field.required { "required" } else { "optional" };
            println!(
                "{:12} {:8} ({:8})  {}",
                field.name, field.kind, req, field.description
            );
        }
        println!();
        println!("Names are matched to councils case-insensitively");
        Ok(())
    }
}
