//! Validate command - surface data gaps that limit the analytics available

use crate::cmd::DataArgs;
use crate::core::quality::check;
use crate::core::Issue;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput<'a> {
    year: String,
    fingerprint: &'a str,
    councils: usize,
    issue_count: usize,
    issues: &'a [Issue],
}

fn issue_message(issue: &Issue) -> String {
    match issue {
        Issue::MissingBandD { id, name } => {
            format!("{} ({}) has no current Band D and is excluded from rankings", name, id)
        }
        Issue::MissingBudget { id, name } => {
            format!("{} ({}) has no budget, spending metrics unavailable", name, id)
        }
        Issue::MissingPopulation { id, name } => {
            format!("{} ({}) has no population, per-capita spending unavailable", name, id)
        }
        Issue::UnmatchedPopulation { name } => {
            format!("Population row '{}' matches no council", name)
        }
        Issue::LowCategoryCoverage {
            id,
            name,
            reported,
            total,
        } => format!(
            "{} ({}) reports £{}k of £{}k across service categories",
            name, id, reported, total
        ),
    }
}

impl ValidateCommand {
    pub fn exec(&self, data: &DataArgs) -> anyhow::Result<()> {
        let directory = data.load()?;
        let issues = check(&directory);

        if self.json {
            let output = ValidationOutput {
                year: directory.current_year().display(),
                fingerprint: directory.fingerprint(),
                councils: directory.len(),
                issue_count: issues.len(),
                issues: &issues,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!();
            println!(
                "VALIDATION RESULTS ({}, {} councils)",
                directory.current_year(),
                directory.len()
            );
            println!();

            if issues.is_empty() {
                println!("\u{2713} No issues found.");
            } else {
                println!("\u{26A0} {} issue(s) found:", issues.len());
                println!();
                for (i, issue) in issues.iter().enumerate() {
                    println!("  {}. [{}] {}", i + 1, issue.kind(), issue_message(issue));
                }
            }
            println!();
            println!("Snapshot {}", directory.fingerprint());
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }
}
