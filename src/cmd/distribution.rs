//! Distribution command - histogram of current Band D figures

use crate::cmd::format::format_gbp;
use crate::cmd::{print_json, write_csv, DataArgs};
use crate::core::{band_d_distribution, PriceBucket};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

/// Width of the longest bar in characters
const BAR_WIDTH: usize = 40;

#[derive(Args, Debug)]
pub struct DistributionCommand {
    /// Output as JSON instead of a text histogram
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as CSV instead of a text histogram
    #[arg(long)]
    csv: bool,
}

#[derive(Debug, Serialize)]
struct BucketRow {
    min: Decimal,
    max: Option<Decimal>,
    count: usize,
}

impl From<&PriceBucket> for BucketRow {
    fn from(bucket: &PriceBucket) -> Self {
        BucketRow {
            min: bucket.min,
            max: bucket.max,
            count: bucket.count,
        }
    }
}

fn bucket_label(bucket: &PriceBucket) -> String {
    match bucket.max {
        Some(max) => format!("{} - {}", format_gbp(bucket.min), format_gbp(max)),
        None => format!("{}+", format_gbp(bucket.min)),
    }
}

fn bar(count: usize, largest: usize) -> String {
    if largest == 0 || count == 0 {
        return String::new();
    }
    // at least one mark for any non-empty bucket
    let width = (count * BAR_WIDTH / largest).max(1);
    "#".repeat(width)
}

impl DistributionCommand {
    pub fn exec(&self, data: &DataArgs) -> anyhow::Result<()> {
        let directory = data.load()?;
        let buckets = band_d_distribution(&directory);

        if self.csv {
            return write_csv(buckets.iter().map(BucketRow::from));
        }
        if self.json {
            let rows: Vec<BucketRow> = buckets.iter().map(BucketRow::from).collect();
            return print_json(&rows);
        }

        let total: usize = buckets.iter().map(|b| b.count).sum();

        println!();
        println!(
            "BAND D DISTRIBUTION ({}, {} councils)",
            directory.current_year(),
            total
        );
        println!();
        for line in histogram_lines(&buckets) {
            println!("{}", line);
        }
        Ok(())
    }
}

fn histogram_lines(buckets: &[PriceBucket]) -> Vec<String> {
    let largest = buckets.iter().map(|b| b.count).max().unwrap_or(0);
    let labels: Vec<String> = buckets.iter().map(bucket_label).collect();
    // padding counts chars, and "£" is two bytes
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    buckets
        .iter()
        .zip(&labels)
        .map(|(bucket, label)| {
            format!(
                "  {:>width$} | {:>4} {}",
                label,
                bucket.count,
                bar(bucket.count, largest),
                width = label_width
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn bars_scale_to_largest_bucket() {
        assert_eq!(bar(0, 10), "");
        assert_eq!(bar(10, 10).len(), BAR_WIDTH);
        assert_eq!(bar(5, 10).len(), BAR_WIDTH / 2);
        assert_eq!(bar(1, 1000), "#");
    }

    #[test]
    fn histogram_columns_line_up() {
        let buckets = [
            PriceBucket {
                min: dec!(0),
                max: Some(dec!(200)),
                count: 1,
            },
            PriceBucket {
                min: dec!(1800),
                max: Some(dec!(2000)),
                count: 4,
            },
            PriceBucket {
                min: dec!(2000),
                max: None,
                count: 2,
            },
        ];
        let lines = histogram_lines(&buckets);
        let columns: Vec<usize> = lines
            .iter()
            .map(|line| line.chars().position(|c| c == '|').unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert!(columns.iter().all(|&c| c == columns[0]), "{lines:?}");
        assert!(lines[2].trim_start().starts_with("£2,000.00+"));
    }

    #[test]
    fn final_bucket_is_open_ended() {
        let bucket = PriceBucket {
            min: dec!(2000),
            max: None,
            count: 3,
        };
        assert_eq!(bucket_label(&bucket), "£2,000.00+");

        let bucket = PriceBucket {
            min: dec!(1800),
            max: Some(dec!(2000)),
            count: 0,
        };
        assert_eq!(bucket_label(&bucket), "£1,800.00 - £2,000.00");
    }
}
