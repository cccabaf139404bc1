//! Band D analytics: averages, national statistics, rankings, year-over-year
//! change and the price distribution. Every query only considers councils with
//! a current-year Band D figure; an empty qualifying set yields `None`.

use super::council::{CouncilRecord, CouncilType};
use super::directory::Directory;
use super::year::FinancialYear;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Width of each price-distribution bucket (GBP)
pub const BUCKET_WIDTH: Decimal = dec!(200);
/// Lower bound of the final, unbounded bucket (GBP)
pub const BUCKET_CEILING: Decimal = dec!(2000);

/// A council paired with the figure it was ranked by
#[derive(Debug, Clone, Copy)]
pub struct Ranked<'a> {
    pub council: &'a CouncilRecord,
    pub value: Decimal,
}

#[derive(Debug, Clone)]
pub struct NationalStats<'a> {
    pub year: FinancialYear,
    pub count: usize,
    pub average: Decimal,
    /// Lower-middle element for even counts
    pub median: Decimal,
    pub min: Decimal,
    pub max: Decimal,
    pub highest: Vec<Ranked<'a>>,
    pub lowest: Vec<Ranked<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TypeAverage {
    pub council_type: CouncilType,
    pub count: usize,
    pub average: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearChange {
    pub previous_year: FinancialYear,
    pub current_year: FinancialYear,
    pub previous: Decimal,
    pub current: Decimal,
    pub amount: Decimal,
    pub percent: Decimal,
}

/// Half-open `[min, max)` range; `max` is `None` for the final bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBucket {
    pub min: Decimal,
    pub max: Option<Decimal>,
    pub count: usize,
}

fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))?;
    sum.checked_div(Decimal::from(values.len()))
}

/// Average current Band D of councils of one type
pub fn average_by_type(directory: &Directory, council_type: CouncilType) -> Option<Decimal> {
    let year = directory.current_year();
    let values: Vec<Decimal> = directory
        .of_type(council_type)
        .filter_map(|c| c.band_d(year))
        .collect();
    mean(&values)
}

/// Average for every type that has at least one qualifying council
pub fn type_averages(directory: &Directory) -> Vec<TypeAverage> {
    let year = directory.current_year();
    CouncilType::ALL
        .into_iter()
        .filter_map(|council_type| {
            let values: Vec<Decimal> = directory
                .of_type(council_type)
                .filter_map(|c| c.band_d(year))
                .collect();
            mean(&values).map(|average| TypeAverage {
                council_type,
                count: values.len(),
                average,
            })
        })
        .collect()
}

pub fn national_stats(directory: &Directory, n: usize) -> Option<NationalStats<'_>> {
    let mut values: Vec<Decimal> = directory.with_band_d().map(|(_, v)| v).collect();
    let average = mean(&values)?;
    values.sort();

    let stats = NationalStats {
        year: directory.current_year(),
        count: values.len(),
        average,
        median: values[(values.len() - 1) / 2],
        min: values[0],
        max: values[values.len() - 1],
        highest: highest_band_d(directory, n),
        lowest: lowest_band_d(directory, n),
    };
    log::debug!(
        "National stats over {} councils: average {}, median {}",
        stats.count,
        stats.average,
        stats.median
    );
    Some(stats)
}

fn ranked_band_d(directory: &Directory, descending: bool) -> Vec<Ranked<'_>> {
    let mut ranked: Vec<Ranked> = directory
        .with_band_d()
        .map(|(council, value)| Ranked { council, value })
        .collect();
    // stable sort keeps Directory order for ties
    if descending {
        ranked.sort_by(|a, b| b.value.cmp(&a.value));
    } else {
        ranked.sort_by(|a, b| a.value.cmp(&b.value));
    }
    ranked
}

pub fn highest_band_d(directory: &Directory, n: usize) -> Vec<Ranked<'_>> {
    let mut ranked = ranked_band_d(directory, true);
    ranked.truncate(n);
    ranked
}

pub fn lowest_band_d(directory: &Directory, n: usize) -> Vec<Ranked<'_>> {
    let mut ranked = ranked_band_d(directory, false);
    ranked.truncate(n);
    ranked
}

/// 1-based position in the highest-first ranking, and the number ranked
pub fn rank_of(directory: &Directory, id: &str) -> Option<(usize, usize)> {
    let ranked = ranked_band_d(directory, true);
    ranked
        .iter()
        .position(|r| r.council.id == id)
        .map(|pos| (pos + 1, ranked.len()))
}

/// Change in Band D from the previous financial year to the current one
pub fn year_over_year_change(directory: &Directory, council: &CouncilRecord) -> Option<YearChange> {
    let current_year = directory.current_year();
    let previous_year = current_year.previous();
    let current = council.band_d(current_year)?;
    let previous = council.band_d(previous_year)?;
    let amount = current - previous;
    Some(YearChange {
        previous_year,
        current_year,
        previous,
        current,
        amount,
        percent: amount / previous * Decimal::ONE_HUNDRED,
    })
}

fn ranked_changes(directory: &Directory, descending: bool) -> Vec<(&CouncilRecord, YearChange)> {
    let mut changes: Vec<_> = directory
        .councils()
        .iter()
        .filter_map(|c| year_over_year_change(directory, c).map(|change| (c, change)))
        .collect();
    if descending {
        changes.sort_by(|a, b| b.1.percent.cmp(&a.1.percent));
    } else {
        changes.sort_by(|a, b| a.1.percent.cmp(&b.1.percent));
    }
    changes
}

/// Largest percentage increases; councils without a prior year are excluded
pub fn biggest_increases(directory: &Directory, n: usize) -> Vec<(&CouncilRecord, YearChange)> {
    let mut changes = ranked_changes(directory, true);
    changes.truncate(n);
    changes
}

pub fn biggest_decreases(directory: &Directory, n: usize) -> Vec<(&CouncilRecord, YearChange)> {
    let mut changes = ranked_changes(directory, false);
    changes.truncate(n);
    changes
}

/// Count of councils per £200 Band D range, with a final `[2000, ∞)` bucket
pub fn band_d_distribution(directory: &Directory) -> Vec<PriceBucket> {
    let bucket_count = (BUCKET_CEILING / BUCKET_WIDTH).to_usize().unwrap_or(0) + 1;
    let mut buckets: Vec<PriceBucket> = (0..bucket_count)
        .map(|i| {
            let min = BUCKET_WIDTH * Decimal::from(i);
            PriceBucket {
                min,
                max: (min < BUCKET_CEILING).then(|| min + BUCKET_WIDTH),
                count: 0,
            }
        })
        .collect();

    for (_, value) in directory.with_band_d() {
        let idx = (value / BUCKET_WIDTH)
            .floor()
            .to_usize()
            .unwrap_or(0)
            .min(bucket_count - 1);
        buckets[idx].count += 1;
    }
    buckets
}

/// Own Band D plus every precept on the bill. Councils without detailed
/// information contribute only their own figure.
pub fn combined_band_d(directory: &Directory, council: &CouncilRecord) -> Option<Decimal> {
    let own = council.band_d(directory.current_year())?;
    let precepts: Decimal = council.precepts().iter().map(|p| p.band_d).sum();
    Some(own + precepts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::council::{DetailedInfo, Precept};
    use crate::core::directory::fixtures::{council, with_band_d};

    fn district(id: &str, name: &str, band_d: Decimal) -> CouncilRecord {
        with_band_d(council(id, name, CouncilType::District), 2025, band_d)
    }

    fn directory(councils: Vec<CouncilRecord>) -> Directory {
        Directory::new(councils, Some(FinancialYear(2025))).unwrap()
    }

    fn ids(ranked: &[Ranked]) -> Vec<String> {
        ranked.iter().map(|r| r.council.id.clone()).collect()
    }

    #[test]
    fn average_by_type_filters_type_and_missing() {
        let dir = directory(vec![
            district("E1", "Adur", dec!(200)),
            district("E2", "Arun", dec!(300)),
            council("E3", "Ashford", CouncilType::District),
            with_band_d(council("E4", "Kent", CouncilType::County), 2025, dec!(1600)),
        ]);
        assert_eq!(average_by_type(&dir, CouncilType::District), Some(dec!(250)));
        assert_eq!(average_by_type(&dir, CouncilType::County), Some(dec!(1600)));
    }

    #[test]
    fn average_by_type_without_data_is_none() {
        let dir = directory(vec![
            district("E1", "Adur", dec!(200)),
            council("E2", "Camden", CouncilType::LondonBorough),
        ]);
        assert_eq!(average_by_type(&dir, CouncilType::LondonBorough), None);
        assert_eq!(average_by_type(&dir, CouncilType::Unitary), None);
    }

    #[test]
    fn mean_overflow_is_none() {
        assert_eq!(mean(&[Decimal::MAX, Decimal::MAX]), None);
        assert_eq!(mean(&[dec!(1), dec!(2)]), Some(dec!(1.5)));
    }

    #[test]
    fn type_averages_skip_empty_types() {
        let dir = directory(vec![
            district("E1", "Adur", dec!(200)),
            with_band_d(council("E2", "Kent", CouncilType::County), 2025, dec!(1600)),
            with_band_d(council("E3", "Surrey", CouncilType::County), 2025, dec!(1800)),
        ]);
        let averages = type_averages(&dir);
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[1].council_type, CouncilType::County);
        assert_eq!(averages[1].count, 2);
        assert_eq!(averages[1].average, dec!(1700));
    }

    #[test]
    fn national_stats_odd_count() {
        let dir = directory(vec![
            district("E1", "A", dec!(300)),
            district("E2", "B", dec!(100)),
            district("E3", "C", dec!(200)),
        ]);
        let stats = national_stats(&dir, 2).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.average, dec!(200));
        assert_eq!(stats.median, dec!(200));
        assert_eq!(stats.min, dec!(100));
        assert_eq!(stats.max, dec!(300));
        assert_eq!(ids(&stats.highest), ["E1", "E3"]);
        assert_eq!(ids(&stats.lowest), ["E2", "E3"]);
    }

    #[test]
    fn median_of_even_count_is_lower_middle() {
        let dir = directory(vec![
            district("E1", "A", dec!(400)),
            district("E2", "B", dec!(100)),
            district("E3", "C", dec!(300)),
            district("E4", "D", dec!(200)),
        ]);
        let stats = national_stats(&dir, 0).unwrap();
        // sorted: 100, 200, 300, 400 -> index (4 - 1) / 2 = 1
        assert_eq!(stats.median, dec!(200));
        assert!(stats.highest.is_empty());
    }

    #[test]
    fn national_stats_without_data_is_none() {
        let dir = directory(vec![council("E1", "Adur", CouncilType::District)]);
        assert!(national_stats(&dir, 5).is_none());
        let empty = directory(vec![]);
        assert!(national_stats(&empty, 5).is_none());
    }

    #[test]
    fn rankings_break_ties_by_directory_order() {
        let dir = directory(vec![
            district("E1", "A", dec!(200)),
            district("E2", "B", dec!(250)),
            district("E3", "C", dec!(200)),
            council("E4", "D", CouncilType::District),
        ]);
        assert_eq!(ids(&highest_band_d(&dir, 10)), ["E2", "E1", "E3"]);
        assert_eq!(ids(&lowest_band_d(&dir, 2)), ["E1", "E3"]);
    }

    #[test]
    fn rankings_exclude_missing_band_d() {
        let dir = directory(vec![
            district("E1", "A", dec!(200)),
            with_band_d(council("E2", "B", CouncilType::District), 2024, dec!(999)),
        ]);
        assert_eq!(ids(&highest_band_d(&dir, 10)), ["E1"]);
        assert_eq!(rank_of(&dir, "E2"), None);
    }

    #[test]
    fn rank_of_position() {
        let dir = directory(vec![
            district("E1", "A", dec!(100)),
            district("E2", "B", dec!(300)),
            district("E3", "C", dec!(200)),
        ]);
        assert_eq!(rank_of(&dir, "E3"), Some((2, 3)));
        assert_eq!(rank_of(&dir, "E2"), Some((1, 3)));
    }

    #[test]
    fn year_over_year_change_computed() {
        let c = with_band_d(district("E1", "X", dec!(200)), 2024, dec!(190));
        let dir = directory(vec![c]);
        let change = year_over_year_change(&dir, &dir.councils()[0]).unwrap();

        assert_eq!(change.amount, dec!(10));
        assert_eq!(change.percent.round_dp(2), dec!(5.26));
        assert_eq!(change.previous_year, FinancialYear(2024));
    }

    #[test]
    fn year_over_year_without_prior_year_excluded() {
        let dir = directory(vec![
            district("E1", "A", dec!(200)),
            with_band_d(district("E2", "B", dec!(210)), 2024, dec!(200)),
            with_band_d(district("E3", "C", dec!(180)), 2024, dec!(200)),
        ]);
        assert!(year_over_year_change(&dir, &dir.councils()[0]).is_none());

        let increases = biggest_increases(&dir, 10);
        assert_eq!(increases.len(), 2);
        assert_eq!(increases[0].0.id, "E2");

        let decreases = biggest_decreases(&dir, 1);
        assert_eq!(decreases[0].0.id, "E3");
        assert_eq!(decreases[0].1.amount, dec!(-20));
    }

    #[test]
    fn distribution_buckets_are_half_open() {
        let dir = directory(vec![
            district("E1", "A", dec!(199.99)),
            district("E2", "B", dec!(200)),
            district("E3", "C", dec!(1999.99)),
            district("E4", "D", dec!(2000)),
            district("E5", "E", dec!(3500)),
            council("E6", "F", CouncilType::District),
        ]);
        let buckets = band_d_distribution(&dir);

        assert_eq!(buckets.len(), 11);
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[1].min, dec!(200));
        assert_eq!(buckets[1].max, Some(dec!(400)));
        assert_eq!(buckets[1].count, 1);
        assert_eq!(buckets[9].count, 1);
        assert_eq!(buckets[10].min, dec!(2000));
        assert_eq!(buckets[10].max, None);
        assert_eq!(buckets[10].count, 2);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 5);
    }

    #[test]
    fn combined_band_d_adds_precepts() {
        let mut c = district("E1", "Adur", dec!(200));
        c.detailed = Some(DetailedInfo {
            precepts: vec![
                Precept {
                    authority: "West Sussex County Council".to_string(),
                    band_d: dec!(1700),
                },
                Precept {
                    authority: "Sussex Police".to_string(),
                    band_d: dec!(250),
                },
            ],
            ..Default::default()
        });
        let plain = district("E2", "Arun", dec!(210));
        let dir = directory(vec![c, plain]);

        assert_eq!(combined_band_d(&dir, &dir.councils()[0]), Some(dec!(2150)));
        assert_eq!(combined_band_d(&dir, &dir.councils()[1]), Some(dec!(210)));
    }
}
