use super::directory::Directory;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Reported categories below this share of the total suggest missing data
const MIN_CATEGORY_COVERAGE: Decimal = dec!(0.5);

/// Data gaps that do not prevent loading but limit the analytics available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Issue {
    /// No Band D for the current year; excluded from every ranking.
    MissingBandD { id: String, name: String },
    /// No budget; budget-derived analytics are unavailable.
    MissingBudget { id: String, name: String },
    /// No population match; per-capita spending is unavailable.
    MissingPopulation { id: String, name: String },
    /// Population row naming no council in the dataset.
    UnmatchedPopulation { name: String },
    /// Service categories cover under half of the total expenditure.
    LowCategoryCoverage {
        id: String,
        name: String,
        reported: Decimal,
        total: Decimal,
    },
}

impl Issue {
    pub fn kind(&self) -> &'static str {
        match self {
            Issue::MissingBandD { .. } => "MissingBandD",
            Issue::MissingBudget { .. } => "MissingBudget",
            Issue::MissingPopulation { .. } => "MissingPopulation",
            Issue::UnmatchedPopulation { .. } => "UnmatchedPopulation",
            Issue::LowCategoryCoverage { .. } => "LowCategoryCoverage",
        }
    }
}

pub fn check(directory: &Directory) -> Vec<Issue> {
    let year = directory.current_year();
    let mut issues = Vec::new();

    for council in directory.councils() {
        let id = || council.id.clone();
        let name = || council.name.clone();

        if council.band_d(year).is_none() {
            issues.push(Issue::MissingBandD {
                id: id(),
                name: name(),
            });
        }
        match &council.budget {
            None => issues.push(Issue::MissingBudget {
                id: id(),
                name: name(),
            }),
            Some(budget) => {
                let reported = budget.reported_total();
                let total = budget.total_service_expenditure;
                if !total.is_zero() && reported < total * MIN_CATEGORY_COVERAGE {
                    issues.push(Issue::LowCategoryCoverage {
                        id: id(),
                        name: name(),
                        reported,
                        total,
                    });
                }
            }
        }
        if council.population.is_none() {
            issues.push(Issue::MissingPopulation {
                id: id(),
                name: name(),
            });
        }
    }

    issues.extend(
        directory
            .unmatched_population()
            .iter()
            .map(|name| Issue::UnmatchedPopulation { name: name.clone() }),
    );

    log::debug!("Data quality check found {} issues", issues.len());
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::council::{CouncilType, ServiceCategory};
    use crate::core::directory::fixtures::{council, with_band_d, with_budget};
    use crate::core::directory::{Dataset, PopulationRow};
    use crate::core::year::FinancialYear;

    #[test]
    fn complete_council_has_no_issues() {
        let mut c = with_budget(
            with_band_d(council("E1", "A", CouncilType::District), 2025, dec!(200)),
            dec!(1000),
            &[(ServiceCategory::Housing, dec!(800))],
        );
        c.population = Some(1000);
        let dir = Directory::new(vec![c], Some(FinancialYear(2025))).unwrap();
        assert!(check(&dir).is_empty());
    }

    #[test]
    fn gaps_reported_per_council() {
        let c = with_budget(
            council("E1", "A", CouncilType::District),
            dec!(1000),
            &[(ServiceCategory::Housing, dec!(100))],
        );
        let dir = Directory::new(vec![c], Some(FinancialYear(2025))).unwrap();
        let kinds: Vec<_> = check(&dir).iter().map(|i| i.kind()).collect();
        assert_eq!(
            kinds,
            ["MissingBandD", "LowCategoryCoverage", "MissingPopulation"]
        );
    }

    #[test]
    fn missing_budget_reported() {
        let dir = Directory::new(
            vec![with_band_d(council("E1", "A", CouncilType::District), 2025, dec!(200))],
            None,
        )
        .unwrap();
        assert!(check(&dir).contains(&Issue::MissingBudget {
            id: "E1".to_string(),
            name: "A".to_string()
        }));
    }

    #[test]
    fn population_gaps_reported() {
        let complete = with_budget(
            with_band_d(council("E1", "Adur", CouncilType::District), 2025, dec!(200)),
            dec!(1000),
            &[(ServiceCategory::Housing, dec!(800))],
        );
        let unpopulated = with_budget(
            with_band_d(council("E2", "Arun", CouncilType::District), 2025, dec!(210)),
            dec!(1000),
            &[(ServiceCategory::Housing, dec!(800))],
        );
        let dataset = Dataset {
            current_year: Some(FinancialYear(2025)),
            councils: vec![complete, unpopulated],
        };
        let population = vec![
            PopulationRow {
                name: "adur".to_string(),
                population: 64_000,
                year: None,
            },
            PopulationRow {
                name: "Atlantis".to_string(),
                population: 1_000,
                year: Some(2024),
            },
        ];
        let dir = Directory::from_dataset(dataset, &population, None).unwrap();

        assert_eq!(
            check(&dir),
            [
                Issue::MissingPopulation {
                    id: "E2".to_string(),
                    name: "Arun".to_string()
                },
                Issue::UnmatchedPopulation {
                    name: "Atlantis".to_string()
                },
            ]
        );
    }
}
