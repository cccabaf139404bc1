use super::council::{CouncilRecord, CouncilType};
use super::year::FinancialYear;
use councilc_derive::CsvSchema;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::io::Read;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("duplicate council id: {0}")]
    DuplicateId(String),
    #[error("Band D for {id} in {year} must be greater than zero, got {amount}")]
    NonPositiveBandD {
        id: String,
        year: FinancialYear,
        amount: Decimal,
    },
    #[error("total service expenditure for {id} is negative: {amount}")]
    NegativeTotal { id: String, amount: Decimal },
    #[error("{category} spend for {id} is negative: {amount}")]
    NegativeSpend {
        id: String,
        category: String,
        amount: Decimal,
    },
    #[error("service categories for {id} sum to {reported}, exceeding the total of {total}")]
    CategoriesExceedTotal {
        id: String,
        reported: Decimal,
        total: Decimal,
    },
    #[error("precept '{authority}' on {id} is negative: {amount}")]
    NegativePrecept {
        id: String,
        authority: String,
        amount: Decimal,
    },
    #[error("{field} for {id} is implausibly large: {amount}")]
    AmountTooLarge {
        id: String,
        field: String,
        amount: Decimal,
    },
    #[error("failed to fingerprint directory: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

/// Input root for the council dataset JSON
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Dataset {
    /// Financial year treated as "current" (defaults to the latest year present)
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub current_year: Option<FinancialYear>,
    pub councils: Vec<CouncilRecord>,
}

/// Description of a CSV input column
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub kind: &'static str,
    pub description: &'static str,
}

/// One row of the population lookup CSV
#[derive(Debug, Clone, Deserialize, CsvSchema)]
pub struct PopulationRow {
    /// Council name, matched case-insensitively against the dataset
    pub name: String,
    /// Resident population
    pub population: u64,
    /// Year of the mid-year estimate
    #[serde(default)]
    pub year: Option<i32>,
}

/// Read the council dataset from JSON
pub fn read_dataset_json<R: Read>(reader: R) -> anyhow::Result<Dataset> {
    let dataset: Dataset = serde_json::from_reader(reader)?;
    log::debug!("Read {} council records", dataset.councils.len());
    Ok(dataset)
}

/// Read the population lookup from CSV
pub fn read_population_csv<R: Read>(reader: R) -> anyhow::Result<Vec<PopulationRow>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: PopulationRow = result?;
        rows.push(row);
    }
    log::debug!("Read {} population rows", rows.len());
    Ok(rows)
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Immutable snapshot of every council, built once at startup
#[derive(Debug)]
pub struct Directory {
    councils: Vec<CouncilRecord>,
    by_id: HashMap<String, usize>,
    current_year: FinancialYear,
    fingerprint: String,
    unmatched_population: Vec<String>,
}

impl Directory {
    /// Build from records that already carry their population.
    ///
    /// The current year is `current_year` if given, else the latest Band D
    /// year in the records. Only when neither exists (e.g. an empty dataset)
    /// is it taken from the system clock, so pass a year for reproducible
    /// results.
    pub fn new(
        councils: Vec<CouncilRecord>,
        current_year: Option<FinancialYear>,
    ) -> Result<Self, DirectoryError> {
        let mut by_id = HashMap::with_capacity(councils.len());
        for (idx, council) in councils.iter().enumerate() {
            validate(council)?;
            if by_id.insert(council.id.clone(), idx).is_some() {
                return Err(DirectoryError::DuplicateId(council.id.clone()));
            }
        }

        let current_year = current_year
            .or_else(|| latest_year(&councils))
            .unwrap_or_else(|| FinancialYear::from_date(chrono::Local::now().date_naive()));

        let mut hasher = Sha256::new();
        hasher.update(current_year.0.to_le_bytes());
        for council in &councils {
            hasher.update(serde_json::to_vec(council)?);
        }
        let fingerprint = hex::encode(hasher.finalize());

        log::info!(
            "Loaded {} councils, current year {}",
            councils.len(),
            current_year
        );

        Ok(Directory {
            councils,
            by_id,
            current_year,
            fingerprint,
            unmatched_population: Vec::new(),
        })
    }

    /// Build from the dataset, joining population figures by council name.
    /// An explicit `year` overrides the dataset's declared current year.
    pub fn from_dataset(
        dataset: Dataset,
        population: &[PopulationRow],
        year: Option<FinancialYear>,
    ) -> Result<Self, DirectoryError> {
        let mut lookup: HashMap<String, u64> = HashMap::with_capacity(population.len());
        for row in population {
            log::debug!(
                "Population {} = {} (estimate year {:?})",
                row.name,
                row.population,
                row.year
            );
            if lookup
                .insert(normalize_name(&row.name), row.population)
                .is_some()
            {
                log::warn!("Duplicate population row for '{}', using the last", row.name);
            }
        }

        let mut matched = HashSet::new();
        let councils = dataset
            .councils
            .into_iter()
            .map(|mut council| {
                let key = normalize_name(&council.name);
                if let Some(population) = lookup.get(&key) {
                    council.population = Some(*population);
                    matched.insert(key);
                }
                council
            })
            .collect();

        let mut reported = HashSet::new();
        let unmatched_population: Vec<String> = population
            .iter()
            .filter(|row| {
                let key = normalize_name(&row.name);
                !matched.contains(&key) && reported.insert(key)
            })
            .map(|row| row.name.clone())
            .collect();
        for name in &unmatched_population {
            log::warn!("Population row '{}' matched no council", name);
        }

        let mut directory = Directory::new(councils, year.or(dataset.current_year))?;
        directory.unmatched_population = unmatched_population;
        Ok(directory)
    }

    pub fn get(&self, id: &str) -> Option<&CouncilRecord> {
        self.by_id.get(id).map(|&idx| &self.councils[idx])
    }

    /// Position of the council in Directory order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// All councils in Directory (dataset) order
    pub fn councils(&self) -> &[CouncilRecord] {
        &self.councils
    }

    pub fn len(&self) -> usize {
        self.councils.len()
    }

    pub fn is_empty(&self) -> bool {
        self.councils.is_empty()
    }

    pub fn current_year(&self) -> FinancialYear {
        self.current_year
    }

    /// SHA-256 of the snapshot contents, hex encoded
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Population rows whose name matched no council
    pub fn unmatched_population(&self) -> &[String] {
        &self.unmatched_population
    }

    /// Councils with a Band D figure for the current year, in Directory order
    pub fn with_band_d(&self) -> impl Iterator<Item = (&CouncilRecord, Decimal)> + '_ {
        let year = self.current_year;
        self.councils
            .iter()
            .filter_map(move |c| c.band_d(year).map(|amount| (c, amount)))
    }

    pub fn of_type(&self, council_type: CouncilType) -> impl Iterator<Item = &CouncilRecord> + '_ {
        self.councils
            .iter()
            .filter(move |c| c.council_type == council_type)
    }
}

fn latest_year(councils: &[CouncilRecord]) -> Option<FinancialYear> {
    councils
        .iter()
        .filter_map(|c| c.council_tax.as_ref().and_then(|t| t.latest_year()))
        .max()
}

/// Upper bound for any single figure (GBP or £000s); keeps aggregates clear
/// of Decimal overflow
const MAX_AMOUNT: Decimal = dec!(1000000000000);

fn check_size(id: &str, field: impl Into<String>, amount: Decimal) -> Result<(), DirectoryError> {
    if amount > MAX_AMOUNT {
        return Err(DirectoryError::AmountTooLarge {
            id: id.to_string(),
            field: field.into(),
            amount,
        });
    }
    Ok(())
}

fn validate(council: &CouncilRecord) -> Result<(), DirectoryError> {
    let id = &council.id;

    if let Some(tax) = &council.council_tax {
        for (year, amount) in &tax.band_d {
            check_size(id, format!("Band D {}", year), *amount)?;
            if *amount <= Decimal::ZERO {
                return Err(DirectoryError::NonPositiveBandD {
                    id: id.clone(),
                    year: *year,
                    amount: *amount,
                });
            }
        }
    }

    if let Some(budget) = &council.budget {
        let total = budget.total_service_expenditure;
        check_size(id, "total service expenditure", total)?;
        if total < Decimal::ZERO {
            return Err(DirectoryError::NegativeTotal {
                id: id.clone(),
                amount: total,
            });
        }
        for (category, amount) in &budget.services {
            check_size(id, category.label(), *amount)?;
            if *amount < Decimal::ZERO {
                return Err(DirectoryError::NegativeSpend {
                    id: id.clone(),
                    category: category.label().to_string(),
                    amount: *amount,
                });
            }
        }
        let reported = budget.reported_total();
        if reported > total {
            return Err(DirectoryError::CategoriesExceedTotal {
                id: id.clone(),
                reported,
                total,
            });
        }
    }

    for precept in council.precepts() {
        check_size(id, format!("precept '{}'", precept.authority), precept.band_d)?;
        if precept.band_d < Decimal::ZERO {
            return Err(DirectoryError::NegativePrecept {
                id: id.clone(),
                authority: precept.authority.clone(),
                amount: precept.band_d,
            });
        }
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::core::council::{DetailedInfo, Precept, ServiceCategory};
    use rust_decimal_macros::dec;

    #[test]
    fn lookup_by_id() {
        let dir = Directory::new(
            vec![
                council("E1", "Adur", CouncilType::District),
                council("E2", "Kent", CouncilType::County),
            ],
            Some(FinancialYear(2025)),
        )
        .unwrap();

        assert_eq!(dir.get("E2").map(|c| c.name.as_str()), Some("Kent"));
        assert_eq!(dir.position("E2"), Some(1));
        assert!(dir.get("E999").is_none());
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn duplicate_id_rejected() {
        let result = Directory::new(
            vec![
                council("E1", "Adur", CouncilType::District),
                council("E1", "Arun", CouncilType::District),
            ],
            None,
        );
        assert!(matches!(result, Err(DirectoryError::DuplicateId(id)) if id == "E1"));
    }

    #[test]
    fn non_positive_band_d_rejected() {
        let c = with_band_d(council("E1", "Adur", CouncilType::District), 2025, dec!(0));
        let result = Directory::new(vec![c], None);
        assert!(matches!(result, Err(DirectoryError::NonPositiveBandD { .. })));
    }

    #[test]
    fn categories_exceeding_total_rejected() {
        let c = with_budget(
            council("E1", "Adur", CouncilType::District),
            dec!(1000),
            &[
                (ServiceCategory::Housing, dec!(600)),
                (ServiceCategory::CentralServices, dec!(500)),
            ],
        );
        let result = Directory::new(vec![c], None);
        assert!(matches!(
            result,
            Err(DirectoryError::CategoriesExceedTotal { reported, total, .. })
                if reported == dec!(1100) && total == dec!(1000)
        ));
    }

    #[test]
    fn negative_spend_rejected() {
        let c = with_budget(
            council("E1", "Adur", CouncilType::District),
            dec!(1000),
            &[(ServiceCategory::Housing, dec!(-1))],
        );
        assert!(matches!(
            Directory::new(vec![c], None),
            Err(DirectoryError::NegativeSpend { .. })
        ));
    }

    #[test]
    fn negative_precept_rejected() {
        let mut c = council("E1", "Adur", CouncilType::District);
        c.detailed = Some(DetailedInfo {
            precepts: vec![Precept {
                authority: "Sussex Police".to_string(),
                band_d: dec!(-5),
            }],
            ..Default::default()
        });
        assert!(matches!(
            Directory::new(vec![c], None),
            Err(DirectoryError::NegativePrecept { .. })
        ));
    }

    #[test]
    fn implausible_amounts_rejected() {
        let c = with_band_d(
            council("E1", "Adur", CouncilType::District),
            2025,
            Decimal::MAX,
        );
        assert!(matches!(
            Directory::new(vec![c], None),
            Err(DirectoryError::AmountTooLarge { .. })
        ));

        let c = with_budget(
            council("E1", "Adur", CouncilType::District),
            Decimal::MAX,
            &[(ServiceCategory::Housing, Decimal::MAX)],
        );
        assert!(matches!(
            Directory::new(vec![c], None),
            Err(DirectoryError::AmountTooLarge { .. })
        ));
    }

    #[test]
    fn empty_directory_uses_given_year() {
        let dir = Directory::new(vec![], Some(FinancialYear(2019))).unwrap();
        assert_eq!(dir.current_year(), FinancialYear(2019));
    }

    #[test]
    fn current_year_defaults_to_latest() {
        let dir = Directory::new(
            vec![
                with_band_d(council("E1", "Adur", CouncilType::District), 2024, dec!(190)),
                with_band_d(council("E2", "Arun", CouncilType::District), 2025, dec!(200)),
            ],
            None,
        )
        .unwrap();
        assert_eq!(dir.current_year(), FinancialYear(2025));
    }

    #[test]
    fn population_joined_case_insensitively() {
        let dataset = Dataset {
            current_year: Some(FinancialYear(2025)),
            councils: vec![
                council("E1", "Adur", CouncilType::District),
                council("E2", "Arun", CouncilType::District),
            ],
        };
        let population = vec![
            PopulationRow {
                name: "  ADUR ".to_string(),
                population: 64_000,
                year: Some(2023),
            },
            PopulationRow {
                name: "Nowhere".to_string(),
                population: 10,
                year: None,
            },
        ];

        let dir = Directory::from_dataset(dataset, &population, None).unwrap();

        assert_eq!(dir.get("E1").unwrap().population, Some(64_000));
        assert_eq!(dir.get("E2").unwrap().population, None);
        assert_eq!(dir.unmatched_population(), ["Nowhere".to_string()]);
    }

    #[test]
    fn unmatched_population_reported_once_per_name() {
        let dataset = Dataset {
            current_year: Some(FinancialYear(2025)),
            councils: vec![council("E1", "Adur", CouncilType::District)],
        };
        let row = |name: &str| PopulationRow {
            name: name.to_string(),
            population: 10,
            year: None,
        };
        let population = vec![row("Nowhere"), row("Adur"), row("NOWHERE "), row("Elsewhere")];

        let dir = Directory::from_dataset(dataset, &population, None).unwrap();

        assert_eq!(
            dir.unmatched_population(),
            ["Nowhere".to_string(), "Elsewhere".to_string()]
        );
    }

    #[test]
    fn year_override_wins() {
        let dataset = Dataset {
            current_year: Some(FinancialYear(2025)),
            councils: vec![],
        };
        let dir = Directory::from_dataset(dataset, &[], Some(FinancialYear(2023))).unwrap();
        assert_eq!(dir.current_year(), FinancialYear(2023));
    }

    #[test]
    fn fingerprint_is_stable() {
        let build = || {
            Directory::new(
                vec![with_band_d(council("E1", "Adur", CouncilType::District), 2025, dec!(200))],
                None,
            )
            .unwrap()
        };
        let a = build();
        let b = build();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn population_csv_parsed() {
        let csv = "name,population,year\nAdur, 64000 ,2023\nArun,164000,\n";
        let rows = read_population_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].population, 64_000);
        assert_eq!(rows[1].year, None);
    }

    #[test]
    fn population_schema_describes_columns() {
        let schema = PopulationRow::csv_schema();
        assert_eq!(PopulationRow::csv_header(), ["name", "population", "year"]);
        assert!(schema[0].required);
        assert_eq!(schema[1].kind, "u64");
        assert!(!schema[2].required);
    }
}
