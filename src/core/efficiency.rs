use super::council::{CouncilRecord, ServiceCategory};
use super::directory::Directory;
use super::stats::Ranked;
use rust_decimal::Decimal;

/// Budget figures are held in £000s
const THOUSAND: Decimal = Decimal::ONE_THOUSAND;

/// Spending efficiency figures for one council; each is `None` when its
/// inputs are missing or would divide by zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EfficiencyMetrics {
    /// Total service expenditure per resident (GBP)
    pub per_capita: Option<Decimal>,
    /// Central services as a percentage of total service expenditure
    pub admin_overhead_percent: Option<Decimal>,
}

impl EfficiencyMetrics {
    pub fn is_available(&self) -> bool {
        self.per_capita.is_some() || self.admin_overhead_percent.is_some()
    }
}

pub fn per_capita_spending(council: &CouncilRecord) -> Option<Decimal> {
    let total = council.total_budget()?;
    let population = council.population.filter(|p| *p > 0)?;
    Some(total * THOUSAND / Decimal::from(population))
}

pub fn admin_overhead_percent(council: &CouncilRecord) -> Option<Decimal> {
    let budget = council.budget.as_ref()?;
    let central = budget.spend(ServiceCategory::CentralServices)?;
    if budget.total_service_expenditure.is_zero() {
        return None;
    }
    Some(central / budget.total_service_expenditure * Decimal::ONE_HUNDRED)
}

pub fn efficiency_metrics(council: &CouncilRecord) -> EfficiencyMetrics {
    EfficiencyMetrics {
        per_capita: per_capita_spending(council),
        admin_overhead_percent: admin_overhead_percent(council),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EfficiencyMeasure {
    PerCapita,
    AdminOverhead,
}

impl EfficiencyMeasure {
    fn value(&self, council: &CouncilRecord) -> Option<Decimal> {
        match self {
            EfficiencyMeasure::PerCapita => per_capita_spending(council),
            EfficiencyMeasure::AdminOverhead => admin_overhead_percent(council),
        }
    }
}

fn ranked(directory: &Directory, measure: EfficiencyMeasure, descending: bool) -> Vec<Ranked<'_>> {
    let mut ranked: Vec<Ranked> = directory
        .councils()
        .iter()
        .filter_map(|council| measure.value(council).map(|value| Ranked { council, value }))
        .collect();
    if descending {
        ranked.sort_by(|a, b| b.value.cmp(&a.value));
    } else {
        ranked.sort_by(|a, b| a.value.cmp(&b.value));
    }
    log::debug!("Ranked {} councils by {:?}", ranked.len(), measure);
    ranked
}

/// Councils with the lowest value of the measure, only counting councils
/// where every input exists
pub fn lowest(directory: &Directory, measure: EfficiencyMeasure, n: usize) -> Vec<Ranked<'_>> {
    let mut ranked = ranked(directory, measure, false);
    ranked.truncate(n);
    ranked
}

pub fn highest(directory: &Directory, measure: EfficiencyMeasure, n: usize) -> Vec<Ranked<'_>> {
    let mut ranked = ranked(directory, measure, true);
    ranked.truncate(n);
    ranked
}
