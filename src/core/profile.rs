//! Per-council summaries combining every analytic that applies to one
//! council, and side-by-side comparison of two councils.

use super::council::CouncilRecord;
use super::directory::Directory;
use super::efficiency::{efficiency_metrics, EfficiencyMetrics};
use super::stats::{self, YearChange};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct CouncilProfile<'a> {
    pub council: &'a CouncilRecord,
    pub band_d: Option<Decimal>,
    /// Band D plus precepts from other authorities
    pub combined_band_d: Option<Decimal>,
    pub change: Option<YearChange>,
    /// Average Band D of councils of the same type
    pub type_average: Option<Decimal>,
    /// (position, out of) in the highest-first Band D ranking
    pub rank: Option<(usize, usize)>,
    pub efficiency: EfficiencyMetrics,
}

impl CouncilProfile<'_> {
    /// Band D minus the average of the council's type
    pub fn difference_from_type_average(&self) -> Option<Decimal> {
        Some(self.band_d? - self.type_average?)
    }
}

pub fn profile<'a>(directory: &Directory, council: &'a CouncilRecord) -> CouncilProfile<'a> {
    CouncilProfile {
        council,
        band_d: council.band_d(directory.current_year()),
        combined_band_d: stats::combined_band_d(directory, council),
        change: stats::year_over_year_change(directory, council),
        type_average: stats::average_by_type(directory, council.council_type),
        rank: stats::rank_of(directory, &council.id),
        efficiency: efficiency_metrics(council),
    }
}

#[derive(Debug, Clone)]
pub struct Comparison<'a> {
    pub left: CouncilProfile<'a>,
    pub right: CouncilProfile<'a>,
    pub national_average: Option<Decimal>,
}

impl Comparison<'_> {
    /// Right-hand Band D minus left-hand Band D
    pub fn band_d_difference(&self) -> Option<Decimal> {
        Some(self.right.band_d? - self.left.band_d?)
    }
}

pub fn compare<'a>(
    directory: &'a Directory,
    left: &'a CouncilRecord,
    right: &'a CouncilRecord,
) -> Comparison<'a> {
    Comparison {
        left: profile(directory, left),
        right: profile(directory, right),
        national_average: stats::national_stats(directory, 0).map(|s| s.average),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::council::{CouncilType, ServiceCategory};
    use crate::core::directory::fixtures::{council, with_band_d, with_budget};
    use crate::core::year::FinancialYear;
    use rust_decimal_macros::dec;

    fn scenario() -> Directory {
        let mut x = with_budget(
            with_band_d(
                with_band_d(council("E07000001", "X", CouncilType::District), 2025, dec!(200)),
                2024,
                dec!(190),
            ),
            dec!(100000),
            &[(ServiceCategory::CentralServices, dec!(5000))],
        );
        x.population = Some(50_000);

        let y = with_band_d(council("E07000002", "Y", CouncilType::District), 2025, dec!(300));
        Directory::new(vec![x, y], Some(FinancialYear(2025))).unwrap()
    }

    #[test]
    fn profile_collects_every_figure() {
        let dir = scenario();
        let p = profile(&dir, dir.get("E07000001").unwrap());

        assert_eq!(p.band_d, Some(dec!(200)));
        assert_eq!(p.combined_band_d, Some(dec!(200)));
        assert_eq!(p.change.map(|c| c.amount), Some(dec!(10)));
        assert_eq!(p.type_average, Some(dec!(250)));
        assert_eq!(p.difference_from_type_average(), Some(dec!(-50)));
        assert_eq!(p.rank, Some((2, 2)));
        assert_eq!(p.efficiency.per_capita, Some(dec!(2000)));
        assert_eq!(p.efficiency.admin_overhead_percent, Some(dec!(5)));
    }

    #[test]
    fn missing_budget_only_affects_budget_figures() {
        let dir = scenario();
        let p = profile(&dir, dir.get("E07000002").unwrap());

        assert_eq!(p.band_d, Some(dec!(300)));
        assert_eq!(p.rank, Some((1, 2)));
        assert!(p.change.is_none());
        assert!(p.efficiency.per_capita.is_none());
        assert!(p.efficiency.admin_overhead_percent.is_none());
    }

    #[test]
    fn compare_two_councils() {
        let dir = scenario();
        let cmp = compare(&dir, dir.get("E07000001").unwrap(), dir.get("E07000002").unwrap());

        assert_eq!(cmp.band_d_difference(), Some(dec!(100)));
        assert_eq!(cmp.national_average, Some(dec!(250)));
        assert_eq!(cmp.left.council.name, "X");
        assert_eq!(cmp.right.council.name, "Y");
    }
}
