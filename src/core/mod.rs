pub mod bands;
pub mod council;
pub mod directory;
pub mod efficiency;
pub mod profile;
pub mod quality;
pub mod search;
pub mod spending;
pub mod stats;
pub mod year;

// Flat public surface for domain types and functions.
pub use bands::{calculate_bands, Band, BandAmounts};
pub use council::{CouncilRecord, CouncilType, DetailedInfo, ServiceCategory};
pub use directory::{read_dataset_json, read_population_csv, Dataset, Directory, PopulationRow};
pub use efficiency::{efficiency_metrics, EfficiencyMeasure};
pub use profile::{compare, profile, CouncilProfile};
pub use quality::Issue;
pub use search::SearchIndex;
pub use spending::{council_spending_breakdown, service_spending_breakdown, CategorySpending};
pub use stats::{
    average_by_type, band_d_distribution, national_stats, type_averages, year_over_year_change,
    PriceBucket, Ranked, YearChange,
};
pub use year::FinancialYear;
