use super::year::FinancialYear;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Type of local authority
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CouncilType {
    /// Lower-tier district in a two-tier area
    District,
    /// Upper-tier county in a two-tier area
    County,
    Unitary,
    LondonBorough,
    MetropolitanDistrict,
    CombinedAuthority,
    /// City of London, Isles of Scilly and similar sui generis authorities
    Special,
}

impl CouncilType {
    pub const ALL: [CouncilType; 7] = [
        CouncilType::District,
        CouncilType::County,
        CouncilType::Unitary,
        CouncilType::LondonBorough,
        CouncilType::MetropolitanDistrict,
        CouncilType::CombinedAuthority,
        CouncilType::Special,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            CouncilType::District => "district",
            CouncilType::County => "county",
            CouncilType::Unitary => "unitary",
            CouncilType::LondonBorough => "london_borough",
            CouncilType::MetropolitanDistrict => "metropolitan_district",
            CouncilType::CombinedAuthority => "combined_authority",
            CouncilType::Special => "special",
        }
    }

    /// Display label used when the dataset omits `type_name`
    pub fn label(&self) -> &'static str {
        match self {
            CouncilType::District => "District Council",
            CouncilType::County => "County Council",
            CouncilType::Unitary => "Unitary Authority",
            CouncilType::LondonBorough => "London Borough",
            CouncilType::MetropolitanDistrict => "Metropolitan District",
            CouncilType::CombinedAuthority => "Combined Authority",
            CouncilType::Special => "Special Authority",
        }
    }

    pub fn from_code(s: &str) -> Option<CouncilType> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        CouncilType::ALL
            .into_iter()
            .find(|t| t.code() == normalized)
    }
}

impl fmt::Display for CouncilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named service-spending categories reported in revenue outturn returns
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    AdultSocialCare,
    ChildrenSocialCare,
    Education,
    Transport,
    PublicHealth,
    Housing,
    Cultural,
    Environmental,
    Planning,
    CentralServices,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 10] = [
        ServiceCategory::AdultSocialCare,
        ServiceCategory::ChildrenSocialCare,
        ServiceCategory::Education,
        ServiceCategory::Transport,
        ServiceCategory::PublicHealth,
        ServiceCategory::Housing,
        ServiceCategory::Cultural,
        ServiceCategory::Environmental,
        ServiceCategory::Planning,
        ServiceCategory::CentralServices,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServiceCategory::AdultSocialCare => "Adult social care",
            ServiceCategory::ChildrenSocialCare => "Children's services",
            ServiceCategory::Education => "Education",
            ServiceCategory::Transport => "Highways & transport",
            ServiceCategory::PublicHealth => "Public health",
            ServiceCategory::Housing => "Housing",
            ServiceCategory::Cultural => "Culture & leisure",
            ServiceCategory::Environmental => "Environment & waste",
            ServiceCategory::Planning => "Planning & development",
            ServiceCategory::CentralServices => "Central services",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Band D amounts (GBP) by financial year
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CouncilTax {
    #[schemars(with = "BTreeMap<String, f64>")]
    pub band_d: BTreeMap<FinancialYear, Decimal>,
}

impl CouncilTax {
    pub fn band_d(&self, year: FinancialYear) -> Option<Decimal> {
        self.band_d.get(&year).copied()
    }

    pub fn latest_year(&self) -> Option<FinancialYear> {
        self.band_d.keys().next_back().copied()
    }
}

/// Revenue budget, all amounts in thousands of GBP (£000s)
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Budget {
    #[schemars(with = "f64")]
    pub total_service_expenditure: Decimal,
    /// Per-category spend; categories the council does not report are absent
    #[serde(default)]
    #[schemars(with = "BTreeMap<ServiceCategory, f64>")]
    pub services: BTreeMap<ServiceCategory, Decimal>,
}

impl Budget {
    pub fn spend(&self, category: ServiceCategory) -> Option<Decimal> {
        self.services.get(&category).copied()
    }

    pub fn reported_total(&self) -> Decimal {
        self.services.values().copied().sum()
    }
}

/// A precept levied on this council's bill by another authority
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Precept {
    /// e.g. "Kent County Council", "Kent Police", "Kent Fire & Rescue"
    pub authority: String,
    #[schemars(with = "f64")]
    pub band_d: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Document {
    pub title: String,
    pub url: String,
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub year: Option<FinancialYear>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Leadership {
    #[serde(default)]
    pub leader: Option<String>,
    #[serde(default)]
    pub chief_executive: Option<String>,
    #[serde(default)]
    pub political_control: Option<String>,
}

/// Enriched information only available for some councils
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DetailedInfo {
    #[serde(default)]
    pub precepts: Vec<Precept>,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub leadership: Option<Leadership>,
    /// Usable reserves (£000s)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub reserves: Option<Decimal>,
    /// Planned savings for the year (£000s)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub savings_target: Option<Decimal>,
    /// Services verified as delivered by this authority
    #[serde(default)]
    pub services: Vec<String>,
}

/// A single local authority
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CouncilRecord {
    /// ONS/GSS area code (e.g. E07000223)
    pub id: String,
    pub name: String,
    #[serde(rename = "type_code")]
    pub council_type: CouncilType,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub council_tax: Option<CouncilTax>,
    #[serde(default)]
    pub budget: Option<Budget>,
    #[serde(default)]
    pub detailed: Option<DetailedInfo>,
    /// Resident population, joined from the population lookup
    #[serde(default)]
    pub population: Option<u64>,
}

impl CouncilRecord {
    pub fn type_name(&self) -> &str {
        self.type_name
            .as_deref()
            .unwrap_or_else(|| self.council_type.label())
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn band_d(&self, year: FinancialYear) -> Option<Decimal> {
        self.council_tax.as_ref().and_then(|t| t.band_d(year))
    }

    pub fn total_budget(&self) -> Option<Decimal> {
        self.budget.as_ref().map(|b| b.total_service_expenditure)
    }

    pub fn precepts(&self) -> &[Precept] {
        self.detailed
            .as_ref()
            .map(|d| d.precepts.as_slice())
            .unwrap_or_default()
    }
}
