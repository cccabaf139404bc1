use super::council::{CouncilRecord, ServiceCategory};
use super::directory::Directory;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

/// Spend on one service category (£000s)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySpending {
    pub category: ServiceCategory,
    pub total: Decimal,
    /// Share of the breakdown's denominator; `None` when that is zero
    pub percent: Option<Decimal>,
    /// Number of councils reporting the category
    pub councils: usize,
}

/// Decimal places kept on a share; truncated so shares never sum past 100%
const PERCENT_SCALE: u32 = 6;

fn percent_of(amount: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }
    let share = amount.checked_mul(Decimal::ONE_HUNDRED)?.checked_div(denominator)?;
    Some(share.round_dp_with_strategy(PERCENT_SCALE, RoundingStrategy::ToZero))
}

fn ranked(totals: BTreeMap<ServiceCategory, (Decimal, usize)>, denominator: Decimal) -> Vec<CategorySpending> {
    let mut breakdown: Vec<CategorySpending> = totals
        .into_iter()
        .map(|(category, (total, councils))| CategorySpending {
            category,
            total,
            percent: percent_of(total, denominator),
            councils,
        })
        .collect();
    breakdown.sort_by(|a, b| b.total.cmp(&a.total));
    breakdown
}

/// National spend per category, highest first. Percentages are shares of the
/// sum of all reported categories, so councils that omit a category do not
/// distort the others.
pub fn service_spending_breakdown(directory: &Directory) -> Vec<CategorySpending> {
    let mut totals: BTreeMap<ServiceCategory, (Decimal, usize)> = BTreeMap::new();
    for budget in directory.councils().iter().filter_map(|c| c.budget.as_ref()) {
        for (category, amount) in &budget.services {
            let entry = totals.entry(*category).or_insert((Decimal::ZERO, 0));
            entry.0 += *amount;
            entry.1 += 1;
        }
    }
    let reported: Decimal = totals.values().map(|(total, _)| *total).sum();
    log::debug!(
        "Service spending across {} categories, reported total {}",
        totals.len(),
        reported
    );
    ranked(totals, reported)
}

/// One council's spend per category, highest first, as shares of its total
/// service expenditure. `None` without a budget.
pub fn council_spending_breakdown(council: &CouncilRecord) -> Option<Vec<CategorySpending>> {
    let budget = council.budget.as_ref()?;
    let totals = budget
        .services
        .iter()
        .map(|(category, amount)| (*category, (*amount, 1)))
        .collect();
    Some(ranked(totals, budget.total_service_expenditure))
}
