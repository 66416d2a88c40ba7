//! Ordered threshold tables mapping declared amounts to limit tiers.
//!
//! Every resolver treats negative or NaN input as zero, so the lowest band is
//! the floor for missing data. `+∞` saturates to `f64::MAX` and lands in the
//! top band.

use serde::{Deserialize, Serialize};

/// Upper edge of a band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Upper {
    Below(f64),
    AtMost(f64),
    Unbounded,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Band<T> {
    pub upper: Upper,
    pub value: T,
}

pub(crate) const fn band<T>(upper: Upper, value: T) -> Band<T> {
    Band { upper, value }
}

/// First band whose upper edge admits `amount`. Tables end in `Unbounded`.
pub(crate) fn pick<T>(bands: &'static [Band<T>], amount: f64) -> (usize, &'static T) {
    let amount = sanitize(amount);
    let last = bands.len() - 1;
    let index = bands
        .iter()
        .position(|band| match band.upper {
            Upper::Below(edge) => amount < edge,
            Upper::AtMost(edge) => amount <= edge,
            Upper::Unbounded => true,
        })
        .unwrap_or(last);
    (index, &bands[index].value)
}

pub(crate) fn sanitize(amount: f64) -> f64 {
    if amount > 0.0 {
        amount.min(f64::MAX)
    } else {
        0.0
    }
}

/// Recommended civil-liability limits for a given annual billing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralLiabilityLimits {
    pub general_limit: String,
    pub victim_sublimit: String,
}

const GENERAL_LIABILITY: &[Band<(&str, &str)>] = &[
    band(Upper::Below(1_000_000.0), ("600.000€", "450.000€")),
    band(Upper::AtMost(3_000_000.0), ("1.000.000€", "600.000€")),
    band(Upper::AtMost(10_000_000.0), ("2.000.000€", "600.000€")),
    band(Upper::Unbounded, ("3.000.000€", "900.000€")),
];

pub fn resolve_general_liability_limits(billing: f64) -> GeneralLiabilityLimits {
    let (_, (general, victim)) = pick(GENERAL_LIABILITY, billing);
    GeneralLiabilityLimits {
        general_limit: general.to_string(),
        victim_sublimit: victim.to_string(),
    }
}

/// Position of `billing` in the general-liability table, lowest tier first.
pub fn general_liability_tier(billing: f64) -> usize {
    pick(GENERAL_LIABILITY, billing).0
}

const ELECTRICAL_DAMAGE: &[Band<&str>] = &[
    band(Upper::Below(500_000.0), "15.000€"),
    band(Upper::Below(1_500_000.0), "30.000€"),
    band(Upper::Unbounded, "60.000€"),
];

const ELECTRICAL_DAMAGE_EXTENDED: &[Band<&str>] = &[
    band(Upper::Below(500_000.0), "30.000€"),
    band(Upper::Below(1_000_000.0), "60.000€"),
    band(Upper::Unbounded, "100.000€"),
];

/// Electrical-damage limit used on the property-damage coverage list.
pub fn resolve_electrical_damage_limit(building_value: f64) -> String {
    pick(ELECTRICAL_DAMAGE, building_value).1.to_string()
}

/// Electrical-damage limit quoted on product tiers. Bands differ from
/// [`resolve_electrical_damage_limit`].
pub fn resolve_electrical_damage_limit_extended(building_value: f64) -> String {
    pick(ELECTRICAL_DAMAGE_EXTENDED, building_value).1.to_string()
}

const ROBBERY_FLAT: &[Band<&str>] = &[
    band(Upper::AtMost(500_000.0), "15.000€"),
    band(Upper::Unbounded, "30.000€"),
];

const ROBBERY_PERCENTAGE: &[Band<&str>] = &[
    band(Upper::AtMost(1_000_000.0), "50%"),
    band(Upper::Unbounded, "25%"),
];

/// Flat robbery limit keyed on building value.
pub fn resolve_robbery_coverage_limit(building_value: f64) -> String {
    pick(ROBBERY_FLAT, building_value).1.to_string()
}

/// Robbery limit expressed as a share of the total declared capital.
pub fn resolve_robbery_capital_percentage(total_capital: f64) -> String {
    pick(ROBBERY_PERCENTAGE, total_capital).1.to_string()
}

const CASH: &[Band<&str>] = &[
    band(Upper::AtMost(500.0), "500€"),
    band(Upper::AtMost(1_500.0), "1.500€"),
    band(Upper::AtMost(3_000.0), "3.000€"),
    band(Upper::Unbounded, "6.000€"),
];

/// Shared by cash-in-safe, cash-outside-safe and cash-in-transit coverages.
pub fn resolve_cash_limit(value: f64) -> String {
    pick(CASH, value).1.to_string()
}

/// Whole euros with `.` thousands separators: `1234567.4` → `1.234.567€`.
pub fn format_euros(amount: f64) -> String {
    let whole = sanitize(amount).round() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped.push('€');
    grouped
}
