use std::collections::BTreeSet;

use crate::advisory::facts::{DistributionRegion, FactsRecord};

pub const SCOPE_WORLDWIDE_WITH_USA: &str = "Todo el Mundo incluido USA y Canadá";
pub const SCOPE_WORLDWIDE_EXCLUDING_USA: &str = "Todo el Mundo excepto USA y Canadá";
pub const SCOPE_EUROPEAN_UNION: &str = "Unión Europea";
pub const SCOPE_SPAIN_ANDORRA: &str = "España y Andorra";

/// Highest-risk market first; the first region present decides the scope.
const PRIORITY: [(DistributionRegion, &str); 4] = [
    (DistributionRegion::MundialConUsa, SCOPE_WORLDWIDE_WITH_USA),
    (DistributionRegion::MundialSinUsa, SCOPE_WORLDWIDE_EXCLUDING_USA),
    (DistributionRegion::Ue, SCOPE_EUROPEAN_UNION),
    (DistributionRegion::Espana, SCOPE_SPAIN_ANDORRA),
];

/// Territorial scope for the civil-liability line.
///
/// An explicit `territorio` answer is returned verbatim; otherwise the scope
/// follows the widest distribution market, defaulting to Spain and Andorra.
pub fn resolve_territory(facts: &FactsRecord) -> String {
    if let Some(explicit) = facts
        .territorio
        .as_deref()
        .filter(|value| !value.trim().is_empty())
    {
        return explicit.to_string();
    }

    let regions = facts
        .manufacturing()
        .map(|detail| &detail.distribucion);

    match regions {
        Some(regions) => scope_for_regions(regions).to_string(),
        None => SCOPE_SPAIN_ANDORRA.to_string(),
    }
}

pub fn scope_for_regions(regions: &BTreeSet<DistributionRegion>) -> &'static str {
    PRIORITY
        .iter()
        .find(|(region, _)| regions.contains(region))
        .map(|(_, scope)| *scope)
        .unwrap_or(SCOPE_SPAIN_ANDORRA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::facts::{ActivityDetail, ManufacturingActivity};

    fn manufacturer(regions: &[DistributionRegion]) -> FactsRecord {
        FactsRecord {
            activity_detail: ActivityDetail::Manufactura(ManufacturingActivity {
                distribucion: regions.iter().copied().collect(),
                ..ManufacturingActivity::default()
            }),
            ..FactsRecord::default()
        }
    }

    #[test]
    fn explicit_override_wins_over_distribution() {
        let mut facts = manufacturer(&[DistributionRegion::MundialConUsa]);
        facts.territorio = Some(SCOPE_EUROPEAN_UNION.to_string());
        assert_eq!(resolve_territory(&facts), "Unión Europea");
    }

    #[test]
    fn override_is_returned_verbatim_even_when_not_canonical() {
        let mut facts = manufacturer(&[]);
        facts.territorio = Some("Portugal".to_string());
        assert_eq!(resolve_territory(&facts), "Portugal");
    }

    #[test]
    fn widest_market_decides() {
        let facts = manufacturer(&[
            DistributionRegion::Espana,
            DistributionRegion::Ue,
            DistributionRegion::MundialSinUsa,
        ]);
        assert_eq!(resolve_territory(&facts), SCOPE_WORLDWIDE_EXCLUDING_USA);

        let facts = manufacturer(&[DistributionRegion::Ue, DistributionRegion::MundialConUsa]);
        assert_eq!(resolve_territory(&facts), SCOPE_WORLDWIDE_WITH_USA);
    }

    #[test]
    fn defaults_to_spain_and_andorra() {
        assert_eq!(resolve_territory(&manufacturer(&[])), SCOPE_SPAIN_ANDORRA);
        assert_eq!(resolve_territory(&FactsRecord::default()), SCOPE_SPAIN_ANDORRA);
    }
}
