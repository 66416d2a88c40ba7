//! Pure recommendation engine: coverage tables per insurance line, limit and
//! territory resolvers, the per-line assembler, and the illustrative pricing
//! estimator.

mod assembler;
pub mod limits;
mod pricing;
mod render;
pub(crate) mod rules;
pub mod territory;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::facts::domain::fold;
use super::facts::FactsRecord;

pub use assembler::{assemble, CompanySnapshot, ConstructionSnapshot, OwnerSnapshot};
pub use limits::{
    format_euros, resolve_cash_limit, resolve_electrical_damage_limit,
    resolve_electrical_damage_limit_extended, resolve_general_liability_limits,
    resolve_robbery_capital_percentage, resolve_robbery_coverage_limit, GeneralLiabilityLimits,
};
pub use pricing::{estimate_dm_products, estimate_rc_products, ProductTier};
pub use render::render_recommendation;
pub use territory::resolve_territory;

/// Single coverage line item. The name is the stable identity within a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    pub name: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublimit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceLine {
    ResponsabilidadCivil,
    DanosMateriales,
}

impl InsuranceLine {
    pub const ALL: [InsuranceLine; 2] = [Self::ResponsabilidadCivil, Self::DanosMateriales];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ResponsabilidadCivil => "responsabilidad_civil",
            Self::DanosMateriales => "danos_materiales",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ResponsabilidadCivil => "Responsabilidad Civil",
            Self::DanosMateriales => "Daños Materiales",
        }
    }
}

impl fmt::Display for InsuranceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown insurance line `{0}`")]
pub struct UnknownLine(pub String);

impl FromStr for InsuranceLine {
    type Err = UnknownLine;

    /// Accepts the short codes (`rc`, `dm`) and the full names with `_`, `-`
    /// or spaces, case and accents ignored.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key: String = fold(raw)
            .chars()
            .map(|ch| if ch == '-' || ch == ' ' { '_' } else { ch })
            .collect();
        match key.as_str() {
            "rc" | "responsabilidad_civil" => Ok(Self::ResponsabilidadCivil),
            "dm" | "danos_materiales" => Ok(Self::DanosMateriales),
            _ => Err(UnknownLine(raw.to_string())),
        }
    }
}

/// Civil-liability limits attached to a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiabilityLimits {
    pub general_limit: String,
    pub victim_sublimit: String,
    pub explanation: String,
}

/// Output of the property-damage evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDamageCoverages {
    pub coverages: Vec<Coverage>,
    pub special_clauses: Vec<Coverage>,
}

/// Per-line recommendation derived on demand from a facts record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub line: InsuranceLine,
    pub coverages: Vec<Coverage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub territorial_scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<LiabilityLimits>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub special_clauses: Vec<Coverage>,
    pub company: CompanySnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction: Option<ConstructionSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protections: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims_history: Option<String>,
}

impl Recommendation {
    pub fn coverage(&self, name: &str) -> Option<&Coverage> {
        self.coverages
            .iter()
            .chain(self.special_clauses.iter())
            .find(|coverage| coverage.name == name)
    }

    /// Whether the named coverage is listed and required.
    pub fn includes(&self, name: &str) -> bool {
        self.coverage(name).is_some_and(|coverage| coverage.required)
    }
}

/// Civil-liability coverage list in catalog order. Every row is present.
pub fn evaluate_rc(facts: &FactsRecord) -> Vec<Coverage> {
    rules::evaluate_table(rules::civil_liability::RULES, facts)
}

/// Property-damage core and conditional rows plus the special clauses.
pub fn evaluate_dm(facts: &FactsRecord) -> PropertyDamageCoverages {
    PropertyDamageCoverages {
        coverages: rules::evaluate_table(rules::property_damage::COVERAGES, facts),
        special_clauses: rules::evaluate_table(rules::property_damage::SPECIAL_CLAUSES, facts),
    }
}

pub fn generate_coverage_recommendation(line: InsuranceLine, facts: &FactsRecord) -> Recommendation {
    assemble(facts, line)
}

pub fn generate_product_tiers(line: InsuranceLine, facts: &FactsRecord) -> [ProductTier; 3] {
    match line {
        InsuranceLine::ResponsabilidadCivil => estimate_rc_products(facts),
        InsuranceLine::DanosMateriales => estimate_dm_products(facts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_line_aliases() {
        for raw in ["rc", "RC", "responsabilidad_civil", "Responsabilidad Civil"] {
            assert_eq!(
                raw.parse::<InsuranceLine>(),
                Ok(InsuranceLine::ResponsabilidadCivil)
            );
        }
        for raw in ["dm", "danos_materiales", "daños-materiales", "Daños Materiales"] {
            assert_eq!(raw.parse::<InsuranceLine>(), Ok(InsuranceLine::DanosMateriales));
        }
        assert_eq!(
            "vida".parse::<InsuranceLine>(),
            Err(UnknownLine("vida".to_string()))
        );
    }

    #[test]
    fn line_serializes_as_snake_case() {
        let value = serde_json::to_value(InsuranceLine::DanosMateriales).expect("serialize");
        assert_eq!(value, serde_json::json!("danos_materiales"));
        assert_eq!(InsuranceLine::ResponsabilidadCivil.to_string(), "responsabilidad_civil");
    }

    #[test]
    fn empty_clauses_are_omitted_from_json() {
        let coverage = Coverage {
            name: "Daños por Agua".to_string(),
            required: true,
            condition: None,
            limit: None,
            sublimit: None,
        };
        let value = serde_json::to_value(&coverage).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({ "name": "Daños por Agua", "required": true })
        );
    }

    #[test]
    fn rc_lists_every_row_and_dm_only_applicable_ones() {
        let facts = FactsRecord::default();
        assert_eq!(evaluate_rc(&facts).len(), rules::civil_liability::RULES.len());
        let dm = evaluate_dm(&facts);
        assert_eq!(dm.coverages.len(), 6);
        assert_eq!(dm.special_clauses.len(), 2);
    }
}
