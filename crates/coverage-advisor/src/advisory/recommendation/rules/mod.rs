//! Declarative coverage tables, one ordered slice per insurance line.
//!
//! Each row pairs a coverage name with a guard over the facts record and
//! optional clause builders. Evaluation is a single pass in declaration order,
//! so output order is stable for a given table.

pub(crate) mod civil_liability;
pub(crate) mod property_damage;

use crate::advisory::facts::FactsRecord;

use super::Coverage;

pub(crate) type Guard = fn(&FactsRecord) -> bool;
pub(crate) type Clause = fn(&FactsRecord) -> Option<String>;

/// How a row contributes to the output list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Emission {
    /// Always listed; `required` carries the guard result.
    Listed,
    /// Only listed when the guard holds.
    WhenApplicable,
}

pub(crate) struct CoverageRule {
    pub name: &'static str,
    pub emission: Emission,
    pub guard: Guard,
    pub condition: Clause,
    pub limit: Clause,
    pub sublimit: Clause,
}

fn always(_: &FactsRecord) -> bool {
    true
}

fn nothing(_: &FactsRecord) -> Option<String> {
    None
}

impl CoverageRule {
    pub const fn listed(name: &'static str) -> Self {
        Self {
            name,
            emission: Emission::Listed,
            guard: always,
            condition: nothing,
            limit: nothing,
            sublimit: nothing,
        }
    }

    pub const fn when_applicable(name: &'static str, guard: Guard) -> Self {
        Self {
            name,
            emission: Emission::WhenApplicable,
            guard,
            condition: nothing,
            limit: nothing,
            sublimit: nothing,
        }
    }

    pub const fn guarded_by(mut self, guard: Guard) -> Self {
        self.guard = guard;
        self
    }

    pub const fn condition(mut self, condition: Clause) -> Self {
        self.condition = condition;
        self
    }

    pub const fn limit(mut self, limit: Clause) -> Self {
        self.limit = limit;
        self
    }

    pub const fn sublimit(mut self, sublimit: Clause) -> Self {
        self.sublimit = sublimit;
        self
    }

    /// Evaluate the row. Clauses are only filled in when the guard holds.
    pub fn evaluate(&self, facts: &FactsRecord) -> Option<Coverage> {
        let required = (self.guard)(facts);
        if !required && self.emission == Emission::WhenApplicable {
            return None;
        }

        let (condition, limit, sublimit) = if required {
            (
                (self.condition)(facts),
                (self.limit)(facts),
                (self.sublimit)(facts),
            )
        } else {
            (None, None, None)
        };

        Some(Coverage {
            name: self.name.to_string(),
            required,
            condition,
            limit,
            sublimit,
        })
    }
}

pub(crate) fn evaluate_table(rules: &[CoverageRule], facts: &FactsRecord) -> Vec<Coverage> {
    rules.iter().filter_map(|rule| rule.evaluate(facts)).collect()
}
