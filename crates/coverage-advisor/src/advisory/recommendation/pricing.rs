//! Illustrative three-tier price estimates per line.
//!
//! Prices are a base amount scaled by cumulative multiplicative factors,
//! rounded to whole euros and floored per tier. Nothing here is quoted against
//! an insurer.

use serde::{Deserialize, Serialize};

use crate::advisory::facts::{ActivityDetail, FactsRecord};

use super::limits::{
    band, format_euros, pick, resolve_electrical_damage_limit_extended,
    resolve_general_liability_limits, resolve_robbery_coverage_limit, Band, Upper,
};
use super::territory::{
    resolve_territory, SCOPE_EUROPEAN_UNION, SCOPE_SPAIN_ANDORRA, SCOPE_WORLDWIDE_EXCLUDING_USA,
    SCOPE_WORLDWIDE_WITH_USA,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTier {
    pub name: String,
    pub price: u32,
    pub highlights: Vec<String>,
}

const TIER_NAMES: [&str; 3] = ["Básico", "Estándar", "Premium"];

const RC_BASE: [f64; 3] = [350.0, 550.0, 850.0];
const RC_FLOOR: [u32; 3] = [300, 450, 700];

const DM_MULTIPLIER: [f64; 3] = [0.85, 1.0, 1.3];
const DM_FLOOR: [u32; 3] = [250, 400, 600];

const BILLING_FACTOR: &[Band<f64>] = &[
    band(Upper::Below(1_000_000.0), 1.0),
    band(Upper::AtMost(3_000_000.0), 1.3),
    band(Upper::AtMost(10_000_000.0), 1.7),
    band(Upper::Unbounded, 2.2),
];

const EMPLOYEE_FACTOR: &[Band<f64>] = &[
    band(Upper::AtMost(10.0), 1.0),
    band(Upper::AtMost(50.0), 1.2),
    band(Upper::AtMost(250.0), 1.5),
    band(Upper::Unbounded, 2.0),
];

const MANUFACTURING_FACTOR: f64 = 1.25;
const CLAIMS_FACTOR: f64 = 1.1;

/// Annual premium rate over total insured value.
const DM_RATE: &[Band<f64>] = &[
    band(Upper::AtMost(300_000.0), 0.0015),
    band(Upper::AtMost(1_000_000.0), 0.0012),
    band(Upper::AtMost(5_000_000.0), 0.0010),
    band(Upper::Unbounded, 0.0008),
];

const RISK_FACTOR_FLOOR: f64 = 0.7;

fn territory_factor(scope: &str) -> f64 {
    match scope {
        SCOPE_WORLDWIDE_WITH_USA => 1.8,
        SCOPE_WORLDWIDE_EXCLUDING_USA => 1.35,
        SCOPE_EUROPEAN_UNION => 1.15,
        SCOPE_SPAIN_ANDORRA => 1.0,
        _ => 1.0,
    }
}

fn rc_factor(facts: &FactsRecord, scope: &str) -> f64 {
    let company_type = match facts.activity_detail {
        ActivityDetail::Manufactura(_) => MANUFACTURING_FACTOR,
        ActivityDetail::Servicios(_) => 1.0,
    };
    let claims = if facts.siniestralidad.siniestros_ultimos_3_anos {
        CLAIMS_FACTOR
    } else {
        1.0
    };

    pick(BILLING_FACTOR, facts.company.billing).1
        * pick(EMPLOYEE_FACTOR, f64::from(facts.company.employees_number)).1
        * territory_factor(scope)
        * company_type
        * claims
}

/// Protection discounts, floored so heavily protected risks still pay.
pub(crate) fn risk_reduction_factor(facts: &FactsRecord) -> f64 {
    let fire = &facts.proteccion_incendios;
    let theft = &facts.proteccion_robo;
    let discounts = [
        (fire.extintores, 0.05),
        (fire.bocas_incendio, 0.05),
        (fire.deteccion_automatica, 0.05),
        (fire.rociadores, 0.10),
        (theft.alarma_conectada, 0.05),
        (theft.vigilancia_propia, 0.03),
        (theft.camaras_circuito, 0.02),
        (theft.protecciones_fisicas, 0.03),
    ];
    let factor: f64 = discounts
        .iter()
        .filter(|(active, _)| *active)
        .fold(1.0_f64, |factor, (_, discount)| factor - discount);
    factor.max(RISK_FACTOR_FLOOR)
}

fn to_price(raw: f64, floor: u32) -> u32 {
    if !raw.is_finite() {
        return floor;
    }
    let rounded = raw.round();
    if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else if rounded <= f64::from(floor) {
        floor
    } else {
        rounded as u32
    }
}

pub fn estimate_rc_products(facts: &FactsRecord) -> [ProductTier; 3] {
    let scope = resolve_territory(facts);
    let factor = rc_factor(facts, &scope);
    let limits = resolve_general_liability_limits(facts.company.billing);
    let manufacturer = facts.manufacturing().is_some();

    let basic = vec![
        format!("Límite general {}", limits.general_limit),
        "RC Explotación y Patronal".to_string(),
    ];
    let mut standard = basic.clone();
    standard.push(format!("Sublímite por víctima {}", limits.victim_sublimit));
    standard.push(format!("Ámbito: {scope}"));
    if manufacturer {
        standard.push("RC Productos y Post-trabajos".to_string());
    } else {
        standard.push("RC Trabajos Terminados".to_string());
    }
    let mut premium = standard.clone();
    premium.push("Daños a bienes de terceros y colindantes".to_string());
    premium.push("Defensa jurídica y fianzas".to_string());

    let highlights = [basic, standard, premium];
    build_tiers(highlights, |index| {
        to_price(RC_BASE[index] * factor, RC_FLOOR[index])
    })
}

pub fn estimate_dm_products(facts: &FactsRecord) -> [ProductTier; 3] {
    let capitals = &facts.capitales;
    let insured_value = capitals.total_insured_value();
    let rate = *pick(DM_RATE, insured_value).1;
    let base = insured_value * rate * risk_reduction_factor(facts);

    let electrical = resolve_electrical_damage_limit_extended(capitals.valor_edificio);
    let robbery = resolve_robbery_coverage_limit(capitals.valor_edificio);

    let basic = vec![
        format!("Capital asegurado {}", format_euros(insured_value)),
        "Incendio, Rayo y Explosión".to_string(),
        "Riesgos Extensivos y Daños por Agua".to_string(),
    ];
    let mut standard = basic.clone();
    standard.push(format!("Daños Eléctricos hasta {electrical}"));
    standard.push(format!("Robo y Expoliación hasta {robbery}"));
    let mut premium = standard.clone();
    premium.push("Rotura de Cristales".to_string());
    premium.push("Cláusula de Valor de Reposición a Nuevo".to_string());
    if capitals.margen_bruto_anual > 0.0 {
        premium.push(format!(
            "Pérdida de Beneficios sobre {}",
            format_euros(capitals.margen_bruto_anual)
        ));
    }

    let highlights = [basic, standard, premium];
    build_tiers(highlights, |index| {
        to_price(base * DM_MULTIPLIER[index], DM_FLOOR[index])
    })
}

fn build_tiers(
    highlights: [Vec<String>; 3],
    price: impl Fn(usize) -> u32,
) -> [ProductTier; 3] {
    let mut index = 0;
    highlights.map(|highlights| {
        let tier = ProductTier {
            name: TIER_NAMES[index].to_string(),
            price: price(index),
            highlights,
        };
        index += 1;
        tier
    })
}
