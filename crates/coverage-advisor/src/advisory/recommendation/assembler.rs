use serde::{Deserialize, Serialize};

use crate::advisory::facts::cnae;
use crate::advisory::facts::{Construction, FactsRecord};

use super::limits::{format_euros, resolve_general_liability_limits};
use super::territory::resolve_territory;
use super::{evaluate_dm, evaluate_rc, InsuranceLine, LiabilityLimits, Recommendation};

/// Company profile as echoed back on every recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySnapshot {
    pub name: String,
    pub cif: String,
    pub cnae_code: String,
    pub activity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    pub company_type: String,
    pub billing: f64,
    pub employees: u32,
    pub installations_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSnapshot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cif: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionSnapshot {
    pub estructura: String,
    pub cubierta: String,
    pub cerramientos: String,
    pub camaras_frigorificas: bool,
    pub placas_solares: bool,
}

impl From<&Construction> for ConstructionSnapshot {
    fn from(construction: &Construction) -> Self {
        Self {
            estructura: construction.estructura.label().to_string(),
            cubierta: construction.cubierta.label().to_string(),
            cerramientos: construction.cerramientos.label().to_string(),
            camaras_frigorificas: construction.camaras_frigorificas,
            placas_solares: construction.placas_solares,
        }
    }
}

impl CompanySnapshot {
    fn from_facts(facts: &FactsRecord) -> Self {
        let company = &facts.company;
        let activity = if company.activity_description.trim().is_empty() {
            company.activity.clone()
        } else {
            company.activity_description.clone()
        };
        let owner = company
            .owner_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(|name| OwnerSnapshot {
                name: name.to_string(),
                cif: company
                    .owner_cif
                    .clone()
                    .filter(|cif| !cif.trim().is_empty()),
            });

        Self {
            name: company.name.clone(),
            cif: company.cif.clone(),
            cnae_code: company.cnae_code.clone(),
            activity,
            sector: cnae::lookup(&company.cnae_code).map(|entry| entry.sector.label().to_string()),
            company_type: facts.activity_detail.label().to_string(),
            billing: company.billing,
            employees: company.employees_number,
            installations_type: company.installations_type.label().to_string(),
            owner,
        }
    }
}

/// Build the recommendation for one line. Pure; calling it twice with the
/// same record yields equal output.
pub fn assemble(facts: &FactsRecord, line: InsuranceLine) -> Recommendation {
    let company = CompanySnapshot::from_facts(facts);
    let claims_history = claims_note(facts);

    match line {
        InsuranceLine::ResponsabilidadCivil => Recommendation {
            line,
            coverages: evaluate_rc(facts),
            territorial_scope: Some(resolve_territory(facts)),
            limits: Some(liability_limits(facts.company.billing)),
            special_clauses: Vec::new(),
            company,
            construction: None,
            protections: Vec::new(),
            claims_history,
        },
        InsuranceLine::DanosMateriales => {
            let evaluated = evaluate_dm(facts);
            Recommendation {
                line,
                coverages: evaluated.coverages,
                territorial_scope: None,
                limits: None,
                special_clauses: evaluated.special_clauses,
                company,
                construction: Some(ConstructionSnapshot::from(&facts.construccion)),
                protections: protection_labels(facts),
                claims_history,
            }
        }
    }
}

fn liability_limits(billing: f64) -> LiabilityLimits {
    let resolved = resolve_general_liability_limits(billing);
    let explanation = format!(
        "Para una facturación anual de {} se recomienda un límite general de {} con un sublímite por víctima de {}",
        format_euros(billing),
        resolved.general_limit,
        resolved.victim_sublimit
    );
    LiabilityLimits {
        general_limit: resolved.general_limit,
        victim_sublimit: resolved.victim_sublimit,
        explanation,
    }
}

fn with_detail(label: &str, detail: Option<&str>) -> String {
    match detail.map(str::trim).filter(|detail| !detail.is_empty()) {
        Some(detail) => format!("{label} ({detail})"),
        None => label.to_string(),
    }
}

/// Active fire and theft protections in questionnaire order, then water supply.
fn protection_labels(facts: &FactsRecord) -> Vec<String> {
    let fire = &facts.proteccion_incendios;
    let theft = &facts.proteccion_robo;
    let mut labels = Vec::new();

    if fire.extintores {
        labels.push("Extintores".to_string());
    }
    if fire.bocas_incendio {
        labels.push("Bocas de incendio equipadas".to_string());
    }
    if fire.deposito_bombeo {
        labels.push("Depósito y grupo de bombeo".to_string());
    }
    if fire.cobertura_total {
        labels.push("Cobertura total de la superficie".to_string());
    }
    if fire.columnas_hidrantes {
        labels.push(with_detail(
            "Columnas hidrantes",
            fire.columnas_hidrantes_tipo.as_deref(),
        ));
    }
    if fire.deteccion_automatica {
        labels.push(with_detail(
            "Detección automática",
            fire.deteccion_automatica_zonas.as_deref(),
        ));
    }
    if fire.rociadores {
        labels.push(with_detail(
            "Rociadores automáticos",
            fire.rociadores_zonas.as_deref(),
        ));
    }
    if theft.protecciones_fisicas {
        labels.push("Protecciones físicas".to_string());
    }
    if theft.vigilancia_propia {
        labels.push("Vigilancia propia".to_string());
    }
    if theft.alarma_conectada {
        labels.push("Alarma conectada a central".to_string());
    }
    if theft.camaras_circuito {
        labels.push("Circuito cerrado de cámaras".to_string());
    }

    labels.push(format!(
        "Suministro de agua: {}",
        fire.suministro_agua.label()
    ));
    labels
}

fn claims_note(facts: &FactsRecord) -> Option<String> {
    let claims = &facts.siniestralidad;
    if !claims.siniestros_ultimos_3_anos {
        return None;
    }
    Some(with_detail(
        "Siniestros declarados en los últimos 3 años",
        claims.detalle.as_deref(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::facts::{InstallationsType, StructureType, WaterSupply};

    #[test]
    fn rc_recommendation_carries_scope_and_limits_only() {
        let mut facts = FactsRecord::default();
        facts.company.billing = 2_500_000.0;
        let recommendation = assemble(&facts, InsuranceLine::ResponsabilidadCivil);

        assert_eq!(
            recommendation.territorial_scope.as_deref(),
            Some("España y Andorra")
        );
        let limits = recommendation.limits.expect("rc limits");
        assert_eq!(limits.general_limit, "1.000.000€");
        assert_eq!(limits.victim_sublimit, "600.000€");
        assert!(limits.explanation.contains("2.500.000€"));
        assert!(recommendation.special_clauses.is_empty());
        assert!(recommendation.construction.is_none());
        assert!(recommendation.protections.is_empty());
    }

    #[test]
    fn dm_recommendation_carries_snapshots() {
        let mut facts = FactsRecord::default();
        facts.construccion.estructura = StructureType::Metalica;
        facts.proteccion_incendios.extintores = true;
        facts.proteccion_incendios.rociadores = true;
        facts.proteccion_incendios.rociadores_zonas = Some("almacén".to_string());
        facts.proteccion_incendios.suministro_agua = WaterSupply::RedPublica;
        facts.proteccion_robo.alarma_conectada = true;

        let recommendation = assemble(&facts, InsuranceLine::DanosMateriales);
        assert!(recommendation.territorial_scope.is_none());
        assert!(recommendation.limits.is_none());
        assert_eq!(
            recommendation
                .construction
                .as_ref()
                .map(|construction| construction.estructura.as_str()),
            Some("Metálica")
        );
        assert_eq!(
            recommendation.protections,
            vec![
                "Extintores",
                "Rociadores automáticos (almacén)",
                "Alarma conectada a central",
                "Suministro de agua: Red pública",
            ]
        );
    }

    #[test]
    fn company_snapshot_resolves_sector_and_owner() {
        let mut facts = FactsRecord::default();
        facts.company.name = "Panadería Sol".to_string();
        facts.company.cnae_code = "1071".to_string();
        facts.company.activity = "Panadería".to_string();
        facts.company.installations_type = InstallationsType::Inquilino;
        facts.company.owner_name = Some("Lucía Martín".to_string());
        facts.company.owner_cif = Some("  ".to_string());

        let snapshot = assemble(&facts, InsuranceLine::ResponsabilidadCivil).company;
        assert_eq!(snapshot.sector.as_deref(), Some("Industria"));
        assert_eq!(snapshot.activity, "Panadería");
        assert_eq!(snapshot.installations_type, "No propietario");
        assert_eq!(snapshot.company_type, "servicios");
        assert_eq!(
            snapshot.owner,
            Some(OwnerSnapshot {
                name: "Lucía Martín".to_string(),
                cif: None,
            })
        );
    }

    #[test]
    fn claims_note_only_when_declared() {
        let mut facts = FactsRecord::default();
        assert!(assemble(&facts, InsuranceLine::DanosMateriales)
            .claims_history
            .is_none());

        facts.siniestralidad.siniestros_ultimos_3_anos = true;
        facts.siniestralidad.detalle = Some("Inundación en 2023".to_string());
        assert_eq!(
            assemble(&facts, InsuranceLine::DanosMateriales)
                .claims_history
                .as_deref(),
            Some("Siniestros declarados en los últimos 3 años (Inundación en 2023)")
        );
    }

    #[test]
    fn assembling_twice_is_identical() {
        let mut facts = FactsRecord::default();
        facts.company.billing = 900_000.0;
        facts.capitales.dinero_caja_fuerte = true;
        facts.capitales.valor_dinero_caja_fuerte = 800.0;
        for line in InsuranceLine::ALL {
            assert_eq!(assemble(&facts, line), assemble(&facts, line));
        }
    }
}
