use crate::advisory::facts::{FactsRecord, InstallationsType, StructureType};
use crate::advisory::recommendation::limits::{
    format_euros, resolve_cash_limit, resolve_electrical_damage_limit,
    resolve_robbery_capital_percentage,
};

use super::CoverageRule;

pub const INCENDIO: &str = "Incendio, Rayo y Explosión";
pub const RIESGOS_EXTENSIVOS: &str = "Riesgos Extensivos";
pub const DANOS_AGUA: &str = "Daños por Agua";
pub const ROTURA_CRISTALES: &str = "Rotura de Cristales";
pub const DANOS_ELECTRICOS: &str = "Daños Eléctricos";
pub const ROBO: &str = "Robo y Expoliación";
pub const BIENES_TERCEROS_CUSTODIA: &str = "Bienes de Terceros en Custodia";
pub const EXISTENCIAS_EN_TERCEROS: &str = "Existencias Propias en Poder de Terceros";
pub const BIENES_INTEMPERIE: &str = "Bienes a la Intemperie";
pub const CAMARAS_FRIGORIFICAS: &str = "Bienes en Cámaras Frigoríficas";
pub const PLACAS_SOLARES: &str = "Placas Solares";
pub const VEHICULOS_TERCEROS: &str = "Vehículos de Terceros Aparcados";
pub const BIENES_EMPLEADOS: &str = "Bienes de Empleados";
pub const AVERIA_MAQUINARIA: &str = "Avería de Maquinaria";
pub const DINERO_CAJA_FUERTE: &str = "Dinero en Caja Fuerte";
pub const DINERO_FUERA_CAJA: &str = "Dinero Fuera de Caja Fuerte";
pub const TRANSPORTADOR_FONDOS: &str = "Transportador de Fondos";
pub const RC_INMOBILIARIA: &str = "Responsabilidad Civil Inmobiliaria";
pub const RC_LOCATIVA: &str = "Responsabilidad Civil Locativa";

pub const AMPLIACION_DANOS: &str = "Ampliación Automática de Capitales - Daños Materiales";
pub const AMPLIACION_BENEFICIOS: &str = "Ampliación Automática de Capitales - Pérdida de Beneficios";
pub const VALOR_REPOSICION: &str = "Cláusula de Valor de Reposición a Nuevo";
pub const TODO_RIESGO: &str = "Todo Riesgo Accidental";
pub const LEASING: &str = "Cláusula de Beneficiario - Leasing";
pub const NOTA_MADERA: &str = "Nota: Estructura de Madera";
pub const NOTA_FRIGORIFICAS: &str = "Nota: Mantenimiento de Cámaras Frigoríficas";

const GLASS_BREAKAGE_LIMIT: &str = "6.000€";
const DAMAGE_EXTENSION: &str = "20%";
const PROFIT_EXTENSION: &str = "30%";

pub(crate) const COVERAGES: &[CoverageRule] = &[
    CoverageRule::listed(INCENDIO),
    CoverageRule::listed(RIESGOS_EXTENSIVOS),
    CoverageRule::listed(DANOS_AGUA),
    CoverageRule::listed(ROTURA_CRISTALES).limit(glass_limit),
    CoverageRule::listed(DANOS_ELECTRICOS).limit(electrical_limit),
    CoverageRule::listed(ROBO)
        .limit(robbery_limit)
        .condition(robbery_note),
    CoverageRule::when_applicable(BIENES_TERCEROS_CUSTODIA, |facts| {
        facts.capitales.existencias_terceros
    })
    .limit(|facts| declared(facts.capitales.valor_existencias_terceros)),
    CoverageRule::when_applicable(EXISTENCIAS_EN_TERCEROS, |facts| {
        facts.capitales.existencias_propias_terceros
    })
    .limit(|facts| declared(facts.capitales.valor_existencias_propias_terceros)),
    CoverageRule::when_applicable(BIENES_INTEMPERIE, |facts| {
        facts.capitales.existencias_intemperie
    })
    .limit(|facts| declared(facts.capitales.valor_existencias_intemperie)),
    CoverageRule::when_applicable(CAMARAS_FRIGORIFICAS, |facts| {
        facts.capitales.bienes_camaras_frigorificas
    })
    .limit(|facts| declared(facts.capitales.valor_bienes_camaras_frigorificas))
    .condition(refrigeration_note),
    CoverageRule::when_applicable(PLACAS_SOLARES, |facts| facts.construccion.placas_solares)
        .limit(|facts| declared(facts.construccion.valor_placas_solares)),
    CoverageRule::when_applicable(VEHICULOS_TERCEROS, |facts| {
        facts.capitales.vehiculos_terceros_aparcados
    })
    .limit(|facts| declared(facts.capitales.valor_vehiculos_terceros_aparcados)),
    CoverageRule::when_applicable(BIENES_EMPLEADOS, |facts| facts.capitales.bienes_empleados)
        .limit(|facts| declared(facts.capitales.valor_bienes_empleados)),
    CoverageRule::when_applicable(AVERIA_MAQUINARIA, |facts| facts.capitales.averia_maquinaria)
        .limit(|facts| declared(facts.capitales.valor_averia_maquinaria)),
    CoverageRule::when_applicable(DINERO_CAJA_FUERTE, |facts| {
        facts.capitales.dinero_caja_fuerte
    })
    .limit(|facts| Some(resolve_cash_limit(facts.capitales.valor_dinero_caja_fuerte))),
    CoverageRule::when_applicable(DINERO_FUERA_CAJA, |facts| facts.capitales.dinero_fuera_caja)
        .limit(|facts| Some(resolve_cash_limit(facts.capitales.valor_dinero_fuera_caja))),
    CoverageRule::when_applicable(TRANSPORTADOR_FONDOS, handles_cash).limit(transit_limit),
    CoverageRule::when_applicable(RC_INMOBILIARIA, |facts| {
        facts.capitales.responsabilidad_civil
            && facts.company.installations_type == InstallationsType::Propietario
    })
    .limit(|facts| declared(facts.capitales.valor_responsabilidad_civil)),
    CoverageRule::when_applicable(RC_LOCATIVA, |facts| {
        facts.capitales.responsabilidad_civil
            && facts.company.installations_type == InstallationsType::Inquilino
    })
    .limit(|facts| declared(facts.capitales.valor_responsabilidad_civil)),
];

pub(crate) const SPECIAL_CLAUSES: &[CoverageRule] = &[
    CoverageRule::when_applicable(AMPLIACION_DANOS, |_| true).limit(damage_extension),
    CoverageRule::when_applicable(AMPLIACION_BENEFICIOS, |facts| {
        facts.capitales.margen_bruto_anual > 0.0
    })
    .limit(profit_extension),
    CoverageRule::when_applicable(VALOR_REPOSICION, |_| true),
    CoverageRule::when_applicable(TODO_RIESGO, |facts| facts.capitales.todo_riesgo_accidental),
    CoverageRule::when_applicable(LEASING, |facts| facts.capitales.bienes_leasing)
        .condition(leasing_beneficiary),
    CoverageRule::when_applicable(NOTA_MADERA, |facts| {
        facts.construccion.estructura == StructureType::Madera
    })
    .condition(|_| {
        Some(
            "Estructura de madera: revisar medidas de protección contra incendios y \
             compartimentación"
                .to_string(),
        )
    }),
    CoverageRule::when_applicable(NOTA_FRIGORIFICAS, |facts| {
        facts.capitales.bienes_camaras_frigorificas
    })
    .condition(|_| {
        Some(
            "Se requiere contrato de mantenimiento vigente de las cámaras frigoríficas"
                .to_string(),
        )
    }),
];

/// Declared amount as the row limit. An undeclared amount renders as `0€`.
fn declared(amount: f64) -> Option<String> {
    Some(format_euros(amount))
}

fn glass_limit(_: &FactsRecord) -> Option<String> {
    Some(GLASS_BREAKAGE_LIMIT.to_string())
}

fn electrical_limit(facts: &FactsRecord) -> Option<String> {
    Some(resolve_electrical_damage_limit(facts.capitales.valor_edificio))
}

fn robbery_limit(facts: &FactsRecord) -> Option<String> {
    Some(resolve_robbery_capital_percentage(
        facts.capitales.total_content_capital(),
    ))
}

fn robbery_note(facts: &FactsRecord) -> Option<String> {
    Some(format!(
        "Sobre un capital total declarado de {}",
        format_euros(facts.capitales.total_content_capital())
    ))
}

fn refrigeration_note(facts: &FactsRecord) -> Option<String> {
    let capitals = &facts.capitales;
    let protections: Vec<&str> = [
        (capitals.camaras_alarma_temperatura, "alarma de temperatura"),
        (capitals.camaras_grupo_electrogeno, "grupo electrógeno"),
        (capitals.camaras_contrato_mantenimiento, "contrato de mantenimiento"),
    ]
    .into_iter()
    .filter_map(|(present, label)| present.then_some(label))
    .collect();

    if protections.is_empty() {
        Some("Sin protecciones específicas declaradas".to_string())
    } else {
        Some(format!("Protecciones: {}", protections.join(", ")))
    }
}

fn handles_cash(facts: &FactsRecord) -> bool {
    facts.capitales.dinero_caja_fuerte || facts.capitales.dinero_fuera_caja
}

fn transit_limit(facts: &FactsRecord) -> Option<String> {
    let capitals = &facts.capitales;
    let in_safe = if capitals.dinero_caja_fuerte {
        capitals.valor_dinero_caja_fuerte
    } else {
        0.0
    };
    let outside = if capitals.dinero_fuera_caja {
        capitals.valor_dinero_fuera_caja
    } else {
        0.0
    };
    Some(resolve_cash_limit(in_safe.max(outside)))
}

fn damage_extension(_: &FactsRecord) -> Option<String> {
    Some(DAMAGE_EXTENSION.to_string())
}

fn profit_extension(_: &FactsRecord) -> Option<String> {
    Some(PROFIT_EXTENSION.to_string())
}

fn leasing_beneficiary(facts: &FactsRecord) -> Option<String> {
    let leasing = &facts.capitales.leasing;
    Some(format!(
        "Beneficiario: {} (CIF {}), contrato {}, bien: {}",
        or_unstated(&leasing.arrendador),
        or_unstated(&leasing.cif),
        or_unstated(&leasing.contrato),
        or_unstated(&leasing.bien)
    ))
}

fn or_unstated(value: &str) -> &str {
    if value.trim().is_empty() {
        "no indicado"
    } else {
        value
    }
}
