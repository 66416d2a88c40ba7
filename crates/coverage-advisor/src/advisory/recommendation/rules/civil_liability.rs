use crate::advisory::facts::{
    ActivityDetail, FactsRecord, InstallationsType, ManufacturingActivity, ProductStage,
    ServiceActivity,
};

use super::CoverageRule;
use crate::advisory::recommendation::limits::resolve_general_liability_limits;

pub const EXPLOTACION: &str = "Responsabilidad Civil por Explotación";
pub const PATRONAL: &str = "Responsabilidad Civil Patronal";
pub const CRUZADA: &str = "Responsabilidad Civil Cruzada";
pub const CONDUCCIONES: &str = "Daños a Conducciones";
pub const TRANSFORMADORES: &str = "Daños a Transformadores o Receptores de Energía";
pub const BIENES_TERCEROS: &str = "Daños a Bienes de Terceros";
pub const SUBSIDIARIA_SUBCONTRATISTAS: &str =
    "Responsabilidad Civil Subsidiaria de Subcontratistas";
pub const VEHICULOS_TERCEROS: &str = "Daños a Vehículos de Terceros Aparcados";
pub const PERSONAL_TECNICO: &str = "Responsabilidad Civil del Personal Técnico";
pub const BIENES_PREEXISTENTES: &str = "Daños a Bienes Preexistentes";
pub const DEMOLICION: &str = "Trabajos de Demolición";
pub const FERIAS: &str = "Participación en Ferias y Exposiciones";
pub const COLINDANTES: &str = "Daños a Colindantes";
pub const INSTALACIONES_AEREAS: &str = "Daños a Instalaciones Aéreas y Subterráneas";
pub const BIENES_EMPLEADOS: &str = "Daños a Bienes de Empleados";
pub const TRABAJOS_TERMINADOS: &str = "Responsabilidad Civil por Trabajos Terminados";
pub const LOCATIVA: &str = "Responsabilidad Civil Locativa";
pub const INMOBILIARIA: &str = "Responsabilidad Civil Inmobiliaria";
pub const PRODUCTOS: &str = "Responsabilidad Civil por Productos y Post-trabajos";
pub const UNION_MEZCLA: &str = "Responsabilidad Civil por Unión y Mezcla";
pub const GASTOS_RETIRADA: &str = "Gastos de Retirada";

pub(crate) const RULES: &[CoverageRule] = &[
    CoverageRule::listed(EXPLOTACION),
    CoverageRule::listed(PATRONAL).sublimit(victim_sublimit),
    CoverageRule::listed(CRUZADA)
        .guarded_by(uses_subcontractors)
        .condition(subcontractors_note),
    CoverageRule::listed(CONDUCCIONES),
    CoverageRule::listed(TRANSFORMADORES)
        .guarded_by(works_on_electronic_equipment)
        .condition(electronic_equipment_note),
    CoverageRule::listed(BIENES_TERCEROS)
        .guarded_by(stores_third_party_goods)
        .condition(third_party_goods_note),
    CoverageRule::listed(SUBSIDIARIA_SUBCONTRATISTAS)
        .guarded_by(uses_subcontractors)
        .condition(subcontractors_note),
    CoverageRule::listed(VEHICULOS_TERCEROS)
        .guarded_by(hosts_third_party_vehicles)
        .condition(third_party_vehicles_note),
    CoverageRule::listed(PERSONAL_TECNICO)
        .guarded_by(has_technical_staff)
        .condition(technical_staff_note),
    CoverageRule::listed(BIENES_PREEXISTENTES),
    CoverageRule::listed(DEMOLICION)
        .guarded_by(works_off_premises)
        .condition(off_premises_note),
    CoverageRule::listed(FERIAS),
    CoverageRule::listed(COLINDANTES),
    CoverageRule::listed(INSTALACIONES_AEREAS)
        .guarded_by(works_off_premises)
        .condition(off_premises_note),
    CoverageRule::listed(BIENES_EMPLEADOS)
        .guarded_by(keeps_employee_property)
        .condition(employee_property_note),
    CoverageRule::listed(TRABAJOS_TERMINADOS)
        .guarded_by(works_off_premises)
        .condition(off_premises_note),
    CoverageRule::listed(LOCATIVA)
        .guarded_by(is_tenant)
        .condition(tenant_note),
    CoverageRule::listed(INMOBILIARIA)
        .guarded_by(is_owner)
        .condition(owner_note),
    CoverageRule::listed(PRODUCTOS)
        .guarded_by(makes_products)
        .condition(products_note),
    CoverageRule::listed(UNION_MEZCLA)
        .guarded_by(makes_intermediate_products)
        .condition(intermediate_products_note),
    CoverageRule::listed(GASTOS_RETIRADA)
        .guarded_by(makes_consumables)
        .condition(consumables_note),
];

fn services(facts: &FactsRecord) -> Option<&ServiceActivity> {
    facts.services()
}

fn manufacturing(facts: &FactsRecord) -> Option<&ManufacturingActivity> {
    facts.manufacturing()
}

fn note(text: &str) -> Option<String> {
    Some(text.to_string())
}

/// Employer's liability is capped per injured worker at the billing tier's victim sublimit.
fn victim_sublimit(facts: &FactsRecord) -> Option<String> {
    Some(resolve_general_liability_limits(facts.company.billing).victim_sublimit)
}

fn uses_subcontractors(facts: &FactsRecord) -> bool {
    services(facts).is_some_and(|detail| detail.trabajos_subcontratistas)
}

fn subcontractors_note(_: &FactsRecord) -> Option<String> {
    note("Trabaja con subcontratistas")
}

fn works_on_electronic_equipment(facts: &FactsRecord) -> bool {
    services(facts).is_some_and(|detail| detail.trabajo_equipos_electronicos)
}

fn electronic_equipment_note(_: &FactsRecord) -> Option<String> {
    note("Trabaja sobre equipos electrónicos o instalaciones eléctricas de terceros")
}

fn stores_third_party_goods(facts: &FactsRecord) -> bool {
    facts.company.almacena_bienes_terceros
}

fn third_party_goods_note(_: &FactsRecord) -> Option<String> {
    note("Almacena bienes de terceros en sus instalaciones")
}

fn hosts_third_party_vehicles(facts: &FactsRecord) -> bool {
    facts.company.vehiculos_terceros_aparcados
}

fn third_party_vehicles_note(_: &FactsRecord) -> Option<String> {
    note("Hay vehículos de terceros aparcados en sus instalaciones")
}

fn has_technical_staff(facts: &FactsRecord) -> bool {
    match &facts.activity_detail {
        ActivityDetail::Manufactura(detail) => detail.tiene_empleados_tecnicos,
        ActivityDetail::Servicios(detail) => detail.empleados_tecnicos,
    }
}

fn technical_staff_note(_: &FactsRecord) -> Option<String> {
    note("Cuenta con empleados técnicos")
}

fn works_off_premises(facts: &FactsRecord) -> bool {
    services(facts).is_some_and(|detail| detail.trabajos_fuera_instalaciones)
}

fn off_premises_note(_: &FactsRecord) -> Option<String> {
    note("Realiza trabajos fuera de sus instalaciones")
}

fn keeps_employee_property(facts: &FactsRecord) -> bool {
    facts.company.bienes_empleados
}

fn employee_property_note(_: &FactsRecord) -> Option<String> {
    note("Custodia bienes de sus empleados")
}

fn is_tenant(facts: &FactsRecord) -> bool {
    facts.company.installations_type == InstallationsType::Inquilino
}

fn tenant_note(_: &FactsRecord) -> Option<String> {
    note("Las instalaciones no son de su propiedad")
}

fn is_owner(facts: &FactsRecord) -> bool {
    facts.company.installations_type == InstallationsType::Propietario
}

fn owner_note(_: &FactsRecord) -> Option<String> {
    note("Es propietario de las instalaciones")
}

// Every manufacturer qualifies; the consumption flag only sharpens the note.
fn makes_products(facts: &FactsRecord) -> bool {
    manufacturing(facts).is_some()
}

fn products_note(facts: &FactsRecord) -> Option<String> {
    if makes_consumables(facts) {
        note("Fabrica productos destinados al consumo humano")
    } else {
        note("Fabrica y comercializa productos")
    }
}

fn makes_intermediate_products(facts: &FactsRecord) -> bool {
    manufacturing(facts)
        .is_some_and(|detail| detail.producto_final_o_intermedio == ProductStage::Intermedio)
}

fn intermediate_products_note(_: &FactsRecord) -> Option<String> {
    note("Fabrica productos intermedios que se incorporan a productos de terceros")
}

fn makes_consumables(facts: &FactsRecord) -> bool {
    manufacturing(facts).is_some_and(|detail| detail.producto_consumo_humano)
}

fn consumables_note(_: &FactsRecord) -> Option<String> {
    note("Fabrica productos destinados al consumo humano")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::recommendation::rules::evaluate_table;

    fn required_names(facts: &FactsRecord) -> Vec<String> {
        evaluate_table(RULES, facts)
            .into_iter()
            .filter(|coverage| coverage.required)
            .map(|coverage| coverage.name)
            .collect()
    }

    fn services_with(configure: impl FnOnce(&mut ServiceActivity)) -> FactsRecord {
        let mut detail = ServiceActivity::default();
        configure(&mut detail);
        FactsRecord {
            activity_detail: ActivityDetail::Servicios(detail),
            ..FactsRecord::default()
        }
    }

    #[test]
    fn default_facts_require_only_unconditional_rows() {
        let coverages = evaluate_table(RULES, &FactsRecord::default());
        assert_eq!(coverages.len(), RULES.len());

        let required = required_names(&FactsRecord::default());
        assert_eq!(
            required,
            vec![
                EXPLOTACION,
                PATRONAL,
                CONDUCCIONES,
                BIENES_PREEXISTENTES,
                FERIAS,
                COLINDANTES
            ]
        );
        assert!(coverages
            .iter()
            .filter(|coverage| !coverage.required)
            .all(|coverage| coverage.condition.is_none()));
    }

    #[test]
    fn employer_liability_carries_victim_sublimit() {
        let sublimit_at = |billing: f64| {
            let mut facts = FactsRecord::default();
            facts.company.billing = billing;
            evaluate_table(RULES, &facts)
                .into_iter()
                .find(|coverage| coverage.name == PATRONAL)
                .and_then(|coverage| coverage.sublimit)
        };
        assert_eq!(sublimit_at(0.0).as_deref(), Some("450.000€"));
        assert_eq!(sublimit_at(5_000_000.0).as_deref(), Some("600.000€"));
        assert_eq!(sublimit_at(20_000_000.0).as_deref(), Some("900.000€"));

        let coverages = evaluate_table(RULES, &FactsRecord::default());
        assert!(coverages
            .iter()
            .filter(|coverage| coverage.name != PATRONAL)
            .all(|coverage| coverage.sublimit.is_none()));
    }

    #[test]
    fn subcontracting_drives_cross_and_subsidiary_liability() {
        let facts = services_with(|detail| detail.trabajos_subcontratistas = true);
        let coverages = evaluate_table(RULES, &facts);

        for name in [CRUZADA, SUBSIDIARIA_SUBCONTRATISTAS] {
            let coverage = coverages
                .iter()
                .find(|coverage| coverage.name == name)
                .expect("row listed");
            assert!(coverage.required, "{name} should be required");
            assert_eq!(
                coverage.condition.as_deref(),
                Some("Trabaja con subcontratistas")
            );
        }
    }

    #[test]
    fn off_premises_work_drives_three_rows() {
        let facts = services_with(|detail| detail.trabajos_fuera_instalaciones = true);
        let required = required_names(&facts);
        assert!(required.iter().any(|name| name == DEMOLICION));
        assert!(required.iter().any(|name| name == INSTALACIONES_AEREAS));
        assert!(required.iter().any(|name| name == TRABAJOS_TERMINADOS));
        assert!(!required.iter().any(|name| name == PRODUCTOS));
    }

    #[test]
    fn technical_staff_reads_either_branch() {
        let facts = services_with(|detail| detail.empleados_tecnicos = true);
        assert!(required_names(&facts).iter().any(|name| name == PERSONAL_TECNICO));

        let facts = FactsRecord {
            activity_detail: ActivityDetail::Manufactura(ManufacturingActivity {
                tiene_empleados_tecnicos: true,
                ..ManufacturingActivity::default()
            }),
            ..FactsRecord::default()
        };
        assert!(required_names(&facts).iter().any(|name| name == PERSONAL_TECNICO));
    }

    #[test]
    fn other_installations_trigger_neither_tenure_row() {
        let mut facts = FactsRecord::default();
        facts.company.installations_type = InstallationsType::Otros;
        let required = required_names(&facts);
        assert!(!required.iter().any(|name| name == LOCATIVA));
        assert!(!required.iter().any(|name| name == INMOBILIARIA));
    }

    #[test]
    fn manufacturing_guards() {
        let facts = FactsRecord {
            activity_detail: ActivityDetail::Manufactura(ManufacturingActivity {
                producto_consumo_humano: true,
                producto_final_o_intermedio: ProductStage::Intermedio,
                ..ManufacturingActivity::default()
            }),
            ..FactsRecord::default()
        };
        let coverages = evaluate_table(RULES, &facts);
        let products = coverages
            .iter()
            .find(|coverage| coverage.name == PRODUCTOS)
            .expect("row listed");
        assert!(products.required);
        assert_eq!(
            products.condition.as_deref(),
            Some("Fabrica productos destinados al consumo humano")
        );

        let required = required_names(&facts);
        assert!(required.iter().any(|name| name == UNION_MEZCLA));
        assert!(required.iter().any(|name| name == GASTOS_RETIRADA));
        assert!(!required.iter().any(|name| name == CRUZADA));
    }
}
