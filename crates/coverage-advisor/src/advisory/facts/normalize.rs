//! Lenient conversion of raw questionnaire JSON into a [`FactsRecord`].
//!
//! The form layer owns shape validation, so this step never fails: absent
//! values take their documented default and mistyped values are coerced or
//! defaulted. Each coercion is reported as a [`FactsWarning`] so strict
//! deployments can surface them without changing the resulting record.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::domain::{
    fold, ActivityDetail, Capitals, ClaimsHistory, CompanyProfile, Construction,
    DistributionRegion, EnclosureType, FactsRecord, FireProtection, InstallationsType,
    LeasingDetail, ManufacturingActivity, ProductStage, RequestedCoverage, RoofType,
    ServiceActivity, StructureType, TheftProtection, WaterSupply,
};

/// A single coercion applied while reading a malformed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactsWarning {
    pub path: String,
    pub message: String,
}

/// Normalized record plus the coercions applied to produce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFacts {
    pub facts: FactsRecord,
    pub warnings: Vec<FactsWarning>,
}

impl NormalizedFacts {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Fill every field of the facts record from `raw`, defaulting anything
/// missing or unusable.
pub fn normalize_facts(raw: &Value) -> NormalizedFacts {
    let mut reader = FactsReader::default();

    let root = match raw {
        Value::Object(map) => Some(map),
        Value::Null => None,
        other => {
            reader.warn("", format!("expected an object, found {}", kind(other)));
            None
        }
    };
    let root = Section {
        path: String::new(),
        fields: root,
    };

    let section = reader.section(&root, "company");
    let company = reader.company(&section);
    let activity_detail = reader.activity_detail(&root);
    let territorio = reader
        .optional_text(&root, "territorio")
        .filter(|value| !value.trim().is_empty());
    let coberturas_solicitadas =
        reader.set_of(&root, "coberturas_solicitadas", RequestedCoverage::parse);
    let section = reader.section(&root, "construccion");
    let construccion = reader.construction(&section);
    let section = reader.section(&root, "proteccion_incendios");
    let proteccion_incendios = reader.fire_protection(&section);
    let section = reader.section(&root, "proteccion_robo");
    let proteccion_robo = reader.theft_protection(&section);
    let section = reader.section(&root, "capitales");
    let capitales = reader.capitals(&section);
    let section = reader.section(&root, "siniestralidad");
    let siniestralidad = reader.claims(&section);

    NormalizedFacts {
        facts: FactsRecord {
            company,
            activity_detail,
            territorio,
            coberturas_solicitadas,
            construccion,
            proteccion_incendios,
            proteccion_robo,
            capitales,
            siniestralidad,
        },
        warnings: reader.warnings,
    }
}

struct Section<'a> {
    path: String,
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> Section<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields
            .and_then(|fields| fields.get(key))
            .filter(|value| !value.is_null())
    }

    fn field_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }
}

#[derive(Default)]
struct FactsReader {
    warnings: Vec<FactsWarning>,
}

impl FactsReader {
    fn warn(&mut self, path: &str, message: String) {
        self.warnings.push(FactsWarning {
            path: path.to_string(),
            message,
        });
    }

    fn section<'a>(&mut self, parent: &Section<'a>, key: &'static str) -> Section<'a> {
        let fields = match parent.get(key) {
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                self.warn(
                    &parent.field_path(key),
                    format!("expected an object, found {}; using defaults", kind(other)),
                );
                None
            }
            None => None,
        };
        Section {
            path: parent.field_path(key),
            fields,
        }
    }

    fn flag(&mut self, section: &Section<'_>, key: &str) -> bool {
        let Some(value) = section.get(key) else {
            return false;
        };
        match value {
            Value::Bool(flag) => *flag,
            other => {
                let coerced = coerce_flag(other);
                let path = section.field_path(key);
                match coerced {
                    Some(flag) => {
                        self.warn(&path, format!("coerced {} to boolean {flag}", kind(other)))
                    }
                    None => self.warn(
                        &path,
                        format!("expected a boolean, found {}; using false", kind(other)),
                    ),
                }
                coerced.unwrap_or(false)
            }
        }
    }

    fn amount(&mut self, section: &Section<'_>, key: &str) -> f64 {
        let Some(value) = section.get(key) else {
            return 0.0;
        };
        let path = section.field_path(key);
        let parsed = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(raw) => {
                let parsed = parse_amount(raw);
                if let Some(amount) = parsed {
                    self.warn(&path, format!("coerced string '{raw}' to number {amount}"));
                }
                parsed
            }
            _ => None,
        };

        match parsed {
            Some(amount) if amount.is_finite() && amount >= 0.0 => amount,
            Some(amount) => {
                self.warn(&path, format!("amount {amount} is not usable; using 0"));
                0.0
            }
            None => {
                self.warn(
                    &path,
                    format!("expected a number, found {}; using 0", kind(value)),
                );
                0.0
            }
        }
    }

    fn count(&mut self, section: &Section<'_>, key: &str) -> u32 {
        let amount = self.amount(section, key);
        amount.round().min(u32::MAX as f64) as u32
    }

    fn text(&mut self, section: &Section<'_>, key: &str) -> String {
        self.optional_text(section, key).unwrap_or_default()
    }

    fn optional_text(&mut self, section: &Section<'_>, key: &str) -> Option<String> {
        match section.get(key)? {
            Value::String(raw) => Some(raw.trim().to_string()),
            Value::Number(number) => {
                self.warn(
                    &section.field_path(key),
                    format!("coerced number {number} to text"),
                );
                Some(number.to_string())
            }
            other => {
                self.warn(
                    &section.field_path(key),
                    format!("expected text, found {}; ignoring", kind(other)),
                );
                None
            }
        }
    }

    fn choice<T: Default>(
        &mut self,
        section: &Section<'_>,
        key: &str,
        parse: fn(&str) -> Option<T>,
    ) -> T {
        let Some(raw) = self.optional_text(section, key) else {
            return T::default();
        };
        if raw.is_empty() {
            return T::default();
        }
        match parse(&raw) {
            Some(value) => value,
            None => {
                self.warn(
                    &section.field_path(key),
                    format!("unrecognised value '{raw}'; using default"),
                );
                T::default()
            }
        }
    }

    fn set_of<T: Ord>(
        &mut self,
        section: &Section<'_>,
        key: &str,
        parse: fn(&str) -> Option<T>,
    ) -> BTreeSet<T> {
        let path = section.field_path(key);
        let mut items = BTreeSet::new();
        let values: Vec<&Value> = match section.get(key) {
            None => return items,
            Some(Value::Array(values)) => values.iter().collect(),
            Some(single @ Value::String(_)) => {
                self.warn(&path, "coerced single value to a list".to_string());
                vec![single]
            }
            Some(other) => {
                self.warn(
                    &path,
                    format!("expected a list, found {}; using empty list", kind(other)),
                );
                return items;
            }
        };

        for value in values {
            match value.as_str().and_then(parse) {
                Some(item) => {
                    items.insert(item);
                }
                None => self.warn(&path, format!("ignored unrecognised entry {value}")),
            }
        }
        items
    }

    fn company(&mut self, section: &Section<'_>) -> CompanyProfile {
        CompanyProfile {
            name: self.text(section, "name"),
            cif: self.text(section, "cif"),
            cnae_code: self.text(section, "cnae_code"),
            activity: self.text(section, "activity"),
            activity_description: self.text(section, "activity_description"),
            billing: self.amount(section, "billing"),
            employees_number: self.count(section, "employees_number"),
            m2_installations: self.amount(section, "m2_installations"),
            installations_type: self.choice(
                section,
                "installations_type",
                InstallationsType::parse,
            ),
            almacena_bienes_terceros: self.flag(section, "almacena_bienes_terceros"),
            vehiculos_terceros_aparcados: self.flag(section, "vehiculos_terceros_aparcados"),
            bienes_empleados: self.flag(section, "bienes_empleados"),
            owner_name: self
                .optional_text(section, "owner_name")
                .filter(|value| !value.is_empty()),
            owner_cif: self
                .optional_text(section, "owner_cif")
                .filter(|value| !value.is_empty()),
        }
    }

    /// Accepts both the tagged `activity_detail` object and the loose shape
    /// where `empresa_tipo` sits at the root next to per-type sub-objects.
    fn activity_detail(&mut self, root: &Section<'_>) -> ActivityDetail {
        let tagged = self.section(root, "activity_detail");
        let raw_kind = self
            .optional_text(&tagged, "empresa_tipo")
            .or_else(|| self.optional_text(root, "empresa_tipo"))
            .map(|raw| fold(&raw));

        let kind = match raw_kind.as_deref() {
            Some("manufactura") => "manufactura",
            Some("servicios") => "servicios",
            Some(other) => {
                self.warn(
                    "activity_detail.empresa_tipo",
                    format!("unrecognised company type '{other}'; using servicios"),
                );
                "servicios"
            }
            None => {
                self.warn(
                    "activity_detail.empresa_tipo",
                    "company type missing; using servicios".to_string(),
                );
                "servicios"
            }
        };

        if kind == "manufactura" {
            let detail = self.detail_section(root, tagged, "manufactura");
            ActivityDetail::Manufactura(self.manufacturing(&detail))
        } else {
            let detail = self.detail_section(root, tagged, "servicios");
            ActivityDetail::Servicios(self.services(&detail))
        }
    }

    fn detail_section<'a>(
        &mut self,
        root: &Section<'a>,
        tagged: Section<'a>,
        key: &'static str,
    ) -> Section<'a> {
        if let Some(Value::Object(_)) = root.get(key) {
            self.section(root, key)
        } else {
            tagged
        }
    }

    fn manufacturing(&mut self, section: &Section<'_>) -> ManufacturingActivity {
        ManufacturingActivity {
            producto_consumo_humano: self.flag(section, "producto_consumo_humano"),
            tiene_empleados_tecnicos: self.flag(section, "tiene_empleados_tecnicos"),
            producto_final_o_intermedio: self.choice(
                section,
                "producto_final_o_intermedio",
                ProductStage::parse,
            ),
            distribucion: self.set_of(section, "distribucion", DistributionRegion::parse),
            matriz_en_espana: self.flag(section, "matriz_en_espana"),
            filiales: self.set_of(section, "filiales", DistributionRegion::parse),
        }
    }

    fn services(&mut self, section: &Section<'_>) -> ServiceActivity {
        ServiceActivity {
            trabajos_fuera_instalaciones: self.flag(section, "trabajos_fuera_instalaciones"),
            corte_soldadura: self.flag(section, "corte_soldadura"),
            trabajo_equipos_electronicos: self.flag(section, "trabajo_equipos_electronicos"),
            empleados_tecnicos: self.flag(section, "empleados_tecnicos"),
            trabajos_subcontratistas: self.flag(section, "trabajos_subcontratistas"),
        }
    }

    fn construction(&mut self, section: &Section<'_>) -> Construction {
        Construction {
            estructura: self.choice(section, "estructura", StructureType::parse),
            cubierta: self.choice(section, "cubierta", RoofType::parse),
            cerramientos: self.choice(section, "cerramientos", EnclosureType::parse),
            camaras_frigorificas: self.flag(section, "camaras_frigorificas"),
            placas_solares: self.flag(section, "placas_solares"),
            valor_placas_solares: self.amount(section, "valor_placas_solares"),
        }
    }

    fn fire_protection(&mut self, section: &Section<'_>) -> FireProtection {
        FireProtection {
            extintores: self.flag(section, "extintores"),
            bocas_incendio: self.flag(section, "bocas_incendio"),
            deposito_bombeo: self.flag(section, "deposito_bombeo"),
            cobertura_total: self.flag(section, "cobertura_total"),
            columnas_hidrantes: self.flag(section, "columnas_hidrantes"),
            columnas_hidrantes_tipo: self.optional_text(section, "columnas_hidrantes_tipo"),
            deteccion_automatica: self.flag(section, "deteccion_automatica"),
            deteccion_automatica_zonas: self
                .optional_text(section, "deteccion_automatica_zonas"),
            rociadores: self.flag(section, "rociadores"),
            rociadores_zonas: self.optional_text(section, "rociadores_zonas"),
            suministro_agua: self.choice(section, "suministro_agua", WaterSupply::parse),
        }
    }

    fn theft_protection(&mut self, section: &Section<'_>) -> TheftProtection {
        TheftProtection {
            protecciones_fisicas: self.flag(section, "protecciones_fisicas"),
            vigilancia_propia: self.flag(section, "vigilancia_propia"),
            alarma_conectada: self.flag(section, "alarma_conectada"),
            camaras_circuito: self.flag(section, "camaras_circuito"),
        }
    }

    fn capitals(&mut self, section: &Section<'_>) -> Capitals {
        let leasing = self.section(section, "leasing");
        Capitals {
            valor_edificio: self.amount(section, "valor_edificio"),
            valor_ajuar: self.amount(section, "valor_ajuar"),
            valor_existencias: self.amount(section, "valor_existencias"),
            valor_equipo_electronico: self.amount(section, "valor_equipo_electronico"),
            margen_bruto_anual: self.amount(section, "margen_bruto_anual"),
            existencias_terceros: self.flag(section, "existencias_terceros"),
            valor_existencias_terceros: self.amount(section, "valor_existencias_terceros"),
            existencias_propias_terceros: self.flag(section, "existencias_propias_terceros"),
            valor_existencias_propias_terceros: self
                .amount(section, "valor_existencias_propias_terceros"),
            existencias_intemperie: self.flag(section, "existencias_intemperie"),
            valor_existencias_intemperie: self.amount(section, "valor_existencias_intemperie"),
            bienes_camaras_frigorificas: self.flag(section, "bienes_camaras_frigorificas"),
            valor_bienes_camaras_frigorificas: self
                .amount(section, "valor_bienes_camaras_frigorificas"),
            camaras_alarma_temperatura: self.flag(section, "camaras_alarma_temperatura"),
            camaras_grupo_electrogeno: self.flag(section, "camaras_grupo_electrogeno"),
            camaras_contrato_mantenimiento: self.flag(section, "camaras_contrato_mantenimiento"),
            bienes_empleados: self.flag(section, "bienes_empleados"),
            valor_bienes_empleados: self.amount(section, "valor_bienes_empleados"),
            dinero_caja_fuerte: self.flag(section, "dinero_caja_fuerte"),
            valor_dinero_caja_fuerte: self.amount(section, "valor_dinero_caja_fuerte"),
            dinero_fuera_caja: self.flag(section, "dinero_fuera_caja"),
            valor_dinero_fuera_caja: self.amount(section, "valor_dinero_fuera_caja"),
            vehiculos_terceros_aparcados: self.flag(section, "vehiculos_terceros_aparcados"),
            valor_vehiculos_terceros_aparcados: self
                .amount(section, "valor_vehiculos_terceros_aparcados"),
            averia_maquinaria: self.flag(section, "averia_maquinaria"),
            valor_averia_maquinaria: self.amount(section, "valor_averia_maquinaria"),
            todo_riesgo_accidental: self.flag(section, "todo_riesgo_accidental"),
            bienes_leasing: self.flag(section, "bienes_leasing"),
            leasing: LeasingDetail {
                arrendador: self.text(&leasing, "arrendador"),
                cif: self.text(&leasing, "cif"),
                contrato: self.text(&leasing, "contrato"),
                bien: self.text(&leasing, "bien"),
            },
            responsabilidad_civil: self.flag(section, "responsabilidad_civil"),
            valor_responsabilidad_civil: self.amount(section, "valor_responsabilidad_civil"),
        }
    }

    fn claims(&mut self, section: &Section<'_>) -> ClaimsHistory {
        ClaimsHistory {
            siniestros_ultimos_3_anos: self.flag(section, "siniestros_ultimos_3_anos"),
            detalle: self
                .optional_text(section, "detalle")
                .filter(|value| !value.is_empty()),
        }
    }
}

fn coerce_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => match number.as_f64() {
            Some(n) if n == 1.0 => Some(true),
            Some(n) if n == 0.0 => Some(false),
            _ => None,
        },
        Value::String(raw) => match fold(raw).as_str() {
            "true" | "si" | "s" | "yes" | "1" | "on" => Some(true),
            "false" | "no" | "n" | "0" | "off" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Parse amounts typed the Spanish way: `1.500.000`, `1.500,50`, `1500 €`.
pub(crate) fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches('€')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else if is_thousands_grouped(&cleaned) {
        cleaned.replace('.', "")
    } else {
        cleaned
    };

    normalized.parse::<f64>().ok()
}

fn is_thousands_grouped(raw: &str) -> bool {
    let mut groups = raw.split('.');
    let Some(head) = groups.next() else {
        return false;
    };
    let tail: Vec<&str> = groups.collect();
    !tail.is_empty()
        && !head.is_empty()
        && head.len() <= 3
        && head.chars().all(|c| c.is_ascii_digit())
        && tail
            .iter()
            .all(|group| group.len() == 3 && group.chars().all(|c| c.is_ascii_digit()))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
