use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier issued to an anonymous questionnaire session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized business facts gathered by the questionnaire.
///
/// Every field carries its documented default, so evaluators never need to
/// distinguish "absent" from "false" or "zero".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactsRecord {
    pub company: CompanyProfile,
    pub activity_detail: ActivityDetail,
    /// Explicit territorial scope chosen by the user. Wins over `distribucion`.
    pub territorio: Option<String>,
    pub coberturas_solicitadas: BTreeSet<RequestedCoverage>,
    pub construccion: Construction,
    pub proteccion_incendios: FireProtection,
    pub proteccion_robo: TheftProtection,
    pub capitales: Capitals,
    pub siniestralidad: ClaimsHistory,
}

impl FactsRecord {
    pub fn manufacturing(&self) -> Option<&ManufacturingActivity> {
        match &self.activity_detail {
            ActivityDetail::Manufactura(detail) => Some(detail),
            ActivityDetail::Servicios(_) => None,
        }
    }

    pub fn services(&self) -> Option<&ServiceActivity> {
        match &self.activity_detail {
            ActivityDetail::Servicios(detail) => Some(detail),
            ActivityDetail::Manufactura(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub name: String,
    pub cif: String,
    pub cnae_code: String,
    pub activity: String,
    pub activity_description: String,
    pub billing: f64,
    pub employees_number: u32,
    pub m2_installations: f64,
    pub installations_type: InstallationsType,
    pub almacena_bienes_terceros: bool,
    pub vehiculos_terceros_aparcados: bool,
    pub bienes_empleados: bool,
    pub owner_name: Option<String>,
    pub owner_cif: Option<String>,
}

/// Tenure of the premises the business operates from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallationsType {
    #[serde(rename = "Propietario")]
    Propietario,
    #[serde(rename = "No propietario", alias = "Inquilino")]
    Inquilino,
    #[default]
    #[serde(rename = "Otros")]
    Otros,
}

impl InstallationsType {
    pub fn parse(raw: &str) -> Option<Self> {
        match fold(raw).as_str() {
            "propietario" => Some(Self::Propietario),
            "inquilino" | "no propietario" | "no_propietario" | "no-propietario" => {
                Some(Self::Inquilino)
            }
            "otros" | "otro" => Some(Self::Otros),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Propietario => "Propietario",
            Self::Inquilino => "No propietario",
            Self::Otros => "Otros",
        }
    }
}

/// Activity classification; exactly one branch is populated per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "empresa_tipo", rename_all = "snake_case")]
pub enum ActivityDetail {
    Manufactura(ManufacturingActivity),
    Servicios(ServiceActivity),
}

impl Default for ActivityDetail {
    fn default() -> Self {
        Self::Servicios(ServiceActivity::default())
    }
}

impl ActivityDetail {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Manufactura(_) => "manufactura",
            Self::Servicios(_) => "servicios",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManufacturingActivity {
    pub producto_consumo_humano: bool,
    pub tiene_empleados_tecnicos: bool,
    pub producto_final_o_intermedio: ProductStage,
    pub distribucion: BTreeSet<DistributionRegion>,
    pub matriz_en_espana: bool,
    pub filiales: BTreeSet<DistributionRegion>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStage {
    #[default]
    Final,
    Intermedio,
}

impl ProductStage {
    pub fn parse(raw: &str) -> Option<Self> {
        match fold(raw).as_str() {
            "final" => Some(Self::Final),
            "intermedio" => Some(Self::Intermedio),
            _ => None,
        }
    }
}

/// Markets a manufacturer sells into or has subsidiaries in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DistributionRegion {
    #[serde(rename = "espana")]
    Espana,
    #[serde(rename = "ue")]
    Ue,
    #[serde(rename = "mundial-sin-usa")]
    MundialSinUsa,
    #[serde(rename = "mundial-con-usa")]
    MundialConUsa,
}

impl DistributionRegion {
    pub fn parse(raw: &str) -> Option<Self> {
        match fold(raw).replace('_', "-").as_str() {
            "espana" => Some(Self::Espana),
            "ue" => Some(Self::Ue),
            "mundial-sin-usa" => Some(Self::MundialSinUsa),
            "mundial-con-usa" => Some(Self::MundialConUsa),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceActivity {
    pub trabajos_fuera_instalaciones: bool,
    pub corte_soldadura: bool,
    pub trabajo_equipos_electronicos: bool,
    pub empleados_tecnicos: bool,
    pub trabajos_subcontratistas: bool,
}

/// Optional coverages the user ticked; informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestedCoverage {
    Explotacion,
    Patronal,
    Productos,
    Trabajos,
    Profesional,
}

impl RequestedCoverage {
    pub fn parse(raw: &str) -> Option<Self> {
        match fold(raw).as_str() {
            "explotacion" => Some(Self::Explotacion),
            "patronal" => Some(Self::Patronal),
            "productos" => Some(Self::Productos),
            "trabajos" => Some(Self::Trabajos),
            "profesional" => Some(Self::Profesional),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Construction {
    pub estructura: StructureType,
    pub cubierta: RoofType,
    pub cerramientos: EnclosureType,
    pub camaras_frigorificas: bool,
    pub placas_solares: bool,
    pub valor_placas_solares: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    Hormigon,
    Metalica,
    Madera,
    Mixta,
    #[default]
    Otra,
}

impl StructureType {
    pub fn parse(raw: &str) -> Option<Self> {
        match fold(raw).as_str() {
            "hormigon" => Some(Self::Hormigon),
            "metalica" | "metal" => Some(Self::Metalica),
            "madera" => Some(Self::Madera),
            "mixta" => Some(Self::Mixta),
            "otra" | "otro" | "otros" => Some(Self::Otra),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hormigon => "Hormigón",
            Self::Metalica => "Metálica",
            Self::Madera => "Madera",
            Self::Mixta => "Mixta",
            Self::Otra => "Otra",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoofType {
    Hormigon,
    Chapa,
    PanelSandwich,
    Teja,
    #[default]
    Otra,
}

impl RoofType {
    pub fn parse(raw: &str) -> Option<Self> {
        match fold(raw).replace([' ', '-'], "_").as_str() {
            "hormigon" => Some(Self::Hormigon),
            "chapa" => Some(Self::Chapa),
            "panel_sandwich" => Some(Self::PanelSandwich),
            "teja" => Some(Self::Teja),
            "otra" | "otro" | "otros" => Some(Self::Otra),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hormigon => "Hormigón",
            Self::Chapa => "Chapa",
            Self::PanelSandwich => "Panel sándwich",
            Self::Teja => "Teja",
            Self::Otra => "Otra",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnclosureType {
    Ladrillo,
    Hormigon,
    PanelSandwich,
    Chapa,
    #[default]
    Otro,
}

impl EnclosureType {
    pub fn parse(raw: &str) -> Option<Self> {
        match fold(raw).replace([' ', '-'], "_").as_str() {
            "ladrillo" => Some(Self::Ladrillo),
            "hormigon" => Some(Self::Hormigon),
            "panel_sandwich" => Some(Self::PanelSandwich),
            "chapa" => Some(Self::Chapa),
            "otro" | "otra" | "otros" => Some(Self::Otro),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ladrillo => "Ladrillo",
            Self::Hormigon => "Hormigón",
            Self::PanelSandwich => "Panel sándwich",
            Self::Chapa => "Chapa",
            Self::Otro => "Otro",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireProtection {
    pub extintores: bool,
    pub bocas_incendio: bool,
    pub deposito_bombeo: bool,
    pub cobertura_total: bool,
    pub columnas_hidrantes: bool,
    pub columnas_hidrantes_tipo: Option<String>,
    pub deteccion_automatica: bool,
    pub deteccion_automatica_zonas: Option<String>,
    pub rociadores: bool,
    pub rociadores_zonas: Option<String>,
    pub suministro_agua: WaterSupply,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterSupply {
    RedPublica,
    DepositoPropio,
    Pozo,
    #[default]
    NoDisponible,
}

impl WaterSupply {
    pub fn parse(raw: &str) -> Option<Self> {
        match fold(raw).replace([' ', '-'], "_").as_str() {
            "red_publica" => Some(Self::RedPublica),
            "deposito_propio" => Some(Self::DepositoPropio),
            "pozo" => Some(Self::Pozo),
            "no_disponible" | "ninguno" => Some(Self::NoDisponible),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RedPublica => "Red pública",
            Self::DepositoPropio => "Depósito propio",
            Self::Pozo => "Pozo",
            Self::NoDisponible => "No disponible",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TheftProtection {
    pub protecciones_fisicas: bool,
    pub vigilancia_propia: bool,
    pub alarma_conectada: bool,
    pub camaras_circuito: bool,
}

/// Declared capitals and optional property-damage extensions.
///
/// Boolean flags gate the optional coverage; the matching `valor_*` amount
/// becomes that coverage's limit when positive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capitals {
    pub valor_edificio: f64,
    pub valor_ajuar: f64,
    pub valor_existencias: f64,
    pub valor_equipo_electronico: f64,
    pub margen_bruto_anual: f64,

    pub existencias_terceros: bool,
    pub valor_existencias_terceros: f64,
    pub existencias_propias_terceros: bool,
    pub valor_existencias_propias_terceros: f64,
    pub existencias_intemperie: bool,
    pub valor_existencias_intemperie: f64,

    pub bienes_camaras_frigorificas: bool,
    pub valor_bienes_camaras_frigorificas: f64,
    pub camaras_alarma_temperatura: bool,
    pub camaras_grupo_electrogeno: bool,
    pub camaras_contrato_mantenimiento: bool,

    pub bienes_empleados: bool,
    pub valor_bienes_empleados: f64,
    pub dinero_caja_fuerte: bool,
    pub valor_dinero_caja_fuerte: f64,
    pub dinero_fuera_caja: bool,
    pub valor_dinero_fuera_caja: f64,
    pub vehiculos_terceros_aparcados: bool,
    pub valor_vehiculos_terceros_aparcados: f64,
    pub averia_maquinaria: bool,
    pub valor_averia_maquinaria: f64,
    pub todo_riesgo_accidental: bool,

    pub bienes_leasing: bool,
    pub leasing: LeasingDetail,

    pub responsabilidad_civil: bool,
    pub valor_responsabilidad_civil: f64,
}

impl Capitals {
    /// Building plus contents, the base for the robbery percentage.
    pub fn total_content_capital(&self) -> f64 {
        saturating_sum(&[
            self.valor_edificio,
            self.valor_ajuar,
            self.valor_existencias,
            self.valor_equipo_electronico,
        ])
    }

    /// Everything the property-damage premium is rated on.
    pub fn total_insured_value(&self) -> f64 {
        saturating_sum(&[self.total_content_capital(), self.margen_bruto_anual])
    }
}

/// Sum of the positive amounts, capped at `f64::MAX`.
fn saturating_sum(amounts: &[f64]) -> f64 {
    amounts
        .iter()
        .filter(|amount| **amount > 0.0)
        .fold(0.0_f64, |total, amount| (total + amount).min(f64::MAX))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeasingDetail {
    pub arrendador: String,
    pub cif: String,
    pub contrato: String,
    pub bien: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimsHistory {
    pub siniestros_ultimos_3_anos: bool,
    pub detalle: Option<String>,
}

/// Lowercase and strip Spanish diacritics so free-form answers compare stably.
pub(crate) fn fold(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            'á' | 'Á' | 'à' | 'À' => 'a',
            'é' | 'É' | 'è' | 'È' => 'e',
            'í' | 'Í' | 'ì' | 'Ì' => 'i',
            'ó' | 'Ó' | 'ò' | 'Ò' => 'o',
            'ú' | 'Ú' | 'ü' | 'Ü' | 'ù' | 'Ù' => 'u',
            'ñ' | 'Ñ' => 'n',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}
