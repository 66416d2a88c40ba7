use serde::Serialize;

use super::domain::fold;

/// Broad sector a CNAE activity code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorClass {
    Industria,
    Construccion,
    Comercio,
    Hosteleria,
    Transporte,
    Servicios,
}

impl SectorClass {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Industria => "Industria",
            Self::Construccion => "Construcción",
            Self::Comercio => "Comercio",
            Self::Hosteleria => "Hostelería",
            Self::Transporte => "Transporte",
            Self::Servicios => "Servicios",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CnaeEntry {
    pub code: &'static str,
    pub description: &'static str,
    pub sector: SectorClass,
}

const fn entry(code: &'static str, description: &'static str, sector: SectorClass) -> CnaeEntry {
    CnaeEntry {
        code,
        description,
        sector,
    }
}

const CNAE_TABLE: &[CnaeEntry] = &[
    entry("1013", "Elaboración de productos cárnicos y de volatería", SectorClass::Industria),
    entry("1071", "Fabricación de pan y de productos frescos de panadería y pastelería", SectorClass::Industria),
    entry("1105", "Fabricación de cerveza", SectorClass::Industria),
    entry("1412", "Confección de ropa de trabajo", SectorClass::Industria),
    entry("1623", "Fabricación de otras estructuras de madera y piezas de carpintería", SectorClass::Industria),
    entry("2222", "Fabricación de envases y embalajes de plástico", SectorClass::Industria),
    entry("2511", "Fabricación de estructuras metálicas y sus componentes", SectorClass::Industria),
    entry("2562", "Ingeniería mecánica por cuenta de terceros", SectorClass::Industria),
    entry("2812", "Fabricación de equipos de transmisión hidráulica y neumática", SectorClass::Industria),
    entry("3101", "Fabricación de muebles de oficina y de establecimientos comerciales", SectorClass::Industria),
    entry("4121", "Construcción de edificios residenciales", SectorClass::Construccion),
    entry("4321", "Instalaciones eléctricas", SectorClass::Construccion),
    entry("4322", "Fontanería, instalaciones de sistemas de calefacción y aire acondicionado", SectorClass::Construccion),
    entry("4334", "Pintura y acristalamiento", SectorClass::Construccion),
    entry("4520", "Mantenimiento y reparación de vehículos de motor", SectorClass::Servicios),
    entry("4690", "Comercio al por mayor no especializado", SectorClass::Comercio),
    entry("4711", "Comercio al por menor en establecimientos no especializados, con predominio en productos alimenticios", SectorClass::Comercio),
    entry("4741", "Comercio al por menor de ordenadores, equipos periféricos y programas informáticos", SectorClass::Comercio),
    entry("4941", "Transporte de mercancías por carretera", SectorClass::Transporte),
    entry("5210", "Depósito y almacenamiento", SectorClass::Transporte),
    entry("5610", "Restaurantes y puestos de comidas", SectorClass::Hosteleria),
    entry("5630", "Establecimientos de bebidas", SectorClass::Hosteleria),
    entry("6201", "Actividades de programación informática", SectorClass::Servicios),
    entry("6920", "Actividades de contabilidad, teneduría de libros, auditoría y asesoría fiscal", SectorClass::Servicios),
    entry("7112", "Servicios técnicos de ingeniería y otras actividades relacionadas con el asesoramiento técnico", SectorClass::Servicios),
    entry("8121", "Limpieza general de edificios", SectorClass::Servicios),
    entry("9602", "Peluquería y otros tratamientos de belleza", SectorClass::Servicios),
];

/// Exact match on a four-digit CNAE-2009 code. Dots and spaces are ignored.
pub fn lookup(code: &str) -> Option<&'static CnaeEntry> {
    let wanted: String = code.chars().filter(char::is_ascii_digit).collect();
    if wanted.is_empty() {
        return None;
    }
    CNAE_TABLE.iter().find(|entry| entry.code == wanted)
}

/// Case- and accent-insensitive substring search over code and description.
pub fn search(query: &str, limit: usize) -> Vec<&'static CnaeEntry> {
    let needle = fold(query);
    if needle.is_empty() {
        return CNAE_TABLE.iter().take(limit).collect();
    }

    CNAE_TABLE
        .iter()
        .filter(|entry| entry.code.starts_with(&needle) || fold(entry.description).contains(&needle))
        .take(limit)
        .collect()
}
