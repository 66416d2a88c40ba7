//! Questionnaire facts: the typed record, lenient normalization from raw
//! JSON, and the activity-code reference table.

pub mod cnae;
pub mod domain;
mod normalize;

pub use cnae::{CnaeEntry, SectorClass};
pub use domain::{
    ActivityDetail, Capitals, ClaimsHistory, CompanyProfile, Construction, DistributionRegion,
    EnclosureType, FactsRecord, FireProtection, InstallationsType, LeasingDetail,
    ManufacturingActivity, ProductStage, RequestedCoverage, RoofType, ServiceActivity, SessionId,
    StructureType, TheftProtection, WaterSupply,
};
pub use normalize::{normalize_facts, FactsWarning, NormalizedFacts};
