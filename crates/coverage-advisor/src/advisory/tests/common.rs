use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::advisory::facts::SessionId;
use crate::advisory::repository::{
    FactsRepository, NotificationError, NotificationSink, RenderedDocument, RepositoryError,
    StoredFacts,
};
use crate::advisory::{advisory_router, AdvisoryService};
use crate::config::AdvisorConfig;

pub(super) fn lenient() -> AdvisorConfig {
    AdvisorConfig::default()
}

pub(super) fn strict() -> AdvisorConfig {
    AdvisorConfig { strict_facts: true }
}

/// Food manufacturer renting its premises and exporting worldwide.
pub(super) fn manufacturer_facts() -> Value {
    json!({
        "company": {
            "name": "Conservas del Cantábrico SL",
            "cif": "B39000001",
            "cnae_code": "1013",
            "activity": "Elaboración de conservas",
            "billing": 5_000_000,
            "employees_number": 42,
            "m2_installations": 1800,
            "installations_type": "No propietario",
            "almacena_bienes_terceros": false,
            "vehiculos_terceros_aparcados": true
        },
        "activity_detail": {
            "empresa_tipo": "manufactura",
            "producto_consumo_humano": true,
            "tiene_empleados_tecnicos": true,
            "producto_final_o_intermedio": "intermedio",
            "distribucion": ["espana", "mundial-con-usa"]
        },
        "construccion": {
            "estructura": "metalica",
            "cubierta": "panel sandwich",
            "cerramientos": "ladrillo",
            "camaras_frigorificas": true
        },
        "proteccion_incendios": {
            "extintores": true,
            "bocas_incendio": true,
            "suministro_agua": "red publica"
        },
        "proteccion_robo": {
            "alarma_conectada": true
        },
        "capitales": {
            "valor_edificio": 0,
            "valor_ajuar": 150_000,
            "valor_existencias": 600_000,
            "valor_equipo_electronico": 50_000,
            "margen_bruto_anual": 900_000,
            "bienes_camaras_frigorificas": true,
            "valor_bienes_camaras_frigorificas": 200_000,
            "camaras_alarma_temperatura": true,
            "responsabilidad_civil": true,
            "valor_responsabilidad_civil": 300_000
        }
    })
}

/// Small services company with loosely typed answers.
pub(super) fn messy_services_facts() -> Value {
    json!({
        "empresa_tipo": "servicios",
        "servicios": {
            "trabajos_fuera_instalaciones": "si",
            "trabajos_subcontratistas": 1
        },
        "company": {
            "name": "Reformas Díaz",
            "billing": "850.000",
            "installations_type": "Propietario"
        }
    })
}

pub(super) fn build_service(
    config: AdvisorConfig,
) -> (
    AdvisoryService<MemoryRepository, MemorySink>,
    Arc<MemoryRepository>,
    Arc<MemorySink>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let sink = Arc::new(MemorySink::default());
    let service = AdvisoryService::new(repository.clone(), sink.clone(), config);
    (service, repository, sink)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SessionId, StoredFacts>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl FactsRepository for MemoryRepository {
    fn store(&self, record: StoredFacts) -> Result<StoredFacts, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn latest(&self, session_id: &SessionId) -> Result<Option<StoredFacts>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(session_id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySink {
    documents: Arc<Mutex<Vec<RenderedDocument>>>,
}

impl MemorySink {
    pub(super) fn documents(&self) -> Vec<RenderedDocument> {
        self.documents.lock().expect("sink mutex poisoned").clone()
    }
}

impl NotificationSink for MemorySink {
    fn dispatch(&self, document: RenderedDocument) -> Result<(), NotificationError> {
        self.documents
            .lock()
            .expect("sink mutex poisoned")
            .push(document);
        Ok(())
    }
}

pub(super) struct OfflineSink;

impl NotificationSink for OfflineSink {
    fn dispatch(&self, _document: RenderedDocument) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp offline".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl FactsRepository for UnavailableRepository {
    fn store(&self, _record: StoredFacts) -> Result<StoredFacts, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest(&self, _session_id: &SessionId) -> Result<Option<StoredFacts>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn advisory_router_with_service(
    service: AdvisoryService<MemoryRepository, MemorySink>,
) -> axum::Router {
    advisory_router(Arc::new(service))
}
