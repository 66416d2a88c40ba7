use super::common::*;
use serde_json::json;
use std::sync::Arc;

use crate::advisory::facts::SessionId;
use crate::advisory::recommendation::rules::civil_liability;
use crate::advisory::recommendation::InsuranceLine;
use crate::advisory::{AdvisoryService, AdvisoryServiceError, RepositoryError};

fn session(id: &str) -> SessionId {
    SessionId(id.to_string())
}

#[test]
fn submit_stores_normalized_facts_with_warnings() {
    let (service, repository, _) = build_service(lenient());

    let stored = service
        .submit_facts(session("s-1"), &messy_services_facts())
        .expect("facts stored");

    assert_eq!(stored.facts.company.billing, 850_000.0);
    assert_eq!(stored.warnings.len(), 3);
    assert_eq!(repository.len(), 1);
}

#[test]
fn resubmission_replaces_previous_facts() {
    let (service, repository, _) = build_service(lenient());
    let id = session("s-2");

    service
        .submit_facts(id.clone(), &messy_services_facts())
        .expect("first submission");
    service
        .submit_facts(id.clone(), &manufacturer_facts())
        .expect("second submission");

    assert_eq!(repository.len(), 1);
    let recommendation = service
        .recommendation(&id, InsuranceLine::ResponsabilidadCivil)
        .expect("recommendation");
    assert!(recommendation.includes(civil_liability::GASTOS_RETIRADA));
    assert!(!recommendation.includes(civil_liability::INMOBILIARIA));
}

#[test]
fn missing_session_reports_no_form_data() {
    let (service, _, _) = build_service(lenient());

    let error = service
        .recommendation(&session("ghost"), InsuranceLine::DanosMateriales)
        .expect_err("no facts stored");
    assert!(matches!(error, AdvisoryServiceError::NoFormData(ref id) if id.0 == "ghost"));

    let error = service
        .product_tiers(&session("ghost"), InsuranceLine::DanosMateriales)
        .expect_err("no facts stored");
    assert_eq!(error.to_string(), "no form data found for session ghost");
}

#[test]
fn repository_failures_surface_as_service_errors() {
    let service = AdvisoryService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemorySink::default()),
        lenient(),
    );

    let error = service
        .submit_facts(session("s-3"), &json!({}))
        .expect_err("store fails");
    assert!(matches!(
        error,
        AdvisoryServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}

#[test]
fn send_recommendation_renders_and_dispatches() {
    let (service, _, sink) = build_service(lenient());
    let id = session("s-4");
    service
        .submit_facts(id.clone(), &manufacturer_facts())
        .expect("facts stored");

    let receipt = service
        .send_recommendation(&id, InsuranceLine::ResponsabilidadCivil, " broker@example.com ")
        .expect("receipt");

    assert!(receipt.delivered);
    assert!(receipt.error.is_none());
    assert_eq!(receipt.recipient, "broker@example.com");

    let documents = sink.documents();
    assert_eq!(documents.len(), 1);
    assert_eq!(
        documents[0].subject,
        "Recomendación de Responsabilidad Civil - Conservas del Cantábrico SL"
    );
    assert!(documents[0]
        .body
        .contains("Ámbito territorial: Todo el Mundo incluido USA y Canadá"));
}

#[test]
fn sink_failures_are_reported_in_receipt() {
    let repository = Arc::new(MemoryRepository::default());
    let service = AdvisoryService::new(repository, Arc::new(OfflineSink), lenient());
    let id = session("s-5");
    service
        .submit_facts(id.clone(), &manufacturer_facts())
        .expect("facts stored");

    let receipt = service
        .send_recommendation(&id, InsuranceLine::DanosMateriales, "broker@example.com")
        .expect("engine still completes");

    assert!(!receipt.delivered);
    assert_eq!(
        receipt.error.as_deref(),
        Some("notification transport unavailable: smtp offline")
    );
}

#[test]
fn invalid_recipient_is_not_dispatched() {
    let (service, _, sink) = build_service(strict());
    let id = session("s-6");
    service
        .submit_facts(id.clone(), &manufacturer_facts())
        .expect("facts stored");

    let receipt = service
        .send_recommendation(&id, InsuranceLine::DanosMateriales, "not-an-address")
        .expect("receipt");

    assert!(!receipt.delivered);
    assert!(sink.documents().is_empty());
}

#[test]
fn strict_mode_does_not_change_the_record() {
    let (lenient_service, _, _) = build_service(lenient());
    let (strict_service, _, _) = build_service(strict());

    let lenient_stored = lenient_service
        .submit_facts(session("s-7"), &messy_services_facts())
        .expect("lenient");
    let strict_stored = strict_service
        .submit_facts(session("s-7"), &messy_services_facts())
        .expect("strict");

    assert_eq!(lenient_stored.facts, strict_stored.facts);
    assert_eq!(lenient_stored.warnings, strict_stored.warnings);
}
