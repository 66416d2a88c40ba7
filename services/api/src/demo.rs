use crate::infra::{load_facts, InMemoryFactsRepository, InMemoryNotificationSink};
use clap::Args;
use coverage_advisor::advisory::{
    generate_coverage_recommendation, generate_product_tiers, normalize_facts,
    render_recommendation, AdvisoryService, InsuranceLine, NormalizedFacts, ProductTier,
    SessionId,
};
use coverage_advisor::config::AdvisorConfig;
use coverage_advisor::error::AppError;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct FactsArgs {
    /// Questionnaire answers as JSON
    #[arg(long)]
    pub(crate) facts: PathBuf,
    /// Insurance line: rc, dm, responsabilidad_civil or danos_materiales
    #[arg(long, value_parser = crate::infra::parse_line)]
    pub(crate) line: InsuranceLine,
    /// Emit JSON instead of the text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Use this facts file instead of the bundled sample questionnaire.
    #[arg(long)]
    pub(crate) facts: Option<PathBuf>,
    /// Recipient for the rendered recommendation.
    #[arg(long, default_value = "corredor@example.com")]
    pub(crate) recipient: String,
}

fn normalized_from(path: &std::path::Path) -> Result<NormalizedFacts, AppError> {
    let raw = load_facts(path)?;
    let normalized = normalize_facts(&raw);
    for warning in &normalized.warnings {
        eprintln!("warning: {}: {}", warning.path, warning.message);
    }
    Ok(normalized)
}

pub(crate) fn run_recommend(args: FactsArgs) -> Result<(), AppError> {
    let normalized = normalized_from(&args.facts)?;
    let recommendation = generate_coverage_recommendation(args.line, &normalized.facts);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recommendation)?);
    } else {
        print!("{}", render_recommendation(&recommendation));
    }
    Ok(())
}

pub(crate) fn run_products(args: FactsArgs) -> Result<(), AppError> {
    let normalized = normalized_from(&args.facts)?;
    let tiers = generate_product_tiers(args.line, &normalized.facts);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tiers)?);
    } else {
        println!("Productos de {}", args.line.label());
        print_tiers(&tiers);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let raw = match &args.facts {
        Some(path) => load_facts(path)?,
        None => sample_questionnaire(),
    };

    let repository = Arc::new(InMemoryFactsRepository::default());
    let sink = Arc::new(InMemoryNotificationSink::default());
    let service = AdvisoryService::new(
        repository,
        sink.clone(),
        AdvisorConfig { strict_facts: true },
    );

    let session_id = SessionId("demo-session".to_string());
    let stored = service.submit_facts(session_id.clone(), &raw)?;
    println!("Coverage advisor demo");
    println!(
        "Session {} stored at {} with {} warning(s)",
        stored.session_id,
        stored.submitted_at.to_rfc3339(),
        stored.warnings.len()
    );
    for warning in &stored.warnings {
        println!("  - {}: {}", warning.path, warning.message);
    }

    for line in InsuranceLine::ALL {
        let recommendation = service.recommendation(&session_id, line)?;
        println!();
        print!("{}", render_recommendation(&recommendation));

        let tiers = service.product_tiers(&session_id, line)?;
        println!("\nProductos de {}", line.label());
        print_tiers(&tiers);

        let receipt = service.send_recommendation(&session_id, line, &args.recipient)?;
        match receipt.error {
            None => println!("Enviado a {}", receipt.recipient),
            Some(error) => println!("No enviado a {}: {error}", receipt.recipient),
        }
    }

    println!("\nDocumentos en cola: {}", sink.sent().len());
    Ok(())
}

fn print_tiers(tiers: &[ProductTier; 3]) {
    for tier in tiers {
        println!("  {}: {}€/año", tier.name, tier.price);
        for highlight in &tier.highlights {
            println!("    - {highlight}");
        }
    }
}

/// Food manufacturer renting its plant, selling in the EU.
pub(crate) fn sample_questionnaire() -> Value {
    json!({
        "company": {
            "name": "Quesos de la Vega SL",
            "cif": "B47000002",
            "cnae_code": "1054",
            "activity": "Elaboración de quesos",
            "billing": "2.350.000",
            "employees_number": 28,
            "m2_installations": 2400,
            "installations_type": "No propietario",
            "almacena_bienes_terceros": true,
            "owner_name": "Marta Vega"
        },
        "activity_detail": {
            "empresa_tipo": "manufactura",
            "producto_consumo_humano": true,
            "tiene_empleados_tecnicos": true,
            "producto_final_o_intermedio": "final",
            "distribucion": ["espana", "ue"]
        },
        "construccion": {
            "estructura": "metalica",
            "cubierta": "panel sandwich",
            "cerramientos": "hormigon",
            "camaras_frigorificas": true,
            "placas_solares": true,
            "valor_placas_solares": 60000
        },
        "proteccion_incendios": {
            "extintores": true,
            "bocas_incendio": true,
            "deteccion_automatica": true,
            "deteccion_automatica_zonas": "cámaras y almacén",
            "suministro_agua": "red publica"
        },
        "proteccion_robo": {
            "alarma_conectada": true,
            "camaras_circuito": "si"
        },
        "capitales": {
            "valor_ajuar": 320000,
            "valor_existencias": 450000,
            "valor_equipo_electronico": 40000,
            "margen_bruto_anual": 700000,
            "bienes_camaras_frigorificas": true,
            "valor_bienes_camaras_frigorificas": 180000,
            "camaras_alarma_temperatura": true,
            "camaras_grupo_electrogeno": true,
            "dinero_caja_fuerte": true,
            "valor_dinero_caja_fuerte": 1200,
            "averia_maquinaria": true,
            "valor_averia_maquinaria": 90000,
            "responsabilidad_civil": true,
            "valor_responsabilidad_civil": 300000
        },
        "siniestralidad": {
            "siniestros_ultimos_3_anos": false
        }
    })
}
