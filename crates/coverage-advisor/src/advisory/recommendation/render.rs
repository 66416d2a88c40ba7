use std::fmt::{self, Write};

use super::{Coverage, Recommendation};

/// Plain-text summary used for e-mail bodies and the CLI.
pub fn render_recommendation(recommendation: &Recommendation) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_recommendation(&mut out, recommendation);
    out
}

fn write_recommendation(out: &mut String, recommendation: &Recommendation) -> fmt::Result {
    let company = &recommendation.company;

    writeln!(out, "Recomendación de {}", recommendation.line.label())?;
    if !company.name.is_empty() {
        writeln!(out, "Empresa: {} ({})", company.name, company.cif)?;
    }
    if !company.activity.is_empty() {
        match &company.sector {
            Some(sector) => writeln!(out, "Actividad: {} [{}]", company.activity, sector)?,
            None => writeln!(out, "Actividad: {}", company.activity)?,
        }
    }
    if let Some(scope) = &recommendation.territorial_scope {
        writeln!(out, "Ámbito territorial: {scope}")?;
    }
    if let Some(limits) = &recommendation.limits {
        writeln!(
            out,
            "Límite general: {} / Sublímite por víctima: {}",
            limits.general_limit, limits.victim_sublimit
        )?;
    }

    out.push_str("\nCoberturas:\n");
    for coverage in &recommendation.coverages {
        write_coverage(out, coverage)?;
    }

    if !recommendation.special_clauses.is_empty() {
        out.push_str("\nCláusulas especiales:\n");
        for clause in &recommendation.special_clauses {
            write_coverage(out, clause)?;
        }
    }

    if let Some(construction) = &recommendation.construction {
        writeln!(
            out,
            "\nConstrucción: estructura {}, cubierta {}, cerramientos {}",
            construction.estructura, construction.cubierta, construction.cerramientos
        )?;
    }
    if !recommendation.protections.is_empty() {
        writeln!(out, "Protecciones: {}", recommendation.protections.join(", "))?;
    }
    if let Some(claims) = &recommendation.claims_history {
        writeln!(out, "Siniestralidad: {claims}")?;
    }
    Ok(())
}

fn write_coverage(out: &mut String, coverage: &Coverage) -> fmt::Result {
    let mark = if coverage.required { "[x]" } else { "[ ]" };
    write!(out, "  {mark} {}", coverage.name)?;
    if let Some(limit) = &coverage.limit {
        write!(out, " | límite {limit}")?;
    }
    if let Some(sublimit) = &coverage.sublimit {
        write!(out, " | sublímite {sublimit}")?;
    }
    out.push('\n');
    if let Some(condition) = &coverage.condition {
        writeln!(out, "      {condition}")?;
    }
    Ok(())
}
