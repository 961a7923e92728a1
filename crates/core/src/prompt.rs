//! Prompt templates sent to the upstream model.

use triage_types::SymptomReport;

/// Instruction text describing the triage scale. The model is asked to answer with only the
/// parenthesized priority token so that [`crate::priority::interpret`] can find it.
const DIAGNOSIS_INSTRUCTIONS: &str = "Genera una valoracion Prioridad I: prioridad absoluta con atención inmediata y sin demora. Prioridad: situaciones muy urgentes de riesgo vital, inestabilidad o dolor muy intenso. Demora de asistencia médica hasta 15 minutos. Prioridad III: urgente pero estable con potencial riesgo vital que probablemente exige pruebas diagnósticas y/o terapéuticas. Demora máxima de 60 minutos. Prioridad IV: urgencia menor, potencialmente sin riesgo vital para el paciente. Demora máxima de 120 minutos., retorna unicamente en esta forma: (PRIORIDAD <<letra romana de la prioridad>>)";

const FOLLOW_UP_INSTRUCTIONS: &str =
    "Recomienda acciones para los siguientes síntomas postoperatorios:";

/// Which template to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Diagnosis,
    FollowUp,
}

/// Build the prompt for `kind` from a symptom report.
pub fn build(kind: PromptKind, report: &SymptomReport) -> String {
    match kind {
        PromptKind::Diagnosis => diagnosis_prompt(report),
        PromptKind::FollowUp => follow_up_prompt(report),
    }
}

/// Classification prompt. Without a procedure this is the instruction text followed by the
/// comma-separated symptoms.
pub fn diagnosis_prompt(report: &SymptomReport) -> String {
    let symptoms = report.joined_symptoms();
    match report.procedure() {
        Some(procedure) => format!(
            "{DIAGNOSIS_INSTRUCTIONS}  Operación realizada: {procedure}. Síntomas: {symptoms}"
        ),
        None => format!("{DIAGNOSIS_INSTRUCTIONS}  {symptoms}"),
    }
}

/// Free-text recommendation prompt. The answer has no structural contract.
pub fn follow_up_prompt(report: &SymptomReport) -> String {
    let symptoms = report.joined_symptoms();
    match report.procedure() {
        Some(procedure) => {
            format!("{FOLLOW_UP_INSTRUCTIONS} {symptoms}. Operación realizada: {procedure}")
        }
        None => format!("{FOLLOW_UP_INSTRUCTIONS} {symptoms}"),
    }
}
