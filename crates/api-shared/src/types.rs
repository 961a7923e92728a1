//! Request and response bodies of the REST API.
//!
//! Field names are the public wire contract (`sintomas`, `operacion`, `diagnostico`,
//! `recomendaciones`) and must not change.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Symptoms reported by the patient, in order, plus the procedure they underwent if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SymptomsReq {
    pub sintomas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "apendicectomía")]
    pub operacion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiagnosisRes {
    /// Priority label such as `PRIORIDAD III`.
    #[schema(example = "PRIORIDAD III")]
    pub diagnostico: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FollowUpRes {
    /// Model text, returned unparsed.
    pub recomendaciones: String,
}

/// Error body returned for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
