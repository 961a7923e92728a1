//! # Triage Core
//!
//! Core logic of the triage relay:
//! - prompt construction from a [`SymptomReport`]
//! - the upstream generative-model seam and its Gemini implementation
//! - interpretation of free-form model text into a [`PriorityLabel`]
//! - the [`TriageService`] pipeline tying these together under configurable policies
//!
//! **No API concerns**: HTTP routing, access control and response shapes belong in `api-rest`
//! and `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod priority;
pub mod prompt;
pub mod service;
pub mod upstream;

pub use config::{TriageConfig, UpstreamConfig};
pub use constants::DEFAULT_REST_ADDR;
pub use error::{TriageError, TriageResult};
pub use priority::{interpret, interpret_with, LabelPolicy, PriorityLabel, PriorityLevel};
pub use service::{FailurePolicy, TriageService};
pub use triage_types::{ReportError, Symptom, SymptomReport};
pub use upstream::{GeminiClient, GenerateContentResponse, GenerativeModel};
