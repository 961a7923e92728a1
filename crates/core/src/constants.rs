//! Constants used throughout the triage core crate.

/// Literal marker the interpreter looks for in upstream text. Matching is case-sensitive.
pub const PRIORITY_MARKER: &str = "PRIORIDAD";

/// Label returned whenever a priority cannot be extracted. Unknown is treated as most urgent.
pub const DEFAULT_PRIORITY_LABEL: &str = "PRIORIDAD I";

/// Base URL of the Gemini `generateContent` API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

/// Default listen address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:8000";

/// Environment variable holding the upstream API key.
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";

/// Environment variable overriding the upstream base URL.
pub const ENV_BASE_URL: &str = "GEMINI_BASE_URL";

/// Environment variable overriding the upstream model.
pub const ENV_MODEL: &str = "GEMINI_MODEL";

/// Environment variable setting an upstream timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "GEMINI_TIMEOUT_SECS";

/// Environment variable selecting the diagnosis failure policy.
pub const ENV_FAILURE_POLICY: &str = "TRIAGE_FAILURE_POLICY";

/// Environment variable selecting the label policy.
pub const ENV_LABEL_POLICY: &str = "TRIAGE_LABEL_POLICY";
