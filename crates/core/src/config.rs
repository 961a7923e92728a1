//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the services. Request
//! handling never reads process-wide environment variables. The `*_from_env_value` helpers take
//! the raw value so binaries can do the lookup and tests can skip it.

use std::time::Duration;

use crate::constants::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, ENV_API_KEY, ENV_BASE_URL, ENV_FAILURE_POLICY,
    ENV_LABEL_POLICY, ENV_MODEL, ENV_TIMEOUT_SECS,
};
use crate::priority::LabelPolicy;
use crate::service::FailurePolicy;
use crate::{TriageError, TriageResult};

/// Where and how to reach the upstream model.
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    base_url: String,
    model: String,
    timeout: Option<Duration>,
}

impl UpstreamConfig {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> TriageResult<Self> {
        let base_url = base_url.into();
        let model = model.into();

        if base_url.trim().is_empty() {
            return Err(TriageError::InvalidInput(
                "upstream base URL cannot be empty".into(),
            ));
        }
        if model.trim().is_empty() {
            return Err(TriageError::InvalidInput(
                "upstream model cannot be empty".into(),
            ));
        }

        Ok(Self {
            base_url,
            model,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// `None` means no timeout is applied to the outbound call.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.into(),
            model: DEFAULT_GEMINI_MODEL.into(),
            timeout: None,
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone)]
pub struct TriageConfig {
    api_key: String,
    upstream: UpstreamConfig,
    failure_policy: FailurePolicy,
    label_policy: LabelPolicy,
}

impl TriageConfig {
    /// Create a new `TriageConfig`.
    pub fn new(
        api_key: String,
        upstream: UpstreamConfig,
        failure_policy: FailurePolicy,
        label_policy: LabelPolicy,
    ) -> TriageResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TriageError::InvalidInput("API key cannot be empty".into()));
        }

        Ok(Self {
            api_key,
            upstream,
            failure_policy,
            label_policy,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn upstream(&self) -> &UpstreamConfig {
        &self.upstream
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn label_policy(&self) -> LabelPolicy {
        self.label_policy
    }
}

// The API key must never reach the logs.
impl std::fmt::Debug for TriageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageConfig")
            .field("api_key", &"<redacted>")
            .field("upstream", &self.upstream)
            .field("failure_policy", &self.failure_policy)
            .field("label_policy", &self.label_policy)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Require an API key value.
pub fn api_key_from_env_value(value: Option<String>) -> TriageResult<String> {
    non_blank(value).ok_or_else(|| TriageError::InvalidInput("GEMINI_API_KEY is not set".into()))
}

/// Parse the failure policy. Missing or blank values give [`FailurePolicy::Fallback`].
pub fn failure_policy_from_env_value(value: Option<String>) -> TriageResult<FailurePolicy> {
    Ok(non_blank(value)
        .map(|v| v.parse::<FailurePolicy>())
        .transpose()?
        .unwrap_or_default())
}

/// Parse the label policy. Missing or blank values give [`LabelPolicy::Permissive`].
pub fn label_policy_from_env_value(value: Option<String>) -> TriageResult<LabelPolicy> {
    Ok(non_blank(value)
        .map(|v| v.parse::<LabelPolicy>())
        .transpose()?
        .unwrap_or_default())
}

/// Parse an optional timeout in whole seconds. Zero is rejected.
pub fn timeout_from_env_value(value: Option<String>) -> TriageResult<Option<Duration>> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };
    let secs: u64 = value
        .parse()
        .map_err(|_| TriageError::InvalidInput(format!("invalid timeout seconds: {value}")))?;
    if secs == 0 {
        return Err(TriageError::InvalidInput(
            "timeout seconds must be greater than zero".into(),
        ));
    }
    Ok(Some(Duration::from_secs(secs)))
}

/// Build an [`UpstreamConfig`] from optional raw values, applying defaults.
pub fn upstream_config_from_env_values(
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<String>,
) -> TriageResult<UpstreamConfig> {
    UpstreamConfig::new(
        non_blank(base_url).unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.into()),
        non_blank(model).unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
        timeout_from_env_value(timeout_secs)?,
    )
}

/// Resolve the full configuration through `lookup`, normally `|k| std::env::var(k).ok()`.
///
/// Reads the `GEMINI_*` and `TRIAGE_*_POLICY` variables named in [`crate::constants`].
pub fn triage_config_from_lookup<F>(lookup: F) -> TriageResult<TriageConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let upstream = upstream_config_from_env_values(
        lookup(ENV_BASE_URL),
        lookup(ENV_MODEL),
        lookup(ENV_TIMEOUT_SECS),
    )?;

    TriageConfig::new(
        api_key_from_env_value(lookup(ENV_API_KEY))?,
        upstream,
        failure_policy_from_env_value(lookup(ENV_FAILURE_POLICY))?,
        label_policy_from_env_value(lookup(ENV_LABEL_POLICY))?,
    )
}
