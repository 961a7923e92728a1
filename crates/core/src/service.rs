//! The triage pipeline: build prompt, call upstream once, interpret or pass the text through.

use std::str::FromStr;
use std::sync::Arc;

use triage_types::SymptomReport;

use crate::config::TriageConfig;
use crate::priority::{interpret_with, LabelPolicy, PriorityLabel};
use crate::prompt::{self, PromptKind};
use crate::upstream::{GeminiClient, GenerativeModel};
use crate::{TriageError, TriageResult};

/// What a diagnosis does when the upstream call or its payload fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and answer with the default (most urgent) label.
    #[default]
    Fallback,
    /// Return the failure to the caller.
    Propagate,
}

impl FromStr for FailurePolicy {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fallback" => Ok(FailurePolicy::Fallback),
            "propagate" => Ok(FailurePolicy::Propagate),
            other => Err(TriageError::InvalidInput(format!(
                "unknown failure policy: {other} (expected fallback or propagate)"
            ))),
        }
    }
}

/// Stateless triage operations over a shared upstream model.
#[derive(Clone)]
pub struct TriageService {
    model: Arc<dyn GenerativeModel>,
    failure_policy: FailurePolicy,
    label_policy: LabelPolicy,
}

impl TriageService {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        failure_policy: FailurePolicy,
        label_policy: LabelPolicy,
    ) -> Self {
        Self {
            model,
            failure_policy,
            label_policy,
        }
    }

    /// Build a service backed by [`GeminiClient`] from startup configuration.
    pub fn from_config(cfg: &TriageConfig) -> TriageResult<Self> {
        let client = GeminiClient::new(cfg.api_key(), cfg.upstream())?;
        Ok(Self::new(
            Arc::new(client),
            cfg.failure_policy(),
            cfg.label_policy(),
        ))
    }

    /// Classify the reported symptoms into a priority label.
    ///
    /// # Errors
    /// Only under [`FailurePolicy::Propagate`], when the upstream call fails or returns no
    /// parseable payload. A payload without candidate text is not an error: it interprets to the
    /// default label like any other unusable text.
    pub async fn diagnose(&self, report: &SymptomReport) -> TriageResult<PriorityLabel> {
        let prompt = prompt::build(PromptKind::Diagnosis, report);

        let response = match self.model.generate(&prompt).await {
            Ok(response) => response,
            Err(e) if self.failure_policy == FailurePolicy::Fallback => {
                tracing::warn!(error = %e, "upstream diagnosis failed, using default priority");
                return Ok(PriorityLabel::default());
            }
            Err(e) => return Err(e),
        };

        let text = response.first_candidate_text();
        if text.is_none() {
            tracing::warn!("upstream diagnosis returned no candidate text");
        }

        let label = interpret_with(text, self.label_policy);
        tracing::debug!(label = %label, "diagnosis interpreted");
        Ok(label)
    }

    /// Ask for post-operative recommendations and return the model's text unparsed.
    ///
    /// # Errors
    /// Upstream failures, and a payload without candidate text
    /// ([`TriageError::MalformedPayload`]), are always returned.
    pub async fn follow_up(&self, report: &SymptomReport) -> TriageResult<String> {
        let prompt = prompt::build(PromptKind::FollowUp, report);
        let response = self.model.generate(&prompt).await?;

        response
            .first_candidate_text()
            .map(str::to_owned)
            .ok_or_else(|| TriageError::MalformedPayload("no candidate text in response".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::GenerateContentResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a fixed outcome and records every prompt it receives.
    struct StubModel {
        outcome: Box<dyn Fn() -> TriageResult<GenerateContentResponse> + Send + Sync>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubModel {
        fn new(
            outcome: impl Fn() -> TriageResult<GenerateContentResponse> + Send + Sync + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                outcome: Box::new(outcome),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn text(text: &'static str) -> Arc<Self> {
            Self::new(move || Ok(GenerateContentResponse::from_text(text)))
        }

        fn failing() -> Arc<Self> {
            Self::new(|| {
                Err(TriageError::UpstreamStatus {
                    status: 500,
                    body: "internal".into(),
                })
            })
        }
    }

    #[async_trait]
    impl GenerativeModel for StubModel {
        async fn generate(&self, prompt: &str) -> TriageResult<GenerateContentResponse> {
            self.prompts.lock().unwrap().push(prompt.to_owned());
            (self.outcome)()
        }
    }

    fn report() -> SymptomReport {
        SymptomReport::new(["dolor intenso"], None).unwrap()
    }

    fn service(model: Arc<StubModel>, failure_policy: FailurePolicy) -> TriageService {
        TriageService::new(model, failure_policy, LabelPolicy::Permissive)
    }

    #[tokio::test]
    async fn diagnose_interprets_candidate_text() {
        let model = StubModel::text("(PRIORIDAD III) Dolor abdominal estable");
        let svc = service(model.clone(), FailurePolicy::Fallback);

        let label = svc.diagnose(&report()).await.unwrap();
        assert_eq!(label.as_str(), "PRIORIDAD III");

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1, "exactly one upstream attempt");
        assert!(prompts[0].ends_with("dolor intenso"));
    }

    #[tokio::test]
    async fn diagnose_falls_back_on_upstream_failure() {
        let model = StubModel::failing();
        let svc = service(model.clone(), FailurePolicy::Fallback);

        let label = svc.diagnose(&report()).await.unwrap();
        assert_eq!(label.as_str(), "PRIORIDAD I");
        assert_eq!(model.prompts.lock().unwrap().len(), 1, "no retries");
    }

    #[tokio::test]
    async fn diagnose_propagates_when_configured() {
        let svc = service(StubModel::failing(), FailurePolicy::Propagate);

        let err = svc.diagnose(&report()).await.unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn diagnose_without_candidates_gives_default_under_both_policies() {
        for policy in [FailurePolicy::Fallback, FailurePolicy::Propagate] {
            let model = StubModel::new(|| Ok(GenerateContentResponse::default()));
            let label = service(model, policy).diagnose(&report()).await.unwrap();
            assert_eq!(label.as_str(), "PRIORIDAD I");
        }
    }

    #[tokio::test]
    async fn diagnose_applies_strict_label_policy() {
        let model = StubModel::text("PRIORIDAD V");
        let permissive = TriageService::new(
            model.clone(),
            FailurePolicy::Fallback,
            LabelPolicy::Permissive,
        );
        let strict = TriageService::new(model, FailurePolicy::Fallback, LabelPolicy::Strict);

        assert_eq!(
            permissive.diagnose(&report()).await.unwrap().as_str(),
            "PRIORIDAD V"
        );
        assert_eq!(
            strict.diagnose(&report()).await.unwrap().as_str(),
            "PRIORIDAD I"
        );
    }

    #[tokio::test]
    async fn diagnose_prompt_includes_procedure() {
        let model = StubModel::text("(PRIORIDAD IV)");
        let svc = service(model.clone(), FailurePolicy::Fallback);
        let report = SymptomReport::new(["picor en la herida"], Some("apendicectomía".into()))
            .unwrap();

        svc.diagnose(&report).await.unwrap();
        assert!(model.prompts.lock().unwrap()[0].contains("apendicectomía"));
    }

    #[tokio::test]
    async fn follow_up_returns_raw_text() {
        let text = "1. Reposo\n2. Hidratación (PRIORIDAD IV no aplica)";
        let model = StubModel::text(text);
        let svc = service(model.clone(), FailurePolicy::Fallback);

        assert_eq!(svc.follow_up(&report()).await.unwrap(), text);
        assert!(model.prompts.lock().unwrap()[0]
            .starts_with("Recomienda acciones para los siguientes síntomas postoperatorios:"));
    }

    #[tokio::test]
    async fn follow_up_reports_upstream_failure_even_with_fallback() {
        let svc = service(StubModel::failing(), FailurePolicy::Fallback);
        let err = svc.follow_up(&report()).await.unwrap_err();
        assert!(matches!(err, TriageError::UpstreamStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn follow_up_without_candidates_is_malformed_payload() {
        let model = StubModel::new(|| Ok(GenerateContentResponse::default()));
        let err = service(model, FailurePolicy::Fallback)
            .follow_up(&report())
            .await
            .unwrap_err();
        assert!(matches!(err, TriageError::MalformedPayload(_)));
    }

    #[test]
    fn failure_policy_parses() {
        assert_eq!(
            "Propagate".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::Propagate
        );
        assert!("retry".parse::<FailurePolicy>().is_err());
    }
}
