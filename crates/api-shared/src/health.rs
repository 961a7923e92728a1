use crate::types::HealthRes;

/// Health check used by the REST API and load balancers.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Report the service as alive. The check never calls upstream.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Triage API is alive".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_is_ok() {
        let res = HealthService::check_health();
        assert!(res.ok);
        assert_eq!(res.message, "Triage API is alive");
    }
}
