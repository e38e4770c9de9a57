use crate::workflow::config::AnalystConfig;
use chaoscore::catalog::CircuitIdentity;
use chaoscore::decode::ResponseDecoder;
use chaoscore::orchestrator::{execute, Orchestrator, OrchestratorSnapshot, PendingRequest};
use chaoscore::prelude::{ModelGateway, RequestError};
use log::info;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Drives the orchestrator against a gateway. Cloned handles share one orchestrator.
#[derive(Clone)]
pub struct Runner {
    gateway: Arc<dyn ModelGateway>,
    decoder: ResponseDecoder,
    orchestrator: Arc<RwLock<Orchestrator>>,
}

impl Runner {
    pub fn new(config: &AnalystConfig, gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            gateway,
            decoder: config.decoder(),
            orchestrator: Arc::new(RwLock::new(config.orchestrator())),
        }
    }

    pub fn model_name(&self) -> &str {
        self.gateway.model_name()
    }

    pub fn snapshot(&self) -> OrchestratorSnapshot {
        self.read().snapshot()
    }

    pub fn search(&self, query: &str) -> Vec<CircuitIdentity> {
        chaoscore::view::filter_catalog(self.read().catalog(), query)
            .into_iter()
            .copied()
            .collect()
    }

    pub fn resolve_circuit(&self, key: &str) -> Option<&'static CircuitIdentity> {
        self.read().catalog().resolve(key)
    }

    /// Selects a circuit and waits for its analysis.
    ///
    /// Returns whether this call's result was applied; a newer selection made
    /// while it was in flight wins.
    pub async fn select(&self, circuit_id: &str) -> Result<bool, RequestError> {
        let pending = self.write().select(circuit_id)?;
        Ok(self.drive(pending).await)
    }

    pub async fn compare(&self) -> Result<bool, RequestError> {
        let pending = self.write().request_comparison()?;
        Ok(self.drive(Some(pending)).await)
    }

    async fn drive(&self, pending: Option<PendingRequest>) -> bool {
        let Some(pending) = pending else {
            return false;
        };
        info!(
            "sending {:?} request #{} to {}",
            pending.ticket.mode,
            pending.ticket.seq,
            self.gateway.model_name()
        );
        let completion = execute(self.gateway.as_ref(), self.decoder, pending).await;
        self.write().resolve(completion)
    }

    fn read(&self) -> RwLockReadGuard<'_, Orchestrator> {
        self.orchestrator
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Orchestrator> {
        self.orchestrator
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use async_trait::async_trait;
    use chaoscore::prelude::{GatewayError, ModelGateway, ModelRequest};

    /// Answers every request with a canned payload picked by prompt content.
    pub(crate) struct StubGateway;

    pub(crate) const SPA: &str = r#"{"circuitId":"spa","metrics":{"score":82,"weatherVolatility":90,"safetyCarFrequency":0.8,"overtakesPerRace":40,"dnfRate":15,"strategyVariance":66},"historicalContext":"Ardennes microclimate.","topContributingFactors":["Rain","Long lap"],"recentTriggers":[{"event":"2021 washout","impact":"High"}],"historicalTrend":[{"season":2022,"score":78},{"season":2023,"score":84}],"safetyCarTrend":[{"season":2023,"deployments":2}]}"#;
    pub(crate) const COMPARISON: &str = r#"{"circuits":[{"circuitId":"monaco","metrics":{"score":45}},{"circuitId":"spa","metrics":{"score":84,"weatherVolatility":92,"safetyCarFrequency":0.9}}],"ranking":["Circuit de Spa-Francorchamps","Monaco Grand Prix"],"insight":"Weather dominates."}"#;

    #[async_trait]
    impl ModelGateway for StubGateway {
        async fn send(&self, request: &ModelRequest) -> Result<Option<String>, GatewayError> {
            if request.prompt.contains("(spa)") {
                Ok(Some(SPA.to_string()))
            } else if request.prompt.starts_with("Compare") {
                Ok(Some(COMPARISON.to_string()))
            } else {
                Err(GatewayError::Status {
                    status: 403,
                    message: "API key not valid".into(),
                })
            }
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }
}
