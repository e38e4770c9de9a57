use crate::decode::ResponseDecoder;
use crate::model::{CircuitAnalysis, ComparisonData};
use crate::orchestrator::state::{Ticket, ViewMode};
use crate::prelude::{AnalysisError, AnalysisResult, ModelGateway, ModelRequest};

/// A request the orchestrator has issued and expects to be executed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub ticket: Ticket,
    pub request: ModelRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Single(AnalysisResult<CircuitAnalysis>),
    Comparison(AnalysisResult<ComparisonData>),
}

/// Result of executing a `PendingRequest`, handed back to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: Outcome,
}

impl Completion {
    /// Completion for a request that never reached the gateway.
    pub fn failed(ticket: Ticket, error: AnalysisError) -> Self {
        let outcome = match ticket.mode {
            ViewMode::Single => Outcome::Single(Err(error)),
            ViewMode::Comparison => Outcome::Comparison(Err(error)),
        };
        Self { ticket, outcome }
    }
}

/// One gateway call followed by a decode. Never touches orchestrator state.
pub async fn execute(
    gateway: &dyn ModelGateway,
    decoder: ResponseDecoder,
    pending: PendingRequest,
) -> Completion {
    let PendingRequest { ticket, request } = pending;
    let payload = match gateway.send(&request).await {
        Ok(payload) => payload,
        Err(err) => return Completion::failed(ticket, err.into()),
    };

    let outcome = match ticket.mode {
        ViewMode::Single => Outcome::Single(
            decoder
                .decode_analysis(payload.as_deref())
                .map_err(AnalysisError::from),
        ),
        ViewMode::Comparison => Outcome::Comparison(
            decoder
                .decode_comparison(payload.as_deref())
                .map_err(AnalysisError::from),
        ),
    };
    Completion { ticket, outcome }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::{DecodeError, GatewayError};
    use crate::request::{build_analysis_request, build_comparison_request};
    use async_trait::async_trait;

    struct FixedGateway(Result<Option<String>, GatewayError>);

    #[async_trait]
    impl ModelGateway for FixedGateway {
        async fn send(&self, _request: &ModelRequest) -> Result<Option<String>, GatewayError> {
            self.0.clone()
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    fn single(seq: u64) -> PendingRequest {
        PendingRequest {
            ticket: Ticket {
                mode: ViewMode::Single,
                seq,
            },
            request: build_analysis_request("spa", "Circuit de Spa-Francorchamps").unwrap(),
        }
    }

    #[tokio::test]
    async fn gateway_text_is_decoded_for_the_ticket_mode() {
        let gateway = FixedGateway(Ok(Some(r#"{"circuitId":"spa","metrics":{"score":82}}"#.into())));
        let completion = execute(&gateway, ResponseDecoder::default(), single(1)).await;
        assert_eq!(completion.ticket.seq, 1);
        match completion.outcome {
            Outcome::Single(Ok(analysis)) => assert_eq!(analysis.score(), Some(82.0)),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_text_decodes_as_blank_comparison() {
        let gateway = FixedGateway(Ok(None));
        let pending = PendingRequest {
            ticket: Ticket {
                mode: ViewMode::Comparison,
                seq: 4,
            },
            request: build_comparison_request(&["Monaco Grand Prix"]).unwrap(),
        };
        let completion = execute(&gateway, ResponseDecoder::default(), pending).await;
        match completion.outcome {
            Outcome::Comparison(Ok(data)) => assert!(data.is_blank()),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn gateway_and_decode_failures_stay_distinct() {
        let down = FixedGateway(Err(GatewayError::Status {
            status: 429,
            message: "quota".into(),
        }));
        let completion = execute(&down, ResponseDecoder::default(), single(2)).await;
        assert!(matches!(
            completion.outcome,
            Outcome::Single(Err(AnalysisError::Gateway(GatewayError::Status { status: 429, .. })))
        ));

        let garbage = FixedGateway(Ok(Some("not json".into())));
        let completion = execute(&garbage, ResponseDecoder::default(), single(3)).await;
        assert!(matches!(
            completion.outcome,
            Outcome::Single(Err(AnalysisError::Decode(DecodeError::Malformed(_))))
        ));
    }
}
