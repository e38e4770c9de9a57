use crate::catalog::{Catalog, CircuitIdentity};
use crate::model::{CircuitAnalysis, ComparisonData};
use crate::orchestrator::pipeline::{Completion, Outcome, PendingRequest};
use crate::orchestrator::state::{Slot, Ticket, ViewMode, ViewState};
use crate::prelude::{AnalysisError, RequestError};
use crate::request::{build_analysis_request, build_comparison_request};
use crate::telemetry::{LogManager, MetricsRecorder, RequestCounters};
use serde::Serialize;

pub const DEFAULT_COMPARISON_LIMIT: usize = 6;
pub const SINGLE_FAILURE_MESSAGE: &str =
    "Failed to fetch circuit analysis. Please check your API key.";
pub const COMPARISON_FAILURE_MESSAGE: &str = "Comparison failed.";

/// Serializable view of everything the presentation layer reads.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratorSnapshot {
    pub selected: Option<&'static str>,
    pub visible: ViewMode,
    pub single: ViewState<CircuitAnalysis>,
    pub comparison: ViewState<ComparisonData>,
    pub counters: RequestCounters,
}

/// Owns the selection and both view state machines.
///
/// Issuing returns a `PendingRequest`; the caller executes it and hands the
/// `Completion` back through `resolve`. Only the most recently issued request
/// of a view is ever applied.
pub struct Orchestrator {
    catalog: Catalog,
    comparison_limit: usize,
    next_seq: u64,
    selected: Option<&'static CircuitIdentity>,
    visible: ViewMode,
    single: Slot<CircuitAnalysis>,
    comparison: Slot<ComparisonData>,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl Orchestrator {
    pub fn new(catalog: Catalog, comparison_limit: usize) -> Self {
        Self {
            catalog,
            comparison_limit,
            next_seq: 0,
            selected: None,
            visible: ViewMode::Single,
            single: Slot::new(),
            comparison: Slot::new(),
            logger: LogManager::new("orchestrator"),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selected(&self) -> Option<&'static CircuitIdentity> {
        self.selected
    }

    pub fn visible(&self) -> ViewMode {
        self.visible
    }

    pub fn single(&self) -> &ViewState<CircuitAnalysis> {
        &self.single.state
    }

    pub fn comparison(&self) -> &ViewState<ComparisonData> {
        &self.comparison.state
    }

    pub fn counters(&self) -> RequestCounters {
        self.metrics.snapshot()
    }

    /// True while the visible view is waiting on the model.
    pub fn is_loading(&self) -> bool {
        match self.visible {
            ViewMode::Single => self.single.state.is_loading(),
            ViewMode::Comparison => self.comparison.state.is_loading(),
        }
    }

    /// User-facing error of the visible view, if any.
    pub fn visible_error(&self) -> Option<&str> {
        match self.visible {
            ViewMode::Single => self.single.state.error(),
            ViewMode::Comparison => self.comparison.state.error(),
        }
    }

    pub fn snapshot(&self) -> OrchestratorSnapshot {
        OrchestratorSnapshot {
            selected: self.selected.map(|circuit| circuit.id),
            visible: self.visible,
            single: self.single.state.clone(),
            comparison: self.comparison.state.clone(),
            counters: self.counters(),
        }
    }

    /// Selects the first catalog circuit, as the dashboard does on start.
    pub fn boot(&mut self) -> Result<Option<PendingRequest>, RequestError> {
        match self.catalog.first() {
            Some(circuit) => self.select(circuit.id),
            None => Ok(None),
        }
    }

    /// Changes the selected circuit and shows the single view.
    ///
    /// A new id always issues a fetch; the current id behaves like
    /// `show(ViewMode::Single)`.
    pub fn select(&mut self, circuit_id: &str) -> Result<Option<PendingRequest>, RequestError> {
        let circuit = self
            .catalog
            .by_id(circuit_id)
            .ok_or_else(|| RequestError::UnknownCircuit(circuit_id.to_string()))?;

        if self.selected.map(|current| current.id) == Some(circuit.id) {
            return self.show(ViewMode::Single);
        }

        self.selected = Some(circuit);
        self.visible = ViewMode::Single;
        self.issue_single(circuit).map(Some)
    }

    /// Issues a comparison over the leading catalog circuits and shows it.
    pub fn request_comparison(&mut self) -> Result<PendingRequest, RequestError> {
        let names = self.catalog.leading_names(self.comparison_limit);
        let request = build_comparison_request(&names)?;
        self.visible = ViewMode::Comparison;
        let ticket = self.next_ticket(ViewMode::Comparison);
        self.comparison.begin(ticket.seq);
        self.logger.record(&format!(
            "comparison #{} over {} circuits",
            ticket.seq,
            names.len()
        ));
        Ok(PendingRequest { ticket, request })
    }

    /// Switches the visible view. Fetches only when that view is idle or failed.
    pub fn show(&mut self, mode: ViewMode) -> Result<Option<PendingRequest>, RequestError> {
        self.visible = mode;
        match mode {
            ViewMode::Single => match self.selected {
                Some(circuit) if self.single.state.needs_fetch() => {
                    self.issue_single(circuit).map(Some)
                }
                _ => Ok(None),
            },
            ViewMode::Comparison if self.comparison.state.needs_fetch() => {
                self.request_comparison().map(Some)
            }
            ViewMode::Comparison => Ok(None),
        }
    }

    /// Applies a completion if it belongs to the latest request of its view.
    ///
    /// Returns whether the view changed.
    pub fn resolve(&mut self, completion: Completion) -> bool {
        let Completion { ticket, outcome } = completion;
        match outcome {
            Outcome::Single(result) => apply(
                &mut self.single,
                ticket,
                result,
                SINGLE_FAILURE_MESSAGE,
                &self.logger,
                &self.metrics,
            ),
            Outcome::Comparison(result) => apply(
                &mut self.comparison,
                ticket,
                result,
                COMPARISON_FAILURE_MESSAGE,
                &self.logger,
                &self.metrics,
            ),
        }
    }

    fn issue_single(
        &mut self,
        circuit: &'static CircuitIdentity,
    ) -> Result<PendingRequest, RequestError> {
        let request = build_analysis_request(circuit.id, circuit.name)?;
        let ticket = self.next_ticket(ViewMode::Single);
        self.single.begin(ticket.seq);
        self.logger
            .record(&format!("analysis #{} for {}", ticket.seq, circuit.id));
        Ok(PendingRequest { ticket, request })
    }

    fn next_ticket(&mut self, mode: ViewMode) -> Ticket {
        self.next_seq += 1;
        self.metrics.record_issued();
        Ticket {
            mode,
            seq: self.next_seq,
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(Catalog::builtin(), DEFAULT_COMPARISON_LIMIT)
    }
}

fn apply<T>(
    slot: &mut Slot<T>,
    ticket: Ticket,
    result: Result<T, AnalysisError>,
    failure_message: &str,
    logger: &LogManager,
    metrics: &MetricsRecorder,
) -> bool {
    if !slot.accepts(ticket.seq) {
        logger.trace(&format!(
            "dropping superseded {:?} result #{}",
            ticket.mode, ticket.seq
        ));
        metrics.record_superseded();
        return false;
    }

    match result {
        Ok(value) => {
            slot.state = ViewState::Ready(value);
            metrics.record_applied();
        }
        Err(err) => {
            let context = failure_context(&err);
            logger.record_failure(&format!("{:?} #{} {}", ticket.mode, ticket.seq, context), &err);
            slot.state = ViewState::Failed(failure_message.to_string());
            metrics.record_failed();
        }
    }
    true
}

/// Log prefix naming the cause behind a static user-facing message.
fn failure_context(err: &AnalysisError) -> &'static str {
    match err {
        AnalysisError::Gateway(cause) if cause.is_auth() => "gateway rejected the API key",
        AnalysisError::Gateway(cause) if cause.is_quota() => "gateway quota exhausted",
        AnalysisError::Gateway(_) => "gateway call failed",
        AnalysisError::Decode(_) => "response decode failed",
        AnalysisError::Request(_) => "request rejected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::{DecodeError, GatewayError};

    fn analysis(id: &str, score: f64) -> CircuitAnalysis {
        serde_json::from_value(serde_json::json!({
            "circuitId": id,
            "metrics": { "score": score }
        }))
        .unwrap()
    }

    fn ok_single(pending: &PendingRequest, id: &str, score: f64) -> Completion {
        Completion {
            ticket: pending.ticket,
            outcome: Outcome::Single(Ok(analysis(id, score))),
        }
    }

    #[test]
    fn boot_selects_first_circuit() {
        let mut orchestrator = Orchestrator::default();
        let pending = orchestrator.boot().unwrap().unwrap();
        assert_eq!(orchestrator.selected().map(|c| c.id), Some("monaco"));
        assert_eq!(pending.ticket.mode, ViewMode::Single);
        assert!(pending.request.prompt.contains("Monaco Grand Prix"));
        assert!(orchestrator.single().is_loading());
    }

    #[test]
    fn selecting_spa_reaches_ready_with_its_score() {
        let mut orchestrator = Orchestrator::default();
        let pending = orchestrator.select("spa").unwrap().unwrap();
        assert!(orchestrator.resolve(ok_single(&pending, "spa", 82.0)));
        let ready = orchestrator.single().ready().unwrap();
        assert_eq!(ready.score(), Some(82.0));
        assert_eq!(orchestrator.counters().applied, 1);
    }

    #[test]
    fn latest_issued_request_wins_regardless_of_resolution_order() {
        let mut orchestrator = Orchestrator::default();
        let a = orchestrator.select("spa").unwrap().unwrap();
        let b = orchestrator.select("monza").unwrap().unwrap();
        assert!(b.ticket.seq > a.ticket.seq);

        assert!(orchestrator.resolve(ok_single(&b, "monza", 55.0)));
        assert!(!orchestrator.resolve(ok_single(&a, "spa", 82.0)));
        assert_eq!(
            orchestrator.single().ready().map(|r| r.circuit_id.as_str()),
            Some("monza")
        );
        assert_eq!(orchestrator.counters().superseded, 1);
    }

    #[test]
    fn early_superseded_result_leaves_view_loading() {
        let mut orchestrator = Orchestrator::default();
        let a = orchestrator.select("spa").unwrap().unwrap();
        let _b = orchestrator.select("monza").unwrap().unwrap();
        assert!(!orchestrator.resolve(ok_single(&a, "spa", 82.0)));
        assert!(orchestrator.single().is_loading());
    }

    #[test]
    fn failure_replaces_previous_ready_result() {
        let mut orchestrator = Orchestrator::default();
        let first = orchestrator.select("spa").unwrap().unwrap();
        orchestrator.resolve(ok_single(&first, "spa", 82.0));

        let second = orchestrator.select("baku").unwrap().unwrap();
        orchestrator.resolve(Completion::failed(
            second.ticket,
            GatewayError::Transport("connection reset".into()).into(),
        ));

        assert!(orchestrator.single().ready().is_none());
        assert_eq!(orchestrator.visible_error(), Some(SINGLE_FAILURE_MESSAGE));
        assert_eq!(orchestrator.counters().failed, 1);
    }

    #[test]
    fn failure_context_names_auth_and_quota() {
        let status = |status: u16| {
            AnalysisError::from(GatewayError::Status {
                status,
                message: String::new(),
            })
        };
        assert_eq!(failure_context(&status(401)), "gateway rejected the API key");
        assert_eq!(failure_context(&status(403)), "gateway rejected the API key");
        assert_eq!(failure_context(&status(429)), "gateway quota exhausted");
        assert_eq!(failure_context(&status(500)), "gateway call failed");
        assert_eq!(
            failure_context(&DecodeError::Malformed("eof".into()).into()),
            "response decode failed"
        );
    }

    #[test]
    fn decode_failure_uses_the_same_user_message() {
        let mut orchestrator = Orchestrator::default();
        let pending = orchestrator.request_comparison().unwrap();
        orchestrator.resolve(Completion::failed(
            pending.ticket,
            DecodeError::Malformed("expected value".into()).into(),
        ));
        assert_eq!(orchestrator.comparison().error(), Some(COMPARISON_FAILURE_MESSAGE));
    }

    #[test]
    fn reselecting_current_circuit_does_not_refetch_ready_view() {
        let mut orchestrator = Orchestrator::default();
        let pending = orchestrator.select("spa").unwrap().unwrap();
        orchestrator.resolve(ok_single(&pending, "spa", 82.0));
        assert!(orchestrator.select("spa").unwrap().is_none());
        assert_eq!(orchestrator.counters().issued, 1);
    }

    #[test]
    fn reselecting_a_failed_circuit_retries() {
        let mut orchestrator = Orchestrator::default();
        let pending = orchestrator.select("spa").unwrap().unwrap();
        orchestrator.resolve(Completion::failed(
            pending.ticket,
            GatewayError::Status {
                status: 401,
                message: "bad key".into(),
            }
            .into(),
        ));
        let retry = orchestrator.select("spa").unwrap().unwrap();
        assert!(retry.ticket.seq > pending.ticket.seq);
        assert!(orchestrator.single().is_loading());
    }

    #[test]
    fn returning_to_an_earlier_circuit_issues_a_new_request() {
        let mut orchestrator = Orchestrator::default();
        let spa = orchestrator.select("spa").unwrap().unwrap();
        orchestrator.resolve(ok_single(&spa, "spa", 82.0));
        let monza = orchestrator.select("monza").unwrap().unwrap();
        orchestrator.resolve(ok_single(&monza, "monza", 40.0));
        assert!(orchestrator.select("spa").unwrap().is_some());
        assert!(orchestrator.single().is_loading());
    }

    #[test]
    fn unknown_circuit_is_rejected_without_state_change() {
        let mut orchestrator = Orchestrator::default();
        assert_eq!(
            orchestrator.select("nurburgring").unwrap_err(),
            RequestError::UnknownCircuit("nurburgring".into())
        );
        assert!(orchestrator.selected().is_none());
        assert_eq!(orchestrator.counters().issued, 0);
    }

    #[test]
    fn comparison_uses_leading_names_and_switches_view() {
        let mut orchestrator = Orchestrator::default();
        let pending = orchestrator.request_comparison().unwrap();
        assert_eq!(orchestrator.visible(), ViewMode::Comparison);
        assert!(pending.request.prompt.contains("Baku City Circuit"));
        assert!(!pending.request.prompt.contains("Marina Bay Street Circuit"));
    }

    #[test]
    fn toggling_to_a_ready_view_does_not_fetch() {
        let mut orchestrator = Orchestrator::default();
        let pending = orchestrator.request_comparison().unwrap();
        orchestrator.resolve(Completion {
            ticket: pending.ticket,
            outcome: Outcome::Comparison(Ok(ComparisonData::default())),
        });
        let spa = orchestrator.select("spa").unwrap().unwrap();
        assert_eq!(orchestrator.visible(), ViewMode::Single);

        assert!(orchestrator.show(ViewMode::Comparison).unwrap().is_none());
        assert!(orchestrator.comparison().ready().is_some());
        assert!(orchestrator.show(ViewMode::Single).unwrap().is_none());
        assert!(orchestrator.resolve(ok_single(&spa, "spa", 82.0)));
    }

    #[test]
    fn toggling_to_an_idle_comparison_fetches_it() {
        let mut orchestrator = Orchestrator::default();
        let pending = orchestrator.show(ViewMode::Comparison).unwrap();
        assert_eq!(pending.map(|p| p.ticket.mode), Some(ViewMode::Comparison));
        assert!(orchestrator.is_loading());
    }

    #[test]
    fn views_resolve_independently() {
        let mut orchestrator = Orchestrator::default();
        let single = orchestrator.select("spa").unwrap().unwrap();
        let comparison = orchestrator.request_comparison().unwrap();
        assert!(orchestrator.resolve(Completion {
            ticket: comparison.ticket,
            outcome: Outcome::Comparison(Ok(ComparisonData::default())),
        }));
        assert!(orchestrator.resolve(ok_single(&single, "spa", 82.0)));
        assert!(orchestrator.single().ready().is_some());
        assert!(orchestrator.comparison().ready().is_some());
    }

    #[test]
    fn empty_catalog_issues_nothing() {
        let mut orchestrator = Orchestrator::new(Catalog::from_static(&[]), 6);
        assert!(orchestrator.boot().unwrap().is_none());
        assert_eq!(
            orchestrator.request_comparison().unwrap_err(),
            RequestError::NoCircuits
        );
        assert_eq!(orchestrator.visible(), ViewMode::Single);
        assert!(orchestrator.comparison().needs_fetch());
    }

    #[test]
    fn snapshot_reports_selection_and_counters() {
        let mut orchestrator = Orchestrator::default();
        orchestrator.boot().unwrap();
        let snapshot = orchestrator.snapshot();
        assert_eq!(snapshot.selected, Some("monaco"));
        assert!(snapshot.single.is_loading());
        assert_eq!(snapshot.counters.issued, 1);
    }
}
