pub mod controller;
pub mod pipeline;
pub mod state;

pub use controller::{
    Orchestrator, OrchestratorSnapshot, COMPARISON_FAILURE_MESSAGE, DEFAULT_COMPARISON_LIMIT,
    SINGLE_FAILURE_MESSAGE,
};
pub use pipeline::{execute, Completion, Outcome, PendingRequest};
pub use state::{Ticket, ViewMode, ViewState};
