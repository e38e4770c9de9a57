//! Request/response pipeline behind the circuit unpredictability dashboard.
//!
//! Builders turn a circuit (or a list of circuits) into a schema-constrained
//! model request, the gateway performs the call, the decoder types the reply,
//! and the orchestrator decides which reply the presentation layer sees.

pub mod catalog;
pub mod decode;
pub mod gateway;
pub mod model;
pub mod orchestrator;
pub mod prelude;
pub mod request;
pub mod telemetry;
pub mod view;

pub use prelude::{AnalysisError, ModelGateway, ModelRequest, RequestKind};
