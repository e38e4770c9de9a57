use chaoscore::orchestrator::OrchestratorSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SelectBody {
    pub circuit_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: String,
}

/// Reply to `/select` and `/compare`.
#[derive(Debug, Clone, Serialize)]
pub struct ActionReply {
    /// False when a newer request superseded this one before it resolved.
    pub applied: bool,
    pub state: OrchestratorSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorReply {
    pub error: String,
}
