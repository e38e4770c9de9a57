use crate::model::analysis::CircuitAnalysis;
use serde::{Deserialize, Serialize};

/// Ranked multi-circuit result from one comparison call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ComparisonData {
    #[serde(deserialize_with = "crate::model::null_as_default")]
    pub circuits: Vec<CircuitAnalysis>,
    /// Circuit names or ids, most to least unpredictable.
    #[serde(deserialize_with = "crate::model::null_as_default")]
    pub ranking: Vec<String>,
    #[serde(deserialize_with = "crate::model::null_as_default")]
    pub insight: String,
}

impl ComparisonData {
    pub fn leader(&self) -> Option<&str> {
        self.ranking.first().map(String::as_str)
    }

    pub fn is_blank(&self) -> bool {
        self.circuits.is_empty() && self.ranking.is_empty() && self.insight.is_empty()
    }
}
