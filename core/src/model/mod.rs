pub mod analysis;
pub mod comparison;

pub use analysis::{CircuitAnalysis, SafetyCarPoint, TrendPoint, Trigger, UnpredictabilityMetrics};
pub use comparison::ComparisonData;

use serde::{Deserialize, Deserializer};

/// Reads an explicit `null` as the field's blank value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
