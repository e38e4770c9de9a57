use serde::{Deserialize, Serialize};

/// Model-estimated unpredictability dimensions for one circuit.
///
/// Every field is optional because a sparse payload is still a valid decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UnpredictabilityMetrics {
    /// Overall index, nominally 0-100.
    pub score: Option<f64>,
    /// 0-100.
    pub weather_volatility: Option<f64>,
    /// Average deployments per race.
    pub safety_car_frequency: Option<f64>,
    pub overtakes_per_race: Option<f64>,
    /// Percentage of entries that did not finish.
    pub dnf_rate: Option<f64>,
    /// 0-100.
    pub strategy_variance: Option<f64>,
}

impl UnpredictabilityMetrics {
    /// Field name and value pairs in schema order.
    pub fn fields(&self) -> [(&'static str, Option<f64>); 6] {
        [
            ("score", self.score),
            ("weatherVolatility", self.weather_volatility),
            ("safetyCarFrequency", self.safety_car_frequency),
            ("overtakesPerRace", self.overtakes_per_race),
            ("dnfRate", self.dnf_rate),
            ("strategyVariance", self.strategy_variance),
        ]
    }

    pub fn fields_mut(&mut self) -> [(&'static str, &mut Option<f64>); 6] {
        [
            ("score", &mut self.score),
            ("weatherVolatility", &mut self.weather_volatility),
            ("safetyCarFrequency", &mut self.safety_car_frequency),
            ("overtakesPerRace", &mut self.overtakes_per_race),
            ("dnfRate", &mut self.dnf_rate),
            ("strategyVariance", &mut self.strategy_variance),
        ]
    }

    pub fn is_blank(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_none())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Trigger {
    #[serde(deserialize_with = "crate::model::null_as_default")]
    pub event: String,
    #[serde(deserialize_with = "crate::model::null_as_default")]
    pub impact: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrendPoint {
    pub season: Option<i32>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SafetyCarPoint {
    pub season: Option<i32>,
    pub deployments: Option<f64>,
}

/// Full single-circuit result as returned by one model call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CircuitAnalysis {
    #[serde(deserialize_with = "crate::model::null_as_default")]
    pub circuit_id: String,
    pub metrics: Option<UnpredictabilityMetrics>,
    #[serde(deserialize_with = "crate::model::null_as_default")]
    pub historical_context: String,
    #[serde(deserialize_with = "crate::model::null_as_default")]
    pub top_contributing_factors: Vec<String>,
    #[serde(deserialize_with = "crate::model::null_as_default")]
    pub recent_triggers: Vec<Trigger>,
    #[serde(deserialize_with = "crate::model::null_as_default")]
    pub historical_trend: Vec<TrendPoint>,
    #[serde(deserialize_with = "crate::model::null_as_default")]
    pub safety_car_trend: Vec<SafetyCarPoint>,
}

impl CircuitAnalysis {
    pub fn score(&self) -> Option<f64> {
        self.metrics.as_ref().and_then(|metrics| metrics.score)
    }

    /// True when the payload carried nothing worth rendering.
    pub fn is_blank(&self) -> bool {
        self.circuit_id.is_empty()
            && self.metrics.as_ref().map_or(true, |m| m.is_blank())
            && self.historical_context.is_empty()
            && self.top_contributing_factors.is_empty()
            && self.recent_triggers.is_empty()
            && self.historical_trend.is_empty()
            && self.safety_car_trend.is_empty()
    }
}
