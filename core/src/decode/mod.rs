//! Turns raw model text into typed analysis results.
//!
//! A missing or blank payload decodes as `{}`. In permissive mode absent
//! fields come back as blanks; strict mode reports the first absent required
//! field instead.

use crate::model::{CircuitAnalysis, ComparisonData, UnpredictabilityMetrics};
use crate::prelude::DecodeError;
use crate::request::schema::{ANALYSIS_FIELDS, METRIC_FIELDS};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DecodeMode {
    #[default]
    Permissive,
    Strict,
}

/// What to do with metric values outside their documented bounds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricPolicy {
    #[default]
    PassThrough,
    Clamp,
    Reject,
}

/// Documented bounds for a metric field, by wire name.
pub fn metric_bounds(field: &str) -> (f64, f64) {
    match field {
        "safetyCarFrequency" | "overtakesPerRace" => (0.0, f64::INFINITY),
        _ => (0.0, 100.0),
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResponseDecoder {
    pub mode: DecodeMode,
    pub metric_policy: MetricPolicy,
}

impl ResponseDecoder {
    pub fn new(mode: DecodeMode, metric_policy: MetricPolicy) -> Self {
        Self {
            mode,
            metric_policy,
        }
    }

    pub fn strict() -> Self {
        Self::new(DecodeMode::Strict, MetricPolicy::PassThrough)
    }

    pub fn decode_analysis(&self, payload: Option<&str>) -> Result<CircuitAnalysis, DecodeError> {
        let value = parse_document(payload)?;
        if self.mode == DecodeMode::Strict {
            require_analysis(&value, "")?;
        }
        let mut analysis: CircuitAnalysis = structural(value)?;
        if let Some(metrics) = analysis.metrics.as_mut() {
            self.apply_policy(metrics, "metrics")?;
        }
        Ok(analysis)
    }

    pub fn decode_comparison(&self, payload: Option<&str>) -> Result<ComparisonData, DecodeError> {
        let value = parse_document(payload)?;
        if self.mode == DecodeMode::Strict {
            require_comparison(&value)?;
        }
        let mut comparison: ComparisonData = structural(value)?;
        for (idx, circuit) in comparison.circuits.iter_mut().enumerate() {
            if let Some(metrics) = circuit.metrics.as_mut() {
                self.apply_policy(metrics, &format!("circuits[{idx}].metrics"))?;
            }
        }
        Ok(comparison)
    }

    fn apply_policy(
        &self,
        metrics: &mut UnpredictabilityMetrics,
        path: &str,
    ) -> Result<(), DecodeError> {
        if self.metric_policy == MetricPolicy::PassThrough {
            return Ok(());
        }
        for (field, slot) in metrics.fields_mut() {
            let Some(value) = *slot else { continue };
            let (min, max) = metric_bounds(field);
            if (min..=max).contains(&value) {
                continue;
            }
            match self.metric_policy {
                MetricPolicy::Clamp => {
                    warn!("clamping {path}.{field} = {value} into {min}..={max}");
                    *slot = Some(value.clamp(min, max));
                }
                MetricPolicy::Reject => {
                    return Err(DecodeError::OutOfRange {
                        field: format!("{path}.{field}"),
                        value,
                        min,
                        max,
                    });
                }
                MetricPolicy::PassThrough => {}
            }
        }
        Ok(())
    }
}

fn parse_document(payload: Option<&str>) -> Result<Value, DecodeError> {
    let text = payload.map(str::trim).filter(|t| !t.is_empty());
    if text.is_none() {
        debug!("empty model payload, decoding as {{}}");
    }
    match serde_json::from_str::<Value>(text.unwrap_or("{}")) {
        Ok(Value::Null) => Ok(Value::Object(Map::new())),
        Ok(value) => Ok(value),
        Err(err) => Err(DecodeError::Malformed(err.to_string())),
    }
}

fn structural<T: DeserializeOwned>(value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|e| DecodeError::Malformed(e.to_string()))
}

fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

fn require_fields(value: &Value, prefix: &str, fields: &[&str]) -> Result<(), DecodeError> {
    for field in fields {
        if value.get(*field).map_or(true, Value::is_null) {
            return Err(DecodeError::MissingField(join(prefix, field)));
        }
    }
    Ok(())
}

fn require_items(value: &Value, path: &str, fields: &[&str]) -> Result<(), DecodeError> {
    if let Some(items) = value.as_array() {
        for (idx, item) in items.iter().enumerate() {
            require_fields(item, &format!("{path}[{idx}]"), fields)?;
        }
    }
    Ok(())
}

fn require_analysis(value: &Value, prefix: &str) -> Result<(), DecodeError> {
    require_fields(value, prefix, &ANALYSIS_FIELDS)?;
    require_fields(&value["metrics"], &join(prefix, "metrics"), &METRIC_FIELDS)?;
    require_items(
        &value["historicalTrend"],
        &join(prefix, "historicalTrend"),
        &["season", "score"],
    )?;
    require_items(
        &value["safetyCarTrend"],
        &join(prefix, "safetyCarTrend"),
        &["season", "deployments"],
    )
}

fn require_comparison(value: &Value) -> Result<(), DecodeError> {
    require_fields(value, "", &["circuits", "ranking", "insight"])?;
    require_items(&value["circuits"], "circuits", &["circuitId", "metrics"])
}
