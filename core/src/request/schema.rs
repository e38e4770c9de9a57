//! Output schemas in the OpenAPI subset the generateContent endpoint accepts.

use serde_json::{json, Value};

pub const METRIC_FIELDS: [&str; 6] = [
    "score",
    "weatherVolatility",
    "safetyCarFrequency",
    "overtakesPerRace",
    "dnfRate",
    "strategyVariance",
];

pub const ANALYSIS_FIELDS: [&str; 7] = [
    "circuitId",
    "metrics",
    "historicalContext",
    "topContributingFactors",
    "recentTriggers",
    "historicalTrend",
    "safetyCarTrend",
];

fn number(description: Option<&str>) -> Value {
    match description {
        Some(text) => json!({ "type": "NUMBER", "description": text }),
        None => json!({ "type": "NUMBER" }),
    }
}

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

fn season_series(value_field: &str) -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "season": { "type": "INTEGER" },
                value_field: { "type": "NUMBER" }
            },
            "required": ["season", value_field]
        }
    })
}

/// Metrics object with per-field hints and every dimension required.
pub fn metrics_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": number(Some("Total unpredictability score 0-100")),
            "weatherVolatility": number(Some("0-100")),
            "safetyCarFrequency": number(Some("Average per race, e.g., 0.8")),
            "overtakesPerRace": number(None),
            "dnfRate": number(Some("Percentage")),
            "strategyVariance": number(Some("0-100"))
        },
        "required": METRIC_FIELDS
    })
}

/// Loose metrics object used inside comparison circuits.
pub fn compact_metrics_schema() -> Value {
    let properties: serde_json::Map<String, Value> = METRIC_FIELDS
        .iter()
        .map(|field| (field.to_string(), number(None)))
        .collect();
    json!({ "type": "OBJECT", "properties": properties })
}

pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "circuitId": { "type": "STRING" },
            "metrics": metrics_schema(),
            "historicalContext": { "type": "STRING" },
            "topContributingFactors": string_array(),
            "recentTriggers": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "event": { "type": "STRING" },
                        "impact": { "type": "STRING" }
                    }
                }
            },
            "historicalTrend": season_series("score"),
            "safetyCarTrend": season_series("deployments")
        },
        "required": ANALYSIS_FIELDS
    })
}

pub fn comparison_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "circuits": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "circuitId": { "type": "STRING" },
                        "metrics": compact_metrics_schema(),
                        "historicalContext": { "type": "STRING" }
                    }
                }
            },
            "ranking": string_array(),
            "insight": { "type": "STRING" }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_schema_requires_every_top_level_field() {
        let schema = analysis_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, ANALYSIS_FIELDS);
        for field in ANALYSIS_FIELDS {
            assert!(schema["properties"].get(field).is_some(), "{field}");
        }
    }

    #[test]
    fn trend_items_require_season_and_value() {
        let schema = analysis_schema();
        let trend = &schema["properties"]["safetyCarTrend"]["items"];
        assert_eq!(trend["required"], json!(["season", "deployments"]));
        assert_eq!(trend["properties"]["season"]["type"], "INTEGER");
    }

    #[test]
    fn comparison_metrics_have_no_required_list() {
        let schema = comparison_schema();
        let metrics = &schema["properties"]["circuits"]["items"]["properties"]["metrics"];
        assert!(metrics.get("required").is_none());
        assert_eq!(metrics["properties"].as_object().unwrap().len(), 6);
    }
}
