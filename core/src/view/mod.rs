//! Pure shaping of decoded results for rendering.

use crate::catalog::{Catalog, CircuitIdentity};
use crate::model::{CircuitAnalysis, ComparisonData, UnpredictabilityMetrics};
use serde::Serialize;

/// Score above which a circuit card is highlighted.
pub const HOT_SCORE: f64 = 70.0;
pub const BLANK: &str = "--";

/// One row of the ranked comparison list.
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry<'a> {
    /// 1 is the most unpredictable.
    pub position: usize,
    /// The ranking key exactly as the model returned it.
    pub label: &'a str,
    pub circuit: Option<&'static CircuitIdentity>,
    pub analysis: Option<&'a CircuitAnalysis>,
}

impl RankedEntry<'_> {
    pub fn score(&self) -> Option<f64> {
        self.analysis.and_then(CircuitAnalysis::score)
    }

    pub fn display_name(&self) -> &str {
        self.circuit.map(|c| c.name).unwrap_or(self.label)
    }
}

/// Bars of the multi-circuit comparison chart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonRow {
    pub label: String,
    pub score: Option<f64>,
    pub weather: Option<f64>,
    /// Safety-car frequency scaled onto the 0-100 axis.
    pub safety_car: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct RadarAxis {
    pub label: &'static str,
    pub value: Option<f64>,
    pub full_mark: f64,
}

/// Raw case-insensitive substring match; surrounding spaces are part of the query.
pub fn filter_catalog(catalog: &Catalog, query: &str) -> Vec<&'static CircuitIdentity> {
    catalog.filter(query)
}

fn same_circuit(analysis: &CircuitAnalysis, key: &str, circuit: Option<&CircuitIdentity>) -> bool {
    analysis.circuit_id == key || circuit.map_or(false, |c| c.matches_key(&analysis.circuit_id))
}

/// Ranking order with each key resolved against the catalog and the
/// comparison's own circuit list.
pub fn ranked_entries<'a>(comparison: &'a ComparisonData, catalog: &Catalog) -> Vec<RankedEntry<'a>> {
    comparison
        .ranking
        .iter()
        .enumerate()
        .map(|(idx, key)| {
            let circuit = catalog.resolve(key);
            let analysis = comparison
                .circuits
                .iter()
                .find(|analysis| same_circuit(analysis, key, circuit));
            RankedEntry {
                position: idx + 1,
                label: key.as_str(),
                circuit,
                analysis,
            }
        })
        .collect()
}

/// Chart rows in the comparison's circuit order.
pub fn comparison_rows(comparison: &ComparisonData, catalog: &Catalog) -> Vec<ComparisonRow> {
    comparison
        .circuits
        .iter()
        .map(|analysis| {
            let label = catalog
                .resolve(&analysis.circuit_id)
                .map(|circuit| circuit.short_name().to_string())
                .unwrap_or_else(|| analysis.circuit_id.clone());
            let metrics = analysis.metrics.clone().unwrap_or_default();
            ComparisonRow {
                label,
                score: metrics.score,
                weather: metrics.weather_volatility,
                safety_car: metrics.safety_car_frequency.map(|v| v * 50.0),
            }
        })
        .collect()
}

/// Radar axes normalized onto a 0-100 full mark.
pub fn radar_axes(metrics: &UnpredictabilityMetrics) -> [RadarAxis; 5] {
    let axis = |label: &'static str, value: Option<f64>| RadarAxis {
        label,
        value,
        full_mark: 100.0,
    };
    [
        axis("Weather", metrics.weather_volatility),
        axis("Safety Car", metrics.safety_car_frequency.map(|v| v * 50.0)),
        axis("Overtaking", metrics.overtakes_per_race),
        axis("DNF Risk", metrics.dnf_rate.map(|v| v * 2.0)),
        axis("Strategy", metrics.strategy_variance),
    ]
}

/// Metric value with a unit suffix, or the blank marker.
pub fn format_metric(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{v}{suffix}"),
        None => BLANK.to_string(),
    }
}

/// Whole-number score for cards and the hero panel.
pub fn score_label(score: Option<f64>) -> String {
    match score {
        Some(v) if v > 0.0 => format!("{v:.0}"),
        _ => BLANK.to_string(),
    }
}

pub fn is_hot(score: Option<f64>) -> bool {
    score.map_or(false, |v| v > HOT_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparison() -> ComparisonData {
        serde_json::from_str(
            r#"{
                "circuits": [
                    {"circuitId": "Monaco Grand Prix", "metrics": {"score": 48, "weatherVolatility": 20, "safetyCarFrequency": 0.6}},
                    {"circuitId": "spa", "metrics": {"score": 86, "weatherVolatility": 92, "safetyCarFrequency": 1.1}},
                    {"circuitId": "mystery"}
                ],
                "ranking": ["Circuit de Spa-Francorchamps", "Monaco Grand Prix", "mystery"],
                "insight": "Ardennes weather."
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn ranking_order_drives_presentation() {
        let data = comparison();
        let entries = ranked_entries(&data, &Catalog::builtin());
        let names: Vec<_> = entries.iter().map(|e| e.display_name()).collect();
        assert_eq!(
            names,
            vec!["Circuit de Spa-Francorchamps", "Monaco Grand Prix", "mystery"]
        );
        assert_eq!(entries[0].position, 1);
        assert_eq!(entries[0].score(), Some(86.0));
        assert_eq!(entries[1].score(), Some(48.0));
        assert!(entries[2].circuit.is_none());
        assert_eq!(entries[2].score(), None);
    }

    #[test]
    fn comparison_rows_use_short_labels_and_scale_safety_car() {
        let rows = comparison_rows(&comparison(), &Catalog::builtin());
        assert_eq!(rows[0].label, "Monaco");
        assert_eq!(rows[1].label, "Circuit");
        assert!((rows[1].safety_car.unwrap() - 55.0).abs() < 1e-9);
        assert_eq!(rows[2].label, "mystery");
        assert_eq!(rows[2].score, None);
    }

    #[test]
    fn radar_scales_safety_car_and_dnf() {
        let metrics = UnpredictabilityMetrics {
            safety_car_frequency: Some(0.5),
            dnf_rate: Some(20.0),
            ..Default::default()
        };
        let axes = radar_axes(&metrics);
        assert_eq!(axes[1].value, Some(25.0));
        assert_eq!(axes[3].value, Some(40.0));
        assert_eq!(axes[0].value, None);
        assert!(axes.iter().all(|a| a.full_mark == 100.0));
    }

    #[test]
    fn blanks_render_as_dashes() {
        assert_eq!(format_metric(None, "%"), "--");
        assert_eq!(format_metric(Some(18.0), "%"), "18%");
        assert_eq!(format_metric(Some(0.9), ""), "0.9");
        assert_eq!(score_label(Some(81.6)), "82");
        assert_eq!(score_label(Some(0.0)), "--");
        assert!(is_hot(Some(71.0)));
        assert!(!is_hot(None));
    }

    #[test]
    fn search_ignores_case_but_not_spaces() {
        let hits = filter_catalog(&Catalog::builtin(), "JAPAN");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "suzuka");
        assert!(filter_catalog(&Catalog::builtin(), " japan").is_empty());
        assert_eq!(filter_catalog(&Catalog::builtin(), "").len(), 10);
    }
}
