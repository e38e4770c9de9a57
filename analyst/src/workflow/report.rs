use chaoscore::catalog::{Catalog, CircuitIdentity};
use chaoscore::model::{CircuitAnalysis, ComparisonData};
use chaoscore::view::{format_metric, radar_axes, ranked_entries, score_label, BLANK};
use std::fmt::Write;

/// Plain-text rendering of a single-circuit analysis.
pub fn analysis_report(analysis: &CircuitAnalysis, circuit: Option<&CircuitIdentity>) -> String {
    let mut out = String::new();
    let title = circuit.map(|c| c.name).unwrap_or(analysis.circuit_id.as_str());
    let _ = writeln!(out, "{title}");
    if let Some(circuit) = circuit {
        let _ = writeln!(
            out,
            "  {}, {} | {} km | {} corners",
            circuit.location, circuit.country, circuit.length_km, circuit.corners
        );
    }
    let _ = writeln!(out, "  unpredictability index: {}", score_label(analysis.score()));

    let metrics = analysis.metrics.clone().unwrap_or_default();
    let _ = writeln!(
        out,
        "  weather {} | safety car {} /race | overtakes {} | dnf {} | strategy {}",
        format_metric(metrics.weather_volatility, "%"),
        format_metric(metrics.safety_car_frequency, ""),
        format_metric(metrics.overtakes_per_race, ""),
        format_metric(metrics.dnf_rate, "%"),
        format_metric(metrics.strategy_variance, "%"),
    );
    let radar: Vec<String> = radar_axes(&metrics)
        .iter()
        .map(|axis| format!("{}={}", axis.label, format_metric(axis.value, "")))
        .collect();
    let _ = writeln!(out, "  radar: {}", radar.join(" "));

    if !analysis.historical_context.is_empty() {
        let _ = writeln!(out, "\n  {}", analysis.historical_context);
    }
    if !analysis.top_contributing_factors.is_empty() {
        let _ = writeln!(out, "\n  key factors:");
        for factor in &analysis.top_contributing_factors {
            let _ = writeln!(out, "    - {factor}");
        }
    }
    if !analysis.recent_triggers.is_empty() {
        let _ = writeln!(out, "\n  recent triggers:");
        for trigger in &analysis.recent_triggers {
            let _ = writeln!(out, "    - {} ({})", trigger.event, trigger.impact);
        }
    }
    if !analysis.historical_trend.is_empty() {
        let points: Vec<String> = analysis
            .historical_trend
            .iter()
            .map(|p| format!("{}:{}", season_label(p.season), format_metric(p.score, "")))
            .collect();
        let _ = writeln!(out, "\n  volatility trend: {}", points.join(" "));
    }
    if !analysis.safety_car_trend.is_empty() {
        let points: Vec<String> = analysis
            .safety_car_trend
            .iter()
            .map(|p| format!("{}:{}", season_label(p.season), format_metric(p.deployments, "")))
            .collect();
        let _ = writeln!(out, "  safety cars: {}", points.join(" "));
    }
    out
}

/// Ranked list followed by the model's insight.
pub fn comparison_report(comparison: &ComparisonData, catalog: &Catalog) -> String {
    let mut out = String::from("Unpredictability ranking\n");
    for entry in ranked_entries(comparison, catalog) {
        let _ = writeln!(
            out,
            "  {:>2}. {:<36} {}",
            entry.position,
            entry.display_name(),
            score_label(entry.score())
        );
    }
    if !comparison.insight.is_empty() {
        let _ = writeln!(out, "\n  {}", comparison.insight);
    }
    out
}

fn season_label(season: Option<i32>) -> String {
    season.map_or_else(|| BLANK.to_string(), |s| s.to_string())
}
