use crate::prelude::{ModelRequest, RequestError, RequestKind};
use crate::request::schema::analysis_schema;
use std::ops::RangeInclusive;

/// Seasons covered by the two yearly series.
pub const TREND_SEASONS: RangeInclusive<i32> = 2014..=2024;

/// Builds the single-circuit analysis request.
pub fn build_analysis_request(
    circuit_id: &str,
    circuit_name: &str,
) -> Result<ModelRequest, RequestError> {
    if circuit_id.trim().is_empty() {
        return Err(RequestError::EmptyCircuitId);
    }
    if circuit_name.trim().is_empty() {
        return Err(RequestError::EmptyCircuitName);
    }

    let first = TREND_SEASONS.start();
    let last = TREND_SEASONS.end();
    let prompt = format!(
        "Analyze the Formula 1 circuit \"{circuit_name}\" ({circuit_id}) for its \"Unpredictability Index\".\n\
         Focus on factors like:\n\
         1. Weather volatility (probability of sudden rain/track temp changes).\n\
         2. Safety Car frequency (historical averages).\n\
         3. Overtaking difficulty vs success.\n\
         4. DNF (Did Not Finish) rates due to mechanical or technical errors vs track difficulty.\n\
         5. Strategy variance (how often alternative pit strategies win).\n\
         \n\
         Also provide:\n\
         - A yearly unpredictability score for the last 10 seasons ({first}-{last}).\n\
         - A yearly count of Safety Car (SC) and Virtual Safety Car (VSC) deployments combined for the last 10 seasons ({first}-{last}).\n\
         \n\
         Return the data in a structured JSON format."
    );

    Ok(ModelRequest {
        kind: RequestKind::Analysis,
        prompt,
        schema: analysis_schema(),
    })
}
