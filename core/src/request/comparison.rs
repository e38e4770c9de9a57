use crate::prelude::{ModelRequest, RequestError, RequestKind};
use crate::request::schema::comparison_schema;

/// Builds the ranked multi-circuit comparison request.
///
/// The list is used as given; callers keep it short to bound response size.
pub fn build_comparison_request<S: AsRef<str>>(
    circuit_names: &[S],
) -> Result<ModelRequest, RequestError> {
    if circuit_names.is_empty() {
        return Err(RequestError::NoCircuits);
    }
    if circuit_names.iter().any(|name| name.as_ref().trim().is_empty()) {
        return Err(RequestError::EmptyCircuitName);
    }

    let joined = circuit_names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");
    let prompt = format!(
        "Compare the following F1 circuits for their unpredictability: {joined}.\n\
         Generate a full comparison report with metrics for each and a final ranking from most to least unpredictable.\n\
         Explain WHY the #1 circuit takes the top spot."
    );

    Ok(ModelRequest {
        kind: RequestKind::Comparison,
        prompt,
        schema: comparison_schema(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_joined_in_order() {
        let request =
            build_comparison_request(&["Monaco Grand Prix", "Circuit de Spa-Francorchamps"])
                .unwrap();
        assert_eq!(request.kind, RequestKind::Comparison);
        assert!(request
            .prompt
            .contains("unpredictability: Monaco Grand Prix, Circuit de Spa-Francorchamps."));
        assert!(request.prompt.contains("most to least unpredictable"));
    }

    #[test]
    fn more_than_six_names_are_not_truncated() {
        let names: Vec<String> = (1..=8).map(|i| format!("Circuit {i}")).collect();
        let request = build_comparison_request(&names).unwrap();
        assert!(request.prompt.contains("Circuit 8"));
    }

    #[test]
    fn empty_list_is_rejected() {
        let names: [&str; 0] = [];
        assert_eq!(
            build_comparison_request(&names),
            Err(RequestError::NoCircuits)
        );
    }
}
