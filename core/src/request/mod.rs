pub mod analysis;
pub mod comparison;
pub mod schema;

pub use analysis::{build_analysis_request, TREND_SEASONS};
pub use comparison::build_comparison_request;
