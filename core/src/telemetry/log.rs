use log::{debug, error, info};
use std::fmt::Display;

/// Component-scoped wrapper over the `log` facade.
pub struct LogManager {
    scope: &'static str,
}

impl LogManager {
    pub fn new(scope: &'static str) -> Self {
        Self { scope }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.scope, message);
    }

    pub fn trace(&self, message: &str) {
        debug!("[{}] {}", self.scope, message);
    }

    /// Developer-facing detail for a failure the user only sees as a static message.
    pub fn record_failure(&self, context: &str, cause: &dyn Display) {
        error!("[{}] {}: {}", self.scope, context, cause);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("chaoscore")
    }
}
