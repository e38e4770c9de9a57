use anyhow::Context;
use chaoscore::catalog::Catalog;
use chaoscore::decode::{DecodeMode, MetricPolicy, ResponseDecoder};
use chaoscore::gateway::GatewayConfig;
use chaoscore::orchestrator::{Orchestrator, DEFAULT_COMPARISON_LIMIT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

pub fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalystConfig {
    pub gateway: GatewayConfig,
    pub decode_mode: DecodeMode,
    pub metric_policy: MetricPolicy,
    /// Number of leading catalog circuits sent to a comparison.
    pub comparison_limit: usize,
    pub bind: SocketAddr,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            decode_mode: DecodeMode::default(),
            metric_policy: MetricPolicy::default(),
            comparison_limit: DEFAULT_COMPARISON_LIMIT,
            bind: default_bind(),
        }
    }
}

impl AnalystConfig {
    /// Reads a YAML config. A missing API key falls back to the environment.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading analyst config {}", path_ref.display()))?;
        let mut config: AnalystConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing analyst config {}", path_ref.display()))?;
        config.gateway = config.gateway.with_env_key();
        Ok(config)
    }

    pub fn from_args(model: Option<String>, strict: bool, bind: Option<SocketAddr>) -> Self {
        let mut config = Self::default();
        config.gateway = config.gateway.with_env_key();
        config.override_with(model, strict, bind)
    }

    /// Applies command-line flags on top of a loaded config.
    pub fn override_with(
        mut self,
        model: Option<String>,
        strict: bool,
        bind: Option<SocketAddr>,
    ) -> Self {
        if let Some(model) = model {
            self.gateway.model = model;
        }
        if strict {
            self.decode_mode = DecodeMode::Strict;
        }
        if let Some(bind) = bind {
            self.bind = bind;
        }
        self
    }

    pub fn decoder(&self) -> ResponseDecoder {
        ResponseDecoder::new(self.decode_mode, self.metric_policy)
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::builtin()
    }

    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(self.catalog(), self.comparison_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn args_override_defaults() {
        let bind: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        let cfg = AnalystConfig::from_args(Some("gemini-test".into()), true, Some(bind));
        assert_eq!(cfg.gateway.model, "gemini-test");
        assert_eq!(cfg.decode_mode, DecodeMode::Strict);
        assert_eq!(cfg.bind, bind);
        assert_eq!(cfg.comparison_limit, DEFAULT_COMPARISON_LIMIT);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"gateway:\n  model: gemini-2.5-flash\n  api_key: test-key\n  timeout_secs: 30\nmetric_policy: clamp\ncomparison_limit: 8\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = AnalystConfig::load(&path).unwrap();
        assert_eq!(cfg.gateway.model, "gemini-2.5-flash");
        assert_eq!(cfg.gateway.api_key.as_deref(), Some("test-key"));
        assert_eq!(cfg.gateway.timeout_secs, Some(30));
        assert_eq!(cfg.metric_policy, MetricPolicy::Clamp);
        assert_eq!(cfg.decode_mode, DecodeMode::Permissive);
        assert_eq!(cfg.comparison_limit, 8);
        assert_eq!(cfg.bind, default_bind());
    }

    #[test]
    fn config_load_reports_bad_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"comparison_limit: [oops\n").unwrap();
        let path = temp.into_temp_path();
        let err = AnalystConfig::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("parsing analyst config"));
    }
}
