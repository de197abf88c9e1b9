//! `[tracing]` section of the relay config.

use serde::Deserialize;

/// Log filter plus the optional OTLP exporter settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TracingConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Collector endpoint, e.g. "http://localhost:4317". Unset or blank
    /// means nothing is exported.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    #[serde(default)]
    pub protocol: OtlpProtocol,

    /// `EnvFilter` directive, e.g. "sofascore_relay=debug,tower_http=debug,info".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OtlpProtocol {
    #[default]
    Grpc,
    Http,
}

impl TracingConfig {
    /// Endpoint to export to, if any. `RELAY_TRACING__OTLP_ENDPOINT=` in a
    /// `.env` file switches export off rather than failing the exporter.
    pub fn otlp_target(&self) -> Option<&str> {
        self.otlp_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
    }
}

fn default_service_name() -> String {
    "sofascore-relay".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            otlp_endpoint: None,
            protocol: OtlpProtocol::default(),
            log_level: default_log_level(),
        }
    }
}
