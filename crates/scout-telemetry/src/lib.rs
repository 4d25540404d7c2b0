use serde::{Deserialize, Serialize};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Scout Telemetry Configuration
#[derive(Default, Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct TelemetryConfig {
    /// Service name.
    pub name: String,
    /// Service log level.
    pub log_level: Option<String>,
    /// Service json log output.
    pub json_log: bool,
    /// Hierarchical log tracing.
    pub tree_trace: bool,
    /// Chrome tracing support.
    pub chrome_trace: bool,
}

/// Keeps buffered layers alive. Dropping it flushes the chrome trace file.
#[derive(Default)]
pub struct TelemetryGuard {
    #[cfg(feature = "chrome")]
    _chrome: Option<tracing_chrome::FlushGuard>,
}

impl TelemetryConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            log_level: None,
            json_log: false,
            tree_trace: false,
            chrome_trace: false,
        }
    }

    pub fn with_log_level(mut self, log_level: &str) -> Self {
        self.log_level = Some(log_level.to_owned());
        self
    }

    pub fn with_json_log(mut self, json_log: bool) -> Self {
        self.json_log = json_log;
        self
    }

    pub fn with_tree_trace(mut self, tree_trace: bool) -> Self {
        self.tree_trace = tree_trace;
        self
    }

    pub fn with_chrome_trace(mut self, chrome_trace: bool) -> Self {
        self.chrome_trace = chrome_trace;
        self
    }

    /// The filter directive in use. `RUST_LOG` wins over the configured level.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(
                self.log_level
                    .clone()
                    .unwrap_or_else(|| "info".to_string())
                    .to_lowercase(),
            )
        })
    }

    pub fn init(self) -> anyhow::Result<TelemetryGuard> {
        let env_filter = self.env_filter();
        #[allow(unused_mut)]
        let mut guard = TelemetryGuard::default();

        let mut tracing_layers = vec![];

        #[cfg(feature = "tracing-tree")]
        if self.tree_trace {
            let hierarchical_layer = tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true);
            tracing_layers.push(hierarchical_layer.boxed());
        }

        #[cfg(feature = "chrome")]
        if self.chrome_trace {
            let (chrome_layer, flush_guard) = tracing_chrome::ChromeLayerBuilder::new().build();
            tracing_layers.push(chrome_layer.boxed());
            guard._chrome = Some(flush_guard);
        }

        if !self.tree_trace {
            if self.json_log {
                tracing_layers.push(tracing_subscriber::fmt::layer().json().boxed());
            } else {
                tracing_layers.push(tracing_subscriber::fmt::layer().boxed());
            }
        }

        Registry::default()
            .with(tracing_layers)
            .with(env_filter)
            .with(ErrorLayer::default())
            .try_init()?;

        tracing::debug!(service = %self.name, "telemetry initialized");
        Ok(guard)
    }
}
