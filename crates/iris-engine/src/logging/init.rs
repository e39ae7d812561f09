use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` sets one.
///
/// wgpu and naga are chatty at info; their warnings still come through.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "iris_engine=debug,wgpu_core=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored. Filter precedence: `config.env_filter`, then
/// `RUST_LOG`, then [`DEFAULT_FILTER`].
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let rust_log = std::env::var("RUST_LOG").ok();
        let filter = resolve_filter(config.env_filter.as_deref(), rust_log.as_deref());

        let mut builder = env_logger::Builder::new();
        builder
            .parse_filters(filter)
            .write_style(config.write_style)
            .format_timestamp_millis();

        // A test harness may already own the global logger.
        if builder.try_init().is_ok() {
            log::debug!("logging initialized ({filter})");
        }
    });
}

fn resolve_filter<'a>(explicit: Option<&'a str>, rust_log: Option<&'a str>) -> &'a str {
    explicit
        .or(rust_log)
        .filter(|f| !f.trim().is_empty())
        .unwrap_or(DEFAULT_FILTER)
}
