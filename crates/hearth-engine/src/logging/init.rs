use std::sync::Once;

/// Environment variable read before `RUST_LOG`.
pub const ENV_VAR: &str = "HEARTH_LOG";

/// Applied when neither the config nor the environment names a filter.
/// GPU backends are chatty at info.
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "hearth_engine=debug,wgpu_core=warn").
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

impl LoggingConfig {
    /// Config with an explicit filter, overriding the environment.
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once. Later calls are ignored.
///
/// Filter precedence: `config.env_filter`, then `HEARTH_LOG`, then
/// `RUST_LOG`, then an info default.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(
            config.env_filter,
            std::env::var(ENV_VAR).ok(),
            std::env::var("RUST_LOG").ok(),
        );

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        // Another logger may already be installed (e.g. by a test harness).
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized with filter {filter:?}");
    });
}

fn resolve_filter(
    explicit: Option<String>,
    hearth: Option<String>,
    rust: Option<String>,
) -> String {
    [explicit, hearth, rust]
        .into_iter()
        .flatten()
        .find(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_owned())
    }

    #[test]
    fn explicit_filter_wins() {
        assert_eq!(resolve_filter(s("trace"), s("warn"), s("error")), "trace");
    }

    #[test]
    fn hearth_var_beats_rust_log() {
        assert_eq!(resolve_filter(None, s("warn"), s("error")), "warn");
        assert_eq!(resolve_filter(None, None, s("error")), "error");
    }

    #[test]
    fn blank_values_fall_through_to_default() {
        assert_eq!(resolve_filter(s("  "), s(""), None), DEFAULT_FILTER);
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::with_filter("off"));
        init_logging(LoggingConfig::default());
    }
}
