use anyhow::{Context, Result};
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

pub struct LogConfig {
    pub filter: String,
}

/// Diagnostics go to stderr; stdout carries command output only.
pub struct Logger {
    reload_handle: reload::Handle<EnvFilter, Registry>,
    // Set when `RUST_LOG` chose the filter; settings then leave it alone.
    pinned_by_env: bool,
}

impl Logger {
    pub fn new_bootstrap(default_filter: &str) -> Self {
        let (filter, pinned_by_env) = match EnvFilter::try_from_default_env() {
            Ok(filter) => (filter, true),
            Err(_) => (EnvFilter::new(default_filter), false),
        };
        let (filter, reload_handle) = reload::Layer::new(filter);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();

        Self {
            reload_handle,
            pinned_by_env,
        }
    }

    pub fn reload_from_config(&self, config: &LogConfig) -> Result<()> {
        if self.pinned_by_env {
            tracing::debug!(ignored = %config.filter, "log filter pinned by RUST_LOG");
            return Ok(());
        }
        let filter = parse_filter(&config.filter)?;
        self.reload_handle
            .reload(filter)
            .context("log subscriber is no longer installed")?;
        Ok(())
    }
}

fn parse_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).with_context(|| format!("invalid log filter {:?}", directives))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_filters_parse() {
        for directives in ["warn", "careermatch=debug,info", "careermatch::infra_http=trace"] {
            assert!(parse_filter(directives).is_ok(), "{directives}");
        }
    }

    #[test]
    fn bad_level_is_an_error() {
        let err = parse_filter("careermatch=loud").unwrap_err();
        assert!(err.to_string().contains("careermatch=loud"));
    }
}
