// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TICKETDESK_LOG";

/// `TICKETDESK_LOG` wins over the configured level.
pub fn filter(configured: &str) -> Result<EnvFilter> {
    resolve_filter(std::env::var(LOG_ENV).ok().as_deref(), configured)
}

fn resolve_filter(from_env: Option<&str>, configured: &str) -> Result<EnvFilter> {
    match from_env {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)
            .with_context(|| format!("parse {LOG_ENV}={directives:?}")),
        _ => EnvFilter::try_new(configured)
            .with_context(|| format!("parse log level {configured:?}")),
    }
}

/// Logs go to stderr so stdout stays free for command output.
pub fn init(configured: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(configured)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}

#[cfg(test)]
mod tests {
    use super::resolve_filter;
    use anyhow::Result;

    #[test]
    fn configured_level_is_used_without_env() -> Result<()> {
        let filter = resolve_filter(None, "ticketdesk_app=debug")?;
        assert!(filter.to_string().contains("ticketdesk_app=debug"));

        let filter = resolve_filter(Some("  "), "warn")?;
        assert!(filter.to_string().contains("warn"));
        Ok(())
    }

    #[test]
    fn env_directives_override_configured_level() -> Result<()> {
        let filter = resolve_filter(Some("ticketdesk_app=trace"), "warn")?;
        assert!(filter.to_string().contains("ticketdesk_app=trace"));
        Ok(())
    }

    #[test]
    fn bad_levels_name_their_source() {
        let error = resolve_filter(None, "ticketdesk=loud").expect_err("invalid level should fail");
        assert!(error.to_string().contains("parse log level"));

        let error = resolve_filter(Some("ticketdesk=loud"), "warn")
            .expect_err("invalid env directives should fail");
        assert!(error.to_string().contains("TICKETDESK_LOG"));
    }
}
