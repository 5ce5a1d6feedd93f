//! Shared helper functions for CLI commands.

use std::sync::Arc;

use console::{style, StyledObject};
use serde::Serialize;

use leadunit::config::Config;
use leadunit::http_client::HttpClient;
use leadunit::services::{ConsoleNotifier, ErrorHandler, LeadUnitService};

pub fn success() -> StyledObject<&'static str> {
    style("✓").green()
}

pub fn arrow() -> StyledObject<&'static str> {
    style("→").dim()
}

/// Wire the HTTP client, console notifications and configured bounds together.
pub fn build_service(config: &Config) -> anyhow::Result<LeadUnitService> {
    let endpoints = config.endpoints()?;
    let client = HttpClient::new(&config.client_options())?;
    let errors = ErrorHandler::new(Arc::new(ConsoleNotifier), config.locale());

    tracing::info!("Using API {} (admin {})", endpoints.api_url, endpoints.admin_url);
    let service = LeadUnitService::new(Arc::new(client), errors, endpoints);
    Ok(match config.branch_timeout() {
        Some(limit) => service.with_branch_timeout(limit),
        None => service,
    })
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Truncate a string to at most `max` characters, adding an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
