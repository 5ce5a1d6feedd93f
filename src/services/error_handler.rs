//! Turns API errors into a single user-facing notification.

use std::sync::Arc;

use tracing::warn;

use super::messages::Locale;
use super::notify::Notifier;
use crate::http_client::ApiError;

/// Picks the message a user should see for an error and sends it to the
/// notification sink. Never fails.
#[derive(Clone)]
pub struct ErrorHandler {
    notifier: Arc<dyn Notifier>,
    locale: Locale,
}

impl ErrorHandler {
    pub fn new(notifier: Arc<dyn Notifier>, locale: Locale) -> Self {
        Self { notifier, locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Notify the user about `error`, or show `custom_message` instead.
    pub fn handle_error(&self, error: &ApiError, custom_message: Option<&str>) {
        warn!("API error: {}", error);
        let message = resolve_message(error, custom_message, self.locale);
        self.notifier.notify_error(&message);
    }

    /// Send a message straight to the sink.
    pub fn notify(&self, message: &str) {
        self.notifier.notify_error(message);
    }
}

/// First match wins: custom message, backend body message, the error's own
/// message, the error as plain text, then the locale default.
pub fn resolve_message(error: &ApiError, custom_message: Option<&str>, locale: Locale) -> String {
    if let Some(custom) = custom_message.filter(|m| !m.is_empty()) {
        return custom.to_string();
    }
    if let Some(message) = error.backend_message() {
        return message.to_string();
    }
    if let Some(message) = error.own_message() {
        return message;
    }
    if let Some(text) = error.as_text() {
        return text.to_string();
    }
    locale.messages().default_error.to_string()
}
