//! Notification sinks for user-facing error messages.

use std::sync::Mutex;

use console::style;

/// Receives messages meant for the user.
pub trait Notifier: Send + Sync {
    fn notify_error(&self, message: &str);
}

/// Prints notifications to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red().bold(), style(message).red());
    }
}

/// Collects notifications in memory.
///
/// Useful for embedding the client behind another UI layer that drains
/// messages on its own schedule.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<String>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Remove and return all pending messages.
    pub fn drain(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|mut m| std::mem::take(&mut *m))
            .unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    fn notify_error(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
