//! Diagnostic sink for per-unit build failures.

use std::sync::Mutex;

/// Receives one message per isolated failure during a build.
pub trait BuildLogger: Send + Sync {
    fn log(&self, message: &str);
}

/// Forwards messages to `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl BuildLogger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl BuildLogger for NullLogger {
    fn log(&self, _message: &str) {}
}

/// Keeps messages in memory and forwards them to `tracing` at debug level.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    messages: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self.messages.lock() {
            Ok(messages) => messages.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BuildLogger for MemoryLogger {
    fn log(&self, message: &str) {
        tracing::debug!("{}", message);
        match self.messages.lock() {
            Ok(mut messages) => messages.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}

impl<T: BuildLogger + ?Sized> BuildLogger for &T {
    fn log(&self, message: &str) {
        (**self).log(message)
    }
}

impl<T: BuildLogger + ?Sized> BuildLogger for std::sync::Arc<T> {
    fn log(&self, message: &str) {
        (**self).log(message)
    }
}
