//! Entry emission backends.
//!
//! This module provides the [`EntryEmitter`] trait and default implementations.

use crate::entry::Entry;

/// Trait for destinations that receive entries.
///
/// Implement this trait to ship entries somewhere (file, queue, collector).
pub trait EntryEmitter: Send + Sync {
    /// Emits an entry.
    fn emit(&self, entry: &Entry);

    /// Emits an entry only if it has reached an outcome.
    fn emit_if_ended(&self, entry: &Entry) {
        if entry.end_time().is_some() {
            self.emit(entry);
        }
    }
}

/// Emitter that writes entries to the `tracing` infrastructure.
///
/// Entries are logged at levels based on their state:
/// - no outcome yet → `tracing::debug!`
/// - success → `tracing::info!`
/// - failure → `tracing::warn!`
#[derive(Debug, Clone, Default)]
pub struct TracingEmitter {
    /// Optional prefix for all log messages.
    prefix: Option<String>,
}

impl TracingEmitter {
    /// Creates a new tracing-based emitter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new tracing-based emitter with a prefix.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl EntryEmitter for TracingEmitter {
    fn emit(&self, entry: &Entry) {
        let entry_id = entry.id();
        let thread_id = entry.thread_id();
        let depth = entry.get_level();
        let name = entry.name();

        let json = entry
            .to_projection()
            .to_json()
            .unwrap_or_else(|_| "{}".to_string());

        let prefix = self.prefix.as_deref().unwrap_or("TRACE");

        match (entry.end_time(), entry.result()) {
            (None, _) => {
                tracing::debug!(
                    target: "tracefall",
                    %entry_id,
                    %thread_id,
                    depth,
                    entry_json = %json,
                    "[{prefix}] {name} in progress"
                );
            }
            (Some(_), true) => {
                tracing::info!(
                    target: "tracefall",
                    %entry_id,
                    %thread_id,
                    depth,
                    entry_json = %json,
                    "[{prefix}] {name} succeeded"
                );
            }
            (Some(_), false) => {
                tracing::warn!(
                    target: "tracefall",
                    %entry_id,
                    %thread_id,
                    depth,
                    error = entry.error().unwrap_or(""),
                    entry_json = %json,
                    "[{prefix}] {name} failed"
                );
            }
        }
    }
}

/// An emitter that drops every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    /// Creates a new no-op emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EntryEmitter for NoopEmitter {
    fn emit(&self, _entry: &Entry) {}
}

/// A boxed emitter for dynamic dispatch.
pub type BoxedEmitter = Box<dyn EntryEmitter>;

impl EntryEmitter for BoxedEmitter {
    fn emit(&self, entry: &Entry) {
        (**self).emit(entry);
    }
}
