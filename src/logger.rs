//! Pluggable debug sink for request and response dumps.
//!
//! The client never writes request bodies through the global `log` facade on
//! its own; callers opt in by installing a sink with `Client::set_logger`.

use std::fmt;

/// Receives the client's debug output.
pub trait DebugLog: Send + Sync {
    /// Logs a plain message.
    fn debug(&self, message: &str);

    /// Logs a pre-formatted message.
    fn debug_fmt(&self, args: fmt::Arguments<'_>);
}

/// Discards everything. This is the default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopLogger;

impl DebugLog for NopLogger {
    fn debug(&self, _message: &str) {}

    fn debug_fmt(&self, _args: fmt::Arguments<'_>) {}
}

/// Forwards to `log::debug!` under the `xmpush` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogLogger;

impl DebugLog for LogLogger {
    fn debug(&self, message: &str) {
        log::debug!(target: "xmpush", "{}", message);
    }

    fn debug_fmt(&self, args: fmt::Arguments<'_>) {
        log::debug!(target: "xmpush", "{}", args);
    }
}
