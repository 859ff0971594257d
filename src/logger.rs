//! Pluggable logging for the client.
//!
//! The client never logs through a global; it calls the [`Logger`] it was
//! built with. [`NoopLogger`] is the default and [`TracingLogger`] forwards
//! to `tracing` for binaries that install a subscriber.
use std::fmt;
use std::sync::Arc;

/// A key/value pair attached to a log message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub value: String,
}

impl Field {
    pub fn new(key: &'static str, value: impl fmt::Display) -> Self {
        Field { key, value: value.to_string() }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

pub trait Logger: Send + Sync {
    fn debug(&self, msg: &str, fields: &[Field]);
    fn info(&self, msg: &str, fields: &[Field]);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _msg: &str, _fields: &[Field]) {}
    fn info(&self, _msg: &str, _fields: &[Field]) {}
}

/// Emits `tracing` events, fields rendered in order as `key=value`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, msg: &str, fields: &[Field]) {
        tracing::debug!(fields = %render(fields), "{}", msg);
    }

    fn info(&self, msg: &str, fields: &[Field]) {
        tracing::info!(fields = %render(fields), "{}", msg);
    }
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn debug(&self, msg: &str, fields: &[Field]) {
        (**self).debug(msg, fields)
    }

    fn info(&self, msg: &str, fields: &[Field]) {
        (**self).info(msg, fields)
    }
}

fn render(fields: &[Field]) -> String {
    fields.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(" ")
}
