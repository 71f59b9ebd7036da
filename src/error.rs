//! Error types used by the attrmux proxy.
//!
//! This module defines two main error enums:
//!
//! - [`SourceError`] — failures raised at the event-source boundary while
//!   opening an underlying subscription.
//! - [`ReadError`] — outcomes of a legacy queue read that did not produce
//!   an event.
//!
//! Both types provide `as_label` helpers for logging/metrics. Nothing in this
//! crate is treated as process-fatal: every failure is either returned to the
//! immediate caller or reported on the proxy's event bus while the system
//! keeps operating.

use std::time::Duration;

use thiserror::Error;

/// # Errors raised at the event-source boundary.
///
/// Surfaced synchronously to the `subscribe` caller when the underlying
/// source cannot open a push subscription. The proxy never retries on its
/// own; retry policy, if any, belongs to the caller or the source adapter.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source cannot open a subscription for the attribute
    /// (attribute unknown, connection down).
    #[error("source unavailable for attribute `{attribute}`: {reason}")]
    Unavailable {
        /// The attribute the open was attempted for.
        attribute: String,
        /// Adapter-supplied description of the failure.
        reason: String,
    },
}

impl SourceError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use attrmux::SourceError;
    ///
    /// let err = SourceError::Unavailable {
    ///     attribute: "sys/tg_test/1/ampli".into(),
    ///     reason: "connection refused".into(),
    /// };
    /// assert_eq!(err.as_label(), "source_unavailable");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SourceError::Unavailable { .. } => "source_unavailable",
        }
    }

    /// Returns the attribute the failed open was addressed to.
    pub fn attribute(&self) -> &str {
        match self {
            SourceError::Unavailable { attribute, .. } => attribute,
        }
    }
}

/// # Outcomes of a legacy queue read that produced no event.
///
/// Returned by [`EventQueue::read_event`](crate::EventQueue::read_event) and
/// [`EventQueue::try_read_event`](crate::EventQueue::try_read_event). A
/// timeout is signaled distinctly from the immediate-mode "nothing buffered"
/// case so callers can decide whether to retry.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ReadError {
    /// No event arrived within the requested wait window.
    #[error("no event within {timeout:?}")]
    Timeout {
        /// The wait window that elapsed.
        timeout: Duration,
    },

    /// The queue held no event at the moment of an immediate-mode read.
    #[error("queue empty")]
    Empty,
}

impl ReadError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use attrmux::ReadError;
    ///
    /// let err = ReadError::Timeout { timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "read_timeout");
    /// assert_eq!(ReadError::Empty.as_label(), "read_empty");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ReadError::Timeout { .. } => "read_timeout",
            ReadError::Empty => "read_empty",
        }
    }

    /// Indicates whether waiting longer could produce an event.
    ///
    /// Both variants are transient: the underlying subscription stays open,
    /// so a later read may succeed.
    pub fn is_transient(&self) -> bool {
        true
    }
}
