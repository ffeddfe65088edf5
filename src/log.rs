//! Request log sink.
//!
//! Every transport call appends a pre-flight and a post-flight entry. The log
//! is attached to a client at construction and shared by everything derived
//! from it; it is never rotated or capped, so callers drain it as they see fit.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

/// Maximum number of response body characters echoed into a log entry.
pub const RESPONSE_EXCERPT_LEN: usize = 100;

/// Which side of a transport call an entry records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogPhase {
    /// Before sending: outgoing payload summary and the client identifier.
    Request { payload: String, user_agent: String },
    /// After receiving: status code and a body excerpt.
    Response { status: u16, excerpt: String },
}

/// A single line in the request log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub verb: String,
    pub url: String,
    pub phase: LogPhase,
}

impl LogEntry {
    /// The status code, for post-flight entries.
    pub fn status(&self) -> Option<u16> {
        match self.phase {
            LogPhase::Response { status, .. } => Some(status),
            LogPhase::Request { .. } => None,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ts = self.timestamp.format("%y-%m-%d %H:%M:%S");
        match &self.phase {
            LogPhase::Request {
                payload,
                user_agent,
            } => write!(
                f,
                "{ts}:[{}] {}, {}, {}",
                self.verb, self.url, payload, user_agent
            ),
            LogPhase::Response { status, excerpt } => {
                write!(f, "{ts}:[{}] {}, {}, {}", self.verb, self.url, status, excerpt)
            }
        }
    }
}

/// Shorten a response body to its first [`RESPONSE_EXCERPT_LEN`] characters.
///
/// Longer bodies end in `...`, shorter ones in a single `.`.
pub fn excerpt(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(RESPONSE_EXCERPT_LEN).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        format!("{head}.")
    }
}

/// Shared, append-only request log.
///
/// Cheap to clone; clones append to the same underlying list.
#[derive(Clone, Default)]
pub struct RequestLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl fmt::Debug for RequestLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestLog")
            .field("len", &self.len())
            .finish()
    }
}

impl RequestLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        // A panic while holding the lock cannot leave a half-written entry,
        // so a poisoned lock is still usable.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append an entry and mirror it to `tracing`.
    pub fn push(&self, entry: LogEntry) {
        match &entry.phase {
            LogPhase::Request { payload, .. } => {
                tracing::debug!(verb = %entry.verb, url = %entry.url, payload = %payload, "request");
            }
            LogPhase::Response { status, .. } => {
                tracing::debug!(verb = %entry.verb, url = %entry.url, status = *status, "response");
            }
        }
        self.lock().push(entry);
    }

    /// Snapshot of all entries in insertion order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Rendered lines in insertion order.
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Remove and return every entry.
    pub fn drain(&self) -> Vec<LogEntry> {
        std::mem::take(&mut *self.lock())
    }
}
