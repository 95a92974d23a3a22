// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Destinations for the diagnostic lines a builder emits.

use std::sync::{Arc, Mutex};

pub(crate) const ERR_POISONED_LOCK: &str = "poisoned lock - cannot continue execution because security and privacy guarantees can no longer be upheld";

/// A destination for the diagnostic lines a
/// [`DocumentBuilder`](crate::DocumentBuilder) emits.
///
/// Writing is infallible: a sink that could fail would make every test
/// fixture fallible in turn, so implementations absorb their own failures.
#[cfg_attr(test, mockall::automock)]
pub trait DiagnosticsSink: Send + Sync {
    /// Writes one line of diagnostics.
    fn write_line(&self, line: &str);
}

/// Forwards diagnostics to the active [`tracing`] subscriber at info level.
///
/// This is the default sink, so captured documents land in whatever log
/// capture the surrounding test harness already has in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn write_line(&self, line: &str) {
        tracing::info!("{line}");
    }
}

/// Retains diagnostics in memory so tests can assert on them.
///
/// Clones share the same buffer, letting a test keep one handle while the
/// builder owns the other.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureSink {
    /// Creates an empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every line written so far.
    ///
    /// # Panics
    ///
    /// Panics when the internal lock is poisoned.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect(ERR_POISONED_LOCK).clone()
    }

    /// Returns everything written so far as one newline-joined string.
    #[must_use]
    pub fn output(&self) -> String {
        self.lines().join("\n")
    }

    /// Asserts that some captured line contains `needle`.
    ///
    /// # Panics
    ///
    /// Panics when no captured line contains `needle`.
    #[cfg_attr(test, mutants::skip)] // This is test logic - pointless to mutate.
    pub fn assert_contains(&self, needle: &str) {
        let lines = self.lines();

        assert!(
            lines.iter().any(|line| line.contains(needle)),
            "no captured line contains {needle:?}; captured: {lines:#?}"
        );
    }
}

impl DiagnosticsSink for CaptureSink {
    fn write_line(&self, line: &str) {
        self.lines.lock().expect(ERR_POISONED_LOCK).push(line.to_owned());
    }
}
