// ============================================================================
// ytsize-core/src/diagnostics.rs
// ============================================================================
//
// DIAGNOSTICS: Injectable Debug Trace for the Resolution Engine
//
// The engine reports which track it picked for each height, which fallbacks
// it took and why a lookup came back empty. Those traces go to a sink passed
// in by the caller instead of a process-wide logger, so the engine stays free
// of global state and tests can assert on what was traced.
//
// KEY COMPONENTS:
// - DiagnosticSink: the capability handed to the engine
// - LogSink: forwards to the `log` facade at debug level
// - NullSink: discards everything
// - MemorySink: keeps messages in memory for inspection

// ---- Standard library imports ----
use std::sync::Mutex;

/// Receives debug traces from the engine.
pub trait DiagnosticSink: Send + Sync {
    fn trace(&self, message: &str);
}

/// Forwards traces to `log::debug!` under the `ytsize_core::engine` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn trace(&self, message: &str) {
        log::debug!(target: "ytsize_core::engine", "{}", message);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn trace(&self, _message: &str) {}
}

/// Collects traces in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything traced so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    /// Whether any trace contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl DiagnosticSink for MemorySink {
    fn trace(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
