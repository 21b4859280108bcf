// ytsize-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for this crate's own tests and, through the "test-mocks" feature,
// for downstream test suites.

use super::{MediaInspector, ToolOutcome};
use std::cell::RefCell;
use std::collections::VecDeque;

/// One call received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectorCall {
    DumpMetadata(String),
    ListFormats(String),
    FetchDuration(String),
}

/// Scripted MediaInspector.
///
/// Outcomes are queued per invocation mode and handed out in order. A mode
/// with nothing queued fails with status 1 so an unexpected call is visible
/// in the result instead of silently succeeding.
#[derive(Debug, Default)]
pub struct MockInspector {
    metadata: RefCell<VecDeque<ToolOutcome<String>>>,
    listings: RefCell<VecDeque<ToolOutcome<String>>>,
    durations: RefCell<VecDeque<ToolOutcome<u64>>>,
    calls: RefCell<Vec<InspectorCall>>,
}

impl MockInspector {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push_metadata(&self, outcome: ToolOutcome<String>) -> &Self {
        self.metadata.borrow_mut().push_back(outcome);
        self
    }

    /// Queues a successful `-J` dump of `json`.
    pub fn with_metadata_json(self, json: impl Into<String>) -> Self {
        self.push_metadata(ToolOutcome::success(Some(json.into())));
        self
    }

    pub fn push_listing(&self, outcome: ToolOutcome<String>) -> &Self {
        self.listings.borrow_mut().push_back(outcome);
        self
    }

    /// Queues a successful `-F` listing.
    pub fn with_listing(self, text: impl Into<String>) -> Self {
        self.push_listing(ToolOutcome::success(Some(text.into())));
        self
    }

    pub fn push_duration(&self, outcome: ToolOutcome<u64>) -> &Self {
        self.durations.borrow_mut().push_back(outcome);
        self
    }

    pub fn with_duration(self, seconds: Option<u64>) -> Self {
        self.push_duration(ToolOutcome::success(seconds));
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<InspectorCall> {
        self.calls.borrow().clone()
    }

    pub fn duration_lookups(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, InspectorCall::FetchDuration(_)))
            .count()
    }

    pub fn listing_lookups(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, InspectorCall::ListFormats(_)))
            .count()
    }

    fn next<T>(queue: &RefCell<VecDeque<ToolOutcome<T>>>, mode: &str) -> ToolOutcome<T> {
        queue.borrow_mut().pop_front().unwrap_or_else(|| {
            log::warn!("MockInspector: no {} outcome scripted", mode);
            ToolOutcome::failure(1, format!("MockInspector: no {mode} outcome scripted"))
        })
    }
}

impl MediaInspector for MockInspector {
    fn dump_metadata(&self, url: &str) -> ToolOutcome<String> {
        self.calls
            .borrow_mut()
            .push(InspectorCall::DumpMetadata(url.to_string()));
        Self::next(&self.metadata, "metadata")
    }

    fn list_formats(&self, url: &str) -> ToolOutcome<String> {
        self.calls
            .borrow_mut()
            .push(InspectorCall::ListFormats(url.to_string()));
        Self::next(&self.listings, "listing")
    }

    fn fetch_duration(&self, url: &str) -> ToolOutcome<u64> {
        self.calls
            .borrow_mut()
            .push(InspectorCall::FetchDuration(url.to_string()));
        Self::next(&self.durations, "duration")
    }
}
