use crate::events::{Event, EventSink};
use std::sync::Mutex;

/// Event sink that keeps events in memory
///
/// Used by tests and by callers that want to inspect what a component
/// reported without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<Event>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Messages with their category prefix, in recording order
    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|e| format!("{}{}", e.category.prefix(), e.message))
            .collect()
    }

    /// Renders every event as a run log line using a fixed timestamp
    pub fn render_lines(&self, timestamp: &str) -> Vec<String> {
        self.events().iter().map(|e| e.render(timestamp)).collect()
    }

    /// True if any recorded message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.events().iter().any(|e| e.message.contains(needle))
    }
}

impl EventSink for MemoryEventSink {
    fn record(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}
