//! Progress and completion events.
//!
//! Long-running operations report through an [`EventDispatcher`]; the CLI
//! attaches handlers that drive progress bars, write JSON lines or log to
//! file. Events are emitted in order from the thread running the operation.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

pub mod json_handler;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // Scan events
    ScanStarted {
        total: usize,
    },
    RowValidated {
        /// Zero-based row index
        index: usize,
        total: usize,
        percent: f32,
        filename: String,
        status: String,
    },
    ScanComplete {
        total: usize,
        ok: usize,
        errors: usize,
        most_common_fps: Option<String>,
    },

    // Compile events
    CompileStarted {
        rows: usize,
        timeline_fps: String,
    },
    RowDropped {
        index: usize,
        filename: String,
        reason: String,
    },
    CompileComplete {
        clips: usize,
        duration_frames: i64,
        output_path: String,
    },

    // Remediation copy events
    CopyProgress {
        copied: u64,
        total: u64,
    },
    CopyComplete {
        destination: PathBuf,
    },

    // Generic events
    Warning {
        message: String,
    },
    Error {
        title: String,
        message: String,
    },
}

pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event);
}

pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn emit(&self, event: Event) {
        for handler in &self.handlers {
            handler.handle(&event);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Forwards events over a channel to the presentation thread.
///
/// Send failures (receiver gone) are ignored; the operation keeps running.
pub struct ChannelEventHandler {
    sender: Mutex<Sender<Event>>,
}

impl ChannelEventHandler {
    pub fn new(sender: Sender<Event>) -> Self {
        Self {
            sender: Mutex::new(sender),
        }
    }
}

impl EventHandler for ChannelEventHandler {
    fn handle(&self, event: &Event) {
        if let Ok(sender) = self.sender.lock() {
            let _ = sender.send(event.clone());
        }
    }
}

/// Keeps every event it sees; handy for tests and summaries.
#[derive(Default)]
pub struct CollectingEventHandler {
    events: Mutex<Vec<Event>>,
}

impl CollectingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl EventHandler for CollectingEventHandler {
    fn handle(&self, event: &Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_dispatcher_reaches_every_handler_in_order() {
        let first = Arc::new(CollectingEventHandler::new());
        let second = Arc::new(CollectingEventHandler::new());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_handler(first.clone());
        dispatcher.add_handler(second.clone());

        dispatcher.emit(Event::ScanStarted { total: 2 });
        dispatcher.emit(Event::Warning { message: "slow disk".to_string() });

        let expected = vec![
            Event::ScanStarted { total: 2 },
            Event::Warning { message: "slow disk".to_string() },
        ];
        assert_eq!(first.events(), expected);
        assert_eq!(second.events(), expected);
    }

    #[test]
    fn test_channel_handler_forwards() {
        let (tx, rx) = mpsc::channel();
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_handler(Arc::new(ChannelEventHandler::new(tx)));

        dispatcher.emit(Event::CopyProgress { copied: 4, total: 8 });
        assert_eq!(rx.recv().unwrap(), Event::CopyProgress { copied: 4, total: 8 });

        drop(rx);
        dispatcher.emit(Event::CopyProgress { copied: 8, total: 8 });
    }
}
