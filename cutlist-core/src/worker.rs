// ============================================================================
// cutlist-core/src/worker.rs
// ============================================================================
//
// WORKER: One Long-Running Operation at a Time, Off the Presentation Thread
//
// Scan, generate and the remediation copy each run on a dedicated thread.
// Only one may be in flight; a second submission fails with
// `CoreError::OperationBusy` instead of queueing. The busy flag is held by a
// guard owned by the job thread, so it is released when the job returns,
// fails, panics, or the thread cannot be started. Jobs cannot be cancelled.
//
// Events reach the caller in order over an mpsc channel; the channel closes
// when the job ends, so draining `JobHandle::events` and then calling
// `JobHandle::join` is the normal pattern.
//
// AI-ASSISTANT-INFO: Single-flight background job runner with ordered events

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};
use crate::events::{ChannelEventHandler, Event, EventDispatcher, EventHandler};

// ---- Standard library imports ----
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;

/// The operations that may run on the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Scan,
    Generate,
    FileCopy,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scan => "scan",
            Self::Generate => "generate",
            Self::FileCopy => "file copy",
        };
        f.write_str(name)
    }
}

/// Clears the busy flag when dropped.
struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

/// A submitted job: its event stream and, once finished, its result.
pub struct JobHandle<T> {
    kind: OperationKind,
    events: Receiver<Event>,
    thread: thread::JoinHandle<CoreResult<T>>,
}

impl<T> JobHandle<T> {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Events in emission order. Iteration ends when the job has finished.
    pub fn events(&self) -> &Receiver<Event> {
        &self.events
    }

    /// Waits for the job and returns its result. A panic becomes `OperationFailed`.
    pub fn join(self) -> CoreResult<T> {
        let kind = self.kind;
        self.thread.join().unwrap_or_else(|payload| {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            log::error!("The {} job panicked: {}", kind, detail);
            Err(CoreError::OperationFailed(format!("{kind} job panicked: {detail}")))
        })
    }
}

/// Runs at most one operation at a time on a background thread.
#[derive(Clone, Default)]
pub struct Worker {
    busy: Arc<AtomicBool>,
    current: Arc<Mutex<Option<OperationKind>>>,
}

impl Worker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Starts `job` on a new thread.
    ///
    /// # Arguments
    ///
    /// * `kind` - Which operation this is, for logs and the busy error
    /// * `handlers` - Extra event handlers (file logging, JSON output) attached next to the channel
    /// * `job` - The operation; it reports through the dispatcher it is given
    ///
    /// # Returns
    ///
    /// * `Ok(JobHandle)` - The job is running
    /// * `Err(CoreError::OperationBusy)` - Another job is still in flight
    pub fn submit<T, F>(
        &self,
        kind: OperationKind,
        handlers: Vec<Arc<dyn EventHandler>>,
        job: F,
    ) -> CoreResult<JobHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce(&EventDispatcher) -> CoreResult<T> + Send + 'static,
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            let running = self
                .current
                .lock()
                .ok()
                .and_then(|current| *current)
                .map(|running| running.to_string())
                .unwrap_or_else(|| "operation".to_string());
            return Err(CoreError::OperationBusy(running));
        }
        if let Ok(mut current) = self.current.lock() {
            *current = Some(kind);
        }
        let guard = BusyGuard {
            busy: Arc::clone(&self.busy),
        };

        let (sender, receiver) = mpsc::channel();
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_handler(Arc::new(ChannelEventHandler::new(sender)));
        for handler in handlers {
            dispatcher.add_handler(handler);
        }

        log::debug!("Starting {} job", kind);
        let thread = thread::Builder::new()
            .name(format!("cutlist-{kind}"))
            .spawn(move || {
                let _guard = guard;
                let result = job(&dispatcher);
                if let Err(e) = &result {
                    log::error!("The {} job failed: {}", kind, e);
                    dispatcher.emit(Event::Error {
                        title: format!("{kind} failed"),
                        message: e.to_string(),
                    });
                }
                result
            })?;

        Ok(JobHandle {
            kind,
            events: receiver,
            thread,
        })
    }
}
