use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use super::entry::{LogEntry, LogLevel};

/// Buffer capacity used when nothing else is configured.
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Receives every entry once buffering has been retired.
pub type LogObserver = Arc<dyn Fn(LogEntry) + Send + Sync>;

enum Sink {
    Buffering(VecDeque<LogEntry>),
    Observed(LogObserver),
}

struct LogState {
    sink: Sink,
    capacity: usize,
    // Entries accepted for the observer but not yet handed over.
    pending: VecDeque<LogEntry>,
    draining: bool,
}

/// Process-wide diagnostic log handle. Clones share the same buffer and
/// observer slot.
#[derive(Clone)]
pub struct DiagnosticLog {
    state: Arc<Mutex<LogState>>,
}

impl fmt::Debug for DiagnosticLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        let (mode, buffered) = match &state.sink {
            Sink::Buffering(buffer) => ("buffering", buffer.len()),
            Sink::Observed(_) => ("observed", 0),
        };
        f.debug_struct("DiagnosticLog")
            .field("mode", &mode)
            .field("buffered", &buffered)
            .field("capacity", &state.capacity)
            .finish()
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(LogState {
                sink: Sink::Buffering(VecDeque::with_capacity(capacity.min(64))),
                capacity,
                pending: VecDeque::new(),
                draining: false,
            })),
        }
    }

    pub fn log(&self, message: impl Into<String>, params: Vec<Value>) {
        self.capture(LogLevel::Info, message.into(), params);
    }

    pub fn warn(&self, message: impl Into<String>, params: Vec<Value>) {
        self.capture(LogLevel::Warn, message.into(), params);
    }

    pub fn error(&self, message: impl Into<String>, params: Vec<Value>) {
        self.capture(LogLevel::Error, message.into(), params);
    }

    /// Install `observer` as the single active observer.
    ///
    /// Any previous observer is replaced. Buffered entries are flushed to the
    /// new observer oldest first, and the buffer is never used again.
    pub fn on_log<F>(&self, observer: F)
    where
        F: Fn(LogEntry) + Send + Sync + 'static,
    {
        let mut guard = self.lock();
        let state = &mut *guard;
        let previous = std::mem::replace(&mut state.sink, Sink::Observed(Arc::new(observer)));
        if let Sink::Buffering(buffer) = previous {
            tracing::debug!(flushed = buffer.len(), "diagnostic log observer attached");
            state.pending.extend(buffer);
        }
        self.drain(guard);
    }

    /// Whether an observer has been installed.
    pub fn is_observed(&self) -> bool {
        matches!(self.lock().sink, Sink::Observed(_))
    }

    /// Number of entries waiting in the ring buffer.
    pub fn buffered_len(&self) -> usize {
        match &self.lock().sink {
            Sink::Buffering(buffer) => buffer.len(),
            Sink::Observed(_) => 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity
    }

    fn capture(&self, level: LogLevel, message: String, params: Vec<Value>) {
        let entry = LogEntry::new(level, message, params);
        mirror(&entry);

        let mut guard = self.lock();
        let state = &mut *guard;
        if let Sink::Buffering(buffer) = &mut state.sink {
            buffer.push_back(entry);
            while buffer.len() > state.capacity {
                buffer.pop_front();
            }
            return;
        }

        state.pending.push_back(entry);
        self.drain(guard);
    }

    /// Hand pending entries to the observer with the lock released.
    ///
    /// Only one caller drains at a time; anyone else who queues an entry in
    /// the meantime (another thread, or the observer itself logging) leaves it
    /// for the active drainer, which keeps delivery in queue order.
    fn drain<'a>(&'a self, mut guard: MutexGuard<'a, LogState>) {
        if guard.draining {
            return;
        }
        guard.draining = true;

        loop {
            let Some(entry) = guard.pending.pop_front() else {
                break;
            };
            let Sink::Observed(observer) = &guard.sink else {
                break;
            };
            let observer = observer.clone();
            drop(guard);

            if panic::catch_unwind(AssertUnwindSafe(|| observer(entry))).is_err() {
                tracing::error!("diagnostic log observer panicked");
            }

            guard = self.lock();
        }

        guard.draining = false;
    }

    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn mirror(entry: &LogEntry) {
    const TARGET: &str = "fcm_bridge::diagnostics";
    match entry.level {
        LogLevel::Info => tracing::info!(target: TARGET, params = ?entry.params, "{}", entry.message),
        LogLevel::Warn => tracing::warn!(target: TARGET, params = ?entry.params, "{}", entry.message),
        LogLevel::Error => {
            tracing::error!(target: TARGET, params = ?entry.params, "{}", entry.message)
        }
    }
}
