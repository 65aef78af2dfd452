//! The process registry — the orchestrator's only shared mutable state.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use speakd_core::text::preview;
use speakd_core::{HandleId, HandleState, JobId, SynthesisHandle};

use super::shutdown::pid_exists;

/// Length of the diagnostic text preview stored on each handle.
const HANDLE_PREVIEW_CHARS: usize = 30;

/// Concurrency-safe collection of live engine invocations.
///
/// Constructed once at composition time and handed to every component
/// that needs it — drivers register and deregister around each engine
/// call, and the control surface inspects or drains it out-of-band, at
/// any time, including mid-chunk.
///
/// # Lock discipline
///
/// One mutex guards the handle map, held only for a map mutation or a
/// snapshot — never across an engine call or any other await point.
/// Entries may be momentarily stale (a process can exit between
/// observations) but never indefinitely so: every query path prunes
/// handles whose PID no longer exists before reporting.
pub struct ProcessRegistry {
    handles: Mutex<HashMap<HandleId, SynthesisHandle>>,
    next_id: AtomicU64,
}

impl ProcessRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handles: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Track a freshly spawned engine process.
    pub fn register(&self, job_id: JobId, pid: u32, text: &str) -> HandleId {
        let id = HandleId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let handle = SynthesisHandle {
            id,
            job_id,
            pid,
            state: HandleState::Running,
            started_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_secs(),
            preview: preview(text, HANDLE_PREVIEW_CHARS),
        };
        debug!(handle = %id, job = %job_id, pid, "registered engine process");
        self.handles.lock().unwrap().insert(id, handle);
        id
    }

    /// Stop tracking a handle, recording how its process ended.
    ///
    /// Returns `None` when the handle was already removed — which happens
    /// when the control surface drained the registry while the driver was
    /// still waiting on the process. That race is benign.
    pub fn deregister(&self, id: HandleId, state: HandleState) -> Option<SynthesisHandle> {
        let mut handles = self.handles.lock().unwrap();
        let mut handle = handles.remove(&id)?;
        handle.state = state;
        debug!(handle = %id, state = ?state, "deregistered engine process");
        Some(handle)
    }

    /// Take every tracked handle out of the registry in one motion.
    ///
    /// The lock is released before the caller signals any process.
    pub fn drain(&self) -> Vec<SynthesisHandle> {
        let mut handles = self.handles.lock().unwrap();
        handles.drain().map(|(_, handle)| handle).collect()
    }

    /// Prune handles whose process has already exited, then count the
    /// ones still confirmed running.
    pub fn active_count(&self) -> usize {
        let mut handles = self.handles.lock().unwrap();
        handles.retain(|id, handle| {
            let alive = pid_exists(handle.pid);
            if !alive {
                debug!(handle = %id, pid = handle.pid, "pruning exited engine process");
            }
            alive
        });
        handles.len()
    }

    /// Snapshot of the live handles, pruned and ordered by registration.
    pub fn snapshot(&self) -> Vec<SynthesisHandle> {
        let mut handles = self.handles.lock().unwrap();
        handles.retain(|_, handle| pid_exists(handle.pid));
        let mut snapshot: Vec<SynthesisHandle> = handles.values().cloned().collect();
        snapshot.sort_by_key(|handle| handle.id.0);
        snapshot
    }

    /// Number of tracked handles, stale entries included.
    pub fn len(&self) -> usize {
        self.handles.lock().unwrap().len()
    }

    /// Whether the registry tracks nothing at all.
    pub fn is_empty(&self) -> bool {
        self.handles.lock().unwrap().is_empty()
    }
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new()
    }
}
