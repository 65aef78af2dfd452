//! Jobs, handles, and their identifiers.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::params::SynthesisParams;

/// Identifier of one speak request, unique within the host process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Identifier of one tracked engine process, unique within the host process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HandleId(pub u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "synth-{}", self.0)
    }
}

/// Lifecycle state of a tracked engine process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleState {
    /// The engine process is (as far as the registry knows) alive.
    Running,
    /// Exited with a success status.
    Completed,
    /// Terminated by timeout or by the control surface.
    Killed,
    /// Exited with a failure status, or spawn-adjacent failure.
    Failed,
}

/// The registry's view of one live engine invocation.
///
/// Plain data only — the `Child` handle stays with the driver that spawned
/// the process, so registry access never has to wait on a running engine.
/// The control surface terminates by PID instead.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisHandle {
    /// Registry identifier.
    pub id: HandleId,
    /// The job this invocation belongs to.
    pub job_id: JobId,
    /// OS process id of the engine invocation.
    pub pid: u32,
    /// Lifecycle state.
    pub state: HandleState,
    /// Unix timestamp (seconds) when the engine was spawned.
    pub started_at: u64,
    /// Short text preview, for diagnostics.
    pub preview: String,
}

/// One caller-initiated speak request: an ordered chunk sequence plus the
/// parameters and pacing every chunk shares.
///
/// Ephemeral — owned by a single supervisor task and dropped when the task
/// ends. Concurrent jobs are independent and share nothing but the
/// process registry.
#[derive(Debug, Clone)]
pub struct SpeechJob {
    /// Job identifier, for logs and handle diagnostics.
    pub id: JobId,
    /// Chunks in source order; each maps to one engine invocation.
    pub chunks: Vec<String>,
    /// Engine parameters used for every chunk.
    pub params: SynthesisParams,
    /// Pause between chunks (not after the last).
    pub pacing: Duration,
}

impl SpeechJob {
    /// Create a job over an already-segmented chunk sequence.
    #[must_use]
    pub const fn new(
        id: JobId,
        chunks: Vec<String>,
        params: SynthesisParams,
        pacing: Duration,
    ) -> Self {
        Self {
            id,
            chunks,
            params,
            pacing,
        }
    }
}
