//! Error taxonomy for synthesis and the service surface.

/// Failure of a single engine invocation.
///
/// These never cross the job-supervisor boundary — chunk failures are
/// logged and the job moves on. They exist so the driver and its callers
/// can distinguish the failure kinds rather than collapsing everything
/// into one catch-all.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// The speech engine does not run on this host platform.
    #[error("speech engine is not available on this platform")]
    PlatformUnsupported,

    /// The OS rejected the spawn, or the engine binary is missing.
    #[error("failed to spawn speech engine: {0}")]
    Spawn(#[from] std::io::Error),

    /// The engine ran past the per-chunk timeout and was killed.
    #[error("speech engine timed out after {secs}s and was killed")]
    Timeout {
        /// The timeout that elapsed.
        secs: u64,
    },

    /// The engine exited with a non-success status.
    #[error("speech engine exited with status {code:?}")]
    EngineExit {
        /// Exit code, if the process was not terminated by a signal.
        code: Option<i32>,
    },
}

/// Up-front rejection of a service operation.
///
/// Playback operations acknowledge optimistically before any chunk runs,
/// so only pre-scheduling validation can produce one of these.
#[derive(Debug, thiserror::Error)]
pub enum SpeechServiceError {
    /// `speak_short` input over the configured limit.
    #[error("text is too long ({len} chars, limit {max}) — use speak instead")]
    InputTooLong {
        /// Character count of the rejected input.
        len: usize,
        /// The configured limit.
        max: usize,
    },

    /// The speech engine does not run on this host platform.
    #[error("text-to-speech is not supported on this platform")]
    PlatformUnsupported,
}
