//! Domain types and ports for the speakd speech job orchestrator.
//!
//! This crate is pure domain: the text segmenter, the speak-mode table,
//! job/handle types, the error taxonomy, and the trait seams implemented
//! by `speakd-runtime`. No process or OS concerns live here.

pub mod config;
pub mod error;
pub mod job;
pub mod params;
pub mod ports;
pub mod text;

// Re-export commonly used types for convenience
pub use config::{
    DEFAULT_SHORT_TEXT_LIMIT, DEFAULT_STOP_GRACE_MS, DEFAULT_SYNTHESIS_TIMEOUT_SECS,
    OrchestratorConfig,
};
pub use error::{SpeechServiceError, SynthesisError};
pub use job::{HandleId, HandleState, JobId, SpeechJob, SynthesisHandle};
pub use params::{SpeakMode, SynthesisParams};
pub use ports::{ChunkSynthesizer, EngineInvocation, SpeechEngine};
pub use text::{preview, segment};
