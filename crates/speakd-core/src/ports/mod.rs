//! Trait seams between the orchestrator and its OS-level collaborators.
//!
//! Ports express intent, not implementation detail, so the runtime crate
//! can supply the real engine and tests can supply fakes without touching
//! the orchestration logic.

mod engine;
mod synthesizer;

pub use engine::{EngineInvocation, SpeechEngine};
pub use synthesizer::ChunkSynthesizer;
