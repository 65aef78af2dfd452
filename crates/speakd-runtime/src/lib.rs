//! Process runtime and OS-level concerns for speakd.
//!
//! Everything that touches a real operating-system process lives here:
//! the SAPI engine invocation, the process registry, the synthesis
//! driver, the job supervisor, PID termination, and the `SpeechService`
//! facade that ties them together.

pub mod driver;
pub mod engine;
pub mod mute;
pub mod process;
pub mod service;
pub mod supervisor;

// Re-export the types adapters wire together
pub use driver::SynthesisDriver;
pub use engine::SapiEngine;
pub use process::ProcessRegistry;
pub use process::shutdown::pid_exists;
pub use service::{SpeechService, StopOutcome};
pub use supervisor::spawn_job;
