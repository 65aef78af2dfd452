//! The speech-engine port.

use async_trait::async_trait;

use crate::params::SynthesisParams;

/// A ready-to-spawn engine command line.
#[derive(Debug, Clone)]
pub struct EngineInvocation {
    /// Program to execute.
    pub program: String,
    /// Arguments, text already escaped for the engine's invocation syntax.
    pub args: Vec<String>,
}

/// An external command-line speech synthesizer.
///
/// Implementations own everything platform-specific: whether the engine
/// exists on this host, how one utterance becomes a command line (with
/// any escaping the invocation syntax needs), and how to clean up engine
/// processes the registry does not know about.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Whether the engine can run on this host.
    fn is_available(&self) -> bool;

    /// Build the command line that speaks `text` with `params`.
    ///
    /// Implementations must escape `text` so arbitrary user input cannot
    /// break out of the command argument.
    fn invocation(&self, text: &str, params: SynthesisParams) -> EngineInvocation;

    /// Targeted cleanup: terminate stray engine processes of this class
    /// identified by command-line match.
    ///
    /// Best-effort and inherently racy — covers processes spawned outside
    /// the orchestrator's knowledge. Errors are swallowed.
    async fn sweep_strays(&self);

    /// Coarse cleanup: force-terminate every process of the engine's host
    /// class by image name, whether or not it is doing synthesis.
    ///
    /// Deliberately blunt — an emergency operation that may affect
    /// unrelated processes sharing the engine's executable name. Errors
    /// are swallowed.
    async fn sweep_class(&self);
}
