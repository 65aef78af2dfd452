//! The one-chunk synthesis port.

use async_trait::async_trait;

use crate::error::SynthesisError;
use crate::job::JobId;
use crate::params::SynthesisParams;

/// Drives the engine for exactly one chunk.
///
/// Implemented by the runtime's synthesis driver; the job supervisor only
/// sees this seam, which is also what supervisor tests fake. One call is
/// one engine invocation — retry policy lives with the caller.
#[async_trait]
pub trait ChunkSynthesizer: Send + Sync {
    /// Speak `text` once with `params`, on behalf of `job_id`.
    ///
    /// Resolves when the engine invocation has fully concluded, however
    /// it ended.
    async fn synthesize(
        &self,
        job_id: JobId,
        text: &str,
        params: SynthesisParams,
    ) -> Result<(), SynthesisError>;
}
