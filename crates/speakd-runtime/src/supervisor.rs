//! The job supervisor — runs one request's chunk sequence to completion.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use speakd_core::text::preview;
use speakd_core::{ChunkSynthesizer, SpeechJob};

/// Length of the text preview in progress logs.
const PROGRESS_PREVIEW_CHARS: usize = 50;

/// Spawn the background task that speaks `job`, chunk by chunk.
///
/// Fire-and-forget: the caller has already been acknowledged before this
/// task runs, so nothing is reported back and chunk failures never
/// escalate. Chunks run strictly in sequence — the engine cannot speak
/// two chunks of one job at once, and the assembled audio must follow
/// source order. A failing chunk is retried exactly once and then
/// skipped; between chunks (but not after the last) the task pauses for
/// the job's pacing interval.
pub fn spawn_job(synthesizer: Arc<dyn ChunkSynthesizer>, job: SpeechJob) -> JoinHandle<()> {
    tokio::spawn(run_job(synthesizer, job))
}

async fn run_job(synthesizer: Arc<dyn ChunkSynthesizer>, job: SpeechJob) {
    let total = job.chunks.len();

    for (index, chunk) in job.chunks.iter().enumerate() {
        info!(
            job = %job.id,
            chunk = index + 1,
            total,
            preview = %preview(chunk, PROGRESS_PREVIEW_CHARS),
            "speaking chunk"
        );

        if let Err(error) = synthesizer.synthesize(job.id, chunk, job.params).await {
            warn!(
                job = %job.id,
                chunk = index + 1,
                %error,
                "chunk synthesis failed, retrying once"
            );
            if let Err(error) = synthesizer.synthesize(job.id, chunk, job.params).await {
                warn!(
                    job = %job.id,
                    chunk = index + 1,
                    %error,
                    "retry failed, skipping chunk"
                );
            }
        }

        if index + 1 < total {
            sleep(job.pacing).await;
        }
    }

    debug!(job = %job.id, total, "speech job finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use speakd_core::{JobId, SynthesisError, SynthesisParams};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every synthesis call and fails on a designated chunk.
    struct ScriptedSynthesizer {
        calls: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl ScriptedSynthesizer {
        fn new(fail_on: Option<&'static str>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on,
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChunkSynthesizer for ScriptedSynthesizer {
        async fn synthesize(
            &self,
            _job_id: JobId,
            text: &str,
            _params: SynthesisParams,
        ) -> Result<(), SynthesisError> {
            self.calls.lock().unwrap().push(text.to_string());
            if self.fail_on == Some(text) {
                Err(SynthesisError::EngineExit { code: Some(1) })
            } else {
                Ok(())
            }
        }
    }

    fn job(chunks: &[&str]) -> SpeechJob {
        SpeechJob::new(
            JobId(1),
            chunks.iter().map(ToString::to_string).collect(),
            SynthesisParams::default(),
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn chunks_run_in_source_order() {
        let synth = Arc::new(ScriptedSynthesizer::new(None));
        spawn_job(synth.clone(), job(&["one", "two", "three"]))
            .await
            .unwrap();
        assert_eq!(synth.calls(), vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn failing_chunk_is_retried_once_and_does_not_halt_the_job() {
        let synth = Arc::new(ScriptedSynthesizer::new(Some("two")));
        spawn_job(synth.clone(), job(&["one", "two", "three"]))
            .await
            .unwrap();
        // Chunk 2 fails twice in a row; chunks 1 and 3 are still attempted.
        assert_eq!(synth.calls(), vec!["one", "two", "two", "three"]);
    }

    #[tokio::test]
    async fn empty_job_finishes_immediately() {
        let synth = Arc::new(ScriptedSynthesizer::new(None));
        spawn_job(synth.clone(), job(&[])).await.unwrap();
        assert!(synth.calls().is_empty());
    }
}
