//! `SpeechService` — the playback operations and the control surface.
//!
//! Playback operations segment the text, spawn an independent supervisor
//! task, and return an acknowledgment immediately; the acknowledgment
//! promises only that playback *started*, never that it succeeded
//! end-to-end. Control operations act on the shared process registry
//! out-of-band, at any time, including mid-chunk of a running job.
//!
//! # Locking discipline
//!
//! The registry's lock is internal to [`ProcessRegistry`] and held only
//! for a map mutation or snapshot. The job-handle list uses a std mutex
//! that is never held across an `.await` point.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use speakd_core::text::{preview, segment};
use speakd_core::{
    ChunkSynthesizer, JobId, OrchestratorConfig, SpeakMode, SpeechEngine, SpeechJob,
    SpeechServiceError,
};

use crate::mute::mute_system;
use crate::process::ProcessRegistry;
use crate::process::shutdown::{force_kill_pid, pid_exists, terminate_pid};
use crate::supervisor::spawn_job;

/// Length of the text preview echoed back in acknowledgments.
const ACK_PREVIEW_CHARS: usize = 50;

/// Canned phrase the self test speaks.
const SELF_TEST_PHRASE: &str =
    "Speech service self test. If you can hear this, synthesis is working.";

/// Result of a `stop` pass over the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// This call terminated `n` still-running engine processes.
    Stopped(usize),
    /// Nothing was playing.
    Idle,
}

/// What `schedule` hands back for building an acknowledgment.
struct Scheduled {
    parts: usize,
    preview: String,
}

/// The orchestrator's caller-facing surface.
///
/// Dependency-injected: the engine, the registry, and the synthesizer
/// seam are all constructed at the composition root and shared here.
pub struct SpeechService {
    engine: Arc<dyn SpeechEngine>,
    registry: Arc<ProcessRegistry>,
    synthesizer: Arc<dyn ChunkSynthesizer>,
    config: OrchestratorConfig,
    /// Monotonic job id source.
    next_job: AtomicU64,
    /// Handles of spawned supervisor tasks, drained by `wait_idle`.
    jobs: Mutex<Vec<JoinHandle<()>>>,
}

impl SpeechService {
    /// Create the service over its injected collaborators.
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        registry: Arc<ProcessRegistry>,
        synthesizer: Arc<dyn ChunkSynthesizer>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            engine,
            registry,
            synthesizer,
            config,
            next_job: AtomicU64::new(0),
            jobs: Mutex::new(Vec::new()),
        }
    }

    // ── Playback operations ────────────────────────────────────────

    /// Speak text at the default rate and volume.
    pub fn speak(&self, text: &str) -> Result<String, SpeechServiceError> {
        let scheduled = self.schedule(SpeakMode::Normal, text);
        Ok(playback_ack("[START]", "speech started", &scheduled))
    }

    /// Speak text at an increased rate, with shorter chunks and pauses.
    pub fn speak_fast(&self, text: &str) -> Result<String, SpeechServiceError> {
        let scheduled = self.schedule(SpeakMode::Fast, text);
        Ok(playback_ack("[FAST]", "fast speech started", &scheduled))
    }

    /// Speak text at a decreased rate, with longer pauses.
    pub fn speak_slow(&self, text: &str) -> Result<String, SpeechServiceError> {
        let scheduled = self.schedule(SpeakMode::Slow, text);
        Ok(playback_ack("[SLOW]", "slow speech started", &scheduled))
    }

    /// Speak text at reduced volume.
    pub fn speak_quiet(&self, text: &str) -> Result<String, SpeechServiceError> {
        let scheduled = self.schedule(SpeakMode::Quiet, text);
        Ok(playback_ack("[QUIET]", "quiet speech started", &scheduled))
    }

    /// Speak a short phrase as a single chunk, with no segmentation.
    ///
    /// The only playback operation that validates before acknowledging:
    /// input over the configured limit is rejected up front and no job is
    /// scheduled.
    pub fn speak_short(&self, text: &str) -> Result<String, SpeechServiceError> {
        let len = text.chars().count();
        let max = self.config.short_text_limit;
        if len > max {
            return Err(SpeechServiceError::InputTooLong { len, max });
        }

        let mode = SpeakMode::Normal;
        let job = SpeechJob::new(
            self.next_job_id(),
            vec![text.to_string()],
            mode.params(),
            mode.pacing(),
        );
        info!(job = %job.id, "scheduling short speech job");
        self.push_job(spawn_job(Arc::clone(&self.synthesizer), job));

        Ok(format!("[SHORT] speaking: '{text}'"))
    }

    /// Run a canned phrase through the full pipeline.
    pub fn test_tts(&self) -> Result<String, SpeechServiceError> {
        if !self.engine.is_available() {
            return Err(SpeechServiceError::PlatformUnsupported);
        }
        self.schedule(SpeakMode::Normal, SELF_TEST_PHRASE);
        Ok("[TEST] speech self test started".to_string())
    }

    // ── Control surface ────────────────────────────────────────────

    /// Graceful bulk cancellation of every tracked engine process.
    ///
    /// Takes the registry's handles in one motion, then (lock released)
    /// asks each still-running process to terminate, escalating to a
    /// forced kill after the grace period. A targeted sweep follows for
    /// same-class strays the registry never saw. Counts only the
    /// processes this call actually terminated.
    pub async fn stop(&self) -> StopOutcome {
        let handles = self.registry.drain();
        let mut stopped = 0usize;

        for handle in &handles {
            if !pid_exists(handle.pid) {
                continue; // exited between snapshot and action
            }
            match terminate_pid(handle.pid, self.config.stop_grace).await {
                Ok(()) => {
                    info!(handle = %handle.id, pid = handle.pid, "stopped engine process");
                    stopped += 1;
                }
                Err(error) => warn!(
                    handle = %handle.id,
                    pid = handle.pid,
                    %error,
                    "failed to stop engine process"
                ),
            }
        }

        self.engine.sweep_strays().await;

        if stopped > 0 {
            StopOutcome::Stopped(stopped)
        } else {
            StopOutcome::Idle
        }
    }

    /// [`Self::stop`], formatted for callers.
    pub async fn stop_speech(&self) -> Result<String, SpeechServiceError> {
        Ok(match self.stop().await {
            StopOutcome::Stopped(count) => format!("[STOP] stopped {count} speech segment(s)"),
            StopOutcome::Idle => "[INFO] no speech is currently playing".to_string(),
        })
    }

    /// Immediate, unconditional termination of every tracked process,
    /// followed by the engine's class-wide and targeted sweeps.
    ///
    /// Strictly more aggressive and less targeted than [`Self::stop`];
    /// cleanup errors are swallowed.
    pub async fn kill_all(&self) {
        let handles = self.registry.drain();
        for handle in &handles {
            if let Err(error) = force_kill_pid(handle.pid) {
                debug!(handle = %handle.id, pid = handle.pid, %error, "force kill failed");
            }
        }

        self.engine.sweep_class().await;
        self.engine.sweep_strays().await;

        info!(tracked = handles.len(), "killed all engine processes");
    }

    /// [`Self::kill_all`], with the fixed confirmation callers see.
    pub async fn kill_all_tts(&self) -> Result<String, SpeechServiceError> {
        self.kill_all().await;
        Ok("[KILL] force-terminated all speech engine processes".to_string())
    }

    /// Count of engine processes still confirmed running, after pruning
    /// handles whose process has already exited.
    pub fn active_count(&self) -> usize {
        self.registry.active_count()
    }

    /// Live-count status line.
    pub fn get_tts_status(&self) -> Result<String, SpeechServiceError> {
        let active = self.active_count();
        Ok(if active > 0 {
            format!("[ACTIVE] {active} speech segment(s) playing")
        } else {
            "[IDLE] no speech is currently playing".to_string()
        })
    }

    /// Kill everything, then mute the system outright.
    pub async fn emergency_silence(&self) -> Result<String, SpeechServiceError> {
        self.kill_all().await;
        mute_system().await;
        Ok("[EMERGENCY] speech killed and system muted".to_string())
    }

    /// Wait for every scheduled job to finish.
    ///
    /// Adapter convenience — the CLI holds its process open until audio
    /// completes — not part of the fire-and-forget operation contract.
    pub async fn wait_idle(&self) {
        loop {
            let handle = self.jobs.lock().unwrap().pop();
            match handle {
                Some(handle) => {
                    if let Err(error) = handle.await {
                        warn!(%error, "speech job task failed");
                    }
                }
                None => break,
            }
        }
    }

    // ── Internals ──────────────────────────────────────────────────

    fn next_job_id(&self) -> JobId {
        JobId(self.next_job.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn push_job(&self, handle: JoinHandle<()>) {
        self.jobs.lock().unwrap().push(handle);
    }

    fn schedule(&self, mode: SpeakMode, text: &str) -> Scheduled {
        let chunks = segment(text, mode.chunk_cap());
        let job = SpeechJob::new(self.next_job_id(), chunks, mode.params(), mode.pacing());
        let parts = job.chunks.len();

        info!(
            job = %job.id,
            mode = mode.label(),
            parts,
            "scheduling speech job"
        );
        self.push_job(spawn_job(Arc::clone(&self.synthesizer), job));

        Scheduled {
            parts,
            preview: preview(text, ACK_PREVIEW_CHARS),
        }
    }
}

fn playback_ack(tag: &str, verb: &str, scheduled: &Scheduled) -> String {
    if scheduled.parts > 1 {
        format!(
            "{tag} {verb} ({} parts): '{}'",
            scheduled.parts, scheduled.preview
        )
    } else {
        format!("{tag} {verb}: '{}'", scheduled.preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use speakd_core::{EngineInvocation, SynthesisError, SynthesisParams};

    struct FakeEngine {
        available: bool,
    }

    #[async_trait]
    impl SpeechEngine for FakeEngine {
        fn is_available(&self) -> bool {
            self.available
        }

        fn invocation(&self, _text: &str, _params: SynthesisParams) -> EngineInvocation {
            EngineInvocation {
                program: "true".to_string(),
                args: Vec::new(),
            }
        }

        async fn sweep_strays(&self) {}

        async fn sweep_class(&self) {}
    }

    /// Synthesizer that records chunk lengths and never spawns anything.
    struct RecordingSynthesizer {
        chunks: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChunkSynthesizer for RecordingSynthesizer {
        async fn synthesize(
            &self,
            _job_id: JobId,
            text: &str,
            _params: SynthesisParams,
        ) -> Result<(), SynthesisError> {
            self.chunks.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn service() -> (Arc<SpeechService>, Arc<RecordingSynthesizer>) {
        service_with_engine(true)
    }

    fn service_with_engine(available: bool) -> (Arc<SpeechService>, Arc<RecordingSynthesizer>) {
        let synthesizer = Arc::new(RecordingSynthesizer {
            chunks: Mutex::new(Vec::new()),
        });
        let service = Arc::new(SpeechService::new(
            Arc::new(FakeEngine { available }),
            Arc::new(ProcessRegistry::new()),
            synthesizer.clone(),
            OrchestratorConfig::with_defaults(),
        ));
        (service, synthesizer)
    }

    #[tokio::test]
    async fn speak_acknowledges_and_schedules() {
        let (service, synthesizer) = service();
        let ack = service.speak("Hello there.").unwrap();
        assert!(ack.starts_with("[START]"));
        assert!(ack.contains("Hello there."));

        service.wait_idle().await;
        assert_eq!(synthesizer.chunks.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn long_text_acknowledges_the_part_count() {
        let (service, synthesizer) = service();
        let text = "Sentence one is here. ".repeat(40);
        let ack = service.speak(&text).unwrap();
        assert!(ack.contains("parts"));

        service.wait_idle().await;
        assert!(synthesizer.chunks.lock().unwrap().len() > 1);
    }

    #[tokio::test]
    async fn speak_short_echoes_the_text() {
        let (service, _) = service();
        let ack = service.speak_short("hello").unwrap();
        assert!(ack.contains("hello"));
        assert!(ack.starts_with("[SHORT]"));
        service.wait_idle().await;
    }

    #[tokio::test]
    async fn speak_short_rejects_long_input_without_scheduling() {
        let (service, synthesizer) = service();
        let text = "x".repeat(150);
        let err = service.speak_short(&text).unwrap_err();
        assert!(matches!(
            err,
            SpeechServiceError::InputTooLong { len: 150, max: 100 }
        ));

        service.wait_idle().await;
        assert!(synthesizer.chunks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn stop_on_an_empty_registry_is_idle_not_an_error() {
        let (service, _) = service();
        assert_eq!(service.stop().await, StopOutcome::Idle);
        assert_eq!(
            service.stop_speech().await.unwrap(),
            "[INFO] no speech is currently playing"
        );
    }

    #[tokio::test]
    async fn status_reports_idle_when_nothing_plays() {
        let (service, _) = service();
        assert_eq!(
            service.get_tts_status().unwrap(),
            "[IDLE] no speech is currently playing"
        );
    }

    #[tokio::test]
    async fn kill_all_returns_the_fixed_confirmation() {
        let (service, _) = service();
        let ack = service.kill_all_tts().await.unwrap();
        assert!(ack.starts_with("[KILL]"));
    }

    #[tokio::test]
    async fn test_tts_requires_the_engine_platform() {
        let (service, _) = service_with_engine(false);
        assert!(matches!(
            service.test_tts(),
            Err(SpeechServiceError::PlatformUnsupported)
        ));

        let (service, synthesizer) = service_with_engine(true);
        let ack = service.test_tts().unwrap();
        assert!(ack.starts_with("[TEST]"));
        service.wait_idle().await;
        assert_eq!(synthesizer.chunks.lock().unwrap().len(), 1);
    }
}
