//! End-to-end orchestrator tests against a shell-backed engine.
//!
//! The engine seam is swapped for `sh -c` so real processes are spawned,
//! tracked, and killed without any audio hardware.

#![cfg(unix)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use speakd_core::{
    ChunkSynthesizer, EngineInvocation, JobId, OrchestratorConfig, SpeechEngine, SynthesisParams,
};
use speakd_runtime::{ProcessRegistry, SpeechService, StopOutcome, SynthesisDriver};

/// Engine that runs a fixed shell command and counts its invocations.
struct ShellEngine {
    script: &'static str,
    invocations: AtomicUsize,
}

impl ShellEngine {
    fn new(script: &'static str) -> Self {
        Self {
            script,
            invocations: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SpeechEngine for ShellEngine {
    fn is_available(&self) -> bool {
        true
    }

    fn invocation(&self, _text: &str, _params: SynthesisParams) -> EngineInvocation {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        EngineInvocation {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), self.script.to_string()],
        }
    }

    async fn sweep_strays(&self) {}

    async fn sweep_class(&self) {}
}

struct Fixture {
    engine: Arc<ShellEngine>,
    registry: Arc<ProcessRegistry>,
    driver: Arc<SynthesisDriver>,
    service: Arc<SpeechService>,
}

fn fixture(script: &'static str) -> Fixture {
    let engine = Arc::new(ShellEngine::new(script));
    let registry = Arc::new(ProcessRegistry::new());
    let config = OrchestratorConfig::with_defaults().with_stop_grace(Duration::from_millis(200));
    let driver = Arc::new(SynthesisDriver::new(
        engine.clone() as Arc<dyn SpeechEngine>,
        Arc::clone(&registry),
        &config,
    ));
    let service = Arc::new(SpeechService::new(
        engine.clone() as Arc<dyn SpeechEngine>,
        Arc::clone(&registry),
        driver.clone() as Arc<dyn ChunkSynthesizer>,
        config,
    ));
    Fixture {
        engine,
        registry,
        driver,
        service,
    }
}

#[tokio::test]
async fn speak_runs_one_engine_invocation_for_combined_sentences() {
    let f = fixture("exit 0");

    let ack = f.service.speak("A. B. C.").unwrap();
    assert!(ack.starts_with("[START]"));
    f.service.wait_idle().await;

    // Combined length is far under the cap: one flush, one invocation.
    assert_eq!(f.engine.invocations.load(Ordering::Relaxed), 1);
    assert_eq!(f.service.active_count(), 0);
}

#[tokio::test]
async fn concurrent_jobs_are_both_tracked_and_both_stopped() {
    let f = fixture("sleep 3");

    let first = {
        let driver = Arc::clone(&f.driver);
        tokio::spawn(async move {
            driver
                .synthesize(JobId(1), "first", SynthesisParams::default())
                .await
        })
    };
    let second = {
        let driver = Arc::clone(&f.driver);
        tokio::spawn(async move {
            driver
                .synthesize(JobId(2), "second", SynthesisParams::default())
                .await
        })
    };

    // Give both spawns time to register.
    sleep(Duration::from_millis(500)).await;
    assert_eq!(f.registry.active_count(), 2);

    match f.service.stop().await {
        StopOutcome::Stopped(count) => assert_eq!(count, 2),
        StopOutcome::Idle => panic!("expected two processes to be stopped"),
    }

    // Both drivers observe their killed process as a failure.
    assert!(first.await.unwrap().is_err());
    assert!(second.await.unwrap().is_err());

    assert_eq!(f.service.active_count(), 0);
    assert_eq!(
        f.service.get_tts_status().unwrap(),
        "[IDLE] no speech is currently playing"
    );
}

#[tokio::test]
async fn kill_all_empties_the_registry() {
    let f = fixture("sleep 3");

    let task = {
        let driver = Arc::clone(&f.driver);
        tokio::spawn(async move {
            driver
                .synthesize(JobId(1), "doomed", SynthesisParams::default())
                .await
        })
    };

    sleep(Duration::from_millis(500)).await;
    assert_eq!(f.registry.active_count(), 1);

    let ack = f.service.kill_all_tts().await.unwrap();
    assert!(ack.starts_with("[KILL]"));

    assert!(task.await.unwrap().is_err());
    assert!(f.registry.is_empty());
    assert_eq!(f.service.active_count(), 0);
}

#[tokio::test]
async fn failing_engine_does_not_poison_the_registry() {
    let f = fixture("exit 1");

    let result = f
        .driver
        .synthesize(JobId(1), "nope", SynthesisParams::default())
        .await;
    assert!(result.is_err());
    assert!(f.registry.is_empty());
}

#[tokio::test]
async fn speak_short_over_the_limit_schedules_nothing() {
    let f = fixture("exit 0");

    let text = "y".repeat(150);
    assert!(f.service.speak_short(&text).is_err());
    f.service.wait_idle().await;

    assert_eq!(f.engine.invocations.load(Ordering::Relaxed), 0);
    assert_eq!(f.service.active_count(), 0);
}
