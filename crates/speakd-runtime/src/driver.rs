//! The synthesis driver — one chunk, one engine invocation.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, warn};

use speakd_core::{
    ChunkSynthesizer, HandleId, HandleState, JobId, OrchestratorConfig, SpeechEngine,
    SynthesisError, SynthesisParams,
};

use crate::process::ProcessRegistry;

/// Drives the external engine for a single chunk.
///
/// The driver spawns the engine, registers the process so the control
/// surface can see and kill it mid-flight, and waits for the exit under
/// the configured timeout. The `Child` handle never leaves this call —
/// anything else that wants the process dead signals it by PID and lets
/// the pending `wait()` here reap it.
///
/// Retry policy lives with the job supervisor; one call is exactly one
/// invocation.
pub struct SynthesisDriver {
    engine: Arc<dyn SpeechEngine>,
    registry: Arc<ProcessRegistry>,
    timeout: Duration,
}

impl SynthesisDriver {
    /// Create a driver over an engine and the shared registry.
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        registry: Arc<ProcessRegistry>,
        config: &OrchestratorConfig,
    ) -> Self {
        Self {
            engine,
            registry,
            timeout: config.synthesis_timeout,
        }
    }

    /// Forward engine output to the log, line by line.
    fn forward_engine_output(child: &mut Child, handle_id: HandleId) {
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    warn!(handle = %handle_id, "engine stderr: {line}");
                }
            });
        }

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(handle = %handle_id, "engine stdout: {line}");
                }
            });
        }
    }
}

#[async_trait]
impl ChunkSynthesizer for SynthesisDriver {
    async fn synthesize(
        &self,
        job_id: JobId,
        text: &str,
        params: SynthesisParams,
    ) -> Result<(), SynthesisError> {
        if !self.engine.is_available() {
            return Err(SynthesisError::PlatformUnsupported);
        }

        let invocation = self.engine.invocation(text, params);
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let pid = child.id().ok_or_else(|| {
            SynthesisError::Spawn(std::io::Error::other(
                "engine process exited before it could be tracked",
            ))
        })?;

        let handle_id = self.registry.register(job_id, pid, text);
        Self::forward_engine_output(&mut child, handle_id);

        match timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) if status.success() => {
                self.registry.deregister(handle_id, HandleState::Completed);
                debug!(job = %job_id, handle = %handle_id, "chunk synthesis complete");
                Ok(())
            }
            Ok(Ok(status)) => {
                self.registry.deregister(handle_id, HandleState::Failed);
                warn!(
                    job = %job_id,
                    handle = %handle_id,
                    code = ?status.code(),
                    "engine exited with failure"
                );
                Err(SynthesisError::EngineExit {
                    code: status.code(),
                })
            }
            Ok(Err(e)) => {
                self.registry.deregister(handle_id, HandleState::Failed);
                Err(SynthesisError::Spawn(e))
            }
            Err(_) => {
                if let Err(error) = child.kill().await {
                    warn!(handle = %handle_id, %error, "failed to kill timed-out engine");
                }
                self.registry.deregister(handle_id, HandleState::Killed);
                warn!(
                    job = %job_id,
                    handle = %handle_id,
                    secs = self.timeout.as_secs(),
                    "engine timed out and was killed"
                );
                Err(SynthesisError::Timeout {
                    secs: self.timeout.as_secs(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speakd_core::EngineInvocation;
    use std::time::Instant;
    use tokio_test::assert_ok;

    /// Engine that runs a fixed shell command instead of speaking.
    struct ShellEngine {
        script: &'static str,
    }

    #[async_trait]
    impl SpeechEngine for ShellEngine {
        fn is_available(&self) -> bool {
            true
        }

        fn invocation(&self, _text: &str, _params: SynthesisParams) -> EngineInvocation {
            EngineInvocation {
                program: "sh".to_string(),
                args: vec!["-c".to_string(), self.script.to_string()],
            }
        }

        async fn sweep_strays(&self) {}

        async fn sweep_class(&self) {}
    }

    struct UnavailableEngine;

    #[async_trait]
    impl SpeechEngine for UnavailableEngine {
        fn is_available(&self) -> bool {
            false
        }

        fn invocation(&self, _text: &str, _params: SynthesisParams) -> EngineInvocation {
            unreachable!("driver must not build an invocation for an unavailable engine")
        }

        async fn sweep_strays(&self) {}

        async fn sweep_class(&self) {}
    }

    fn driver_with(script: &'static str, timeout: Duration) -> (SynthesisDriver, Arc<ProcessRegistry>) {
        let registry = Arc::new(ProcessRegistry::new());
        let config = OrchestratorConfig::with_defaults().with_synthesis_timeout(timeout);
        let driver = SynthesisDriver::new(
            Arc::new(ShellEngine { script }),
            Arc::clone(&registry),
            &config,
        );
        (driver, registry)
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn successful_synthesis_deregisters() {
        let (driver, registry) = driver_with("exit 0", Duration::from_secs(5));
        let result = driver
            .synthesize(JobId(1), "hello", SynthesisParams::default())
            .await;
        assert_ok!(result);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn nonzero_exit_reports_the_code() {
        let (driver, registry) = driver_with("exit 3", Duration::from_secs(5));
        let result = driver
            .synthesize(JobId(1), "hello", SynthesisParams::default())
            .await;
        match result {
            Err(SynthesisError::EngineExit { code }) => assert_eq!(code, Some(3)),
            other => panic!("expected EngineExit, got {other:?}"),
        }
        assert!(registry.is_empty());
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn timeout_kills_the_engine() {
        let (driver, registry) = driver_with("sleep 10", Duration::from_millis(200));
        let started = Instant::now();
        let result = driver
            .synthesize(JobId(1), "hello", SynthesisParams::default())
            .await;
        assert!(matches!(result, Err(SynthesisError::Timeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn unavailable_platform_is_rejected_before_spawning() {
        let registry = Arc::new(ProcessRegistry::new());
        let config = OrchestratorConfig::with_defaults();
        let driver = SynthesisDriver::new(Arc::new(UnavailableEngine), Arc::clone(&registry), &config);
        let result = driver
            .synthesize(JobId(1), "hello", SynthesisParams::default())
            .await;
        assert!(matches!(result, Err(SynthesisError::PlatformUnsupported)));
        assert!(registry.is_empty());
    }
}
