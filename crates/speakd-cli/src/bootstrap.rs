//! CLI bootstrap — the composition root.
//!
//! The ONLY place where the infrastructure is wired together: the SAPI
//! engine, the process registry, the synthesis driver, and the service
//! facade on top of them.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use speakd_core::{OrchestratorConfig, SpeechEngine};
use speakd_runtime::{ProcessRegistry, SapiEngine, SpeechService, SynthesisDriver};

/// Bootstrap configuration with environment overrides applied.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Orchestrator tunables.
    pub orchestrator: OrchestratorConfig,
}

impl CliConfig {
    /// Read configuration from `SPEAKD_*` environment variables, falling
    /// back to the stock defaults.
    pub fn from_env() -> Result<Self> {
        let mut orchestrator = OrchestratorConfig::with_defaults();

        if let Some(secs) = read_env_u64("SPEAKD_SYNTHESIS_TIMEOUT_SECS")? {
            orchestrator = orchestrator.with_synthesis_timeout(Duration::from_secs(secs));
        }
        if let Some(ms) = read_env_u64("SPEAKD_STOP_GRACE_MS")? {
            orchestrator = orchestrator.with_stop_grace(Duration::from_millis(ms));
        }
        if let Some(limit) = read_env_u64("SPEAKD_SHORT_TEXT_LIMIT")? {
            let limit = usize::try_from(limit)
                .context("SPEAKD_SHORT_TEXT_LIMIT does not fit this platform")?;
            orchestrator = orchestrator.with_short_text_limit(limit);
        }

        Ok(Self { orchestrator })
    }
}

fn read_env_u64(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(value) => {
            let parsed = value
                .parse::<u64>()
                .with_context(|| format!("{name} must be an integer, got '{value}'"))?;
            Ok(Some(parsed))
        }
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("{name} is not valid unicode")),
    }
}

/// Compose the speech service.
pub fn bootstrap(config: &CliConfig) -> Arc<SpeechService> {
    let engine: Arc<dyn SpeechEngine> = Arc::new(SapiEngine::new());
    let registry = Arc::new(ProcessRegistry::new());
    let driver = Arc::new(SynthesisDriver::new(
        Arc::clone(&engine),
        Arc::clone(&registry),
        &config.orchestrator,
    ));
    Arc::new(SpeechService::new(
        engine,
        registry,
        driver,
        config.orchestrator.clone(),
    ))
}
