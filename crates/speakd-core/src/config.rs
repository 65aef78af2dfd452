//! Orchestrator configuration.
//!
//! Pure domain config with const defaults; env overrides are applied at
//! the composition root, not here.

use std::time::Duration;

/// Default per-chunk synthesis timeout, seconds.
pub const DEFAULT_SYNTHESIS_TIMEOUT_SECS: u64 = 60;

/// Default grace period between asking a process to terminate and
/// force-killing it, milliseconds.
pub const DEFAULT_STOP_GRACE_MS: u64 = 300;

/// Default character limit for the no-chunking short-text operation.
pub const DEFAULT_SHORT_TEXT_LIMIT: usize = 100;

/// Tunables for the speech job orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// How long one engine invocation may run before it is killed.
    pub synthesis_timeout: Duration,
    /// Grace period for graceful termination before escalation.
    pub stop_grace: Duration,
    /// Character limit for `speak_short`.
    pub short_text_limit: usize,
}

impl OrchestratorConfig {
    /// Configuration with the stock timeouts and limits.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            synthesis_timeout: Duration::from_secs(DEFAULT_SYNTHESIS_TIMEOUT_SECS),
            stop_grace: Duration::from_millis(DEFAULT_STOP_GRACE_MS),
            short_text_limit: DEFAULT_SHORT_TEXT_LIMIT,
        }
    }

    /// Set the per-chunk synthesis timeout.
    #[must_use]
    pub const fn with_synthesis_timeout(mut self, timeout: Duration) -> Self {
        self.synthesis_timeout = timeout;
        self
    }

    /// Set the graceful-termination grace period.
    #[must_use]
    pub const fn with_stop_grace(mut self, grace: Duration) -> Self {
        self.stop_grace = grace;
        self
    }

    /// Set the `speak_short` character limit.
    #[must_use]
    pub const fn with_short_text_limit(mut self, limit: usize) -> Self {
        self.short_text_limit = limit;
        self
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = OrchestratorConfig::with_defaults();
        assert_eq!(config.synthesis_timeout, Duration::from_secs(60));
        assert_eq!(config.short_text_limit, 100);
    }

    #[test]
    fn builders_override_single_fields() {
        let config = OrchestratorConfig::with_defaults()
            .with_synthesis_timeout(Duration::from_millis(200))
            .with_short_text_limit(40);
        assert_eq!(config.synthesis_timeout, Duration::from_millis(200));
        assert_eq!(config.short_text_limit, 40);
        assert_eq!(config.stop_grace, Duration::from_millis(DEFAULT_STOP_GRACE_MS));
    }
}
