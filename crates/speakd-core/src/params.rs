//! Synthesis parameters and the speak-mode table.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Numeric parameters handed to the speech engine for one invocation.
///
/// `rate` uses the engine's native range (−10 slowest to +10 fastest,
/// 0 default); `volume` is 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisParams {
    /// Speaking rate, engine-native units.
    pub rate: i32,
    /// Output volume, 0–100.
    pub volume: u8,
}

impl SynthesisParams {
    /// Create parameters with explicit rate and volume.
    #[must_use]
    pub const fn new(rate: i32, volume: u8) -> Self {
        Self { rate, volume }
    }
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            rate: 0,
            volume: 100,
        }
    }
}

/// Playback mode selected by the caller.
///
/// Each mode fixes the engine parameters, the segmenter's chunk cap, and
/// the pause inserted between chunks. Faster playback uses shorter chunks
/// and shorter pauses; slower playback the opposite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakMode {
    /// Default rate and volume.
    Normal,
    /// Increased rate.
    Fast,
    /// Decreased rate.
    Slow,
    /// Reduced volume.
    Quiet,
}

impl SpeakMode {
    /// Engine parameters for this mode.
    #[must_use]
    pub const fn params(self) -> SynthesisParams {
        match self {
            Self::Normal => SynthesisParams::new(0, 100),
            Self::Fast => SynthesisParams::new(3, 100),
            Self::Slow => SynthesisParams::new(-3, 100),
            Self::Quiet => SynthesisParams::new(0, 50),
        }
    }

    /// Maximum chunk length (characters) the segmenter may produce.
    #[must_use]
    pub const fn chunk_cap(self) -> usize {
        match self {
            Self::Normal => 500,
            Self::Fast | Self::Slow | Self::Quiet => 400,
        }
    }

    /// Pause inserted between chunks of one job (not after the last).
    #[must_use]
    pub const fn pacing(self) -> Duration {
        match self {
            Self::Fast => Duration::from_millis(300),
            Self::Slow => Duration::from_millis(800),
            Self::Normal | Self::Quiet => Duration::from_millis(500),
        }
    }

    /// Lowercase label used in progress logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Fast => "fast",
            Self::Slow => "slow",
            Self::Quiet => "quiet",
        }
    }
}
