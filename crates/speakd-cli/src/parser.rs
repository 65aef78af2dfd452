//! Command-line definition.

use clap::{Parser, Subcommand};

/// Background text-to-speech driven by the OS speech engine.
#[derive(Debug, Parser)]
#[command(name = "speakd", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Speak text at the default rate and volume.
    Speak {
        /// Text to speak; long text is split and played in parts.
        text: String,
    },
    /// Speak text at an increased rate.
    Fast {
        /// Text to speak.
        text: String,
    },
    /// Speak text at a decreased rate.
    Slow {
        /// Text to speak.
        text: String,
    },
    /// Speak text at reduced volume.
    Quiet {
        /// Text to speak.
        text: String,
    },
    /// Speak a short phrase (100 characters max) with no chunking.
    Short {
        /// Text to speak.
        text: String,
    },
    /// Stop every speech process this orchestrator is tracking.
    Stop,
    /// Force-terminate all speech engine processes, tracked or not.
    KillAll,
    /// Report how many speech segments are currently playing.
    Status,
    /// Kill all speech and mute the system.
    Silence,
    /// Run a canned self-test phrase through the pipeline.
    Test,
    /// Print the usage guide.
    Guide,
}
