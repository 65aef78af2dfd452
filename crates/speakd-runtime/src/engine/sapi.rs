//! The Windows speech engine, invoked through PowerShell.

use async_trait::async_trait;

use speakd_core::{EngineInvocation, SpeechEngine, SynthesisParams};

/// `System.Speech` text-to-speech driven through a PowerShell one-liner.
///
/// Every utterance is its own `powershell -Command` process, which is
/// what makes out-of-band cancellation possible: killing the process
/// stops the audio.
pub struct SapiEngine;

/// Marker every invocation carries on its command line; the targeted
/// sweep recognizes strays by it.
const COMMAND_MARKER: &str = "System.Speech";

impl SapiEngine {
    /// Create the engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Escape text for interpolation into a single-quoted PowerShell
    /// string: quotes are doubled, newlines flattened to spaces, so
    /// arbitrary user text cannot break out of the argument.
    fn escape(text: &str) -> String {
        text.replace('\'', "''").replace(['\r', '\n'], " ")
    }

    fn script(text: &str, params: SynthesisParams) -> String {
        format!(
            "Add-Type -AssemblyName System.Speech; \
             $synth = New-Object System.Speech.Synthesis.SpeechSynthesizer; \
             $synth.Rate = {}; \
             $synth.Volume = {}; \
             $synth.Speak('{}'); \
             $synth.Dispose()",
            params.rate,
            params.volume,
            Self::escape(text),
        )
    }
}

impl Default for SapiEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechEngine for SapiEngine {
    fn is_available(&self) -> bool {
        cfg!(target_os = "windows")
    }

    fn invocation(&self, text: &str, params: SynthesisParams) -> EngineInvocation {
        EngineInvocation {
            program: "powershell".to_string(),
            args: vec!["-Command".to_string(), Self::script(text, params)],
        }
    }

    async fn sweep_strays(&self) {
        #[cfg(target_os = "windows")]
        {
            let killed = sweep::kill_powershell_processes(true);
            tracing::info!(killed, "swept stray speech engine processes");
        }
    }

    async fn sweep_class(&self) {
        #[cfg(target_os = "windows")]
        {
            let killed = sweep::kill_powershell_processes(false);
            tracing::info!(killed, "swept the engine's host process class");
        }
    }
}

/// Process sweeps, by name and command-line match.
///
/// Inherently racy, best-effort cleanup. The class-wide variant kills by
/// image name alone and may take down unrelated PowerShell processes —
/// that breadth is the point of the emergency path, not an accident.
#[cfg(target_os = "windows")]
mod sweep {
    use super::COMMAND_MARKER;
    use sysinfo::System;

    const HOST_CLASS_NAMES: [&str; 3] = ["powershell.exe", "powershell", "pwsh.exe"];

    pub(super) fn kill_powershell_processes(require_marker: bool) -> usize {
        let sys = System::new_all();
        let own_pid = std::process::id();
        let mut killed = 0usize;

        for (pid, process) in sys.processes() {
            if pid.as_u32() == own_pid {
                continue;
            }
            let name = process.name().to_string_lossy().to_ascii_lowercase();
            if !HOST_CLASS_NAMES.contains(&name.as_str()) {
                continue;
            }
            if require_marker {
                let command_line = process
                    .cmd()
                    .iter()
                    .map(|arg| arg.to_string_lossy())
                    .collect::<Vec<_>>()
                    .join(" ");
                if !command_line.contains(COMMAND_MARKER) {
                    continue;
                }
            }
            if process.kill() {
                killed += 1;
            }
        }

        killed
    }
}
