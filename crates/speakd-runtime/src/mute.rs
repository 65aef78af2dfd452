//! Best-effort system mute for the emergency-silence path.

/// Mute system audio.
///
/// On Windows this sends the volume-mute virtual key through WScript and,
/// when the optional `nircmd` utility is installed, asks it to hold the
/// mute explicitly. A no-op elsewhere. Never fails — the mute is
/// advisory, and a missing utility must not fail the overall operation.
pub async fn mute_system() {
    #[cfg(target_os = "windows")]
    {
        windows_mute().await;
    }

    #[cfg(not(target_os = "windows"))]
    {
        tracing::debug!("system mute is not implemented on this platform");
    }
}

#[cfg(target_os = "windows")]
async fn windows_mute() {
    use std::time::Duration;

    use tokio::process::Command;
    use tokio::time::timeout;
    use tracing::{debug, warn};

    const MUTE_TIMEOUT: Duration = Duration::from_secs(3);

    // Volume-mute virtual key (0xAD).
    let keypress = Command::new("powershell")
        .args([
            "-Command",
            "(New-Object -ComObject WScript.Shell).SendKeys([char]173)",
        ])
        .output();
    match timeout(MUTE_TIMEOUT, keypress).await {
        Ok(Ok(_)) => debug!("sent volume-mute keypress"),
        Ok(Err(error)) => warn!(%error, "volume-mute keypress failed"),
        Err(_) => warn!("volume-mute keypress timed out"),
    }

    if which::which("nircmd").is_ok() {
        let secondary = Command::new("nircmd").args(["mutesysvolume", "1"]).output();
        match timeout(MUTE_TIMEOUT, secondary).await {
            Ok(Ok(_)) => debug!("nircmd mute applied"),
            Ok(Err(error)) => warn!(%error, "nircmd mute failed"),
            Err(_) => warn!("nircmd mute timed out"),
        }
    } else {
        debug!("nircmd not installed, skipping secondary mute");
    }
}
