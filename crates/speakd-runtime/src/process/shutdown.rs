//! PID-level process termination.
//!
//! The registry tracks engine processes as plain PIDs — the `Child`
//! handle stays with the driver that spawned them — so the control
//! surface terminates by PID and cannot reap. The driver's pending
//! `wait()` does the reaping when the process dies.

use std::io;
use std::time::Duration;

#[cfg(unix)]
use std::time::Instant;

#[cfg(unix)]
use tokio::time::sleep;

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

#[cfg(unix)]
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Check whether a PID still exists (without signalling it).
#[must_use]
pub fn pid_exists(pid: u32) -> bool {
    #[cfg(unix)]
    {
        // Null signal: checks deliverability without delivering anything.
        match signal::kill(Pid::from_raw(pid as i32), None) {
            Ok(()) => true,
            Err(Errno::ESRCH) => false,
            Err(_) => true, // exists, but we lack permission
        }
    }

    #[cfg(windows)]
    {
        let sys = sysinfo::System::new_all();
        sys.process(sysinfo::Pid::from_u32(pid)).is_some()
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = pid;
        false
    }
}

/// Ask a process to terminate, escalating to a forced kill if it is still
/// alive once `grace` has elapsed.
///
/// Returns `Ok` when the process is gone or the kill was delivered; a PID
/// that no longer exists is not an error.
pub async fn terminate_pid(pid: u32, grace: Duration) -> io::Result<()> {
    #[cfg(unix)]
    {
        terminate_unix(pid, grace).await
    }

    #[cfg(windows)]
    {
        // No graceful signal on Windows; terminate outright.
        let _ = grace;
        force_kill_pid(pid)
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = (pid, grace);
        Ok(())
    }
}

/// Kill a process immediately, with no grace period.
pub fn force_kill_pid(pid: u32) -> io::Result<()> {
    #[cfg(unix)]
    {
        match signal::kill(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(e) => Err(io::Error::other(e)),
        }
    }

    #[cfg(windows)]
    {
        let sys = sysinfo::System::new_all();
        if let Some(process) = sys.process(sysinfo::Pid::from_u32(pid)) {
            process.kill();
        }
        Ok(())
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = pid;
        Ok(())
    }
}

#[cfg(unix)]
async fn terminate_unix(pid: u32, grace: Duration) -> io::Result<()> {
    let nix_pid = Pid::from_raw(pid as i32);

    // Phase 1: SIGTERM
    if let Err(e) = signal::kill(nix_pid, Signal::SIGTERM) {
        if e == Errno::ESRCH {
            return Ok(());
        }
        return Err(io::Error::other(e));
    }

    // Poll for exit during the grace period
    let deadline = Instant::now() + grace;
    loop {
        sleep(POLL_INTERVAL).await;
        match signal::kill(nix_pid, None) {
            Err(Errno::ESRCH) => return Ok(()),
            Ok(()) | Err(_) => {}
        }
        if Instant::now() >= deadline {
            break;
        }
    }

    // Phase 2: SIGKILL
    force_kill_pid(pid)
}
