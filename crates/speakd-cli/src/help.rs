//! The static usage guide.

/// Discoverable help document for the speech operations.
pub const GUIDE: &str = "\
speakd — background text-to-speech

Playback:
  speak <text>    read text aloud (long text is split into parts)
  fast <text>     read at an increased rate
  slow <text>     read at a decreased rate
  quiet <text>    read at reduced volume
  short <text>    read a short phrase (100 characters max) immediately

Control:
  stop            stop tracked speech processes (graceful, then forced)
  kill-all        force-terminate all speech engine processes
  status          show how many segments are playing
  silence         kill all speech and mute the system
  test            run a canned self-test phrase

Notes:
  - Playback commands acknowledge immediately; synthesis runs in the
    background and individual failures are logged, not reported back.
  - Long text is split at sentence boundaries (500-character parts at
    the default rate) so there is no length limit.
  - kill-all and silence are deliberately blunt: they sweep the engine's
    whole process class and can affect unrelated processes.
  - Requires the Windows speech engine (PowerShell + System.Speech).
";
