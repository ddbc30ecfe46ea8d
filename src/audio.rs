//! External audio-process backend
//!
//! Playback is delegated to an external decode process (mpg123); this module
//! owns launching it, pausing it with POSIX stop/continue signals, and the
//! graceful-terminate-then-kill shutdown path. Volume goes to the system
//! mixer through `amixer`, fire-and-forget.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::process::{Child, Command};

/// Grace period between SIGTERM and SIGKILL when stopping the decoder.
pub const TERMINATE_TIMEOUT: Duration = Duration::from_secs(2);

/// Control surface of the external audio process.
///
/// At most one handle is alive at a time; the controller owns it and must
/// move the old handle into `terminate` before starting a new process.
#[allow(async_fn_in_trait)]
pub trait AudioBackend: Send {
    type Handle: Send;

    async fn start(&mut self, path: &Path) -> Result<Self::Handle>;
    async fn suspend(&mut self, handle: &mut Self::Handle) -> Result<()>;
    async fn resume(&mut self, handle: &mut Self::Handle) -> Result<()>;
    /// Graceful terminate bounded by `timeout`, then force-kill.
    async fn terminate(&mut self, handle: Self::Handle, timeout: Duration) -> Result<()>;
    fn is_alive(&self, handle: &mut Self::Handle) -> bool;
    /// Push `percent` to the system mixer. Failures are logged, never returned.
    async fn set_volume(&mut self, percent: u8);
}

/// mpg123-backed implementation used on the appliance.
pub struct Mpg123Backend {
    mixer_control: String,
}

impl Mpg123Backend {
    pub fn new(mixer_control: String) -> Self {
        Self { mixer_control }
    }
}

impl AudioBackend for Mpg123Backend {
    type Handle = Child;

    async fn start(&mut self, path: &Path) -> Result<Child> {
        let child = Command::new("mpg123")
            .arg("-q")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("launching mpg123 (is it installed?)")?;
        tracing::debug!(pid = ?child.id(), track = %path.display(), "Decoder launched");
        Ok(child)
    }

    async fn suspend(&mut self, handle: &mut Child) -> Result<()> {
        signal(handle, libc::SIGSTOP)
    }

    async fn resume(&mut self, handle: &mut Child) -> Result<()> {
        signal(handle, libc::SIGCONT)
    }

    async fn terminate(&mut self, mut handle: Child, timeout: Duration) -> Result<()> {
        // A stopped process never handles SIGTERM; continue it first
        let _ = signal(&handle, libc::SIGCONT);
        signal(&handle, libc::SIGTERM)?;

        match tokio::time::timeout(timeout, handle.wait()).await {
            Ok(status) => {
                let status = status?;
                tracing::debug!(?status, "Decoder exited");
            }
            Err(_) => {
                tracing::warn!("Decoder ignored SIGTERM, killing");
                handle.kill().await.context("killing decoder")?;
            }
        }
        Ok(())
    }

    fn is_alive(&self, handle: &mut Child) -> bool {
        matches!(handle.try_wait(), Ok(None))
    }

    async fn set_volume(&mut self, percent: u8) {
        let result = Command::new("amixer")
            .args(["set", &self.mixer_control, &format!("{percent}%")])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        match result {
            Ok(status) if status.success() => {
                tracing::debug!(volume = percent, "Mixer volume set")
            }
            Ok(status) => tracing::warn!(volume = percent, ?status, "amixer refused volume"),
            Err(e) => tracing::warn!(volume = percent, error = %e, "amixer not reachable"),
        }
    }
}

fn signal(child: &Child, sig: i32) -> Result<()> {
    let Some(pid) = child.id() else {
        bail!("process already reaped");
    };
    let rc = unsafe { libc::kill(pid as libc::pid_t, sig) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error()).context("sending signal to decoder");
    }
    Ok(())
}
