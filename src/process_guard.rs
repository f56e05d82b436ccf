//! Lifecycle management for the external CLI child process.
//!
//! CI agents cancel a job by signalling the wrapper. The external CLI runs in
//! its own process group, so the wrapper forwards the cancellation to that
//! group instead of leaving a deployment or job run orphaned.
//!
//! - The child is spawned with `in_new_process_group()`
//! - Its PID is tracked in a global registry while it runs
//! - On SIGINT, SIGTERM or SIGHUP the group gets SIGTERM, then SIGKILL after
//!   a grace period, and the wrapper exits with `128 + signal`

use std::collections::HashSet;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::{Duration, Instant};

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tracing::{debug, info, warn};

use crate::exit_codes;

/// Grace period between SIGTERM and SIGKILL when the wrapper is cancelled.
pub const CANCEL_GRACE_PERIOD: Duration = Duration::from_secs(10);

static CHILD_REGISTRY: OnceLock<Arc<Mutex<ChildRegistry>>> = OnceLock::new();

/// Registry tracking running external CLI processes
#[derive(Debug, Default)]
pub struct ChildRegistry {
    pids: HashSet<u32>,
    cleanup_initiated: bool,
}

impl ChildRegistry {
    /// Get or create the global child registry
    pub fn global() -> Arc<Mutex<ChildRegistry>> {
        CHILD_REGISTRY
            .get_or_init(|| Arc::new(Mutex::new(ChildRegistry::default())))
            .clone()
    }

    pub fn register(&mut self, pid: u32) {
        self.pids.insert(pid);
        debug!(pid, "registered child process");
    }

    pub fn unregister(&mut self, pid: u32) {
        self.pids.remove(&pid);
        debug!(pid, "unregistered child process");
    }

    pub fn count(&self) -> usize {
        self.pids.len()
    }

    /// True once [`terminate_all`](Self::terminate_all) has started. No new
    /// child may be spawned after that.
    pub fn is_cancelled(&self) -> bool {
        self.cleanup_initiated
    }

    /// Signal every tracked process group with SIGTERM, wait up to
    /// `grace_period`, then SIGKILL whatever is left. Runs at most once.
    pub fn terminate_all(&mut self, grace_period: Duration) {
        if self.cleanup_initiated {
            return;
        }
        self.cleanup_initiated = true;

        if self.pids.is_empty() {
            return;
        }
        info!(count = self.pids.len(), "terminating external CLI process group(s)");

        let pids: Vec<u32> = self.pids.iter().copied().collect();
        for &pid in &pids {
            if let Err(e) = signal_group(pid, Signal::SIGTERM) {
                warn!(pid, error = %e, "failed to send SIGTERM to process group");
            }
        }

        let start = Instant::now();
        while start.elapsed() < grace_period {
            if pids.iter().all(|&pid| !is_alive(pid)) {
                info!("external CLI terminated gracefully");
                self.pids.clear();
                return;
            }
            std::thread::sleep(Duration::from_millis(100));
        }

        for &pid in &pids {
            if is_alive(pid) {
                warn!(pid, "process group did not terminate, sending SIGKILL");
                let _ = signal_group(pid, Signal::SIGKILL);
            }
        }
        self.pids.clear();
    }
}

/// Negative PID signals the whole group, reaching processes the external
/// CLI spawned itself.
fn signal_group(pgid: u32, signal: Signal) -> Result<(), nix::Error> {
    let pgid = i32::try_from(pgid).map_err(|_| nix::Error::EINVAL)?;
    signal::kill(Pid::from_raw(-pgid), signal)
}

/// Zombies count as dead: they still accept signals but are not running.
fn is_alive(pid: u32) -> bool {
    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    if signal::kill(Pid::from_raw(raw), None).is_err() {
        return false;
    }

    // Field 3 of /proc/<pid>/stat is the state letter
    if let Ok(stat) = std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        if let Some(state) = stat
            .rsplit_once(')')
            .and_then(|(_, rest)| rest.split_whitespace().next())
        {
            return !matches!(state, "Z" | "X");
        }
    }
    true
}

/// Install handlers that forward SIGINT, SIGTERM and SIGHUP to the running
/// external CLI, then exit with `128 + signal`. Call once at startup.
pub fn init_signal_handlers() -> std::io::Result<()> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;

    std::thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            let name = match sig {
                SIGINT => "SIGINT",
                SIGTERM => "SIGTERM",
                SIGHUP => "SIGHUP",
                _ => "UNKNOWN",
            };
            info!(signal = name, "cancellation received, stopping external CLI");

            ChildRegistry::global()
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .terminate_all(CANCEL_GRACE_PERIOD);
            std::process::exit(exit_codes::SIGNAL_BASE + sig);
        }
    });

    Ok(())
}

/// Extension trait for `std::process::Command` to start a new process group
pub trait CommandProcessGroup {
    /// The child becomes leader of a new group (PGID = child PID), so the
    /// whole tree can be signalled at once and terminal Ctrl+C reaches only
    /// the wrapper.
    fn in_new_process_group(&mut self) -> &mut Self;
}

impl CommandProcessGroup for std::process::Command {
    fn in_new_process_group(&mut self) -> &mut Self {
        use std::os::unix::process::CommandExt;
        self.process_group(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn test_registry_register_unregister() {
        let mut registry = ChildRegistry::default();

        registry.register(1234);
        registry.register(5678);
        assert_eq!(registry.count(), 2);

        registry.unregister(1234);
        assert_eq!(registry.count(), 1);
        registry.unregister(9999);
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_terminate_all_runs_once() {
        let mut registry = ChildRegistry::default();
        registry.terminate_all(Duration::from_millis(10));
        assert!(registry.cleanup_initiated);

        registry.register(4242);
        registry.terminate_all(Duration::from_millis(10));
        assert_eq!(registry.count(), 1, "second call must be a no-op");
        assert!(registry.is_cancelled());
    }

    #[test]
    fn test_terminate_all_kills_process_group() {
        let mut child = Command::new("sleep")
            .arg("30")
            .in_new_process_group()
            .spawn()
            .expect("spawn sleep");
        let pid = child.id();

        let mut registry = ChildRegistry::default();
        registry.register(pid);
        registry.terminate_all(Duration::from_secs(5));
        assert_eq!(registry.count(), 0);

        let status = child.wait().expect("wait for sleep");
        assert!(!status.success());
    }
}
