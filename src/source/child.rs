//! Child process supervision.
//!
//! The child runs with stdin attached to the null device so it never
//! competes with the viewer for keyboard input. Its stdout and stderr are
//! piped and handed to the stream readers.

use crate::model::SpawnError;
use crossbeam_channel::Sender;
use std::io;
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// How often the exit watcher checks on the child.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Termination report sent by the exit watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildExit {
    /// Exit code, or `None` if the child was killed by a signal or its
    /// status could not be collected.
    pub code: Option<i32>,
}

/// Output pipes taken from a freshly spawned child.
#[derive(Debug)]
pub struct ChildPipes {
    /// Read end of the child's stdout.
    pub stdout: ChildStdout,
    /// Read end of the child's stderr.
    pub stderr: ChildStderr,
}

/// Handle to the running command.
///
/// Cloning shares the same underlying process.
#[derive(Debug, Clone)]
pub struct ChildProcess {
    child: Arc<Mutex<Child>>,
    pid: u32,
}

/// Start `command[0]` with the remaining elements as arguments.
///
/// # Errors
///
/// - `SpawnError::EmptyCommand` if `command` is empty
/// - `SpawnError::Start` if the OS cannot start the program
/// - `SpawnError::MissingPipe` if a pipe was not created
pub fn spawn_command(command: &[String]) -> Result<(ChildProcess, ChildPipes), SpawnError> {
    let (program, args) = command.split_first().ok_or(SpawnError::EmptyCommand)?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| SpawnError::Start {
            program: program.clone(),
            source,
        })?;

    let pipes = match (child.stdout.take(), child.stderr.take()) {
        (Some(stdout), Some(stderr)) => ChildPipes { stdout, stderr },
        (stdout, _) => {
            let stream = if stdout.is_none() { "stdout" } else { "stderr" };
            // Don't leave a half-wired child behind
            let _ = child.kill();
            let _ = child.wait();
            return Err(SpawnError::MissingPipe { stream });
        }
    };

    let pid = child.id();
    info!(pid, program = %program, "Child process started");

    Ok((
        ChildProcess {
            child: Arc::new(Mutex::new(child)),
            pid,
        },
        pipes,
    ))
}

impl ChildProcess {
    /// OS process id.
    pub fn id(&self) -> u32 {
        self.pid
    }

    /// Start a thread that reports the child's termination into `tx`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the OS refuses to create the thread.
    pub fn spawn_exit_watcher(&self, tx: Sender<ChildExit>) -> io::Result<JoinHandle<()>> {
        let handle = self.clone();
        thread::Builder::new()
            .name("child-exit".to_string())
            .spawn(move || {
                let exit = handle.wait_for_exit();
                info!(pid = handle.pid, code = ?exit.code, "Child process exited");
                // The loop may already be gone if the user quit first
                let _ = tx.send(exit);
            })
    }

    /// Kill the child if it is still running and reap it.
    pub fn terminate(&self) {
        let mut child = self.lock();
        match child.try_wait() {
            Ok(Some(_)) => {}
            Ok(None) => {
                debug!(pid = self.pid, "Killing child process");
                if let Err(err) = child.kill() {
                    warn!(pid = self.pid, error = %err, "Failed to kill child process");
                }
                let _ = child.wait();
            }
            Err(err) => warn!(pid = self.pid, error = %err, "Failed to query child process"),
        }
    }

    /// Block until the child has exited.
    ///
    /// Polls instead of calling `wait()` so that [`terminate`](Self::terminate)
    /// can take the lock in between.
    fn wait_for_exit(&self) -> ChildExit {
        loop {
            let status = self.lock().try_wait();
            match status {
                Ok(Some(status)) => {
                    return ChildExit {
                        code: status.code(),
                    }
                }
                Ok(None) => thread::sleep(EXIT_POLL_INTERVAL),
                Err(err) => {
                    warn!(pid = self.pid, error = %err, "Lost track of child process");
                    return ChildExit { code: None };
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Child> {
        // A panic while holding the lock cannot leave `Child` inconsistent
        self.child.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
