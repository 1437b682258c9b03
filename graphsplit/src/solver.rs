//! Running an external SAT solver process on a CNF file.

use crate::error::SolverError;
use log::{debug, info, warn};
use std::io;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

/// How to invoke the solver.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SolverConfig {
    /// The solver executable.
    pub program: PathBuf,
    /// Arguments placed before the CNF file path.
    pub args: Vec<String>,
    /// Kill the solver if it runs longer than this.
    pub timeout: Option<Duration>,
    /// Exit codes of a solver that finished normally.
    /// Competition solvers exit with 10 when satisfiable and 20 when unsatisfiable.
    pub accepted_exit_codes: Vec<i32>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            program: PathBuf::from("cadical"),
            args: Vec::new(),
            timeout: None,
            accepted_exit_codes: vec![0, 10, 20],
        }
    }
}

/// Runs the solver on `cnf_path` and returns its standard output.
///
/// The process is always reaped before returning, including on timeout. The timeout also
/// bounds reading its output, which a leftover grandchild may keep open.
pub fn run(config: &SolverConfig, cnf_path: &Path) -> Result<String, SolverError> {
    let mut command = Command::new(&config.program);
    command
        .args(&config.args)
        .arg(cnf_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    info!(
        "Launching solver {} on {}",
        config.program.display(),
        cnf_path.display()
    );
    let start_time = Instant::now();
    let mut child = command.spawn().map_err(|source| SolverError::Launch {
        program: config.program.clone(),
        source,
    })?;

    // Both pipes are drained while waiting, so a chatty solver cannot block on a full pipe.
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let status = match wait(&mut child, config.timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let timeout = config.timeout.unwrap_or_default();
            warn!("Solver timed out after {timeout:?}, killing it");
            reap(&mut child);
            return Err(SolverError::Timeout(timeout));
        }
        Err(err) => {
            reap(&mut child);
            return Err(SolverError::Wait(err));
        }
    };

    let deadline = config.timeout.map(|timeout| (start_time + timeout, timeout));
    let stdout = collect(stdout, deadline)?;
    let stderr = collect(stderr, deadline)?;
    debug!(
        "Solver finished with {status} after {:.3}s",
        start_time.elapsed().as_secs_f64()
    );

    match status.code() {
        Some(code) if config.accepted_exit_codes.contains(&code) => {
            info!("Solver exited with code {code}");
            if let Some(status) = contradicted_status(code, &stdout) {
                warn!("Solver exited with code {code} but reported s {status}");
            }
            Ok(stdout)
        }
        Some(code) => Err(SolverError::AbnormalExit { code, stderr }),
        None => Err(SolverError::Terminated { stderr }),
    }
}

/// Waits for the child, returning `None` if the timeout elapsed first.
fn wait(child: &mut Child, timeout: Option<Duration>) -> io::Result<Option<ExitStatus>> {
    match timeout {
        Some(timeout) => child.wait_timeout(timeout),
        None => child.wait().map(Some),
    }
}

/// Kills the child and waits for it. Errors are ignored since the child may have exited already.
fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Returns the status line if it contradicts the competition exit code convention.
fn contradicted_status(code: i32, stdout: &str) -> Option<&str> {
    let expected = match code {
        10 => "SATISFIABLE",
        20 => "UNSATISFIABLE",
        _ => return None,
    };
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("s "))
        .map(str::trim)
        .filter(|status| *status != expected)
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> Receiver<io::Result<String>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let result = reader
            .read_to_end(&mut buffer)
            .map(|_| String::from_utf8_lossy(&buffer).into_owned());
        // The receiver is gone if the deadline already passed.
        let _ = sender.send(result);
    });
    receiver
}

/// Receives a drained pipe, giving up once `deadline` passes.
fn collect(
    receiver: Option<Receiver<io::Result<String>>>,
    deadline: Option<(Instant, Duration)>,
) -> Result<String, SolverError> {
    let receiver = match receiver {
        None => return Ok(String::new()),
        Some(receiver) => receiver,
    };
    let received = match deadline {
        Some((deadline, timeout)) => {
            match receiver.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Err(RecvTimeoutError::Timeout) => {
                    warn!("Solver output still open after {timeout:?}, giving up on it");
                    return Err(SolverError::Timeout(timeout));
                }
                Err(RecvTimeoutError::Disconnected) => None,
                Ok(result) => Some(result),
            }
        }
        None => receiver.recv().ok(),
    };
    match received {
        Some(result) => result.map_err(SolverError::Capture),
        None => Err(SolverError::Capture(io::Error::new(
            io::ErrorKind::Other,
            "output reader thread panicked",
        ))),
    }
}
