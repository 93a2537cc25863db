use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};

use super::{SolveRequest, Solver, polar};
use crate::error::{Result, SolverFailure};
use crate::model::AirfoilPolar;

const AIRFOIL_FILE: &str = "airfoil.dat";
const POLAR_FILE: &str = "polar.txt";
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Drives an `xfoil` executable through its command prompt.
///
/// Each solve runs in its own scratch directory: the geometry is written as a
/// Selig file, XFoil accumulates a polar for every requested alpha, and the
/// polar file is parsed once the process exits.
#[derive(Debug, Clone)]
pub struct XfoilSolver {
    executable: PathBuf,
}

impl Default for XfoilSolver {
    fn default() -> Self {
        Self::new("xfoil")
    }
}

impl XfoilSolver {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Keystrokes sent to XFoil for one sweep.
    pub fn script(request: &SolveRequest<'_>) -> String {
        let mut script = String::new();
        // Graphics off, then back to the top-level menu.
        script.push_str("PLOP\nG F\n\n");
        let _ = writeln!(script, "LOAD {AIRFOIL_FILE}");
        script.push_str("OPER\n");
        let _ = writeln!(script, "ITER {}", request.max_iterations);
        let _ = writeln!(script, "VISC {}", request.reynolds);
        let _ = writeln!(script, "M {}", request.mach);
        script.push_str("CINC\n");
        let _ = writeln!(script, "PACC\n{POLAR_FILE}\n");
        for alpha in request.alphas {
            let _ = writeln!(script, "A {alpha}");
        }
        script.push_str("PACC\n\nQUIT\n");
        script
    }

    fn spawn(&self, workdir: &Path, script: &str) -> std::io::Result<Child> {
        let mut child = Command::new(&self.executable)
            .current_dir(workdir)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(error) = stdin.write_all(script.as_bytes()) {
                let _ = child.kill();
                let _ = child.wait();
                return Err(error);
            }
        }
        Ok(child)
    }
}

/// Waits for the child to exit, killing it once `timeout` has elapsed.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        if child.try_wait()?.is_some() {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(false);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

impl Solver for XfoilSolver {
    #[instrument(
        level = "debug",
        skip_all,
        fields(airfoil = %request.airfoil, alphas = request.alphas.len())
    )]
    fn solve(&self, request: &SolveRequest<'_>) -> Result<AirfoilPolar> {
        let workdir = tempfile::Builder::new().prefix("quickfoil-").tempdir()?;
        fs::write(workdir.path().join(AIRFOIL_FILE), request.geometry.to_selig())?;

        let script = Self::script(request);
        debug!(executable = %self.executable.display(), "starting xfoil");

        let mut child = self
            .spawn(workdir.path(), &script)
            .map_err(|error| request.fail(SolverFailure::Launch(error)))?;
        let finished = wait_with_timeout(&mut child, request.timeout)
            .map_err(|error| request.fail(SolverFailure::Launch(error)))?;
        if !finished {
            warn!(airfoil = %request.airfoil, "xfoil exceeded its time budget");
            return Err(request.fail(SolverFailure::Timeout {
                seconds: request.timeout.as_secs(),
            }));
        }

        let polar_path = workdir.path().join(POLAR_FILE);
        let text = fs::read_to_string(&polar_path).map_err(|error| {
            request.fail(SolverFailure::Output(format!(
                "no polar written ({error})"
            )))
        })?;
        polar::parse(request.airfoil, &text, request.alphas)
    }
}
