//! Validated run parameters.
//!
//! Everything a sweep needs is gathered here and checked once, up front:
//! [`RunConfig::new`] either returns a configuration the runner and the
//! exporter can trust, or a [`FoilError::Configuration`] naming the offending
//! value. Nothing is clamped into range.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{FoilError, Result};
use crate::model::AirfoilId;

/// Highest Mach number the solver is run at.
pub const MAX_MACH: f64 = 0.3;

/// Points per surface the geometry is resampled to before solving.
pub const DEFAULT_POINTS_PER_SIDE: usize = 200;
/// Viscous iteration cap handed to the solver.
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;
/// Wall-clock budget of one solver invocation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Upper bound on the angles a range may expand to. Each angle becomes a sheet.
pub const MAX_ALPHA_COUNT: usize = 10_000;

/// Ordering applied to every report sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Quantity the report sheets are ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    Lift,
    LiftToDrag,
    Drag,
    PressureDrag,
    Moment,
    MinPressure,
}

/// Label and direction of every sort key. Supporting another key means adding
/// a row here and a matching arm in [`crate::report::ReportRow::sort_value`].
pub const SORT_POLICY: [(SortKey, &str, SortDirection); 6] = [
    (SortKey::Lift, "CL", SortDirection::Descending),
    (SortKey::LiftToDrag, "CL/CD", SortDirection::Descending),
    (SortKey::Drag, "CD", SortDirection::Ascending),
    (SortKey::PressureDrag, "CDp", SortDirection::Ascending),
    (SortKey::Moment, "CM", SortDirection::Ascending),
    (SortKey::MinPressure, "Cpmin", SortDirection::Ascending),
];

impl SortKey {
    fn policy(self) -> (&'static str, SortDirection) {
        SORT_POLICY
            .iter()
            .find(|(key, _, _)| *key == self)
            .map(|(_, label, direction)| (*label, *direction))
            .unwrap_or(("CL", SortDirection::Descending))
    }

    pub fn label(self) -> &'static str {
        self.policy().0
    }

    pub fn direction(self) -> SortDirection {
        self.policy().1
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = FoilError;

    fn from_str(value: &str) -> Result<Self> {
        let wanted = value.trim();
        SORT_POLICY
            .iter()
            .find(|(_, label, _)| label.eq_ignore_ascii_case(wanted))
            .map(|(key, _, _)| *key)
            .ok_or_else(|| {
                let known: Vec<&str> = SORT_POLICY.iter().map(|(_, label, _)| *label).collect();
                FoilError::config(format!(
                    "unknown sort key '{wanted}', expected one of {}",
                    known.join(", ")
                ))
            })
    }
}

/// Knobs of a single solver invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverSettings {
    pub points_per_side: usize,
    pub max_iterations: u32,
    pub timeout_secs: u64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            points_per_side: DEFAULT_POINTS_PER_SIDE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SolverSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.points_per_side < 10 {
            return Err(FoilError::config(format!(
                "points per side must be at least 10, got {}",
                self.points_per_side
            )));
        }
        if self.max_iterations == 0 {
            return Err(FoilError::config("iteration cap must be positive"));
        }
        if self.timeout_secs == 0 {
            return Err(FoilError::config("solver timeout must be positive"));
        }
        Ok(())
    }
}

/// Parameters shared by every airfoil of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    reynolds: f64,
    mach: f64,
    alphas: Vec<f64>,
    sort_by: SortKey,
    solver: SolverSettings,
}

impl RunConfig {
    /// Validates the flow conditions and alpha sequence, using the default
    /// [`SolverSettings`].
    pub fn new(reynolds: f64, mach: f64, alphas: Vec<f64>, sort_by: SortKey) -> Result<Self> {
        check_flow(reynolds, mach)?;

        if alphas.is_empty() {
            return Err(FoilError::config("the angle of attack sequence is empty"));
        }
        if let Some(bad) = alphas.iter().find(|alpha| !alpha.is_finite()) {
            return Err(FoilError::config(format!(
                "angle of attack {bad} is not a finite number"
            )));
        }

        Ok(Self {
            reynolds,
            mach,
            alphas,
            sort_by,
            solver: SolverSettings::default(),
        })
    }

    /// Replaces the solver settings after validating them.
    pub fn with_solver_settings(mut self, solver: SolverSettings) -> Result<Self> {
        solver.validate()?;
        self.solver = solver;
        Ok(self)
    }

    pub fn reynolds(&self) -> f64 {
        self.reynolds
    }

    pub fn mach(&self) -> f64 {
        self.mach
    }

    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    pub fn sort_by(&self) -> SortKey {
        self.sort_by
    }

    pub fn solver(&self) -> &SolverSettings {
        &self.solver
    }

    /// Re-checks the flow conditions; used by the runner as its precondition.
    pub fn ensure_valid(&self) -> Result<()> {
        check_flow(self.reynolds, self.mach)?;
        self.solver.validate()
    }
}

fn check_flow(reynolds: f64, mach: f64) -> Result<()> {
    if !reynolds.is_finite() || reynolds <= 0.0 {
        return Err(FoilError::config(format!(
            "Reynolds number must be greater than 0, got {reynolds}"
        )));
    }
    if !(0.0..=MAX_MACH).contains(&mach) {
        return Err(FoilError::config(format!(
            "Mach number must satisfy 0 <= Mach <= {MAX_MACH}, got {mach}"
        )));
    }
    Ok(())
}

/// Angles of attack either listed explicitly or described as an inclusive
/// range.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AlphaSweep {
    List(Vec<f64>),
    Range { start: f64, stop: f64, step: f64 },
}

impl AlphaSweep {
    /// Expands the sweep into the alpha sequence. Range stops are inclusive.
    pub fn to_alphas(&self) -> Result<Vec<f64>> {
        match self {
            AlphaSweep::List(values) => Ok(values.clone()),
            AlphaSweep::Range { start, stop, step } => alpha_range(*start, *stop, *step),
        }
    }
}

/// Builds `start, start + step, …` up to and including `stop`.
pub fn alpha_range(start: f64, stop: f64, step: f64) -> Result<Vec<f64>> {
    if !start.is_finite() || !stop.is_finite() || !step.is_finite() {
        return Err(FoilError::config("alpha range bounds must be finite"));
    }
    if step <= 0.0 {
        return Err(FoilError::config(format!(
            "alpha step must be positive, got {step}"
        )));
    }
    if stop < start {
        return Err(FoilError::config(format!(
            "alpha stop {stop} is below alpha start {start}"
        )));
    }

    let count = ((stop - start) / step + 1e-9).floor() + 1.0;
    if !count.is_finite() || count > MAX_ALPHA_COUNT as f64 {
        return Err(FoilError::config(format!(
            "alpha range {start}..={stop} step {step} exceeds {MAX_ALPHA_COUNT} angles"
        )));
    }
    let count = count as usize;
    Ok((0..count)
        .map(|index| round_alpha(start + step * index as f64))
        .collect())
}

fn round_alpha(value: f64) -> f64 {
    let rounded = (value * 1e9).round() / 1e9;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Optional JSON description of a run. Any value given on the command line
/// takes precedence over the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunFile {
    pub airfoils: Vec<AirfoilId>,
    pub reynolds: Option<f64>,
    pub mach: Option<f64>,
    pub alphas: Option<AlphaSweep>,
    pub sort_by: Option<String>,
    pub output: Option<PathBuf>,
    pub solver: Option<SolverSettings>,
}

impl RunFile {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FoilError::MissingInput(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}
