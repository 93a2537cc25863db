//! The solver collaborator and its XFoil implementation.

pub mod polar;
pub mod xfoil;

use std::time::Duration;

use crate::error::{FoilError, Result, SolverFailure};
use crate::geometry::Geometry;
use crate::model::{AirfoilId, AirfoilPolar};

pub use xfoil::XfoilSolver;

/// Everything a single solver invocation needs.
#[derive(Debug, Clone, Copy)]
pub struct SolveRequest<'a> {
    pub airfoil: &'a AirfoilId,
    pub geometry: &'a Geometry,
    pub alphas: &'a [f64],
    pub reynolds: f64,
    pub mach: f64,
    pub max_iterations: u32,
    pub timeout: Duration,
}

impl SolveRequest<'_> {
    /// Wraps a failure with the airfoil it happened for.
    pub fn fail(&self, failure: SolverFailure) -> FoilError {
        FoilError::Solver {
            airfoil: self.airfoil.to_string(),
            failure,
        }
    }
}

/// Computes a polar for one airfoil over a whole alpha sequence.
///
/// Implementations must either return a polar aligned with
/// `request.alphas` or fail; there is no partially converged result.
pub trait Solver {
    fn solve(&self, request: &SolveRequest<'_>) -> Result<AirfoilPolar>;
}

impl<T: Solver + ?Sized> Solver for &T {
    fn solve(&self, request: &SolveRequest<'_>) -> Result<AirfoilPolar> {
        (**self).solve(request)
    }
}
