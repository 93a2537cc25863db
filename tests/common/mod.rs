#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use quickfoil::geometry::{Geometry, GeometryResolver};
use quickfoil::solver::{SolveRequest, Solver};
use quickfoil::{AirfoilId, AirfoilPolar, Result, SolverFailure};

/// Coefficients in `Coefficient::ALL` order: CL, CD, CDp, CM, Cpmin,
/// Top_Xtr, Bot_Xtr.
pub type Coefficients = [f64; 7];

/// Resolver that hands back a fixed diamond for any name.
#[derive(Default)]
pub struct StubResolver {
    pub calls: Cell<usize>,
}

impl GeometryResolver for StubResolver {
    fn resolve(&self, airfoil: &AirfoilId, _points_per_side: usize) -> Result<Geometry> {
        self.calls.set(self.calls.get() + 1);
        Ok(Geometry::new(
            airfoil.as_str(),
            vec![(1.0, 0.0), (0.0, 0.0), (1.0, 0.0)],
        ))
    }
}

/// Deterministic solver computing every coefficient from the airfoil name
/// and alpha.
pub struct StubSolver<F> {
    coefficients: F,
    pub calls: Cell<usize>,
    pub seen: RefCell<Vec<String>>,
    fail_for: Option<String>,
}

impl<F> StubSolver<F>
where
    F: Fn(&str, f64) -> Coefficients,
{
    pub fn new(coefficients: F) -> Self {
        Self {
            coefficients,
            calls: Cell::new(0),
            seen: RefCell::new(Vec::new()),
            fail_for: None,
        }
    }

    /// Makes the solve of `airfoil` fail as if XFoil did not converge.
    pub fn failing_for(mut self, airfoil: &str) -> Self {
        self.fail_for = Some(airfoil.to_string());
        self
    }
}

impl<F> Solver for StubSolver<F>
where
    F: Fn(&str, f64) -> Coefficients,
{
    fn solve(&self, request: &SolveRequest<'_>) -> Result<AirfoilPolar> {
        self.calls.set(self.calls.get() + 1);
        self.seen.borrow_mut().push(request.airfoil.to_string());

        if self.fail_for.as_deref() == Some(request.airfoil.as_str()) {
            return Err(request.fail(SolverFailure::NotConverged {
                alphas: request.alphas.to_vec(),
            }));
        }

        let mut columns: [Vec<f64>; 7] = Default::default();
        for alpha in request.alphas {
            let values = (self.coefficients)(request.airfoil.as_str(), *alpha);
            for (column, value) in columns.iter_mut().zip(values) {
                column.push(value);
            }
        }
        AirfoilPolar::new(request.airfoil.clone(), request.alphas.to_vec(), columns)
    }
}

/// Thin-airfoil-like polar: lift grows with alpha and camber, drag with lift.
pub fn linear_polar(airfoil: &str, alpha: f64) -> Coefficients {
    let camber = match airfoil {
        "naca4412" => 0.45,
        "naca6409" => 0.70,
        "naca2412" => 0.25,
        _ => 0.0,
    };
    let lift = camber + 0.11 * alpha;
    let drag = 0.006 + 0.004 * lift * lift + 0.0001 * camber;
    [lift, drag, drag * 0.3, -0.1 * camber, -1.0 - lift, 0.6, 0.9]
}

pub fn airfoils(names: &[&str]) -> Vec<AirfoilId> {
    names.iter().map(|name| AirfoilId::from(*name)).collect()
}
