//! Runs the solver over every airfoil of a sweep.

use std::path::Path;

use tracing::{debug, info, info_span, instrument};

use crate::config::RunConfig;
use crate::error::{FoilError, Result};
use crate::geometry::GeometryResolver;
use crate::model::{AirfoilId, SweepResults};
use crate::report;
use crate::solver::{SolveRequest, Solver};

/// Receives progress notifications while a sweep runs. Observers only
/// watch; they cannot alter the results.
pub trait SweepObserver {
    /// Called before the geometry of `airfoil` is resolved. `position` is
    /// zero-based.
    fn on_airfoil_started(&self, airfoil: &AirfoilId, position: usize, total: usize);

    /// Called once the solver returned a polar for `airfoil`.
    fn on_airfoil_finished(&self, _airfoil: &AirfoilId, _position: usize, _total: usize) {}
}

/// Sequences geometry resolution and solver calls for a list of airfoils.
pub struct SweepRunner<'a, G, S> {
    resolver: G,
    solver: S,
    observer: Option<&'a dyn SweepObserver>,
}

impl<'a, G, S> SweepRunner<'a, G, S>
where
    G: GeometryResolver,
    S: Solver,
{
    pub fn new(resolver: G, solver: S) -> Self {
        Self {
            resolver,
            solver,
            observer: None,
        }
    }

    /// Attaches a progress observer.
    pub fn with_observer(mut self, observer: &'a dyn SweepObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Solves every airfoil over the full alpha sequence of `config`.
    ///
    /// Results come back in the order of `airfoils`. The first geometry or
    /// solver failure aborts the sweep and is returned as is; results of
    /// airfoils solved before it are dropped.
    #[instrument(
        level = "info",
        skip_all,
        fields(airfoils = airfoils.len(), alphas = config.alphas().len(), reynolds = config.reynolds(), mach = config.mach())
    )]
    pub fn run(&self, airfoils: &[AirfoilId], config: &RunConfig) -> Result<SweepResults> {
        if airfoils.is_empty() {
            return Err(FoilError::config("the airfoil list is empty"));
        }
        config.ensure_valid()?;

        let settings = config.solver();
        let total = airfoils.len();
        let mut polars = Vec::with_capacity(total);

        for (position, airfoil) in airfoils.iter().enumerate() {
            let _span = info_span!("airfoil", %airfoil, position).entered();
            if let Some(observer) = self.observer {
                observer.on_airfoil_started(airfoil, position, total);
            }

            let geometry = self.resolver.resolve(airfoil, settings.points_per_side)?;
            debug!(points = geometry.points.len(), "geometry resolved");

            let request = SolveRequest {
                airfoil,
                geometry: &geometry,
                alphas: config.alphas(),
                reynolds: config.reynolds(),
                mach: config.mach(),
                max_iterations: settings.max_iterations,
                timeout: settings.timeout(),
            };
            let polar = self.solver.solve(&request)?;

            if polar.alphas().len() != config.alphas().len() {
                return Err(FoilError::ShapeMismatch(format!(
                    "solver returned {} angles of attack for {airfoil}, expected {}",
                    polar.alphas().len(),
                    config.alphas().len()
                )));
            }

            info!(position = position + 1, total, "airfoil solved");
            if let Some(observer) = self.observer {
                observer.on_airfoil_finished(airfoil, position, total);
            }
            polars.push(polar);
        }

        Ok(SweepResults::new(polars))
    }

    /// Runs the sweep and writes the ranked report to `destination`.
    ///
    /// Nothing is written unless every airfoil solved.
    pub fn run_and_export(
        &self,
        airfoils: &[AirfoilId],
        config: &RunConfig,
        destination: &Path,
    ) -> Result<SweepResults> {
        let results = self.run(airfoils, config)?;
        report::export(airfoils, &results, config.sort_by(), destination)?;
        Ok(results)
    }
}
