//! Core library for the quickfoil command line application.
//!
//! A sweep runs an external airfoil solver over a list of airfoils and a
//! sequence of angles of attack, then ranks the results in one spreadsheet
//! sheet per angle. The pieces are kept narrow: run parameters live in
//! [`config`], airfoil contours in [`geometry`], the XFoil driver in
//! [`solver`], sequencing in [`sweep`], the alpha-major pivot in [`report`]
//! and workbook IO under [`io`].

pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod logging;
pub mod model;
pub mod report;
pub mod solver;
pub mod sweep;

pub use config::{RunConfig, SolverSettings, SortDirection, SortKey};
pub use error::{FoilError, Result, SolverFailure};
pub use model::{AirfoilId, AirfoilPolar, Coefficient, SweepResults};
