use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FoilError, Result};

/// Name of an airfoil as supplied by the user. It is either a NACA 4-digit
/// code or a key into the coordinate database, and is kept verbatim so the
/// report shows exactly what was asked for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AirfoilId(String);

impl AirfoilId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AirfoilId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AirfoilId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AirfoilId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Coefficients produced by the solver for every angle of attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Coefficient {
    /// Lift coefficient.
    Lift,
    /// Total drag coefficient.
    Drag,
    /// Pressure drag coefficient.
    PressureDrag,
    /// Quarter-chord pitching moment coefficient.
    Moment,
    /// Minimum surface pressure coefficient.
    MinPressure,
    /// Upper surface transition location (x/c).
    TopTransition,
    /// Lower surface transition location (x/c).
    BottomTransition,
}

impl Coefficient {
    pub const ALL: [Coefficient; 7] = [
        Coefficient::Lift,
        Coefficient::Drag,
        Coefficient::PressureDrag,
        Coefficient::Moment,
        Coefficient::MinPressure,
        Coefficient::TopTransition,
        Coefficient::BottomTransition,
    ];

    /// Column label used in polar files and report headers.
    pub fn label(self) -> &'static str {
        match self {
            Coefficient::Lift => "CL",
            Coefficient::Drag => "CD",
            Coefficient::PressureDrag => "CDp",
            Coefficient::Moment => "CM",
            Coefficient::MinPressure => "Cpmin",
            Coefficient::TopTransition => "Top_Xtr",
            Coefficient::BottomTransition => "Bot_Xtr",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Solver output for one airfoil: every coefficient sampled at every angle of
/// attack of the sweep, index-aligned with `alphas`.
#[derive(Debug, Clone, PartialEq)]
pub struct AirfoilPolar {
    airfoil: AirfoilId,
    alphas: Vec<f64>,
    columns: [Vec<f64>; 7],
}

impl AirfoilPolar {
    /// Builds a polar from one column per coefficient, in [`Coefficient::ALL`]
    /// order. Every column must be as long as `alphas`.
    pub fn new(airfoil: AirfoilId, alphas: Vec<f64>, columns: [Vec<f64>; 7]) -> Result<Self> {
        for (coefficient, column) in Coefficient::ALL.iter().zip(&columns) {
            if column.len() != alphas.len() {
                return Err(FoilError::ShapeMismatch(format!(
                    "{airfoil}: {coefficient} has {} values for {} angles of attack",
                    column.len(),
                    alphas.len()
                )));
            }
        }

        Ok(Self {
            airfoil,
            alphas,
            columns,
        })
    }

    pub fn airfoil(&self) -> &AirfoilId {
        &self.airfoil
    }

    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    pub fn len(&self) -> usize {
        self.alphas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alphas.is_empty()
    }

    /// All values of one coefficient across the sweep.
    pub fn column(&self, coefficient: Coefficient) -> &[f64] {
        &self.columns[coefficient.index()]
    }
}

/// Ordered per-airfoil results of a sweep, aligned with the airfoil list the
/// sweep was run for.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SweepResults {
    pub polars: Vec<AirfoilPolar>,
}

impl SweepResults {
    pub fn new(polars: Vec<AirfoilPolar>) -> Self {
        Self { polars }
    }

    pub fn len(&self) -> usize {
        self.polars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polars.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AirfoilPolar> {
        self.polars.iter()
    }
}
