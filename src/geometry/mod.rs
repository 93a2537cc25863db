//! Airfoil coordinates and the resolver that turns identifiers into them.

pub mod naca;
pub mod selig;

use std::f64::consts::PI;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FoilError, Result};
use crate::model::AirfoilId;

/// A closed airfoil contour in Selig order: upper trailing edge, around the
/// leading edge, back along the lower surface to the trailing edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

impl Geometry {
    pub fn new(name: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// Index of the leading edge, taken as the point with the smallest x.
    pub fn leading_edge_index(&self) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .min_by(|(_, lhs), (_, rhs)| lhs.0.total_cmp(&rhs.0))
            .map(|(index, _)| index)
    }

    /// Resamples both surfaces to `points_per_side` points with cosine
    /// spacing in arc length, clustering points at the leading and trailing
    /// edges. The result holds `2 * points_per_side - 1` points since the
    /// leading edge is shared.
    pub fn repanel(&self, points_per_side: usize) -> Result<Geometry> {
        let invalid = |reason: &str| FoilError::GeometryResolution {
            airfoil: self.name.clone(),
            reason: reason.to_string(),
        };

        if points_per_side < 2 {
            return Err(invalid("at least two points per side are required"));
        }
        let le = self
            .leading_edge_index()
            .ok_or_else(|| invalid("no coordinates"))?;
        if le == 0 || le + 1 >= self.points.len() {
            return Err(invalid("contour is not in Selig order"));
        }

        let mut upper: Vec<(f64, f64)> = self.points[..=le].to_vec();
        upper.reverse();
        let lower = &self.points[le..];

        let mut upper = resample(&upper, points_per_side);
        let lower = resample(lower, points_per_side);

        upper.reverse();
        upper.extend_from_slice(&lower[1..]);
        Ok(Geometry::new(self.name.clone(), upper))
    }

    /// Renders the contour as a Selig `.dat` file.
    pub fn to_selig(&self) -> String {
        let mut out = String::with_capacity(self.points.len() * 24 + self.name.len() + 1);
        out.push_str(&self.name);
        out.push('\n');
        for (x, y) in &self.points {
            let _ = writeln!(out, " {x:.8} {y:.8}");
        }
        out
    }
}

/// Resamples a polyline running from the leading edge to the trailing edge.
fn resample(side: &[(f64, f64)], count: usize) -> Vec<(f64, f64)> {
    let mut arc = Vec::with_capacity(side.len());
    let mut total = 0.0;
    arc.push(0.0);
    for pair in side.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        total += (x1 - x0).hypot(y1 - y0);
        arc.push(total);
    }

    let mut segment = 0;
    (0..count)
        .map(|index| {
            let target = total * 0.5 * (1.0 - (PI * index as f64 / (count - 1) as f64).cos());
            while segment + 2 < arc.len() && arc[segment + 1] < target {
                segment += 1;
            }
            let span = arc[segment + 1] - arc[segment];
            let t = if span > 0.0 {
                ((target - arc[segment]) / span).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (x0, y0) = side[segment];
            let (x1, y1) = side[segment + 1];
            (x0 + t * (x1 - x0), y0 + t * (y1 - y0))
        })
        .collect()
}

/// Turns an airfoil identifier into a repanelled contour.
pub trait GeometryResolver {
    fn resolve(&self, airfoil: &AirfoilId, points_per_side: usize) -> Result<Geometry>;
}

impl<T: GeometryResolver + ?Sized> GeometryResolver for &T {
    fn resolve(&self, airfoil: &AirfoilId, points_per_side: usize) -> Result<Geometry> {
        (**self).resolve(airfoil, points_per_side)
    }
}

/// Resolves NACA 4-digit codes analytically and everything else from a
/// directory of Selig `.dat` files.
#[derive(Debug, Clone, Default)]
pub struct StandardResolver {
    database: Option<PathBuf>,
}

impl StandardResolver {
    pub fn new(database: Option<PathBuf>) -> Self {
        Self { database }
    }

    /// Path of the database entry for `airfoil`, if one exists.
    fn entry(&self, airfoil: &AirfoilId) -> Option<PathBuf> {
        let database = self.database.as_ref()?;
        let key = airfoil.as_str().trim().to_ascii_lowercase();
        let path = database.join(format!("{key}.dat"));
        path.is_file().then_some(path)
    }

    fn load(&self, airfoil: &AirfoilId, path: &Path, points_per_side: usize) -> Result<Geometry> {
        let contents = std::fs::read_to_string(path)?;
        let geometry = selig::parse(airfoil.as_str(), &contents)?;
        debug!(%airfoil, raw_points = geometry.points.len(), "loaded coordinates");
        geometry.repanel(points_per_side)
    }

    fn unresolved(&self, airfoil: &AirfoilId) -> FoilError {
        let reason = match &self.database {
            Some(database) => format!(
                "not a NACA 4-digit code and {} has no '{}.dat'",
                database.display(),
                airfoil.as_str().trim().to_ascii_lowercase()
            ),
            None => "not a NACA 4-digit code and no airfoil database is configured".into(),
        };
        FoilError::GeometryResolution {
            airfoil: airfoil.to_string(),
            reason,
        }
    }
}

impl GeometryResolver for StandardResolver {
    /// Names spelled with a `naca` prefix are always generated. Bare digit
    /// names such as `2032` are looked up in the database first and only
    /// generated when no entry exists.
    fn resolve(&self, airfoil: &AirfoilId, points_per_side: usize) -> Result<Geometry> {
        let name = airfoil.as_str();
        if !naca::has_prefix(name) {
            if let Some(path) = self.entry(airfoil) {
                return self.load(airfoil, &path, points_per_side);
            }
        }

        if let Some(code) = naca::parse_code(name) {
            debug!(%airfoil, "generating NACA 4-digit section");
            return Ok(naca::generate(name, code, points_per_side));
        }

        Err(self.unresolved(airfoil))
    }
}
