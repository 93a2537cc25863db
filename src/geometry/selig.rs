//! Selig-format coordinate files as distributed by the UIUC airfoil database.

use super::Geometry;
use crate::error::{FoilError, Result};

/// Parses a Selig `.dat` file. The first non-blank line is the title and is
/// discarded in favour of `name`; every following line is an `x y` pair.
pub fn parse(name: &str, contents: &str) -> Result<Geometry> {
    let invalid = |reason: String| FoilError::GeometryResolution {
        airfoil: name.to_string(),
        reason,
    };

    let mut lines = contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());
    lines
        .next()
        .ok_or_else(|| invalid("coordinate file is empty".into()))?;

    let mut points = Vec::new();
    for (index, line) in lines {
        let mut fields = line.split_whitespace().map(str::parse::<f64>);
        let pair = match (fields.next(), fields.next()) {
            (Some(Ok(x)), Some(Ok(y))) => (x, y),
            _ => {
                return Err(invalid(format!(
                    "line {} is not an 'x y' coordinate pair",
                    index + 1
                )));
            }
        };

        if points.is_empty() && pair.0 > 1.5 && pair.1 > 1.5 {
            return Err(invalid(
                "Lednicer-format files are not supported, convert to Selig order".into(),
            ));
        }
        points.push(pair);
    }

    if points.len() < 3 {
        return Err(invalid(format!(
            "expected at least 3 coordinates, found {}",
            points.len()
        )));
    }

    Ok(Geometry::new(name, points))
}
