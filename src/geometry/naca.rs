//! NACA 4-digit sections.

use std::f64::consts::PI;

use super::Geometry;

/// Camber, camber position and thickness of a 4-digit section, as fractions
/// of chord.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NacaCode {
    pub max_camber: f64,
    pub camber_position: f64,
    pub thickness: f64,
}

fn compact(name: &str) -> String {
    name.chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '-' && *ch != '_')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Whether the name is explicitly spelled as a NACA section.
pub fn has_prefix(name: &str) -> bool {
    compact(name).starts_with("naca")
}

/// Recognises `naca4412`, `NACA 4412` and `4412`-style codes.
pub fn parse_code(name: &str) -> Option<NacaCode> {
    let compact = compact(name);
    let digits = compact.strip_prefix("naca").unwrap_or(&compact);

    if digits.len() != 4 || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    let digit = |index: usize| f64::from(digits.as_bytes()[index] - b'0');
    let thickness = (digit(2) * 10.0 + digit(3)) / 100.0;
    if thickness <= 0.0 {
        return None;
    }

    Some(NacaCode {
        max_camber: digit(0) / 100.0,
        camber_position: digit(1) / 10.0,
        thickness,
    })
}

/// Generates the section with a closed trailing edge and cosine-spaced
/// stations, `points_per_side` per surface.
pub fn generate(name: &str, code: NacaCode, points_per_side: usize) -> Geometry {
    let count = points_per_side.max(2);
    let NacaCode {
        max_camber: m,
        camber_position: p,
        thickness: t,
    } = code;

    let surface = |x: f64| -> ((f64, f64), (f64, f64)) {
        let half_thickness = 5.0
            * t
            * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x.powi(2) + 0.2843 * x.powi(3)
                - 0.1036 * x.powi(4));

        let (camber, slope) = if m == 0.0 || p == 0.0 {
            (0.0, 0.0)
        } else if x < p {
            (
                m / (p * p) * (2.0 * p * x - x * x),
                2.0 * m / (p * p) * (p - x),
            )
        } else {
            (
                m / ((1.0 - p) * (1.0 - p)) * (1.0 - 2.0 * p + 2.0 * p * x - x * x),
                2.0 * m / ((1.0 - p) * (1.0 - p)) * (p - x),
            )
        };

        let theta = slope.atan();
        let upper = (
            x - half_thickness * theta.sin(),
            camber + half_thickness * theta.cos(),
        );
        let lower = (
            x + half_thickness * theta.sin(),
            camber - half_thickness * theta.cos(),
        );
        (upper, lower)
    };

    let stations: Vec<f64> = (0..count)
        .map(|index| 0.5 * (1.0 - (PI * index as f64 / (count - 1) as f64).cos()))
        .collect();

    let mut points = Vec::with_capacity(2 * count - 1);
    points.extend(stations.iter().rev().map(|x| surface(*x).0));
    points.extend(stations.iter().skip(1).map(|x| surface(*x).1));

    Geometry::new(name, points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_spellings() {
        let code = parse_code("naca4412").unwrap();
        assert!((code.max_camber - 0.04).abs() < 1e-12);
        assert!((code.camber_position - 0.4).abs() < 1e-12);
        assert!((code.thickness - 0.12).abs() < 1e-12);

        assert_eq!(parse_code("NACA 6409"), parse_code("naca6409"));
        assert_eq!(parse_code("0012"), parse_code("NACA-0012"));
    }

    #[test]
    fn rejects_other_names() {
        assert!(parse_code("naca23012").is_none());
        assert!(parse_code("s1223").is_none());
        assert!(parse_code("naca44a2").is_none());
        assert!(parse_code("naca0000").is_none());
    }

    #[test]
    fn symmetric_section_is_mirrored() {
        let geometry = generate("naca0012", parse_code("naca0012").unwrap(), 50);
        assert_eq!(geometry.points.len(), 99);

        let last = geometry.points.len() - 1;
        for index in 0..50 {
            let (xu, yu) = geometry.points[index];
            let (xl, yl) = geometry.points[last - index];
            assert!((xu - xl).abs() < 1e-12);
            assert!((yu + yl).abs() < 1e-12);
        }
    }

    #[test]
    fn thickness_peaks_near_thirty_percent_chord() {
        let geometry = generate("naca0012", parse_code("naca0012").unwrap(), 200);
        let (x, y) = geometry
            .points
            .iter()
            .copied()
            .max_by(|lhs, rhs| lhs.1.total_cmp(&rhs.1))
            .unwrap();
        assert!((x - 0.3).abs() < 0.02, "x = {x}");
        assert!((y - 0.06).abs() < 1e-3, "y = {y}");
    }
}
