//! Pivots per-airfoil polars into one ranked table per angle of attack.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::config::{SortDirection, SortKey};
use crate::error::{FoilError, Result};
use crate::io::excel_write;
use crate::model::{AirfoilId, Coefficient, SweepResults};

/// Header of every report sheet.
pub const REPORT_COLUMNS: [&str; 9] = [
    "Airfoil", "CL", "CD", "CDp", "CL/CD", "CM", "Cpmin", "Top_Xtr", "Bot_Xtr",
];

/// Excel refuses sheet names longer than this.
const MAX_SHEET_NAME: usize = 31;

/// One airfoil's coefficients at a single angle of attack.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub airfoil: String,
    pub lift: f64,
    pub drag: f64,
    pub pressure_drag: f64,
    /// `None` when the drag coefficient is zero or the quotient is not finite.
    pub lift_to_drag: Option<f64>,
    pub moment: f64,
    pub min_pressure: f64,
    pub top_transition: f64,
    pub bottom_transition: f64,
}

impl ReportRow {
    /// Derives the lift-to-drag ratio from the other coefficients.
    pub fn lift_to_drag(lift: f64, drag: f64) -> Option<f64> {
        if drag == 0.0 {
            return None;
        }
        let ratio = lift / drag;
        ratio.is_finite().then_some(ratio)
    }

    /// Numeric cells after the airfoil name, in [`REPORT_COLUMNS`] order.
    pub fn values(&self) -> [Option<f64>; 8] {
        let finite = |value: f64| value.is_finite().then_some(value);
        [
            finite(self.lift),
            finite(self.drag),
            finite(self.pressure_drag),
            self.lift_to_drag,
            finite(self.moment),
            finite(self.min_pressure),
            finite(self.top_transition),
            finite(self.bottom_transition),
        ]
    }

    /// Value the row is ranked by; `None` for missing or non-finite values.
    pub fn sort_value(&self, key: SortKey) -> Option<f64> {
        let value = match key {
            SortKey::Lift => self.lift,
            SortKey::LiftToDrag => return self.lift_to_drag,
            SortKey::Drag => self.drag,
            SortKey::PressureDrag => self.pressure_drag,
            SortKey::Moment => self.moment,
            SortKey::MinPressure => self.min_pressure,
        };
        value.is_finite().then_some(value)
    }
}

/// All airfoils at one angle of attack, ranked by the sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSheet {
    pub title: String,
    pub alpha: f64,
    pub rows: Vec<ReportRow>,
}

/// Label used for the sheet of `alpha`: the angle truncated towards zero.
pub fn sheet_title(alpha: f64) -> String {
    format!("Alpha(deg)={}", alpha.trunc() as i64)
}

/// Orders rows by `key` in the direction the sort policy prescribes. Rows
/// without a value go last whatever the direction; ties keep their input
/// order.
pub fn sort_rows(rows: &mut [ReportRow], key: SortKey) {
    let direction = key.direction();
    rows.sort_by(|lhs, rhs| match (lhs.sort_value(key), rhs.sort_value(key)) {
        (Some(lhs), Some(rhs)) => match direction {
            SortDirection::Ascending => lhs.total_cmp(&rhs),
            SortDirection::Descending => rhs.total_cmp(&lhs),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn check_shape(airfoils: &[AirfoilId], results: &SweepResults) -> Result<usize> {
    if results.is_empty() {
        return Err(FoilError::ShapeMismatch("there are no results to export".into()));
    }
    if airfoils.len() != results.len() {
        return Err(FoilError::ShapeMismatch(format!(
            "{} airfoils but {} result tables",
            airfoils.len(),
            results.len()
        )));
    }

    let alpha_count = results.polars[0].len();
    for (airfoil, polar) in airfoils.iter().zip(results.iter()) {
        if polar.airfoil() != airfoil {
            return Err(FoilError::ShapeMismatch(format!(
                "result for '{}' found where '{airfoil}' was expected",
                polar.airfoil()
            )));
        }
        if polar.len() != alpha_count {
            return Err(FoilError::ShapeMismatch(format!(
                "'{airfoil}' has {} angles of attack, expected {alpha_count}",
                polar.len()
            )));
        }
    }
    Ok(alpha_count)
}

/// Builds one sheet per angle of attack, in sweep order.
pub fn build_report(
    airfoils: &[AirfoilId],
    results: &SweepResults,
    sort_by: SortKey,
) -> Result<Vec<ReportSheet>> {
    let alpha_count = check_shape(airfoils, results)?;
    let alphas = results.polars[0].alphas();
    let mut titles = SheetNameRegistry::default();

    let sheets = (0..alpha_count)
        .map(|index| {
            let mut rows: Vec<ReportRow> = airfoils
                .iter()
                .zip(results.iter())
                .map(|(airfoil, polar)| {
                    let at = |coefficient: Coefficient| polar.column(coefficient)[index];
                    let lift = at(Coefficient::Lift);
                    let drag = at(Coefficient::Drag);
                    let lift_to_drag = ReportRow::lift_to_drag(lift, drag);
                    if lift_to_drag.is_none() {
                        warn!(%airfoil, alpha = alphas[index], drag, "lift-to-drag ratio undefined");
                    }

                    ReportRow {
                        airfoil: airfoil.to_string(),
                        lift,
                        drag,
                        pressure_drag: at(Coefficient::PressureDrag),
                        lift_to_drag,
                        moment: at(Coefficient::Moment),
                        min_pressure: at(Coefficient::MinPressure),
                        top_transition: at(Coefficient::TopTransition),
                        bottom_transition: at(Coefficient::BottomTransition),
                    }
                })
                .collect();
            sort_rows(&mut rows, sort_by);

            ReportSheet {
                title: titles.assign(&sheet_title(alphas[index])),
                alpha: alphas[index],
                rows,
            }
        })
        .collect();

    Ok(sheets)
}

/// Ranks the sweep results and writes them to `destination`, one sheet per
/// angle of attack.
#[instrument(
    level = "info",
    skip_all,
    fields(destination = %destination.display(), sort_by = %sort_by)
)]
pub fn export(
    airfoils: &[AirfoilId],
    results: &SweepResults,
    sort_by: SortKey,
    destination: &Path,
) -> Result<()> {
    let sheets = build_report(airfoils, results, sort_by)?;
    debug!(sheet_count = sheets.len(), "report constructed");
    excel_write::write_report(destination, &sheets)?;
    info!(sheets = sheets.len(), rows = airfoils.len(), "report written");
    Ok(())
}

/// Hands out unique, Excel-safe sheet names.
#[derive(Debug, Default)]
pub struct SheetNameRegistry {
    used: HashSet<String>,
}

impl SheetNameRegistry {
    pub fn assign(&mut self, raw: &str) -> String {
        let base = sanitize_sheet_name(raw);
        if self.used.insert(base.clone()) {
            return base;
        }

        let mut counter = 1;
        loop {
            let suffix = format!("_{counter}");
            let mut prefix = base.clone();
            prefix.truncate(MAX_SHEET_NAME - suffix.len());
            let candidate = format!("{prefix}{suffix}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

fn sanitize_sheet_name(raw: &str) -> String {
    let invalid = [':', '\\', '/', '?', '*', '[', ']', '\'', '"'];
    let mut sanitized: String = raw
        .chars()
        .map(|ch| {
            if invalid.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect::<String>()
        .trim()
        .to_string();

    if sanitized.is_empty() {
        sanitized = "Sheet".to_string();
    }
    sanitized.truncate(MAX_SHEET_NAME);
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(airfoil: &str, lift: f64, drag: f64) -> ReportRow {
        ReportRow {
            airfoil: airfoil.to_string(),
            lift,
            drag,
            pressure_drag: drag / 2.0,
            lift_to_drag: ReportRow::lift_to_drag(lift, drag),
            moment: -0.1,
            min_pressure: -1.0,
            top_transition: 0.5,
            bottom_transition: 1.0,
        }
    }

    #[test]
    fn titles_truncate_towards_zero() {
        assert_eq!(sheet_title(-2.0), "Alpha(deg)=-2");
        assert_eq!(sheet_title(-4.75), "Alpha(deg)=-4");
        assert_eq!(sheet_title(-0.5), "Alpha(deg)=0");
        assert_eq!(sheet_title(12.9), "Alpha(deg)=12");
    }

    #[test]
    fn duplicate_titles_receive_suffixes() {
        let mut registry = SheetNameRegistry::default();
        assert_eq!(registry.assign("Alpha(deg)=1"), "Alpha(deg)=1");
        assert_eq!(registry.assign("Alpha(deg)=1"), "Alpha(deg)=1_1");
        assert_eq!(registry.assign("Alpha(deg)=1"), "Alpha(deg)=1_2");
        assert_eq!(registry.assign("a/b"), "a_b");
    }

    #[test]
    fn zero_drag_yields_no_ratio() {
        assert_eq!(ReportRow::lift_to_drag(0.5, 0.0), None);
        assert_eq!(ReportRow::lift_to_drag(0.5, 0.01), Some(0.5 / 0.01));
    }

    #[test]
    fn rows_without_a_ratio_sort_last_in_both_directions() {
        let mut rows = vec![row("a", 0.2, 0.0), row("b", 0.5, 0.01), row("c", 0.1, 0.01)];
        sort_rows(&mut rows, SortKey::LiftToDrag);
        let order: Vec<_> = rows.iter().map(|row| row.airfoil.as_str()).collect();
        assert_eq!(order, ["b", "c", "a"]);

        let mut rows = vec![row("a", f64::NAN, 0.02), row("b", 0.5, 0.03), row("c", 0.1, 0.01)];
        sort_rows(&mut rows, SortKey::Lift);
        let order: Vec<_> = rows.iter().map(|row| row.airfoil.as_str()).collect();
        assert_eq!(order, ["b", "c", "a"]);
    }

    #[test]
    fn ascending_keys_put_smallest_first() {
        let mut rows = vec![row("a", 0.2, 0.03), row("b", 0.5, 0.01), row("c", 0.1, 0.02)];
        sort_rows(&mut rows, SortKey::Drag);
        let order: Vec<_> = rows.iter().map(|row| row.airfoil.as_str()).collect();
        assert_eq!(order, ["b", "c", "a"]);
    }
}
