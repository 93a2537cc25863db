//! Reading XFoil polar accumulation files.

use std::collections::HashMap;

use crate::error::{FoilError, Result, SolverFailure};
use crate::model::{AirfoilId, AirfoilPolar, Coefficient};

/// XFoil prints alpha with three decimals.
const ALPHA_TOLERANCE: f64 = 5e-4;

/// Parses a polar file and picks one row per requested alpha.
///
/// Columns are located by header name, so builds that add or reorder
/// columns still read correctly. `Cpmin` is only present when the polar was
/// accumulated with `CINC`; without it the column is filled with NaN. Any
/// requested alpha without a row is reported as not converged.
pub fn parse(airfoil: &AirfoilId, text: &str, alphas: &[f64]) -> Result<AirfoilPolar> {
    let output_error = |reason: String| FoilError::Solver {
        airfoil: airfoil.to_string(),
        failure: SolverFailure::Output(reason),
    };

    let mut lines = text.lines();
    let header: Vec<&str> = lines
        .by_ref()
        .map(|line| line.split_whitespace().collect::<Vec<_>>())
        .find(|tokens| tokens.first() == Some(&"alpha"))
        .ok_or_else(|| output_error("polar file has no column header".into()))?;
    let columns: HashMap<&str, usize> = header
        .iter()
        .enumerate()
        .map(|(index, name)| (*name, index))
        .collect();

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || (trimmed.starts_with('-') && trimmed.contains("---")) {
            continue;
        }
        let values: std::result::Result<Vec<f64>, _> =
            trimmed.split_whitespace().map(str::parse::<f64>).collect();
        match values {
            Ok(values) if values.len() >= header.len() => rows.push(values),
            _ => {
                return Err(output_error(format!("malformed polar row '{trimmed}'")));
            }
        }
    }

    let alpha_column = columns["alpha"];
    let mut missing = Vec::new();
    let mut picked: Vec<&Vec<f64>> = Vec::with_capacity(alphas.len());
    for alpha in alphas {
        match rows
            .iter()
            .rev()
            .find(|row| (row[alpha_column] - alpha).abs() < ALPHA_TOLERANCE)
        {
            Some(row) => picked.push(row),
            None => missing.push(*alpha),
        }
    }
    if !missing.is_empty() {
        return Err(FoilError::Solver {
            airfoil: airfoil.to_string(),
            failure: SolverFailure::NotConverged { alphas: missing },
        });
    }

    let mut extracted: [Vec<f64>; 7] = Default::default();
    for (slot, coefficient) in extracted.iter_mut().zip(Coefficient::ALL) {
        *slot = match columns.get(coefficient.label()) {
            Some(index) => picked.iter().map(|row| row[*index]).collect(),
            None if coefficient == Coefficient::MinPressure => vec![f64::NAN; picked.len()],
            None => {
                return Err(output_error(format!(
                    "polar file has no {coefficient} column"
                )));
            }
        };
    }

    AirfoilPolar::new(airfoil.clone(), alphas.to_vec(), extracted)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLAR: &str = "
       XFOIL         Version 6.99

 Calculated polar for: NACA 4412

 1 1 Reynolds number fixed          Mach number fixed

 xtrf =   1.000 (top)        1.000 (bottom)
 Mach =   0.000     Re =     0.500 e 6     Ncrit =   9.000

   alpha    CL        CD       CDp       CM     Top_Xtr  Bot_Xtr   Cpmin
  ------ -------- --------- --------- -------- -------- --------  --------
  -1.000   0.3512   0.00645   0.00173  -0.1021   0.7012   0.9321  -0.6121
   0.000   0.4611   0.00661   0.00186  -0.1030   0.6700   1.0000  -0.7013
   1.000   0.5702   0.00680   0.00201  -0.1038   0.6341   1.0000  -0.8120
";

    #[test]
    fn picks_rows_in_requested_order() {
        let polar = parse(&AirfoilId::from("naca4412"), POLAR, &[1.0, -1.0]).unwrap();
        assert_eq!(polar.alphas(), &[1.0, -1.0]);
        assert_eq!(polar.column(Coefficient::Lift), &[0.5702, 0.3512]);
        assert_eq!(polar.column(Coefficient::MinPressure), &[-0.8120, -0.6121]);
        assert_eq!(polar.column(Coefficient::BottomTransition), &[1.0, 0.9321]);
    }

    #[test]
    fn reports_unconverged_alphas() {
        let error = parse(&AirfoilId::from("naca4412"), POLAR, &[0.0, 2.0, 3.5]).unwrap_err();
        match error {
            FoilError::Solver {
                failure: SolverFailure::NotConverged { alphas },
                ..
            } => assert_eq!(alphas, vec![2.0, 3.5]),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_cpmin_column_is_filled_with_nan() {
        let text = "   alpha    CL        CD       CDp       CM     Top_Xtr  Bot_Xtr\n\
                    ------ -------- --------- --------- -------- -------- --------\n\
                    0.000   0.4611   0.00661   0.00186  -0.1030   0.6700   1.0000\n";
        let polar = parse(&AirfoilId::from("naca4412"), text, &[0.0]).unwrap();
        assert!(polar.column(Coefficient::MinPressure)[0].is_nan());
        assert_eq!(polar.column(Coefficient::Drag), &[0.00661]);
    }

    #[test]
    fn missing_header_is_an_output_error() {
        let error = parse(&AirfoilId::from("naca4412"), "nothing here", &[0.0]).unwrap_err();
        assert!(matches!(
            error,
            FoilError::Solver {
                failure: SolverFailure::Output(_),
                ..
            }
        ));
    }
}
