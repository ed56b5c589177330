//! Plain-text terminal output.
//!
//! Formatting lives here so the numerical code never builds strings.

use crate::report::{CalcRow, FitRow};

/// `filename | Omega | threshold` table for `calc`.
pub fn format_calc_table(rows: &[CalcRow]) -> String {
    let width = rows
        .iter()
        .map(|r| r.file.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(8, 48);

    let mut out = String::new();
    out.push_str(&format!("{:<width$} | {:>12} | {:>12}\n", "filename", "Omega", "threshold"));
    out.push_str(&format!("{:-<width$}-+-{:-<12}-+-{:-<12}\n", "", "", ""));
    for r in rows {
        let threshold = match (r.threshold, &r.error) {
            (Some(x), _) => format!("{x:>12.6}"),
            (None, Some(_)) => format!("{:>12}", "failed"),
            (None, None) => format!("{:>12}", "-"),
        };
        out.push_str(
            format!("{:<width$} | {:>12} | {threshold}", truncate(&r.file, width), fmt_sci(r.omega)).trim_end(),
        );
        out.push('\n');
    }
    for r in rows {
        if let Some(err) = &r.error {
            out.push_str(&format!("  ({}) {err}\n", r.file));
        }
    }
    out
}

/// One block per fitting strategy, with `±` columns when uncertainty was requested.
pub fn format_fit_table(rows: &[FitRow]) -> String {
    let mut out = String::new();
    out.push_str("Fitted coefficients:\n");
    for r in rows {
        out.push_str(&format!("- {}\n", r.method.display_name()));
        if let Some(err) = &r.error {
            out.push_str(&format!("    failed: {err}\n"));
            continue;
        }
        let (da, dea) = match &r.uncertainty {
            Some(u) => (u.a, u.ea),
            None => (None, None),
        };
        out.push_str(&format!("    A  = {}{}\n", fmt_opt(r.result.a), fmt_err(r.uncertainty.is_some(), da)));
        out.push_str(&format!("    Ea = {}{}\n", fmt_opt(r.result.ea), fmt_err(r.uncertainty.is_some(), dea)));
    }
    out
}

/// `T | k(T)` table for `rate`.
pub fn format_rates(temperatures: &[f64], rates: &[f64]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>12} | {:>14}\n", "T [K]", "k [1/s]"));
    out.push_str(&format!("{:-<12}-+-{:-<14}\n", "", ""));
    for (t, k) in temperatures.iter().zip(rates) {
        out.push_str(&format!("{t:>12.3} | {:>14}\n", fmt_sci(*k)));
    }
    out
}

pub fn format_critical_temperature(tcrit: f64) -> String {
    format!("Tcrit = {tcrit:.6} K ({:.6} C)\n", tcrit - 273.15)
}

fn fmt_sci(v: f64) -> String {
    if v.is_finite() { format!("{v:.6e}") } else { format!("{v}") }
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(fmt_sci).unwrap_or_else(|| "unset".to_string())
}

fn fmt_err(requested: bool, v: Option<f64>) -> String {
    match (requested, v) {
        (false, _) => String::new(),
        (true, Some(v)) => format!(" ± {}", fmt_sci(v)),
        (true, None) => " ± unset".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let skip = s.chars().count() + 1 - max;
    let mut out = String::from("…");
    out.extend(s.chars().skip(skip));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitMethod, FitResult};
    use crate::error::KineticsError;

    #[test]
    fn calc_table_lists_rows_and_failures() {
        let rows = vec![
            CalcRow {
                file: "a.txt".into(),
                omega: 0.5,
                threshold: Some(1.25),
                error: None,
            },
            CalcRow {
                file: "flat.txt".into(),
                omega: 0.0,
                threshold: None,
                error: Some("unable to bracket".into()),
            },
        ];
        let text = format_calc_table(&rows);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("filename"));
        assert!(lines[2].contains("5.000000e-1") && lines[2].contains("1.250000"));
        assert!(lines[3].contains("failed"));
        assert!(text.contains("(flat.txt) unable to bracket"));
    }

    #[test]
    fn fit_table_shows_uncertainty_only_when_requested() {
        let rows = vec![
            FitRow::success(FitMethod::Grid, FitResult::new(3.1e99, 6.28e5), None),
            FitRow::success(
                FitMethod::Variance,
                FitResult::new(3.1e99, 6.28e5),
                Some(FitResult { a: None, ea: Some(1.0e3) }),
            ),
            FitRow::failure(FitMethod::EffectiveExposure, &KineticsError::IllConditioned("rank 1".into())),
        ];
        let text = format_fit_table(&rows);
        assert!(text.contains("Scaling factor grid"));
        assert!(text.contains("Ea = 6.280000e5 ± 1.000000e3"));
        assert!(text.contains("A  = 3.100000e99 ± unset"));
        assert!(text.contains("failed: ill-conditioned regression: rank 1"));
        assert_eq!(text.matches('±').count(), 2);
    }

    #[test]
    fn long_names_keep_their_tail() {
        let name = format!("{}/run.txt", "d".repeat(60));
        let short = truncate(&name, 20);
        assert_eq!(short.chars().count(), 20);
        assert!(short.ends_with("run.txt"));
    }

    #[test]
    fn critical_temperature_line() {
        assert_eq!(format_critical_temperature(323.15), "Tcrit = 323.150000 K (50.000000 C)\n");
    }
}
