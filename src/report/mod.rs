//! Reporting: per-command result rows and their text/JSON renderings.

use serde::Serialize;

use crate::domain::{FitBounds, FitMethod, FitResult, Quadrature, RateParameters};
use crate::error::KineticsError;

pub mod format;

pub use format::*;

/// One `calc` output line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalcRow {
    pub file: String,
    pub omega: f64,
    /// Threshold scale factor; unset when the solve failed.
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalcSummary {
    pub parameters: RateParameters<f64>,
    pub quadrature: Quadrature,
    pub threshold_omega: f64,
    pub rows: Vec<CalcRow>,
}

/// Outcome of one fitting strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitRow {
    pub method: FitMethod,
    pub result: FitResult<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<FitResult<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FitRow {
    pub fn success(method: FitMethod, result: FitResult<f64>, uncertainty: Option<FitResult<f64>>) -> Self {
        Self {
            method,
            result,
            uncertainty,
            error: None,
        }
    }

    pub fn failure(method: FitMethod, err: &KineticsError) -> Self {
        Self {
            method,
            result: FitResult::default(),
            uncertainty: None,
            error: Some(err.to_string()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none() && self.result.is_complete()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FitSummary {
    pub profiles: Vec<String>,
    pub bounds: FitBounds<f64>,
    pub rows: Vec<FitRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_row_status() {
        let ok = FitRow::success(FitMethod::Grid, FitResult::new(1.0, 2.0), None);
        assert!(ok.succeeded());

        let unset = FitRow::success(FitMethod::Grid, FitResult::default(), None);
        assert!(!unset.succeeded());

        let failed = FitRow::failure(FitMethod::Variance, &KineticsError::Bracketing { iterations: 3 });
        assert!(!failed.succeeded());
        assert!(failed.error.unwrap().contains("bracket"));
    }

    #[test]
    fn rows_serialize_with_kebab_case_methods() {
        let row = FitRow::success(FitMethod::EffectiveExposure, FitResult::new(3.1e99, 6.28e5), None);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["method"], "effective-exposure");
        assert_eq!(json["result"]["ea"], 6.28e5);
        assert!(json.get("uncertainty").is_none());
        assert!(json.get("error").is_none());
    }
}
