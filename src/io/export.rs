//! Write per-sample sequences and JSON summaries.
//!
//! Sequences use the same two-column layout the profile reader accepts, so a
//! written threshold profile can be fed straight back into `fit`.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::ThermalProfile;
use crate::error::AppError;

/// `path` with `.suffix` appended to the full file name (`run.txt` -> `run.txt.rate`).
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Write `time[i] value[i]` lines.
pub fn write_two_column(path: &Path, time: &[f64], values: &[f64]) -> Result<(), AppError> {
    if time.len() != values.len() {
        return Err(AppError::new(
            4,
            format!("Column lengths differ for '{}' ({} vs {})", path.display(), time.len(), values.len()),
        ));
    }
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    for (t, v) in time.iter().zip(values) {
        writeln!(out, "{t:e} {v:e}")
            .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
    }
    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
    tracing::debug!(path = %path.display(), rows = time.len(), "wrote two-column file");
    Ok(())
}

pub fn write_profile(path: &Path, profile: &ThermalProfile<f64>) -> Result<(), AppError> {
    write_two_column(path, profile.time(), profile.temperature())
}

/// Pretty-printed JSON summary.
pub fn write_json<S: Serialize>(path: &Path, value: &S) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create JSON export '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .map_err(|e| AppError::new(2, format!("Failed to write JSON export: {e}")))?;
    Ok(())
}
