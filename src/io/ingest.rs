//! Profile file ingest.
//!
//! A profile file is plain text with one `time temperature` pair per line:
//!
//! - fields separated by whitespace and/or a comma
//! - blank lines and lines starting with `#` are skipped
//! - anything after the second field is ignored
//!
//! Malformed lines are reported with their 1-based line number (exit code 2).

use std::fs;
use std::path::Path;

use crate::domain::ThermalProfile;
use crate::error::AppError;

/// Parse profile text, adding `temperature_offset` to every temperature.
pub fn parse_profile(text: &str, temperature_offset: f64) -> Result<ThermalProfile<f64>, AppError> {
    let mut time = Vec::new();
    let mut temperature = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim().trim_start_matches('\u{feff}');
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty());
        let (Some(t), Some(temp)) = (fields.next(), fields.next()) else {
            return Err(AppError::new(
                2,
                format!("line {line}: expected 'time temperature', got '{trimmed}'"),
            ));
        };
        time.push(parse_field(t, "time", line)?);
        temperature.push(parse_field(temp, "temperature", line)? + temperature_offset);
    }

    ThermalProfile::new(time, temperature).map_err(|e| AppError::new(2, e.to_string()))
}

fn parse_field(field: &str, what: &str, line: usize) -> Result<f64, AppError> {
    let value: f64 = field
        .parse()
        .map_err(|_| AppError::new(2, format!("line {line}: invalid {what} '{field}'")))?;
    if !value.is_finite() {
        return Err(AppError::new(2, format!("line {line}: non-finite {what} '{field}'")));
    }
    Ok(value)
}

/// Load one profile file, naming the profile after the path.
pub fn read_profile(path: &Path, temperature_offset: f64) -> Result<ThermalProfile<f64>, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read profile '{}': {e}", path.display())))?;
    let profile = parse_profile(&text, temperature_offset)
        .map_err(|e| AppError::new(e.exit_code(), format!("{}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), samples = profile.len(), "loaded profile");
    Ok(profile.with_name(path.display().to_string()))
}

/// Load every file in `paths`, failing on the first unreadable one.
pub fn read_profiles<P: AsRef<Path>>(paths: &[P], temperature_offset: f64) -> Result<Vec<ThermalProfile<f64>>, AppError> {
    if paths.is_empty() {
        return Err(AppError::new(3, "No profile files given."));
    }
    paths
        .iter()
        .map(|p| read_profile(p.as_ref(), temperature_offset))
        .collect()
}
