//! Read/write chart configuration JSON.
//!
//! A chart config is the portable description of a figure:
//! - the date segments (label, legend, bounds, color)
//! - the style (size, title, footer, ticks)
//!
//! Missing fields fall back to the reference chart. The schema is defined by
//! `domain::ChartConfig`.

use std::fs::File;
use std::path::Path;

use crate::domain::ChartConfig;
use crate::error::AppError;
use crate::series::validate_segments;

/// Write a chart config JSON file.
pub fn write_chart_config(path: &Path, config: &ChartConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create config JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, config)
        .map_err(|e| AppError::new(2, format!("Failed to write config JSON: {e}")))?;

    Ok(())
}

/// Read and validate a chart config JSON file.
pub fn read_chart_config(path: &Path) -> Result<ChartConfig, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open config JSON '{}': {e}", path.display())))?;
    let config: ChartConfig =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid config JSON: {e}")))?;
    validate_segments(&config.segments)?;
    log::debug!("loaded {} segments from {}", config.segments.len(), path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        let config = ChartConfig::default();

        write_chart_config(&path, &config).unwrap();
        assert_eq!(read_chart_config(&path).unwrap(), config);
    }

    #[test]
    fn custom_segments_are_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"segments": [{{"label": "Crisis", "start": "2008-01-01", "end": "2010-01-01", "color": [200, 0, 0]}}]}}"#
        )
        .unwrap();

        let config = read_chart_config(file.path()).unwrap();
        assert_eq!(config.segments.len(), 1);
        assert_eq!(config.segments[0].legend_label(), "Crisis");
        assert_eq!(config.style, crate::domain::ChartStyle::default());
    }

    #[test]
    fn inverted_segment_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"segments": [{{"label": "x", "start": "2010-01-01", "end": "2009-01-01", "color": [0, 0, 0]}}]}}"#
        )
        .unwrap();

        let err = read_chart_config(file.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
