//! Export artifact writer.
//!
//! Writes the JSON record and the chart to fixed names under the output
//! directory, overwriting any previous run's artifacts without confirmation.
//! Write failures here are the only fatal errors in the pipeline besides
//! dashboard startup.

use std::path::{Path, PathBuf};

use tracing::info;
use trail_core::error::{Result, TrailError};
use trail_core::models::{ExportRecord, FrequencyTable};

use crate::chart::render_chart;

/// File name of the structured record artifact.
pub const RECORD_FILE: &str = "command_usage.json";
/// File name of the chart artifact.
pub const CHART_FILE: &str = "command_usage.svg";

/// Serialize the [`ExportRecord`] for `table` to `path` as pretty JSON.
///
/// The record contains no timestamps, so identical tables produce
/// byte-identical files.
pub fn write_record(table: &FrequencyTable, path: &Path) -> Result<()> {
    let record = ExportRecord::from_table(table);
    let json = serde_json::to_string_pretty(&record)?;
    std::fs::write(path, json).map_err(|source| TrailError::ExportWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Render the ranked bar chart for `table` to `path`.
pub fn write_chart(table: &FrequencyTable, top_n: usize, path: &Path) -> Result<()> {
    let svg = render_chart(&table.ranked(), top_n);
    std::fs::write(path, svg).map_err(|source| TrailError::ExportWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Write both export artifacts under `output_dir`, creating it if needed.
///
/// Returns the record and chart paths.
pub fn write_outputs(
    table: &FrequencyTable,
    output_dir: &Path,
    top_n: usize,
) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(output_dir).map_err(|source| TrailError::ExportWrite {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let record_path = output_dir.join(RECORD_FILE);
    let chart_path = output_dir.join(CHART_FILE);

    write_record(table, &record_path)?;
    write_chart(table, top_n, &chart_path)?;

    info!(
        "Exported {} commands to {} and {}",
        table.len(),
        record_path.display(),
        chart_path.display()
    );

    Ok((record_path, chart_path))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
