use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors produced by cmdtrail.
///
/// Per-source failures (missing file, command not installed, permission
/// denied) are deliberately absent: readers record them in a
/// [`crate::models::SourceReport`] and the run continues. Only the final
/// write and serve stages can fail the pipeline.
#[derive(Error, Debug)]
pub enum TrailError {
    /// An export artifact could not be written to disk.
    #[error("Failed to write export file {path}: {source}")]
    ExportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The export record could not be serialized.
    #[error("Failed to encode export record: {0}")]
    ExportEncode(#[from] serde_json::Error),

    /// The dashboard server could not bind its port.
    #[error("Dashboard failed to start on port {port}: {source}")]
    DashboardBind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the cmdtrail crates.
pub type Result<T> = std::result::Result<T, TrailError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_export_write() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = TrailError::ExportWrite {
            path: PathBuf::from("/out/command_usage.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to write export file"));
        assert!(msg.contains("/out/command_usage.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_display_dashboard_bind() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err = TrailError::DashboardBind {
            port: 8050,
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("8050"));
        assert!(msg.contains("address in use"));
    }

    #[test]
    fn test_error_display_config() {
        let err = TrailError::Config("top must be non-zero".to_string());
        assert_eq!(err.to_string(), "Configuration error: top must be non-zero");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: TrailError = io_err.into();
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: TrailError = json_err.into();
        assert!(err.to_string().contains("Failed to encode export record"));
    }
}
