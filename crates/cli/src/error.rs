//! CLI failures and their process exit codes.
//!
//! - 0:  success
//! - 2:  argument parse error (clap, including a malformed `--pointer`)
//! - 10: the scene rejected its name, size or parameters
//! - 11: the output image could not be produced
//! - 12: bad `--params` JSON or playback settings
//! - 13: JSON report could not be encoded

use contour_field_core::FieldError;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Scene(#[from] FieldError),

    #[error("could not write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },

    #[error("playback ended without a drawing surface")]
    NoSurface,

    #[error("invalid --params JSON: {0}")]
    Params(serde_json::Error),

    #[error("--fps must be a positive number, got {0}")]
    FrameRate(f64),

    #[error("could not encode report: {0}")]
    Report(#[from] serde_json::Error),
}

impl CliError {
    /// Wraps a snapshot failure for `path`.
    pub fn write(path: &Path, err: FieldError) -> Self {
        let reason = match err {
            FieldError::Io(msg) => msg,
            other => other.to_string(),
        };
        CliError::Write {
            path: path.to_path_buf(),
            reason,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Scene(_) => 10,
            CliError::Write { .. } | CliError::NoSurface => 11,
            CliError::Params(_) | CliError::FrameRate(_) => 12,
            CliError::Report(_) => 13,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_convert_to_scene_failures() {
        let err: CliError = FieldError::UnknownScene("dunes".into()).into();
        assert_eq!(err.exit_code(), 10);
        assert_eq!(err.to_string(), "unknown scene: dunes");
    }

    #[test]
    fn write_failure_names_the_path_without_io_prefix() {
        let err = CliError::write(Path::new("out/frame.png"), FieldError::Io("disk full".into()));
        assert_eq!(err.exit_code(), 11);
        assert_eq!(err.to_string(), "could not write out/frame.png: disk full");
    }

    #[test]
    fn params_and_playback_errors_share_the_input_code() {
        let json = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let params = CliError::Params(json);
        assert_eq!(params.exit_code(), 12);
        assert!(params.to_string().starts_with("invalid --params JSON"));
        assert_eq!(CliError::FrameRate(0.0).exit_code(), 12);
        assert_eq!(CliError::NoSurface.exit_code(), 11);
    }
}
