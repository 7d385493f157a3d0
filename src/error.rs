// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for angle-renamer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for renamer operations
pub type Result<T> = std::result::Result<T, RenameError>;

/// Errors that stop a run before or while planning it.
///
/// Per-file copy failures are not errors at this level; they are recorded
/// in the [`RunReport`](crate::copy::RunReport) and the run continues.
#[derive(Error, Debug)]
pub enum RenameError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid region code '{0}': expected 2 letters (e.g. HR)")]
    InvalidRegion(String),

    #[error("Invalid date code '{0}': expected 6 digits (e.g. 250701)")]
    InvalidDate(String),

    #[error("Invalid angle count {0}: expected 1 to 26")]
    InvalidAngleCount(usize),

    #[error("Unknown mode '{0}': expected 'subfolder' or 'single_folder'")]
    InvalidMode(String),

    #[error("Working directory {0:?} does not exist")]
    MissingWorkDir(PathBuf),

    #[error("Image folder {0:?} does not exist")]
    MissingImageFolder(PathBuf),

    #[error("Image folder {0:?} is also the output folder; originals would be overwritten")]
    SourceIsOutput(PathBuf),

    #[error("Cannot create output directory {path:?}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No pilot image matching '...-XX.ext' found in {0:?}; cannot split into batches")]
    NoPilotImages(PathBuf),

    #[error("Batches have differing image counts: {}", format_counts(.0))]
    InconsistentBatches(Vec<(String, usize)>),

    #[error("Each batch holds {count} images, which is not a multiple of the angle count {angle_num}")]
    NotMultipleOfAngles { count: usize, angle_num: usize },

    #[error("Batch id '{batch_id}' is used by both '{first}' and '{second}'")]
    DuplicateBatchId {
        batch_id: String,
        first: String,
        second: String,
    },

    #[error("Output name '{name}' would be written by both {first:?} and {second:?}")]
    OutputCollision {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Server error: {0}")]
    Server(String),
}

fn format_counts(counts: &[(String, usize)]) -> String {
    counts
        .iter()
        .map(|(pilot, n)| format!("'{}' is followed by {} image(s)", pilot, n))
        .collect::<Vec<_>>()
        .join("; ")
}
