// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Plan execution: copy every planned file into the output folder

use chrono::{DateTime, Utc};
use filetime::FileTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::plan::{CopyKind, CopyOp, RenamePlan};
use crate::{RenameError, Result};

/// Options that change how a plan is executed
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CopyOptions {
    /// Log what would be copied without touching the filesystem
    #[serde(default)]
    pub dry_run: bool,
    /// Keep destinations that already exist instead of overwriting them
    #[serde(default)]
    pub no_clobber: bool,
}

/// Outcome of one planned copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CopyStatus {
    Copied,
    WouldCopy,
    Exists,
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyOutcome {
    pub op: CopyOp,
    pub status: CopyStatus,
}

impl CopyOutcome {
    /// One human readable log line
    pub fn log_line(&self) -> String {
        let label = match self.op.kind {
            CopyKind::Pilot { .. } => "pilot",
            CopyKind::Renamed { .. } => "rename",
        };
        match &self.status {
            CopyStatus::Copied => format!(
                "  {}: '{}' -> '{}'",
                label,
                self.op.source_name(),
                self.op.destination_name()
            ),
            CopyStatus::WouldCopy => format!(
                "  would {}: '{}' -> '{}'",
                label,
                self.op.source_name(),
                self.op.destination_name()
            ),
            CopyStatus::Exists => format!(
                "  kept existing '{}' (source '{}')",
                self.op.destination_name(),
                self.op.source_name()
            ),
            CopyStatus::Failed { message } => format!(
                "  error: copying {:?} to {:?} failed: {}",
                self.op.source, self.op.destination, message
            ),
        }
    }
}

/// Summary of an executed plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub renamed: usize,
    pub pilots_copied: usize,
    pub skipped: usize,
    pub failed: usize,
    pub warnings: Vec<String>,
    pub outcomes: Vec<CopyOutcome>,
}

impl RunReport {
    fn new(plan: &RenamePlan, options: CopyOptions) -> Self {
        Self {
            started_at: Utc::now(),
            output_dir: plan.output_dir.clone(),
            dry_run: options.dry_run,
            renamed: 0,
            pilots_copied: 0,
            skipped: 0,
            failed: 0,
            warnings: plan.warnings.clone(),
            outcomes: Vec::with_capacity(plan.ops.len()),
        }
    }

    fn record(&mut self, op: &CopyOp, status: CopyStatus) {
        match (&status, &op.kind) {
            (CopyStatus::Copied | CopyStatus::WouldCopy, CopyKind::Renamed { .. }) => {
                self.renamed += 1
            }
            (CopyStatus::Copied | CopyStatus::WouldCopy, CopyKind::Pilot { .. }) => {
                self.pilots_copied += 1
            }
            (CopyStatus::Exists, _) => self.skipped += 1,
            (CopyStatus::Failed { .. }, _) => self.failed += 1,
        }
        self.outcomes.push(CopyOutcome { op: op.clone(), status });
    }

    /// Closing summary line
    pub fn summary(&self) -> String {
        format!(
            "{}{} image(s) renamed, {} pilot(s) copied, {} kept, {} failed -> {:?}",
            if self.dry_run { "[DRY RUN] " } else { "" },
            self.renamed,
            self.pilots_copied,
            self.skipped,
            self.failed,
            self.output_dir
        )
    }

    /// Warnings, per-file lines and the summary, in order
    pub fn log_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> =
            self.warnings.iter().map(|w| format!("warning: {}", w)).collect();
        lines.extend(self.outcomes.iter().map(CopyOutcome::log_line));
        lines.push(self.summary());
        lines
    }
}

/// Execute a plan.
///
/// Only failing to create the output folder aborts the run; a file that
/// cannot be copied is logged and recorded as failed.
pub fn execute(plan: &RenamePlan, options: CopyOptions) -> Result<RunReport> {
    let mut report = RunReport::new(plan, options);

    if options.dry_run {
        info!("DRY RUN - nothing will be written to {:?}", plan.output_dir);
    } else {
        fs::create_dir_all(&plan.output_dir).map_err(|source| RenameError::OutputDir {
            path: plan.output_dir.clone(),
            source,
        })?;
        info!("Output folder: {:?}", plan.output_dir);
    }

    for op in &plan.ops {
        let status = if options.dry_run {
            CopyStatus::WouldCopy
        } else if options.no_clobber && op.destination.exists() {
            CopyStatus::Exists
        } else if is_same_file(&op.source, &op.destination) {
            CopyStatus::Failed {
                message: "source and destination are the same file".to_string(),
            }
        } else {
            match copy_preserving_times(&op.source, &op.destination) {
                Ok(()) => CopyStatus::Copied,
                Err(e) => CopyStatus::Failed { message: e.to_string() },
            }
        };

        match &status {
            CopyStatus::Failed { message } => {
                error!("Copy {:?} -> {:?} failed: {}", op.source, op.destination, message)
            }
            CopyStatus::Exists => info!("Kept existing {:?}", op.destination),
            _ => info!("'{}' -> '{}'", op.source_name(), op.destination_name()),
        }
        report.record(op, status);
    }

    info!("{}", report.summary());
    Ok(report)
}

/// `fs::copy` truncates the destination first, so copying a file onto
/// itself would empty it
fn is_same_file(source: &Path, destination: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(destination)) {
        (Ok(s), Ok(d)) => s == d,
        _ => false,
    }
}

/// Copy contents and permissions, then carry over access and modification times
fn copy_preserving_times(source: &Path, destination: &Path) -> std::io::Result<()> {
    fs::copy(source, destination)?;

    let meta = fs::metadata(source)?;
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);
    if let Err(e) = filetime::set_file_times(destination, atime, mtime) {
        debug!("Could not set times on {:?}: {}", destination, e);
    }
    Ok(())
}
