// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Rename planning
//!
//! A plan lists every copy that a run will perform, computed up front so
//! that all naming rules are checked before the first file is written.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::naming::{angle_labels, batch_group, output_filename, DateCode, RegionCode};
use crate::pilot::{split_batches, validate_batches, PilotMatcher};
use crate::scan::{list_images, sample_folders, SampleFolder};
use crate::{AppConfig, RenameError, Result};

/// Renaming mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// One 4-digit sample folder per group
    Subfolder,
    /// One flat folder split at pilot images
    SingleFolder,
}

impl std::str::FromStr for Mode {
    type Err = RenameError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "subfolder" => Ok(Mode::Subfolder),
            "single_folder" => Ok(Mode::SingleFolder),
            other => Err(RenameError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Subfolder => f.write_str("subfolder"),
            Mode::SingleFolder => f.write_str("single_folder"),
        }
    }
}

/// What a copy operation does with the name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CopyKind {
    /// Renamed into the region/date/group/angle scheme
    Renamed { group: String, angle: char },
    /// Pilot image, copied under its own name
    Pilot { batch_id: String },
}

/// One planned copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyOp {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub kind: CopyKind,
}

impl CopyOp {
    pub fn source_name(&self) -> String {
        file_name_lossy(&self.source)
    }

    pub fn destination_name(&self) -> String {
        file_name_lossy(&self.destination)
    }
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Complete plan for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    pub mode: Mode,
    pub output_dir: PathBuf,
    pub ops: Vec<CopyOp>,
    /// Non-fatal findings (skipped folders, extra or orphan images)
    pub warnings: Vec<String>,
}

impl RenamePlan {
    fn new(mode: Mode, output_dir: PathBuf) -> Self {
        Self {
            mode,
            output_dir,
            ops: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    fn push(&mut self, source: PathBuf, name: String, kind: CopyKind) {
        let destination = self.output_dir.join(name);
        self.ops.push(CopyOp { source, destination, kind });
    }

    /// Reject the plan when two sources would land on the same file
    fn check_unique(&self) -> Result<()> {
        let mut seen: HashMap<&Path, &Path> = HashMap::new();
        for op in &self.ops {
            if let Some(first) = seen.insert(op.destination.as_path(), op.source.as_path()) {
                return Err(RenameError::OutputCollision {
                    name: op.destination_name(),
                    first: first.to_path_buf(),
                    second: op.source.clone(),
                });
            }
        }
        Ok(())
    }

    /// Number of ops that rename (pilots excluded)
    pub fn renamed_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op.kind, CopyKind::Renamed { .. }))
            .count()
    }
}

/// Plan subfolder mode: each 4-digit folder below `work_dir` is one sample
pub fn plan_subfolder(
    work_dir: &Path,
    region: &RegionCode,
    date: &DateCode,
    config: &AppConfig,
) -> Result<RenamePlan> {
    let labels = angle_labels(config.subfolder_angles)?;
    let output_dir = work_dir.join(&config.renamed_folder);
    let mut plan = RenamePlan::new(Mode::Subfolder, output_dir);

    for folder in sample_folders(work_dir, &plan.output_dir)? {
        let (path, number) = match folder {
            SampleFolder::Sample { path, number } => (path, number),
            SampleFolder::Ignored { path, name } => {
                plan.warn(format!(
                    "Skipping {:?}: folder name '{}' is not a 4-digit sample number",
                    path, name
                ));
                continue;
            }
            SampleFolder::Unreadable { path, message } => {
                plan.warn(format!("Skipping {:?}: cannot be read ({})", path, message));
                continue;
            }
        };

        let Some(images) = readable_images(&mut plan, &path, config) else {
            continue;
        };

        debug!("Sample folder {:?}: {} image(s)", path, images.len());
        if images.len() > labels.len() {
            plan.warn(format!(
                "{:?} holds {} images; only the first {} get an angle letter: {}",
                path,
                images.len(),
                labels.len(),
                images[labels.len()..].join(", ")
            ));
        }

        for (name, &angle) in images.iter().zip(&labels) {
            let new_name = output_filename(region, date, &number, angle, name);
            plan.push(
                path.join(name),
                new_name,
                CopyKind::Renamed { group: number.clone(), angle },
            );
        }
    }

    plan.check_unique()?;
    info!("Planned {} copies from {:?}", plan.ops.len(), work_dir);
    Ok(plan)
}

/// Images of one sample folder; `None` (with a warning) when there are none
/// or the folder cannot be listed
fn readable_images(plan: &mut RenamePlan, path: &Path, config: &AppConfig) -> Option<Vec<String>> {
    match list_images(path, &config.image_extensions) {
        Ok(images) if images.is_empty() => {
            plan.warn(format!("No supported images in {:?}, skipping", path));
            None
        }
        Ok(images) => Some(images),
        Err(e) => {
            plan.warn(format!("Skipping {:?}: cannot be read ({})", path, e));
            None
        }
    }
}

/// Plan single_folder mode: split `work_dir/image_folder` at pilot images
pub fn plan_single_folder(
    work_dir: &Path,
    image_folder: &str,
    region: &RegionCode,
    date: &DateCode,
    angle_num: usize,
    config: &AppConfig,
) -> Result<RenamePlan> {
    let labels = angle_labels(angle_num)?;
    let source_dir = work_dir.join(image_folder);
    if !source_dir.is_dir() {
        return Err(RenameError::MissingImageFolder(source_dir));
    }

    let output_dir = work_dir.join(&config.renamed_folder);
    if same_directory(&source_dir, &output_dir) {
        return Err(RenameError::SourceIsOutput(source_dir));
    }
    let mut plan = RenamePlan::new(Mode::SingleFolder, output_dir);

    let files = list_images(&source_dir, &config.image_extensions)?;
    if files.is_empty() {
        plan.warn(format!("No supported images found in {:?}", source_dir));
        return Ok(plan);
    }

    let matcher = PilotMatcher::new(&config.image_extensions)?;
    let split = split_batches(&files, &matcher);
    let per_batch = validate_batches(&split.batches, angle_num, &source_dir)?;

    if !split.orphans.is_empty() {
        plan.warn(format!(
            "{} image(s) sort before the first pilot and are not copied: {}",
            split.orphans.len(),
            split.orphans.join(", ")
        ));
    }
    if per_batch == 0 {
        plan.warn("Pilot images found, but no other images between them".to_string());
    }

    info!(
        "Found {} batch(es) of {} image(s) each, angle_num={}",
        split.batches.len(),
        per_batch,
        angle_num
    );

    for batch in &split.batches {
        plan.push(
            source_dir.join(&batch.pilot),
            batch.pilot.clone(),
            CopyKind::Pilot { batch_id: batch.batch_id.clone() },
        );

        for (j, name) in batch.members.iter().enumerate() {
            let group = batch_group(&batch.batch_id, j / angle_num + 1);
            let angle = labels[j % angle_num];
            let new_name = output_filename(region, date, &group, angle, name);
            plan.push(source_dir.join(name), new_name, CopyKind::Renamed { group, angle });
        }
    }

    plan.check_unique()?;
    Ok(plan)
}

/// True when both paths exist and resolve to one directory
fn same_directory(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
