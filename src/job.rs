// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! A validated rename request, shared by the CLI and the web form

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::copy::{execute, CopyOptions, RunReport};
use crate::naming::{angle_labels, default_work_dir, DateCode, RegionCode};
use crate::plan::{plan_single_folder, plan_subfolder, Mode, RenamePlan};
use crate::{AppConfig, RenameError, Result};

/// Raw request fields as typed by a user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobRequest {
    pub region: String,
    pub date: String,
    pub mode: String,
    #[serde(default)]
    pub source_dir: Option<PathBuf>,
    #[serde(default)]
    pub image_folder: Option<String>,
    #[serde(default)]
    pub angle_num: Option<usize>,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub no_clobber: bool,
}

/// Everything needed to run, already validated
#[derive(Debug, Clone)]
pub struct RenameJob {
    pub work_dir: PathBuf,
    pub region: RegionCode,
    pub date: DateCode,
    pub mode: Mode,
    pub image_folder: String,
    pub angle_num: usize,
    pub options: CopyOptions,
    pub config: AppConfig,
}

impl RenameJob {
    /// Validate a request; unset fields fall back to `config`
    pub fn from_request(request: JobRequest, config: &AppConfig) -> Result<Self> {
        let region = RegionCode::parse(&request.region)?;
        let date = DateCode::parse(&request.date)?;
        let mode: Mode = request.mode.trim().parse()?;

        let angle_num = request.angle_num.unwrap_or(config.angle_num);
        angle_labels(angle_num)?;

        let image_folder = request
            .image_folder
            .map(|f| f.trim().to_string())
            .unwrap_or_else(|| config.image_folder.clone());
        if mode == Mode::SingleFolder && image_folder.is_empty() {
            return Err(RenameError::Config(
                "single_folder mode needs an image folder name".to_string(),
            ));
        }

        let work_dir = match request.source_dir {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => default_work_dir(&region, &date),
        };

        Ok(Self {
            work_dir,
            region,
            date,
            mode,
            image_folder,
            angle_num,
            options: CopyOptions {
                dry_run: request.dry_run,
                no_clobber: request.no_clobber,
            },
            config: config.clone(),
        })
    }

    /// Build the copy plan without writing anything
    pub fn plan(&self) -> Result<RenamePlan> {
        if !self.work_dir.is_dir() {
            return Err(RenameError::MissingWorkDir(self.work_dir.clone()));
        }
        info!("Working directory: {:?} (mode: {})", self.work_dir, self.mode);

        match self.mode {
            Mode::Subfolder => {
                plan_subfolder(&self.work_dir, &self.region, &self.date, &self.config)
            }
            Mode::SingleFolder => plan_single_folder(
                &self.work_dir,
                &self.image_folder,
                &self.region,
                &self.date,
                self.angle_num,
                &self.config,
            ),
        }
    }

    /// Plan and execute
    pub fn run(&self) -> Result<RunReport> {
        let plan = self.plan()?;
        execute(&plan, self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn request(mode: &str) -> JobRequest {
        JobRequest {
            region: "hr".to_string(),
            date: "250701".to_string(),
            mode: mode.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_from_config() {
        let job = RenameJob::from_request(request("single_folder"), &AppConfig::default()).unwrap();
        assert_eq!(job.work_dir, PathBuf::from("./HR250701"));
        assert_eq!(job.image_folder, "phone_image");
        assert_eq!(job.angle_num, 4);
        assert_eq!(job.mode, Mode::SingleFolder);
    }

    #[test]
    fn test_invalid_fields_rejected() {
        let config = AppConfig::default();

        let mut bad = request("subfolder");
        bad.region = "H".to_string();
        assert!(matches!(
            RenameJob::from_request(bad, &config),
            Err(RenameError::InvalidRegion(_))
        ));

        let mut bad = request("subfolder");
        bad.angle_num = Some(30);
        assert!(matches!(
            RenameJob::from_request(bad, &config),
            Err(RenameError::InvalidAngleCount(30))
        ));

        let mut bad = request("single_folder");
        bad.image_folder = Some("  ".to_string());
        assert!(matches!(RenameJob::from_request(bad, &config), Err(RenameError::Config(_))));

        assert!(matches!(
            RenameJob::from_request(request("both"), &config),
            Err(RenameError::InvalidMode(_))
        ));
    }

    #[test]
    fn test_missing_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut req = request("subfolder");
        req.source_dir = Some(dir.path().join("absent"));
        let job = RenameJob::from_request(req, &AppConfig::default()).unwrap();
        assert!(matches!(job.run(), Err(RenameError::MissingWorkDir(_))));
    }

    #[test]
    fn test_subfolder_run_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let sample = dir.path().join("0007");
        fs::create_dir_all(&sample).unwrap();
        for name in ["1.jpg", "2.jpg", "3.jpg", "4.jpg"] {
            fs::write(sample.join(name), name).unwrap();
        }

        let mut req = request("subfolder");
        req.source_dir = Some(dir.path().to_path_buf());
        let report = RenameJob::from_request(req, &AppConfig::default())
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(report.renamed, 4);
        for (angle, src) in ['A', 'B', 'C', 'D'].iter().zip(["1.jpg", "2.jpg", "3.jpg", "4.jpg"]) {
            let out = dir.path().join("renamed").join(format!("HR-250701-0007-{}.jpg", angle));
            assert_eq!(fs::read_to_string(out).unwrap(), src);
        }

        // running again overwrites in place and does not pick up the output folder
        let mut req = request("subfolder");
        req.source_dir = Some(dir.path().to_path_buf());
        let again = RenameJob::from_request(req, &AppConfig::default()).unwrap().run().unwrap();
        assert_eq!(again.renamed, 4);
        assert_eq!(fs::read_dir(dir.path().join("renamed")).unwrap().count(), 4);
    }
}
