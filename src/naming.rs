// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Region/date codes and the output naming scheme
//!
//! Every copied image is named `{REGION}-{DATE}-{GROUP}-{ANGLE}.{ext}`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::{RenameError, Result};

/// Two-letter region code, always upper case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionCode(String);

impl RegionCode {
    pub fn parse(raw: &str) -> Result<Self> {
        let code = raw.trim().to_ascii_uppercase();
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code))
        } else {
            Err(RenameError::InvalidRegion(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Six-digit date code such as `250701`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateCode(String);

impl DateCode {
    pub fn parse(raw: &str) -> Result<Self> {
        let code = raw.trim();
        if code.len() == 6 && code.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(code.to_string()))
        } else {
            Err(RenameError::InvalidDate(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RegionCode {
    type Error = RenameError;
    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl TryFrom<String> for DateCode {
    type Error = RenameError;
    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<RegionCode> for String {
    fn from(c: RegionCode) -> Self {
        c.0
    }
}

impl From<DateCode> for String {
    fn from(c: DateCode) -> Self {
        c.0
    }
}

/// Angle letters `A`, `B`, ... for a group of `count` images
pub fn angle_labels(count: usize) -> Result<Vec<char>> {
    if !(1..=26).contains(&count) {
        return Err(RenameError::InvalidAngleCount(count));
    }
    Ok(('A'..='Z').take(count).collect())
}

/// Lower-cased extension of `filename` including the dot, or empty
pub fn lowercase_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Build the output filename for one image.
///
/// `group` is the folder sample number in subfolder mode, or batch id plus
/// two-digit group index in single_folder mode. `source_name` only
/// contributes its extension.
pub fn output_filename(
    region: &RegionCode,
    date: &DateCode,
    group: &str,
    angle: char,
    source_name: &str,
) -> String {
    format!(
        "{}-{}-{}-{}{}",
        region,
        date,
        group,
        angle,
        lowercase_extension(source_name)
    )
}

/// Group label for the `index`-th (1-based) angle group of a batch
pub fn batch_group(batch_id: &str, index: usize) -> String {
    format!("{}{:02}", batch_id, index)
}

/// Working directory used when none is given: `./{REGION}{DATE}`
pub fn default_work_dir(region: &RegionCode, date: &DateCode) -> PathBuf {
    PathBuf::from(format!("./{}{}", region, date))
}

/// Guess region and date from a folder named like `HR250701` or `sy250623_extra`
pub fn detect_codes(dir: &Path) -> Option<(RegionCode, DateCode)> {
    static FOLDER_CODES: OnceLock<Regex> = OnceLock::new();
    let re = FOLDER_CODES.get_or_init(|| {
        Regex::new(r"^([A-Za-z]{2})(\d{6})").expect("folder code pattern is valid")
    });

    let name = dir.file_name()?.to_str()?;
    let caps = re.captures(name)?;
    let region = RegionCode::parse(&caps[1]).ok()?;
    let date = DateCode::parse(&caps[2]).ok()?;
    Some((region, date))
}
