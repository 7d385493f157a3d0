// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Directory enumeration for both renaming modes

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::Result;

/// Check a filename against the configured image extensions (case-insensitive)
pub fn is_supported_image(filename: &str, extensions: &[String]) -> bool {
    let lower = filename.to_lowercase();
    extensions.iter().any(|ext| lower.ends_with(&ext.to_lowercase()))
}

/// Image filenames directly inside `dir`, sorted by name
pub fn list_images(dir: &Path, extensions: &[String]) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        // follows symlinks; a link to an image counts as that image
        if !entry.path().is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) if is_supported_image(&name, extensions) => names.push(name),
            Ok(_) => {}
            Err(raw) => warn!("Skipping non UTF-8 filename {:?} in {:?}", raw, dir),
        }
    }

    names.sort();
    Ok(names)
}

/// A directory below the working directory, classified by its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleFolder {
    /// Name is a 4-digit sample number
    Sample { path: PathBuf, number: String },
    /// Anything else; kept so the caller can report it
    Ignored { path: PathBuf, name: String },
    /// Could not be read; the rest of the walk goes on
    Unreadable { path: PathBuf, message: String },
}

/// True for exactly four ASCII digits
pub fn is_sample_number(name: &str) -> bool {
    name.len() == 4 && name.bytes().all(|b| b.is_ascii_digit())
}

/// Every directory below `base` at any depth, sorted by path.
///
/// `base` itself and the output directory (with its contents) are left out.
/// Symlinked folders are followed. Only an unreadable `base` is an error;
/// anything below it that cannot be read comes back as
/// [`SampleFolder::Unreadable`].
pub fn sample_folders(base: &Path, output_dir: &Path) -> Result<Vec<SampleFolder>> {
    let mut folders = Vec::new();

    let walker = WalkDir::new(base)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.path() != output_dir);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"))
                    .into());
            }
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| base.to_path_buf());
                warn!("Cannot read {:?}: {}", path, e);
                folders.push(SampleFolder::Unreadable { path, message: e.to_string() });
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path().to_path_buf();
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_sample_number(&name) {
            folders.push(SampleFolder::Sample { path, number: name });
        } else {
            debug!("Not a sample folder: {:?}", path);
            folders.push(SampleFolder::Ignored { path, name });
        }
    }

    Ok(folders)
}
