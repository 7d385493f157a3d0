// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Pilot image detection and batch splitting for single_folder mode
//!
//! A pilot image is named `<anything>-XX.<ext>` where `XX` is two letters or
//! digits. Each pilot opens a batch that runs up to the next pilot in sorted
//! filename order; `XX` becomes the batch id in the output names.

use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

use crate::{RenameError, Result};

/// Matches pilot filenames for a set of image extensions
#[derive(Debug, Clone)]
pub struct PilotMatcher {
    pattern: Regex,
}

impl PilotMatcher {
    pub fn new(extensions: &[String]) -> Result<Self> {
        let alternation = extensions
            .iter()
            .map(|e| regex::escape(e.trim_start_matches('.')))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&format!(r"-([A-Za-z0-9]{{2}})\.({})$", alternation))
            .case_insensitive(true)
            .build()
            .map_err(|e| RenameError::Config(format!("Invalid image extension list: {}", e)))?;
        Ok(Self { pattern })
    }

    /// Batch id encoded in a pilot filename, or `None` for ordinary images
    pub fn batch_id<'a>(&self, filename: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(filename)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

/// One pilot image and the images that follow it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub pilot: String,
    pub batch_id: String,
    pub members: Vec<String>,
}

/// Result of splitting a sorted file list at pilot images
#[derive(Debug, Clone, Default)]
pub struct Batches {
    pub batches: Vec<Batch>,
    /// Files sorted before the first pilot; they belong to no batch
    pub orphans: Vec<String>,
}

/// Split a sorted list of image filenames into batches
pub fn split_batches(files: &[String], matcher: &PilotMatcher) -> Batches {
    let mut out = Batches::default();

    for name in files {
        if let Some(id) = matcher.batch_id(name) {
            out.batches.push(Batch {
                pilot: name.clone(),
                batch_id: id.to_string(),
                members: Vec::new(),
            });
        } else if let Some(current) = out.batches.last_mut() {
            current.members.push(name.clone());
        } else {
            out.orphans.push(name.clone());
        }
    }

    out
}

/// Check that batches can be named without gaps or collisions.
///
/// Returns the shared member count per batch. A count of zero is allowed
/// (only the pilots get copied); the caller decides how to report it.
pub fn validate_batches(
    batches: &[Batch],
    angle_num: usize,
    source: &std::path::Path,
) -> Result<usize> {
    let first = batches
        .first()
        .ok_or_else(|| RenameError::NoPilotImages(source.to_path_buf()))?;

    let count = first.members.len();
    if batches.iter().any(|b| b.members.len() != count) {
        return Err(RenameError::InconsistentBatches(
            batches
                .iter()
                .map(|b| (b.pilot.clone(), b.members.len()))
                .collect(),
        ));
    }

    // `ab` and `AB` pilots collide on case-insensitive filesystems
    let mut seen: HashMap<String, &str> = HashMap::new();
    for b in batches {
        if let Some(prev) = seen.insert(b.batch_id.to_ascii_uppercase(), b.pilot.as_str()) {
            return Err(RenameError::DuplicateBatchId {
                batch_id: b.batch_id.clone(),
                first: prev.to_string(),
                second: b.pilot.clone(),
            });
        }
    }

    if count != 0 && count % angle_num != 0 {
        return Err(RenameError::NotMultipleOfAngles { count, angle_num });
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppConfig;
    use std::path::Path;

    fn matcher() -> PilotMatcher {
        PilotMatcher::new(&AppConfig::default().image_extensions).unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_batch_id_extraction() {
        let m = matcher();
        assert_eq!(m.batch_id("gesture-01.jpg"), Some("01"));
        assert_eq!(m.batch_id("IMG-Ab.JPEG"), Some("Ab"));
        assert_eq!(m.batch_id("x-AB.TIFF"), Some("AB"));
        assert_eq!(m.batch_id("IMG_0001.jpg"), None);
        assert_eq!(m.batch_id("x-001.jpg"), None);
        assert_eq!(m.batch_id("x-01.txt"), None);
        assert_eq!(m.batch_id("x-01.jpg.bak"), None);
    }

    #[test]
    fn test_split_batches_with_orphans() {
        let files = names(&["a.jpg", "b-01.jpg", "c.jpg", "d.jpg", "e-02.jpg", "f.jpg", "g.jpg"]);
        let out = split_batches(&files, &matcher());

        assert_eq!(out.orphans, names(&["a.jpg"]));
        assert_eq!(out.batches.len(), 2);
        assert_eq!(out.batches[0].batch_id, "01");
        assert_eq!(out.batches[0].members, names(&["c.jpg", "d.jpg"]));
        assert_eq!(out.batches[1].pilot, "e-02.jpg");
        assert_eq!(out.batches[1].members, names(&["f.jpg", "g.jpg"]));
    }

    #[test]
    fn test_validate_requires_a_pilot() {
        let err = validate_batches(&[], 4, Path::new("imgs")).unwrap_err();
        assert!(matches!(err, RenameError::NoPilotImages(_)));
    }

    #[test]
    fn test_validate_inconsistent_counts() {
        let files = names(&["a-01.jpg", "b.jpg", "c-02.jpg", "d.jpg", "e.jpg"]);
        let out = split_batches(&files, &matcher());
        let err = validate_batches(&out.batches, 1, Path::new("imgs")).unwrap_err();
        match err {
            RenameError::InconsistentBatches(counts) => {
                assert_eq!(
                    counts,
                    vec![("a-01.jpg".to_string(), 1), ("c-02.jpg".to_string(), 2)]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_multiple_of_angles() {
        let files = names(&["a-01.jpg", "1.jpg", "2.jpg", "3.jpg"]);
        let out = split_batches(&files, &matcher());
        assert_eq!(validate_batches(&out.batches, 3, Path::new("imgs")).unwrap(), 3);
        assert!(matches!(
            validate_batches(&out.batches, 2, Path::new("imgs")),
            Err(RenameError::NotMultipleOfAngles { count: 3, angle_num: 2 })
        ));
    }

    #[test]
    fn test_validate_empty_batches_allowed() {
        let files = names(&["a-01.jpg", "b-02.jpg"]);
        let out = split_batches(&files, &matcher());
        assert_eq!(validate_batches(&out.batches, 4, Path::new("imgs")).unwrap(), 0);
    }

    #[test]
    fn test_validate_duplicate_batch_id() {
        let files = names(&["a-01.jpg", "b-01.png"]);
        let out = split_batches(&files, &matcher());
        assert!(matches!(
            validate_batches(&out.batches, 4, Path::new("imgs")),
            Err(RenameError::DuplicateBatchId { .. })
        ));
    }

    #[test]
    fn test_validate_batch_ids_differing_only_in_case() {
        let files = names(&["a-ab.jpg", "b-AB.jpg"]);
        let out = split_batches(&files, &matcher());
        match validate_batches(&out.batches, 4, Path::new("imgs")) {
            Err(RenameError::DuplicateBatchId { first, second, .. }) => {
                assert_eq!(first, "a-ab.jpg");
                assert_eq!(second, "b-AB.jpg");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
