// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! angle-renamer: batch copy & rename for sample photo sets
//!
//! Copies images into a `renamed` folder as
//! `{REGION}-{DATE}-{GROUP}-{ANGLE}.{ext}`, either from per-sample subfolders
//! or from one flat folder split at pilot images.

pub mod config;
pub mod copy;
pub mod error;
pub mod job;
pub mod naming;
pub mod pilot;
pub mod plan;
pub mod scan;
pub mod web;

pub use config::AppConfig;
pub use error::{RenameError, Result};
pub use job::{JobRequest, RenameJob};
