// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for angle-renamer

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Name of the output folder created inside the working directory
    #[serde(default = "default_renamed_folder")]
    pub renamed_folder: String,

    /// Extensions (with leading dot) treated as images, matched case-insensitively
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    /// Sub folder holding the flat image set in single_folder mode
    #[serde(default = "default_image_folder")]
    pub image_folder: String,

    /// Images per group in single_folder mode
    #[serde(default = "default_angle_num")]
    pub angle_num: usize,

    /// Images per sample folder in subfolder mode
    #[serde(default = "default_subfolder_angles")]
    pub subfolder_angles: usize,

    /// Web form settings
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebConfig {
    #[serde(default = "default_web_host")]
    pub host: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
}

// Default value functions
fn default_renamed_folder() -> String { "renamed".to_string() }
fn default_image_folder() -> String { "phone_image".to_string() }
fn default_angle_num() -> usize { 4 }
fn default_subfolder_angles() -> usize { 4 }
fn default_web_host() -> String { "127.0.0.1".to_string() }
fn default_web_port() -> u16 { 8080 }

fn default_image_extensions() -> Vec<String> {
    [".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            renamed_folder: default_renamed_folder(),
            image_extensions: default_image_extensions(),
            image_folder: default_image_folder(),
            angle_num: default_angle_num(),
            subfolder_angles: default_subfolder_angles(),
            web: WebConfig::default(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::RenameError::Config(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::Result<()> {
        if self.renamed_folder.trim().is_empty() {
            return Err(crate::RenameError::Config("renamed_folder must not be empty".to_string()));
        }
        if self.image_extensions.iter().any(|e| !e.starts_with('.') || e.len() < 2) {
            return Err(crate::RenameError::Config(
                "image_extensions entries must look like '.jpg'".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config.renamed_folder, "renamed");
        assert_eq!(config.image_folder, "phone_image");
        assert_eq!(config.angle_num, 4);
        assert_eq!(config.image_extensions.len(), 6);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "angle_num": 3, "web": { "port": 9000 } }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.angle_num, 3);
        assert_eq!(config.web.port, 9000);
        assert_eq!(config.web.host, "127.0.0.1");
        assert_eq!(config.subfolder_angles, 4);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = AppConfig::default();
        config.image_folder = "cam".to_string();
        config.save(&path).unwrap();

        assert_eq!(AppConfig::load(&path).unwrap().image_folder, "cam");
    }

    #[test]
    fn test_bad_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "image_extensions": ["jpg"] }"#).unwrap();

        assert!(matches!(AppConfig::load(&path), Err(crate::RenameError::Config(_))));
    }
}
