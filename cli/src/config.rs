// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! Local session persistence: server URL, token and user name.
//!
//! Discovery: `--config` / `ERNEST_CONFIG_PATH`, then `~/.ernest/config.yaml`.

use anyhow::{Context, Result};
use ernest_sdk::Session;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub user: String,
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs_next::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ernest")
            .join("config.yaml")
    }

    pub fn resolve_path(cli_path: Option<PathBuf>) -> PathBuf {
        cli_path.unwrap_or_else(Self::default_path)
    }

    /// Load the config at `path`; a missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // The file holds a bearer token.
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(path)
            .with_context(|| format!("Can't write config file {:?}", path))?;

        // `mode` only applies on creation; tighten an existing file before writing.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to restrict permissions on {:?}", path))?;
        }

        file.write_all(content.as_bytes())
            .with_context(|| format!("Can't write config file {:?}", path))?;

        debug!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn session(&self) -> Session {
        Session {
            url: self.url.clone(),
            token: self.token.clone(),
        }
    }
}
