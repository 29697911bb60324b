// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// File name of the persisted configuration inside the data directory.
pub const CONFIG_FILE: &str = "gapview.json";

/// Persistent bridge settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Well-known script function that receives every result delivery.
    pub result_function: String,
    /// Isolated-storage folder where captured images are persisted.
    pub capture_folder: String,
    /// Isolated-storage file holding the device identity.
    pub identity_file: String,
    /// Wipe isolated storage on startup (the identity is preserved).
    pub reset_storage_on_start: bool,
    /// Upper bound applied to a capture session's requested limit.
    pub max_capture_limit: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            result_function: "PhoneGapCommandResult".into(),
            capture_folder: "CapturedImagesCache".into(),
            identity_file: "appUUID.txt".into(),
            reset_storage_on_start: false,
            max_capture_limit: 99,
        }
    }
}

impl BridgeConfig {
    /// Load `gapview.json` from `data_dir`, falling back to defaults when it
    /// is missing or unreadable.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(CONFIG_FILE);
        let Ok(data) = std::fs::read_to_string(&path) else {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        };
        match serde_json::from_str(&data) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                Self::default()
            }
        }
    }

    /// Write the configuration back to `data_dir`.
    pub fn persist(&self, data_dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(data_dir.join(CONFIG_FILE), json)?;
        Ok(())
    }
}

/// Return the bridge data directory, creating it if needed.
///
/// `GAPVIEW_DATA_DIR` wins outright; otherwise a `gapview` directory under
/// the conventional per-user data location.
pub fn data_dir() -> PathBuf {
    let dir = match std::env::var_os("GAPVIEW_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => dirs_fallback().join("gapview"),
    };
    std::fs::create_dir_all(&dir).ok();
    dir
}

fn dirs_fallback() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    std::env::temp_dir()
}
