// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Argument payloads accepted by the Capture service.

use serde::Deserialize;

/// Options for `captureImage`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaptureImageOptions {
    /// Maximum number of images the user may take in one session.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    1
}

impl Default for CaptureImageOptions {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

impl CaptureImageOptions {
    /// Decode the raw argument payload. An empty payload means defaults.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw)
    }

    /// The limit actually applied: at least 1, at most `max`.
    pub fn effective_limit(&self, max: u32) -> u32 {
        let max = i64::from(max.max(1));
        // Clamped into 1..=max, which always fits in u32.
        self.limit.clamp(1, max) as u32
    }
}

/// Options for `getFormatData`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MediaFormatOptions {
    #[serde(rename = "fullPath")]
    pub full_path: String,
    /// Explicit MIME type; derived from `full_path` when absent.
    #[serde(rename = "type", default)]
    pub mime_type: Option<String>,
}

impl MediaFormatOptions {
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
