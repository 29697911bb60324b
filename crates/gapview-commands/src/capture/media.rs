// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Descriptors returned to script for captured media.

use serde::Serialize;

use gapview_bridge::Picture;
use gapview_core::mime::mime_type_for;

/// Script-side routine that turns the flushed list into media-file objects.
pub const CAST_MEDIA_FILE: &str = "navigator.device.capture._castMediaFile";

/// One captured file, as handed to script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub file_name: String,
    pub file_path: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub last_modified_date: String,
    pub size: u64,
}

impl MediaFile {
    /// Describe a file stored at `file_path` from the media-library record
    /// of the same capture.
    pub fn new(file_path: &str, picture: &Picture) -> Self {
        let file_name = file_name_of(file_path).to_string();
        Self {
            mime_type: mime_type_for(&file_name).to_string(),
            file_name,
            file_path: file_path.to_string(),
            last_modified_date: picture.date.to_rfc3339(),
            size: picture.size,
        }
    }
}

/// Format details for an image file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaFileData {
    pub height: u32,
    pub width: u32,
    pub bitrate: u32,
    pub duration: u32,
    pub codecs: String,
}

impl MediaFileData {
    /// Still images carry no bitrate, duration or codec information.
    pub fn still_image(width: u32, height: u32) -> Self {
        Self {
            height,
            width,
            bitrate: 0,
            duration: 0,
            codecs: String::new(),
        }
    }
}

/// Last path segment, accepting either separator since platform file names
/// may arrive in native form.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
