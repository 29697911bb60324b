// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File-extension to MIME type mapping for captured media.

use std::path::Path;

/// MIME type used when the extension is missing or unknown.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// MIME type for a bare extension (without the dot), case-insensitive.
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => JPEG_MIME_TYPE,
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "wma" => "audio/x-ms-wma",
        "3gp" => "video/3gpp",
        "mp4" => "video/mp4",
        "wmv" => "video/x-ms-wmv",
        "avi" => "video/avi",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// Derive a MIME type from a file name or storage path.
pub fn mime_type_for(path: &str) -> &'static str {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(DEFAULT_MIME_TYPE, mime_for_extension)
}
