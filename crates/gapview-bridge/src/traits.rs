// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.
//
// Anything that completes asynchronously on the native side (the capture
// activity) is handed a one-shot reply channel instead of blocking the
// caller. The workflow that launched it awaits the reply as a message.

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

use gapview_core::error::Result;

/// Unified bridge that groups the native capabilities a session needs.
pub trait PlatformBridge: NativeCamera + NativeMediaLibrary + Send + Sync {
    /// Human-readable platform name (e.g. "Windows Phone 7", "Desktop (stub)").
    fn platform_name(&self) -> &str;
}

/// How a native capture activity finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskResult {
    /// The user took a photo.
    Ok,
    /// The user backed out of the activity.
    Cancel,
    /// The activity ended without reporting either outcome.
    None,
}

/// Completion record for one capture activity launch.
#[derive(Debug, Clone)]
pub struct PhotoResult {
    pub task_result: TaskResult,
    /// Set when the activity itself failed; takes precedence over
    /// `task_result`.
    pub error: Option<String>,
    /// Name the platform gave the captured file.
    pub original_file_name: String,
    /// Encoded image bytes (empty unless `task_result` is `Ok`).
    pub chosen_photo: Vec<u8>,
}

impl PhotoResult {
    pub fn ok(original_file_name: impl Into<String>, chosen_photo: Vec<u8>) -> Self {
        Self {
            task_result: TaskResult::Ok,
            error: None,
            original_file_name: original_file_name.into(),
            chosen_photo,
        }
    }

    pub fn cancelled() -> Self {
        Self::without_photo(TaskResult::Cancel)
    }

    pub fn incomplete() -> Self {
        Self::without_photo(TaskResult::None)
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::without_photo(TaskResult::None)
        }
    }

    fn without_photo(task_result: TaskResult) -> Self {
        Self {
            task_result,
            error: None,
            original_file_name: String::new(),
            chosen_photo: Vec::new(),
        }
    }
}

/// Reply half handed to the camera for a single launch.
pub type PhotoReply = oneshot::Sender<PhotoResult>;

/// Capture images through the platform's camera activity.
pub trait NativeCamera {
    /// Present the capture activity. Returns once it has been shown; the
    /// outcome is sent through `reply` when the user finishes. Dropping
    /// `reply` without sending counts as an incomplete activity.
    fn show_camera(&self, reply: PhotoReply) -> Result<()>;
}

/// A picture saved into the device's media library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub name: String,
    pub date: DateTime<Utc>,
    pub size: u64,
}

/// Persist captured pictures into the device's shared media library.
pub trait NativeMediaLibrary {
    fn save_picture(&self, name: &str, bytes: &[u8]) -> Result<Picture>;
}

/// Application-private file storage addressed by `/`-separated logical
/// paths relative to the store root.
pub trait IsolatedStorage: Send + Sync {
    /// Create or truncate the file at `path`, creating parent folders.
    fn write_file(&self, path: &str, bytes: &[u8]) -> Result<()>;

    /// Read the whole file at `path`. Missing files yield
    /// `GapviewError::NotFound`.
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    fn file_exists(&self, path: &str) -> bool;

    /// Remove every file and folder in the store.
    fn remove_all(&self) -> Result<()>;

    /// Write `bytes` as `file_name` inside `folder` and return the logical
    /// path it was stored under.
    fn save_in_folder(&self, folder: &str, file_name: &str, bytes: &[u8]) -> Result<String> {
        let path = if folder.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{file_name}", folder.trim_end_matches('/'))
        };
        self.write_file(&path, bytes)?;
        Ok(path)
    }
}
