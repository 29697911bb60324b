// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory bridge and storage for headless hosts and tests.
//
// The camera does not complete on its own: each launch's reply half is
// forwarded to the owner of the `CameraLaunches` receiver, which decides
// the outcome. This mirrors a human-in-the-loop activity without a UI.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::debug;

use gapview_core::error::{GapviewError, Result};

use crate::traits::*;

/// Receiving end of the in-memory camera: one item per launch.
pub type CameraLaunches = mpsc::UnboundedReceiver<PhotoReply>;

/// Bridge whose camera is driven by the caller and whose media library is a
/// plain list.
pub struct MemoryBridge {
    launches: mpsc::UnboundedSender<PhotoReply>,
    library: Mutex<Vec<Picture>>,
    library_fails: AtomicBool,
}

impl MemoryBridge {
    /// Create a bridge plus the receiver that observes camera launches.
    pub fn pair() -> (Self, CameraLaunches) {
        let (tx, rx) = mpsc::unbounded_channel();
        let bridge = Self {
            launches: tx,
            library: Mutex::new(Vec::new()),
            library_fails: AtomicBool::new(false),
        };
        (bridge, rx)
    }

    /// Make subsequent `save_picture` calls fail.
    pub fn set_library_failure(&self, fail: bool) {
        self.library_fails.store(fail, Ordering::SeqCst);
    }

    /// Pictures saved so far, oldest first.
    pub fn saved_pictures(&self) -> Vec<Picture> {
        self.library().clone()
    }

    fn library(&self) -> MutexGuard<'_, Vec<Picture>> {
        self.library.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PlatformBridge for MemoryBridge {
    fn platform_name(&self) -> &str {
        "Memory"
    }
}

impl NativeCamera for MemoryBridge {
    fn show_camera(&self, reply: PhotoReply) -> Result<()> {
        self.launches
            .send(reply)
            .map_err(|_| GapviewError::Bridge("camera launch receiver dropped".into()))?;
        debug!("memory camera launched");
        Ok(())
    }
}

impl NativeMediaLibrary for MemoryBridge {
    fn save_picture(&self, name: &str, bytes: &[u8]) -> Result<Picture> {
        if self.library_fails.load(Ordering::SeqCst) {
            return Err(GapviewError::Bridge("media library rejected picture".into()));
        }
        let picture = Picture {
            name: name.to_string(),
            date: Utc::now(),
            size: bytes.len() as u64,
        };
        self.library().push(picture.clone());
        Ok(picture)
    }
}

/// Isolated storage held entirely in memory.
#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical paths of every stored file, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.files().keys().cloned().collect()
    }

    fn files(&self) -> MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl IsolatedStorage for MemoryStorage {
    fn write_file(&self, path: &str, bytes: &[u8]) -> Result<()> {
        self.files().insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        self.files()
            .get(path)
            .cloned()
            .ok_or_else(|| GapviewError::NotFound(path.to_string()))
    }

    fn file_exists(&self, path: &str) -> bool {
        self.files().contains_key(path)
    }

    fn remove_all(&self) -> Result<()> {
        self.files().clear();
        Ok(())
    }
}
