// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Isolated storage backed by a directory on the local filesystem.
//
// Logical paths are `/`-separated and always relative to the store root.
// Absolute paths and `..` components are rejected so a script-supplied path
// can never escape the store.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, instrument};

use gapview_core::error::{GapviewError, Result};

use crate::traits::IsolatedStorage;

/// Directory-rooted isolated store.
pub struct DirectoryStorage {
    root: PathBuf,
}

impl DirectoryStorage {
    /// Open (or create) the store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        info!(path = %root.display(), "isolated storage opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a logical path onto the filesystem.
    fn resolve(&self, logical: &str) -> Result<PathBuf> {
        let relative = Path::new(logical);
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(GapviewError::Bridge(format!(
                        "path escapes isolated storage: {logical}"
                    )));
                }
            }
        }
        if resolved == self.root {
            return Err(GapviewError::Bridge(format!("empty storage path: '{logical}'")));
        }
        Ok(resolved)
    }
}

impl IsolatedStorage for DirectoryStorage {
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    fn write_file(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, bytes)?;
        debug!("file written");
        Ok(())
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let target = self.resolve(path)?;
        std::fs::read(&target).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => GapviewError::NotFound(path.to_string()),
            _ => GapviewError::Io(e),
        })
    }

    fn file_exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.is_file())
    }

    #[instrument(skip(self))]
    fn remove_all(&self) -> Result<()> {
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_dir() {
                std::fs::remove_dir_all(&path)?;
            } else {
                std::fs::remove_file(&path)?;
            }
        }
        info!(path = %self.root.display(), "isolated storage cleared");
        Ok(())
    }
}
