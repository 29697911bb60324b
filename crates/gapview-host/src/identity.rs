// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stable device identity, kept in isolated storage.

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use gapview_bridge::IsolatedStorage;
use gapview_core::BridgeConfig;
use gapview_core::error::{GapviewError, Result};

/// Read the device UUID from the identity file, creating one if needed.
///
/// With `reset_storage_on_start` the whole store is wiped first; the
/// identity survives because it is written back afterwards.
#[instrument(skip_all, fields(file = %config.identity_file))]
pub fn establish(storage: &dyn IsolatedStorage, config: &BridgeConfig) -> Result<Uuid> {
    let id = match read_identity(storage, &config.identity_file) {
        Some(id) => {
            debug!(%id, "device identity loaded");
            id
        }
        None => {
            let id = Uuid::new_v4();
            info!(%id, "generated new device identity");
            id
        }
    };

    if config.reset_storage_on_start {
        warn!("wiping isolated storage on start");
        storage.remove_all()?;
    }

    storage.write_file(&config.identity_file, id.to_string().as_bytes())?;
    Ok(id)
}

fn read_identity(storage: &dyn IsolatedStorage, file: &str) -> Option<Uuid> {
    let bytes = match storage.read_file(file) {
        Ok(bytes) => bytes,
        Err(GapviewError::NotFound(_)) => return None,
        Err(e) => {
            warn!(error = %e, "identity file unreadable");
            return None;
        }
    };
    let text = String::from_utf8_lossy(&bytes);
    let line = text.lines().next().unwrap_or_default().trim();
    match Uuid::parse_str(line) {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(error = %e, "identity file corrupt, replacing");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapview_bridge::memory::MemoryStorage;
    use gapview_bridge::storage::DirectoryStorage;

    #[test]
    fn generated_once_then_reused() {
        let storage = MemoryStorage::new();
        let config = BridgeConfig::default();

        let first = establish(&storage, &config).expect("first");
        let second = establish(&storage, &config).expect("second");
        assert_eq!(first, second);
        assert_eq!(
            storage.read_file("appUUID.txt").expect("written"),
            first.to_string().into_bytes()
        );
    }

    #[test]
    fn corrupt_identity_is_replaced() {
        let storage = MemoryStorage::new();
        storage.write_file("appUUID.txt", b"not-a-uuid\n").expect("seed");
        let id = establish(&storage, &BridgeConfig::default()).expect("establish");
        assert_eq!(
            String::from_utf8(storage.read_file("appUUID.txt").expect("read")).expect("utf8"),
            id.to_string()
        );
    }

    #[test]
    fn reset_wipes_store_but_keeps_identity() {
        let storage = MemoryStorage::new();
        let mut config = BridgeConfig::default();
        let id = establish(&storage, &config).expect("first");
        storage
            .save_in_folder("CapturedImagesCache", "IMG.jpg", b"jpeg")
            .expect("seed");

        config.reset_storage_on_start = true;
        assert_eq!(establish(&storage, &config).expect("reset"), id);
        assert_eq!(storage.paths(), vec!["appUUID.txt"]);
    }

    #[test]
    fn persists_across_directory_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = BridgeConfig::default();
        let id = {
            let storage = DirectoryStorage::open(dir.path()).expect("open");
            establish(&storage, &config).expect("establish")
        };
        let storage = DirectoryStorage::open(dir.path()).expect("reopen");
        assert_eq!(establish(&storage, &config).expect("again"), id);
    }
}
