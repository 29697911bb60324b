// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared fixtures for handler tests.

use std::sync::Arc;

use tokio::runtime::Handle;
use uuid::Uuid;

use gapview_bridge::memory::{CameraLaunches, MemoryBridge, MemoryStorage};
use gapview_core::BridgeConfig;

use crate::context::ServiceContext;

/// Concrete collaborators behind a test `ServiceContext`.
pub struct Fixture {
    pub bridge: Arc<MemoryBridge>,
    pub storage: Arc<MemoryStorage>,
    pub launches: CameraLaunches,
}

/// Build a context over in-memory collaborators. Must be called from
/// inside a tokio runtime.
pub fn service_context() -> (ServiceContext, Fixture) {
    let (bridge, launches) = MemoryBridge::pair();
    let bridge = Arc::new(bridge);
    let storage = Arc::new(MemoryStorage::new());
    let services = ServiceContext {
        bridge: bridge.clone(),
        storage: storage.clone(),
        config: BridgeConfig::default(),
        device_id: Uuid::new_v4(),
        runtime: Handle::current(),
    };
    (
        services,
        Fixture {
            bridge,
            storage,
            launches,
        },
    )
}
