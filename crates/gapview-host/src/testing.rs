// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory collaborators for host tests.

use std::sync::Arc;

use tokio::runtime::Handle;
use uuid::Uuid;

use gapview_bridge::memory::{CameraLaunches, MemoryBridge, MemoryStorage};
use gapview_commands::ServiceContext;
use gapview_core::BridgeConfig;

pub struct Fixture {
    pub bridge: Arc<MemoryBridge>,
    pub storage: Arc<MemoryStorage>,
    pub launches: CameraLaunches,
}

pub fn fixture() -> Fixture {
    let (bridge, launches) = MemoryBridge::pair();
    Fixture {
        bridge: Arc::new(bridge),
        storage: Arc::new(MemoryStorage::new()),
        launches,
    }
}

/// Handler context over a fresh fixture. Must be called inside a runtime.
pub fn services() -> (ServiceContext, Fixture) {
    let fixture = fixture();
    let context = ServiceContext {
        bridge: fixture.bridge.clone(),
        storage: fixture.storage.clone(),
        config: BridgeConfig::default(),
        device_id: Uuid::new_v4(),
        runtime: Handle::current(),
    };
    (context, fixture)
}
