// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Device service: reports the identity established for this session.

use serde::Serialize;
use uuid::Uuid;

use gapview_core::{PluginResult, Status};

use crate::context::ServiceContext;
use crate::handler::{ActionTable, Command};
use crate::sink::CommandContext;

/// Payload of `getDeviceInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub uuid: Uuid,
    pub platform: String,
    pub name: String,
    pub version: String,
}

pub struct Device {
    info: DeviceInfo,
}

impl Command for Device {
    const SERVICE: &'static str = "Device";

    fn actions() -> ActionTable<Self> {
        ActionTable::new().action("getDeviceInfo", Device::get_device_info)
    }

    fn create(services: &ServiceContext) -> Self {
        Self {
            info: DeviceInfo {
                uuid: services.device_id,
                platform: services.bridge.platform_name().to_string(),
                name: device_name(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

impl Device {
    fn get_device_info(&mut self, _args: &str, ctx: CommandContext) {
        let result = PluginResult::object(Status::Ok, &self.info)
            .unwrap_or_else(|e| PluginResult::with_message(Status::JsonException, e.to_string()));
        ctx.deliver(result);
    }
}

fn device_name() -> String {
    ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "unknown".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::ResultSink;
    use crate::testing::service_context;
    use gapview_core::Payload;

    #[tokio::test]
    async fn reports_session_identity() {
        let (services, _fixture) = service_context();
        let (sink, mut rx) = ResultSink::channel();
        let mut device = Device::create(&services);

        device.get_device_info("", CommandContext::new("Device", "Device1", sink));

        let delivery = rx.try_recv().expect("one immediate result");
        assert_eq!(delivery.result.status(), Status::Ok);
        let Payload::Object(info) = delivery.result.payload() else {
            panic!("expected object payload");
        };
        assert_eq!(info["uuid"], services.device_id.to_string());
        assert_eq!(info["platform"], "Memory");
        assert!(info["name"].is_string());
        assert!(rx.try_recv().is_err());
    }
}
