// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge session: everything that lives exactly as long as one web view.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{info, instrument};
use uuid::Uuid;

use gapview_bridge::{IsolatedStorage, PlatformBridge};
use gapview_commands::{ResultSink, ServiceContext, ServiceRegistry};
use gapview_core::BridgeConfig;
use gapview_core::error::Result;

use crate::dispatcher::{Dispatched, Dispatcher};
use crate::identity;
use crate::router::{ScriptEngine, ScriptPump};

/// Owns the registry and the sending side of the delivery channel.
///
/// Dropping the session drops every handler; once in-flight continuations
/// finish too, the paired [`ScriptPump`] sees the channel close and stops.
/// A capture left waiting on the camera holds the channel open, so hosts
/// that end before it answers stop the pump with [`ScriptPump::run_until`].
pub struct BridgeSession {
    dispatcher: Dispatcher,
    device_id: Uuid,
    platform: String,
}

impl BridgeSession {
    /// Establish the device identity, register the built-in services and
    /// pair the session with a pump feeding `engine`.
    ///
    /// Native completions are awaited on `runtime`.
    #[instrument(skip_all, fields(platform = bridge.platform_name()))]
    pub fn open<E: ScriptEngine>(
        bridge: Arc<dyn PlatformBridge>,
        storage: Arc<dyn IsolatedStorage>,
        config: BridgeConfig,
        runtime: Handle,
        engine: E,
    ) -> Result<(Self, ScriptPump<E>)> {
        let device_id = identity::establish(storage.as_ref(), &config)?;
        let platform = bridge.platform_name().to_string();
        let (sink, deliveries) = ResultSink::channel();
        let pump = ScriptPump::new(engine, deliveries, config.result_function.clone());

        let context = ServiceContext {
            bridge,
            storage,
            config,
            device_id,
            runtime,
        };
        let registry = ServiceRegistry::with_builtin_services(context)?;
        info!(%device_id, services = ?registry.services(), "bridge session opened");

        let session = Self {
            dispatcher: Dispatcher::new(registry, sink),
            device_id,
            platform,
        };
        Ok((session, pump))
    }

    /// Handle one message from script.
    pub fn dispatch(&mut self, raw: &str) -> Result<Dispatched> {
        self.dispatcher.dispatch(raw)
    }

    pub fn device_id(&self) -> Uuid {
        self.device_id
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.dispatcher.registry().context().config
    }

    pub fn registry(&self) -> &ServiceRegistry {
        self.dispatcher.registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture;
    use gapview_bridge::PhotoResult;
    use gapview_core::Result as GapResult;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Vec<String>>,
    }

    impl ScriptEngine for Recorder {
        fn invoke_script(&mut self, function: &str, args: &[String]) -> GapResult<()> {
            assert_eq!(function, "PhoneGapCommandResult");
            self.calls.push(args.to_vec());
            Ok(())
        }
    }

    #[tokio::test]
    async fn session_end_to_end() {
        let mut fixture = fixture();
        let (mut session, mut pump) = BridgeSession::open(
            fixture.bridge.clone(),
            fixture.storage.clone(),
            BridgeConfig::default(),
            Handle::current(),
            Recorder::default(),
        )
        .expect("open");

        assert_eq!(session.platform(), "Memory");
        assert_eq!(session.registry().live_count(), 0);
        assert!(fixture.storage.file_exists(&session.config().identity_file));

        session.dispatch("Device/getDeviceInfo/Device1/").expect("device");
        session.dispatch("Nope/x/Nope2/").expect("unknown");
        session.dispatch("window.onerror: boom").expect("noise");
        session.dispatch("Capture/captureImage/Capture3/").expect("capture");
        assert_eq!(pump.pump(), 2);

        fixture
            .launches
            .recv()
            .await
            .expect("camera launched")
            .send(PhotoResult::ok("WP_1.jpg", vec![1, 2, 3]))
            .expect("waiting");

        drop(session);
        let engine = pump.run().await;
        let calls = engine.calls;

        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0][0], "1");
        assert_eq!(calls[0][1], "Device1");
        assert!(calls[0][2].contains(&fixture_uuid(&fixture)));
        assert_eq!(calls[1][..2], ["2".to_string(), "Nope2".to_string()]);
        assert_eq!(calls[2][0], "1");
        assert_eq!(calls[2][1], "Capture3");
        assert!(calls[2][2].ends_with(r#","cast":"navigator.device.capture._castMediaFile"}"#));
    }

    #[tokio::test]
    async fn shutdown_stops_pump_with_capture_pending() {
        let mut fixture = fixture();
        let (mut session, pump) = BridgeSession::open(
            fixture.bridge.clone(),
            fixture.storage.clone(),
            BridgeConfig::default(),
            Handle::current(),
            Recorder::default(),
        )
        .expect("open");
        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
        let pump = tokio::spawn(pump.run_until(async {
            let _ = stopped.await;
        }));

        session.dispatch("Device/getDeviceInfo/Device1/").expect("device");
        session.dispatch("Capture/captureImage/Capture2/").expect("capture");
        let pending = fixture.launches.recv().await.expect("camera launched");

        drop(session);
        stop.send(()).expect("pump listening");
        let engine = pump.await.expect("pump task");
        assert_eq!(engine.calls.len(), 1);
        assert_eq!(engine.calls[0][1], "Device1");

        // The camera answering after shutdown reaches no one.
        let _ = pending.send(PhotoResult::cancelled());
    }

    fn fixture_uuid(fixture: &crate::testing::Fixture) -> String {
        String::from_utf8(fixture.storage.read_file("appUUID.txt").expect("identity"))
            .expect("utf8")
    }

    #[tokio::test]
    async fn identity_is_stable_across_sessions() {
        let fixture = fixture();
        let open = || {
            BridgeSession::open(
                fixture.bridge.clone(),
                fixture.storage.clone(),
                BridgeConfig::default(),
                Handle::current(),
                Recorder::default(),
            )
            .expect("open")
            .0
        };
        let first = open().device_id();
        assert_eq!(open().device_id(), first);
    }
}
