// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inbound pipeline: parse -> resolve -> invoke.
//
// Runs synchronously on the thread that receives script messages. Results
// never come back through here; handlers post them to the sink and the
// script pump delivers them.

use tracing::{debug, error, instrument, warn};

use gapview_commands::{CommandContext, ResultSink, ServiceRegistry};
use gapview_core::error::Result;
use gapview_core::{PluginResult, Status};

use crate::call::CommandCall;

/// What happened to one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// Not a command; dropped without a reply.
    Ignored,
    /// No such service; CLASS_NOT_FOUND was sent.
    ServiceNotFound,
    /// The service lacks the action, or the action panicked; INVALID_ACTION
    /// was sent.
    InvalidAction,
    /// The action started. Zero or more results follow through the sink.
    Invoked,
}

pub struct Dispatcher {
    registry: ServiceRegistry,
    sink: ResultSink,
}

impl Dispatcher {
    pub fn new(registry: ServiceRegistry, sink: ResultSink) -> Self {
        Self { registry, sink }
    }

    /// Route one raw script message.
    ///
    /// `Err` only when a reply the dispatcher owes cannot be posted: the
    /// message had no callback id, or the session is shutting down.
    #[instrument(skip_all)]
    pub fn dispatch(&mut self, raw: &str) -> Result<Dispatched> {
        let Some(call) = CommandCall::parse(raw) else {
            debug!(message = raw, "not a command");
            return Ok(Dispatched::Ignored);
        };

        let Some(handler) = self.registry.resolve(&call.service) else {
            warn!(service = %call.service, callback_id = %call.callback_id, "unknown service");
            respond(&self.sink, &call, Status::ClassNotFound)?;
            return Ok(Dispatched::ServiceNotFound);
        };

        let ctx = CommandContext::new(&call.service, &call.callback_id, self.sink.clone());
        match handler.invoke(&call.action, &call.args, ctx.clone()) {
            Ok(()) => Ok(Dispatched::Invoked),
            Err(e) => {
                ctx.detach();
                warn!(error = %e, callback_id = %call.callback_id, "invalid action");
                respond(&self.sink, &call, Status::InvalidAction)?;
                Ok(Dispatched::InvalidAction)
            }
        }
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }
}

fn respond(sink: &ResultSink, call: &CommandCall, status: Status) -> Result<()> {
    sink.respond(&call.callback_id, PluginResult::new(status))
        .inspect_err(|e| {
            error!(
                service = %call.service,
                action = %call.action,
                error = %e,
                "dispatcher reply could not be posted"
            );
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::services;
    use gapview_bridge::PhotoResult;
    use gapview_commands::{ActionTable, Command, DeliveryReceiver, ServiceContext};
    use gapview_core::GapviewError;

    struct Faulty;

    impl Faulty {
        fn fail(&mut self, _args: &str, _ctx: CommandContext) {
            panic!("handler fault");
        }
    }

    impl Command for Faulty {
        const SERVICE: &'static str = "Faulty";

        fn actions() -> ActionTable<Self> {
            ActionTable::new().action("fail", Faulty::fail)
        }

        fn create(_services: &ServiceContext) -> Self {
            Faulty
        }
    }

    fn dispatcher() -> (Dispatcher, DeliveryReceiver, crate::testing::Fixture) {
        let (context, fixture) = services();
        let (sink, rx) = ResultSink::channel();
        let registry = ServiceRegistry::with_builtin_services(context).expect("builtins");
        (Dispatcher::new(registry, sink), rx, fixture)
    }

    #[tokio::test]
    async fn known_action_yields_one_delivery() {
        let (mut dispatcher, mut rx, _fixture) = dispatcher();

        let outcome = dispatcher
            .dispatch("Device/getDeviceInfo/Device1/")
            .expect("dispatch");
        assert_eq!(outcome, Dispatched::Invoked);

        let delivery = rx.try_recv().expect("delivery");
        assert_eq!(delivery.callback_id, "Device1");
        assert_eq!(delivery.result.status(), Status::Ok);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn non_command_text_is_ignored() {
        let (mut dispatcher, mut rx, _fixture) = dispatcher();

        for raw in ["", "hello", "Uncaught TypeError: undefined is not a function", "a/b"] {
            assert_eq!(dispatcher.dispatch(raw).expect("dispatch"), Dispatched::Ignored);
        }
        assert!(rx.try_recv().is_err());
        assert_eq!(dispatcher.registry().live_count(), 0);
    }

    #[tokio::test]
    async fn unknown_service_reports_class_not_found() {
        let (mut dispatcher, mut rx, _fixture) = dispatcher();

        let outcome = dispatcher
            .dispatch("Geolocation/getCurrentPosition/Geolocation4/{}")
            .expect("dispatch");
        assert_eq!(outcome, Dispatched::ServiceNotFound);

        let delivery = rx.try_recv().expect("delivery");
        assert_eq!(delivery.callback_id, "Geolocation4");
        assert_eq!(delivery.result.status(), Status::ClassNotFound);
        assert_eq!(
            delivery.result.to_wire(),
            r#"{"status":2,"message":"Class not found"}"#
        );
        assert_eq!(dispatcher.registry().live_count(), 0);
    }

    #[tokio::test]
    async fn unknown_action_reports_invalid_action_once() {
        let (mut dispatcher, mut rx, _fixture) = dispatcher();

        let outcome = dispatcher
            .dispatch("Capture/recordVideo/Capture5/{}")
            .expect("dispatch");
        assert_eq!(outcome, Dispatched::InvalidAction);

        let delivery = rx.try_recv().expect("delivery");
        assert_eq!(delivery.callback_id, "Capture5");
        assert_eq!(delivery.result.status(), Status::InvalidAction);
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert!(dispatcher.registry().is_live("Capture"));
    }

    #[tokio::test]
    async fn panicking_action_reports_invalid_action_and_dispatch_continues() {
        let (context, _fixture) = services();
        let (sink, mut rx) = ResultSink::channel();
        let mut registry = ServiceRegistry::with_builtin_services(context).expect("builtins");
        registry.register::<Faulty>().expect("register");
        let mut dispatcher = Dispatcher::new(registry, sink);

        assert_eq!(
            dispatcher.dispatch("Faulty/fail/Faulty1/").expect("dispatch"),
            Dispatched::InvalidAction
        );
        let delivery = rx.try_recv().expect("delivery");
        assert_eq!(delivery.callback_id, "Faulty1");
        assert_eq!(delivery.result.status(), Status::InvalidAction);

        assert_eq!(
            dispatcher.dispatch("Device/getDeviceInfo/Device2/").expect("dispatch"),
            Dispatched::Invoked
        );
        assert_eq!(rx.try_recv().expect("next").callback_id, "Device2");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn missing_callback_on_dispatcher_reply_is_an_error() {
        let (mut dispatcher, mut rx, _fixture) = dispatcher();

        let err = dispatcher
            .dispatch("Geolocation/getCurrentPosition//")
            .expect_err("no callback id to answer");
        assert!(matches!(err, GapviewError::MissingCallbackId(_)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn fire_and_forget_action_is_silent() {
        let (mut dispatcher, mut rx, _fixture) = dispatcher();

        assert_eq!(
            dispatcher.dispatch("DebugConsole/log//page loaded").expect("dispatch"),
            Dispatched::Invoked
        );
        assert_eq!(
            dispatcher.dispatch("Device/getDeviceInfo//").expect("dispatch"),
            Dispatched::Invoked
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn handler_instance_is_reused_across_calls() {
        let (mut dispatcher, mut rx, _fixture) = dispatcher();

        dispatcher.dispatch("Device/getDeviceInfo/Device1/").expect("first");
        dispatcher.dispatch("Device/getDeviceInfo/Device2/").expect("second");
        assert_eq!(dispatcher.registry().live_count(), 1);

        let first = rx.try_recv().expect("first");
        let second = rx.try_recv().expect("second");
        assert_eq!(first.result.wire_message(), second.result.wire_message());
    }

    #[tokio::test]
    async fn capture_round_trip_through_dispatcher() {
        let (mut dispatcher, mut rx, mut fixture) = dispatcher();

        dispatcher
            .dispatch(r#"Capture/captureImage/Capture1/{"limit":2}"#)
            .expect("dispatch");
        for n in 1..=2 {
            fixture
                .launches
                .recv()
                .await
                .expect("camera launched")
                .send(PhotoResult::ok(format!("WP_{n}.jpg"), vec![0xFF, 0xD8]))
                .expect("waiting");
        }

        let delivery = rx.recv().await.expect("flush");
        assert_eq!(delivery.callback_id, "Capture1");
        assert_eq!(delivery.result.status(), Status::Ok);
        assert_eq!(
            delivery.result.cast(),
            Some("navigator.device.capture._castMediaFile")
        );
        assert!(rx.try_recv().is_err());
    }
}
