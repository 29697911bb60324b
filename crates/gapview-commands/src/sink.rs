// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Result delivery from handlers towards the script thread.
//
// Handlers run on whatever context a native completion arrives on, but the
// script engine may only be called from its own thread. Every delivery is
// therefore posted onto a channel whose receiver is drained on the script
// thread by the host's pump.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use gapview_core::PluginResult;
use gapview_core::error::{GapviewError, Result};

/// One result on its way back into script.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub callback_id: String,
    pub result: PluginResult,
}

/// Receiving half, owned by the script thread.
pub type DeliveryReceiver = mpsc::UnboundedReceiver<Delivery>;

/// Cloneable sending half of the delivery channel.
#[derive(Clone)]
pub struct ResultSink {
    tx: mpsc::UnboundedSender<Delivery>,
}

impl ResultSink {
    /// Create a sink plus the receiver the script thread drains.
    pub fn channel() -> (Self, DeliveryReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Route a handler-produced result.
    ///
    /// An empty callback id means the script asked for no callback, so
    /// nothing is posted.
    pub fn route(&self, callback_id: &str, result: PluginResult) -> Result<()> {
        if callback_id.is_empty() {
            debug!(status = %result.status(), "no callback attached, result dropped");
            return Ok(());
        }
        self.post(callback_id, result)
    }

    /// Post a dispatcher-originated response. These always answer a
    /// concrete inbound message, so an empty id is a contract violation.
    pub fn respond(&self, callback_id: &str, result: PluginResult) -> Result<()> {
        if callback_id.is_empty() {
            return Err(GapviewError::MissingCallbackId(format!(
                "status {}",
                result.status()
            )));
        }
        self.post(callback_id, result)
    }

    fn post(&self, callback_id: &str, result: PluginResult) -> Result<()> {
        self.tx
            .send(Delivery {
                callback_id: callback_id.to_string(),
                result,
            })
            .map_err(|_| GapviewError::SessionClosed)
    }
}

/// Callback identity for one invocation, threaded through the action and
/// every asynchronous continuation it schedules.
///
/// Clones share an attachment flag: once the dispatcher detaches the
/// context, no clone can reach the script any more.
#[derive(Clone)]
pub struct CommandContext {
    service: Arc<str>,
    callback_id: Arc<str>,
    sink: ResultSink,
    attached: Arc<AtomicBool>,
}

impl CommandContext {
    pub fn new(service: &str, callback_id: &str, sink: ResultSink) -> Self {
        Self {
            service: Arc::from(service),
            callback_id: Arc::from(callback_id),
            sink,
            attached: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn callback_id(&self) -> &str {
        &self.callback_id
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// Tear down the callback wiring for this invocation.
    pub fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
    }

    /// Deliver a result for this invocation. May be called any number of
    /// times, including zero.
    pub fn deliver(&self, result: PluginResult) {
        if !self.is_attached() {
            debug!(
                service = %self.service,
                callback_id = %self.callback_id,
                "context detached, result dropped"
            );
            return;
        }
        if let Err(e) = self.sink.route(&self.callback_id, result) {
            warn!(
                service = %self.service,
                callback_id = %self.callback_id,
                error = %e,
                "result delivery failed"
            );
        }
    }
}
