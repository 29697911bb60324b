// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Callback router: the script-thread end of the delivery channel.
//
// Handlers and native completions post deliveries from any context; the
// pump drains them on the thread that owns the script engine and turns each
// into one call of the well-known result function with three string
// arguments: status code, callback id, serialized envelope.

use std::future::Future;
use std::io::Write;

use tracing::{debug, error, trace};

use gapview_commands::{Delivery, DeliveryReceiver};
use gapview_core::error::{GapviewError, Result};

/// The embedded script engine, as seen from the bridge.
pub trait ScriptEngine {
    /// Call the global script function `function` with string arguments.
    fn invoke_script(&mut self, function: &str, args: &[String]) -> Result<()>;
}

/// Engine that writes each call as a line of script source, e.g.
/// `PhoneGapCommandResult("1","Device1",{"status":1,"message":"OK"})`.
pub struct WriterEngine<W> {
    out: W,
}

impl<W: Write> WriterEngine<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ScriptEngine for WriterEngine<W> {
    fn invoke_script(&mut self, function: &str, args: &[String]) -> Result<()> {
        writeln!(self.out, "{}", script_call(function, args)).map_err(|e| {
            GapviewError::ScriptInvocation {
                function: function.to_string(),
                reason: e.to_string(),
            }
        })?;
        self.out.flush()?;
        Ok(())
    }
}

/// Render a call to `function` as script source. The last argument of a
/// result call is already a JSON document and is spliced in raw.
pub fn script_call(function: &str, args: &[String]) -> String {
    let rendered: Vec<String> = match args.split_last() {
        Some((envelope, leading)) if leading.len() == 2 => leading
            .iter()
            .map(|arg| serde_json::Value::String(arg.clone()).to_string())
            .chain(std::iter::once(envelope.clone()))
            .collect(),
        _ => args
            .iter()
            .map(|arg| serde_json::Value::String(arg.clone()).to_string())
            .collect(),
    };
    format!("{function}({})", rendered.join(","))
}

/// Drains deliveries into the script engine.
pub struct ScriptPump<E> {
    engine: E,
    deliveries: DeliveryReceiver,
    function: String,
}

impl<E: ScriptEngine> ScriptPump<E> {
    pub fn new(engine: E, deliveries: DeliveryReceiver, function: impl Into<String>) -> Self {
        Self {
            engine,
            deliveries,
            function: function.into(),
        }
    }

    /// Deliver everything queued right now without waiting. Returns the
    /// number of deliveries handed to the engine.
    pub fn pump(&mut self) -> usize {
        let mut count = 0;
        while let Ok(delivery) = self.deliveries.try_recv() {
            self.deliver(delivery);
            count += 1;
        }
        count
    }

    /// Deliver until every sender is gone, then hand the engine back.
    pub async fn run(mut self) -> E {
        while let Some(delivery) = self.deliveries.recv().await {
            self.deliver(delivery);
        }
        debug!("delivery channel closed, script pump stopping");
        self.engine
    }

    /// Like [`run`](Self::run), but also stops once `shutdown` resolves,
    /// even while senders are still alive. Deliveries already queued at that
    /// point are handed over; later ones are refused at the sink.
    pub async fn run_until(mut self, shutdown: impl Future<Output = ()>) -> E {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                delivery = self.deliveries.recv() => match delivery {
                    Some(delivery) => self.deliver(delivery),
                    None => {
                        debug!("delivery channel closed, script pump stopping");
                        return self.engine;
                    }
                },
                () = &mut shutdown => break,
            }
        }
        self.deliveries.close();
        while let Some(delivery) = self.deliveries.recv().await {
            self.deliver(delivery);
        }
        debug!("shutdown requested, script pump stopping");
        self.engine
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn deliver(&mut self, delivery: Delivery) {
        let Delivery {
            callback_id,
            result,
        } = delivery;
        let status = result.status();
        let args = [status.code().to_string(), callback_id, result.to_wire()];
        trace!(function = %self.function, envelope = %args[2], "invoking script callback");

        // A failed call is logged and dropped; the script engine is not
        // retried with the same envelope.
        if let Err(e) = self.engine.invoke_script(&self.function, &args) {
            error!(
                callback_id = %args[1],
                status = %status,
                error = %e,
                "script callback invocation failed"
            );
        }
    }
}
