// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Result envelopes delivered back to script.
//
// The wire form is a JSON object with three parts: `status` (integer code),
// `message` (the payload, encoded by shape), and an optional `cast` naming
// the script-side routine that converts the payload. The channel back into
// the web view only carries strings, so `to_wire` is the whole contract.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::status::Status;

/// Payload carried by a [`PluginResult`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No payload; the status's default message is sent instead.
    None,
    Bool(bool),
    Text(String),
    Number(f64),
    /// A single structured object.
    Object(Value),
    /// A list of structured objects.
    List(Vec<Value>),
    /// Human-readable failure description.
    ErrorMessage(String),
}

/// A status plus optional payload and cast-hint.
///
/// Construction is pure; nothing here touches the script engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginResult {
    status: Status,
    payload: Payload,
    cast: Option<String>,
}

impl PluginResult {
    /// Envelope with a status and no payload.
    pub fn new(status: Status) -> Self {
        Self {
            status,
            payload: Payload::None,
            cast: None,
        }
    }

    pub fn with_payload(status: Status, payload: Payload) -> Self {
        Self {
            status,
            payload,
            cast: None,
        }
    }

    /// Envelope carrying a message. Non-OK statuses carry it as an error
    /// message, OK carries it as plain text.
    pub fn with_message(status: Status, message: impl Into<String>) -> Self {
        let message = message.into();
        let payload = if status.is_ok() {
            Payload::Text(message)
        } else {
            Payload::ErrorMessage(message)
        };
        Self::with_payload(status, payload)
    }

    pub fn ok() -> Self {
        Self::new(Status::Ok)
    }

    /// `ERROR` with a descriptive message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_message(Status::Error, message)
    }

    /// Serialize `value` into a structured-object payload.
    pub fn object<T: Serialize>(status: Status, value: &T) -> Result<Self> {
        Ok(Self::with_payload(
            status,
            Payload::Object(serde_json::to_value(value)?),
        ))
    }

    /// Serialize each item of `items` into a list-of-objects payload.
    pub fn list<T: Serialize>(status: Status, items: &[T]) -> Result<Self> {
        let values = items
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::with_payload(status, Payload::List(values)))
    }

    /// Attach the name of the script-side conversion routine.
    pub fn with_cast(mut self, cast: impl Into<String>) -> Self {
        self.cast = Some(cast.into());
        self
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn cast(&self) -> Option<&str> {
        self.cast.as_deref()
    }

    /// The payload as the JSON value placed under `message`.
    pub fn wire_message(&self) -> Value {
        match &self.payload {
            Payload::None => Value::String(self.status.default_message().to_string()),
            Payload::Bool(b) => Value::Bool(*b),
            Payload::Text(s) | Payload::ErrorMessage(s) => Value::String(s.clone()),
            Payload::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Payload::Object(v) => v.clone(),
            Payload::List(items) => Value::Array(items.clone()),
        }
    }

    /// Serialized envelope handed to the script-side result function.
    ///
    /// Field order is fixed (`status`, `message`, then `cast`) so the output
    /// is byte-stable for a given envelope.
    pub fn to_wire(&self) -> String {
        let mut out = format!(
            "{{\"status\":{},\"message\":{}",
            self.status.code(),
            self.wire_message()
        );
        if let Some(cast) = &self.cast {
            out.push_str(",\"cast\":");
            out.push_str(&Value::String(cast.clone()).to_string());
        }
        out.push('}');
        out
    }
}
