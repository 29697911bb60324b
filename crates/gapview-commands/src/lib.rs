// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! gapview: Command handlers and the service registry.
//!
//! A service is a plain struct implementing [`Command`]: a name, a table of
//! actions, and a side-effect-free constructor. The [`ServiceRegistry`]
//! creates one instance per service on first use and hands out
//! [`CommandHandler`] trait objects to the dispatcher. Results travel back
//! through a [`CommandContext`] onto the [`ResultSink`] channel.

pub mod capture;
pub mod console;
pub mod context;
pub mod device;
pub mod handler;
pub mod registry;
pub mod sink;

#[cfg(test)]
mod testing;

pub use capture::Capture;
pub use console::DebugConsole;
pub use context::ServiceContext;
pub use device::Device;
pub use handler::{ActionFn, ActionTable, Command, CommandHandler, InvocationError, is_identifier};
pub use registry::ServiceRegistry;
pub use sink::{CommandContext, Delivery, DeliveryReceiver, ResultSink};
