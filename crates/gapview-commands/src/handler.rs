// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command handler contract and per-service action tables.
//
// Each service declares its actions up front as a table of plain function
// pointers. The table is validated once, when the service is registered,
// so a call-time lookup can only fail for one reason: the script asked for
// an action the service does not have.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error};

use gapview_core::error::{GapviewError, Result};

use crate::context::ServiceContext;
use crate::sink::CommandContext;

/// Why `CommandHandler::invoke` refused to dispatch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvocationError {
    #[error("service '{service}' has no action '{action}'")]
    UnknownAction { service: String, action: String },
    #[error("action '{action}' of service '{service}' panicked")]
    Panicked { service: String, action: String },
}

/// Object-safe face of a live handler instance.
///
/// `Ok(())` from `invoke` only means the action was found and started;
/// the outcome reaches script later through the `CommandContext`. An action
/// that panics is contained and reported as [`InvocationError::Panicked`].
pub trait CommandHandler: Send {
    fn service(&self) -> &str;

    /// Names of every action this handler answers to.
    fn action_names(&self) -> Vec<&'static str>;

    fn invoke(
        &mut self,
        action: &str,
        args: &str,
        ctx: CommandContext,
    ) -> std::result::Result<(), InvocationError>;
}

/// An action implementation: the handler, the raw argument payload, and the
/// callback context for this invocation.
pub type ActionFn<H> = fn(&mut H, &str, CommandContext);

/// Ordered mapping from action name to implementation.
pub struct ActionTable<H> {
    entries: Vec<(&'static str, ActionFn<H>)>,
}

impl<H> Default for ActionTable<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H> ActionTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action. Matching against the inbound action field is exact
    /// and case-sensitive.
    pub fn action(mut self, name: &'static str, f: ActionFn<H>) -> Self {
        self.entries.push((name, f));
        self
    }

    pub fn lookup(&self, name: &str) -> Option<ActionFn<H>> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, f)| *f)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }

    /// Reject empty tables, blank or non-identifier names, and duplicates.
    pub fn validate(&self, service: &str) -> Result<()> {
        if self.entries.is_empty() {
            return Err(GapviewError::Registration(format!(
                "service '{service}' declares no actions"
            )));
        }
        let mut seen = HashSet::new();
        for (name, _) in &self.entries {
            if !is_identifier(name) {
                return Err(GapviewError::Registration(format!(
                    "service '{service}' has invalid action name '{name}'"
                )));
            }
            if !seen.insert(*name) {
                return Err(GapviewError::Registration(format!(
                    "service '{service}' declares action '{name}' twice"
                )));
            }
        }
        Ok(())
    }
}

/// Names usable as service or action identifiers on the wire.
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// A concrete command service.
///
/// Implementors are plain structs; registration pairs them with their action
/// table and erases them behind [`CommandHandler`].
pub trait Command: Send + Sized + 'static {
    /// Service name scripts address this handler by.
    const SERVICE: &'static str;

    fn actions() -> ActionTable<Self>;

    /// Build a fresh instance. Must not touch the device: the registry calls
    /// this lazily on first use and expects it to only allocate state.
    fn create(services: &ServiceContext) -> Self;
}

/// A handler instance bound to its validated action table.
pub(crate) struct Bound<H> {
    handler: H,
    table: Arc<ActionTable<H>>,
}

impl<H> Bound<H> {
    pub(crate) fn new(handler: H, table: Arc<ActionTable<H>>) -> Self {
        Self { handler, table }
    }
}

impl<H: Command> CommandHandler for Bound<H> {
    fn service(&self) -> &str {
        H::SERVICE
    }

    fn action_names(&self) -> Vec<&'static str> {
        self.table.names()
    }

    fn invoke(
        &mut self,
        action: &str,
        args: &str,
        ctx: CommandContext,
    ) -> std::result::Result<(), InvocationError> {
        let Some(f) = self.table.lookup(action) else {
            return Err(InvocationError::UnknownAction {
                service: H::SERVICE.to_string(),
                action: action.to_string(),
            });
        };
        debug!(service = H::SERVICE, action, callback_id = ctx.callback_id(), "invoking action");
        let handler = &mut self.handler;
        if panic::catch_unwind(AssertUnwindSafe(|| f(handler, args, ctx))).is_err() {
            error!(service = H::SERVICE, action, "action panicked");
            return Err(InvocationError::Panicked {
                service: H::SERVICE.to_string(),
                action: action.to_string(),
            });
        }
        Ok(())
    }
}
