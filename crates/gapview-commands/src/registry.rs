// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service registry: service name -> live handler instance.
//
// The registry is owned by one bridge session. A handler is created the
// first time its service is resolved and reused for the rest of the
// session, so there is at most one instance per service name.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use gapview_core::error::{GapviewError, Result};

use crate::capture::Capture;
use crate::console::DebugConsole;
use crate::context::ServiceContext;
use crate::device::Device;
use crate::handler::{Bound, Command, CommandHandler, is_identifier};

type Factory = Box<dyn Fn(&ServiceContext) -> Box<dyn CommandHandler> + Send>;

/// Registered factories plus the handlers created so far.
pub struct ServiceRegistry {
    context: ServiceContext,
    factories: HashMap<String, Factory>,
    live: HashMap<String, Box<dyn CommandHandler>>,
}

impl ServiceRegistry {
    /// Empty registry; services must be added with [`register`](Self::register).
    pub fn new(context: ServiceContext) -> Self {
        Self {
            context,
            factories: HashMap::new(),
            live: HashMap::new(),
        }
    }

    /// Registry with every service shipped in this crate.
    pub fn with_builtin_services(context: ServiceContext) -> Result<Self> {
        let mut registry = Self::new(context);
        registry.register::<Capture>()?;
        registry.register::<Device>()?;
        registry.register::<DebugConsole>()?;
        Ok(registry)
    }

    /// Register a service. Its action table is validated here, once.
    #[instrument(skip(self), fields(service = H::SERVICE))]
    pub fn register<H: Command>(&mut self) -> Result<()> {
        if !is_identifier(H::SERVICE) {
            return Err(GapviewError::Registration(format!(
                "invalid service name '{}'",
                H::SERVICE
            )));
        }
        if self.factories.contains_key(H::SERVICE) {
            return Err(GapviewError::Registration(format!(
                "service '{}' registered twice",
                H::SERVICE
            )));
        }

        let table = H::actions();
        table.validate(H::SERVICE)?;
        let table = Arc::new(table);

        let factory: Factory = Box::new(move |ctx: &ServiceContext| {
            Box::new(Bound::new(H::create(ctx), Arc::clone(&table))) as Box<dyn CommandHandler>
        });
        self.factories.insert(H::SERVICE.to_string(), factory);
        debug!("service registered");
        Ok(())
    }

    /// Look up the handler for `service`, creating it on first use.
    ///
    /// Unknown services return `None` without creating anything.
    pub fn resolve(&mut self, service: &str) -> Option<&mut (dyn CommandHandler + 'static)> {
        let factory = self.factories.get(service)?;
        let context = &self.context;
        let handler = self.live.entry(service.to_string()).or_insert_with(|| {
            info!(service, "creating handler instance");
            factory(context)
        });
        Some(handler.as_mut())
    }

    pub fn is_registered(&self, service: &str) -> bool {
        self.factories.contains_key(service)
    }

    /// Whether a handler instance exists for `service` yet.
    pub fn is_live(&self, service: &str) -> bool {
        self.live.contains_key(service)
    }

    /// Number of handler instances created so far.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Registered service names, sorted.
    pub fn services(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn context(&self) -> &ServiceContext {
        &self.context
    }
}
