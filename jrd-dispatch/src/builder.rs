//! Dispatcher builder
//!
//! Fluent configuration for a [`Dispatcher`]:
//! - Register procedures
//! - Add middleware
//! - Enable OpenTelemetry metrics
//!
//! # Examples
//!
//! ```rust
//! use jrd_dispatch::{from_fn, Args, Dispatcher, Fault, LoggingMiddleware};
//!
//! let dispatcher = Dispatcher::builder()
//!     .procedure(from_fn("ping", &[], |_args: Args| Ok::<_, Fault>("pong")))
//!     .use_middleware(LoggingMiddleware::new())
//!     .with_metrics("my-service")
//!     .build();
//!
//! assert!(dispatcher.has_procedure("ping"));
//! ```

use crate::dispatcher::Dispatcher;
use crate::metrics::DispatchMetrics;
use crate::middleware::{Middleware, MiddlewareChain};
use crate::procedure::Procedure;
use crate::registry::Registry;
use std::sync::Arc;

/// Builder for constructing a dispatcher
#[derive(Default)]
pub struct DispatcherBuilder {
    registry: Registry,
    middleware_chain: MiddlewareChain,
    metrics: Option<Arc<DispatchMetrics>>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a procedure under its own name
    pub fn procedure(mut self, procedure: Box<dyn Procedure>) -> Self {
        self.registry.register(procedure);
        self
    }

    /// Set the registry (replaces any previously registered procedures)
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Add middleware around procedure calls
    pub fn use_middleware<T: Middleware + 'static>(mut self, middleware: T) -> Self {
        self.middleware_chain.add(middleware);
        self
    }

    /// Add middleware that is shared with other owners
    pub fn use_shared_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware_chain.add_shared(middleware);
        self
    }

    /// Record `jrd.dispatch.*` metrics through the global meter provider
    pub fn with_metrics(mut self, scope: &'static str) -> Self {
        self.metrics = Some(Arc::new(DispatchMetrics::new(scope)));
        self
    }

    /// Record metrics through the given instruments
    pub fn with_metrics_instance(mut self, metrics: Arc<DispatchMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the dispatcher
    pub fn build(self) -> Dispatcher {
        tracing::debug!(
            procedures = self.registry.len(),
            middleware = self.middleware_chain.len(),
            metrics = self.metrics.is_some(),
            "Dispatcher built"
        );
        Dispatcher::from_parts(self.registry, self.middleware_chain, self.metrics)
    }
}
