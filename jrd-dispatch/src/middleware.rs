//! Middleware around procedure invocation
//!
//! Middleware sees every call that reaches a procedure, that is every request
//! that passed envelope validation and named a registered method. Rejected
//! envelopes and unknown methods never enter the chain.
//!
//! # Middleware Chain
//!
//! Middleware runs in registration order. Each one can:
//! - Inspect or rewrite the bound arguments before the procedure
//! - Short-circuit with a result, or fail with a [`Fault`]
//! - Observe the result after the procedure
//! - Pass metadata to later middleware
//!
//! `post_handle` runs in reverse order for every middleware whose
//! `pre_handle` ran, including when the chain was short-circuited.
//!
//! # Examples
//!
//! ```rust
//! use jrd_dispatch::{LoggingMiddleware, MiddlewareChain};
//!
//! let mut chain = MiddlewareChain::new();
//! chain.add(LoggingMiddleware::new());
//! assert_eq!(chain.len(), 1);
//! ```

use crate::args::Args;
use crate::fault::Fault;
use crate::procedure::ProcedureResult;
use jrd_core::Id;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Action to take after middleware pre-processing
#[derive(Debug, Clone, PartialEq)]
pub enum MiddlewareAction {
    /// Continue to the next middleware or the procedure
    Continue,
    /// Skip the procedure and use this value as the result
    ShortCircuit(Value),
}

/// Call information passed through the chain
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Name of the procedure being called
    pub method: String,
    /// Request id; `None` for a notification
    pub id: Option<Id>,
    /// Bound arguments, handed to the procedure after the chain runs
    pub args: Args,
    /// Metadata for passing data between middleware
    pub metadata: HashMap<String, Value>,
}

impl CallContext {
    pub fn new(method: impl Into<String>, id: Option<Id>, args: Args) -> Self {
        Self {
            method: method.into(),
            id,
            args,
            metadata: HashMap::new(),
        }
    }

    /// Whether the call is a notification
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Insert metadata that can be accessed by subsequent middleware
    pub fn insert_metadata(&mut self, key: impl Into<String>, value: Value) {
        self.metadata.insert(key.into(), value);
    }

    /// Get metadata by key
    pub fn get_metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

/// Hook around procedure invocation
pub trait Middleware: Send + Sync {
    /// Called before the procedure
    fn pre_handle(&self, ctx: &mut CallContext) -> Result<MiddlewareAction, Fault>;

    /// Called after the procedure, or after a short-circuit
    fn post_handle(&self, ctx: &mut CallContext, result: &ProcedureResult);
}

/// Ordered list of middleware
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware
    pub fn add<T: Middleware + 'static>(&mut self, middleware: T) {
        self.middlewares.push(Arc::new(middleware));
    }

    /// Append a middleware that is shared with other owners
    pub fn add_shared(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    /// Run the chain around `procedure`
    pub fn execute<F>(&self, mut ctx: CallContext, procedure: F) -> ProcedureResult
    where
        F: FnOnce(Args) -> ProcedureResult,
    {
        let mut entered = 0;
        let mut early = None;

        for middleware in &self.middlewares {
            entered += 1;
            match middleware.pre_handle(&mut ctx) {
                Ok(MiddlewareAction::Continue) => continue,
                Ok(MiddlewareAction::ShortCircuit(value)) => {
                    early = Some(Ok(value));
                    break;
                }
                Err(fault) => {
                    early = Some(Err(fault));
                    break;
                }
            }
        }

        let result = match early {
            Some(result) => result,
            None => procedure(ctx.args.clone()),
        };

        for middleware in self.middlewares[..entered].iter().rev() {
            middleware.post_handle(&mut ctx, &result);
        }

        result
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

/// Logs every call through `tracing`
#[derive(Debug, Default)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for LoggingMiddleware {
    fn pre_handle(&self, ctx: &mut CallContext) -> Result<MiddlewareAction, Fault> {
        tracing::info!(
            method = %ctx.method,
            args = ctx.args.len(),
            notification = ctx.is_notification(),
            "Procedure call"
        );
        Ok(MiddlewareAction::Continue)
    }

    fn post_handle(&self, ctx: &mut CallContext, result: &ProcedureResult) {
        match result {
            Ok(_) => tracing::info!(method = %ctx.method, "Procedure succeeded"),
            Err(fault) => tracing::warn!(
                method = %ctx.method,
                code = ?fault.code,
                error = %fault,
                "Procedure failed"
            ),
        }
    }
}

/// Counts calls and failures, and logs call durations
#[derive(Debug)]
pub struct MetricsMiddleware {
    calls: AtomicU64,
    failures: AtomicU64,
    epoch: Instant,
}

impl MetricsMiddleware {
    pub fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            epoch: Instant::now(),
        }
    }

    /// Calls that entered this middleware
    pub fn get_call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Calls that ended in a fault
    pub fn get_failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    fn now_us(&self) -> u64 {
        self.epoch.elapsed().as_micros() as u64
    }
}

impl Default for MetricsMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for MetricsMiddleware {
    fn pre_handle(&self, ctx: &mut CallContext) -> Result<MiddlewareAction, Fault> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        ctx.insert_metadata("start_us", Value::from(self.now_us()));
        Ok(MiddlewareAction::Continue)
    }

    fn post_handle(&self, ctx: &mut CallContext, result: &ProcedureResult) {
        if result.is_err() {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }

        if let Some(start_us) = ctx.get_metadata("start_us").and_then(Value::as_u64) {
            let duration_us = self.now_us().saturating_sub(start_us);
            tracing::debug!(method = %ctx.method, duration_us, "Procedure timed");
        }
    }
}
