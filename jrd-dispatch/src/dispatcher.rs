//! Request dispatcher
//!
//! The dispatcher owns the procedure registry and turns one raw request text
//! into at most one response:
//!
//! 1. Envelope validation (parse, version, method, id, params), in that order
//! 2. Procedure lookup by name
//! 3. Argument binding against the procedure's declared parameters
//! 4. Invocation through the middleware chain, with panics caught
//! 5. Framing: a response for requests, nothing for notifications
//!
//! # Notifications
//!
//! A request without an `id` member never produces response text. When a
//! notification fails, [`Dispatcher::respond`] returns
//! [`Error::Notification`] carrying the error object instead, so the caller
//! can tell the two cases apart without anything reaching the peer.
//!
//! # Thread Safety
//!
//! `Dispatcher` is `Send + Sync`. Share it with an `Arc` and call
//! [`Dispatcher::respond`] from any number of threads; [`Dispatcher::provide`]
//! may run concurrently with in-flight requests.
//!
//! # Examples
//!
//! ```rust
//! use jrd_dispatch::{from_fn, Args, Dispatcher, Fault};
//!
//! let dispatcher = Dispatcher::new();
//! dispatcher.provide(from_fn("subtract", &["minuend", "subtrahend"], |args: Args| {
//!     Ok::<_, Fault>(args.arg::<i64>(0)? - args.arg::<i64>(1)?)
//! }));
//!
//! let reply = dispatcher
//!     .respond(r#"{"jsonrpc":"2.0","method":"subtract","params":{"subtrahend":23,"minuend":42},"id":3}"#)
//!     .unwrap();
//! assert_eq!(reply.as_deref(), Some(r#"{"jsonrpc":"2.0","result":19,"id":3}"#));
//!
//! // Notifications produce no text
//! let reply = dispatcher
//!     .respond(r#"{"jsonrpc":"2.0","method":"subtract","params":[1,1]}"#)
//!     .unwrap();
//! assert_eq!(reply, None);
//! ```

use crate::args::Args;
use crate::builder::DispatcherBuilder;
use crate::fault::Fault;
use crate::metrics::{DispatchMetrics, UNKNOWN_METHOD};
use crate::middleware::{CallContext, MiddlewareChain};
use crate::procedure::{Procedure, ProcedureResult};
use crate::registry::Registry;
use jrd_core::{codec, Error, Id, JsonRpcErrorData, JsonRpcRequest, JsonRpcResponse, Result};
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

/// What a dispatched request produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A response to send back to the caller
    Reply(JsonRpcResponse),
    /// A notification that succeeded; nothing to send
    Silent,
    /// A notification that failed; nothing to send, error kept for the caller
    Suppressed(JsonRpcErrorData),
}

impl Outcome {
    /// The response to send, if any
    pub fn response(&self) -> Option<&JsonRpcResponse> {
        match self {
            Outcome::Reply(response) => Some(response),
            Outcome::Silent | Outcome::Suppressed(_) => None,
        }
    }

    /// The error object, whether it is sent or suppressed
    pub fn error(&self) -> Option<&JsonRpcErrorData> {
        match self {
            Outcome::Reply(response) => response.error.as_ref(),
            Outcome::Suppressed(error) => Some(error),
            Outcome::Silent => None,
        }
    }

    /// Whether nothing is sent back
    pub fn is_silent(&self) -> bool {
        !matches!(self, Outcome::Reply(_))
    }
}

/// JSON-RPC 2.0 request dispatcher
pub struct Dispatcher {
    registry: RwLock<Registry>,
    middleware_chain: MiddlewareChain,
    metrics: Option<Arc<DispatchMetrics>>,
}

impl Dispatcher {
    /// Create a dispatcher with no procedures, middleware or metrics
    pub fn new() -> Self {
        Self::from_parts(Registry::new(), MiddlewareChain::new(), None)
    }

    /// Create a builder
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub(crate) fn from_parts(
        registry: Registry,
        middleware_chain: MiddlewareChain,
        metrics: Option<Arc<DispatchMetrics>>,
    ) -> Self {
        Self {
            registry: RwLock::new(registry),
            middleware_chain,
            metrics,
        }
    }

    /// Register a procedure under its own name, replacing any previous one
    pub fn provide(&self, procedure: Box<dyn Procedure>) {
        let name = procedure.name().to_string();
        if self.registry_mut().register(procedure).is_some() {
            tracing::debug!(method = %name, "Procedure replaced");
        } else {
            tracing::debug!(method = %name, "Procedure registered");
        }
    }

    /// Unregister a procedure; returns whether it was registered
    pub fn remove(&self, name: &str) -> bool {
        self.registry_mut().remove(name)
    }

    /// Check if a procedure is registered
    pub fn has_procedure(&self, name: &str) -> bool {
        self.registry().has_procedure(name)
    }

    /// All registered procedure names, sorted
    pub fn procedures(&self) -> Vec<String> {
        self.registry().procedures()
    }

    /// Process one raw request and encode the outcome
    ///
    /// - `Ok(Some(text))`: a response to send
    /// - `Ok(None)`: a notification that succeeded
    /// - `Err(Error::Notification(_))`: a notification that failed; nothing
    ///   is sent
    /// - `Err(Error::Serialization(_))`: a procedure result that could not be
    ///   encoded
    pub fn respond(&self, raw: &str) -> Result<Option<String>> {
        match self.dispatch(raw) {
            Outcome::Reply(response) => codec::encode_response(&response).map(Some),
            Outcome::Silent => Ok(None),
            Outcome::Suppressed(error) => Err(Error::Notification(error)),
        }
    }

    /// Process one raw request without encoding the outcome
    pub fn dispatch(&self, raw: &str) -> Outcome {
        let started = Instant::now();

        let request = match codec::decode_request(raw) {
            Ok(request) => request,
            Err(rejection) => {
                tracing::debug!(
                    code = rejection.error.code,
                    error = %rejection.error.message,
                    "Request rejected"
                );
                let is_notification = rejection.is_notification();
                let result = Err(rejection.error);
                self.record(UNKNOWN_METHOD, is_notification, &result, started);
                return frame(rejection.id, result);
            }
        };

        let span = tracing::info_span!(
            "rpc_dispatch",
            method = %request.method,
            id = ?request.id
        );
        let _enter = span.enter();

        let JsonRpcRequest {
            method, params, id, ..
        } = request;

        // Bind before matching so the read guard is released before the call
        let procedure = self.registry().get(&method);
        let result = match procedure {
            None => {
                tracing::debug!(method = %method, "Method not found");
                Err(JsonRpcErrorData::method_not_found(&method))
            }
            Some(procedure) => {
                let args = Args::bind(params, procedure.params());
                self.invoke(procedure.as_ref(), &method, id.clone(), args)
                    .map_err(Fault::into_error_data)
            }
        };

        self.record(&method, id.is_none(), &result, started);
        frame(id, result)
    }

    /// Run a procedure through the middleware chain, catching panics
    ///
    /// A panicking procedure becomes a fault before the post hooks see it; a
    /// panicking middleware hook is caught at the outer boundary.
    fn invoke(
        &self,
        procedure: &dyn Procedure,
        method: &str,
        id: Option<Id>,
        args: Args,
    ) -> ProcedureResult {
        if self.middleware_chain.is_empty() {
            return call_guarded(procedure, method, args);
        }

        let ctx = CallContext::new(method, id, args);
        let chain = move || {
            self.middleware_chain
                .execute(ctx, |args| call_guarded(procedure, method, args))
        };
        panic::catch_unwind(AssertUnwindSafe(chain))
            .unwrap_or_else(|payload| Err(panic_fault(method, payload.as_ref())))
    }

    fn record(
        &self,
        method: &str,
        notification: bool,
        result: &std::result::Result<Value, JsonRpcErrorData>,
        started: Instant,
    ) {
        let Some(metrics) = &self.metrics else {
            return;
        };

        let status = match result {
            Ok(_) => "success",
            Err(error) => {
                metrics.record_error(error.code);
                "error"
            }
        };
        metrics.record_request(method, status, started.elapsed().as_secs_f64());
        if notification {
            metrics.record_notification(method);
        }
    }

    fn registry(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, Registry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("procedures", &self.procedures())
            .field("middleware", &self.middleware_chain.len())
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

/// Call a procedure, turning a panic into a fault
fn call_guarded(procedure: &dyn Procedure, method: &str, args: Args) -> ProcedureResult {
    panic::catch_unwind(AssertUnwindSafe(|| procedure.call(args)))
        .unwrap_or_else(|payload| Err(panic_fault(method, payload.as_ref())))
}

fn panic_fault(method: &str, payload: &(dyn std::any::Any + Send)) -> Fault {
    let fault = Fault::from_panic(payload);
    tracing::error!(method = %method, error = %fault, "Procedure panicked");
    fault
}

/// Turn a result into an outcome; requests get a response, notifications
/// never do
fn frame(id: Option<Id>, result: std::result::Result<Value, JsonRpcErrorData>) -> Outcome {
    match (id, result) {
        (Some(id), Ok(value)) => Outcome::Reply(JsonRpcResponse::success(value, id)),
        (Some(id), Err(error)) => Outcome::Reply(JsonRpcResponse::error(error, id)),
        (None, Ok(_)) => Outcome::Silent,
        (None, Err(error)) => {
            tracing::warn!(
                code = error.code,
                error = %error.message,
                "Notification failed"
            );
            Outcome::Suppressed(error)
        }
    }
}
