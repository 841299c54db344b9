//! JSON-RPC 2.0 request dispatcher
//!
//! Register named procedures with a [`Dispatcher`], then hand it raw request
//! text. It validates the envelope, binds positional or named params to the
//! procedure's declared parameters, invokes it and frames the response.
//!
//! # Features
//!
//! - **Procedures**: [`from_fn`], [`from_typed_fn`], or `#[procedure]` from
//!   `jrd-macros`
//! - **Faults**: plain failures become internal errors, structured faults keep
//!   their own code and data
//! - **Notifications**: never answered; failures are reported to the caller
//!   as [`jrd_core::Error::Notification`]
//! - **Middleware**: synchronous hooks around procedure calls
//! - **Metrics**: OpenTelemetry instruments under `jrd.dispatch.*`
//!
//! # Quick Start
//!
//! ```rust
//! use jrd_dispatch::{from_fn, Args, Dispatcher, Fault};
//! use serde_json::json;
//!
//! let dispatcher = Dispatcher::builder()
//!     .procedure(from_fn("add", &["a", "b"], |args: Args| {
//!         Ok::<_, Fault>(args.arg::<i64>(0)? + args.arg::<i64>(1)?)
//!     }))
//!     .procedure(from_fn("fail", &[], |_args: Args| -> Result<(), Fault> {
//!         Err(Fault::new("OHNOES").with_code(-32001).with_data(json!({"foo": "bar"})))
//!     }))
//!     .build();
//!
//! let reply = dispatcher.respond(r#"{"jsonrpc":"2.0","method":"add","params":[5,3],"id":1}"#);
//! assert_eq!(reply.unwrap().as_deref(), Some(r#"{"jsonrpc":"2.0","result":8,"id":1}"#));
//!
//! let reply = dispatcher.respond(r#"{"jsonrpc":"2.0","method":"fail","id":2}"#);
//! assert_eq!(
//!     reply.unwrap().as_deref(),
//!     Some(r#"{"jsonrpc":"2.0","error":{"code":-32001,"message":"OHNOES","data":{"foo":"bar"}},"id":2}"#)
//! );
//! ```

mod args;
mod builder;
mod dispatcher;
mod fault;
mod metrics;
mod middleware;
mod procedure;
mod registry;

pub use args::Args;
pub use builder::DispatcherBuilder;
pub use dispatcher::{Dispatcher, Outcome};
pub use fault::Fault;
pub use metrics::DispatchMetrics;
pub use middleware::{
    CallContext, LoggingMiddleware, MetricsMiddleware, Middleware, MiddlewareAction,
    MiddlewareChain,
};
pub use procedure::{from_fn, from_typed_fn, FnProcedure, Procedure, ProcedureResult};
pub use registry::Registry;

// Re-export core types so procedures only need this crate
pub use jrd_core::{Error, Id, JsonRpcErrorData, JsonRpcResponse, Params, Result};
