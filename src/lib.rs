//! JRD - JSON-RPC 2.0 Request Dispatcher
//!
//! This is the main convenience crate that re-exports all jrd sub-crates.
//! Use it if you want a single dependency for defining procedures and
//! answering requests.
//!
//! # Architecture
//!
//! jrd is organized into modular crates:
//!
//! - **jrd-core**: Core types, envelope validation, error handling, observability
//! - **jrd-dispatch**: Procedure registry, argument binding, middleware, dispatcher
//! - **jrd-macros**: The `#[procedure]` attribute
//!
//! The dispatcher is transport-agnostic: it takes one request text and
//! returns at most one response text. Reading requests from a socket, a pipe
//! or an HTTP body is left to the application.
//!
//! # Quick Start
//!
//! ```rust
//! use jrd::{procedure, Dispatcher};
//!
//! #[procedure]
//! fn subtract(minuend: i64, subtrahend: i64) -> i64 {
//!     minuend - subtrahend
//! }
//!
//! let dispatcher = Dispatcher::new();
//! dispatcher.provide(subtract());
//!
//! let reply = dispatcher
//!     .respond(r#"{"jsonrpc":"2.0","method":"subtract","params":[42,23],"id":1}"#)
//!     .unwrap();
//! assert_eq!(reply.as_deref(), Some(r#"{"jsonrpc":"2.0","result":19,"id":1}"#));
//! ```

// Re-export all public APIs from sub-crates
pub use jrd_core as core;
pub use jrd_dispatch as dispatch;
pub use jrd_macros as macros;

// Convenience re-exports of the most commonly used items
pub use jrd_dispatch::{Dispatcher, Fault};
pub use jrd_macros::procedure;
