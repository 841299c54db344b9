//! Core JSON-RPC 2.0 types and codec for jrd
//!
//! This crate provides the foundational pieces for processing JSON-RPC 2.0
//! requests. It includes:
//!
//! - **Types**: Request ids, parameters, validated requests and responses
//! - **Codec**: Ordered envelope validation and response encoding
//! - **Error handling**: Wire error objects, standard codes and the crate `Error`
//! - **Observability**: tracing subscriber and OpenTelemetry export setup
//!
//! # Architecture
//!
//! The crate is transport-agnostic: it turns text into a validated request and
//! a response back into text. The `jrd-dispatch` crate builds on it to look
//! up procedures, bind arguments and frame responses.
//!
//! # Example
//!
//! ```rust
//! use jrd_core::{codec, Id, JsonRpcResponse};
//!
//! let request = codec::decode_request(r#"{"jsonrpc":"2.0","method":"add","params":[5,3],"id":1}"#).unwrap();
//! assert_eq!(request.method, "add");
//!
//! let response = JsonRpcResponse::success(serde_json::json!(8), request.id.unwrap_or(Id::Null));
//! let json = codec::encode_response(&response).unwrap();
//! assert_eq!(json, r#"{"jsonrpc":"2.0","result":8,"id":1}"#);
//! ```

pub mod codec;
pub mod error;
pub mod observability;
pub mod types;

// Re-export the most commonly used types for convenience
pub use codec::Rejection;
pub use error::{
    Error, JsonRpcErrorData, Result, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    METHOD_NOT_FOUND, PARSE_ERROR,
};
pub use observability::{init_observability, shutdown_observability, ObservabilityConfig};
pub use types::{Id, JsonRpcRequest, JsonRpcResponse, Params};
