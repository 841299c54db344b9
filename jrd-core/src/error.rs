//! Error types for jrd
//!
//! This module provides error handling for JSON-RPC 2.0 request processing.
//! It defines two main error types:
//!
//! - **Error**: Application-level errors for internal use (uses thiserror)
//! - **JsonRpcErrorData**: Wire-format errors as defined by JSON-RPC 2.0
//!
//! # Error Hierarchy
//!
//! The `Error` enum covers the conditions that can occur while turning raw
//! request text into a response. The one variant callers must always look at
//! is `Error::Notification`: a notification that failed produces no response
//! text, so this variant is the only place its error is visible.
//!
//! # Standard Error Codes
//!
//! JSON-RPC 2.0 defines standard error codes:
//! - `-32700`: Parse error (invalid JSON, or a top-level value that is not an object)
//! - `-32600`: Invalid request (bad `jsonrpc`, `method`, `id` or `params`)
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//! - `-32000 to -32099`: Server error (implementation-defined)
//!
//! # Examples
//!
//! ```rust
//! use jrd_core::{Error, JsonRpcErrorData, METHOD_NOT_FOUND};
//!
//! let json_error = JsonRpcErrorData::method_not_found("unknownMethod");
//! assert_eq!(json_error.code, METHOD_NOT_FOUND);
//!
//! // A failed notification hands its error back instead of a response
//! let error = Error::Notification(json_error.clone());
//! assert!(error.is_notification());
//! assert_eq!(error.to_error_data(), json_error);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid JSON was received, or the top-level value was not an object
pub const PARSE_ERROR: i32 = -32700;
/// The JSON sent is not a valid Request object
pub const INVALID_REQUEST: i32 = -32600;
/// The method does not exist / is not available
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid method parameter(s)
pub const INVALID_PARAMS: i32 = -32602;
/// Internal JSON-RPC error, also the default for failing procedures
pub const INTERNAL_ERROR: i32 = -32603;

/// Result type for jrd operations
///
/// This is a convenience type alias that uses the jrd `Error` type.
pub type Result<T> = std::result::Result<T, Error>;

/// Application-level error type for jrd operations
///
/// Every variant can be turned into `JsonRpcErrorData` with
/// [`Error::to_error_data`].
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// JSON-RPC protocol error (already in wire format)
    #[error("JSON-RPC error: {0}")]
    JsonRpc(#[from] JsonRpcErrorData),

    /// A notification failed
    ///
    /// Notifications must never be answered, so the error that a request
    /// with an id would have received is handed back through this variant
    /// instead of being encoded. It is meant for logging and telemetry.
    #[error("Notification failed: {0}")]
    Notification(JsonRpcErrorData),

    /// Serialization or deserialization error
    ///
    /// Occurs when a result cannot be encoded as JSON. Maps to -32603.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Convert this error into its wire representation
    ///
    /// Wire errors (`JsonRpc`, `Notification`) are returned unchanged.
    pub fn to_error_data(&self) -> JsonRpcErrorData {
        match self {
            Error::JsonRpc(data) | Error::Notification(data) => data.clone(),
            Error::Serialization(msg) => JsonRpcErrorData::internal_error(msg.clone()),
        }
    }

    /// Returns true if this is the signal for a failed notification
    pub fn is_notification(&self) -> bool {
        matches!(self, Error::Notification(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// JSON-RPC 2.0 error object
///
/// This structure represents the exact wire format for JSON-RPC errors.
/// It appears in the `error` field of a `JsonRpcResponse`.
///
/// # Protocol Rules
///
/// In JSON-RPC 2.0, error objects MUST contain:
/// - `code`: An integer error code
/// - `message`: A short description of the error
///
/// And MAY contain:
/// - `data`: Additional information about the error
///
/// # Custom Error Codes
///
/// Procedures can report any integer code (see `Fault` in `jrd-dispatch`).
/// Codes from -32768 to -32000 are reserved by JSON-RPC 2.0.
///
/// # Examples
///
/// ```rust
/// use jrd_core::JsonRpcErrorData;
/// use serde_json::json;
///
/// // Standard error
/// let error = JsonRpcErrorData::method_not_found("calculate");
/// assert_eq!(error.code, -32601);
///
/// // Custom error with additional data
/// let custom = JsonRpcErrorData::with_data(
///     1001,
///     "Insufficient funds",
///     json!({"balance": 50, "required": 100})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorData {
    /// Numeric error code indicating the error type
    pub code: i32,

    /// Human-readable error message
    pub message: String,

    /// Optional additional error information
    ///
    /// Skipped on the wire when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcErrorData {
    /// Create a new JSON-RPC error with code and message
    ///
    /// Use the standard error factory methods (like `parse_error()`) for
    /// standard errors, or this constructor for custom application errors.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jrd_core::JsonRpcErrorData;
    ///
    /// let error = JsonRpcErrorData::new(-32000, "Database connection failed");
    /// ```
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create a new JSON-RPC error with additional data
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jrd_core::JsonRpcErrorData;
    /// use serde_json::json;
    ///
    /// let error = JsonRpcErrorData::with_data(
    ///     -32602,
    ///     "Invalid params",
    ///     json!({"missing": ["username", "password"]})
    /// );
    /// ```
    pub fn with_data(code: i32, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create a parse error (-32700)
    ///
    /// JSON-RPC 2.0: "Invalid JSON was received by the server. An error occurred
    /// on the server while parsing the JSON text."
    pub fn parse_error() -> Self {
        Self::new(PARSE_ERROR, "Parse error")
    }

    /// Create an invalid request error (-32600)
    ///
    /// JSON-RPC 2.0: "The JSON sent is not a valid Request object."
    ///
    /// # Arguments
    ///
    /// * `msg` - Specific reason why the request is invalid
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(INVALID_REQUEST, msg)
    }

    /// Create a method not found error (-32601)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jrd_core::JsonRpcErrorData;
    ///
    /// let error = JsonRpcErrorData::method_not_found("calculateFoo");
    /// assert_eq!(error.message, "Method not found: calculateFoo");
    /// ```
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {}", method.into()))
    }

    /// Create an invalid params error (-32602)
    ///
    /// The dispatcher never raises this code on its own; procedures and the
    /// typed adapters use it when arguments cannot be converted.
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, msg)
    }

    /// Create an internal error (-32603)
    ///
    /// This is also the code given to a failing procedure that did not
    /// choose one itself.
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, msg)
    }
}

impl std::fmt::Display for JsonRpcErrorData {
    /// Formats as "[code] message", e.g. "[-32601] Method not found: unknownMethod"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

// Implement std::error::Error so JsonRpcErrorData can be used with Result and ?
impl std::error::Error for JsonRpcErrorData {}
