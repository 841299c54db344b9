//! Codec for JSON-RPC request decoding and response encoding
//!
//! This module turns raw request text into a validated [`JsonRpcRequest`] and
//! turns responses back into text.
//!
//! # Why a Codec Module?
//!
//! serde alone cannot express the JSON-RPC 2.0 request rules: which check
//! fails first decides the error code *and* the id of the error response, so
//! the envelope is decoded into a `serde_json::Value` and validated member by
//! member, in this order:
//!
//! 1. Text must parse, and the top-level value must be an object → `-32700`
//! 2. `jsonrpc` must be exactly the string `"2.0"` → `-32600`
//! 3. `method` must be present and a string → `-32600`
//! 4. `id`, if present, must be a string, number or null → `-32600`, id `null`
//! 5. `params`, if present, must be an array or object → `-32600`
//!
//! The first failing check wins and later checks never run.
//!
//! # The id of a rejected request
//!
//! A [`Rejection`] records which id the error response must carry. Parse
//! errors and ids of an illegal type answer with `null`. From step 2 on, the
//! request's own id is used when it is legal, and a request without an `id`
//! member is a notification (`Rejection::id == None`), which must not be
//! answered at all.
//!
//! # Examples
//!
//! ```rust
//! use jrd_core::{codec, Id, INVALID_REQUEST};
//!
//! let rejection = codec::decode_request(r#"{"jsonrpc":"1.0","method":"ping","id":3}"#).unwrap_err();
//! assert_eq!(rejection.error.code, INVALID_REQUEST);
//! assert_eq!(rejection.id, Some(Id::from(3i64)));
//! ```

use crate::error::{Error, JsonRpcErrorData, Result};
use crate::types::{Id, JsonRpcRequest, JsonRpcResponse, Params};
use serde::Serialize;
use serde_json::Value;

/// The only protocol version accepted in the `jsonrpc` member
pub const JSONRPC_VERSION: &str = "2.0";

/// A request that failed envelope validation
///
/// Carries the wire error and the id the error response must use. `id` is
/// `None` when the request is a notification and must not be answered.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct Rejection {
    /// The protocol error for this request
    pub error: JsonRpcErrorData,
    /// The id to answer with, or `None` for a notification
    pub id: Option<Id>,
}

impl Rejection {
    /// Create a new rejection
    pub fn new(error: JsonRpcErrorData, id: Option<Id>) -> Self {
        Self { error, id }
    }

    /// Reject input whose id cannot be determined (answered with `id: null`)
    fn unidentified(error: JsonRpcErrorData) -> Self {
        Self::new(error, Some(Id::Null))
    }

    /// Check if the rejected request was a notification
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Encode any serializable message to a JSON string
///
/// # Errors
///
/// Returns `Error::Serialization` if the message cannot be serialized to JSON.
pub fn encode<T: Serialize>(msg: &T) -> Result<String> {
    serde_json::to_string(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Encode a JSON-RPC response to JSON
///
/// # Examples
///
/// ```rust
/// use jrd_core::{codec, JsonRpcResponse, Id};
/// use serde_json::json;
///
/// let response = JsonRpcResponse::success(json!(42), Id::from(1i64));
/// let json = codec::encode_response(&response).unwrap();
/// assert_eq!(json, r#"{"jsonrpc":"2.0","result":42,"id":1}"#);
/// ```
pub fn encode_response(resp: &JsonRpcResponse) -> Result<String> {
    encode(resp)
}

/// Decode and validate a single JSON-RPC 2.0 request
///
/// Runs the envelope checks described in the module documentation, in order.
/// Members other than `jsonrpc`, `method`, `id` and `params` are ignored.
///
/// # Errors
///
/// Returns a [`Rejection`] with the error of the first failing check and the
/// id the error response must carry.
///
/// # Examples
///
/// ```rust
/// use jrd_core::{codec, Id, PARSE_ERROR};
///
/// let rejection = codec::decode_request("[1, 2]").unwrap_err();
/// assert_eq!(rejection.error.code, PARSE_ERROR);
/// assert_eq!(rejection.id, Some(Id::Null));
///
/// let request = codec::decode_request(r#"{"jsonrpc":"2.0","method":"tick"}"#).unwrap();
/// assert!(request.is_notification());
/// ```
pub fn decode_request(data: &str) -> std::result::Result<JsonRpcRequest, Rejection> {
    let value: Value = serde_json::from_str(data)
        .map_err(|_e| Rejection::unidentified(JsonRpcErrorData::parse_error()))?;

    // Arrays and scalars can't even be inspected for a method
    let Value::Object(mut object) = value else {
        return Err(Rejection::unidentified(JsonRpcErrorData::parse_error()));
    };

    // Id used by the envelope checks below: the request's own id when it is
    // of a legal type, null otherwise, and no id at all for a notification
    let reply_to = object
        .get("id")
        .map(|id| Id::from_value(id).unwrap_or(Id::Null));

    match object.get("jsonrpc") {
        Some(Value::String(version)) if version == JSONRPC_VERSION => {}
        _ => {
            return Err(Rejection::new(
                JsonRpcErrorData::invalid_request("jsonrpc must be exactly \"2.0\""),
                reply_to,
            ))
        }
    }

    let method = match object.remove("method") {
        Some(Value::String(method)) => method,
        _ => {
            return Err(Rejection::new(
                JsonRpcErrorData::invalid_request("method must be a string"),
                reply_to,
            ))
        }
    };

    let id = match object.remove("id") {
        None => None,
        Some(raw) => match Id::from_value(&raw) {
            Some(id) => Some(id),
            None => {
                return Err(Rejection::unidentified(JsonRpcErrorData::invalid_request(
                    "id must be a string, number, or null",
                )))
            }
        },
    };

    let params = match object.remove("params") {
        None => None,
        Some(raw) => match Params::from_value(raw) {
            Some(params) => Some(params),
            None => {
                return Err(Rejection::new(
                    JsonRpcErrorData::invalid_request("params must be an array or an object"),
                    id,
                ))
            }
        },
    };

    Ok(JsonRpcRequest {
        jsonrpc: JSONRPC_VERSION.to_string(),
        method,
        params,
        id,
    })
}
