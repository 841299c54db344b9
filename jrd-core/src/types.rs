//! JSON-RPC 2.0 message types
//!
//! This module implements the data structures a request dispatcher needs from
//! the JSON-RPC 2.0 specification (https://www.jsonrpc.org/specification):
//!
//! - **Id**: the request identifier echoed back in responses
//! - **Params**: positional (array) or named (object) arguments
//! - **JsonRpcRequest**: a request that passed envelope validation
//! - **JsonRpcResponse**: the result of processing a request (success or error)
//!
//! # Notifications
//!
//! A request without an `id` member is a notification. Note that an explicit
//! `"id": null` is *not* a notification; it is a request whose id is null.
//! This is why `JsonRpcRequest::id` is an `Option<Id>` while `Id` itself has
//! a `Null` variant.

use crate::error::JsonRpcErrorData;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// JSON-RPC 2.0 request ID
///
/// In JSON-RPC 2.0 an ID can be a string, number, or null.
///
/// # Implementation Notes
///
/// Numbers are kept as `serde_json::Number`, so any integer in the `i64` or
/// `u64` range (`18446744073709551615` included) and ordinary floats such as
/// `1.5` are echoed back unchanged. Other numbers come back in serde_json's
/// canonical float form: `-0` as `-0.0`, `1e2` as `100.0`.
///
/// This enum uses `#[serde(untagged)]` to serialize directly as the inner value
/// without a type discriminator, as JSON-RPC 2.0 requires.
///
/// # Examples
///
/// ```rust
/// use jrd_core::Id;
///
/// let id1: Id = "req-123".into();
/// let id2: Id = 42i64.into();
///
/// assert_eq!(id1.to_string(), "\"req-123\"");
/// assert_eq!(id2.to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// String identifier
    String(String),
    /// Numeric identifier, integer or floating point
    Number(Number),
    /// Null identifier; also used when the request id could not be determined
    Null,
}

impl Id {
    /// Read an id from a decoded JSON value
    ///
    /// Returns `None` when the value is not a legal id type (object, array
    /// or boolean).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Id::String(s.clone())),
            Value::Number(n) => Some(Id::Number(n.clone())),
            Value::Null => Some(Id::Null),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for Id {
    /// Format the ID in a JSON-like representation: strings quoted, numbers
    /// as-is, null as "null"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::String(s) => write!(f, "\"{}\"", s),
            Id::Number(n) => write!(f, "{}", n),
            Id::Null => write!(f, "null"),
        }
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n.into())
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        Id::Number(n.into())
    }
}

impl From<Id> for Value {
    fn from(id: Id) -> Self {
        match id {
            Id::String(s) => Value::String(s),
            Id::Number(n) => Value::Number(n),
            Id::Null => Value::Null,
        }
    }
}

/// Parameters of a JSON-RPC request
///
/// JSON-RPC 2.0 allows `params` to be either an array (arguments by position) or
/// an object (arguments by name). Any other JSON type is an invalid request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Params {
    /// Positional parameters, passed to the procedure in order
    Positional(Vec<Value>),
    /// Named parameters, matched against the procedure's declared names
    Named(Map<String, Value>),
}

impl Params {
    /// Read params from a decoded JSON value
    ///
    /// Returns `None` for scalars (string, number, boolean, null).
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(values) => Some(Params::Positional(values)),
            Value::Object(map) => Some(Params::Named(map)),
            _ => None,
        }
    }

    /// Number of supplied parameters
    pub fn len(&self) -> usize {
        match self {
            Params::Positional(values) => values.len(),
            Params::Named(map) => map.len(),
        }
    }

    /// Check if no parameters were supplied
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Params::Positional(values)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params::Named(map)
    }
}

/// JSON-RPC 2.0 request message that passed envelope validation
///
/// Instances are produced by [`crate::codec::decode_request`], which enforces
/// the envelope rules in a fixed order. By construction:
/// - `jsonrpc` is exactly "2.0"
/// - `method` is a string
/// - `id`, when present, is a string, number or null
/// - `params`, when present, is an array or object
///
/// # Examples
///
/// ```rust
/// use jrd_core::{codec, Id, Params};
///
/// let request = codec::decode_request(r#"{"jsonrpc":"2.0","method":"sum","params":[1,2],"id":7}"#).unwrap();
/// assert_eq!(request.method, "sum");
/// assert_eq!(request.id, Some(Id::from(7i64)));
/// assert!(matches!(request.params, Some(Params::Positional(_))));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version - always "2.0"
    pub jsonrpc: String,
    /// Name of the procedure to invoke
    pub method: String,
    /// Optional parameters to pass to the procedure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
    /// Request identifier; `None` marks a notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
}

impl JsonRpcRequest {
    /// Check if this request is a notification (no `id` member)
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 response message
///
/// A response contains either a result (success) or an error (failure), but
/// never both.
///
/// # Protocol Rules
///
/// - `result`: Required on success, must not exist on error
/// - `error`: Required on error, must not exist on success
/// - `id`: Must match the `id` from the corresponding request
///
/// If there was an error detecting the request `id` (e.g. invalid JSON),
/// the response will use `Id::Null`.
///
/// A successful `null` result is still a result: `success(Value::Null, ..)`
/// serializes as `"result":null`.
///
/// # Examples
///
/// ```rust
/// use jrd_core::{JsonRpcResponse, JsonRpcErrorData, Id};
/// use serde_json::json;
///
/// let success = JsonRpcResponse::success(json!({"value": 42}), Id::from(1i64));
/// assert!(success.is_success());
///
/// let error = JsonRpcResponse::error(
///     JsonRpcErrorData::method_not_found("unknownMethod"),
///     Id::from(2i64),
/// );
/// assert!(error.is_error());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version - always "2.0"
    pub jsonrpc: String,
    /// The result of the method invocation (present only on success)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub result: Option<Value>,
    /// Error information (present only on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorData>,
    /// Request ID from the original request, `Id::Null` if it couldn't be determined
    pub id: Id,
}

/// Treat a present `result` member as `Some`, even when it is JSON `null`
fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl JsonRpcResponse {
    /// Create a successful JSON-RPC 2.0 response
    pub fn success(result: Value, id: Id) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error JSON-RPC 2.0 response
    ///
    /// Use `Id::Null` if the request ID couldn't be determined.
    pub fn error(error: JsonRpcErrorData, id: Id) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// Check if the response represents a successful result
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Check if the response represents an error
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_display() {
        assert_eq!(Id::String("test".to_string()).to_string(), "\"test\"");
        assert_eq!(Id::from(42i64).to_string(), "42");
        assert_eq!(Id::Null.to_string(), "null");
    }

    #[test]
    fn test_id_from_value() {
        assert_eq!(Id::from_value(&json!("abc")), Some(Id::from("abc")));
        assert_eq!(Id::from_value(&json!(7)), Some(Id::from(7i64)));
        assert_eq!(Id::from_value(&Value::Null), Some(Id::Null));
        assert_eq!(Id::from_value(&json!(true)), None);
        assert_eq!(Id::from_value(&json!([1])), None);
        assert_eq!(Id::from_value(&json!({"a": 1})), None);
    }

    #[test]
    fn test_float_id_is_echoed_verbatim() {
        let id = Id::from_value(&json!(1.5)).unwrap();
        assert_eq!(Value::from(id), json!(1.5));
    }

    #[test]
    fn test_numeric_id_text_form() {
        let echo = |text: &str| {
            let value: Value = serde_json::from_str(text).unwrap();
            serde_json::to_string(&Id::from_value(&value).unwrap()).unwrap()
        };

        assert_eq!(echo("18446744073709551615"), "18446744073709551615");
        assert_eq!(echo("-9223372036854775808"), "-9223372036854775808");
        assert_eq!(echo("1.5"), "1.5");
        assert_eq!(echo("-0"), "-0.0");
        assert_eq!(echo("1e2"), "100.0");
    }

    #[test]
    fn test_params_from_value() {
        assert_eq!(
            Params::from_value(json!([1, 2])),
            Some(Params::Positional(vec![json!(1), json!(2)]))
        );
        assert!(matches!(
            Params::from_value(json!({"a": 1})),
            Some(Params::Named(_))
        ));
        for scalar in [json!("x"), json!(1), json!(false), Value::Null] {
            assert_eq!(Params::from_value(scalar), None);
        }
    }

    #[test]
    fn test_response_success() {
        let resp = JsonRpcResponse::success(json!({"status": "ok"}), Id::from(1i64));
        assert!(resp.is_success());
        assert!(!resp.is_error());
    }

    #[test]
    fn test_response_error_has_no_result() {
        let resp = JsonRpcResponse::error(JsonRpcErrorData::internal_error("test error"), Id::from(1i64));
        let value = serde_json::to_value(&resp).unwrap();

        assert!(resp.is_error());
        assert!(value.get("result").is_none());
        assert_eq!(value["error"]["code"], -32603);
    }

    #[test]
    fn test_null_result_is_serialized() {
        let resp = JsonRpcResponse::success(Value::Null, Id::Null);
        let json = serde_json::to_string(&resp).unwrap();

        assert_eq!(json, r#"{"jsonrpc":"2.0","result":null,"id":null}"#);

        let decoded: JsonRpcResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.result, Some(Value::Null));
        assert!(decoded.is_success());
    }
}
