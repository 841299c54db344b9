//! Procedure failures and their JSON-RPC error classification
//!
//! A procedure signals failure by returning a [`Fault`]. The dispatcher turns
//! it into the `error` member of the response:
//!
//! - `code`: the fault's own code if it chose one, otherwise `-32603`
//! - `message`: copied verbatim
//! - `data`: copied verbatim if present
//!
//! Plain failures (a string, a `Display` error, a JSON scalar) carry only a
//! message, so they always surface as internal errors. A procedure that wants
//! a specific code or extra data builds a structured fault with
//! [`Fault::with_code`] and [`Fault::with_data`].
//!
//! # Examples
//!
//! ```rust
//! use jrd_dispatch::Fault;
//! use serde_json::json;
//!
//! let plain: Fault = "OHNOES".into();
//! assert_eq!(plain.into_error_data().code, -32603);
//!
//! let custom = Fault::new("OHNOES").with_code(-32001).with_data(json!({"foo": "bar"}));
//! let error = custom.into_error_data();
//! assert_eq!(error.code, -32001);
//! assert_eq!(error.data, Some(json!({"foo": "bar"})));
//! ```

use jrd_core::{Error, JsonRpcErrorData, INTERNAL_ERROR, INVALID_PARAMS};
use serde_json::Value;
use std::any::Any;

/// Failure returned by a procedure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct Fault {
    /// Error message, copied verbatim into the response
    pub message: String,
    /// Explicit JSON-RPC error code; `None` means internal error (-32603)
    pub code: Option<i32>,
    /// Extra error data, copied verbatim into the response
    pub data: Option<Value>,
}

impl Fault {
    /// Create a fault with a message and no explicit code
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            data: None,
        }
    }

    /// Set an explicit JSON-RPC error code
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach error data
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Create an invalid params fault (-32602)
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(message).with_code(INVALID_PARAMS)
    }

    /// Classify a failure carried as a JSON value
    ///
    /// An object with a string `message` member is structured: an integer
    /// `code` that fits in `i32` and a `data` member are kept. Anything else
    /// is a plain failure whose message is the string itself, or the JSON text
    /// for other values.
    ///
    /// ```rust
    /// use jrd_dispatch::Fault;
    /// use serde_json::json;
    ///
    /// let fault = Fault::from_value(json!({"message": "nope", "code": -32001}));
    /// assert_eq!(fault.code, Some(-32001));
    ///
    /// let fault = Fault::from_value(json!(42));
    /// assert_eq!(fault.message, "42");
    /// assert_eq!(fault.code, None);
    /// ```
    pub fn from_value(value: Value) -> Self {
        if let Value::Object(object) = &value {
            if let Some(Value::String(message)) = object.get("message") {
                return Self {
                    message: message.clone(),
                    code: object
                        .get("code")
                        .and_then(Value::as_i64)
                        .and_then(|code| i32::try_from(code).ok()),
                    data: object.get("data").cloned(),
                };
            }
        }

        match value {
            Value::String(message) => Self::new(message),
            other => Self::new(other.to_string()),
        }
    }

    /// Classify a panic payload caught while a procedure ran
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        if let Some(message) = payload.downcast_ref::<&str>() {
            Self::new(*message)
        } else if let Some(message) = payload.downcast_ref::<String>() {
            Self::new(message.clone())
        } else {
            Self::new("procedure panicked")
        }
    }

    /// Convert into the wire error object
    pub fn into_error_data(self) -> JsonRpcErrorData {
        JsonRpcErrorData {
            code: self.code.unwrap_or(INTERNAL_ERROR),
            message: self.message,
            data: self.data,
        }
    }
}

impl From<&str> for Fault {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for Fault {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<Value> for Fault {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl From<JsonRpcErrorData> for Fault {
    fn from(error: JsonRpcErrorData) -> Self {
        Self {
            message: error.message,
            code: Some(error.code),
            data: error.data,
        }
    }
}

impl From<Error> for Fault {
    fn from(error: Error) -> Self {
        error.to_error_data().into()
    }
}

impl From<serde_json::Error> for Fault {
    fn from(error: serde_json::Error) -> Self {
        Self::new(error.to_string())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for Fault {
    fn from(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::new(error.to_string())
    }
}

impl From<Fault> for JsonRpcErrorData {
    fn from(fault: Fault) -> Self {
        fault.into_error_data()
    }
}
