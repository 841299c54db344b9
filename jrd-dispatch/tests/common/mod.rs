//! Shared helpers for jrd-dispatch integration tests

#![allow(dead_code)]

use jrd_dispatch::Dispatcher;
use serde_json::{json, Value};

/// Respond to a request that must produce a response, parsed back to JSON
pub fn reply(dispatcher: &Dispatcher, raw: &str) -> Value {
    let text = dispatcher
        .respond(raw)
        .expect("respond should not signal an error")
        .expect("request should produce a response");
    serde_json::from_str(&text).expect("response must be valid JSON")
}

/// Request text for `method` with `params` and id 1
pub fn call(method: &str, params: Value) -> String {
    json!({"jsonrpc": "2.0", "method": method, "params": params, "id": 1}).to_string()
}
