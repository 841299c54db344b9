//! Tests for procedures defined with `#[procedure]`

use jrd_dispatch::{Dispatcher, Fault};
use jrd_macros::procedure;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

mod common;
use common::{call, reply};

#[procedure]
fn subtract(minuend: i64, subtrahend: i64) -> i64 {
    minuend - subtrahend
}

#[procedure(name = "math.divide")]
fn divide(dividend: f64, divisor: f64) -> Result<f64, Fault> {
    if divisor == 0.0 {
        return Err(Fault::new("Division by zero").with_code(-32000));
    }
    Ok(dividend / divisor)
}

#[procedure]
fn greet(name: String, greeting: Option<String>) -> String {
    format!("{}, {}!", greeting.unwrap_or_else(|| "Hello".to_string()), name)
}

#[procedure]
fn fail(reason: String) -> Result<(), String> {
    Err(reason)
}

#[procedure]
fn nothing() {}

#[procedure]
fn count(count: i64) -> i64 {
    count + 1
}

#[derive(Deserialize, Serialize)]
struct Point {
    x: i64,
    y: i64,
}

#[procedure]
fn translate(point: Point, dx: i64, dy: i64) -> Point {
    Point {
        x: point.x + dx,
        y: point.y + dy,
    }
}

#[procedure]
fn r#type(r#in: Value) -> Value {
    r#in
}

fn dispatcher() -> Dispatcher {
    Dispatcher::builder()
        .procedure(subtract())
        .procedure(divide())
        .procedure(greet())
        .procedure(fail())
        .procedure(nothing())
        .procedure(translate())
        .procedure(r#type())
        .procedure(count())
        .build()
}

#[test]
fn test_declared_names_and_params() {
    let procedure = subtract();
    assert_eq!(procedure.name(), "subtract");
    assert_eq!(procedure.params(), ["minuend", "subtrahend"]);

    assert_eq!(divide().name(), "math.divide");
    assert!(nothing().params().is_empty());

    let raw = r#type();
    assert_eq!(raw.name(), "type");
    assert_eq!(raw.params(), ["in"]);
}

#[test]
fn test_positional_and_named_calls_agree() {
    let dispatcher = dispatcher();

    let positional = reply(&dispatcher, &call("subtract", json!([42, 23])));
    let named = reply(&dispatcher, &call("subtract", json!({"subtrahend": 23, "minuend": 42})));

    assert_eq!(positional["result"], json!(19));
    assert_eq!(named["result"], json!(19));
}

#[test]
fn test_missing_argument_reads_as_null() {
    let dispatcher = dispatcher();

    let response = reply(&dispatcher, &call("greet", json!({"name": "Ada"})));
    assert_eq!(response["result"], json!("Hello, Ada!"));

    let response = reply(&dispatcher, &call("greet", json!(["Ada", "Hi"])));
    assert_eq!(response["result"], json!("Hi, Ada!"));
}

#[test]
fn test_argument_type_mismatch_is_invalid_params() {
    let dispatcher = dispatcher();

    let response = reply(&dispatcher, &call("subtract", json!(["42", 23])));
    assert_eq!(response["error"]["code"], json!(-32602));

    // A required argument that is missing cannot be read as null
    let response = reply(&dispatcher, &call("subtract", json!({"minuend": 1})));
    assert_eq!(response["error"]["code"], json!(-32602));
}

#[test]
fn test_result_errors_are_converted() {
    let dispatcher = dispatcher();

    let response = reply(&dispatcher, &call("math.divide", json!([1.0, 0.0])));
    assert_eq!(response["error"], json!({"code": -32000, "message": "Division by zero"}));

    let response = reply(&dispatcher, &call("math.divide", json!({"dividend": 9.0, "divisor": 2.0})));
    assert_eq!(response["result"], json!(4.5));

    let response = reply(&dispatcher, &call("fail", json!(["OHNOES"])));
    assert_eq!(response["error"], json!({"code": -32603, "message": "OHNOES"}));
}

#[test]
fn test_unit_return_is_null_result() {
    let dispatcher = dispatcher();
    let response = reply(&dispatcher, r#"{"jsonrpc":"2.0","method":"nothing","id":5}"#);

    assert_eq!(response, json!({"jsonrpc": "2.0", "result": null, "id": 5}));
}

#[test]
fn test_structured_arguments() {
    let dispatcher = dispatcher();
    let response = reply(&dispatcher, &call("translate", json!({"point": {"x": 1, "y": 2}, "dx": 10, "dy": 20})));

    assert_eq!(response["result"], json!({"x": 11, "y": 22}));
}

#[test]
fn test_raw_identifiers() {
    let dispatcher = dispatcher();
    let response = reply(&dispatcher, &call("type", json!({"in": [true]})));
    assert_eq!(response["result"], json!([true]));
}

#[test]
fn test_parameter_sharing_the_function_name() {
    let dispatcher = dispatcher();
    assert_eq!(count().params(), ["count"]);

    let response = reply(&dispatcher, &call("count", json!({"count": 41})));
    assert_eq!(response["result"], json!(42));
}
