//! End-to-end tests for `Dispatcher::respond`

use jrd_core::{
    Error, JsonRpcErrorData, INTERNAL_ERROR, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
};
use jrd_dispatch::{from_fn, Args, Dispatcher, Fault};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

mod common;
use common::reply;

/// Dispatcher with the procedures used across these tests
fn dispatcher() -> Dispatcher {
    let dispatcher = Dispatcher::new();

    dispatcher.provide(from_fn("foo", &[], |_args: Args| Ok::<_, Fault>("bar")));
    dispatcher.provide(from_fn("args", &["first", "second"], |args: Args| {
        Ok::<_, Fault>(args.to_value())
    }));
    dispatcher.provide(from_fn("throw_string", &[], |_args: Args| -> Result<Value, Fault> {
        Err("OHNOES".into())
    }));
    dispatcher.provide(from_fn("throw_error", &[], |_args: Args| -> Result<Value, Fault> {
        Err(Fault::new("OHNOES"))
    }));
    dispatcher.provide(from_fn("throw_coded", &[], |_args: Args| -> Result<Value, Fault> {
        Err(Fault::new("OHNOES").with_code(-32001))
    }));
    dispatcher.provide(from_fn("throw_data", &[], |_args: Args| -> Result<Value, Fault> {
        Err(Fault::new("OHNOES").with_data(json!({"foo": "bar"})))
    }));
    dispatcher.provide(from_fn("throw_value", &["thrown"], |args: Args| -> Result<Value, Fault> {
        Err(Fault::from_value(args.get(0).cloned().unwrap_or(Value::Null)))
    }));

    dispatcher
}

fn error_code(response: &Value) -> i64 {
    response["error"]["code"].as_i64().expect("error code")
}

/// Build a request object with `jsonrpc` set to an arbitrary value
fn with_version(version: Value) -> String {
    json!({"jsonrpc": version, "method": "foo", "id": 1}).to_string()
}

#[test]
fn test_malformed_input_is_parse_error() {
    let dispatcher = dispatcher();

    for raw in ["", "   ", "{", "{\"jsonrpc\":", "not json", "{'a': 1}", "[1, 2, 3]", "[]", "\"string\"", "42", "null", "true"] {
        let response = reply(&dispatcher, raw);
        assert_eq!(error_code(&response), PARSE_ERROR as i64, "input: {:?}", raw);
        assert_eq!(response["id"], Value::Null, "input: {:?}", raw);
        assert!(response.get("result").is_none());
    }
}

#[test]
fn test_version_must_be_string_2_0() {
    let dispatcher = dispatcher();

    for version in [
        json!("1.0"),
        json!("2"),
        json!("2.0 "),
        json!(2.0),
        json!(2),
        json!({}),
        json!(["2.0"]),
        Value::Null,
        json!(true),
    ] {
        let response = reply(&dispatcher, &with_version(version.clone()));
        assert_eq!(error_code(&response), INVALID_REQUEST as i64, "version: {}", version);
        assert_eq!(response["id"], json!(1));
    }

    let response = reply(&dispatcher, r#"{"method":"foo","id":1}"#);
    assert_eq!(error_code(&response), INVALID_REQUEST as i64);
}

#[test]
fn test_bad_version_wins_over_missing_method() {
    let dispatcher = dispatcher();
    let response = reply(&dispatcher, r#"{"jsonrpc":"1.0","id":"x"}"#);

    assert_eq!(error_code(&response), INVALID_REQUEST as i64);
    assert_eq!(response["id"], json!("x"));
}

#[test]
fn test_bad_version_with_illegal_id_reports_null_id() {
    let dispatcher = dispatcher();
    let response = reply(&dispatcher, r#"{"jsonrpc":"1.0","method":"foo","id":[1]}"#);

    assert_eq!(error_code(&response), INVALID_REQUEST as i64);
    assert_eq!(response["id"], Value::Null);
}

#[test]
fn test_method_must_be_string() {
    let dispatcher = dispatcher();

    let response = reply(&dispatcher, r#"{"jsonrpc":"2.0","id":1}"#);
    assert_eq!(error_code(&response), INVALID_REQUEST as i64);

    for method in [json!(1), json!(null), json!(true), json!([]), json!({})] {
        let raw = json!({"jsonrpc": "2.0", "method": method, "id": 1}).to_string();
        let response = reply(&dispatcher, &raw);
        assert_eq!(error_code(&response), INVALID_REQUEST as i64, "method: {}", method);
        assert_eq!(response["id"], json!(1));
    }
}

#[test]
fn test_illegal_id_types_report_null_id() {
    let dispatcher = dispatcher();

    for id in [json!({}), json!({"a": 1}), json!([]), json!([1]), json!(true), json!(false)] {
        let raw = json!({"jsonrpc": "2.0", "method": "foo", "id": id}).to_string();
        let response = reply(&dispatcher, &raw);
        assert_eq!(error_code(&response), INVALID_REQUEST as i64, "id: {}", id);
        assert_eq!(response["id"], Value::Null, "id: {}", id);
    }
}

#[test]
fn test_legal_ids_are_echoed() {
    let dispatcher = dispatcher();

    for id in [json!(1), json!(-7), json!(1.5), json!("abc"), json!(""), Value::Null] {
        let raw = json!({"jsonrpc": "2.0", "method": "foo", "id": id}).to_string();
        let response = reply(&dispatcher, &raw);
        assert_eq!(response["result"], json!("bar"));
        assert_eq!(response["id"], id);
    }
}

#[test]
fn test_large_numeric_id_is_preserved() {
    let dispatcher = dispatcher();
    let text = dispatcher
        .respond(r#"{"jsonrpc":"2.0","method":"foo","id":18446744073709551615}"#)
        .unwrap()
        .unwrap();

    assert!(text.ends_with(r#""id":18446744073709551615}"#), "{}", text);
}

#[test]
fn test_scalar_params_are_invalid() {
    let dispatcher = dispatcher();

    for params in [json!("a"), json!(true), json!(false), Value::Null, json!(0), json!(1.5)] {
        let raw = json!({"jsonrpc": "2.0", "method": "foo", "params": params, "id": 9}).to_string();
        let response = reply(&dispatcher, &raw);
        assert_eq!(error_code(&response), INVALID_REQUEST as i64, "params: {}", params);
        assert_eq!(response["id"], json!(9));
    }
}

#[test]
fn test_unknown_method() {
    let dispatcher = dispatcher();
    let response = reply(&dispatcher, r#"{"jsonrpc":"2.0","id":1,"method":"bar"}"#);

    assert_eq!(error_code(&response), METHOD_NOT_FOUND as i64);
    assert_eq!(response["id"], json!(1));
}

#[test]
fn test_unknown_members_are_ignored() {
    let dispatcher = dispatcher();
    let response = reply(&dispatcher, r#"{"jsonrpc":"2.0","method":"foo","id":1,"extra":[1]}"#);
    assert_eq!(response["result"], json!("bar"));
}

#[test]
fn test_positional_params_pass_through() {
    let dispatcher = dispatcher();

    let response = reply(&dispatcher, r#"{"jsonrpc":"2.0","method":"args","params":[1,2,3],"id":1}"#);
    assert_eq!(response["result"], json!([1, 2, 3]));

    let response = reply(&dispatcher, r#"{"jsonrpc":"2.0","method":"args","params":[1],"id":1}"#);
    assert_eq!(response["result"], json!([1]));

    let response = reply(&dispatcher, r#"{"jsonrpc":"2.0","method":"args","params":[],"id":1}"#);
    assert_eq!(response["result"], json!([]));
}

#[test]
fn test_absent_params_bind_no_arguments() {
    let dispatcher = dispatcher();
    let response = reply(&dispatcher, r#"{"jsonrpc":"2.0","method":"args","id":1}"#);
    assert_eq!(response["result"], json!([]));
}

#[test]
fn test_named_params_bind_by_declared_order() {
    let dispatcher = dispatcher();

    let response = reply(
        &dispatcher,
        r#"{"jsonrpc":"2.0","method":"args","params":{"second":42,"third":0,"first":23},"id":1}"#,
    );
    assert_eq!(response["result"], json!([23, 42]));

    // A missing name binds a missing slot, rendered here as null
    let response = reply(
        &dispatcher,
        r#"{"jsonrpc":"2.0","method":"args","params":{"second":42},"id":1}"#,
    );
    assert_eq!(response["result"], json!([null, 42]));
}

#[test]
fn test_return_values_are_results() {
    let dispatcher = Dispatcher::new();
    dispatcher.provide(from_fn("identity", &["value"], |args: Args| {
        Ok::<_, Fault>(args.get(0).cloned().unwrap_or(Value::Null))
    }));

    for value in [
        Value::Null,
        json!(false),
        json!(true),
        json!(0),
        json!(""),
        json!([]),
        json!([1, "two", null]),
        json!({}),
        json!({"nested": {"deep": [1]}}),
    ] {
        let raw = json!({"jsonrpc": "2.0", "method": "identity", "params": [value], "id": 1}).to_string();
        let response = reply(&dispatcher, &raw);
        assert_eq!(response["result"], value);
        assert!(response.get("error").is_none());
        assert!(response.as_object().unwrap().contains_key("result"));
    }
}

#[test]
fn test_response_text_shape() {
    let dispatcher = dispatcher();

    let text = dispatcher
        .respond(r#"{"jsonrpc":"2.0","method":"foo","id":"a"}"#)
        .unwrap();
    assert_eq!(text.as_deref(), Some(r#"{"jsonrpc":"2.0","result":"bar","id":"a"}"#));

    let text = dispatcher
        .respond(r#"{"jsonrpc":"2.0","method":"throw_string","id":2}"#)
        .unwrap();
    assert_eq!(
        text.as_deref(),
        Some(r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"OHNOES"},"id":2}"#)
    );
}

#[test]
fn test_successful_notification_has_no_output() {
    let dispatcher = dispatcher();

    assert_eq!(dispatcher.respond(r#"{"jsonrpc":"2.0","method":"foo"}"#).unwrap(), None);
    assert_eq!(
        dispatcher
            .respond(r#"{"jsonrpc":"2.0","method":"args","params":{"first":1}}"#)
            .unwrap(),
        None
    );
}

#[test]
fn test_failed_notification_signals_matching_error() {
    let dispatcher = dispatcher();

    let cases = [
        (r#"{"jsonrpc":"1.0","method":"foo"}"#, r#"{"jsonrpc":"1.0","method":"foo","id":1}"#),
        (r#"{"jsonrpc":"2.0"}"#, r#"{"jsonrpc":"2.0","id":1}"#),
        (r#"{"jsonrpc":"2.0","method":"foo","params":"x"}"#, r#"{"jsonrpc":"2.0","method":"foo","params":"x","id":1}"#),
        (r#"{"jsonrpc":"2.0","method":"bar"}"#, r#"{"jsonrpc":"2.0","method":"bar","id":1}"#),
        (r#"{"jsonrpc":"2.0","method":"throw_coded"}"#, r#"{"jsonrpc":"2.0","method":"throw_coded","id":1}"#),
    ];

    for (notification, request) in cases {
        let signal = match dispatcher.respond(notification) {
            Err(Error::Notification(error)) => error,
            other => panic!("expected notification signal for {}, got {:?}", notification, other),
        };

        let response = reply(&dispatcher, request);
        let expected: JsonRpcErrorData = serde_json::from_value(response["error"].clone()).unwrap();
        assert_eq!(signal, expected, "notification: {}", notification);
    }
}

#[test]
fn test_notification_signal_helpers() {
    let dispatcher = dispatcher();
    let error = dispatcher
        .respond(r#"{"jsonrpc":"2.0","method":"throw_string"}"#)
        .unwrap_err();

    assert!(error.is_notification());
    assert_eq!(error.to_error_data().code, INTERNAL_ERROR);
    assert_eq!(error.to_error_data().message, "OHNOES");
}

#[test]
fn test_plain_failure_is_internal_error() {
    let dispatcher = dispatcher();
    let response = reply(&dispatcher, r#"{"jsonrpc":"2.0","method":"throw_string","id":1}"#);

    assert_eq!(error_code(&response), INTERNAL_ERROR as i64);
    assert_eq!(response["error"]["message"], json!("OHNOES"));
    assert!(response["error"].get("data").is_none());
    assert!(response.get("result").is_none());
}

#[test]
fn test_structured_failure_without_code_is_internal_error() {
    let dispatcher = dispatcher();
    let response = reply(&dispatcher, r#"{"jsonrpc":"2.0","method":"throw_error","id":1}"#);

    assert_eq!(error_code(&response), INTERNAL_ERROR as i64);
    assert_eq!(response["error"]["message"], json!("OHNOES"));
}

#[test]
fn test_structured_failure_keeps_code() {
    let dispatcher = dispatcher();
    let response = reply(&dispatcher, r#"{"jsonrpc":"2.0","method":"throw_coded","id":1}"#);

    assert_eq!(error_code(&response), -32001);
    assert_eq!(response["error"]["message"], json!("OHNOES"));
}

#[test]
fn test_structured_failure_keeps_data() {
    let dispatcher = dispatcher();
    let response = reply(&dispatcher, r#"{"jsonrpc":"2.0","method":"throw_data","id":1}"#);

    assert_eq!(error_code(&response), INTERNAL_ERROR as i64);
    assert_eq!(response["error"]["data"], json!({"foo": "bar"}));
}

#[test]
fn test_failures_carried_as_values() {
    let dispatcher = dispatcher();

    let response = reply(
        &dispatcher,
        r#"{"jsonrpc":"2.0","method":"throw_value","params":[{"message":"OHNOES","code":-32001,"data":{"foo":"bar"}}],"id":1}"#,
    );
    assert_eq!(
        response["error"],
        json!({"code": -32001, "message": "OHNOES", "data": {"foo": "bar"}})
    );

    let response = reply(
        &dispatcher,
        r#"{"jsonrpc":"2.0","method":"throw_value","params":["OHNOES"],"id":1}"#,
    );
    assert_eq!(response["error"], json!({"code": -32603, "message": "OHNOES"}));

    let response = reply(
        &dispatcher,
        r#"{"jsonrpc":"2.0","method":"throw_value","params":[42],"id":1}"#,
    );
    assert_eq!(response["error"], json!({"code": -32603, "message": "42"}));
}

#[test]
fn test_reregistration_replaces() {
    let dispatcher = dispatcher();
    dispatcher.provide(from_fn("foo", &[], |_args: Args| Ok::<_, Fault>("baz")));

    let response = reply(&dispatcher, r#"{"jsonrpc":"2.0","method":"foo","id":1}"#);
    assert_eq!(response["result"], json!("baz"));
}

#[test]
fn test_procedure_state_persists_across_calls() {
    let dispatcher = Dispatcher::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    dispatcher.provide(from_fn("record", &["entry"], move |args: Args| {
        let entry: String = args.arg(0)?;
        let mut seen = sink.lock().unwrap();
        seen.push(entry);
        Ok::<_, Fault>(seen.len())
    }));

    assert_eq!(
        dispatcher.respond(r#"{"jsonrpc":"2.0","method":"record","params":["a"]}"#).unwrap(),
        None
    );
    let response = reply(&dispatcher, r#"{"jsonrpc":"2.0","method":"record","params":{"entry":"b"},"id":1}"#);

    assert_eq!(response["result"], json!(2));
    assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
}
