//! Line-oriented dispatcher example
//!
//! Reads one JSON-RPC request per line from stdin and writes each response on
//! its own line to stdout. Notifications produce no output.
//!
//! Run with: cargo run --example stdio_dispatch
//!
//! Then type, for example:
//!
//! ```text
//! {"jsonrpc":"2.0","method":"subtract","params":{"subtrahend":23,"minuend":42},"id":1}
//! {"jsonrpc":"2.0","method":"stats","params":[[1,2,3,4]],"id":2}
//! {"jsonrpc":"2.0","method":"log","params":["hello"]}
//! ```

use jrd::dispatch::{from_typed_fn, LoggingMiddleware};
use jrd::{procedure, Dispatcher, Fault};
use serde::Serialize;
use serde_json::json;
use std::io::{self, BufRead, Write};

#[procedure]
fn subtract(minuend: i64, subtrahend: i64) -> i64 {
    minuend - subtrahend
}

#[procedure(name = "divide")]
fn checked_divide(dividend: f64, divisor: f64) -> Result<f64, Fault> {
    if divisor == 0.0 {
        return Err(Fault::new("Division by zero")
            .with_code(-32000)
            .with_data(json!({"dividend": dividend})));
    }
    Ok(dividend / divisor)
}

#[procedure]
fn log(message: String) {
    tracing::info!(%message, "Client log");
}

#[derive(Serialize)]
struct Stats {
    count: usize,
    sum: f64,
    mean: Option<f64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(io::stderr)
        .init();

    let dispatcher = Dispatcher::builder()
        .procedure(subtract())
        .procedure(checked_divide())
        .procedure(log())
        .procedure(from_typed_fn("stats", &["values"], |(values,): (Vec<f64>,)| {
            let sum: f64 = values.iter().sum();
            Ok(Stats {
                count: values.len(),
                sum,
                mean: (!values.is_empty()).then(|| sum / values.len() as f64),
            })
        }))
        .use_middleware(LoggingMiddleware::new())
        .build();

    tracing::info!(procedures = ?dispatcher.procedures(), "Ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match dispatcher.respond(&line) {
            Ok(Some(reply)) => writeln!(stdout, "{}", reply)?,
            Ok(None) => {}
            Err(e) if e.is_notification() => {
                tracing::warn!(error = %e, "Notification failed");
            }
            Err(e) => return Err(e.into()),
        }
        stdout.flush()?;
    }

    Ok(())
}
