//! Procedure trait and function adapters
//!
//! A procedure is a named, synchronous callable with a declared list of
//! formal parameter names. The names are only used to bind named params; a
//! positional call passes its arguments through untouched.
//!
//! # Creating Procedures
//!
//! 1. **from_fn**: wrap a closure over the bound [`Args`]
//! 2. **from_typed_fn**: wrap a closure whose argument is deserialized from
//!    the bound arguments (a tuple or a struct, in declared order)
//! 3. **#[procedure] macro**: annotate a plain function (via jrd-macros)
//!
//! # Examples
//!
//! ```rust
//! use jrd_dispatch::{from_fn, from_typed_fn, Args, Fault};
//! use serde::Deserialize;
//!
//! let add = from_fn("add", &["a", "b"], |args: Args| {
//!     Ok::<_, Fault>(args.arg::<i64>(0)? + args.arg::<i64>(1)?)
//! });
//! assert_eq!(add.params(), ["a", "b"]);
//!
//! #[derive(Deserialize)]
//! struct Greeting { name: String }
//!
//! let greet = from_typed_fn("greet", &["name"], |g: Greeting| {
//!     Ok(format!("hello {}", g.name))
//! });
//! assert_eq!(greet.name(), "greet");
//! ```

use crate::args::Args;
use crate::fault::Fault;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Result of invoking a procedure
pub type ProcedureResult = Result<Value, Fault>;

/// A callable registered with a dispatcher
///
/// Procedures are shared across threads and may be invoked concurrently, so
/// any state they hold must use interior mutability.
pub trait Procedure: Send + Sync {
    /// Name the procedure is registered under
    fn name(&self) -> &str;

    /// Declared parameter names, in order
    fn params(&self) -> &[String] {
        &[]
    }

    /// Invoke the procedure
    ///
    /// `Ok` values become the response `result`, `null` and `false`
    /// included. A [`Fault`] becomes the response `error`.
    fn call(&self, args: Args) -> ProcedureResult;
}

type BoxedFn = Box<dyn Fn(Args) -> ProcedureResult + Send + Sync>;

/// Procedure backed by a closure
///
/// Built by [`from_fn`] and [`from_typed_fn`]; the return value has already
/// been converted to JSON by the time it leaves the closure.
pub struct FnProcedure {
    name: String,
    params: Vec<String>,
    func: BoxedFn,
}

impl Procedure for FnProcedure {
    fn name(&self) -> &str {
        &self.name
    }

    fn params(&self) -> &[String] {
        &self.params
    }

    fn call(&self, args: Args) -> ProcedureResult {
        (self.func)(args)
    }
}

impl std::fmt::Debug for FnProcedure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProcedure")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Create a procedure from a closure over the bound arguments
///
/// The closure's return value is serialized with `serde_json`; a value that
/// fails to serialize becomes an internal error fault.
pub fn from_fn<F, R>(name: impl Into<String>, params: &[&str], func: F) -> Box<dyn Procedure>
where
    F: Fn(Args) -> Result<R, Fault> + Send + Sync + 'static,
    R: Serialize,
{
    Box::new(FnProcedure {
        name: name.into(),
        params: params.iter().map(|param| param.to_string()).collect(),
        func: Box::new(move |args| {
            let value = func(args)?;
            serde_json::to_value(value).map_err(Fault::from)
        }),
    })
}

/// Create a procedure whose arguments are deserialized into `P`
///
/// The bound arguments are presented as a JSON array in declared order, with
/// missing slots as `null`, so `P` is usually a tuple or a struct whose fields
/// follow the declared parameter order. Arguments that do not fit `P` are an
/// invalid params fault.
pub fn from_typed_fn<P, R, F>(
    name: impl Into<String>,
    params: &[&str],
    func: F,
) -> Box<dyn Procedure>
where
    P: DeserializeOwned,
    R: Serialize,
    F: Fn(P) -> Result<R, Fault> + Send + Sync + 'static,
{
    from_fn(name, params, move |args: Args| {
        let typed: P = serde_json::from_value(args.to_value())
            .map_err(|e| Fault::invalid_params(format!("Invalid params: {}", e)))?;
        func(typed)
    })
}
