//! Procedural macros for the jrd JSON-RPC dispatcher
//!
//! # Available Macros
//!
//! ## `#[procedure]` - JSON-RPC Procedure Function
//!
//! Turns a plain synchronous function into a procedure factory. The
//! function's parameter names become the procedure's declared parameters, so
//! the same function answers both positional and named calls:
//!
//! ```ignore
//! use jrd_dispatch::{Dispatcher, Fault};
//! use jrd_macros::procedure;
//!
//! #[procedure]
//! fn subtract(minuend: i64, subtrahend: i64) -> Result<i64, Fault> {
//!     Ok(minuend - subtrahend)
//! }
//!
//! let dispatcher = Dispatcher::new();
//! dispatcher.provide(subtract());
//!
//! // [42, 23] and {"subtrahend": 23, "minuend": 42} both yield 19
//! ```
//!
//! Each argument is deserialized with `Args::arg`; a missing argument reads
//! as `null`, so `Option<T>` parameters make it optional. An argument that
//! does not fit its type is an invalid params error (-32602).
//!
//! The return type is either `Result<T, E>` with `E: Into<Fault>`, or any
//! serializable `T`.

mod procedure;

use proc_macro::TokenStream;
use syn::{parse_macro_input, ItemFn};

/// Attribute macro for defining JSON-RPC procedures
///
/// Replaces the function with a factory of the same name returning
/// `Box<dyn jrd_dispatch::Procedure>`. The procedure is registered under the
/// function name unless `#[procedure(name = "...")]` gives another one.
///
/// # Requirements
///
/// - Not `async`, not generic, no `self` receiver
/// - Every parameter is a plain identifier whose type implements
///   `DeserializeOwned`
/// - The return value (or the `Ok` value of a `Result`) implements `Serialize`
///
/// # Example
///
/// ```ignore
/// #[procedure(name = "math.add")]
/// fn add(a: i64, b: Option<i64>) -> i64 {
///     a + b.unwrap_or(0)
/// }
///
/// dispatcher.provide(add());
/// ```
#[proc_macro_attribute]
pub fn procedure(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut args = procedure::ProcedureArgs::default();
    let parser = syn::meta::parser(|meta| args.parse_meta(meta));
    parse_macro_input!(attr with parser);

    let input_fn = parse_macro_input!(item as ItemFn);

    procedure::procedure_impl(args, input_fn)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
