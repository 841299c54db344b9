//! `#[procedure]` attribute implementation
//!
//! # Macro Expansion Process
//!
//! 1. **Parse**: the attribute arguments (`name = "..."`) and the function
//! 2. **Extract**: parameter names and types in declaration order
//! 3. **Nest**: keep the original function, unchanged, inside a factory
//! 4. **Wrap**: build the procedure with `from_fn`, reading each parameter
//!    with `Args::arg` and converting the return value
//!
//! # Code Generation Example
//!
//! Input:
//! ```ignore
//! #[procedure]
//! fn subtract(minuend: i64, subtrahend: i64) -> Result<i64, Fault> {
//!     Ok(minuend - subtrahend)
//! }
//! ```
//!
//! Generated output:
//! ```ignore
//! fn subtract() -> Box<dyn jrd_dispatch::Procedure> {
//!     fn subtract(minuend: i64, subtrahend: i64) -> Result<i64, Fault> {
//!         Ok(minuend - subtrahend)
//!     }
//!
//!     jrd_dispatch::from_fn("subtract", &["minuend", "subtrahend"], |__jrd_args| {
//!         let __jrd_arg0 = __jrd_args.arg::<i64>(0)?;
//!         let __jrd_arg1 = __jrd_args.arg::<i64>(1)?;
//!         subtract(__jrd_arg0, __jrd_arg1).map_err(Into::<jrd_dispatch::Fault>::into)
//!     })
//! }
//! ```

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{FnArg, Ident, ItemFn, LitStr, Pat, ReturnType, Type};

/// Parsed `#[procedure(...)]` arguments
#[derive(Default)]
pub struct ProcedureArgs {
    pub name: Option<LitStr>,
}

impl ProcedureArgs {
    /// Parse one `key = value` entry
    pub fn parse_meta(&mut self, meta: syn::meta::ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("name") {
            self.name = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported procedure attribute, expected `name = \"...\"`"))
        }
    }
}

/// Expand `#[procedure]` on `input_fn`
pub fn procedure_impl(args: ProcedureArgs, input_fn: ItemFn) -> syn::Result<TokenStream> {
    let sig = &input_fn.sig;

    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "procedures are synchronous; remove `async`",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "procedures cannot be generic",
        ));
    }

    let fn_name = &sig.ident;
    let fn_vis = &input_fn.vis;
    let fn_attrs = &input_fn.attrs;

    let procedure_name = match args.name {
        Some(name) => name,
        None => LitStr::new(&fn_name.unraw().to_string(), fn_name.span()),
    };

    let mut bindings: Vec<(Ident, &Type)> = Vec::new();
    for input in &sig.inputs {
        match input {
            FnArg::Typed(pat_type) => match pat_type.pat.as_ref() {
                Pat::Ident(pat_ident) if pat_ident.subpat.is_none() => {
                    bindings.push((pat_ident.ident.clone(), pat_type.ty.as_ref()));
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "procedure parameters must be plain identifiers",
                    ))
                }
            },
            FnArg::Receiver(receiver) => {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "procedures cannot take `self`",
                ))
            }
        }
    }

    let param_names: Vec<LitStr> = bindings
        .iter()
        .map(|(ident, _)| LitStr::new(&ident.unraw().to_string(), ident.span()))
        .collect();

    // Locals never reuse the user's parameter names, which could shadow the
    // inner function
    let args_ident = format_ident!("__jrd_args");
    let locals: Vec<Ident> = (0..bindings.len())
        .map(|index| format_ident!("__jrd_arg{}", index))
        .collect();
    let reads = bindings
        .iter()
        .zip(&locals)
        .enumerate()
        .map(|(index, ((_, ty), local))| {
            quote! {
                let #local = #args_ident.arg::<#ty>(#index)?;
            }
        });

    let call = quote! { #fn_name(#(#locals),*) };
    let result = if returns_result(&sig.output) {
        quote! {
            #call.map_err(::core::convert::Into::<::jrd_dispatch::Fault>::into)
        }
    } else {
        quote! {
            ::core::result::Result::Ok::<_, ::jrd_dispatch::Fault>(#call)
        }
    };

    Ok(quote! {
        #(#fn_attrs)*
        #fn_vis fn #fn_name() -> ::std::boxed::Box<dyn ::jrd_dispatch::Procedure> {
            #input_fn

            ::jrd_dispatch::from_fn(
                #procedure_name,
                &[#(#param_names),*],
                |#args_ident: ::jrd_dispatch::Args| {
                    #(#reads)*
                    #result
                },
            )
        }
    })
}

/// Whether the declared return type is spelled `Result<..>` (any path)
fn returns_result(output: &ReturnType) -> bool {
    match output {
        ReturnType::Default => false,
        ReturnType::Type(_, ty) => match ty.as_ref() {
            Type::Path(type_path) => type_path
                .path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == "Result"),
            _ => false,
        },
    }
}
