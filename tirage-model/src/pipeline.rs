//! From attribute invocation to generated constructor.
//!
//! The heavy lifting lives in `tirage-syn`; this module only sequences the
//! stages and wraps the recompiled function into a `ModelTemplate`
//! constructor. The stage types make it impossible to run them out of order
//! or to skip one, so a full expansion necessarily goes
//! decompile → parse → transform → recompile → wrap.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemFn;

use tirage_err as err;

use crate::options::{self, Options, TraceOpt};

/// Run the rewrite pipeline and generate the wrapper.
pub fn expand(attr: TokenStream, item: TokenStream) -> err::Result<TokenStream> {
    let opts = options::parse(attr)?;
    let parsed = tirage_syn::decompile(item)?.parse()?;
    let transformed = if opts.auto_name {
        parsed.transform()
    } else {
        parsed.skip_transform()
    };
    let func = transformed.recompile()?.into_fn();
    Ok(wrap(opts, func))
}

/// Replace the function with a constructor of the same name returning a
/// configured `ModelTemplate`. The body moves into a `move` closure so the
/// function's arguments are bound by capture and the runtime can re-execute
/// the body at will.
fn wrap(opts: Options, func: ItemFn) -> TokenStream {
    let ItemFn {
        attrs,
        vis,
        mut sig,
        block,
    } = func;
    sig.output = syn::parse_quote!(-> ::tirage::ModelTemplate);
    let auto_name = opts.auto_name;
    let trace = match opts.trace {
        TraceOpt::Off => quote!(Off),
        TraceOpt::Stderr => quote!(Stderr),
        TraceOpt::Stdout => quote!(Stdout),
    };
    quote! {
        #(#attrs)*
        #vis #sig {
            ::tirage::ModelTemplate::new(move || #block)
                .auto_named(#auto_name)
                .traced(::tirage::Trace::#trace)
        }
    }
}
