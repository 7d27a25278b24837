//! The `#[model]` attribute of the Tirage suite.
//!
//! Applied to a plain function, the attribute replaces it with a constructor
//! of the same name, visibility and arguments that returns a
//! [`ModelTemplate`](https://docs.rs/tirage) instead of executing the body.
//! The body is moved into a closure that the runtime re-executes under
//! capture contexts: once at configuration time to discover the model's
//! variables, and once per log-probability evaluation to rebind them.
//!
//! ```
//! use tirage::prelude::*;
//!
//! #[model(auto_name)]
//! fn pair() {
//!     let location = Normal::new(0.0, 1.0);
//!     let spread = Normal::new(location.value(), 2.0);
//! }
//!
//! let model = pair().configure();
//! assert_eq!(model.variable_names(), ["location", "spread"]);
//! ```
//!
//! With `auto_name`, the rewrite pipeline of `tirage-syn` runs first and tags
//! every qualifying `let` binding with the identifier it is assigned to. The
//! body is re-executed for every evaluation, so it must not consume its
//! arguments (the closure is `Fn`, and the compiler will say so otherwise).
//!
//! Options:
//! - `auto_name`: run the auto-name rewrite (off by default);
//! - `trace`, `trace(stderr)`, `trace(stdout)`: print one line per captured
//!   variable during evaluations.

#![warn(
    missing_docs,
    unused_crate_dependencies,
    clippy::pedantic,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::missing_docs_in_private_items,
    clippy::panic,
    clippy::str_to_string,
    clippy::unreachable,
    clippy::unwrap_used,
    clippy::use_debug
)]

use proc_macro2::{Span, TokenStream};
use quote::quote_spanned;

mod options;
mod pipeline;

// Dependencies of the trybuild suite: silence the "unused dependencies" lint.
#[cfg(test)]
mod integration_deps {
    use tirage as _;
    use tirage_std as _;
    use trybuild as _;
}

/// Turn a plain function into a model-template constructor.
///
/// See the crate documentation for the accepted options.
#[proc_macro_attribute]
pub fn model(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    match pipeline::expand(attr.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(error) => render(error).into(),
    }
}

/// Render an error as `compile_error!` invocations at the recorded spans.
fn render(error: tirage_err::Error) -> TokenStream {
    let mut out = TokenStream::new();
    for (msg, span) in error.elements() {
        let span = span.unwrap_or_else(Span::call_site);
        out.extend(quote_spanned!(span=> ::core::compile_error!(#msg);));
    }
    out
}
