//! The rewrite pipeline of Tirage.
//!
//! Turns the token stream of a model function into an equivalent function
//! whose variables carry the identifier they are assigned to. The pipeline is
//! a linear state machine with four stages and no way back:
//!
//! ```text
//! tokens --decompile--> Decompiled --parse--> Parsed
//!        --transform / skip_transform--> Transformed --recompile--> Recompiled
//! ```
//!
//! Each stage type is only constructible from its predecessor, so stages can
//! be neither skipped nor repeated. `decompile` works lexically (shape checks
//! and metadata, no parsing); `parse` produces the one `syn::ItemFn` the
//! stream must contain and validates its signature; `transform` runs the
//! [`autoname`] visitor; `recompile` re-serializes the tree and fails loudly
//! if it no longer contains the function it started from.
//!
//! Failures use the taxonomy of [`tirage_err`]: `Unsupported` for shapes the
//! pipeline refuses, `NoSource` for bodies it cannot retrieve, and
//! `MalformedTransform` for trees the transform corrupted (a pipeline defect,
//! never swallowed).

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

use proc_macro2::{Delimiter, TokenStream, TokenTree};
use quote::ToTokens;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::ItemFn;

use tirage_err as err;

pub mod autoname;

/// Words that start an item the pipeline refuses before even parsing.
const REJECTED_QUALIFIERS: [&str; 4] = ["async", "const", "unsafe", "extern"];

/// Output of the decompile stage: raw tokens plus the lexical metadata the
/// later stages check against.
pub struct Decompiled {
    /// The unparsed item tokens.
    tokens: TokenStream,
    /// Function name, raw-identifier prefix stripped.
    name: String,
    /// Whether the name was a raw identifier (`r#...`).
    raw: bool,
    /// Line the name token starts on (0 when the span backend has no lines).
    line: usize,
}

/// Lexical stage: shape-check the item and extract metadata without parsing.
///
/// Rejects closures, `async`/`const`/`unsafe`/`extern` functions and
/// non-function items as `Unsupported`, and functions with no body as
/// `NoSource`.
///
/// # Errors
/// `Unsupported` or `NoSource` as described above.
pub fn decompile(tokens: TokenStream) -> err::Result<Decompiled> {
    let mut iter = tokens.clone().into_iter().peekable();

    // Outer attributes (including doc comments) ride along untouched.
    loop {
        let leading_hash =
            matches!(iter.peek(), Some(TokenTree::Punct(punct)) if punct.as_char() == '#');
        if !leading_hash {
            break;
        }
        iter.next();
        let attr_body = matches!(
            iter.peek(),
            Some(TokenTree::Group(group)) if group.delimiter() == Delimiter::Bracket
        );
        if attr_body {
            iter.next();
        } else {
            return Err(err::unsupported("expected an attribute after `#`", None));
        }
    }

    // Visibility.
    if matches!(iter.peek(), Some(TokenTree::Ident(ident)) if ident == "pub") {
        iter.next();
        let scope = matches!(
            iter.peek(),
            Some(TokenTree::Group(group)) if group.delimiter() == Delimiter::Parenthesis
        );
        if scope {
            iter.next();
        }
    }

    // The `fn` keyword, or something we refuse to process.
    match iter.next() {
        None => {
            return Err(err::unsupported(
                "there is nothing here to turn into a model",
                None,
            ))
        }
        Some(TokenTree::Punct(punct)) if punct.as_char() == '|' => {
            return Err(err::unsupported(
                "closures are not supported as model functions",
                Some(punct.span()),
            )
            .with_note("write a standalone `fn` item instead", None));
        }
        Some(TokenTree::Ident(ident)) if ident == "move" => {
            return Err(err::unsupported(
                "closures are not supported as model functions",
                Some(ident.span()),
            )
            .with_note("write a standalone `fn` item instead", None));
        }
        Some(TokenTree::Ident(ident))
            if REJECTED_QUALIFIERS.iter().any(|kw| ident == kw) =>
        {
            return Err(err::unsupported(
                format!("`{ident}` functions are not supported as model functions"),
                Some(ident.span()),
            ));
        }
        Some(TokenTree::Ident(ident)) if ident == "fn" => {}
        Some(other) => {
            return Err(err::unsupported(
                "the `model` attribute only applies to plain `fn` items",
                Some(other.span()),
            ));
        }
    }

    // The function name carries the metadata we keep.
    let (name, raw, line) = match iter.next() {
        Some(TokenTree::Ident(ident)) => {
            let text = ident.to_string();
            let raw = text.starts_with("r#");
            let name = text.trim_start_matches("r#").to_owned();
            (name, raw, ident.span().start().line)
        }
        other => {
            return Err(err::unsupported(
                "expected a function name after `fn`",
                other.map(|tt| tt.span()),
            ));
        }
    };

    // Somewhere after the signature there must be a braced body.
    let has_body = iter.any(|tt| match tt {
        TokenTree::Group(group) => group.delimiter() == Delimiter::Brace,
        _ => false,
    });
    if !has_body {
        return Err(err::no_source(
            format!("function `{name}` has no retrievable body"),
            None,
        ));
    }

    Ok(Decompiled {
        tokens,
        name,
        raw,
        line,
    })
}

impl Decompiled {
    /// Function name, raw prefix stripped.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the function name is a raw identifier.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// Starting line of the function name.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Syntactic stage: parse the tokens into exactly one function definition
    /// and validate its signature.
    ///
    /// # Errors
    /// `Unsupported` when the tokens do not reduce to a single plain function.
    pub fn parse(self) -> err::Result<Parsed> {
        let func = parse_snippet(self.tokens)?;
        validate_signature(&func)?;
        Ok(Parsed {
            func,
            name: self.name,
            raw: self.raw,
            line: self.line,
        })
    }
}

/// Parse a token stream that is either a bare `fn` item or a statement-context
/// snippet around one (stray semicolons and the like). Snippets are wrapped in
/// a throwaway block which is then peeled off.
fn parse_snippet(tokens: TokenStream) -> err::Result<ItemFn> {
    if let Ok(func) = syn::parse2::<ItemFn>(tokens.clone()) {
        return Ok(func);
    }
    let wrapped = quote::quote!({ #tokens });
    let block: syn::Block = syn::parse2(wrapped).map_err(|parse_err| {
        err::unsupported(
            format!("cannot parse model function: {parse_err}"),
            Some(parse_err.span()),
        )
    })?;
    let mut found: Option<ItemFn> = None;
    for stmt in block.stmts {
        match stmt {
            syn::Stmt::Item(syn::Item::Fn(func)) => {
                if found.is_some() {
                    return Err(err::unsupported(
                        "expected exactly one function definition, found several",
                        Some(func.sig.ident.span()),
                    ));
                }
                found = Some(func);
            }
            // Empty statements left over from the snippet are discarded with
            // the wrapper.
            syn::Stmt::Expr(syn::Expr::Verbatim(rest), _) if rest.is_empty() => {}
            other => {
                return Err(err::unsupported(
                    "unexpected statement alongside the function definition",
                    Some(other.span()),
                ));
            }
        }
    }
    found.ok_or_else(|| err::unsupported("expected a function definition", None))
}

/// Reject the signature shapes the runtime cannot evaluate.
fn validate_signature(func: &ItemFn) -> err::Result<()> {
    let sig = &func.sig;
    if !sig.generics.params.is_empty() {
        return Err(err::unsupported(
            "generic model functions are not supported",
            Some(sig.generics.span()),
        ));
    }
    if let Some(where_clause) = &sig.generics.where_clause {
        return Err(err::unsupported(
            "`where` clauses are not supported on model functions",
            Some(where_clause.span()),
        ));
    }
    for input in &sig.inputs {
        if let syn::FnArg::Receiver(receiver) = input {
            return Err(err::unsupported(
                "methods are not supported as model functions",
                Some(receiver.span()),
            )
            .with_note("move the model to a free function", None));
        }
    }
    if let Some(variadic) = &sig.variadic {
        return Err(err::unsupported(
            "variadic functions are not supported as model functions",
            Some(variadic.span()),
        ));
    }
    if let syn::ReturnType::Type(_, ty) = &sig.output {
        return Err(err::unsupported(
            "model functions must not declare a return type",
            Some(ty.span()),
        )
        .with_note(
            "a model function only constructs random variables; a return value would be discarded",
            None,
        ));
    }
    Ok(())
}

/// Output of the parse stage: one validated function definition.
pub struct Parsed {
    /// The parsed function.
    func: ItemFn,
    /// Name recorded at decompile time.
    name: String,
    /// Raw-identifier flag recorded at decompile time.
    raw: bool,
    /// Line recorded at decompile time.
    line: usize,
}

impl Parsed {
    /// Run the auto-name visitor over the function body.
    #[must_use]
    pub fn transform(self) -> Transformed {
        use syn::visit_mut::VisitMut;
        let mut visitor = autoname::AutoName::default();
        let mut func = self.func;
        visitor.visit_item_fn_mut(&mut func);
        Transformed {
            func,
            name: self.name,
            raw: self.raw,
            line: self.line,
            rewrites: visitor.rewrites,
        }
    }

    /// Pass the function through unchanged (auto-naming disabled).
    #[must_use]
    pub fn skip_transform(self) -> Transformed {
        Transformed {
            func: self.func,
            name: self.name,
            raw: self.raw,
            line: self.line,
            rewrites: 0,
        }
    }
}

/// Output of the transform stage.
pub struct Transformed {
    /// The (possibly rewritten) function.
    func: ItemFn,
    /// Name recorded at decompile time.
    name: String,
    /// Raw-identifier flag recorded at decompile time.
    raw: bool,
    /// Line recorded at decompile time.
    line: usize,
    /// How many initializers the visitor rewrote.
    rewrites: usize,
}

impl Transformed {
    /// How many `let` initializers received a `.named(...)` call.
    #[must_use]
    pub fn rewrites(&self) -> usize {
        self.rewrites
    }

    /// Serialize the tree back to tokens and check that it still contains the
    /// function we started from, at the same name and starting line, with its
    /// raw-identifier prefix intact.
    ///
    /// # Errors
    /// `MalformedTransform` when any of those checks fail; this indicates a
    /// defect in the transform, not in the user's function.
    pub fn recompile(self) -> err::Result<Recompiled> {
        let tokens = self.func.to_token_stream();
        let func: ItemFn = syn::parse2(tokens).map_err(|parse_err| {
            err::malformed_transform(
                format!("transformed tree no longer parses as a function: {parse_err}"),
                Some(parse_err.span()),
            )
        })?;
        let ident = &func.sig.ident;
        if ident.unraw().to_string() != self.name {
            return Err(err::malformed_transform(
                format!(
                    "expected function `{}` after the transform, found `{}`",
                    self.name, ident
                ),
                Some(ident.span()),
            ));
        }
        let line = ident.span().start().line;
        if self.line != 0 && line != 0 && line != self.line {
            return Err(err::malformed_transform(
                format!(
                    "function `{}` moved from line {} to line {} during the transform",
                    self.name, self.line, line
                ),
                Some(ident.span()),
            ));
        }
        if self.raw && !ident.to_string().starts_with("r#") {
            return Err(err::malformed_transform(
                format!("raw-identifier prefix of `{}` was lost", self.name),
                Some(ident.span()),
            ));
        }
        Ok(Recompiled { func })
    }
}

/// Output of the whole pipeline: a function ready to be wrapped.
pub struct Recompiled {
    /// The rewritten, re-validated function.
    func: ItemFn,
}

impl Recompiled {
    /// Hand the function over to the caller.
    #[must_use]
    pub fn into_fn(self) -> ItemFn {
        self.func
    }
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::parse_quote;
    use tirage_err::Kind;

    use super::*;

    /// Full pipeline with the transform enabled, unwrapping every stage.
    fn auto_name(tokens: TokenStream) -> ItemFn {
        decompile(tokens)
            .unwrap()
            .parse()
            .unwrap()
            .transform()
            .recompile()
            .unwrap()
            .into_fn()
    }

    fn text(func: &ItemFn) -> String {
        func.to_token_stream().to_string()
    }

    #[test]
    fn decompile_rejects_closures() {
        for tokens in [quote!(|| 0), quote!(move |x| x + 1), quote!(|x: f64| {})] {
            let err = decompile(tokens).err().unwrap();
            assert_eq!(err.kind(), Kind::Unsupported);
        }
    }

    #[test]
    fn decompile_rejects_qualified_functions() {
        for tokens in [
            quote!(async fn f() {}),
            quote!(const fn f() {}),
            quote!(unsafe fn f() {}),
            quote!(extern "C" fn f() {}),
        ] {
            let err = decompile(tokens).err().unwrap();
            assert_eq!(err.kind(), Kind::Unsupported);
        }
    }

    #[test]
    fn decompile_rejects_non_functions() {
        let err = decompile(quote!(struct Flat;)).err().unwrap();
        assert_eq!(err.kind(), Kind::Unsupported);
    }

    #[test]
    fn decompile_requires_a_body() {
        let err = decompile(quote!(fn signature_only();)).err().unwrap();
        assert_eq!(err.kind(), Kind::NoSource);
    }

    #[test]
    fn decompile_extracts_metadata() {
        let dec = decompile(quote!(#[inline] pub(crate) fn r#loop() {})).unwrap();
        assert_eq!(dec.name(), "loop");
        assert!(dec.is_raw());
    }

    #[test]
    fn parse_rejects_generics_receivers_and_return_types() {
        let cases = [
            quote!(fn f<T>(x: T) {}),
            quote!(fn f(&self) {}),
            quote!(fn f() -> f64 { 0.0 }),
        ];
        for tokens in cases {
            let err = decompile(tokens).unwrap().parse().err().unwrap();
            assert_eq!(err.kind(), Kind::Unsupported);
        }
    }

    #[test]
    fn parse_peels_snippet_wrappers() {
        let parsed = decompile(quote!(fn f() {};)).unwrap().parse().unwrap();
        let func = parsed.skip_transform().recompile().unwrap().into_fn();
        let expected: ItemFn = parse_quote!(fn f() {});
        assert_eq!(text(&func), text(&expected));
    }

    #[test]
    fn transform_names_simple_bindings() {
        let func = auto_name(quote! {
            fn m() {
                let a = normal(0.0, 1.0);
                let mut b = Normal::new(1.0, 2.0).heavy_tailed();
                let c: f64 = width();
            }
        });
        let expected: ItemFn = parse_quote! {
            fn m() {
                let a = normal(0.0, 1.0).named("a");
                let mut b = Normal::new(1.0, 2.0).heavy_tailed().named("b");
                let c: f64 = width().named("c");
            }
        };
        assert_eq!(text(&func), text(&expected));
    }

    #[test]
    fn transform_counts_rewrites() {
        let transformed = decompile(quote! {
            fn m() {
                let a = normal();
                let b = 5.0;
            }
        })
        .unwrap()
        .parse()
        .unwrap()
        .transform();
        assert_eq!(transformed.rewrites(), 1);
    }

    #[test]
    fn transform_skips_explicitly_named_calls() {
        let original = quote! {
            fn m() {
                let a = normal().named("alpha");
                let b = named("beta", normal());
            }
        };
        let func = auto_name(original.clone());
        let expected: ItemFn = syn::parse2(original).unwrap();
        assert_eq!(text(&func), text(&expected));
    }

    #[test]
    fn transform_leaves_destructuring_alone() {
        let original = quote! {
            fn m() {
                let (a, b) = pair();
                let Wrapper { x } = build();
                let _ = effect();
                let t = value + 1.0;
            }
        };
        let func = auto_name(original.clone());
        let expected: ItemFn = syn::parse2(original).unwrap();
        assert_eq!(text(&func), text(&expected));
    }

    #[test]
    fn transform_recurses_into_closures_but_not_items() {
        let func = auto_name(quote! {
            fn m() {
                let f = |k: usize| {
                    let inner = normal();
                };
                fn helper() {
                    let untouched = normal();
                }
            }
        });
        let expected: ItemFn = parse_quote! {
            fn m() {
                let f = |k: usize| {
                    let inner = normal().named("inner");
                };
                fn helper() {
                    let untouched = normal();
                }
            }
        };
        assert_eq!(text(&func), text(&expected));
    }

    #[test]
    fn transform_unraws_binding_names() {
        let func = auto_name(quote! {
            fn m() {
                let r#type = normal();
            }
        });
        let expected: ItemFn = parse_quote! {
            fn m() {
                let r#type = normal().named("type");
            }
        };
        assert_eq!(text(&func), text(&expected));
    }

    #[test]
    fn round_trip_without_transform_is_identity() {
        let original = quote! {
            pub fn m(points: Vec<f64>) {
                let a = normal(0.0, 1.0);
                for p in &points {
                    observe(p);
                }
            }
        };
        let func = decompile(original.clone())
            .unwrap()
            .parse()
            .unwrap()
            .skip_transform()
            .recompile()
            .unwrap()
            .into_fn();
        let expected: ItemFn = syn::parse2(original).unwrap();
        assert_eq!(text(&func), text(&expected));
    }

    #[test]
    fn recompile_detects_a_renamed_function() {
        let parsed = decompile(quote!(fn m() {})).unwrap().parse().unwrap();
        let mut transformed = parsed.skip_transform();
        transformed.name = "somebody_else".to_owned();
        let err = transformed.recompile().err().unwrap();
        assert_eq!(err.kind(), Kind::MalformedTransform);
    }

    #[test]
    fn recompile_detects_a_lost_raw_prefix() {
        let parsed = decompile(quote!(fn plain() {})).unwrap().parse().unwrap();
        let mut transformed = parsed.skip_transform();
        transformed.raw = true;
        let err = transformed.recompile().err().unwrap();
        assert_eq!(err.kind(), Kind::MalformedTransform);
    }

    #[test]
    fn dependent_calls_are_named_in_order() {
        let func = auto_name(quote! {
            fn regression(xs: Vec<f64>) {
                let slope = Normal::new(0.0, 1.0);
                let intercept = Normal::new(0.0, 10.0);
                let noise = HalfNormal::new(1.0);
            }
        });
        let expected: ItemFn = parse_quote! {
            fn regression(xs: Vec<f64>) {
                let slope = Normal::new(0.0, 1.0).named("slope");
                let intercept = Normal::new(0.0, 10.0).named("intercept");
                let noise = HalfNormal::new(1.0).named("noise");
            }
        };
        assert_eq!(text(&func), text(&expected));
    }
}
