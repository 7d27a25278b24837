//! Parsing of the `#[model(...)]` option list.

use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Meta, Token};

use tirage_err as err;

/// Help line appended to every unknown-option error.
const VALID_OPTIONS: &str = "valid options: auto_name, trace, trace(stderr), trace(stdout)";

/// Where the generated template sends its evaluation trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceOpt {
    /// No tracing (the default).
    #[default]
    Off,
    /// One line per captured variable on standard error.
    Stderr,
    /// One line per captured variable on standard output.
    Stdout,
}

/// Configuration carried by one `#[model(...)]` invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Run the auto-name rewrite before wrapping.
    pub auto_name: bool,
    /// Trace destination threaded into the template.
    pub trace: TraceOpt,
}

/// Parse the attribute arguments.
pub fn parse(attr: TokenStream) -> err::Result<Options> {
    let parser = Punctuated::<Meta, Token![,]>::parse_terminated;
    let metas = syn::parse::Parser::parse2(parser, attr).map_err(|parse_err| {
        err::unsupported(
            format!("cannot parse `model` options: {parse_err}"),
            Some(parse_err.span()),
        )
        .with_note(VALID_OPTIONS, None)
    })?;

    let mut options = Options::default();
    for meta in metas {
        match &meta {
            Meta::Path(path) if path.is_ident("auto_name") => {
                options.auto_name = true;
            }
            Meta::Path(path) if path.is_ident("trace") => {
                options.trace = TraceOpt::Stderr;
            }
            Meta::List(list) if list.path.is_ident("trace") => {
                let target: syn::Ident = list.parse_args().map_err(|parse_err| {
                    err::unsupported(
                        format!("cannot parse `trace` target: {parse_err}"),
                        Some(parse_err.span()),
                    )
                    .with_note(VALID_OPTIONS, None)
                })?;
                options.trace = if target == "stderr" {
                    TraceOpt::Stderr
                } else if target == "stdout" {
                    TraceOpt::Stdout
                } else {
                    return Err(err::unsupported(
                        format!("unknown `trace` target `{target}`"),
                        Some(target.span()),
                    )
                    .with_note(VALID_OPTIONS, None));
                };
            }
            other => {
                return Err(err::unsupported(
                    format!("unknown `model` option `{}`", other.to_token_stream()),
                    Some(other.span()),
                )
                .with_note(VALID_OPTIONS, None));
            }
        }
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    #[test]
    fn defaults_are_off() {
        let options = parse(TokenStream::new()).unwrap();
        assert_eq!(options, Options::default());
        assert!(!options.auto_name);
        assert_eq!(options.trace, TraceOpt::Off);
    }

    #[test]
    fn accepts_every_documented_spelling() {
        assert!(parse(quote!(auto_name)).unwrap().auto_name);
        assert_eq!(parse(quote!(trace)).unwrap().trace, TraceOpt::Stderr);
        assert_eq!(parse(quote!(trace(stderr))).unwrap().trace, TraceOpt::Stderr);
        assert_eq!(parse(quote!(trace(stdout))).unwrap().trace, TraceOpt::Stdout);
        let combined = parse(quote!(auto_name, trace(stdout))).unwrap();
        assert!(combined.auto_name);
        assert_eq!(combined.trace, TraceOpt::Stdout);
    }

    #[test]
    fn rejects_unknown_options() {
        assert!(parse(quote!(outo_name)).is_err());
        assert!(parse(quote!(trace(syslog))).is_err());
        assert!(parse(quote!(auto_name = true)).is_err());
    }
}
