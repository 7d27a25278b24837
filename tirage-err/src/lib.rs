//! Error messages of the Tirage suite.
//!
//! This crate defines the errors that the rewrite pipeline can produce while
//! turning a model function into a [`ModelTemplate`] constructor. All of them
//! are reported at macro expansion time; none is ever retried or recovered.
//!
//! An [`Error`] is a [`Kind`] plus a primary message with an optional [`Span`],
//! followed by any number of secondary notes. The `elements` accessor flattens
//! the whole thing into `(String, Option<Span>)` pairs, which is the shape the
//! proc-macro frontend wants for rendering.
//!
//! [`ModelTemplate`]: https://docs.rs/tirage

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

use std::fmt;

/// Where in the source an error points to.
pub type Span = proc_macro2::Span;

/// Outcome of a fallible pipeline stage.
pub type Result<T> = std::result::Result<T, Error>;

/// The failure taxonomy of the rewrite pipeline.
///
/// These map one-to-one to the ways a function can defeat the pipeline:
/// a shape we refuse to process, a body we cannot retrieve, or a tree that
/// no longer contains a recognizable function after transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Syntactic form the pipeline does not process (closure, method,
    /// generic function, ...). Surfaced at decoration time, never retried.
    Unsupported,
    /// The item has no retrievable body (e.g. a bodyless `fn` signature).
    NoSource,
    /// The recompiled tree does not contain a function matching the original
    /// name and location. Indicates a defect in the transform itself and is
    /// never silently swallowed.
    MalformedTransform,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "unsupported"),
            Self::NoSource => write!(f, "no source"),
            Self::MalformedTransform => write!(f, "malformed transform"),
        }
    }
}

/// One reportable failure of the rewrite pipeline.
#[derive(Debug)]
pub struct Error {
    /// Which family of failure this is.
    kind: Kind,
    /// Primary message, anchored at `span` when one is known.
    msg: String,
    /// Location the message points to.
    span: Option<Span>,
    /// Secondary help lines, each optionally anchored.
    notes: Vec<(String, Option<Span>)>,
}

impl Error {
    /// Which family of failure this is.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Primary message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Location of the primary message.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Attach a secondary note.
    #[must_use]
    pub fn with_note(mut self, msg: impl Into<String>, span: Option<Span>) -> Self {
        self.notes.push((msg.into(), span));
        self
    }

    /// Flatten into `(message, span)` pairs, primary message first.
    #[must_use]
    pub fn elements(self) -> Vec<(String, Option<Span>)> {
        let mut elems = vec![(self.msg, self.span)];
        elems.extend(self.notes);
        elems
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.msg)?;
        for (note, _) in &self.notes {
            write!(f, "; {note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

/// The pipeline refuses to process this syntactic form.
pub fn unsupported(msg: impl Into<String>, span: Option<Span>) -> Error {
    Error {
        kind: Kind::Unsupported,
        msg: msg.into(),
        span,
        notes: Vec::new(),
    }
}

/// The function body cannot be retrieved.
pub fn no_source(msg: impl Into<String>, span: Option<Span>) -> Error {
    Error {
        kind: Kind::NoSource,
        msg: msg.into(),
        span,
        notes: Vec::new(),
    }
}

/// The recompiled tree no longer contains the expected function.
pub fn malformed_transform(msg: impl Into<String>, span: Option<Span>) -> Error {
    Error {
        kind: Kind::MalformedTransform,
        msg: msg.into(),
        span,
        notes: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elements_keep_order() {
        let err = unsupported("closures are not model functions", None)
            .with_note("write a standalone `fn` instead", None);
        assert_eq!(err.kind(), Kind::Unsupported);
        let elems = err.elements();
        assert_eq!(elems.len(), 2);
        assert_eq!(elems[0].0, "closures are not model functions");
        assert_eq!(elems[1].0, "write a standalone `fn` instead");
    }

    #[test]
    fn display_joins_notes() {
        let err = no_source("function has no body", None).with_note("give it one", None);
        assert_eq!(format!("{err}"), "function has no body; give it one");
    }
}
