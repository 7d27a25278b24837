//! Optional evaluation tracing.
//!
//! Mirrors the `trace` option of the `#[model]` attribute: when enabled, each
//! capture context prints one line per registered variable to the chosen
//! stream. This is plain `eprintln!`/`println!` output meant for eyeballing a
//! model run, not a logging framework.

use std::fmt;

/// Where evaluation traces go. `Off` by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trace {
    /// No output.
    #[default]
    Off,
    /// One line per captured variable on standard error.
    Stderr,
    /// One line per captured variable on standard output.
    Stdout,
}

impl Trace {
    /// Emit a single trace line.
    pub(crate) fn line(self, args: fmt::Arguments) {
        match self {
            Self::Off => {}
            Self::Stderr => eprintln!("{args}"),
            Self::Stdout => println!("{args}"),
        }
    }
}
