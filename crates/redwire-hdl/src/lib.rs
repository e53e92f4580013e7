//! The redwire hardware description language.
//!
//! A program is a handful of lines: input ports, bindings of names to
//! circuit calls, and a single output port.
//!
//! ```text
//! // half adder sum
//! a b
//! x = or a b
//! y = and a b
//! out = and x (not y)
//! out
//! ```
//!
//! Ports are written `[<width>:]<name>`. An input without a width takes it
//! from its first use and defaults to one bit if it is never used. Arguments
//! are bound names or parenthesized calls. Binding a name again keeps the
//! previous value reachable as `<name>_<k>`.
//!
//! Calls are resolved against a [`Registry`]. A missing circuit is reported
//! as [`HdlError::MissingDependency`] so the caller can register it and
//! compile again.
//!
//! # Example
//!
//! ```rust
//! use redwire_hdl::{HdlOptions, build_default_registry, compile};
//!
//! let registry = build_default_registry().unwrap();
//! let source = "a b\nc = nand a b\nout = not c\nout";
//! let circuit = compile(source, &registry, &HdlOptions::default()).unwrap();
//!
//! assert_eq!(circuit.total_input_width(), 2);
//! assert_eq!(circuit.input_groups()[0].name, "a");
//! assert_eq!(circuit.output_groups()[0].name, "out");
//! ```
//!
//! # Standard cells
//!
//! | Cell | Inputs | Output |
//! |------|--------|--------|
//! | `not` | 1 | 1 |
//! | `nand`, `and`, `or`, `nor`, `xor` | 1, 1 | 1 |
//! | `cat` | 1, 1 | 2 |
//! | `lo`, `hi` | 2 | 1 |
//! | `if` | 1, 1, 1 | 1 |
//! | `add1c` | 1, 1, 1 | 2 (sum, carry) |
//! | `add2` | 2, 2 | 2 |

mod ast;
mod error;
mod lexer;
mod options;
mod parser;
mod registry;
mod stdlib;

pub use error::{HdlError, HdlResult};
pub use options::HdlOptions;
pub use parser::{compile, compile_debug, parse};
pub use registry::Registry;
pub use stdlib::{build_default_registry, register_stdlib, stdlib_names};

// Re-export AST types for tooling
pub mod syntax {
    pub use crate::ast::*;
}
