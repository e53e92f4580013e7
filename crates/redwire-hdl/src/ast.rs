//! Abstract syntax tree for the redwire DSL.

use serde::{Deserialize, Serialize};

/// A complete compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Input ports from the first line, in declaration order.
    pub inputs: Vec<Port>,
    /// Bindings from the middle lines, in source order.
    pub bindings: Vec<Binding>,
    /// Output ports from the last line.
    pub outputs: Vec<Port>,
    /// Line number of the output line.
    pub output_line: usize,
}

/// A port token: `[<width>:]<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    /// Declared width, if given.
    pub width: Option<usize>,
}

/// A binding line: `name = circuit arg*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub name: String,
    pub expr: Expr,
    pub line: usize,
}

/// A circuit applied to arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expr {
    /// Registry name of the circuit.
    pub circuit: String,
    pub args: Vec<Arg>,
}

/// A call argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arg {
    /// A previously bound name.
    Name(String),
    /// A parenthesized call, lowered before the enclosing one.
    Nested(Expr),
}
