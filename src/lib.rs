//! This [Rust] crate parses a mathematical expression in one free variable once and evaluates it
//! for any value of that variable.
//!
//! The expression goes through a fixed pipeline: the [tokenizer](tokenizer) cuts the string into
//! string tokens, the [shunting-yard converter](shunting_yard) turns them into a sequence of typed
//! tokens in Reverse Polish notation, and a [`PostfixSolver`] evaluates that sequence with a
//! value stack as often as needed.
//!
//! [Rust]: https://www.rust-lang.org/
//!
//! # Simple examples
//!
//! ```rust
//! let r = eqsolve::eval_str("1 + 2").unwrap();
//! assert_eq!(r, 3.);
//! ```
//!
//! Sampling a function of `x`:
//!
//! ```rust
//! use eqsolve::PostfixSolver;
//!
//! let solver: PostfixSolver = "x^2 + 1".parse().unwrap();
//! assert_eq!(solver.calculate_for(3.), Ok(10.));
//!
//! let points = solver.sample(0., 2., 2).unwrap();
//! assert_eq!(points, vec![(0., 1.), (1., 2.), (2., 5.)]);
//! ```
//!
//! # Supported expressions
//!
//! Whitespace is ignored and the input is case-insensitive.
//!
//! Binary operators `+`, `-`, `*`, `/`, `^` (right associative), unary `-` and `+`, parentheses.
//!
//! Functions, called as `f(x)` or, for one argument, `fx`:
//! `sqrt`, `exp`, `ln`, `log10`, `log2`, `sin`, `cos`, `tan`, `cot`, `sec`, `csc`, `asin`,
//! `asinh`, `acos`, `acosh`, `atan`, `atanh`, `abs`, and with two arguments `log(base, value)`,
//! `max(a, b)`, `min(a, b)`.
//!
//! Constants `pi` and `e`. The variable is `x` unless [configured](Parser::variable) otherwise.
//!
//! Implicit multiplication such as `2x` is not supported.
//!
//! # Numeric errors
//!
//! Arithmetic follows IEEE 754: `sqrt(-1)` evaluates to NaN and `1/0` to infinity, neither is
//! reported as an error.
//!
//! # Deserialization
//!
//! With the `serde` feature, [`PostfixSolver`] and [`ParserConfig`] implement `Deserialize`, and
//! [`de::as_f64`] evaluates an expression field during deserialization.

use thiserror::Error;

pub mod extra_math;
pub mod parser;
pub mod shunting_yard;
pub mod solver;
pub mod tokenizer;
pub mod tokens;

#[cfg(feature = "serde")]
pub mod de;

pub use crate::parser::{Parser, ParserConfig};
pub use crate::shunting_yard::ParseError;
pub use crate::solver::{evaluate, PostfixSolver};
pub use crate::tokens::{Arity, Associativity, Constant, Delimiter, Operator, Token};

/// An error produced while parsing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The expression is not well-formed.
    #[error("malformed expression: {0}")]
    MalformedExpression(#[from] ParseError),
    /// An operator found fewer operands than it needs.
    #[error("stack underflow at postfix token {index}")]
    StackUnderflow { index: usize },
    /// Evaluation did not end with exactly one value on the stack.
    #[error("evaluation left {remaining} values on the stack, expected 1")]
    EmptyResult { remaining: usize },
    /// A parenthesis or separator inside a postfix sequence.
    #[error("delimiter in postfix sequence at position {index}")]
    StrayDelimiter { index: usize },
    /// The configured variable symbol cannot be used.
    #[error("`{0}` cannot be used as the variable")]
    InvalidVariable(char),
    /// The parsing task was cancelled before it finished.
    #[error("parsing was aborted")]
    Aborted,
}

/// Evaluates a string with the variable set to `0`.
pub fn eval_str<S: AsRef<str>>(expr: S) -> Result<f64, Error> {
    expr.as_ref().parse::<PostfixSolver>()?.calculate()
}

/// Evaluates a string with the variable set to `value`.
pub fn eval_str_at<S: AsRef<str>>(expr: S, value: f64) -> Result<f64, Error> {
    expr.as_ref().parse::<PostfixSolver>()?.calculate_for(value)
}
