//! Token model flowing through the pipeline, together with the static operator, constant and
//! splitter tables.
//!
//! The tables are built once on first use and never written afterwards, so they can be read
//! from any number of threads without synchronization.

use std::collections::HashMap;
use std::f64::consts;
use std::fmt;

use lazy_static::lazy_static;
use strum::{EnumIter, IntoEnumIterator};

/// Number of operands an operator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

impl Arity {
    pub fn operands(self) -> usize {
        match self {
            Arity::Unary => 1,
            Arity::Binary => 2,
        }
    }
}

/// Grouping direction for operators of equal precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// Mathematical operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    /// Unary minus. Never spelled out in the input, it is produced by the converter from a `-`
    /// in prefix position.
    Negate,

    Sqrt,
    Exp,
    /// Logarithm with an explicit base: `log(base, value)`.
    Log,
    Ln,
    Log10,
    Log2,

    Sin,
    Cos,
    Tan,
    Cot,
    Sec,
    Csc,
    Asin,
    Asinh,
    Acos,
    Acosh,
    Atan,
    Atanh,

    Abs,
    Max,
    Min,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        use self::Operator::*;
        match self {
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            Power => "^",
            Negate => "neg",
            Sqrt => "sqrt",
            Exp => "exp",
            Log => "log",
            Ln => "ln",
            Log10 => "log10",
            Log2 => "log2",
            Sin => "sin",
            Cos => "cos",
            Tan => "tan",
            Cot => "cot",
            Sec => "sec",
            Csc => "csc",
            Asin => "asin",
            Asinh => "asinh",
            Acos => "acos",
            Acosh => "acosh",
            Atan => "atan",
            Atanh => "atanh",
            Abs => "abs",
            Max => "max",
            Min => "min",
        }
    }

    pub fn arity(self) -> Arity {
        use self::Operator::*;
        match self {
            Add | Subtract | Multiply | Divide | Power | Log | Max | Min => Arity::Binary,
            _ => Arity::Unary,
        }
    }

    pub fn precedence(self) -> u32 {
        use self::Operator::*;
        match self {
            Add | Subtract => 1,
            Multiply | Divide => 2,
            Negate => 3,
            Power => 4,
            _ => 5,
        }
    }

    pub fn associativity(self) -> Associativity {
        use self::Operator::*;
        match self {
            Add | Subtract | Multiply | Divide => Associativity::Left,
            _ => Associativity::Right,
        }
    }

    /// Whether the operator is written before its operands (functions and unary minus) rather
    /// than between them.
    pub fn is_prefix(self) -> bool {
        use self::Operator::*;
        !matches!(self, Add | Subtract | Multiply | Divide | Power)
    }

    /// Looks up an operator by the symbol it is written with in an expression.
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        OPERATORS.get(symbol).copied()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Named constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn moniker(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => consts::PI,
            Constant::E => consts::E,
        }
    }

    pub fn from_moniker(moniker: &str) -> Option<Constant> {
        CONSTANTS.get(moniker).copied()
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.moniker())
    }
}

/// Structural tokens. They steer the converter and never reach the postfix sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Delimiter {
    LParen,
    RParen,
    /// Function argument separator.
    Comma,
}

impl Delimiter {
    pub fn symbol(self) -> &'static str {
        match self {
            Delimiter::LParen => "(",
            Delimiter::RParen => ")",
            Delimiter::Comma => ",",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Delimiter> {
        Delimiter::iter().find(|d| d.symbol() == symbol)
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Expression tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A number.
    Number(f64),
    /// The free variable.
    Variable(String),
    /// A named constant.
    Constant(Constant),
    /// An operator or a function.
    Operator(Operator),
    /// Parenthesis or argument separator.
    Delimiter(Delimiter),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Variable(ref v) => f.write_str(v),
            Token::Constant(c) => f.write_str(c.moniker()),
            Token::Operator(op) => f.write_str(op.symbol()),
            Token::Delimiter(d) => f.write_str(d.symbol()),
        }
    }
}

lazy_static! {
    static ref OPERATORS: HashMap<&'static str, Operator> = Operator::iter()
        .filter(|op| *op != Operator::Negate)
        .map(|op| (op.symbol(), op))
        .collect();

    static ref CONSTANTS: HashMap<&'static str, Constant> =
        Constant::iter().map(|c| (c.moniker(), c)).collect();

    /// Symbols the tokenizer splits on, in the order it applies them: delimiters first, then
    /// operators longest first so that no symbol is applied before a longer one containing it.
    pub static ref SPLITTERS: Vec<&'static str> = {
        let mut operators: Vec<&'static str> = OPERATORS.keys().copied().collect();
        // `sort_by` is stable, keep table order among equal lengths
        operators.sort_by_key(|s| Operator::from_symbol(s).map(|op| op as usize));
        operators.sort_by(|a, b| b.len().cmp(&a.len()));

        Delimiter::iter().map(Delimiter::symbol).chain(operators).collect()
    };
}

/// Whether `s` is one of the symbols the tokenizer splits on.
pub fn is_splitter(s: &str) -> bool {
    Delimiter::from_symbol(s).is_some() || OPERATORS.contains_key(s)
}
