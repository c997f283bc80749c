use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use once_cell::sync::OnceCell;

use crate::extra_math;
use crate::tokens::{Arity, Operator, Token};
use crate::{Error, Parser};

/// Evaluates a postfix sequence with the variable set to `value`.
///
/// Numeric domain errors are not reported: they show up as NaN or infinity in the result.
///
/// # Failure
///
/// Returns `Err` if the sequence is not well-formed, which cannot happen for sequences produced by
/// [`to_postfix`](crate::shunting_yard::to_postfix).
pub fn evaluate(postfix: &[Token], value: f64) -> Result<f64, Error> {
    let mut stack: Vec<f64> = Vec::with_capacity(16);

    for (index, token) in postfix.iter().enumerate() {
        match *token {
            Token::Number(n) => stack.push(n),
            Token::Constant(c) => stack.push(c.value()),
            Token::Variable(_) => stack.push(value),
            Token::Operator(op) => {
                let right = stack.pop().ok_or(Error::StackUnderflow { index })?;
                let r = match op.arity() {
                    Arity::Unary => unary(op, right),
                    Arity::Binary => {
                        let left = stack.pop().ok_or(Error::StackUnderflow { index })?;
                        binary(op, left, right)
                    }
                };
                stack.push(r);
            }
            Token::Delimiter(_) => return Err(Error::StrayDelimiter { index }),
        }
    }

    match (stack.pop(), stack.len()) {
        (Some(r), 0) => Ok(r),
        (r, rest) => Err(Error::EmptyResult {
            remaining: rest + r.map_or(0, |_| 1),
        }),
    }
}

fn unary(op: Operator, x: f64) -> f64 {
    use crate::tokens::Operator::*;
    match op {
        Negate => -x,
        Sqrt => x.sqrt(),
        Exp => x.exp(),
        Ln => x.ln(),
        Log10 => x.log10(),
        Log2 => x.log2(),
        Sin => x.sin(),
        Cos => x.cos(),
        Tan => x.tan(),
        Cot => extra_math::cot(x),
        Sec => extra_math::sec(x),
        Csc => extra_math::csc(x),
        Asin => x.asin(),
        Asinh => x.asinh(),
        Acos => x.acos(),
        Acosh => x.acosh(),
        Atan => x.atan(),
        Atanh => x.atanh(),
        Abs => x.abs(),
        Add | Subtract | Multiply | Divide | Power | Log | Max | Min => {
            unreachable!("binary operator {:?} applied to one operand", op)
        }
    }
}

fn binary(op: Operator, left: f64, right: f64) -> f64 {
    use crate::tokens::Operator::*;
    match op {
        Add => left + right,
        Subtract => left - right,
        Multiply => left * right,
        Divide => left / right,
        Power => left.powf(right),
        Log => extra_math::log(left, right),
        Max => left.max(right),
        Min => left.min(right),
        _ => unreachable!("unary operator {:?} applied to two operands", op),
    }
}

/// A parsed expression in Reverse Polish notation.
///
/// The solver can be evaluated any number of times for different values of the variable without
/// parsing again.
#[derive(Debug, Clone)]
pub struct PostfixSolver {
    rpn: Vec<Token>,
    rendered: OnceCell<String>,
}

impl PostfixSolver {
    pub fn new(rpn: Vec<Token>) -> PostfixSolver {
        PostfixSolver {
            rpn,
            rendered: OnceCell::new(),
        }
    }

    /// Evaluates the expression with the variable set to `0`.
    ///
    /// Use this for purely numeric expressions.
    pub fn calculate(&self) -> Result<f64, Error> {
        self.calculate_for(0.)
    }

    /// Evaluates the expression with the variable set to `value`.
    pub fn calculate_for(&self, value: f64) -> Result<f64, Error> {
        evaluate(&self.rpn, value)
    }

    /// Evaluates the expression at `steps + 1` evenly spaced points from `start` to `end`,
    /// returning `(value, result)` pairs.
    pub fn sample(&self, start: f64, end: f64, steps: usize) -> Result<Vec<(f64, f64)>, Error> {
        if steps == 0 {
            return Ok(vec![(start, self.calculate_for(start)?)]);
        }
        let step = (end - start) / steps as f64;
        (0..=steps)
            .map(|i| {
                let value = if i == steps { end } else { start + step * i as f64 };
                self.calculate_for(value).map(|r| (value, r))
            })
            .collect()
    }

    /// The postfix notation: tokens joined by single spaces.
    ///
    /// Rendered on first use and kept for the lifetime of the solver.
    pub fn to_postfix_string(&self) -> &str {
        self.rendered.get_or_init(|| {
            self.rpn
                .iter()
                .map(Token::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        })
    }
}

impl PartialEq for PostfixSolver {
    fn eq(&self, other: &PostfixSolver) -> bool {
        self.rpn == other.rpn
    }
}

impl Deref for PostfixSolver {
    type Target = [Token];

    fn deref(&self) -> &[Token] {
        &self.rpn
    }
}

impl fmt::Display for PostfixSolver {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.to_postfix_string())
    }
}

impl FromStr for PostfixSolver {
    type Err = Error;

    /// Parses with the default configuration.
    fn from_str(s: &str) -> Result<PostfixSolver, Error> {
        Parser::new().parse(s)
    }
}
