//! Conversion of a tokenized infix expression into Reverse Polish notation.
use thiserror::Error;

use crate::tokenizer::parse_number;
use crate::tokens::{Associativity, Constant, Delimiter, Operator, Token};

/// A structural defect of the expression. Positions are indices into the token stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown token `{1}` at position {0}")]
    UnknownToken(usize, String),
    #[error("unmatched `(` at position {0}")]
    MismatchedLParen(usize),
    #[error("unmatched `)` at position {0}")]
    MismatchedRParen(usize),
    #[error("argument separator outside of a function call at position {0}")]
    MisplacedComma(usize),
    #[error("function or negation at position {0} follows its operand")]
    MisplacedPrefix(usize),
    #[error("operator at position {0} is missing an operand")]
    NotEnoughOperands(usize),
    #[error("too many operands, an operator is missing")]
    TooManyOperands,
    #[error("empty expression")]
    EmptyExpression,
}

/// Entries of the operator stack.
#[derive(Debug, Clone, Copy)]
enum Pending {
    Op(Operator),
    /// `call` is set when the parenthesis opens a function's argument list.
    LParen { call: bool },
}

/// Classifies a single string token.
fn classify(index: usize, token: &str, variable: &str) -> Result<Token, ParseError> {
    if let Some(d) = Delimiter::from_symbol(token) {
        return Ok(Token::Delimiter(d));
    }
    if let Some(op) = Operator::from_symbol(token) {
        return Ok(Token::Operator(op));
    }
    if let Some(n) = parse_number(token) {
        return Ok(Token::Number(n));
    }
    if token == variable {
        return Ok(Token::Variable(token.to_owned()));
    }
    Constant::from_moniker(token)
        .map(Token::Constant)
        .ok_or_else(|| ParseError::UnknownToken(index, token.to_owned()))
}

/// Pops operators to the output until a `(` is on top of the stack. The `(` itself stays.
///
/// Returns `false` if the stack ran out without meeting a `(`.
fn unwind(stack: &mut Vec<(usize, Pending)>, output: &mut Vec<(usize, Token)>) -> bool {
    while let Some(&(index, pending)) = stack.last() {
        match pending {
            Pending::LParen { .. } => return true,
            Pending::Op(op) => {
                stack.pop();
                output.push((index, Token::Operator(op)));
            }
        }
    }
    false
}

/// Convert a tokenized infix expression to Reverse Polish notation.
///
/// `variable` is the spelling of the free variable. A `-` in prefix position (at the start, after
/// `(`, `,` or another operator) is a negation, a `+` there is dropped.
pub fn to_postfix<S: AsRef<str>>(tokens: &[S], variable: &str) -> Result<Vec<Token>, ParseError> {
    let mut output: Vec<(usize, Token)> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<(usize, Pending)> = Vec::with_capacity(tokens.len());
    // whether the next token stands where an operand is expected
    let mut prefix_position = true;
    // whether the previous token was a function name
    let mut after_function = false;

    for (index, token) in tokens.iter().enumerate() {
        let token = classify(index, token.as_ref(), variable)?;
        let call = after_function;
        after_function = false;

        match token {
            token @ Token::Number(_) | token @ Token::Variable(_) | token @ Token::Constant(_) => {
                output.push((index, token));
                prefix_position = false;
            }
            Token::Delimiter(Delimiter::LParen) => {
                stack.push((index, Pending::LParen { call }));
                prefix_position = true;
            }
            Token::Delimiter(Delimiter::RParen) => {
                if !unwind(&mut stack, &mut output) {
                    return Err(ParseError::MismatchedRParen(index));
                }
                stack.pop();
                prefix_position = false;
            }
            Token::Delimiter(Delimiter::Comma) => {
                let in_call = unwind(&mut stack, &mut output)
                    && matches!(stack.last(), Some(&(_, Pending::LParen { call: true })));
                if !in_call {
                    return Err(ParseError::MisplacedComma(index));
                }
                prefix_position = true;
            }
            Token::Operator(op) => {
                let op = match op {
                    Operator::Subtract if prefix_position => Operator::Negate,
                    Operator::Add if prefix_position => continue,
                    op => op,
                };

                if op.is_prefix() && !prefix_position {
                    return Err(ParseError::MisplacedPrefix(index));
                }

                if !op.is_prefix() {
                    while let Some(&(i, Pending::Op(top))) = stack.last() {
                        let pops = top.precedence() > op.precedence()
                            || (top.precedence() == op.precedence()
                                && op.associativity() == Associativity::Left);
                        if !pops {
                            break;
                        }
                        stack.pop();
                        output.push((i, Token::Operator(top)));
                    }
                }
                stack.push((index, Pending::Op(op)));
                prefix_position = true;
                after_function = op.is_prefix() && op != Operator::Negate;
            }
        }
    }

    while let Some((index, pending)) = stack.pop() {
        match pending {
            Pending::Op(op) => output.push((index, Token::Operator(op))),
            Pending::LParen { .. } => return Err(ParseError::MismatchedLParen(index)),
        }
    }

    // verify rpn
    let mut n_operands = 0;
    for (index, token) in &output {
        match *token {
            Token::Operator(op) => {
                let needed = op.arity().operands();
                if n_operands < needed {
                    return Err(ParseError::NotEnoughOperands(*index));
                }
                n_operands = n_operands - needed + 1;
            }
            _ => n_operands += 1,
        }
    }

    match n_operands {
        0 => Err(ParseError::EmptyExpression),
        1 => Ok(output.into_iter().map(|(_, token)| token).collect()),
        _ => Err(ParseError::TooManyOperands),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Constant::*;
    use crate::tokens::Operator::*;
    use crate::tokens::Token::*;

    fn rpn(tokens: &[&str]) -> Result<Vec<Token>, ParseError> {
        to_postfix(tokens, "x")
    }

    fn x() -> Token {
        Variable("x".into())
    }

    #[test]
    fn test_to_postfix() {
        assert_eq!(rpn(&["1"]), Ok(vec![Number(1.)]));
        assert_eq!(
            rpn(&["1", "+", "2"]),
            Ok(vec![Number(1.), Number(2.), Operator(Add)])
        );
        assert_eq!(
            rpn(&["3", "+", "4", "*", "2"]),
            Ok(vec![
                Number(3.),
                Number(4.),
                Number(2.),
                Operator(Multiply),
                Operator(Add)
            ])
        );
        assert_eq!(
            rpn(&["(", "3", "+", "4", ")", "*", "2"]),
            Ok(vec![
                Number(3.),
                Number(4.),
                Operator(Add),
                Number(2.),
                Operator(Multiply)
            ])
        );
        assert_eq!(
            rpn(&["2", "-", "x", "/", "2"]),
            Ok(vec![
                Number(2.),
                x(),
                Number(2.),
                Operator(Divide),
                Operator(Subtract)
            ])
        );
        assert_eq!(
            rpn(&["pi", "*", "e"]),
            Ok(vec![Constant(Pi), Constant(E), Operator(Multiply)])
        );
    }

    #[test]
    fn test_associativity() {
        assert_eq!(
            rpn(&["1", "-", "2", "-", "3"]),
            Ok(vec![
                Number(1.),
                Number(2.),
                Operator(Subtract),
                Number(3.),
                Operator(Subtract)
            ])
        );
        assert_eq!(
            rpn(&["2", "^", "3", "^", "2"]),
            Ok(vec![
                Number(2.),
                Number(3.),
                Number(2.),
                Operator(Power),
                Operator(Power)
            ])
        );
    }

    #[test]
    fn test_unary() {
        assert_eq!(
            rpn(&["-", "2", "^", "2"]),
            Ok(vec![Number(2.), Number(2.), Operator(Power), Operator(Negate)])
        );
        assert_eq!(
            rpn(&["-", "2", "*", "3"]),
            Ok(vec![Number(2.), Operator(Negate), Number(3.), Operator(Multiply)])
        );
        assert_eq!(
            rpn(&["1", "-", "-", "2"]),
            Ok(vec![Number(1.), Number(2.), Operator(Negate), Operator(Subtract)])
        );
        assert_eq!(
            rpn(&["2", "^", "-", "x"]),
            Ok(vec![Number(2.), x(), Operator(Negate), Operator(Power)])
        );
        assert_eq!(rpn(&["+", "x"]), Ok(vec![x()]));
        assert_eq!(
            rpn(&["(", "-", "x", ")"]),
            Ok(vec![x(), Operator(Negate)])
        );
    }

    #[test]
    fn test_functions() {
        assert_eq!(
            rpn(&["sin", "(", "x", ")", "^", "2"]),
            Ok(vec![x(), Operator(Sin), Number(2.), Operator(Power)])
        );
        assert_eq!(
            rpn(&["sqrt", "x", "+", "1"]),
            Ok(vec![x(), Operator(Sqrt), Number(1.), Operator(Add)])
        );
        assert_eq!(
            rpn(&["max", "(", "1", ",", "x", ")", "+", "3"]),
            Ok(vec![
                Number(1.),
                x(),
                Operator(Max),
                Number(3.),
                Operator(Add)
            ])
        );
        assert_eq!(
            rpn(&["log", "(", "2", ",", "8", "*", "x", ")"]),
            Ok(vec![
                Number(2.),
                Number(8.),
                x(),
                Operator(Multiply),
                Operator(Log)
            ])
        );
        assert_eq!(
            rpn(&["min", "(", "-", "x", ",", "abs", "(", "x", ")", ")"]),
            Ok(vec![
                x(),
                Operator(Negate),
                x(),
                Operator(Abs),
                Operator(Min)
            ])
        );
    }

    #[test]
    fn test_no_delimiters_in_output() {
        let out = rpn(&["(", "(", "x", ")", ")", "*", "max", "(", "(", "1", ")", ",", "2", ")"])
            .unwrap();
        assert!(out.iter().all(|t| match t {
            Delimiter(_) => false,
            _ => true,
        }));
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            rpn(&["(", "3", "+", "4"]),
            Err(ParseError::MismatchedLParen(0))
        );
        assert_eq!(rpn(&[")"]), Err(ParseError::MismatchedRParen(0)));
        assert_eq!(rpn(&["1", ")"]), Err(ParseError::MismatchedRParen(1)));
        assert_eq!(rpn(&["1", ",", "2"]), Err(ParseError::MisplacedComma(1)));
        assert_eq!(
            rpn(&["(", "1", ",", "2", ")"]),
            Err(ParseError::MisplacedComma(2))
        );
        assert_eq!(
            rpn(&["max", "(", "(", "1", ",", "2", ")", ")"]),
            Err(ParseError::MisplacedComma(4))
        );
        assert_eq!(
            rpn(&["-", "(", "1", ",", "2", ")"]),
            Err(ParseError::MisplacedComma(3))
        );
        assert_eq!(rpn(&["*"]), Err(ParseError::NotEnoughOperands(0)));
        assert_eq!(rpn(&["2", "*"]), Err(ParseError::NotEnoughOperands(1)));
        assert_eq!(rpn(&["sqrt"]), Err(ParseError::NotEnoughOperands(0)));
        assert_eq!(
            rpn(&["max", "(", "1", ")"]),
            Err(ParseError::NotEnoughOperands(0))
        );
        assert_eq!(rpn(&["x", "pi"]), Err(ParseError::TooManyOperands));
        assert_eq!(
            rpn(&["2", "(", "x", ")"]),
            Err(ParseError::TooManyOperands)
        );
        assert_eq!(rpn(&[]), Err(ParseError::EmptyExpression));
        assert_eq!(rpn(&["(", ")"]), Err(ParseError::EmptyExpression));
        assert_eq!(
            rpn(&["2x"]),
            Err(ParseError::UnknownToken(0, "2x".into()))
        );
        assert_eq!(
            rpn(&["1", "+", "y"]),
            Err(ParseError::UnknownToken(2, "y".into()))
        );
    }

    #[test]
    fn test_prefix_after_operand() {
        assert_eq!(rpn(&["2", "sqrt"]), Err(ParseError::MisplacedPrefix(1)));
        assert_eq!(rpn(&["x", "sin"]), Err(ParseError::MisplacedPrefix(1)));
        assert_eq!(
            rpn(&["1", "+", "2", "sqrt"]),
            Err(ParseError::MisplacedPrefix(3))
        );
        assert_eq!(
            rpn(&["2", "*", "x", "abs"]),
            Err(ParseError::MisplacedPrefix(3))
        );
        assert_eq!(
            rpn(&["(", "2", ",", "8", ")", "log"]),
            Err(ParseError::MisplacedComma(2))
        );
        assert_eq!(
            rpn(&["2", "sin", "(", "x", ")"]),
            Err(ParseError::MisplacedPrefix(1))
        );
        assert_eq!(
            rpn(&["x", "*", "sin", "x"]),
            Ok(vec![x(), x(), Operator(Sin), Operator(Multiply)])
        );
    }

    #[test]
    fn test_custom_variable() {
        assert_eq!(
            to_postfix(&["t", "*", "2"], "t"),
            Ok(vec![Variable("t".into()), Number(2.), Operator(Multiply)])
        );
        assert_eq!(
            to_postfix(&["x"], "t"),
            Err(ParseError::UnknownToken(0, "x".into()))
        );
    }
}
