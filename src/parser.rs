//! Configured entry point of the pipeline: tokenize, convert to postfix, wrap in a solver.
use log::debug;

use crate::shunting_yard::to_postfix;
use crate::solver::PostfixSolver;
use crate::tokenizer::{tokenize_with, DEFAULT_PARALLEL_THRESHOLD};
use crate::tokens::{is_splitter, Constant};
use crate::Error;

/// Symbol of the free variable unless configured otherwise.
pub const DEFAULT_VARIABLE: char = 'x';

/// Parser settings.
///
/// With the `serde` feature the configuration can be deserialized, missing fields take their
/// default values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParserConfig {
    /// The free variable. Matched case-insensitively.
    pub variable: char,
    /// Fragment count from which a tokenizer level is split in parallel.
    pub parallel_threshold: usize,
}

impl ParserConfig {
    /// The variable as it appears in a normalized expression.
    ///
    /// # Failure
    ///
    /// Returns `Err` if the variable is not alphabetic or collides with a constant or operator.
    pub fn variable_symbol(&self) -> Result<String, Error> {
        let symbol: String = self.variable.to_lowercase().collect();
        if !self.variable.is_alphabetic()
            || Constant::from_moniker(&symbol).is_some()
            || is_splitter(&symbol)
        {
            return Err(Error::InvalidVariable(self.variable));
        }
        Ok(symbol)
    }
}

impl Default for ParserConfig {
    fn default() -> ParserConfig {
        ParserConfig {
            variable: DEFAULT_VARIABLE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Turns expression strings into [`PostfixSolver`]s.
///
/// ```rust
/// use eqsolve::Parser;
///
/// let solver = Parser::new().variable('t').parse("2 * t + 1").unwrap();
/// assert_eq!(solver.calculate_for(3.), Ok(7.));
/// assert_eq!(solver.to_string(), "2 t * 1 +");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new() -> Parser {
        Parser::default()
    }

    pub fn with_config(config: ParserConfig) -> Parser {
        Parser { config }
    }

    /// Sets the symbol of the free variable.
    pub fn variable(mut self, variable: char) -> Parser {
        self.config.variable = variable;
        self
    }

    /// Sets the fragment count from which tokenizer levels run in parallel.
    pub fn parallel_threshold(mut self, threshold: usize) -> Parser {
        self.config.parallel_threshold = threshold;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses an expression, blocking the calling thread until done.
    pub fn parse(&self, expr: &str) -> Result<PostfixSolver, Error> {
        let variable = self.config.variable_symbol()?;
        let tokens = tokenize_with(expr, self.config.parallel_threshold);
        let rpn = to_postfix(&tokens, &variable)?;

        let solver = PostfixSolver::new(rpn);
        debug!("parsed `{}` into `{}`", expr, solver);
        Ok(solver)
    }

    /// Parses an expression from within a tokio runtime.
    ///
    /// The work runs on the runtime's blocking pool while the calling task yields. The result is
    /// the same as with [`parse`](Parser::parse).
    #[cfg(feature = "async")]
    pub async fn parse_async(&self, expr: &str) -> Result<PostfixSolver, Error> {
        let parser = self.clone();
        let expr = expr.to_owned();

        join_outcome(tokio::task::spawn_blocking(move || parser.parse(&expr)).await)
    }
}

/// Unwraps the result of a joined task: a panic inside the task is resumed on the caller, a
/// cancelled task is [`Error::Aborted`].
#[cfg(feature = "async")]
fn join_outcome<T>(joined: Result<Result<T, Error>, tokio::task::JoinError>) -> Result<T, Error> {
    match joined {
        Ok(r) => r,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(_) => Err(Error::Aborted),
    }
}
