//! Tokenizer that cuts a mathematical expression into a series of string tokens.
//!
//! Tokenization is total: every input produces a token stream, deciding whether the tokens make
//! sense is left to the converter. The input is normalized (whitespace removed, lower-cased) and
//! then split repeatedly, once per symbol of [`SPLITTERS`](crate::tokens::SPLITTERS), with
//! the symbol itself kept as a token between the pieces.
//!
//! Each splitter level is a map over independent fragments. Once a level holds enough fragments
//! the map is fanned out over scoped threads; levels themselves always run one after the other.
//!
//! Numeric literals are recognized with the [nom] parser combinator crate.
//!
//! [nom]: https://crates.io/crates/nom

use std::panic;
use std::thread;

use log::trace;
use nom::{
    character::complete::one_of,
    combinator::{all_consuming, peek},
    number::complete::double,
    sequence::preceded,
    IResult,
};

use crate::tokens::{is_splitter, SPLITTERS};

/// Fragment count from which a splitter level is processed in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Removes all whitespace and lower-cases the rest.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Tokenize a given mathematical expression with the default parallel threshold.
pub fn tokenize(raw: &str) -> Vec<String> {
    tokenize_with(raw, DEFAULT_PARALLEL_THRESHOLD)
}

/// Tokenize a given mathematical expression.
///
/// Levels holding at least `parallel_threshold` fragments are split on scoped threads. The
/// result does not depend on the threshold.
pub fn tokenize_with(raw: &str, parallel_threshold: usize) -> Vec<String> {
    let normalized = normalize(raw);
    let mut fragments = if normalized.is_empty() {
        vec![]
    } else {
        vec![normalized]
    };

    for splitter in SPLITTERS.iter() {
        fragments = split_level(&fragments, splitter, parallel_threshold);
        trace!("after {:?}: {:?}", splitter, fragments);
    }

    fragments
}

/// Applies one splitter to every fragment, keeping the left-to-right order.
fn split_level(fragments: &[String], splitter: &str, parallel_threshold: usize) -> Vec<String> {
    if fragments.len() < parallel_threshold.max(2) {
        return fragments.iter().flat_map(|f| refine(f, splitter)).collect();
    }

    let workers = thread::available_parallelism().map_or(1, |n| n.get());
    let chunk_len = (fragments.len() + workers - 1) / workers;

    let pieces = crossbeam::scope(|scope| {
        let handles: Vec<_> = fragments
            .chunks(chunk_len.max(1))
            .map(|chunk| {
                scope.spawn(move |_| {
                    chunk
                        .iter()
                        .flat_map(|f| refine(f, splitter))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<thread::Result<Vec<_>>>()
    });

    match pieces {
        Ok(Ok(chunks)) => chunks.concat(),
        Ok(Err(e)) | Err(e) => panic::resume_unwind(e),
    }
}

/// Splits a single fragment on `splitter`.
///
/// Fragments of at most one character, and fragments that already are a splitter symbol, are
/// atomic. Empty pieces are dropped.
fn refine(fragment: &str, splitter: &str) -> Vec<String> {
    if fragment.chars().nth(1).is_none() || is_splitter(fragment) {
        return vec![fragment.to_owned()];
    }

    let mut pieces = Vec::new();
    for (i, piece) in fragment.split(splitter).enumerate() {
        if i > 0 {
            pieces.push(splitter.to_owned());
        }
        if !piece.is_empty() {
            pieces.push(piece.to_owned());
        }
    }
    pieces
}

fn number(i: &str) -> IResult<&str, f64> {
    preceded(peek(one_of("0123456789.")), double)(i)
}

/// Parses a token that consists of a numeric literal and nothing else.
pub fn parse_number(token: &str) -> Option<f64> {
    all_consuming(number)(token).ok().map(|(_, n)| n)
}
