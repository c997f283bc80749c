//! Deserialization utilities.
use std::fmt;

use serde::de;
use serde::de::Error;
use serde::{Deserialize, Deserializer};

use crate::PostfixSolver;

/// Deserialize into [`PostfixSolver`] and then evaluate using `PostfixSolver::calculate`.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Foo {
///     #[serde(deserialize_with = "eqsolve::de::as_f64")]
///     x: f64,
/// }
///
/// let foo: Foo = serde_json::from_str(r#"{ "x": "cos(0) + 1" }"#).unwrap();
/// assert_eq!(foo.x, 2.);
///
/// let foo: Result<Foo, _> = serde_json::from_str(r#"{ "x": "cos(y)" }"#);
/// assert!(foo.is_err());
/// ```
pub fn as_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    PostfixSolver::deserialize(deserializer)?
        .calculate()
        .map_err(D::Error::custom)
}

struct SolverVisitor;

impl<'de> de::Visitor<'de> for SolverVisitor {
    type Value = PostfixSolver;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a math expression")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<PostfixSolver, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for PostfixSolver {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<PostfixSolver, D::Error> {
        deserializer.deserialize_str(SolverVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Plot {
        f: PostfixSolver,
        #[serde(deserialize_with = "as_f64")]
        start: f64,
    }

    #[test]
    fn test_deserialize_toml() {
        let plot: Plot = toml::from_str(
            r#"
                f = "x^2 + 1"
                start = "2 * pi"
            "#,
        )
        .unwrap();
        assert_eq!(plot.f.to_string(), "x 2 ^ 1 +");
        assert_eq!(plot.f.calculate_for(3.), Ok(10.));
        assert_eq!(plot.start, 2. * std::f64::consts::PI);
    }

    #[test]
    fn test_deserialize_errors() {
        let r: Result<Plot, _> = serde_json::from_str(r#"{ "f": "(x", "start": "1" }"#);
        assert!(r.unwrap_err().to_string().contains("malformed expression"));

        let r: Result<Plot, _> = serde_json::from_str(r#"{ "f": "x", "start": "x +" }"#);
        assert!(r.is_err());

        let r: Result<PostfixSolver, _> = serde_json::from_str("3");
        assert!(r.is_err());
    }

    #[test]
    fn test_as_f64_json() {
        let plot: Plot = serde_json::from_str(r#"{ "f": "sqrt(x)", "start": "max(1, 4) / 2" }"#)
            .unwrap();
        assert_eq!(plot.start, 2.);
        assert!(plot.f.calculate_for(-1.).unwrap().is_nan());
    }
}
