pub fn cot(x: f64) -> f64 {
    1. / x.tan()
}

pub fn sec(x: f64) -> f64 {
    1. / x.cos()
}

pub fn csc(x: f64) -> f64 {
    1. / x.sin()
}

/// Logarithm of `value` in the given `base`.
pub fn log(base: f64, value: f64) -> f64 {
    value.ln() / base.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_reciprocal_trig() {
        assert!(close(cot(consts::FRAC_PI_4), 1.));
        assert!(close(sec(0.), 1.));
        assert!(close(csc(consts::FRAC_PI_2), 1.));
        assert!(csc(0.).is_infinite());
    }

    #[test]
    fn test_log() {
        assert!(close(log(2., 8.), 3.));
        assert!(close(log(10., 0.001), -3.));
        assert!(log(2., -1.).is_nan());
    }
}
