//! Numeric squashing helpers for the graph genome.
//!
//! `fast_exp` is the squaring-based approximation of e^x used by the output
//! normalization; it trades accuracy far from zero for a handful of
//! multiplications, which is the right trade inside an evolutionary loop
//! where the fitness landscape only needs to be monotone.

/// Logistic sigmoid: 1 / (1 + e^(-x)).
#[inline]
#[must_use]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Approximate e^x via (1 + x/1024)^1024, computed as ten squarings.
///
/// Accurate to a few percent for |x| < 8, degrading smoothly beyond that.
#[inline]
#[must_use]
pub fn fast_exp(x: f64) -> f64 {
    let mut x = 1.0 + x / 1024.0;
    x *= x;
    x *= x;
    x *= x;
    x *= x;
    x *= x;
    x *= x;
    x *= x;
    x *= x;
    x *= x;
    x *= x;
    x
}

/// Swish activation: x / (1 + e^(-x)), using the fast exponential.
#[inline]
#[must_use]
pub fn swish(x: f64) -> f64 {
    x / (1.0 + fast_exp(-x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_bounds() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-9);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_fast_exp_tracks_exp_near_zero() {
        for i in -40..=40 {
            let x = f64::from(i) * 0.1;
            let exact = x.exp();
            let approx = fast_exp(x);
            assert!(
                (approx - exact).abs() / exact < 0.02,
                "fast_exp({x}) = {approx}, exp = {exact}"
            );
        }
    }

    #[test]
    fn test_swish_shape() {
        // swish(0) = 0, positive for large x, small negative dip below zero.
        assert_eq!(swish(0.0), 0.0);
        assert!((swish(6.0) - 6.0).abs() < 0.1);
        assert!(swish(-1.0) < 0.0);
        assert!(swish(-1.0) > -0.5);
    }
}
