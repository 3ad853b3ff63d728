/// Finds a root of `f` inside the bracket `[lo, hi]` by Newton's method,
/// falling back to bisection whenever a Newton step leaves the bracket.
///
/// `f(lo)` and `f(hi)` must have opposite signs (or be zero); `seed` is the
/// initial estimate and is clamped into the bracket. The bracket is shrunk
/// around the root on every iteration, so the result is always within
/// `[lo, hi]`. Iteration stops when the step size falls below `xtol` or
/// after `max_iter` iterations.
pub fn newton_bisect<F, D>(
    f: F,
    df: D,
    mut lo: f64,
    mut hi: f64,
    seed: f64,
    xtol: f64,
    max_iter: usize,
) -> f64
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    debug_assert!(lo <= hi);
    let f_lo = f(lo);
    if f_lo == 0.0 {
        return lo;
    }
    if f(hi) == 0.0 {
        return hi;
    }
    let negative_side = f_lo < 0.0;
    let mut x = seed.clamp(lo, hi);
    for _ in 0..max_iter {
        let fx = f(x);
        if fx == 0.0 {
            return x;
        }
        // Keep the bracket tight around the sign change.
        if (fx < 0.0) == negative_side {
            lo = x;
        } else {
            hi = x;
        }
        let derivative = df(x);
        let mut next = x - fx / derivative;
        if !next.is_finite() || next <= lo || next >= hi {
            next = 0.5 * (lo + hi);
        }
        if (next - x).abs() < xtol {
            return next;
        }
        x = next;
    }
    x
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn linear_root() {
        let root = newton_bisect(|x| x - 0.25, |_| 1.0, 0.0, 1.0, 0.5, 1e-12, 50);
        assert!((root - 0.25).abs() < 1e-10);
    }

    #[test]
    fn cubic_root() {
        // x^3 + x - 1 has a single real root near 0.6823.
        let root = newton_bisect(
            |x| x * x * x + x - 1.0,
            |x| 3.0 * x * x + 1.0,
            0.0,
            1.0,
            0.5,
            1e-12,
            50,
        );
        assert!((root * root * root + root - 1.0).abs() < 1e-10);
    }

    #[test]
    fn decreasing_function() {
        let root = newton_bisect(|x| 1.0 - 2.0 * x, |_| -2.0, 0.0, 1.0, 0.1, 1e-12, 50);
        assert!((root - 0.5).abs() < 1e-10);
    }

    #[test]
    fn exact_endpoint() {
        let root = newton_bisect(|x| x, |_| 1.0, 0.0, 1.0, 0.7, 1e-12, 50);
        assert!((root).abs() < 1e-12);
    }

    #[test]
    fn flat_derivative_falls_back_to_bisection() {
        // Zero derivative at the seed must not produce NaN.
        let root = newton_bisect(
            |x| x * x * x - 0.5,
            |x| 3.0 * x * x,
            0.0,
            1.0,
            0.0,
            1e-12,
            100,
        );
        assert!((root - 0.5f64.powf(1.0 / 3.0)).abs() < 1e-9);
    }
}
