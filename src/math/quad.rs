//! Composite Simpson quadrature.
//!
//! Used for the comoving-distance integral, taken in `ln(1+z)` where the
//! integrand is smooth at every redshift, so a fixed even panel count is
//! accurate to well below a part in 1e6.

/// Default number of Simpson panels (must be even).
pub const DEFAULT_PANELS: usize = 1000;

/// Integrate `f` over `[a, b]` with `panels` Simpson panels.
///
/// `panels` is rounded up to the next even number (minimum 2). Returns `0.0`
/// when `a == b`; a reversed interval yields the negated integral.
pub fn simpson<F>(f: F, a: f64, b: f64, panels: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    if a == b {
        return 0.0;
    }
    let n = panels.max(2);
    let n = if n % 2 == 0 { n } else { n + 1 };
    let h = (b - a) / n as f64;

    let mut sum = f(a) + f(b);
    for i in 1..n {
        let x = a + h * i as f64;
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * f(x);
    }
    sum * h / 3.0
}
