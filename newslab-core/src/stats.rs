//! Pearson correlation with a two-tailed significance test.
//!
//! The p-value comes from the Student-t distribution with n - 2 degrees of
//! freedom, evaluated through the regularized incomplete beta function. All
//! special functions are implemented here; there is no stats dependency.

use serde::{Deserialize, Serialize};

// ─── Special functions ───────────────────────────────────────────────

/// ln(Gamma(x)) by the Lanczos approximation (g = 7, n = 9).
fn ln_gamma(x: f64) -> f64 {
    #[allow(clippy::excessive_precision)]
    const LANCZOS: [f64; 9] = [
        0.99999999999980993,
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];
    const G: f64 = 7.0;
    use std::f64::consts::PI;

    if x < 0.5 {
        // Reflection: Gamma(x) Gamma(1 - x) = pi / sin(pi x)
        let s = (PI * x).sin();
        if s.abs() < 1e-300 {
            return f64::INFINITY;
        }
        return PI.ln() - s.abs().ln() - ln_gamma(1.0 - x);
    }

    let z = x - 1.0;
    let series = LANCZOS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS[0], |acc, (i, &c)| acc + c / (z + i as f64));
    let t = z + G + 0.5;

    0.5 * (2.0 * PI).ln() + (z + 0.5) * t.ln() - t + series.ln()
}

/// Regularized incomplete beta I_x(a, b), continued fraction by modified Lentz.
fn incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if !(0.0..=1.0).contains(&x) {
        return f64::NAN;
    }
    if x == 0.0 || x == 1.0 {
        return x;
    }
    // The fraction converges fast only below the mean; flip otherwise.
    if x > (a + 1.0) / (a + b + 2.0) {
        return 1.0 - incomplete_beta(b, a, 1.0 - x);
    }

    const MAX_ITER: usize = 300;
    const EPS: f64 = 1e-14;
    const TINY: f64 = 1e-30;

    let ln_front = a * x.ln() + b * (1.0 - x).ln() + ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b);
    let front = ln_front.exp() / a;

    let clamp = |v: f64| if v.abs() < TINY { TINY } else { v };

    let mut c = 1.0;
    let mut d = 1.0 / clamp(1.0 - (a + b) * x / (a + 1.0));
    let mut f = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;

        let even = m * (b - m) * x / ((a + 2.0 * m - 1.0) * (a + 2.0 * m));
        d = 1.0 / clamp(1.0 + even * d);
        c = clamp(1.0 + even / c);
        f *= c * d;

        let odd = -(a + m) * (a + b + m) * x / ((a + 2.0 * m) * (a + 2.0 * m + 1.0));
        d = 1.0 / clamp(1.0 + odd * d);
        c = clamp(1.0 + odd / c);
        let delta = c * d;
        f *= delta;

        if (delta - 1.0).abs() < EPS {
            break;
        }
    }

    front * f
}

/// Student-t CDF: P(T <= t) with `df` degrees of freedom.
pub fn t_cdf(t: f64, df: f64) -> f64 {
    if df <= 0.0 || t.is_nan() {
        return f64::NAN;
    }
    if t.is_infinite() {
        return if t > 0.0 { 1.0 } else { 0.0 };
    }
    let tail = 0.5 * incomplete_beta(df / 2.0, 0.5, df / (df + t * t));
    if t > 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

// ─── Pearson ─────────────────────────────────────────────────────────

/// Pearson coefficient and its two-tailed p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PearsonResult {
    pub r: f64,
    pub p_value: f64,
    pub n: usize,
}

/// Pearson correlation of two equal-length samples.
///
/// Returns `None` when fewer than 3 pairs are given, the lengths differ, or
/// either sample has zero variance (r is undefined there).
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<PearsonResult> {
    let n = xs.len();
    if n != ys.len() || n < 3 {
        return None;
    }

    if is_constant(xs) || is_constant(ys) {
        return None;
    }

    let nf = n as f64;
    let mean_x = xs.iter().sum::<f64>() / nf;
    let mean_y = ys.iter().sum::<f64>() / nf;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 || !sxx.is_finite() || !syy.is_finite() {
        return None;
    }

    let r = (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0);
    Some(PearsonResult {
        r,
        p_value: two_tailed_p(r, n),
        n,
    })
}

/// Exact comparison: the float mean of a constant sample can leave nonzero
/// deviations.
fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&v| v == values[0])
}

/// Two-tailed p-value for H0: rho = 0 given sample r over n pairs.
///
/// Both tails together are I_x(df/2, 1/2) with x = df / (df + t^2).
fn two_tailed_p(r: f64, n: usize) -> f64 {
    let df = n as f64 - 2.0;
    let denom = 1.0 - r * r;
    if denom <= 0.0 {
        return 0.0;
    }
    let t2 = r * r * df / denom;
    incomplete_beta(df / 2.0, 0.5, df / (df + t2)).clamp(0.0, 1.0)
}
