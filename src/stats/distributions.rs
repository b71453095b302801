//! Closed-form approximations of the distribution functions used by the tests
//!
//! Precision of each approximation (validate ports against a reference table
//! at these tolerances, not against exact values):
//!
//! | function            | method                                  | tolerance      |
//! |---------------------|-----------------------------------------|----------------|
//! | [`erf`]             | Abramowitz–Stegun 7.1.26                | ~1.5e-7 abs    |
//! | [`normal_cdf`]      | via `erf`                               | ~1.5e-7 abs    |
//! | [`normal_quantile`] | Acklam rational approximation           | ~1.15e-9 rel   |
//! | [`log_gamma`]       | Lanczos, g = 7, 9 coefficients          | ~1e-13 rel     |
//! | [`incomplete_beta`] | Lentz continued fraction                | 1e-10 per step |
//! | [`t_cdf`]           | incomplete beta, normal for df > 100    | ~1e-7 abs      |
//! | [`t_quantile`]      | Newton-Raphson on `t_cdf`, <= 10 steps  | step < 1e-10   |

use std::f64::consts::{PI, SQRT_2};

/// Degrees of freedom above which the t distribution is treated as normal
pub const T_NORMAL_APPROX_DF: f64 = 100.0;

/// Convergence tolerance of the incomplete-beta continued fraction
pub const BETA_CF_EPSILON: f64 = 1e-10;
const BETA_CF_MAX_ITERATIONS: usize = 200;
const BETA_CF_FPMIN: f64 = 1e-30;

const T_QUANTILE_MAX_ITERATIONS: usize = 10;
const T_QUANTILE_STEP_TOLERANCE: f64 = 1e-10;
const T_QUANTILE_MIN_DERIVATIVE: f64 = 1e-300;

#[allow(clippy::excessive_precision)]
const LANCZOS_COEFFICIENTS: [f64; 9] = [
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
const LANCZOS_G: f64 = 7.0;

/// Error function (Abramowitz–Stegun 7.1.26)
pub fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Standard normal cumulative distribution function
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Inverse of the standard normal CDF (Acklam's algorithm)
///
/// Returns `-inf` for `p <= 0` and `+inf` for `p >= 1`.
#[allow(clippy::excessive_precision)]
pub fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;
    const P_HIGH: f64 = 1.0 - P_LOW;

    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= P_HIGH {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

/// Natural log of the gamma function (Lanczos, g = 7)
pub fn log_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection: Γ(x)Γ(1-x) = π / sin(πx)
        return (PI / (PI * x).sin()).abs().ln() - log_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    let series = LANCZOS_COEFFICIENTS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS_COEFFICIENTS[0], |acc, (i, &c)| acc + c / (x + i as f64));

    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

/// Gamma function (Lanczos, g = 7)
pub fn gamma(x: f64) -> f64 {
    if x < 0.5 {
        return PI / ((PI * x).sin() * gamma(1.0 - x));
    }
    log_gamma(x).exp()
}

/// Regularized incomplete beta function `I_x(a, b)`
pub fn incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_front = log_gamma(a + b) - log_gamma(a) - log_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    // The continued fraction converges fastest below the mean of the distribution.
    let value = if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(x, a, b) / a
    } else {
        1.0 - front * beta_continued_fraction(1.0 - x, b, a) / b
    };
    value.clamp(0.0, 1.0)
}

/// Continued fraction for the incomplete beta (modified Lentz)
fn beta_continued_fraction(x: f64, a: f64, b: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = guard_tiny(1.0 - qab * x / qap).recip();
    let mut h = d;

    for m in 1..=BETA_CF_MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        let even = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = guard_tiny(1.0 + even * d).recip();
        c = guard_tiny(1.0 + even / c);
        h *= d * c;

        let odd = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = guard_tiny(1.0 + odd * d).recip();
        c = guard_tiny(1.0 + odd / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < BETA_CF_EPSILON {
            break;
        }
    }

    h
}

fn guard_tiny(v: f64) -> f64 {
    if v.abs() < BETA_CF_FPMIN {
        BETA_CF_FPMIN
    } else {
        v
    }
}

/// Student's t cumulative distribution function
pub fn t_cdf(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if df > T_NORMAL_APPROX_DF {
        return normal_cdf(t);
    }
    if t.is_infinite() {
        return if t > 0.0 { 1.0 } else { 0.0 };
    }

    let x = df / (df + t * t);
    let tail = 0.5 * incomplete_beta(x, df / 2.0, 0.5);
    if t >= 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

/// Student's t probability density function
pub fn t_pdf(t: f64, df: f64) -> f64 {
    let ln_norm = log_gamma((df + 1.0) / 2.0) - log_gamma(df / 2.0) - 0.5 * (df * PI).ln();
    (ln_norm - (df + 1.0) / 2.0 * (1.0 + t * t / df).ln()).exp()
}

/// Inverse of the Student's t CDF
///
/// Seeds Newton-Raphson with the normal quantile and refines against
/// [`t_cdf`] for at most 10 steps, stopping once a step is below 1e-10 or the
/// density vanishes. Returns the best estimate reached; it never fails.
pub fn t_quantile(p: f64, df: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    let mut x = normal_quantile(p);
    if df > T_NORMAL_APPROX_DF {
        return x;
    }

    for _ in 0..T_QUANTILE_MAX_ITERATIONS {
        let density = t_pdf(x, df);
        if density < T_QUANTILE_MIN_DERIVATIVE {
            break;
        }
        let step = (t_cdf(x, df) - p) / density;
        x -= step;
        if step.abs() < T_QUANTILE_STEP_TOLERANCE {
            break;
        }
    }
    x
}
