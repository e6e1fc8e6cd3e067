use statrs::distribution::{ContinuousCDF, Normal};

/// Standard normal cumulative distribution Phi(x).
///
/// The only source of probability mass in the crate: every pricer calls this
/// and never re-derives it. statrs evaluates it through `erfc`, which keeps
/// full double precision in the tails (|x| up to ~10 and beyond).
#[inline]
pub fn cdf(x: f64) -> f64 {
    Normal::standard().cdf(x)
}
