pub mod bs;

/// Common traits used by the pricing models
pub mod traits {
    use crate::models::bs::PricingParameters;

    /// European call pricer exposing the volatility sensitivity needed by
    /// the implied-volatility solver.
    pub trait CallPricer {
        fn call_price(&self, params: &PricingParameters) -> f64;
        fn vega(&self, params: &PricingParameters) -> f64;
    }
}

/// Normal distribution helpers shared by the pricer and the Vega calculator
pub mod utils {
    use std::f64::consts::{PI, SQRT_2};

    /// Standard normal cumulative distribution function approximation.
    ///
    /// Accurate to roughly 1e-7 and exactly symmetric: `normal_cdf(x) +
    /// normal_cdf(-x) == 1` up to the rounding of `erf(0)`.
    pub fn normal_cdf(x: f64) -> f64 {
        0.5 * (1.0 + erf(x / SQRT_2))
    }

    /// Standard normal probability density function
    pub fn normal_pdf(x: f64) -> f64 {
        (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
    }

    /// Error function approximation (Abramowitz & Stegun 7.1.26)
    pub fn erf(x: f64) -> f64 {
        let a1 = 0.254829592;
        let a2 = -0.284496736;
        let a3 = 1.421413741;
        let a4 = -1.453152027;
        let a5 = 1.061405429;
        let p = 0.3275911;

        let sign = if x < 0.0 { -1.0 } else { 1.0 };
        let x = x.abs();

        // x = +inf gives t = 0 and exp(-inf) = 0, so erf saturates at 1 without NaN
        let t = 1.0 / (1.0 + p * x);
        let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

        sign * y
    }
}
