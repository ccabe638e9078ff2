// Black-Scholes call pricing and Vega for warrants valued as European calls.
// There is no dividend yield term and no put side; warrants here are calls only.

pub mod implied_vol;

pub use implied_vol::*;

use crate::models::traits::CallPricer;
use crate::models::utils::{normal_cdf, normal_pdf};

/// Smallest volatility used inside the Vega d1 denominator.
const VEGA_MIN_SIGMA: f64 = 1e-10;

/// Inputs to a single Black-Scholes evaluation.
///
/// Built fresh for every evaluation. Spot and strike are expected to be
/// positive but are not checked here: non-positive values propagate through
/// the logarithm as NaN or infinities.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingParameters {
    /// Underlying price S
    pub spot: f64,
    /// Strike price K
    pub strike: f64,
    /// Time to expiry T in years; T <= 0 means expired
    pub time_to_expiry: f64,
    /// Continuously compounded risk-free rate r
    pub rate: f64,
    /// Volatility σ as a decimal (0.3 = 30%)
    pub volatility: f64,
}

impl PricingParameters {
    pub fn new(spot: f64, strike: f64, time_to_expiry: f64, rate: f64, volatility: f64) -> Self {
        Self {
            spot,
            strike,
            time_to_expiry,
            rate,
            volatility,
        }
    }

    /// Same parameters with a different volatility
    pub fn with_volatility(self, volatility: f64) -> Self {
        Self { volatility, ..self }
    }

    /// Value of immediate exercise, `max(0, S - K)`
    pub fn intrinsic_value(&self) -> f64 {
        (self.spot - self.strike).max(0.0)
    }

    pub fn call_price(&self) -> f64 {
        bs_call_price(
            self.spot,
            self.strike,
            self.time_to_expiry,
            self.rate,
            self.volatility,
        )
    }

    pub fn vega(&self) -> f64 {
        bs_vega(
            self.spot,
            self.strike,
            self.time_to_expiry,
            self.rate,
            self.volatility,
        )
    }
}

/// Price of a European call option under Black-Scholes assumptions.
///
/// Falls back to intrinsic value `max(0, S - K)` when `T <= 0`. A spot of zero
/// prices to exactly zero for any positive `T`.
#[allow(non_snake_case)]
pub fn bs_call_price(S: f64, K: f64, T: f64, r: f64, sigma: f64) -> f64 {
    if T <= 0.0 {
        return (S - K).max(0.0);
    }
    let d1 = ((S / K).ln() + (r + 0.5 * sigma.powi(2)) * T) / (sigma * T.sqrt());
    let d2 = d1 - sigma * T.sqrt();
    S * normal_cdf(d1) - K * (-r * T).exp() * normal_cdf(d2)
}

/// Vega of a European call: `S * sqrt(T) * φ(d1)`.
///
/// Returns 0 when `T <= 0`. The volatility is floored at 1e-10 for the d1
/// computation only; the caller's value is left untouched.
#[allow(non_snake_case)]
pub fn bs_vega(S: f64, K: f64, T: f64, r: f64, sigma: f64) -> f64 {
    if T <= 0.0 {
        return 0.0;
    }
    let safe_sigma = sigma.max(VEGA_MIN_SIGMA);
    let d1 = ((S / K).ln() + (r + 0.5 * safe_sigma.powi(2)) * T) / (safe_sigma * T.sqrt());
    S * T.sqrt() * normal_pdf(d1)
}

/// Closed-form Black-Scholes call pricer
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackScholes;

impl CallPricer for BlackScholes {
    fn call_price(&self, params: &PricingParameters) -> f64 {
        params.call_price()
    }

    fn vega(&self, params: &PricingParameters) -> f64 {
        params.vega()
    }
}
