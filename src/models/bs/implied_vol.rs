//! Newton-Raphson implied volatility for warrants quoted in a second currency
//!
//! The model price is computed in the underlying's currency and converted with
//! `exchange_rate` before it is compared with the observed market price, so the
//! solver works directly on quotes such as a EUR warrant on a USD stock.
//!
//! The iteration always terminates: it is bounded by
//! [`SolverConfig::max_iterations`] and exits early on a flat derivative.
//! [`ImpliedVolSolution::status`] tells the caller which of those happened.

use super::{BlackScholes, PricingParameters};
use crate::models::traits::CallPricer;

/// Newton-Raphson settings for implied volatility solving
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Starting volatility σ₀
    pub initial_guess: f64,
    /// Absolute price difference accepted as converged
    pub tolerance: f64,
    /// Hard cap on Newton steps
    pub max_iterations: usize,
    /// Floor applied to σ after every step
    pub min_volatility: f64,
    /// |vega| below this is treated as a flat region
    pub vega_threshold: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.2,
            tolerance: 1e-5,
            max_iterations: 100,
            min_volatility: 0.001,
            vega_threshold: 1e-10,
        }
    }
}

/// How the solver stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Model price matched the market price within tolerance
    Converged,
    /// Vega fell below the threshold; the last σ is a best effort
    FlatVega,
    /// Iteration cap reached without convergence
    MaxIterations,
    /// T <= 0, nothing to solve; volatility is reported as 0
    Expired,
}

/// Result of an implied volatility solve
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpliedVolSolution {
    pub volatility: f64,
    /// Newton updates applied before stopping
    pub iterations: usize,
    pub status: SolverStatus,
}

impl ImpliedVolSolution {
    pub fn converged(&self) -> bool {
        self.status == SolverStatus::Converged
    }
}

/// Implied volatility with the default solver settings, returning only σ.
///
/// Returns 0 when `T <= 0`. The returned value is the final iterate whether
/// or not the solver converged; use [`solve_implied_volatility`] to find out.
#[allow(non_snake_case)]
pub fn implied_volatility(
    market_price: f64,
    S: f64,
    K: f64,
    T: f64,
    r: f64,
    exchange_rate: f64,
) -> f64 {
    solve_implied_volatility(market_price, S, K, T, r, exchange_rate, &SolverConfig::default())
        .volatility
}

/// Solve for the volatility reproducing `market_price` with the Black-Scholes pricer.
#[allow(non_snake_case)]
pub fn solve_implied_volatility(
    market_price: f64,
    S: f64,
    K: f64,
    T: f64,
    r: f64,
    exchange_rate: f64,
    config: &SolverConfig,
) -> ImpliedVolSolution {
    let params = PricingParameters::new(S, K, T, r, config.initial_guess);
    solve_implied_volatility_with(&BlackScholes, market_price, params, exchange_rate, config)
}

/// Solve for implied volatility with any [`CallPricer`].
///
/// `params.volatility` is ignored; the search starts at `config.initial_guess`.
pub fn solve_implied_volatility_with<P: CallPricer>(
    pricer: &P,
    market_price: f64,
    params: PricingParameters,
    exchange_rate: f64,
    config: &SolverConfig,
) -> ImpliedVolSolution {
    if params.time_to_expiry <= 0.0 {
        return ImpliedVolSolution {
            volatility: 0.0,
            iterations: 0,
            status: SolverStatus::Expired,
        };
    }

    let mut sigma = config.initial_guess;
    let mut iterations = 0;
    let mut status = SolverStatus::MaxIterations;

    while iterations < config.max_iterations {
        let trial = params.with_volatility(sigma);
        let price = pricer.call_price(&trial) * exchange_rate;
        let vega = pricer.vega(&trial) * exchange_rate;

        if vega.abs() < config.vega_threshold {
            status = SolverStatus::FlatVega;
            break;
        }

        let price_difference = price - market_price;

        if price_difference.abs() < config.tolerance {
            status = SolverStatus::Converged;
            break;
        }

        // The floor keeps σ·√T strictly positive for the next pricing call
        sigma = (sigma - price_difference / vega).max(config.min_volatility);
        iterations += 1;
    }

    match status {
        SolverStatus::Converged => {
            tracing::debug!(sigma, iterations, market_price, "implied volatility converged");
        }
        SolverStatus::FlatVega => {
            tracing::warn!(
                sigma,
                iterations,
                market_price,
                "vega below threshold, returning last implied volatility estimate"
            );
        }
        SolverStatus::MaxIterations => {
            tracing::warn!(
                sigma,
                iterations,
                market_price,
                "implied volatility did not converge within the iteration cap"
            );
        }
        SolverStatus::Expired => {}
    }

    ImpliedVolSolution {
        volatility: sigma,
        iterations,
        status,
    }
}
