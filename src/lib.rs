//! # Warrant-Lib: Black-Scholes Warrant Value Projection
//!
//! `warrant-lib` projects the future value of a warrant position under user-supplied
//! stock price scenarios. Warrants are priced as European calls with the Black-Scholes
//! formula, converted into the investor's currency and scaled by the number of warrants
//! bought.
//!
//! ## Core Features
//!
//! - **Normal CDF**: Abramowitz-Stegun rational approximation, exactly symmetric
//! - **Black-Scholes Pricing**: European call price and Vega
//! - **Implied Volatility**: Newton-Raphson solver with an explicit termination status
//! - **Scenario Paths**: Two-segment linear price paths with square-root-of-time bands
//! - **Projection**: Month-by-month warrant price, position value and profit/loss
//!
//! ## Quick Start
//!
//! ```rust
//! use warrant_lib::{
//!     default_configs, project_scenarios, standard_scenarios, Horizon, WarrantPosition,
//! };
//!
//! let config = default_configs::calculator();
//! let position = WarrantPosition::new(2000.0, 8.145, 460.0, 0.3, config.risk_free_rate, 0.92)?;
//!
//! // 30 months out, first 24 months toward the near targets
//! let horizon = Horizon::new(350.0, 30, config.near_horizon_months);
//! let targets = standard_scenarios((400.0, 500.0), (250.0, 300.0), (500.0, 700.0));
//!
//! let rows = project_scenarios(&position, &horizon, &targets, &config)?;
//! assert_eq!(rows.len(), 3 * 31);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Numeric Conventions
//!
//! The pricing primitives never fail. `T <= 0` prices to intrinsic value, Vega is 0
//! at expiry, and the solver floors volatility at 0.001. Non-positive spot or strike
//! values are not rejected by the primitives and surface as NaN; the projection layer
//! validates positions before pricing.

// ================================================================================================
// MODULES
// ================================================================================================

pub mod models;
pub mod projection;

// ================================================================================================
// IMPORTS
// ================================================================================================

use anyhow::Result;
use chrono::NaiveDate;

// ================================================================================================
// PUBLIC RE-EXPORTS
// ================================================================================================

// Pricing primitives
pub use models::bs::{
    bs_call_price, bs_vega, implied_volatility, solve_implied_volatility,
    solve_implied_volatility_with, BlackScholes, ImpliedVolSolution, PricingParameters,
    SolverConfig, SolverStatus,
};
pub use models::traits::CallPricer;
pub use models::utils::{normal_cdf, normal_pdf};

// Projection types and functions
pub use projection::{
    calibrate_position, months_between, project_scenario, project_scenarios, standard_scenarios,
    time_to_expiry, year_fraction, BandValuation, Currency, Horizon, MarketSnapshot, PriceBand,
    ProjectionConfig, ResultRow, Scenario, ScenarioGenerator, ScenarioPoint, ScenarioTargets,
    WarrantPosition, WarrantValuation, BEST_CASE, EXPECTED, WORST_CASE,
};

// ================================================================================================
// DEFAULT CONFIGURATIONS
// ================================================================================================

/// Pre-configured projection settings.
///
/// - [`calculator()`]: 1% risk-free rate, 24-month near segment, no bands
/// - [`eur()`]: ECB-like 4% risk-free rate
/// - [`usd()`]: Fed-like 5% risk-free rate
/// - [`with_bands()`]: calculator settings plus an uncertainty band
pub mod default_configs {
    use crate::projection::config::{Currency, ProjectionConfig};

    /// Warrant calculator settings: 1% rate, 24-month near segment, no bands.
    ///
    /// ```rust
    /// use warrant_lib::default_configs;
    ///
    /// let config = default_configs::calculator();
    /// assert_eq!(config.near_horizon_months, 24);
    /// assert!(config.band_width.is_none());
    /// ```
    pub fn calculator() -> ProjectionConfig {
        ProjectionConfig::calculator()
    }

    /// Default settings for a EUR-settled position
    pub fn eur() -> ProjectionConfig {
        ProjectionConfig::for_currency(Currency::Eur)
    }

    /// Default settings for a USD-settled position
    pub fn usd() -> ProjectionConfig {
        ProjectionConfig::for_currency(Currency::Usd)
    }

    /// Calculator settings with a band reaching `±band_width` at the end of the horizon.
    ///
    /// ```rust
    /// use warrant_lib::default_configs;
    ///
    /// let config = default_configs::with_bands(0.3);
    /// assert_eq!(config.band_width, Some(0.3));
    /// ```
    pub fn with_bands(band_width: f64) -> ProjectionConfig {
        ProjectionConfig::calculator().with_bands(band_width)
    }
}

/// Project scenarios from today's date to the warrant's end date.
///
/// The horizon is the calendar month difference between `today` and `end_date`
/// (day of month ignored), split at `config.near_horizon_months`.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use warrant_lib::{default_configs, project_from_dates, standard_scenarios, WarrantPosition};
///
/// let config = default_configs::with_bands(0.3);
/// let position = WarrantPosition::new(2000.0, 8.145, 460.0, 0.3, 0.01, 1.0)?;
/// let today = NaiveDate::from_ymd_opt(2024, 12, 10).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
/// let targets = standard_scenarios((300.0, 400.0), (150.0, 200.0), (450.0, 600.0));
///
/// let rows = project_from_dates(&position, 200.0, today, end, &targets, &config)?;
/// assert!(rows.iter().all(|row| row.bounds.is_some()));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn project_from_dates(
    position: &WarrantPosition,
    current_price: f64,
    today: NaiveDate,
    end_date: NaiveDate,
    targets: &[ScenarioTargets],
    config: &ProjectionConfig,
) -> Result<Vec<ResultRow>> {
    let horizon = Horizon::from_dates(current_price, today, end_date, config.near_horizon_months);
    project_scenarios(position, &horizon, targets, config)
}
