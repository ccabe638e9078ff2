use anyhow::{Context, Result};

use super::config::ProjectionConfig;
use super::scenario::{Horizon, ScenarioGenerator};
use super::types::*;
use crate::models::bs::{solve_implied_volatility, ImpliedVolSolution, SolverStatus};

/// Time to expiry used to price `month`, floored away from zero.
///
/// At and past the end date the floor keeps the pricer on its d1/d2 branch
/// instead of the intrinsic-value fallback.
pub fn time_to_expiry(horizon: &Horizon, month: u32, expiry_floor_years: f64) -> f64 {
    let t = horizon.years_remaining(month);
    if t <= 0.0 {
        expiry_floor_years
    } else {
        t
    }
}

/// Value every point of one scenario.
///
/// Rows keep the order of `scenario.points`. Band valuations are attached to
/// every point that carries bounds.
pub fn project_scenario(
    position: &WarrantPosition,
    horizon: &Horizon,
    scenario: &Scenario,
    config: &ProjectionConfig,
) -> Result<Vec<ResultRow>> {
    position.validate().context("Invalid warrant position")?;
    config.validate()?;

    Ok(value_points(position, horizon, scenario, config))
}

fn value_points(
    position: &WarrantPosition,
    horizon: &Horizon,
    scenario: &Scenario,
    config: &ProjectionConfig,
) -> Vec<ResultRow> {
    scenario
        .points
        .iter()
        .map(|point| {
            let t = time_to_expiry(horizon, point.month, config.expiry_floor_years);
            let base = position.valuation(point.price, t);
            let bounds = point.bounds.map(|band| BandValuation {
                upper_price: band.upper,
                lower_price: band.lower,
                upper: position.valuation(band.upper, t),
                lower: position.valuation(band.lower, t),
            });

            ResultRow {
                scenario: scenario.name.clone(),
                month: point.month,
                stock_price: point.price,
                time_to_expiry: t,
                warrant_price: base.warrant_price,
                investment_value: base.investment_value,
                profit_loss_pct: base.profit_loss_pct,
                bounds,
            }
        })
        .collect()
}

/// Generate and value every scenario on a shared horizon.
///
/// Rows are grouped by scenario in the order of `targets`, months ascending
/// within each scenario. The position's own risk-free rate is used for pricing.
///
/// # Errors
///
/// * The position fails [`WarrantPosition::validate`]
/// * The configuration fails [`ProjectionConfig::validate`]
pub fn project_scenarios(
    position: &WarrantPosition,
    horizon: &Horizon,
    targets: &[ScenarioTargets],
    config: &ProjectionConfig,
) -> Result<Vec<ResultRow>> {
    position.validate().context("Invalid warrant position")?;
    config.validate()?;

    let generator = ScenarioGenerator::new(*horizon).with_band_width(config.band_width);

    let mut rows = Vec::with_capacity(targets.len() * (horizon.total_months as usize + 1));
    for target in targets {
        let scenario = generator.generate(target);
        rows.extend(value_points(position, horizon, &scenario, config));
    }

    tracing::debug!(
        scenarios = targets.len(),
        rows = rows.len(),
        total_months = horizon.total_months,
        "projected warrant scenarios"
    );

    Ok(rows)
}

/// Market inputs for deriving a position's implied volatility from its purchase price
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketSnapshot {
    /// Current stock price, source currency
    pub stock_price: f64,
    /// Years until the warrant expires
    pub time_to_expiry: f64,
}

/// Build a position whose implied volatility reproduces `initial_warrant_price`.
///
/// The solver status is returned alongside so callers can tell a converged
/// volatility from a best-effort one. Fails on an invalid configuration, an
/// expired snapshot, or when the resulting position is invalid.
pub fn calibrate_position(
    investment: f64,
    initial_warrant_price: f64,
    strike: f64,
    exchange_rate: f64,
    snapshot: MarketSnapshot,
    config: &ProjectionConfig,
) -> Result<(WarrantPosition, ImpliedVolSolution)> {
    config.validate()?;

    let solution = solve_implied_volatility(
        initial_warrant_price,
        snapshot.stock_price,
        strike,
        snapshot.time_to_expiry,
        config.risk_free_rate,
        exchange_rate,
        &config.solver,
    );

    if solution.status == SolverStatus::Expired {
        anyhow::bail!(
            "Cannot calibrate an expired warrant (time to expiry {})",
            snapshot.time_to_expiry
        );
    }

    let position = WarrantPosition::new(
        investment,
        initial_warrant_price,
        strike,
        solution.volatility,
        config.risk_free_rate,
        exchange_rate,
    )?;

    Ok((position, solution))
}
