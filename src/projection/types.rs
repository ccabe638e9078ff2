use anyhow::{anyhow, Result};

use crate::models::bs::bs_call_price;

/// Name of the central scenario
pub const EXPECTED: &str = "Expected";
/// Name of the pessimistic scenario
pub const WORST_CASE: &str = "Worst Case";
/// Name of the optimistic scenario
pub const BEST_CASE: &str = "Best Case";

/// A warrant holding sized by the amount invested at a known unit price.
///
/// Prices of the underlying and the strike are in the source currency;
/// `investment` and `initial_warrant_price` are in the target currency.
/// `exchange_rate` converts source-currency model prices to the target
/// currency (e.g. EUR per USD).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WarrantPosition {
    /// Amount invested, target currency
    pub investment: f64,
    /// Unit price paid per warrant, target currency
    pub initial_warrant_price: f64,
    /// Strike price of the warrant, source currency
    pub strike: f64,
    /// Volatility used to price the warrant (decimal)
    pub implied_volatility: f64,
    pub risk_free_rate: f64,
    /// Target-currency units per source-currency unit
    pub exchange_rate: f64,
}

impl WarrantPosition {
    /// Build a position, rejecting non-finite or non-positive sizing inputs
    pub fn new(
        investment: f64,
        initial_warrant_price: f64,
        strike: f64,
        implied_volatility: f64,
        risk_free_rate: f64,
        exchange_rate: f64,
    ) -> Result<Self> {
        let position = Self {
            investment,
            initial_warrant_price,
            strike,
            implied_volatility,
            risk_free_rate,
            exchange_rate,
        };
        position.validate()?;
        Ok(position)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("investment", self.investment),
            ("initial warrant price", self.initial_warrant_price),
            ("strike", self.strike),
            ("implied volatility", self.implied_volatility),
            ("exchange rate", self.exchange_rate),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(anyhow!("{} must be finite and positive, got {}", name, value));
            }
        }
        if !self.risk_free_rate.is_finite() {
            return Err(anyhow!(
                "risk-free rate must be finite, got {}",
                self.risk_free_rate
            ));
        }
        Ok(())
    }

    /// Number of warrants bought with the initial investment
    pub fn warrants_bought(&self) -> f64 {
        self.investment / self.initial_warrant_price
    }

    /// Model price of one warrant in the target currency
    pub fn warrant_price(&self, stock_price: f64, time_to_expiry: f64) -> f64 {
        let call_price = bs_call_price(
            stock_price,
            self.strike,
            time_to_expiry,
            self.risk_free_rate,
            self.implied_volatility,
        );
        call_price * self.exchange_rate
    }

    /// Value of the whole position in the target currency
    pub fn value(&self, stock_price: f64, time_to_expiry: f64) -> f64 {
        self.warrant_price(stock_price, time_to_expiry) * self.warrants_bought()
    }

    /// Unit price, position value and profit/loss for one price/time sample
    pub fn valuation(&self, stock_price: f64, time_to_expiry: f64) -> WarrantValuation {
        let warrant_price = self.warrant_price(stock_price, time_to_expiry);
        let investment_value = warrant_price * self.warrants_bought();
        WarrantValuation {
            warrant_price,
            investment_value,
            profit_loss_pct: (investment_value - self.investment) / self.investment * 100.0,
        }
    }
}

/// Projected value of a position at one stock price and time
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WarrantValuation {
    /// Price of one warrant, target currency
    pub warrant_price: f64,
    /// Value of all warrants held, target currency
    pub investment_value: f64,
    /// Profit or loss relative to the investment, in percent
    pub profit_loss_pct: f64,
}

/// Price targets defining one scenario
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioTargets {
    pub name: String,
    /// Price reached at the end of the near-term segment
    pub near_target: f64,
    /// Price reached at the end of the horizon
    pub far_target: f64,
}

impl ScenarioTargets {
    pub fn new(name: impl Into<String>, near_target: f64, far_target: f64) -> Self {
        Self {
            name: name.into(),
            near_target,
            far_target,
        }
    }
}

/// Upper and lower stock prices around a scenario point
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceBand {
    pub upper: f64,
    pub lower: f64,
}

/// Projected stock price at a month offset from today
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioPoint {
    pub month: u32,
    pub price: f64,
    pub bounds: Option<PriceBand>,
}

/// Named, month-ordered stock price path
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    pub name: String,
    pub points: Vec<ScenarioPoint>,
}

/// Valuation of the upper and lower band prices
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BandValuation {
    pub upper_price: f64,
    pub lower_price: f64,
    pub upper: WarrantValuation,
    pub lower: WarrantValuation,
}

/// One row of projection output
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResultRow {
    pub scenario: String,
    pub month: u32,
    /// Projected stock price, source currency
    pub stock_price: f64,
    /// Time to expiry used for pricing, after flooring
    pub time_to_expiry: f64,
    /// Price of one warrant, target currency
    pub warrant_price: f64,
    pub investment_value: f64,
    pub profit_loss_pct: f64,
    pub bounds: Option<BandValuation>,
}
