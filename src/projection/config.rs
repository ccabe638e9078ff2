use crate::models::bs::SolverConfig;
use anyhow::Result;
#[cfg(feature = "serde")]
use anyhow::Context;
#[cfg(feature = "serde")]
use std::path::Path;

/// Settlement currency of a position, used to pick a default risk-free rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Currency {
    Eur,
    Usd,
}

impl Currency {
    /// Approximate policy rate: ECB for EUR, Fed for USD
    pub fn default_risk_free_rate(self) -> f64 {
        match self {
            Currency::Eur => 0.04,
            Currency::Usd => 0.05,
        }
    }
}

/// Configuration for scenario projection
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectionConfig {
    /// Risk-free rate used when pricing every projected point
    #[cfg_attr(feature = "serde", serde(default = "default_risk_free_rate"))]
    pub risk_free_rate: f64,

    /// Length of the near-term segment, in months
    #[cfg_attr(feature = "serde", serde(default = "default_near_horizon_months"))]
    pub near_horizon_months: u32,

    /// Replacement time to expiry (years) for points at or past expiry
    #[cfg_attr(feature = "serde", serde(default = "default_expiry_floor_years"))]
    pub expiry_floor_years: f64,

    /// Uncertainty band width at the end of the horizon (0.3 = ±30%); None disables bands
    #[cfg_attr(feature = "serde", serde(default))]
    pub band_width: Option<f64>,

    /// Implied volatility solver settings
    #[cfg_attr(feature = "serde", serde(default))]
    pub solver: SolverConfig,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            near_horizon_months: default_near_horizon_months(),
            expiry_floor_years: default_expiry_floor_years(),
            band_width: None,
            solver: SolverConfig::default(),
        }
    }
}

impl ProjectionConfig {
    /// Calculator settings: 1% rate, 24-month near segment, no bands
    pub fn calculator() -> Self {
        Self::default()
    }

    /// Default rate for the given settlement currency
    pub fn for_currency(currency: Currency) -> Self {
        Self {
            risk_free_rate: currency.default_risk_free_rate(),
            ..Self::default()
        }
    }

    /// Same settings with an uncertainty band of the given final width
    pub fn with_bands(self, band_width: f64) -> Self {
        Self {
            band_width: Some(band_width),
            ..self
        }
    }

    /// Parse a configuration from TOML; missing keys take their defaults
    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("Failed to parse projection config")
    }

    /// Load a configuration from a TOML file
    #[cfg(feature = "serde")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Reject settings that would break the time grid or the band formula
    pub fn validate(&self) -> Result<()> {
        if !self.risk_free_rate.is_finite() {
            anyhow::bail!("Risk-free rate must be finite, got {}", self.risk_free_rate);
        }
        if self.expiry_floor_years.is_nan() || self.expiry_floor_years <= 0.0 {
            anyhow::bail!(
                "Expiry floor must be positive, got {}",
                self.expiry_floor_years
            );
        }
        if self.near_horizon_months == 0 {
            anyhow::bail!("Near-term segment must be at least one month");
        }
        if let Some(width) = self.band_width {
            if !(width.is_finite() && width >= 0.0) {
                anyhow::bail!("Band width must be finite and non-negative, got {}", width);
            }
        }

        let solver = &self.solver;
        for (name, value) in [
            ("initial guess", solver.initial_guess),
            ("tolerance", solver.tolerance),
            ("minimum volatility", solver.min_volatility),
        ] {
            if !(value.is_finite() && value > 0.0) {
                anyhow::bail!("Solver {} must be finite and positive, got {}", name, value);
            }
        }
        if solver.vega_threshold.is_nan() || solver.vega_threshold < 0.0 {
            anyhow::bail!(
                "Solver vega threshold must be non-negative, got {}",
                solver.vega_threshold
            );
        }
        Ok(())
    }
}

fn default_risk_free_rate() -> f64 {
    0.01
}

fn default_near_horizon_months() -> u32 {
    24
}

fn default_expiry_floor_years() -> f64 {
    1e-4
}
