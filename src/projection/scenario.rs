//! Piecewise-linear stock price paths over a monthly grid
//!
//! A horizon of `total_months` is split into a near-term segment of at most
//! `near_horizon_months` (24 by default) and a far segment covering the rest.
//! Each scenario moves linearly from the current price to its near target over
//! the first segment, then linearly to its far target over the second.
//!
//! An optional uncertainty band widens with the square root of elapsed time,
//! `range(m) = width * sqrt(m / total_months)`, so that the band reaches
//! `±width` at the end of the horizon.

use chrono::{Datelike, NaiveDate};

use super::types::*;

/// Calendar months from `start` to `end`, ignoring the day of month.
///
/// Negative differences (end before start) clamp to 0.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let months = (end.year() as i64 - start.year() as i64) * 12
        + (end.month() as i64 - start.month() as i64);
    if months < 0 {
        tracing::warn!(%start, %end, "end date precedes start date, using an empty horizon");
        return 0;
    }
    u32::try_from(months).unwrap_or(u32::MAX)
}

/// Elapsed time in years between two dates (ACT/365). Negative if `end < start`.
pub fn year_fraction(start: NaiveDate, end: NaiveDate) -> f64 {
    (end - start).num_days() as f64 / 365.0
}

/// Time grid and starting price shared by every scenario of a projection
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Horizon {
    /// Stock price at month 0
    pub current_price: f64,
    /// Months from today to the end date
    pub total_months: u32,
    /// Length of the near-term segment, `min(total_months, near_horizon_months)`
    pub near_months: u32,
}

impl Horizon {
    pub fn new(current_price: f64, total_months: u32, near_horizon_months: u32) -> Self {
        Self {
            current_price,
            total_months,
            near_months: total_months.min(near_horizon_months),
        }
    }

    /// Horizon from today's date to the warrant's end date
    pub fn from_dates(
        current_price: f64,
        today: NaiveDate,
        end_date: NaiveDate,
        near_horizon_months: u32,
    ) -> Self {
        Self::new(
            current_price,
            months_between(today, end_date),
            near_horizon_months,
        )
    }

    /// Length of the far segment
    pub fn far_months(&self) -> u32 {
        self.total_months - self.near_months
    }

    /// Unfloored time to the end date at `month`, in years
    pub fn years_remaining(&self, month: u32) -> f64 {
        (self.total_months as f64 - month as f64) / 12.0
    }
}

/// Builds scenario paths on a fixed horizon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioGenerator {
    pub horizon: Horizon,
    /// Band width reached at the end of the horizon; None for no bands
    pub band_width: Option<f64>,
}

impl ScenarioGenerator {
    pub fn new(horizon: Horizon) -> Self {
        Self {
            horizon,
            band_width: None,
        }
    }

    pub fn with_band_width(self, band_width: Option<f64>) -> Self {
        Self { band_width, ..self }
    }

    /// Lazily yield the points of one scenario, month 0 through `total_months`
    pub fn path<'a>(&'a self, targets: &'a ScenarioTargets) -> ScenarioPath<'a> {
        ScenarioPath {
            generator: self,
            targets,
            next_month: 0,
        }
    }

    /// Collect the path of one scenario
    pub fn generate(&self, targets: &ScenarioTargets) -> Scenario {
        if self.horizon.total_months == 0 {
            tracing::warn!(
                scenario = %targets.name,
                "horizon has no months, scenario holds only the current price"
            );
        }
        Scenario {
            name: targets.name.clone(),
            points: self.path(targets).collect(),
        }
    }

    /// Generate every scenario in order
    pub fn generate_all(&self, targets: &[ScenarioTargets]) -> Vec<Scenario> {
        targets.iter().map(|t| self.generate(t)).collect()
    }

    /// Interpolated price at `month`
    pub fn price_at(&self, targets: &ScenarioTargets, month: u32) -> f64 {
        let h = &self.horizon;
        if month <= h.near_months {
            if h.near_months == 0 {
                return h.current_price;
            }
            let w = month as f64 / h.near_months as f64;
            h.current_price + (targets.near_target - h.current_price) * w
        } else {
            // month > near_months implies far_months > 0
            let w = (month - h.near_months) as f64 / h.far_months() as f64;
            targets.near_target + (targets.far_target - targets.near_target) * w
        }
    }

    /// Relative band half-width at `month`; 0 when bands are disabled
    pub fn band_range(&self, month: u32) -> f64 {
        match self.band_width {
            Some(width) if self.horizon.total_months > 0 => {
                width * (month as f64 / self.horizon.total_months as f64).sqrt()
            }
            _ => 0.0,
        }
    }

    fn point(&self, targets: &ScenarioTargets, month: u32) -> ScenarioPoint {
        let price = self.price_at(targets, month);
        let bounds = self.band_width.map(|_| {
            let range = self.band_range(month);
            let lower = price * (1.0 - range);
            if lower < 0.0 {
                tracing::warn!(month, price, range, "lower band below zero, clamping");
            }
            PriceBand {
                upper: price * (1.0 + range),
                lower: lower.max(0.0),
            }
        });
        ScenarioPoint {
            month,
            price,
            bounds,
        }
    }
}

/// Iterator over the points of one scenario
#[derive(Debug, Clone)]
pub struct ScenarioPath<'a> {
    generator: &'a ScenarioGenerator,
    targets: &'a ScenarioTargets,
    next_month: u32,
}

impl Iterator for ScenarioPath<'_> {
    type Item = ScenarioPoint;

    fn next(&mut self) -> Option<ScenarioPoint> {
        if self.next_month > self.generator.horizon.total_months {
            return None;
        }
        let point = self.generator.point(self.targets, self.next_month);
        self.next_month += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = self.generator.horizon.total_months as usize + 1;
        let remaining = total.saturating_sub(self.next_month as usize);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ScenarioPath<'_> {}

/// The three standard scenarios, each as `(near_target, far_target)`
pub fn standard_scenarios(
    expected: (f64, f64),
    worst_case: (f64, f64),
    best_case: (f64, f64),
) -> Vec<ScenarioTargets> {
    vec![
        ScenarioTargets::new(EXPECTED, expected.0, expected.1),
        ScenarioTargets::new(WORST_CASE, worst_case.0, worst_case.1),
        ScenarioTargets::new(BEST_CASE, best_case.0, best_case.1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_months_between_ignores_day() {
        assert_eq!(months_between(date(2024, 1, 31), date(2024, 2, 1)), 1);
        assert_eq!(months_between(date(2024, 3, 15), date(2026, 12, 31)), 33);
        assert_eq!(months_between(date(2024, 3, 15), date(2024, 3, 1)), 0);
        assert_eq!(months_between(date(2025, 6, 1), date(2024, 3, 1)), 0);
    }

    #[test]
    fn test_year_fraction_act_365() {
        assert_eq!(year_fraction(date(2025, 1, 1), date(2026, 1, 1)), 1.0);
        assert_eq!(year_fraction(date(2025, 1, 1), date(2025, 1, 1)), 0.0);
        assert!(year_fraction(date(2026, 6, 26), date(2026, 1, 1)) < 0.0);
    }

    #[test]
    fn test_segment_boundaries() {
        let generator = ScenarioGenerator::new(Horizon::new(200.0, 30, 24));
        let targets = ScenarioTargets::new("t", 300.0, 400.0);

        assert_eq!(generator.price_at(&targets, 0), 200.0);
        assert!((generator.price_at(&targets, 12) - 250.0).abs() < 1e-12);
        assert!((generator.price_at(&targets, 24) - 300.0).abs() < 1e-12);
        assert!((generator.price_at(&targets, 27) - 350.0).abs() < 1e-12);
        assert!((generator.price_at(&targets, 30) - 400.0).abs() < 1e-12);
    }

    #[test]
    fn test_band_range_scaling() {
        let generator =
            ScenarioGenerator::new(Horizon::new(100.0, 16, 24)).with_band_width(Some(0.4));

        assert_eq!(generator.band_range(0), 0.0);
        assert!((generator.band_range(4) - 0.2).abs() < 1e-12);
        assert!((generator.band_range(16) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_path_size_hint() {
        let generator = ScenarioGenerator::new(Horizon::new(100.0, 10, 24));
        let targets = ScenarioTargets::new("t", 110.0, 120.0);
        let mut path = generator.path(&targets);
        assert_eq!(path.len(), 11);
        path.next();
        assert_eq!(path.len(), 10);
    }
}
