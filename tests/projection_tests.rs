
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use test_utils::{assert_close, base_position, create_test_config, position_with_investment};
use warrant_lib::{
    bs_call_price, calibrate_position, project_from_dates, project_scenario, project_scenarios,
    standard_scenarios, time_to_expiry, Horizon, MarketSnapshot, ProjectionConfig,
    ScenarioGenerator, ScenarioTargets, WarrantPosition, BEST_CASE, EXPECTED, WORST_CASE,
};

#[test]
fn test_base_scenario_value_in_range() {
    let position = base_position();
    let value = position.value(350.0, 2.5);

    assert!(value > 0.0, "value should be positive, got {value}");
    assert!(value < position.investment * 10.0, "value {value} unreasonably large");

    let expected = bs_call_price(350.0, 460.0, 2.5, position.risk_free_rate, 0.3)
        * 0.92
        * (2000.0 / 8.145);
    assert_close(value, expected, 1e-9, "value from composition");
}

#[test]
fn test_value_scales_linearly_with_investment() {
    let value1 = base_position().value(350.0, 2.5);
    let value2 = position_with_investment(4000.0).value(350.0, 2.5);
    assert!(
        ((value2 - 2.0 * value1) / value1).abs() < 1e-2,
        "doubling the investment should double the value: {value1} -> {value2}"
    );

    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..100 {
        let investment: f64 = rng.gen_range(100.0..100_000.0);
        let factor: f64 = rng.gen_range(0.5..5.0);
        let a = position_with_investment(investment).value(420.0, 1.7);
        let b = position_with_investment(investment * factor).value(420.0, 1.7);
        assert!(((b - a * factor) / (a * factor)).abs() < 1e-9);
    }
}

#[test]
fn test_time_decay_below_strike() {
    let position = base_position();
    let long = position.value(350.0, 2.5);
    let short = position.value(350.0, 1.25);
    assert!(short < long, "value should decay: {long} -> {short}");

    let mut previous = position.value(350.0, 3.0);
    for months_left in (1..36).rev() {
        let value = position.value(350.0, months_left as f64 / 12.0);
        assert!(value < previous, "no decay at {months_left} months");
        previous = value;
    }
}

#[test]
fn test_value_after_one_month() {
    let position = base_position();
    let initial_t = 2.5;
    let price_after_one_month = 350.0 + (500.0 - 350.0) / 24.0;

    let initial_value = position.value(350.0, initial_t);
    let value_after = position.value(price_after_one_month, initial_t - 1.0 / 12.0);

    assert!(value_after > 0.0);
    assert!(value_after < position.investment * 10.0);

    let pct_change = (value_after - initial_value) / initial_value * 100.0;
    assert!(pct_change.abs() < 50.0, "monthly change {pct_change}% too large");
    assert!(value_after > initial_value, "moving toward target should gain value");
}

#[test]
fn test_valuation_profit_loss() {
    let position = base_position();
    let valuation = position.valuation(600.0, 0.5);

    assert_close(
        valuation.investment_value,
        valuation.warrant_price * position.warrants_bought(),
        1e-9,
        "position value",
    );
    let pct = (valuation.investment_value - 2000.0) / 2000.0 * 100.0;
    assert_close(valuation.profit_loss_pct, pct, 1e-9, "profit/loss");
}

#[test]
fn test_projection_rows_ordered_by_scenario_then_month() {
    let position = base_position();
    let config = create_test_config(None);
    let horizon = Horizon::new(200.0, 30, config.near_horizon_months);
    let targets = standard_scenarios((300.0, 400.0), (150.0, 200.0), (450.0, 600.0));

    let rows = project_scenarios(&position, &horizon, &targets, &config).unwrap();
    assert_eq!(rows.len(), 3 * 31);

    let names: Vec<&str> = rows.iter().map(|r| r.scenario.as_str()).collect();
    assert!(names[..31].iter().all(|&n| n == EXPECTED));
    assert!(names[31..62].iter().all(|&n| n == WORST_CASE));
    assert!(names[62..].iter().all(|&n| n == BEST_CASE));

    for chunk in rows.chunks(31) {
        for (i, row) in chunk.iter().enumerate() {
            assert_eq!(row.month, i as u32);
            assert!(row.bounds.is_none());
        }
        for pair in chunk.windows(2) {
            assert!(
                pair[1].time_to_expiry < pair[0].time_to_expiry,
                "time to expiry must fall as months advance"
            );
        }
    }

    // Segment endpoints hit the targets
    assert_close(rows[0].stock_price, 200.0, 1e-12, "month 0");
    assert_close(rows[24].stock_price, 300.0, 1e-9, "near target");
    assert_close(rows[30].stock_price, 400.0, 1e-9, "far target");
    assert_close(rows[31 + 24].stock_price, 150.0, 1e-9, "worst near target");
    assert_close(rows[62 + 30].stock_price, 600.0, 1e-9, "best far target");
}

#[test]
fn test_expiry_month_uses_floor() {
    let position = base_position();
    let config = create_test_config(None);
    let horizon = Horizon::new(200.0, 12, config.near_horizon_months);
    let targets = vec![ScenarioTargets::new(EXPECTED, 500.0, 500.0)];

    let rows = project_scenarios(&position, &horizon, &targets, &config).unwrap();
    let last = rows.last().unwrap();
    assert_eq!(last.month, 12);
    assert_eq!(last.time_to_expiry, config.expiry_floor_years);

    // Floored T keeps the price close to intrinsic value
    let intrinsic_eur = (500.0 - 460.0) * position.exchange_rate;
    assert_close(last.warrant_price, intrinsic_eur, 0.1, "warrant price at expiry");

    assert_eq!(time_to_expiry(&horizon, 6, 1e-4), 0.5);
    assert_eq!(time_to_expiry(&horizon, 12, 1e-4), 1e-4);
}

#[test]
fn test_short_horizon_has_no_far_segment() {
    let generator = ScenarioGenerator::new(Horizon::new(100.0, 10, 24));
    let scenario = generator.generate(&ScenarioTargets::new("short", 150.0, 999.0));

    assert_eq!(scenario.points.len(), 11);
    assert_close(scenario.points[10].price, 150.0, 1e-12, "near target at horizon end");
    assert!(scenario.points.iter().all(|p| p.price <= 150.0));
}

#[test]
fn test_empty_horizon_single_point() {
    let position = base_position();
    let config = create_test_config(Some(0.3));
    let horizon = Horizon::new(350.0, 0, 24);
    let targets = standard_scenarios((1.0, 2.0), (3.0, 4.0), (5.0, 6.0));

    let rows = project_scenarios(&position, &horizon, &targets, &config).unwrap();
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.month, 0);
        assert_eq!(row.stock_price, 350.0);
        assert_eq!(row.time_to_expiry, config.expiry_floor_years);
        assert!(row.investment_value.is_finite());

        let bounds = row.bounds.expect("bands enabled");
        assert_eq!(bounds.upper_price, 350.0);
        assert_eq!(bounds.lower_price, 350.0);
    }
}

#[test]
fn test_bands_widen_with_sqrt_time() {
    let position = base_position();
    let config = create_test_config(Some(0.3));
    let horizon = Horizon::new(400.0, 36, config.near_horizon_months);
    let targets = vec![ScenarioTargets::new(EXPECTED, 400.0, 400.0)];

    let rows = project_scenarios(&position, &horizon, &targets, &config).unwrap();
    assert_eq!(rows.len(), 37);

    let first = rows[0].bounds.unwrap();
    assert_eq!(first.upper_price, 400.0);
    assert_eq!(first.lower_price, 400.0);

    let quarter = rows[9].bounds.unwrap();
    assert_close(quarter.upper_price, 400.0 * 1.15, 1e-9, "upper at 9/36");
    assert_close(quarter.lower_price, 400.0 * 0.85, 1e-9, "lower at 9/36");

    let last = rows[36].bounds.unwrap();
    assert_close(last.upper_price, 520.0, 1e-9, "upper at horizon end");
    assert_close(last.lower_price, 280.0, 1e-9, "lower at horizon end");

    for row in &rows {
        let band = row.bounds.unwrap();
        assert!(band.upper.investment_value >= row.investment_value);
        assert!(band.lower.investment_value <= row.investment_value);
        assert_close(
            band.upper.investment_value,
            position.value(band.upper_price, row.time_to_expiry),
            1e-9,
            "upper valuation",
        );
    }
}

#[test]
fn test_wide_band_clamps_lower_price_at_zero() {
    let position = base_position();
    let config = create_test_config(Some(2.0));
    let horizon = Horizon::new(300.0, 12, 24);
    let targets = vec![ScenarioTargets::new(WORST_CASE, 300.0, 300.0)];

    let rows = project_scenarios(&position, &horizon, &targets, &config).unwrap();
    let last = rows.last().unwrap().bounds.unwrap();

    assert_eq!(last.lower_price, 0.0);
    assert_eq!(last.lower.investment_value, 0.0);
    assert_close(last.lower.profit_loss_pct, -100.0, 1e-12, "total loss");
    assert!(rows.iter().all(|r| r.bounds.unwrap().lower.investment_value.is_finite()));
}

#[test]
fn test_project_scenario_matches_batch() {
    let position = base_position();
    let config = create_test_config(Some(0.2));
    let horizon = Horizon::new(250.0, 40, config.near_horizon_months);
    let targets = standard_scenarios((300.0, 420.0), (200.0, 150.0), (400.0, 700.0));

    let batch = project_scenarios(&position, &horizon, &targets, &config).unwrap();

    let generator = ScenarioGenerator::new(horizon).with_band_width(config.band_width);
    let worst = generator.generate(&targets[1]);
    let single = project_scenario(&position, &horizon, &worst, &config).unwrap();

    assert_eq!(single.as_slice(), &batch[41..82]);
}

#[test]
fn test_invalid_position_rejected() {
    let config = create_test_config(None);
    let horizon = Horizon::new(200.0, 12, 24);
    let targets = standard_scenarios((300.0, 400.0), (150.0, 200.0), (450.0, 600.0));

    let zero_price = WarrantPosition {
        initial_warrant_price: 0.0,
        ..base_position()
    };
    let err = project_scenarios(&zero_price, &horizon, &targets, &config).unwrap_err();
    assert!(format!("{err:#}").contains("initial warrant price"));

    assert!(WarrantPosition::new(-1.0, 8.0, 460.0, 0.3, 0.01, 0.92).is_err());
    assert!(WarrantPosition::new(2000.0, 8.0, 460.0, f64::NAN, 0.01, 0.92).is_err());
    assert!(WarrantPosition::new(2000.0, 8.0, 460.0, 0.3, 0.01, 0.0).is_err());
    assert!(WarrantPosition::new(2000.0, 8.0, 460.0, 0.3, 0.01, 0.92).is_ok());
}

#[test]
fn test_invalid_config_rejected() {
    let position = base_position();
    let horizon = Horizon::new(200.0, 12, 24);
    let targets = standard_scenarios((300.0, 400.0), (150.0, 200.0), (450.0, 600.0));

    let negative_band = create_test_config(Some(-0.1));
    assert!(project_scenarios(&position, &horizon, &targets, &negative_band).is_err());

    let zero_floor = ProjectionConfig {
        expiry_floor_years: 0.0,
        ..ProjectionConfig::default()
    };
    assert!(project_scenarios(&position, &horizon, &targets, &zero_floor).is_err());
}

#[test]
fn test_empty_near_segment_rejected() {
    let position = base_position();
    let config = ProjectionConfig {
        near_horizon_months: 0,
        ..ProjectionConfig::default()
    };
    let horizon = Horizon::new(200.0, 12, config.near_horizon_months);
    let targets = vec![ScenarioTargets::new(EXPECTED, 300.0, 400.0)];

    let err = project_scenarios(&position, &horizon, &targets, &config).unwrap_err();
    assert!(format!("{err}").contains("at least one month"));

    // With a one-month near segment the near target is the month 1 price
    let config = ProjectionConfig {
        near_horizon_months: 1,
        ..ProjectionConfig::default()
    };
    let horizon = Horizon::new(200.0, 12, config.near_horizon_months);
    let rows = project_scenarios(&position, &horizon, &targets, &config).unwrap();
    assert_close(rows[1].stock_price, 300.0, 1e-12, "near target at month 1");
    assert_close(rows[12].stock_price, 400.0, 1e-9, "far target at horizon end");
}

#[test]
fn test_project_from_dates() {
    let position = base_position();
    let config = create_test_config(Some(0.3));
    let today = NaiveDate::from_ymd_opt(2024, 12, 10).unwrap();
    let end = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
    let targets = standard_scenarios((300.0, 400.0), (150.0, 200.0), (450.0, 600.0));

    let rows = project_from_dates(&position, 200.0, today, end, &targets, &config).unwrap();
    // 24 months: the whole horizon is the near segment
    assert_eq!(rows.len(), 3 * 25);
    assert_close(rows[24].stock_price, 300.0, 1e-9, "near target at end");

    // End date in the past collapses to month 0
    let past = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let rows = project_from_dates(&position, 200.0, today, past, &targets, &config).unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_calibrate_position_recovers_volatility() {
    let config = create_test_config(None);
    let snapshot = MarketSnapshot {
        stock_price: 350.0,
        time_to_expiry: 2.5,
    };
    let fx = 0.92;
    let initial_warrant_price = bs_call_price(350.0, 460.0, 2.5, config.risk_free_rate, 0.45) * fx;

    let (position, solution) =
        calibrate_position(2000.0, initial_warrant_price, 460.0, fx, snapshot, &config).unwrap();

    assert!(solution.converged());
    assert_close(position.implied_volatility, 0.45, 1e-4, "calibrated volatility");
    // The calibrated position is worth its investment today
    assert_close(position.value(350.0, 2.5), 2000.0, 1e-2, "value at purchase");
}

#[test]
fn test_calibrate_expired_position_fails() {
    let config = create_test_config(None);
    let snapshot = MarketSnapshot {
        stock_price: 350.0,
        time_to_expiry: 0.0,
    };
    assert!(calibrate_position(2000.0, 8.145, 460.0, 0.92, snapshot, &config).is_err());
}

#[test]
fn test_calibrate_rejects_invalid_config() {
    let snapshot = MarketSnapshot {
        stock_price: 350.0,
        time_to_expiry: 2.5,
    };
    let mut config = create_test_config(None);
    config.solver.initial_guess = f64::NAN;
    assert!(calibrate_position(2000.0, 8.145, 460.0, 0.92, snapshot, &config).is_err());

    let mut config = create_test_config(None);
    config.solver.min_volatility = 0.0;
    assert!(calibrate_position(2000.0, 8.145, 460.0, 0.92, snapshot, &config).is_err());
}
