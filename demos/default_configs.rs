use warrant_lib::{default_configs, ProjectionConfig};

fn describe(name: &str, config: &ProjectionConfig) {
    println!("{name}:");
    println!("   Risk-free rate: {:.2}%", config.risk_free_rate * 100.0);
    println!("   Near segment: {} months", config.near_horizon_months);
    println!("   Expiry floor: {:.1e} years", config.expiry_floor_years);
    match config.band_width {
        Some(width) => println!("   Band width: ±{:.0}%", width * 100.0),
        None => println!("   Band width: none"),
    }
    println!(
        "   Solver: σ₀={}, tol={:.0e}, max {} iterations\n",
        config.solver.initial_guess, config.solver.tolerance, config.solver.max_iterations
    );
}

fn main() {
    println!("Warrant-lib Default Configuration Examples\n");

    describe("1. Calculator", &default_configs::calculator());
    describe("2. EUR", &default_configs::eur());
    describe("3. USD", &default_configs::usd());
    describe("4. Calculator with bands", &default_configs::with_bands(0.3));

    let from_toml = ProjectionConfig::from_toml_str(
        r#"
        risk_free_rate = 0.035
        band_width = 0.25

        [solver]
        max_iterations = 50
        "#,
    );
    match from_toml {
        Ok(config) => describe("5. From TOML", &config),
        Err(e) => eprintln!("Failed to parse config: {e:#}"),
    }
}
