//! Backing out implied volatility from a quoted warrant price

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use warrant_lib::{calibrate_position, default_configs, MarketSnapshot, SolverStatus};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = default_configs::eur();
    let snapshot = MarketSnapshot {
        stock_price: 350.0,
        time_to_expiry: 2.5,
    };

    let (position, solution) = calibrate_position(2000.0, 8.145, 460.0, 0.92, snapshot, &config)?;

    println!("Quoted warrant price: €{:.3}", position.initial_warrant_price);
    println!(
        "Implied volatility:   {:.2}% after {} iterations",
        solution.volatility * 100.0,
        solution.iterations
    );
    match solution.status {
        SolverStatus::Converged => println!("Solver converged"),
        other => println!("Solver stopped early: {:?}", other),
    }
    println!(
        "Model value today:    €{:.2}",
        position.value(snapshot.stock_price, snapshot.time_to_expiry)
    );

    Ok(())
}
