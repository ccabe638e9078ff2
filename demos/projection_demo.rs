// demos/projection_demo.rs

//! Demonstration of warrant value projection across three scenarios
//!
//! This example shows how to:
//! 1. Describe a warrant position
//! 2. Build a horizon from today's date to the warrant's end date
//! 3. Project Expected / Worst Case / Best Case paths with uncertainty bands
//! 4. Print the resulting value table

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use tracing_subscriber::EnvFilter;
use warrant_lib::{default_configs, project_from_dates, standard_scenarios, WarrantPosition};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Warrant Scenario Projection Demo");
    println!("================================");

    let config = default_configs::with_bands(0.3);

    // €2000 invested at €8.145 per warrant, strike $460, 30% IV, 0.92 EUR per USD
    let position = WarrantPosition::new(2000.0, 8.145, 460.0, 0.3, config.risk_free_rate, 0.92)?;
    println!("Warrants bought: {:.2}", position.warrants_bought());

    let today = Local::now().date_naive();
    let end_date = NaiveDate::from_ymd_opt(today.year() + 2, 12, 31).unwrap_or(today);

    let targets = standard_scenarios((300.0, 400.0), (150.0, 200.0), (450.0, 600.0));
    let rows = project_from_dates(&position, 200.0, today, end_date, &targets, &config)?;

    println!(
        "\n{:<12} {:>5} {:>10} {:>20} {:>10} {:>12} {:>10}",
        "Scenario", "Month", "Stock ($)", "Range ($)", "Warrant (€)", "Value (€)", "P/L (%)"
    );
    println!("{}", "-".repeat(88));

    for row in rows.iter().filter(|r| r.month % 6 == 0) {
        let range = row
            .bounds
            .map(|b| format!("{:.2} - {:.2}", b.lower_price, b.upper_price))
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "{:<12} {:>5} {:>10.2} {:>20} {:>10.2} {:>12.2} {:>10.2}",
            row.scenario,
            row.month,
            row.stock_price,
            range,
            row.warrant_price,
            row.investment_value,
            row.profit_loss_pct
        );
    }

    Ok(())
}
