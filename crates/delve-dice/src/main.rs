//! Delve dice diagnostics.
//!
//! Rolls a dice expression many times on the gameplay stream of a
//! configured registry and prints the resulting distribution.
//!
//! Environment:
//! - `DELVE_DICE`: dice notation, default `3d6`
//! - `DELVE_TRIALS`: number of rolls, default 10000
//! - `DELVE_SEED`, `DELVE_SEED_<STREAM>`: registry seeds

use std::collections::BTreeMap;
use std::error::Error;

use delve_core::error::ConfigError;
use delve_random::{DiceDef, GeneratorRegistry, RegistryConfig};
use tracing_subscriber::EnvFilter;

const BAR_WIDTH: usize = 50;

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Read configuration from environment.
    let config = RegistryConfig::from_env()?;
    let dice: DiceDef = std::env::var("DELVE_DICE")
        .unwrap_or_else(|_| "3d6".to_string())
        .parse()?;
    let trials: u32 = std::env::var("DELVE_TRIALS")
        .unwrap_or_else(|_| "10000".to_string())
        .parse()
        .map_err(|e| ConfigError::InvalidSetting {
            var: "DELVE_TRIALS".to_string(),
            reason: format!("must be a valid u32: {e}"),
        })?;
    if trials == 0 {
        return Err(ConfigError::InvalidSetting {
            var: "DELVE_TRIALS".to_string(),
            reason: "must be positive".to_string(),
        }
        .into());
    }

    tracing::info!(%dice, trials, "rolling");

    let mut registry = GeneratorRegistry::from_config(&config);
    let mut histogram: BTreeMap<i32, u32> = BTreeMap::new();
    let mut total: i64 = 0;
    for _ in 0..trials {
        let roll = dice.roll(registry.gameplay());
        *histogram.entry(roll).or_default() += 1;
        total += i64::from(roll);
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = total as f64 / f64::from(trials);
    let peak = histogram.values().copied().max().unwrap_or(0);
    for (roll, count) in &histogram {
        let bar = bar_len(*count, peak);
        println!("{roll:>5} {count:>8} {}", "#".repeat(bar));
    }

    tracing::info!(
        %dice,
        trials,
        mean,
        expected = dice.average(),
        min = histogram.keys().next().copied().unwrap_or(0),
        max = histogram.keys().next_back().copied().unwrap_or(0),
        seed = ?config.seed,
        "distribution complete"
    );

    Ok(())
}

/// Bar length for `count`, scaled so `peak` fills the full width.
fn bar_len(count: u32, peak: u32) -> usize {
    if peak == 0 {
        return 0;
    }
    let scaled = u64::from(count) * BAR_WIDTH as u64 / u64::from(peak);
    usize::try_from(scaled).unwrap_or(BAR_WIDTH)
}
