#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Cauldron Catch session.

mod config;
mod simulation;
mod text_backend;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use cauldron_rendering::{Presentation, RenderingBackend};
use clap::Parser;
use env_logger::Env;

use crate::{config::GameConfig, simulation::Simulation, text_backend::TextBackend};

#[derive(Debug, Parser)]
#[command(
    name = "cauldron",
    about = "Runs a headless Cauldron Catch session with an autopilot sorter."
)]
struct CliArgs {
    /// TOML file overriding the built-in tuning.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed shared by the spawner, recipe, and autopilot generators.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Simulated seconds to play.
    #[arg(long, value_name = "SECONDS", default_value_t = 60)]
    duration: u64,
    /// Length of a simulated frame in milliseconds.
    #[arg(
        long = "tick-ms",
        value_name = "MS",
        default_value_t = 16,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    tick_ms: u64,
    /// Probability that the autopilot points the sorter the wrong way.
    #[arg(long = "miss-rate", value_name = "RATE", default_value_t = 0.1, value_parser = parse_rate)]
    miss_rate: f32,
}

fn parse_rate(value: &str) -> Result<f32, String> {
    let rate: f32 = value
        .parse()
        .map_err(|error| format!("`{value}` is not a number: {error}"))?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("`{value}` is not between 0 and 1"))
    }
}

/// Entry point for the Cauldron Catch command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();

    let config =
        GameConfig::load(args.config.as_deref()).context("failed to load game configuration")?;
    let mut simulation = Simulation::new(&config, args.seed, args.miss_rate)?;
    log::info!(
        "starting session: seed {}, {}s at {}ms per frame",
        args.seed,
        args.duration,
        args.tick_ms
    );

    let presentation = Presentation::new(simulation.banner(), simulation.scene());
    let backend = TextBackend::new(
        io::stdout().lock(),
        Duration::from_secs(args.duration),
        Duration::from_millis(args.tick_ms),
    );
    backend
        .run(presentation, |dt, input, scene| {
            simulation.step(dt, input, scene);
            true
        })
        .context("text backend failed")?;

    println!("{}", simulation.summary());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let args = CliArgs::try_parse_from(["cauldron"]).expect("defaults parse");
        assert!(args.config.is_none());
        assert_eq!(args.duration, 60);
        assert_eq!(args.tick_ms, 16);
        assert_eq!(args.miss_rate, 0.1);
    }

    #[test]
    fn rejects_zero_tick_and_out_of_range_miss_rate() {
        assert!(CliArgs::try_parse_from(["cauldron", "--tick-ms", "0"]).is_err());
        assert!(CliArgs::try_parse_from(["cauldron", "--miss-rate", "1.5"]).is_err());
        assert!(CliArgs::try_parse_from(["cauldron", "--miss-rate", "nan"]).is_err());
    }

    #[test]
    fn parses_every_flag() {
        let args = CliArgs::try_parse_from([
            "cauldron",
            "--config",
            "cauldron.toml",
            "--seed",
            "9",
            "--duration",
            "5",
            "--tick-ms",
            "20",
            "--miss-rate",
            "0.5",
        ])
        .expect("flags parse");
        assert_eq!(args.config, Some(PathBuf::from("cauldron.toml")));
        assert_eq!(args.seed, 9);
        assert_eq!(args.tick_ms, 20);
        assert_eq!(args.miss_rate, 0.5);
    }
}
