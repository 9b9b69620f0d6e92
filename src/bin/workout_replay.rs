// ABOUTME: Command-line replay of a recorded location track into a finalized workout
// ABOUTME: Reads a JSON fix array and prints the saved workout and samples as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Workout replay tool.
//!
//! Usage:
//! ```bash
//! # Replay a run with default thresholds
//! cargo run --bin workout-replay -- --input track.json
//!
//! # Replay a ride for an 72 kg rider with smoothed speeds
//! cargo run --bin workout-replay -- --input ride.json --workout-type cycling --weight-kg 72 --smooth
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use workout_recorder::config::{EnvUserSettings, RecorderConfig, StaticUserSettings, UserSettings};
use workout_recorder::logging;
use workout_recorder::models::WorkoutType;
use workout_recorder::replay::{load_track, replay_track, ReplayOptions};

#[derive(Parser)]
#[command(
    name = "workout-replay",
    about = "Replay a GPS track through the workout recorder",
    long_about = "Feed a JSON array of location fixes through the recorder, including noise filtering and auto-pause, and print the saved workout"
)]
struct ReplayArgs {
    /// Track file holding a JSON array of location fixes
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Activity type (running, cycling, hiking, other)
    #[arg(long, default_value = "running")]
    workout_type: WorkoutType,

    /// Fill smoothed speeds on the output samples
    #[arg(long)]
    smooth: bool,

    /// Body weight override in kilograms
    #[arg(long)]
    weight_kg: Option<f64>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ReplayArgs::parse();
    logging::init_from_env()?;

    let fixes = load_track(&args.input)
        .with_context(|| format!("Failed to load track {}", args.input.display()))?;
    info!(fixes = fixes.len(), workout.kind = %args.workout_type, "Replaying track");

    let settings: Arc<dyn UserSettings> = match args.weight_kg {
        Some(weight_kg) => Arc::new(StaticUserSettings::new(weight_kg)),
        None => Arc::new(EnvUserSettings),
    };
    let options = ReplayOptions {
        workout_type: args.workout_type,
        smooth: args.smooth,
        config: RecorderConfig::from_env(),
    };

    let report = replay_track(&fixes, &options, settings)
        .await
        .context("Replay failed")?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{output}");
    Ok(())
}
