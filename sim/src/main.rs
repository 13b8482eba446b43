mod game;
mod logging;
mod script;
mod spawner;
mod world;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use log::info;
use nav::NavConfig;

use crate::{
    game::ROUND_SECS,
    world::{Match, MatchSettings},
};

/// Built-in four-zone arena used when no config is given.
const DEFAULT_ARENA: &str = include_str!("../arena.json");

/// Play one headless arena round with COM and scripted agents.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Arena config (JSON). Defaults to the built-in four-zone arena.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Physics ticks per second.
    #[arg(long, default_value_t = 50)]
    hz: u32,

    /// Round length in seconds.
    #[arg(long, default_value_t = ROUND_SECS)]
    round_secs: f32,

    /// Stop after this many ticks even if the round is not over.
    #[arg(long)]
    max_steps: Option<u64>,

    /// Print a JSON summary to stdout when done.
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    if args.hz == 0 {
        bail!("--hz must be positive");
    }
    if !(args.round_secs.is_finite() && args.round_secs > 0.0) {
        bail!("--round-secs must be positive, got {}", args.round_secs);
    }

    let config = match &args.config {
        Some(path) => NavConfig::load(path)
            .with_context(|| format!("failed to load arena config {}", path.display()))?,
        None => NavConfig::from_json_str(DEFAULT_ARENA).context("built-in arena config")?,
    };

    let settings = MatchSettings {
        round_secs: args.round_secs,
        ..MatchSettings::default()
    };
    let mut game = Match::from_config(&config, settings).context("failed to set up match")?;

    let dt = 1.0 / args.hz as f32;
    let steps = game.run(dt, args.max_steps);
    info!(
        "finished after {steps} ticks ({:.1}s), phase {:?}",
        game.elapsed(),
        game.phase()
    );
    for agent in game.agents() {
        info!(
            "{:?} ({:?}): {} points",
            agent.zone(),
            agent.kind(),
            game.scores().points(agent.zone())
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&game.summary())?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_arena_is_valid() {
        let config = NavConfig::from_json_str(DEFAULT_ARENA).expect("valid built-in config");
        assert_eq!(config.agents.len(), 4);
        let game = Match::from_config(&config, MatchSettings::default()).expect("valid match");
        assert_eq!(game.agents().count(), 4);
    }

    #[test]
    fn cli_defaults() {
        let args = Args::parse_from(["arena-sim"]);
        assert_eq!(args.hz, 50);
        assert_eq!(args.round_secs, ROUND_SECS);
        assert!(args.config.is_none());
    }
}
