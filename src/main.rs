//! Number Battle entry point
//!
//! Headless runner: plays a best-of series between two presets on a
//! simulated 60 Hz clock and prints the final snapshot as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use clap::builder::PossibleValuesParser;
    use number_battle::consts::{FRAME_MS, ROUNDS_TO_WIN};
    use number_battle::sim::GameEvent;
    use number_battle::tuning::PRESET_NAMES;
    use number_battle::{Archetype, ConfigResult, MatchConfig, MatchController, Series, Snapshot};
    use serde::Serialize;

    /// Give up on a round after ten simulated minutes
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    /// Run a headless best-of series between two archetype presets
    #[derive(Debug, Parser)]
    #[command(name = "number-battle", version, about, long_about = None)]
    pub struct Cli {
        /// Preset for the left combatant
        #[arg(
            default_value = "balanced",
            ignore_case = true,
            value_parser = PossibleValuesParser::new(PRESET_NAMES)
        )]
        left: String,
        /// Preset for the right combatant
        #[arg(
            default_value = "sniper",
            ignore_case = true,
            value_parser = PossibleValuesParser::new(PRESET_NAMES)
        )]
        right: String,
        /// Seed for a reproducible run
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,
        /// JSON match configuration; missing fields keep their defaults
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Round wins needed to take the series
        #[arg(
            long,
            value_name = "COUNT",
            default_value_t = ROUNDS_TO_WIN,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        rounds: u32,
    }

    #[derive(Serialize)]
    struct Summary<'a> {
        series: &'a Series,
        final_round: Snapshot,
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::OutcomeDeclared(outcome) => log::info!("Outcome: {:?}", outcome),
            GameEvent::ShotFired { .. } => log::trace!("{:?}", event),
            _ => log::debug!("{:?}", event),
        }
    }

    pub fn run(cli: Cli) -> ConfigResult<()> {
        let config = match &cli.config {
            Some(path) => MatchConfig::load(path)?,
            None => MatchConfig::default(),
        };
        let archetypes = [Archetype::preset(&cli.left)?, Archetype::preset(&cli.right)?];
        let mut controller = match cli.seed {
            Some(seed) => MatchController::with_seed(config, archetypes, seed),
            None => MatchController::new(config, archetypes),
        };
        let mut series = Series::new(cli.rounds);

        controller.start()?;
        loop {
            let mut frame = 0u64;
            while controller.outcome().is_none() && frame < MAX_FRAMES {
                for event in controller.advance(frame as f64 * FRAME_MS) {
                    log_event(&event);
                }
                frame += 1;
            }

            let Some(outcome) = controller.outcome() else {
                log::warn!("Round {} hit the frame cap without an outcome", series.current_round);
                break;
            };
            series.record(outcome);
            if !series.next_round(&mut controller)? {
                break;
            }
        }

        let summary = Summary {
            series: &series,
            final_round: controller.snapshot(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use clap::CommandFactory;

        #[test]
        fn test_cli_definition() {
            Cli::command().debug_assert();
        }

        #[test]
        fn test_defaults() {
            let cli = Cli::try_parse_from(["number-battle"]).unwrap();
            assert_eq!(cli.left, "balanced");
            assert_eq!(cli.right, "sniper");
            assert_eq!(cli.rounds, ROUNDS_TO_WIN);
            assert!(cli.seed.is_none());
            assert!(cli.config.is_none());
        }

        #[test]
        fn test_presets_and_flags() {
            let cli = Cli::try_parse_from([
                "number-battle",
                "Swordsman",
                "shotgunner",
                "--seed",
                "7",
                "--rounds",
                "3",
            ])
            .unwrap();
            assert!(Archetype::preset(&cli.left).unwrap().weapon.is_melee());
            assert_eq!(cli.right, "shotgunner");
            assert_eq!(cli.seed, Some(7));
            assert_eq!(cli.rounds, 3);
        }

        #[test]
        fn test_rejects_bad_arguments() {
            assert!(Cli::try_parse_from(["number-battle", "wizard"]).is_err());
            assert!(Cli::try_parse_from(["number-battle", "--rounds", "0"]).is_err());
            assert!(Cli::try_parse_from(["number-battle", "--seed"]).is_err());
            assert!(Cli::try_parse_from(["number-battle", "--seed", "abc"]).is_err());
            assert!(Cli::try_parse_from(["number-battle", "sniper", "sniper", "extra"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    let cli = native::Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Number Battle (headless) starting...");

    if let Err(err) = native::run(cli) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; hosts drive MatchController directly
}
