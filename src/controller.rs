//! Match lifecycle
//!
//! `NotStarted -> Running -> Ended(outcome)`. Starting validates the
//! configuration and builds a fresh [`MatchState`]; resetting discards every
//! bolt, pickup and effect in one go and starts again.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::Millis;
use crate::config::{Arena, MatchConfig};
use crate::error::ConfigResult;
use crate::sim::{self, Bolt, Combatant, GameEvent, MatchPhase, MatchState, Outcome, Pickup};
use crate::tuning::Archetype;

/// Lifecycle phase as seen from outside the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControllerPhase {
    NotStarted,
    Running,
    Ended(Outcome),
}

/// Read-only view for drawing
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Left then right; empty before the first start
    pub combatants: Vec<Combatant>,
    pub bolts: Vec<Bolt>,
    pub pickups: Vec<Pickup>,
    pub outcome: Option<Outcome>,
    pub phase: ControllerPhase,
}

/// Owns the configuration and the current match
pub struct MatchController {
    config: MatchConfig,
    archetypes: [Archetype; 2],
    state: Option<MatchState>,
    /// Hands out a seed per match
    seeder: Pcg32,
}

impl MatchController {
    /// Controller seeded from the OS RNG
    pub fn new(config: MatchConfig, archetypes: [Archetype; 2]) -> Self {
        Self::with_seed(config, archetypes, rand::random())
    }

    /// Controller with a fixed seed (tests, reproducing a bug report)
    pub fn with_seed(config: MatchConfig, archetypes: [Archetype; 2], seed: u64) -> Self {
        Self {
            config,
            archetypes,
            state: None,
            seeder: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Validate and begin a new match
    pub fn start(&mut self) -> ConfigResult<()> {
        if let Err(err) = self.config.validate(&self.archetypes) {
            log::warn!("Rejected match configuration: {}", err);
            return Err(err);
        }
        let seed = self.seeder.random();
        let state = MatchState::new(&self.config, &self.archetypes, seed);
        log::info!(
            "Match started: {} vs {} in {}x{} (seed {})",
            self.archetypes[0].name,
            self.archetypes[1].name,
            self.config.arena.width,
            self.config.arena.height,
            seed
        );
        self.state = Some(state);
        Ok(())
    }

    /// Begin a new match in an arena of the given size
    ///
    /// A rejected arena leaves the configuration and any running match as
    /// they were.
    pub fn start_with_arena(&mut self, arena: Arena) -> ConfigResult<()> {
        let previous = std::mem::replace(&mut self.config.arena, arena);
        if let Err(err) = self.start() {
            self.config.arena = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Discard the current match and start over
    pub fn reset(&mut self) -> ConfigResult<()> {
        self.state = None;
        self.start()
    }

    /// Run one frame; nothing happens before `start`
    pub fn advance(&mut self, now: Millis) -> Vec<GameEvent> {
        match self.state.as_mut() {
            Some(state) => sim::advance(state, &self.config, now),
            None => Vec::new(),
        }
    }

    pub fn phase(&self) -> ControllerPhase {
        match &self.state {
            None => ControllerPhase::NotStarted,
            Some(state) => match (state.phase, state.outcome) {
                (MatchPhase::Ended, Some(outcome)) => ControllerPhase::Ended(outcome),
                _ => ControllerPhase::Running,
            },
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.as_ref().and_then(|s| s.outcome)
    }

    pub fn state(&self) -> Option<&MatchState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut MatchState> {
        self.state.as_mut()
    }

    pub fn snapshot(&self) -> Snapshot {
        let phase = self.phase();
        match &self.state {
            None => Snapshot {
                combatants: Vec::new(),
                bolts: Vec::new(),
                pickups: Vec::new(),
                outcome: None,
                phase,
            },
            Some(state) => Snapshot {
                combatants: state.combatants.to_vec(),
                bolts: state.bolts.clone(),
                pickups: state.pickups.clone(),
                outcome: state.outcome,
                phase,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::sim::{EffectKind, Side};
    use glam::Vec2;

    fn controller() -> MatchController {
        let mut config = MatchConfig::default();
        config.pickups.spawn_chance = 1.0;
        MatchController::with_seed(config, [Archetype::speedster(), Archetype::bombardier()], 42)
    }

    #[test]
    fn test_not_started_is_inert() {
        let mut ctl = controller();
        assert_eq!(ctl.phase(), ControllerPhase::NotStarted);
        assert!(ctl.advance(0.0).is_empty());
        let snap = ctl.snapshot();
        assert!(snap.combatants.is_empty());
        assert_eq!(snap.phase, ControllerPhase::NotStarted);
    }

    #[test]
    fn test_start_then_run() {
        let mut ctl = controller();
        ctl.start().unwrap();
        assert_eq!(ctl.phase(), ControllerPhase::Running);
        let events = ctl.advance(0.0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::ShotFired { .. })));
        let snap = ctl.snapshot();
        assert_eq!(snap.combatants.len(), 2);
        assert!(!snap.bolts.is_empty());
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut config = MatchConfig::default();
        config.collision.cooldown_ms = 0.0;
        let mut ctl = MatchController::with_seed(config, [Archetype::sniper(), Archetype::swordsman()], 1);
        assert!(matches!(ctl.start(), Err(ConfigError::NonPositive { .. })));
        assert_eq!(ctl.phase(), ControllerPhase::NotStarted);
    }

    #[test]
    fn test_small_arena_rejected() {
        let mut ctl = controller();
        assert!(matches!(
            ctl.start_with_arena(Arena::new(120.0, 90.0)),
            Err(ConfigError::ArenaTooSmall { .. })
        ));
    }

    #[test]
    fn test_rejected_arena_keeps_previous_config() {
        let mut ctl = controller();
        ctl.start().unwrap();
        ctl.advance(0.0);

        assert!(matches!(
            ctl.start_with_arena(Arena::new(50.0, 50.0)),
            Err(ConfigError::ArenaTooSmall { .. })
        ));
        assert_eq!(ctl.config().arena, Arena::default());
        assert_eq!(ctl.phase(), ControllerPhase::Running);
        assert_eq!(ctl.state().unwrap().ticks, 1);

        ctl.start().unwrap();
        ctl.start_with_arena(Arena::new(600.0, 400.0)).unwrap();
        assert_eq!(ctl.config().arena, Arena::new(600.0, 400.0));
        assert_eq!(ctl.state().unwrap().arena, Arena::new(600.0, 400.0));
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut ctl = controller();
        ctl.start().unwrap();
        for frame in 0..400 {
            ctl.advance(frame as f64 * 16.0);
        }
        let state = ctl.state_mut().unwrap();
        state.combatants[0].grant_effect(EffectKind::SpeedUp, 6400.0, 8000.0);
        assert!(state.ticks > 0);

        ctl.reset().unwrap();
        let state = ctl.state().unwrap();
        assert!(state.bolts.is_empty());
        assert!(state.pickups.is_empty());
        assert_eq!(state.ticks, 0);
        assert!(state.outcome.is_none());
        for c in &state.combatants {
            assert!(c.effects.is_empty());
            assert_eq!(c.health, ctl.config().initial_health);
        }
    }

    #[test]
    fn test_ended_until_reset() {
        let mut ctl = controller();
        ctl.start().unwrap();
        let state = ctl.state_mut().unwrap();
        state.combatants[0].pos = Vec2::new(400.0, 320.0);
        state.combatants[1].pos = Vec2::new(420.0, 320.0);
        state.combatants[1].health = 1;
        ctl.advance(0.0);
        assert_eq!(ctl.phase(), ControllerPhase::Ended(Outcome::Winner(Side::Left)));
        assert!(ctl.advance(16.0).is_empty());

        ctl.reset().unwrap();
        assert_eq!(ctl.phase(), ControllerPhase::Running);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut ctl = controller();
        ctl.start().unwrap();
        ctl.advance(0.0);
        let json = serde_json::to_string(&ctl.snapshot()).unwrap();
        assert!(json.contains("\"combatants\""));
        assert!(json.contains("\"Running\""));
    }
}
