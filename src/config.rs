//! Match configuration
//!
//! Everything the simulation reads besides the archetypes lives here.
//! Defaults reproduce the shipped game; JSON files may override any subset
//! of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::consts::*;
use crate::error::{ConfigError, ConfigResult, ensure_positive, ensure_within};
use crate::tuning::Archetype;

/// Arena bounds; the playfield is `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both spawn zones must fit: each side needs `2 * (radius + margin)`
    pub fn validate(&self, largest_radius: f32) -> ConfigResult<()> {
        let min_extent = 2.0 * (largest_radius + SPAWN_MARGIN);
        if !(self.width >= min_extent && self.height >= min_extent) {
            return Err(ConfigError::ArenaTooSmall {
                width: self.width,
                height: self.height,
                min_extent,
            });
        }
        Ok(())
    }
}

/// Bolt parameters shared by both sides
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoltConfig {
    pub damage: u32,
    pub radius: f32,
    /// Opposing bolts that touch destroy each other
    pub cancellation: bool,
}

impl Default for BoltConfig {
    fn default() -> Self {
        Self {
            damage: BOLT_DAMAGE,
            radius: BOLT_RADIUS,
            cancellation: false,
        }
    }
}

/// Combatant-vs-combatant contact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub damage: u32,
    pub cooldown_ms: Millis,
    pub knockback_speed: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            damage: COLLISION_DAMAGE,
            cooldown_ms: COLLISION_COOLDOWN_MS,
            knockback_speed: KNOCKBACK_SPEED,
        }
    }
}

/// Pickup spawning and effect timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    pub spawn_interval_ms: Millis,
    /// Probability of a spawn per interval
    pub spawn_chance: f64,
    pub radius: f32,
    pub effect_duration_ms: Millis,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: PICKUP_SPAWN_INTERVAL_MS,
            spawn_chance: PICKUP_SPAWN_CHANCE,
            radius: PICKUP_RADIUS,
            effect_duration_ms: EFFECT_DURATION_MS,
        }
    }
}

/// AI thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Pickups closer than this are chased
    pub pickup_priority_distance: f32,
    /// Steer away from hostile bolts
    pub dodge: bool,
    /// Bolts closer than this count as threats
    pub dodge_distance: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            pickup_priority_distance: AI_PICKUP_PRIORITY_DISTANCE,
            dodge: false,
            dodge_distance: AI_DODGE_DISTANCE,
        }
    }
}

/// Full match configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub arena: Arena,
    pub initial_health: u32,
    pub bolts: BoltConfig,
    pub collision: CollisionConfig,
    pub pickups: PickupConfig,
    pub ai: AiConfig,
    /// After the first death, let in-flight bolts land before declaring
    pub settle_bolts_before_outcome: bool,
    /// Optional round time limit; the healthier side wins on expiry
    pub round_duration_ms: Option<Millis>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            arena: Arena::default(),
            initial_health: INITIAL_HEALTH,
            bolts: BoltConfig::default(),
            collision: CollisionConfig::default(),
            pickups: PickupConfig::default(),
            ai: AiConfig::default(),
            settle_bolts_before_outcome: false,
            round_duration_ms: None,
        }
    }
}

impl MatchConfig {
    /// Parse JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Read and parse a JSON file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded match config from {}", path.display());
        Ok(config)
    }

    /// Check every field, then both archetypes against the arena
    pub fn validate(&self, archetypes: &[Archetype; 2]) -> ConfigResult<()> {
        ensure_positive("initial_health", self.initial_health as f64)?;
        ensure_positive("bolts.radius", self.bolts.radius as f64)?;
        ensure_positive("collision.cooldown_ms", self.collision.cooldown_ms)?;
        ensure_within(
            "collision.knockback_speed",
            self.collision.knockback_speed as f64,
            0.0,
            f64::MAX,
            "[0, ∞)",
        )?;
        ensure_positive("pickups.spawn_interval_ms", self.pickups.spawn_interval_ms)?;
        ensure_within(
            "pickups.spawn_chance",
            self.pickups.spawn_chance,
            0.0,
            1.0,
            "[0, 1]",
        )?;
        ensure_positive("pickups.radius", self.pickups.radius as f64)?;
        ensure_positive("pickups.effect_duration_ms", self.pickups.effect_duration_ms)?;
        ensure_within(
            "ai.pickup_priority_distance",
            self.ai.pickup_priority_distance as f64,
            0.0,
            f64::MAX,
            "[0, ∞)",
        )?;
        if self.ai.dodge {
            ensure_positive("ai.dodge_distance", self.ai.dodge_distance as f64)?;
        }
        if let Some(duration) = self.round_duration_ms {
            ensure_positive("round_duration_ms", duration)?;
        }

        let [left, right] = archetypes;
        left.validate("left")?;
        right.validate("right")?;

        let largest = left.radius.max(right.radius);
        self.arena.validate(largest)?;
        let pickup_extent = 2.0 * (self.pickups.radius + PICKUP_MARGIN);
        if self.arena.width < pickup_extent || self.arena.height < pickup_extent {
            return Err(ConfigError::ArenaTooSmall {
                width: self.arena.width,
                height: self.arena.height,
                min_extent: pickup_extent,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> [Archetype; 2] {
        [Archetype::speedster(), Archetype::bombardier()]
    }

    #[test]
    fn test_default_is_valid() {
        MatchConfig::default().validate(&pair()).unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            MatchConfig::from_json(r#"{ "initial_health": 20, "bolts": { "cancellation": true } }"#)
                .unwrap();
        assert_eq!(config.initial_health, 20);
        assert!(config.bolts.cancellation);
        assert_eq!(config.bolts.radius, BOLT_RADIUS);
        assert_eq!(config.pickups.spawn_interval_ms, PICKUP_SPAWN_INTERVAL_MS);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            MatchConfig::from_json("{ initial_health: }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_spawn_chance_out_of_range() {
        let mut config = MatchConfig::default();
        config.pickups.spawn_chance = 1.5;
        let err = config.validate(&pair()).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
    }

    #[test]
    fn test_zero_health_rejected() {
        let config = MatchConfig {
            initial_health: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(&pair()),
            Err(ConfigError::NonPositive { .. })
        ));
    }

    #[test]
    fn test_tiny_arena_rejected() {
        let config = MatchConfig {
            arena: Arena::new(100.0, 100.0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(&pair()),
            Err(ConfigError::ArenaTooSmall { .. })
        ));
    }

    #[test]
    fn test_archetype_errors_surface() {
        let mut archetypes = pair();
        archetypes[1].speed = 0.0;
        let err = MatchConfig::default().validate(&archetypes).unwrap_err();
        assert!(err.to_string().contains("right.speed"));
    }
}
