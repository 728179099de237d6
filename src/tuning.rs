//! Archetype presets
//!
//! An archetype is the fighting style of one combatant: how fast it moves,
//! how big it is, and which weapon it carries. Each combatant carries exactly
//! one weapon kind.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_8, TAU};

use serde::{Deserialize, Serialize};

use crate::consts::COMBATANT_RADIUS;
use crate::error::{ConfigError, ConfigResult, ensure_positive, ensure_within};

/// Weapon carried by an archetype
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeaponKind {
    /// Fires a fan of bolts at the opponent
    Ranged {
        /// Minimum time between volleys (ms)
        fire_interval_ms: f64,
        /// Bolts per volley
        bolts_per_volley: u32,
        /// Bolt speed (pixels per frame)
        bolt_speed: f32,
        /// Total fan width (radians)
        spread: f32,
    },
    /// Spins a blade around the body
    Melee {
        /// Blade length beyond the body radius
        reach: f32,
        /// Damage per landed hit
        damage: u32,
        /// Swing advance (radians per frame)
        swing_speed: f32,
        /// Minimum time between landed hits (ms)
        hit_cooldown_ms: f64,
    },
}

impl WeaponKind {
    pub fn is_melee(&self) -> bool {
        matches!(self, WeaponKind::Melee { .. })
    }
}

/// Movement and weapon parameters of one combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub name: String,
    /// Base movement speed (pixels per frame)
    pub speed: f32,
    /// Body radius
    pub radius: f32,
    pub weapon: WeaponKind,
}

/// Names accepted by [`Archetype::preset`]
pub const PRESET_NAMES: [&str; 6] = [
    "speedster",
    "bombardier",
    "balanced",
    "sniper",
    "shotgunner",
    "swordsman",
];

impl Archetype {
    fn ranged(name: &str, speed: f32, radius: f32, interval: f64, bolts: u32, bolt_speed: f32, spread: f32) -> Self {
        Self {
            name: name.to_string(),
            speed,
            radius,
            weapon: WeaponKind::Ranged {
                fire_interval_ms: interval,
                bolts_per_volley: bolts,
                bolt_speed,
                spread,
            },
        }
    }

    /// Quick mover firing a narrow, fast three-bolt fan
    pub fn speedster() -> Self {
        Self::ranged("speedster", 6.0, COMBATANT_RADIUS, 500.0, 3, 7.0, FRAC_PI_8)
    }

    /// Slow mover spraying a wide fan of slow bolts
    pub fn bombardier() -> Self {
        Self::ranged("bombardier", 2.5, COMBATANT_RADIUS, 800.0, 8, 4.0, FRAC_PI_2)
    }

    pub fn balanced() -> Self {
        Self::ranged("balanced", 5.0, 30.0, 600.0, 6, 5.0, FRAC_PI_4)
    }

    pub fn sniper() -> Self {
        Self::ranged("sniper", 5.0, COMBATANT_RADIUS, 750.0, 1, 8.5, 0.0)
    }

    pub fn shotgunner() -> Self {
        Self::ranged("shotgunner", 5.0, 35.0, 700.0, 10, 4.0, 7.0 * TAU / 24.0)
    }

    /// Fast melee fighter with a spinning blade
    pub fn swordsman() -> Self {
        Self {
            name: "swordsman".to_string(),
            speed: 6.5,
            radius: 30.0,
            weapon: WeaponKind::Melee {
                reach: 55.0,
                damage: 6,
                swing_speed: 0.16,
                hit_cooldown_ms: 300.0,
            },
        }
    }

    /// Look up a preset by name (case-insensitive)
    pub fn preset(name: &str) -> ConfigResult<Self> {
        match name.to_lowercase().as_str() {
            "speedster" => Ok(Self::speedster()),
            "bombardier" => Ok(Self::bombardier()),
            "balanced" => Ok(Self::balanced()),
            "sniper" => Ok(Self::sniper()),
            "shotgunner" => Ok(Self::shotgunner()),
            "swordsman" => Ok(Self::swordsman()),
            _ => Err(ConfigError::UnknownArchetype(name.to_string())),
        }
    }

    /// Reject parameters that would break the simulation
    ///
    /// `label` prefixes field names in errors (e.g. "left").
    pub fn validate(&self, label: &str) -> ConfigResult<()> {
        let field = |f: &str| format!("{}.{}", label, f);
        ensure_positive(&field("speed"), self.speed as f64)?;
        ensure_positive(&field("radius"), self.radius as f64)?;
        match self.weapon {
            WeaponKind::Ranged {
                fire_interval_ms,
                bolts_per_volley,
                bolt_speed,
                spread,
            } => {
                ensure_positive(&field("fire_interval_ms"), fire_interval_ms)?;
                if bolts_per_volley == 0 {
                    return Err(ConfigError::EmptyVolley {
                        archetype: self.name.clone(),
                    });
                }
                ensure_positive(&field("bolt_speed"), bolt_speed as f64)?;
                ensure_within(&field("spread"), spread as f64, 0.0, TAU as f64, "[0, 2π]")?;
            }
            WeaponKind::Melee {
                reach,
                swing_speed,
                hit_cooldown_ms,
                ..
            } => {
                ensure_positive(&field("reach"), reach as f64)?;
                ensure_positive(&field("swing_speed"), swing_speed as f64)?;
                ensure_positive(&field("hit_cooldown_ms"), hit_cooldown_ms)?;
            }
        }
        Ok(())
    }
}
