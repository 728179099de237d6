//! Timed power-up effects
//!
//! A pickup grants one [`EffectKind`]. Each kind owns exactly one multiplier
//! in [`Modifiers`]; applying sets it, reverting restores it to 1.0, and the
//! other multiplier is never touched.

use serde::{Deserialize, Serialize};

use crate::Millis;

/// Registry of effect kinds a pickup can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Fire interval (and melee hit cooldown) cut to a third
    RapidFire,
    /// Movement speed doubled
    SpeedUp,
}

impl EffectKind {
    /// Every registered kind, in spawn-roll order
    pub const ALL: [EffectKind; 2] = [EffectKind::RapidFire, EffectKind::SpeedUp];

    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            EffectKind::RapidFire => "RAPID FIRE",
            EffectKind::SpeedUp => "SPEED UP",
        }
    }

    /// Multiplier value this kind sets while active
    pub fn magnitude(&self) -> f32 {
        match self {
            EffectKind::RapidFire => 1.0 / 3.0,
            EffectKind::SpeedUp => 2.0,
        }
    }

    /// Modifiers with this effect in force
    pub fn apply(self, mods: Modifiers) -> Modifiers {
        match self {
            EffectKind::RapidFire => Modifiers {
                fire_interval: self.magnitude(),
                ..mods
            },
            EffectKind::SpeedUp => Modifiers {
                speed: self.magnitude(),
                ..mods
            },
        }
    }

    /// Modifiers with this effect lifted
    pub fn revert(self, mods: Modifiers) -> Modifiers {
        match self {
            EffectKind::RapidFire => Modifiers {
                fire_interval: 1.0,
                ..mods
            },
            EffectKind::SpeedUp => Modifiers { speed: 1.0, ..mods },
        }
    }
}

/// Multipliers layered over a combatant's base stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    pub speed: f32,
    pub fire_interval: f32,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            speed: 1.0,
            fire_interval: 1.0,
        }
    }
}

/// An effect currently in force on a combatant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub applied_at: Millis,
    pub expires_at: Millis,
}

impl ActiveEffect {
    #[inline]
    pub fn expired(&self, now: Millis) -> bool {
        now >= self.expires_at
    }

    /// Milliseconds left, clamped at zero (for HUD timers)
    pub fn remaining(&self, now: Millis) -> Millis {
        (self.expires_at - now).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_touches_only_own_multiplier() {
        let mods = EffectKind::SpeedUp.apply(Modifiers::default());
        assert_eq!(mods.speed, 2.0);
        assert_eq!(mods.fire_interval, 1.0);

        let mods = EffectKind::RapidFire.apply(mods);
        assert_eq!(mods.speed, 2.0);
        assert!((mods.fire_interval - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_revert_leaves_other_effect() {
        let both = EffectKind::RapidFire.apply(EffectKind::SpeedUp.apply(Modifiers::default()));
        let mods = EffectKind::SpeedUp.revert(both);
        assert_eq!(mods.speed, 1.0);
        assert!((mods.fire_interval - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_apply_twice_does_not_stack() {
        let once = EffectKind::SpeedUp.apply(Modifiers::default());
        let twice = EffectKind::SpeedUp.apply(once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_active_effect_expiry() {
        let effect = ActiveEffect {
            kind: EffectKind::SpeedUp,
            applied_at: 1000.0,
            expires_at: 3500.0,
        };
        assert!(!effect.expired(3499.0));
        assert!(effect.expired(3500.0));
        assert_eq!(effect.remaining(3000.0), 500.0);
        assert_eq!(effect.remaining(4000.0), 0.0);
    }
}
