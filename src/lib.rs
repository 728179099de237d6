//! Number Battle - A two-combatant arena battle simulation
//!
//! Core modules:
//! - `sim`: Frame simulation (movement, weapons, pickups, outcome)
//! - `tuning`: Archetype presets (movement and weapon parameters)
//! - `config`: Match configuration and validation
//! - `controller`: Match lifecycle (start, advance, reset, snapshot)
//! - `series`: Best-of-N wrapper around repeated matches

pub mod config;
pub mod controller;
pub mod error;
pub mod series;
pub mod sim;
pub mod tuning;

pub use config::MatchConfig;
pub use controller::{ControllerPhase, MatchController, Snapshot};
pub use error::{ConfigError, ConfigResult};
pub use series::Series;
pub use tuning::{Archetype, WeaponKind};

use glam::Vec2;

/// Timestamps and durations are milliseconds on the host clock
pub type Millis = f64;

/// Game configuration constants
pub mod consts {
    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 960.0;
    pub const ARENA_HEIGHT: f32 = 640.0;

    /// Host frame length the per-frame speeds are tuned for (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Combatant defaults
    pub const INITIAL_HEALTH: u32 = 50;
    pub const COMBATANT_RADIUS: f32 = 25.0;
    /// Distance kept between a spawn zone and the arena wall, beyond the radius
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Bolt defaults
    pub const BOLT_DAMAGE: u32 = 1;
    pub const BOLT_RADIUS: f32 = 8.0;
    /// Trail positions kept per bolt (cosmetic)
    pub const BOLT_TRAIL_LENGTH: usize = 5;

    /// Combatant-vs-combatant collision
    pub const COLLISION_DAMAGE: u32 = 5;
    pub const COLLISION_COOLDOWN_MS: f64 = 500.0;
    pub const KNOCKBACK_SPEED: f32 = 8.0;

    /// Pickups
    pub const PICKUP_SPAWN_INTERVAL_MS: f64 = 3000.0;
    pub const PICKUP_SPAWN_CHANCE: f64 = 0.3;
    pub const PICKUP_RADIUS: f32 = 20.0;
    /// Extra distance between a spawned pickup and the wall
    pub const PICKUP_MARGIN: f32 = 30.0;
    pub const EFFECT_DURATION_MS: f64 = 8000.0;

    /// AI thresholds
    pub const AI_DODGE_DISTANCE: f32 = 100.0;
    pub const AI_PICKUP_PRIORITY_DISTANCE: f32 = 500.0;

    /// Series
    pub const ROUNDS_TO_WIN: u32 = 2;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // Tiny negative inputs round up to exactly TAU
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Unit vector pointing along `theta`
#[inline]
pub fn heading(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Angle of the vector from `from` to `to`
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-5);
        assert!(wrap_angle(TAU) < 1e-5);
        assert_eq!(wrap_angle(-1e-9), 0.0);
        assert!(wrap_angle(-f32::EPSILON) < TAU);
    }

    #[test]
    fn test_bearing() {
        assert!(bearing(Vec2::ZERO, Vec2::new(10.0, 0.0)).abs() < 1e-6);
        assert!((bearing(Vec2::ZERO, Vec2::new(0.0, 5.0)) - PI / 2.0).abs() < 1e-6);
        let h = heading(bearing(Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0)));
        assert!((h - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }
}
