//! Arena simulation module
//!
//! All gameplay logic lives here. This module must stay headless:
//! - One synchronous step per host frame
//! - Timing from absolute timestamps, never frame counts
//! - Stable iteration order (left combatant first)
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod combat;
pub mod effects;
pub mod geometry;
pub mod state;
pub mod tick;

pub use combat::{blade_segment, fan_angles, fire_volley, swing};
pub use effects::{ActiveEffect, EffectKind, Modifiers};
pub use geometry::{circles_overlap, segment_intersects_circle};
pub use state::{Bolt, Combatant, GameEvent, MatchPhase, MatchState, Outcome, Pickup, Side};
pub use tick::advance;
