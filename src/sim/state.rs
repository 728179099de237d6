//! Match state and core simulation types
//!
//! Everything one match needs between frames lives in [`MatchState`]; the
//! frame step owns it exclusively while it runs.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{ActiveEffect, EffectKind, Modifiers};
use crate::Millis;
use crate::config::{Arena, MatchConfig};
use crate::consts::*;
use crate::heading;
use crate::tuning::{Archetype, WeaponKind};

/// One of the two combatant slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Left => "Player1",
            Side::Right => "Player2",
        }
    }
}

/// Terminal match result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Side),
    Draw,
}

/// Phase of a started match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Both fighting
    Running,
    /// One side is down; in-flight bolts are still resolving
    Settling,
    /// Outcome declared
    Ended,
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A volley left `shooter`
    ShotFired { shooter: Side, pos: Vec2, bolts: u32 },
    /// A bolt owned by `owner` struck `target`
    BoltHit {
        owner: Side,
        target: Side,
        pos: Vec2,
        damage: u32,
    },
    /// A melee blade struck `target`
    BladeHit {
        attacker: Side,
        target: Side,
        pos: Vec2,
        damage: u32,
    },
    /// The two combatants bumped into each other
    Collided { midpoint: Vec2, damage: u32 },
    /// Two opposing bolts destroyed each other
    BoltsClashed { pos: Vec2 },
    PickupSpawned { kind: EffectKind, pos: Vec2 },
    /// `refreshed` is true when the effect was already active
    PickupCollected {
        side: Side,
        kind: EffectKind,
        pos: Vec2,
        refreshed: bool,
    },
    EffectExpired { side: Side, kind: EffectKind },
    /// Health reached zero
    Destroyed { side: Side, pos: Vec2 },
    OutcomeDeclared(Outcome),
}

/// One of the two fighters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub side: Side,
    pub archetype: Archetype,
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: u32,
    pub radius: f32,
    pub mods: Modifiers,
    pub effects: Vec<ActiveEffect>,
    pub alive: bool,
    /// Timestamp of the last volley (ranged)
    pub last_shot: Option<Millis>,
    /// Blade angle in [0, 2π) (melee)
    pub swing_angle: f32,
    /// Timestamp of the last landed blade hit (melee)
    pub last_hit: Option<Millis>,
}

impl Combatant {
    /// Create a combatant heading along `theta` at base speed
    pub fn new(side: Side, archetype: Archetype, pos: Vec2, theta: f32, health: u32) -> Self {
        Self {
            side,
            pos,
            vel: heading(theta) * archetype.speed,
            health,
            radius: archetype.radius,
            mods: Modifiers::default(),
            effects: Vec::new(),
            alive: true,
            last_shot: None,
            swing_angle: 0.0,
            last_hit: None,
            archetype,
        }
    }

    /// Effective movement speed
    #[inline]
    pub fn speed(&self) -> f32 {
        self.archetype.speed * self.mods.speed
    }

    /// Effective time between volleys, `None` for melee
    pub fn fire_interval(&self) -> Option<Millis> {
        match self.archetype.weapon {
            WeaponKind::Ranged {
                fire_interval_ms, ..
            } => Some(fire_interval_ms * self.mods.fire_interval as f64),
            WeaponKind::Melee { .. } => None,
        }
    }

    /// Effective time between blade hits, `None` for ranged
    pub fn hit_cooldown(&self) -> Option<Millis> {
        match self.archetype.weapon {
            WeaponKind::Melee {
                hit_cooldown_ms, ..
            } => Some(hit_cooldown_ms * self.mods.fire_interval as f64),
            WeaponKind::Ranged { .. } => None,
        }
    }

    /// Subtract health, saturating at zero
    ///
    /// Returns true only on the call that kills.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.alive = false;
            return true;
        }
        false
    }

    /// Apply an effect, or push back its expiry if already active
    ///
    /// Returns true when an existing effect was refreshed.
    pub fn grant_effect(&mut self, kind: EffectKind, now: Millis, duration: Millis) -> bool {
        if let Some(active) = self.effects.iter_mut().find(|e| e.kind == kind) {
            active.applied_at = now;
            active.expires_at = now + duration;
            return true;
        }
        self.mods = kind.apply(self.mods);
        self.effects.push(ActiveEffect {
            kind,
            applied_at: now,
            expires_at: now + duration,
        });
        false
    }

    /// Drop every effect whose time is up and revert its multiplier
    pub fn expire_effects(&mut self, now: Millis) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        self.effects.retain(|e| {
            if e.expired(now) {
                expired.push(e.kind);
                false
            } else {
                true
            }
        });
        for kind in &expired {
            self.mods = kind.revert(self.mods);
        }
        expired
    }
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bolt {
    pub id: u32,
    pub owner: Side,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
    /// Recent positions, oldest first (rendering only)
    pub trail: Vec<Vec2>,
}

impl Bolt {
    pub fn new(id: u32, owner: Side, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            owner,
            pos,
            vel,
            radius,
            alive: true,
            trail: Vec::with_capacity(BOLT_TRAIL_LENGTH),
        }
    }

    /// Record the current position then move one frame
    pub fn step(&mut self) {
        self.trail.push(self.pos);
        if self.trail.len() > BOLT_TRAIL_LENGTH {
            self.trail.remove(0);
        }
        self.pos += self.vel;
    }
}

/// A power-up waiting to be collected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: EffectKind,
    pub pos: Vec2,
    pub radius: f32,
    pub alive: bool,
}

/// Complete state of one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub arena: Arena,
    /// Indexed by [`Side::index`]
    pub combatants: [Combatant; 2],
    pub bolts: Vec<Bolt>,
    pub pickups: Vec<Pickup>,
    pub phase: MatchPhase,
    /// Set exactly once, when the outcome is declared
    pub outcome: Option<Outcome>,
    /// First frame timestamp (anchors the round timer)
    pub round_started_at: Option<Millis>,
    /// Last pickup spawn roll
    pub last_pickup_roll: Option<Millis>,
    /// Last combatant collision that dealt damage
    pub last_collision: Option<Millis>,
    /// Frames advanced so far
    pub ticks: u64,
    pub rng: Pcg32,
    pub(super) next_id: u32,
}

impl MatchState {
    /// Fresh match with both combatants placed in their spawn zones
    pub fn new(config: &MatchConfig, archetypes: &[Archetype; 2], seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let arena = config.arena;
        let [left, right] = archetypes;
        let combatants = [
            spawn_combatant(&mut rng, arena, Side::Left, left.clone(), config.initial_health),
            spawn_combatant(&mut rng, arena, Side::Right, right.clone(), config.initial_health),
        ];

        Self {
            arena,
            combatants,
            bolts: Vec::new(),
            pickups: Vec::new(),
            phase: MatchPhase::Running,
            outcome: None,
            round_started_at: None,
            last_pickup_roll: None,
            last_collision: None,
            ticks: 0,
            rng,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn combatant(&self, side: Side) -> &Combatant {
        &self.combatants[side.index()]
    }

    #[inline]
    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        &mut self.combatants[side.index()]
    }

    pub fn both_alive(&self) -> bool {
        self.combatants.iter().all(|c| c.alive)
    }

    /// Mutable access to `side` and its opponent at once
    pub fn pair_mut(&mut self, side: Side) -> (&mut Combatant, &mut Combatant) {
        let [left, right] = &mut self.combatants;
        match side {
            Side::Left => (left, right),
            Side::Right => (right, left),
        }
    }

    /// Spawn a pickup of a random kind at a random in-bounds position
    pub fn spawn_pickup(&mut self, radius: f32) -> &Pickup {
        let kind = EffectKind::ALL[self.rng.random_range(0..EffectKind::ALL.len())];
        let margin = radius + PICKUP_MARGIN;
        let x = margin + self.rng.random::<f32>() * (self.arena.width - 2.0 * margin).max(0.0);
        let y = margin + self.rng.random::<f32>() * (self.arena.height - 2.0 * margin).max(0.0);
        let id = self.next_entity_id();
        self.pickups.push(Pickup {
            id,
            kind,
            pos: Vec2::new(x, y),
            radius,
            alive: true,
        });
        &self.pickups[self.pickups.len() - 1]
    }
}

/// Place a combatant inside its side's spawn zone with a random heading
fn spawn_combatant(
    rng: &mut Pcg32,
    arena: Arena,
    side: Side,
    archetype: Archetype,
    health: u32,
) -> Combatant {
    let margin = archetype.radius + SPAWN_MARGIN;
    // Each side gets at most half of the free width
    let zone = (arena.width / 4.0)
        .min((arena.width - 2.0 * margin) / 2.0)
        .max(0.0);
    let offset = rng.random::<f32>() * zone;
    let x = match side {
        Side::Left => margin + offset,
        Side::Right => arena.width - margin - offset,
    };
    let y = margin + rng.random::<f32>() * (arena.height - 2.0 * margin).max(0.0);
    let theta = rng.random::<f32>() * std::f32::consts::TAU;
    Combatant::new(side, archetype, Vec2::new(x, y), theta, health)
}
