//! Combatant AI
//!
//! Stateless per-frame steering. A combatant chases the nearest pickup when
//! one is close enough and otherwise keeps its current heading (wall bounces
//! and knockback change it). Dodging hostile bolts is optional.

use glam::Vec2;

use super::state::{Bolt, Combatant, Pickup};
use crate::config::AiConfig;

/// Nearest living pickup relative to a combatant
#[derive(Debug, Clone, Copy)]
pub struct PickupTarget {
    pub distance: f32,
    /// Vector from the combatant to the pickup
    pub offset: Vec2,
}

/// Find the closest living pickup
pub fn nearest_pickup(me: &Combatant, pickups: &[Pickup]) -> Option<PickupTarget> {
    pickups
        .iter()
        .filter(|p| p.alive)
        .map(|p| {
            let offset = p.pos - me.pos;
            PickupTarget {
                distance: offset.length(),
                offset,
            }
        })
        .min_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Averaged evasion vector away from incoming hostile bolts
///
/// A bolt is a threat when it is within `dodge_distance` and moving toward
/// the combatant. Each threat pushes perpendicular to its flight line, away
/// from that line, weighted by how close it is. `None` when nothing threatens.
pub fn dodge_vector<'a>(
    me: &Combatant,
    bolts: impl IntoIterator<Item = &'a Bolt>,
    dodge_distance: f32,
) -> Option<Vec2> {
    let mut sum = Vec2::ZERO;
    let mut threats = 0u32;

    for bolt in bolts {
        if !bolt.alive || bolt.owner == me.side {
            continue;
        }
        let away = me.pos - bolt.pos;
        let distance = away.length();
        if distance <= 0.0 || distance >= dodge_distance {
            continue;
        }
        let dir = bolt.vel.normalize_or_zero();
        if dir == Vec2::ZERO || dir.dot(away / distance) <= 0.0 {
            continue;
        }

        let perp = dir.perp();
        let side = if perp.dot(away) >= 0.0 { 1.0 } else { -1.0 };
        let urgency = 1.0 - distance / dodge_distance;
        sum += perp * side * urgency * 2.0;
        threats += 1;
    }

    (threats > 0).then(|| sum / threats as f32)
}

/// Decide this frame's velocity, `None` to keep the current one
pub fn steer(me: &Combatant, pickups: &[Pickup], bolts: &[Bolt], ai: &AiConfig) -> Option<Vec2> {
    if !me.alive {
        return None;
    }
    let speed = me.speed();

    if ai.dodge {
        if let Some(dodge) = dodge_vector(me, bolts, ai.dodge_distance) {
            return Some(me.vel.normalize_or_zero() * speed + dodge * speed);
        }
    }

    let target = nearest_pickup(me, pickups)?;
    if target.distance < ai.pickup_priority_distance && target.distance > 0.0 {
        return Some(target.offset / target.distance * speed);
    }
    None
}
