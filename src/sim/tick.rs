//! Frame simulation step
//!
//! Advances a match by one host frame. Movement integrates once per call;
//! every timing rule (fire rate, cooldowns, effect expiry, pickup spawning)
//! compares absolute timestamps so behaviour does not depend on frame rate.

use rand::Rng;

use super::ai;
use super::combat::{fire_volley, swing};
use super::geometry::{bounce_inside, circles_overlap, touches_bounds};
use super::state::{Bolt, Combatant, GameEvent, MatchPhase, MatchState, Outcome, Side};
use crate::Millis;
use crate::config::MatchConfig;

/// Advance the match to `now` and report what happened
///
/// Order: effect expiry, AI, motion, melee, body collision, firing, bolts,
/// pickups, outcome. An ended match is left untouched.
pub fn advance(state: &mut MatchState, config: &MatchConfig, now: Millis) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase == MatchPhase::Ended {
        return events;
    }

    state.ticks += 1;
    state.round_started_at.get_or_insert(now);
    state.last_pickup_roll.get_or_insert(now);

    expire_effects(state, now, &mut events);

    match state.phase {
        MatchPhase::Running => {
            steer_combatants(state, config);
            move_combatants(state);
            resolve_melee(state, now, &mut events);
            collide_combatants(state, config, now, &mut events);
            fire_weapons(state, config, now, &mut events);
            update_bolts(state, config, &mut events);
            update_pickups(state, config, now, &mut events);
            resolve_outcome(state, config, now, &mut events);
        }
        MatchPhase::Settling => {
            move_combatants(state);
            update_bolts(state, config, &mut events);
            settle_outcome(state, &mut events);
        }
        MatchPhase::Ended => {}
    }

    events
}

/// Subtract health and report a kill
fn apply_damage(target: &mut Combatant, amount: u32, events: &mut Vec<GameEvent>) {
    if target.take_damage(amount) {
        log::debug!("{} destroyed", target.side.label());
        events.push(GameEvent::Destroyed {
            side: target.side,
            pos: target.pos,
        });
    }
}

fn expire_effects(state: &mut MatchState, now: Millis, events: &mut Vec<GameEvent>) {
    for combatant in &mut state.combatants {
        for kind in combatant.expire_effects(now) {
            log::debug!("{} lost {}", combatant.side.label(), kind.label());
            events.push(GameEvent::EffectExpired {
                side: combatant.side,
                kind,
            });
        }
    }
}

fn steer_combatants(state: &mut MatchState, config: &MatchConfig) {
    if !state.both_alive() {
        return;
    }
    for side in Side::BOTH {
        let me = state.combatant(side);
        if let Some(vel) = ai::steer(me, &state.pickups, &state.bolts, &config.ai) {
            state.combatant_mut(side).vel = vel;
        }
    }
}

/// Renormalise to effective speed, integrate, reflect off walls
fn move_combatants(state: &mut MatchState) {
    let arena = state.arena;
    for c in state.combatants.iter_mut().filter(|c| c.alive) {
        let speed = c.speed();
        c.vel = c.vel.normalize_or_zero() * speed;
        let contact = bounce_inside(c.pos + c.vel, c.vel, c.radius, arena.width, arena.height);
        c.pos = contact.pos;
        c.vel = contact.vel;
    }
}

fn resolve_melee(state: &mut MatchState, now: Millis, events: &mut Vec<GameEvent>) {
    for side in Side::BOTH {
        let (attacker, defender) = state.pair_mut(side);
        if !attacker.alive {
            continue;
        }
        if let Some(damage) = swing(attacker, defender, now) {
            events.push(GameEvent::BladeHit {
                attacker: side,
                target: defender.side,
                pos: defender.pos,
                damage,
            });
            apply_damage(defender, damage, events);
        }
    }
}

fn collide_combatants(
    state: &mut MatchState,
    config: &MatchConfig,
    now: Millis,
    events: &mut Vec<GameEvent>,
) {
    if !state.both_alive() {
        return;
    }
    if let Some(last) = state.last_collision {
        if now - last <= config.collision.cooldown_ms {
            return;
        }
    }

    let arena = state.arena;
    let [a, b] = &mut state.combatants;
    let delta = a.pos - b.pos;
    let distance = delta.length();
    let min_distance = a.radius + b.radius;
    if distance >= min_distance {
        return;
    }
    state.last_collision = Some(now);

    let damage = config.collision.damage;
    apply_damage(a, damage, events);
    apply_damage(b, damage, events);

    if distance > 0.0 {
        let normal = delta / distance;
        let knockback = config.collision.knockback_speed;
        a.vel = normal * knockback;
        b.vel = -normal * knockback;

        let push = normal * (min_distance - distance) * 0.5;
        a.pos += push;
        b.pos -= push;
        for c in [a, b] {
            c.pos.x = c.pos.x.clamp(c.radius, (arena.width - c.radius).max(c.radius));
            c.pos.y = c.pos.y.clamp(c.radius, (arena.height - c.radius).max(c.radius));
        }
    }

    let midpoint = (state.combatants[0].pos + state.combatants[1].pos) / 2.0;
    events.push(GameEvent::Collided { midpoint, damage });
}

fn fire_weapons(
    state: &mut MatchState,
    config: &MatchConfig,
    now: Millis,
    events: &mut Vec<GameEvent>,
) {
    if !state.both_alive() {
        return;
    }
    let MatchState {
        combatants,
        bolts,
        next_id,
        ..
    } = state;

    for side in Side::BOTH {
        let target = combatants[side.opponent().index()].pos;
        let shooter = &mut combatants[side.index()];
        let ids = || {
            let id = *next_id;
            *next_id += 1;
            id
        };
        if let Some(volley) = fire_volley(shooter, target, now, config.bolts.radius, ids) {
            events.push(GameEvent::ShotFired {
                shooter: side,
                pos: shooter.pos,
                bolts: volley.len() as u32,
            });
            bolts.extend(volley);
        }
    }
}

/// Move bolts, drop the ones leaving the arena, resolve hits
fn update_bolts(state: &mut MatchState, config: &MatchConfig, events: &mut Vec<GameEvent>) {
    let arena = state.arena;
    let MatchState {
        combatants, bolts, ..
    } = state;

    for bolt in bolts.iter_mut().filter(|b| b.alive) {
        bolt.step();
        if touches_bounds(bolt.pos, bolt.radius, arena.width, arena.height) {
            bolt.alive = false;
            continue;
        }

        let hit = combatants.iter_mut().find(|c| {
            c.alive && c.side != bolt.owner && circles_overlap(bolt.pos, bolt.radius, c.pos, c.radius)
        });
        if let Some(target) = hit {
            bolt.alive = false;
            events.push(GameEvent::BoltHit {
                owner: bolt.owner,
                target: target.side,
                pos: bolt.pos,
                damage: config.bolts.damage,
            });
            apply_damage(target, config.bolts.damage, events);
        }
    }

    if config.bolts.cancellation {
        cancel_bolts(bolts, events);
    }

    bolts.retain(|b| b.alive);
}

/// Opposing bolts that touch destroy each other
fn cancel_bolts(bolts: &mut [Bolt], events: &mut Vec<GameEvent>) {
    for i in 0..bolts.len() {
        for j in (i + 1)..bolts.len() {
            let (head, tail) = bolts.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);
            if !a.alive || !b.alive || a.owner == b.owner {
                continue;
            }
            if circles_overlap(a.pos, a.radius, b.pos, b.radius) {
                a.alive = false;
                b.alive = false;
                events.push(GameEvent::BoltsClashed {
                    pos: (a.pos + b.pos) / 2.0,
                });
            }
        }
    }
}

fn update_pickups(
    state: &mut MatchState,
    config: &MatchConfig,
    now: Millis,
    events: &mut Vec<GameEvent>,
) {
    let rules = &config.pickups;

    let last_roll = state.last_pickup_roll.unwrap_or(now);
    if now - last_roll > rules.spawn_interval_ms {
        state.last_pickup_roll = Some(now);
        if state.rng.random::<f64>() < rules.spawn_chance {
            let pickup = state.spawn_pickup(rules.radius);
            log::debug!("{} spawned at {:?}", pickup.kind.label(), pickup.pos);
            events.push(GameEvent::PickupSpawned {
                kind: pickup.kind,
                pos: pickup.pos,
            });
        }
    }

    let MatchState {
        combatants,
        pickups,
        ..
    } = state;
    for pickup in pickups.iter_mut().filter(|p| p.alive) {
        let collector = combatants
            .iter_mut()
            .find(|c| c.alive && circles_overlap(pickup.pos, pickup.radius, c.pos, c.radius));
        if let Some(c) = collector {
            pickup.alive = false;
            let refreshed = c.grant_effect(pickup.kind, now, rules.effect_duration_ms);
            log::debug!("{} collected {}", c.side.label(), pickup.kind.label());
            events.push(GameEvent::PickupCollected {
                side: c.side,
                kind: pickup.kind,
                pos: pickup.pos,
                refreshed,
            });
        }
    }
    pickups.retain(|p| p.alive);
}

/// Record the outcome; later calls are ignored
fn declare(state: &mut MatchState, outcome: Outcome, events: &mut Vec<GameEvent>) {
    if state.outcome.is_some() {
        return;
    }
    match outcome {
        Outcome::Winner(side) => log::info!("{} wins after {} ticks", side.label(), state.ticks),
        Outcome::Draw => log::info!("Draw after {} ticks", state.ticks),
    }
    state.outcome = Some(outcome);
    state.phase = MatchPhase::Ended;
    events.push(GameEvent::OutcomeDeclared(outcome));
}

fn resolve_outcome(
    state: &mut MatchState,
    config: &MatchConfig,
    now: Millis,
    events: &mut Vec<GameEvent>,
) {
    let fallen: Vec<Side> = Side::BOTH
        .into_iter()
        .filter(|s| !state.combatant(*s).alive)
        .collect();

    match fallen.as_slice() {
        [] => {
            let Some(duration) = config.round_duration_ms else {
                return;
            };
            let started = state.round_started_at.unwrap_or(now);
            if now - started < duration {
                return;
            }
            let left = state.combatant(Side::Left).health;
            let right = state.combatant(Side::Right).health;
            let outcome = match left.cmp(&right) {
                std::cmp::Ordering::Greater => Outcome::Winner(Side::Left),
                std::cmp::Ordering::Less => Outcome::Winner(Side::Right),
                std::cmp::Ordering::Equal => Outcome::Draw,
            };
            log::info!("Round time expired ({} vs {})", left, right);
            declare(state, outcome, events);
        }
        [side] => {
            if config.settle_bolts_before_outcome && !state.bolts.is_empty() {
                log::debug!("Waiting for {} bolts to land", state.bolts.len());
                state.phase = MatchPhase::Settling;
            } else {
                declare(state, Outcome::Winner(side.opponent()), events);
            }
        }
        _ => declare(state, Outcome::Draw, events),
    }
}

/// Settling ends once every bolt has landed or left the arena
fn settle_outcome(state: &mut MatchState, events: &mut Vec<GameEvent>) {
    if !state.bolts.is_empty() {
        return;
    }
    let outcome = match state.combatants.iter().find(|c| c.alive) {
        Some(survivor) => Outcome::Winner(survivor.side),
        None => Outcome::Draw,
    };
    declare(state, outcome, events);
}
