//! Weapon logic: fan volleys and blade swings

use glam::Vec2;

use super::geometry::segment_intersects_circle;
use super::state::{Bolt, Combatant};
use crate::tuning::WeaponKind;
use crate::{Millis, bearing, heading, wrap_angle};

/// Bolt angles of a volley of `count` aimed along `aim`
///
/// The fan spans the full `spread`, evenly spaced and centred on `aim`. A
/// single bolt flies straight along `aim`.
pub fn fan_angles(aim: f32, count: u32, spread: f32) -> impl Iterator<Item = f32> {
    let step = if count > 1 {
        spread / (count - 1) as f32
    } else {
        0.0
    };
    let center = (count as f32 - 1.0) / 2.0;
    (0..count).map(move |i| aim + (i as f32 - center) * step)
}

/// True if the shooter's weapon is off cooldown
pub fn ready_to_fire(shooter: &Combatant, now: Millis) -> bool {
    match (shooter.fire_interval(), shooter.last_shot) {
        (Some(_), None) => true,
        (Some(interval), Some(last)) => now - last >= interval,
        (None, _) => false,
    }
}

/// Fire a volley at `target` if the weapon is ready
///
/// `next_id` hands out bolt IDs. Returns the new bolts, or `None` when the
/// shooter is melee or still cooling down.
pub fn fire_volley(
    shooter: &mut Combatant,
    target: Vec2,
    now: Millis,
    bolt_radius: f32,
    mut next_id: impl FnMut() -> u32,
) -> Option<Vec<Bolt>> {
    let WeaponKind::Ranged {
        bolts_per_volley,
        bolt_speed,
        spread,
        ..
    } = shooter.archetype.weapon
    else {
        return None;
    };
    if !ready_to_fire(shooter, now) {
        return None;
    }
    shooter.last_shot = Some(now);

    let aim = bearing(shooter.pos, target);
    let bolts = fan_angles(aim, bolts_per_volley, spread)
        .map(|angle| {
            let dir = heading(angle);
            Bolt::new(
                next_id(),
                shooter.side,
                shooter.pos + dir * shooter.radius,
                dir * bolt_speed,
                bolt_radius,
            )
        })
        .collect();
    Some(bolts)
}

/// Blade segment from the body edge to the tip, `None` for ranged
pub fn blade_segment(attacker: &Combatant) -> Option<(Vec2, Vec2)> {
    let WeaponKind::Melee { reach, .. } = attacker.archetype.weapon else {
        return None;
    };
    let dir = heading(attacker.swing_angle);
    Some((
        attacker.pos + dir * attacker.radius,
        attacker.pos + dir * (attacker.radius + reach),
    ))
}

/// Advance the blade one frame and test it against `defender`
///
/// Returns the damage landed this frame, if any. The hit cooldown belongs
/// to the attacker alone.
pub fn swing(attacker: &mut Combatant, defender: &Combatant, now: Millis) -> Option<u32> {
    let WeaponKind::Melee {
        damage,
        swing_speed,
        ..
    } = attacker.archetype.weapon
    else {
        return None;
    };
    attacker.swing_angle = wrap_angle(attacker.swing_angle + swing_speed);

    if !defender.alive {
        return None;
    }
    let (start, end) = blade_segment(attacker)?;
    if !segment_intersects_circle(start, end, defender.pos, defender.radius) {
        return None;
    }

    let cooldown = attacker.hit_cooldown()?;
    if let Some(last) = attacker.last_hit {
        if now - last <= cooldown {
            return None;
        }
    }
    attacker.last_hit = Some(now);
    Some(damage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effects::EffectKind;
    use crate::sim::state::Side;
    use crate::tuning::Archetype;
    use std::f32::consts::{FRAC_PI_4, FRAC_PI_8};

    fn ranged(bolts: u32, spread: f32) -> Combatant {
        let mut archetype = Archetype::speedster();
        archetype.weapon = WeaponKind::Ranged {
            fire_interval_ms: 500.0,
            bolts_per_volley: bolts,
            bolt_speed: 7.0,
            spread,
        };
        Combatant::new(Side::Left, archetype, Vec2::new(100.0, 100.0), 0.0, 50)
    }

    fn counter() -> impl FnMut() -> u32 {
        let mut n = 0;
        move || {
            n += 1;
            n
        }
    }

    #[test]
    fn test_three_bolt_fan_angles() {
        let mut shooter = ranged(3, FRAC_PI_4);
        let bolts = fire_volley(&mut shooter, Vec2::new(300.0, 100.0), 0.0, 8.0, counter()).unwrap();
        let angles: Vec<f32> = bolts.iter().map(|b| b.vel.y.atan2(b.vel.x)).collect();
        let expected = [-FRAC_PI_8, 0.0, FRAC_PI_8];
        assert_eq!(angles.len(), 3);
        for (got, want) in angles.iter().zip(expected) {
            assert!((got - want).abs() < 1e-5, "{} vs {}", got, want);
        }
        for bolt in &bolts {
            assert!((bolt.vel.length() - 7.0).abs() < 1e-4);
            assert!((bolt.pos.distance(shooter.pos) - shooter.radius).abs() < 1e-4);
            assert_eq!(bolt.owner, Side::Left);
        }
    }

    #[test]
    fn test_speedster_fan_spans_its_spread() {
        let WeaponKind::Ranged {
            bolts_per_volley,
            spread,
            ..
        } = Archetype::speedster().weapon
        else {
            panic!("speedster is ranged");
        };
        let angles: Vec<f32> = fan_angles(0.0, bolts_per_volley, spread).collect();
        let expected = [-FRAC_PI_8 / 2.0, 0.0, FRAC_PI_8 / 2.0];
        for (got, want) in angles.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "{} vs {}", got, want);
        }
    }

    #[test]
    fn test_single_bolt_flies_straight() {
        let angles: Vec<f32> = fan_angles(0.3, 1, 1.0).collect();
        assert_eq!(angles, vec![0.3]);
    }

    #[test]
    fn test_fire_rate_limit() {
        let mut shooter = ranged(1, 0.0);
        let target = Vec2::new(300.0, 100.0);
        assert!(fire_volley(&mut shooter, target, 1000.0, 8.0, counter()).is_some());
        assert!(fire_volley(&mut shooter, target, 1499.0, 8.0, counter()).is_none());
        assert!(fire_volley(&mut shooter, target, 1500.0, 8.0, counter()).is_some());
    }

    #[test]
    fn test_rapid_fire_shortens_interval() {
        let mut shooter = ranged(1, 0.0);
        shooter.grant_effect(EffectKind::RapidFire, 0.0, 8000.0);
        let target = Vec2::new(300.0, 100.0);
        assert!(fire_volley(&mut shooter, target, 0.0, 8.0, counter()).is_some());
        assert!(fire_volley(&mut shooter, target, 170.0, 8.0, counter()).is_some());
    }

    #[test]
    fn test_melee_never_fires() {
        let mut sword = Combatant::new(Side::Right, Archetype::swordsman(), Vec2::ZERO, 0.0, 50);
        assert!(fire_volley(&mut sword, Vec2::new(10.0, 0.0), 0.0, 8.0, counter()).is_none());
    }

    #[test]
    fn test_swing_hits_with_per_attacker_cooldown() {
        let mut sword = Combatant::new(Side::Left, Archetype::swordsman(), Vec2::new(100.0, 100.0), 0.0, 50);
        // Defender sits on the blade's path along +x
        let defender = Combatant::new(Side::Right, Archetype::speedster(), Vec2::new(170.0, 100.0), 0.0, 50);
        sword.swing_angle = -0.16;

        assert_eq!(swing(&mut sword, &defender, 1000.0), Some(6));
        sword.swing_angle = -0.16;
        assert_eq!(swing(&mut sword, &defender, 1100.0), None);
        // Exactly one cooldown later is still too soon
        sword.swing_angle = -0.16;
        assert_eq!(swing(&mut sword, &defender, 1300.0), None);
        sword.swing_angle = -0.16;
        assert_eq!(swing(&mut sword, &defender, 1301.0), Some(6));
        assert_eq!(sword.last_hit, Some(1301.0));
    }

    #[test]
    fn test_swing_misses_behind() {
        let mut sword = Combatant::new(Side::Left, Archetype::swordsman(), Vec2::new(100.0, 100.0), 0.0, 50);
        let defender = Combatant::new(Side::Right, Archetype::speedster(), Vec2::new(30.0, 100.0), 0.0, 50);
        sword.swing_angle = 0.0;
        assert_eq!(swing(&mut sword, &defender, 0.0), None);
        assert!((sword.swing_angle - 0.16).abs() < 1e-6);
    }

    #[test]
    fn test_swing_angle_wraps() {
        let mut sword = Combatant::new(Side::Left, Archetype::swordsman(), Vec2::ZERO, 0.0, 50);
        let far = Combatant::new(Side::Right, Archetype::speedster(), Vec2::new(900.0, 900.0), 0.0, 50);
        for _ in 0..200 {
            swing(&mut sword, &far, 0.0);
            assert!((0.0..std::f32::consts::TAU).contains(&sword.swing_angle));
        }
    }
}
