//! Collision detection and response
//!
//! Everything is a circle. Pairs are resolved in a fixed order each frame:
//! player bullets against asteroids, player bullets against aliens, then the
//! ship (or its shield) against asteroids, aliens and alien bullets. A bullet
//! resolves at most one hit per frame.

use glam::Vec2;

use super::physics::Body;
use super::spawn::explosion;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Strict circle overlap: touching is not colliding
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    a_pos.distance(b_pos) < a_radius + b_radius
}

/// Whether two bodies overlap
#[inline]
pub fn collides<A: Body + ?Sized, B: Body + ?Sized>(a: &A, b: &B) -> bool {
    circles_overlap(a.position(), a.radius(), b.position(), b.radius())
}

/// Push `body` directly away from the shield center. Returns the contact
/// point on the shield boundary, or None when the centers coincide.
pub fn shield_bounce<B: Body + ?Sized>(shield_center: Vec2, body: &mut B) -> Option<Vec2> {
    let dir = (body.position() - shield_center).try_normalize()?;
    body.apply_impulse(dir * SHIELD_BOUNCE_FORCE);
    Some(shield_center + dir * SHIELD_RADIUS)
}

/// Run every collision pass for this frame
pub fn resolve_collisions(state: &mut GameState, now_ms: u64) {
    player_bullets_vs_asteroids(state);
    player_bullets_vs_aliens(state);
    ship_vs_hazards(state, now_ms);
}

fn player_bullets_vs_asteroids(state: &mut GameState) {
    let mut fragments = Vec::new();
    let mut hits = Vec::new();

    for bullet in state.bullets.iter_mut() {
        if bullet.is_hostile() || bullet.is_destroyed() {
            continue;
        }
        let Some(asteroid) = state
            .asteroids
            .iter_mut()
            .find(|a| !a.is_destroyed() && collides(&*bullet, &**a))
        else {
            continue;
        };
        asteroid.destroy();
        bullet.destroy();
        fragments.extend(asteroid.fragments(&mut state.rng));
        hits.push((asteroid.pos, asteroid.size));
    }

    // Fragments join after the pass so they cannot be hit on the frame they appear
    state.asteroids.retain(|a| !a.is_destroyed());
    state.asteroids.extend(fragments);

    for (pos, size) in hits {
        explosion(&mut state.particles, pos, ASTEROID_BURST, &mut state.rng);
        state.award(size.points());
        state.push_event(GameEvent::AsteroidDestroyed { size });
    }
}

fn player_bullets_vs_aliens(state: &mut GameState) {
    let mut hits = Vec::new();

    for bullet in state.bullets.iter_mut() {
        if bullet.is_hostile() || bullet.is_destroyed() {
            continue;
        }
        let Some(alien) = state
            .aliens
            .iter_mut()
            .find(|a| !a.is_destroyed() && collides(&*bullet, &**a))
        else {
            continue;
        };
        alien.destroy();
        bullet.destroy();
        hits.push((alien.pos, alien.points));
    }

    for (pos, points) in hits {
        explosion(&mut state.particles, pos, ALIEN_BURST, &mut state.rng);
        state.award(points);
        state.push_event(GameEvent::AlienDestroyed);
    }
}

fn ship_vs_hazards(state: &mut GameState, now_ms: u64) {
    let ship = &state.ship;
    if ship.is_destroyed() || ship.is_invulnerable(now_ms) {
        return;
    }
    let center = ship.pos;
    let radius = ship.effective_radius();
    let shielded = ship.shields_active();

    let mut contacts = Vec::new();
    let mut hit = false;

    for asteroid in state.asteroids.iter_mut() {
        if asteroid.is_destroyed() || !circles_overlap(center, radius, asteroid.pos, asteroid.radius) {
            continue;
        }
        if !shielded {
            hit = true;
            break;
        }
        contacts.extend(shield_bounce(center, asteroid));
    }

    if !hit {
        for alien in state.aliens.iter_mut() {
            if alien.is_destroyed() || !circles_overlap(center, radius, alien.pos, alien.radius) {
                continue;
            }
            if !shielded {
                hit = true;
                break;
            }
            contacts.extend(shield_bounce(center, alien));
        }
    }

    if !hit {
        for bullet in state.bullets.iter_mut() {
            if !bullet.is_hostile()
                || bullet.is_destroyed()
                || !circles_overlap(center, radius, bullet.pos, bullet.radius)
            {
                continue;
            }
            if !shielded {
                bullet.destroy();
                hit = true;
                break;
            }
            if bullet.reflect_from(center) {
                let dir = (bullet.pos - center).normalize_or_zero();
                contacts.push(center + dir * SHIELD_RADIUS);
            }
        }
    }

    for contact in contacts {
        explosion(&mut state.particles, contact, SHIELD_BURST, &mut state.rng);
        state.push_event(GameEvent::ShieldContact);
    }

    if hit {
        destroy_ship(state);
    }
}

/// Destroy the ship. No-op when it is already down.
pub fn destroy_ship(state: &mut GameState) {
    let arena = state.arena;
    let Some(debris) = state.ship.destroy(&arena, &mut state.rng) else {
        return;
    };
    state.lives = state.lives.saturating_sub(1);
    explosion(&mut state.particles, state.ship.pos, SHIP_BURST, &mut state.rng);
    state.debris.extend(debris);
    state.push_event(GameEvent::ShipDestroyed);

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.respawn_timer = None;
        log::info!("Game over - final score {} on level {}", state.score, state.level);
        state.push_event(GameEvent::GameOver { score: state.score });
    } else {
        state.respawn_timer = Some(RESPAWN_DELAY_FRAMES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Alien, Asteroid, AsteroidSize, Bullet, BulletOrigin};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing_state() -> GameState {
        let mut state = GameState::new(2024);
        state.reset(10_000);
        state.asteroids.clear();
        state.drain_events();
        state
    }

    fn asteroid_at(pos: Vec2, size: AsteroidSize) -> Asteroid {
        let mut rng = Pcg32::seed_from_u64(11);
        Asteroid::new(pos, size, 90.0, &mut rng)
    }

    #[test]
    fn test_touching_is_not_colliding() {
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.99, 0.0), 5.0));
    }

    #[test]
    fn test_large_asteroid_splits_into_two_mediums() {
        let mut state = playing_state();
        let pos = Vec2::new(500.0, 500.0);
        state.asteroids.push(asteroid_at(pos, AsteroidSize::Large));
        state.bullets.push(Bullet::new(pos, 0.0, BulletOrigin::Player));

        resolve_collisions(&mut state, 20_000);

        assert_eq!(state.asteroids.len(), 2);
        assert!(state.asteroids.iter().all(|a| a.size == AsteroidSize::Medium && a.pos == pos));
        assert_eq!(state.score, 20);
        assert!(state.bullets[0].is_destroyed());
        assert_eq!(state.particles.len(), ASTEROID_BURST);
    }

    #[test]
    fn test_medium_and_small_scoring() {
        let mut state = playing_state();
        state.asteroids.push(asteroid_at(Vec2::new(200.0, 200.0), AsteroidSize::Medium));
        state.asteroids.push(asteroid_at(Vec2::new(800.0, 200.0), AsteroidSize::Small));
        state.bullets.push(Bullet::new(Vec2::new(200.0, 200.0), 0.0, BulletOrigin::Player));
        state.bullets.push(Bullet::new(Vec2::new(800.0, 200.0), 0.0, BulletOrigin::Player));

        resolve_collisions(&mut state, 20_000);

        assert_eq!(state.score, 150);
        assert_eq!(state.asteroids.len(), 1);
        assert_eq!(state.asteroids[0].size, AsteroidSize::Small);
        assert_eq!(state.asteroids[0].pos, Vec2::new(200.0, 200.0));
    }

    #[test]
    fn test_one_bullet_one_asteroid() {
        let mut state = playing_state();
        let pos = Vec2::new(300.0, 600.0);
        state.asteroids.push(asteroid_at(pos, AsteroidSize::Small));
        state.asteroids.push(asteroid_at(pos + Vec2::new(5.0, 0.0), AsteroidSize::Small));
        state.bullets.push(Bullet::new(pos, 0.0, BulletOrigin::Player));

        resolve_collisions(&mut state, 20_000);
        assert_eq!(state.asteroids.len(), 1);
        assert_eq!(state.score, 100);
    }

    #[test]
    fn test_alien_bullets_do_not_hit_asteroids() {
        let mut state = playing_state();
        let pos = Vec2::new(300.0, 600.0);
        state.asteroids.push(asteroid_at(pos, AsteroidSize::Small));
        state.bullets.push(Bullet::new(pos, 0.0, BulletOrigin::Alien));

        resolve_collisions(&mut state, 20_000);
        assert_eq!(state.asteroids.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_player_bullet_destroys_alien() {
        let mut state = playing_state();
        let pos = Vec2::new(100.0, 100.0);
        state.aliens.push(Alien::new(pos, &state.arena));
        state.bullets.push(Bullet::new(pos, 0.0, BulletOrigin::Player));

        resolve_collisions(&mut state, 20_000);
        assert_eq!(state.score, ALIEN_POINTS);
        assert!(state.aliens[0].is_destroyed());
        assert_eq!(state.particles.len(), ALIEN_BURST);
        assert!(state.pending_events().contains(&GameEvent::AlienDestroyed));
    }

    #[test]
    fn test_ship_hit_by_asteroid_loses_life() {
        let mut state = playing_state();
        let ship_pos = state.ship.pos;
        state.asteroids.push(asteroid_at(ship_pos + Vec2::new(15.0, 0.0), AsteroidSize::Small));

        resolve_collisions(&mut state, 20_000);
        assert!(state.ship.is_destroyed());
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert_eq!(state.debris.len(), 3);
        assert_eq!(state.particles.len(), SHIP_BURST);
        assert_eq!(state.respawn_timer, Some(RESPAWN_DELAY_FRAMES));
    }

    #[test]
    fn test_invulnerable_ship_is_skipped() {
        let mut state = playing_state();
        state.ship.respawn(state.ship_spawn_point(), 20_000);
        let ship_pos = state.ship.pos;
        state.asteroids.push(asteroid_at(ship_pos, AsteroidSize::Large));

        resolve_collisions(&mut state, 21_000);
        assert!(!state.ship.is_destroyed());
        assert_eq!(state.lives, STARTING_LIVES);
    }

    #[test]
    fn test_destroy_ship_is_idempotent() {
        let mut state = playing_state();
        destroy_ship(&mut state);
        destroy_ship(&mut state);
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert_eq!(state.debris.len(), 3);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = playing_state();
        state.lives = 1;
        destroy_ship(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.respawn_timer, None);
        assert!(state.pending_events().contains(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn test_shield_bounces_asteroid_instead_of_dying() {
        let mut state = playing_state();
        let ship_pos = state.ship.pos;
        // Outside the hull radius but inside the shield radius
        let rock = asteroid_at(ship_pos + Vec2::new(30.0, 0.0), AsteroidSize::Small);
        let before = rock.velocity();
        state.asteroids.push(rock);
        assert!(state.ship.activate_shields());

        resolve_collisions(&mut state, 20_000);
        assert!(!state.ship.is_destroyed());
        let after = state.asteroids[0].velocity();
        // Cumulative nudge along the ship-to-rock direction
        assert!((after - before - Vec2::new(SHIELD_BOUNCE_FORCE, 0.0)).length() < 1e-4);
        assert_eq!(state.particles.len(), SHIELD_BURST);
        assert!(state.pending_events().contains(&GameEvent::ShieldContact));
    }

    #[test]
    fn test_shield_bounce_skipped_when_coincident() {
        let mut state = playing_state();
        let ship_pos = state.ship.pos;
        let rock = asteroid_at(ship_pos, AsteroidSize::Small);
        let before = rock.velocity();
        state.asteroids.push(rock);
        state.ship.activate_shields();

        resolve_collisions(&mut state, 20_000);
        assert!(!state.ship.is_destroyed());
        assert_eq!(state.asteroids[0].velocity(), before);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_shield_reflects_alien_bullet_into_friendly_fire() {
        let mut state = playing_state();
        let ship_pos = state.ship.pos;
        // Alien bullet above the ship, flying down at it
        state.bullets.push(Bullet::new(ship_pos + Vec2::new(0.0, -20.0), 180.0, BulletOrigin::Alien));
        state.ship.activate_shields();

        resolve_collisions(&mut state, 20_000);
        let b = &state.bullets[0];
        assert_eq!(b.origin, BulletOrigin::Player);
        assert!(!b.is_destroyed());
        assert!((b.velocity() - Vec2::new(0.0, -BULLET_SPEED)).length() < 1e-3);
        assert!(!state.ship.is_destroyed());
    }

    #[test]
    fn test_reflected_bullet_scores_on_later_frame() {
        let mut state = playing_state();
        let ship_pos = state.ship.pos;
        state.bullets.push(Bullet::new(ship_pos + Vec2::new(0.0, -20.0), 180.0, BulletOrigin::Alien));
        // Out of shield reach, straight up the reflection path
        state.asteroids.push(asteroid_at(ship_pos + Vec2::new(0.0, -60.0), AsteroidSize::Small));
        state.ship.activate_shields();

        resolve_collisions(&mut state, 20_000);
        assert_eq!(state.bullets[0].origin, BulletOrigin::Player);
        assert_eq!(state.score, 0);

        let arena = state.arena;
        for frame in 1..10 {
            for bullet in state.bullets.iter_mut() {
                bullet.update(&arena);
            }
            resolve_collisions(&mut state, 20_000 + frame * 16);
            if state.score > 0 {
                break;
            }
        }
        assert_eq!(state.score, AsteroidSize::Small.points());
        assert!(state.asteroids.is_empty());
        assert!(state.bullets[0].is_destroyed());
        assert!(!state.ship.is_destroyed());
    }

    #[test]
    fn test_alien_bullet_kills_unshielded_ship() {
        let mut state = playing_state();
        let ship_pos = state.ship.pos;
        state.bullets.push(Bullet::new(ship_pos + Vec2::new(0.0, -5.0), 180.0, BulletOrigin::Alien));

        resolve_collisions(&mut state, 20_000);
        assert!(state.ship.is_destroyed());
        assert!(state.bullets[0].is_destroyed());
    }

    #[test]
    fn test_shield_bounces_alien() {
        let mut state = playing_state();
        let ship_pos = state.ship.pos;
        let alien = Alien::new(ship_pos + Vec2::new(0.0, 30.0), &state.arena);
        let before = alien.velocity();
        state.aliens.push(alien);
        state.ship.activate_shields();

        resolve_collisions(&mut state, 20_000);
        assert!(!state.ship.is_destroyed());
        assert!(!state.aliens[0].is_destroyed());
        let delta = state.aliens[0].velocity() - before;
        assert!((delta - Vec2::new(0.0, SHIELD_BOUNCE_FORCE)).length() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_collision_is_symmetric(
            ax in 0.0f32..1024.0, ay in 0.0f32..768.0, ar in 1.0f32..50.0,
            bx in 0.0f32..1024.0, by in 0.0f32..768.0, br in 1.0f32..50.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(circles_overlap(a, ar, b, br), circles_overlap(b, br, a, ar));
            prop_assert_eq!(circles_overlap(a, ar, b, br), a.distance(b) < ar + br);
        }
    }
}
