//! Asteroids, bullets, aliens, particles and ship debris
//!
//! Each kind owns its integration step and its expiry predicate. Velocity is
//! only changed from outside through [`Body::apply_impulse`] or
//! [`Bullet::reflect_from`].

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::physics::{Arena, Body, integrate};
use crate::consts::*;
use crate::{heading_vector, vector_heading};

/// Asteroid size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    pub fn radius(self) -> f32 {
        match self {
            AsteroidSize::Large => 40.0,
            AsteroidSize::Medium => 25.0,
            AsteroidSize::Small => 15.0,
        }
    }

    pub fn speed(self) -> f32 {
        match self {
            AsteroidSize::Large => 2.0,
            AsteroidSize::Medium => 2.5,
            AsteroidSize::Small => 3.0,
        }
    }

    /// Score awarded when destroyed
    pub fn points(self) -> u64 {
        match self {
            AsteroidSize::Large => 20,
            AsteroidSize::Medium => 50,
            AsteroidSize::Small => 100,
        }
    }

    /// Size and number of fragments left behind
    pub fn split(self) -> Option<(AsteroidSize, usize)> {
        match self {
            AsteroidSize::Large => Some((AsteroidSize::Medium, 2)),
            AsteroidSize::Medium => Some((AsteroidSize::Small, 1)),
            AsteroidSize::Small => None,
        }
    }
}

/// A drifting, spinning rock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub pos: Vec2,
    vel: Vec2,
    pub size: AsteroidSize,
    pub radius: f32,
    /// Presentation-only spin (degrees)
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Local outline offsets, fixed at creation
    pub outline: Vec<Vec2>,
    destroyed: bool,
}

impl Asteroid {
    /// Create an asteroid moving along `heading` (degrees) at its class speed
    pub fn new<R: Rng>(pos: Vec2, size: AsteroidSize, heading: f32, rng: &mut R) -> Self {
        let radius = size.radius();
        Self {
            pos,
            vel: heading_vector(heading) * size.speed(),
            size,
            radius,
            rotation: 0.0,
            rotation_speed: (rng.random::<f32>() - 0.5) * 3.0,
            outline: generate_outline(radius, rng),
            destroyed: false,
        }
    }

    /// Create an asteroid with a uniformly random heading
    pub fn with_random_heading<R: Rng>(pos: Vec2, size: AsteroidSize, rng: &mut R) -> Self {
        let heading = rng.random_range(0.0..360.0);
        Self::new(pos, size, heading, rng)
    }

    pub fn update(&mut self, arena: &Arena) {
        (self.pos, self.vel) = integrate(self.pos, self.vel, 1.0, arena, true);
        self.rotation += self.rotation_speed;
    }

    /// Mark destroyed. Returns false if it already was.
    pub fn destroy(&mut self) -> bool {
        !std::mem::replace(&mut self.destroyed, true)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Fragments spawned at this asteroid's position, each on a random heading
    pub fn fragments<R: Rng>(&self, rng: &mut R) -> Vec<Asteroid> {
        match self.size.split() {
            Some((size, count)) => (0..count)
                .map(|_| Asteroid::with_random_heading(self.pos, size, rng))
                .collect(),
            None => Vec::new(),
        }
    }
}

impl Body for Asteroid {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn velocity(&self) -> Vec2 {
        self.vel
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn apply_impulse(&mut self, impulse: Vec2) {
        self.vel += impulse;
    }
}

/// Jagged outline: 7-10 points at 70%-130% of the base radius
fn generate_outline<R: Rng>(radius: f32, rng: &mut R) -> Vec<Vec2> {
    let count = rng.random_range(7..=10);
    (0..count)
        .map(|i| {
            let angle = 360.0 / count as f32 * i as f32;
            let r = radius * (0.7 + rng.random::<f32>() * 0.6);
            heading_vector(angle) * r
        })
        .collect()
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOrigin {
    Player,
    Alien,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    vel: Vec2,
    pub radius: f32,
    pub origin: BulletOrigin,
    pub age: u32,
    destroyed: bool,
}

impl Bullet {
    pub fn new(pos: Vec2, heading: f32, origin: BulletOrigin) -> Self {
        Self {
            pos,
            vel: heading_vector(heading) * BULLET_SPEED,
            radius: BULLET_RADIUS,
            origin,
            age: 0,
            destroyed: false,
        }
    }

    pub fn update(&mut self, arena: &Arena) {
        (self.pos, self.vel) = integrate(self.pos, self.vel, 1.0, arena, true);
        self.age += 1;
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_expired(&self) -> bool {
        self.destroyed || self.age > BULLET_LIFETIME
    }

    pub fn is_hostile(&self) -> bool {
        self.origin == BulletOrigin::Alien
    }

    /// Send the bullet straight away from `center` at its current speed and
    /// hand it to the player. Returns false (and leaves the bullet alone)
    /// when the bullet sits exactly on `center`.
    pub fn reflect_from(&mut self, center: Vec2) -> bool {
        let Some(dir) = (self.pos - center).try_normalize() else {
            return false;
        };
        self.vel = dir * self.vel.length();
        self.origin = BulletOrigin::Player;
        true
    }
}

impl Body for Bullet {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn velocity(&self) -> Vec2 {
        self.vel
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn apply_impulse(&mut self, impulse: Vec2) {
        self.vel += impulse;
    }
}

/// A flying saucer that crosses the field and shoots at the ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alien {
    pub pos: Vec2,
    vel: Vec2,
    pub radius: f32,
    pub points: u64,
    pub age: u32,
    pub last_shot_age: u32,
    destroyed: bool,
}

impl Alien {
    /// Create an alien heading for the center of the field
    pub fn new(pos: Vec2, arena: &Arena) -> Self {
        let vel = (arena.center() - pos).normalize_or_zero() * ALIEN_SPEED;
        Self {
            pos,
            vel,
            radius: ALIEN_RADIUS,
            points: ALIEN_POINTS,
            age: 0,
            last_shot_age: 0,
            destroyed: false,
        }
    }

    /// Move one frame. Fires at `target` when the shot interval has elapsed.
    pub fn update<R: Rng>(&mut self, target: Option<Vec2>, arena: &Arena, rng: &mut R) -> Option<Bullet> {
        if self.destroyed {
            return None;
        }
        (self.pos, self.vel) = integrate(self.pos, self.vel, 1.0, arena, false);
        self.age += 1;

        if self.age - self.last_shot_age <= ALIEN_SHOT_INTERVAL {
            return None;
        }
        self.last_shot_age = self.age;
        let aim = target?;
        let dir = (aim - self.pos).try_normalize()?;
        let jitter = rng.random_range(-ALIEN_AIM_JITTER..ALIEN_AIM_JITTER);
        Some(Bullet::new(self.pos, vector_heading(dir) + jitter, BulletOrigin::Alien))
    }

    /// Mark destroyed. Returns false if it already was.
    pub fn destroy(&mut self) -> bool {
        !std::mem::replace(&mut self.destroyed, true)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn should_remove(&self, arena: &Arena) -> bool {
        self.destroyed || arena.is_far_outside(self.pos, ALIEN_REMOVAL_MARGIN)
    }
}

impl Body for Alien {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn velocity(&self) -> Vec2 {
        self.vel
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn apply_impulse(&mut self, impulse: Vec2) {
        self.vel += impulse;
    }
}

/// Cosmetic spark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub age: u32,
}

impl Particle {
    pub fn new<R: Rng>(pos: Vec2, rng: &mut R) -> Self {
        let heading = rng.random_range(0.0..360.0);
        let speed = rng.random_range(PARTICLE_MIN_SPEED..PARTICLE_MAX_SPEED);
        Self {
            pos,
            vel: heading_vector(heading) * speed,
            age: 0,
        }
    }

    pub fn update(&mut self, arena: &Arena) {
        (self.pos, self.vel) = integrate(self.pos, self.vel, PARTICLE_FRICTION, arena, true);
        self.age += 1;
    }

    pub fn is_expired(&self) -> bool {
        self.age > PARTICLE_LIFETIME
    }

    /// 0 when fresh, 1 when about to expire
    pub fn age_ratio(&self) -> f32 {
        (self.age as f32 / PARTICLE_LIFETIME as f32).min(1.0)
    }
}

/// One tumbling edge of a destroyed ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipDebris {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Segment endpoints relative to `pos`
    pub segment: [Vec2; 2],
    pub rotation: f32,
    pub rotation_speed: f32,
    pub age: u32,
}

impl ShipDebris {
    /// `base_vel` is the ship's velocity at the moment of destruction
    pub fn new<R: Rng>(pos: Vec2, segment: [Vec2; 2], base_vel: Vec2, rng: &mut R) -> Self {
        let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * DEBRIS_VELOCITY_JITTER;
        Self {
            pos,
            vel: base_vel + jitter,
            segment,
            rotation: 0.0,
            rotation_speed: (rng.random::<f32>() - 0.5) * DEBRIS_SPIN_RANGE,
            age: 0,
        }
    }

    pub fn update(&mut self, arena: &Arena) {
        (self.pos, self.vel) = integrate(self.pos, self.vel, DEBRIS_FRICTION, arena, true);
        self.rotation += self.rotation_speed;
        self.age += 1;
    }

    pub fn is_expired(&self) -> bool {
        self.age > DEBRIS_LIFETIME
    }

    pub fn age_ratio(&self) -> f32 {
        (self.age as f32 / DEBRIS_LIFETIME as f32).min(1.0)
    }
}
