//! Ships, shots and explosion debris
//!
//! Each entity owns its own position and lifecycle data and never references
//! another entity. Interaction happens in the tick through [`Entity::bounds`].

use glam::Vec2;
use rand::Rng;

use super::geometry::{Rect, clamp, rand_int};
use crate::consts::*;

/// Shared capability of everything the simulation advances
pub trait Entity {
    /// Advance one tick
    fn tick(&mut self);
    /// Bounding rectangle for overlap tests
    fn bounds(&self) -> Rect;
}

/// Cosmetic color family, resolved to RGBA by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    /// Player hull (cyan)
    Player,
    /// Enemy hull (magenta)
    Enemy,
    /// Player shots and the player's own explosion
    White,
    /// Enemy shots (amber)
    Amber,
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// Ticks until the next shot is allowed
    pub cooldown: u32,
    pub alive: bool,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED,
            cooldown: 0,
            alive: true,
        }
    }

    /// Spawn point: horizontally centered, near the bottom edge
    pub fn spawn_point() -> Vec2 {
        Vec2::new(
            CANVAS_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
            CANVAS_HEIGHT - PLAYER_START_OFFSET,
        )
    }

    /// Move by `(dx, dy) * speed`, then clamp inside the arena
    pub fn move_by(&mut self, dx: f32, dy: f32, arena: Vec2) {
        self.pos.x = clamp(self.pos.x + dx * self.speed, 0.0, arena.x - self.size.x);
        self.pos.y = clamp(self.pos.y + dy * self.speed, 0.0, arena.y - self.size.y);
    }

    pub fn can_shoot(&self) -> bool {
        self.cooldown == 0
    }

    /// Fire from the nose of the ship and start the reload countdown
    pub fn shoot(&mut self) -> Bullet {
        self.cooldown = PLAYER_RELOAD_TICKS;
        Bullet::new(
            Vec2::new(
                self.pos.x + self.size.x / 2.0 - BULLET_WIDTH / 2.0,
                self.pos.y - 12.0,
            ),
            PLAYER_SHOT_SPEED,
            Owner::Player,
        )
    }
}

impl Entity for Player {
    fn tick(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A descending enemy ship
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// Descent per tick
    pub speed: f32,
    pub cooldown: u32,
    pub alive: bool,
}

impl Enemy {
    /// New enemy with a randomized first-shot delay
    pub fn new<R: Rng + ?Sized>(rng: &mut R, pos: Vec2, speed: f32) -> Self {
        let (lo, hi) = ENEMY_FIRST_SHOT_TICKS;
        Self {
            pos,
            size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            speed,
            cooldown: rand_int(rng, lo, hi).max(0) as u32,
            alive: true,
        }
    }

    pub fn can_shoot(&self) -> bool {
        self.cooldown == 0
    }

    /// Fire from the underside and pick a fresh random reload time
    pub fn shoot<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Bullet {
        let (lo, hi) = ENEMY_RELOAD_TICKS;
        self.cooldown = rand_int(rng, lo, hi).max(0) as u32;
        Bullet::new(
            Vec2::new(
                self.pos.x + self.size.x / 2.0 - BULLET_WIDTH / 2.0,
                self.pos.y + self.size.y,
            ),
            ENEMY_SHOT_SPEED,
            Owner::Enemy,
        )
    }

    /// Center point, where explosions originate
    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }
}

impl Entity for Enemy {
    fn tick(&mut self) {
        self.pos.y += self.speed;
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A projectile moving straight up (player) or down (enemy)
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity, negative is upward
    pub vy: f32,
    pub owner: Owner,
}

impl Bullet {
    pub fn new(pos: Vec2, vy: f32, owner: Owner) -> Self {
        Self {
            pos,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            vy,
            owner,
        }
    }

    /// Fully above or fully below the play area, with the bullet's height as margin
    pub fn is_out_of_bounds(&self, canvas_height: f32) -> bool {
        self.pos.y < -self.size.y || self.pos.y > canvas_height + self.size.y
    }

    pub fn tint(&self) -> Tint {
        match self.owner {
            Owner::Player => Tint::White,
            Owner::Enemy => Tint::Amber,
        }
    }
}

impl Entity for Bullet {
    fn tick(&mut self) {
        self.pos.y += self.vy;
    }

    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A short-lived explosion fragment (visual only, but tick-driven)
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Ticks remaining
    pub life: u32,
    pub tint: Tint,
}

impl Particle {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, pos: Vec2, tint: Tint) -> Self {
        let radius = rand_int(rng, 2, 5) as f32;
        let vx = (rng.random::<f32>() - 0.5) * 3.0;
        let vy = (rng.random::<f32>() - 0.5) * 3.0;
        let life = rand_int(rng, 18, PARTICLE_MAX_LIFE as i32).max(0) as u32;
        Self {
            pos,
            vel: Vec2::new(vx, vy),
            radius,
            life,
            tint,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.life == 0
    }

    /// Remaining life as 0..=1, used for fading
    pub fn alpha(&self) -> f32 {
        (self.life as f32 / PARTICLE_MAX_LIFE as f32).clamp(0.0, 1.0)
    }
}

impl Entity for Particle {
    fn tick(&mut self) {
        self.pos += self.vel;
        self.life = self.life.saturating_sub(1);
    }

    fn bounds(&self) -> Rect {
        Rect::from_pos_size(
            self.pos - Vec2::splat(self.radius),
            Vec2::splat(self.radius * 2.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const ARENA: Vec2 = Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT);

    #[test]
    fn test_player_clamps_to_left_and_top() {
        let mut player = Player::new(Vec2::new(2.0, 3.0));
        player.move_by(-1.0, -1.0, ARENA);
        assert_eq!(player.pos, Vec2::ZERO);
    }

    #[test]
    fn test_player_clamps_to_right_and_bottom() {
        let mut player = Player::new(Vec2::new(CANVAS_WIDTH - 40.0, CANVAS_HEIGHT - 30.0));
        player.move_by(1.0, 1.0, ARENA);
        assert_eq!(player.pos.x, CANVAS_WIDTH - PLAYER_WIDTH);
        assert_eq!(player.pos.y, CANVAS_HEIGHT - PLAYER_HEIGHT);
    }

    #[test]
    fn test_player_shoot_sets_cooldown_and_spawns_at_nose() {
        let mut player = Player::new(Vec2::new(100.0, 600.0));
        assert!(player.can_shoot());
        let bullet = player.shoot();
        assert_eq!(player.cooldown, PLAYER_RELOAD_TICKS);
        assert!(!player.can_shoot());
        assert_eq!(bullet.pos, Vec2::new(100.0 + 19.0 - 2.0, 588.0));
        assert!(bullet.vy < 0.0);
        assert_eq!(bullet.owner, Owner::Player);

        for _ in 0..PLAYER_RELOAD_TICKS {
            player.tick();
        }
        assert!(player.can_shoot());
    }

    #[test]
    fn test_enemy_descends_and_reloads_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut enemy = Enemy::new(&mut rng, Vec2::new(50.0, -40.0), 2.0);
        assert!((40..=120).contains(&enemy.cooldown));

        enemy.tick();
        assert_eq!(enemy.pos.y, -38.0);

        let bullet = enemy.shoot(&mut rng);
        assert!((80..=160).contains(&enemy.cooldown));
        assert_eq!(bullet.pos, Vec2::new(50.0 + 17.0 - 2.0, -38.0 + ENEMY_HEIGHT));
        assert!(bullet.vy > 0.0);
        assert_eq!(bullet.tint(), Tint::Amber);
    }

    #[test]
    fn test_bullet_out_of_bounds() {
        let above = Bullet::new(Vec2::new(0.0, -BULLET_HEIGHT - 1.0), -8.0, Owner::Player);
        let below = Bullet::new(
            Vec2::new(0.0, CANVAS_HEIGHT + BULLET_HEIGHT + 1.0),
            5.0,
            Owner::Enemy,
        );
        let inside = Bullet::new(Vec2::new(0.0, 0.0), -8.0, Owner::Player);
        assert!(above.is_out_of_bounds(CANVAS_HEIGHT));
        assert!(below.is_out_of_bounds(CANVAS_HEIGHT));
        assert!(!inside.is_out_of_bounds(CANVAS_HEIGHT));
    }

    #[test]
    fn test_particle_lifecycle() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particle = Particle::new(&mut rng, Vec2::new(10.0, 10.0), Tint::Enemy);
        assert!((2.0..=5.0).contains(&particle.radius));
        assert!(particle.vel.x.abs() <= 1.5 && particle.vel.y.abs() <= 1.5);
        assert!((18..=30).contains(&particle.life));

        let life = particle.life;
        for _ in 0..life - 1 {
            particle.tick();
        }
        assert!(!particle.is_expired());
        particle.tick();
        assert!(particle.is_expired());
        assert_eq!(particle.alpha(), 0.0);

        particle.tick();
        assert_eq!(particle.life, 0);
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_arena(
            x in 0.0f32..CANVAS_WIDTH, y in 0.0f32..CANVAS_HEIGHT,
            moves in proptest::collection::vec((-1.0f32..=1.0, -1.0f32..=1.0), 1..200),
        ) {
            let mut player = Player::new(Vec2::new(x, y));
            for (dx, dy) in moves {
                player.move_by(dx * 50.0, dy * 50.0, ARENA);
                prop_assert!(player.pos.x >= 0.0 && player.pos.x <= CANVAS_WIDTH - PLAYER_WIDTH);
                prop_assert!(player.pos.y >= 0.0 && player.pos.y <= CANVAS_HEIGHT - PLAYER_HEIGHT);
            }
        }

        #[test]
        fn prop_cooldown_decrements_to_zero(seed in any::<u64>(), start in 0u32..200) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut player = Player::new(Vec2::ZERO);
            let mut enemy = Enemy::new(&mut rng, Vec2::ZERO, 1.0);
            player.cooldown = start;
            enemy.cooldown = start;
            player.tick();
            enemy.tick();
            prop_assert_eq!(player.cooldown, start.saturating_sub(1));
            prop_assert_eq!(enemy.cooldown, start.saturating_sub(1));
        }
    }
}
