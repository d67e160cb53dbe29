//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock timers
//! - Seeded RNG only
//! - No rendering, storage or platform dependencies

pub mod entities;
pub mod geometry;
pub mod state;
pub mod tick;

pub use entities::{Bullet, Enemy, Entity, Owner, Particle, Player, Tint};
pub use geometry::{Rect, clamp, rand_int, rects_overlap};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{
    InputSnapshot, cull, resolve_collisions, run_spawn_policy, spawn_interval, spawn_wave, tick,
    wave_size,
};
