//! Space Shooter - A vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, game state)
//! - `session`: Game state bound to a persistent high score store
//! - `renderer`: Frame views, render sinks and the WebGPU pipeline
//! - `platform`: Keyboard to input snapshot mapping
//! - `persistence`: Key-value stores (memory, JSON file, LocalStorage)

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Play area in canvas pixels (origin top-left, y down)
    pub const CANVAS_WIDTH: f32 = 540.0;
    pub const CANVAS_HEIGHT: f32 = 720.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 38.0;
    pub const PLAYER_HEIGHT: f32 = 28.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Ticks between player shots
    pub const PLAYER_RELOAD_TICKS: u32 = 10;
    pub const PLAYER_SHOT_SPEED: f32 = -8.0;
    /// Spawn point offset from the bottom edge
    pub const PLAYER_START_OFFSET: f32 = 60.0;

    /// Enemy ships
    pub const ENEMY_WIDTH: f32 = 34.0;
    pub const ENEMY_HEIGHT: f32 = 26.0;
    pub const ENEMY_SHOT_SPEED: f32 = 5.0;
    /// Initial cooldown range (ticks, inclusive)
    pub const ENEMY_FIRST_SHOT_TICKS: (i32, i32) = (40, 120);
    /// Cooldown range after each shot (ticks, inclusive)
    pub const ENEMY_RELOAD_TICKS: (i32, i32) = (80, 160);
    /// Per-tick chance a ready enemy opens fire
    pub const ENEMY_FIRE_CHANCE: f32 = 0.15;
    /// Enemies this far below the canvas are culled
    pub const ENEMY_CULL_MARGIN: f32 = 40.0;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 13.0;

    /// Particles per explosion
    pub const EXPLOSION_PARTICLES: usize = 22;
    /// Longest particle life, used to fade alpha
    pub const PARTICLE_MAX_LIFE: u32 = 30;

    /// Score per destroyed enemy
    pub const ENEMY_KILL_SCORE: u64 = 100;

    /// Spawn policy
    pub const START_LEVEL: f32 = 1.0;
    pub const LEVEL_STEP: f32 = 0.03;
    pub const MAX_WAVE_SIZE: i32 = 6;
    pub const BASE_SPAWN_INTERVAL: f32 = 60.0;
    pub const MIN_SPAWN_INTERVAL: f32 = 20.0;
    /// Horizontal spawn margins (left edge, right edge inset)
    pub const SPAWN_MARGIN_LEFT: i32 = 20;
    pub const SPAWN_MARGIN_RIGHT: i32 = 54;
    /// Spawn height above the canvas (inclusive range)
    pub const SPAWN_HEIGHT_ABOVE: (i32, i32) = (30, 80);

    /// Death animation grace period before game over (51 ticks ≈ 850 ms)
    pub const GAME_OVER_DELAY_TICKS: u32 = 51;
}
