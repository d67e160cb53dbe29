//! Rendering module
//!
//! Renderers only ever see a read-only [`Frame`]. The WebGPU pipeline turns a
//! frame into colored triangles; the headless sink just keeps statistics.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;

use crate::sim::{Bullet, Enemy, GamePhase, GameState, Particle, Player};

/// Everything a renderer may look at for one frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub phase: GamePhase,
    pub player: &'a Player,
    pub player_bullets: &'a [Bullet],
    pub enemy_bullets: &'a [Bullet],
    pub enemies: &'a [Enemy],
    pub particles: &'a [Particle],
    pub score: u64,
    pub high_score: u64,
    /// Host time in seconds, for background animation
    pub time_secs: f32,
}

impl<'a> Frame<'a> {
    pub fn capture(state: &'a GameState, time_secs: f32) -> Self {
        Self {
            phase: state.phase,
            player: &state.player,
            player_bullets: &state.player_bullets,
            enemy_bullets: &state.enemy_bullets,
            enemies: &state.enemies,
            particles: &state.particles,
            score: state.score,
            high_score: state.high_score,
            time_secs,
        }
    }

    /// Entities are drawn while playing and behind the game over screen
    pub fn shows_field(&self) -> bool {
        self.phase != GamePhase::Menu
    }
}

/// Anything that can present a frame
pub trait RenderSink {
    fn present(&mut self, frame: &Frame<'_>);
}

/// Renderer for native runs: records what would have been drawn
#[derive(Debug, Clone, Default)]
pub struct HeadlessSink {
    pub frames: u64,
    pub peak_enemies: usize,
    pub peak_bullets: usize,
    pub peak_particles: usize,
    pub last_score: u64,
}

impl RenderSink for HeadlessSink {
    fn present(&mut self, frame: &Frame<'_>) {
        self.frames += 1;
        self.peak_enemies = self.peak_enemies.max(frame.enemies.len());
        self.peak_bullets = self
            .peak_bullets
            .max(frame.player_bullets.len() + frame.enemy_bullets.len());
        self.peak_particles = self.peak_particles.max(frame.particles.len());
        self.last_score = frame.score;
        log::trace!(
            "frame {}: {:?} score={} enemies={} particles={}",
            self.frames,
            frame.phase,
            frame.score,
            frame.enemies.len(),
            frame.particles.len()
        );
    }
}
