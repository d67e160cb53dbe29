//! Game state and phase transitions
//!
//! `GameState` is the whole session: phase, every entity collection, score,
//! difficulty and the pending game-over countdown. It owns its own seeded RNG
//! so a run is reproducible from its seed and input sequence.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entities::{Bullet, Enemy, Particle, Player, Tint};
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Menu,
    /// Active round
    Playing,
    /// Round ended, waiting for acknowledgement
    GameOver,
}

/// Notable things that happened during the last tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A new round began
    RoundStarted,
    /// An enemy wave entered from above
    WaveSpawned { count: usize },
    /// An enemy was shot down
    EnemyDestroyed { at: Vec2 },
    /// The player was hit; game over is now scheduled
    PlayerDestroyed,
    /// The round is over
    GameOver {
        score: u64,
        high_score: u64,
        new_record: bool,
    },
    /// Game over screen dismissed
    ReturnedToMenu,
}

/// Complete session state (deterministic given seed and inputs)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub score: u64,
    pub high_score: u64,
    /// Continuous difficulty scalar
    pub level: f32,
    /// Ticks until the next wave
    pub spawn_timer: f32,
    /// Ticks until the scheduled game over, if the player has died
    pub death_timer: Option<u32>,
    /// Grace period between player death and game over
    pub game_over_delay: u32,
    /// Ticks simulated in the current round
    pub time_ticks: u64,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    /// Confirm state seen last tick (confirm is edge-triggered)
    pub(crate) confirm_held: bool,
}

impl GameState {
    /// Create a session in the menu with the given seed and stored high score
    pub fn new(seed: u64, high_score: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            player: Player::new(Player::spawn_point()),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            score: 0,
            high_score,
            level: START_LEVEL,
            spawn_timer: 0.0,
            death_timer: None,
            game_over_delay: GAME_OVER_DELAY_TICKS,
            time_ticks: 0,
            events: Vec::new(),
            confirm_held: false,
        }
    }

    /// Override the death-to-game-over delay. Zero is raised to one tick so the
    /// explosion always gets at least one frame.
    pub fn with_game_over_delay(mut self, ticks: u32) -> Self {
        self.game_over_delay = ticks.max(1);
        self
    }

    /// Mutable access to the session RNG
    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Clear the field and put a fresh ship on it
    pub fn reset_round(&mut self) {
        self.player = Player::new(Player::spawn_point());
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.enemies.clear();
        self.particles.clear();
        self.score = 0;
        self.level = START_LEVEL;
        self.spawn_timer = 0.0;
        self.death_timer = None;
        self.time_ticks = 0;
    }

    /// MENU -> PLAYING. Returns false (and does nothing) from any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Menu {
            return false;
        }
        self.reset_round();
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::RoundStarted);
        log::info!("Round started (seed {})", self.seed);
        true
    }

    /// GAMEOVER -> MENU. Returns false (and does nothing) from any other phase.
    pub fn acknowledge(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.phase = GamePhase::Menu;
        self.events.push(GameEvent::ReturnedToMenu);
        true
    }

    /// Kill the player and schedule game over. A dead player stays dead and
    /// the first countdown stands.
    pub fn kill_player(&mut self) {
        if !self.player.alive {
            return;
        }
        self.player.alive = false;
        let center = self.player.pos + self.player.size * 0.5;
        self.spawn_explosion(center, Tint::White);
        if self.death_timer.is_none() {
            self.death_timer = Some(self.game_over_delay.max(1));
        }
        self.events.push(GameEvent::PlayerDestroyed);
        log::info!("Player destroyed at tick {} (score {})", self.time_ticks, self.score);
    }

    /// PLAYING -> GAMEOVER, folding the score into the high score
    pub fn game_over(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.death_timer = None;
        let new_record = self.score > self.high_score;
        if new_record {
            self.high_score = self.score;
            log::info!("New high score: {}", self.high_score);
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver {
            score: self.score,
            high_score: self.high_score,
            new_record,
        });
        log::info!("Game over: score {} (best {})", self.score, self.high_score);
    }

    /// Burst of debris at `center`
    pub fn spawn_explosion(&mut self, center: Vec2, tint: Tint) {
        for _ in 0..EXPLOSION_PARTICLES {
            let particle = Particle::new(&mut self.rng, center, tint);
            self.particles.push(particle);
        }
    }
}
