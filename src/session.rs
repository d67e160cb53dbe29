//! A game session bound to its high score store
//!
//! The simulation itself never touches storage. `Session` reads the stored
//! best score once at construction, drives `sim::tick`, and writes the store
//! whenever a finished round sets a new record.

use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, InputSnapshot, tick};

/// Session state machine plus persistence
pub struct Session<S: KeyValueStore> {
    state: GameState,
    high_score: HighScore,
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(seed: u64, store: S, settings: &Settings) -> Self {
        let high_score = HighScore::load(&store);
        let state = GameState::new(seed, high_score.best)
            .with_game_over_delay(settings.effective_game_over_delay());
        Self {
            state,
            high_score,
            store,
        }
    }

    /// Read-only view for renderers and HUDs
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one simulation tick and persist anything it produced
    pub fn step(&mut self, input: &InputSnapshot) {
        tick(&mut self.state, input);
        self.persist_events();
    }

    /// Start a round from the menu (menu button / click)
    pub fn start(&mut self) -> bool {
        self.state.start()
    }

    /// Leave the game over screen (retry button / click)
    pub fn acknowledge(&mut self) -> bool {
        self.state.acknowledge()
    }

    fn persist_events(&mut self) {
        for event in &self.state.events {
            if let GameEvent::GameOver {
                score,
                new_record: true,
                ..
            } = *event
            {
                self.high_score.submit(score, &mut self.store);
            }
        }
    }
}
