//! Per-frame simulation tick
//!
//! Core game loop that advances the session deterministically. While playing,
//! one tick runs in this fixed order:
//! input -> player shot -> spawn policy -> entity motion -> enemy fire
//! -> collisions -> culling.

use glam::Vec2;
use rand::Rng;

use super::entities::{Entity, Enemy, Tint};
use super::geometry::rand_int;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Held state of every recognized action for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub shoot: bool,
    /// Start from the menu / dismiss game over
    pub confirm: bool,
}

impl InputSnapshot {
    /// Movement direction, each axis in {-1, 0, 1}
    pub fn axis(&self) -> (f32, f32) {
        let dx = (self.right as i8 - self.left as i8) as f32;
        let dy = (self.down as i8 - self.up as i8) as f32;
        (dx, dy)
    }
}

/// Advance the session by one tick
pub fn tick(state: &mut GameState, input: &InputSnapshot) {
    state.events.clear();

    let confirm_pressed = input.confirm && !state.confirm_held;
    state.confirm_held = input.confirm;

    match state.phase {
        GamePhase::Menu => {
            if confirm_pressed {
                state.start();
            }
            return;
        }
        GamePhase::GameOver => {
            if confirm_pressed {
                state.acknowledge();
            }
            return;
        }
        GamePhase::Playing => {}
    }

    // Scheduled game over fires before anything else moves
    if let Some(remaining) = state.death_timer {
        if remaining <= 1 {
            state.game_over();
            return;
        }
        state.death_timer = Some(remaining - 1);
    }

    state.time_ticks += 1;

    if state.player.alive {
        let (dx, dy) = input.axis();
        state
            .player
            .move_by(dx, dy, Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT));

        if input.shoot && state.player.can_shoot() {
            let bullet = state.player.shoot();
            state.player_bullets.push(bullet);
        }
    }

    run_spawn_policy(state);
    advance_entities(state);
    enemy_fire(state);
    resolve_collisions(state);
    cull(state);
}

/// Count down to the next wave and spawn it when due
pub fn run_spawn_policy(state: &mut GameState) {
    state.spawn_timer -= 1.0;
    if state.spawn_timer <= 0.0 {
        spawn_wave(state);
    }
}

/// Enemies per wave at a given level
pub fn wave_size(level: f32) -> usize {
    (1 + (level / 2.0).floor() as i32).clamp(1, MAX_WAVE_SIZE) as usize
}

/// Ticks until the following wave at a given level
pub fn spawn_interval(level: f32) -> f32 {
    (BASE_SPAWN_INTERVAL - level * 2.0).max(MIN_SPAWN_INTERVAL)
}

/// Spawn one wave above the visible area, reset the timer and raise the level
pub fn spawn_wave(state: &mut GameState) {
    let count = wave_size(state.level);
    let x_max = CANVAS_WIDTH as i32 - SPAWN_MARGIN_RIGHT;
    let (above_lo, above_hi) = SPAWN_HEIGHT_ABOVE;

    for _ in 0..count {
        let x = rand_int(&mut state.rng, SPAWN_MARGIN_LEFT, x_max) as f32;
        let y = -rand_int(&mut state.rng, above_lo, above_hi) as f32;
        let speed = 1.5 + state.level * 0.15 + state.rng.random::<f32>();
        let enemy = Enemy::new(&mut state.rng, Vec2::new(x, y), speed);
        state.enemies.push(enemy);
    }

    state.spawn_timer = spawn_interval(state.level);
    state.level += LEVEL_STEP;
    state.events.push(GameEvent::WaveSpawned { count });
    log::debug!(
        "Wave of {} at tick {} (level {:.2}, next in {:.1})",
        count,
        state.time_ticks,
        state.level,
        state.spawn_timer
    );
}

fn advance_entities(state: &mut GameState) {
    state.player.tick();
    for bullet in &mut state.player_bullets {
        bullet.tick();
    }
    for bullet in &mut state.enemy_bullets {
        bullet.tick();
    }
    for enemy in &mut state.enemies {
        enemy.tick();
    }
    for particle in &mut state.particles {
        particle.tick();
    }
}

/// Every ready, live enemy fires with a fixed chance
fn enemy_fire(state: &mut GameState) {
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        if enemy.can_shoot() && state.rng.random::<f32>() < ENEMY_FIRE_CHANCE {
            let bullet = enemy.shoot(&mut state.rng);
            state.enemy_bullets.push(bullet);
        }
    }
}

/// Apply all hits for this tick. Dead entities are skipped, so nothing can be
/// destroyed (or scored) twice.
pub fn resolve_collisions(state: &mut GameState) {
    // Player shots vs enemies (shots are not consumed)
    let mut downed = Vec::new();
    for bullet in &state.player_bullets {
        let shot = bullet.bounds();
        for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
            if shot.overlaps(&enemy.bounds()) {
                enemy.alive = false;
                state.score += ENEMY_KILL_SCORE;
                downed.push(enemy.center());
            }
        }
    }
    for at in downed {
        state.spawn_explosion(at, Tint::Enemy);
        state.events.push(GameEvent::EnemyDestroyed { at });
    }

    if !state.player.alive {
        return;
    }
    let hull = state.player.bounds();
    let shot_down = state
        .enemy_bullets
        .iter()
        .any(|bullet| bullet.bounds().overlaps(&hull));
    let rammed = state
        .enemies
        .iter()
        .any(|enemy| enemy.alive && enemy.bounds().overlaps(&hull));
    if shot_down || rammed {
        state.kill_player();
    }
}

/// Drop dead enemies, stray bullets and spent particles. A dead player stays.
pub fn cull(state: &mut GameState) {
    state
        .player_bullets
        .retain(|b| !b.is_out_of_bounds(CANVAS_HEIGHT));
    state
        .enemy_bullets
        .retain(|b| !b.is_out_of_bounds(CANVAS_HEIGHT));
    state
        .enemies
        .retain(|e| e.alive && e.pos.y < CANVAS_HEIGHT + ENEMY_CULL_MARGIN);
    state.particles.retain(|p| !p.is_expired());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Bullet, Owner};

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, 0);
        state.start();
        state
    }

    /// Enemy parked at `pos` that will not fire or move this tick
    fn idle_enemy(state: &mut GameState, pos: Vec2) -> Enemy {
        let mut enemy = Enemy::new(&mut state.rng, pos, 0.0);
        enemy.cooldown = 1000;
        enemy
    }

    fn confirm() -> InputSnapshot {
        InputSnapshot {
            confirm: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_menu_confirm_starts_round() {
        let mut state = GameState::new(12345, 0);
        tick(&mut state, &InputSnapshot::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.time_ticks, 0);

        tick(&mut state, &confirm());
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.events.contains(&GameEvent::RoundStarted));
    }

    #[test]
    fn test_confirm_is_edge_triggered() {
        let mut state = GameState::new(12345, 0);
        state.start();
        state.game_over();
        assert_eq!(state.phase, GamePhase::GameOver);

        tick(&mut state, &confirm());
        assert_eq!(state.phase, GamePhase::Menu);
        // Still held: must not start a new round
        tick(&mut state, &confirm());
        assert_eq!(state.phase, GamePhase::Menu);
        tick(&mut state, &InputSnapshot::default());
        tick(&mut state, &confirm());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_first_tick_spawns_wave() {
        let mut state = playing_state(1);
        tick(&mut state, &InputSnapshot::default());
        assert_eq!(state.enemies.len(), 1);
        assert!(state.events.contains(&GameEvent::WaveSpawned { count: 1 }));
        for enemy in &state.enemies {
            assert!(enemy.pos.x >= 20.0 && enemy.pos.x <= CANVAS_WIDTH - 54.0);
            assert!(enemy.speed >= 1.65 && enemy.speed < 2.65);
        }
    }

    #[test]
    fn test_spawn_wave_at_level_one() {
        let mut state = playing_state(2);
        state.level = 1.0;
        state.spawn_timer = 1.0;
        run_spawn_policy(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.spawn_timer, 58.0);
        assert!((state.level - 1.03).abs() < 1e-6);
        // Spawned above the visible area
        assert!(state.enemies[0].pos.y <= -30.0 && state.enemies[0].pos.y >= -80.0);
    }

    #[test]
    fn test_spawn_timer_counts_down_between_waves() {
        let mut state = playing_state(2);
        state.spawn_timer = 5.0;
        run_spawn_policy(&mut state);
        assert_eq!(state.spawn_timer, 4.0);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_wave_size_and_interval_bounds() {
        assert_eq!(wave_size(1.0), 1);
        assert_eq!(wave_size(2.0), 2);
        assert_eq!(wave_size(5.9), 3);
        assert_eq!(wave_size(50.0), 6);
        assert_eq!(wave_size(-10.0), 1);
        assert_eq!(spawn_interval(1.0), 58.0);
        assert_eq!(spawn_interval(30.0), 20.0);
    }

    #[test]
    fn test_player_moves_and_fires() {
        let mut state = playing_state(3);
        let start = state.player.pos;
        let input = InputSnapshot {
            left: true,
            up: true,
            shoot: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.pos, start + Vec2::new(-PLAYER_SPEED, -PLAYER_SPEED));
        assert_eq!(state.player_bullets.len(), 1);
        // Shot on this tick, then one tick of reload
        assert_eq!(state.player.cooldown, PLAYER_RELOAD_TICKS - 1);

        tick(&mut state, &input);
        assert_eq!(state.player_bullets.len(), 1);
    }

    #[test]
    fn test_one_kill_scores_hundred() {
        let mut state = playing_state(4);
        let enemy = idle_enemy(&mut state, Vec2::new(100.0, 100.0));
        state.enemies.push(enemy);
        state
            .player_bullets
            .push(Bullet::new(Vec2::new(110.0, 110.0), -8.0, Owner::Player));

        resolve_collisions(&mut state);
        assert_eq!(state.score, 100);
        assert!(!state.enemies[0].alive);
        assert_eq!(state.particles.len(), EXPLOSION_PARTICLES);
        // The shot keeps flying
        assert_eq!(state.player_bullets.len(), 1);

        cull(&mut state);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_many_kills_in_one_tick() {
        let mut state = playing_state(5);
        for i in 0..4 {
            let x = 40.0 + i as f32 * 100.0;
            let enemy = idle_enemy(&mut state, Vec2::new(x, 200.0));
            state.enemies.push(enemy);
            state
                .player_bullets
                .push(Bullet::new(Vec2::new(x + 5.0, 205.0), -8.0, Owner::Player));
        }
        resolve_collisions(&mut state);
        assert_eq!(state.score, 400);
        assert!(state.enemies.iter().all(|e| !e.alive));
    }

    #[test]
    fn test_dead_enemy_not_scored_twice() {
        let mut state = playing_state(6);
        let enemy = idle_enemy(&mut state, Vec2::new(100.0, 100.0));
        state.enemies.push(enemy);
        // Two shots overlapping the same enemy
        state
            .player_bullets
            .push(Bullet::new(Vec2::new(105.0, 105.0), -8.0, Owner::Player));
        state
            .player_bullets
            .push(Bullet::new(Vec2::new(110.0, 105.0), -8.0, Owner::Player));

        resolve_collisions(&mut state);
        assert_eq!(state.score, 100);
        assert_eq!(state.particles.len(), EXPLOSION_PARTICLES);
        assert_eq!(
            state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_enemy_shot_kills_player_with_delay() {
        let mut state = playing_state(7).with_game_over_delay(5);
        let target = state.player.pos + Vec2::new(10.0, 5.0);
        state
            .enemy_bullets
            .push(Bullet::new(target, 0.0, Owner::Enemy));

        resolve_collisions(&mut state);
        assert!(!state.player.alive);
        assert_eq!(state.death_timer, Some(5));
        assert_eq!(state.phase, GamePhase::Playing);

        // Dead player is kept around for the explosion
        cull(&mut state);
        assert!(!state.player.alive);

        let idle = InputSnapshot::default();
        for _ in 0..4 {
            tick(&mut state, &idle);
            assert_eq!(state.phase, GamePhase::Playing);
        }
        tick(&mut state, &idle);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_second_fatal_hit_does_not_reschedule() {
        let mut state = playing_state(8).with_game_over_delay(10);
        let hull = state.player.pos;
        state
            .enemy_bullets
            .push(Bullet::new(hull + Vec2::new(2.0, 2.0), 0.0, Owner::Enemy));
        resolve_collisions(&mut state);
        assert_eq!(state.death_timer, Some(10));

        state.death_timer = Some(3);
        let rammer = idle_enemy(&mut state, hull);
        state.enemies.push(rammer);
        resolve_collisions(&mut state);
        assert_eq!(state.death_timer, Some(3));
        assert_eq!(
            state.particles.len(),
            EXPLOSION_PARTICLES,
            "no second player explosion"
        );
    }

    #[test]
    fn test_enemy_ramming_kills_player() {
        let mut state = playing_state(9);
        let hull = state.player.pos;
        let rammer = idle_enemy(&mut state, hull + Vec2::new(5.0, -10.0));
        state.enemies.push(rammer);
        resolve_collisions(&mut state);
        assert!(!state.player.alive);
        assert!(state.death_timer.is_some());
        assert!(state.events.contains(&GameEvent::PlayerDestroyed));
    }

    #[test]
    fn test_dead_player_cannot_move_or_fire() {
        let mut state = playing_state(10);
        state.player.alive = false;
        state.death_timer = Some(100);
        let pos = state.player.pos;
        let input = InputSnapshot {
            right: true,
            shoot: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.pos, pos);
        assert!(state.player_bullets.is_empty());
    }

    #[test]
    fn test_cull_removes_strays() {
        let mut state = playing_state(11);
        state
            .player_bullets
            .push(Bullet::new(Vec2::new(0.0, -20.0), -8.0, Owner::Player));
        state
            .enemy_bullets
            .push(Bullet::new(Vec2::new(0.0, CANVAS_HEIGHT + 20.0), 5.0, Owner::Enemy));
        let low = idle_enemy(&mut state, Vec2::new(0.0, CANVAS_HEIGHT + ENEMY_CULL_MARGIN));
        let visible = idle_enemy(&mut state, Vec2::new(0.0, 300.0));
        state.enemies.push(low);
        state.enemies.push(visible);

        cull(&mut state);
        assert!(state.player_bullets.is_empty());
        assert!(state.enemy_bullets.is_empty());
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].pos.y, 300.0);
    }

    #[test]
    fn test_enemies_eventually_fire() {
        let mut state = playing_state(12);
        let mut enemy = idle_enemy(&mut state, Vec2::new(200.0, 50.0));
        enemy.cooldown = 0;
        state.enemies.push(enemy);
        for _ in 0..200 {
            enemy_fire(&mut state);
            if !state.enemy_bullets.is_empty() {
                break;
            }
        }
        assert_eq!(state.enemy_bullets.len(), 1);
        assert!(state.enemies[0].cooldown >= 80);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, 0);
        let mut state2 = GameState::new(99999, 0);
        state1.start();
        state2.start();

        let inputs = [
            InputSnapshot {
                left: true,
                shoot: true,
                ..Default::default()
            },
            InputSnapshot {
                right: true,
                up: true,
                ..Default::default()
            },
            InputSnapshot::default(),
        ];

        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.enemy_bullets.len(), state2.enemy_bullets.len());
        assert_eq!(state1.player.pos, state2.player.pos);
        for (a, b) in state1.enemies.iter().zip(&state2.enemies) {
            assert_eq!(a.pos, b.pos);
        }
    }

    #[test]
    fn test_level_rises_every_wave() {
        let mut state = playing_state(13);
        let before = state.level;
        spawn_wave(&mut state);
        spawn_wave(&mut state);
        assert!((state.level - before - 2.0 * LEVEL_STEP).abs() < 1e-5);
    }
}
