//! Space Shooter entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use space_shooter::Session;
    use space_shooter::consts::*;
    use space_shooter::persistence::LocalStorageStore;
    use space_shooter::platform::Keyboard;
    use space_shooter::renderer::{Frame, RenderSink, RenderState};
    use space_shooter::settings::Settings;
    use space_shooter::sim::GamePhase;

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStorageStore>,
        settings: Settings,
        render_state: Option<RenderState>,
        keyboard: Keyboard,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Track phase for HUD/menu toggling
        last_phase: Option<GamePhase>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                session: Session::new(seed, LocalStorageStore, &settings),
                settings,
                render_state: None,
                keyboard: Keyboard::new(),
                accumulator: 0.0,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: None,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.keyboard.snapshot();
                self.session.step(&input);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            if substeps == MAX_SUBSTEPS {
                // Fell too far behind (tab was hidden); drop the backlog
                self.accumulator = 0.0;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                let frame = Frame::capture(self.session.state(), (time / 1000.0) as f32);
                render_state.present(&frame);
            }
        }

        /// Update HUD text and show the overlay for the current phase
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = self.session.state();

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-high") {
                el.set_text_content(Some(&state.high_score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&self.fps.to_string()));
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            if self.last_phase == Some(state.phase) {
                return;
            }
            self.last_phase = Some(state.phase);

            let show = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "menu" } else { "menu hidden" });
                }
            };
            show("main-menu", state.phase == GamePhase::Menu);
            show("game-over", state.phase == GamePhase::GameOver);

            if state.phase == GamePhase::GameOver {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&state.score.to_string()));
                }
                if let Some(el) = document.get_element_by_id("final-high") {
                    el.set_text_content(Some(&state.high_score.to_string()));
                }
            }
        }

        /// Canvas click / menu buttons: start from the menu, dismiss game over
        fn advance_menu(&mut self) {
            match self.session.phase() {
                GamePhase::Menu => {
                    self.session.start();
                }
                GamePhase::GameOver => {
                    self.session.acknowledge();
                }
                GamePhase::Playing => {}
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Space Shooter starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No <canvas id=\"canvas\"> found");
            return;
        };

        // Backing store matches the play area, scaled for the display
        let dpr = window.device_pixel_ratio();
        let width = (CANVAS_WIDTH as f64 * dpr) as u32;
        let height = (CANVAS_HEIGHT as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(seed, settings.clone())));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::LowPower,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height, settings).await {
                            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                            Err(e) => log::error!("Failed to create device: {}", e),
                        }
                    }
                    Err(e) => log::error!("No graphics adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_menu_buttons(game.clone());
        setup_focus_loss(game.clone());

        request_animation_frame(game);

        log::info!("Space Shooter running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().keyboard.press(&event.code()) {
                    // Keep arrows/space from scrolling the page
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keyboard.release(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Canvas click
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().advance_menu();
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["start-btn", "retry-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().advance_menu();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_focus_loss(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key-ups are lost while unfocused
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            game.borrow_mut().keyboard.clear();
            log::info!("Input cleared (window blur)");
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Native builds have no window: play a headless round with a simple autopilot
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    use space_shooter::Session;
    use space_shooter::consts::SIM_DT;
    use space_shooter::persistence::JsonFileStore;
    use space_shooter::renderer::{Frame, HeadlessSink, RenderSink};
    use space_shooter::settings::Settings;
    use space_shooter::sim::GamePhase;

    /// Give up after ten simulated minutes
    const MAX_TICKS: u64 = 60 * 60 * 10;

    env_logger::init();
    log::info!("Space Shooter (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let settings = Settings::load_from(Path::new("space_shooter_settings.json"));
    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64
    });
    let store = JsonFileStore::new("space_shooter_highscore.json");
    let mut session = Session::new(seed, store, &settings);
    let mut sink = HeadlessSink::default();

    session.start();
    let mut ticks = 0u64;
    while session.phase() == GamePhase::Playing && ticks < MAX_TICKS {
        let input = autopilot::steer(session.state());
        session.step(&input);
        sink.present(&Frame::capture(session.state(), ticks as f32 * SIM_DT));
        ticks += 1;
    }

    let state = session.state();
    log::info!(
        "Run finished after {} ticks ({:.1}s): score {}, best {}, level {:.2}",
        ticks,
        ticks as f32 * SIM_DT,
        state.score,
        state.high_score,
        state.level
    );
    log::info!(
        "Peaks: {} enemies, {} bullets, {} particles",
        sink.peak_enemies,
        sink.peak_bullets,
        sink.peak_particles
    );
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use space_shooter::sim::{Entity, GameState, InputSnapshot};

    /// Dodge shots heading for the ship, otherwise line up under the lowest enemy
    pub fn steer(state: &GameState) -> InputSnapshot {
        let ship = state.player.bounds();
        let mut input = InputSnapshot {
            shoot: true,
            ..Default::default()
        };

        let threat = state.enemy_bullets.iter().find(|b| {
            let r = b.bounds();
            r.bottom() > ship.top() - 80.0
                && r.top() < ship.bottom()
                && r.right() > ship.left() - 6.0
                && r.left() < ship.right() + 6.0
        });
        if let Some(bullet) = threat {
            if bullet.bounds().center().x < ship.center().x {
                input.right = true;
            } else {
                input.left = true;
            }
            return input;
        }

        let target = state
            .enemies
            .iter()
            .filter(|e| e.alive && e.pos.y > 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
        if let Some(enemy) = target {
            let dx = enemy.center().x - ship.center().x;
            input.left = dx < -4.0;
            input.right = dx > 4.0;
        }
        input
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}
