//! Astro Strike entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, TouchEvent};

    use astro_strike::assets::AssetBundle;
    use astro_strike::consts::*;
    use astro_strike::renderer::{FrameOptions, RenderState, Vertex, build_frame, instructions_frame, scene};
    use astro_strike::sim::{GameState, InputState, advance};
    use astro_strike::{HighScore, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        assets: AssetBundle,
        settings: Settings,
        high_score: HighScore,
        input: InputState,
        /// Wall-clock time of the last simulated tick
        last_tick: f64,
        last_score: u32,
        show_instructions: bool,
        /// Touch-primary session; enables auto-fire
        is_touch: bool,
        /// Active touch point for the on-screen indicator ring
        touch_point: Option<Vec2>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, is_touch: bool) -> Self {
            Self {
                state: GameState::new(seed),
                render_state: None,
                assets: AssetBundle::empty(),
                settings: Settings::load(),
                high_score: HighScore::load(),
                input: InputState::default(),
                last_tick: 0.0,
                last_score: 0,
                show_instructions: true,
                is_touch,
                touch_point: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// One animation frame. Simulation runs at most once per tick
        /// interval; early callbacks are skipped outright so game speed is
        /// wall-clock paced, never queued up.
        fn frame(&mut self, time: f64) {
            if time - self.last_tick < TICK_INTERVAL_MS {
                return;
            }
            self.last_tick = time;
            self.track_fps(time);

            if self.show_instructions {
                let vertices = instructions_frame(self.high_score.best, time);
                self.present(&vertices);
                return;
            }

            let mut input = self.input.clone();
            if self.is_touch && self.settings.auto_fire {
                input.fire = true;
            }
            advance(&mut self.state, &input);
            self.publish_score();

            let opts = FrameOptions {
                ship_skin: self.settings.ship_skin,
                enhance_text: self.settings.enhance_text,
                show_fps: self.settings.show_fps,
                fps: self.fps,
                time_ms: time,
            };
            let mut vertices = build_frame(&self.state, &self.assets, &opts);
            if let Some(pos) = self.touch_point {
                scene::touch_indicator(&mut vertices, pos);
            }
            self.present(&vertices);
        }

        fn present(&mut self, vertices: &[Vertex]) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Push score changes out: high-score persistence plus the
        /// host-supplied `onScoreUpdate` hook, if the page defined one
        fn publish_score(&mut self) {
            let score = self.state.player.score;
            if score == self.last_score {
                return;
            }
            self.last_score = score;
            self.high_score.submit(score);

            if let Some(window) = web_sys::window() {
                if let Ok(hook) = js_sys::Reflect::get(&window, &"onScoreUpdate".into()) {
                    if let Some(hook) = hook.dyn_ref::<js_sys::Function>() {
                        let _ = hook.call1(&JsValue::NULL, &JsValue::from_f64(score as f64));
                    }
                }
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = time - oldest;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Full reinitialization; no score/level carry-over
        fn restart(&mut self, seed: u64) {
            self.state = GameState::new(seed);
            self.input = InputState::default();
            self.touch_point = None;
            self.last_score = 0;
            log::info!("Game restarted with seed: {seed}");
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Astro Strike starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Fixed logical playfield; the page scales the canvas responsively
        // but internal coordinates never change
        canvas.set_width(GAME_WIDTH as u32);
        canvas.set_height(GAME_HEIGHT as u32);

        let seed = js_sys::Date::now() as u64;
        let is_touch = window.navigator().max_touch_points() > 0;
        let game = Rc::new(RefCell::new(Game::new(seed, is_touch)));

        log::info!("Game initialized with seed: {seed} (touch: {is_touch})");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            RenderState::new(surface, &adapter, GAME_WIDTH as u32, GAME_HEIGHT as u32).await;
        game.borrow_mut().render_state = Some(render_state);

        // Asset loading races the loop: the game starts on procedural
        // fallbacks immediately and sprites swap in whenever the fetches
        // settle (or never, if they fail)
        {
            let game = game.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let bundle = astro_strike::assets::load_bundle().await;
                game.borrow_mut().assets = bundle;
            });
        }

        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Astro Strike running!");
    }

    /// Convert a touch to playfield coordinates
    fn touch_position(canvas: &HtmlCanvasElement, touch: &web_sys::Touch) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let scale_x = GAME_WIDTH / rect.width() as f32;
        let scale_y = GAME_HEIGHT / rect.height() as f32;
        Vec2::new(
            (touch.client_x() as f32 - rect.left() as f32) * scale_x,
            (touch.client_y() as f32 - rect.top() as f32) * scale_y,
        )
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard down: movement/fire edges, pause toggle, enter
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = true,
                    "ArrowRight" | "d" | "D" => g.input.right = true,
                    "ArrowUp" | "w" | "W" => g.input.up = true,
                    "ArrowDown" | "s" | "S" => g.input.down = true,
                    " " => g.input.fire = true,
                    "p" | "P" | "Escape" => {
                        // Pause leaves the stored input flags untouched
                        if !g.show_instructions && !g.state.game_over {
                            g.state.paused = !g.state.paused;
                        }
                    }
                    "Enter" => {
                        if g.show_instructions {
                            g.show_instructions = false;
                        } else if g.state.game_over {
                            let seed = js_sys::Date::now() as u64;
                            g.restart(seed);
                        }
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up: clear edges
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = false,
                    "ArrowRight" | "d" | "D" => g.input.right = false,
                    "ArrowUp" | "w" | "W" => g.input.up = false,
                    "ArrowDown" | "s" | "S" => g.input.down = false,
                    " " => g.input.fire = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start: dismiss/restart/unpause, otherwise begin a drag
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();

                if g.show_instructions {
                    g.show_instructions = false;
                    return;
                }
                if g.state.game_over {
                    let seed = js_sys::Date::now() as u64;
                    g.restart(seed);
                    return;
                }
                if g.state.paused {
                    g.state.paused = false;
                    return;
                }

                if let Some(touch) = event.touches().get(0) {
                    let pos = touch_position(&canvas_clone, &touch);
                    g.input.drag_target = Some(pos);
                    g.touch_point = Some(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move: update the drag target
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if g.show_instructions || g.state.paused || g.state.game_over {
                    return;
                }

                if let Some(touch) = event.touches().get(0) {
                    let pos = touch_position(&canvas_clone, &touch);
                    g.input.drag_target = Some(pos);
                    g.touch_point = Some(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end: release the drag and any directional flags
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.input.drag_target = None;
                g.touch_point = None;
                g.input.left = false;
                g.input.right = false;
                g.input.up = false;
                g.input.down = false;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Tab switch / minimize
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if !g.show_instructions && !g.state.game_over && !g.state.paused {
                        g.state.paused = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if !g.show_instructions && !g.state.game_over && !g.state.paused {
                    g.state.paused = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Astro Strike (native) starting...");
    log::info!("Native mode is a headless demo - run with `trunk serve` for the web version");

    use astro_strike::consts::TICK_RATE;
    use astro_strike::sim::{GameState, InputState, advance};

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    let mut state = GameState::new(seed);

    // Scripted session: weave left and right with the trigger held
    let ticks_per_second = TICK_RATE as u64;
    for tick in 0..(60 * ticks_per_second) {
        let input = InputState {
            fire: true,
            left: (tick / 90).is_multiple_of(2),
            right: !(tick / 90).is_multiple_of(2),
            ..Default::default()
        };
        advance(&mut state, &input);

        if tick % (5 * ticks_per_second) == 0 {
            log::info!(
                "t={}s score={} level={} wave={} lives={}",
                tick / ticks_per_second,
                state.player.score,
                state.level,
                state.wave,
                state.player.lives
            );
        }
        if state.game_over {
            break;
        }
    }

    println!(
        "Final score: {} (level {}, wave {}, seed {})",
        state.player.score, state.level, state.wave, seed
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
