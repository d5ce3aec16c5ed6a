//! Pong entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Cap on catch-up ticks after a long frame
#[cfg(target_arch = "wasm32")]
const MAX_TICKS_PER_FRAME: u32 = 4;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use glam::DVec2;
    use pong::audio::AudioManager;
    use pong::consts::TICKS_PER_SECOND;
    use pong::renderer::{self, FrameRate, RenderState, TextItem, VertexSurface};
    use pong::sim::{Game, Key, TickInput, tick};
    use pong::{Assets, Settings};

    use super::MAX_TICKS_PER_FRAME;

    /// Everything the page holds between frames
    struct App {
        game: Game,
        input: TickInput,
        settings: Settings,
        assets: Assets,
        audio: AudioManager,
        render_state: Option<RenderState>,
        surface: VertexSurface,
        /// Spans overlaying the canvas, one per text item
        hud: Vec<Element>,
        hud_root: Option<Element>,
        device_pixel_ratio: f64,
        accumulator: f64,
        last_time: f64,
        // FPS/TPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        tick_times: [f64; 60],
        tick_index: usize,
        rate: FrameRate,
    }

    impl App {
        fn new(settings: Settings, width: i32, height: i32, dpr: f64) -> Self {
            let audio = AudioManager::with_settings(&settings);
            Self {
                game: Game::with_window(width, height),
                input: TickInput::default(),
                settings,
                assets: Assets::new(),
                audio,
                render_state: None,
                surface: VertexSurface::new(width, height),
                hud: Vec::new(),
                hud_root: None,
                device_pixel_ratio: dpr,
                accumulator: 0.0,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                tick_times: [0.0; 60],
                tick_index: 0,
                rate: FrameRate::default(),
            }
        }

        /// Run as many fixed ticks as the elapsed time allows
        fn update(&mut self, time: f64) {
            let tick_dt = 1.0 / TICKS_PER_SECOND;
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0).min(0.1)
            } else {
                tick_dt
            };
            self.last_time = time;
            self.accumulator += dt;

            let mut ticks = 0;
            while self.accumulator >= tick_dt && ticks < MAX_TICKS_PER_FRAME {
                let events = tick(&mut self.game, &self.input);
                self.audio.play_events(&events);
                self.input.clear_edges();
                self.accumulator -= tick_dt;
                ticks += 1;

                self.tick_times[self.tick_index] = time;
                self.tick_index = (self.tick_index + 1) % self.tick_times.len();
            }
            if ticks == MAX_TICKS_PER_FRAME {
                // Drop the backlog instead of spiralling
                self.accumulator = 0.0;
            }

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % self.frame_times.len();
            self.rate = FrameRate {
                fps: rate_over(&self.frame_times, self.frame_index, time),
                tps: rate_over(&self.tick_times, self.tick_index, time),
            };
        }

        /// Render the current frame
        fn render(&mut self) {
            self.surface
                .clear(self.game.window_width, self.game.window_height);
            renderer::draw(
                &self.game,
                &self.assets,
                &self.settings,
                self.rate,
                &mut self.surface,
            );

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.surface.vertices()) {
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

        /// Mirror this frame's text items into the DOM overlay
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let Some(root) = self.hud_root.clone() else {
                return;
            };

            let items = self.surface.texts().to_vec();
            while self.hud.len() < items.len() {
                let Ok(span) = document.create_element("span") else {
                    return;
                };
                let _ = root.append_child(&span);
                self.hud.push(span);
            }

            for (i, el) in self.hud.iter().enumerate() {
                match items.get(i) {
                    Some(item) => {
                        let _ = el.set_attribute("style", &hud_style(item, self.device_pixel_ratio));
                        if el.text_content().as_deref() != Some(item.text.as_str()) {
                            el.set_text_content(Some(&item.text));
                        }
                    }
                    None => {
                        let _ = el.set_attribute("style", "display:none");
                    }
                }
            }
        }

        fn resize(&mut self, width: u32, height: u32) {
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
            self.game.layout(width as i32, height as i32);
        }

        fn key_down(&mut self, key: Key) {
            if !self.input.held.contains(&key) {
                self.input.held.push(key);
                self.input.just_pressed.push(key);
            }
        }

        fn key_up(&mut self, key: Key) {
            self.input.held.retain(|&k| k != key);
        }

        /// Preference hotkeys; persisted straight away
        fn toggle_setting(&mut self, key: &str) -> bool {
            match key {
                "m" | "M" => self.settings.muted = !self.settings.muted,
                "f" | "F" => self.settings.show_fps = !self.settings.show_fps,
                "t" | "T" => self.settings.trails = !self.settings.trails,
                "h" | "H" => self.settings.high_contrast = !self.settings.high_contrast,
                _ => return false,
            }
            self.audio.apply_settings(&self.settings);
            self.settings.save();
            true
        }
    }

    /// Events per second over a ring of timestamps (ms)
    fn rate_over(times: &[f64], next: usize, now: f64) -> f64 {
        let oldest = times[next % times.len()];
        if oldest <= 0.0 || now <= oldest {
            return 0.0;
        }
        times.len() as f64 * 1000.0 / (now - oldest)
    }

    fn hud_style(item: &TextItem, dpr: f64) -> String {
        let [r, g, b, a] = item.color;
        format!(
            "position:absolute;left:{:.1}px;top:{:.1}px;font-size:{:.1}px;line-height:1;\
             white-space:pre;color:rgba({},{},{},{})",
            f64::from(item.position.x) / dpr,
            (f64::from(item.position.y) - item.size) / dpr,
            item.size / dpr,
            (r * 255.0) as u8,
            (g * 255.0) as u8,
            (b * 255.0) as u8,
            a
        )
    }

    /// Canvas backing-store size for its CSS size
    fn fit_canvas(canvas: &HtmlCanvasElement, dpr: f64) -> (u32, u32) {
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pong starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let (width, height) = fit_canvas(&canvas, dpr);

        let settings = Settings::load();
        let app = Rc::new(RefCell::new(App::new(
            settings,
            width as i32,
            height as i32,
            dpr,
        )));
        app.borrow_mut().hud_root = document.get_element_by_id("hud");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
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

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        app.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, app.clone());
        setup_window_handlers(&canvas, app.clone());

        request_animation_frame(app);

        log::info!("Pong running!");
    }

    /// Active touches in canvas backing-store pixels
    fn touch_points(event: &TouchEvent, canvas: &HtmlCanvasElement, dpr: f64) -> Vec<DVec2> {
        let rect = canvas.get_bounding_client_rect();
        let touches = event.touches();
        (0..touches.length())
            .filter_map(|i| touches.get(i))
            .map(|t| {
                DVec2::new(
                    (t.client_x() as f64 - rect.left()) * dpr,
                    (t.client_y() as f64 - rect.top()) * dpr,
                )
            })
            .collect()
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                a.audio.resume();
                if event.repeat() {
                    return;
                }
                if let Some(key) = Key::from_dom_key(&event.key()) {
                    event.prevent_default();
                    a.key_down(key);
                } else if a.toggle_setting(&event.key()) {
                    log::info!("Settings changed: {:?}", a.settings);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom_key(&event.key()) {
                    app.borrow_mut().key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click starts a game
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() == 0 {
                    let mut a = app.borrow_mut();
                    a.audio.resume();
                    a.input.mouse_just_pressed = true;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start, move and end all refresh the active touch list
        for (name, starts) in [
            ("touchstart", true),
            ("touchmove", false),
            ("touchend", false),
            ("touchcancel", false),
        ] {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                let dpr = a.device_pixel_ratio;
                a.input.touches = touch_points(&event, &canvas_clone, dpr);
                if starts {
                    a.audio.resume();
                    a.input.touch_just_started = true;
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_window_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Resize: new backing store, new layout
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let dpr = window.device_pixel_ratio();
                let (width, height) = fit_canvas(&canvas_clone, dpr);
                let mut a = app.borrow_mut();
                a.device_pixel_ratio = dpr;
                a.resize(width, height);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: release keys, optionally mute
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut a = app.borrow_mut();
                a.input.held.clear();
                a.input.touches.clear();
                if a.settings.mute_on_blur {
                    a.audio.set_muted(true);
                    log::debug!("Muted (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut a = app.borrow_mut();
                let muted = a.settings.muted;
                a.audio.set_muted(muted);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.update(time);
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Longest headless rally before giving up
#[cfg(not(target_arch = "wasm32"))]
const RALLY_TICK_LIMIT: u32 = 60 * 60 * 5;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pong::audio::AudioManager;
    use pong::renderer::{self, FrameRate, VertexSurface};
    use pong::sim::{Game, GameMode, TickInput, tick};
    use pong::{Assets, Settings};

    env_logger::init();
    log::info!("Pong (native) starting...");
    log::info!("No native window - run with `trunk serve` to play in a browser");

    let settings = Settings::load();
    let mut audio = AudioManager::with_settings(&settings);
    audio.start_music();
    let assets = Assets::new();
    let mut game = Game::with_window(1600, 900);

    // Serve, then let both paddles chase the ball until someone scores
    let mut input = TickInput {
        mouse_just_pressed: true,
        ..Default::default()
    };
    let mut ticks = 0;
    loop {
        let events = tick(&mut game, &input);
        audio.play_events(&events);
        ticks += 1;
        if game.mode != GameMode::Play || ticks >= RALLY_TICK_LIMIT {
            break;
        }
        input = autopilot(&game);
    }

    let mut surface = VertexSurface::new(game.window_width, game.window_height);
    renderer::draw(&game, &assets, &settings, FrameRate::default(), &mut surface);

    log::info!(
        "Rally over after {} ticks: score {} ({} vertices, {} text items in the last frame)",
        ticks,
        game.score,
        surface.vertices().len(),
        surface.texts().len()
    );
    println!("Score after {} ticks: {}", ticks, game.score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Hold the keys that move each paddle toward the ball's height
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(game: &pong::sim::Game) -> pong::sim::TickInput {
    use pong::sim::{Key, Side, TickInput};

    let mut input = TickInput::default();
    for (side, up, down) in [
        (Side::Left, Key::W, Key::S),
        (Side::Right, Key::Up, Key::Down),
    ] {
        let center = game.paddle(side).center_y();
        let target = game.ball.coord.y;
        if target < center - f64::from(game.paddle_speed) {
            input.held.push(up);
        } else if target > center + f64::from(game.paddle_speed) {
            input.held.push(down);
        }
    }
    input
}
