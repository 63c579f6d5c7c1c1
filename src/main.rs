//! Flip Runner entry point
//!
//! In the browser this hosts the runner on a canvas and bridges rewards to the
//! page's currency. Natively it runs a headless autopilot demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use flip_runner::RunnerConfig;
    use flip_runner::error::{RenderError, RewardError};
    use flip_runner::renderer::{RenderState, build_scene};
    use flip_runner::sim::{
        RewardSink, RunnerEvent, RunnerSession, SessionCommand, SessionHandle, Viewport,
    };

    /// Simulation steps are tuned for 60 frames per second
    const FRAME_SECONDS: f64 = 1.0 / 60.0;
    const MAX_SUBSTEPS: u32 = 4;
    /// How long a feedback message stays up
    const FEEDBACK_FRAMES: u32 = 60;

    thread_local! {
        static HOST: RefCell<Option<Host>> = const { RefCell::new(None) };
    }

    /// What the exported `runner_*` functions reach. The session is kept
    /// apart from the game so page callbacks never need the game borrow.
    #[derive(Clone)]
    struct Host {
        session: Rc<SessionHandle>,
        game: Rc<RefCell<Game>>,
    }

    /// The page owns the currency: `window.addMoney(amount)` credits it and
    /// returns what was actually added after its multipliers
    struct PageCurrency;

    impl RewardSink for PageCurrency {
        fn award(&mut self, amount: u32) -> Result<u32, RewardError> {
            let window = web_sys::window().ok_or(RewardError::Unavailable)?;
            let add_money = js_sys::Reflect::get(&window, &JsValue::from_str("addMoney"))
                .ok()
                .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
                .ok_or(RewardError::Unavailable)?;
            let credited = add_money
                .call1(&JsValue::NULL, &JsValue::from(amount))
                .map_err(|e| RewardError::Rejected(format!("{:?}", e)))?;
            credited
                .as_f64()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v as u32)
                .ok_or_else(|| RewardError::Rejected(format!("non-numeric credit {:?}", credited)))
        }
    }

    /// Runner instance holding all host-side state
    struct Game {
        session: Rc<SessionHandle>,
        render_state: Option<RenderState>,
        currency: PageCurrency,
        canvas: HtmlCanvasElement,
        accumulator: f64,
        last_time: f64,
        /// An animation-frame callback is scheduled
        loop_running: bool,
        feedback_frames: u32,
    }

    impl Game {
        fn new(session: Rc<SessionHandle>, canvas: HtmlCanvasElement) -> Self {
            Self {
                session,
                render_state: None,
                currency: PageCurrency,
                canvas,
                accumulator: 0.0,
                last_time: 0.0,
                loop_running: false,
                feedback_frames: 0,
            }
        }

        /// Run simulation ticks for the time since the last frame
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0).min(0.1)
            } else {
                FRAME_SECONDS
            };
            self.last_time = time;
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= FRAME_SECONDS && substeps < MAX_SUBSTEPS {
                // addMoney may call back into runner_*; those land in the
                // session's deferred queue
                self.session.frame(Some(&mut self.currency));
                self.accumulator -= FRAME_SECONDS;
                substeps += 1;
            }

            for event in self.session.take_events() {
                self.show_feedback(&event);
            }
            if self.feedback_frames > 0 {
                self.feedback_frames -= 1;
                if self.feedback_frames == 0 {
                    set_feedback(None, "hidden");
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(vertices) = self.session.with(|s| build_scene(s.state())) else {
                return;
            };
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn show_feedback(&mut self, event: &RunnerEvent) {
            let (text, class) = match event {
                RunnerEvent::Transition { banner, .. } => (banner.clone(), "banner"),
                RunnerEvent::Crashed { .. } => ("Miss!".to_string(), "miss"),
                RunnerEvent::Rewarded { granted, .. } => (format!("+${}", granted), "reward"),
                // Already logged by the tick
                RunnerEvent::RewardSkipped { .. } => return,
            };
            set_feedback(Some(&text), class);
            self.feedback_frames = FEEDBACK_FRAMES;
        }

        /// Fit the canvas to its container and tell the simulation
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (css_w, css_h) = match window
                .document()
                .and_then(|d| d.get_element_by_id("runner-container"))
            {
                Some(container) => (container.client_width(), container.client_height()),
                None => (self.canvas.client_width(), self.canvas.client_height()),
            };
            let dpr = window.device_pixel_ratio();
            let width = (css_w as f64 * dpr) as u32;
            let height = (css_h as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);

            let viewport = Viewport::new(css_w as f32, css_h as f32);
            self.session.command(SessionCommand::Resize {
                width: viewport.width,
                height: viewport.height,
            });
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height, viewport);
            }
            log::debug!(
                "Resized to {}x{} (ground {:?})",
                css_w,
                css_h,
                self.session.with(|s| s.state().ground_level)
            );
        }
    }

    fn set_feedback(text: Option<&str>, class: &str) {
        let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("runner-feedback"))
        else {
            return;
        };
        if let Some(text) = text {
            el.set_text_content(Some(text));
        }
        let _ = el.set_attribute("class", class);
    }

    fn host() -> Option<Host> {
        let host = HOST.with(|slot| slot.borrow().clone());
        if host.is_none() {
            log::warn!("Runner not initialized yet");
        }
        host
    }

    /// Safe to call from inside a frame, e.g. from the page's addMoney
    fn send(command: SessionCommand) {
        let Some(host) = host() else {
            return;
        };
        host.session.command(command);
        if matches!(command, SessionCommand::Start | SessionCommand::Resume) {
            ensure_loop(&host);
        }
    }

    pub fn start() {
        send(SessionCommand::Start);
    }

    pub fn pause() {
        send(SessionCommand::Pause);
    }

    pub fn resume() {
        send(SessionCommand::Resume);
    }

    pub fn set_skin(index: i32) {
        send(SessionCommand::SetSkin(index));
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Flip Runner starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("runner-canvas")
            .ok_or("no runner-canvas element")?
            .dyn_into()?;

        let config = RunnerConfig::load();
        let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let viewport = Viewport::new(canvas.client_width() as f32, canvas.client_height() as f32);
        let session = Rc::new(SessionHandle::new(RunnerSession::new(seed, config, viewport)));
        let game = Rc::new(RefCell::new(Game::new(session.clone(), canvas.clone())));
        log::info!("Runner initialized with seed: {}", seed);

        match init_renderer(&canvas, viewport).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            // Keep simulating without a picture rather than failing the page
            Err(e) => log::error!("Renderer unavailable: {}", e),
        }
        game.borrow_mut().resize();

        setup_input_handlers(&canvas, session.clone());
        setup_resize(game.clone());
        setup_auto_pause(session.clone());

        HOST.with(|slot| *slot.borrow_mut() = Some(Host { session, game }));

        log::info!("Flip Runner ready, waiting for runner_start()");
        Ok(())
    }

    async fn init_renderer(
        canvas: &HtmlCanvasElement,
        viewport: Viewport,
    ) -> Result<RenderState, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, canvas.width(), canvas.height(), viewport).await
    }

    fn is_running(session: &SessionHandle) -> bool {
        session.with(|s| s.is_running()).unwrap_or(false)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, session: Rc<SessionHandle>) {
        // Keyboard
        {
            let session = session.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if !is_running(&session) {
                    return;
                }
                if event.code() == "Space" || event.key() == " " || event.code() == "ArrowUp" {
                    // Stop the page from scrolling
                    event.prevent_default();
                    session.command(SessionCommand::Activate);
                }
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        // Touch
        {
            let session = session.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if is_running(&session) {
                    event.prevent_default();
                    session.command(SessionCommand::Activate);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                session.command(SessionCommand::Activate);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::UiEvent| {
            match game.try_borrow_mut() {
                Ok(mut g) => g.resize(),
                Err(_) => log::debug!("Resize during a frame, picked up on the next event"),
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(session: Rc<SessionHandle>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Visibility change (tab switch, minimize)
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden
                && is_running(&session)
            {
                session.command(SessionCommand::Pause);
                log::info!("Auto-paused (tab hidden)");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Schedule the frame loop unless it is already scheduled or there is
    /// nothing to run
    fn ensure_loop(host: &Host) {
        {
            // Busy means a frame is running and it schedules the next one
            let Ok(mut g) = host.game.try_borrow_mut() else {
                return;
            };
            if g.loop_running || !is_running(&host.session) {
                return;
            }
            g.loop_running = true;
            g.last_time = 0.0;
            g.accumulator = 0.0;
        }
        request_animation_frame(host.game.clone());
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
            if !is_running(&g.session) {
                // Paused: leave the last frame on screen
                g.loop_running = false;
                return;
            }
            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

/// Switch to the runner (or re-enter it): activates and unpauses
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn runner_start() {
    wasm_game::start();
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn runner_pause() {
    wasm_game::pause();
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn runner_resume() {
    wasm_game::resume();
}

/// Cosmetic only; unknown indices draw the first skin
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn runner_set_skin(index: i32) {
    wasm_game::set_skin(index);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use flip_runner::RunnerConfig;
    use flip_runner::sim::{
        Contact, Gravity, Mode, RunnerEvent, RunnerSession, RunnerState, TickInput, Viewport,
        Wallet,
    };

    const DEMO_TICKS: u32 = 60 * 60;
    /// Cube jumps when a hazard's leading edge is this close
    const LOOKAHEAD: f32 = 60.0;

    /// Good-enough player: jump hazards in cube mode, hold mid-height as a ship
    pub fn autopilot(state: &RunnerState) -> TickInput {
        let p = state.player.rect();
        let activate = match state.mode() {
            Mode::Cube => state.obstacles.iter().any(|o| {
                !o.resolved
                    && o.kind.contact() == Contact::Hazard
                    && o.rect.x >= p.right()
                    && o.rect.x - p.right() < LOOKAHEAD
            }),
            Mode::Ship => {
                let mid = state.ground_level / 2.0;
                match state.gravity() {
                    Gravity::Normal => p.center().y > mid,
                    Gravity::Inverted => p.center().y < mid,
                }
            }
        };
        TickInput { activate }
    }

    pub fn run() {
        let config = RunnerConfig::load();
        let seed = config.seed.unwrap_or(42);
        let mut session = RunnerSession::new(seed, config, Viewport::new(800.0, 600.0));
        let mut wallet = Wallet::with_multiplier(1.5);

        let (mut crashes, mut transitions) = (0u32, 0u32);
        session.start();
        for _ in 0..DEMO_TICKS {
            if autopilot(session.state()).activate {
                session.activate();
            }
            session.frame(Some(&mut wallet));
            for event in session.take_events() {
                match event {
                    RunnerEvent::Crashed { .. } => crashes += 1,
                    RunnerEvent::Transition { banner, .. } => {
                        transitions += 1;
                        log::debug!("{}", banner);
                    }
                    _ => {}
                }
            }
        }

        let state = session.state();
        log::info!(
            "Demo finished after {} ticks: earned {} (wallet {}), {} crashes, {} portals, ending in {} mode",
            state.time_ticks,
            state.earned,
            wallet.balance,
            crashes,
            transitions,
            state.mode().as_str()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flip Runner (native) starting headless demo...");
    log::info!("Run with `trunk serve` for the web version");
    demo::run();
}
