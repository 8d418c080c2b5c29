//! Market Momentum entry point
//!
//! On the web this wires the canvas, HUD, lead form and leaderboard to a
//! [`Session`](market_momentum::Session). Natively it plays one headless
//! autopilot round and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, HtmlCanvasElement, HtmlImageElement, HtmlInputElement, HtmlSelectElement,
        KeyboardEvent, PointerEvent,
    };

    use market_momentum::leaderboard::LocalStorageStore;
    use market_momentum::renderer::{CanvasRenderer, SceneOptions, build_scene};
    use market_momentum::sim::{GameState, ScoreReport, SessionConfig};
    use market_momentum::tips::{TipRequest, request_tip};
    use market_momentum::{
        Challenge, FrameHost, HostSurface, Leaderboard, LeaderboardEntry, Session, SessionPhase,
        Settings, format_money,
    };

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// `requestAnimationFrame` with one long-lived callback
    struct RafHost {
        callback: FrameCallback,
    }

    impl FrameHost for RafHost {
        type Handle = i32;

        fn request_frame(&mut self) -> i32 {
            let callback = self.callback.borrow();
            let (Some(window), Some(cb)) = (web_sys::window(), callback.as_ref()) else {
                log::error!("Frame requested before the loop was wired");
                return 0;
            };
            window
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .unwrap_or_else(|e| {
                    log::error!("requestAnimationFrame failed: {:?}", e);
                    0
                })
        }

        fn cancel_frame(&mut self, handle: i32) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }

    /// Canvas plus the DOM HUD around it
    struct DomSurface {
        document: Document,
        renderer: CanvasRenderer,
        /// Natural size of the background image once loaded
        background: Rc<Cell<Option<Vec2>>>,
        settings: Settings,
    }

    impl DomSurface {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn show(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", !visible);
            }
        }
    }

    impl HostSurface for DomSurface {
        fn render(&mut self, state: &GameState) {
            let options = SceneOptions {
                background: self.background.get(),
                particles: self.settings.particles,
                scroll: self.settings.effective_scroll(),
            };
            self.renderer.draw(&build_scene(state, &options));
        }

        fn score_changed(&mut self, score: ScoreReport) {
            self.set_text("hud-revenue", &format_money(score.revenue));
            self.set_text("hud-customers", &score.customers.to_string());
        }

        fn time_changed(&mut self, seconds_left: u32) {
            self.set_text("hud-time", &format!("{}s", seconds_left));
        }

        fn phase_changed(&mut self, phase: SessionPhase) {
            self.show("start-overlay", phase == SessionPhase::NotStarted);
            self.show("lead-form-panel", phase == SessionPhase::Ended);
            self.show("leaderboard-panel", phase == SessionPhase::Submitted);
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session<RafHost, DomSurface>,
        leaderboard: Leaderboard,
        store: LocalStorageStore,
        settings: Settings,
    }

    impl Game {
        fn now() -> f64 {
            web_sys::window()
                .and_then(|w| w.performance())
                .map(|p| p.now())
                .unwrap_or(0.0)
        }

        fn start(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.session.start(seed, Self::now());
        }

        /// Apply a settings change to the canvas and persist it
        fn update_settings(&mut self, change: impl FnOnce(&mut Settings) -> bool, name: &str) {
            let value = change(&mut self.settings);
            log::info!("{}: {}", name, value);
            self.settings.save();
            self.session.surface_mut().settings = self.settings.clone();
            if self.session.phase() != SessionPhase::Playing {
                self.session.redraw();
            }
        }

        fn restart(&mut self) {
            if self.session.restart() {
                self.session.redraw();
            }
        }

        fn render_leaderboard(&self, document: &Document, highlight: Option<usize>) {
            let Some(list) = document.get_element_by_id("leaderboard-list") else {
                return;
            };
            list.set_text_content(None);
            for (i, entry) in self.leaderboard.entries.iter().enumerate() {
                let Ok(row) = document.create_element("li") else {
                    continue;
                };
                row.set_text_content(Some(&format!(
                    "{}. {} ({}) {} / {} patients",
                    i + 1,
                    entry.business_name,
                    entry.challenge,
                    format_money(entry.score),
                    entry.customers
                )));
                if highlight == Some(i + 1) {
                    let _ = row.set_attribute("class", "current");
                }
                let _ = list.append_child(&row);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Market Momentum starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .ok_or("no #game-canvas")?
            .dyn_into()?;
        let renderer = CanvasRenderer::new(&canvas)?;

        let settings = Settings::load();
        let background = Rc::new(Cell::new(None));
        let callback: FrameCallback = Rc::new(RefCell::new(None));

        let surface = DomSurface {
            document: document.clone(),
            renderer,
            background: background.clone(),
            settings: settings.clone(),
        };
        let host = RafHost {
            callback: callback.clone(),
        };
        let store = LocalStorageStore;
        let game = Rc::new(RefCell::new(Game {
            session: Session::new(SessionConfig::default(), host, surface),
            leaderboard: Leaderboard::load_from(&store),
            store,
            settings: settings.clone(),
        }));

        // Frame callback only holds a weak handle so the page can drop the game
        let weak: Weak<RefCell<Game>> = Rc::downgrade(&game);
        *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            if let Some(game) = weak.upgrade() {
                game.borrow_mut().session.on_frame(time);
            }
        }));

        load_background(&settings.background_url, game.clone(), background)?;
        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_lead_form(&document, game.clone());
        setup_teardown(game.clone());

        {
            let mut g = game.borrow_mut();
            g.session.surface_mut().phase_changed(SessionPhase::NotStarted);
            g.session.redraw();
            g.render_leaderboard(&document, None);
        }

        log::info!("Market Momentum ready");
        Ok(())
    }

    /// Flat sky until the image arrives; a failed load just keeps the sky
    fn load_background(
        url: &str,
        game: Rc<RefCell<Game>>,
        size: Rc<Cell<Option<Vec2>>>,
    ) -> Result<(), JsValue> {
        let image = HtmlImageElement::new()?;
        {
            let img = image.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                size.set(Some(Vec2::new(
                    img.natural_width() as f32,
                    img.natural_height() as f32,
                )));
                let mut g = game.borrow_mut();
                g.session.surface_mut().renderer.set_background(img.clone());
                if g.session.phase() != SessionPhase::Playing {
                    g.session.redraw();
                }
                log::info!("Background loaded");
            });
            image.set_onload(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                log::warn!("Background image failed to load, using flat sky");
            });
            image.set_onerror(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }
        image.set_src(url);
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Tap / click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().session.jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" | "ArrowUp" => {
                        if g.session.phase() == SessionPhase::Playing {
                            // Keep the page from scrolling under the game
                            event.prevent_default();
                        }
                        g.session.jump();
                    }
                    "KeyP" => g.update_settings(Settings::toggle_particles, "Particles"),
                    "KeyM" => g.update_settings(Settings::toggle_reduced_motion, "Reduced motion"),
                    "KeyI" => {
                        let input = g.session.input_mut();
                        input.autopilot = !input.autopilot;
                        log::info!("Autopilot: {}", input.autopilot);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // The lead form and the leaderboard both offer "play again"
        for id in ["skip-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow_mut().restart();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_lead_form(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(form) = document.get_element_by_id("lead-form") else {
            log::warn!("No #lead-form, scores won't reach the leaderboard");
            return;
        };
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.prevent_default();

            let business_name = doc
                .get_element_by_id("business-name")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .map(|el| el.value().trim().to_string())
                .unwrap_or_default();
            let challenge = doc
                .get_element_by_id("challenge")
                .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
                .and_then(|el| Challenge::from_label(&el.value()))
                .unwrap_or(Challenge::Other);

            let (report, api_key, model) = {
                let mut g = game.borrow_mut();
                let Some(report) = g.session.submit() else {
                    log::debug!("Lead form submitted outside of Ended, ignoring");
                    return;
                };
                (
                    report,
                    g.settings.tip_key().map(str::to_string),
                    g.settings.tip_model.clone(),
                )
            };

            let game = game.clone();
            let doc = doc.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let request = TipRequest {
                    business_name: business_name.clone(),
                    challenge: challenge.as_str().to_string(),
                    score: report.revenue,
                };
                let tip = request_tip(api_key.as_deref(), &model, &request).await;
                if let Some(el) = doc.get_element_by_id("tip-text") {
                    el.set_text_content(Some(&tip));
                }

                let entry =
                    LeaderboardEntry::new(business_name, report.revenue, report.customers, challenge)
                        .with_tip(tip);
                let mut g = game.borrow_mut();
                let rank = g.leaderboard.submit(entry);
                let Game {
                    leaderboard, store, ..
                } = &mut *g;
                if let Err(e) = leaderboard.save_to(store) {
                    log::error!("Failed to save leaderboard: {}", e);
                }
                match rank {
                    Some(rank) => log::info!("Entered the leaderboard at #{}", rank),
                    None => log::info!("Score didn't make the top 10"),
                }
                g.render_leaderboard(&doc, rank);
            });
        });
        let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Stop the frame chain when the page goes away
    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().session.unmount();
            log::info!("Session unmounted");
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use market_momentum::leaderboard::MemoryStore;
    use market_momentum::session::{ManualFrameHost, run_headless};
    use market_momentum::sim::{GameState, ScoreReport, SessionConfig};
    use market_momentum::tips;
    use market_momentum::{
        Challenge, HostSurface, Leaderboard, LeaderboardEntry, Session, SessionPhase, format_money,
    };

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Far more than one 30-second run needs at 60 Hz
    const MAX_FRAMES: usize = 10_000;

    /// Logs the HUD instead of drawing it
    #[derive(Default)]
    struct LogSurface {
        frames: usize,
        seconds: Option<u32>,
        score: ScoreReport,
    }

    impl HostSurface for LogSurface {
        fn render(&mut self, _state: &GameState) {
            self.frames += 1;
        }

        fn score_changed(&mut self, score: ScoreReport) {
            if score != self.score {
                log::debug!("{} customers, {}", score.customers, format_money(score.revenue));
                self.score = score;
            }
        }

        fn time_changed(&mut self, seconds_left: u32) {
            if self.seconds != Some(seconds_left) {
                log::info!("{}s left, {} customers", seconds_left, self.score.customers);
                self.seconds = Some(seconds_left);
            }
        }

        fn phase_changed(&mut self, phase: SessionPhase) {
            log::debug!("Phase: {:?}", phase);
        }
    }

    pub fn run() {
        let seed = std::env::args()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| {
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_millis() as u64)
                    .unwrap_or(0)
            });

        let mut session = Session::new(
            SessionConfig::default(),
            ManualFrameHost::new(),
            LogSurface::default(),
        );
        session.input_mut().autopilot = true;
        session.start(seed, 0.0);
        log::info!("Headless autopilot run, seed {}", seed);

        let frames = run_headless(&mut session, 0.0, FRAME_MS, MAX_FRAMES);
        let Some(report) = session.submit() else {
            log::error!("Run did not finish within {} frames", frames);
            return;
        };
        log::info!(
            "Finished after {} frames ({} drawn): {} customers, {} revenue",
            frames,
            session.surface().frames,
            report.customers,
            format_money(report.revenue)
        );

        let mut store = MemoryStore::default();
        let mut board = Leaderboard::load_from(&store);
        // No tip service natively
        let entry =
            LeaderboardEntry::new("Autopilot", report.revenue, report.customers, Challenge::Other)
                .with_tip(tips::FALLBACK_NO_KEY);
        match board.submit(entry) {
            Some(rank) => log::info!("Leaderboard rank #{}", rank),
            None => log::info!("Missed the leaderboard"),
        }
        if let Err(e) = board.save_to(&mut store) {
            log::error!("Failed to save leaderboard: {}", e);
        }
        for (i, e) in board.entries.iter().enumerate() {
            log::info!("{:>2}. {:<16} {:>10}", i + 1, e.business_name, format_money(e.score));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Market Momentum (native) starting...");
    log::info!("The playable build targets wasm32; running a headless round instead");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
