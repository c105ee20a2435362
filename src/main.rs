//! Airdrop Survival entry point
//!
//! In the browser this runs the game loop. Natively it is the soundtrack
//! asset tool.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use airdrop_survival::{Settings, SoundtrackVariant};
    use airdrop_survival::audio::{AudioManager, SoundEffect};
    use airdrop_survival::consts::*;
    use airdrop_survival::renderer::{Letterbox, RenderState, scene};
    use airdrop_survival::sim::{GameState, IntroState, TickInput, tick};
    use airdrop_survival::synth;
    use airdrop_survival::ui::{self, ButtonKind, Overlay};

    /// Which part of the game is on screen
    enum Screen {
        Intro(IntroState),
        Run(GameState),
        /// Player chose Quit
        Farewell,
    }

    /// Game instance holding all state
    struct Game {
        screen: Screen,
        settings: Settings,
        audio: AudioManager,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Overlay from the last frame, used for click hit tests
        overlay: Overlay,
        overlay_html: String,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                screen: Screen::Intro(IntroState::new()),
                settings,
                audio,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                overlay: Overlay::default(),
                overlay_html: String::new(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                match &mut self.screen {
                    Screen::Intro(intro) => intro.tick(),
                    Screen::Run(state) => tick(state, &self.input, SIM_DT),
                    Screen::Farewell => {}
                }
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            if let Screen::Run(state) = &mut self.screen {
                for event in state.drain_events() {
                    if let Some(effect) = SoundEffect::for_event(&event) {
                        self.audio.play(effect);
                    }
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = match &self.screen {
                Screen::Intro(intro) => scene::intro_scene(intro),
                Screen::Run(state) => {
                    scene::game_scene(state, self.settings.effective_halo_flash())
                }
                Screen::Farewell => Vec::new(),
            };

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
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

        /// Rebuild overlay text and buttons in the DOM
        fn update_overlay(&mut self, document: &Document) {
            self.overlay = match &self.screen {
                Screen::Intro(intro) => ui::intro_overlay(intro),
                Screen::Run(state) => ui::game_overlay(state, self.settings.show_control_hint),
                Screen::Farewell => ui::farewell_overlay(),
            };

            let html = ui::overlay_html(&self.overlay);
            if html != self.overlay_html {
                if let Some(el) = document.get_element_by_id("overlay") {
                    el.set_inner_html(&html);
                }
                self.overlay_html = html;
            }
        }

        fn enter_game(&mut self) {
            let seed = js_sys::Date::now() as u64;
            log::info!("Run started with seed: {}", seed);
            self.screen = Screen::Run(GameState::new(seed));
            self.accumulator = 0.0;
            self.audio.resume();
            self.audio.start_music();
        }

        fn back_to_menu(&mut self) {
            log::info!("Back to menu");
            self.audio.fade_out_music();
            self.screen = Screen::Intro(IntroState::new());
            self.accumulator = 0.0;
        }

        fn quit(&mut self) {
            log::info!("Quit");
            self.audio.fade_out_music();
            self.screen = Screen::Farewell;
        }

        fn press(&mut self, button: ButtonKind) {
            match button {
                ButtonKind::EnterGame => self.enter_game(),
                ButtonKind::BackToMenu => self.back_to_menu(),
                ButtonKind::Quit => self.quit(),
            }
        }

        /// Set held state for a movement key; returns false for other keys
        fn set_key(&mut self, key: &str, held: bool) -> bool {
            match key {
                "ArrowLeft" | "a" | "A" => self.input.left = held,
                "ArrowRight" | "d" | "D" => self.input.right = held,
                _ => return false,
            }
            true
        }
    }

    /// Size the canvas backing store and line the overlay up with the letterbox
    fn fit_to_stage(canvas: &HtmlCanvasElement, overlay: Option<&Element>) -> (u32, u32) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let client_w = canvas.client_width().max(1) as u32;
        let client_h = canvas.client_height().max(1) as u32;
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        if let Some(overlay) = overlay {
            let lb = Letterbox::new(client_w, client_h);
            let _ = overlay.set_attribute(
                "style",
                &format!(
                    "left:{:.1}px;top:{:.1}px;transform:scale({:.4})",
                    lb.offset.x, lb.offset.y, lb.scale
                ),
            );
        }
        (width, height)
    }

    /// `?soundtrack=punchy` picks a variant and remembers it
    fn soundtrack_from_query(window: &web_sys::Window) -> Option<SoundtrackVariant> {
        let search = window.location().search().ok()?;
        search
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "soundtrack")
            .and_then(|(_, value)| SoundtrackVariant::from_str(value))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Airdrop Survival starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let overlay = document.get_element_by_id("overlay");
        let (width, height) = fit_to_stage(&canvas, overlay.as_ref());

        let mut settings = Settings::load();
        if let Some(variant) = soundtrack_from_query(&window) {
            if variant != settings.soundtrack {
                log::info!("Soundtrack set from URL: {}", variant.as_str());
                settings.soundtrack = variant;
                settings.save();
            }
        }
        let game = Rc::new(RefCell::new(Game::new(settings.clone())));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        let started = js_sys::Date::now();
        let soundtrack = synth::render(settings.soundtrack);
        game.borrow_mut().audio.load_soundtrack(&soundtrack);
        log::info!(
            "Synthesized {} soundtrack in {:.0} ms",
            settings.soundtrack.as_str(),
            js_sys::Date::now() - started
        );

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_input_handlers(&canvas, game.clone())?;
        setup_resize(canvas, game.clone())?;

        request_animation_frame(game);

        log::info!("Airdrop Survival running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Held movement keys; Enter also starts the game once the prompt is up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.set_key(&event.key(), true) {
                    event.prevent_default();
                    return;
                }
                if event.key() == "Enter" {
                    let ready = matches!(&g.screen, Screen::Intro(intro) if intro.prompt_visible());
                    if ready {
                        g.enter_game();
                    }
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().set_key(&event.key(), false);
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keys released while unfocused never arrive
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input = TickInput::default();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Tab hidden; drop held keys and restart the frame clock on return
        {
            let game = game.clone();
            let document = window.document().ok_or("no document")?;
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.input = TickInput::default();
                    g.last_time = 0.0;
                    log::info!("Tab hidden, input released");
                }
            });
            document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Clicks land on the stage; map them into screen pixels and hit test
        {
            let stage = canvas.parent_element().ok_or("canvas has no stage")?;
            let stage_clone = stage.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = stage_clone.get_bounding_client_rect();
                let lb = Letterbox::new(
                    stage_clone.client_width().max(1) as u32,
                    stage_clone.client_height().max(1) as u32,
                );
                let point = lb.viewport_to_screen(Vec2::new(
                    event.client_x() as f32 - rect.left() as f32,
                    event.client_y() as f32 - rect.top() as f32,
                ));

                let mut g = game.borrow_mut();
                if let Some(button) = ui::hit_test(&g.overlay.buttons, point) {
                    g.press(button);
                }
            });
            stage.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let overlay = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("overlay"));
            let (width, height) = fit_to_stage(&canvas, overlay.as_ref());
            if let Some(render_state) = game.borrow_mut().render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_overlay(&document);
            }

            if matches!(g.screen, Screen::Farewell) {
                log::info!("Stopped. Reload the page to play again.");
                return;
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Failed to start: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod tool {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result, anyhow, bail};

    use airdrop_survival::synth::{self, WavFile};

    const DEFAULT_SOUND_DIR: &str = "assets/sounds";

    const USAGE: &str = "\
Usage:
  airdrop-survival generate [DIR]   synthesize missing soundtrack files (default: assets/sounds)
  airdrop-survival inspect FILE...  print the format of WAV files";

    pub fn run(args: &[String]) -> Result<()> {
        match args.first().map(String::as_str) {
            None | Some("generate") => {
                let dir = args
                    .get(1)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SOUND_DIR));
                generate(&dir)
            }
            Some("inspect") => {
                if args.len() < 2 {
                    bail!("inspect needs at least one file\n\n{}", USAGE);
                }
                for file in &args[1..] {
                    inspect(Path::new(file))?;
                }
                Ok(())
            }
            Some("-h") | Some("--help") | Some("help") => {
                println!("{}", USAGE);
                Ok(())
            }
            Some(other) => Err(anyhow!("Unknown command '{}'\n\n{}", other, USAGE)),
        }
    }

    fn generate(dir: &Path) -> Result<()> {
        log::info!("Generating soundtrack into {}", dir.display());
        let paths = synth::generate_all(dir)
            .with_context(|| format!("Failed to generate soundtrack in {}", dir.display()))?;
        for path in paths {
            println!("{}", path.display());
        }
        Ok(())
    }

    fn inspect(path: &Path) -> Result<()> {
        let wav = WavFile::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        println!(
            "{}: {} channel(s), {}-bit, {} Hz, {} frames, {:.2}s",
            path.display(),
            wav.channels,
            wav.bits_per_sample,
            wav.sample_rate,
            wav.frames(),
            wav.duration_secs()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Airdrop Survival soundtrack tool");
    log::info!("The game itself runs in the browser - use `trunk serve` for the web version");

    let args: Vec<String> = std::env::args().skip(1).collect();
    tool::run(&args)
}
