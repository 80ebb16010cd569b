//! Gem Bounce entry point
//!
//! Browser: Canvas 2D + Web Audio front-end driven by requestAnimationFrame.
//! Native: headless runner that drives the same simulation and logs it.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use gem_bounce::audio::{AudioManager, sounds_for_events};
    use gem_bounce::consts::*;
    use gem_bounce::renderer::{CanvasRenderer, build_frame};
    use gem_bounce::settings::Settings;
    use gem_bounce::sim::{Phase, SimState, TickInput, Variant, tick};

    /// Front-end instance holding all state
    struct Game {
        state: SimState,
        settings: Settings,
        renderer: Option<CanvasRenderer>,
        audio: AudioManager,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let mut audio = AudioManager::new();
            audio.set_volume(settings.effective_volume());
            Self {
                state: SimState::new(settings.sim.clone()),
                settings,
                renderer: None,
                audio,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = std::mem::take(&mut self.input);
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                for effect in sounds_for_events(self.state.events()) {
                    self.audio.play(effect);
                }
                if self.state.phase == Phase::Stopped {
                    break;
                }
            }
        }

        /// Flip mute and remember the choice
        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            self.audio.set_volume(self.settings.effective_volume());
            self.settings.save();
            log::info!("Muted: {}", self.settings.muted);
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref renderer) = self.renderer {
                let cmds = build_frame(
                    &self.state.snapshot(),
                    self.settings.sim.variant,
                    &self.settings.display,
                );
                if let Err(e) = renderer.render(&cmds) {
                    log::warn!("Render error: {:?}", e);
                }
            }
        }
    }

    fn selected_variant(window: &web_sys::Window) -> Variant {
        window
            .location()
            .hash()
            .ok()
            .and_then(|hash| Variant::from_name(hash.trim_start_matches('#')))
            .unwrap_or_default()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }

        log::info!("Gem Bounce starting...");

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
            log::error!("No #canvas element");
            return;
        };

        let variant = selected_variant(&window);
        let mut settings = Settings::load(variant);
        settings.sim.seed = js_sys::Date::now() as u64;

        canvas.set_width(settings.sim.window_width as u32);
        canvas.set_height(settings.sim.window_height as u32);

        let game = Rc::new(RefCell::new(Game::new(settings)));
        log::info!("{} arena initialized", variant.as_str());

        match CanvasRenderer::new(&canvas) {
            Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
            Err(e) => log::error!("Failed to get 2d context: {:?}", e),
        }

        setup_input_handlers(&window, game.clone());

        request_animation_frame(game);

        log::info!("Press Left Ctrl to start, Space / Right Ctrl to reset, M to mute, Escape to quit");
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.code().as_str() {
                "ControlLeft" => {
                    g.audio.resume();
                    g.input.start = true;
                }
                "ControlRight" | "Space" => {
                    event.prevent_default();
                    g.input.reset = true;
                }
                "Escape" => g.input.quit = true,
                "KeyM" => g.toggle_mute(),
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
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

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();

            if g.state.phase == Phase::Stopped {
                log::info!("Stopped");
                return;
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use anyhow::Context;
    use clap::Parser;

    use gem_bounce::audio::{SoundEffect, sounds_for_events};
    use gem_bounce::consts::*;
    use gem_bounce::renderer::build_frame;
    use gem_bounce::settings::Settings;
    use gem_bounce::sim::{BallKind, Phase, SimEvent, SimState, TickInput, Variant, tick};

    #[derive(Parser, Debug)]
    #[command(about = "Run the bouncing-ball arena without a window", version)]
    pub struct Args {
        /// Settings JSON file (defaults to the variant preset)
        pub settings: Option<PathBuf>,
        /// Preset to use when no settings file is given: gems or flags
        #[arg(long, default_value = "gems")]
        pub variant: String,
        /// Override the RNG seed
        #[arg(long)]
        pub seed: Option<u64>,
        /// Ticks to run before quitting
        #[arg(long, default_value_t = 1200)]
        pub ticks: u64,
        /// Send a reset command every N ticks
        #[arg(long)]
        pub reset_every: Option<u64>,
        /// Pace ticks at 60 Hz instead of running flat out
        #[arg(long)]
        pub realtime: bool,
    }

    impl Args {
        pub fn settings(&self) -> anyhow::Result<Settings> {
            let mut settings = match &self.settings {
                Some(path) => Settings::load_file(path)?,
                None => {
                    let variant = Variant::from_name(&self.variant)
                        .with_context(|| format!("unknown variant {:?}", self.variant))?;
                    Settings::from_preset(variant)
                }
            };
            if let Some(seed) = self.seed {
                settings.sim.seed = seed;
            }
            Ok(settings)
        }
    }

    /// Headless front-end: feeds commands, counts sounds, builds frames
    struct Runner {
        state: SimState,
        settings: Settings,
        sounds: HashMap<SoundEffect, u64>,
        spawned: u64,
        annihilated: u64,
        draw_cmds: usize,
    }

    impl Runner {
        fn new(settings: Settings) -> Self {
            Self {
                state: SimState::new(settings.sim.clone()),
                settings,
                sounds: HashMap::new(),
                spawned: 0,
                annihilated: 0,
                draw_cmds: 0,
            }
        }

        fn step(&mut self, input: &TickInput) {
            tick(&mut self.state, input, SIM_DT);

            for effect in sounds_for_events(self.state.events()) {
                *self.sounds.entry(effect).or_default() += 1;
            }
            for event in self.state.events() {
                match event {
                    SimEvent::Spawned { .. } => self.spawned += 1,
                    SimEvent::Annihilated { .. } => self.annihilated += 2,
                    _ => {}
                }
            }

            let frame = build_frame(
                &self.state.snapshot(),
                self.settings.sim.variant,
                &self.settings.display,
            );
            self.draw_cmds = frame.len();
        }

        fn log_summary(&self) {
            let s = &self.state;
            log::info!(
                "t={:>6.0}ms balls={} (diamond {}, emerald {}) bounce={} spawned={} annihilated={} sounds={:?} draw_cmds={}",
                s.clock.elapsed_ms,
                s.balls.len(),
                s.count_kind(BallKind::Diamond),
                s.count_kind(BallKind::Emerald),
                s.bounce,
                self.spawned,
                self.annihilated,
                self.sounds,
                self.draw_cmds,
            );
        }
    }

    pub fn run(args: Args) -> anyhow::Result<()> {
        let settings = args.settings()?;
        let variant = settings.sim.variant;
        log::info!(
            "Gem Bounce (native, {}) seed={} ticks={} volume={:.2}",
            variant.as_str(),
            settings.sim.seed,
            args.ticks,
            settings.effective_volume()
        );

        let mut runner = Runner::new(settings);
        let frame = Duration::from_secs_f32(SIM_DT);
        let summary_every = TICK_HZ as u64;

        runner.step(&TickInput {
            start: true,
            ..Default::default()
        });

        let mut n: u64 = 1;
        while runner.state.phase != Phase::Stopped {
            let frame_start = Instant::now();
            let input = TickInput {
                reset: args.reset_every.is_some_and(|every| every > 0 && n % every == 0),
                quit: n >= args.ticks,
                ..Default::default()
            };
            runner.step(&input);
            n += 1;

            if n % summary_every == 0 {
                runner.log_summary();
            }

            if args.realtime {
                if let Some(rest) = frame.checked_sub(frame_start.elapsed()) {
                    std::thread::sleep(rest);
                }
            }
        }

        runner.log_summary();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    headless::run(headless::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
