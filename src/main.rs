//! Brick Pong entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, KeyboardEvent};

    use brick_pong::consts::*;
    use brick_pong::session::{RenderError, RenderSink};
    use brick_pong::sim::{EntityId, GameOutcome, RenderCommand};
    use brick_pong::{HighScores, InputState, Key, PanelText, Session, Settings};

    /// One absolutely positioned div per entity inside the play zone
    struct DomSink {
        document: Document,
        zone: Element,
        nodes: HashMap<EntityId, HtmlElement>,
    }

    impl DomSink {
        fn node_for(&mut self, cmd: &RenderCommand) -> Result<HtmlElement, RenderError> {
            if let Some(node) = self.nodes.get(&cmd.id) {
                return Ok(node.clone());
            }
            let node: HtmlElement = self
                .document
                .create_element("div")
                .map_err(|e| RenderError(format!("{:?}", e)))?
                .dyn_into()
                .map_err(|_| RenderError("div is not an HtmlElement".into()))?;
            node.set_class_name(&format!("element {}", cmd.label));
            self.zone
                .append_child(&node)
                .map_err(|e| RenderError(format!("{:?}", e)))?;
            self.nodes.insert(cmd.id, node.clone());
            Ok(node)
        }
    }

    impl RenderSink for DomSink {
        fn render(&mut self, commands: &[RenderCommand]) -> Result<(), RenderError> {
            for cmd in commands {
                let node = self.node_for(cmd)?;
                let style = node.style();
                for (prop, value) in [
                    ("left", cmd.pos.x),
                    ("top", cmd.pos.y),
                    ("width", cmd.size.w),
                    ("height", cmd.size.h),
                ] {
                    style
                        .set_property(prop, &format!("{}px", value))
                        .map_err(|e| RenderError(format!("{:?}", e)))?;
                }
            }

            // Drop nodes for removed entities
            self.nodes.retain(|id, node| {
                let live = commands.iter().any(|c| c.id == *id);
                if !live {
                    node.remove();
                }
                live
            });
            Ok(())
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        scores: Rc<RefCell<HighScores>>,
        last_time: f64,
        input: InputState,
    }

    impl Game {
        /// Run simulation ticks for one animation frame
        fn update(&mut self, dt: f32) {
            let report = self.session.frame(dt, &self.input.tick_input());

            // Clear one-shot inputs after processing
            if report.ticks > 0 {
                self.input.consume_one_shots();
            }

            if let Some(result) = report.result {
                let headline = match result.outcome {
                    GameOutcome::Won => "You win!",
                    GameOutcome::Lost => "Game over",
                };
                let text = format!(
                    "{} Score: {}, time: {}\n{}",
                    headline,
                    result.score,
                    brick_pong::panel::format_clock(result.elapsed_seconds),
                    self.scores.borrow().fragment()
                );
                set_text("result", &text);
            }
        }

        /// Update panel elements in DOM
        fn update_panel(&self) {
            let panel = PanelText::from_state(self.session.state());
            set_text("panel-score", &panel.score);
            set_text("panel-rate", &panel.rate);
            set_text("panel-time", &panel.time);
            set_text("panel-status", &panel.status);
        }

        /// Reset game state for restart
        fn restart(&mut self) {
            let level = self.session.settings().level;
            self.session.restart(level);
            self.input = InputState::new();
            set_text("result", "");
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            el.set_text_content(Some(text));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Brick Pong starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        let Some(zone) = document.query_selector("#game .elements").ok().flatten() else {
            log::error!("No #game .elements container");
            return;
        };

        let settings = Settings {
            seed: js_sys::Date::now() as u64,
            ..Settings::default()
        };
        log::info!("Game initialized with seed: {}", settings.seed);

        let scores = Rc::new(RefCell::new(HighScores::new()));
        let mut session = Session::new(settings);
        session.add_render_sink(DomSink {
            document: document.clone(),
            zone,
            nodes: HashMap::new(),
        });
        session.add_reporter(scores.clone());
        session.start();

        let game = Rc::new(RefCell::new(Game {
            session,
            scores,
            last_time: 0.0,
            input: InputState::new(),
        }));

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Brick Pong running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down: held movement, one-shot actions, restart
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_code(&event.code()) else {
                    return;
                };
                let mut g = game.borrow_mut();
                if key == Key::Restart {
                    g.restart();
                } else {
                    g.input.key_down(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up: release held movement
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    game.borrow_mut().input.key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
            g.update_panel();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().session.pause();
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.session.pause();
                g.input.release_all();
                log::info!("Auto-paused (window blur)");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::cell::RefCell;
    use std::rc::Rc;

    use brick_pong::sim::TickInput;
    use brick_pong::{HighScores, Session, Settings};

    /// Give up on a headless run after ten minutes of displayed time
    const MAX_HEADLESS_TICKS: u64 = 60 * 60 * 10;

    env_logger::init();
    log::info!("Brick Pong (native) starting...");
    log::info!("Native mode runs headless with an autopilot - build for wasm32 to play");

    let settings = match std::env::var_os("BRICK_PONG_SETTINGS") {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    let scores = Rc::new(RefCell::new(HighScores::new()));
    let mut session = Session::new(settings);
    session.add_reporter(scores.clone());
    session.start();

    while !session.state().is_terminal() && session.state().elapsed_ticks < MAX_HEADLESS_TICKS {
        let input = TickInput {
            movement: autopilot::steer(session.state()),
            ..Default::default()
        };
        session.step(&input);
    }

    match session.state().result() {
        Some(result) => println!(
            "{:?} with score {} in {}",
            result.outcome,
            result.score,
            brick_pong::panel::format_clock(result.elapsed_seconds)
        ),
        None => log::warn!("Tick limit reached without a result"),
    }
    let scores = scores.borrow();
    if let Some(best) = scores.top_score() {
        log::info!("Best score this run: {}", best);
    }
    println!("{}", scores.fragment());
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use brick_pong::sim::{GameState, MovementFlags};

    /// Chase the ball's center with the paddle's center
    pub fn steer(state: &GameState) -> MovementFlags {
        let (Some(paddle), Some(ball)) = (state.paddle(), state.ball()) else {
            return MovementFlags::default();
        };
        let paddle_center = paddle.pos.x + paddle.size.w / 2.0;
        let ball_center = ball.pos.x + ball.size.w / 2.0;
        let offset = ball_center - paddle_center;
        // Dead zone of one step so the paddle doesn't jitter around the target
        MovementFlags {
            left: offset < -paddle.speed,
            right: offset > paddle.speed,
        }
    }
}
