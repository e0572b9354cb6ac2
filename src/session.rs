//! Session control surface
//!
//! Wraps a `GameState` with start/pause/resume/restart, drives ticks from
//! variable host frame times through a fixed-rate accumulator, and hands
//! render commands and final results to external collaborators. Failures in
//! those collaborators are logged and never touch the simulation.

use thiserror::Error;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::settings::Settings;
use crate::sim::{CollisionEvent, GameState, LevelParams, RenderCommand, TickInput, tick};

pub use crate::sim::{GameOutcome, GameResult};

#[derive(Debug, Error)]
#[error("render sink unavailable: {0}")]
pub struct RenderError(pub String);

#[derive(Debug, Error)]
#[error("results reporter failed: {0}")]
pub struct ReportError(pub String);

/// Positions a visual surface for each entity
pub trait RenderSink {
    fn render(&mut self, commands: &[RenderCommand]) -> Result<(), RenderError>;
}

/// Receives the result payload once a session ends
pub trait ResultsReporter {
    fn report(&mut self, result: &GameResult) -> Result<(), ReportError>;
}

/// What happened during one host frame
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Fixed steps consumed this frame
    pub ticks: u32,
    /// Events applied across those ticks
    pub events: Vec<CollisionEvent>,
    /// Set on the frame the session ended
    pub result: Option<GameResult>,
}

/// One playthrough plus its collaborators
pub struct Session {
    settings: Settings,
    state: GameState,
    started: bool,
    reported: bool,
    accumulator: f32,
    sinks: Vec<Box<dyn RenderSink>>,
    reporters: Vec<Box<dyn ResultsReporter>>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let state = GameState::new(&settings);
        Self {
            settings,
            state,
            started: false,
            reported: false,
            accumulator: 0.0,
            sinks: Vec::new(),
            reporters: Vec::new(),
        }
    }

    pub fn add_render_sink(&mut self, sink: impl RenderSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn add_reporter(&mut self, reporter: impl ResultsReporter + 'static) {
        self.reporters.push(Box::new(reporter));
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Begin ticking
    pub fn start(&mut self) {
        if !self.started {
            self.started = true;
            log::info!(
                "Session started: {} blocks, seed {}",
                self.state.block_count(),
                self.state.seed
            );
        }
    }

    pub fn pause(&mut self) {
        if !self.state.is_terminal() && !self.state.paused {
            self.state.paused = true;
            log::info!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state.paused {
            self.state.paused = false;
            log::info!("Resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.state.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Throw the whole session away and rebuild it from `level`.
    ///
    /// The new state depends only on the settings, never on the previous run.
    /// A started session stays started.
    pub fn restart(&mut self, level: LevelParams) {
        self.settings = self.settings.with_level(level);
        self.state = GameState::new(&self.settings);
        self.reported = false;
        self.accumulator = 0.0;
        log::info!(
            "Session restarted: {} rows, gap {}, {} blocks",
            level.rows,
            level.gap,
            self.state.block_count()
        );
    }

    /// Run exactly one tick, then report the result if the session just ended
    pub fn step(&mut self, input: &TickInput) -> Vec<CollisionEvent> {
        if !self.started {
            return Vec::new();
        }
        let events = tick(&mut self.state, input);
        self.report_if_finished();
        events
    }

    /// Advance by a host frame of `frame_dt` seconds, then draw.
    ///
    /// One-shot inputs (`pause`, `cheat_clear`) are consumed by the first
    /// tick of the frame.
    pub fn frame(&mut self, frame_dt: f32, input: &TickInput) -> FrameReport {
        let mut report = FrameReport::default();
        let was_finished = self.reported;

        if self.started {
            let dt = frame_dt.clamp(0.0, 0.25);
            self.accumulator += dt;

            let mut input = *input;
            while self.accumulator >= SIM_DT && report.ticks < MAX_SUBSTEPS {
                report.events.extend(self.step(&input));
                self.accumulator -= SIM_DT;
                report.ticks += 1;

                // Clear one-shot inputs after processing
                input.pause = false;
                input.cheat_clear = false;
            }
            if report.ticks == MAX_SUBSTEPS {
                // Drop the backlog instead of spiralling
                self.accumulator = 0.0;
            }
        }

        if !was_finished && self.reported {
            report.result = self.state.result();
        }

        self.draw();
        report
    }

    /// Send the current entity layout to every render sink
    pub fn draw(&mut self) {
        let commands = self.state.draw();
        for sink in &mut self.sinks {
            if let Err(err) = sink.render(&commands) {
                log::warn!("Render error: {}", err);
            }
        }
    }

    fn report_if_finished(&mut self) {
        if self.reported {
            return;
        }
        let Some(result) = self.state.result() else {
            return;
        };
        self.reported = true;
        log::info!(
            "Game over: {:?}, score {}, {}s",
            result.outcome,
            result.score,
            result.elapsed_seconds
        );
        for reporter in &mut self.reporters {
            if let Err(err) = reporter.report(&result) {
                log::warn!("Failed to report result: {}", err);
            }
        }
    }
}
