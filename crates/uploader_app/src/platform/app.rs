use std::io::Write;
use std::process::ExitCode;
use std::sync::mpsc;

use anyhow::Context;
use clap::Parser;
use uploader_core::{update, AppState, ConfigState, Effect, Msg};
use uploader_engine::ConfigLocation;
use uploader_logging::{uploader_error, uploader_info};

use super::args::Args;
use super::effects::EffectRunner;
use super::surface::TerminalSurface;
use super::{input, logging};

/// Everything the app loop reacts to.
pub enum LoopEvent {
    Core(Msg),
    /// The submission source has nothing more to submit.
    InputClosed,
}

/// How the app loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Input closed and every submission finished.
    Finished,
    ConfigFailed,
    /// Every sender is gone.
    Disconnected,
}

impl From<LoopExit> for ExitCode {
    fn from(exit: LoopExit) -> Self {
        match exit {
            LoopExit::Finished | LoopExit::Disconnected => ExitCode::SUCCESS,
            LoopExit::ConfigFailed => ExitCode::FAILURE,
        }
    }
}

pub fn run_app() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    logging::initialize(args.log_destination(), args.log_level());

    let location = ConfigLocation::parse(&args.config).context("invalid --config")?;
    let (tx, rx) = mpsc::channel::<LoopEvent>();
    let runner =
        EffectRunner::new(args.client_settings(), tx.clone()).context("failed to start engine")?;
    let mut surface = TerminalSurface::stdio();
    let state = AppState::with_options(args.controller_options());

    runner.load_config(location);

    let exit = drive(
        state,
        &mut surface,
        &rx,
        |effects| runner.enqueue(effects),
        || input::spawn_source(args.files.clone(), tx.clone()),
    );
    Ok(exit.into())
}

/// Applies loop events to `state` until the run is over.
///
/// `run_effects` executes effects and returns the alerts to show.
/// `start_source` is called once, after configuration has loaded.
pub fn drive<O: Write, E: Write>(
    mut state: AppState,
    surface: &mut TerminalSurface<O, E>,
    rx: &mpsc::Receiver<LoopEvent>,
    mut run_effects: impl FnMut(Vec<Effect>) -> Vec<String>,
    start_source: impl FnOnce(),
) -> LoopExit {
    let mut start_source = Some(start_source);
    let mut input_closed = false;

    loop {
        let Ok(event) = rx.recv() else {
            return LoopExit::Disconnected;
        };
        match event {
            LoopEvent::InputClosed => input_closed = true,
            LoopEvent::Core(msg) => {
                let (next, effects) = update(state, msg);
                state = next;
                for message in run_effects(effects) {
                    surface.alert(&message);
                }
                if state.consume_dirty() {
                    surface.render(&state.view());
                }
            }
        }

        match state.config() {
            ConfigState::Failed(reason) => {
                uploader_error!("Configuration unavailable: {}", reason);
                return LoopExit::ConfigFailed;
            }
            // The form is only wired once configuration is in place.
            ConfigState::Loaded(_) => {
                if let Some(start) = start_source.take() {
                    start();
                }
            }
            ConfigState::NotLoaded => {}
        }

        if input_closed && state.in_flight() == 0 {
            break;
        }
    }

    let view = state.view();
    uploader_info!(
        "Finished: {} submission(s) done, {} failed",
        view.done,
        view.failed
    );
    LoopExit::Finished
}
