//! View and intent handling.
//!
//! Models the three screens of the application (mode selection, setup,
//! active timer) and routes user intents to the right place. The timer
//! view owns the [`PlaybackController`]; leaving it drops the controller,
//! so whatever clock was driving it has nothing left to tick.

use crate::error::{Result, ValidationError};
use crate::events::{Cue, CueSink, Event};
use crate::setup::{ConfigField, StepDirection};
use crate::timer::{PlaybackController, TimerConfig, TimerMode};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Home,
    Setup { draft: TimerConfig },
    Timer {
        config: TimerConfig,
        controller: PlaybackController,
    },
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::Setup { .. } => "setup",
            View::Timer { .. } => "timer",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SelectMode(TimerMode),
    UpdateConfigField(ConfigField, u32),
    StepConfigField(ConfigField, StepDirection),
    StartSession(TimerConfig),
    Pause,
    Resume,
    Reset,
    Exit,
    /// One second of the session clock.
    Tick,
}

impl Intent {
    fn name(&self) -> &'static str {
        match self {
            Intent::SelectMode(_) => "select a mode",
            Intent::UpdateConfigField(..) => "update a config field",
            Intent::StepConfigField(..) => "step a config field",
            Intent::StartSession(_) => "start a session",
            Intent::Pause => "pause",
            Intent::Resume => "resume",
            Intent::Reset => "reset",
            Intent::Exit => "exit",
            Intent::Tick => "tick",
        }
    }
}

/// Application state driven by intents. Cues go to the injected sink.
pub struct App<S: CueSink> {
    view: View,
    sink: S,
}

impl<S: CueSink> App<S> {
    pub fn new(sink: S) -> Self {
        Self {
            view: View::Home,
            sink,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn controller(&self) -> Option<&PlaybackController> {
        match &self.view {
            View::Timer { controller, .. } => Some(controller),
            _ => None,
        }
    }

    /// The setup draft, when in the setup view.
    pub fn draft(&self) -> Option<&TimerConfig> {
        match &self.view {
            View::Setup { draft } => Some(draft),
            _ => None,
        }
    }

    /// Apply an intent. Intents that make no sense for the current view are
    /// rejected and leave the state untouched.
    pub fn handle(&mut self, intent: Intent) -> Result<Option<Event>> {
        let rejected = ValidationError::InvalidIntent {
            intent: intent.name(),
            view: self.view.name(),
        };

        match intent {
            Intent::SelectMode(mode) => {
                if self.view != View::Home {
                    return Err(rejected.into());
                }
                tracing::debug!(%mode, "mode selected");
                self.view = View::Setup {
                    draft: TimerConfig::defaults_for(mode),
                };
                Ok(None)
            }
            Intent::UpdateConfigField(field, value) => match &mut self.view {
                View::Setup { draft } => {
                    draft.set(field, value);
                    Ok(None)
                }
                _ => Err(rejected.into()),
            },
            Intent::StepConfigField(field, direction) => match &mut self.view {
                View::Setup { draft } => {
                    draft.step(field, direction);
                    Ok(None)
                }
                _ => Err(rejected.into()),
            },
            Intent::StartSession(config) => {
                if matches!(self.view, View::Timer { .. }) {
                    return Err(rejected.into());
                }
                let controller = PlaybackController::from_config(&config);
                let event = controller.started_event();
                tracing::info!(
                    mode = %config.mode,
                    segments = controller.segments().len(),
                    "session started"
                );
                self.view = View::Timer { config, controller };
                Ok(Some(event))
            }
            Intent::Exit => {
                self.view = View::Home;
                Ok(None)
            }
            control => {
                let View::Timer { controller, .. } = &mut self.view else {
                    return Err(rejected.into());
                };
                match control {
                    Intent::Pause => Ok(controller.pause()),
                    Intent::Resume => Ok(controller.resume()),
                    Intent::Reset => Ok(controller.reset()),
                    _ => {
                        let cues = controller.tick();
                        let event = if cues
                            .iter()
                            .any(|c| matches!(c, Cue::PhaseStart | Cue::SessionEnd))
                        {
                            controller.segment_event()
                        } else {
                            None
                        };
                        for cue in cues {
                            self.sink.cue(cue);
                        }
                        Ok(event)
                    }
                }
            }
        }
    }
}
