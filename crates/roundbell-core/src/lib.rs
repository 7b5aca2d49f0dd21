//! # Roundbell Core Library
//!
//! This library provides the core logic for the Roundbell interval-training
//! timer. Front ends (the bundled CLI, or any GUI) choose a training mode,
//! edit its parameters, and then drive a session one second at a time.
//!
//! ## Architecture
//!
//! - **Segment Generator**: a pure function expanding a [`TimerConfig`] into
//!   the ordered list of timed phases (preparation, work, rest, micro-rest)
//! - **Playback Controller**: a state machine stepping through those phases;
//!   the caller invokes `tick()` once per second and forwards the returned
//!   [`Cue`]s to whatever makes sound
//! - **Runner**: a tokio driver owning the one-second clock
//! - **Storage**: TOML-based configuration with per-mode presets
//!
//! ## Key Components
//!
//! - [`generate`]: Segment generator
//! - [`PlaybackController`]: Core playback state machine
//! - [`App`]: View and intent handling for front ends
//! - [`Config`]: Application configuration management

pub mod app;
pub mod error;
pub mod events;
pub mod runner;
pub mod setup;
pub mod storage;
pub mod timer;

pub use app::{App, Intent, View};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::{Cue, CueSink, Event, NullSink, RecordingSink, Snapshot};
pub use runner::{run_session, Control, RunOptions, RunOutcome};
pub use setup::{fields_for, ConfigField, StepDirection};
pub use storage::Config;
pub use timer::{
    format_time, generate, FinalWarning, PhaseType, PlaybackController, TimerConfig, TimerMode,
    TimerSegment, TimerState,
};
