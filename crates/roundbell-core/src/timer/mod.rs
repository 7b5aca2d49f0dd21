mod config;
mod engine;
mod format;
pub mod segment;

pub use config::{
    TimerConfig, TimerMode, DEFAULT_INTERVAL_SECS, DEFAULT_INTRA_REST_SECS, DEFAULT_REPS_PER_SET,
    DEFAULT_ROUND_SECS, DEFAULT_SESSION_SECS,
};
pub use engine::{FinalWarning, PlaybackController, TimerState};
pub use format::{format_stepper, format_time};
pub use segment::{generate, PhaseType, TimerSegment};
