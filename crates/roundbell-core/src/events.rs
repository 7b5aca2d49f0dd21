use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{PhaseType, TimerSegment, TimerState};

/// Discrete feedback request for the audio/haptic collaborator.
///
/// The core only decides when a cue fires; how it sounds is up to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cue {
    /// One of the final seconds before a transition.
    CountdownTick,
    /// A new segment has begun.
    PhaseStart,
    /// The last segment finished.
    SessionEnd,
    /// Boxing round is about to end.
    FinalWarning,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::CountdownTick => "countdown-tick",
            Cue::PhaseStart => "phase-start",
            Cue::SessionEnd => "session-end",
            Cue::FinalWarning => "final-warning",
        }
    }
}

/// Consumer of cues. Fire-and-forget: implementations must not block.
pub trait CueSink {
    fn cue(&mut self, cue: Cue);
}

/// Discards every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl CueSink for NullSink {
    fn cue(&mut self, _cue: Cue) {}
}

/// Collects cues in arrival order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub cues: Vec<Cue>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, cue: Cue) -> usize {
        self.cues.iter().filter(|c| **c == cue).count()
    }
}

impl CueSink for RecordingSink {
    fn cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }
}

impl<S: CueSink + ?Sized> CueSink for &mut S {
    fn cue(&mut self, cue: Cue) {
        (**self).cue(cue)
    }
}

impl<S: CueSink + ?Sized> CueSink for Box<S> {
    fn cue(&mut self, cue: Cue) {
        (**self).cue(cue)
    }
}

/// Lifecycle notifications produced by playback control operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        total_segments: usize,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    Paused {
        segment_index: usize,
        time_remaining: u32,
        at: DateTime<Utc>,
    },
    Resumed {
        segment_index: usize,
        time_remaining: u32,
        at: DateTime<Utc>,
    },
    Reset {
        at: DateTime<Utc>,
    },
    SegmentStarted {
        segment_index: usize,
        phase: PhaseType,
        duration: u32,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        total_segments: usize,
        at: DateTime<Utc>,
    },
}

/// Read-only view of a session for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// `None` only for an empty session.
    pub segment: Option<TimerSegment>,
    pub time_remaining: u32,
    /// 0.0 ..= 1.0 within the current segment.
    pub progress: f64,
    /// 0.0 ..= 1.0 across the whole session.
    pub session_progress: f64,
    pub state: TimerState,
    pub current_index: usize,
    pub total_segments: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Cue::CountdownTick).unwrap(),
            "\"countdown-tick\""
        );
        assert_eq!(
            serde_json::to_string(&Cue::FinalWarning).unwrap(),
            format!("\"{}\"", Cue::FinalWarning.as_str())
        );
    }

    #[test]
    fn recording_sink_through_trait_object() {
        let mut rec = RecordingSink::new();
        {
            let sink: &mut dyn CueSink = &mut rec;
            sink.cue(Cue::PhaseStart);
            sink.cue(Cue::CountdownTick);
            sink.cue(Cue::PhaseStart);
        }
        assert_eq!(rec.count(Cue::PhaseStart), 2);
        assert_eq!(rec.cues[1], Cue::CountdownTick);
    }

    #[test]
    fn event_is_tagged() {
        let ev = Event::Reset { at: Utc::now() };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "Reset");
    }
}
