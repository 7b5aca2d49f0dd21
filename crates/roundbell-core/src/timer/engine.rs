//! Playback controller.
//!
//! Steps through a generated segment sequence one second per `tick()`.
//! There is no internal clock: the caller (see [`crate::runner`]) owns the
//! one-second source and must stop calling `tick()` while paused.
//!
//! ## State Transitions
//!
//! ```text
//! Running <-> Paused
//! Running -> Completed      (transition off the last segment)
//! Completed -> Paused       (reset)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut ctl = PlaybackController::from_config(&config);
//! // Once per second while running:
//! for cue in ctl.tick() {
//!     sink.cue(cue);
//! }
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::config::{TimerConfig, TimerMode};
use super::segment::{self, PhaseType, TimerSegment};
use crate::events::{Cue, Event, Snapshot};

/// Countdown cues fire while the remaining time is in `(1, 4]`.
const COUNTDOWN_UPPER_SECS: u32 = 4;
const COUNTDOWN_LOWER_SECS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Running,
    Paused,
    Completed,
}

impl TimerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Completed => "completed",
        }
    }
}

/// Boxing "seconds left" bell, armed for work segments of round length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalWarning {
    pub threshold_secs: u32,
    pub round_secs: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackController {
    segments: Arc<[TimerSegment]>,
    current_index: usize,
    time_remaining: u32,
    running: bool,
    completed: bool,
    final_warning: Option<FinalWarning>,
    /// Segment index whose final warning has already fired.
    warned_index: Option<usize>,
}

impl PlaybackController {
    /// Begin a session. Starts running, or completed if there is nothing to play.
    pub fn start(segments: impl Into<Arc<[TimerSegment]>>) -> Self {
        let segments = segments.into();
        let empty = segments.is_empty();
        let time_remaining = segments.first().map(|s| s.duration).unwrap_or(0);
        if empty {
            tracing::debug!("empty session, starting completed");
        }
        Self {
            segments,
            current_index: 0,
            time_remaining,
            running: !empty,
            completed: empty,
            final_warning: None,
            warned_index: None,
        }
    }

    /// Generate segments from `config` and start them, arming the boxing
    /// final warning when configured.
    pub fn from_config(config: &TimerConfig) -> Self {
        let ctl = Self::start(segment::generate(config));
        match (config.mode, config.effective_warning()) {
            (TimerMode::Boxing, Some(threshold_secs)) => ctl.with_final_warning(FinalWarning {
                threshold_secs,
                round_secs: config.effective_round(),
            }),
            _ => ctl,
        }
    }

    pub fn with_final_warning(mut self, warning: FinalWarning) -> Self {
        self.final_warning = Some(warning);
        self
    }

    /// Lifecycle event announcing this session.
    pub fn started_event(&self) -> Event {
        Event::SessionStarted {
            total_segments: self.segments.len(),
            total_secs: segment::total_duration_secs(&self.segments),
            at: Utc::now(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        if self.completed {
            TimerState::Completed
        } else if self.running {
            TimerState::Running
        } else {
            TimerState::Paused
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn segments(&self) -> &Arc<[TimerSegment]> {
        &self.segments
    }

    pub fn current_segment(&self) -> Option<&TimerSegment> {
        self.segments.get(self.current_index)
    }

    /// 0.0 ..= 1.0 progress within the current segment.
    pub fn progress(&self) -> f64 {
        if self.completed {
            return 1.0;
        }
        match self.current_segment() {
            Some(seg) if seg.duration > 0 => {
                let elapsed = seg.duration.saturating_sub(self.time_remaining);
                f64::from(elapsed) / f64::from(seg.duration)
            }
            _ => 1.0,
        }
    }

    /// 0.0 ..= 1.0 progress across the whole session.
    pub fn session_progress(&self) -> f64 {
        if self.completed {
            return 1.0;
        }
        let total = segment::total_duration_secs(&self.segments);
        if total == 0 {
            return 0.0;
        }
        let done = segment::elapsed_before(&self.segments, self.current_index);
        let current = self
            .current_segment()
            .map(|s| u64::from(s.duration.saturating_sub(self.time_remaining)))
            .unwrap_or(0);
        ((done + current) as f64 / total as f64).min(1.0)
    }

    /// Lifecycle event for the segment the cursor currently points at.
    pub fn segment_event(&self) -> Option<Event> {
        if self.completed {
            return Some(Event::SessionCompleted {
                total_segments: self.segments.len(),
                at: Utc::now(),
            });
        }
        let seg = self.current_segment()?;
        Some(Event::SegmentStarted {
            segment_index: self.current_index,
            phase: seg.phase,
            duration: seg.duration,
            at: Utc::now(),
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            segment: self.current_segment().cloned(),
            time_remaining: self.time_remaining,
            progress: self.progress(),
            session_progress: self.session_progress(),
            state: self.state(),
            current_index: self.current_index,
            total_segments: self.segments.len(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance one second. Returns the cues this second produced, in order.
    ///
    /// Does nothing unless running.
    pub fn tick(&mut self) -> Vec<Cue> {
        let mut cues = Vec::new();
        if !self.running || self.completed {
            return cues;
        }

        let remaining = self.time_remaining;

        if self.final_warning_due(remaining) {
            self.warned_index = Some(self.current_index);
            cues.push(Cue::FinalWarning);
        }

        if remaining > COUNTDOWN_LOWER_SECS && remaining <= COUNTDOWN_UPPER_SECS {
            cues.push(Cue::CountdownTick);
        }

        if remaining <= 1 {
            // The transition spends this second; the next segment is not
            // counted down until the following tick.
            cues.push(self.advance());
        } else {
            self.time_remaining = remaining - 1;
        }

        cues
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.completed || !self.running {
            return None;
        }
        self.running = false;
        Some(Event::Paused {
            segment_index: self.current_index,
            time_remaining: self.time_remaining,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.completed || self.running {
            return None;
        }
        self.running = true;
        Some(Event::Resumed {
            segment_index: self.current_index,
            time_remaining: self.time_remaining,
            at: Utc::now(),
        })
    }

    /// Flip between running and paused. No-op once completed.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.running {
            self.pause()
        } else {
            self.resume()
        }
    }

    /// Back to the first segment, paused.
    ///
    /// An empty session has nothing to rewind to and stays completed.
    pub fn reset(&mut self) -> Option<Event> {
        self.current_index = 0;
        self.time_remaining = self.segments.first().map(|s| s.duration).unwrap_or(0);
        self.running = false;
        self.completed = self.segments.is_empty();
        self.warned_index = None;
        Some(Event::Reset { at: Utc::now() })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn final_warning_due(&self, remaining: u32) -> bool {
        let Some(warning) = self.final_warning else {
            return false;
        };
        let Some(seg) = self.current_segment() else {
            return false;
        };
        seg.phase == PhaseType::Work
            && seg.duration == warning.round_secs
            && remaining <= warning.threshold_secs
            && self.warned_index != Some(self.current_index)
    }

    fn advance(&mut self) -> Cue {
        if self.current_index + 1 < self.segments.len() {
            self.current_index += 1;
            self.time_remaining = self.segments[self.current_index].duration;
            tracing::debug!(
                index = self.current_index,
                phase = self.segments[self.current_index].phase.as_str(),
                duration = self.time_remaining,
                "segment started"
            );
            Cue::PhaseStart
        } else {
            self.time_remaining = 0;
            self.completed = true;
            self.running = false;
            tracing::debug!(segments = self.segments.len(), "session completed");
            Cue::SessionEnd
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(phase: PhaseType, duration: u32) -> TimerSegment {
        TimerSegment {
            phase,
            duration,
            label: String::new(),
            set_index: 1,
            total_sets: 1,
            rep_index: None,
            total_reps: None,
        }
    }

    #[test]
    fn starts_running_on_first_segment() {
        let ctl = PlaybackController::start(vec![seg(PhaseType::Work, 5), seg(PhaseType::Rest, 3)]);
        assert_eq!(ctl.state(), TimerState::Running);
        assert_eq!(ctl.current_index(), 0);
        assert_eq!(ctl.time_remaining(), 5);
        assert_eq!(ctl.progress(), 0.0);
    }

    #[test]
    fn empty_session_starts_completed() {
        let mut ctl = PlaybackController::start(Vec::<TimerSegment>::new());
        assert_eq!(ctl.state(), TimerState::Completed);
        assert_eq!(ctl.progress(), 1.0);
        assert!(ctl.tick().is_empty());
        assert!(ctl.resume().is_none());
        ctl.reset();
        assert_eq!(ctl.state(), TimerState::Completed);
        assert!(ctl.snapshot().segment.is_none());
    }

    #[test]
    fn countdown_cues_at_four_three_two() {
        let mut ctl = PlaybackController::start(vec![seg(PhaseType::Work, 6), seg(PhaseType::Rest, 3)]);
        let mut per_tick = Vec::new();
        for _ in 0..6 {
            per_tick.push(ctl.tick());
        }
        assert!(per_tick[0].is_empty()); // 6 -> 5
        assert!(per_tick[1].is_empty()); // 5 -> 4
        assert_eq!(per_tick[2], vec![Cue::CountdownTick]); // 4 -> 3
        assert_eq!(per_tick[3], vec![Cue::CountdownTick]); // 3 -> 2
        assert_eq!(per_tick[4], vec![Cue::CountdownTick]); // 2 -> 1
        assert_eq!(per_tick[5], vec![Cue::PhaseStart]); // 1 -> next
        assert_eq!(ctl.current_index(), 1);
        assert_eq!(ctl.time_remaining(), 3);
    }

    #[test]
    fn transition_does_not_count_down_new_segment() {
        let mut ctl = PlaybackController::start(vec![seg(PhaseType::Work, 1), seg(PhaseType::Rest, 10)]);
        assert_eq!(ctl.tick(), vec![Cue::PhaseStart]);
        assert_eq!(ctl.time_remaining(), 10);
        ctl.tick();
        assert_eq!(ctl.time_remaining(), 9);
    }

    #[test]
    fn last_segment_completes_session() {
        let mut ctl = PlaybackController::start(vec![seg(PhaseType::Work, 2)]);
        assert_eq!(ctl.tick(), vec![Cue::CountdownTick]);
        assert_eq!(ctl.tick(), vec![Cue::SessionEnd]);
        assert_eq!(ctl.state(), TimerState::Completed);
        assert!(!ctl.is_running());
        assert_eq!(ctl.progress(), 1.0);
        assert_eq!(ctl.current_index(), 0);
        assert!(ctl.tick().is_empty());
    }

    #[test]
    fn zero_duration_segment_is_instantaneous() {
        let mut ctl = PlaybackController::start(vec![seg(PhaseType::IntraRest, 0), seg(PhaseType::Work, 3)]);
        assert_eq!(ctl.progress(), 1.0);
        assert_eq!(ctl.tick(), vec![Cue::PhaseStart]);
        assert_eq!(ctl.current_index(), 1);
    }

    #[test]
    fn pause_resume_are_idempotent() {
        let mut ctl = PlaybackController::start(vec![seg(PhaseType::Work, 10)]);
        assert!(ctl.resume().is_none());
        assert!(ctl.pause().is_some());
        assert!(ctl.pause().is_none());
        assert_eq!(ctl.state(), TimerState::Paused);
        assert!(ctl.tick().is_empty());
        assert_eq!(ctl.time_remaining(), 10);
        assert!(ctl.resume().is_some());
        assert_eq!(ctl.state(), TimerState::Running);
    }

    #[test]
    fn pause_and_resume_noop_when_completed() {
        let mut ctl = PlaybackController::start(vec![seg(PhaseType::Work, 1)]);
        ctl.tick();
        assert!(ctl.pause().is_none());
        assert!(ctl.resume().is_none());
        assert!(ctl.toggle().is_none());
        assert_eq!(ctl.state(), TimerState::Completed);
    }

    #[test]
    fn reset_returns_to_paused_start() {
        let mut ctl = PlaybackController::start(vec![seg(PhaseType::Work, 2), seg(PhaseType::Rest, 2)]);
        for _ in 0..4 {
            ctl.tick();
        }
        assert_eq!(ctl.state(), TimerState::Completed);
        ctl.reset();
        assert_eq!(ctl.state(), TimerState::Paused);
        assert_eq!(ctl.current_index(), 0);
        assert_eq!(ctl.time_remaining(), 2);
    }

    #[test]
    fn final_warning_fires_once_per_round() {
        let mut ctl = PlaybackController::start(vec![
            seg(PhaseType::Work, 12),
            seg(PhaseType::Rest, 12),
            seg(PhaseType::Work, 12),
        ])
        .with_final_warning(FinalWarning {
            threshold_secs: 10,
            round_secs: 12,
        });
        let mut warnings_by_index = Vec::new();
        while !ctl.is_completed() {
            let idx = ctl.current_index();
            let remaining = ctl.time_remaining();
            if ctl.tick().contains(&Cue::FinalWarning) {
                warnings_by_index.push((idx, remaining));
            }
        }
        assert_eq!(warnings_by_index, vec![(0, 10), (2, 10)]);
    }

    #[test]
    fn final_warning_precedes_countdown() {
        let mut ctl = PlaybackController::start(vec![seg(PhaseType::Work, 4)]).with_final_warning(
            FinalWarning {
                threshold_secs: 3,
                round_secs: 4,
            },
        );
        assert_eq!(ctl.tick(), vec![Cue::CountdownTick]);
        assert_eq!(ctl.tick(), vec![Cue::FinalWarning, Cue::CountdownTick]);
    }

    #[test]
    fn from_config_arms_warning_only_for_boxing() {
        let boxing = TimerConfig::defaults_for(TimerMode::Boxing);
        let ctl = PlaybackController::from_config(&boxing);
        assert_eq!(
            ctl.final_warning,
            Some(FinalWarning {
                threshold_secs: 10,
                round_secs: 180
            })
        );

        let series = TimerConfig {
            warning_time: Some(10),
            ..TimerConfig::defaults_for(TimerMode::Series)
        };
        assert!(PlaybackController::from_config(&series).final_warning.is_none());
    }

    #[test]
    fn session_progress_accumulates() {
        let mut ctl = PlaybackController::start(vec![seg(PhaseType::Work, 2), seg(PhaseType::Rest, 2)]);
        assert_eq!(ctl.session_progress(), 0.0);
        ctl.tick(); // 2 -> 1
        assert_eq!(ctl.session_progress(), 0.25);
        ctl.tick(); // -> rest, full
        assert_eq!(ctl.session_progress(), 0.5);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut ctl = PlaybackController::start(vec![seg(PhaseType::Work, 4)]);
        ctl.tick();
        ctl.pause();
        let snap = ctl.snapshot();
        assert_eq!(snap.state, TimerState::Paused);
        assert_eq!(snap.time_remaining, 3);
        assert_eq!(snap.progress, 0.25);
        assert_eq!(snap.total_segments, 1);
        assert_eq!(snap.segment.map(|s| s.phase), Some(PhaseType::Work));
    }
}
