//! Segment generation.
//!
//! Expands a [`TimerConfig`] into the ordered list of timed phases a session
//! plays back. Generation is pure and total: every config yields a sequence,
//! possibly empty.

use serde::{Deserialize, Serialize};

use super::config::{TimerConfig, TimerMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseType {
    Preparation,
    Work,
    Rest,
    IntraRest,
}

impl PhaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseType::Preparation => "preparation",
            PhaseType::Work => "work",
            PhaseType::Rest => "rest",
            PhaseType::IntraRest => "intra_rest",
        }
    }
}

/// One atomic phase of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSegment {
    pub phase: PhaseType,
    /// Full length in seconds. Countdown start and progress denominator.
    pub duration: u32,
    pub label: String,
    /// 1-based; 0 for the preparation segment.
    pub set_index: u32,
    pub total_sets: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_reps: Option<u32>,
}

impl TimerSegment {
    fn new(phase: PhaseType, duration: u32, label: String, set_index: u32, total_sets: u32) -> Self {
        Self {
            phase,
            duration,
            label,
            set_index,
            total_sets,
            rep_index: None,
            total_reps: None,
        }
    }

    fn with_rep(mut self, rep_index: u32, total_reps: u32) -> Self {
        self.rep_index = Some(rep_index);
        self.total_reps = Some(total_reps);
        self
    }
}

/// Expand a config into its segment sequence.
pub fn generate(config: &TimerConfig) -> Vec<TimerSegment> {
    let mut segments = Vec::new();
    let units = config.unit_count();

    if config.prep_time > 0 {
        segments.push(TimerSegment::new(
            PhaseType::Preparation,
            config.prep_time,
            "Get Ready!".into(),
            0,
            units,
        ));
    }

    match config.mode {
        TimerMode::Series | TimerMode::Tabata => {
            let sets = config.sets;
            for i in 1..=sets {
                segments.push(TimerSegment::new(
                    PhaseType::Work,
                    config.work_time,
                    format!("Set {i}"),
                    i,
                    sets,
                ));
                if i < sets {
                    segments.push(TimerSegment::new(
                        PhaseType::Rest,
                        config.rest_time,
                        "Rest".into(),
                        i,
                        sets,
                    ));
                }
            }
        }
        TimerMode::Cluster => {
            let sets = config.sets;
            let reps = config.effective_reps();
            let intra_rest = config.effective_intra_rest();
            for i in 1..=sets {
                for r in 1..=reps {
                    segments.push(
                        TimerSegment::new(
                            PhaseType::Work,
                            config.work_time,
                            format!("Set {i} - Rep {r}"),
                            i,
                            sets,
                        )
                        .with_rep(r, reps),
                    );
                    if r < reps {
                        segments.push(
                            TimerSegment::new(
                                PhaseType::IntraRest,
                                intra_rest,
                                "Micro Rest".into(),
                                i,
                                sets,
                            )
                            .with_rep(r, reps),
                        );
                    }
                }
                if i < sets {
                    segments.push(TimerSegment::new(
                        PhaseType::Rest,
                        config.rest_time,
                        "Rest Between Sets".into(),
                        i,
                        sets,
                    ));
                }
            }
        }
        TimerMode::Emom => {
            let interval = config.effective_interval();
            // Remainder seconds are dropped, never emitted as a partial interval.
            let count = units;
            let noun = if interval == 60 { "Minute" } else { "Interval" };
            for i in 1..=count {
                segments.push(TimerSegment::new(
                    PhaseType::Work,
                    interval,
                    format!("{noun} {i}"),
                    i,
                    count,
                ));
            }
        }
        TimerMode::Boxing => {
            let sets = config.sets;
            let round = config.effective_round();
            for i in 1..=sets {
                segments.push(TimerSegment::new(
                    PhaseType::Work,
                    round,
                    format!("Round {i}"),
                    i,
                    sets,
                ));
                if i < sets {
                    segments.push(TimerSegment::new(
                        PhaseType::Rest,
                        config.rest_time,
                        "Rest".into(),
                        i,
                        sets,
                    ));
                }
            }
        }
        TimerMode::Unknown => {
            tracing::warn!(
                prep_time = config.prep_time,
                "unrecognised training mode, generating preparation only"
            );
        }
    }

    tracing::debug!(
        mode = %config.mode,
        segments = segments.len(),
        total_secs = total_duration_secs(&segments),
        "generated session"
    );
    segments
}

/// Sum of all segment durations in seconds.
pub fn total_duration_secs(segments: &[TimerSegment]) -> u64 {
    segments.iter().map(|s| u64::from(s.duration)).sum()
}

pub fn count_phase(segments: &[TimerSegment], phase: PhaseType) -> usize {
    segments.iter().filter(|s| s.phase == phase).count()
}

/// Seconds covered by the segments before `index`.
pub fn elapsed_before(segments: &[TimerSegment], index: usize) -> u64 {
    total_duration_secs(&segments[..index.min(segments.len())])
}
