use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_INTERVAL_SECS: u32 = 60;
pub const DEFAULT_SESSION_SECS: u32 = 600;
pub const DEFAULT_ROUND_SECS: u32 = 180;
pub const DEFAULT_REPS_PER_SET: u32 = 1;
pub const DEFAULT_INTRA_REST_SECS: u32 = 0;

/// Training modality. Selects which expansion the generator uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Series,
    Cluster,
    Emom,
    Tabata,
    Boxing,
    /// A mode name this build does not recognise (e.g. from a newer config file).
    #[serde(other)]
    Unknown,
}

impl TimerMode {
    /// The selectable modes, in menu order.
    pub const ALL: [TimerMode; 5] = [
        TimerMode::Series,
        TimerMode::Cluster,
        TimerMode::Emom,
        TimerMode::Tabata,
        TimerMode::Boxing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Series => "series",
            TimerMode::Cluster => "cluster",
            TimerMode::Emom => "emom",
            TimerMode::Tabata => "tabata",
            TimerMode::Boxing => "boxing",
            TimerMode::Unknown => "unknown",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TimerMode::Series => "Traditional Sets",
            TimerMode::Cluster => "Cluster Training",
            TimerMode::Emom => "EMOM",
            TimerMode::Tabata => "Tabata",
            TimerMode::Boxing => "Boxing / MMA",
            TimerMode::Unknown => "Unknown",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TimerMode::Series => "Standard work/rest intervals for strength or hypertrophy.",
            TimerMode::Cluster => "High intensity with micro-rests inside the same set.",
            TimerMode::Emom => "Every minute on the minute. Your pace is your rest.",
            TimerMode::Tabata => "Maximum burn. 20s work, 10s rest.",
            TimerMode::Boxing => "Rounds with a final warning and bell cues.",
            TimerMode::Unknown => "",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "series" => Ok(TimerMode::Series),
            "cluster" => Ok(TimerMode::Cluster),
            "emom" => Ok(TimerMode::Emom),
            "tabata" => Ok(TimerMode::Tabata),
            "boxing" => Ok(TimerMode::Boxing),
            _ => Err(ValidationError::UnknownMode(s.to_string())),
        }
    }
}

/// User-supplied training parameters. All durations are whole seconds.
///
/// Values are taken as given: zero durations and zero counts are legal and
/// the generator degrades gracefully on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub mode: TimerMode,
    /// Primary repetitions (sets, rounds). Ignored by EMOM.
    pub sets: u32,
    pub work_time: u32,
    pub rest_time: u32,
    pub prep_time: u32,

    // Cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intra_rest_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps_per_set: Option<u32>,

    // EMOM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_session_time: Option<u32>,

    // Boxing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_time: Option<u32>,
}

impl TimerConfig {
    /// A config with only the common fields set.
    pub fn new(mode: TimerMode, sets: u32, work_time: u32, rest_time: u32, prep_time: u32) -> Self {
        Self {
            mode,
            sets,
            work_time,
            rest_time,
            prep_time,
            intra_rest_time: None,
            reps_per_set: None,
            interval_time: None,
            total_session_time: None,
            round_time: None,
            warning_time: None,
        }
    }

    /// The preset a fresh setup screen starts from.
    pub fn defaults_for(mode: TimerMode) -> Self {
        match mode {
            TimerMode::Series => Self::new(mode, 4, 45, 60, 5),
            TimerMode::Tabata => Self::new(mode, 8, 20, 10, 5),
            TimerMode::Cluster => Self {
                intra_rest_time: Some(15),
                reps_per_set: Some(5),
                ..Self::new(mode, 3, 0, 180, 5)
            },
            TimerMode::Emom => Self {
                interval_time: Some(DEFAULT_INTERVAL_SECS),
                total_session_time: Some(DEFAULT_SESSION_SECS),
                ..Self::new(mode, 10, 0, 0, 5)
            },
            TimerMode::Boxing => Self {
                round_time: Some(DEFAULT_ROUND_SECS),
                warning_time: Some(10),
                ..Self::new(mode, 3, 180, 60, 5)
            },
            TimerMode::Unknown => Self::new(mode, 1, 60, 30, 5),
        }
    }

    // Absent and zero are treated alike for these, matching how the
    // setup screen falls back to its defaults.

    pub fn effective_reps(&self) -> u32 {
        self.reps_per_set.filter(|&r| r > 0).unwrap_or(DEFAULT_REPS_PER_SET)
    }

    pub fn effective_intra_rest(&self) -> u32 {
        self.intra_rest_time.unwrap_or(DEFAULT_INTRA_REST_SECS)
    }

    pub fn effective_interval(&self) -> u32 {
        self.interval_time.filter(|&i| i > 0).unwrap_or(DEFAULT_INTERVAL_SECS)
    }

    pub fn effective_session(&self) -> u32 {
        self.total_session_time.filter(|&t| t > 0).unwrap_or(DEFAULT_SESSION_SECS)
    }

    pub fn effective_round(&self) -> u32 {
        self.round_time.filter(|&r| r > 0).unwrap_or(DEFAULT_ROUND_SECS)
    }

    /// Final-warning threshold, if one is armed. Zero disables it.
    pub fn effective_warning(&self) -> Option<u32> {
        self.warning_time.filter(|&w| w > 0)
    }

    /// Number of primary units the mode expands into.
    pub fn unit_count(&self) -> u32 {
        match self.mode {
            TimerMode::Emom => self.effective_session() / self.effective_interval(),
            _ => self.sets,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::defaults_for(TimerMode::Series)
    }
}
