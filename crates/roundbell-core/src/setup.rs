//! Configuration stepper.
//!
//! The setup screen edits a [`TimerConfig`] one numeric field at a time with
//! `-`/`+` buttons. Durations move in 5 second steps, counts in steps of one,
//! and nothing goes below zero. No other validation happens here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::{format_stepper, TimerConfig, TimerMode};

const TIME_STEP_SECS: u32 = 5;
const COUNT_STEP: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigField {
    Sets,
    WorkTime,
    RestTime,
    PrepTime,
    IntraRestTime,
    RepsPerSet,
    IntervalTime,
    TotalSessionTime,
    RoundTime,
    WarningTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
}

impl ConfigField {
    pub const ALL: [ConfigField; 10] = [
        ConfigField::Sets,
        ConfigField::WorkTime,
        ConfigField::RestTime,
        ConfigField::PrepTime,
        ConfigField::IntraRestTime,
        ConfigField::RepsPerSet,
        ConfigField::IntervalTime,
        ConfigField::TotalSessionTime,
        ConfigField::RoundTime,
        ConfigField::WarningTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigField::Sets => "sets",
            ConfigField::WorkTime => "work_time",
            ConfigField::RestTime => "rest_time",
            ConfigField::PrepTime => "prep_time",
            ConfigField::IntraRestTime => "intra_rest_time",
            ConfigField::RepsPerSet => "reps_per_set",
            ConfigField::IntervalTime => "interval_time",
            ConfigField::TotalSessionTime => "total_session_time",
            ConfigField::RoundTime => "round_time",
            ConfigField::WarningTime => "warning_time",
        }
    }

    pub fn is_time(&self) -> bool {
        !matches!(self, ConfigField::Sets | ConfigField::RepsPerSet)
    }

    pub fn step(&self) -> u32 {
        if self.is_time() {
            TIME_STEP_SECS
        } else {
            COUNT_STEP
        }
    }

    /// Render a value the way the stepper shows it.
    pub fn display(&self, value: u32) -> String {
        if self.is_time() {
            format_stepper(value)
        } else {
            value.to_string()
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        ConfigField::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownField(s.to_string()))
    }
}

/// The fields the setup screen offers for `mode`, with their labels.
/// Preparation is always last.
pub fn fields_for(mode: TimerMode) -> Vec<(ConfigField, &'static str)> {
    use ConfigField::*;
    let mut fields = match mode {
        TimerMode::Series => vec![(Sets, "Sets"), (WorkTime, "Work"), (RestTime, "Rest")],
        TimerMode::Tabata => vec![(Sets, "Rounds"), (WorkTime, "Work"), (RestTime, "Rest")],
        TimerMode::Cluster => vec![
            (Sets, "Number of Sets"),
            (RepsPerSet, "Reps per Set"),
            (IntraRestTime, "Micro Rest (intra-set)"),
            (WorkTime, "Work per Rep"),
            (RestTime, "Rest Between Sets"),
        ],
        TimerMode::Emom => vec![(IntervalTime, "Interval"), (TotalSessionTime, "Total Session")],
        TimerMode::Boxing => vec![
            (Sets, "Rounds"),
            (RoundTime, "Round Length"),
            (RestTime, "Rest"),
            (WarningTime, "Final Warning"),
        ],
        TimerMode::Unknown => Vec::new(),
    };
    fields.push((PrepTime, "Preparation"));
    fields
}

impl TimerConfig {
    /// Current value of `field` as displayed, with absent optionals shown
    /// at their defaults.
    pub fn get(&self, field: ConfigField) -> u32 {
        match field {
            ConfigField::Sets => self.sets,
            ConfigField::WorkTime => self.work_time,
            ConfigField::RestTime => self.rest_time,
            ConfigField::PrepTime => self.prep_time,
            ConfigField::IntraRestTime => self.effective_intra_rest(),
            ConfigField::RepsPerSet => self.reps_per_set.unwrap_or(0),
            ConfigField::IntervalTime => self.effective_interval(),
            ConfigField::TotalSessionTime => self.effective_session(),
            ConfigField::RoundTime => self.effective_round(),
            ConfigField::WarningTime => self.warning_time.unwrap_or(0),
        }
    }

    pub fn set(&mut self, field: ConfigField, value: u32) {
        match field {
            ConfigField::Sets => self.sets = value,
            ConfigField::WorkTime => self.work_time = value,
            ConfigField::RestTime => self.rest_time = value,
            ConfigField::PrepTime => self.prep_time = value,
            ConfigField::IntraRestTime => self.intra_rest_time = Some(value),
            ConfigField::RepsPerSet => self.reps_per_set = Some(value),
            ConfigField::IntervalTime => self.interval_time = Some(value),
            ConfigField::TotalSessionTime => self.total_session_time = Some(value),
            ConfigField::RoundTime => self.round_time = Some(value),
            ConfigField::WarningTime => self.warning_time = Some(value),
        }
    }

    /// Apply one `-`/`+` press. Returns the new value.
    pub fn step(&mut self, field: ConfigField, direction: StepDirection) -> u32 {
        let current = self.get(field);
        let next = match direction {
            StepDirection::Up => current.saturating_add(field.step()),
            StepDirection::Down => current.saturating_sub(field.step()),
        };
        self.set(field, next);
        next
    }
}
