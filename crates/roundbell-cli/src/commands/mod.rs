pub mod config;
pub mod modes;
pub mod plan;
pub mod run;

use clap::Args;
use roundbell_core::{Config, TimerConfig, TimerMode};

/// Per-invocation tweaks applied on top of the stored preset.
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    /// Number of sets / rounds
    #[arg(long)]
    pub sets: Option<u32>,
    /// Work time in seconds
    #[arg(long)]
    pub work: Option<u32>,
    /// Rest time in seconds
    #[arg(long)]
    pub rest: Option<u32>,
    /// Preparation time in seconds (0 to skip)
    #[arg(long)]
    pub prep: Option<u32>,
    /// Cluster: micro rest between reps, in seconds
    #[arg(long)]
    pub intra_rest: Option<u32>,
    /// Cluster: reps per set
    #[arg(long)]
    pub reps: Option<u32>,
    /// EMOM: interval length in seconds
    #[arg(long)]
    pub interval: Option<u32>,
    /// EMOM: total session length in seconds
    #[arg(long)]
    pub session: Option<u32>,
    /// Boxing: round length in seconds
    #[arg(long)]
    pub round: Option<u32>,
    /// Boxing: final warning, seconds before the end of a round (0 disables)
    #[arg(long)]
    pub warning: Option<u32>,
}

impl ConfigOverrides {
    pub fn apply(&self, mut cfg: TimerConfig) -> TimerConfig {
        if let Some(v) = self.sets {
            cfg.sets = v;
        }
        if let Some(v) = self.work {
            cfg.work_time = v;
        }
        if let Some(v) = self.rest {
            cfg.rest_time = v;
        }
        if let Some(v) = self.prep {
            cfg.prep_time = v;
        }
        cfg.intra_rest_time = self.intra_rest.or(cfg.intra_rest_time);
        cfg.reps_per_set = self.reps.or(cfg.reps_per_set);
        cfg.interval_time = self.interval.or(cfg.interval_time);
        cfg.total_session_time = self.session.or(cfg.total_session_time);
        cfg.round_time = self.round.or(cfg.round_time);
        cfg.warning_time = self.warning.or(cfg.warning_time);
        cfg
    }
}

/// Stored preset for `mode` with command-line overrides applied.
pub fn resolve_config(config: &Config, mode: TimerMode, overrides: &ConfigOverrides) -> TimerConfig {
    overrides.apply(config.preset(mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_fields() {
        let overrides = ConfigOverrides {
            sets: Some(2),
            warning: Some(0),
            ..Default::default()
        };
        let cfg = resolve_config(&Config::default(), TimerMode::Boxing, &overrides);
        assert_eq!(cfg.sets, 2);
        assert_eq!(cfg.warning_time, Some(0));
        assert_eq!(cfg.round_time, Some(180));
        assert_eq!(cfg.rest_time, 60);
    }
}
