use clap::Args;
use roundbell_core::timer::segment::total_duration_secs;
use roundbell_core::{format_time, generate, Config, TimerMode};

use super::{resolve_config, ConfigOverrides};

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Training mode (series, cluster, emom, tabata, boxing)
    pub mode: TimerMode,
    #[command(flatten)]
    pub overrides: ConfigOverrides,
    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let timer_config = resolve_config(&config, args.mode, &args.overrides);
    let segments = generate(&timer_config);

    if args.json {
        let out = serde_json::json!({
            "config": timer_config,
            "segments": segments,
            "total_secs": total_duration_secs(&segments),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{} ({} segments)", args.mode.title(), segments.len());
    for (i, seg) in segments.iter().enumerate() {
        let position = match (seg.rep_index, seg.total_reps) {
            (Some(rep), Some(total)) => format!("{}/{} rep {}/{}", seg.set_index, seg.total_sets, rep, total),
            _ if seg.set_index == 0 => String::new(),
            _ => format!("{}/{}", seg.set_index, seg.total_sets),
        };
        println!(
            "{:>3}  {:<12} {:>6}  {:<24} {}",
            i + 1,
            seg.phase.as_str(),
            format_time(seg.duration),
            seg.label,
            position
        );
    }
    let total = u32::try_from(total_duration_secs(&segments)).unwrap_or(u32::MAX);
    println!("total {}", format_time(total));
    Ok(())
}
