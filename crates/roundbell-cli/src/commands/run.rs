use std::io::{IsTerminal, Write};
use std::time::Duration;

use clap::Args;
use roundbell_core::storage::AudioConfig;
use roundbell_core::{
    format_time, run_session, Config, Control, Cue, CueSink, PlaybackController, RunOptions,
    RunOutcome, Snapshot, TimerMode, TimerState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

use super::{resolve_config, ConfigOverrides};

const BAR_WIDTH: usize = 20;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Training mode (series, cluster, emom, tabata, boxing)
    pub mode: TimerMode,
    #[command(flatten)]
    pub overrides: ConfigOverrides,
    /// Do not print the countdown
    #[arg(long)]
    pub quiet: bool,
    /// Print snapshots as JSON lines instead of the countdown display
    #[arg(long, conflicts_with = "quiet")]
    pub json: bool,
    /// Clock period in milliseconds (overrides clock.tick_ms)
    #[arg(long, hide = true)]
    pub tick_ms: Option<u64>,
}

/// Terminal stand-in for the audio collaborator.
struct TerminalBell {
    audio: AudioConfig,
}

impl CueSink for TerminalBell {
    fn cue(&mut self, cue: Cue) {
        tracing::debug!(cue = cue.as_str(), "cue");
        if !self.audio.enabled || !self.audio.bell {
            return;
        }
        let rings = match cue {
            Cue::FinalWarning => 3,
            Cue::SessionEnd => 2,
            Cue::CountdownTick | Cue::PhaseStart => 1,
        };
        let mut err = std::io::stderr();
        let _ = err.write_all("\x07".repeat(rings).as_bytes());
        let _ = err.flush();
    }
}

fn render(snapshot: &Snapshot) -> String {
    let Some(seg) = &snapshot.segment else {
        return "nothing to play".to_string();
    };
    if snapshot.state == TimerState::Completed {
        return "DONE! Great training session.".to_string();
    }
    let filled = (snapshot.progress * BAR_WIDTH as f64).round() as usize;
    let bar = format!("{}{}", "#".repeat(filled.min(BAR_WIDTH)), "-".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)));
    let mut position = if seg.set_index > 0 {
        format!("set {}/{}", seg.set_index, seg.total_sets)
    } else {
        String::new()
    };
    if let (Some(rep), Some(total)) = (seg.rep_index, seg.total_reps) {
        position.push_str(&format!(" rep {rep}/{total}"));
    }
    let paused = if snapshot.state == TimerState::Paused { " [paused]" } else { "" };
    format!(
        "{:<22} {:>6} [{}] {}{}",
        seg.label,
        format_time(snapshot.time_remaining),
        bar,
        position,
        paused
    )
}

fn parse_control(line: &str) -> Option<Control> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "p" | "space" => Some(Control::Toggle),
        "pause" => Some(Control::Pause),
        "resume" => Some(Control::Resume),
        "r" | "reset" => Some(Control::Reset),
        "q" | "quit" | "exit" => Some(Control::Exit),
        _ => None,
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let timer_config = resolve_config(&config, args.mode, &args.overrides);
    let period = args
        .tick_ms
        .map(|ms| Duration::from_millis(ms.max(1)))
        .unwrap_or_else(|| config.tick_period());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(session(args, config, timer_config, period));
    // A pending stdin read would otherwise hold shutdown open.
    runtime.shutdown_background();
    result
}

async fn session(
    args: RunArgs,
    config: Config,
    timer_config: roundbell_core::TimerConfig,
    period: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let controller = PlaybackController::from_config(&timer_config);
    let (control_tx, control_rx) = mpsc::channel(8);
    let (snap_tx, mut snap_rx) = watch::channel(controller.snapshot());

    let interactive = std::io::stdout().is_terminal();
    if interactive && !args.quiet && !args.json {
        eprintln!("{} - Enter: pause/resume, r: reset, q: quit", args.mode.title());
    }

    let stdin_tx = control_tx.clone();
    let stdin_task = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_control(&line) {
                Some(control) => {
                    if stdin_tx.send(control).await.is_err() {
                        break;
                    }
                }
                None => tracing::warn!(input = %line, "unrecognised control"),
            }
        }
    });

    let signal_tx = control_tx;
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = signal_tx.send(Control::Exit).await;
        }
    });

    let (quiet, json) = (args.quiet, args.json);
    let display_task = tokio::spawn(async move {
        let mut out = std::io::stdout();
        loop {
            {
                let snapshot = snap_rx.borrow_and_update();
                if json {
                    if let Ok(line) = serde_json::to_string(&*snapshot) {
                        let _ = writeln!(out, "{line}");
                    }
                } else if !quiet {
                    if interactive {
                        let _ = write!(out, "\r\x1b[2K{}", render(&snapshot));
                    } else {
                        let _ = writeln!(out, "{}", render(&snapshot));
                    }
                }
                let _ = out.flush();
            }
            if snap_rx.changed().await.is_err() {
                break;
            }
        }
        if interactive && !quiet && !json {
            let _ = writeln!(out);
        }
    });

    let sink = TerminalBell {
        audio: config.audio.clone(),
    };
    let options = RunOptions {
        period,
        exit_on_complete: true,
    };
    let (controller, outcome) = run_session(controller, sink, control_rx, Some(snap_tx), options).await;

    stdin_task.abort();
    signal_task.abort();
    display_task.await?;

    tracing::info!(
        ?outcome,
        index = controller.current_index(),
        segments = controller.segments().len(),
        "session finished"
    );
    if outcome == RunOutcome::Exited && !json {
        eprintln!("session stopped");
    }
    Ok(())
}
