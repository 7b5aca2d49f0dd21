//! Session clock.
//!
//! Drives a [`PlaybackController`] from a tokio interval. The interval only
//! advances the controller while it is running, and it lives inside the
//! future: dropping the future (or sending [`Control::Exit`]) detaches the
//! clock for good.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::events::{CueSink, Snapshot};
use crate::timer::PlaybackController;

/// User control requests delivered while a session is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Pause,
    Resume,
    Toggle,
    Reset,
    Exit,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Length of one clock tick. One second in real use.
    pub period: Duration,
    /// Return as soon as the session completes instead of waiting for a
    /// reset or exit.
    pub exit_on_complete: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            exit_on_complete: true,
        }
    }
}

/// Why [`run_session`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Exited,
    /// Paused with no way left to resume (controls closed).
    Stalled,
}

/// Run a session until it completes, the user exits, or it can make no
/// further progress. Returns the controller in its final state.
pub async fn run_session<S: CueSink>(
    mut controller: PlaybackController,
    mut sink: S,
    mut controls: mpsc::Receiver<Control>,
    snapshots: Option<watch::Sender<Snapshot>>,
    options: RunOptions,
) -> (PlaybackController, RunOutcome) {
    let publish = |ctl: &PlaybackController| {
        if let Some(tx) = &snapshots {
            // No receivers left is fine; nobody is watching.
            let _ = tx.send(ctl.snapshot());
        }
    };

    let mut clock = interval_at(Instant::now() + options.period, options.period);
    clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut controls_open = true;

    publish(&controller);

    loop {
        if controller.is_completed() && options.exit_on_complete {
            return (controller, RunOutcome::Completed);
        }
        if !controls_open && !controller.is_running() {
            let outcome = if controller.is_completed() {
                RunOutcome::Completed
            } else {
                RunOutcome::Stalled
            };
            return (controller, outcome);
        }

        tokio::select! {
            _ = clock.tick(), if controller.is_running() => {
                for cue in controller.tick() {
                    sink.cue(cue);
                }
                publish(&controller);
            }
            cmd = controls.recv(), if controls_open => {
                let Some(cmd) = cmd else {
                    tracing::debug!("control channel closed");
                    controls_open = false;
                    continue;
                };
                let was_running = controller.is_running();
                let event = match cmd {
                    Control::Pause => controller.pause(),
                    Control::Resume => controller.resume(),
                    Control::Toggle => controller.toggle(),
                    Control::Reset => controller.reset(),
                    Control::Exit => {
                        tracing::debug!(index = controller.current_index(), "session exited");
                        return (controller, RunOutcome::Exited);
                    }
                };
                if let Some(event) = event {
                    tracing::debug!(?event, "control applied");
                }
                if !was_running && controller.is_running() {
                    // A fresh full second after resuming, not a partial one.
                    clock.reset();
                }
                publish(&controller);
            }
        }
    }
}
