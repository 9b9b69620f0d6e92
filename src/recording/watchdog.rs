// ABOUTME: Background pause watchdog bound to the active lifetime of a recorder
// ABOUTME: Periodic tokio task with cooperative cancellation, failures are only logged
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, trace, warn};

use super::recorder::RecorderInner;

/// Spawn the watchdog on the current tokio runtime.
///
/// Without a runtime the recorder keeps working but never auto-pauses.
pub fn spawn(
    recorder: Weak<RecorderInner>,
    shutdown: Arc<Notify>,
    period: Duration,
) -> Option<JoinHandle<()>> {
    let Ok(runtime) = Handle::try_current() else {
        warn!("No async runtime available, automatic pause detection disabled");
        return None;
    };
    Some(runtime.spawn(run(recorder, shutdown, period)))
}

async fn run(recorder: Weak<RecorderInner>, shutdown: Arc<Notify>, period: Duration) {
    let mut interval = time::interval(period.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            () = shutdown.notified() => {
                debug!("Pause watchdog received shutdown signal");
                break;
            }
        }

        let Some(inner) = recorder.upgrade() else {
            break;
        };
        if !inner.is_active() {
            break;
        }
        match inner.check_auto_pause() {
            Ok(action) => trace!(recorder.id = %inner.id, ?action, "Pause watchdog poll"),
            Err(e) => {
                error!(
                    recorder.id = %inner.id,
                    error = %e,
                    "Pause watchdog failed, automatic pause detection stopped"
                );
                break;
            }
        }
    }
    debug!("Pause watchdog exited");
}
