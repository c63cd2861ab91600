// crates/sync-engine/src/scheduler.rs
//! Timed sync triggers
//!
//! The scheduler owns the clock: one trigger shortly after startup, one every
//! interval, and deferred ones requested after local edits. Each trigger runs
//! as its own task so a stalled fetch never holds up the queue; overlapping
//! triggers are absorbed by the coordinator's in-flight guard.

use crate::engine::SyncCoordinator;
use crate::types::SyncTrigger;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

/// Timing for the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Delay before the first sync after start
    pub startup_delay: Duration,
    /// Period between regular syncs
    pub interval: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            startup_delay: Duration::from_secs(2),
            interval: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
enum SchedulerCommand {
    SyncAfter(Duration),
    Shutdown,
}

/// Cloneable handle for talking to a running scheduler
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    sender: mpsc::UnboundedSender<SchedulerCommand>,
}

impl SchedulerHandle {
    /// Asks for a sync after `delay`
    ///
    /// Returns false if the scheduler has already stopped.
    pub fn request_sync_after(&self, delay: Duration) -> bool {
        self.sender
            .send(SchedulerCommand::SyncAfter(delay))
            .is_ok()
    }

    /// Stops the scheduler loop and drops pending triggers
    pub fn shutdown(&self) {
        if self.sender.send(SchedulerCommand::Shutdown).is_err() {
            log::debug!("Scheduler already stopped");
        }
    }
}

/// Drives a [`SyncCoordinator`] on a timetable
pub struct SyncScheduler {
    coordinator: SyncCoordinator,
    config: ScheduleConfig,
    receiver: mpsc::UnboundedReceiver<SchedulerCommand>,
    sender: mpsc::UnboundedSender<SchedulerCommand>,
}

impl SyncScheduler {
    /// Creates a scheduler and a handle for it
    pub fn new(coordinator: SyncCoordinator, config: ScheduleConfig) -> (Self, SchedulerHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = SchedulerHandle {
            sender: sender.clone(),
        };
        let scheduler = Self {
            coordinator,
            config,
            receiver,
            sender,
        };
        (scheduler, handle)
    }

    /// Returns another handle to this scheduler
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            sender: self.sender.clone(),
        }
    }

    /// Runs the scheduler on a new task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs until [`SchedulerHandle::shutdown`] is called
    pub async fn run(mut self) {
        log::info!(
            "Sync scheduler started (startup delay {:?}, interval {:?})",
            self.config.startup_delay,
            self.config.interval
        );

        let startup = sleep(self.config.startup_delay);
        tokio::pin!(startup);
        let mut startup_pending = true;

        let mut ticker = interval_at(Instant::now() + self.config.interval, self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut triggers: JoinSet<SyncTrigger> = JoinSet::new();

        loop {
            tokio::select! {
                _ = &mut startup, if startup_pending => {
                    startup_pending = false;
                    self.spawn_trigger(&mut triggers, Duration::ZERO, "startup");
                }

                _ = ticker.tick() => {
                    self.spawn_trigger(&mut triggers, Duration::ZERO, "periodic");
                }

                command = self.receiver.recv() => match command {
                    Some(SchedulerCommand::SyncAfter(delay)) => {
                        self.spawn_trigger(&mut triggers, delay, "deferred");
                    }
                    Some(SchedulerCommand::Shutdown) | None => break,
                },

                Some(joined) = triggers.join_next(), if !triggers.is_empty() => {
                    match joined {
                        Ok(SyncTrigger::Skipped) => log::debug!("Trigger skipped, sync already running"),
                        Ok(_) => {}
                        Err(e) => log::error!("Sync trigger task failed: {}", e),
                    }
                }
            }
        }

        triggers.shutdown().await;
        log::info!("Sync scheduler stopped");
    }

    fn spawn_trigger(&self, triggers: &mut JoinSet<SyncTrigger>, delay: Duration, reason: &str) {
        log::debug!("Scheduling {} sync in {:?}", reason, delay);
        let coordinator = self.coordinator.clone();
        triggers.spawn(async move {
            if !delay.is_zero() {
                sleep(delay).await;
            }
            coordinator.trigger_sync().await
        });
    }
}
