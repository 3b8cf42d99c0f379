//! Periodic auto-save of the live character draft.
//!
//! The scheduler spawns one repeating timer task on the ambient tokio
//! runtime. Each tick reads the current draft through a provider closure
//! and overwrites the single auto-save slot; ticks never fail and never
//! stop the timer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::backup::AutoSaveSlot;
use crate::config::AutoSaveConfig;
use crate::draft::has_populated_fields;
use crate::snapshot::SnapshotStore;

/// Cancels a running auto-save timer.
///
/// Dropping the handle leaves the timer running; call [`cancel`](Self::cancel).
#[derive(Debug)]
pub struct AutoSaveHandle {
    cancelled: Arc<AtomicBool>,
    task: Option<AbortHandle>,
}

impl AutoSaveHandle {
    fn noop() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(true)),
            task: None,
        }
    }

    /// Stop all future ticks. Safe to call any number of times.
    pub fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(task) = &self.task {
            task.abort();
        }
        log::debug!("auto-save cancelled");
    }

    /// Whether a timer was scheduled and has not been cancelled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.is_some() && !self.cancelled.load(Ordering::SeqCst)
    }
}

/// Starts auto-save timers writing into a snapshot store.
#[derive(Debug, Clone)]
pub struct AutoSaveScheduler {
    snapshots: SnapshotStore,
}

impl AutoSaveScheduler {
    /// Scheduler writing into `snapshots`.
    #[must_use]
    pub fn new(snapshots: SnapshotStore) -> Self {
        Self { snapshots }
    }

    /// Start snapshotting `draft_provider()` every `config.interval()`.
    ///
    /// The first tick fires one full interval after the call. Nothing is
    /// scheduled, and a no-op handle is returned, when auto-save is disabled
    /// or no tokio runtime is available on the calling thread.
    pub fn start<F>(
        &self,
        draft_provider: F,
        character_id: Option<&str>,
        config: &AutoSaveConfig,
    ) -> AutoSaveHandle
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        if !config.enable_auto_save {
            return AutoSaveHandle::noop();
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("auto-save requested without a tokio runtime; nothing scheduled");
            return AutoSaveHandle::noop();
        };

        let period = config.interval();
        let first_tick = Instant::now() + period;
        let cancelled = Arc::new(AtomicBool::new(false));
        let snapshots = self.snapshots.clone();
        let character_id = character_id.map(str::to_string);
        let tick_cancelled = Arc::clone(&cancelled);

        let task = runtime.spawn(async move {
            let mut ticker = tokio::time::interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tick_cancelled.load(Ordering::SeqCst) {
                    break;
                }
                save_tick(&snapshots, &draft_provider(), character_id.as_deref());
            }
        });

        log::debug!("auto-save scheduled every {}ms", period.as_millis());
        AutoSaveHandle {
            cancelled,
            task: Some(task.abort_handle()),
        }
    }
}

/// One auto-save tick: skip empty drafts, otherwise overwrite the slot.
///
/// Returns whether a write landed.
pub fn save_tick(snapshots: &SnapshotStore, draft: &Value, character_id: Option<&str>) -> bool {
    if !has_populated_fields(draft) {
        return false;
    }
    let saved = snapshots.write_auto_save(&AutoSaveSlot::capture(draft, character_id));
    if saved {
        log::debug!("auto-saved character draft");
    }
    saved
}
