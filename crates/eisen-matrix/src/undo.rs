//! One-slot soft delete.
//!
//! The controller keeps only the most
//! recent deletion. Each deletion gets a
//! fresh `TimerToken`; an expiry carrying
//! an older token is ignored, so a stale
//! timer can never close a newer window.

use std::time::Duration;

use chrono::{
  DateTime,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  info
};

use crate::board::DeletedTask;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::storage::StorageAdapter;

pub const DEFAULT_UNDO_WINDOW: Duration =
  Duration::from_secs(6);

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
)]
pub struct TimerToken(u64);

/// Single-shot, cancellable deferred
/// callbacks. When a scheduled timer fires
/// the owner calls
/// [`UndoController::expire`] with its
/// token.
pub trait UndoScheduler {
  fn schedule(
    &mut self,
    token: TimerToken,
    after: Duration
  );

  fn cancel(&mut self, token: TimerToken);
}

/// Scheduler whose timers only fire when
/// the caller says so.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
  pub scheduled: Vec<(TimerToken, Duration)>,
  pub cancelled: Vec<TimerToken>
}

impl ManualScheduler {
  pub fn active(&self) -> Vec<TimerToken> {
    self
      .scheduled
      .iter()
      .map(|(token, _)| *token)
      .filter(|token| {
        !self.cancelled.contains(token)
      })
      .collect()
  }
}

impl UndoScheduler for ManualScheduler {
  fn schedule(
    &mut self,
    token: TimerToken,
    after: Duration
  ) {
    self.scheduled.push((token, after));
  }

  fn cancel(&mut self, token: TimerToken) {
    self.cancelled.push(token);
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct PendingUndo {
  #[serde(flatten)]
  pub deleted:    DeletedTask,
  pub deleted_at: DateTime<Utc>
}

impl PendingUndo {
  /// Time left in the window, `None` once
  /// it has closed.
  pub fn remaining(
    &self,
    window: Duration,
    now: DateTime<Utc>
  ) -> Option<Duration> {
    let elapsed = (now - self.deleted_at)
      .to_std()
      .unwrap_or(Duration::ZERO);
    window
      .checked_sub(elapsed)
      .filter(|left| !left.is_zero())
  }
}

#[derive(Debug)]
struct Slot {
  pending: PendingUndo,
  token:   TimerToken
}

#[derive(Debug)]
pub struct UndoController<S> {
  scheduler:  S,
  window:     Duration,
  slot:       Option<Slot>,
  next_token: u64
}

impl<S: UndoScheduler> UndoController<S> {
  pub fn new(
    scheduler: S,
    window: Duration
  ) -> Self {
    Self {
      scheduler,
      window,
      slot: None,
      next_token: 0
    }
  }

  /// Rebuilds a controller from a persisted
  /// slot, arming a timer for whatever is
  /// left of its window.
  pub fn resume(
    scheduler: S,
    window: Duration,
    pending: Option<PendingUndo>,
    now: DateTime<Utc>
  ) -> Self {
    let mut controller =
      Self::new(scheduler, window);
    if let Some(pending) = pending {
      match pending.remaining(window, now) {
        | Some(left) => {
          controller.arm(pending, left);
        }
        | None => {
          debug!(
            task = %pending.deleted.task.id,
            "persisted undo window already \
             closed"
          );
        }
      }
    }
    controller
  }

  pub fn window(&self) -> Duration {
    self.window
  }

  pub fn pending(
    &self
  ) -> Option<&PendingUndo> {
    self.slot.as_ref().map(|slot| &slot.pending)
  }

  pub fn scheduler(&self) -> &S {
    &self.scheduler
  }

  pub fn scheduler_mut(&mut self) -> &mut S {
    &mut self.scheduler
  }

  /// Replaces whatever was pending. The
  /// previous deletion is gone for good.
  #[tracing::instrument(
    skip(self, deleted),
    fields(task = %deleted.task.id, cell = %deleted.cell)
  )]
  pub fn on_delete(
    &mut self,
    deleted: DeletedTask,
    now: DateTime<Utc>
  ) -> TimerToken {
    self.clear();
    self.arm(
      PendingUndo {
        deleted,
        deleted_at: now
      },
      self.window
    )
  }

  /// Closes the window if `token` belongs
  /// to the current slot. Returns whether
  /// anything was cleared.
  pub fn expire(
    &mut self,
    token: TimerToken
  ) -> bool {
    let current =
      self.slot.as_ref().map(|slot| slot.token);
    if current != Some(token) {
      debug!(?token, "ignoring stale undo timer");
      return false;
    }
    debug!(?token, "undo window expired");
    self.slot = None;
    true
  }

  /// Puts the pending task back where it
  /// was. `Ok(None)` when nothing is
  /// pending.
  #[tracing::instrument(skip(self, matrix))]
  pub fn restore<A: StorageAdapter>(
    &mut self,
    matrix: &mut Matrix<A>
  ) -> Result<Option<usize>> {
    let Some(slot) = self.slot.take() else {
      return Ok(None);
    };
    self.scheduler.cancel(slot.token);
    let index = matrix
      .restore_task(slot.pending.deleted, None)?;
    info!(index, "undo restored task");
    Ok(Some(index))
  }

  /// Closes the window early without
  /// restoring.
  pub fn dismiss(&mut self) {
    self.clear();
  }

  fn clear(&mut self) {
    if let Some(slot) = self.slot.take() {
      self.scheduler.cancel(slot.token);
    }
  }

  fn arm(
    &mut self,
    pending: PendingUndo,
    after: Duration
  ) -> TimerToken {
    self.next_token += 1;
    let token = TimerToken(self.next_token);
    self.scheduler.schedule(token, after);
    self.slot = Some(Slot { pending, token });
    token
  }
}
