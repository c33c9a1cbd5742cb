use std::collections::HashMap;
use std::time::Duration;

use eisen_matrix::{
  TimerToken,
  UndoScheduler
};
use gloo::timers::callback::Timeout;
use yew::Callback;

/// One `setTimeout` per token. Firing emits
/// the token on `on_fire`; dropping the
/// `Timeout` clears it.
pub struct BrowserScheduler {
  timeouts: HashMap<TimerToken, Timeout>,
  on_fire:  Callback<TimerToken>
}

impl BrowserScheduler {
  pub fn new(
    on_fire: Callback<TimerToken>
  ) -> Self {
    Self {
      timeouts: HashMap::new(),
      on_fire
    }
  }

  /// Drops the handle of a timer that has
  /// already fired.
  pub fn forget(&mut self, token: TimerToken) {
    self.timeouts.remove(&token);
  }
}

impl UndoScheduler for BrowserScheduler {
  fn schedule(
    &mut self,
    token: TimerToken,
    after: Duration
  ) {
    let millis =
      u32::try_from(after.as_millis())
        .unwrap_or(u32::MAX);
    let on_fire = self.on_fire.clone();
    let timeout =
      Timeout::new(millis, move || {
        on_fire.emit(token);
      });
    tracing::debug!(
      ?token,
      millis,
      "scheduled undo expiry"
    );
    self.timeouts.insert(token, timeout);
  }

  fn cancel(&mut self, token: TimerToken) {
    if let Some(timeout) =
      self.timeouts.remove(&token)
    {
      timeout.cancel();
    }
  }
}
