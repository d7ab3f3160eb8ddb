use super::display::DisplayState;
use super::{next_id, placeholder, RunState};
use crate::error::Error;
use crate::event::scheduler::{make_scheduler, SchedulerType};
use crate::event::subscription::Subscription;
use crate::model::broadcast::TimerBroadcastModel;
use crate::model::TimerConfig;

use log::debug;

pub struct TimerBroadcastViewModelBuilder {
  scheduler: SchedulerType,
  config: TimerConfig,
}

impl Default for TimerBroadcastViewModelBuilder {
  fn default() -> Self {
    TimerBroadcastViewModelBuilder {
      scheduler: SchedulerType::Main,
      config: TimerConfig::default(),
    }
  }
}

impl TimerBroadcastViewModelBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// The context display updates run on
  pub fn scheduler(mut self, scheduler: SchedulerType) -> Self {
    self.scheduler = scheduler;
    self
  }

  pub fn config(mut self, config: TimerConfig) -> Self {
    self.config = config;
    self
  }

  pub fn build(self) -> Result<TimerBroadcastViewModel, Error> {
    let id = next_id();
    let scheduler =
      make_scheduler("broadcast-display".to_owned(), id, self.scheduler)?;
    let number_text = DisplayState::new(placeholder(&self.config));
    let model = TimerBroadcastModel::with_config(self.config);
    let display = number_text.clone();
    let subscription = model.subscribe(move |value| {
      display.present(&scheduler, value.to_string());
    });
    debug!("broadcast view-model {} subscribed", id);
    Ok(TimerBroadcastViewModel {
      id,
      model,
      number_text,
      subscription,
    })
  }
}

/// Mirrors the latest number broadcast by a [TimerBroadcastModel].
pub struct TimerBroadcastViewModel {
  id: usize,
  model: TimerBroadcastModel,
  number_text: DisplayState,
  subscription: Subscription,
}

impl TimerBroadcastViewModel {
  pub fn new() -> Result<Self, Error> {
    TimerBroadcastViewModelBuilder::new().build()
  }

  pub fn number_text(&self) -> &DisplayState {
    &self.number_text
  }

  /// Running while the model's timer is active
  pub fn state(&self) -> RunState {
    if self.model.is_running() {
      RunState::Running
    } else {
      RunState::Idle
    }
  }

  pub fn start_timer(&self) {
    self.model.start_timer();
  }

  pub fn stop_timer(&self) {
    self.model.stop_timer();
  }
}

impl Drop for TimerBroadcastViewModel {
  fn drop(&mut self) {
    self.model.stop_timer();
    self.subscription.unsubscribe();
    self.number_text.close();
    debug!("broadcast view-model {} torn down", self.id);
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::utils::testing::{async_context, wait_until};

  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;
  use std::time::Duration;

  const INTERVAL: Duration = Duration::from_millis(20);

  fn blocking(config: TimerConfig) -> TimerBroadcastViewModel {
    TimerBroadcastViewModelBuilder::new()
      .scheduler(SchedulerType::Blocking)
      .config(config)
      .build()
      .unwrap()
  }

  #[test]
  fn placeholder_in_range_test() {
    let view_model = blocking(TimerConfig::new());
    let value: i32 = view_model.number_text().get().parse().unwrap();
    assert!((1..10).contains(&value));
    assert_eq!(view_model.state(), RunState::Idle);
  }

  #[test]
  fn mirrors_broadcast_test() {
    async_context(|| {
      let view_model = blocking(TimerConfig::new().interval(INTERVAL));
      let updates = Arc::new(AtomicUsize::new(0));
      let cloned = updates.clone();
      let _observer = view_model.number_text().observe(move |_: &str| {
        cloned.fetch_add(1, Ordering::Relaxed);
      });
      assert_eq!(updates.load(Ordering::Relaxed), 1);
      view_model.start_timer();
      assert_eq!(view_model.state(), RunState::Running);
      assert!(wait_until(INTERVAL * 10, || {
        updates.load(Ordering::Relaxed) >= 2
      }));
      let value: i32 = view_model.number_text().get().parse().unwrap();
      assert!((1..10).contains(&value));
      view_model.stop_timer();
      assert_eq!(view_model.state(), RunState::Idle);
    });
  }

  #[test]
  fn teardown_freezes_display_test() {
    async_context(|| {
      let view_model = blocking(TimerConfig::new().interval(INTERVAL));
      let display = view_model.number_text().clone();
      let updates = Arc::new(AtomicUsize::new(0));
      let cloned = updates.clone();
      let _observer = display.observe(move |_: &str| {
        cloned.fetch_add(1, Ordering::Relaxed);
      });
      view_model.start_timer();
      assert!(wait_until(INTERVAL * 10, || {
        updates.load(Ordering::Relaxed) >= 2
      }));
      drop(view_model);
      let (count, text) = (updates.load(Ordering::Relaxed), display.get());
      std::thread::sleep(INTERVAL * 3);
      assert_eq!(updates.load(Ordering::Relaxed), count);
      assert_eq!(display.get(), text);
    });
  }

  #[test]
  fn seeded_placeholder_test() {
    let config = TimerConfig::new().seed(7);
    let a = blocking(config.clone());
    let b = blocking(config);
    assert_eq!(a.number_text().get(), b.number_text().get());
  }

  #[test]
  fn state_follows_model_timer_test() {
    let view_model = blocking(TimerConfig::new().interval(INTERVAL));
    view_model.start_timer();
    assert_eq!(view_model.state(), RunState::Running);
    view_model.model.stop_timer();
    assert_eq!(view_model.state(), RunState::Idle);
  }
}
