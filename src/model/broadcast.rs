use super::random::RandomNumbers;
use super::{TimerConfig, TimerSlot};
use crate::event::subject::{PassthroughSubject, Subject};
use crate::event::subscription::Subscription;

use std::sync::{Arc, Mutex};

/// Broadcasts a random number to every current subscriber on each timer tick.
///
/// Values are delivered on the timer thread. Subscribers registered while the
/// timer runs only see the values drawn after they subscribed.
pub struct TimerBroadcastModel {
  subject: Arc<PassthroughSubject<i32>>,
  numbers: Arc<Mutex<RandomNumbers>>,
  config: TimerConfig,
  timer: TimerSlot,
}

impl Default for TimerBroadcastModel {
  fn default() -> Self {
    Self::with_config(TimerConfig::default())
  }
}

impl TimerBroadcastModel {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_config(config: TimerConfig) -> Self {
    let subject = PassthroughSubject::new();
    let owner = format!("broadcast model {}", subject.id());
    TimerBroadcastModel {
      subject,
      numbers: Arc::new(Mutex::new(RandomNumbers::new(
        config.range.clone(),
        config.seed,
      ))),
      config,
      timer: TimerSlot::new(owner),
    }
  }

  pub fn config(&self) -> &TimerConfig {
    &self.config
  }

  /// Starts broadcasting, replacing the running timer if there is one
  pub fn start_timer(&self) {
    let subject = self.subject.clone();
    let numbers = self.numbers.clone();
    self.timer.start(self.config.interval, move || {
      let value = numbers.lock().unwrap().draw();
      subject.next(value);
    });
  }

  pub fn stop_timer(&self) {
    self.timer.stop();
  }

  pub fn is_running(&self) -> bool {
    self.timer.running()
  }

  pub fn subscribe<F>(&self, handler: F) -> Subscription
  where
    F: Fn(i32) + Send + Sync + 'static,
  {
    self.subject.subscribe(handler)
  }
}

impl Drop for TimerBroadcastModel {
  fn drop(&mut self) {
    self.timer.stop();
    self.subject.finish();
  }
}
