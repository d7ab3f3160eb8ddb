//! Models turn a discrete trigger into a sequence of event values:
//! * `tap` broadcasts a zero payload event whenever it is notified.
//! * `broadcast` broadcasts a random number on every timer tick.
//! * `stream` feeds a random number on every timer tick into a pull based
//!   asynchronous sequence.
use crate::event::sequence::BufferingPolicy;
use crate::sync::timer::{Timer, TimerHandle};

use log::{debug, error};

use std::ops::Range;
use std::sync::Mutex;
use std::time::Duration;

pub mod broadcast;
pub mod random;
pub mod stream;
pub mod tap;

pub use broadcast::TimerBroadcastModel;
pub use random::RandomNumbers;
pub use stream::TimerStreamModel;
pub use tap::TapModel;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_RANGE: Range<i32> = 1..10;

/// Settings shared by the timer driven models
///
/// # Example
/// ```
/// use eventbridge::model::TimerConfig;
/// use std::time::Duration;
///
/// let config = TimerConfig::new()
///   .interval(Duration::from_millis(50))
///   .seed(7);
/// assert_eq!(config.interval, Duration::from_millis(50));
/// assert_eq!(config.range, 1..10);
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TimerConfig {
  /// Time between ticks
  pub interval: Duration,
  /// Half open range random values are drawn from
  pub range: Range<i32>,
  /// Fixed seed for the random values, drawn from entropy when `None`
  pub seed: Option<u64>,
  /// Buffering of the stream model's sequence
  pub buffering: BufferingPolicy,
}

impl Default for TimerConfig {
  fn default() -> Self {
    TimerConfig {
      interval: DEFAULT_INTERVAL,
      range: DEFAULT_RANGE,
      seed: None,
      buffering: BufferingPolicy::BufferingNewest(1),
    }
  }
}

impl TimerConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn interval(mut self, interval: Duration) -> Self {
    self.interval = interval;
    self
  }

  /// # Panics
  ///
  /// Panics if `range` is empty.
  pub fn range(mut self, range: Range<i32>) -> Self {
    if range.start >= range.end {
      panic!("empty random value range {:?}", range);
    }
    self.range = range;
    self
  }

  pub fn seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }

  pub fn buffering(mut self, buffering: BufferingPolicy) -> Self {
    self.buffering = buffering;
    self
  }
}

/// Holds the single active timer of a model
pub(crate) struct TimerSlot {
  owner: String,
  handle: Mutex<Option<TimerHandle>>,
}

impl TimerSlot {
  pub(crate) fn new(owner: String) -> Self {
    TimerSlot {
      owner,
      handle: Mutex::new(None),
    }
  }

  /// Replaces the active timer, if any, with a new one
  pub(crate) fn start<F>(&self, interval: Duration, tick: F)
  where
    F: FnMut() + Send + 'static,
  {
    let mut guard = self.handle.lock().unwrap();
    if let Some(previous) = guard.take() {
      previous.cancel();
    }
    match Timer::repeating(interval, tick) {
      Ok(handle) => {
        debug!("{} started timer {}", self.owner, handle.id());
        *guard = Some(handle);
      }
      Err(err) => error!("{} failed to start its timer: {}", self.owner, err),
    }
  }

  pub(crate) fn stop(&self) {
    let handle = self.handle.lock().unwrap().take();
    if let Some(handle) = handle {
      handle.cancel();
      debug!("{} stopped timer {}", self.owner, handle.id());
    }
  }

  pub(crate) fn running(&self) -> bool {
    match self.handle.lock().unwrap().as_ref() {
      Some(handle) => handle.active(),
      None => false,
    }
  }
}

impl Drop for TimerSlot {
  fn drop(&mut self) {
    self.stop();
  }
}
