use super::random::RandomNumbers;
use super::{TimerConfig, TimerSlot};
use crate::event::sequence::{channel, AsyncSequence, Continuation, YieldResult};

use log::{debug, trace, warn};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type ContinuationSlot = Arc<Mutex<Option<Continuation<i32>>>>;

/// Feeds a random number into a pull based [AsyncSequence] on each timer tick.
///
/// The model keeps a single continuation: creating a new sequence with
/// [TimerStreamModel::random_numbers] finishes the previous one. Ticks which
/// happen while no sequence exists are discarded, and values the consumer has
/// not pulled yet are handled by the configured buffering policy (by default
/// only the newest value is kept). Dropping the model finishes the sequence.
pub struct TimerStreamModel {
  id: usize,
  continuation: ContinuationSlot,
  numbers: Arc<Mutex<RandomNumbers>>,
  config: TimerConfig,
  timer: TimerSlot,
}

impl Default for TimerStreamModel {
  fn default() -> Self {
    Self::with_config(TimerConfig::default())
  }
}

impl TimerStreamModel {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_config(config: TimerConfig) -> Self {
    let id = next_id();
    TimerStreamModel {
      id,
      continuation: Arc::new(Mutex::new(None)),
      numbers: Arc::new(Mutex::new(RandomNumbers::new(
        config.range.clone(),
        config.seed,
      ))),
      config,
      timer: TimerSlot::new(format!("stream model {}", id)),
    }
  }

  pub fn id(&self) -> usize {
    self.id
  }

  pub fn config(&self) -> &TimerConfig {
    &self.config
  }

  /// Creates the sequence the timer feeds, finishing any previous one
  pub fn random_numbers(&self) -> AsyncSequence<i32> {
    let (continuation, sequence) = channel(self.config.buffering);
    let previous = self.continuation.lock().unwrap().replace(continuation);
    if previous.is_some() {
      debug!("stream model {} replaced its sequence", self.id);
    }
    sequence
  }

  /// Starts feeding the sequence, replacing the running timer if there is one
  pub fn start_timer(&self) {
    let id = self.id;
    let slot = self.continuation.clone();
    let numbers = self.numbers.clone();
    self.timer.start(self.config.interval, move || {
      let value = numbers.lock().unwrap().draw();
      let mut guard = slot.lock().unwrap();
      let terminated = match guard.as_ref() {
        Some(continuation) => match continuation.yield_value(value) {
          YieldResult::Enqueued { .. } => {
            trace!("stream model {} yielded {}", id, value);
            false
          }
          YieldResult::Dropped(stale) => {
            warn!("stream model {} discarded unconsumed {}", id, stale);
            false
          }
          YieldResult::Terminated => true,
        },
        None => {
          trace!("stream model {} has no sequence for {}", id, value);
          false
        }
      };
      if terminated {
        debug!("stream model {} consumer is gone", id);
        guard.take();
      }
    });
  }

  pub fn stop_timer(&self) {
    self.timer.stop();
  }

  pub fn is_running(&self) -> bool {
    self.timer.running()
  }
}

impl Drop for TimerStreamModel {
  fn drop(&mut self) {
    self.timer.stop();
    let continuation = self.continuation.lock().unwrap().take();
    if let Some(continuation) = continuation {
      continuation.finish();
    }
  }
}

fn next_id() -> usize {
  static ID: AtomicUsize = AtomicUsize::new(0);
  ID.fetch_add(1, Ordering::Relaxed)
}
