//! View-models subscribe to a model, republish every value into a
//! [DisplayState](display::DisplayState) on the display execution context and
//! forward user actions to the model. Dropping a view-model cancels its
//! subscriptions and tasks.
use crate::model::{RandomNumbers, TimerConfig};

use std::sync::atomic::{AtomicUsize, Ordering};

pub mod broadcast;
pub mod display;
pub mod stream;
pub mod tap;

pub use broadcast::{TimerBroadcastViewModel, TimerBroadcastViewModelBuilder};
pub use display::{DisplayObserver, DisplayState};
pub use stream::{TimerStreamViewModel, TimerStreamViewModelBuilder};
pub use tap::{TapViewModel, TapViewModelBuilder};

/// Shared lifecycle of every view-model. Values arriving while running only
/// update the display, they never change the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
  Idle,
  Running,
}

impl Default for RunState {
  fn default() -> Self {
    RunState::Idle
  }
}

/// Initial display text of the timer driven view-models, reproducible when the
/// config is seeded
fn placeholder(config: &TimerConfig) -> String {
  // offset so the placeholder is not the model's first draw
  let seed = config.seed.map(|seed| seed.wrapping_sub(1));
  RandomNumbers::new(config.range.clone(), seed).draw().to_string()
}

fn next_id() -> usize {
  static ID: AtomicUsize = AtomicUsize::new(0);
  ID.fetch_add(1, Ordering::Relaxed)
}
