use super::display::DisplayState;
use super::{next_id, RunState};
use crate::error::Error;
use crate::event::scheduler::{make_scheduler, SchedulerType};
use crate::event::subscription::Subscription;
use crate::model::tap::TapModel;

use log::debug;

use std::sync::Mutex;

pub const NOT_TAPPED: &str = "not tap";
pub const TAPPED: &str = "did tap";

pub struct TapViewModelBuilder {
  scheduler: SchedulerType,
}

impl Default for TapViewModelBuilder {
  fn default() -> Self {
    TapViewModelBuilder {
      scheduler: SchedulerType::Main,
    }
  }
}

impl TapViewModelBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// The context display updates run on
  pub fn scheduler(mut self, scheduler: SchedulerType) -> Self {
    self.scheduler = scheduler;
    self
  }

  pub fn build(self) -> Result<TapViewModel, Error> {
    let id = next_id();
    let scheduler = make_scheduler("tap-display".to_owned(), id, self.scheduler)?;
    let model = TapModel::new();
    let text = DisplayState::new(NOT_TAPPED);
    let display = text.clone();
    let subscription = model.subscribe(move |_| {
      display.present(&scheduler, TAPPED.to_owned());
    });
    debug!("tap view-model {} subscribed", id);
    Ok(TapViewModel {
      id,
      model,
      text,
      state: Mutex::new(RunState::Idle),
      subscription,
    })
  }
}

/// Displays whether the tap action has fired at least once.
pub struct TapViewModel {
  id: usize,
  model: TapModel,
  text: DisplayState,
  state: Mutex<RunState>,
  subscription: Subscription,
}

impl TapViewModel {
  pub fn new() -> Result<Self, Error> {
    TapViewModelBuilder::new().build()
  }

  pub fn text(&self) -> &DisplayState {
    &self.text
  }

  pub fn state(&self) -> RunState {
    *self.state.lock().unwrap()
  }

  pub fn tap(&self) {
    *self.state.lock().unwrap() = RunState::Running;
    self.model.notify();
  }
}

impl Drop for TapViewModel {
  fn drop(&mut self) {
    self.subscription.unsubscribe();
    self.text.close();
    debug!("tap view-model {} torn down", self.id);
  }
}
