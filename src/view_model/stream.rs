use super::display::DisplayState;
use super::{next_id, placeholder, RunState};
use crate::error::Error;
use crate::event::scheduler::{make_scheduler, SchedulerType};
use crate::model::stream::TimerStreamModel;
use crate::model::TimerConfig;
use crate::sync::executor::Executor;
use crate::sync::task::Task;
use crate::sync::worker::Worker;

use futures::StreamExt;
use log::{debug, info};

use std::sync::Arc;

pub struct TimerStreamViewModelBuilder {
  scheduler: SchedulerType,
  config: TimerConfig,
}

impl Default for TimerStreamViewModelBuilder {
  fn default() -> Self {
    TimerStreamViewModelBuilder {
      scheduler: SchedulerType::Main,
      config: TimerConfig::default(),
    }
  }
}

impl TimerStreamViewModelBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// The context display updates run on
  pub fn scheduler(mut self, scheduler: SchedulerType) -> Self {
    self.scheduler = scheduler;
    self
  }

  /// Configures both models; a seeded secondary model is offset from the
  /// primary so the two never draw the same sequence
  pub fn config(mut self, config: TimerConfig) -> Self {
    self.config = config;
    self
  }

  pub fn build(self) -> Result<TimerStreamViewModel, Error> {
    let id = next_id();
    let worker = Worker::named(&format!("stream-consumer{}", id))?;
    let scheduler =
      make_scheduler("stream-display".to_owned(), id, self.scheduler)?;
    let number_text = DisplayState::new(placeholder(&self.config));

    let mut secondary_config = self.config.clone();
    secondary_config.seed = self.config.seed.map(|seed| seed.wrapping_add(1));
    let model = TimerStreamModel::with_config(self.config);
    let secondary = TimerStreamModel::with_config(secondary_config);

    let mut numbers = model.random_numbers();
    let display = number_text.clone();
    let task = worker.execute(async move {
      while let Some(value) = numbers.next().await {
        display.present(&scheduler, value.to_string());
      }
      debug!("stream view-model {} primary sequence finished", id);
    });

    let mut secondary_numbers = secondary.random_numbers();
    let secondary_task = worker.execute(async move {
      while let Some(value) = secondary_numbers.next().await {
        info!("stream view-model {} secondary value {}", id, value);
      }
      debug!("stream view-model {} secondary sequence finished", id);
    });

    Ok(TimerStreamViewModel {
      id,
      model,
      secondary,
      number_text,
      task,
      secondary_task,
      _worker: worker,
    })
  }
}

/// Mirrors the latest number pulled from a [TimerStreamModel].
///
/// Owns a second, independent model whose values are only logged. Each model
/// is consumed by its own task; both tasks run on a worker private to the
/// view-model.
pub struct TimerStreamViewModel {
  id: usize,
  model: TimerStreamModel,
  secondary: TimerStreamModel,
  number_text: DisplayState,
  task: Arc<Task<()>>,
  secondary_task: Arc<Task<()>>,
  _worker: Worker,
}

impl TimerStreamViewModel {
  pub fn new() -> Result<Self, Error> {
    TimerStreamViewModelBuilder::new().build()
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

  pub fn start_secondary(&self) {
    self.secondary.start_timer();
  }

  pub fn stop_secondary(&self) {
    self.secondary.stop_timer();
  }

  pub fn secondary_running(&self) -> bool {
    self.secondary.is_running()
  }

  /// Whether the primary consumer task is still pulling values
  pub fn consuming(&self) -> bool {
    !self.task.finished()
  }
}

impl Drop for TimerStreamViewModel {
  fn drop(&mut self) {
    self.model.stop_timer();
    self.secondary.stop_timer();
    self.task.cancel();
    self.secondary_task.cancel();
    self.number_text.close();
    debug!("stream view-model {} torn down", self.id);
  }
}
