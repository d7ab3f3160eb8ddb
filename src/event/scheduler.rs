use crate::error::Error;
use crate::sync::worker::Worker;

use log::warn;

use std::sync::{Arc, Mutex};

/// A unit of work handed to a [Scheduler]
pub struct Job(Box<dyn FnOnce() + Send + 'static>);

impl Job {
  pub fn new<F>(func: F) -> Self
  where
    F: FnOnce() + Send + 'static,
  {
    Job(Box::new(func))
  }

  pub fn invoke(self) {
    (self.0)()
  }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SchedulerType {
  /// The process wide display context, a single worker shared by every
  /// scheduler of this type
  Main,
  /// A private worker thread
  Worker,
  /// Runs jobs inline on the calling thread
  Blocking,
}

/// The execution context display updates are marshalled onto
pub trait Scheduler: Send + Sync {
  fn execute(&self, job: Job);
  fn scheduler_type(&self) -> SchedulerType;
}

impl Scheduler for Worker {
  fn execute(&self, job: Job) {
    let task = self.submit(move || async move { job.invoke() });
    if task.finished() && task.poll().is_err() {
      warn!("worker '{}' rejected a scheduled job", self.name());
    }
  }

  fn scheduler_type(&self) -> SchedulerType {
    SchedulerType::Worker
  }
}

pub struct Main(Worker);

impl Scheduler for Main {
  fn execute(&self, job: Job) {
    self.0.execute(job);
  }

  fn scheduler_type(&self) -> SchedulerType {
    SchedulerType::Main
  }
}

pub struct Blocking;

impl Scheduler for Blocking {
  fn execute(&self, job: Job) {
    job.invoke();
  }

  fn scheduler_type(&self) -> SchedulerType {
    SchedulerType::Blocking
  }
}

lazy_static! {
  static ref MAIN: Mutex<Option<Worker>> = Mutex::new(None);
}

/// Returns the shared display worker, spawning it on first use or after it
/// became unhealthy
fn main_worker() -> Result<Worker, Error> {
  let mut guard = MAIN.lock().unwrap();
  if let Some(worker) = guard.as_ref() {
    if worker.healthy() {
      return Ok(worker.clone());
    }
    warn!("replacing unhealthy main worker");
  }
  let worker = Worker::named("main")?;
  *guard = Some(worker.clone());
  Ok(worker)
}

pub fn make_scheduler(
  name: String,
  id: usize,
  strategy: SchedulerType,
) -> Result<Arc<dyn Scheduler>, Error> {
  Ok(match strategy {
    SchedulerType::Main => Arc::new(Main(main_worker()?)),
    SchedulerType::Worker => {
      Arc::new(Worker::named(&format!("{}{}", name, id))?)
    }
    SchedulerType::Blocking => Arc::new(Blocking {}),
  })
}
