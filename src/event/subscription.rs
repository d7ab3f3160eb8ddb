use super::scheduler::Job;

use std::sync::{Arc, Weak};

/// The side of a channel a [Subscription] detaches from
pub(super) trait Source: Send + Sync {
  fn remove(&self, id: usize) -> bool;
  fn contains(&self, id: usize) -> bool;
  fn add_finalize(&self, id: usize, job: Job) -> Option<Job>;
}

struct Detached;

impl Source for Detached {
  fn remove(&self, _id: usize) -> bool {
    false
  }
  fn contains(&self, _id: usize) -> bool {
    false
  }
  fn add_finalize(&self, _id: usize, job: Job) -> Option<Job> {
    Some(job)
  }
}

/// Ties a subscriber to the current scope: dropping the subscription
/// unsubscribes it.
#[must_use = "dropping a subscription immediately unsubscribes it"]
pub struct Subscription {
  id: usize,
  source: Weak<dyn Source>,
}

impl Subscription {
  pub(super) fn new(id: usize, source: &Arc<dyn Source>) -> Self {
    Subscription {
      id,
      source: Arc::downgrade(source),
    }
  }

  /// A subscription which is not attached to anything
  pub(super) fn detached(id: usize) -> Self {
    Subscription {
      id,
      source: Weak::<Detached>::new(),
    }
  }

  pub fn id(&self) -> usize {
    self.id
  }

  pub fn unsubscribe(&mut self) {
    if let Some(source) = self.source.upgrade() {
      self.source = Weak::<Detached>::new();
      source.remove(self.id);
    }
  }

  /// Whether the subscriber still receives values
  pub fn active(&self) -> bool {
    match self.source.upgrade() {
      Some(source) => source.contains(self.id),
      None => false,
    }
  }

  /// Registers a cleanup task invoked once the subscription ends, either by
  /// unsubscribing or by its channel finishing
  ///
  /// If the subscription already ended the task runs immediately.
  pub fn finalize<F>(self, task: F) -> Self
  where
    F: FnOnce() + Send + 'static,
  {
    let job = Job::new(task);
    let rejected = match self.source.upgrade() {
      Some(source) => source.add_finalize(self.id, job),
      None => Some(job),
    };
    if let Some(job) = rejected {
      job.invoke();
    }
    self
  }
}

impl Drop for Subscription {
  fn drop(&mut self) {
    self.unsubscribe();
  }
}
