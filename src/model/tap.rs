use crate::event::subject::{PassthroughSubject, Subject};
use crate::event::subscription::Subscription;

use std::sync::Arc;

/// Broadcasts a zero payload event every time it is notified.
pub struct TapModel {
  subject: Arc<PassthroughSubject<()>>,
}

impl Default for TapModel {
  fn default() -> Self {
    TapModel {
      subject: PassthroughSubject::new(),
    }
  }
}

impl TapModel {
  pub fn new() -> Self {
    Self::default()
  }

  /// Synchronously invokes every current subscriber
  pub fn notify(&self) {
    self.subject.next(());
  }

  /// Same as [TapModel::notify]
  pub fn change(&self) {
    self.notify();
  }

  pub fn subscribe<F>(&self, handler: F) -> Subscription
  where
    F: Fn(()) + Send + Sync + 'static,
  {
    self.subject.subscribe(handler)
  }

  pub fn num_subscribers(&self) -> usize {
    self.subject.num_observers()
  }
}

impl Drop for TapModel {
  fn drop(&mut self) {
    self.subject.finish();
  }
}
