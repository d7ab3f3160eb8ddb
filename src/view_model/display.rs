use crate::event::scheduler::{Job, Scheduler};
use crate::event::subject::{StateSubject, Subject};
use crate::event::subscription::Subscription;

use std::sync::Arc;

/// Receives every new value of a [DisplayState]
pub trait DisplayObserver: Send + Sync + 'static {
  fn on_change(&self, value: &str);
}

impl<F> DisplayObserver for F
where
  F: Fn(&str) + Send + Sync + 'static,
{
  fn on_change(&self, value: &str) {
    self(value)
  }
}

/// A display bound string owned by a view-model.
///
/// Views read it with [DisplayState::get] or register a [DisplayObserver],
/// which is called with the current value on registration and with every
/// value written afterwards. Only the owning view-model writes to it.
///
/// # Example
/// ```
/// use eventbridge::view_model::display::DisplayState;
/// use std::sync::{Arc, Mutex};
///
/// let text = DisplayState::new("not tap");
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let captured = seen.clone();
/// let _token = text.observe(move |value: &str| {
///   captured.lock().unwrap().push(value.to_owned());
/// });
/// assert_eq!(text.get(), "not tap");
/// assert_eq!(*seen.lock().unwrap(), ["not tap"]);
/// ```
#[derive(Clone)]
pub struct DisplayState {
  subject: Arc<StateSubject<String>>,
}

impl DisplayState {
  pub fn new<S>(initial: S) -> Self
  where
    S: Into<String>,
  {
    DisplayState {
      subject: StateSubject::new(initial.into()),
    }
  }

  pub fn get(&self) -> String {
    self.subject.state()
  }

  /// Registers an observer until the returned subscription is dropped
  pub fn observe<O>(&self, observer: O) -> Subscription
  where
    O: DisplayObserver,
  {
    self
      .subject
      .subscribe(move |value: String| observer.on_change(&value))
  }

  pub fn num_observers(&self) -> usize {
    self.subject.num_observers()
  }

  pub(crate) fn set(&self, value: String) {
    self.subject.next(value);
  }

  /// Hands the write over to the display execution context
  pub(crate) fn present(&self, scheduler: &Arc<dyn Scheduler>, value: String) {
    let display = self.clone();
    scheduler.execute(Job::new(move || display.set(value)));
  }

  /// Detaches every observer; later writes are ignored
  pub(crate) fn close(&self) {
    self.subject.finish();
  }
}
