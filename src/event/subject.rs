use super::scheduler::Job;
use super::subscription::{Source, Subscription};

use log::{debug, trace};

use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

pub trait EventType: Send + Sync + Clone + Debug + 'static {}

impl<T> EventType for T where T: Send + Sync + Clone + Debug + 'static {}

type Handler<T> = dyn Fn(T) + Send + Sync;

pub trait Subject<T>
where
  T: EventType,
{
  /// Registers a handler invoked with every value sent after this call
  fn subscribe<F>(&self, handler: F) -> Subscription
  where
    F: Fn(T) + Send + Sync + 'static;

  /// Sends a value to every current subscriber
  fn next(&self, value: T);

  /// Ends the subject: current subscriptions are finalized and later values
  /// are ignored
  fn finish(&self);
}

pub(super) fn id() -> usize {
  static ID: AtomicUsize = AtomicUsize::new(0);
  ID.fetch_add(1, Ordering::Relaxed)
}

struct ObserverEntry<T>
where
  T: EventType,
{
  id: usize,
  handler: Arc<Handler<T>>,
  finalize: Mutex<VecDeque<Job>>,
}

impl<T> ObserverEntry<T>
where
  T: EventType,
{
  fn finalize(&self) {
    let jobs = std::mem::take(&mut *self.finalize.lock().unwrap());
    for job in jobs.into_iter().rev() {
      job.invoke();
    }
  }
}

struct ObserverManager<T>
where
  T: EventType,
{
  subject: usize,
  observers: Vec<ObserverEntry<T>>,
  finished: bool,
}

impl<T> ObserverManager<T>
where
  T: EventType,
{
  fn new(subject: usize) -> Self {
    ObserverManager {
      subject,
      observers: Vec::new(),
      finished: false,
    }
  }

  fn take_child(&mut self, id: usize) -> Option<ObserverEntry<T>> {
    let idx = self.observers.iter().position(|child| child.id == id)?;
    Some(self.observers.remove(idx))
  }

  fn handlers(&self) -> Vec<Arc<Handler<T>>> {
    self
      .observers
      .iter()
      .map(|child| child.handler.clone())
      .collect()
  }
}

impl<T> Drop for ObserverManager<T>
where
  T: EventType,
{
  fn drop(&mut self) {
    for child in self.observers.iter() {
      child.finalize();
    }
  }
}

impl<T> Source for RwLock<ObserverManager<T>>
where
  T: EventType,
{
  fn remove(&self, id: usize) -> bool {
    let removed = self.write().unwrap().take_child(id);
    match removed {
      Some(child) => {
        child.finalize();
        debug!("observer {} unsubscribed", id);
        true
      }
      None => false,
    }
  }

  fn contains(&self, id: usize) -> bool {
    self
      .read()
      .unwrap()
      .observers
      .iter()
      .any(|child| child.id == id)
  }

  fn add_finalize(&self, id: usize, job: Job) -> Option<Job> {
    let guard = self.read().unwrap();
    match guard.observers.iter().find(|child| child.id == id) {
      Some(child) => {
        child.finalize.lock().unwrap().push_front(job);
        None
      }
      None => Some(job),
    }
  }
}

struct SubjectBase<T>
where
  T: EventType,
{
  id: usize,
  manager: Arc<RwLock<ObserverManager<T>>>,
}

impl<T> SubjectBase<T>
where
  T: EventType,
{
  fn new() -> Self {
    let id = id();
    SubjectBase {
      id,
      manager: Arc::new(RwLock::new(ObserverManager::new(id))),
    }
  }

  fn subscribe(&self, handler: Arc<Handler<T>>) -> (Subscription, bool) {
    let id = id();
    let mut guard = self.manager.write().unwrap();
    if guard.finished {
      return (Subscription::detached(id), false);
    }
    guard.observers.push(ObserverEntry {
      id,
      handler,
      finalize: Mutex::new(VecDeque::new()),
    });
    debug!("observer {} subscribed to subject {}", id, guard.subject);
    drop(guard);
    let source: Arc<dyn Source> = self.manager.clone();
    (Subscription::new(id, &source), true)
  }

  fn next(&self, value: T) {
    let handlers = {
      let guard = self.manager.read().unwrap();
      if guard.finished {
        return;
      }
      guard.handlers()
    };
    trace!(
      "subject {} dispatching {:?} to {} observers",
      self.id,
      value,
      handlers.len()
    );
    for handler in handlers.iter() {
      handler(value.clone());
    }
  }

  fn finish(&self) {
    let observers = {
      let mut guard = self.manager.write().unwrap();
      guard.finished = true;
      std::mem::take(&mut guard.observers)
    };
    debug!("subject {} finished", self.id);
    for child in observers.iter() {
      child.finalize();
    }
  }

  fn num_observers(&self) -> usize {
    self.manager.read().unwrap().observers.len()
  }

  fn finished(&self) -> bool {
    self.manager.read().unwrap().finished
  }
}

/// A broadcast subject without history.
///
/// Every value sent with `next` is delivered synchronously, on the sending
/// thread, to the subscribers registered at that moment. Subscribers
/// registered later never see earlier values. Sending with no subscribers is a
/// no-op.
///
/// Handlers run without any lock held, so they may subscribe, unsubscribe or
/// send further values.
///
/// # Example
/// ```
/// use eventbridge::event::subject::{PassthroughSubject, Subject};
/// use std::sync::{Arc, Mutex};
///
/// let subject = PassthroughSubject::new();
/// subject.next(0);
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let captured = seen.clone();
/// let _subscription = subject.subscribe(move |x| captured.lock().unwrap().push(x));
/// subject.next(1);
/// subject.next(2);
/// assert_eq!(*seen.lock().unwrap(), [1, 2]);
/// ```
pub struct PassthroughSubject<T>
where
  T: EventType,
{
  base: SubjectBase<T>,
}

impl<T> PassthroughSubject<T>
where
  T: EventType,
{
  pub fn new() -> Arc<Self> {
    Arc::new(PassthroughSubject {
      base: SubjectBase::new(),
    })
  }

  pub fn id(&self) -> usize {
    self.base.id
  }

  pub fn num_observers(&self) -> usize {
    self.base.num_observers()
  }

  pub fn finished(&self) -> bool {
    self.base.finished()
  }
}

impl<T> Subject<T> for PassthroughSubject<T>
where
  T: EventType,
{
  fn subscribe<F>(&self, handler: F) -> Subscription
  where
    F: Fn(T) + Send + Sync + 'static,
  {
    self.base.subscribe(Arc::new(handler)).0
  }

  fn next(&self, value: T) {
    self.base.next(value)
  }

  fn finish(&self) {
    self.base.finish()
  }
}

/// A subject which holds its latest value and replays it to each new
/// subscriber before any later value.
///
/// Sending and subscribing are serialized, so a subscriber never observes the
/// replayed value after a newer one. Handlers may read [StateSubject::state]
/// but must not send into the same subject.
pub struct StateSubject<T>
where
  T: EventType,
{
  base: SubjectBase<T>,
  state: RwLock<T>,
  publish: Mutex<()>,
}

impl<T> StateSubject<T>
where
  T: EventType,
{
  pub fn new(value: T) -> Arc<Self> {
    Arc::new(StateSubject {
      base: SubjectBase::new(),
      state: RwLock::new(value),
      publish: Mutex::new(()),
    })
  }

  pub fn state(&self) -> T {
    self.state.read().unwrap().clone()
  }

  pub fn num_observers(&self) -> usize {
    self.base.num_observers()
  }
}

impl<T> Subject<T> for StateSubject<T>
where
  T: EventType,
{
  fn subscribe<F>(&self, handler: F) -> Subscription
  where
    F: Fn(T) + Send + Sync + 'static,
  {
    let _publish = self.publish.lock().unwrap();
    let handler: Arc<Handler<T>> = Arc::new(handler);
    let (subscription, attached) = self.base.subscribe(handler.clone());
    if attached {
      handler(self.state());
    }
    subscription
  }

  fn next(&self, value: T) {
    let _publish = self.publish.lock().unwrap();
    if self.base.finished() {
      return;
    }
    *self.state.write().unwrap() = value.clone();
    self.base.next(value);
  }

  fn finish(&self) {
    self.base.finish()
  }
}
