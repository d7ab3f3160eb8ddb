use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Condvar, Mutex};
use std::task::{Context, Poll, Wake, Waker};
use std::time::Duration;

pub trait TaskType: Send + Clone + 'static {}
impl<T> TaskType for T where T: Send + Clone + 'static {}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskError {
  Unhealthy,
  Cancelled,
}

impl Display for TaskError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      TaskError::Unhealthy => write!(f, "worker executor panicked"),
      TaskError::Cancelled => write!(f, "task was cancelled"),
    }
  }
}

impl Error for TaskError {}

type BoxedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

pub(super) struct TaskInner<T>
where
  T: TaskType,
{
  result: Option<Result<T, TaskError>>,
  future: Option<BoxedFuture<T>>,
  polling: bool,
  notified: bool,
  cancelled: bool,
}

impl<T> TaskInner<T>
where
  T: TaskType,
{
  fn ready(&self) -> bool {
    self.result.is_some()
  }
}

impl<T> Wake for Task<T>
where
  T: TaskType,
{
  fn wake(self: Arc<Self>) {
    {
      let mut guard = self.inner.lock().unwrap();
      if guard.ready() {
        return;
      }
      // The worker re-polls once the current poll returns
      if guard.polling {
        guard.notified = true;
        return;
      }
    }
    (self.resume)(self.clone());
  }
}

/// A future driven to completion by a [Worker](super::worker::Worker).
///
/// Waking the task hands it back to its worker through the `resume` callback.
pub struct Task<T>
where
  T: TaskType,
{
  inner: Mutex<TaskInner<T>>,
  done: Condvar,
  resume: Box<dyn Fn(Arc<Task<T>>) + Send + Sync + 'static>,
}

#[derive(Debug, PartialEq)]
pub enum PollError {
  NotReady,
  Error(TaskError),
}

impl<T> Task<T>
where
  T: TaskType,
{
  pub fn new<F>(resumer: F, future: BoxedFuture<T>) -> Self
  where
    F: Fn(Arc<Task<T>>) + Send + Sync + 'static,
  {
    Task {
      inner: Mutex::new(TaskInner {
        result: None,
        future: Some(future),
        polling: false,
        notified: false,
        cancelled: false,
      }),
      done: Condvar::new(),
      resume: Box::new(resumer),
    }
  }

  pub fn poll(&self) -> Result<T, PollError> {
    let guard = self.inner.lock().unwrap();
    match &guard.result {
      Some(result) => result.clone().map_err(PollError::Error),
      None => Err(PollError::NotReady),
    }
  }

  pub fn finished(&self) -> bool {
    self.inner.lock().unwrap().ready()
  }

  /// Blocks the calling thread until the task resolves
  pub fn wait(&self) -> Result<T, TaskError> {
    let mut guard = self.inner.lock().unwrap();
    loop {
      if let Some(result) = &guard.result {
        return result.clone();
      }
      guard = self.done.wait(guard).unwrap();
    }
  }

  /// Blocks the calling thread until the task resolves or `timeout` elapses
  pub fn wait_timeout(&self, timeout: Duration) -> Result<T, PollError> {
    let guard = self.inner.lock().unwrap();
    let (guard, _) = self
      .done
      .wait_timeout_while(guard, timeout, |inner| !inner.ready())
      .unwrap();
    match &guard.result {
      Some(result) => result.clone().map_err(PollError::Error),
      None => Err(PollError::NotReady),
    }
  }

  /// Cancels the task
  ///
  /// A task suspended between polls has its future dropped immediately, a task
  /// being polled drops its future as soon as the current poll returns
  /// pending. Cancelling a resolved task does nothing.
  pub fn cancel(&self) {
    let dropped = {
      let mut guard = self.inner.lock().unwrap();
      if guard.ready() {
        return;
      }
      guard.cancelled = true;
      if guard.polling {
        None
      } else {
        guard.result = Some(Err(TaskError::Cancelled));
        self.done.notify_all();
        guard.future.take()
      }
    };
    drop(dropped);
  }

  pub(super) fn fail(&self, error: TaskError) {
    let dropped = {
      let mut guard = self.inner.lock().unwrap();
      if guard.ready() {
        return;
      }
      guard.result = Some(Err(error));
      self.done.notify_all();
      guard.future.take()
    };
    drop(dropped);
  }

  /// Polls the future until it is pending without outstanding wake ups
  ///
  /// Returns true if this call resolved the task.
  pub(super) fn progress(self: Arc<Self>) -> bool {
    let mut future = {
      let mut guard = self.inner.lock().unwrap();
      match guard.future.take() {
        Some(future) => {
          guard.polling = true;
          future
        }
        None => return false,
      }
    };
    let waker = Waker::from(self.clone());
    let context = &mut Context::from_waker(&waker);
    loop {
      let poll = future.as_mut().poll(context);
      let mut guard = self.inner.lock().unwrap();
      match poll {
        Poll::Ready(value) => {
          guard.polling = false;
          guard.result = Some(Ok(value));
          self.done.notify_all();
          return true;
        }
        Poll::Pending if guard.cancelled => {
          guard.polling = false;
          guard.result = Some(Err(TaskError::Cancelled));
          self.done.notify_all();
          return true;
        }
        Poll::Pending if guard.notified => {
          guard.notified = false;
        }
        Poll::Pending => {
          guard.polling = false;
          guard.future = Some(future);
          return false;
        }
      }
    }
  }
}
