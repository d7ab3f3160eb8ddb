use super::executor::Executor;
use super::task::{Task, TaskError, TaskType};
use crate::error::Error;

use log::{debug, error, warn};

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, Weak};
use std::thread::JoinHandle;

struct HealthUnwinder<'a, T>
where
  T: TaskType,
{
  flag: Arc<AtomicBool>,
  holding: Option<Arc<Task<T>>>,
  receiver: &'a Receiver<WorkerSignal<T>>,
}

impl<'a, T> Drop for HealthUnwinder<'a, T>
where
  T: TaskType,
{
  fn drop(&mut self) {
    if std::thread::panicking() {
      self.flag.store(false, Ordering::Relaxed);
      if let Some(task) = self.holding.take() {
        task.fail(TaskError::Unhealthy);
      }
      for signal in self.receiver.try_iter() {
        if let WorkerSignal::Run(task) = &signal {
          task.fail(TaskError::Unhealthy);
        }
      }
    }
  }
}

enum WorkerSignal<T>
where
  T: TaskType,
{
  Run(Arc<Task<T>>),
  Close,
}

struct WorkerInner<T>
where
  T: TaskType,
{
  name: String,
  sender: Mutex<Sender<WorkerSignal<T>>>,
  queued: Arc<AtomicUsize>,
  healthy: Arc<AtomicBool>,
}

/// A named thread which drives submitted futures to completion.
///
/// Futures are polled in submission order. A future which returns pending is
/// parked until its waker is invoked, at which point it is queued again. The
/// thread closes once every handle to the worker is dropped, after it has
/// finished the polls already queued.
#[derive(Clone)]
pub struct Worker<T = ()>
where
  T: TaskType,
{
  inner: Arc<WorkerInner<T>>,
}

impl<T> Worker<T>
where
  T: TaskType,
{
  fn new_with_handle(name: &str) -> Result<(Self, JoinHandle<()>), Error> {
    let (tx, rx) = std::sync::mpsc::channel();
    let queued = Arc::new(AtomicUsize::new(0));
    let healthy = Arc::new(AtomicBool::new(true));
    let handle = Self::run(name, rx, queued.clone(), healthy.clone())?;
    Ok((
      Worker {
        inner: Arc::new(WorkerInner {
          name: name.to_owned(),
          sender: Mutex::new(tx),
          queued,
          healthy,
        }),
      },
      handle,
    ))
  }

  /// Spawns a worker thread with the given name
  pub fn named(name: &str) -> Result<Self, Error> {
    Self::new_with_handle(name).map(|(worker, _)| worker)
  }

  fn run(
    name: &str,
    receiver: Receiver<WorkerSignal<T>>,
    queued: Arc<AtomicUsize>,
    healthy: Arc<AtomicBool>,
  ) -> Result<JoinHandle<()>, Error> {
    std::thread::Builder::new()
      .name(name.to_owned())
      .spawn(move || {
        let mut unwinder = HealthUnwinder {
          flag: healthy,
          holding: None,
          receiver: &receiver,
        };
        while let Ok(WorkerSignal::Run(task)) = unwinder.receiver.recv() {
          unwinder.holding = Some(task.clone());
          Task::progress(task);
          queued.fetch_sub(1, Ordering::Relaxed);
          unwinder.holding.take();
        }
      })
      .map_err(|source| {
        error!("failed to spawn worker '{}': {}", name, source);
        Error::spawn(name, source)
      })
  }

  /// Submits a given future factory to be run asynchronously
  ///
  /// `submit` sends the produced task to the worker thread using a channel.
  ///
  /// - Tasks submitted to an unhealthy worker resolve to
  ///   [TaskError::Unhealthy] instead of running.
  ///
  /// # Example
  /// ```
  /// use eventbridge::sync::worker::Worker;
  /// use std::sync::{Arc, atomic::{AtomicU16, Ordering}};
  ///
  /// let atomic = Arc::new(AtomicU16::new(0));
  /// let worker = Worker::named("doc-worker").unwrap();
  /// let (copy1, copy2) = (atomic.clone(), atomic.clone());
  /// let first = worker.submit(move || async move { copy1.fetch_add(10, Ordering::Relaxed); });
  /// let second = worker.submit(move || async move { copy2.fetch_add(5, Ordering::Relaxed); });
  /// first.wait().unwrap();
  /// second.wait().unwrap();
  /// assert_eq!(atomic.load(Ordering::Relaxed), 15);
  /// ```
  pub fn submit<F>(&self, job: impl FnOnce() -> F) -> Arc<Task<T>>
  where
    F: Future<Output = T> + Send + 'static,
  {
    self.execute(job())
  }

  pub fn name(&self) -> &str {
    &self.inner.name
  }

  /// Whether the worker has no queued polls
  pub fn idle(&self) -> bool {
    self.inner.queued.load(Ordering::Relaxed) == 0
  }

  pub fn healthy(&self) -> bool {
    self.inner.healthy.load(Ordering::Relaxed)
  }
}

impl<T> WorkerInner<T>
where
  T: TaskType,
{
  fn enqueue(&self, task: Arc<Task<T>>) {
    let guard = self.sender.lock().unwrap();
    if self.healthy.load(Ordering::Relaxed) {
      self.queued.fetch_add(1, Ordering::Relaxed);
      if let Err(error) = guard.send(WorkerSignal::Run(task)) {
        self.queued.fetch_sub(1, Ordering::Relaxed);
        if let WorkerSignal::Run(task) = error.0 {
          task.fail(TaskError::Unhealthy);
        }
      }
    } else {
      warn!("task submitted to unhealthy worker '{}'", self.name);
      task.fail(TaskError::Unhealthy);
    }
  }
}

impl<T> Executor for Worker<T>
where
  T: TaskType,
{
  type Output = T;

  fn execute(
    &self,
    future: impl Future<Output = Self::Output> + Send + 'static,
  ) -> Arc<Task<Self::Output>> {
    let weak: Weak<WorkerInner<T>> = Arc::downgrade(&self.inner);
    let task = Arc::new(Task::new(
      move |task: Arc<Task<T>>| match weak.upgrade() {
        Some(inner) => inner.enqueue(task),
        None => task.fail(TaskError::Unhealthy),
      },
      Box::pin(future),
    ));
    self.inner.enqueue(task.clone());
    task
  }
}

impl<T> Drop for WorkerInner<T>
where
  T: TaskType,
{
  fn drop(&mut self) {
    debug!("closing worker '{}'", self.name);
    if let Ok(guard) = self.sender.lock() {
      let _ = guard.send(WorkerSignal::Close);
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::utils::testing::async_context;

  #[test]
  fn worker_new_test() {
    async_context(|| {
      let worker: Worker = Worker::named("worker-new").unwrap();
      assert!(worker.inner.healthy.load(Ordering::Relaxed));
      assert!(worker.healthy());
      assert_eq!(worker.inner.queued.load(Ordering::Relaxed), 0);
      assert!(worker.idle());
      assert_eq!(worker.name(), "worker-new");
      assert!(!worker.inner.sender.is_poisoned());
    });
  }

  #[test]
  fn worker_healthy_task_test() {
    async_context(|| {
      let (worker, handle) =
        Worker::<()>::new_with_handle("worker-healthy").unwrap();
      let task = worker.submit(|| async {});
      assert_eq!(task.wait(), Ok(()));
      drop(worker);
      assert!(handle.join().is_ok());
      assert_eq!(task.poll(), Ok(()));
    });
  }

  #[test]
  fn worker_unhealthy_task_test() {
    async_context(|| {
      let (worker, handle) =
        Worker::<()>::new_with_handle("worker-unhealthy").unwrap();
      let task = worker.submit(|| async { panic!("task failure") });
      assert_eq!(task.wait(), Err(TaskError::Unhealthy));
      assert!(handle.join().is_err());
      assert!(!worker.healthy());
      let rejected = worker.submit(|| async {});
      assert_eq!(rejected.wait(), Err(TaskError::Unhealthy));
    });
  }

  #[test]
  fn worker_resumes_woken_task_test() {
    async_context(|| {
      let worker: Worker<usize> = Worker::named("worker-resume").unwrap();
      let (tx, rx) = futures::channel::oneshot::channel::<usize>();
      let task = worker.submit(|| async move { rx.await.unwrap_or(0) });
      std::thread::sleep(std::time::Duration::from_millis(20));
      assert!(!task.finished());
      tx.send(42).unwrap();
      assert_eq!(task.wait(), Ok(42));
    });
  }
}
