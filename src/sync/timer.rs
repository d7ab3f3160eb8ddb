use crate::error::Error;

use log::{debug, error, trace};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::ThreadId;
use std::time::{Duration, Instant};

struct TimerState {
  cancelled: bool,
  ticking: bool,
}

struct TimerShared {
  state: Mutex<TimerState>,
  signal: Condvar,
}

impl TimerShared {
  /// Parks until `deadline` and marks a tick as started, returning false if
  /// the timer was cancelled first
  fn begin_tick(&self, deadline: Instant) -> bool {
    let mut state = self.state.lock().unwrap();
    loop {
      if state.cancelled {
        return false;
      }
      let now = Instant::now();
      if now >= deadline {
        state.ticking = true;
        return true;
      }
      state = self.signal.wait_timeout(state, deadline - now).unwrap().0;
    }
  }

  fn end_tick(&self) {
    self.state.lock().unwrap().ticking = false;
    self.signal.notify_all();
  }
}

/// Ends the running tick even if it unwinds
struct TickGuard<'a>(&'a TimerShared);

impl Drop for TickGuard<'_> {
  fn drop(&mut self) {
    self.0.end_tick();
  }
}

/// Handle to a repeating timer thread. Dropping the handle cancels the timer.
pub struct TimerHandle {
  id: usize,
  thread: ThreadId,
  shared: Arc<TimerShared>,
}

impl TimerHandle {
  pub fn id(&self) -> usize {
    self.id
  }

  /// Stops the timer
  ///
  /// Once `cancel` returns no tick is running and no new tick starts. A tick
  /// which is already running is not interrupted, `cancel` waits for it to
  /// return instead. Called from inside the timer's own tick, `cancel` only
  /// prevents further ticks.
  pub fn cancel(&self) {
    let mut state = self.shared.state.lock().unwrap();
    if !state.cancelled {
      state.cancelled = true;
      debug!("cancelled timer {}", self.id);
    }
    self.shared.signal.notify_all();
    if std::thread::current().id() == self.thread {
      return;
    }
    while state.ticking {
      state = self.shared.signal.wait(state).unwrap();
    }
  }

  pub fn active(&self) -> bool {
    !self.shared.state.lock().unwrap().cancelled
  }
}

impl Drop for TimerHandle {
  fn drop(&mut self) {
    self.cancel();
  }
}

pub struct Timer;

impl Timer {
  /// Starts a timer thread which invokes `tick` once every `interval`
  ///
  /// The first tick fires one interval after the call. Ticks which run late
  /// do not cause a burst of catch up ticks, the schedule restarts from the
  /// late tick instead.
  ///
  /// # Example
  /// ```
  /// use eventbridge::sync::timer::Timer;
  /// use std::sync::mpsc::channel;
  /// use std::time::Duration;
  ///
  /// let (tx, rx) = channel();
  /// let handle = Timer::repeating(Duration::from_millis(5), move || {
  ///   let _ = tx.send(());
  /// })
  /// .unwrap();
  /// rx.recv().unwrap();
  /// handle.cancel();
  /// assert!(!handle.active());
  /// ```
  pub fn repeating<F>(interval: Duration, mut tick: F) -> Result<TimerHandle, Error>
  where
    F: FnMut() + Send + 'static,
  {
    let id = next_id();
    let name = format!("timer{}", id);
    let shared = Arc::new(TimerShared {
      state: Mutex::new(TimerState {
        cancelled: false,
        ticking: false,
      }),
      signal: Condvar::new(),
    });
    let cloned = shared.clone();
    let handle = std::thread::Builder::new()
      .name(name.clone())
      .spawn(move || {
        let mut deadline = Instant::now() + interval;
        while cloned.begin_tick(deadline) {
          let _guard = TickGuard(&cloned);
          trace!("timer {} tick", id);
          tick();
          deadline += interval;
          let now = Instant::now();
          if deadline <= now {
            deadline = now + interval;
          }
        }
        trace!("timer {} exited", id);
      })
      .map_err(|source| {
        error!("failed to spawn timer thread '{}': {}", name, source);
        Error::spawn(&name, source)
      })?;
    debug!("started timer {} with interval {:?}", id, interval);
    Ok(TimerHandle {
      id,
      thread: handle.thread().id(),
      shared,
    })
  }
}

fn next_id() -> usize {
  static ID: AtomicUsize = AtomicUsize::new(0);
  ID.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::utils::testing::async_context;

  use std::sync::atomic::AtomicBool;

  const INTERVAL: Duration = Duration::from_millis(20);

  #[test]
  fn repeating_tick_test() {
    async_context(|| {
      let (tx, rx) = std::sync::mpsc::channel();
      let _handle = Timer::repeating(INTERVAL, move || {
        let _ = tx.send(Instant::now());
      })
      .unwrap();
      let first = rx.recv().unwrap();
      let second = rx.recv().unwrap();
      let third = rx.recv().unwrap();
      assert!(first < second && second < third);
    });
  }

  #[test]
  fn cancel_stops_ticks_test() {
    async_context(|| {
      let count = Arc::new(AtomicUsize::new(0));
      let cloned = count.clone();
      let handle = Timer::repeating(INTERVAL, move || {
        cloned.fetch_add(1, Ordering::Relaxed);
      })
      .unwrap();
      std::thread::sleep(INTERVAL * 3);
      handle.cancel();
      assert!(!handle.active());
      let stopped = count.load(Ordering::Relaxed);
      std::thread::sleep(INTERVAL * 3);
      assert!(count.load(Ordering::Relaxed) <= stopped + 1);
    });
  }

  #[test]
  fn drop_cancels_test() {
    async_context(|| {
      let count = Arc::new(AtomicUsize::new(0));
      let cloned = count.clone();
      {
        let _handle = Timer::repeating(INTERVAL, move || {
          cloned.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
      }
      std::thread::sleep(INTERVAL * 3);
      assert_eq!(count.load(Ordering::Relaxed), 0);
    });
  }

  #[test]
  fn cancel_from_tick_test() {
    async_context(|| {
      let count = Arc::new(AtomicUsize::new(0));
      let slot: Arc<Mutex<Option<TimerHandle>>> = Arc::new(Mutex::new(None));
      let (cloned_count, cloned_slot) = (count.clone(), slot.clone());
      let handle = Timer::repeating(INTERVAL, move || {
        cloned_count.fetch_add(1, Ordering::Relaxed);
        if let Some(handle) = cloned_slot.lock().unwrap().take() {
          handle.cancel();
        }
      })
      .unwrap();
      *slot.lock().unwrap() = Some(handle);
      std::thread::sleep(INTERVAL * 4);
      assert_eq!(count.load(Ordering::Relaxed), 1);
    });
  }

  #[test]
  fn no_tick_after_cancel_returns_test() {
    async_context(|| {
      let late = Arc::new(AtomicUsize::new(0));
      for _ in 0..200 {
        let returned = Arc::new(AtomicBool::new(false));
        let (cloned_late, cloned_returned) = (late.clone(), returned.clone());
        let handle = Timer::repeating(Duration::from_nanos(1), move || {
          if cloned_returned.load(Ordering::SeqCst) {
            cloned_late.fetch_add(1, Ordering::SeqCst);
          }
        })
        .unwrap();
        std::thread::sleep(Duration::from_micros(50));
        handle.cancel();
        returned.store(true, Ordering::SeqCst);
        std::thread::sleep(Duration::from_micros(50));
      }
      assert_eq!(late.load(Ordering::SeqCst), 0);
    });
  }

  #[test]
  fn cancel_waits_for_running_tick_test() {
    async_context(|| {
      let (started_tx, started_rx) = std::sync::mpsc::channel();
      let finished = Arc::new(AtomicBool::new(false));
      let cloned = finished.clone();
      let handle = Timer::repeating(INTERVAL, move || {
        let _ = started_tx.send(());
        std::thread::sleep(INTERVAL * 2);
        cloned.store(true, Ordering::SeqCst);
      })
      .unwrap();
      started_rx.recv().unwrap();
      handle.cancel();
      assert!(finished.load(Ordering::SeqCst));
    });
  }
}
