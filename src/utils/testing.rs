use std::{sync::mpsc, thread, time::Duration, time::Instant};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Runs `f` on a separate thread, panicking if it does not finish within `d`
pub fn panic_after<T, F>(d: Duration, f: F) -> T
where
  T: Send + 'static,
  F: FnOnce() -> T + Send + 'static,
{
  let (done_tx, done_rx) = mpsc::channel();
  let handle = thread::Builder::new()
    .name("testing-thread".to_owned())
    .spawn(move || {
      let val = f();
      done_tx.send(()).expect("failed to send complete signal");
      val
    })
    .unwrap();
  match done_rx.recv_timeout(d) {
    Ok(_) => handle.join().expect("thread panicked"),
    Err(error) => match error {
      mpsc::RecvTimeoutError::Timeout => panic!("thread took too long"),
      mpsc::RecvTimeoutError::Disconnected => panic!("thread panicked"),
    },
  }
}

pub fn async_context<T, F>(f: F) -> T
where
  T: Send + 'static,
  F: FnOnce() -> T + Send + 'static,
{
  panic_after(DEFAULT_TIMEOUT, f)
}

/// Polls `condition` until it holds or `timeout` elapses, returning whether it
/// held
pub fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
  F: FnMut() -> bool,
{
  let deadline = Instant::now() + timeout;
  loop {
    if condition() {
      return true;
    }
    if Instant::now() >= deadline {
      return false;
    }
    thread::sleep(POLL_INTERVAL);
  }
}
