use crate::sync::buffer::RingBuffer;

use futures::Stream;
use log::debug;

use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// What happens to values yielded while the consumer is not pulling
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BufferingPolicy {
  /// Keep every value
  Unbounded,
  /// Keep at most `n` values, discarding the oldest to make room
  BufferingNewest(usize),
  /// Keep at most `n` values, discarding new values while full
  BufferingOldest(usize),
}

impl Default for BufferingPolicy {
  fn default() -> Self {
    BufferingPolicy::Unbounded
  }
}

/// Outcome of [Continuation::yield_value]
#[derive(Debug, PartialEq)]
pub enum YieldResult<T> {
  /// The value is buffered; `remaining` counts free buffer slots, `None` when
  /// unbounded
  Enqueued { remaining: Option<usize> },
  /// The buffer was full and this value was discarded: the oldest buffered
  /// value under [BufferingPolicy::BufferingNewest], the yielded value under
  /// [BufferingPolicy::BufferingOldest]
  Dropped(T),
  /// The sequence is finished or its consumer is gone
  Terminated,
}

struct SequenceState<T> {
  buffer: RingBuffer<T>,
  policy: BufferingPolicy,
  waker: Option<Waker>,
  finished: bool,
  terminated: bool,
}

struct Shared<T> {
  state: Mutex<SequenceState<T>>,
  producers: AtomicUsize,
}

impl<T> Shared<T> {
  fn finish(&self) {
    let waker = {
      let mut state = self.state.lock().unwrap();
      if state.finished {
        return;
      }
      state.finished = true;
      state.waker.take()
    };
    if let Some(waker) = waker {
      waker.wake();
    }
  }
}

/// Creates a single consumer, pull based asynchronous sequence together with
/// the continuation used to feed it.
///
/// The continuation side is a plain callback friendly handle: it never blocks
/// and may be invoked from any thread. The sequence side implements
/// [Stream] and suspends the consumer until a value is available or the
/// sequence finishes. Values are delivered in the order they were yielded.
///
/// # Example
/// ```
/// use eventbridge::event::sequence::{channel, BufferingPolicy, YieldResult};
/// use futures::executor::block_on;
/// use futures::StreamExt;
///
/// let (continuation, mut sequence) = channel(BufferingPolicy::BufferingNewest(1));
/// continuation.yield_value(1);
/// assert_eq!(continuation.yield_value(2), YieldResult::Dropped(1));
/// continuation.finish();
/// assert_eq!(block_on(sequence.next()), Some(2));
/// assert_eq!(block_on(sequence.next()), None);
/// ```
pub fn channel<T>(policy: BufferingPolicy) -> (Continuation<T>, AsyncSequence<T>) {
  let buffer = match policy {
    BufferingPolicy::Unbounded => RingBuffer::unbounded(),
    BufferingPolicy::BufferingNewest(size)
    | BufferingPolicy::BufferingOldest(size) => RingBuffer::bounded(size),
  };
  let shared = Arc::new(Shared {
    state: Mutex::new(SequenceState {
      buffer,
      policy,
      waker: None,
      finished: false,
      terminated: false,
    }),
    producers: AtomicUsize::new(1),
  });
  (
    Continuation {
      shared: shared.clone(),
    },
    AsyncSequence { shared },
  )
}

/// The producing side of an [AsyncSequence]. The sequence finishes once
/// `finish` is called or every clone of the continuation is dropped.
pub struct Continuation<T> {
  shared: Arc<Shared<T>>,
}

impl<T> Continuation<T> {
  /// Hands a value to the sequence without blocking
  ///
  /// A consumer which is suspended waiting for a value always receives it,
  /// even with a zero sized buffer.
  pub fn yield_value(&self, value: T) -> YieldResult<T> {
    let (result, waker) = {
      let mut state = self.shared.state.lock().unwrap();
      if state.finished || state.terminated {
        return YieldResult::Terminated;
      }
      let waiting = state.waker.is_some() && state.buffer.is_empty();
      let result = if waiting && state.buffer.is_full() {
        state.buffer.force_push(value);
        YieldResult::Enqueued { remaining: Some(0) }
      } else {
        match state.policy {
          BufferingPolicy::BufferingOldest(_) if state.buffer.is_full() => {
            YieldResult::Dropped(value)
          }
          _ => match state.buffer.push(value) {
            Some(displaced) => YieldResult::Dropped(displaced),
            None => YieldResult::Enqueued {
              remaining: state.buffer.remaining(),
            },
          },
        }
      };
      (result, state.waker.take())
    };
    if let Some(waker) = waker {
      waker.wake();
    }
    result
  }

  pub fn finish(&self) {
    self.shared.finish();
  }

  /// Whether the consumer dropped its end of the sequence
  pub fn is_terminated(&self) -> bool {
    let state = self.shared.state.lock().unwrap();
    state.finished || state.terminated
  }
}

impl<T> Clone for Continuation<T> {
  fn clone(&self) -> Self {
    self.shared.producers.fetch_add(1, Ordering::Relaxed);
    Continuation {
      shared: self.shared.clone(),
    }
  }
}

impl<T> Drop for Continuation<T> {
  fn drop(&mut self) {
    if self.shared.producers.fetch_sub(1, Ordering::AcqRel) == 1 {
      self.shared.finish();
    }
  }
}

/// The consuming side of a [channel].
///
/// Values buffered before the sequence finished are still delivered, after
/// which every pull yields `None`. Dropping the sequence terminates it: later
/// yields report [YieldResult::Terminated].
pub struct AsyncSequence<T> {
  shared: Arc<Shared<T>>,
}

impl<T> AsyncSequence<T> {
  pub fn is_finished(&self) -> bool {
    let state = self.shared.state.lock().unwrap();
    state.finished && state.buffer.is_empty()
  }
}

impl<T> Stream for AsyncSequence<T> {
  type Item = T;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
    let mut state = self.shared.state.lock().unwrap();
    if let Some(value) = state.buffer.pop() {
      return Poll::Ready(Some(value));
    }
    if state.finished {
      return Poll::Ready(None);
    }
    state.waker = Some(cx.waker().clone());
    Poll::Pending
  }
}

impl<T> Drop for AsyncSequence<T> {
  fn drop(&mut self) {
    let mut state = self.shared.state.lock().unwrap();
    state.terminated = true;
    state.waker = None;
    state.buffer.clear();
    debug!("async sequence consumer dropped");
  }
}
