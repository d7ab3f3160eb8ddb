use std::collections::VecDeque;

/// A first in, first out buffer which optionally holds at most `capacity`
/// values. Pushing into a full buffer overwrites the oldest value.
pub struct RingBuffer<T> {
  raw: VecDeque<T>,
  capacity: Option<usize>,
}

impl<T> RingBuffer<T> {
  pub fn bounded(capacity: usize) -> RingBuffer<T> {
    RingBuffer {
      raw: VecDeque::with_capacity(capacity),
      capacity: Some(capacity),
    }
  }

  pub fn unbounded() -> RingBuffer<T> {
    RingBuffer {
      raw: VecDeque::new(),
      capacity: None,
    }
  }

  pub fn capacity(&self) -> Option<usize> {
    self.capacity
  }

  pub fn len(&self) -> usize {
    self.raw.len()
  }

  pub fn is_empty(&self) -> bool {
    self.raw.is_empty()
  }

  pub fn is_full(&self) -> bool {
    match self.capacity {
      Some(capacity) => self.raw.len() >= capacity,
      None => false,
    }
  }

  /// Free slots left before pushes start overwriting, `None` if unbounded
  pub fn remaining(&self) -> Option<usize> {
    self
      .capacity
      .map(|capacity| capacity.saturating_sub(self.raw.len()))
  }

  /// Pushes a value to the back of the buffer, returning the value it
  /// displaced if the buffer was full
  ///
  /// A zero capacity buffer never stores anything: the pushed value is
  /// returned as displaced.
  pub fn push(&mut self, value: T) -> Option<T> {
    match self.capacity {
      Some(0) => Some(value),
      Some(capacity) if self.raw.len() >= capacity => {
        let displaced = self.raw.pop_front();
        self.raw.push_back(value);
        displaced
      }
      _ => {
        self.raw.push_back(value);
        None
      }
    }
  }

  /// Pushes a value ignoring the capacity bound
  pub(crate) fn force_push(&mut self, value: T) {
    self.raw.push_back(value);
  }

  pub fn pop(&mut self) -> Option<T> {
    self.raw.pop_front()
  }

  pub fn clear(&mut self) {
    self.raw.clear();
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn new_ring_buffer_test() {
    let ring = RingBuffer::<()>::bounded(5);
    assert_eq!(ring.capacity(), Some(5));
    assert!(ring.is_empty());
    assert!(!ring.is_full());
    assert_eq!(ring.remaining(), Some(5));
  }

  #[test]
  fn push_test() {
    let mut ring = RingBuffer::bounded(5);
    assert_eq!(ring.push(1), None);
    assert_eq!(ring.push(2), None);
    assert_eq!(ring.push(3), None);
    assert_eq!(ring.len(), 3);
    assert_eq!(ring.remaining(), Some(2));
    assert_eq!(ring.raw, [1, 2, 3]);
  }

  #[test]
  fn overflow_test() {
    let mut ring = RingBuffer::bounded(3);
    ring.push(1);
    ring.push(2);
    ring.push(3);
    assert_eq!(ring.push(4), Some(1));
    assert_eq!(ring.push(5), Some(2));
    assert_eq!(ring.push(6), Some(3));
    assert!(ring.is_full());
    assert_eq!(ring.raw, [4, 5, 6]);
  }

  #[test]
  fn pop_order_test() {
    let mut ring = RingBuffer::unbounded();
    for i in 0..10 {
      assert_eq!(ring.push(i), None);
    }
    assert_eq!(ring.remaining(), None);
    let drained: Vec<i32> = std::iter::from_fn(|| ring.pop()).collect();
    assert_eq!(drained, (0..10).collect::<Vec<_>>());
  }

  #[test]
  fn zero_capacity_test() {
    let mut ring = RingBuffer::bounded(0);
    assert_eq!(ring.push(1), Some(1));
    assert!(ring.is_empty());
    ring.force_push(2);
    assert_eq!(ring.pop(), Some(2));
  }
}
