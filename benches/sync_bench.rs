#![feature(test)]
use eventbridge::event::sequence::{channel, BufferingPolicy};
use eventbridge::event::subject::{PassthroughSubject, Subject};

extern crate test;
use futures::executor::block_on;
use futures::StreamExt;
use test::Bencher;

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

#[bench]
fn broadcast_benchmark(bencher: &mut Bencher) {
  let subject = PassthroughSubject::<i32>::new();
  let counter = Arc::new(AtomicI32::new(0));
  let subscriptions: Vec<_> = (0..10)
    .map(|_| {
      let cloned = counter.clone();
      subject.subscribe(move |x: i32| {
        cloned.fetch_add(x, Ordering::Relaxed);
      })
    })
    .collect();
  bencher.iter(|| {
    for _ in 0..100 {
      subject.next(1);
    }
  });
  drop(subscriptions);
}

#[bench]
fn sequence_benchmark(bencher: &mut Bencher) {
  bencher.iter(|| {
    let (continuation, sequence) = channel(BufferingPolicy::Unbounded);
    for i in 0..100 {
      continuation.yield_value(i);
    }
    drop(continuation);
    let total: i32 = block_on(sequence.fold(0, |acc, x| async move { acc + x }));
    assert_eq!(total, 4950);
  })
}
