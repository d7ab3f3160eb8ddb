use eventbridge::event::sequence::{channel, BufferingPolicy, YieldResult};
use eventbridge::event::subject::{PassthroughSubject, StateSubject, Subject};
use eventbridge::utils::testing;

use futures::executor::block_on;
use futures::StreamExt;

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

#[test]
fn simple_event_test() {
  testing::async_context(|| {
    let subject = PassthroughSubject::<String>::new();
    let finalize = Arc::new(AtomicBool::new(false));
    let (tx, rx) = std::sync::mpsc::channel();
    let tx = Mutex::new(tx);
    {
      let cloned = finalize.clone();
      let _subscription = subject
        .subscribe(move |x| {
          tx.lock().unwrap().send(x).unwrap();
        })
        .finalize(move || {
          cloned.store(true, Ordering::Relaxed);
        });
      subject.next("test".to_owned());
      assert_eq!(rx.recv().unwrap(), "test");
      assert_eq!(finalize.load(Ordering::Relaxed), false);
    }
    assert_eq!(finalize.load(Ordering::Relaxed), true);
  });
}

#[test]
fn broadcast_across_threads_test() {
  testing::async_context(|| {
    let subject = PassthroughSubject::<i32>::new();
    let sum = Arc::new(AtomicI32::new(0));
    let subscriptions: Vec<_> = (0..3)
      .map(|_| {
        let cloned = sum.clone();
        subject.subscribe(move |x: i32| {
          cloned.fetch_add(x, Ordering::Relaxed);
        })
      })
      .collect();
    let senders: Vec<_> = (1..=4)
      .map(|x| {
        let subject = subject.clone();
        std::thread::spawn(move || subject.next(x))
      })
      .collect();
    for sender in senders {
      sender.join().unwrap();
    }
    assert_eq!(sum.load(Ordering::Relaxed), 3 * (1 + 2 + 3 + 4));
    drop(subscriptions);
    assert_eq!(subject.num_observers(), 0);
  });
}

#[test]
fn subscribe_inside_handler_test() {
  let subject = PassthroughSubject::<i32>::new();
  let late = Arc::new(Mutex::new(Vec::new()));
  let held = Arc::new(Mutex::new(Vec::new()));
  let (cloned_subject, cloned_late, cloned_held) =
    (Arc::downgrade(&subject), late.clone(), held.clone());
  let _subscription = subject.subscribe(move |x: i32| {
    if x == 1 {
      if let Some(subject) = cloned_subject.upgrade() {
        let late = cloned_late.clone();
        let subscription = subject.subscribe(move |y| late.lock().unwrap().push(y));
        cloned_held.lock().unwrap().push(subscription);
      }
    }
  });
  subject.next(1);
  subject.next(2);
  assert_eq!(*late.lock().unwrap(), [2]);
}

#[test]
fn state_subject_latest_wins_test() {
  let state = StateSubject::new(0);
  for i in 1..=5 {
    state.next(i);
  }
  let seen = Arc::new(Mutex::new(Vec::new()));
  let cloned = seen.clone();
  let _subscription = state.subscribe(move |x| cloned.lock().unwrap().push(x));
  assert_eq!(*seen.lock().unwrap(), [5]);
}

#[test]
fn sequence_across_threads_test() {
  testing::async_context(|| {
    let (continuation, sequence) = channel(BufferingPolicy::Unbounded);
    let producer = std::thread::spawn(move || {
      for i in 0..100 {
        assert_eq!(
          continuation.yield_value(i),
          YieldResult::Enqueued { remaining: None }
        );
      }
    });
    let values: Vec<i32> = block_on(sequence.collect());
    producer.join().unwrap();
    assert_eq!(values, (0..100).collect::<Vec<_>>());
  });
}
