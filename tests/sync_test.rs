use eventbridge::event::sequence::{channel, BufferingPolicy};
use eventbridge::sync::executor::Executor;
use eventbridge::sync::task::TaskError;
use eventbridge::sync::timer::Timer;
use eventbridge::sync::worker::Worker;
use eventbridge::utils::testing;

use futures::StreamExt;

use std::time::Duration;

#[test]
fn timer_feeds_worker_consumer_test() {
  testing::async_context(|| {
    let worker: Worker<Vec<u32>> = Worker::named("sync-test-consumer").unwrap();
    let (continuation, sequence) = channel(BufferingPolicy::Unbounded);
    let consumer = worker.execute(async move { sequence.take(5).collect::<Vec<u32>>().await });
    let mut counter = 0;
    let timer = Timer::repeating(Duration::from_millis(10), move || {
      continuation.yield_value(counter);
      counter += 1;
    })
    .unwrap();
    assert_eq!(consumer.wait(), Ok(vec![0, 1, 2, 3, 4]));
    timer.cancel();
  });
}

#[test]
fn cancel_suspended_consumer_test() {
  testing::async_context(|| {
    let worker: Worker = Worker::named("sync-test-cancel").unwrap();
    let (continuation, mut sequence) = channel::<u32>(BufferingPolicy::BufferingNewest(1));
    let consumer = worker.execute(async move {
      while sequence.next().await.is_some() {}
    });
    std::thread::sleep(Duration::from_millis(20));
    assert!(!consumer.finished());
    consumer.cancel();
    assert_eq!(consumer.wait(), Err(TaskError::Cancelled));
    assert!(testing::wait_until(Duration::from_secs(1), || {
      continuation.is_terminated()
    }));
  });
}

#[test]
fn finished_sequence_completes_consumer_test() {
  testing::async_context(|| {
    let worker: Worker<usize> = Worker::named("sync-test-finish").unwrap();
    let (continuation, sequence) = channel::<u32>(BufferingPolicy::BufferingNewest(1));
    let consumer = worker.execute(async move { sequence.count().await });
    continuation.yield_value(1);
    drop(continuation);
    assert_eq!(consumer.wait_timeout(Duration::from_secs(1)), Ok(1));
  });
}
