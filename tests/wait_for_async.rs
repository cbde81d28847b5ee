//! End-to-end tests for async waits.
#![cfg(feature = "async")]

use std::fmt;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use waitfor::prelude::*;
use waitfor::{assert_exceptions_happened, assert_not_expected_value, execute_async, wait_for_async};

fn quick(max_wait: Duration) -> WaitConfig {
    WaitConfig::builder()
        .max_wait(max_wait)
        .and_then(|b| b.constant_step(Duration::from_millis(10)))
        .and_then(|b| b.timeout_message("Fail"))
        .expect("fresh builder")
        .build()
}

fn set_later(value: i32, delay: Duration) -> Arc<AtomicI32> {
    let shared = Arc::new(AtomicI32::new(0));
    let writer = Arc::clone(&shared);
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        writer.store(value, Ordering::SeqCst);
    });
    shared
}

#[derive(Debug)]
struct Unavailable;

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("service unavailable")
    }
}

impl std::error::Error for Unavailable {}

#[tokio::test]
async fn value_set_by_another_task_is_seen() {
    let shared = set_later(3, Duration::from_millis(50));

    let value = wait_for_async(|| {
        let shared = Arc::clone(&shared);
        async move { Ok::<_, Unavailable>(shared.load(Ordering::SeqCst)) }
    })
    .with_config(quick(Duration::from_secs(5)))
    .until_async(Condition::new("a == 3", |a: &i32| *a == 3))
    .await
    .unwrap()
    .on_failure(|_| 0);

    assert_eq!(value, 3);
}

#[tokio::test]
async fn timeout_keeps_last_value() {
    let outcome = wait_for_async(|| async { Ok::<_, Unavailable>(3) })
        .with_config(quick(Duration::from_millis(60)))
        .until_async(Condition::new("a == 4", |a: &i32| *a == 4))
        .await
        .unwrap();

    let failure = assert_not_expected_value!(outcome);
    assert_eq!(*failure.actual(), 3);
    assert!(failure.header().elapsed() >= Duration::from_millis(60));
}

#[tokio::test]
async fn ignorable_errors_are_collected() {
    let outcome = wait_for_async(|| async { Err::<i32, _>(Unavailable) })
        .with_config(quick(Duration::from_millis(40)))
        .until_async(Condition::from_fn(|_: &i32| true))
        .await
        .unwrap();

    let failure = assert_exceptions_happened!(outcome);
    assert_eq!(failure.groups().len(), 1);
    assert_eq!(u64::from(failure.header().attempts()), failure.total());
    assert_eq!(failure.groups()[0].details(), "service unavailable");
}

#[tokio::test]
async fn non_ignorable_error_aborts_after_one_attempt() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let err = wait_for_async(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Err::<i32, _>(Unavailable) }
    })
    .configure(|b| b.non_ignorable([ErrorKind::of::<Unavailable>()]))
    .unwrap()
    .until_async(Condition::from_fn(|_: &i32| true))
    .await
    .unwrap_err();

    assert!(err.is::<Unavailable>());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn execute_async_shares_config() {
    let config = quick(Duration::from_secs(1));
    let cond = Condition::new("n >= 2", |n: &usize| *n >= 2);
    let counter = AtomicUsize::new(0);
    let calls = &counter;

    let outcome = execute_async(
        move || async move { Ok::<_, Unavailable>(calls.fetch_add(1, Ordering::SeqCst)) },
        &cond,
        &config,
    )
    .await
    .unwrap();

    assert_eq!(outcome.success(), Some(2));
}

#[tokio::test]
async fn condition_async_times_out() {
    let err = WaitFor::condition_within_async(
        || async { false },
        Duration::from_millis(30),
        "never true",
    )
    .await
    .unwrap_err();

    assert!(err.is_failed());
    assert!(err.to_string().contains("never true"));
}
