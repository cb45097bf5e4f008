use super::*;
use std::sync::atomic::{AtomicU32, Ordering};

#[tokio::test]
async fn first_success_short_circuits() {
    let calls = AtomicU32::new(0);
    let outcome = RetryPolicy::new(3)
        .run(|n| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, String>(n * 10) }
        })
        .await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(outcome, RetryOutcome::Succeeded { attempt: 1, value: 10, ref failures } if failures.is_empty()));
}

#[tokio::test]
async fn succeeds_after_failures() {
    let outcome = RetryPolicy::new(3)
        .run(|n| async move { if n < 3 { Err(format!("fail {n}")) } else { Ok(n) } })
        .await;
    assert_eq!(outcome.attempts(), 3);
    let RetryOutcome::Succeeded { value, failures, .. } = outcome else {
        panic!("expected success");
    };
    assert_eq!(value, 3);
    assert_eq!(failures, vec!["fail 1".to_string(), "fail 2".to_string()]);
}

#[tokio::test]
async fn exhaustion_reports_last_error() {
    let calls = AtomicU32::new(0);
    let outcome = RetryPolicy::new(3)
        .run(|n| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err::<(), _>(format!("fail {n}")) }
        })
        .await;
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(outcome.attempts(), 3);
    let RetryOutcome::Exhausted { last, failures } = outcome else {
        panic!("expected exhaustion");
    };
    assert_eq!(last, "fail 3");
    assert_eq!(failures.len(), 2);
}

#[tokio::test]
async fn zero_is_raised_to_one_attempt() {
    let policy = RetryPolicy::new(0);
    assert_eq!(policy.max_attempts(), 1);
    let outcome = policy.run(|_| async { Err::<(), _>("nope") }).await;
    assert_eq!(outcome.attempts(), 1);
}
