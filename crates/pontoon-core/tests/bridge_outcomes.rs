//! Integration tests for bridge outcome translation.
//!
//! Tests that values, application errors, and panics cross the bridge with
//! their identity intact, including under concurrent calls.

use std::fmt;
use std::thread;
use std::time::Duration;

use pontoon_core::{BridgeError, call, call_timeout};

#[derive(Debug, PartialEq)]
struct FetchError(String);

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Test the plain happy path end to end.
#[test]
fn test_value_after_short_delay() {
    let value = call_timeout(
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            42
        },
        Duration::from_secs(1),
    )
    .unwrap();

    assert_eq!(value, 42);
}

/// Test that an application error crosses the bridge unchanged.
#[test]
fn test_application_error_passes_through() {
    let result = call(async { Err::<i32, FetchError>(FetchError("bad".to_string())) }).unwrap();

    let err = result.unwrap_err();
    assert_eq!(err, FetchError("bad".to_string()));
    assert_eq!(err.to_string(), "bad");
}

/// Test that a panic inside the future surfaces with its message.
#[test]
fn test_panic_surfaces_with_message() {
    let err = call(async {
        panic!("kaboom: {}", 7);
    })
    .unwrap_err();

    assert!(matches!(err, BridgeError::Panicked(m) if m == "kaboom: 7"));
}

/// Test that concurrent calls resolve independently.
#[test]
fn test_concurrent_calls_stay_independent() {
    let handles: Vec<_> = (0..8)
        .map(|i: u64| {
            thread::spawn(move || {
                call_timeout(
                    async move {
                        // Stagger completion so results cannot line up by accident.
                        tokio::time::sleep(Duration::from_millis(10 * (i % 4))).await;
                        i * 2
                    },
                    Duration::from_secs(5),
                )
                .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), i as u64 * 2);
    }
}

/// Test that one timing-out call does not disturb its neighbors.
#[test]
fn test_timeout_does_not_disturb_neighbors() {
    let slow = thread::spawn(|| {
        call_timeout(
            async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                0
            },
            Duration::from_millis(100),
        )
    });
    let fast = thread::spawn(|| {
        call_timeout(
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                1
            },
            Duration::from_secs(5),
        )
    });

    let slow_result = slow.join().unwrap();
    let fast_result = fast.join().unwrap();

    assert!(matches!(slow_result, Err(BridgeError::TimedOut(_))));
    assert_eq!(fast_result.unwrap(), 1);
}
