//! Integration tests for the serialized evaluation worker, driven through
//! the controller-facing [`Evaluator`] contract.

use scrawl_core::{Evaluator, Outcome};
use scrawl_engine::SessionHandle;

fn eval(handle: &mut SessionHandle, code: &str) -> Outcome {
    handle
        .begin_eval(code)
        .recv()
        .expect("worker delivered an outcome")
}

// =============================================================================
// Outcome mapping
// =============================================================================

#[test]
fn worker_maps_values_no_values_and_errors() {
    let mut handle = SessionHandle::new();

    assert_eq!(eval(&mut handle, "1 + 2"), Outcome::Value("3".to_string()));
    assert_eq!(eval(&mut handle, "let x = 1"), Outcome::NoValue);

    match eval(&mut handle, "1 +") {
        Outcome::Value(message) => assert!(!message.is_empty()),
        other => panic!("parse failure should render as a value, got {other:?}"),
    }
}

#[test]
fn worker_shares_one_scope_across_submissions() {
    let mut handle = SessionHandle::new();

    assert_eq!(eval(&mut handle, "fn f(x) { 1000 * x }"), Outcome::NoValue);
    assert_eq!(eval(&mut handle, "f(5)"), Outcome::Value("5000".to_string()));

    assert_eq!(eval(&mut handle, "let n = 7"), Outcome::NoValue);
    assert_eq!(eval(&mut handle, "n + 1"), Outcome::Value("8".to_string()));
}

// =============================================================================
// Dispatch order and queuing
// =============================================================================

#[test]
fn queued_jobs_complete_in_dispatch_order() {
    let mut handle = SessionHandle::new();

    // Dispatch everything before collecting anything: the worker must
    // process the queue in order for the dependent snippets to resolve.
    let a = handle.begin_eval("let base = 10");
    let b = handle.begin_eval("let bumped = base + 32");
    let c = handle.begin_eval("bumped");

    assert_eq!(a.recv().unwrap(), Outcome::NoValue);
    assert_eq!(b.recv().unwrap(), Outcome::NoValue);
    assert_eq!(c.recv().unwrap(), Outcome::Value("42".to_string()));
}

// =============================================================================
// Reset
// =============================================================================

#[test]
fn reset_starts_a_fresh_scope() {
    let mut handle = SessionHandle::new();

    assert_eq!(eval(&mut handle, "let x = 1"), Outcome::NoValue);
    assert_eq!(eval(&mut handle, "x"), Outcome::Value("1".to_string()));

    handle.reset();

    // The old binding is gone; the lookup fails with an interpreter
    // message rendered as the outcome.
    match eval(&mut handle, "x") {
        Outcome::Value(message) => assert!(!message.is_empty()),
        other => panic!("expected an error message outcome, got {other:?}"),
    }
}
