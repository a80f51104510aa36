//! Cell Lifecycle Tests
//!
//! Pending → Fulfilled | Rejected, terminal and irreversible.

use crate::*;
use settle::{CellState, Outcome, SettlementCell};
use std::thread;

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_cell_starts_pending() {
    let m = manual::<i32, String>();
    assert_eq!(m.cell.state(), CellState::Pending);
    assert!(m.cell.outcome().is_none());
}

#[test]
fn test_executor_may_settle_synchronously() {
    let cell = SettlementCell::<&str, String>::new(|fulfill, _| fulfill.fulfill("now"));
    assert_eq!(cell.state(), CellState::Fulfilled);
    assert_eq!(cell.value(), Some("now"));
}

#[test]
fn test_plain_constructors_are_already_settled() {
    assert_eq!(
        SettlementCell::<i32, String>::fulfilled(1).outcome(),
        Some(Outcome::Fulfilled(1))
    );
    assert_eq!(
        SettlementCell::<i32, String>::rejected("r".into()).outcome(),
        Some(Outcome::Rejected("r".to_string()))
    );
}

// ============================================================================
// Terminal Once
// ============================================================================

#[test]
fn test_fulfill_then_reject_keeps_value() {
    let m = manual::<i32, String>();
    m.fulfill.fulfill(1);
    m.reject.reject("ignored".into());

    assert_eq!(m.cell.state(), CellState::Fulfilled);
    assert_eq!(m.cell.value(), Some(1));
    assert_eq!(m.cell.reason(), None);
}

#[test]
fn test_reject_then_fulfill_keeps_reason() {
    let m = manual::<i32, String>();
    m.reject.reject("first".into());
    m.fulfill.fulfill(2);

    assert_eq!(m.cell.state(), CellState::Rejected);
    assert_eq!(m.cell.reason().as_deref(), Some("first"));
    assert_eq!(m.cell.value(), None);
}

#[test]
fn test_repeated_fulfill_keeps_first_value() {
    let m = manual::<i32, String>();
    for v in 1..=5 {
        m.fulfill.fulfill(v);
    }
    assert_eq!(m.cell.value(), Some(1));
}

#[test]
fn test_double_settlement_never_redelivers() {
    let recorder = Recorder::new();
    let m = manual::<i32, String>();
    m.cell
        .then(recorder.on_value("then"))
        .catch(recorder.on_reason("catch"));

    m.fulfill.fulfill(1);
    m.fulfill.fulfill(2);
    m.reject.reject("late".into());

    assert_eq!(recorder.events(), vec!["then:ok:1"]);
}

#[test]
fn test_racing_producers_settle_exactly_once() {
    init_tracing();
    let recorder = Recorder::new();
    let m = manual::<usize, String>();
    m.cell
        .then(recorder.on_value("then"))
        .catch(recorder.on_reason("catch"));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let fulfill = m.fulfill.clone();
            let reject = m.reject.clone();
            thread::spawn(move || {
                if i % 2 == 0 {
                    fulfill.fulfill(i);
                } else {
                    reject.reject(format!("r{}", i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(m.cell.state().is_settled());
    assert_eq!(recorder.len(), 1);
    let outcome = m.cell.outcome().unwrap();
    let expected = match outcome {
        Outcome::Fulfilled(v) => format!("then:ok:{}", v),
        Outcome::Rejected(r) => format!("catch:err:{:?}", r),
    };
    assert_eq!(recorder.events(), vec![expected]);
}

// ============================================================================
// Handles
// ============================================================================

#[test]
fn test_cloned_cell_observes_same_state() {
    let m = manual::<i32, String>();
    let observer = m.cell.clone();
    m.fulfill.fulfill(3);
    assert_eq!(observer.value(), Some(3));
}

#[test]
fn test_unsettled_cell_stays_pending_forever() {
    let m = manual::<i32, String>();
    drop(m.fulfill);
    drop(m.reject);
    assert!(m.cell.is_pending());
}
