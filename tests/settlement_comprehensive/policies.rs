//! Subscriber Policy Tests
//!
//! Replace: one slot per outcome, later registrations supersede earlier
//! ones, at most one delivery per cell. Fanout: every registration is
//! delivered once.

use crate::*;
use settle::{CellConfig, SettlementCell, SubscriberPolicy};

// ============================================================================
// Replace (default)
// ============================================================================

#[test]
fn test_default_policy_is_replace() {
    let m = manual::<i32, String>();
    assert_eq!(m.cell.policy(), SubscriberPolicy::Replace);
}

#[test]
fn test_replace_second_then_supersedes_first_before_settlement() {
    let recorder = Recorder::new();
    let m = manual::<i32, String>();

    m.cell
        .then(recorder.on_value("first"))
        .then(recorder.on_value("second"));
    m.fulfill.fulfill(1);

    assert_eq!(recorder.events(), vec!["second:ok:1"]);
}

#[test]
fn test_replace_second_then_after_delivery_is_never_invoked() {
    let recorder = Recorder::new();
    let cell = SettlementCell::<i32, String>::fulfilled(1);

    cell.then(recorder.on_value("first"))
        .then(recorder.on_value("second"));

    assert_eq!(recorder.events(), vec!["first:ok:1"]);
    assert_eq!(cell.waiting_callbacks(), 0);
}

#[test]
fn test_replace_then_and_catch_share_the_cell() {
    let recorder = Recorder::new();
    let m = manual::<i32, String>();
    m.cell
        .then(recorder.on_value("then"))
        .catch(recorder.on_reason("catch"));
    assert_eq!(m.cell.waiting_callbacks(), 2);

    m.reject.reject("no".into());
    assert_eq!(recorder.events(), vec![r#"catch:err:"no""#]);
    assert_eq!(m.cell.waiting_callbacks(), 0);
}

// ============================================================================
// Fanout
// ============================================================================

fn fanout<T, E>() -> Manual<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let mut handles = None;
    let cell = SettlementCell::with_config(
        CellConfig::new().with_policy(SubscriberPolicy::Fanout),
        |fulfill, reject| handles = Some((fulfill, reject)),
    );
    let (fulfill, reject) = handles.expect("executor runs synchronously");
    Manual {
        cell,
        fulfill,
        reject,
    }
}

#[test]
fn test_fanout_delivers_every_early_subscriber() {
    let recorder = Recorder::new();
    let m = fanout::<i32, String>();

    m.cell
        .then(recorder.on_value("a"))
        .then(recorder.on_value("b"))
        .catch(recorder.on_reason("c"));
    assert_eq!(m.cell.waiting_callbacks(), 3);

    m.fulfill.fulfill(7);
    assert_eq!(recorder.events(), vec!["a:ok:7", "b:ok:7"]);
}

#[test]
fn test_fanout_delivers_late_subscribers_immediately() {
    let recorder = Recorder::new();
    let m = fanout::<i32, String>();

    m.reject.reject("down".into());
    m.cell.catch(recorder.on_reason("one"));
    m.cell.catch(recorder.on_reason("two"));

    assert_eq!(
        recorder.events(),
        vec![r#"one:err:"down""#, r#"two:err:"down""#]
    );
}

#[test]
fn test_fanout_still_settles_once() {
    let recorder = Recorder::new();
    let m = fanout::<i32, String>();
    m.cell.then(recorder.on_value("then"));

    m.fulfill.fulfill(1);
    m.fulfill.fulfill(2);

    assert_eq!(recorder.events(), vec!["then:ok:1"]);
}

#[test]
fn test_config_from_json_selects_policy() {
    let config = CellConfig::from_json(r#"{"policy":"fanout","label":"jobs"}"#).unwrap();
    let cell = SettlementCell::<i32, String>::with_config(config, |fulfill, _| fulfill.fulfill(1));
    assert_eq!(cell.policy(), SubscriberPolicy::Fanout);
    assert_eq!(cell.label(), Some("jobs"));
}
