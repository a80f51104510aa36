//! Attachment Order Tests
//!
//! A callback attached before settlement and one attached after must be
//! observed the same way: exactly once, with the settled payload.

use crate::*;
use settle::SettlementCell;
use std::time::Duration;

#[test]
fn test_then_attached_before_fulfilment() {
    let recorder = Recorder::new();
    let m = manual::<&str, String>();

    m.cell.then(recorder.on_value("then"));
    assert!(recorder.is_empty());

    m.fulfill.fulfill("V");
    assert_eq!(recorder.events(), vec![r#"then:ok:"V""#]);
}

#[test]
fn test_then_attached_after_fulfilment() {
    let recorder = Recorder::new();
    let m = manual::<&str, String>();

    m.fulfill.fulfill("V");
    m.cell.then(recorder.on_value("then"));
    assert_eq!(recorder.events(), vec![r#"then:ok:"V""#]);
}

#[test]
fn test_catch_attached_before_rejection() {
    let recorder = Recorder::new();
    let m = manual::<i32, String>();

    m.cell.catch(recorder.on_reason("catch"));
    m.reject.reject("boom".into());
    assert_eq!(recorder.events(), vec![r#"catch:err:"boom""#]);
}

#[test]
fn test_catch_attached_after_rejection() {
    let recorder = Recorder::new();
    let m = manual::<i32, String>();

    m.reject.reject("boom".into());
    m.cell.catch(recorder.on_reason("catch"));
    assert_eq!(recorder.events(), vec![r#"catch:err:"boom""#]);
}

#[test]
fn test_on_settle_routes_by_outcome() {
    let fulfilled = Recorder::new();
    SettlementCell::<i32, String>::fulfilled(1)
        .on_settle(Some(fulfilled.on_value("f")), Some(fulfilled.on_reason::<String>("r")));
    assert_eq!(fulfilled.events(), vec!["f:ok:1"]);

    let rejected = Recorder::new();
    SettlementCell::<i32, String>::rejected("no".into())
        .on_settle(Some(rejected.on_value::<i32>("f")), Some(rejected.on_reason("r")));
    assert_eq!(rejected.events(), vec![r#"r:err:"no""#]);
}

#[test]
fn test_on_settle_with_only_rejection_handler() {
    let recorder = Recorder::new();
    let m = manual::<i32, String>();
    m.cell.on_settle(None::<fn(i32)>, Some(recorder.on_reason("r")));

    m.reject.reject("x".into());
    assert_eq!(recorder.events(), vec![r#"r:err:"x""#]);
}

#[test]
fn test_mismatched_handler_waits_for_matching_one() {
    let recorder = Recorder::new();
    let cell = SettlementCell::<i32, String>::rejected("late catch".into());

    cell.then(recorder.on_value("then"));
    assert!(recorder.is_empty());

    cell.catch(recorder.on_reason("catch"));
    assert_eq!(recorder.events(), vec![r#"catch:err:"late catch""#]);
}

#[test]
fn test_deferred_settlement_reaches_early_callback() {
    let recorder = Recorder::new();
    let cell = SettlementCell::<i32, String>::fulfill_after(5, Duration::from_millis(10));
    cell.then(recorder.on_value("then"));

    assert!(cell.wait_timeout(Duration::from_secs(5)).is_some());
    assert_eq!(recorder.wait_for(1, Duration::from_secs(5)), vec!["then:ok:5"]);
}

#[test]
fn test_callback_may_attach_to_another_cell() {
    let recorder = Recorder::new();
    let inner = SettlementCell::<i32, String>::fulfilled(2);
    let outer = SettlementCell::<i32, String>::fulfilled(1);

    let nested = recorder.clone();
    outer.then(move |v| {
        nested.on_value::<i32>("outer")(v);
        inner.then(nested.on_value("inner"));
    });

    assert_eq!(recorder.events(), vec!["outer:ok:1", "inner:ok:2"]);
}
