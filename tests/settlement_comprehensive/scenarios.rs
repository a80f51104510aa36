//! Reference Scenarios
//!
//! End-to-end flows mirroring how producers and consumers use cells.

use crate::*;
use settle::{all, later, Outcome, SettlementCell};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn test_deferred_rejection_reaches_catch_exactly_once() {
    init_tracing();
    let recorder = Recorder::new();
    let cell = SettlementCell::<i32, String>::new(|_fulfill, reject| {
        later(Duration::from_millis(10), move || reject.reject("boom".into()));
    });
    cell.catch(recorder.on_reason("log"));

    assert_eq!(cell.wait_timeout(WAIT), Some(Outcome::Rejected("boom".to_string())));
    assert_eq!(recorder.wait_for(1, WAIT), vec![r#"log:err:"boom""#]);

    // Nothing arrives later either
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(recorder.len(), 1);
}

#[test]
fn test_then_catch_chain_on_deferred_cells() {
    let recorder = Recorder::new();
    let rejected = SettlementCell::<&str, String>::reject_after("Promise rejected".into(), Duration::from_millis(10));
    let fulfilled = SettlementCell::<&str, String>::fulfill_after("Promise resolved", Duration::from_millis(10));

    rejected
        .then(recorder.on_value("rejected-then"))
        .catch(recorder.on_reason("rejected-catch"));
    fulfilled
        .then(recorder.on_value("fulfilled-then"))
        .catch(recorder.on_reason("fulfilled-catch"));

    let mut events = recorder.wait_for(2, WAIT);
    events.sort();
    assert_eq!(
        events,
        vec![
            r#"fulfilled-then:ok:"Promise resolved""#,
            r#"rejected-catch:err:"Promise rejected""#,
        ]
    );
}

#[test]
fn test_staggered_producers_gathered_in_submission_order() {
    let promises = vec![
        SettlementCell::<String, String>::fulfill_after("Promise 1 resolved".into(), Duration::from_millis(60)),
        SettlementCell::fulfill_after("Promise 2 resolved".into(), Duration::from_millis(30)),
        SettlementCell::fulfill_after("Promise 3 resolved".into(), Duration::from_millis(10)),
    ];
    let combined: SettlementCell<Vec<String>, String> = all(promises);

    assert_eq!(
        combined.wait_timeout(WAIT).and_then(|o| o.into_result().ok()),
        Some(vec![
            "Promise 1 resolved".to_string(),
            "Promise 2 resolved".to_string(),
            "Promise 3 resolved".to_string(),
        ])
    );
}

#[test]
fn test_one_rejected_producer_fails_the_batch() {
    let promises = vec![
        SettlementCell::<String, String>::fulfill_after("Promise 1 resolved".into(), Duration::from_millis(150)),
        SettlementCell::fulfill_after("Promise 2 resolved".into(), Duration::from_millis(100)),
        SettlementCell::reject_after("Promise 4 rejected".into(), Duration::from_millis(20)),
    ];
    let combined: SettlementCell<Vec<String>, String> = all(promises);

    assert_eq!(
        combined.wait_timeout(WAIT),
        Some(Outcome::Rejected("Promise 4 rejected".to_string()))
    );
}
