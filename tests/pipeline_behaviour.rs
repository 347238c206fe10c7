//! Integration tests for the interception pipeline.
//! Covers:
//! - Passthrough of driver results and errors, even when telemetry fails
//! - Deduplication by execution id per call-site
//! - No request, no event
//! - Exit correlation for fuzz/replay requests
//! - Single payload capture for cursors

mod common;

use common::*;
use lilith_nosql::config::Config;
use lilith_nosql::driver::{Argument, Instance, Prototype};
use lilith_nosql::engine_core::capture::CaptureShape;
use lilith_nosql::engine_core::constants::state_keys;
use lilith_nosql::engine_core::errors::DriverError;
use lilith_nosql::engine_core::interceptor::NoSqlInterceptor;
use lilith_nosql::engine_core::traits::EventTransport;
use lilith_nosql::engine_core::types::{EventCategory, OperationCategory};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

// --- Helpers ---

fn collection(interceptor: &Arc<NoSqlInterceptor>) -> Arc<Instance> {
    let proto = Prototype::new("Collection");
    proto.define("insertOne", |_, args| {
        Ok(json!({"acknowledged": true, "args": args.len()}))
    });
    proto.define("deleteOne", |_, _| {
        Err(DriverError::with_code(11000, "E11000 duplicate key error"))
    });
    // Fires its trailing callback once per `times` argument.
    proto.define("updateOne", |_, args| {
        let times = args
            .first()
            .and_then(Argument::as_value)
            .and_then(|v| v["times"].as_u64())
            .unwrap_or(1);
        let fail = args
            .first()
            .and_then(Argument::as_value)
            .and_then(|v| v["fail"].as_bool())
            .unwrap_or(false);
        if let Some(Argument::Callback(cb)) = args.last() {
            for _ in 0..times {
                if fail {
                    cb(Some(&DriverError::new("write conflict")), None);
                } else {
                    cb(None, Some(&json!({"modifiedCount": 1})));
                }
            }
        }
        Ok(Value::Null)
    });
    for method in ["insertOne", "deleteOne", "updateOne"] {
        interceptor
            .hook(&proto, method, CaptureShape::OneShot)
            .unwrap();
    }
    Instance::new(&proto)
}

fn counting_callback() -> (Argument, Arc<Mutex<Vec<bool>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = calls.clone();
    let cb = Argument::callback(move |err, _| sink.lock().unwrap().push(err.is_none()));
    (cb, calls)
}

// --- Passthrough ---

#[test]
fn test_passthrough_of_results_and_errors() {
    let (interceptor, transport) = interceptor(EventCategory::DocumentDb);
    let users = collection(&interceptor);
    let request = plain_request("req-1");

    let ok = within(&request, || {
        users.call("insertOne", vec![json!({"name": "a"}).into()])
    });
    assert_eq!(ok.unwrap(), json!({"acknowledged": true, "args": 1}));

    let err = within(&request, || users.call("deleteOne", vec![json!({"_id": 1}).into()]));
    assert_eq!(
        err.unwrap_err(),
        DriverError::with_code(11000, "E11000 duplicate key error")
    );
    assert_eq!(transport.enter().len(), 1, "same request on same call-site");
}

#[test]
fn test_failing_transport_never_reaches_caller() {
    let transports: [Arc<dyn EventTransport>; 2] =
        [Arc::new(BrokenTransport), Arc::new(PanickingTransport)];
    for transport in transports {
        let interceptor = Arc::new(NoSqlInterceptor::new(
            &Config::default(),
            EventCategory::DocumentDb,
            collaborators(transport),
        ));
        let users = collection(&interceptor);
        let (cb, calls) = counting_callback();

        let out = within(&fuzz_request("req-2", "scan-1"), || {
            users.call("insertOne", vec![json!({"name": "a"}).into()])
        });
        assert_eq!(out.unwrap(), json!({"acknowledged": true, "args": 1}));

        within(&fuzz_request("req-3", "scan-2"), || {
            users.call("updateOne", vec![json!({"times": 1}).into(), cb])
        })
        .unwrap();
        assert_eq!(*calls.lock().unwrap(), vec![true]);
    }
}

#[test]
fn test_failed_emit_is_retried_on_next_call() {
    let interceptor = Arc::new(NoSqlInterceptor::new(
        &Config::default(),
        EventCategory::DocumentDb,
        collaborators(Arc::new(BrokenTransport)),
    ));
    let users = collection(&interceptor);
    within(&plain_request("req-4"), || {
        users.call("insertOne", vec![json!({}).into()])
    })
    .unwrap();

    let last = interceptor
        .registry()
        .with_existing(users.id(), |state| state.last_execution_id.clone())
        .flatten();
    assert_eq!(last, None);
}

// --- Deduplication ---

#[test]
fn test_dedup_by_execution_id_per_call_site() {
    let (interceptor, transport) = interceptor(EventCategory::DocumentDb);
    let users = collection(&interceptor);
    let orders = collection(&interceptor);

    let first = fuzz_request("req-5", "scan-a");
    let retry = fuzz_request("req-6", "scan-a");
    let next = fuzz_request("req-7", "scan-b");

    within(&first, || users.call("insertOne", vec![json!({}).into()])).unwrap();
    within(&retry, || users.call("insertOne", vec![json!({}).into()])).unwrap();
    within(&retry, || orders.call("insertOne", vec![json!({}).into()])).unwrap();
    within(&next, || users.call("insertOne", vec![json!({}).into()])).unwrap();

    let ids: Vec<String> = transport
        .enter()
        .iter()
        .map(|e| e.execution_id().to_string())
        .collect();
    assert_eq!(ids, vec!["scan-a", "scan-a", "scan-b"]);
}

// --- No request ---

#[test]
fn test_no_request_no_event() {
    let (interceptor, transport) = interceptor(EventCategory::DocumentDb);
    let users = collection(&interceptor);
    let (cb, calls) = counting_callback();

    let out = users.call("insertOne", vec![json!({"name": "a"}).into()]);
    assert!(out.is_ok());
    users
        .call("updateOne", vec![json!({"times": 1}).into(), cb])
        .unwrap();

    assert!(transport.enter().is_empty());
    assert!(transport.exit().is_empty());
    assert_eq!(*calls.lock().unwrap(), vec![true]);
}

// --- Exit correlation ---

#[test]
fn test_exit_emitted_once_on_success() {
    let (interceptor, transport) = interceptor(EventCategory::DocumentDb);
    let users = collection(&interceptor);
    let (cb, calls) = counting_callback();

    within(&fuzz_request("req-8", "scan-1"), || {
        users.call("updateOne", vec![json!({"times": 2}).into(), cb])
    })
    .unwrap();

    assert_eq!(*calls.lock().unwrap(), vec![true, true]);
    let enter = transport.enter();
    let exit = transport.exit();
    assert_eq!(enter.len(), 1);
    assert_eq!(exit.len(), 1);
    assert!(Arc::ptr_eq(&enter[0], &exit[0]));
}

#[test]
fn test_no_exit_on_error_completion() {
    let (interceptor, transport) = interceptor(EventCategory::DocumentDb);
    let users = collection(&interceptor);
    let (cb, calls) = counting_callback();

    within(&fuzz_request("req-9", "scan-1"), || {
        users.call("updateOne", vec![json!({"fail": true}).into(), cb])
    })
    .unwrap();

    assert_eq!(*calls.lock().unwrap(), vec![false]);
    assert_eq!(transport.enter().len(), 1);
    assert!(transport.exit().is_empty());
}

#[test]
fn test_plain_request_is_not_correlated() {
    let (interceptor, transport) = interceptor(EventCategory::DocumentDb);
    let users = collection(&interceptor);
    let (cb, calls) = counting_callback();

    within(&plain_request("req-10"), || {
        users.call("updateOne", vec![json!({}).into(), cb])
    })
    .unwrap();

    assert_eq!(*calls.lock().unwrap(), vec![true]);
    assert_eq!(transport.enter().len(), 1);
    assert!(transport.exit().is_empty());
}

#[test]
fn test_no_trailing_callback_no_exit() {
    let (interceptor, transport) = interceptor(EventCategory::DocumentDb);
    let users = collection(&interceptor);

    within(&fuzz_request("req-11", "scan-1"), || {
        users.call("updateOne", vec![json!({}).into()])
    })
    .unwrap();

    assert_eq!(transport.enter().len(), 1);
    assert!(transport.exit().is_empty());
}

type Stash = Arc<Mutex<Vec<lilith_nosql::driver::Callback>>>;

/// Collection whose `updateOne` keeps its callback for the test to fire later.
fn deferred_collection(interceptor: &Arc<NoSqlInterceptor>) -> (Arc<Instance>, Stash) {
    let stash: Stash = Arc::new(Mutex::new(Vec::new()));
    let sink = stash.clone();
    let proto = Prototype::new("Collection");
    proto.define("updateOne", move |_, args| {
        if let Some(Argument::Callback(cb)) = args.last() {
            sink.lock().unwrap().push(Arc::clone(cb));
        }
        Ok(Value::Null)
    });
    interceptor
        .hook(&proto, "updateOne", CaptureShape::OneShot)
        .unwrap();
    (Instance::new(&proto), stash)
}

fn exit_ids(transport: &RecordingTransport) -> Vec<String> {
    transport
        .exit()
        .iter()
        .map(|e| e.execution_id().to_string())
        .collect()
}

#[test]
fn test_overlapping_calls_exit_with_their_own_event() {
    let (interceptor, transport) = interceptor(EventCategory::DocumentDb);
    let (users, stash) = deferred_collection(&interceptor);
    let (first, _) = counting_callback();
    let (second, _) = counting_callback();

    within(&fuzz_request("req-20", "scan-1"), || {
        users.call("updateOne", vec![json!({}).into(), first])
    })
    .unwrap();
    within(&fuzz_request("req-21", "scan-2"), || {
        users.call("updateOne", vec![json!({}).into(), second])
    })
    .unwrap();
    assert_eq!(
        interceptor
            .registry()
            .with_existing(users.id(), |s| s.in_flight.len()),
        Some(2)
    );

    let callbacks = stash.lock().unwrap().clone();
    callbacks[0](None, Some(&json!({"ok": 1})));
    assert_eq!(exit_ids(&transport), vec!["scan-1"]);
    callbacks[1](None, Some(&json!({"ok": 1})));
    callbacks[0](None, Some(&json!({"ok": 1})));
    assert_eq!(exit_ids(&transport), vec!["scan-1", "scan-2"]);
    assert_eq!(
        interceptor
            .registry()
            .with_existing(users.id(), |s| s.in_flight.len()),
        Some(0)
    );
}

#[test]
fn test_error_then_success_emits_one_exit() {
    let (interceptor, transport) = interceptor(EventCategory::DocumentDb);
    let (users, stash) = deferred_collection(&interceptor);
    let (cb, calls) = counting_callback();

    within(&fuzz_request("req-22", "scan-3"), || {
        users.call("updateOne", vec![json!({}).into(), cb])
    })
    .unwrap();

    let callback = stash.lock().unwrap()[0].clone();
    callback(Some(&DriverError::new("transient")), None);
    assert!(transport.exit().is_empty());
    callback(None, Some(&json!({"ok": 1})));
    assert_eq!(exit_ids(&transport), vec!["scan-3"]);
    assert_eq!(*calls.lock().unwrap(), vec![false, true]);
}

#[test]
fn test_completion_after_instance_dropped() {
    let (interceptor, transport) = interceptor(EventCategory::DocumentDb);
    let stash = {
        let (users, stash) = deferred_collection(&interceptor);
        let (cb, _) = counting_callback();
        within(&fuzz_request("req-23", "scan-4"), || {
            users.call("updateOne", vec![json!({}).into(), cb])
        })
        .unwrap();
        stash
    };

    let callback = stash.lock().unwrap()[0].clone();
    callback(None, Some(&json!({"ok": 1})));

    assert_eq!(transport.enter().len(), 1);
    assert_eq!(exit_ids(&transport), vec!["scan-4"]);
}

// --- Cursor capture ---

#[test]
fn test_cursor_payload_captured_once() {
    let (interceptor, transport) = interceptor(EventCategory::DocumentDb);
    let proto = Prototype::new("Cursor");
    // The driver drops its command after the first batch.
    proto.define("next", |this, _| {
        this.clear_state(state_keys::CURSOR_COMMAND);
        Ok(json!({"_id": 1}))
    });
    interceptor
        .hook(&proto, "next", CaptureShape::cursor(state_keys::CURSOR_COMMAND))
        .unwrap();

    let cursor = Instance::new(&proto);
    cursor.set_state(state_keys::CURSOR_COMMAND, json!({"find": "users", "filter": {}}));

    within(&fuzz_request("req-12", "scan-1"), || cursor.call("next", vec![])).unwrap();
    let first = interceptor
        .registry()
        .with_existing(cursor.id(), |s| s.payload.clone())
        .flatten()
        .unwrap();
    within(&fuzz_request("req-13", "scan-2"), || cursor.call("next", vec![])).unwrap();
    let second = interceptor
        .registry()
        .with_existing(cursor.id(), |s| s.payload.clone())
        .flatten()
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    let enter = transport.enter();
    assert_eq!(enter.len(), 2);
    for event in &enter {
        assert_eq!(event.operation(), OperationCategory::Find);
        assert_eq!(event.metadata.payload, json!({"find": "users", "filter": {}}));
    }
}
