//! Integration tests for the bridge workflow.
//!
//! These tests verify the complete submit/tick/poll lifecycle including:
//! - FIFO ordering within a category and the fixed cross-category drain order
//! - Per-tick execution budget
//! - Status polling semantics (not-found until executed, eviction)
//! - Handler error and panic containment
//! - Concurrent submission from many producer threads
//! - Coordinated shutdown with queued work outstanding

use parking_lot::Mutex;
use serde_json::json;
use stagebridge::bridge::Bridge;
use stagebridge::config::Settings;
use stagebridge::dispatcher::{HandlerError, HandlerRegistry};
use stagebridge::request::{Category, Payload};
use stagebridge::transport::TransportControl;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

// =============================================================================
// Test Helpers
// =============================================================================

fn settings_with_budget(budget: usize) -> Settings {
    Settings {
        max_operations_per_cycle: budget,
        ..Settings::default()
    }
}

/// Registers an echo handler for every category, recording execution order.
fn recording_registry(order: Arc<Mutex<Vec<String>>>) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    for category in Category::ALL {
        let order = Arc::clone(&order);
        registry.register(category, move |payload: &Payload| {
            order.lock().push(format!(
                "{}:{}",
                category,
                payload["n"].as_u64().unwrap_or(0)
            ));
            Ok(json!({"done": true}))
        });
    }
    registry
}

struct InstantTransport;

impl TransportControl for InstantTransport {
    fn shutdown(&self) {}
}

// =============================================================================
// Ordering and budget
// =============================================================================

#[test]
fn test_fifo_within_category() {
    let bridge = Bridge::new(settings_with_budget(100));
    let order = Arc::new(Mutex::new(Vec::new()));
    let dispatcher = bridge.dispatcher(recording_registry(Arc::clone(&order)));

    for n in 0..10 {
        bridge
            .queue()
            .submit(Category::Element, json!({ "n": n }))
            .unwrap();
    }

    dispatcher.tick();

    let executed = order.lock().clone();
    let expected: Vec<String> = (0..10).map(|n| format!("element:{}", n)).collect();
    assert_eq!(executed, expected);
}

#[test]
fn test_budget_caps_each_tick() {
    let bridge = Bridge::new(settings_with_budget(5));
    let executed = Arc::new(AtomicUsize::new(0));
    let mut registry = HandlerRegistry::new();
    {
        let executed = Arc::clone(&executed);
        registry.register(Category::Asset, move |_: &Payload| {
            executed.fetch_add(1, Ordering::SeqCst);
            Ok(json!(null))
        });
    }
    let dispatcher = bridge.dispatcher(registry);

    for _ in 0..12 {
        bridge.queue().submit(Category::Asset, json!({})).unwrap();
    }

    assert_eq!(dispatcher.tick().processed, 5);
    assert_eq!(executed.load(Ordering::SeqCst), 5);
    assert_eq!(dispatcher.tick().processed, 5);
    let last = dispatcher.tick();
    assert_eq!(last.processed, 2);
    assert_eq!(last.remaining, 0);
    assert_eq!(executed.load(Ordering::SeqCst), 12);
}

/// Three element and two removal requests with a budget of two complete in
/// exactly three ticks, elements first.
#[test]
fn test_mixed_categories_drain_deterministically() {
    let bridge = Bridge::new(settings_with_budget(2));
    let order = Arc::new(Mutex::new(Vec::new()));
    let dispatcher = bridge.dispatcher(recording_registry(Arc::clone(&order)));

    for n in 0..3 {
        bridge
            .queue()
            .submit(Category::Element, json!({ "n": n }))
            .unwrap();
    }
    for n in 0..2 {
        bridge
            .queue()
            .submit(Category::Removal, json!({ "n": n }))
            .unwrap();
    }

    let first = dispatcher.tick();
    assert_eq!((first.processed, first.remaining), (2, 3));
    let second = dispatcher.tick();
    assert_eq!((second.processed, second.remaining), (2, 1));
    let third = dispatcher.tick();
    assert_eq!((third.processed, third.remaining), (1, 0));

    let executed = order.lock().clone();
    assert_eq!(
        executed,
        vec![
            "element:0",
            "element:1",
            "element:2",
            "removal:0",
            "removal:1"
        ]
    );
}

// =============================================================================
// Status polling
// =============================================================================

#[test]
fn test_status_not_found_until_executed() {
    let bridge = Bridge::new(settings_with_budget(5));
    let api = bridge.api();
    let mut registry = HandlerRegistry::new();
    registry.register(Category::Transform, |_: &Payload| Ok(json!({"ok": true})));
    let dispatcher = bridge.dispatcher(registry);

    let id = api
        .submit("transform", json!({"path": "/World/cube"}))
        .request_id
        .unwrap();

    assert_eq!(api.request_status(id.as_str()).status, "not_found");

    dispatcher.tick();

    let status = api.request_status(id.as_str());
    assert_eq!(status.status, "completed");
    assert_eq!(status.result.unwrap()["ok"], true);
}

#[test]
fn test_completed_cache_evicts_oldest() {
    let settings = Settings {
        max_operations_per_cycle: 100,
        max_completed_requests: 3,
        ..Settings::default()
    };
    let bridge = Bridge::new(settings);
    let api = bridge.api();
    let mut registry = HandlerRegistry::new();
    registry.register(Category::Element, |_: &Payload| Ok(json!(null)));
    let dispatcher = bridge.dispatcher(registry);

    let ids: Vec<_> = (0..5)
        .map(|_| api.submit("element", json!({})).request_id.unwrap())
        .collect();
    dispatcher.tick();

    // Oldest two evicted, newest three retained.
    for id in &ids[..2] {
        assert_eq!(api.request_status(id.as_str()).status, "not_found");
    }
    for id in &ids[2..] {
        assert_eq!(api.request_status(id.as_str()).status, "completed");
    }
    assert_eq!(bridge.queue().snapshot().completed_cached, 3);
}

// =============================================================================
// Error containment
// =============================================================================

#[test]
fn test_failing_handler_does_not_stall_the_queue() {
    let bridge = Bridge::new(settings_with_budget(10));
    let api = bridge.api();
    let mut registry = HandlerRegistry::new();
    registry.register(Category::Element, |payload: &Payload| {
        if payload["explode"].as_bool().unwrap_or(false) {
            panic!("scene handle dangling");
        }
        if payload["fail"].as_bool().unwrap_or(false) {
            return Err(HandlerError::new("invalid primitive type"));
        }
        Ok(json!({"created": true}))
    });
    let dispatcher = bridge.dispatcher(registry);

    let panicking = api.submit("element", json!({"explode": true})).request_id.unwrap();
    let failing = api.submit("element", json!({"fail": true})).request_id.unwrap();
    let healthy = api.submit("element", json!({})).request_id.unwrap();

    let report = dispatcher.tick();
    assert_eq!(report.processed, 3);
    assert_eq!(report.failed, 2);

    let panicked = api.request_status(panicking.as_str());
    assert!(panicked.error.unwrap().contains("scene handle dangling"));

    let failed = api.request_status(failing.as_str());
    assert_eq!(failed.error.as_deref(), Some("invalid primitive type"));

    assert_eq!(api.request_status(healthy.as_str()).status, "completed");
}

// =============================================================================
// Concurrency
// =============================================================================

/// Fifty producer threads submit a thousand requests; every ID is distinct
/// and every request is eventually executed exactly once.
#[test]
fn test_concurrent_producers() {
    const PRODUCERS: usize = 50;
    const PER_PRODUCER: usize = 20;

    let bridge = Bridge::new(settings_with_budget(64));
    let executed = Arc::new(AtomicUsize::new(0));
    let mut registry = HandlerRegistry::new();
    {
        let executed = Arc::clone(&executed);
        registry.register(Category::Batch, move |_: &Payload| {
            executed.fetch_add(1, Ordering::SeqCst);
            Ok(json!(null))
        });
    }
    let dispatcher = bridge.dispatcher(registry);

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let api = bridge.api();
            thread::spawn(move || {
                let mut ids = Vec::with_capacity(PER_PRODUCER);
                for n in 0..PER_PRODUCER {
                    let response = api.submit("batch", json!({ "producer": producer, "n": n }));
                    ids.push(response.request_id.unwrap());
                }
                ids
            })
        })
        .collect();

    let mut all_ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(all_ids.insert(id), "duplicate request ID handed out");
        }
    }
    assert_eq!(all_ids.len(), PRODUCERS * PER_PRODUCER);

    // Drain everything on the owning thread.
    while dispatcher.tick().processed > 0 {}
    assert_eq!(executed.load(Ordering::SeqCst), PRODUCERS * PER_PRODUCER);

    let snapshot = bridge.queue().snapshot();
    assert_eq!(snapshot.total_depth(), 0);
    assert_eq!(snapshot.category(Category::Batch).completed as usize, PRODUCERS * PER_PRODUCER);
}

// =============================================================================
// Shutdown
// =============================================================================

#[test]
fn test_shutdown_with_queued_work_is_bounded() {
    let bridge = Bridge::new(settings_with_budget(5));
    let api = bridge.api();
    let mut registry = HandlerRegistry::new();
    registry.register(Category::Element, |_: &Payload| Ok(json!(null)));
    let dispatcher = bridge.dispatcher(registry);

    // Queue work that will never be drained.
    let abandoned: Vec<_> = (0..20)
        .map(|_| api.submit("element", json!({})).request_id.unwrap())
        .collect();

    let started = Instant::now();
    let report = bridge.coordinator().run(InstantTransport);
    assert!(report.http_clean);
    assert!(started.elapsed() < Duration::from_secs(5));

    // New submissions are rejected, stray ticks are no-ops, and the
    // abandoned requests remain not-found forever.
    assert!(!api.submit("element", json!({})).success);
    assert_eq!(dispatcher.tick().processed, 0);
    for id in &abandoned {
        assert_eq!(api.request_status(id.as_str()).status, "not_found");
    }
    assert!(bridge.shutdown_state().fully_stopped());
}

#[test]
fn test_shutdown_timeout_forces_completion() {
    struct HangingTransport;
    impl TransportControl for HangingTransport {
        fn shutdown(&self) {
            thread::sleep(Duration::from_secs(30));
        }
    }

    let settings = Settings {
        shutdown_timeout: Duration::from_millis(100),
        ..Settings::default()
    };
    let bridge = Bridge::new(settings);

    let started = Instant::now();
    let report = bridge.coordinator().run(HangingTransport);
    assert!(!report.http_clean);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(bridge.shutdown_state().fully_stopped());
}
