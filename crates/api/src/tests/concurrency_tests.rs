// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Concurrent joins from separate engine handles on one database file.

use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;
use tourbook_domain::{Departure, DepartureType, TourId};

use super::helpers::{
    create_join_request, create_test_actor, create_test_config, create_test_date,
    create_test_tour, init_test_tracing,
};
use crate::{Engine, EngineConfig, JoinRequest, JoinResponse, RetryConfig};

/// Generous retry budget so that lock waits never exhaust it.
fn create_patient_config() -> EngineConfig {
    EngineConfig {
        retry: RetryConfig {
            max_attempts: 50,
            initial_backoff_ms: 1,
            max_backoff_ms: 20,
        },
        busy_timeout_ms: 100,
        ..create_test_config()
    }
}

fn open_engines(path: &Path, count: usize) -> Vec<Engine> {
    let mut first: Engine = Engine::open_file(path, create_patient_config()).unwrap();
    first.upsert_tour(&create_test_tour(1)).unwrap();

    let mut engines: Vec<Engine> = vec![first];
    for _ in 1..count {
        engines.push(Engine::open_file(path, create_patient_config()).unwrap());
    }
    engines
}

fn join_concurrently(engines: Vec<Engine>, pax: u32) -> Vec<JoinResponse> {
    let barrier: Arc<Barrier> = Arc::new(Barrier::new(engines.len()));

    let handles: Vec<_> = engines
        .into_iter()
        .enumerate()
        .map(|(index, mut engine)| {
            let barrier: Arc<Barrier> = Arc::clone(&barrier);
            thread::spawn(move || {
                let request: JoinRequest = create_join_request(
                    DepartureType::Public,
                    pax,
                    &format!("racer{index}@example.com"),
                );
                barrier.wait();
                engine
                    .create_or_join_departure(&request, &create_test_actor())
                    .unwrap()
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect()
}

#[test]
fn test_two_joins_against_three_spare_seats_never_overbook() {
    init_test_tracing();
    let dir: TempDir = TempDir::new().unwrap();
    let path = dir.path().join("race.db");
    let mut engines: Vec<Engine> = open_engines(&path, 3);

    // Five of eight seats taken leaves three spare.
    let mut request: JoinRequest = create_join_request(DepartureType::Public, 5, "base@example.com");
    request.force_new_departure = true;
    let base: JoinResponse = engines[0]
        .create_or_join_departure(&request, &create_test_actor())
        .unwrap();

    let mut observer: Engine = engines.remove(0);
    let results: Vec<JoinResponse> = join_concurrently(engines, 2);

    let on_base: usize = results
        .iter()
        .filter(|r| r.departure.departure_id == base.departure.departure_id)
        .count();
    assert_eq!(on_base, 1);

    let departures: Vec<Departure> = observer
        .list_departures(TourId::new(1), Some(create_test_date()))
        .unwrap();
    assert_eq!(departures.len(), 2);

    let stored_base: Departure = observer.get_departure(base.departure.departure_id).unwrap();
    assert_eq!(stored_base.current_pax, 7);

    for departure in &departures {
        assert!(departure.current_pax <= departure.max_pax);
        assert!(
            observer
                .verify_departure_invariants(departure.departure_id)
                .unwrap()
                .is_consistent()
        );
    }
}

#[test]
fn test_many_concurrent_joins_conserve_pax() {
    init_test_tracing();
    let dir: TempDir = TempDir::new().unwrap();
    let path = dir.path().join("crowd.db");
    let mut engines: Vec<Engine> = open_engines(&path, 7);
    let mut observer: Engine = engines.remove(0);

    let results: Vec<JoinResponse> = join_concurrently(engines, 3);
    assert_eq!(results.len(), 6);

    let departures: Vec<Departure> = observer.list_departures(TourId::new(1), None).unwrap();
    let seated: u32 = departures.iter().map(|d| d.current_pax).sum();
    assert_eq!(seated, 18);

    for departure in &departures {
        assert!(departure.current_pax <= departure.max_pax);
        assert!(
            observer
                .verify_departure_invariants(departure.departure_id)
                .unwrap()
                .is_consistent()
        );
    }
}
