//! The directory under concurrent registration and dispatch.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use hermes::broker::dispatch::{dispatch, Dispatch};
use hermes::directory::{BackendDescriptor, Directory};

const WORKERS: u32 = 8;
const ROUNDS: u32 = 200;

fn backend(worker: u32, n: u32) -> BackendDescriptor {
    BackendDescriptor::new("127.0.0.1", 8000 + worker as u16, n, "/default")
}

fn assert_consistent(directory: &Directory) {
    let snapshot = directory.snapshot();
    let unique: HashSet<_> = snapshot.backends.iter().collect();
    assert_eq!(unique.len(), snapshot.backends.len(), "duplicate tuple");
    if snapshot.backends.is_empty() {
        assert_eq!(snapshot.cursor, 0);
    } else {
        assert!(snapshot.cursor < snapshot.backends.len(), "cursor out of range");
    }
}

#[test]
fn concurrent_registration_and_dispatch_stay_consistent() {
    let directory = Arc::new(Directory::new());
    let mut handles = Vec::new();

    // Registrars: each registers ROUNDS backends (twice, to exercise the
    // duplicate check) and removes the odd-numbered ones again.
    for worker in 0..WORKERS {
        let directory = Arc::clone(&directory);
        handles.push(thread::spawn(move || {
            for n in 0..ROUNDS {
                directory.register(backend(worker, n));
                directory.register(backend(worker, n));
                if n % 2 == 1 {
                    assert!(directory.deregister(&backend(worker, n)));
                }
            }
        }));
    }

    // Dispatchers: pick backends while the registrars churn.
    for _ in 0..WORKERS {
        let directory = Arc::clone(&directory);
        handles.push(thread::spawn(move || {
            for _ in 0..ROUNDS * 2 {
                match dispatch(&directory, "/default/clip.mp4") {
                    Dispatch::Forward { backend, .. } => assert_eq!(backend.mount_path, "/default"),
                    Dispatch::NoBackend => {}
                    other => panic!("unexpected dispatch: {other:?}"),
                }
                assert_consistent(&directory);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_consistent(&directory);
    let members: HashSet<BackendDescriptor> = directory.snapshot().backends.into_iter().collect();
    let expected: HashSet<BackendDescriptor> = (0..WORKERS)
        .flat_map(|w| (0..ROUNDS).filter(|n| n % 2 == 0).map(move |n| backend(w, n)))
        .collect();
    assert_eq!(members, expected);
}

#[test]
fn every_backend_is_visited_once_per_cycle() {
    let directory = Arc::new(Directory::new());
    for n in 0..16 {
        directory.register(backend(0, n));
    }

    let picks: Vec<BackendDescriptor> = (0..16)
        .map(|_| {
            let directory = Arc::clone(&directory);
            thread::spawn(move || directory.select_next().unwrap())
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    let unique: HashSet<_> = picks.iter().collect();
    assert_eq!(unique.len(), 16, "a backend was selected twice in one cycle");
}
