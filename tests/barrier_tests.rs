//! Concurrency tests for the load barriers

mod common;

use std::sync::Arc;
use std::thread;

use rand::seq::SliceRandom;
use rand::Rng;
use whiteboard_sync::{
    outcome_code, CompleteOutcome, ObjectSyncBarrier, RecordingBroadcaster, RestartPolicy,
    SyncBarrier,
};

fn sync_barrier() -> (Arc<SyncBarrier>, Arc<RecordingBroadcaster>) {
    common::init_tracing();
    let recorder = Arc::new(RecordingBroadcaster::new());
    let barrier = Arc::new(SyncBarrier::new(recorder.clone(), RestartPolicy::Overwrite));
    (barrier, recorder)
}

#[test]
fn test_concurrent_starts_never_lose_a_token() {
    let (barrier, recorder) = sync_barrier();
    let threads = 16;
    let per_thread = 50;

    let mut handles = vec![];
    for t in 0..threads {
        let barrier = Arc::clone(&barrier);
        let handle = thread::spawn(move || {
            for i in 0..per_thread {
                barrier.start(1, &format!("client-{}-{}", t, i)).unwrap();
            }
        });
        handles.push(handle);
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(barrier.pending(1).len(), threads * per_thread);
    assert_eq!(recorder.count_named(1, "sendSyncFlag"), threads * per_thread);
}

#[test]
fn test_shuffled_concurrent_completes_release_exactly_once() {
    for _ in 0..20 {
        let (barrier, recorder) = sync_barrier();
        let mut clients: Vec<String> = (0..64).map(|i| format!("client-{}", i)).collect();
        for client in &clients {
            barrier.start(7, client).unwrap();
        }

        clients.shuffle(&mut rand::thread_rng());
        let workers = rand::thread_rng().gen_range(2..8);
        let chunk = clients.len().div_ceil(workers);

        let mut handles = vec![];
        for batch in clients.chunks(chunk) {
            let barrier = Arc::clone(&barrier);
            let batch = batch.to_vec();
            handles.push(thread::spawn(move || {
                batch
                    .iter()
                    .filter(|client| {
                        matches!(barrier.complete(7, client), Ok(CompleteOutcome::Released(_)))
                    })
                    .count()
            }));
        }

        let released: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(released, 1);
        assert_eq!(recorder.count_named(7, "sendSyncCompleteFlag"), 1);
        assert!(barrier.pending(7).is_empty());
    }
}

#[test]
fn test_completion_fires_after_last_complete() {
    let (barrier, recorder) = sync_barrier();
    let clients = ["A", "B", "C", "D"];
    for client in clients {
        barrier.start(3, client).unwrap();
    }

    for (done, client) in clients.iter().enumerate() {
        assert_eq!(recorder.count_named(3, "sendSyncCompleteFlag"), 0);
        let outcome = barrier.complete(3, client).unwrap();
        if done + 1 < clients.len() {
            assert_eq!(
                outcome,
                CompleteOutcome::Pending {
                    remaining: clients.len() - done - 1
                }
            );
        }
    }
    assert_eq!(recorder.count_named(3, "sendSyncCompleteFlag"), 1);
}

#[test]
fn test_rooms_do_not_share_barriers() {
    let (barrier, recorder) = sync_barrier();
    barrier.start(1, "A").unwrap();
    barrier.start(2, "A").unwrap();

    assert!(matches!(
        barrier.complete(1, "A").unwrap(),
        CompleteOutcome::Released(_)
    ));
    assert_eq!(recorder.count_named(2, "sendSyncCompleteFlag"), 0);
    assert_eq!(barrier.pending(2).len(), 1);
}

#[test]
fn test_concurrent_complete_and_leave_release_once() {
    for _ in 0..20 {
        let (barrier, recorder) = sync_barrier();
        let clients: Vec<String> = (0..32).map(|i| format!("c{}", i)).collect();
        for client in &clients {
            barrier.start(9, client).unwrap();
        }

        // Half the clients finish, the other half disconnect
        let mut handles = vec![];
        for (i, client) in clients.into_iter().enumerate() {
            let barrier = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                if i % 2 == 0 {
                    let _ = barrier.complete(9, &client);
                } else {
                    barrier.leave(9, &client);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(recorder.count_named(9, "sendSyncCompleteFlag"), 1);
        assert!(barrier.pending(9).is_empty());
    }
}

#[test]
fn test_object_barrier_concurrent_loads() {
    common::init_tracing();
    let recorder = Arc::new(RecordingBroadcaster::new());
    let barrier = Arc::new(ObjectSyncBarrier::new(
        recorder.clone(),
        RestartPolicy::Overwrite,
    ));

    let objects = ["img-1", "img-2", "img-3"];
    let clients: Vec<String> = (0..10).map(|i| format!("client-{}", i)).collect();
    let mut pairs = vec![];
    for (o, object) in objects.iter().enumerate() {
        for (c, client) in clients.iter().enumerate() {
            barrier
                .start(4, object, client, c == 0 && o == 0)
                .unwrap();
            pairs.push((object.to_string(), client.clone()));
        }
    }
    assert_eq!(recorder.count_named(4, "sendObjectSyncFlag"), 1);

    pairs.shuffle(&mut rand::thread_rng());
    let mut handles = vec![];
    for batch in pairs.chunks(6) {
        let barrier = Arc::clone(&barrier);
        let batch = batch.to_vec();
        handles.push(thread::spawn(move || {
            batch
                .iter()
                .map(|(object, client)| outcome_code(&barrier.complete(4, object, client)))
                .collect::<Vec<i32>>()
        }));
    }

    let codes: Vec<i32> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    assert_eq!(codes.len(), objects.len() * clients.len());
    assert_eq!(codes.iter().filter(|&&code| code == 1).count(), 1);
    assert!(codes.iter().all(|&code| code == 1 || code == -4));
    assert_eq!(recorder.count_named(4, "sendObjectSyncCompleteFlag"), 1);
    assert!(barrier.pending(4).is_empty());
}
