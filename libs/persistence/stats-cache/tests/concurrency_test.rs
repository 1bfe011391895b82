use std::{sync::Arc, thread};

use stats_cache::StatsCache;

#[test]
fn concurrent_writers_and_readers_stay_consistent() {
    let cache = Arc::new(StatsCache::new());
    let mut handles = Vec::new();

    for writer in 0..8i32 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..200 {
                cache.set(format!("u{writer}:year:{i}"), &(writer * 1000 + i));
            }
        }));
    }

    for reader in 0..8i32 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..200 {
                let key = format!("u{reader}:year:{i}");
                // A key is either absent (writer not there yet) or holds
                // exactly the value its writer stores, never anything else.
                if let Some(value) = cache.get::<i32>(&key) {
                    assert_eq!(value, reader * 1000 + i);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 8 * 200);
}

#[test]
fn racing_writes_to_one_key_are_never_torn() {
    let cache = Arc::new(StatsCache::new());
    let mut handles = Vec::new();

    for fill in [1i32, 2] {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for _ in 0..500 {
                cache.set("u1:week:race", &vec![fill; 64]);
            }
        }));
    }

    for _ in 0..4 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for _ in 0..500 {
                if let Some(value) = cache.get::<Vec<i32>>("u1:week:race") {
                    assert_eq!(value.len(), 64);
                    assert!(value.iter().all(|v| *v == value[0]));
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
