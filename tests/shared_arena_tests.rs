#![cfg(feature = "sync")]
//! Integration tests for `SharedKeyMapArena` across threads.

use delegating_keymap::keymap::SharedKeyMapArena;
use rstest::rstest;
use std::thread;

#[rstest]
fn test_concurrent_readers_see_parent_entries() {
    let shared: SharedKeyMapArena<String, u32> = SharedKeyMapArena::new();
    let (parent, children) = {
        let mut arena = shared.write();
        let parent = arena.insert_map();
        arena.insert(parent, "undo".to_string(), 26).unwrap();
        let children: Vec<_> = (0..4).map(|_| arena.insert_child(parent).unwrap()).collect();
        (parent, children)
    };

    let handles: Vec<_> = children
        .into_iter()
        .map(|child| {
            let reader = shared.clone();
            thread::spawn(move || reader.get_cloned(child, "undo").unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("Thread panicked"), Some(26));
    }
    assert_eq!(shared.read().size(parent), Ok(1));
}

#[rstest]
fn test_concurrent_writers_stay_local() {
    let shared: SharedKeyMapArena<String, usize> = SharedKeyMapArena::new();
    let (parent, children) = {
        let mut arena = shared.write();
        let parent = arena.insert_map();
        let children: Vec<_> = (0..8).map(|_| arena.insert_child(parent).unwrap()).collect();
        (parent, children)
    };

    let handles: Vec<_> = children
        .iter()
        .enumerate()
        .map(|(index, child)| {
            let writer = shared.clone();
            let child = *child;
            thread::spawn(move || {
                for round in 0..100 {
                    writer.put(child, format!("key-{round}"), Some(index)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let arena = shared.read();
    assert_eq!(arena.size(parent), Ok(0));
    for (index, child) in children.iter().enumerate() {
        assert_eq!(arena.size(*child), Ok(100));
        assert_eq!(arena.get(*child, "key-42").unwrap(), Some(&index));
    }
}

#[rstest]
fn test_reparenting_is_observed_by_later_reads() {
    let shared: SharedKeyMapArena<&'static str, &'static str> = SharedKeyMapArena::new();
    let (first, second, child) = {
        let mut arena = shared.write();
        let first = arena.insert_map();
        let second = arena.insert_map();
        arena.insert(first, "k", "first").unwrap();
        arena.insert(second, "k", "second").unwrap();
        let child = arena.insert_child(first).unwrap();
        (first, second, child)
    };

    assert_eq!(shared.get_cloned(child, "k"), Ok(Some("first")));
    shared.set_parent(child, Some(second)).unwrap();
    assert_eq!(shared.get_cloned(child, "k"), Ok(Some("second")));
    assert_eq!(shared.read().parent(child), Ok(Some(second)));
    assert_ne!(first, second);
}
