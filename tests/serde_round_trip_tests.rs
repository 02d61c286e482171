#![cfg(feature = "serde")]
//! Persistence round trips for whole arenas.

use delegating_keymap::keymap::{ComponentId, KeyMapArena, MapId};
use rstest::rstest;

type Arena = KeyMapArena<String, Vec<u32>>;

fn round_trip(arena: &Arena) -> Arena {
    let json = serde_json::to_string(arena).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[rstest]
fn test_map_with_parent_and_two_entries_round_trips() {
    let mut arena = Arena::new();
    let parent = arena.insert_map();
    let child = arena.insert_child(parent).unwrap();
    arena.insert(parent, "inherited".to_string(), vec![9]).unwrap();
    arena.insert(child, "first".to_string(), vec![1, 2]).unwrap();
    arena.insert(child, "second".to_string(), vec![3]).unwrap();

    let restored = round_trip(&arena);

    assert!(restored.parent(child).unwrap().is_some());
    for key in ["first", "second", "inherited"] {
        assert_eq!(restored.get(child, key).unwrap(), arena.get(child, key).unwrap());
    }
    assert_eq!(restored.size(child).unwrap(), 2);
}

#[rstest]
fn test_shared_parent_stays_shared() {
    let mut arena = Arena::new();
    let shared = arena.insert_map();
    let left = arena.insert_child(shared).unwrap();
    let right = arena.insert_child(shared).unwrap();
    arena.insert(shared, "key".to_string(), vec![1]).unwrap();

    let mut restored = round_trip(&arena);
    assert_eq!(restored.parent(left).unwrap(), restored.parent(right).unwrap());

    // A mutation of the restored parent is visible from both children.
    restored.insert(shared, "key".to_string(), vec![2]).unwrap();
    assert_eq!(restored.get(left, "key").unwrap(), Some(&vec![2]));
    assert_eq!(restored.get(right, "key").unwrap(), Some(&vec![2]));
}

#[rstest]
fn test_deep_chain_round_trips() {
    let mut arena = Arena::new();
    let mut ids: Vec<MapId> = vec![arena.insert_map()];
    for depth in 1..10_u32 {
        let id = arena.insert_child(*ids.last().unwrap()).unwrap();
        arena.insert(id, format!("level-{depth}"), vec![depth]).unwrap();
        ids.push(id);
    }
    let leaf = *ids.last().unwrap();

    let restored = round_trip(&arena);

    assert_eq!(restored.depth(leaf).unwrap(), 9);
    assert_eq!(restored.all_keys(leaf).unwrap().len(), 9);
    assert_eq!(restored.get(leaf, "level-1").unwrap(), Some(&vec![1]));
}

#[rstest]
fn test_restored_arena_keeps_enforcing_rules() {
    let mut arena = Arena::new();
    let component = ComponentId::new(3).unwrap();
    let bound = arena.insert_bound_map(component);
    let plain = arena.insert_map();
    let root = arena.empty_root();

    let mut restored = round_trip(&arena);

    assert!(restored.set_parent(bound, Some(plain)).is_err());
    assert!(restored.set_parent(plain, Some(plain)).is_err());
    assert!(restored.clear(root).is_err());
}

#[rstest]
fn test_handles_serialize_as_plain_data() {
    let mut arena = Arena::new();
    let id = arena.insert_map();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, r#"{"index":0,"generation":0}"#);
    assert_eq!(serde_json::from_str::<MapId>(&json).unwrap(), id);

    let component = ComponentId::new(8).unwrap();
    assert_eq!(serde_json::to_string(&component).unwrap(), "8");
    assert!(serde_json::from_str::<ComponentId>("0").is_err());
}

#[rstest]
fn test_single_map_with_its_chain_round_trips() {
    let mut arena = Arena::new();
    let parent = arena.insert_map();
    let child = arena.insert_child(parent).unwrap();
    let bystander = arena.insert_map();
    arena.insert(parent, "inherited".to_string(), vec![9]).unwrap();
    arena.insert(child, "first".to_string(), vec![1]).unwrap();
    arena.insert(child, "second".to_string(), vec![2]).unwrap();
    arena.insert(bystander, "other".to_string(), vec![0]).unwrap();

    let (chain, copied) = arena.extract_chain(child).unwrap();
    let restored = round_trip(&chain);

    assert_eq!(restored.len(), 2);
    assert!(restored.parent(copied).unwrap().is_some());
    for key in ["first", "second", "inherited", "other"] {
        assert_eq!(restored.get(copied, key).unwrap(), arena.get(child, key).unwrap());
    }
}
