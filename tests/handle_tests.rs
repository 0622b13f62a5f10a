//! Handle Ownership Tests
//!
//! Tests for:
//! - Exactly-once release across moves, containers and reallocation
//! - Moved-from and taken owners releasing only the null name
//! - Batched arrays releasing null entries alongside live ones

use std::{cell::RefCell, rc::Rc};

use glbind::{id::Deleter, Id, UniqueId, UniqueIdArray, NULL_ID};

/// Stands in for a `glDelete*` entry point, recording every name it is handed.
#[derive(Debug, Clone, Default)]
struct FakeDelete(Rc<RefCell<Vec<Id>>>);

impl FakeDelete {
    fn released(&self) -> Vec<Id> {
        self.0.borrow().clone()
    }
}

impl Deleter for FakeDelete {
    fn delete(&mut self, id: Id) {
        self.0.borrow_mut().push(id);
    }
}

/// A wrapper object the way the GL wrappers hold their names.
struct UniqueIdHolder {
    id: UniqueId<FakeDelete>,
}

impl Default for UniqueIdHolder {
    fn default() -> Self {
        Self {
            id: UniqueId::new(NULL_ID, FakeDelete::default()),
        }
    }
}

fn pass_through(holder: UniqueIdHolder) -> UniqueIdHolder {
    holder
}

// ============================================================================
// Exactly-once release
// ============================================================================

#[test]
fn moved_through_functions_releases_once() {
    let gl = FakeDelete::default();
    let holder = UniqueIdHolder {
        id: UniqueId::new(42, gl.clone()),
    };
    let holder = pass_through(pass_through(holder));
    assert!(gl.released().is_empty());
    drop(holder);
    assert_eq!(gl.released(), [42]);
}

#[test]
fn vec_reallocation_does_not_release() {
    let gl = FakeDelete::default();
    let mut ids = Vec::with_capacity(1);
    for name in 1..=64 {
        ids.push(UniqueId::new(name, gl.clone()));
    }
    assert!(gl.released().is_empty());
    ids.truncate(2);
    assert_eq!(gl.released().len(), 62);
    drop(ids);

    let mut released = gl.released();
    released.sort_unstable();
    assert_eq!(released, (1..=64).collect::<Vec<Id>>());
}

#[test]
fn many_moves_single_release() {
    let gl = FakeDelete::default();
    let mut slot = Some(UniqueId::new(7, gl.clone()));
    for _ in 0..10 {
        let id = slot.take().unwrap();
        slot = Some(id);
    }
    drop(slot);
    assert_eq!(gl.released(), [7]);
}

// ============================================================================
// Moved-from owners
// ============================================================================

#[test]
fn taken_holder_releases_null_only() {
    let gl = FakeDelete::default();
    let mut a = UniqueIdHolder {
        id: UniqueId::new(3, gl.clone()),
    };
    let b = std::mem::take(&mut a);
    assert_eq!(a.id.get(), NULL_ID);
    assert_eq!(b.id.get(), 3);

    drop(b);
    assert_eq!(gl.released(), [3]);
    // `a` now owns a different, null, deleter.
    drop(a);
    assert_eq!(gl.released(), [3]);
}

#[test]
fn move_assignment_releases_the_overwritten_name() {
    let gl = FakeDelete::default();
    let mut a = UniqueId::new(1, gl.clone());
    assert_eq!(a.get(), 1);
    a = UniqueId::new(2, gl.clone());
    assert_eq!(gl.released(), [1]);
    drop(a);
    assert_eq!(gl.released(), [1, 2]);
}

// ============================================================================
// Null names
// ============================================================================

#[test]
fn failed_allocation_is_visible_and_released_quietly() {
    let gl = FakeDelete::default();
    let id = UniqueId::create(|| NULL_ID, gl.clone());
    assert!(id.is_null());
    drop(id);
    assert_eq!(gl.released(), [NULL_ID]);
}

#[test]
fn arrays_hand_null_entries_to_the_deleter() {
    let batches = Rc::new(RefCell::new(Vec::<Vec<Id>>::new()));
    let sink = batches.clone();
    let ids = UniqueIdArray::new([5, NULL_ID, 6], move |ids: &[Id]| {
        sink.borrow_mut().push(ids.to_vec());
    });
    let moved = ids;
    assert_eq!(moved.get(1), NULL_ID);
    drop(moved);
    assert_eq!(*batches.borrow(), [vec![5, NULL_ID, 6]]);
}
