//! Per-thread marker lists backing [`ScopedBind`](super::ScopedBind).
//!
//! Every slot gets its own doubly linked list of markers, one per live scoped guard, oldest
//! first. The list lives in a [`SlotMap`] so that a marker can be unlinked from anywhere in
//! O(1) without any pointers into guard objects.

use std::{
    any::{Any, TypeId},
    cell::RefCell,
};

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use super::Slot;

new_key_type! {
    /// Names one live scoped binding within its slot's list.
    pub(crate) struct MarkerKey;
}

#[derive(Debug)]
struct Marker<B> {
    binding: B,
    prev: Option<MarkerKey>,
    next: Option<MarkerKey>,
}

/// What the GL needs to be told after a marker leaves its list.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Exit<B> {
    /// The marker was not the tail. The active binding still belongs to someone else.
    Spliced,
    /// The marker was the tail, and this binding is current again.
    Restore(B),
    /// The marker was the only one. Nothing is current anymore.
    Unbind,
}

#[derive(Debug)]
pub(crate) struct Stack<B> {
    markers: SlotMap<MarkerKey, Marker<B>>,
    tail: Option<MarkerKey>,
}

impl<B> Default for Stack<B> {
    fn default() -> Self {
        Self {
            markers: SlotMap::with_key(),
            tail: None,
        }
    }
}

impl<B: Clone> Stack<B> {
    /// Push `binding` as the new tail.
    pub(crate) fn enter(&mut self, binding: B) -> MarkerKey {
        let prev = self.tail;
        let key = self.markers.insert(Marker {
            binding,
            prev,
            next: None,
        });
        if let Some(prev) = prev {
            let prev = &mut self.markers[prev];
            debug_assert!(prev.next.is_none(), "tail marker already has a successor");
            prev.next = Some(key);
        }
        self.tail = Some(key);
        key
    }
    /// Unlink `key`, wherever it is in the list.
    pub(crate) fn exit(&mut self, key: MarkerKey) -> Exit<B> {
        let Some(marker) = self.markers.remove(key) else {
            debug_assert!(false, "marker exited twice");
            return Exit::Spliced;
        };

        if let Some(next) = marker.next {
            debug_assert_ne!(self.tail, Some(key), "tail marker has a successor");
            self.markers[next].prev = marker.prev;
            if let Some(prev) = marker.prev {
                self.markers[prev].next = Some(next);
            }
            return Exit::Spliced;
        }

        debug_assert_eq!(self.tail, Some(key), "marker without successor is not the tail");
        self.tail = marker.prev;
        match marker.prev {
            Some(prev) => {
                let prev = &mut self.markers[prev];
                prev.next = None;
                Exit::Restore(prev.binding.clone())
            }
            None => Exit::Unbind,
        }
    }
    pub(crate) fn len(&self) -> usize {
        self.markers.len()
    }
    /// The binding of the tail marker, which is what the GL should currently have bound.
    pub(crate) fn current(&self) -> Option<&B> {
        self.tail.map(|tail| &self.markers[tail].binding)
    }
}

thread_local! {
    static STACKS: RefCell<FxHashMap<TypeId, Box<dyn Any>>> = RefCell::new(FxHashMap::default());
}

/// Run `f` on the calling thread's list for `S`, creating it if needed.
///
/// `None` if the thread is being torn down and the lists are already gone.
fn with_stack<S: Slot, R>(f: impl FnOnce(&mut Stack<S::Binding>) -> R) -> Option<R> {
    STACKS
        .try_with(|stacks| {
            let mut stacks = stacks.borrow_mut();
            let stack = stacks
                .entry(TypeId::of::<S>())
                .or_insert_with(|| Box::new(Stack::<S::Binding>::default()));
            // Entries are keyed by slot type, so this only fails on a logic error above.
            let stack = stack
                .downcast_mut::<Stack<S::Binding>>()
                .expect("binding stack stored under the wrong slot");
            f(stack)
        })
        .ok()
}

pub(crate) fn enter<S: Slot>(binding: S::Binding) -> Option<MarkerKey> {
    let key = with_stack::<S, _>(|stack| stack.enter(binding));
    log::trace!(
        "enter {} (depth {})",
        std::any::type_name::<S>(),
        depth::<S>()
    );
    key
}

/// Unlink a marker returned by [`enter`]. A marker that never made it into a list behaves
/// like a [`UniqueBind`](super::UniqueBind).
pub(crate) fn exit<S: Slot>(key: Option<MarkerKey>) -> Exit<S::Binding> {
    let exit = key
        .and_then(|key| with_stack::<S, _>(|stack| stack.exit(key)))
        .unwrap_or(Exit::Unbind);
    match exit {
        Exit::Spliced => log::debug!(
            "out-of-order exit from {}, active binding unchanged",
            std::any::type_name::<S>()
        ),
        Exit::Restore(_) => log::trace!("exit {}, restoring", std::any::type_name::<S>()),
        Exit::Unbind => log::trace!("exit {}, unbinding", std::any::type_name::<S>()),
    }
    exit
}

pub(crate) fn depth<S: Slot>() -> usize {
    STACKS
        .try_with(|stacks| {
            stacks
                .borrow()
                .get(&TypeId::of::<S>())
                .and_then(|stack| stack.downcast_ref::<Stack<S::Binding>>())
                .map_or(0, Stack::len)
        })
        .unwrap_or(0)
}

pub(crate) fn current<S: Slot>() -> Option<S::Binding> {
    STACKS
        .try_with(|stacks| {
            stacks
                .borrow()
                .get(&TypeId::of::<S>())
                .and_then(|stack| stack.downcast_ref::<Stack<S::Binding>>())
                .and_then(|stack| stack.current().cloned())
        })
        .ok()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_exits_restore_in_reverse() {
        let mut stack = Stack::default();
        let a = stack.enter('a');
        let b = stack.enter('b');
        let c = stack.enter('c');
        assert_eq!(stack.current(), Some(&'c'));
        assert_eq!(stack.exit(c), Exit::Restore('b'));
        assert_eq!(stack.exit(b), Exit::Restore('a'));
        assert_eq!(stack.exit(a), Exit::Unbind);
        assert_eq!(stack.len(), 0);
        assert_eq!(stack.current(), None);
    }

    #[test]
    fn non_tail_exit_splices() {
        let mut stack = Stack::default();
        let a = stack.enter('a');
        let b = stack.enter('b');
        assert_eq!(stack.exit(a), Exit::Spliced);
        assert_eq!(stack.current(), Some(&'b'));
        assert_eq!(stack.exit(b), Exit::Unbind);
    }

    #[test]
    fn middle_exit_relinks_neighbours() {
        let mut stack = Stack::default();
        let a = stack.enter('a');
        let b = stack.enter('b');
        let c = stack.enter('c');
        assert_eq!(stack.exit(b), Exit::Spliced);
        assert_eq!(stack.len(), 2);
        // `c` must now fall back to `a`, skipping the spliced marker.
        assert_eq!(stack.exit(c), Exit::Restore('a'));
        assert_eq!(stack.exit(a), Exit::Unbind);
    }

    #[test]
    fn enter_after_splice_links_to_tail() {
        let mut stack = Stack::default();
        let a = stack.enter('a');
        let b = stack.enter('b');
        assert_eq!(stack.exit(a), Exit::Spliced);
        let c = stack.enter('c');
        assert_eq!(stack.exit(c), Exit::Restore('b'));
        assert_eq!(stack.exit(b), Exit::Unbind);
    }

    #[test]
    fn keys_are_not_reused_for_live_markers() {
        let mut stack = Stack::default();
        let a = stack.enter(1);
        let b = stack.enter(2);
        assert_eq!(stack.exit(b), Exit::Restore(1));
        let c = stack.enter(3);
        assert_ne!(b, c);
        assert_eq!(stack.exit(c), Exit::Restore(1));
        assert_eq!(stack.exit(a), Exit::Unbind);
    }
}
