//! Scoped Binding Tests
//!
//! Tests for:
//! - LIFO restore of nested scopes
//! - Out-of-order guard drops splicing without touching the GL
//! - Independence of slots
//! - `UniqueBind` and mixing with scoped binds
//! - Introspection through `scope_depth` / `current_binding`
//! - A texture stack shared across texture units
//!
//! Slots here record the calls they would make instead of reaching a GL context.

use std::{cell::RefCell, collections::BTreeMap};

use glbind::{
    slot::{current_binding, scope_depth},
    Bindable, Slot,
};

thread_local! {
    static CALLS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn calls() -> Vec<String> {
    CALLS.with_borrow_mut(std::mem::take)
}

macro_rules! recording_slot {
    ($slot:ident, $object:ident, $name:literal) => {
        struct $slot;
        impl Slot for $slot {
            type Binding = &'static str;
            fn bind(binding: &&'static str) {
                CALLS.with_borrow_mut(|calls| calls.push(format!("{}.bind({binding})", $name)));
            }
            fn unbind() {
                CALLS.with_borrow_mut(|calls| calls.push(format!("{}.unbind()", $name)));
            }
        }

        struct $object(&'static str);
        impl Bindable for $object {
            type Slot = $slot;
            fn binding(&self) -> &'static str {
                self.0
            }
        }
    };
}

recording_slot!(ArraySlot, Buffer, "array");
recording_slot!(ProgramSlot, Program, "program");

// ============================================================================
// Nesting
// ============================================================================

#[test]
fn nested_scopes_restore_in_reverse() {
    let (a, b, c) = (Buffer("A"), Buffer("B"), Buffer("C"));
    let ga = a.scoped_bind();
    let gb = b.scoped_bind();
    let gc = c.scoped_bind();
    assert_eq!(scope_depth::<ArraySlot>(), 3);
    drop(gc);
    drop(gb);
    drop(ga);
    assert_eq!(
        calls(),
        [
            "array.bind(A)",
            "array.bind(B)",
            "array.bind(C)",
            "array.bind(B)",
            "array.bind(A)",
            "array.unbind()",
        ]
    );
    assert_eq!(scope_depth::<ArraySlot>(), 0);
}

#[test]
fn buffer_inside_buffer_scope() {
    let x = Buffer("X");
    {
        let _x = x.scoped_bind();
        let y = Buffer("Y");
        {
            let _y = y.scoped_bind();
        }
    }
    assert_eq!(
        calls(),
        [
            "array.bind(X)",
            "array.bind(Y)",
            "array.bind(X)",
            "array.unbind()",
        ]
    );
}

#[test]
fn guards_deref_to_their_object() {
    let a = Buffer("A");
    let guard = a.scoped_bind();
    assert_eq!(guard.0, "A");
    assert_eq!(current_binding::<ArraySlot>(), Some("A"));
}

// ============================================================================
// Out-of-order drops
// ============================================================================

#[test]
fn dropping_the_outer_guard_first_is_silent() {
    let (a, b) = (Buffer("A"), Buffer("B"));
    let ga = a.scoped_bind();
    let gb = b.scoped_bind();
    calls();

    drop(ga);
    assert!(calls().is_empty());
    assert_eq!(current_binding::<ArraySlot>(), Some("B"));

    drop(gb);
    // A is gone, so nothing is rebound.
    assert_eq!(calls(), ["array.unbind()"]);
}

#[test]
fn dropping_a_middle_guard_relinks_around_it() {
    let (a, b, c) = (Buffer("A"), Buffer("B"), Buffer("C"));
    let ga = a.scoped_bind();
    let gb = b.scoped_bind();
    let gc = c.scoped_bind();
    calls();

    drop(gb);
    assert!(calls().is_empty());
    assert_eq!(scope_depth::<ArraySlot>(), 2);

    drop(gc);
    assert_eq!(calls(), ["array.bind(A)"]);
    drop(ga);
    assert_eq!(calls(), ["array.unbind()"]);
}

#[test]
fn binding_after_a_splice_links_to_the_new_tail() {
    let (a, b, c) = (Buffer("A"), Buffer("B"), Buffer("C"));
    let ga = a.scoped_bind();
    let gb = b.scoped_bind();
    drop(ga);
    let gc = c.scoped_bind();
    calls();

    drop(gc);
    assert_eq!(calls(), ["array.bind(B)"]);
    drop(gb);
    assert_eq!(calls(), ["array.unbind()"]);
}

// ============================================================================
// Slot independence
// ============================================================================

#[test]
fn slots_do_not_interact() {
    let (a, b) = (Buffer("A"), Buffer("B"));
    let (p, q) = (Program("P"), Program("Q"));

    let ga = a.scoped_bind();
    let gp = p.scoped_bind();
    let gb = b.scoped_bind();
    let gq = q.scoped_bind();
    assert_eq!(scope_depth::<ArraySlot>(), 2);
    assert_eq!(scope_depth::<ProgramSlot>(), 2);

    drop(gb);
    drop(gp);
    drop(ga);
    assert_eq!(current_binding::<ProgramSlot>(), Some("Q"));
    drop(gq);

    assert_eq!(
        calls(),
        [
            "array.bind(A)",
            "program.bind(P)",
            "array.bind(B)",
            "program.bind(Q)",
            "array.bind(A)",
            "array.unbind()",
            "program.unbind()",
        ]
    );
}

#[test]
fn stacks_are_per_thread() {
    let a = Buffer("A");
    let _ga = a.scoped_bind();
    let other = std::thread::spawn(|| {
        let b = Buffer("B");
        let gb = b.scoped_bind();
        let depth = scope_depth::<ArraySlot>();
        drop(gb);
        (depth, calls())
    })
    .join()
    .unwrap();
    assert_eq!(other, (1, vec!["array.bind(B)".to_owned(), "array.unbind()".to_owned()]));
    assert_eq!(scope_depth::<ArraySlot>(), 1);
}

// ============================================================================
// Unique binds
// ============================================================================

#[test]
fn unique_bind_always_unbinds() {
    let (a, b) = (Buffer("A"), Buffer("B"));
    let _ga = a.scoped_bind();
    {
        let _gb = b.unique_bind();
    }
    assert_eq!(
        calls(),
        ["array.bind(A)", "array.bind(B)", "array.unbind()"]
    );
    // Not tracked, so the scoped binding still believes it is current.
    assert_eq!(current_binding::<ArraySlot>(), Some("A"));
}

#[test]
fn references_share_their_targets_slot() {
    let a = Buffer("A");
    let by_ref = &a;
    {
        let _g = by_ref.scoped_bind();
        assert_eq!(scope_depth::<ArraySlot>(), 1);
    }
    assert_eq!(calls(), ["array.bind(A)", "array.unbind()"]);
}

// ============================================================================
// Texture units
// ============================================================================

/// Per-unit texture bindings, the way the GL keeps them.
#[derive(Default)]
struct Units {
    active: u32,
    bound: BTreeMap<u32, &'static str>,
}

thread_local! {
    static UNITS: RefCell<Units> = RefCell::new(Units::default());
}

struct UnitSlot;
impl Slot for UnitSlot {
    type Binding = u32;
    fn bind(unit: &u32) {
        UNITS.with_borrow_mut(|units| units.active = *unit);
    }
    fn unbind() {
        UNITS.with_borrow_mut(|units| units.active = 0);
    }
}

struct Unit(u32);
impl Bindable for Unit {
    type Slot = UnitSlot;
    fn binding(&self) -> u32 {
        self.0
    }
}

/// One stack for every unit, writing to whichever unit is active.
struct SharedTextureSlot;
impl Slot for SharedTextureSlot {
    type Binding = &'static str;
    fn bind(texture: &&'static str) {
        UNITS.with_borrow_mut(|units| {
            let active = units.active;
            units.bound.insert(active, texture);
        });
    }
    fn unbind() {
        UNITS.with_borrow_mut(|units| {
            let active = units.active;
            units.bound.remove(&active);
        });
    }
}

struct Texture(&'static str);
impl Bindable for Texture {
    type Slot = SharedTextureSlot;
    fn binding(&self) -> &'static str {
        self.0
    }
}

fn bound_on(unit: u32) -> Option<&'static str> {
    UNITS.with_borrow(|units| units.bound.get(&unit).copied())
}

#[test]
fn scope_exit_restores_onto_the_still_active_inner_unit() {
    let (albedo, normal) = (Texture("albedo"), Texture("normal"));
    let unit0 = Unit(0);
    let unit1 = Unit(1);
    {
        let _u0 = unit0.scoped_bind();
        let _albedo = albedo.scoped_bind();
        {
            let _u1 = unit1.scoped_bind();
            let _normal = normal.scoped_bind();
            assert_eq!(scope_depth::<SharedTextureSlot>(), 2);
            assert_eq!(bound_on(0), Some("albedo"));
            assert_eq!(bound_on(1), Some("normal"));
        }
        // "normal" was released while unit 1 was still active, so "albedo" was rebound there.
        assert_eq!(bound_on(0), Some("albedo"));
        assert_eq!(bound_on(1), Some("albedo"));
        assert_eq!(scope_depth::<SharedTextureSlot>(), 1);
    }
    assert_eq!(bound_on(0), None);
    assert_eq!(bound_on(1), Some("albedo"));
}

#[test]
fn a_restore_after_the_unit_is_released_lands_on_the_active_unit() {
    let (albedo, normal) = (Texture("albedo"), Texture("normal"));
    let (unit0, unit1) = (Unit(0), Unit(1));
    let _u0 = unit0.scoped_bind();
    let _albedo = albedo.scoped_bind();

    let u1 = unit1.scoped_bind();
    let gn = normal.scoped_bind();
    drop(u1);
    drop(gn);
    // Unit 0 was active again, so "albedo" was rebound there and unit 1 still has "normal".
    assert_eq!(bound_on(0), Some("albedo"));
    assert_eq!(bound_on(1), Some("normal"));
    assert_eq!(current_binding::<SharedTextureSlot>(), Some("albedo"));
}
