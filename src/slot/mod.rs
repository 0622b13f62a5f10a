//! Binding points, and the guards that make objects current on them.
//!
//! A [`Slot`] is one of the GL's global binding points - `GL_ARRAY_BUFFER`, the used
//! program, the draw framebuffer, and so on. A [`Bindable`] is anything that can be made
//! current on exactly one slot. Several bindables may share a slot (a buffer and a view into
//! it both bind `GL_ARRAY_BUFFER`), in which case they share its bookkeeping too.
//!
//! There are two ways to bind:
//! * [`ScopedBind`] remembers every live scoped binding of its slot on the calling thread.
//!   When a guard goes out of scope it puts back the binding that was current before it, or
//!   leaves the slot empty if there was none. Guards may be dropped in any order; dropping a
//!   guard that has been superseded by a later one changes nothing on the GL side.
//! * [`UniqueBind`] binds, and unbinds on drop. Nothing is remembered. This is the right
//!   choice whenever "nothing bound" is an acceptable state to leave the slot in.
//!
//! ```no_run
//! # use glbind::buffer::StaticAttribBuffer;
//! # fn f(vbo: &StaticAttribBuffer<f32>, other: &StaticAttribBuffer<f32>) {
//! use glbind::Bindable;
//! let _outer = vbo.scoped_bind();
//! {
//!     let _inner = other.scoped_bind();
//!     // `other` is bound here.
//! }
//! // `vbo` is bound again here.
//! # }
//! ```

pub mod buffer;
pub mod framebuffer;
pub mod program;
pub(crate) mod stack;
pub mod state;
pub mod texture;
pub mod vertex_array;

use crate::NotSend;

/// One of the GL's global binding points.
///
/// Implementors are usually zero-sized marker types; the slot is identified by its type.
pub trait Slot: 'static {
    /// Everything needed to make a bindable current on this slot again, captured when the
    /// bindable is bound. For most slots, just an object name.
    type Binding: Clone + 'static;
    /// Make `binding` current.
    fn bind(binding: &Self::Binding);
    /// Return the slot to its default state.
    fn unbind();
}

/// An object that can be made current on a [`Slot`].
pub trait Bindable {
    type Slot: Slot;
    /// Capture what [`Slot::bind`] needs to make `self` current.
    fn binding(&self) -> <Self::Slot as Slot>::Binding;

    /// Bind `self` until the guard is dropped, then restore the previous binding.
    fn scoped_bind(&self) -> ScopedBind<'_, Self> {
        ScopedBind::new(self)
    }
    /// Bind `self` until the guard is dropped, then unbind the slot.
    fn unique_bind(&self) -> UniqueBind<'_, Self> {
        UniqueBind::new(self)
    }
}

impl<B: Bindable + ?Sized> Bindable for &B {
    type Slot = B::Slot;
    fn binding(&self) -> <Self::Slot as Slot>::Binding {
        (**self).binding()
    }
}

/// Keeps a bindable current for its lifetime, then restores whatever was current before it.
///
/// See the [module docs](self) for the semantics under out-of-order drops. Guards are tied to
/// the thread that created them.
#[must_use = "dropping a ScopedBind immediately restores the previous binding"]
pub struct ScopedBind<'a, B: Bindable + ?Sized> {
    bindable: &'a B,
    key: Option<stack::MarkerKey>,
    _not_send: NotSend,
}

impl<'a, B: Bindable + ?Sized> ScopedBind<'a, B> {
    #[doc(alias = "glBind")]
    pub fn new(bindable: &'a B) -> Self {
        let binding = bindable.binding();
        // Build the guard before touching the GL, so that a panicking bind still unlinks.
        let guard = Self {
            bindable,
            key: stack::enter::<B::Slot>(binding.clone()),
            _not_send: std::marker::PhantomData,
        };
        <B::Slot as Slot>::bind(&binding);
        guard
    }
}

impl<B: Bindable + ?Sized> std::ops::Deref for ScopedBind<'_, B> {
    type Target = B;
    fn deref(&self) -> &B {
        self.bindable
    }
}

impl<B: Bindable + ?Sized> Drop for ScopedBind<'_, B> {
    fn drop(&mut self) {
        match stack::exit::<B::Slot>(self.key.take()) {
            stack::Exit::Spliced => (),
            stack::Exit::Restore(binding) => <B::Slot as Slot>::bind(&binding),
            stack::Exit::Unbind => <B::Slot as Slot>::unbind(),
        }
    }
}

impl<B: Bindable + ?Sized> std::fmt::Debug for ScopedBind<'_, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedBind")
            .field("slot", &std::any::type_name::<B::Slot>())
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Keeps a bindable current for its lifetime, then unbinds the slot.
#[must_use = "dropping a UniqueBind immediately unbinds"]
pub struct UniqueBind<'a, B: Bindable + ?Sized> {
    bindable: &'a B,
    _not_send: NotSend,
}

impl<'a, B: Bindable + ?Sized> UniqueBind<'a, B> {
    #[doc(alias = "glBind")]
    pub fn new(bindable: &'a B) -> Self {
        <B::Slot as Slot>::bind(&bindable.binding());
        Self {
            bindable,
            _not_send: std::marker::PhantomData,
        }
    }
}

impl<B: Bindable + ?Sized> std::ops::Deref for UniqueBind<'_, B> {
    type Target = B;
    fn deref(&self) -> &B {
        self.bindable
    }
}

impl<B: Bindable + ?Sized> Drop for UniqueBind<'_, B> {
    fn drop(&mut self) {
        <B::Slot as Slot>::unbind();
    }
}

impl<B: Bindable + ?Sized> std::fmt::Debug for UniqueBind<'_, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniqueBind")
            .field("slot", &std::any::type_name::<B::Slot>())
            .finish_non_exhaustive()
    }
}

/// How many [`ScopedBind`] guards of slot `S` are alive on the calling thread.
///
/// Forgotten guards count, forever.
#[must_use]
pub fn scope_depth<S: Slot>() -> usize {
    stack::depth::<S>()
}

/// The binding the innermost live [`ScopedBind`] of `S` made current, if any.
///
/// Only scoped bindings are tracked; this knows nothing of [`UniqueBind`]s or of binds made
/// behind this crate's back.
#[must_use]
pub fn current_binding<S: Slot>() -> Option<S::Binding> {
    stack::current::<S>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    thread_local! {
        static CALLS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }
    fn record(call: String) {
        CALLS.with_borrow_mut(|calls| calls.push(call));
    }
    fn calls() -> Vec<String> {
        CALLS.with_borrow_mut(std::mem::take)
    }

    struct Recording;
    impl Slot for Recording {
        type Binding = u32;
        fn bind(binding: &u32) {
            assert_ne!(*binding, 666, "refusing to bind");
            record(format!("bind {binding}"));
        }
        fn unbind() {
            record("unbind".to_owned());
        }
    }

    struct Obj(u32);
    impl Bindable for Obj {
        type Slot = Recording;
        fn binding(&self) -> u32 {
            self.0
        }
    }

    #[test]
    fn scoped_restores_outer() {
        let (a, b) = (Obj(1), Obj(2));
        let outer = a.scoped_bind();
        {
            let inner = b.scoped_bind();
            assert_eq!(inner.0, 2);
            assert_eq!(scope_depth::<Recording>(), 2);
            assert_eq!(current_binding::<Recording>(), Some(2));
        }
        assert_eq!(current_binding::<Recording>(), Some(1));
        drop(outer);
        assert_eq!(calls(), ["bind 1", "bind 2", "bind 1", "unbind"]);
        assert_eq!(scope_depth::<Recording>(), 0);
    }

    #[test]
    fn rebinding_the_same_object_nests() {
        let a = Obj(1);
        let outer = a.scoped_bind();
        let inner = a.scoped_bind();
        drop(inner);
        drop(outer);
        assert_eq!(calls(), ["bind 1", "bind 1", "bind 1", "unbind"]);
    }

    #[test]
    fn unique_always_unbinds() {
        let (a, b) = (Obj(1), Obj(2));
        let outer = a.unique_bind();
        drop(b.unique_bind());
        drop(outer);
        assert_eq!(calls(), ["bind 1", "bind 2", "unbind", "unbind"]);
        assert_eq!(scope_depth::<Recording>(), 0);
    }

    #[test]
    fn forgotten_guard_stays_on_the_stack() {
        let (a, b) = (Obj(1), Obj(2));
        std::mem::forget(a.scoped_bind());
        drop(b.scoped_bind());
        // The forgotten binding is still the one to go back to.
        assert_eq!(calls(), ["bind 1", "bind 2", "bind 1"]);
        assert_eq!(scope_depth::<Recording>(), 1);
    }

    #[test]
    fn panicking_bind_does_not_leave_a_marker() {
        let bad = Obj(666);
        let result =
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| bad.scoped_bind().0));
        assert!(result.is_err());
        assert_eq!(scope_depth::<Recording>(), 0);
        assert_eq!(calls(), ["unbind"]);
    }

    #[test]
    fn references_bind_like_their_target() {
        let a = Obj(4);
        let r = &a;
        drop(r.scoped_bind());
        assert_eq!(calls(), ["bind 4", "unbind"]);
    }
}
