//! Exclusive ownership of GL object names.
//!
//! The GL identifies every object by an unsigned integer "name". Names are handed out by
//! `glGen*`/`glCreate*` and must be handed back with the matching `glDelete*` exactly once.
//! [`UniqueId`] and [`UniqueIdArray`] tie that release to `Drop`.
//!
//! Neither type has an opinion on whether a name is valid - a failed allocation leaves the
//! null name, [`NULL_ID`], and it is up to the wrapper that requested it to check. Releasing
//! the null name is always performed, and is a no-op for every GL deleter.

use crate::gl;

/// A GL object name.
pub type Id = gl::types::GLuint;

/// The reserved "no object" name.
pub const NULL_ID: Id = 0;

/// Releases a single name.
pub trait Deleter {
    /// Release `id`. Must accept [`NULL_ID`] silently.
    fn delete(&mut self, id: Id);
}
impl<F: FnMut(Id)> Deleter for F {
    fn delete(&mut self, id: Id) {
        self(id);
    }
}

/// Releases a batch of names in one call.
pub trait ArrayDeleter {
    /// Release every name in `ids`. Must accept [`NULL_ID`] entries silently.
    fn delete(&mut self, ids: &[Id]);
}
impl<F: FnMut(&[Id])> ArrayDeleter for F {
    fn delete(&mut self, ids: &[Id]) {
        self(ids);
    }
}

/// Owns one GL name, releasing it through `D` when dropped.
///
/// Moving transfers ownership; there is no `Clone`. To give up ownership in place, use
/// [`std::mem::take`] (leaves a null owner behind) or [`UniqueId::release`].
#[must_use = "dropping a UniqueId releases its name immediately"]
#[derive(Debug)]
pub struct UniqueId<D: Deleter> {
    id: Id,
    deleter: D,
}

impl<D: Deleter> UniqueId<D> {
    /// Take ownership of an existing name.
    pub fn new(id: Id, deleter: D) -> Self {
        Self { id, deleter }
    }
    /// Allocate a name with `creator` and take ownership of it.
    ///
    /// A failed allocation is *not* detected here, check [`Self::is_null`].
    pub fn create(creator: impl FnOnce() -> Id, deleter: D) -> Self {
        Self::new(creator(), deleter)
    }
    /// The owned name. Ownership is unaffected.
    #[must_use]
    pub fn get(&self) -> Id {
        self.id
    }
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.id == NULL_ID
    }
    /// Hand out the owned name, leaving this owner holding [`NULL_ID`].
    ///
    /// The caller becomes responsible for releasing the returned name.
    #[must_use = "the released name is no longer owned by anything"]
    pub fn release(&mut self) -> Id {
        std::mem::replace(&mut self.id, NULL_ID)
    }
}

impl<D: Deleter + Default> Default for UniqueId<D> {
    /// An owner of [`NULL_ID`].
    fn default() -> Self {
        Self::new(NULL_ID, D::default())
    }
}

impl<D: Deleter> Drop for UniqueId<D> {
    fn drop(&mut self) {
        self.deleter.delete(self.id);
    }
}

/// Owns `N` GL names allocated and released together, as `glGen*s`/`glDelete*s` allow.
#[must_use = "dropping a UniqueIdArray releases its names immediately"]
#[derive(Debug)]
pub struct UniqueIdArray<const N: usize, D: ArrayDeleter> {
    ids: [Id; N],
    deleter: D,
}

impl<const N: usize, D: ArrayDeleter> UniqueIdArray<N, D> {
    /// Take ownership of existing names.
    pub fn new(ids: [Id; N], deleter: D) -> Self {
        Self { ids, deleter }
    }
    /// Allocate all `N` names with one `creator` call, which fills the (null-initialized)
    /// array in place.
    pub fn create(creator: impl FnOnce(&mut [Id; N]), deleter: D) -> Self {
        let mut ids = [NULL_ID; N];
        creator(&mut ids);
        Self::new(ids, deleter)
    }
    /// The `i`th owned name.
    ///
    /// # Panics
    /// If `i >= N`.
    #[must_use]
    pub fn get(&self, i: usize) -> Id {
        self.ids[i]
    }
    /// All owned names.
    #[must_use]
    pub fn ids(&self) -> &[Id; N] {
        &self.ids
    }
}

impl<const N: usize, D: ArrayDeleter + Default> Default for UniqueIdArray<N, D> {
    fn default() -> Self {
        Self::new([NULL_ID; N], D::default())
    }
}

impl<const N: usize, D: ArrayDeleter> Drop for UniqueIdArray<N, D> {
    fn drop(&mut self) {
        self.deleter.delete(&self.ids);
    }
}

/// Releases shader objects with `glDeleteShader`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeleteShader;
impl Deleter for DeleteShader {
    fn delete(&mut self, id: Id) {
        unsafe { gl::DeleteShader(id) }
    }
}

/// Releases program objects with `glDeleteProgram`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeleteProgram;
impl Deleter for DeleteProgram {
    fn delete(&mut self, id: Id) {
        unsafe { gl::DeleteProgram(id) }
    }
}

crate::gl_array_deleter!(pub struct DeleteBuffers = DeleteBuffers);
crate::gl_array_deleter!(pub struct DeleteTextures = DeleteTextures);
crate::gl_array_deleter!(pub struct DeleteVertexArrays = DeleteVertexArrays);
crate::gl_array_deleter!(pub struct DeleteFramebuffers = DeleteFramebuffers);

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    type Log = Rc<RefCell<Vec<Id>>>;

    fn recorder(log: &Log) -> impl FnMut(Id) {
        let log = log.clone();
        move |id| log.borrow_mut().push(id)
    }

    #[test]
    fn releases_once_on_drop() {
        let log = Log::default();
        let id = UniqueId::new(7, recorder(&log));
        assert_eq!(id.get(), 7);
        assert_eq!(id.get(), 7);
        assert!(log.borrow().is_empty());
        drop(id);
        assert_eq!(*log.borrow(), [7]);
    }

    #[test]
    fn create_calls_creator_once() {
        let log = Log::default();
        let mut calls = 0;
        let id = UniqueId::create(
            || {
                calls += 1;
                3
            },
            recorder(&log),
        );
        assert_eq!(calls, 1);
        assert!(!id.is_null());
    }

    #[test]
    fn replace_leaves_null_owner() {
        let log = Log::default();
        let mut a = UniqueId::new(5, recorder(&log));
        let b = std::mem::replace(&mut a, UniqueId::new(NULL_ID, recorder(&log)));
        assert!(a.is_null());
        drop(b);
        drop(a);
        // The moved-from owner releases only the null name.
        assert_eq!(*log.borrow(), [5, NULL_ID]);
    }

    #[test]
    fn swap_releases_each_name_once() {
        let log = Log::default();
        let mut a = UniqueId::new(1, recorder(&log));
        let mut b = UniqueId::new(2, recorder(&log));
        std::mem::swap(&mut a, &mut b);
        assert_eq!((a.get(), b.get()), (2, 1));
        drop(a);
        drop(b);
        assert_eq!(*log.borrow(), [2, 1]);
    }

    #[test]
    fn release_hands_out_name() {
        let log = Log::default();
        let mut id = UniqueId::new(9, recorder(&log));
        assert_eq!(id.release(), 9);
        assert!(id.is_null());
        drop(id);
        assert_eq!(*log.borrow(), [NULL_ID]);
    }

    #[test]
    fn array_is_created_and_deleted_in_one_batch() {
        let batches = Rc::new(RefCell::new(Vec::<Vec<Id>>::new()));
        let sink = batches.clone();
        let ids = UniqueIdArray::<3, _>::create(
            |ids| {
                for (i, id) in ids.iter_mut().enumerate() {
                    *id = 10 + i as Id;
                }
            },
            move |ids: &[Id]| sink.borrow_mut().push(ids.to_vec()),
        );
        assert_eq!(ids.get(1), 11);
        assert_eq!(ids.ids(), &[10, 11, 12]);
        drop(ids);
        assert_eq!(*batches.borrow(), [vec![10, 11, 12]]);
    }

    #[test]
    fn array_with_failed_slot_still_deletes_everything() {
        let batches = Rc::new(RefCell::new(Vec::<Vec<Id>>::new()));
        let sink = batches.clone();
        let ids = UniqueIdArray::<2, _>::create(
            |ids| ids[0] = 4,
            move |ids: &[Id]| sink.borrow_mut().push(ids.to_vec()),
        );
        drop(ids);
        assert_eq!(*batches.borrow(), [vec![4, NULL_ID]]);
    }
}
