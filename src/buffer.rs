//! Typed vertex and index buffers.
//!
//! Buffers are typed by element and by target: a `StaticBuffer<f32, Array>` holds vertex
//! attributes, a `StaticBuffer<u16, ElementArray>` holds indices. Lengths and offsets are in
//! elements, never bytes.

use std::marker::PhantomData;

use bytemuck::Pod;

use crate::{gl, id::DeleteBuffers, Bindable, Id, UniqueIdArray};

pub use crate::slot::buffer::{Array, ElementArray, Target};

/// Hints to the GL as to how often and in what way a buffer will be used.
///
/// While it is just a hint (and thus does not restrict the actual abilities of the buffer),
/// using a buffer in a way inconsistent with its usage may be several orders of magnitude
/// slower.
pub mod usage {
    /// Describes the relationship between reads and writes
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Frequency {
        /// Contents will be read at most a few times after a write.
        Stream,
        /// Contents will be written once and read many times.
        Static,
        /// Contents will be written many times and read many times.
        Dynamic,
    }
    /// Describes the sources and destinations of reads and writes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Access {
        /// Host writes, GL reads.
        Draw,
        /// Host reads, GL writes.
        Read,
        /// GL writes, GL reads.
        Copy,
    }
    /// Combine a frequency and access into the corresponding `GLenum`.
    #[must_use]
    pub fn as_gl(frequency: Frequency, access: Access) -> crate::GLenum {
        use crate::gl;
        use Access as A;
        use Frequency as F;

        match (frequency, access) {
            (F::Stream, A::Draw) => gl::STREAM_DRAW,
            (F::Stream, A::Read) => gl::STREAM_READ,
            (F::Stream, A::Copy) => gl::STREAM_COPY,

            (F::Static, A::Draw) => gl::STATIC_DRAW,
            (F::Static, A::Read) => gl::STATIC_READ,
            (F::Static, A::Copy) => gl::STATIC_COPY,

            (F::Dynamic, A::Draw) => gl::DYNAMIC_DRAW,
            (F::Dynamic, A::Read) => gl::DYNAMIC_READ,
            (F::Dynamic, A::Copy) => gl::DYNAMIC_COPY,
        }
    }
}

const GROWTH_FACTOR: f64 = 1.6;

/// Capacity to grow to when `len` elements no longer fit in `capacity`.
fn grown_capacity(len: usize, capacity: usize) -> usize {
    len.max((capacity as f64 * GROWTH_FACTOR) as usize)
}

/// A range of elements within a buffer. Binds the whole buffer; the offset is applied by
/// whatever consumes the view.
pub struct BufferView<T, Tgt: Target> {
    id: Id,
    offset: usize,
    len: usize,
    _ty: PhantomData<fn() -> (T, Tgt)>,
}

impl<T, Tgt: Target> BufferView<T, Tgt> {
    #[must_use]
    pub fn id(&self) -> Id {
        self.id
    }
    /// Offset of the first element, in elements.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }
    #[must_use]
    pub fn byte_offset(&self) -> usize {
        self.offset * std::mem::size_of::<T>()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T, Tgt: Target> Clone for BufferView<T, Tgt> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T, Tgt: Target> Copy for BufferView<T, Tgt> {}

impl<T, Tgt: Target> std::fmt::Debug for BufferView<T, Tgt> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferView")
            .field("id", &self.id)
            .field("offset", &self.offset)
            .field("len", &self.len)
            .finish()
    }
}

impl<T, Tgt: Target> Bindable for BufferView<T, Tgt> {
    type Slot = Tgt;
    fn binding(&self) -> Id {
        self.id
    }
}

/// An owned buffer of `T`s. See [`StaticBuffer`] and [`DynamicBuffer`] for filling it.
pub struct Buffer<T, Tgt: Target> {
    id: UniqueIdArray<1, DeleteBuffers>,
    len: usize,
    _ty: PhantomData<fn() -> (T, Tgt)>,
}

impl<T, Tgt: Target> Buffer<T, Tgt> {
    #[doc(alias = "glGenBuffers")]
    fn new() -> Self {
        Self {
            id: unsafe { crate::gl_gen_with(gl::GenBuffers, DeleteBuffers) },
            len: 0,
            _ty: PhantomData,
        }
    }
    #[must_use]
    pub fn id(&self) -> Id {
        self.id.get(0)
    }
    /// Number of elements last uploaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    /// A view of every element.
    #[must_use]
    pub fn view(&self) -> BufferView<T, Tgt> {
        self.view_range(0, self.len)
    }
    /// A view of `len` elements, starting at element `offset`.
    ///
    /// # Panics
    /// If the range extends past the end of the buffer.
    #[must_use]
    pub fn view_range(&self, offset: usize, len: usize) -> BufferView<T, Tgt> {
        assert!(
            offset.checked_add(len).is_some_and(|end| end <= self.len),
            "view {offset}+{len} out of bounds of buffer of {}",
            self.len
        );
        BufferView {
            id: self.id(),
            offset,
            len,
            _ty: PhantomData,
        }
    }
}

impl<T, Tgt: Target> std::fmt::Debug for Buffer<T, Tgt> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("id", &self.id())
            .field("len", &self.len)
            .finish()
    }
}

impl<T, Tgt: Target> Bindable for Buffer<T, Tgt> {
    type Slot = Tgt;
    fn binding(&self) -> Id {
        self.id()
    }
}

/// Storage re-specified with every upload. For data written once, or rarely.
#[derive(Debug)]
pub struct StaticBuffer<T, Tgt: Target> {
    buffer: Buffer<T, Tgt>,
}

impl<T: Pod, Tgt: Target> StaticBuffer<T, Tgt> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Buffer::new(),
        }
    }
    /// A buffer holding a copy of `data`.
    #[must_use]
    pub fn with_data(data: &[T]) -> Self {
        let mut buffer = Self::new();
        buffer.buffer_data(data);
        buffer
    }
    /// Replace the contents with `data`.
    #[doc(alias = "glBufferData")]
    pub fn buffer_data(&mut self, data: &[T]) {
        self.buffer.len = data.len();
        let _bind = self.buffer.scoped_bind();
        let bytes: &[u8] = bytemuck::cast_slice(data);
        unsafe {
            gl::BufferData(
                Tgt::TARGET,
                bytes.len().try_into().expect("buffer exceeds GLsizeiptr::MAX"),
                bytes.as_ptr().cast(),
                usage::as_gl(usage::Frequency::Static, usage::Access::Draw),
            );
        }
    }
}

impl<T: Pod, Tgt: Target> Default for StaticBuffer<T, Tgt> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, Tgt: Target> std::ops::Deref for StaticBuffer<T, Tgt> {
    type Target = Buffer<T, Tgt>;
    fn deref(&self) -> &Buffer<T, Tgt> {
        &self.buffer
    }
}

impl<T, Tgt: Target> Bindable for StaticBuffer<T, Tgt> {
    type Slot = Tgt;
    fn binding(&self) -> Id {
        self.buffer.id()
    }
}

/// Storage that grows geometrically and is overwritten in place. For data rewritten often.
#[derive(Debug)]
pub struct DynamicBuffer<T, Tgt: Target> {
    buffer: Buffer<T, Tgt>,
    capacity: usize,
}

impl<T: Pod, Tgt: Target> DynamicBuffer<T, Tgt> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Buffer::new(),
            capacity: 0,
        }
    }
    /// Replace the contents with `data`, growing the storage if it does not fit.
    pub fn buffer_data(&mut self, data: &[T]) {
        self.buffer.len = data.len();
        if data.len() > self.capacity {
            self.reserve(grown_capacity(data.len(), self.capacity));
        }
        self.buffer_subdata(data, 0);
    }
    /// Overwrite elements starting at element `offset`.
    ///
    /// # Panics
    /// If the range extends past [`Buffer::len`].
    #[doc(alias = "glBufferSubData")]
    pub fn buffer_subdata(&self, data: &[T], offset: usize) {
        assert!(
            offset
                .checked_add(data.len())
                .is_some_and(|end| end <= self.buffer.len),
            "write {offset}+{} out of bounds of buffer of {}",
            data.len(),
            self.buffer.len
        );
        let _bind = self.buffer.scoped_bind();
        let bytes: &[u8] = bytemuck::cast_slice(data);
        unsafe {
            gl::BufferSubData(
                Tgt::TARGET,
                (offset * std::mem::size_of::<T>())
                    .try_into()
                    .expect("offset exceeds GLintptr::MAX"),
                bytes.len().try_into().expect("buffer exceeds GLsizeiptr::MAX"),
                bytes.as_ptr().cast(),
            );
        }
    }
    /// Make room for at least `capacity` elements. Never shrinks.
    ///
    /// Growing the storage discards its contents.
    #[doc(alias = "glBufferData")]
    pub fn reserve(&mut self, capacity: usize) {
        if capacity <= self.capacity {
            return;
        }
        log::debug!(
            "growing buffer {} from {} to {capacity} elements",
            self.buffer.id(),
            self.capacity
        );
        self.capacity = capacity;
        let _bind = self.buffer.scoped_bind();
        unsafe {
            gl::BufferData(
                Tgt::TARGET,
                (capacity * std::mem::size_of::<T>())
                    .try_into()
                    .expect("buffer exceeds GLsizeiptr::MAX"),
                std::ptr::null(),
                usage::as_gl(usage::Frequency::Dynamic, usage::Access::Draw),
            );
        }
    }
    /// Elements that fit without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Pod, Tgt: Target> Default for DynamicBuffer<T, Tgt> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, Tgt: Target> std::ops::Deref for DynamicBuffer<T, Tgt> {
    type Target = Buffer<T, Tgt>;
    fn deref(&self) -> &Buffer<T, Tgt> {
        &self.buffer
    }
}

impl<T, Tgt: Target> Bindable for DynamicBuffer<T, Tgt> {
    type Slot = Tgt;
    fn binding(&self) -> Id {
        self.buffer.id()
    }
}

pub type AttribBufferView<T> = BufferView<T, Array>;
pub type IndexBufferView<T> = BufferView<T, ElementArray>;
pub type StaticAttribBuffer<T> = StaticBuffer<T, Array>;
pub type StaticIndexBuffer<T> = StaticBuffer<T, ElementArray>;
pub type DynamicAttribBuffer<T> = DynamicBuffer<T, Array>;
pub type DynamicIndexBuffer<T> = DynamicBuffer<T, ElementArray>;
