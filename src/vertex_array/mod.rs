//! Vertex array objects.

use crate::{
    buffer::AttribBufferView,
    gl,
    id::DeleteVertexArrays,
    program::uniform::AttributeLocation,
    slot, Bindable, GLenum, Id, UniqueIdArray,
};

/// Scalar types the GL can fetch from a buffer.
pub trait Primitive: bytemuck::Pod + crate::sealed::Sealed {
    /// The `type` argument of `glVertexAttribPointer` and friends.
    const ENUMERATOR: GLenum;
    /// Whether the type can be fetched as-is into integer shader inputs.
    const INTEGER: bool;
}

/// Types usable as element indices.
pub trait IndexPrimitive: Primitive {}

macro_rules! primitive {
    ($($ty:ty = $value:ident, $integer:literal;)*) => {
        $(
            impl crate::sealed::Sealed for $ty {}
            impl Primitive for $ty {
                const ENUMERATOR: GLenum = gl::$value;
                const INTEGER: bool = $integer;
            }
        )*
    };
}

primitive! {
    f32 = FLOAT, false;
    f64 = DOUBLE, false;
    i8 = BYTE, true;
    i16 = SHORT, true;
    i32 = INT, true;
    u8 = UNSIGNED_BYTE, true;
    u16 = UNSIGNED_SHORT, true;
    u32 = UNSIGNED_INT, true;
}

impl IndexPrimitive for u8 {}
impl IndexPrimitive for u16 {}
impl IndexPrimitive for u32 {}

/// Determines the number of components to load, generally this should match the
/// dimensionality of the vertex shader input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Components {
    Scalar = 1,
    Vec2 = 2,
    Vec3 = 3,
    Vec4 = 4,
}
impl From<Components> for i32 {
    fn from(value: Components) -> Self {
        value as _
    }
}

/// VAO.
/// A vertex array remembers which buffer each attribute reads from, and how.
#[derive(Debug)]
pub struct VertexArray {
    id: UniqueIdArray<1, DeleteVertexArrays>,
}

impl VertexArray {
    #[doc(alias = "glGenVertexArrays")]
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: unsafe { crate::gl_gen_with(gl::GenVertexArrays, DeleteVertexArrays) },
        }
    }
    #[must_use]
    pub fn id(&self) -> Id {
        self.id.get(0)
    }
    /// Feed the attribute at `location` from `buffer`, tightly packed, converted to floats.
    /// Enables the attribute.
    ///
    /// The buffer is remembered by the vertex array, and does not need to be bound at draw time.
    #[doc(alias = "glVertexAttribPointer")]
    #[doc(alias = "glEnableVertexAttribArray")]
    pub fn bind_attribute_buffer<T: Primitive>(
        &self,
        buffer: AttribBufferView<T>,
        location: AttributeLocation,
        components: Components,
    ) {
        let _vao = self.scoped_bind();
        let _buffer = buffer.scoped_bind();
        unsafe {
            gl::EnableVertexAttribArray(location.get());
            gl::VertexAttribPointer(
                location.get(),
                components.into(),
                T::ENUMERATOR,
                gl::FALSE,
                0,
                Self::offset_pointer(&buffer),
            );
        }
    }
    /// [`Self::bind_attribute_buffer`], for integer shader inputs (`int`, `uvec2`, ...).
    #[doc(alias = "glVertexAttribIPointer")]
    pub fn bind_integer_attribute_buffer<T: Primitive>(
        &self,
        buffer: AttribBufferView<T>,
        location: AttributeLocation,
        components: Components,
    ) {
        assert!(T::INTEGER, "integer attributes need an integer buffer");
        let _vao = self.scoped_bind();
        let _buffer = buffer.scoped_bind();
        unsafe {
            gl::EnableVertexAttribArray(location.get());
            gl::VertexAttribIPointer(
                location.get(),
                components.into(),
                T::ENUMERATOR,
                0,
                Self::offset_pointer(&buffer),
            );
        }
    }
    /// Stop feeding the attribute at `location`.
    #[doc(alias = "glDisableVertexAttribArray")]
    pub fn unbind_attribute_buffer(&self, location: AttributeLocation) {
        let _vao = self.scoped_bind();
        unsafe { gl::DisableVertexAttribArray(location.get()) }
    }
    // Interpreted as a byte offset into the bound GL_ARRAY_BUFFER, never dereferenced.
    fn offset_pointer<T>(buffer: &AttribBufferView<T>) -> *const std::ffi::c_void {
        buffer.byte_offset() as _
    }
}

impl Default for VertexArray {
    fn default() -> Self {
        Self::new()
    }
}

impl Bindable for VertexArray {
    type Slot = slot::vertex_array::VertexArray;
    fn binding(&self) -> Id {
        self.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enumerator<T: Primitive>() -> GLenum {
        T::ENUMERATOR
    }

    #[test]
    fn primitive_enumerators() {
        assert_eq!(enumerator::<f32>(), gl::FLOAT);
        assert_eq!(enumerator::<f64>(), gl::DOUBLE);
        assert_eq!(enumerator::<i8>(), gl::BYTE);
        assert_eq!(enumerator::<u16>(), gl::UNSIGNED_SHORT);
        assert_eq!(enumerator::<u32>(), gl::UNSIGNED_INT);
    }

    #[test]
    fn only_integers_are_integer() {
        assert!(!f32::INTEGER);
        assert!(i16::INTEGER);
    }

    #[test]
    fn component_counts() {
        assert_eq!(i32::from(Components::Scalar), 1);
        assert_eq!(i32::from(Components::Vec3), 3);
    }
}
