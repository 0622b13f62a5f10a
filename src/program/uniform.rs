//! Typed shader interface locations and uniform uploads.
//!
//! Uniform uploads act on the program currently in use; bind the
//! [`ShaderProgram`](super::ShaderProgram) first.

use std::marker::PhantomData;

use crate::{
    gl::{self, types::GLint},
    slot, Bindable,
};

/// Location of a uniform within a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(GLint);
impl UniformLocation {
    /// `None` for the GL's "no such uniform" value, `-1`, or any other negative.
    #[must_use]
    pub fn new(location: GLint) -> Option<Self> {
        (location >= 0).then_some(Self(location))
    }
    #[must_use]
    pub fn get(&self) -> GLint {
        self.0
    }
}

/// Location of a vertex shader input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeLocation(u32);
impl AttributeLocation {
    #[must_use]
    pub fn new(location: u32) -> Self {
        Self(location)
    }
    #[must_use]
    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a fragment shader output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragOutputLocation(u32);
impl FragOutputLocation {
    #[must_use]
    pub fn new(location: u32) -> Self {
        Self(location)
    }
    #[must_use]
    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Values that can be uploaded to a single uniform.
pub trait UniformValue: crate::sealed::Sealed {
    /// Upload to `location` of the program in use.
    fn upload(&self, location: UniformLocation);
}

macro_rules! uniform_value {
    ($($ty:ty => |$v:ident, $loc:ident| $call:expr;)*) => {
        $(
            impl crate::sealed::Sealed for $ty {}
            impl UniformValue for $ty {
                fn upload(&self, location: UniformLocation) {
                    let $v = self;
                    let $loc = location.get();
                    unsafe { $call }
                }
            }
        )*
    };
}

// `f32`, `i32` and `u32` are sealed by the vertex array primitives already.
impl UniformValue for f32 {
    fn upload(&self, location: UniformLocation) {
        unsafe { gl::Uniform1f(location.get(), *self) }
    }
}
impl UniformValue for i32 {
    fn upload(&self, location: UniformLocation) {
        unsafe { gl::Uniform1i(location.get(), *self) }
    }
}
impl UniformValue for u32 {
    fn upload(&self, location: UniformLocation) {
        unsafe { gl::Uniform1ui(location.get(), *self) }
    }
}

uniform_value! {
    [f32; 2] => |v, loc| gl::Uniform2fv(loc, 1, v.as_ptr());
    [f32; 3] => |v, loc| gl::Uniform3fv(loc, 1, v.as_ptr());
    [f32; 4] => |v, loc| gl::Uniform4fv(loc, 1, v.as_ptr());
    [i32; 2] => |v, loc| gl::Uniform2iv(loc, 1, v.as_ptr());
    [i32; 3] => |v, loc| gl::Uniform3iv(loc, 1, v.as_ptr());
    [i32; 4] => |v, loc| gl::Uniform4iv(loc, 1, v.as_ptr());
    [u32; 2] => |v, loc| gl::Uniform2uiv(loc, 1, v.as_ptr());
    [u32; 3] => |v, loc| gl::Uniform3uiv(loc, 1, v.as_ptr());
    [u32; 4] => |v, loc| gl::Uniform4uiv(loc, 1, v.as_ptr());
    // Column-major.
    [[f32; 2]; 2] => |v, loc| gl::UniformMatrix2fv(loc, 1, gl::FALSE, v.as_ptr().cast());
    [[f32; 3]; 3] => |v, loc| gl::UniformMatrix3fv(loc, 1, gl::FALSE, v.as_ptr().cast());
    [[f32; 4]; 4] => |v, loc| gl::UniformMatrix4fv(loc, 1, gl::FALSE, v.as_ptr().cast());
}

#[cfg(feature = "mint")]
mod mint_values {
    use super::{UniformLocation, UniformValue};

    fn v2(v: mint::Vector2<f32>) -> [f32; 2] {
        [v.x, v.y]
    }
    fn v3(v: mint::Vector3<f32>) -> [f32; 3] {
        [v.x, v.y, v.z]
    }
    fn v4(v: mint::Vector4<f32>) -> [f32; 4] {
        [v.x, v.y, v.z, v.w]
    }

    macro_rules! via_array {
        ($($ty:ty => |$m:ident| $array:expr;)*) => {
            $(
                impl crate::sealed::Sealed for $ty {}
                impl UniformValue for $ty {
                    fn upload(&self, location: UniformLocation) {
                        let $m = *self;
                        $array.upload(location);
                    }
                }
            )*
        };
    }

    via_array! {
        mint::Vector2<f32> => |m| v2(m);
        mint::Vector3<f32> => |m| v3(m);
        mint::Vector4<f32> => |m| v4(m);
        mint::ColumnMatrix2<f32> => |m| [v2(m.x), v2(m.y)];
        mint::ColumnMatrix3<f32> => |m| [v3(m.x), v3(m.y), v3(m.z)];
        mint::ColumnMatrix4<f32> => |m| [v4(m.x), v4(m.y), v4(m.z), v4(m.w)];
    }
}

/// A single uniform of type `T`.
pub struct Uniform<T: UniformValue> {
    location: UniformLocation,
    _ty: PhantomData<fn(T)>,
}

impl<T: UniformValue> Uniform<T> {
    #[must_use]
    pub fn new(location: UniformLocation) -> Self {
        Self {
            location,
            _ty: PhantomData,
        }
    }
    #[must_use]
    pub fn location(&self) -> UniformLocation {
        self.location
    }
    #[doc(alias = "glUniform")]
    pub fn load(&self, value: T) {
        value.upload(self.location);
    }
}

impl<T: UniformValue> Clone for Uniform<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: UniformValue> Copy for Uniform<T> {}

impl<T: UniformValue> std::fmt::Debug for Uniform<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Uniform").field(&self.location).finish()
    }
}

/// Scalars that can be uploaded as arrays.
pub trait ArrayUniformValue: UniformValue + Sized {
    fn upload_slice(values: &[Self], location: UniformLocation);
}
impl ArrayUniformValue for f32 {
    fn upload_slice(values: &[Self], location: UniformLocation) {
        unsafe { gl::Uniform1fv(location.get(), crate::gl_size(values.len()), values.as_ptr()) }
    }
}
impl ArrayUniformValue for i32 {
    fn upload_slice(values: &[Self], location: UniformLocation) {
        unsafe { gl::Uniform1iv(location.get(), crate::gl_size(values.len()), values.as_ptr()) }
    }
}
impl ArrayUniformValue for u32 {
    fn upload_slice(values: &[Self], location: UniformLocation) {
        unsafe { gl::Uniform1uiv(location.get(), crate::gl_size(values.len()), values.as_ptr()) }
    }
}

/// A uniform array of up to `N` `T`s.
pub struct ArrayUniform<T: ArrayUniformValue, const N: usize> {
    location: UniformLocation,
    _ty: PhantomData<fn(T)>,
}

impl<T: ArrayUniformValue, const N: usize> ArrayUniform<T, N> {
    #[must_use]
    pub fn new(location: UniformLocation) -> Self {
        Self {
            location,
            _ty: PhantomData,
        }
    }
    #[must_use]
    pub fn location(&self) -> UniformLocation {
        self.location
    }
    /// Upload `values` to the first `values.len()` elements.
    #[doc(alias = "glUniform")]
    pub fn load(&self, values: &[T]) {
        debug_assert!(
            values.len() <= N,
            "{} values for a uniform array of {N}",
            values.len()
        );
        if values.is_empty() {
            return;
        }
        T::upload_slice(values, self.location);
    }
}

impl<T: ArrayUniformValue, const N: usize> std::fmt::Debug for ArrayUniform<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ArrayUniform").field(&self.location).finish()
    }
}

/// A `sampler*` uniform together with the texture unit it reads from.
///
/// Binding points the sampler at its unit and makes that unit active, so that textures bound
/// within the scope land on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSampler {
    pub location: UniformLocation,
    pub unit: u32,
}
impl TextureSampler {
    #[must_use]
    pub fn new(location: UniformLocation, unit: u32) -> Self {
        Self { location, unit }
    }
}
impl Bindable for TextureSampler {
    type Slot = slot::texture::ActiveUnit;
    fn binding(&self) -> TextureSampler {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_uniform_locations_are_absent() {
        assert_eq!(UniformLocation::new(-1), None);
        assert_eq!(UniformLocation::new(3).map(|l| l.get()), Some(3));
    }

    #[test]
    fn uniforms_keep_their_location() {
        let location = UniformLocation::new(7).unwrap();
        let uniform = Uniform::<[[f32; 4]; 4]>::new(location);
        let copy = uniform;
        assert_eq!(copy.location(), location);
        assert_eq!(ArrayUniform::<f32, 8>::new(location).location(), location);
    }

    #[test]
    fn samplers_bind_as_themselves() {
        let sampler = TextureSampler::new(UniformLocation::new(2).unwrap(), 3);
        assert_eq!(sampler.binding(), sampler);
    }
}
