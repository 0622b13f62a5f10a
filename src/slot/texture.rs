//! Texture binding points.

use crate::{gl, id::Id, program::uniform::TextureSampler, NULL_ID};

use super::Slot;

/// The `GL_TEXTURE_2D` target of the active texture unit.
///
/// GL keeps one `GL_TEXTURE_2D` binding per unit, but this slot keeps a single stack for all
/// of them. A restore rebinds onto whichever unit is active at that moment. Leaving a nested
/// texture scope while its own unit is still active leaves the outer texture bound on that
/// unit as well. Bind each texture inside the [`ActiveUnit`] scope of its sampler.
#[doc(alias = "glBindTexture")]
#[derive(Debug)]
pub struct Texture2D;
impl Slot for Texture2D {
    type Binding = Id;
    fn bind(texture: &Id) {
        unsafe { gl::BindTexture(gl::TEXTURE_2D, *texture) }
    }
    fn unbind() {
        unsafe { gl::BindTexture(gl::TEXTURE_2D, NULL_ID) }
    }
}

/// The active texture unit, together with the sampler uniform reading from it.
///
/// Unbinding returns to unit 0, and leaves the sampler uniform alone.
#[doc(alias = "glActiveTexture")]
#[derive(Debug)]
pub struct ActiveUnit;
impl Slot for ActiveUnit {
    type Binding = TextureSampler;
    fn bind(sampler: &TextureSampler) {
        unsafe {
            gl::Uniform1i(sampler.location.get(), sampler.unit as _);
            gl::ActiveTexture(gl::TEXTURE0 + sampler.unit);
        }
    }
    fn unbind() {
        unsafe { gl::ActiveTexture(gl::TEXTURE0) }
    }
}
