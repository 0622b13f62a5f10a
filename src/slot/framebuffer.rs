use crate::{framebuffer::Viewport, gl, id::Id, NULL_ID};

use super::Slot;

/// The `GL_FRAMEBUFFER` binding point, along with the viewport.
///
/// Binding a framebuffer also applies the viewport it was configured with. Unbinding returns
/// to the default framebuffer and the viewport set by
/// [`set_default_viewport`](crate::framebuffer::set_default_viewport), or failing that, the
/// viewport that was live before the first framebuffer was bound over the default one.
#[doc(alias = "glBindFramebuffer")]
#[derive(Debug)]
pub struct Framebuffer;
impl Slot for Framebuffer {
    type Binding = (Id, Viewport);
    fn bind((framebuffer, viewport): &(Id, Viewport)) {
        crate::framebuffer::enter_framebuffer();
        viewport.apply();
        unsafe { gl::BindFramebuffer(gl::FRAMEBUFFER, *framebuffer) }
    }
    fn unbind() {
        crate::framebuffer::leave_framebuffer();
        unsafe { gl::BindFramebuffer(gl::FRAMEBUFFER, NULL_ID) }
    }
}
