//! Render targets built from textures.

use std::cell::Cell;

use crate::{
    gl::{self, types::GLenum},
    id::DeleteFramebuffers,
    program::uniform::FragOutputLocation,
    slot,
    texture::Texture,
    Bindable, Id, UniqueIdArray,
};

/// A rectangle of the framebuffer, in pixels, lower-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}
impl Viewport {
    /// A viewport at the origin.
    #[must_use]
    pub const fn sized(width: i32, height: i32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
    #[doc(alias = "glViewport")]
    pub(crate) fn apply(&self) {
        unsafe { gl::Viewport(self.x, self.y, self.width, self.height) }
    }
}

/// What the default framebuffer's viewport is known to be, per thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct DefaultViewport {
    /// Given with [`set_default_viewport`]. Always wins.
    recorded: Option<Viewport>,
    /// Read back from the GL when a framebuffer was bound over the default one.
    captured: Option<Viewport>,
    /// Whether a framebuffer bound through this crate is current.
    framebuffer_bound: bool,
}

impl DefaultViewport {
    /// A framebuffer is about to be bound. If it replaces the default framebuffer and no
    /// viewport was recorded, remember the live one through `query`.
    fn enter(&mut self, query: impl FnOnce() -> Viewport) {
        if !self.framebuffer_bound && self.recorded.is_none() {
            self.captured = Some(query());
        }
        self.framebuffer_bound = true;
    }
    /// The default framebuffer is current again. The viewport to restore, if any is known.
    fn leave(&mut self) -> Option<Viewport> {
        self.framebuffer_bound = false;
        self.current()
    }
    fn current(&self) -> Option<Viewport> {
        self.recorded.or(self.captured)
    }
}

thread_local! {
    static DEFAULT_VIEWPORT: Cell<DefaultViewport> = Cell::new(DefaultViewport::default());
}

#[doc(alias = "glGetIntegerv")]
#[doc(alias = "GL_VIEWPORT")]
fn query_viewport() -> Viewport {
    let mut rect = [0; 4];
    unsafe { gl::GetIntegerv(gl::VIEWPORT, rect.as_mut_ptr()) };
    let [x, y, width, height] = rect;
    Viewport {
        x,
        y,
        width,
        height,
    }
}

fn update_default<R>(f: impl FnOnce(&mut DefaultViewport) -> R) -> R {
    let mut state = DEFAULT_VIEWPORT.get();
    let result = f(&mut state);
    DEFAULT_VIEWPORT.set(state);
    result
}

/// Called by the framebuffer slot before binding a framebuffer.
pub(crate) fn enter_framebuffer() {
    update_default(|state| state.enter(query_viewport));
}

/// Called by the framebuffer slot when returning to the default framebuffer.
pub(crate) fn leave_framebuffer() {
    if let Some(viewport) = update_default(DefaultViewport::leave) {
        viewport.apply();
    }
}

/// Set the viewport of the default framebuffer, typically the window size, and apply it.
///
/// Unbinding any [`Framebuffer`] returns to this viewport. Recorded per thread. Without it,
/// the viewport that was live when a framebuffer was first bound over the default one is
/// restored instead.
pub fn set_default_viewport(viewport: Viewport) {
    update_default(|state| state.recorded = Some(viewport));
    viewport.apply();
}

/// The viewport the default framebuffer returns to on this thread, if known yet.
#[must_use]
pub fn default_viewport() -> Option<Viewport> {
    DEFAULT_VIEWPORT.get().current()
}

/// Routes a texture to a fragment shader output.
#[derive(Debug, Clone, Copy)]
pub struct TextureAttachment<'a> {
    pub texture: &'a Texture,
    pub location: FragOutputLocation,
}

/// Compute the `glDrawBuffers` list for outputs at `locations`, where the `i`th location is
/// served by `GL_COLOR_ATTACHMENTi`. Locations nothing writes to get `GL_NONE`.
fn draw_buffers(locations: impl IntoIterator<Item = u32> + Clone) -> Vec<GLenum> {
    let Some(max) = locations.clone().into_iter().max() else {
        return Vec::new();
    };
    let mut buffers = vec![gl::NONE; max as usize + 1];
    for (i, location) in locations.into_iter().enumerate() {
        buffers[location as usize] = color_attachment(i);
    }
    buffers
}

fn color_attachment(i: usize) -> GLenum {
    gl::COLOR_ATTACHMENT0 + GLenum::try_from(i).expect("too many color attachments")
}

/// An off-screen render target.
///
/// Binding a framebuffer applies its [viewport](Self::set_viewport).
#[derive(Debug)]
pub struct Framebuffer {
    id: UniqueIdArray<1, DeleteFramebuffers>,
    viewport: Viewport,
}

impl Framebuffer {
    #[doc(alias = "glGenFramebuffers")]
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: unsafe { crate::gl_gen_with(gl::GenFramebuffers, DeleteFramebuffers) },
            viewport: Viewport::default(),
        }
    }
    /// The viewport applied whenever this framebuffer is bound. Takes effect from the next bind.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
    /// Replace the color attachments.
    ///
    /// Textures are attached to consecutive color attachment points in the order given, and
    /// each attachment point is routed to its fragment output location. If two textures
    /// claim one location, the later one receives the output.
    #[doc(alias = "glFramebufferTexture")]
    #[doc(alias = "glDrawBuffers")]
    pub fn set_frag_output_textures(&self, attachments: &[TextureAttachment]) {
        let _bind = self.scoped_bind();
        for (i, attachment) in attachments.iter().enumerate() {
            unsafe {
                gl::FramebufferTexture(
                    gl::FRAMEBUFFER,
                    color_attachment(i),
                    attachment.texture.id(),
                    0,
                );
            }
        }
        let buffers = draw_buffers(attachments.iter().map(|a| a.location.get()));
        unsafe { gl::DrawBuffers(crate::gl_size(buffers.len()), buffers.as_ptr()) }
    }
    #[doc(alias = "glFramebufferTexture")]
    #[doc(alias = "GL_DEPTH_ATTACHMENT")]
    pub fn set_depth_texture(&self, texture: &Texture) {
        let _bind = self.scoped_bind();
        unsafe { gl::FramebufferTexture(gl::FRAMEBUFFER, gl::DEPTH_ATTACHMENT, texture.id(), 0) }
    }
    /// Whether the framebuffer can be rendered to with its current attachments.
    #[doc(alias = "glCheckFramebufferStatus")]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let _bind = self.scoped_bind();
        let status = unsafe { gl::CheckFramebufferStatus(gl::FRAMEBUFFER) };
        if status != gl::FRAMEBUFFER_COMPLETE {
            log::debug!("framebuffer {} incomplete: {status:#x}", self.id());
        }
        status == gl::FRAMEBUFFER_COMPLETE
    }
    #[must_use]
    pub fn id(&self) -> Id {
        self.id.get(0)
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Bindable for Framebuffer {
    type Slot = slot::framebuffer::Framebuffer;
    fn binding(&self) -> (Id, Viewport) {
        (self.id(), self.viewport)
    }
}
