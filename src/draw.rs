//! Entry points for executing draw commands and clears.
//!
//! Draws read from whatever is bound when they are issued: bind a
//! [`ShaderProgram`](crate::program::ShaderProgram) and a
//! [`VertexArray`](crate::vertex_array::VertexArray) (and a framebuffer, if not drawing to the
//! default one) around the call.

use crate::{
    buffer::IndexBufferView,
    gl::{self, types::GLbitfield},
    state::Color,
    vertex_array::{IndexPrimitive, Primitive},
    Bindable, GLEnum,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum DrawPrimitive {
    Points = gl::POINTS,
    Lines = gl::LINES,
    LineStrip = gl::LINE_STRIP,
    LineLoop = gl::LINE_LOOP,
    Triangles = gl::TRIANGLES,
    TriangleStrip = gl::TRIANGLE_STRIP,
    TriangleFan = gl::TRIANGLE_FAN,
}
// Safety: is repr(u32) enum.
unsafe impl GLEnum for DrawPrimitive {}

/// Draw `count` vertices of the bound vertex array, starting at vertex `first`.
#[doc(alias = "glDrawArrays")]
pub fn draw(primitive: DrawPrimitive, count: usize, first: usize) {
    if count == 0 {
        // Nothing to draw.
        return;
    }
    unsafe {
        gl::DrawArrays(
            primitive.as_gl(),
            crate::gl_size(first),
            crate::gl_size(count),
        );
    }
}

/// [`draw`], repeated `instances` times.
#[doc(alias = "glDrawArraysInstanced")]
pub fn draw_instanced(primitive: DrawPrimitive, count: usize, first: usize, instances: usize) {
    if count == 0 || instances == 0 {
        return;
    }
    unsafe {
        gl::DrawArraysInstanced(
            primitive.as_gl(),
            crate::gl_size(first),
            crate::gl_size(count),
            crate::gl_size(instances),
        );
    }
}

/// Draw the vertices named by `indices`.
///
/// The index buffer is bound for the duration of the call.
#[doc(alias = "glDrawElements")]
pub fn draw_indexed<T: IndexPrimitive>(primitive: DrawPrimitive, indices: IndexBufferView<T>) {
    if indices.is_empty() {
        return;
    }
    let _elements = indices.scoped_bind();
    unsafe {
        gl::DrawElements(
            primitive.as_gl(),
            crate::gl_size(indices.len()),
            <T as Primitive>::ENUMERATOR,
            // A byte offset into the bound element array, never dereferenced.
            indices.byte_offset() as _,
        );
    }
}

/// Draw `count` points of `size` pixels. The point size is reset to `1.0` afterwards.
#[doc(alias = "glPointSize")]
pub fn draw_points(count: usize, first: usize, size: f32) {
    unsafe { gl::PointSize(size) };
    draw(DrawPrimitive::Points, count, first);
    unsafe { gl::PointSize(1.0) };
}

bitflags::bitflags! {
    /// Which buffers of the bound framebuffer a clear affects.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[repr(transparent)]
    pub struct ClearBuffers: GLbitfield {
        const COLOR = gl::COLOR_BUFFER_BIT;
        const DEPTH = gl::DEPTH_BUFFER_BIT;
        const STENCIL = gl::STENCIL_BUFFER_BIT;
    }
}

/// Clear `buffers` to their current clear values.
#[doc(alias = "glClear")]
pub fn clear(buffers: ClearBuffers) {
    if buffers.is_empty() {
        return;
    }
    unsafe { gl::Clear(buffers.bits()) }
}

/// Clear the color buffer to `color`.
#[doc(alias = "glClearColor")]
pub fn clear_color(color: impl Into<Color>) {
    let Color { r, g, b, a } = color.into();
    unsafe { gl::ClearColor(r, g, b, a) };
    clear(ClearBuffers::COLOR);
}

/// Clear the depth buffer to `depth`, usually `1.0`.
#[doc(alias = "glClearDepth")]
pub fn clear_depth(depth: f32) {
    unsafe { gl::ClearDepthf(depth) };
    clear(ClearBuffers::DEPTH);
}

#[doc(alias = "glClearStencil")]
pub fn clear_stencil(stencil: i32) {
    unsafe { gl::ClearStencil(stencil) };
    clear(ClearBuffers::STENCIL);
}
