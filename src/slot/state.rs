//! Fixed-function state treated as binding points.
//!
//! These have no object names; the "binding" is the whole set of parameters, and unbinding
//! returns the state to the GL's initial values.

use crate::{
    gl,
    state::{BlendMode, CompareFunc, DepthAccess, DepthMode},
    GLEnum,
};

use super::Slot;

/// Blending, its equations, factors, and constant color.
#[doc(alias = "GL_BLEND")]
#[derive(Debug)]
pub struct Blend;
impl Slot for Blend {
    type Binding = BlendMode;
    #[doc(alias = "glBlendEquationSeparate")]
    #[doc(alias = "glBlendFuncSeparate")]
    fn bind(mode: &BlendMode) {
        let [color_equation, color_src, color_dst] = mode.color.enumerators();
        let [alpha_equation, alpha_src, alpha_dst] = mode.alpha.enumerators();
        unsafe {
            gl::Enable(gl::BLEND);
            gl::BlendEquationSeparate(color_equation, alpha_equation);
            gl::BlendFuncSeparate(color_src, color_dst, alpha_src, alpha_dst);
            if let Some(color) = mode.constant_color {
                gl::BlendColor(color.r, color.g, color.b, color.a);
            }
        }
    }
    fn unbind() {
        unsafe {
            gl::BlendEquationSeparate(gl::FUNC_ADD, gl::FUNC_ADD);
            gl::BlendFuncSeparate(gl::ONE, gl::ZERO, gl::ONE, gl::ZERO);
            gl::BlendColor(0.0, 0.0, 0.0, 0.0);
            gl::Disable(gl::BLEND);
        }
    }
}

/// Depth testing, its compare function, and depth writes.
#[doc(alias = "GL_DEPTH_TEST")]
#[derive(Debug)]
pub struct Depth;
impl Slot for Depth {
    type Binding = DepthMode;
    #[doc(alias = "glDepthFunc")]
    #[doc(alias = "glDepthMask")]
    fn bind(mode: &DepthMode) {
        unsafe {
            gl::Enable(gl::DEPTH_TEST);
            gl::DepthFunc(mode.func.as_gl());
            gl::DepthMask((mode.access == DepthAccess::ReadWrite).into());
        }
    }
    fn unbind() {
        unsafe {
            gl::DepthMask(gl::TRUE);
            gl::DepthFunc(CompareFunc::Less.as_gl());
            gl::Disable(gl::DEPTH_TEST);
        }
    }
}
