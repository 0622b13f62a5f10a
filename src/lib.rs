//! # glbind
//!
//! Owned handles and scoped bindings for OpenGL 4.3 core.
//!
//! OpenGL is a pile of global state: every `glBind*` silently replaces whatever some other
//! piece of code had bound, and every `glGen*` hands out a bare integer that nobody is
//! obligated to give back. This crate puts two small pieces of machinery in front of that:
//!
//! * [`id`] - [`UniqueId`] and [`UniqueIdArray`] own GL object names and release them exactly
//!   once, no matter how often they are moved.
//! * [`slot`] - [`ScopedBind`] makes an object current for the length of a scope, and puts
//!   back whatever was current before it when the scope ends, even if guards are dropped out
//!   of order. [`UniqueBind`] is the cheaper variant that simply unbinds.
//!
//! The remaining modules are thin, typed wrappers over the GL objects most programs need -
//! buffers, vertex arrays, textures, framebuffers, shaders and programs - built on those two.
//!
//! ## Doc Aliases
//! GL function names are searchable with `#[doc(alias = ...)]`. The full name must be typed
//! **exactly**, case-sensitive, including the `gl` prefix. For example, `glUseProgram` will
//! find [`slot::program::Program`].

#![warn(rustdoc::all)]

use gl::types::{GLenum, GLsizei, GLuint};

pub mod gl {
    #![doc(hidden)]
    #![allow(clippy::all)]
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}

pub mod buffer;
#[cfg(feature = "config")]
pub mod config;
pub mod draw;
pub mod error;
pub mod framebuffer;
pub mod id;
pub mod program;
pub mod slot;
pub mod state;
pub mod texture;
pub mod vertex_array;

pub use error::{Error, Result};
pub use id::{Id, UniqueId, UniqueIdArray, NULL_ID};
pub use slot::{Bindable, ScopedBind, Slot, UniqueBind};

/// Load the GL entry points through `loader`, typically the windowing library's
/// `get_proc_address`.
///
/// Fails with [`Error::Init`] if any of the core entry points this crate relies on could not
/// be resolved.
///
/// # Safety
/// * There must be a current GL context on the calling thread, of version 4.3 core or later.
/// * That context must be current on the accessing thread at the time of any interaction with
///   any object created through this crate.
/// * Objects created under one context must not be used, nor dropped, under another.
#[doc(alias = "gladLoadGL")]
pub unsafe fn load_with(loader: impl FnMut(&'static str) -> *const std::ffi::c_void) -> Result<()> {
    gl::load_with(loader);

    let required = [
        ("glCreateShader", gl::CreateShader::is_loaded()),
        ("glCreateProgram", gl::CreateProgram::is_loaded()),
        ("glGenBuffers", gl::GenBuffers::is_loaded()),
        ("glGenVertexArrays", gl::GenVertexArrays::is_loaded()),
        ("glGenTextures", gl::GenTextures::is_loaded()),
        ("glGenFramebuffers", gl::GenFramebuffers::is_loaded()),
        ("glFramebufferTexture", gl::FramebufferTexture::is_loaded()),
        ("glBlendEquationSeparate", gl::BlendEquationSeparate::is_loaded()),
    ];
    let missing: Vec<&str> = required
        .into_iter()
        .filter(|(_, loaded)| !loaded)
        .map(|(name, _)| name)
        .collect();

    if !missing.is_empty() {
        return Err(Error::Init(format!(
            "missing entry points: {}",
            missing.join(", ")
        )));
    }
    log::debug!("loaded OpenGL entry points");
    Ok(())
}

mod sealed {
    pub trait Sealed {}
}

/// Trait for rusty `GLenum`s.
///
/// # Safety
/// * Must be implemented only on enums.
/// * The enum must be `#[repr(u32)]`
/// * Every variant must be a correct constant of `GLenum`.
pub unsafe trait GLEnum {
    /// Access the raw `GLenum` value of this enum.
    fn as_gl(&self) -> GLenum {
        unsafe { *std::ptr::from_ref(self).cast() }
    }
}

/// Narrow a host length to the GL's signed size type.
///
/// # Panics
/// If `len` does not fit. Every GL object this crate can create is far below that bound,
/// so this is a caller bug rather than a runtime condition.
pub(crate) fn gl_size(len: usize) -> GLsizei {
    len.try_into().expect("length exceeds GLsizei::MAX")
}

/// Batch-allocate `N` names with `gl_gen`, owned by `deleter`.
///
/// # Safety
/// * A context must be current on the calling thread.
/// * `gl_gen` must be the appropriate GL generator for objects released by `deleter`.
unsafe fn gl_gen_with<const N: usize, D: id::ArrayDeleter>(
    gl_gen: unsafe fn(GLsizei, *mut GLuint),
    deleter: D,
) -> UniqueIdArray<N, D> {
    UniqueIdArray::create(
        |names| unsafe { gl_gen(gl_size(N), names.as_mut_ptr()) },
        deleter,
    )
}

/// Declare a zero-sized [`id::ArrayDeleter`] around a `glDelete*s` entry point.
macro_rules! gl_array_deleter {
    ($(#[$meta:meta])* pub struct $name:ident = $delete:ident) => {
        $(#[$meta])*
        #[doc = concat!("Releases names with `gl", stringify!($delete), "`.")]
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $name;
        impl $crate::id::ArrayDeleter for $name {
            fn delete(&mut self, ids: &[$crate::id::Id]) {
                // Zero names are silently ignored by the GL.
                unsafe { $crate::gl::$delete($crate::gl_size(ids.len()), ids.as_ptr()) }
            }
        }
    };
}
pub(crate) use gl_array_deleter;

type NotSend = std::marker::PhantomData<*const ()>;
