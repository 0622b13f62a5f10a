//! Buffer binding points.

use crate::{gl, id::Id, GLenum, NULL_ID};

use super::Slot;

/// Marker trait for the buffer targets.
pub trait Target: crate::sealed::Sealed + Slot<Binding = Id> {
    const TARGET: GLenum;
}

macro_rules! target {
    (pub struct $marker:ident = $value:ident) => {
        #[doc = concat!("The `GL_", stringify!($value), "` binding point.")]
        #[doc(alias = "glBindBuffer")]
        #[derive(Debug)]
        pub struct $marker;
        impl crate::sealed::Sealed for $marker {}
        impl Target for $marker {
            const TARGET: GLenum = gl::$value;
        }
        impl Slot for $marker {
            type Binding = Id;
            fn bind(buffer: &Id) {
                unsafe { gl::BindBuffer(gl::$value, *buffer) }
            }
            fn unbind() {
                unsafe { gl::BindBuffer(gl::$value, NULL_ID) }
            }
        }
    };
}

target!(pub struct Array = ARRAY_BUFFER);
// Part of the bound vertex array's state, not global state.
target!(pub struct ElementArray = ELEMENT_ARRAY_BUFFER);
