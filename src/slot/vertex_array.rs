use crate::{gl, id::Id, NULL_ID};

use super::Slot;

/// The vertex array used for draw calls.
///
/// Object 0 is treated as "no vertex array", never as the compatibility-profile default VAO.
#[doc(alias = "glBindVertexArray")]
#[derive(Debug)]
pub struct VertexArray;
impl Slot for VertexArray {
    type Binding = Id;
    fn bind(array: &Id) {
        unsafe { gl::BindVertexArray(*array) }
    }
    fn unbind() {
        unsafe { gl::BindVertexArray(NULL_ID) }
    }
}
