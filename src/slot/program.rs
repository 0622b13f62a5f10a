//! The used program.

use crate::{gl, id::Id, NULL_ID};

use super::Slot;

/// The program used for draw calls and uniform uploads.
#[doc(alias = "glUseProgram")]
#[derive(Debug)]
pub struct Program;
impl Slot for Program {
    type Binding = Id;
    fn bind(program: &Id) {
        unsafe { gl::UseProgram(*program) }
    }
    fn unbind() {
        unsafe { gl::UseProgram(NULL_ID) }
    }
}
