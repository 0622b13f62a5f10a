//! Error types.
//!
//! Handles and bindings never fail on their own; errors only surface where the GL reports
//! that it could not do what a wrapper asked of it, synchronously, to the caller that asked.

use thiserror::Error;

pub use crate::program::preprocess::PreprocessError;

/// Everything that can go wrong when creating GL objects through this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The GL entry points could not be loaded.
    #[error("failed to load OpenGL: {0}")]
    Init(String),

    /// The GL returned the null name when asked for a new object.
    #[error("could not create {0} object")]
    AllocationFailed(&'static str),

    /// A shader failed to compile. Holds the shader info log.
    #[error("shader compilation failed: {0}")]
    CompilationFailed(String),

    /// A program failed to link. Holds the program info log.
    #[error("program linking failed: {0}")]
    LinkFailed(String),

    /// Shader sources could not be assembled.
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    /// A configuration document was not valid JSON, or did not match the schema.
    #[cfg(feature = "config")]
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A configuration document named a value this crate does not know.
    #[cfg(feature = "config")]
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
