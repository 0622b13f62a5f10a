//! Shaders and shader programs.

use std::{
    ffi::CString,
    fmt,
    path::{Path, PathBuf},
};

use crate::{
    error::{Error, Result},
    gl::{
        self,
        types::{GLchar, GLenum, GLint, GLsizei},
    },
    id::{DeleteProgram, DeleteShader},
    slot, Bindable, GLEnum, Id, UniqueId,
};

pub mod preprocess;
pub mod uniform;

use preprocess::{ShaderFilesystem, StdFilesystem};
use uniform::{AttributeLocation, FragOutputLocation, UniformLocation};

/// The pipeline stage a shader runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ShaderType {
    Compute = gl::COMPUTE_SHADER,
    Vertex = gl::VERTEX_SHADER,
    TessControl = gl::TESS_CONTROL_SHADER,
    TessEvaluation = gl::TESS_EVALUATION_SHADER,
    Geometry = gl::GEOMETRY_SHADER,
    Fragment = gl::FRAGMENT_SHADER,
}
// Safety: is repr(u32) enum.
unsafe impl GLEnum for ShaderType {}

impl ShaderType {
    pub const ALL: [Self; 6] = [
        Self::Compute,
        Self::Vertex,
        Self::TessControl,
        Self::TessEvaluation,
        Self::Geometry,
        Self::Fragment,
    ];
    /// The lowercase name of the GL constant, e.g. `vertex_shader`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Compute => "compute_shader",
            Self::Vertex => "vertex_shader",
            Self::TessControl => "tess_control_shader",
            Self::TessEvaluation => "tess_evaluation_shader",
            Self::Geometry => "geometry_shader",
            Self::Fragment => "fragment_shader",
        }
    }
    /// Inverse of [`Self::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }
}

/// GLSL versions accepted in a `#version` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum GlslVersionNumber {
    V110 = 110,
    V120 = 120,
    V130 = 130,
    V140 = 140,
    V150 = 150,
    V330 = 330,
    V400 = 400,
    V410 = 410,
    V420 = 420,
    V430 = 430,
}
impl GlslVersionNumber {
    const ALL: [Self; 10] = [
        Self::V110,
        Self::V120,
        Self::V130,
        Self::V140,
        Self::V150,
        Self::V330,
        Self::V400,
        Self::V410,
        Self::V420,
        Self::V430,
    ];
    #[must_use]
    pub fn get(self) -> u16 {
        self as u16
    }
}
impl TryFrom<u16> for GlslVersionNumber {
    type Error = u16;
    fn try_from(value: u16) -> std::result::Result<Self, u16> {
        Self::ALL
            .into_iter()
            .find(|number| number.get() == value)
            .ok_or(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlslProfile {
    #[default]
    Core,
    Compatibility,
}
impl GlslProfile {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Compatibility => "compatibility",
        }
    }
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::Core, Self::Compatibility]
            .into_iter()
            .find(|profile| profile.name() == name)
    }
}

/// The `#version` line shaders are compiled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlslVersion {
    pub number: GlslVersionNumber,
    pub profile: GlslProfile,
}
impl Default for GlslVersion {
    /// `430 core`, matching the context this crate requires.
    fn default() -> Self {
        Self {
            number: GlslVersionNumber::V430,
            profile: GlslProfile::Core,
        }
    }
}
impl fmt::Display for GlslVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number.get(), self.profile.name())
    }
}

/// A `#define name value` injected ahead of every source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacroDefinition {
    pub name: String,
    pub value: String,
}
impl MacroDefinition {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Fetch an info log with a `glGet*iv`/`glGet*InfoLog` pair.
///
/// # Safety
/// `name` must be a live object of the kind both functions expect.
unsafe fn info_log(
    name: Id,
    get_iv: unsafe fn(Id, GLenum, *mut GLint),
    get_log: unsafe fn(Id, GLsizei, *mut GLsizei, *mut GLchar),
) -> String {
    let mut len = 0;
    unsafe { get_iv(name, gl::INFO_LOG_LENGTH, &mut len) };
    let Ok(capacity) = usize::try_from(len) else {
        return String::new();
    };
    if capacity == 0 {
        return String::new();
    }
    let mut bytes = vec![0u8; capacity];
    let mut written = 0;
    unsafe { get_log(name, len, &mut written, bytes.as_mut_ptr().cast()) };
    bytes.truncate(usize::try_from(written).unwrap_or(0));
    String::from_utf8_lossy(&bytes).into_owned()
}

/// A compiled shader stage.
#[derive(Debug)]
pub struct Shader {
    id: UniqueId<DeleteShader>,
    ty: ShaderType,
}

impl Shader {
    /// Compile the concatenation of `fragments`.
    ///
    /// # Errors
    /// [`Error::AllocationFailed`] if the GL refused a shader object, and
    /// [`Error::CompilationFailed`] with the compiler's log if the source does not compile.
    #[doc(alias = "glCreateShader")]
    #[doc(alias = "glShaderSource")]
    #[doc(alias = "glCompileShader")]
    pub fn from_sources(ty: ShaderType, fragments: &[impl AsRef<str>]) -> Result<Self> {
        let id = UniqueId::new(unsafe { gl::CreateShader(ty.as_gl()) }, DeleteShader);
        if id.is_null() {
            return Err(Error::AllocationFailed("shader"));
        }

        let pointers: Vec<*const GLchar> = fragments
            .iter()
            .map(|fragment| fragment.as_ref().as_ptr().cast())
            .collect();
        let lengths: Vec<GLint> = fragments
            .iter()
            .map(|fragment| crate::gl_size(fragment.as_ref().len()))
            .collect();

        let mut status = GLint::from(gl::FALSE);
        unsafe {
            gl::ShaderSource(
                id.get(),
                crate::gl_size(fragments.len()),
                pointers.as_ptr(),
                lengths.as_ptr(),
            );
            gl::CompileShader(id.get());
            gl::GetShaderiv(id.get(), gl::COMPILE_STATUS, &mut status);
        }

        if status == GLint::from(gl::FALSE) {
            let log = unsafe { info_log(id.get(), gl::GetShaderiv, gl::GetShaderInfoLog) };
            log::warn!("{} failed to compile: {log}", ty.name());
            return Err(Error::CompilationFailed(log));
        }
        log::debug!("compiled {} {}", ty.name(), id.get());
        Ok(Self { id, ty })
    }

    /// Preprocess `sources` from disk, then compile. See [`preprocess`].
    ///
    /// # Errors
    /// [`Error::Preprocess`] if the sources or their includes cannot be resolved, otherwise as
    /// [`Self::from_sources`].
    pub fn load(
        ty: ShaderType,
        version: GlslVersion,
        sources: &[impl AsRef<Path>],
        include_dirs: &[PathBuf],
        definitions: &[MacroDefinition],
    ) -> Result<Self> {
        Self::load_with(ty, version, sources, include_dirs, definitions, &StdFilesystem)
    }

    /// [`Self::load`], reading through `fs`.
    ///
    /// # Errors
    /// As [`Self::load`].
    pub fn load_with(
        ty: ShaderType,
        version: GlslVersion,
        sources: &[impl AsRef<Path>],
        include_dirs: &[PathBuf],
        definitions: &[MacroDefinition],
        fs: &dyn ShaderFilesystem,
    ) -> Result<Self> {
        let fragments =
            preprocess::resolve_source_fragments(version, sources, include_dirs, definitions, fs)?;
        Self::from_sources(ty, fragments.as_slice())
    }

    #[must_use]
    pub fn id(&self) -> Id {
        self.id.get()
    }
    #[must_use]
    pub fn shader_type(&self) -> ShaderType {
        self.ty
    }
}

/// A linked program.
#[derive(Debug)]
pub struct ShaderProgram {
    id: UniqueId<DeleteProgram>,
}

impl ShaderProgram {
    /// Link `shaders` into a program. The shaders are detached again afterwards and may be
    /// dropped or reused.
    ///
    /// # Errors
    /// [`Error::AllocationFailed`] if the GL refused a program object, and
    /// [`Error::LinkFailed`] with the linker's log if the stages do not link.
    #[doc(alias = "glCreateProgram")]
    #[doc(alias = "glLinkProgram")]
    pub fn new(shaders: &[&Shader]) -> Result<Self> {
        let id = UniqueId::new(unsafe { gl::CreateProgram() }, DeleteProgram);
        if id.is_null() {
            return Err(Error::AllocationFailed("program"));
        }

        let mut status = GLint::from(gl::FALSE);
        unsafe {
            for shader in shaders {
                gl::AttachShader(id.get(), shader.id());
            }
            gl::LinkProgram(id.get());
            for shader in shaders {
                gl::DetachShader(id.get(), shader.id());
            }
            gl::GetProgramiv(id.get(), gl::LINK_STATUS, &mut status);
        }

        if status == GLint::from(gl::FALSE) {
            let log = unsafe { info_log(id.get(), gl::GetProgramiv, gl::GetProgramInfoLog) };
            log::warn!("program failed to link: {log}");
            return Err(Error::LinkFailed(log));
        }
        log::debug!("linked program {} from {} shaders", id.get(), shaders.len());
        Ok(Self { id })
    }

    /// `None` if there is no active uniform called `name`.
    #[doc(alias = "glGetUniformLocation")]
    #[must_use]
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        let name = CString::new(name).ok()?;
        UniformLocation::new(unsafe { gl::GetUniformLocation(self.id(), name.as_ptr()) })
    }
    /// `None` if there is no active vertex input called `name`.
    #[doc(alias = "glGetAttribLocation")]
    #[must_use]
    pub fn attribute_location(&self, name: &str) -> Option<AttributeLocation> {
        let name = CString::new(name).ok()?;
        let location = unsafe { gl::GetAttribLocation(self.id(), name.as_ptr()) };
        u32::try_from(location).ok().map(AttributeLocation::new)
    }
    /// `None` if there is no fragment output called `name`.
    #[doc(alias = "glGetFragDataLocation")]
    #[must_use]
    pub fn frag_output_location(&self, name: &str) -> Option<FragOutputLocation> {
        let name = CString::new(name).ok()?;
        let location = unsafe { gl::GetFragDataLocation(self.id(), name.as_ptr()) };
        u32::try_from(location).ok().map(FragOutputLocation::new)
    }
    #[must_use]
    pub fn id(&self) -> Id {
        self.id.get()
    }
}

impl Bindable for ShaderProgram {
    type Slot = slot::program::Program;
    fn binding(&self) -> Id {
        self.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_type_names_round_trip() {
        for ty in ShaderType::ALL {
            assert_eq!(ShaderType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(ShaderType::from_name("vertex"), None);
        assert_eq!(ShaderType::Fragment.as_gl(), gl::FRAGMENT_SHADER);
    }

    #[test]
    fn version_numbers() {
        assert_eq!(GlslVersionNumber::try_from(330), Ok(GlslVersionNumber::V330));
        assert_eq!(GlslVersionNumber::try_from(300), Err(300));
        assert!(GlslVersionNumber::V150 < GlslVersionNumber::V330);
    }

    #[test]
    fn default_version_directive() {
        assert_eq!(GlslVersion::default().to_string(), "430 core");
        let compat = GlslVersion {
            number: GlslVersionNumber::V120,
            profile: GlslProfile::from_name("compatibility").unwrap(),
        };
        assert_eq!(compat.to_string(), "120 compatibility");
    }
}
