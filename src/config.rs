//! JSON descriptions of shader programs.
//!
//! ```json
//! {
//!   "glslVersion": { "versionNumber": 430, "profile": "core" },
//!   "shaders": [
//!     { "shaderType": "vertex_shader", "sources": ["shaders/quad.vert"] },
//!     { "shaderType": "fragment_shader", "sources": ["shaders/quad.frag"] }
//!   ],
//!   "definitions": [{ "name": "MAX_LIGHTS", "value": "8" }],
//!   "includeDirectories": ["shaders/include"]
//! }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    program::{
        GlslProfile, GlslVersion, GlslVersionNumber, MacroDefinition, Shader, ShaderProgram,
        ShaderType,
    },
};

/// One stage of a [`ShaderProgramConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderConfig {
    pub shader_type: ShaderType,
    pub sources: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShaderProgramConfig {
    pub glsl_version: GlslVersion,
    pub shaders: Vec<ShaderConfig>,
    pub definitions: Vec<MacroDefinition>,
    pub include_directories: Vec<PathBuf>,
}

// Wire shapes. Enumerations travel as their names and numbers, and are checked on the way in.

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawShader {
    shader_type: String,
    sources: Vec<PathBuf>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVersion {
    version_number: u16,
    profile: String,
}

#[derive(Serialize, Deserialize)]
struct RawDefinition {
    name: String,
    value: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProgram {
    glsl_version: RawVersion,
    shaders: Vec<RawShader>,
    definitions: Vec<RawDefinition>,
    include_directories: Vec<PathBuf>,
}

impl TryFrom<RawShader> for ShaderConfig {
    type Error = Error;
    fn try_from(raw: RawShader) -> Result<Self> {
        let shader_type = ShaderType::from_name(&raw.shader_type)
            .ok_or_else(|| Error::InvalidConfig(format!("bad shader type {:?}", raw.shader_type)))?;
        Ok(Self {
            shader_type,
            sources: raw.sources,
        })
    }
}

impl TryFrom<RawVersion> for GlslVersion {
    type Error = Error;
    fn try_from(raw: RawVersion) -> Result<Self> {
        let number = GlslVersionNumber::try_from(raw.version_number).map_err(|number| {
            Error::InvalidConfig(format!("bad GLSL version number {number}"))
        })?;
        let profile = GlslProfile::from_name(&raw.profile)
            .ok_or_else(|| Error::InvalidConfig(format!("bad GLSL profile {:?}", raw.profile)))?;
        Ok(Self { number, profile })
    }
}

impl TryFrom<RawProgram> for ShaderProgramConfig {
    type Error = Error;
    fn try_from(raw: RawProgram) -> Result<Self> {
        Ok(Self {
            glsl_version: raw.glsl_version.try_into()?,
            shaders: raw
                .shaders
                .into_iter()
                .map(ShaderConfig::try_from)
                .collect::<Result<_>>()?,
            definitions: raw
                .definitions
                .into_iter()
                .map(|RawDefinition { name, value }| MacroDefinition { name, value })
                .collect(),
            include_directories: raw.include_directories,
        })
    }
}

impl From<&ShaderProgramConfig> for RawProgram {
    fn from(config: &ShaderProgramConfig) -> Self {
        Self {
            glsl_version: RawVersion {
                version_number: config.glsl_version.number.get(),
                profile: config.glsl_version.profile.name().to_owned(),
            },
            shaders: config
                .shaders
                .iter()
                .map(|shader| RawShader {
                    shader_type: shader.shader_type.name().to_owned(),
                    sources: shader.sources.clone(),
                })
                .collect(),
            definitions: config
                .definitions
                .iter()
                .map(|def| RawDefinition {
                    name: def.name.clone(),
                    value: def.value.clone(),
                })
                .collect(),
            include_directories: config.include_directories.clone(),
        }
    }
}

/// Parse a shader program description.
///
/// # Errors
/// [`Error::Config`] for malformed JSON or missing keys, [`Error::InvalidConfig`] for unknown
/// shader types, version numbers or profiles.
pub fn from_json(json: &str) -> Result<ShaderProgramConfig> {
    let raw: RawProgram = serde_json::from_str(json)?;
    raw.try_into()
}

/// # Errors
/// Only if serialization itself fails, which plain paths and strings do not.
pub fn to_json(config: &ShaderProgramConfig) -> Result<String> {
    Ok(serde_json::to_string_pretty(&RawProgram::from(config))?)
}

/// Load and compile one stage with the program-wide settings.
///
/// # Errors
/// As [`Shader::load`].
pub fn make_shader(
    config: &ShaderConfig,
    version: GlslVersion,
    definitions: &[MacroDefinition],
    include_directories: &[PathBuf],
) -> Result<Shader> {
    Shader::load(
        config.shader_type,
        version,
        config.sources.as_slice(),
        include_directories,
        definitions,
    )
}

/// Load, compile and link every stage of `config`.
///
/// # Errors
/// The first error from [`make_shader`], or [`ShaderProgram::new`].
pub fn make_shader_program(config: &ShaderProgramConfig) -> Result<ShaderProgram> {
    let shaders = config
        .shaders
        .iter()
        .map(|shader| {
            make_shader(
                shader,
                config.glsl_version,
                &config.definitions,
                &config.include_directories,
            )
        })
        .collect::<Result<Vec<_>>>()?;
    let shaders: Vec<&Shader> = shaders.iter().collect();
    ShaderProgram::new(&shaders)
}
