//! Blending and depth testing, as bindable values.
//!
//! ```no_run
//! use glbind::{state::{BlendEquation, BlendMode}, Bindable};
//! let blend = BlendMode::new(BlendEquation::ALPHA);
//! let _blending = blend.scoped_bind();
//! // draw translucent things...
//! ```

use crate::{gl, slot, Bindable, GLEnum, GLenum};

/// An RGBA color, linear floats.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}
impl Color {
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}
impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Color { r, g, b, a }
    }
}
#[cfg(feature = "mint")]
impl From<mint::Vector4<f32>> for Color {
    fn from(v: mint::Vector4<f32>) -> Self {
        Color::new(v.x, v.y, v.z, v.w)
    }
}

/// Comparison used by depth testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum CompareFunc {
    LessEqual = gl::LEQUAL,
    GreaterEqual = gl::GEQUAL,
    #[default]
    Less = gl::LESS,
    Greater = gl::GREATER,
    Equal = gl::EQUAL,
    NotEqual = gl::NOTEQUAL,
    Always = gl::ALWAYS,
    Never = gl::NEVER,
}
// Safety: is repr(u32) enum.
unsafe impl GLEnum for CompareFunc {}

/// Blend equations which ignore the blend factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SimpleBlendEquation {
    /// `min(src, dst)`
    Min = gl::MIN,
    /// `max(src, dst)`
    Max = gl::MAX,
}
// Safety: is repr(u32) enum.
unsafe impl GLEnum for SimpleBlendEquation {}

/// Blend equations which scale source and destination by a factor first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum BlendOperation {
    /// `(src * factor) + (dst * factor)`
    #[default]
    Add = gl::FUNC_ADD,
    /// `(src * factor) - (dst * factor)`
    Subtract = gl::FUNC_SUBTRACT,
    /// `(dst * factor) - (src * factor)`
    ReverseSubtract = gl::FUNC_REVERSE_SUBTRACT,
}
// Safety: is repr(u32) enum.
unsafe impl GLEnum for BlendOperation {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum BlendFactor {
    Zero = gl::ZERO,
    One = gl::ONE,

    SrcColor = gl::SRC_COLOR,
    OneMinusSrcColor = gl::ONE_MINUS_SRC_COLOR,
    SrcAlpha = gl::SRC_ALPHA,
    OneMinusSrcAlpha = gl::ONE_MINUS_SRC_ALPHA,

    DstColor = gl::DST_COLOR,
    OneMinusDstColor = gl::ONE_MINUS_DST_COLOR,
    DstAlpha = gl::DST_ALPHA,
    OneMinusDstAlpha = gl::ONE_MINUS_DST_ALPHA,

    ConstantColor = gl::CONSTANT_COLOR,
    OneMinusConstantColor = gl::ONE_MINUS_CONSTANT_COLOR,
    ConstantAlpha = gl::CONSTANT_ALPHA,
    OneMinusConstantAlpha = gl::ONE_MINUS_CONSTANT_ALPHA,

    SrcAlphaSaturate = gl::SRC_ALPHA_SATURATE,

    /// Dual-source blending, the fragment output at index 1.
    Src1Color = gl::SRC1_COLOR,
    OneMinusSrc1Color = gl::ONE_MINUS_SRC1_COLOR,
    Src1Alpha = gl::SRC1_ALPHA,
    OneMinusSrc1Alpha = gl::ONE_MINUS_SRC1_ALPHA,
}
// Safety: is repr(u32) enum.
unsafe impl GLEnum for BlendFactor {}

/// How a fragment's color combines with the color already in the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendEquation {
    Simple(SimpleBlendEquation),
    Parameterized {
        op: BlendOperation,
        src: BlendFactor,
        dst: BlendFactor,
    },
}
impl BlendEquation {
    /// Overwrite. This is the GL's initial equation.
    pub const REPLACE: Self = Self::Parameterized {
        op: BlendOperation::Add,
        src: BlendFactor::One,
        dst: BlendFactor::Zero,
    };
    /// Classic "over" compositing with non-premultiplied alpha.
    pub const ALPHA: Self = Self::Parameterized {
        op: BlendOperation::Add,
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::OneMinusSrcAlpha,
    };
    /// Sum source and destination.
    pub const ADDITIVE: Self = Self::Parameterized {
        op: BlendOperation::Add,
        src: BlendFactor::One,
        dst: BlendFactor::One,
    };

    /// `[equation, source factor, destination factor]`. Simple equations report the initial
    /// factors, which they ignore anyway.
    #[must_use]
    pub fn enumerators(&self) -> [GLenum; 3] {
        match self {
            Self::Simple(equation) => [equation.as_gl(), gl::ONE, gl::ZERO],
            Self::Parameterized { op, src, dst } => [op.as_gl(), src.as_gl(), dst.as_gl()],
        }
    }
}
impl Default for BlendEquation {
    fn default() -> Self {
        Self::REPLACE
    }
}
impl From<SimpleBlendEquation> for BlendEquation {
    fn from(value: SimpleBlendEquation) -> Self {
        Self::Simple(value)
    }
}

/// Blending configuration. Binding enables blending, unbinding disables it and resets the
/// equations, factors and constant color to their initial values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlendMode {
    pub color: BlendEquation,
    pub alpha: BlendEquation,
    /// Left as-is if `None`.
    pub constant_color: Option<Color>,
}
impl BlendMode {
    /// The same equation for color and alpha.
    #[must_use]
    pub fn new(equation: impl Into<BlendEquation>) -> Self {
        let equation = equation.into();
        Self::separate(equation, equation)
    }
    #[must_use]
    pub fn separate(color: impl Into<BlendEquation>, alpha: impl Into<BlendEquation>) -> Self {
        Self {
            color: color.into(),
            alpha: alpha.into(),
            constant_color: None,
        }
    }
    #[must_use]
    pub fn with_constant_color(self, color: impl Into<Color>) -> Self {
        Self {
            constant_color: Some(color.into()),
            ..self
        }
    }
}
impl Bindable for BlendMode {
    type Slot = slot::state::Blend;
    fn binding(&self) -> BlendMode {
        *self
    }
}

/// Whether fragments passing the depth test write their depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthAccess {
    Read,
    #[default]
    ReadWrite,
}

/// Depth testing configuration. Binding enables the depth test, unbinding disables it and
/// resets the function to [`CompareFunc::Less`] with writes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DepthMode {
    pub func: CompareFunc,
    pub access: DepthAccess,
}
impl DepthMode {
    #[must_use]
    pub fn new(func: CompareFunc, access: DepthAccess) -> Self {
        Self { func, access }
    }
}
impl Bindable for DepthMode {
    type Slot = slot::state::Depth;
    fn binding(&self) -> DepthMode {
        *self
    }
}
