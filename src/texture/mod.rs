//! Owned 2D textures and their properties.

use crate::{
    gl::{self, types::GLint},
    id::DeleteTextures,
    slot, Bindable, GLEnum, GLenum, Id, UniqueIdArray,
};

/// Layout of pixel data, and the unsized internal formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PixelFormat {
    Red = gl::RED,
    RedInteger = gl::RED_INTEGER,
    RG = gl::RG,
    RGInteger = gl::RG_INTEGER,
    RGB = gl::RGB,
    RGBInteger = gl::RGB_INTEGER,
    BGR = gl::BGR,
    RGBA = gl::RGBA,
    RGBAInteger = gl::RGBA_INTEGER,
    BGRA = gl::BGRA,

    DepthComponent = gl::DEPTH_COMPONENT,
    DepthStencil = gl::DEPTH_STENCIL,
}
// Safety: is repr(u32) enum.
unsafe impl GLEnum for PixelFormat {}
impl PixelFormat {
    /// Number of components per pixel.
    #[must_use]
    pub fn components(&self) -> usize {
        match self {
            Self::Red | Self::RedInteger | Self::DepthComponent => 1,
            Self::RG | Self::RGInteger | Self::DepthStencil => 2,
            Self::RGB | Self::RGBInteger | Self::BGR => 3,
            Self::RGBA | Self::RGBAInteger | Self::BGRA => 4,
        }
    }
}

/// Internal formats with an exact bit layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SizedFormat {
    R8 = gl::R8,
    R8Snorm = gl::R8_SNORM,
    R16f = gl::R16F,
    R32f = gl::R32F,
    R8ui = gl::R8UI,
    R8i = gl::R8I,
    R16ui = gl::R16UI,
    R16i = gl::R16I,
    R32ui = gl::R32UI,
    R32i = gl::R32I,
    Rg8 = gl::RG8,
    Rg8Snorm = gl::RG8_SNORM,
    Rg16f = gl::RG16F,
    Rg32f = gl::RG32F,
    Rg8ui = gl::RG8UI,
    Rg8i = gl::RG8I,
    Rg16ui = gl::RG16UI,
    Rg16i = gl::RG16I,
    Rg32ui = gl::RG32UI,
    Rg32i = gl::RG32I,
    Rgb8 = gl::RGB8,
    Srgb8 = gl::SRGB8,
    Rgb565 = gl::RGB565,
    Rgb8Snorm = gl::RGB8_SNORM,
    R11fG11fB10f = gl::R11F_G11F_B10F,
    Rgb9E5 = gl::RGB9_E5,
    Rgb16f = gl::RGB16F,
    Rgb32f = gl::RGB32F,
    Rgb8ui = gl::RGB8UI,
    Rgb8i = gl::RGB8I,
    Rgb16ui = gl::RGB16UI,
    Rgb16i = gl::RGB16I,
    Rgb32ui = gl::RGB32UI,
    Rgb32i = gl::RGB32I,
    Rgba8 = gl::RGBA8,
    Srgb8Alpha8 = gl::SRGB8_ALPHA8,
    Rgba8Snorm = gl::RGBA8_SNORM,
    Rgb5A1 = gl::RGB5_A1,
    Rgba4 = gl::RGBA4,
    Rgb10A2 = gl::RGB10_A2,
    Rgba16f = gl::RGBA16F,
    Rgba32f = gl::RGBA32F,
    Rgba8ui = gl::RGBA8UI,
    Rgba8i = gl::RGBA8I,
    Rgb10A2ui = gl::RGB10_A2UI,
    Rgba16ui = gl::RGBA16UI,
    Rgba16i = gl::RGBA16I,
    Rgba32i = gl::RGBA32I,
    Rgba32ui = gl::RGBA32UI,

    DepthComponent16 = gl::DEPTH_COMPONENT16,
    DepthComponent24 = gl::DEPTH_COMPONENT24,
    DepthComponent32f = gl::DEPTH_COMPONENT32F,
    Depth24Stencil8 = gl::DEPTH24_STENCIL8,
    Depth32fStencil8 = gl::DEPTH32F_STENCIL8,
}
// Safety: is repr(u32) enum.
unsafe impl GLEnum for SizedFormat {}
impl SizedFormat {
    /// The pixel layout to upload data in for this format.
    #[must_use]
    pub fn pixel_format(&self) -> PixelFormat {
        match self {
            Self::R8 | Self::R8Snorm | Self::R16f | Self::R32f => PixelFormat::Red,
            Self::R8ui | Self::R8i | Self::R16ui | Self::R16i | Self::R32ui | Self::R32i => {
                PixelFormat::RedInteger
            }

            Self::Rg8 | Self::Rg8Snorm | Self::Rg16f | Self::Rg32f => PixelFormat::RG,
            Self::Rg8ui | Self::Rg8i | Self::Rg16ui | Self::Rg16i | Self::Rg32ui | Self::Rg32i => {
                PixelFormat::RGInteger
            }

            Self::Rgb8
            | Self::Srgb8
            | Self::Rgb565
            | Self::Rgb8Snorm
            | Self::R11fG11fB10f
            | Self::Rgb9E5
            | Self::Rgb16f
            | Self::Rgb32f => PixelFormat::RGB,
            Self::Rgb8ui
            | Self::Rgb8i
            | Self::Rgb16ui
            | Self::Rgb16i
            | Self::Rgb32ui
            | Self::Rgb32i => PixelFormat::RGBInteger,

            Self::Rgba8
            | Self::Srgb8Alpha8
            | Self::Rgba8Snorm
            | Self::Rgb5A1
            | Self::Rgba4
            | Self::Rgb10A2
            | Self::Rgba16f
            | Self::Rgba32f => PixelFormat::RGBA,
            Self::Rgba8ui
            | Self::Rgba8i
            | Self::Rgb10A2ui
            | Self::Rgba16ui
            | Self::Rgba16i
            | Self::Rgba32i
            | Self::Rgba32ui => PixelFormat::RGBAInteger,

            Self::DepthComponent16 | Self::DepthComponent24 | Self::DepthComponent32f => {
                PixelFormat::DepthComponent
            }
            Self::Depth24Stencil8 | Self::Depth32fStencil8 => PixelFormat::DepthStencil,
        }
    }
}

/// How the GL stores a texture's pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalFormat {
    /// The GL picks the size.
    Base(PixelFormat),
    Sized(SizedFormat),
}
impl InternalFormat {
    #[must_use]
    pub fn enumerator(&self) -> GLenum {
        match self {
            Self::Base(format) => format.as_gl(),
            Self::Sized(format) => format.as_gl(),
        }
    }
}
impl From<PixelFormat> for InternalFormat {
    fn from(value: PixelFormat) -> Self {
        Self::Base(value)
    }
}
impl From<SizedFormat> for InternalFormat {
    fn from(value: SizedFormat) -> Self {
        Self::Sized(value)
    }
}

/// Host-side pixel data, typed by component.
#[derive(Debug, Clone, Copy)]
pub enum Pixels<'a> {
    U8(&'a [u8]),
    I8(&'a [i8]),
    U16(&'a [u16]),
    I16(&'a [i16]),
    U32(&'a [u32]),
    I32(&'a [i32]),
    /// Half floats, as raw bits.
    F16(&'a [u16]),
    F32(&'a [f32]),
    /// One `u32` per pixel, 24 bits depth above 8 bits stencil.
    Packed24_8(&'a [u32]),
    /// Allocate storage without initializing it.
    Uninit,
}

macro_rules! pixels_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl<'a> From<&'a [$ty]> for Pixels<'a> {
            fn from(value: &'a [$ty]) -> Self {
                Self::$variant(value)
            }
        })*
    };
}
pixels_from!(u8 => U8, i8 => I8, u16 => U16, i16 => I16, u32 => U32, i32 => I32, f32 => F32);

impl Pixels<'_> {
    /// The `type` argument to `glTexImage2D`.
    #[must_use]
    pub fn enumerator(&self) -> GLenum {
        match self {
            Self::U8(_) | Self::Uninit => gl::UNSIGNED_BYTE,
            Self::I8(_) => gl::BYTE,
            Self::U16(_) => gl::UNSIGNED_SHORT,
            Self::I16(_) => gl::SHORT,
            Self::U32(_) => gl::UNSIGNED_INT,
            Self::I32(_) => gl::INT,
            Self::F16(_) => gl::HALF_FLOAT,
            Self::F32(_) => gl::FLOAT,
            Self::Packed24_8(_) => gl::UNSIGNED_INT_24_8,
        }
    }
    /// Number of elements, `None` if uninitialized.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::U8(s) => Some(s.len()),
            Self::I8(s) => Some(s.len()),
            Self::U16(s) | Self::F16(s) => Some(s.len()),
            Self::I16(s) => Some(s.len()),
            Self::U32(s) | Self::Packed24_8(s) => Some(s.len()),
            Self::I32(s) => Some(s.len()),
            Self::F32(s) => Some(s.len()),
            Self::Uninit => None,
        }
    }
    fn as_ptr(&self) -> *const std::ffi::c_void {
        match self {
            Self::U8(s) => s.as_ptr().cast(),
            Self::I8(s) => s.as_ptr().cast(),
            Self::U16(s) | Self::F16(s) => s.as_ptr().cast(),
            Self::I16(s) => s.as_ptr().cast(),
            Self::U32(s) | Self::Packed24_8(s) => s.as_ptr().cast(),
            Self::I32(s) => s.as_ptr().cast(),
            Self::F32(s) => s.as_ptr().cast(),
            Self::Uninit => std::ptr::null(),
        }
    }
}

/// A rectangle of pixels to upload.
#[derive(Debug, Clone, Copy)]
pub struct Data<'a> {
    width: i32,
    height: i32,
    format: PixelFormat,
    pixels: Pixels<'a>,
}

impl<'a> Data<'a> {
    /// # Panics
    /// If `pixels` holds fewer elements than `width * height` pixels of `format` need.
    #[must_use]
    pub fn new(
        width: i32,
        height: i32,
        format: PixelFormat,
        pixels: impl Into<Pixels<'a>>,
    ) -> Self {
        let pixels = pixels.into();
        if let Some(len) = pixels.len() {
            let per_pixel = match pixels {
                Pixels::Packed24_8(_) => 1,
                _ => format.components(),
            };
            let needed = usize::try_from(width).unwrap_or(0)
                * usize::try_from(height).unwrap_or(0)
                * per_pixel;
            assert!(
                len >= needed,
                "{width}x{height} {format:?} needs {needed} elements, got {len}"
            );
        }
        Self {
            width,
            height,
            format,
            pixels,
        }
    }
    /// Storage for `width * height` pixels, left uninitialized.
    #[must_use]
    pub fn uninit(width: i32, height: i32, format: PixelFormat) -> Self {
        Self::new(width, height, format, Pixels::Uninit)
    }
    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }
    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }
    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.format
    }
    #[must_use]
    pub fn pixels(&self) -> Pixels<'a> {
        self.pixels
    }
    /// The `type` argument for this upload.
    fn pixel_type(&self) -> GLenum {
        match (self.pixels, self.format) {
            // Depth-stencil rejects every non-packed type, even with no data.
            (Pixels::Uninit, PixelFormat::DepthStencil) => gl::UNSIGNED_INT_24_8,
            (pixels, _) => pixels.enumerator(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum FilterType {
    Nearest = gl::NEAREST,
    /// For color images, enables linear filtering.
    /// For depth images, enables percentage-closer filtering.
    #[default]
    Linear = gl::LINEAR,
}
// Safety: is repr(u32) enum.
unsafe impl GLEnum for FilterType {}

/// Minification filters that sample the mipmap chain. The first word selects within a
/// level, the second between levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MipmapFilter {
    NearestMipmapNearest = gl::NEAREST_MIPMAP_NEAREST,
    LinearMipmapNearest = gl::LINEAR_MIPMAP_NEAREST,
    NearestMipmapLinear = gl::NEAREST_MIPMAP_LINEAR,
    LinearMipmapLinear = gl::LINEAR_MIPMAP_LINEAR,
}
// Safety: is repr(u32) enum.
unsafe impl GLEnum for MipmapFilter {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinFilter {
    Texel(FilterType),
    Mipmap(MipmapFilter),
}
impl MinFilter {
    #[must_use]
    pub fn enumerator(&self) -> GLenum {
        match self {
            Self::Texel(filter) => filter.as_gl(),
            Self::Mipmap(filter) => filter.as_gl(),
        }
    }
    #[must_use]
    pub fn uses_mipmaps(&self) -> bool {
        matches!(self, Self::Mipmap(_))
    }
}
impl From<FilterType> for MinFilter {
    fn from(value: FilterType) -> Self {
        Self::Texel(value)
    }
}
impl From<MipmapFilter> for MinFilter {
    fn from(value: MipmapFilter) -> Self {
        Self::Mipmap(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter {
    pub min: MinFilter,
    pub mag: FilterType,
}
impl Filter {
    pub const NEAREST: Self = Self {
        min: MinFilter::Texel(FilterType::Nearest),
        mag: FilterType::Nearest,
    };
    pub const LINEAR: Self = Self {
        min: MinFilter::Texel(FilterType::Linear),
        mag: FilterType::Linear,
    };
    pub const TRILINEAR: Self = Self {
        min: MinFilter::Mipmap(MipmapFilter::LinearMipmapLinear),
        mag: FilterType::Linear,
    };
}
impl Default for Filter {
    fn default() -> Self {
        Self::TRILINEAR
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Wrap {
    ClampToEdge = gl::CLAMP_TO_EDGE,
    ClampToBorder = gl::CLAMP_TO_BORDER,
    MirroredRepeat = gl::MIRRORED_REPEAT,
    #[default]
    Repeat = gl::REPEAT,
}
// Safety: is repr(u32) enum.
unsafe impl GLEnum for Wrap {}

/// Wrapping along the horizontal (`s`) and vertical (`t`) axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WrapBehaviour {
    pub s: Wrap,
    pub t: Wrap,
}
impl WrapBehaviour {
    #[must_use]
    pub const fn both(wrap: Wrap) -> Self {
        Self { s: wrap, t: wrap }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Swizzle {
    Red = gl::RED,
    Green = gl::GREEN,
    Blue = gl::BLUE,
    Alpha = gl::ALPHA,
    Zero = gl::ZERO,
    One = gl::ONE,
}
// Safety: is repr(u32) enum.
unsafe impl GLEnum for Swizzle {}

/// Where each channel read by a shader comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwizzleMask {
    pub r: Swizzle,
    pub g: Swizzle,
    pub b: Swizzle,
    pub a: Swizzle,
}
impl SwizzleMask {
    pub const IDENTITY: Self = Self {
        r: Swizzle::Red,
        g: Swizzle::Green,
        b: Swizzle::Blue,
        a: Swizzle::Alpha,
    };
    /// Single-channel data read as grayscale, opaque.
    pub const GRAYSCALE: Self = Self {
        r: Swizzle::Red,
        g: Swizzle::Red,
        b: Swizzle::Red,
        a: Swizzle::One,
    };
    fn enumerators(&self) -> [GLint; 4] {
        [self.r, self.g, self.b, self.a].map(|swizzle| swizzle.as_gl() as GLint)
    }
}
impl Default for SwizzleMask {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A 2D texture.
///
/// Every operation binds the texture to the active unit for its duration only.
#[derive(Debug)]
pub struct Texture {
    id: UniqueIdArray<1, DeleteTextures>,
    width: i32,
    height: i32,
}

impl Texture {
    /// Create a texture from `data`, stored in the layout of `data`.
    ///
    /// Mipmaps are generated if `filter` samples them.
    pub fn new(data: Data, filter: Filter, wrap: WrapBehaviour, swizzle: SwizzleMask) -> Self {
        Self::with_internal_format(data, data.format.into(), filter, wrap, swizzle)
    }
    #[doc(alias = "glGenTextures")]
    pub fn with_internal_format(
        data: Data,
        internal_format: InternalFormat,
        filter: Filter,
        wrap: WrapBehaviour,
        swizzle: SwizzleMask,
    ) -> Self {
        let mut texture = Self {
            id: unsafe { crate::gl_gen_with(gl::GenTextures, DeleteTextures) },
            width: 0,
            height: 0,
        };
        {
            let _bind = texture.scoped_bind();
            Self::tex_image(&data, internal_format, 0);
            Self::tex_filter(filter);
            Self::tex_wrap(wrap);
            Self::tex_swizzle(swizzle);
            if filter.min.uses_mipmaps() {
                unsafe { gl::GenerateMipmap(gl::TEXTURE_2D) }
            }
        }
        texture.width = data.width;
        texture.height = data.height;
        texture
    }
    /// (Re)specify mip `level`, stored in the layout of `data`.
    pub fn load(&mut self, data: Data, level: i32) {
        self.load_with_format(data, data.format.into(), level);
    }
    #[doc(alias = "glTexImage2D")]
    pub fn load_with_format(&mut self, data: Data, internal_format: InternalFormat, level: i32) {
        {
            let _bind = self.scoped_bind();
            Self::tex_image(&data, internal_format, level);
        }
        if level == 0 {
            self.width = data.width;
            self.height = data.height;
        }
    }
    /// Overwrite a rectangle of mip `level`, lower-left corner at `(x, y)`.
    #[doc(alias = "glTexSubImage2D")]
    pub fn update(&self, data: Data, x: i32, y: i32, level: i32) {
        let _bind = self.scoped_bind();
        unsafe {
            gl::TexSubImage2D(
                gl::TEXTURE_2D,
                level,
                x,
                y,
                data.width,
                data.height,
                data.format.as_gl(),
                data.pixel_type(),
                data.pixels.as_ptr(),
            );
        }
    }
    #[doc(alias = "GL_TEXTURE_MIN_FILTER")]
    #[doc(alias = "GL_TEXTURE_MAG_FILTER")]
    pub fn set_filter(&self, filter: Filter) {
        let _bind = self.scoped_bind();
        Self::tex_filter(filter);
    }
    #[doc(alias = "GL_TEXTURE_WRAP_S")]
    #[doc(alias = "GL_TEXTURE_WRAP_T")]
    pub fn set_wrap_behaviour(&self, wrap: WrapBehaviour) {
        let _bind = self.scoped_bind();
        Self::tex_wrap(wrap);
    }
    #[doc(alias = "GL_TEXTURE_SWIZZLE_RGBA")]
    pub fn set_swizzle(&self, swizzle: SwizzleMask) {
        let _bind = self.scoped_bind();
        Self::tex_swizzle(swizzle);
    }
    #[doc(alias = "glGenerateMipmap")]
    pub fn generate_mipmap(&self) {
        let _bind = self.scoped_bind();
        unsafe { gl::GenerateMipmap(gl::TEXTURE_2D) }
    }
    /// Width of level 0.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }
    /// Height of level 0.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }
    #[must_use]
    pub fn id(&self) -> Id {
        self.id.get(0)
    }

    // The following act on whatever is bound to GL_TEXTURE_2D.
    fn tex_image(data: &Data, internal_format: InternalFormat, level: i32) {
        unsafe {
            gl::TexImage2D(
                gl::TEXTURE_2D,
                level,
                internal_format.enumerator() as GLint,
                data.width,
                data.height,
                0,
                data.format.as_gl(),
                data.pixel_type(),
                data.pixels.as_ptr(),
            );
        }
    }
    fn tex_parameter_enum(pname: GLenum, param: GLenum) {
        unsafe { gl::TexParameteri(gl::TEXTURE_2D, pname, param as _) }
    }
    fn tex_filter(filter: Filter) {
        Self::tex_parameter_enum(gl::TEXTURE_MIN_FILTER, filter.min.enumerator());
        Self::tex_parameter_enum(gl::TEXTURE_MAG_FILTER, filter.mag.as_gl());
    }
    fn tex_wrap(wrap: WrapBehaviour) {
        Self::tex_parameter_enum(gl::TEXTURE_WRAP_S, wrap.s.as_gl());
        Self::tex_parameter_enum(gl::TEXTURE_WRAP_T, wrap.t.as_gl());
    }
    fn tex_swizzle(swizzle: SwizzleMask) {
        let mask = swizzle.enumerators();
        unsafe { gl::TexParameteriv(gl::TEXTURE_2D, gl::TEXTURE_SWIZZLE_RGBA, mask.as_ptr()) }
    }
}

impl Bindable for Texture {
    type Slot = slot::texture::Texture2D;
    fn binding(&self) -> Id {
        self.id()
    }
}
