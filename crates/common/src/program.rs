//! Filter program identification and uniform passing.

use std::fmt;

/// Identifies the shader program a filter pass runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProgramId {
    /// Copies the source unchanged (layer-style source pass).
    Passthrough,
    FastBlur,
    Glow,
    DisplacementMap,
    MotionTile,
    CornerPin,
    Bulge,
    BrightnessContrast,
    Mosaic,
    MotionBlur,
    /// Hard choke ahead of the drop shadow blur.
    DropShadowSpread,
    DropShadow,
    OuterGlow,
    Stroke,
}

impl ProgramId {
    /// Program name used to look up the compiled shader.
    pub fn name(self) -> &'static str {
        match self {
            Self::Passthrough => "passthrough",
            Self::FastBlur => "fast_blur",
            Self::Glow => "glow",
            Self::DisplacementMap => "displacement_map",
            Self::MotionTile => "motion_tile",
            Self::CornerPin => "corner_pin",
            Self::Bulge => "bulge",
            Self::BrightnessContrast => "brightness_contrast",
            Self::Mosaic => "mosaic",
            Self::MotionBlur => "motion_blur",
            Self::DropShadowSpread => "drop_shadow_spread",
            Self::DropShadow => "drop_shadow",
            Self::OuterGlow => "outer_glow",
            Self::Stroke => "stroke",
        }
    }

    /// Fragment shader file name.
    pub fn fragment_shader(self) -> String {
        format!("{}.frag", self.name())
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Uniform values handed to a filter program, in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UniformArgs {
    entries: Vec<Uniform>,
}

/// A single uniform value.
#[derive(Clone, Debug, PartialEq)]
pub enum Uniform {
    U32(u32),
    I32(i32),
    F32(f32),
    Vec2([f32; 2]),
    Vec4([f32; 4]),
    /// Row-major 3x3 matrix.
    Mat3([f32; 9]),
}

impl UniformArgs {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push_u32(mut self, val: u32) -> Self {
        self.entries.push(Uniform::U32(val));
        self
    }

    pub fn push_i32(mut self, val: i32) -> Self {
        self.entries.push(Uniform::I32(val));
        self
    }

    pub fn push_bool(self, val: bool) -> Self {
        self.push_u32(u32::from(val))
    }

    pub fn push_f32(mut self, val: f32) -> Self {
        self.entries.push(Uniform::F32(val));
        self
    }

    pub fn push_vec2(mut self, val: [f32; 2]) -> Self {
        self.entries.push(Uniform::Vec2(val));
        self
    }

    pub fn push_vec4(mut self, val: [f32; 4]) -> Self {
        self.entries.push(Uniform::Vec4(val));
        self
    }

    pub fn push_mat3(mut self, val: [f32; 9]) -> Self {
        self.entries.push(Uniform::Mat3(val));
        self
    }

    pub fn entries(&self) -> &[Uniform] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
