use std::fmt;

use super::{UniformSlot, UniformValue};

/// Shader stage of a material source.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Entry point name every source must export for its stage.
    pub const fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors raised by [`HalftoneMaterial`](super::HalftoneMaterial).
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialError {
    /// A source failed to parse or validate. Fatal at initialization.
    Compile { stage: ShaderStage, message: String },

    /// A source parsed but does not export the stage entry point.
    MissingEntryPoint { stage: ShaderStage },

    /// `set_uniform` was called with a value of the wrong shape for the slot.
    TypeMismatch { slot: UniformSlot, value: UniformValue },

    /// `UniformSlot::from_name` did not recognize the name.
    UnknownUniform(String),
}

impl fmt::Display for MaterialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialError::Compile { stage, message } => {
                write!(f, "{stage} shader failed to compile: {message}")
            }
            MaterialError::MissingEntryPoint { stage } => {
                write!(f, "{stage} shader has no `{}` entry point", stage.entry_point())
            }
            MaterialError::TypeMismatch { slot, value } => {
                write!(f, "uniform `{}` cannot hold {value:?}", slot.name())
            }
            MaterialError::UnknownUniform(name) => write!(f, "unknown uniform `{name}`"),
        }
    }
}

impl std::error::Error for MaterialError {}
