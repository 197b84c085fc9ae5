//! Element kinds and vector shapes.
//!
//! Both enumerations are closed: every cross-kind or cross-shape dispatch in
//! the crate is an exhaustive `match` over one of them.

use std::fmt;
use std::str::FromStr;

use crate::config;
use crate::error::{illegal_argument, unsupported_element_kind, unsupported_operation, Result};

/// The six primitive lane types a vector can hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    /// `i8` lanes.
    Byte,
    /// `i16` lanes.
    Short,
    /// `i32` lanes.
    Int,
    /// `i64` lanes.
    Long,
    /// `f32` lanes.
    Float,
    /// `f64` lanes.
    Double,
}

impl ElementKind {
    /// All element kinds, ordered by index.
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Byte,
        ElementKind::Short,
        ElementKind::Int,
        ElementKind::Long,
        ElementKind::Float,
        ElementKind::Double,
    ];

    /// Size of one lane in bits.
    pub const fn bits(self) -> usize {
        match self {
            ElementKind::Byte => 8,
            ElementKind::Short => 16,
            ElementKind::Int | ElementKind::Float => 32,
            ElementKind::Long | ElementKind::Double => 64,
        }
    }

    /// Size of one lane in bytes.
    pub const fn bytes(self) -> usize {
        self.bits() / 8
    }

    pub const fn is_floating(self) -> bool {
        matches!(self, ElementKind::Float | ElementKind::Double)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ElementKind::Byte => "byte",
            ElementKind::Short => "short",
            ElementKind::Int => "int",
            ElementKind::Long => "long",
            ElementKind::Float => "float",
            ElementKind::Double => "double",
        }
    }

    /// The integral kind of the same size.
    pub const fn integral_equivalent(self) -> ElementKind {
        match self {
            ElementKind::Float => ElementKind::Int,
            ElementKind::Double => ElementKind::Long,
            other => other,
        }
    }

    /// The floating kind of the same size. Byte and short have none.
    pub fn floating_equivalent(self) -> Result<ElementKind> {
        match self {
            ElementKind::Int | ElementKind::Float => Ok(ElementKind::Float),
            ElementKind::Long | ElementKind::Double => Ok(ElementKind::Double),
            ElementKind::Byte | ElementKind::Short => Err(unsupported_operation(format!(
                "no floating lane type has the size of {}",
                self.name()
            ))),
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementKind {
    type Err = crate::error::LanewiseError;

    /// Accepts both the lane names (`"int"`) and the Rust type names (`"i32"`).
    fn from_str(name: &str) -> Result<Self> {
        match name.trim() {
            "byte" | "i8" => Ok(ElementKind::Byte),
            "short" | "i16" => Ok(ElementKind::Short),
            "int" | "i32" => Ok(ElementKind::Int),
            "long" | "i64" => Ok(ElementKind::Long),
            "float" | "f32" => Ok(ElementKind::Float),
            "double" | "f64" => Ok(ElementKind::Double),
            other => Err(unsupported_element_kind(other)),
        }
    }
}

/// Total bit width of a vector, shared across element kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    S64,
    S128,
    S256,
    S512,
    /// The widest vector the host supports, probed once per process.
    Max,
}

impl Shape {
    /// All shapes, ordered by index.
    pub const ALL: [Shape; 5] = [Shape::S64, Shape::S128, Shape::S256, Shape::S512, Shape::Max];

    /// Bit width of the shape. `Max` consults the host configuration.
    pub fn bit_size(self) -> usize {
        match self {
            Shape::S64 => 64,
            Shape::S128 => 128,
            Shape::S256 => 256,
            Shape::S512 => 512,
            Shape::Max => config::host().max_vector_bits,
        }
    }

    /// Number of lanes of `kind` that fit in this shape.
    pub fn lane_count(self, kind: ElementKind) -> usize {
        self.bit_size() / kind.bits()
    }

    /// Finds the shape with the given bit width, preferring the fixed shapes.
    pub fn for_bit_size(bits: usize) -> Result<Shape> {
        match bits {
            64 => Ok(Shape::S64),
            128 => Ok(Shape::S128),
            256 => Ok(Shape::S256),
            512 => Ok(Shape::S512),
            _ if bits == Shape::Max.bit_size() => Ok(Shape::Max),
            _ => Err(illegal_argument(format!("no vector shape is {bits} bits wide"))),
        }
    }

    /// The widest shape the host supports, expressed as a fixed shape when one
    /// has the same width.
    pub fn preferred() -> Shape {
        let max = Shape::Max.bit_size();
        Shape::ALL[..4]
            .iter()
            .copied()
            .find(|shape| shape.bit_size() == max)
            .unwrap_or(Shape::Max)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::S64 => f.write_str("S_64_BIT"),
            Shape::S128 => f.write_str("S_128_BIT"),
            Shape::S256 => f.write_str("S_256_BIT"),
            Shape::S512 => f.write_str("S_512_BIT"),
            Shape::Max => f.write_str("S_Max_BIT"),
        }
    }
}
