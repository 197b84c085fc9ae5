//! A vector whose lane type is only known at run time.

use crate::error::{illegal_argument, Result};
use crate::shape::ElementKind;
use crate::species::{Species, VectorSpecies};
use crate::vector::Vector;

/// One variant per element kind.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyVector {
    Byte(Vector<i8>),
    Short(Vector<i16>),
    Int(Vector<i32>),
    Long(Vector<i64>),
    Float(Vector<f32>),
    Double(Vector<f64>),
}

macro_rules! each_kind {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            AnyVector::Byte($v) => $body,
            AnyVector::Short($v) => $body,
            AnyVector::Int($v) => $body,
            AnyVector::Long($v) => $body,
            AnyVector::Float($v) => $body,
            AnyVector::Double($v) => $body,
        }
    };
}

impl AnyVector {
    /// The zero vector of `species`.
    pub fn zero(species: &'static Species) -> AnyVector {
        Self::from_ne_bytes(species, &vec![0u8; species.vector_byte_size()])
    }

    /// Decodes native-order bytes as `species`. Missing trailing bytes read
    /// as zero, extra bytes are ignored.
    pub fn from_ne_bytes(species: &'static Species, bytes: &[u8]) -> AnyVector {
        let mut raw = vec![0u8; species.vector_byte_size()];
        let count = raw.len().min(bytes.len());
        raw[..count].copy_from_slice(&bytes[..count]);
        match species.kind() {
            ElementKind::Byte => AnyVector::Byte(Vector::decode_ne(VectorSpecies::of(species.shape()), &raw)),
            ElementKind::Short => AnyVector::Short(Vector::decode_ne(VectorSpecies::of(species.shape()), &raw)),
            ElementKind::Int => AnyVector::Int(Vector::decode_ne(VectorSpecies::of(species.shape()), &raw)),
            ElementKind::Long => AnyVector::Long(Vector::decode_ne(VectorSpecies::of(species.shape()), &raw)),
            ElementKind::Float => AnyVector::Float(Vector::decode_ne(VectorSpecies::of(species.shape()), &raw)),
            ElementKind::Double => AnyVector::Double(Vector::decode_ne(VectorSpecies::of(species.shape()), &raw)),
        }
    }

    pub fn species(&self) -> &'static Species {
        each_kind!(self, v => v.species().species())
    }

    pub fn kind(&self) -> ElementKind {
        self.species().kind()
    }

    pub fn length(&self) -> usize {
        each_kind!(self, v => v.length())
    }

    pub fn to_ne_bytes(&self) -> Vec<u8> {
        each_kind!(self, v => v.to_ne_bytes())
    }

    pub fn reinterpret_shape(&self, target: &'static Species, part: i32) -> Result<AnyVector> {
        each_kind!(self, v => v.reinterpret_dyn(target, part))
    }

    pub fn convert_shape(&self, target: &'static Species, part: i32) -> Result<AnyVector> {
        each_kind!(self, v => v.convert_dyn(target, part))
    }

    /// Lane-wise value cast into `target`; see [`Vector::cast`].
    pub fn cast(&self, target: &'static Species) -> Result<AnyVector> {
        if self.length() != target.length() {
            return Err(illegal_argument(format!(
                "cannot cast {} lanes into {target}",
                self.length()
            )));
        }
        self.convert_shape(target, 0)
    }
}

macro_rules! impl_any_lanes {
    ($t:ty, $variant:ident) => {
        impl From<Vector<$t>> for AnyVector {
            fn from(v: Vector<$t>) -> Self {
                AnyVector::$variant(v)
            }
        }

        /// Fails with the original value if the lane type differs.
        impl TryFrom<AnyVector> for Vector<$t> {
            type Error = AnyVector;

            fn try_from(any: AnyVector) -> std::result::Result<Self, AnyVector> {
                match any {
                    AnyVector::$variant(v) => Ok(v),
                    other => Err(other),
                }
            }
        }
    };
}

impl_any_lanes!(i8, Byte);
impl_any_lanes!(i16, Short);
impl_any_lanes!(i32, Int);
impl_any_lanes!(i64, Long);
impl_any_lanes!(f32, Float);
impl_any_lanes!(f64, Double);
