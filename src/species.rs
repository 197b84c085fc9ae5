//! Species registry.
//!
//! A species pairs an [`ElementKind`] with a [`Shape`] and fixes the lane
//! count of every vector, mask and shuffle bound to it. The thirty species are
//! built once, on first use, into a process-wide table; afterwards every
//! lookup returns the same `&'static Species`, so identity comparison is valid.

use std::fmt;
use std::marker::PhantomData;

use log::debug;
use once_cell::sync::Lazy;

use crate::element::Element;
use crate::error::{illegal_argument, species_mismatch, Result};
use crate::mask::Mask;
use crate::shape::{ElementKind, Shape};
use crate::shuffle::{IndexPolicy, Shuffle};
use crate::vector::Vector;

/// An (element kind, shape) pairing.
///
/// Invariant: `bit_size == lane_count * element_bits`.
#[derive(Debug)]
pub struct Species {
    kind: ElementKind,
    shape: Shape,
    lane_count: usize,
    bit_size: usize,
}

struct Registry {
    species: [[Species; 5]; 6],
}

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let species = std::array::from_fn(|k| {
        let kind = ElementKind::ALL[k];
        std::array::from_fn(|s| {
            let shape = Shape::ALL[s];
            let bit_size = shape.bit_size();
            Species {
                kind,
                shape,
                lane_count: bit_size / kind.bits(),
                bit_size,
            }
        })
    });
    debug!(
        "species registry initialized ({} max shape)",
        Shape::Max.bit_size()
    );
    Registry { species }
});

impl Species {
    /// Returns the species for `(kind, shape)`.
    pub fn of(kind: ElementKind, shape: Shape) -> &'static Species {
        &REGISTRY.species[kind.index()][shape.index()]
    }

    /// Returns the widest species the host supports for `kind`.
    pub fn preferred(kind: ElementKind) -> &'static Species {
        Species::of(kind, Shape::preferred())
    }

    /// Finds a species of `kind` with exactly `lanes` lanes, preferring the
    /// fixed shapes over `Max`.
    pub fn for_lane_count(kind: ElementKind, lanes: usize) -> Result<&'static Species> {
        Shape::ALL
            .iter()
            .map(|&shape| Species::of(kind, shape))
            .find(|species| species.lane_count == lanes)
            .ok_or_else(|| {
                illegal_argument(format!("no {kind} species has {lanes} lanes"))
            })
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Number of lanes.
    pub fn length(&self) -> usize {
        self.lane_count
    }

    /// Lane size in bits.
    pub fn element_size(&self) -> usize {
        self.kind.bits()
    }

    pub fn vector_bit_size(&self) -> usize {
        self.bit_size
    }

    pub fn vector_byte_size(&self) -> usize {
        self.bit_size / 8
    }

    /// Same shape, different element kind.
    pub fn with_kind(&self, kind: ElementKind) -> &'static Species {
        Species::of(kind, self.shape)
    }

    /// Same element kind, different shape.
    pub fn with_shape(&self, shape: Shape) -> &'static Species {
        Species::of(self.kind, shape)
    }

    /// Largest multiple of the lane count not exceeding `len`.
    pub fn loop_bound(&self, len: usize) -> usize {
        len - len % self.lane_count
    }
}

impl PartialEq for Species {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Species {}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Species[{}, {}, {}]",
            self.kind, self.lane_count, self.shape
        )
    }
}

/// A species bound to its Rust lane type.
pub struct VectorSpecies<E: Element> {
    species: &'static Species,
    _lane: PhantomData<fn() -> E>,
}

impl<E: Element> Clone for VectorSpecies<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Element> Copy for VectorSpecies<E> {}

impl<E: Element> PartialEq for VectorSpecies<E> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.species, other.species)
    }
}

impl<E: Element> Eq for VectorSpecies<E> {}

impl<E: Element> fmt::Debug for VectorSpecies<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.species, f)
    }
}

impl<E: Element> fmt::Display for VectorSpecies<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.species, f)
    }
}

impl<E: Element> VectorSpecies<E> {
    pub fn of(shape: Shape) -> Self {
        Self {
            species: Species::of(E::KIND, shape),
            _lane: PhantomData,
        }
    }

    pub fn preferred() -> Self {
        Self::of(Shape::preferred())
    }

    pub fn max() -> Self {
        Self::of(Shape::Max)
    }

    pub fn for_lane_count(lanes: usize) -> Result<Self> {
        Species::for_lane_count(E::KIND, lanes).map(|species| Self {
            species,
            _lane: PhantomData,
        })
    }

    /// Binds an untyped species, which must have `E`'s element kind.
    pub fn from_species(species: &'static Species) -> Result<Self> {
        if species.kind() != E::KIND {
            return Err(species_mismatch(
                format!("a {} species", E::KIND),
                species,
            ));
        }
        Ok(Self {
            species,
            _lane: PhantomData,
        })
    }

    pub fn species(self) -> &'static Species {
        self.species
    }

    pub fn shape(self) -> Shape {
        self.species.shape()
    }

    pub fn length(self) -> usize {
        self.species.length()
    }

    pub fn vector_byte_size(self) -> usize {
        self.species.vector_byte_size()
    }

    pub fn loop_bound(self, len: usize) -> usize {
        self.species.loop_bound(len)
    }

    pub fn with_shape(self, shape: Shape) -> Self {
        Self::of(shape)
    }

    /// The species of lane type `F` with the same shape.
    pub fn with_lanes<F: Element>(self) -> VectorSpecies<F> {
        VectorSpecies::of(self.shape())
    }

    pub fn zero(self) -> Vector<E> {
        Vector::zero(self)
    }

    pub fn broadcast(self, value: E) -> Vector<E> {
        Vector::broadcast(self, value)
    }

    pub fn iota(self) -> Vector<E> {
        Vector::iota(self)
    }

    /// The identity shuffle.
    pub fn iota_shuffle(self) -> Shuffle<E> {
        Shuffle::iota(self, 0, 1, IndexPolicy::Wrap)
    }

    /// Mask of lanes `i` with `offset + i < limit`.
    pub fn index_in_range(self, offset: usize, limit: usize) -> Mask<E> {
        Mask::from_fn(self, |i| offset.saturating_add(i) < limit)
    }

    pub(crate) fn check(self, other: VectorSpecies<E>) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(species_mismatch(self, other))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_invariants() {
        for kind in ElementKind::ALL {
            for shape in Shape::ALL {
                let species = Species::of(kind, shape);
                assert_eq!(
                    species.vector_bit_size(),
                    species.length() * species.element_size()
                );
                assert!(species.length().is_power_of_two());
                assert_eq!(species.kind(), kind);
                assert_eq!(species.shape(), shape);
            }
        }
    }

    #[test]
    fn test_species_are_singletons() {
        let a = Species::of(ElementKind::Int, Shape::S128);
        let b = Species::of(ElementKind::Int, Shape::S128);
        assert!(std::ptr::eq(a, b));
        assert_eq!(a, b);
        assert_ne!(a, Species::of(ElementKind::Float, Shape::S128));
        assert_ne!(a, Species::of(ElementKind::Int, Shape::S256));
    }

    #[test]
    fn test_for_lane_count() {
        let s = Species::for_lane_count(ElementKind::Byte, 16).unwrap();
        assert_eq!(s.shape(), Shape::S128);
        assert!(Species::for_lane_count(ElementKind::Long, 3).is_err());
    }

    #[test]
    fn test_companions() {
        let s = Species::of(ElementKind::Int, Shape::S256);
        assert_eq!(s.with_kind(ElementKind::Double).length(), 4);
        assert_eq!(s.with_shape(Shape::S64).length(), 2);
        assert_eq!(s.loop_bound(21), 16);
        assert_eq!(s.to_string(), "Species[int, 8, S_256_BIT]");
    }

    #[test]
    fn test_typed_species() {
        let s = VectorSpecies::<f32>::of(Shape::S128);
        assert_eq!(s.length(), 4);
        assert_eq!(s.with_lanes::<i8>().length(), 16);
        assert!(VectorSpecies::<f32>::from_species(Species::of(ElementKind::Int, Shape::S128)).is_err());
        assert!(s.check(VectorSpecies::of(Shape::S256)).is_err());
        assert_eq!(VectorSpecies::<i64>::preferred().shape(), Shape::preferred());
    }

    #[test]
    fn test_index_in_range() {
        let s = VectorSpecies::<i32>::of(Shape::S128);
        assert_eq!(s.index_in_range(8, 10).to_vec(), vec![true, true, false, false]);
        assert_eq!(s.index_in_range(0, 10).true_count(), 4);
    }
}
