//! Per-lane boolean predicates.
//!
//! A [`Mask`] is bound to one species and only ever combined with vectors,
//! masks and shuffles of that same species.

use std::fmt;
use std::sync::Arc;

use crate::element::Element;
use crate::error::{check_index, illegal_argument, index_out_of_bounds, unsupported_operation, Result};
use crate::species::VectorSpecies;
use crate::vector::Vector;

/// An immutable boolean per lane.
#[derive(Clone)]
pub struct Mask<E: Element> {
    species: VectorSpecies<E>,
    bits: Arc<[bool]>,
}

impl<E: Element> Mask<E> {
    pub(crate) fn from_lanes(species: VectorSpecies<E>, bits: Vec<bool>) -> Self {
        debug_assert_eq!(bits.len(), species.length(), "mask lane count must match species");
        Self {
            species,
            bits: bits.into(),
        }
    }

    /// Builds a mask from a generator over lane indices.
    pub fn from_fn(species: VectorSpecies<E>, f: impl FnMut(usize) -> bool) -> Self {
        Self::from_lanes(species, (0..species.length()).map(f).collect())
    }

    /// Every lane set to `value`.
    pub fn splat(species: VectorSpecies<E>, value: bool) -> Self {
        Self::from_lanes(species, vec![value; species.length()])
    }

    /// Reads lanes from `data[offset..offset + length]`.
    pub fn from_slice(species: VectorSpecies<E>, data: &[bool], offset: usize) -> Result<Self> {
        let n = species.length();
        match offset.checked_add(n) {
            Some(end) if end <= data.len() => Ok(Self::from_lanes(species, data[offset..end].to_vec())),
            _ => Err(index_out_of_bounds(
                offset as i64,
                data.len(),
                format!("mask of {n} lanes does not fit at this offset"),
            )),
        }
    }

    /// Lane `i` is bit `i` of `bits`. Bits beyond the lane count are ignored.
    pub fn from_bits(species: VectorSpecies<E>, bits: u64) -> Self {
        Self::from_fn(species, |i| i < 64 && (bits >> i) & 1 == 1)
    }

    pub fn species(&self) -> VectorSpecies<E> {
        self.species
    }

    pub fn length(&self) -> usize {
        self.bits.len()
    }

    pub(crate) fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub fn to_vec(&self) -> Vec<bool> {
        self.bits.to_vec()
    }

    /// Packs the lanes into a bit set. Fails for more than 64 lanes.
    pub fn to_bits(&self) -> Result<u64> {
        if self.length() > 64 {
            return Err(unsupported_operation(format!(
                "a {}-lane mask does not fit in 64 bits",
                self.length()
            )));
        }
        Ok(self
            .bits
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &set)| acc | ((set as u64) << i)))
    }

    pub fn lane_is_set(&self, index: usize) -> Result<bool> {
        let i = check_index(index as i64, self.length(), "mask lane")?;
        Ok(self.bits[i])
    }

    pub fn all_true(&self) -> bool {
        self.bits.iter().all(|&b| b)
    }

    pub fn any_true(&self) -> bool {
        self.bits.iter().any(|&b| b)
    }

    pub fn true_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Index of the first set lane.
    pub fn first_true(&self) -> Option<usize> {
        self.bits.iter().position(|&b| b)
    }

    /// Index of the last set lane.
    pub fn last_true(&self) -> Option<usize> {
        self.bits.iter().rposition(|&b| b)
    }

    pub fn and(&self, other: &Mask<E>) -> Result<Mask<E>> {
        self.zip(other, |a, b| a && b)
    }

    pub fn or(&self, other: &Mask<E>) -> Result<Mask<E>> {
        self.zip(other, |a, b| a || b)
    }

    pub fn xor(&self, other: &Mask<E>) -> Result<Mask<E>> {
        self.zip(other, |a, b| a != b)
    }

    /// `self & !other`.
    pub fn and_not(&self, other: &Mask<E>) -> Result<Mask<E>> {
        self.zip(other, |a, b| a && !b)
    }

    /// Lanes where both masks agree.
    pub fn equal(&self, other: &Mask<E>) -> Result<Mask<E>> {
        self.zip(other, |a, b| a == b)
    }

    pub fn not(&self) -> Mask<E> {
        Self::from_lanes(self.species, self.bits.iter().map(|&b| !b).collect())
    }

    /// Set lanes become `-1`, unset lanes `0`.
    pub fn to_vector(&self) -> Vector<E> {
        let minus_one = E::from_index(-1);
        Vector::from_fn(self.species, |i| if self.bits[i] { minus_one } else { E::zero() })
    }

    /// Rebinds the lanes to a species of another lane type with the same
    /// lane count.
    pub fn cast<F: Element>(&self, species: VectorSpecies<F>) -> Result<Mask<F>> {
        if species.length() != self.length() {
            return Err(illegal_argument(format!(
                "cannot cast a {}-lane mask to {species}",
                self.length()
            )));
        }
        Ok(Mask::from_lanes(species, self.bits.to_vec()))
    }

    pub(crate) fn check_species(&self, species: VectorSpecies<E>) -> Result<()> {
        species.check(self.species)
    }

    fn zip(&self, other: &Mask<E>, f: impl Fn(bool, bool) -> bool) -> Result<Mask<E>> {
        self.species.check(other.species)?;
        Ok(Self::from_lanes(
            self.species,
            self.bits
                .iter()
                .zip(other.bits.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        ))
    }
}

impl<E: Element> PartialEq for Mask<E> {
    fn eq(&self, other: &Self) -> bool {
        self.species == other.species && self.bits == other.bits
    }
}

impl<E: Element> fmt::Debug for Mask<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mask")
            .field("species", &self.species)
            .field("lanes", &&self.bits[..])
            .finish()
    }
}
