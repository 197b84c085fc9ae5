//! Lane permutation indices.
//!
//! A shuffle holds one source index per lane. Indices in `[0, n)` are valid.
//! An index outside that range is *exceptional*: depending on the
//! [`IndexPolicy`] chosen when the shuffle is built it is either wrapped
//! modulo `n` right away, or kept as a partially wrapped sentinel
//! `floor_mod(i, n) - n` in `[-n, 0)` that fails when a consumer actually
//! dereferences it. A shuffle never changes policy implicitly; use
//! [`Shuffle::wrap_indexes`] or [`Shuffle::check_indexes`] to convert.

use std::fmt;
use std::sync::Arc;

use crate::element::Element;
use crate::error::{check_index, illegal_argument, index_out_of_bounds, Result};
use crate::mask::Mask;
use crate::species::VectorSpecies;
use crate::vector::Vector;

/// How out-of-range indices are resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IndexPolicy {
    /// Reduce every index modulo the lane count at construction.
    Wrap,
    /// Keep exceptional indices; dereferencing one is an error.
    Check,
}

/// An immutable per-lane source index.
#[derive(Clone)]
pub struct Shuffle<E: Element> {
    species: VectorSpecies<E>,
    indices: Arc<[i32]>,
    policy: IndexPolicy,
}

/// Normalizes `index` for `n` lanes under `policy`.
fn normalize(index: i64, n: usize, policy: IndexPolicy) -> i32 {
    let n = n as i64;
    let wrapped = index.rem_euclid(n);
    match policy {
        IndexPolicy::Wrap => wrapped as i32,
        IndexPolicy::Check if wrapped == index => index as i32,
        IndexPolicy::Check => (wrapped - n) as i32,
    }
}

impl<E: Element> Shuffle<E> {
    fn from_lanes(species: VectorSpecies<E>, indices: Vec<i32>, policy: IndexPolicy) -> Self {
        debug_assert_eq!(indices.len(), species.length(), "shuffle lane count must match species");
        Self {
            species,
            indices: indices.into(),
            policy,
        }
    }

    /// Builds a shuffle from a generator over lane indices.
    pub fn from_fn(
        species: VectorSpecies<E>,
        mut f: impl FnMut(usize) -> i64,
        policy: IndexPolicy,
    ) -> Self {
        let n = species.length();
        Self::from_lanes(
            species,
            (0..n).map(|i| normalize(f(i), n, policy)).collect(),
            policy,
        )
    }

    /// Builds a shuffle from exactly `length` source indices.
    pub fn from_values(species: VectorSpecies<E>, values: &[i32], policy: IndexPolicy) -> Result<Self> {
        if values.len() != species.length() {
            return Err(illegal_argument(format!(
                "{species} needs {} shuffle indices, got {}",
                species.length(),
                values.len()
            )));
        }
        Ok(Self::from_fn(species, |i| values[i] as i64, policy))
    }

    /// Reads indices from `data[offset..offset + length]`.
    pub fn from_slice(
        species: VectorSpecies<E>,
        data: &[i32],
        offset: usize,
        policy: IndexPolicy,
    ) -> Result<Self> {
        let n = species.length();
        match offset.checked_add(n) {
            Some(end) if end <= data.len() => {
                Ok(Self::from_fn(species, |i| data[offset + i] as i64, policy))
            }
            _ => Err(index_out_of_bounds(
                offset as i64,
                data.len(),
                format!("shuffle of {n} lanes does not fit at this offset"),
            )),
        }
    }

    /// Lane `i` selects `start + i * step`.
    pub fn iota(species: VectorSpecies<E>, start: i32, step: i32, policy: IndexPolicy) -> Self {
        Self::from_fn(
            species,
            |i| start as i64 + i as i64 * step as i64,
            policy,
        )
    }

    pub fn identity(species: VectorSpecies<E>) -> Self {
        Self::iota(species, 0, 1, IndexPolicy::Wrap)
    }

    /// Interleaves block `part` of two vectors when used with
    /// [`Vector::rearrange_with`]: even lanes come from the receiver, odd
    /// lanes from the second vector.
    pub fn zip(species: VectorSpecies<E>, part: usize) -> Result<Self> {
        let n = species.length();
        check_index(part as i64, 2, "zip part")?;
        let offset = part * n / 2;
        Ok(Self::from_fn(
            species,
            |i| (i / 2 + offset + if i % 2 == 1 { n } else { 0 }) as i64,
            IndexPolicy::Check,
        ))
    }

    /// Gathers the even (`part == 0`) or odd (`part == 1`) lanes of two
    /// concatenated vectors when used with [`Vector::rearrange_with`].
    pub fn unzip(species: VectorSpecies<E>, part: usize) -> Result<Self> {
        check_index(part as i64, 2, "unzip part")?;
        Ok(Self::from_fn(species, |i| (2 * i + part) as i64, IndexPolicy::Check))
    }

    pub fn species(&self) -> VectorSpecies<E> {
        self.species
    }

    pub fn length(&self) -> usize {
        self.indices.len()
    }

    pub fn policy(&self) -> IndexPolicy {
        self.policy
    }

    /// Stored index of lane `index`; exceptional lanes read negative.
    pub fn lane(&self, index: usize) -> Result<i32> {
        let i = check_index(index as i64, self.length(), "shuffle lane")?;
        Ok(self.indices[i])
    }

    pub(crate) fn as_slice(&self) -> &[i32] {
        &self.indices
    }

    pub fn to_vec(&self) -> Vec<i32> {
        self.indices.to_vec()
    }

    /// The stored indices as vector lanes.
    pub fn to_vector(&self) -> Vector<E> {
        Vector::from_fn(self.species, |i| E::from_index(self.indices[i] as i64))
    }

    /// Set for lanes holding a valid (non-exceptional) index.
    pub fn lane_is_valid(&self) -> Mask<E> {
        Mask::from_fn(self.species, |i| self.indices[i] >= 0)
    }

    pub fn has_exceptional(&self) -> bool {
        self.indices.iter().any(|&i| i < 0)
    }

    /// Resolves every exceptional index modulo the lane count.
    pub fn wrap_indexes(&self) -> Shuffle<E> {
        let n = self.length() as i32;
        Self::from_lanes(
            self.species,
            self.indices.iter().map(|&i| if i < 0 { i + n } else { i }).collect(),
            IndexPolicy::Wrap,
        )
    }

    /// Fails on the first exceptional index, otherwise returns a
    /// [`IndexPolicy::Check`] copy.
    pub fn check_indexes(&self) -> Result<Shuffle<E>> {
        self.first_exceptional(None)?;
        Ok(Self::from_lanes(
            self.species,
            self.indices.to_vec(),
            IndexPolicy::Check,
        ))
    }

    /// Composes two shuffles: lane `i` of the result is `self[other[i]]`.
    pub fn rearrange(&self, other: &Shuffle<E>) -> Result<Shuffle<E>> {
        self.species.check(other.species)?;
        other.first_exceptional(None)?;
        Ok(Self::from_lanes(
            self.species,
            other.indices.iter().map(|&j| self.indices[j as usize]).collect(),
            self.policy,
        ))
    }

    /// Rebinds the indices to a species of another lane type with the same
    /// lane count.
    pub fn cast<F: Element>(&self, species: VectorSpecies<F>) -> Result<Shuffle<F>> {
        if species.length() != self.length() {
            return Err(illegal_argument(format!(
                "cannot cast a {}-lane shuffle to {species}",
                self.length()
            )));
        }
        Ok(Shuffle::from_lanes(species, self.indices.to_vec(), self.policy))
    }

    /// Errors on the first exceptional lane, restricted to `mask` if given.
    pub(crate) fn first_exceptional(&self, mask: Option<&Mask<E>>) -> Result<()> {
        let n = self.length();
        let hit = self
            .indices
            .iter()
            .enumerate()
            .find(|&(lane, &i)| i < 0 && mask.map_or(true, |m| m.as_slice()[lane]));
        match hit {
            Some((lane, &i)) => Err(index_out_of_bounds(
                (i as i64) + n as i64,
                n,
                format!("exceptional shuffle index in lane {lane}"),
            )),
            None => Ok(()),
        }
    }
}

impl<E: Element> PartialEq for Shuffle<E> {
    fn eq(&self, other: &Self) -> bool {
        self.species == other.species
            && self.policy == other.policy
            && self.indices == other.indices
    }
}

impl<E: Element> fmt::Debug for Shuffle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shuffle")
            .field("species", &self.species)
            .field("policy", &self.policy)
            .field("lanes", &&self.indices[..])
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;

    fn species() -> VectorSpecies<i32> {
        VectorSpecies::of(Shape::S128)
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(2, 4, IndexPolicy::Check), 2);
        assert_eq!(normalize(5, 4, IndexPolicy::Check), -3);
        assert_eq!(normalize(-1, 4, IndexPolicy::Check), -1);
        assert_eq!(normalize(-5, 4, IndexPolicy::Check), -1);
        assert_eq!(normalize(5, 4, IndexPolicy::Wrap), 1);
        assert_eq!(normalize(-1, 4, IndexPolicy::Wrap), 3);
    }

    #[test]
    fn test_iota_policies() {
        let wrapped = Shuffle::iota(species(), 2, 1, IndexPolicy::Wrap);
        assert_eq!(wrapped.to_vec(), vec![2, 3, 0, 1]);
        assert!(!wrapped.has_exceptional());

        let checked = Shuffle::iota(species(), 2, 1, IndexPolicy::Check);
        assert_eq!(checked.to_vec(), vec![2, 3, -4, -3]);
        assert_eq!(checked.lane_is_valid().to_vec(), vec![true, true, false, false]);
        assert!(checked.check_indexes().is_err());
        assert_eq!(checked.wrap_indexes(), wrapped);
    }

    #[test]
    fn test_from_values_length() {
        assert!(Shuffle::from_values(species(), &[0, 1, 2], IndexPolicy::Wrap).is_err());
        let s = Shuffle::from_values(species(), &[3, 2, 1, 0], IndexPolicy::Check).unwrap();
        assert_eq!(s.lane(0).unwrap(), 3);
        assert!(s.lane(4).is_err());
        assert_eq!(s.policy(), IndexPolicy::Check);
    }

    #[test]
    fn test_from_slice_offset() {
        let data = [9, 0, 1, 2, 3];
        let s = Shuffle::from_slice(species(), &data, 1, IndexPolicy::Check).unwrap();
        assert_eq!(s.to_vec(), vec![0, 1, 2, 3]);
        assert!(Shuffle::from_slice(species(), &data, 2, IndexPolicy::Check).is_err());
    }

    #[test]
    fn test_compose() {
        let reverse = Shuffle::from_values(species(), &[3, 2, 1, 0], IndexPolicy::Wrap).unwrap();
        let identity = reverse.rearrange(&reverse).unwrap();
        assert_eq!(identity.to_vec(), vec![0, 1, 2, 3]);

        let exceptional = Shuffle::iota(species(), 1, 1, IndexPolicy::Check);
        assert!(reverse.rearrange(&exceptional).is_err());
    }

    #[test]
    fn test_zip_unzip_indices() {
        let zip0 = Shuffle::zip(species(), 0).unwrap();
        assert_eq!(zip0.wrap_indexes().to_vec(), vec![0, 0, 1, 1]);
        assert_eq!(zip0.lane_is_valid().to_vec(), vec![true, false, true, false]);
        let unzip1 = Shuffle::unzip(species(), 1).unwrap();
        assert_eq!(unzip1.wrap_indexes().to_vec(), vec![1, 3, 1, 3]);
        assert!(Shuffle::zip(species(), 2).is_err());
    }

    #[test]
    fn test_to_vector_and_cast() {
        let s = Shuffle::iota(species(), 0, 1, IndexPolicy::Wrap);
        assert_eq!(s.to_vector().to_vec(), vec![0, 1, 2, 3]);
        let f = s.cast(VectorSpecies::<f32>::of(Shape::S128)).unwrap();
        assert_eq!(f.to_vector().to_vec(), vec![0.0, 1.0, 2.0, 3.0]);
        assert!(s.cast(VectorSpecies::<i64>::of(Shape::S128)).is_err());
    }
}
