//! Cross-lane movement: rearrange, rotate, lane shifts and slicing.
//!
//! Slicing and lane shifts are compositions of an iota shuffle, a lane
//! position mask and a blend. Lanes not covered by the moved data come from
//! the blend background, which is zero unless a background vector is given.

use crate::element::Element;
use crate::error::{check_index, illegal_argument, Result};
use crate::mask::Mask;
use crate::shuffle::{IndexPolicy, Shuffle};

use super::Vector;

impl<E: Element> Vector<E> {
    /// Lane `i` is `self[s[i]]`.
    ///
    /// Fails before producing output if `s` carries an exceptional index.
    pub fn rearrange(&self, s: &Shuffle<E>) -> Result<Self> {
        self.species().check(s.species())?;
        s.first_exceptional(None)?;
        Ok(self.gather(s))
    }

    /// Set lanes gather as [`rearrange`](Self::rearrange), unset lanes are
    /// zero. Exceptional indices only fail in set lanes.
    pub fn rearrange_masked(&self, s: &Shuffle<E>, mask: &Mask<E>) -> Result<Self> {
        self.species().check(s.species())?;
        mask.check_species(self.species())?;
        s.first_exceptional(Some(mask))?;
        let lanes = self.as_slice();
        let bits = mask.as_slice();
        Ok(Self::from_fn(self.species(), |i| {
            if bits[i] {
                lanes[s.as_slice()[i] as usize]
            } else {
                E::zero()
            }
        }))
    }

    /// Valid lanes of `s` gather from `self`, exceptional lanes from `other`
    /// at the wrapped index.
    pub fn rearrange_with(&self, s: &Shuffle<E>, other: &Self) -> Result<Self> {
        self.species().check(s.species())?;
        self.species().check(other.species())?;
        let n = self.length() as i32;
        let (ours, theirs) = (self.as_slice(), other.as_slice());
        Ok(Self::from_fn(self.species(), |i| match s.as_slice()[i] {
            j if j >= 0 => ours[j as usize],
            j => theirs[(j + n) as usize],
        }))
    }

    /// Uses this vector's lanes as checked indices into `source`.
    pub fn select_from(&self, source: &Self) -> Result<Self> {
        source.rearrange(&self.to_shuffle(IndexPolicy::Check))
    }

    /// `v'[(i + j) mod n] = v[i]`, with `j` taken modulo `n`.
    pub fn rotate_lanes_left(&self, j: i64) -> Self {
        let n = self.length() as i64;
        self.gather(&self.rotation(-j.rem_euclid(n)))
    }

    /// `v'[i] = v[(i + j) mod n]`, with `j` taken modulo `n`.
    pub fn rotate_lanes_right(&self, j: i64) -> Self {
        let n = self.length() as i64;
        self.gather(&self.rotation(j.rem_euclid(n)))
    }

    /// [`rotate_lanes_left`](Self::rotate_lanes_left) with the wrapped lanes
    /// zeroed.
    pub fn shift_lanes_left(&self, j: i64) -> Result<Self> {
        let j = self.lane_shift(j)?;
        let moved = self.rotate_lanes_left(j as i64);
        let keep = Mask::from_fn(self.species(), |i| i >= j);
        Self::zero(self.species()).blend(&moved, &keep)
    }

    /// [`rotate_lanes_right`](Self::rotate_lanes_right) with the wrapped
    /// lanes zeroed.
    pub fn shift_lanes_right(&self, j: i64) -> Result<Self> {
        let j = self.lane_shift(j)?;
        let moved = self.rotate_lanes_right(j as i64);
        let n = self.length();
        let keep = Mask::from_fn(self.species(), |i| i + j < n);
        Self::zero(self.species()).blend(&moved, &keep)
    }

    /// Lanes `origin..n` of `self` followed by lanes `0..origin` of `background`.
    pub fn slice_with(&self, origin: usize, background: &Self) -> Result<Self> {
        self.species().check(background.species())?;
        let n = self.length();
        let origin = check_index(origin as i64, n, "slice origin")?;
        let s = self.rotation(origin as i64);
        let head = Mask::from_fn(self.species(), |i| i < n - origin);
        background.gather(&s).blend(&self.gather(&s), &head)
    }

    /// [`slice_with`](Self::slice_with) against zero.
    pub fn slice(&self, origin: usize) -> Result<Self> {
        self.slice_with(origin, &Self::zero(self.species()))
    }

    /// Inserts `self` into `background` at `origin`. Part 0 fills lanes
    /// `origin..n` with the leading lanes of `self`; part 1 fills lanes
    /// `0..origin` with its trailing lanes.
    pub fn unslice_into(&self, origin: usize, background: &Self, part: usize) -> Result<Self> {
        let mask = self.unslice_mask(origin, background, part)?;
        background.blend(&self.gather(&self.rotation(-(origin as i64))), &mask)
    }

    /// Like [`unslice_into`](Self::unslice_into), inserting only lanes of
    /// `self` that are set in `mask`.
    pub fn unslice_into_masked(
        &self,
        origin: usize,
        background: &Self,
        part: usize,
        mask: &Mask<E>,
    ) -> Result<Self> {
        mask.check_species(self.species())?;
        let position = self.unslice_mask(origin, background, part)?;
        let s = self.rotation(-(origin as i64));
        let bits = mask.as_slice();
        let insert = Mask::from_fn(self.species(), |i| {
            position.as_slice()[i] && bits[s.as_slice()[i] as usize]
        });
        background.blend(&self.gather(&s), &insert)
    }

    /// [`unslice_into`](Self::unslice_into) against zero, part 0.
    pub fn unslice(&self, origin: usize) -> Result<Self> {
        self.unslice_into(origin, &Self::zero(self.species()), 0)
    }

    fn unslice_mask(&self, origin: usize, background: &Self, part: usize) -> Result<Mask<E>> {
        self.species().check(background.species())?;
        let origin = check_index(origin as i64, self.length(), "unslice origin")?;
        match check_index(part as i64, 2, "unslice part")? {
            0 => Ok(Mask::from_fn(self.species(), |i| i >= origin)),
            _ => Ok(Mask::from_fn(self.species(), |i| i < origin)),
        }
    }

    fn lane_shift(&self, j: i64) -> Result<usize> {
        if j < 0 {
            return Err(illegal_argument(format!("lane shift must be non-negative, got {j}")));
        }
        Ok(j.min(self.length() as i64) as usize)
    }

    /// Wrapping iota shuffle starting at `start`.
    fn rotation(&self, start: i64) -> Shuffle<E> {
        Shuffle::from_fn(self.species(), |i| start + i as i64, IndexPolicy::Wrap)
    }

    /// Gathers through a shuffle known to hold only valid indices.
    fn gather(&self, s: &Shuffle<E>) -> Self {
        let lanes = self.as_slice();
        Self::from_fn(self.species(), |i| lanes[s.as_slice()[i] as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;
    use crate::species::VectorSpecies;

    fn int4(values: [i32; 4]) -> Vector<i32> {
        Vector::from_slice(VectorSpecies::of(Shape::S128), &values, 0).unwrap()
    }

    mod rearrange {
        use super::*;

        #[test]
        fn test_rearrange_policies() {
            let v = int4([10, 20, 30, 40]);
            let wrap = Shuffle::from_values(v.species(), &[3, 5, -1, 0], IndexPolicy::Wrap).unwrap();
            assert_eq!(v.rearrange(&wrap).unwrap().to_vec(), vec![40, 20, 40, 10]);

            let check = Shuffle::from_values(v.species(), &[3, 5, 1, 0], IndexPolicy::Check).unwrap();
            assert!(v.rearrange(&check).is_err());
            let skip = Mask::from_bits(v.species(), 0b1101);
            assert_eq!(v.rearrange_masked(&check, &skip).unwrap().to_vec(), vec![40, 0, 20, 10]);
            assert!(v.rearrange_masked(&check, &Mask::splat(v.species(), true)).is_err());
        }

        #[test]
        fn test_rearrange_with_second_vector() {
            let a = int4([1, 2, 3, 4]);
            let b = int4([5, 6, 7, 8]);
            let s = Shuffle::zip(a.species(), 0).unwrap();
            assert_eq!(a.rearrange_with(&s, &b).unwrap().to_vec(), vec![1, 5, 2, 6]);
            let s = Shuffle::unzip(a.species(), 1).unwrap();
            assert_eq!(a.rearrange_with(&s, &b).unwrap().to_vec(), vec![2, 4, 6, 8]);
        }

        #[test]
        fn test_select_from() {
            let idx = int4([2, 2, 0, 3]);
            let src = int4([9, 8, 7, 6]);
            assert_eq!(idx.select_from(&src).unwrap().to_vec(), vec![7, 7, 9, 6]);
            assert!(int4([4, 0, 0, 0]).select_from(&src).is_err());
        }
    }

    mod movement {
        use super::*;

        #[test]
        fn test_rotate() {
            let v = int4([1, 2, 3, 4]);
            assert_eq!(v.rotate_lanes_left(1).to_vec(), vec![4, 1, 2, 3]);
            assert_eq!(v.rotate_lanes_right(1).to_vec(), vec![2, 3, 4, 1]);
            assert_eq!(v.rotate_lanes_left(-1), v.rotate_lanes_right(1));
            assert_eq!(v.rotate_lanes_left(4), v);
        }

        #[test]
        fn test_shift_lanes() {
            let v = int4([1, 2, 3, 4]);
            assert_eq!(v.shift_lanes_left(1).unwrap().to_vec(), vec![0, 1, 2, 3]);
            assert_eq!(v.shift_lanes_right(1).unwrap().to_vec(), vec![2, 3, 4, 0]);
            assert_eq!(v.shift_lanes_left(9).unwrap().to_vec(), vec![0; 4]);
            assert_eq!(v.shift_lanes_right(0).unwrap(), v);
            assert!(v.shift_lanes_left(-1).is_err());
        }

        #[test]
        fn test_slice_and_unslice() {
            let v = int4([1, 2, 3, 4]);
            let sliced = v.slice(2).unwrap();
            assert_eq!(sliced.to_vec(), vec![3, 4, 0, 0]);
            assert_eq!(sliced.unslice(2).unwrap().to_vec(), vec![0, 0, 3, 4]);
            assert!(v.slice(4).is_err());

            let w = int4([5, 6, 7, 8]);
            assert_eq!(v.slice_with(1, &w).unwrap().to_vec(), vec![2, 3, 4, 5]);
            assert_eq!(v.unslice_into(1, &w, 0).unwrap().to_vec(), vec![5, 1, 2, 3]);
            assert_eq!(v.unslice_into(1, &w, 1).unwrap().to_vec(), vec![4, 6, 7, 8]);
            assert!(v.unslice_into(1, &w, 2).is_err());
        }

        #[test]
        fn test_unslice_masked() {
            let v = int4([1, 2, 3, 4]);
            let w = int4([5, 6, 7, 8]);
            let m = Mask::from_bits(v.species(), 0b0101);
            assert_eq!(v.unslice_into_masked(1, &w, 0, &m).unwrap().to_vec(), vec![5, 1, 7, 3]);
        }
    }
}
