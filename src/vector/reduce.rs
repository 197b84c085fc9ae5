use crate::element::Element;
use crate::error::Result;
use crate::mask::Mask;
use crate::ops::AssociativeOp;

use super::Vector;

impl<E: Element> Vector<E> {
    /// Folds every lane with `op`, seeded with its identity.
    ///
    /// Lanes may be combined in any order, so floating `Add`/`Mul` results
    /// are only as exact as that order allows.
    pub fn reduce_lanes(&self, op: AssociativeOp) -> Result<E> {
        op.check(E::KIND)?;
        Ok(fold(op, self.as_slice().iter().copied()))
    }

    /// Like [`reduce_lanes`](Self::reduce_lanes) with the identity substituted
    /// into every unset lane of `mask`.
    pub fn reduce_lanes_masked(&self, op: AssociativeOp, mask: &Mask<E>) -> Result<E> {
        op.check(E::KIND)?;
        mask.check_species(self.species())?;
        let identity = op.identity::<E>();
        Ok(fold(
            op,
            self.as_slice()
                .iter()
                .zip(mask.as_slice())
                .map(|(&lane, &set)| if set { lane } else { identity }),
        ))
    }
}

#[inline(always)]
fn fold<E: Element>(op: AssociativeOp, lanes: impl Iterator<Item = E>) -> E {
    lanes.fold(op.identity(), |acc, lane| op.combine(acc, lane))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;
    use crate::species::VectorSpecies;

    #[test]
    fn test_reduce_base_cases() {
        let s = VectorSpecies::<i16>::of(Shape::S256);
        assert_eq!(Vector::zero(s).reduce_lanes(AssociativeOp::Add).unwrap(), 0);
        assert_eq!(Vector::broadcast(s, 1).reduce_lanes(AssociativeOp::Mul).unwrap(), 1);
        assert_eq!(Vector::broadcast(s, -1).reduce_lanes(AssociativeOp::And).unwrap(), -1);
    }

    #[test]
    fn test_reduce_operators() {
        let s = VectorSpecies::<i32>::of(Shape::S128);
        let v = Vector::from_slice(s, &[3, -5, 12, 6], 0).unwrap();
        assert_eq!(v.reduce_lanes(AssociativeOp::Add).unwrap(), 16);
        assert_eq!(v.reduce_lanes(AssociativeOp::Mul).unwrap(), -1080);
        assert_eq!(v.reduce_lanes(AssociativeOp::Min).unwrap(), -5);
        assert_eq!(v.reduce_lanes(AssociativeOp::Max).unwrap(), 12);
        assert_eq!(v.reduce_lanes(AssociativeOp::Or).unwrap(), 3 | -5 | 12 | 6);
        assert_eq!(v.reduce_lanes(AssociativeOp::Xor).unwrap(), 3 ^ -5 ^ 12 ^ 6);
    }

    #[test]
    fn test_masked_reduction_substitutes_identity() {
        let s = VectorSpecies::<i32>::of(Shape::S128);
        let v = Vector::from_slice(s, &[3, -5, 12, 6], 0).unwrap();
        let m = Mask::from_bits(s, 0b1001);
        assert_eq!(v.reduce_lanes_masked(AssociativeOp::Add, &m).unwrap(), 9);
        assert_eq!(v.reduce_lanes_masked(AssociativeOp::Mul, &m).unwrap(), 18);
        assert_eq!(v.reduce_lanes_masked(AssociativeOp::Min, &m).unwrap(), 3);
        let none = Mask::splat(s, false);
        assert_eq!(v.reduce_lanes_masked(AssociativeOp::Max, &none).unwrap(), i32::MIN);
        assert_eq!(v.reduce_lanes_masked(AssociativeOp::And, &none).unwrap(), -1);
    }

    #[test]
    fn test_float_reductions() {
        let s = VectorSpecies::<f64>::of(Shape::S256);
        let v = Vector::from_slice(s, &[1.5, -2.0, 4.0, 0.5], 0).unwrap();
        assert_eq!(v.reduce_lanes(AssociativeOp::Add).unwrap(), 4.0);
        assert_eq!(v.reduce_lanes(AssociativeOp::Max).unwrap(), 4.0);
        let none = Mask::splat(s, false);
        assert_eq!(
            v.reduce_lanes_masked(AssociativeOp::Min, &none).unwrap(),
            f64::INFINITY
        );
        assert!(v.reduce_lanes(AssociativeOp::Xor).is_err());
    }
}
