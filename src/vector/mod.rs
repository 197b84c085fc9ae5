//! The generic vector and its lane-wise operation engine.
//!
//! [`Vector`] is one implementation shared by all thirty species. Every
//! operation comes in two flavours:
//!
//! * closure based (`unary_op`, `binary_op`, `ternary_op`), the portable
//!   reference semantics;
//! * symbolic (`lanewise*`), which validates an operator tag against the
//!   element kind and offers it to the accelerator in [`crate::simd`] before
//!   falling back to the closure path.
//!
//! Masked forms follow one rule: a lane whose mask bit is clear is a copy of
//! the first operand.

mod convert;
mod memory;
mod permute;
mod reduce;

use std::fmt;
use std::ops;
use std::sync::Arc;

use crate::element::Element;
use crate::error::{arithmetic_error, check_index, Result};
use crate::mask::Mask;
use crate::ops::{BinaryOp, Comparison, LaneTest, TernaryOp, UnaryOp};
use crate::shuffle::{IndexPolicy, Shuffle};
use crate::simd;
use crate::species::VectorSpecies;

/// An immutable sequence of `species.length()` lanes.
#[derive(Clone)]
pub struct Vector<E: Element> {
    species: VectorSpecies<E>,
    lanes: Arc<[E]>,
}

impl<E: Element> Vector<E> {
    pub(crate) fn from_lanes(species: VectorSpecies<E>, lanes: Vec<E>) -> Self {
        debug_assert_eq!(lanes.len(), species.length(), "lane count must match species");
        Self {
            species,
            lanes: lanes.into(),
        }
    }

    /// Builds a vector from a generator over lane indices.
    pub fn from_fn(species: VectorSpecies<E>, f: impl FnMut(usize) -> E) -> Self {
        Self::from_lanes(species, (0..species.length()).map(f).collect())
    }

    pub fn zero(species: VectorSpecies<E>) -> Self {
        Self::broadcast(species, E::zero())
    }

    /// Every lane set to `value`.
    pub fn broadcast(species: VectorSpecies<E>, value: E) -> Self {
        Self::from_lanes(species, vec![value; species.length()])
    }

    /// Lane `i` holds `i`.
    pub fn iota(species: VectorSpecies<E>) -> Self {
        Self::from_fn(species, |i| E::from_index(i as i64))
    }

    pub fn species(&self) -> VectorSpecies<E> {
        self.species
    }

    pub fn length(&self) -> usize {
        self.lanes.len()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.lanes
    }

    pub fn to_vec(&self) -> Vec<E> {
        self.lanes.to_vec()
    }

    pub fn lane(&self, index: usize) -> Result<E> {
        let i = check_index(index as i64, self.length(), "lane index")?;
        Ok(self.lanes[i])
    }

    /// Copy of this vector with lane `index` replaced.
    pub fn with_lane(&self, index: usize, value: E) -> Result<Self> {
        let i = check_index(index as i64, self.length(), "lane index")?;
        let mut lanes = self.to_vec();
        lanes[i] = value;
        Ok(Self::from_lanes(self.species, lanes))
    }

    /// Adds `i * scale` to lane `i`.
    pub fn add_index(&self, scale: i64) -> Self {
        self.unary_indexed(|i, a| a.lane_add(E::from_index(i as i64 * scale)))
    }

    /// Interprets the lanes as shuffle indices under `policy`.
    pub fn to_shuffle(&self, policy: IndexPolicy) -> Shuffle<E> {
        Shuffle::from_fn(self.species, |i| self.lanes[i].to_index(), policy)
    }

    // Closure engine.

    pub fn unary_op(&self, f: impl Fn(E) -> E) -> Self {
        Self::from_lanes(self.species, self.lanes.iter().map(|&a| f(a)).collect())
    }

    pub fn unary_op_masked(&self, mask: &Mask<E>, f: impl Fn(E) -> E) -> Result<Self> {
        mask.check_species(self.species)?;
        let bits = mask.as_slice();
        Ok(self.unary_indexed(|i, a| if bits[i] { f(a) } else { a }))
    }

    pub fn binary_op(&self, other: &Self, f: impl Fn(E, E) -> E) -> Result<Self> {
        self.species.check(other.species)?;
        Ok(self.zip_with(other, f))
    }

    pub fn binary_op_masked(
        &self,
        other: &Self,
        mask: &Mask<E>,
        f: impl Fn(E, E) -> E,
    ) -> Result<Self> {
        self.species.check(other.species)?;
        mask.check_species(self.species)?;
        let bits = mask.as_slice();
        Ok(self.unary_indexed(|i, a| if bits[i] { f(a, other.lanes[i]) } else { a }))
    }

    pub fn ternary_op(&self, b: &Self, c: &Self, f: impl Fn(E, E, E) -> E) -> Result<Self> {
        self.species.check(b.species)?;
        self.species.check(c.species)?;
        Ok(self.unary_indexed(|i, a| f(a, b.lanes[i], c.lanes[i])))
    }

    pub fn ternary_op_masked(
        &self,
        b: &Self,
        c: &Self,
        mask: &Mask<E>,
        f: impl Fn(E, E, E) -> E,
    ) -> Result<Self> {
        self.species.check(b.species)?;
        self.species.check(c.species)?;
        mask.check_species(self.species)?;
        let bits = mask.as_slice();
        Ok(self.unary_indexed(|i, a| if bits[i] { f(a, b.lanes[i], c.lanes[i]) } else { a }))
    }

    // Symbolic dispatch.

    pub fn lanewise_unary(&self, op: UnaryOp) -> Result<Self> {
        op.check(E::KIND)?;
        Ok(self.unary_op(|a| op.apply(a)))
    }

    pub fn lanewise_unary_masked(&self, op: UnaryOp, mask: &Mask<E>) -> Result<Self> {
        op.check(E::KIND)?;
        self.unary_op_masked(mask, |a| op.apply(a))
    }

    pub fn lanewise(&self, op: BinaryOp, other: &Self) -> Result<Self> {
        self.species.check(other.species)?;
        op.check(E::KIND)?;
        if op == BinaryOp::Div {
            check_divisors(&other.lanes, None)?;
        }
        let lanes = simd::dispatch_binary(op, &self.lanes, &other.lanes, || {
            self.lanes
                .iter()
                .zip(other.lanes.iter())
                .map(|(&a, &b)| op.apply(a, b))
                .collect()
        });
        Ok(Self::from_lanes(self.species, lanes))
    }

    pub fn lanewise_masked(&self, op: BinaryOp, other: &Self, mask: &Mask<E>) -> Result<Self> {
        self.species.check(other.species)?;
        mask.check_species(self.species)?;
        op.check(E::KIND)?;
        if op == BinaryOp::Div {
            check_divisors(&other.lanes, Some(mask.as_slice()))?;
        }
        self.binary_op_masked(other, mask, |a, b| op.apply(a, b))
    }

    /// `lanewise` against a broadcast of `value`.
    pub fn lanewise_scalar(&self, op: BinaryOp, value: E) -> Result<Self> {
        self.lanewise(op, &Self::broadcast(self.species, value))
    }

    pub fn lanewise_ternary(&self, op: TernaryOp, b: &Self, c: &Self) -> Result<Self> {
        op.check(E::KIND)?;
        self.ternary_op(b, c, |x, y, z| op.apply(x, y, z))
    }

    pub fn lanewise_ternary_masked(
        &self,
        op: TernaryOp,
        b: &Self,
        c: &Self,
        mask: &Mask<E>,
    ) -> Result<Self> {
        op.check(E::KIND)?;
        self.ternary_op_masked(b, c, mask, |x, y, z| op.apply(x, y, z))
    }

    pub fn add(&self, other: &Self) -> Result<Self> {
        self.lanewise(BinaryOp::Add, other)
    }

    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.lanewise(BinaryOp::Sub, other)
    }

    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.lanewise(BinaryOp::Mul, other)
    }

    /// Fails with an arithmetic error if an integral divisor lane is zero.
    pub fn div(&self, other: &Self) -> Result<Self> {
        self.lanewise(BinaryOp::Div, other)
    }

    pub fn min(&self, other: &Self) -> Result<Self> {
        self.lanewise(BinaryOp::Min, other)
    }

    pub fn max(&self, other: &Self) -> Result<Self> {
        self.lanewise(BinaryOp::Max, other)
    }

    pub fn and(&self, other: &Self) -> Result<Self> {
        self.lanewise(BinaryOp::And, other)
    }

    pub fn or(&self, other: &Self) -> Result<Self> {
        self.lanewise(BinaryOp::Or, other)
    }

    pub fn xor(&self, other: &Self) -> Result<Self> {
        self.lanewise(BinaryOp::Xor, other)
    }

    pub fn add_masked(&self, other: &Self, mask: &Mask<E>) -> Result<Self> {
        self.lanewise_masked(BinaryOp::Add, other, mask)
    }

    pub fn sub_masked(&self, other: &Self, mask: &Mask<E>) -> Result<Self> {
        self.lanewise_masked(BinaryOp::Sub, other, mask)
    }

    pub fn mul_masked(&self, other: &Self, mask: &Mask<E>) -> Result<Self> {
        self.lanewise_masked(BinaryOp::Mul, other, mask)
    }

    pub fn div_masked(&self, other: &Self, mask: &Mask<E>) -> Result<Self> {
        self.lanewise_masked(BinaryOp::Div, other, mask)
    }

    pub fn neg(&self) -> Self {
        self.unary_op(E::lane_neg)
    }

    pub fn abs(&self) -> Self {
        self.unary_op(E::lane_abs)
    }

    pub fn not(&self) -> Result<Self> {
        self.lanewise_unary(UnaryOp::Not)
    }

    /// Bitwise shift of every lane; the count is taken modulo the lane width.
    pub fn shift_left(&self, count: i64) -> Result<Self> {
        self.lanewise_scalar(BinaryOp::Shl, E::from_index(count))
    }

    pub fn shift_right_logical(&self, count: i64) -> Result<Self> {
        self.lanewise_scalar(BinaryOp::Lshr, E::from_index(count))
    }

    pub fn shift_right_arithmetic(&self, count: i64) -> Result<Self> {
        self.lanewise_scalar(BinaryOp::Ashr, E::from_index(count))
    }

    /// Fused multiply-add `self * b + c`.
    pub fn fma(&self, b: &Self, c: &Self) -> Result<Self> {
        self.lanewise_ternary(TernaryOp::Fma, b, c)
    }

    // Comparisons and tests.

    pub fn compare(&self, op: Comparison, other: &Self) -> Result<Mask<E>> {
        self.species.check(other.species)?;
        Ok(Mask::from_fn(self.species, |i| op.test(self.lanes[i], other.lanes[i])))
    }

    /// Unset lanes of `mask` compare false.
    pub fn compare_masked(&self, op: Comparison, other: &Self, mask: &Mask<E>) -> Result<Mask<E>> {
        self.compare(op, other)?.and(mask)
    }

    pub fn compare_scalar(&self, op: Comparison, value: E) -> Mask<E> {
        Mask::from_fn(self.species, |i| op.test(self.lanes[i], value))
    }

    pub fn test(&self, op: LaneTest) -> Mask<E> {
        Mask::from_fn(self.species, |i| op.test(self.lanes[i]))
    }

    pub fn test_masked(&self, op: LaneTest, mask: &Mask<E>) -> Result<Mask<E>> {
        self.test(op).and(mask)
    }

    /// Lane `i` is `other[i]` where `mask[i]` is set, else `self[i]`.
    pub fn blend(&self, other: &Self, mask: &Mask<E>) -> Result<Self> {
        self.species.check(other.species)?;
        mask.check_species(self.species)?;
        let bits = mask.as_slice();
        Ok(self.unary_indexed(|i, a| if bits[i] { other.lanes[i] } else { a }))
    }

    fn zip_with(&self, other: &Self, f: impl Fn(E, E) -> E) -> Self {
        Self::from_lanes(
            self.species,
            self.lanes
                .iter()
                .zip(other.lanes.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        )
    }

    fn unary_indexed(&self, f: impl Fn(usize, E) -> E) -> Self {
        Self::from_lanes(
            self.species,
            self.lanes.iter().enumerate().map(|(i, &a)| f(i, a)).collect(),
        )
    }
}

/// Rejects zero integral divisors in the active lanes.
pub(crate) fn check_divisors<E: Element>(divisors: &[E], active: Option<&[bool]>) -> Result<()> {
    if E::KIND.is_floating() {
        return Ok(());
    }
    let zero_lane = divisors
        .iter()
        .enumerate()
        .find(|&(i, d)| d.is_default() && active.map_or(true, |bits| bits[i]));
    match zero_lane {
        Some((lane, _)) => Err(arithmetic_error(format!("division by zero in lane {lane}"))),
        None => Ok(()),
    }
}

impl<E: Element> PartialEq for Vector<E> {
    fn eq(&self, other: &Self) -> bool {
        self.species == other.species && self.lanes == other.lanes
    }
}

impl<E: Element> fmt::Debug for Vector<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("species", &self.species)
            .field("lanes", &&self.lanes[..])
            .finish()
    }
}

macro_rules! impl_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        /// # Panics
        ///
        /// Panics if the operands have different species.
        impl<E: Element> ops::$trait for &Vector<E> {
            type Output = Vector<E>;

            fn $method(self, rhs: Self) -> Vector<E> {
                match self.lanewise($op, rhs) {
                    Ok(v) => v,
                    Err(e) => panic!("{e}"),
                }
            }
        }
    };
}

impl_operator!(Add, add, BinaryOp::Add);
impl_operator!(Sub, sub, BinaryOp::Sub);
impl_operator!(Mul, mul, BinaryOp::Mul);

impl<E: Element> ops::Neg for &Vector<E> {
    type Output = Vector<E>;

    fn neg(self) -> Vector<E> {
        Vector::neg(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;

    fn int4(values: [i32; 4]) -> Vector<i32> {
        Vector::from_slice(VectorSpecies::of(Shape::S128), &values, 0).unwrap()
    }

    mod engine {
        use super::*;

        #[test]
        fn test_canonical_vectors() {
            let s = VectorSpecies::<i32>::of(Shape::S128);
            assert_eq!(Vector::zero(s).to_vec(), vec![0; 4]);
            assert_eq!(Vector::iota(s).to_vec(), vec![0, 1, 2, 3]);
            assert_eq!(Vector::broadcast(s, 7).to_vec(), vec![7; 4]);
            assert_eq!(Vector::iota(s).add_index(2).to_vec(), vec![0, 3, 6, 9]);
        }

        #[test]
        fn test_byte_iota_holds_lane_index_at_every_width() {
            for shape in Shape::ALL {
                let s = VectorSpecies::<i8>::of(shape);
                let v = Vector::iota(s);
                for i in 0..s.length() {
                    assert_eq!(v.lane(i).unwrap() as usize, i);
                }
                assert_eq!(v.select_from(&v).unwrap(), v);
            }
        }

        #[test]
        fn test_lane_access() {
            let v = int4([1, 2, 3, 4]);
            assert_eq!(v.lane(2).unwrap(), 3);
            assert!(v.lane(4).is_err());
            assert_eq!(v.with_lane(0, 9).unwrap().to_vec(), vec![9, 2, 3, 4]);
            assert_eq!(v.to_vec(), vec![1, 2, 3, 4]);
        }

        #[test]
        fn test_masked_passthrough_copies_first_operand() {
            let a = int4([1, 2, 3, 4]);
            let b = int4([10, 20, 30, 40]);
            let m = Mask::from_bits(a.species(), 0b0101);
            assert_eq!(a.add_masked(&b, &m).unwrap().to_vec(), vec![11, 2, 33, 4]);
            let t = a.ternary_op_masked(&b, &b, &m, |x, y, z| x + y + z).unwrap();
            assert_eq!(t.to_vec(), vec![21, 2, 63, 4]);
            let u = a.lanewise_unary_masked(UnaryOp::Neg, &m).unwrap();
            assert_eq!(u.to_vec(), vec![-1, 2, -3, 4]);
        }

        #[test]
        fn test_species_mismatch() {
            let a = int4([1, 2, 3, 4]);
            let b = Vector::<i32>::zero(VectorSpecies::of(Shape::S256));
            assert!(a.add(&b).is_err());
            assert!(a.compare(Comparison::Eq, &b).is_err());
        }
    }

    mod operators {
        use super::*;

        #[test]
        fn test_integral_division() {
            let a = int4([7, -7, i32::MIN, 9]);
            let b = int4([2, 2, -1, 3]);
            assert_eq!(a.div(&b).unwrap().to_vec(), vec![3, -3, i32::MIN, 3]);

            let zero = int4([1, 0, 1, 1]);
            assert!(a.div(&zero).is_err());
            let m = Mask::from_bits(a.species(), 0b1101);
            assert_eq!(a.div_masked(&zero, &m).unwrap().to_vec(), vec![7, -7, i32::MIN, 9]);
        }

        #[test]
        fn test_float_division_by_zero_is_infinite() {
            let s = VectorSpecies::<f64>::of(Shape::S128);
            let v = Vector::broadcast(s, 1.0).div(&Vector::zero(s)).unwrap();
            assert!(v.test(LaneTest::IsInfinite).all_true());
        }

        #[test]
        fn test_bitwise_on_floats_rejected() {
            let s = VectorSpecies::<f32>::of(Shape::S128);
            assert!(Vector::zero(s).and(&Vector::zero(s)).is_err());
            assert!(Vector::zero(s).shift_left(1).is_err());
            assert!(Vector::zero(s).not().is_err());
        }

        #[test]
        fn test_shifts() {
            let v = int4([1, -16, 3, -1]);
            assert_eq!(v.shift_left(33).unwrap().to_vec(), vec![2, -32, 6, -2]);
            assert_eq!(v.shift_right_arithmetic(2).unwrap().to_vec(), vec![0, -4, 0, -1]);
            assert_eq!(
                v.shift_right_logical(28).unwrap().to_vec(),
                vec![0, 15, 0, 15]
            );
        }

        #[test]
        fn test_ternary() {
            let s = VectorSpecies::<f32>::of(Shape::S64);
            let a = Vector::broadcast(s, 2.0);
            let r = a.fma(&a, &Vector::broadcast(s, 1.0)).unwrap();
            assert_eq!(r.to_vec(), vec![5.0, 5.0]);
            assert!(int4([0; 4]).fma(&int4([0; 4]), &int4([0; 4])).is_err());

            let blended = int4([0b1100; 4])
                .lanewise_ternary(TernaryOp::BitwiseBlend, &int4([0b1010; 4]), &int4([0b0110; 4]))
                .unwrap();
            assert_eq!(blended.to_vec(), vec![0b1010; 4]);
        }

        #[test]
        fn test_operator_sugar() {
            let a = int4([1, 2, 3, 4]);
            let b = int4([4, 3, 2, 1]);
            assert_eq!((&a + &b).to_vec(), vec![5; 4]);
            assert_eq!((&a - &b).to_vec(), vec![-3, -1, 1, 3]);
            assert_eq!((&a * &b).to_vec(), vec![4, 6, 6, 4]);
            assert_eq!((-&a).to_vec(), vec![-1, -2, -3, -4]);
        }

        #[test]
        #[should_panic(expected = "Species mismatch")]
        fn test_operator_sugar_panics_on_mismatch() {
            let a = int4([1, 2, 3, 4]);
            let b = Vector::<i32>::zero(VectorSpecies::of(Shape::S64));
            let _ = &a + &b;
        }
    }

    mod compare {
        use super::*;

        #[test]
        fn test_compare_forms() {
            let a = int4([1, 5, 3, 7]);
            let b = int4([2, 5, 1, 8]);
            assert_eq!(a.compare(Comparison::Lt, &b).unwrap().to_bits().unwrap(), 0b1001);
            assert_eq!(a.compare(Comparison::Ge, &b).unwrap().to_bits().unwrap(), 0b0110);
            assert_eq!(a.compare_scalar(Comparison::Gt, 4).to_bits().unwrap(), 0b1010);
            let m = Mask::from_bits(a.species(), 0b0011);
            assert_eq!(
                a.compare_masked(Comparison::Le, &b, &m).unwrap().to_bits().unwrap(),
                0b0011
            );
        }

        #[test]
        fn test_lane_tests() {
            let s = VectorSpecies::<f32>::of(Shape::S128);
            let v = Vector::from_slice(s, &[0.0, -0.0, f32::NAN, f32::NEG_INFINITY], 0).unwrap();
            assert_eq!(v.test(LaneTest::IsDefault).to_bits().unwrap(), 0b0001);
            assert_eq!(v.test(LaneTest::IsNegative).to_bits().unwrap(), 0b1010);
            assert_eq!(v.test(LaneTest::IsNaN).to_bits().unwrap(), 0b0100);
            assert_eq!(v.test(LaneTest::IsFinite).to_bits().unwrap(), 0b0011);
            let m = Mask::from_bits(s, 0b1000);
            assert_eq!(v.test_masked(LaneTest::IsInfinite, &m).unwrap().to_bits().unwrap(), 0b1000);
        }

        #[test]
        fn test_blend() {
            let a = int4([1, 2, 3, 4]);
            let b = int4([5, 6, 7, 8]);
            let m = Mask::from_bits(a.species(), 0b0110);
            assert_eq!(a.blend(&b, &m).unwrap().to_vec(), vec![1, 6, 7, 4]);
        }
    }
}
