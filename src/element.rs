//! The lane element trait.
//!
//! [`Element`] is implemented for exactly the six lane types of
//! [`ElementKind`]. It supplies the scalar kernel of every lane-wise operator,
//! the numeric conversion rules used by casts and the native-order byte codec
//! used by reinterpretation. The generic vector code never inspects the
//! concrete type beyond these methods.

use std::fmt::Debug;

use num::traits::{Bounded, One, Zero};

use crate::ops::BinaryOp;
use crate::shape::ElementKind;

mod sealed {
    pub trait Sealed {}
}

/// A lane value widened to one of the two scalar domains.
///
/// Casting goes through this type: the source lane widens losslessly, then
/// the target narrows with its own rules.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LaneValue {
    Integral(i64),
    Floating(f64),
}

/// A primitive lane type.
///
/// Integral arithmetic wraps. Floating `min`/`max` propagate NaN and order
/// `-0.0` below `+0.0`. Shift counts are taken modulo the lane bit width.
pub trait Element:
    sealed::Sealed
    + Copy
    + Debug
    + Default
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + Zero
    + One
    + Bounded
    + 'static
{
    /// The element kind tag of this lane type.
    const KIND: ElementKind;

    /// The value with every bit set (`-1` for integral lanes).
    fn all_ones() -> Self;

    /// The largest value, `+inf` for floating lanes.
    fn highest() -> Self;

    /// The smallest value, `-inf` for floating lanes.
    fn lowest() -> Self;

    /// Converts a lane index, wrapping for narrow integral lanes.
    fn from_index(index: i64) -> Self;

    /// Converts the lane to a shuffle index (floating lanes truncate).
    fn to_index(self) -> i64;

    fn to_lane_value(self) -> LaneValue;

    fn from_lane_value(value: LaneValue) -> Self;

    /// Writes the lane in native byte order. `out` holds exactly one lane.
    fn write_ne(self, out: &mut [u8]);

    /// Reads a lane in native byte order. `bytes` holds at least one lane.
    fn read_ne(bytes: &[u8]) -> Self;

    #[doc(hidden)]
    fn lane_add(self, rhs: Self) -> Self;
    #[doc(hidden)]
    fn lane_sub(self, rhs: Self) -> Self;
    #[doc(hidden)]
    fn lane_mul(self, rhs: Self) -> Self;
    #[doc(hidden)]
    fn lane_div(self, rhs: Self) -> Self;
    #[doc(hidden)]
    fn lane_min(self, rhs: Self) -> Self;
    #[doc(hidden)]
    fn lane_max(self, rhs: Self) -> Self;
    #[doc(hidden)]
    fn lane_neg(self) -> Self;
    #[doc(hidden)]
    fn lane_abs(self) -> Self;
    #[doc(hidden)]
    fn lane_not(self) -> Self;
    #[doc(hidden)]
    fn lane_and(self, rhs: Self) -> Self;
    #[doc(hidden)]
    fn lane_or(self, rhs: Self) -> Self;
    #[doc(hidden)]
    fn lane_xor(self, rhs: Self) -> Self;
    #[doc(hidden)]
    fn lane_shl(self, count: Self) -> Self;
    #[doc(hidden)]
    fn lane_lshr(self, count: Self) -> Self;
    #[doc(hidden)]
    fn lane_ashr(self, count: Self) -> Self;
    #[doc(hidden)]
    fn lane_fma(self, b: Self, c: Self) -> Self;

    /// All bits clear (`-0.0` is not default).
    fn is_default(self) -> bool;
    /// Sign bit set.
    fn is_negative(self) -> bool;
    fn is_finite(self) -> bool;
    fn is_nan(self) -> bool;
    fn is_infinite(self) -> bool;

    /// Accelerated binary kernel over whole lane arrays, if the host has one.
    ///
    /// Must return results bit-identical to the scalar kernels or `None`.
    #[doc(hidden)]
    fn accelerate_binary(op: BinaryOp, a: &[Self], b: &[Self]) -> Option<Vec<Self>>;
}

macro_rules! impl_integral {
    ($t:ty, $kind:ident, $unsigned:ty, $accel:path) => {
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const KIND: ElementKind = ElementKind::$kind;

            #[inline(always)]
            fn all_ones() -> Self {
                -1
            }

            #[inline(always)]
            fn highest() -> Self {
                <$t>::MAX
            }

            #[inline(always)]
            fn lowest() -> Self {
                <$t>::MIN
            }

            #[inline(always)]
            fn from_index(index: i64) -> Self {
                index as $t
            }

            #[inline(always)]
            fn to_index(self) -> i64 {
                self as i64
            }

            #[inline(always)]
            fn to_lane_value(self) -> LaneValue {
                LaneValue::Integral(self as i64)
            }

            #[inline(always)]
            fn from_lane_value(value: LaneValue) -> Self {
                match value {
                    LaneValue::Integral(v) => v as $t,
                    // Narrow through int first; keeps the low bits of the
                    // saturated 32-bit result for byte and short lanes.
                    LaneValue::Floating(v) => {
                        if <$t>::BITS <= 32 {
                            (v as i32) as $t
                        } else {
                            (v as i64) as $t
                        }
                    }
                }
            }

            #[inline(always)]
            fn write_ne(self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_ne_bytes());
            }

            #[inline(always)]
            fn read_ne(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(&bytes[..std::mem::size_of::<$t>()]);
                <$t>::from_ne_bytes(raw)
            }

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            #[inline(always)]
            fn lane_mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline(always)]
            fn lane_div(self, rhs: Self) -> Self {
                // Zero divisors are rejected before any lane is computed.
                if rhs == 0 {
                    0
                } else {
                    self.wrapping_div(rhs)
                }
            }

            #[inline(always)]
            fn lane_min(self, rhs: Self) -> Self {
                Ord::min(self, rhs)
            }

            #[inline(always)]
            fn lane_max(self, rhs: Self) -> Self {
                Ord::max(self, rhs)
            }

            #[inline(always)]
            fn lane_neg(self) -> Self {
                self.wrapping_neg()
            }

            #[inline(always)]
            fn lane_abs(self) -> Self {
                self.wrapping_abs()
            }

            #[inline(always)]
            fn lane_not(self) -> Self {
                !self
            }

            #[inline(always)]
            fn lane_and(self, rhs: Self) -> Self {
                self & rhs
            }

            #[inline(always)]
            fn lane_or(self, rhs: Self) -> Self {
                self | rhs
            }

            #[inline(always)]
            fn lane_xor(self, rhs: Self) -> Self {
                self ^ rhs
            }

            #[inline(always)]
            fn lane_shl(self, count: Self) -> Self {
                self.wrapping_shl((count as u32) & (<$t>::BITS - 1))
            }

            #[inline(always)]
            fn lane_lshr(self, count: Self) -> Self {
                ((self as $unsigned) >> ((count as u32) & (<$t>::BITS - 1))) as $t
            }

            #[inline(always)]
            fn lane_ashr(self, count: Self) -> Self {
                self >> ((count as u32) & (<$t>::BITS - 1))
            }

            #[inline(always)]
            fn lane_fma(self, b: Self, c: Self) -> Self {
                self.wrapping_mul(b).wrapping_add(c)
            }

            #[inline(always)]
            fn is_default(self) -> bool {
                self == 0
            }

            #[inline(always)]
            fn is_negative(self) -> bool {
                self < 0
            }

            #[inline(always)]
            fn is_finite(self) -> bool {
                true
            }

            #[inline(always)]
            fn is_nan(self) -> bool {
                false
            }

            #[inline(always)]
            fn is_infinite(self) -> bool {
                false
            }

            #[inline(always)]
            fn accelerate_binary(op: BinaryOp, a: &[Self], b: &[Self]) -> Option<Vec<Self>> {
                $accel(op, a, b)
            }
        }
    };
}

macro_rules! impl_floating {
    ($t:ty, $kind:ident, $bits:ty, $accel:path) => {
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const KIND: ElementKind = ElementKind::$kind;

            #[inline(always)]
            fn all_ones() -> Self {
                <$t>::from_bits(<$bits>::MAX)
            }

            #[inline(always)]
            fn highest() -> Self {
                <$t>::INFINITY
            }

            #[inline(always)]
            fn lowest() -> Self {
                <$t>::NEG_INFINITY
            }

            #[inline(always)]
            fn from_index(index: i64) -> Self {
                index as $t
            }

            #[inline(always)]
            fn to_index(self) -> i64 {
                (self as i32) as i64
            }

            #[inline(always)]
            fn to_lane_value(self) -> LaneValue {
                LaneValue::Floating(self as f64)
            }

            #[inline(always)]
            fn from_lane_value(value: LaneValue) -> Self {
                match value {
                    LaneValue::Integral(v) => v as $t,
                    LaneValue::Floating(v) => v as $t,
                }
            }

            #[inline(always)]
            fn write_ne(self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_ne_bytes());
            }

            #[inline(always)]
            fn read_ne(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(&bytes[..std::mem::size_of::<$t>()]);
                <$t>::from_ne_bytes(raw)
            }

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline(always)]
            fn lane_mul(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline(always)]
            fn lane_div(self, rhs: Self) -> Self {
                self / rhs
            }

            #[inline(always)]
            fn lane_min(self, rhs: Self) -> Self {
                if self.is_nan() {
                    self
                } else if rhs.is_nan() {
                    rhs
                } else if self == rhs {
                    // Only differs for signed zeros.
                    if self.is_sign_negative() {
                        self
                    } else {
                        rhs
                    }
                } else if self < rhs {
                    self
                } else {
                    rhs
                }
            }

            #[inline(always)]
            fn lane_max(self, rhs: Self) -> Self {
                if self.is_nan() {
                    self
                } else if rhs.is_nan() {
                    rhs
                } else if self == rhs {
                    if self.is_sign_positive() {
                        self
                    } else {
                        rhs
                    }
                } else if self > rhs {
                    self
                } else {
                    rhs
                }
            }

            #[inline(always)]
            fn lane_neg(self) -> Self {
                -self
            }

            #[inline(always)]
            fn lane_abs(self) -> Self {
                self.abs()
            }

            #[inline(always)]
            fn lane_not(self) -> Self {
                <$t>::from_bits(!self.to_bits())
            }

            #[inline(always)]
            fn lane_and(self, rhs: Self) -> Self {
                <$t>::from_bits(self.to_bits() & rhs.to_bits())
            }

            #[inline(always)]
            fn lane_or(self, rhs: Self) -> Self {
                <$t>::from_bits(self.to_bits() | rhs.to_bits())
            }

            #[inline(always)]
            fn lane_xor(self, rhs: Self) -> Self {
                <$t>::from_bits(self.to_bits() ^ rhs.to_bits())
            }

            #[inline(always)]
            fn lane_shl(self, count: Self) -> Self {
                let shift = (count.to_bits() as u32) & (<$bits>::BITS - 1);
                <$t>::from_bits(self.to_bits().wrapping_shl(shift))
            }

            #[inline(always)]
            fn lane_lshr(self, count: Self) -> Self {
                let shift = (count.to_bits() as u32) & (<$bits>::BITS - 1);
                <$t>::from_bits(self.to_bits() >> shift)
            }

            #[inline(always)]
            fn lane_ashr(self, count: Self) -> Self {
                let shift = (count.to_bits() as u32) & (<$bits>::BITS - 1);
                let signed = self.to_bits() as i64;
                let width = <$bits>::BITS;
                let extended = (signed << (64 - width)) >> (64 - width);
                <$t>::from_bits((extended >> shift) as $bits)
            }

            #[inline(always)]
            fn lane_fma(self, b: Self, c: Self) -> Self {
                self.mul_add(b, c)
            }

            #[inline(always)]
            fn is_default(self) -> bool {
                self.to_bits() == 0
            }

            #[inline(always)]
            fn is_negative(self) -> bool {
                self.is_sign_negative()
            }

            #[inline(always)]
            fn is_finite(self) -> bool {
                <$t>::is_finite(self)
            }

            #[inline(always)]
            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }

            #[inline(always)]
            fn is_infinite(self) -> bool {
                <$t>::is_infinite(self)
            }

            #[inline(always)]
            fn accelerate_binary(op: BinaryOp, a: &[Self], b: &[Self]) -> Option<Vec<Self>> {
                $accel(op, a, b)
            }
        }
    };
}

impl_integral!(i8, Byte, u8, crate::simd::no_acceleration);
impl_integral!(i16, Short, u16, crate::simd::no_acceleration);
impl_integral!(i32, Int, u32, crate::simd::binary_i32);
impl_integral!(i64, Long, u64, crate::simd::no_acceleration);
impl_floating!(f32, Float, u32, crate::simd::binary_f32);
impl_floating!(f64, Double, u64, crate::simd::binary_f64);
