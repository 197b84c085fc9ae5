//! Symbolic operator tags.
//!
//! Every lane-wise entry point takes one of these tags. The tag names the
//! operation for the accelerator, validates it against the element kind and
//! supplies the scalar kernel used by the portable fallback.

use std::fmt;

use crate::element::Element;
use crate::error::{unsupported_operation, Result};
use crate::shape::ElementKind;

/// Lane-wise operators of one operand.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Abs,
    /// Bitwise complement. Integral lanes only.
    Not,
}

impl UnaryOp {
    pub const fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "NEG",
            UnaryOp::Abs => "ABS",
            UnaryOp::Not => "NOT",
        }
    }

    pub(crate) fn check(self, kind: ElementKind) -> Result<()> {
        match self {
            UnaryOp::Not => require_integral(self.name(), kind),
            UnaryOp::Neg | UnaryOp::Abs => Ok(()),
        }
    }

    #[inline(always)]
    pub(crate) fn apply<E: Element>(self, a: E) -> E {
        match self {
            UnaryOp::Neg => a.lane_neg(),
            UnaryOp::Abs => a.lane_abs(),
            UnaryOp::Not => a.lane_not(),
        }
    }
}

/// Lane-wise operators of two operands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// Integral division by zero is an error.
    Div,
    Min,
    Max,
    And,
    Or,
    Xor,
    /// `a & !b`.
    AndNot,
    /// Shift left; count modulo lane width.
    Shl,
    /// Logical (zero-filling) shift right.
    Lshr,
    /// Arithmetic (sign-filling) shift right.
    Ashr,
}

impl BinaryOp {
    pub const fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "ADD",
            BinaryOp::Sub => "SUB",
            BinaryOp::Mul => "MUL",
            BinaryOp::Div => "DIV",
            BinaryOp::Min => "MIN",
            BinaryOp::Max => "MAX",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Xor => "XOR",
            BinaryOp::AndNot => "AND_NOT",
            BinaryOp::Shl => "LSHL",
            BinaryOp::Lshr => "LSHR",
            BinaryOp::Ashr => "ASHR",
        }
    }

    /// Bitwise and shift operators, which floating lanes reject.
    pub const fn is_bitwise(self) -> bool {
        matches!(
            self,
            BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Xor
                | BinaryOp::AndNot
                | BinaryOp::Shl
                | BinaryOp::Lshr
                | BinaryOp::Ashr
        )
    }

    pub(crate) fn check(self, kind: ElementKind) -> Result<()> {
        if self.is_bitwise() {
            require_integral(self.name(), kind)
        } else {
            Ok(())
        }
    }

    #[inline(always)]
    pub(crate) fn apply<E: Element>(self, a: E, b: E) -> E {
        match self {
            BinaryOp::Add => a.lane_add(b),
            BinaryOp::Sub => a.lane_sub(b),
            BinaryOp::Mul => a.lane_mul(b),
            BinaryOp::Div => a.lane_div(b),
            BinaryOp::Min => a.lane_min(b),
            BinaryOp::Max => a.lane_max(b),
            BinaryOp::And => a.lane_and(b),
            BinaryOp::Or => a.lane_or(b),
            BinaryOp::Xor => a.lane_xor(b),
            BinaryOp::AndNot => a.lane_and(b.lane_not()),
            BinaryOp::Shl => a.lane_shl(b),
            BinaryOp::Lshr => a.lane_lshr(b),
            BinaryOp::Ashr => a.lane_ashr(b),
        }
    }
}

/// Lane-wise operators of three operands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TernaryOp {
    /// Fused `a * b + c`. Floating lanes only.
    Fma,
    /// `(a & !c) | (b & c)`: bits of `b` where `c` is set. Integral lanes only.
    BitwiseBlend,
}

impl TernaryOp {
    pub const fn name(self) -> &'static str {
        match self {
            TernaryOp::Fma => "FMA",
            TernaryOp::BitwiseBlend => "BITWISE_BLEND",
        }
    }

    pub(crate) fn check(self, kind: ElementKind) -> Result<()> {
        match self {
            TernaryOp::Fma if !kind.is_floating() => Err(unsupported_operation(format!(
                "{} is not defined for {} lanes",
                self.name(),
                kind
            ))),
            TernaryOp::BitwiseBlend => require_integral(self.name(), kind),
            TernaryOp::Fma => Ok(()),
        }
    }

    #[inline(always)]
    pub(crate) fn apply<E: Element>(self, a: E, b: E, c: E) -> E {
        match self {
            TernaryOp::Fma => a.lane_fma(b, c),
            TernaryOp::BitwiseBlend => a.lane_and(c.lane_not()).lane_or(b.lane_and(c)),
        }
    }
}

/// Lane-wise comparisons producing a mask.
///
/// Any comparison involving NaN is false, except [`Comparison::Ne`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    pub const fn name(self) -> &'static str {
        match self {
            Comparison::Eq => "EQ",
            Comparison::Ne => "NE",
            Comparison::Lt => "LT",
            Comparison::Le => "LE",
            Comparison::Gt => "GT",
            Comparison::Ge => "GE",
        }
    }

    #[inline(always)]
    pub(crate) fn test<E: Element>(self, a: E, b: E) -> bool {
        match self {
            Comparison::Eq => a == b,
            Comparison::Ne => a != b,
            Comparison::Lt => a < b,
            Comparison::Le => a <= b,
            Comparison::Gt => a > b,
            Comparison::Ge => a >= b,
        }
    }
}

/// Single-lane predicates producing a mask.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LaneTest {
    /// All bits clear.
    IsDefault,
    /// Sign bit set.
    IsNegative,
    IsFinite,
    IsNaN,
    IsInfinite,
}

impl LaneTest {
    pub const fn name(self) -> &'static str {
        match self {
            LaneTest::IsDefault => "IS_DEFAULT",
            LaneTest::IsNegative => "IS_NEGATIVE",
            LaneTest::IsFinite => "IS_FINITE",
            LaneTest::IsNaN => "IS_NAN",
            LaneTest::IsInfinite => "IS_INFINITE",
        }
    }

    #[inline(always)]
    pub(crate) fn test<E: Element>(self, a: E) -> bool {
        match self {
            LaneTest::IsDefault => a.is_default(),
            LaneTest::IsNegative => a.is_negative(),
            LaneTest::IsFinite => a.is_finite(),
            LaneTest::IsNaN => a.is_nan(),
            LaneTest::IsInfinite => a.is_infinite(),
        }
    }
}

/// Associative operators accepted by the reduction engine.
///
/// | operator | identity |
/// |---|---|
/// | `Add`, `Or`, `Xor` | `0` |
/// | `Mul` | `1` |
/// | `And` | all bits set |
/// | `Min` | largest value (`+inf` for floating lanes) |
/// | `Max` | smallest value (`-inf` for floating lanes) |
///
/// The identity seeds the fold and replaces unset lanes under a mask.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssociativeOp {
    Add,
    Mul,
    Min,
    Max,
    And,
    Or,
    Xor,
}

impl AssociativeOp {
    pub const fn name(self) -> &'static str {
        self.binary().name()
    }

    /// The lane-wise operator folded by this reduction.
    pub const fn binary(self) -> BinaryOp {
        match self {
            AssociativeOp::Add => BinaryOp::Add,
            AssociativeOp::Mul => BinaryOp::Mul,
            AssociativeOp::Min => BinaryOp::Min,
            AssociativeOp::Max => BinaryOp::Max,
            AssociativeOp::And => BinaryOp::And,
            AssociativeOp::Or => BinaryOp::Or,
            AssociativeOp::Xor => BinaryOp::Xor,
        }
    }

    pub fn identity<E: Element>(self) -> E {
        match self {
            AssociativeOp::Add | AssociativeOp::Or | AssociativeOp::Xor => E::zero(),
            AssociativeOp::Mul => E::one(),
            AssociativeOp::And => E::all_ones(),
            AssociativeOp::Min => E::highest(),
            AssociativeOp::Max => E::lowest(),
        }
    }

    pub(crate) fn check(self, kind: ElementKind) -> Result<()> {
        self.binary().check(kind)
    }

    #[inline(always)]
    pub(crate) fn combine<E: Element>(self, a: E, b: E) -> E {
        self.binary().apply(a, b)
    }
}

macro_rules! impl_display {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        })*
    };
}

impl_display!(UnaryOp, BinaryOp, TernaryOp, Comparison, LaneTest, AssociativeOp);

fn require_integral(name: &str, kind: ElementKind) -> Result<()> {
    if kind.is_floating() {
        Err(unsupported_operation(format!(
            "{name} is not defined for {kind} lanes"
        )))
    } else {
        Ok(())
    }
}
