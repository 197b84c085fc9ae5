//! Accelerated kernels behind the symbolic operators.
//!
//! The vector engine hands every binary operation to [`dispatch_binary`]
//! together with its portable fallback. An accelerated kernel may replace
//! the fallback only when it produces bit-identical lanes; when none applies
//! (unsupported lane type or operator, CPU without the feature, acceleration
//! disabled by configuration) the fallback runs unchanged.
//!
//! Kernels are compiled in when the build script detected AVX2 or AVX-512 on
//! an x86 host, and used when the CPU confirms AVX2 at run time.

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), any(avx2, avx512)))]
mod avx2;

use crate::config;
use crate::element::Element;
use crate::ops::BinaryOp;

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), any(avx2, avx512)))]
pub(crate) use avx2::{binary_f32, binary_f64, binary_i32};

#[cfg(not(all(any(target_arch = "x86", target_arch = "x86_64"), any(avx2, avx512))))]
pub(crate) use self::{
    no_acceleration as binary_f32, no_acceleration as binary_f64, no_acceleration as binary_i32,
};

/// Runs `op` over two equally long lane arrays.
#[inline(always)]
pub(crate) fn dispatch_binary<E: Element>(
    op: BinaryOp,
    a: &[E],
    b: &[E],
    fallback: impl FnOnce() -> Vec<E>,
) -> Vec<E> {
    debug_assert_eq!(a.len(), b.len(), "operands must have the same lane count");
    if config::host().accelerate {
        if let Some(lanes) = E::accelerate_binary(op, a, b) {
            return lanes;
        }
    }
    fallback()
}

/// Lane types without an accelerated kernel.
#[inline(always)]
pub(crate) fn no_acceleration<T>(_op: BinaryOp, _a: &[T], _b: &[T]) -> Option<Vec<T>> {
    None
}
