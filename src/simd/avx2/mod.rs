//! AVX2 kernels over 256-bit registers: 8 × f32, 4 × f64, 8 × i32.
//!
//! Whole registers go through the intrinsics; the remainder is computed with
//! the scalar lane kernels, so results match the portable path bit for bit.

mod kernels;

use log::debug;
use once_cell::sync::Lazy;

use crate::element::Element;
use crate::ops::BinaryOp;

use kernels::{Kernel, F32_LANES, F64_LANES, I32_LANES};

static AVAILABLE: Lazy<bool> = Lazy::new(|| {
    let available = is_x86_feature_detected!("avx2");
    debug!("AVX2 kernels {}", if available { "enabled" } else { "unavailable on this CPU" });
    available
});

pub(crate) fn binary_f32(op: BinaryOp, a: &[f32], b: &[f32]) -> Option<Vec<f32>> {
    let kernel: Kernel<f32> = match op {
        BinaryOp::Add => kernels::add_f32,
        BinaryOp::Sub => kernels::sub_f32,
        BinaryOp::Mul => kernels::mul_f32,
        BinaryOp::Div => kernels::div_f32,
        _ => return None,
    };
    run(kernel, F32_LANES, op, a, b)
}

pub(crate) fn binary_f64(op: BinaryOp, a: &[f64], b: &[f64]) -> Option<Vec<f64>> {
    let kernel: Kernel<f64> = match op {
        BinaryOp::Add => kernels::add_f64,
        BinaryOp::Sub => kernels::sub_f64,
        BinaryOp::Mul => kernels::mul_f64,
        BinaryOp::Div => kernels::div_f64,
        _ => return None,
    };
    run(kernel, F64_LANES, op, a, b)
}

pub(crate) fn binary_i32(op: BinaryOp, a: &[i32], b: &[i32]) -> Option<Vec<i32>> {
    let kernel: Kernel<i32> = match op {
        BinaryOp::Add => kernels::add_i32,
        BinaryOp::Sub => kernels::sub_i32,
        BinaryOp::Mul => kernels::mul_i32,
        BinaryOp::And => kernels::and_i32,
        BinaryOp::Or => kernels::or_i32,
        BinaryOp::Xor => kernels::xor_i32,
        _ => return None,
    };
    run(kernel, I32_LANES, op, a, b)
}

#[inline(always)]
fn run<E: Element>(kernel: Kernel<E>, step: usize, op: BinaryOp, a: &[E], b: &[E]) -> Option<Vec<E>> {
    if !*AVAILABLE || a.len() != b.len() || a.len() < step {
        return None;
    }
    let mut out = vec![E::zero(); a.len()];
    // SAFETY: AVX2 was confirmed at run time and all three slices have the
    // same length.
    unsafe { kernel(a, b, &mut out) };
    let complete = a.len() - a.len() % step;
    for i in complete..a.len() {
        out[i] = op.apply(a[i], b[i]);
    }
    Some(out)
}
