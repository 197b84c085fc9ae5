#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Processes every complete register of `a` and `b` into `out`.
///
/// # Safety
///
/// The CPU must support AVX2 and the three slices must have equal length.
pub(super) type Kernel<T> = unsafe fn(&[T], &[T], &mut [T]);

pub(super) const F32_LANES: usize = 8;
pub(super) const F64_LANES: usize = 4;
pub(super) const I32_LANES: usize = 8;

macro_rules! avx2_kernel {
    ($name:ident, $t:ty, $lanes:expr, $load:ident, $store:ident, $op:ident) => {
        #[target_feature(enable = "avx2")]
        pub(super) unsafe fn $name(a: &[$t], b: &[$t], out: &mut [$t]) {
            debug_assert!(a.len() == b.len() && a.len() == out.len());
            let complete = a.len() - a.len() % $lanes;
            for i in (0..complete).step_by($lanes) {
                let x = $load(a.as_ptr().add(i) as *const _);
                let y = $load(b.as_ptr().add(i) as *const _);
                $store(out.as_mut_ptr().add(i) as *mut _, $op(x, y));
            }
        }
    };
}

avx2_kernel!(add_f32, f32, F32_LANES, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_add_ps);
avx2_kernel!(sub_f32, f32, F32_LANES, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_sub_ps);
avx2_kernel!(mul_f32, f32, F32_LANES, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_mul_ps);
avx2_kernel!(div_f32, f32, F32_LANES, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_div_ps);

avx2_kernel!(add_f64, f64, F64_LANES, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_add_pd);
avx2_kernel!(sub_f64, f64, F64_LANES, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_sub_pd);
avx2_kernel!(mul_f64, f64, F64_LANES, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_mul_pd);
avx2_kernel!(div_f64, f64, F64_LANES, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_div_pd);

avx2_kernel!(add_i32, i32, I32_LANES, _mm256_loadu_si256, _mm256_storeu_si256, _mm256_add_epi32);
avx2_kernel!(sub_i32, i32, I32_LANES, _mm256_loadu_si256, _mm256_storeu_si256, _mm256_sub_epi32);
avx2_kernel!(mul_i32, i32, I32_LANES, _mm256_loadu_si256, _mm256_storeu_si256, _mm256_mullo_epi32);
avx2_kernel!(and_i32, i32, I32_LANES, _mm256_loadu_si256, _mm256_storeu_si256, _mm256_and_si256);
avx2_kernel!(or_i32, i32, I32_LANES, _mm256_loadu_si256, _mm256_storeu_si256, _mm256_or_si256);
avx2_kernel!(xor_i32, i32, I32_LANES, _mm256_loadu_si256, _mm256_storeu_si256, _mm256_xor_si256);
