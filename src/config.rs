//! Run-time host configuration.
//!
//! The widest vector the host supports and whether the accelerated kernels may
//! be used are decided once per process, on first use, and never change
//! afterwards. Both can be overridden through environment variables:
//!
//! - `LANEWISE_MAX_VECTOR_BITS`: width of the `Max` shape in bits. Must be a
//!   power of two in `[64, 1024]`; anything else is ignored with a warning.
//! - `LANEWISE_DISABLE_ACCEL`: any non-empty value other than `0` forces every
//!   operation through its portable fallback.

use log::{debug, info, warn};
use once_cell::sync::Lazy;

/// Environment variable overriding the `Max` shape width.
pub const MAX_VECTOR_BITS_ENV: &str = "LANEWISE_MAX_VECTOR_BITS";

/// Environment variable disabling the accelerated kernels.
pub const DISABLE_ACCEL_ENV: &str = "LANEWISE_DISABLE_ACCEL";

/// Smallest accepted `Max` shape width. One 64-bit lane must fit.
pub const MIN_MAX_VECTOR_BITS: usize = 64;

/// Largest accepted `Max` shape width. Byte lane indexes must fit in `i8`.
pub const MAX_MAX_VECTOR_BITS: usize = 1024;

/// Host properties resolved once per process.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HostConfig {
    /// Bit width of the `Max` shape.
    pub max_vector_bits: usize,
    /// Whether accelerated kernels may replace the portable fallbacks.
    pub accelerate: bool,
}

static HOST: Lazy<HostConfig> = Lazy::new(HostConfig::detect);

/// Returns the process-wide host configuration, probing it on first call.
pub fn host() -> &'static HostConfig {
    &HOST
}

impl HostConfig {
    fn detect() -> Self {
        let probed = probe_max_vector_bits();
        debug!("host reports a {probed}-bit maximum vector width");

        let max_vector_bits = match std::env::var(MAX_VECTOR_BITS_ENV) {
            Ok(raw) => match parse_max_vector_bits(&raw) {
                Some(bits) => {
                    info!("{MAX_VECTOR_BITS_ENV} overrides the maximum vector width to {bits} bits");
                    bits
                }
                None => {
                    warn!(
                        "ignoring {MAX_VECTOR_BITS_ENV}={raw:?}: expected a power of two in \
                         [{MIN_MAX_VECTOR_BITS}, {MAX_MAX_VECTOR_BITS}]"
                    );
                    probed
                }
            },
            Err(_) => probed,
        };

        let disabled = std::env::var(DISABLE_ACCEL_ENV)
            .map(|raw| parse_disable_flag(&raw))
            .unwrap_or(false);
        if disabled {
            info!("{DISABLE_ACCEL_ENV} is set; accelerated kernels are disabled");
        }

        HostConfig {
            max_vector_bits,
            accelerate: !disabled,
        }
    }
}

/// Parses a `Max` shape width override.
pub fn parse_max_vector_bits(raw: &str) -> Option<usize> {
    let bits = raw.trim().parse::<usize>().ok()?;
    let in_range = (MIN_MAX_VECTOR_BITS..=MAX_MAX_VECTOR_BITS).contains(&bits);
    (bits.is_power_of_two() && in_range).then_some(bits)
}

fn parse_disable_flag(raw: &str) -> bool {
    let raw = raw.trim();
    !raw.is_empty() && raw != "0"
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn probe_max_vector_bits() -> usize {
    if is_x86_feature_detected!("avx512f") {
        512
    } else if is_x86_feature_detected!("avx2") {
        256
    } else {
        128
    }
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn probe_max_vector_bits() -> usize {
    // NEON and the scalar fallback both report 128-bit registers.
    128
}
