//! # lanewise
//!
//! A generic fixed-width vector algebra core.
//!
//! A [`Vector`] is a fixed number of numeric lanes bound to a
//! [`VectorSpecies`]: one of six element kinds (`i8`, `i16`, `i32`, `i64`,
//! `f32`, `f64`) paired with one of five shapes (64, 128, 256 and 512 bits,
//! plus the widest width the host supports). The crate provides
//!
//! - masked lane-wise arithmetic, bitwise and comparison operations,
//! - associative reductions with identity substitution under masks,
//! - casts, bit-preserving reinterpretation and reshaping across species,
//! - shuffles with an explicit wrap-or-check index policy,
//! - slice kernels that walk long inputs vector by vector.
//!
//! Every value is immutable and every operation either succeeds or reports a
//! [`LanewiseError`] before producing any output.
//!
//! ## Example
//!
//! ```rust
//! use lanewise::{AssociativeOp, Comparison, Shape, Vector, VectorSpecies};
//!
//! let species = VectorSpecies::<i32>::of(Shape::S128);
//! let a = Vector::from_slice(species, &[1, 2, 3, 4], 0)?;
//! let b = Vector::from_slice(species, &[10, 20, 30, 40], 0)?;
//!
//! assert_eq!(a.add(&b)?.to_vec(), vec![11, 22, 33, 44]);
//! assert!(!a.compare(Comparison::Gt, &b)?.all_true());
//! assert_eq!(a.reduce_lanes(AssociativeOp::Add)?, 10);
//! # Ok::<(), lanewise::LanewiseError>(())
//! ```
//!
//! ## Acceleration
//!
//! On x86 hosts where the build script detects AVX2, binary `f32`, `f64` and
//! `i32` operations run through 256-bit kernels that match the portable path
//! bit for bit. See [`config`] for the run-time switches.

pub mod any;
pub mod buffer;
pub mod config;
pub mod element;
pub mod error;
pub mod mask;
pub mod ops;
pub mod shape;
pub mod shuffle;
pub mod slice;
pub mod species;
pub mod vector;

pub(crate) mod simd;

pub use any::AnyVector;
pub use buffer::{ByteBuffer, ByteOrder};
pub use element::{Element, LaneValue};
pub use error::{LanewiseError, Result};
pub use mask::Mask;
pub use ops::{AssociativeOp, BinaryOp, Comparison, LaneTest, TernaryOp, UnaryOp};
pub use shape::{ElementKind, Shape};
pub use shuffle::{IndexPolicy, Shuffle};
pub use slice::SliceLanewise;
pub use species::{Species, VectorSpecies};
pub use vector::Vector;

/// Slices shorter than this use the scalar loop.
pub const SIMD_THRESHOLD: usize = 64;

/// Slices longer than this are split across the rayon pool by the `par_`
/// kernels.
pub const PARALLEL_SIMD_THRESHOLD: usize = 262_144;

/// Elements per parallel work item, rounded down to whole vectors.
pub const PARALLEL_CHUNK_SIZE: usize = 16_384;
