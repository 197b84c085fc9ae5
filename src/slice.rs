//! Lane-wise kernels over whole slices.
//!
//! Slices are walked with the preferred species: full vectors up to
//! `loop_bound`, then one masked vector for the tail. Inputs shorter than
//! [`SIMD_THRESHOLD`](crate::SIMD_THRESHOLD) go straight to the scalar loop;
//! the `par_` forms split inputs longer than
//! [`PARALLEL_SIMD_THRESHOLD`](crate::PARALLEL_SIMD_THRESHOLD) into chunks
//! processed on the rayon pool.

use rayon::prelude::*;

use crate::element::Element;
use crate::error::{illegal_argument, Result};
use crate::ops::{AssociativeOp, BinaryOp};
use crate::species::VectorSpecies;
use crate::vector::{check_divisors, Vector};
use crate::{PARALLEL_CHUNK_SIZE, PARALLEL_SIMD_THRESHOLD, SIMD_THRESHOLD};

/// Lane-wise operations on slices of lane values.
pub trait SliceLanewise<E: Element> {
    /// `out[i] = op(self[i], rhs[i])` through vectors of the preferred species.
    fn lanewise(&self, op: BinaryOp, rhs: &[E]) -> Result<Vec<E>>;

    /// [`lanewise`](Self::lanewise) split across threads.
    fn par_lanewise(&self, op: BinaryOp, rhs: &[E]) -> Result<Vec<E>>;

    /// Reference element-by-element loop.
    fn scalar_lanewise(&self, op: BinaryOp, rhs: &[E]) -> Result<Vec<E>>;

    /// Folds all elements with `op`; an empty slice yields the identity.
    fn reduce_lanes(&self, op: AssociativeOp) -> Result<E>;

    /// [`reduce_lanes`](Self::reduce_lanes) split across threads.
    fn par_reduce_lanes(&self, op: AssociativeOp) -> Result<E>;
}

impl<E: Element> SliceLanewise<E> for [E] {
    fn lanewise(&self, op: BinaryOp, rhs: &[E]) -> Result<Vec<E>> {
        check_operands(op, self, rhs)?;
        if self.len() < SIMD_THRESHOLD {
            return self.scalar_lanewise(op, rhs);
        }
        let mut out = vec![E::zero(); self.len()];
        lanewise_into(VectorSpecies::preferred(), op, self, rhs, &mut out)?;
        Ok(out)
    }

    fn par_lanewise(&self, op: BinaryOp, rhs: &[E]) -> Result<Vec<E>> {
        if self.len() <= PARALLEL_SIMD_THRESHOLD {
            return self.lanewise(op, rhs);
        }
        check_operands(op, self, rhs)?;

        let species = VectorSpecies::<E>::preferred();
        let chunk_size = chunk_size(species);
        let mut out = vec![E::zero(); self.len()];
        out.par_chunks_mut(chunk_size)
            .enumerate()
            .try_for_each(|(chunk_idx, out_chunk)| {
                let start = chunk_idx * chunk_size;
                let end = start + out_chunk.len();
                lanewise_into(species, op, &self[start..end], &rhs[start..end], out_chunk)
            })?;
        Ok(out)
    }

    fn scalar_lanewise(&self, op: BinaryOp, rhs: &[E]) -> Result<Vec<E>> {
        check_operands(op, self, rhs)?;
        if op == BinaryOp::Div {
            check_divisors(rhs, None)?;
        }
        Ok(self.iter().zip(rhs).map(|(&a, &b)| op.apply(a, b)).collect())
    }

    fn reduce_lanes(&self, op: AssociativeOp) -> Result<E> {
        op.check(E::KIND)?;
        if self.len() < SIMD_THRESHOLD {
            return Ok(self.iter().fold(op.identity(), |acc, &x| op.combine(acc, x)));
        }
        reduce_chunk(VectorSpecies::preferred(), op, self)
    }

    fn par_reduce_lanes(&self, op: AssociativeOp) -> Result<E> {
        if self.len() <= PARALLEL_SIMD_THRESHOLD {
            return self.reduce_lanes(op);
        }
        op.check(E::KIND)?;

        let species = VectorSpecies::<E>::preferred();
        self.par_chunks(chunk_size(species))
            .map(|chunk| reduce_chunk(species, op, chunk))
            .try_reduce(|| op.identity(), |a, b| Ok(op.combine(a, b)))
    }
}

fn check_operands<E: Element>(op: BinaryOp, a: &[E], b: &[E]) -> Result<()> {
    if a.len() != b.len() {
        return Err(illegal_argument(format!(
            "operands have different lengths ({} and {})",
            a.len(),
            b.len()
        )));
    }
    op.check(E::KIND)
}

/// Largest multiple of the lane count not above the parallel chunk size.
fn chunk_size<E: Element>(species: VectorSpecies<E>) -> usize {
    let step = species.length();
    ((PARALLEL_CHUNK_SIZE / step) * step).max(step)
}

fn lanewise_into<E: Element>(
    species: VectorSpecies<E>,
    op: BinaryOp,
    a: &[E],
    b: &[E],
    out: &mut [E],
) -> Result<()> {
    let step = species.length();
    let bound = species.loop_bound(a.len());
    for i in (0..bound).step_by(step) {
        let va = Vector::from_slice(species, a, i)?;
        let vb = Vector::from_slice(species, b, i)?;
        va.lanewise(op, &vb)?.into_slice(out, i)?;
    }
    if bound < a.len() {
        let tail = species.index_in_range(bound, a.len());
        let va = Vector::from_slice_masked(species, a, bound, &tail)?;
        let vb = Vector::from_slice_masked(species, b, bound, &tail)?;
        va.lanewise_masked(op, &vb, &tail)?
            .into_slice_masked(out, bound, &tail)?;
    }
    Ok(())
}

fn reduce_chunk<E: Element>(species: VectorSpecies<E>, op: AssociativeOp, a: &[E]) -> Result<E> {
    let step = species.length();
    let bound = species.loop_bound(a.len());
    let mut acc = Vector::broadcast(species, op.identity());
    for i in (0..bound).step_by(step) {
        acc = acc.lanewise(op.binary(), &Vector::from_slice(species, a, i)?)?;
    }
    if bound < a.len() {
        let tail = species.index_in_range(bound, a.len());
        let v = Vector::from_slice_masked(species, a, bound, &tail)?;
        acc = acc.lanewise_masked(op.binary(), &v, &tail)?;
    }
    acc.reduce_lanes(op)
}
