//! Cast, convert, reinterpret and reshape.
//!
//! * cast: lane-wise value conversion between species of equal length;
//! * convert_shape: value conversion with a block selector, zero filled;
//! * reinterpret: bit-preserving round trip through native-order bytes;
//! * reshape: reinterpret restricted to the same lane type.
//!
//! Shape-changing forms take a `part` selecting which block takes part in the
//! conversion. When the target is smaller than the source, part `p` in
//! `[0, source / target)` selects source block `p`. When it is larger,
//! part `p` in `(-target / source, 0]` places the result at target block
//! `-p` and every other target lane is zero.

use crate::any::AnyVector;
use crate::element::Element;
use crate::error::{illegal_argument, index_out_of_bounds, Result};
use crate::shape::ElementKind;
use crate::species::{Species, VectorSpecies};

use super::Vector;

/// Source and destination offsets of the block selected by `part`.
fn block_offsets(source: usize, target: usize, part: i32) -> Result<(usize, usize)> {
    let p = part as i64;
    if source > target {
        let parts = source / target;
        if (0..parts as i64).contains(&p) {
            return Ok((p as usize * target, 0));
        }
        Err(index_out_of_bounds(p, parts, format!("part must be in [0, {parts})")))
    } else {
        let parts = target / source;
        if p <= 0 && -p < parts as i64 {
            return Ok((0, (-p) as usize * source));
        }
        Err(index_out_of_bounds(p, parts, format!("part must be in (-{parts}, 0]")))
    }
}

fn check_cast_length(source: usize, target: &Species) -> Result<()> {
    if source != target.length() {
        return Err(illegal_argument(format!("cannot cast {source} lanes into {target}")));
    }
    Ok(())
}

impl<E: Element> Vector<E> {
    /// Converts every lane value to `F`.
    ///
    /// Fails with `IllegalArgument` unless `target` has as many lanes as
    /// `self`. Use [`convert_shape`](Self::convert_shape) to change the lane
    /// count.
    pub fn cast<F: Element>(&self, target: VectorSpecies<F>) -> Result<Vector<F>> {
        check_cast_length(self.length(), target.species())?;
        Ok(self.convert_block(target, 0, 0))
    }

    /// Casts to the `F` species with the same lane count.
    pub fn cast_lanes<F: Element>(&self) -> Result<Vector<F>> {
        self.cast(VectorSpecies::for_lane_count(self.length())?)
    }

    /// Converts the values of `min(n, m)` lanes to `F`, with `part` selecting
    /// the source block (narrower target) or the destination block (wider
    /// target). Other target lanes are zero.
    pub fn convert_shape<F: Element>(&self, target: VectorSpecies<F>, part: i32) -> Result<Vector<F>> {
        let (from, to) = block_offsets(self.length(), target.length(), part)?;
        Ok(self.convert_block(target, from, to))
    }

    /// Bit-preserving conversion into `target`, selecting a byte block with
    /// `part`.
    pub fn reinterpret_shape<F: Element>(
        &self,
        target: VectorSpecies<F>,
        part: i32,
    ) -> Result<Vector<F>> {
        let source = self.to_ne_bytes();
        let size = target.vector_byte_size();
        let (from, to) = block_offsets(source.len(), size, part)?;
        let count = source.len().min(size);
        let mut bytes = vec![0u8; size];
        bytes[to..to + count].copy_from_slice(&source[from..from + count]);
        Ok(Vector::decode_ne(target, &bytes))
    }

    /// Reinterprets the leading bytes; missing bytes read as zero.
    pub fn reinterpret<F: Element>(&self, target: VectorSpecies<F>) -> Vector<F> {
        let source = self.to_ne_bytes();
        let mut bytes = vec![0u8; target.vector_byte_size()];
        let count = source.len().min(bytes.len());
        bytes[..count].copy_from_slice(&source[..count]);
        Vector::decode_ne(target, &bytes)
    }

    /// Same lane type, different shape: trailing lanes are dropped or filled
    /// with zero.
    pub fn reshape(&self, target: VectorSpecies<E>) -> Vector<E> {
        self.reinterpret(target)
    }

    pub fn reinterpret_as_bytes(&self) -> Vector<i8> {
        self.reinterpret(self.species().with_lanes::<i8>())
    }

    /// The same bits viewed as integral lanes of equal width.
    pub fn view_as_integral_lanes(&self) -> AnyVector {
        let target = self.species().species().with_kind(E::KIND.integral_equivalent());
        reinterpret_to(self, target)
    }

    /// The same bits viewed as floating lanes of equal width. Byte and short
    /// lanes have no floating counterpart.
    pub fn view_as_floating_lanes(&self) -> Result<AnyVector> {
        let kind = E::KIND.floating_equivalent()?;
        Ok(reinterpret_to(self, self.species().species().with_kind(kind)))
    }

    /// [`reinterpret_shape`](Self::reinterpret_shape) into a species chosen
    /// at run time.
    pub fn reinterpret_dyn(&self, target: &'static Species, part: i32) -> Result<AnyVector> {
        Ok(match target.kind() {
            ElementKind::Byte => AnyVector::Byte(self.reinterpret_shape(VectorSpecies::from_species(target)?, part)?),
            ElementKind::Short => AnyVector::Short(self.reinterpret_shape(VectorSpecies::from_species(target)?, part)?),
            ElementKind::Int => AnyVector::Int(self.reinterpret_shape(VectorSpecies::from_species(target)?, part)?),
            ElementKind::Long => AnyVector::Long(self.reinterpret_shape(VectorSpecies::from_species(target)?, part)?),
            ElementKind::Float => AnyVector::Float(self.reinterpret_shape(VectorSpecies::from_species(target)?, part)?),
            ElementKind::Double => AnyVector::Double(self.reinterpret_shape(VectorSpecies::from_species(target)?, part)?),
        })
    }

    /// [`convert_shape`](Self::convert_shape) into a species chosen at run
    /// time.
    pub fn convert_dyn(&self, target: &'static Species, part: i32) -> Result<AnyVector> {
        Ok(match target.kind() {
            ElementKind::Byte => AnyVector::Byte(self.convert_shape(VectorSpecies::from_species(target)?, part)?),
            ElementKind::Short => AnyVector::Short(self.convert_shape(VectorSpecies::from_species(target)?, part)?),
            ElementKind::Int => AnyVector::Int(self.convert_shape(VectorSpecies::from_species(target)?, part)?),
            ElementKind::Long => AnyVector::Long(self.convert_shape(VectorSpecies::from_species(target)?, part)?),
            ElementKind::Float => AnyVector::Float(self.convert_shape(VectorSpecies::from_species(target)?, part)?),
            ElementKind::Double => AnyVector::Double(self.convert_shape(VectorSpecies::from_species(target)?, part)?),
        })
    }

    fn convert_block<F: Element>(&self, target: VectorSpecies<F>, from: usize, to: usize) -> Vector<F> {
        let count = self.length().min(target.length());
        let lanes = self.as_slice();
        Vector::from_fn(target, |i| {
            if (to..to + count).contains(&i) {
                F::from_lane_value(lanes[from + i - to].to_lane_value())
            } else {
                F::zero()
            }
        })
    }
}

/// Equal-size reinterpretation, which cannot fail.
fn reinterpret_to<E: Element>(v: &Vector<E>, target: &'static Species) -> AnyVector {
    AnyVector::from_ne_bytes(target, &v.to_ne_bytes())
}
