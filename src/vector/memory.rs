//! Loads and stores. Lane `i` maps to element (or byte block) `offset + i`.

use crate::buffer::{byte_range, ByteBuffer};
use crate::element::Element;
use crate::error::{index_out_of_bounds, Result};
use crate::mask::Mask;
use crate::species::VectorSpecies;

use super::Vector;

fn lane_range(total: usize, offset: usize, lanes: usize) -> Result<std::ops::Range<usize>> {
    match offset.checked_add(lanes) {
        Some(end) if end <= total => Ok(offset..end),
        _ => Err(index_out_of_bounds(
            offset as i64,
            total,
            format!("{lanes} lanes do not fit at this offset"),
        )),
    }
}

/// First set lane whose element would fall outside `total`.
fn check_masked(total: usize, offset: usize, mask: &[bool]) -> Result<()> {
    match mask
        .iter()
        .enumerate()
        .find(|&(i, &set)| set && offset.checked_add(i).map_or(true, |at| at >= total))
    {
        Some((i, _)) => Err(index_out_of_bounds(
            offset.saturating_add(i) as i64,
            total,
            format!("masked lane {i} out of range"),
        )),
        None => Ok(()),
    }
}

impl<E: Element> Vector<E> {
    pub fn from_slice(species: VectorSpecies<E>, data: &[E], offset: usize) -> Result<Self> {
        let range = lane_range(data.len(), offset, species.length())?;
        Ok(Self::from_lanes(species, data[range].to_vec()))
    }

    /// Unset lanes read zero and are not bounds-checked.
    pub fn from_slice_masked(
        species: VectorSpecies<E>,
        data: &[E],
        offset: usize,
        mask: &Mask<E>,
    ) -> Result<Self> {
        mask.check_species(species)?;
        let bits = mask.as_slice();
        check_masked(data.len(), offset, bits)?;
        Ok(Self::from_fn(species, |i| {
            if bits[i] {
                data[offset + i]
            } else {
                E::zero()
            }
        }))
    }

    pub fn into_slice(&self, data: &mut [E], offset: usize) -> Result<()> {
        let range = lane_range(data.len(), offset, self.length())?;
        data[range].copy_from_slice(self.as_slice());
        Ok(())
    }

    /// Stores only the set lanes.
    pub fn into_slice_masked(&self, data: &mut [E], offset: usize, mask: &Mask<E>) -> Result<()> {
        mask.check_species(self.species())?;
        let bits = mask.as_slice();
        check_masked(data.len(), offset, bits)?;
        for (i, &lane) in self.as_slice().iter().enumerate() {
            if bits[i] {
                data[offset + i] = lane;
            }
        }
        Ok(())
    }

    /// Loads `vector_byte_size` native-order bytes from `bytes[offset..]`.
    pub fn from_bytes(species: VectorSpecies<E>, bytes: &[u8], offset: usize) -> Result<Self> {
        let range = byte_range(bytes.len(), offset, species.vector_byte_size())?;
        Ok(Self::decode_ne(species, &bytes[range]))
    }

    pub fn into_bytes(&self, bytes: &mut [u8], offset: usize) -> Result<()> {
        let range = byte_range(bytes.len(), offset, self.species().vector_byte_size())?;
        self.encode_ne(&mut bytes[range]);
        Ok(())
    }

    pub fn from_byte_buffer(species: VectorSpecies<E>, buffer: &ByteBuffer, offset: usize) -> Result<Self> {
        let bytes = buffer.readable(offset, species.vector_byte_size())?;
        Ok(Self::decode_ne(species, bytes))
    }

    pub fn into_byte_buffer(&self, buffer: &mut ByteBuffer, offset: usize) -> Result<()> {
        let bytes = buffer.writable(offset, self.species().vector_byte_size())?;
        self.encode_ne(bytes);
        Ok(())
    }

    /// The lanes as native-order bytes.
    pub fn to_ne_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.species().vector_byte_size()];
        self.encode_ne(&mut bytes);
        bytes
    }

    /// `bytes` holds exactly `vector_byte_size` bytes.
    pub(crate) fn decode_ne(species: VectorSpecies<E>, bytes: &[u8]) -> Self {
        let size = E::KIND.bytes();
        Self::from_lanes(species, bytes.chunks_exact(size).map(E::read_ne).collect())
    }

    fn encode_ne(&self, out: &mut [u8]) {
        let size = E::KIND.bytes();
        for (chunk, &lane) in out.chunks_exact_mut(size).zip(self.as_slice()) {
            lane.write_ne(chunk);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ByteOrder;
    use crate::shape::Shape;

    fn species() -> VectorSpecies<i32> {
        VectorSpecies::of(Shape::S128)
    }

    mod slices {
        use super::*;

        #[test]
        fn test_load_store_offset() {
            let data = [0, 1, 2, 3, 4, 5];
            let v = Vector::from_slice(species(), &data, 2).unwrap();
            assert_eq!(v.to_vec(), vec![2, 3, 4, 5]);
            assert!(Vector::from_slice(species(), &data, 3).is_err());

            let mut out = [0; 6];
            v.into_slice(&mut out, 1).unwrap();
            assert_eq!(out, [0, 2, 3, 4, 5, 0]);
            assert!(v.into_slice(&mut out, 3).is_err());
        }

        #[test]
        fn test_masked_load_store() {
            let data = [7, 8, 9];
            let m = Mask::from_bits(species(), 0b0011);
            let v = Vector::from_slice_masked(species(), &data, 1, &m).unwrap();
            assert_eq!(v.to_vec(), vec![8, 9, 0, 0]);
            let wide = Mask::from_bits(species(), 0b0111);
            assert!(Vector::from_slice_masked(species(), &data, 1, &wide).is_err());

            let mut out = [-1; 3];
            Vector::iota(species()).into_slice_masked(&mut out, 1, &m).unwrap();
            assert_eq!(out, [-1, 0, 1]);
        }
    }

    mod bytes {
        use super::*;

        #[test]
        fn test_byte_codec() {
            let v = Vector::from_slice(species(), &[1, -1, 256, 0], 0).unwrap();
            let bytes = v.to_ne_bytes();
            assert_eq!(bytes.len(), 16);
            assert_eq!(&bytes[0..4], &1i32.to_ne_bytes());
            assert_eq!(Vector::from_bytes(species(), &bytes, 0).unwrap(), v);

            let mut out = vec![0u8; 20];
            v.into_bytes(&mut out, 4).unwrap();
            assert_eq!(&out[4..], &bytes[..]);
            assert!(v.into_bytes(&mut out, 5).is_err());
        }

        #[test]
        fn test_byte_buffer_contract() {
            let v = Vector::from_slice(species(), &[1, 2, 3, 4], 0).unwrap();
            let mut buf = ByteBuffer::allocate(16);
            v.into_byte_buffer(&mut buf, 0).unwrap();
            assert_eq!(Vector::from_byte_buffer(species(), &buf, 0).unwrap(), v);

            let ro = buf.clone().as_read_only();
            assert!(Vector::from_byte_buffer(species(), &ro, 0).is_ok());
            let mut ro = ro;
            assert!(v.into_byte_buffer(&mut ro, 0).is_err());

            let foreign = match ByteOrder::native() {
                ByteOrder::LittleEndian => ByteOrder::BigEndian,
                ByteOrder::BigEndian => ByteOrder::LittleEndian,
            };
            let swapped = buf.with_order(foreign);
            assert!(Vector::from_byte_buffer(species(), &swapped, 0).is_err());
        }
    }
}
