//! Byte buffers with an explicit byte order and access mode.

use crate::error::{buffer_contract, index_out_of_bounds, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    /// The byte order of the host.
    pub const fn native() -> ByteOrder {
        #[cfg(target_endian = "little")]
        {
            ByteOrder::LittleEndian
        }
        #[cfg(target_endian = "big")]
        {
            ByteOrder::BigEndian
        }
    }
}

/// Owned bytes tagged with a byte order and a read-only flag.
///
/// Vectors only load from and store to native-order buffers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ByteBuffer {
    bytes: Vec<u8>,
    order: ByteOrder,
    read_only: bool,
}

impl ByteBuffer {
    /// A zeroed, writable, native-order buffer.
    pub fn allocate(len: usize) -> Self {
        Self::wrap(vec![0; len])
    }

    /// Takes ownership of `bytes` as a writable, native-order buffer.
    pub fn wrap(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            order: ByteOrder::native(),
            read_only: false,
        }
    }

    pub fn with_order(mut self, order: ByteOrder) -> Self {
        self.order = order;
        self
    }

    pub fn as_read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }

    /// `len` bytes at `offset`, if the buffer is in native order.
    pub(crate) fn readable(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.check_order()?;
        let range = byte_range(self.bytes.len(), offset, len)?;
        Ok(&self.bytes[range])
    }

    /// `len` writable bytes at `offset`.
    pub(crate) fn writable(&mut self, offset: usize, len: usize) -> Result<&mut [u8]> {
        if self.read_only {
            return Err(buffer_contract("buffer is read-only"));
        }
        self.check_order()?;
        let range = byte_range(self.bytes.len(), offset, len)?;
        Ok(&mut self.bytes[range])
    }

    fn check_order(&self) -> Result<()> {
        if self.order == ByteOrder::native() {
            Ok(())
        } else {
            Err(buffer_contract(format!(
                "buffer is {:?}, host is {:?}",
                self.order,
                ByteOrder::native()
            )))
        }
    }
}

/// Bounds-checks `offset..offset + len` against `total`.
pub(crate) fn byte_range(total: usize, offset: usize, len: usize) -> Result<std::ops::Range<usize>> {
    match offset.checked_add(len) {
        Some(end) if end <= total => Ok(offset..end),
        _ => Err(index_out_of_bounds(
            offset as i64,
            total,
            format!("{len} bytes do not fit at this offset"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LanewiseError;

    fn foreign() -> ByteOrder {
        match ByteOrder::native() {
            ByteOrder::LittleEndian => ByteOrder::BigEndian,
            ByteOrder::BigEndian => ByteOrder::LittleEndian,
        }
    }

    #[test]
    fn test_defaults() {
        let buf = ByteBuffer::allocate(8);
        assert_eq!(buf.len(), 8);
        assert_eq!(buf.order(), ByteOrder::native());
        assert!(!buf.is_read_only());
        assert_eq!(buf.into_inner(), vec![0; 8]);
    }

    #[test]
    fn test_contract_violations() {
        let mut ro = ByteBuffer::allocate(8).as_read_only();
        assert!(ro.readable(0, 8).is_ok());
        assert!(matches!(
            ro.writable(0, 4),
            Err(LanewiseError::BufferContract { .. })
        ));

        let mut other = ByteBuffer::allocate(8).with_order(foreign());
        assert!(matches!(
            other.readable(0, 4),
            Err(LanewiseError::BufferContract { .. })
        ));
        assert!(other.writable(0, 4).is_err());
    }

    #[test]
    fn test_bounds() {
        let buf = ByteBuffer::wrap(vec![1, 2, 3, 4]);
        assert_eq!(buf.readable(1, 3).unwrap(), &[2, 3, 4]);
        assert!(matches!(
            buf.readable(2, 3),
            Err(LanewiseError::IndexOutOfBounds { .. })
        ));
        assert!(byte_range(4, usize::MAX, 2).is_err());
    }
}
