use super::config::ByteOrder;

const HEADER_LEN: usize = 4;

/// Growable CDR output buffer. Alignment is relative to the end of the
/// encapsulation header, capped at 8.
pub(crate) struct CdrWriter {
    buf: Vec<u8>,
    order: ByteOrder,
}

macro_rules! put_fn {
    ($name:ident, $ty:ty) => {
        pub(crate) fn $name(&mut self, v: $ty) {
            self.align(std::mem::size_of::<$ty>());
            match self.order {
                ByteOrder::Little => self.buf.extend_from_slice(&v.to_le_bytes()),
                ByteOrder::Big => self.buf.extend_from_slice(&v.to_be_bytes()),
            }
        }
    };
}

impl CdrWriter {
    pub(crate) fn new(order: ByteOrder) -> Self {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(&order.header());
        Self { buf, order }
    }

    pub(crate) fn align(&mut self, size: usize) {
        let size = size.min(8);
        let pos = self.buf.len() - HEADER_LEN;
        let pad = (size - pos % size) % size;
        self.buf.resize(self.buf.len() + pad, 0);
    }

    pub(crate) fn put_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub(crate) fn put_i8(&mut self, v: i8) {
        self.buf.push(v as u8);
    }

    put_fn!(put_u16, u16);
    put_fn!(put_i16, i16);
    put_fn!(put_u32, u32);
    put_fn!(put_i32, i32);
    put_fn!(put_u64, u64);
    put_fn!(put_i64, i64);
    put_fn!(put_f32, f32);
    put_fn!(put_f64, f64);

    /// Length (including NUL) + bytes + NUL.
    pub(crate) fn put_string(&mut self, s: &str) -> Result<(), std::num::TryFromIntError> {
        let len = u32::try_from(s.len() + 1)?;
        self.put_u32(len);
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
        Ok(())
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
