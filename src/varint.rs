use log::debug;

use crate::definitions::MAX_VARINT_LEN;
use crate::error::{Error, Result};

/// Writes `n` as a varint into `dst` and returns the number of bytes written.
///
/// Seven bits go in each byte, least significant group first, and every byte
/// except the last has its high bit set.
///
/// # Panics
///
/// Panics if `dst` is shorter than [`varint_len(n)`](varint_len).
pub fn encode_varint(dst: &mut [u8], mut n: u32) -> usize {
    let mut i = 0;
    while n >= 0x80 {
        dst[i] = (n as u8) | 0x80;
        n >>= 7;
        i += 1;
    }
    dst[i] = n as u8;
    i + 1
}

/// Number of bytes [`encode_varint`] writes for `n`.
pub fn varint_len(n: u32) -> usize {
    match n {
        0..=0x7f => 1,
        0x80..=0x3fff => 2,
        0x4000..=0x1f_ffff => 3,
        0x20_0000..=0xfff_ffff => 4,
        _ => MAX_VARINT_LEN,
    }
}

/// Reads a varint starting at `src[cursor]`.
///
/// Returns the value and the position just past its last byte. Fails with
/// [`Error::MalformedLength`] if `src` ends mid-sequence or the value does
/// not fit in 32 bits.
pub fn decode_varint(src: &[u8], cursor: usize) -> Result<(u32, usize)> {
    let mut value: u32 = 0;

    for i in 0..MAX_VARINT_LEN {
        let b = match src.get(cursor + i) {
            Some(&b) => b,
            None => {
                debug!("snappy: varint truncated after {} bytes", i);
                return Err(Error::MalformedLength);
            }
        };

        // The fifth byte only has room for bits 28-31.
        if i == MAX_VARINT_LEN - 1 && b > 0x0f {
            debug!("snappy: varint wider than 32 bits");
            return Err(Error::MalformedLength);
        }

        value |= u32::from(b & 0x7f) << (7 * i);
        if b < 0x80 {
            return Ok((value, cursor + i + 1));
        }
    }

    debug!("snappy: varint wider than 32 bits");
    Err(Error::MalformedLength)
}
