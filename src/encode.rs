use byteorder::{ByteOrder, LittleEndian};

use crate::definitions::*;

// emit_literal writes a literal chunk and returns the number of bytes written.
//
// It assumes that:
//	dst is long enough
//	1 <= lit.len() && lit.len() <= MAX_BLOCK_SIZE
pub(crate) fn emit_literal(dst: &mut [u8], lit: &[u8]) -> usize {
    let n = lit.len() - 1;

    let i = if n < 60 {
        dst[0] = (n as u8) << 2 | TAG_LITERAL;
        1
    } else {
        // 60, 61, 62 or 63 says how many little-endian bytes of n follow.
        let width = match n {
            0..=0xff => 1,
            0x100..=0xffff => 2,
            0x1_0000..=0xff_ffff => 3,
            _ => 4,
        };
        dst[0] = ((59 + width) as u8) << 2 | TAG_LITERAL;
        LittleEndian::write_uint(&mut dst[1..], n as u64, width);
        1 + width
    };

    dst[i..i + lit.len()].copy_from_slice(lit);
    i + lit.len()
}

// emit_copy writes a copy chunk and returns the number of bytes written.
//
// It assumes that:
//	dst is long enough
//	1 <= offset && offset < MAX_BLOCK_SIZE
//	MIN_MATCH <= length
pub(crate) fn emit_copy(dst: &mut [u8], offset: usize, mut length: usize) -> usize {
    let mut i = 0;

    // Split long copies so that the last chunk is never shorter than
    // MIN_MATCH: emit 64 while that leaves at least 4, then 60 if the rest
    // still does not fit in one chunk.
    while length >= 68 {
        i += emit_copy_2(&mut dst[i..], offset, 64);
        length -= 64;
    }
    if length > 64 {
        i += emit_copy_2(&mut dst[i..], offset, 60);
        length -= 60;
    }

    if length >= 12 || offset >= 1 << 11 {
        i += emit_copy_2(&mut dst[i..], offset, length);
        return i;
    }

    dst[i] = ((offset >> 8) as u8) << 5 | ((length - 4) as u8) << 2 | TAG_COPY_1;
    dst[i + 1] = offset as u8;
    i + 2
}

fn emit_copy_2(dst: &mut [u8], offset: usize, length: usize) -> usize {
    dst[0] = ((length - 1) as u8) << 2 | TAG_COPY_2;
    LittleEndian::write_u16(&mut dst[1..3], offset as u16);
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_literal() {
        let mut dst = [0u8; 8];
        let n = emit_literal(&mut dst, b"abc");
        assert_eq!(&dst[..n], &[2 << 2, b'a', b'b', b'c']);
    }

    #[test]
    fn long_literal_headers() {
        let lit = vec![7u8; 300];
        let mut dst = vec![0u8; 400];
        let n = emit_literal(&mut dst, &lit[..60]);
        assert_eq!(dst[0], 59 << 2);
        assert_eq!(n, 61);

        let n = emit_literal(&mut dst, &lit[..61]);
        assert_eq!(&dst[..2], &[60 << 2, 60]);
        assert_eq!(n, 63);

        let n = emit_literal(&mut dst, &lit);
        assert_eq!(&dst[..3], &[61 << 2, 0x2b, 0x01]);
        assert_eq!(n, 303);
        assert!(dst[3..n].iter().all(|&b| b == 7));
    }

    #[test]
    fn literal_of_a_whole_block() {
        let lit = vec![1u8; MAX_BLOCK_SIZE];
        let mut dst = vec![0u8; MAX_BLOCK_SIZE + 8];
        let n = emit_literal(&mut dst, &lit);
        assert_eq!(&dst[..3], &[61 << 2, 0xff, 0xff]);
        assert_eq!(n, MAX_BLOCK_SIZE + 3);
    }

    #[test]
    fn copy_1_and_copy_2() {
        let mut dst = [0u8; 16];
        assert_eq!(emit_copy(&mut dst, 2, 8), 2);
        assert_eq!(&dst[..2], &[0x11, 0x02]);

        assert_eq!(emit_copy(&mut dst, 0x7ff, 4), 2);
        assert_eq!(&dst[..2], &[0xe1, 0xff]);

        assert_eq!(emit_copy(&mut dst, 1, 19), 3);
        assert_eq!(&dst[..3], &[18 << 2 | TAG_COPY_2, 0x01, 0x00]);

        assert_eq!(emit_copy(&mut dst, 0x800, 4), 3);
        assert_eq!(&dst[..3], &[3 << 2 | TAG_COPY_2, 0x00, 0x08]);
    }

    #[test]
    fn long_copy_is_split() {
        let mut dst = [0u8; 16];
        // 67 = 60 + 7, never 64 + 3.
        assert_eq!(emit_copy(&mut dst, 1, 67), 5);
        assert_eq!(dst[0], 59 << 2 | TAG_COPY_2);
        assert_eq!(dst[3], 0x0d);

        // 132 = 64 + 64 + 4.
        assert_eq!(emit_copy(&mut dst, 1, 132), 8);
        assert_eq!(dst[0], 63 << 2 | TAG_COPY_2);
        assert_eq!(dst[3], 63 << 2 | TAG_COPY_2);
        assert_eq!(dst[6], 0x01);
    }
}
