use byteorder::{ByteOrder, LittleEndian};

use crate::definitions::*;

/// A back-reference found by [`MatchFinder::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Match {
    /// Distance back from the current position, in `1..MAX_OFFSET`.
    pub offset: usize,
    /// Number of matching bytes, at least `MIN_MATCH`.
    pub length: usize,
}

/// Single-slot hash table over 4-byte fingerprints.
///
/// Each slot holds the most recent position whose fingerprint hashed there;
/// collisions overwrite. One finder serves a whole `compress` call and is
/// reset before every fragment.
pub(crate) struct MatchFinder {
    table: Vec<u32>,
    shift: u32,
}

impl MatchFinder {
    pub fn new() -> MatchFinder {
        MatchFinder {
            table: vec![0; MAX_TABLE_SIZE],
            shift: 32 - MIN_TABLE_SIZE.trailing_zeros(),
        }
    }

    /// Sizes and clears the table for a fragment of `len` bytes.
    pub fn reset(&mut self, len: usize) {
        let mut shift = 32 - MIN_TABLE_SIZE.trailing_zeros();
        let mut table_size = MIN_TABLE_SIZE;

        while table_size < MAX_TABLE_SIZE && table_size < len {
            shift -= 1;
            table_size *= 2;
        }

        self.shift = shift;
        // We need to to store values in [-1, inf) in table. To save
        // some initialization time, (re)use the table's zero value
        // and shift the values against this zero: add 1 on writes,
        // subtract 1 on reads.
        self.table[..table_size].fill(0);
    }

    /// Records position `s` and returns the match starting there, if the
    /// previous position with the same hash holds the same four bytes and is
    /// within the window.
    ///
    /// `s + MIN_MATCH` must not exceed `src.len()`.
    pub fn find(&mut self, src: &[u8], s: usize) -> Option<Match> {
        let b = LittleEndian::read_u32(&src[s..]);

        let slot = &mut self.table[hash(b, self.shift)];
        let t = *slot as usize;
        *slot = (s + 1) as u32;

        if t == 0 {
            return None;
        }
        let t = t - 1;

        if s - t >= MAX_OFFSET || LittleEndian::read_u32(&src[t..]) != b {
            return None;
        }

        // Extend the match to be as long as possible
        let mut length = MIN_MATCH;
        while s + length < src.len() && src[s + length] == src[t + length] {
            length += 1;
        }

        Some(Match {
            offset: s - t,
            length,
        })
    }
}

#[inline]
fn hash(u: u32, shift: u32) -> usize {
    (u.wrapping_mul(0x1e35a7bd) >> shift) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_scales_with_fragment() {
        let mut mf = MatchFinder::new();
        mf.reset(10);
        assert_eq!(mf.shift, 24);
        mf.reset(1000);
        assert_eq!(mf.shift, 22);
        mf.reset(MAX_BLOCK_SIZE);
        assert_eq!(mf.shift, 18);
    }

    #[test]
    fn finds_repeat() {
        let src = b"abcdXabcdabcdYY";
        let mut mf = MatchFinder::new();
        mf.reset(src.len());

        for s in 0..5 {
            assert_eq!(mf.find(src, s), None);
        }
        // "abcdabcd" at 5 repeats position 0 for 4 bytes, then 'a' != 'X'.
        assert_eq!(mf.find(src, 5), Some(Match { offset: 5, length: 4 }));
    }

    #[test]
    fn extends_to_end() {
        let src = [b'A'; 100];
        let mut mf = MatchFinder::new();
        mf.reset(src.len());

        assert_eq!(mf.find(&src, 0), None);
        assert_eq!(mf.find(&src, 1), Some(Match { offset: 1, length: 99 }));
    }

    #[test]
    fn ignores_fingerprint_mismatch() {
        let src = b"abcdefgh";
        let mut mf = MatchFinder::new();
        mf.reset(src.len());
        for s in 0..=src.len() - MIN_MATCH {
            assert_eq!(mf.find(src, s), None);
        }
    }

    #[test]
    fn respects_window() {
        let mut src = vec![0u8; MAX_OFFSET + 8];
        for (i, b) in src.iter_mut().enumerate() {
            *b = (i * 7 % 251) as u8;
        }
        src[..4].copy_from_slice(b"wxyz");
        src[MAX_OFFSET..MAX_OFFSET + 4].copy_from_slice(b"wxyz");

        let mut mf = MatchFinder::new();
        mf.reset(src.len());
        assert_eq!(mf.find(&src, 0), None);
        assert_eq!(mf.find(&src, MAX_OFFSET), None);
    }
}
