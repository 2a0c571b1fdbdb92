use log::{debug, trace};

use crate::definitions::*;
use crate::encode::{emit_copy, emit_literal};
use crate::error::{Error, Result};
use crate::match_finder::MatchFinder;
use crate::varint::encode_varint;

/// Compresses `src` into a newly allocated buffer.
///
/// Succeeds for any input a 32-bit length preamble can describe, including
/// the empty slice, which compresses to the single byte `0x00`.
pub fn compress(src: &[u8]) -> Result<Vec<u8>> {
    check_input_len(src)?;

    let max_len = max_compressed_length(src.len());
    let mut dst = Vec::new();
    dst.try_reserve_exact(max_len)?;
    dst.resize(max_len, 0);

    let n = compress_into(&mut dst, src)?;
    dst.truncate(n);
    Ok(dst)
}

// compress_into writes the encoded form of src into dst and returns the
// length written.
// Returns an error if dst is shorter than max_compressed_length(src.len()).
pub fn compress_into(dst: &mut [u8], src: &[u8]) -> Result<usize> {
    check_input_len(src)?;

    let needed = max_compressed_length(src.len());
    if dst.len() < needed {
        return Err(Error::BufferTooSmall {
            needed,
            actual: dst.len(),
        });
    }

    // Start Block with varint-encoded length of decompressed bytes
    let mut d = encode_varint(dst, src.len() as u32);

    let mut finder = MatchFinder::new();
    for fragment in src.chunks(MAX_BLOCK_SIZE) {
        d += compress_fragment(&mut dst[d..], fragment, &mut finder);
    }

    debug!("snappy: compressed {} bytes into {}", src.len(), d);
    Ok(d)
}

// compress_fragment encodes one fragment of at most MAX_BLOCK_SIZE bytes.
// Copies never reach back before the start of the fragment.
fn compress_fragment(dst: &mut [u8], src: &[u8], finder: &mut MatchFinder) -> usize {
    let mut d: usize = 0;

    // Return early if src is short
    if src.len() <= MIN_MATCH {
        if !src.is_empty() {
            d += emit_literal(dst, src);
        }
        return d;
    }

    finder.reset(src.len());

    // Iterate over the source bytes
    let mut s: usize = 0;
    let mut lit: usize = 0;

    while s + MIN_MATCH <= src.len() {
        // If there is no match here, accumulate a literal byte.
        let m = match finder.find(src, s) {
            Some(m) => m,
            None => {
                s += 1;
                continue;
            }
        };

        // Otherwise, we have a match. First, emit any pending literal bytes.
        if lit != s {
            d += emit_literal(&mut dst[d..], &src[lit..s]);
        }

        // Emit the copied bytes.
        d += emit_copy(&mut dst[d..], m.offset, m.length);
        s += m.length;
        lit = s;
    }

    // Emit any final pending literal bytes and return.
    if lit != src.len() {
        d += emit_literal(&mut dst[d..], &src[lit..]);
    }

    trace!("snappy: fragment of {} bytes encoded in {}", src.len(), d);
    d
}

fn check_input_len(src: &[u8]) -> Result<()> {
    if src.len() > u32::MAX as usize {
        return Err(Error::InputTooLarge(src.len()));
    }
    Ok(())
}

// max_compressed_length returns the maximum length of a snappy block, given
// its uncompressed length.
pub fn max_compressed_length(src_len: usize) -> usize {
    32usize.saturating_add(src_len).saturating_add(src_len / 6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_just_the_preamble() {
        assert_eq!(compress(b"").unwrap(), vec![0x00]);
    }

    #[test]
    fn short_input_is_one_literal() {
        assert_eq!(compress(b"a").unwrap(), vec![0x01, 0x00, b'a']);
        assert_eq!(compress(b"abcd").unwrap(), vec![0x04, 0x0c, b'a', b'b', b'c', b'd']);
    }

    #[test]
    fn run_becomes_literal_then_copy() {
        let src = [b'a'; 20];
        assert_eq!(
            compress(&src).unwrap(),
            vec![20, 0x00, b'a', 18 << 2 | TAG_COPY_2, 0x01, 0x00]
        );
    }

    #[test]
    fn short_repeat_uses_copy_1() {
        // "abcdefgh" twice: 8 literals then an 8 byte copy 8 back.
        let src = b"abcdefghabcdefgh";
        assert_eq!(
            compress(src).unwrap(),
            [&[16u8, 7 << 2][..], b"abcdefgh", &[0x11, 0x08]].concat()
        );
    }

    #[test]
    fn fragments_are_independent() {
        // Each fragment is 7 literal bytes followed by one long copy split
        // into chunks of at most 64 bytes.
        let mut src = vec![0u8; 2 * MAX_BLOCK_SIZE];
        for (i, b) in src.iter_mut().enumerate() {
            *b = (i % 7) as u8;
        }
        let out = compress(&src).unwrap();
        let per_fragment = 1 + 7 + 3 * (MAX_BLOCK_SIZE - 7).div_ceil(64);
        assert!(out.len() <= 3 + 2 * per_fragment, "{}", out.len());
        assert_eq!(&out[3..11], &[6 << 2, 0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(crate::decompress(&out).unwrap(), src);
    }

    #[test]
    fn rejects_short_destination() {
        let mut dst = [0u8; 40];
        assert_eq!(
            compress_into(&mut dst, &[0u8; 10]),
            Err(Error::BufferTooSmall {
                needed: 43,
                actual: 40
            })
        );
    }

    #[test]
    fn bound() {
        assert_eq!(max_compressed_length(0), 32);
        assert_eq!(max_compressed_length(60), 102);
        assert_eq!(max_compressed_length(usize::MAX), usize::MAX);
    }
}
