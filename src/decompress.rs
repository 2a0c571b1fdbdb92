use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::definitions::*;
use crate::error::{Error, Result};
use crate::varint::decode_varint;

// uncompressed_length returns the length of the decoded block.
// Only the preamble is read; the chunks after it are not checked.
pub fn uncompressed_length(src: &[u8]) -> Result<usize> {
    let (n, _) = decode_varint(src, 0)?;
    Ok(n as usize)
}

/// Decompresses a Snappy block into a newly allocated buffer of exactly the
/// declared length.
pub fn decompress(src: &[u8]) -> Result<Vec<u8>> {
    let (n, s) = read_header(src)?;

    let mut dst = Vec::new();
    dst.try_reserve_exact(n)?;
    dst.resize(n, 0);

    decode(&mut SliceWriter { dst: &mut dst, d: 0 }, &src[s..])?;

    debug!("snappy: decompressed {} bytes into {}", src.len(), n);
    Ok(dst)
}

// decompress_into writes the decoded form of src into dst and returns the
// length written.
// Returns an error if dst is shorter than the declared length.
pub fn decompress_into(dst: &mut [u8], src: &[u8]) -> Result<usize> {
    let (n, s) = read_header(src)?;
    if dst.len() < n {
        return Err(Error::BufferTooSmall {
            needed: n,
            actual: dst.len(),
        });
    }

    decode(&mut SliceWriter { dst: &mut dst[..n], d: 0 }, &src[s..])?;
    Ok(n)
}

/// Checks that `src` is a well-formed block without producing its output.
///
/// Succeeds exactly when [`decompress`] would.
pub fn validate_compressed(src: &[u8]) -> Result<()> {
    let (n, s) = read_header(src)?;
    decode(&mut Validator { limit: n, d: 0 }, &src[s..])
}

fn corrupt<T>(why: std::fmt::Arguments) -> Result<T> {
    debug!("snappy: corrupt input: {}", why);
    Err(Error::CorruptStream)
}

// read_header parses the preamble and returns the declared length and the
// position of the first chunk.
fn read_header(src: &[u8]) -> Result<(usize, usize)> {
    let (n, s) = decode_varint(src, 0)?;
    let n = n as usize;

    // Refuse before allocating if no chunk stream this short could decode
    // to n bytes.
    if n > (src.len() - s).saturating_mul(MAX_EXPANSION) {
        return corrupt(format_args!(
            "declared length {} from {} bytes of chunks",
            n,
            src.len() - s
        ));
    }
    Ok((n, s))
}

// Destination of decoded chunks. Implementations check every chunk against
// the declared length and the bytes produced so far.
trait Writer {
    fn literal(&mut self, lit: &[u8]) -> Result<()>;
    fn copy(&mut self, offset: usize, length: usize) -> Result<()>;
    fn finish(&self) -> Result<()>;
}

struct SliceWriter<'a> {
    dst: &'a mut [u8],
    d: usize,
}

impl Writer for SliceWriter<'_> {
    fn literal(&mut self, lit: &[u8]) -> Result<()> {
        if lit.len() > self.dst.len() - self.d {
            return corrupt(format_args!(
                "literal of {} bytes at {} overruns {}",
                lit.len(),
                self.d,
                self.dst.len()
            ));
        }
        self.dst[self.d..self.d + lit.len()].copy_from_slice(lit);
        self.d += lit.len();
        Ok(())
    }

    fn copy(&mut self, offset: usize, length: usize) -> Result<()> {
        check_copy(offset, length, self.d, self.dst.len())?;

        let start = self.d - offset;
        if offset >= length {
            self.dst.copy_within(start..start + length, self.d);
        } else {
            // Overlapping copy: later bytes repeat the ones just written.
            for i in 0..length {
                self.dst[self.d + i] = self.dst[start + i];
            }
        }
        self.d += length;
        Ok(())
    }

    fn finish(&self) -> Result<()> {
        check_finished(self.d, self.dst.len())
    }
}

struct Validator {
    limit: usize,
    d: usize,
}

impl Writer for Validator {
    fn literal(&mut self, lit: &[u8]) -> Result<()> {
        if lit.len() > self.limit - self.d {
            return corrupt(format_args!(
                "literal of {} bytes at {} overruns {}",
                lit.len(),
                self.d,
                self.limit
            ));
        }
        self.d += lit.len();
        Ok(())
    }

    fn copy(&mut self, offset: usize, length: usize) -> Result<()> {
        check_copy(offset, length, self.d, self.limit)?;
        self.d += length;
        Ok(())
    }

    fn finish(&self) -> Result<()> {
        check_finished(self.d, self.limit)
    }
}

fn check_copy(offset: usize, length: usize, d: usize, limit: usize) -> Result<()> {
    if offset == 0 || offset > d {
        return corrupt(format_args!("copy offset {} with {} bytes decoded", offset, d));
    }
    if length > limit - d {
        return corrupt(format_args!(
            "copy of {} bytes at {} overruns {}",
            length, d, limit
        ));
    }
    Ok(())
}

fn check_finished(d: usize, limit: usize) -> Result<()> {
    if d != limit {
        return corrupt(format_args!("stream ended after {} of {} bytes", d, limit));
    }
    Ok(())
}

// decode walks the chunk stream once, handing every chunk to w. The stream
// must end exactly where w reaches the declared length: w rejects any chunk
// past it, so trailing bytes fail too.
fn decode<W: Writer>(w: &mut W, src: &[u8]) -> Result<()> {
    let mut s: usize = 0;

    while s < src.len() {
        let tag = src[s];

        match tag & 0x03 {
            // Parse a Literal Chunk
            TAG_LITERAL => {
                let m = (tag >> 2) as usize;
                let n = if m < 60 {
                    s += 1;
                    m as u64
                } else {
                    let width = m - 59;
                    if width > src.len() - s - 1 {
                        return corrupt(format_args!("literal length cut off at {}", s));
                    }
                    let n = LittleEndian::read_uint(&src[s + 1..], width);
                    s += 1 + width;
                    n
                };

                if n >= (src.len() - s) as u64 {
                    return corrupt(format_args!(
                        "literal of {} bytes with {} left",
                        n + 1,
                        src.len() - s
                    ));
                }
                let length = n as usize + 1;

                w.literal(&src[s..s + length])?;
                s += length;
            }

            // Parse a Copy1 Chunk
            TAG_COPY_1 => {
                if src.len() - s < 2 {
                    return corrupt(format_args!("copy cut off at {}", s));
                }
                let length = 4 + ((tag >> 2) & 0x07) as usize;
                let offset = ((tag & 0xe0) as usize) << 3 | src[s + 1] as usize;
                s += 2;
                w.copy(offset, length)?;
            }

            // Parse a Copy2 Chunk
            TAG_COPY_2 => {
                if src.len() - s < 3 {
                    return corrupt(format_args!("copy cut off at {}", s));
                }
                let length = 1 + (tag >> 2) as usize;
                let offset = LittleEndian::read_u16(&src[s + 1..]) as usize;
                s += 3;
                w.copy(offset, length)?;
            }

            // Parse a Copy4 Chunk
            _ => {
                debug_assert_eq!(tag & 0x03, TAG_COPY_4);
                if src.len() - s < 5 {
                    return corrupt(format_args!("copy cut off at {}", s));
                }
                let length = 1 + (tag >> 2) as usize;
                let offset = LittleEndian::read_u32(&src[s + 1..]) as usize;
                s += 5;
                w.copy(offset, length)?;
            }
        }
    }

    w.finish()
}
