//! Snappy block format compression.
//!
//! A compressed block is the varint-encoded length of the decoded data
//! followed by a stream of literal and copy chunks. See
//! <https://github.com/google/snappy/blob/main/format_description.txt>.
//!
//! ```
//! let data = b"The quick red fox jumped over the lazy dog, the lazy dog.";
//! let blob = snappy_block::compress(data).unwrap();
//! assert_eq!(snappy_block::uncompressed_length(&blob).unwrap(), data.len());
//! assert_eq!(snappy_block::uncompress(&blob).unwrap(), data);
//! ```

// Definitions
mod definitions {

	//
	// Each encoded block begins with the varint-encoded length of the decoded data,
	// followed by a sequence of chunks. Chunks begin and end on byte boundaries.
	// The first byte of each chunk is broken into its 2 least and 6 most
	// significant bits called l and m: l ranges in [0, 4) and m ranges in [0, 64).
	// l is the chunk tag. Zero means a literal tag. All other values mean a copy tag.
	//
	// For literal tags:
	// - If m < 60, the next 1 + m bytes are literal bytes.
	// - Otherwise, let n be the little-endian unsigned integer denoted by the next
	// m - 59 bytes. The next 1 + n bytes after that are literal bytes.
	//
	// For copy tags, length bytes are copied from offset bytes ago, in the style of
	// Lempel-Ziv compression algorithms. In particular:
	// - For l == 1, the offset ranges in [0, 1<<11) and the length in [4, 12).
	// The length is 4 + the low 3 bits of m. The high 3 bits of m form bits 8-10
	// of the offset. The next byte is bits 0-7 of the offset.
	// - For l == 2, the offset ranges in [0, 1<<16) and the length in [1, 65).
	// The length is 1 + m. The offset is the little-endian unsigned integer
	// denoted by the next 2 bytes.
	// - For l == 3, the offset ranges in [0, 1<<32) and the length in [1, 65).
	// The length is 1 + m. The offset is the little-endian unsigned integer
	// denoted by the next 4 bytes. The encoder never writes it.
	//
    pub const TAG_LITERAL: u8 = 0x00;
    pub const TAG_COPY_1: u8 = 0x01;
    pub const TAG_COPY_2: u8 = 0x02;
    pub const TAG_COPY_4: u8 = 0x03;

    // Inputs are compressed in independent fragments of this size, the same as
    // the C++ code, so every offset fits in a TAG_COPY_2 chunk.
    pub const MAX_BLOCK_SIZE: usize = 1 << 16;

    // We limit how far copy back-references can go, the same as the C++ code.
    pub const MAX_OFFSET: usize = 1 << 15;

    // The hash table size ranges from 1<<8 to 1<<14 inclusive.
    pub const MIN_TABLE_SIZE: usize = 1 << 8;
    pub const MAX_TABLE_SIZE: usize = 1 << 14;

    // Shorter matches cost more as a copy than as literal bytes.
    pub const MIN_MATCH: usize = 4;

    // A u32 needs at most 5 bytes as a varint.
    pub const MAX_VARINT_LEN: usize = 5;

    // No chunk decodes to more than 22 bytes per byte of input: a 3 byte
    // TAG_COPY_2 yields at most 64.
    pub const MAX_EXPANSION: usize = 22;
}

mod error;
pub use self::error::{Error, Result};

// Length preamble
mod varint;
pub use self::varint::{decode_varint, encode_varint, varint_len};

// Chunk writers
mod encode;

mod match_finder;

// Snappy Compressor
mod compress;
pub use self::compress::{compress, compress_into, max_compressed_length};

// Snappy Decompressor
mod decompress;
pub use self::decompress::{decompress, decompress_into, uncompressed_length, validate_compressed};

/// Decompresses a Snappy block into a newly allocated buffer.
///
/// Identical to [`decompress`]; both names are offered because bindings have
/// historically exposed either one.
pub fn uncompress(src: &[u8]) -> Result<Vec<u8>> {
    decompress(src)
}
