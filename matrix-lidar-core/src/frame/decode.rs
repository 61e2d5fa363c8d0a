//! Little-endian sample decoder

use core::iter::FusedIterator;
use core::slice::ChunksExact;

/// Decode raw frame bytes into 16-bit samples
///
/// Bytes are consumed in pairs starting at index 0, each pair giving
/// `(hi << 8) | lo`. An odd trailing byte is ignored.
pub fn decode_samples(bytes: &[u8]) -> Samples<'_> {
    Samples {
        pairs: bytes.chunks_exact(2),
    }
}

/// Iterator over the samples of a raw frame
#[derive(Debug, Clone)]
pub struct Samples<'a> {
    pairs: ChunksExact<'a, u8>,
}

impl Iterator for Samples<'_> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        self.pairs
            .next()
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pairs.size_hint()
    }
}

impl DoubleEndedIterator for Samples<'_> {
    fn next_back(&mut self) -> Option<u16> {
        self.pairs
            .next_back()
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
    }
}

impl ExactSizeIterator for Samples<'_> {}

impl FusedIterator for Samples<'_> {}
