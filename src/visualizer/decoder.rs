//! Packed 5-bit amplitude decoding.
//!
//! Amplitude envelopes are stored as a dense bit stream: sample `n` occupies bits
//! `[n * 5, n * 5 + 5)`. Bits are consumed from the low end of each byte first, and a
//! sample that does not fit in the rest of its byte continues in the low-order bits of
//! the next byte.

use thiserror::Error;

/// Number of bits used by one packed sample.
pub const BITS_PER_SAMPLE: usize = 5;

const SAMPLE_MASK: u8 = (1 << BITS_PER_SAMPLE) - 1;

/// One decoded amplitude value in `0..=31`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Sample(u8);

impl Sample {
    /// Loudest representable amplitude.
    pub const MAX: Sample = Sample(SAMPLE_MASK);

    /// Creates a sample, keeping only the low 5 bits.
    pub fn new(value: u8) -> Self {
        Sample(value & SAMPLE_MASK)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Amplitude as a fraction of [`Sample::MAX`].
    pub fn fraction(self) -> f32 {
        self.0 as f32 / SAMPLE_MASK as f32
    }
}

/// Errors raised while reading or writing packed samples.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("sample {index} needs bits beyond the end of a {bit_len}-bit buffer")]
    OutOfRange { index: usize, bit_len: usize },

    #[error("value {value} at position {position} does not fit in 5 bits")]
    ValueOutOfRange { position: usize, value: u8 },
}

/// An immutable packed amplitude envelope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AmplitudeBuffer {
    bytes: Vec<u8>,
}

impl AmplitudeBuffer {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn sample_count(&self) -> usize {
        sample_count(self.bytes.len())
    }

    /// Sample at `index`, zero-filled past the end.
    pub fn sample(&self, index: usize) -> Sample {
        decode_zero_filled(&self.bytes, index)
    }

    /// Loudest sample in `range`, or silence for an empty range.
    pub fn peak(&self, range: std::ops::Range<usize>) -> Sample {
        range.map(|i| self.sample(i)).max().unwrap_or_default()
    }
}

impl From<Vec<u8>> for AmplitudeBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

/// Number of whole samples stored in a buffer of `byte_len` bytes.
pub fn sample_count(byte_len: usize) -> usize {
    byte_len * 8 / BITS_PER_SAMPLE
}

/// Decodes sample `index`, failing when any of its bits lie past the end of `buffer`.
pub fn decode(buffer: &[u8], index: usize) -> Result<Sample, DecodeError> {
    let bit_len = buffer.len() * 8;
    let end = index
        .checked_mul(BITS_PER_SAMPLE)
        .and_then(|start| start.checked_add(BITS_PER_SAMPLE));
    match end {
        Some(end) if end <= bit_len => Ok(decode_zero_filled(buffer, index)),
        _ => Err(DecodeError::OutOfRange { index, bit_len }),
    }
}

/// Decodes sample `index`, reading any bits past the end of `buffer` as zero.
///
/// Used by the render pass so a truncated stream still draws.
pub fn decode_zero_filled(buffer: &[u8], index: usize) -> Sample {
    let bit_offset = index.saturating_mul(BITS_PER_SAMPLE);
    let byte_index = bit_offset / 8;
    let bit_in_byte = bit_offset % 8;

    let Some(&current) = buffer.get(byte_index) else {
        return Sample::default();
    };

    let available = 8 - bit_in_byte;
    let take = available.min(BITS_PER_SAMPLE);
    let mut value = (current >> bit_in_byte) & low_mask(take);

    if available < BITS_PER_SAMPLE {
        let rest = BITS_PER_SAMPLE - available;
        let low = buffer.get(byte_index + 1).map_or(0, |next| next & low_mask(rest));
        value = (value << rest) | low;
    }

    Sample(value)
}

/// Packs 5-bit values into the layout read by [`decode`].
///
/// The last byte is zero-padded. Values above 31 are rejected.
pub fn pack_samples(values: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let bit_len = values.len() * BITS_PER_SAMPLE;
    let mut bytes = vec![0u8; bit_len.div_ceil(8)];

    for (position, &value) in values.iter().enumerate() {
        if value > SAMPLE_MASK {
            return Err(DecodeError::ValueOutOfRange { position, value });
        }

        let bit_offset = position * BITS_PER_SAMPLE;
        let byte_index = bit_offset / 8;
        let bit_in_byte = bit_offset % 8;
        let available = 8 - bit_in_byte;

        if available >= BITS_PER_SAMPLE {
            bytes[byte_index] |= value << bit_in_byte;
        } else {
            // High bits finish this byte, low bits start the next one.
            let rest = BITS_PER_SAMPLE - available;
            bytes[byte_index] |= (value >> rest) << bit_in_byte;
            bytes[byte_index + 1] |= value & low_mask(rest);
        }
    }

    Ok(bytes)
}

fn low_mask(bits: usize) -> u8 {
    ((1u16 << bits) - 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_full_byte_is_max() {
        let buffer = [0b0001_1111];
        assert_eq!(sample_count(buffer.len()), 1);
        assert_eq!(decode(&buffer, 0).unwrap(), Sample::MAX);
    }

    #[test]
    fn test_upper_bits_of_first_byte_are_ignored_for_sample_zero() {
        assert_eq!(decode(&[0b1110_0000], 0).unwrap().value(), 0);
        assert_eq!(decode(&[0b1111_0101], 0).unwrap().value(), 0b10101);
    }

    #[test]
    fn test_straddling_sample_combines_high_and_low_parts() {
        // Sample 1 starts at bit 5: three bits from byte 0 (0b101), two from byte 1 (0b10).
        let buffer = [0b1010_0000, 0b0000_0010];
        assert_eq!(decode(&buffer, 1).unwrap().value(), 0b10110);
    }

    #[test]
    fn test_every_straddle_offset() {
        // Bit offsets 5, 10, 15, 20, 25, 30, 35 cover all in-byte positions.
        let values: Vec<u8> = vec![0, 31, 1, 16, 21, 10, 7, 30];
        let packed = pack_samples(&values).unwrap();
        assert_eq!(packed.len(), 5);
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(decode(&packed, i).unwrap().value(), v, "sample {i}");
        }
    }

    #[test]
    fn test_pack_then_decode_identity() {
        for len in 0..40usize {
            let values: Vec<u8> = (0..len).map(|i| ((i * 7 + 3) % 32) as u8).collect();
            let packed = pack_samples(&values).unwrap();
            assert!(sample_count(packed.len()) >= len);
            for (i, &v) in values.iter().enumerate() {
                assert_eq!(decode(&packed, i), Ok(Sample::new(v)));
            }
        }
    }

    #[test]
    fn test_two_bytes_hold_three_samples() {
        let packed = pack_samples(&[3, 17, 29]).unwrap();
        assert_eq!(packed.len(), 2);
        assert_eq!(sample_count(packed.len()), 3);
        assert_eq!(decode(&packed, 2).unwrap().value(), 29);
    }

    #[test]
    fn test_out_of_range_is_reported() {
        let buffer = [0xff, 0xff];
        assert_eq!(
            decode(&buffer, 3),
            Err(DecodeError::OutOfRange { index: 3, bit_len: 16 })
        );
        assert!(decode(&[], 0).is_err());
        assert!(decode(&buffer, usize::MAX).is_err());
    }

    #[test]
    fn test_zero_filled_decode_pads_missing_bits() {
        // Sample 1 of a single byte: three real bits, two missing.
        let buffer = [0b1110_0000];
        assert!(decode(&buffer, 1).is_err());
        assert_eq!(decode_zero_filled(&buffer, 1).value(), 0b11100);
        assert_eq!(decode_zero_filled(&buffer, 9).value(), 0);
    }

    #[test]
    fn test_pack_rejects_wide_values() {
        assert_eq!(
            pack_samples(&[1, 32]),
            Err(DecodeError::ValueOutOfRange { position: 1, value: 32 })
        );
    }

    #[test]
    fn test_buffer_peak() {
        let buffer = AmplitudeBuffer::new(pack_samples(&[2, 9, 4, 30, 1]).unwrap());
        assert_eq!(buffer.sample_count(), 6);
        assert_eq!(buffer.peak(0..3).value(), 9);
        assert_eq!(buffer.peak(2..5).value(), 30);
        assert_eq!(buffer.peak(3..3), Sample::default());
    }

    #[test]
    fn test_sample_fraction() {
        assert_eq!(Sample::MAX.fraction(), 1.0);
        assert_eq!(Sample::default().fraction(), 0.0);
        assert_eq!(Sample::new(0xff), Sample::MAX);
    }
}
