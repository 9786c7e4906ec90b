//! G.711 mu-law companding.
//!
//! Samples are scaled to the 14-bit range the standard is defined on before
//! encoding. Decoding yields 16-bit linear samples at the midpoint of the
//! quantization interval, so `decode(encode(s))` is lossy but
//! `decode(encode(decode(c))) == decode(c)` for every code `c`.

use super::pcm::{PcmBuffer, SampleWidth};

/// Companding bias in 16-bit units (33 in the 14-bit domain).
const BIAS: i32 = 0x84;

/// Largest magnitude representable after biasing, in 14-bit units.
const CLIP: i32 = 8159;

/// Upper bound of each segment, biased, in 14-bit units.
const SEGMENT_END: [i32; 8] = [0x3F, 0x7F, 0xFF, 0x1FF, 0x3FF, 0x7FF, 0xFFF, 0x1FFF];

const SIGN_BIT: u8 = 0x80;
const QUANT_MASK: u8 = 0x0F;
const SEG_SHIFT: u8 = 4;
const SEG_MASK: u8 = 0x70;

/// Encode one linear sample of the given width into a mu-law byte.
pub fn encode(sample: i32, width: SampleWidth) -> u8 {
    encode_i16(width.to_i16_range(sample))
}

/// Encode one sample already in the signed 16-bit range.
pub fn encode_i16(sample: i32) -> u8 {
    let mut pcm = sample >> 2;

    // mu-law inverts all bits; the sign bit only stays set for positives
    let mask: u8 = if pcm < 0 {
        pcm = -pcm;
        0x7F
    } else {
        0xFF
    };

    let biased = pcm.min(CLIP) + (BIAS >> 2);

    match SEGMENT_END.iter().position(|&end| biased <= end) {
        Some(segment) => {
            let mantissa = ((biased >> (segment + 1)) as u8) & QUANT_MASK;
            (((segment as u8) << SEG_SHIFT) | mantissa) ^ mask
        }
        None => 0x7F ^ mask,
    }
}

/// Decode a mu-law byte into a signed 16-bit linear sample.
pub fn decode(code: u8) -> i16 {
    let code = !code;
    let segment = (code & SEG_MASK) >> SEG_SHIFT;
    let magnitude = ((((code & QUANT_MASK) as i32) << 3) + BIAS) << segment;

    if code & SIGN_BIT != 0 {
        (BIAS - magnitude) as i16
    } else {
        (magnitude - BIAS) as i16
    }
}

/// Quantization step, in 16-bit units, of the segment a code belongs to.
pub fn step_size(code: u8) -> i32 {
    let segment = ((!code) & SEG_MASK) >> SEG_SHIFT;
    8 << segment
}

/// Encode every sample of a buffer, one byte per sample, no header.
pub fn encode_buffer(buffer: &PcmBuffer) -> Vec<u8> {
    buffer
        .samples
        .iter()
        .map(|&s| encode(s, buffer.width))
        .collect()
}
