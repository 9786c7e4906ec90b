//! Raw PCM sample buffers.

/// Width of a single linear PCM sample in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleWidth {
    /// 8-bit samples, already converted to signed.
    One,
    Two,
    Three,
    Four,
}

impl SampleWidth {
    /// Map a `bits_per_sample` header value to a width.
    ///
    /// Returns `None` for depths that don't occupy whole bytes of 8, 16, 24 or 32 bits.
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            8 => Some(SampleWidth::One),
            16 => Some(SampleWidth::Two),
            24 => Some(SampleWidth::Three),
            32 => Some(SampleWidth::Four),
            _ => None,
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            SampleWidth::One => 1,
            SampleWidth::Two => 2,
            SampleWidth::Three => 3,
            SampleWidth::Four => 4,
        }
    }

    /// Scale a sample of this width to the signed 16-bit range.
    pub fn to_i16_range(self, sample: i32) -> i32 {
        match self {
            SampleWidth::One => sample << 8,
            SampleWidth::Two => sample,
            SampleWidth::Three => sample >> 8,
            SampleWidth::Four => sample >> 16,
        }
    }
}

/// Interleaved linear PCM samples with their format.
///
/// Buffers are produced fresh by every transformation; none of the audio
/// functions change the channel count or rate of a buffer in place.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    pub samples: Vec<i32>,
    pub channels: u16,
    pub sample_rate: u32,
    pub width: SampleWidth,
}

impl PcmBuffer {
    pub fn new(samples: Vec<i32>, channels: u16, sample_rate: u32, width: SampleWidth) -> Self {
        Self {
            samples,
            channels,
            sample_rate,
            width,
        }
    }

    /// Number of complete frames (one sample per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    pub fn is_mono(&self) -> bool {
        self.channels == 1
    }
}
