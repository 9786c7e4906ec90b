//! Channel downmix and linear-interpolation rate conversion.

use super::pcm::PcmBuffer;

/// Sample rate of telephony prompts.
pub const TARGET_SAMPLE_RATE: u32 = 8000;

/// Average all channels of each frame into a single mono sample.
///
/// Every channel gets the same weight. A trailing incomplete frame is dropped.
pub fn downmix(buffer: &PcmBuffer) -> PcmBuffer {
    if buffer.channels <= 1 {
        return buffer.clone();
    }

    let channels = buffer.channels as usize;
    let samples = buffer
        .samples
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i64 = frame.iter().map(|&s| s as i64).sum();
            (sum / channels as i64) as i32
        })
        .collect();

    PcmBuffer::new(samples, 1, buffer.sample_rate, buffer.width)
}

/// Convert a mono buffer to `rate_out` by linear interpolation.
///
/// Output sample `i` sits at source position `i * rate_in / rate_out`. The
/// bracketing source samples are clamped to the buffer bounds, so the last
/// output samples repeat the final input sample instead of extrapolating.
pub fn resample(buffer: &PcmBuffer, rate_out: u32) -> PcmBuffer {
    debug_assert!(buffer.is_mono(), "resample expects a mono buffer");

    let rate_in = buffer.sample_rate;
    if rate_in == rate_out || rate_in == 0 || rate_out == 0 {
        return buffer.clone();
    }

    let input = &buffer.samples;
    let len_in = input.len() as u64;
    let len_out = (len_in * rate_out as u64).div_ceil(rate_in as u64);
    let last = input.len().saturating_sub(1);

    let samples = (0..len_out)
        .map(|i| {
            let position = i * rate_in as u64;
            let index = (position / rate_out as u64) as usize;
            let frac = (position % rate_out as u64) as f64 / rate_out as f64;

            let left = input[index.min(last)] as f64;
            let right = input[(index + 1).min(last)] as f64;
            (left + (right - left) * frac).round() as i32
        })
        .collect();

    PcmBuffer::new(samples, 1, rate_out, buffer.width)
}

/// Bring any buffer to 8 kHz mono.
///
/// Downmixing happens before rate conversion; interpolating the channels
/// separately and mixing afterwards shifts the interpolation phase.
pub fn to_telephony(buffer: PcmBuffer) -> PcmBuffer {
    let mono = if buffer.is_mono() {
        buffer
    } else {
        downmix(&buffer)
    };

    if mono.sample_rate == TARGET_SAMPLE_RATE {
        return mono;
    }
    resample(&mono, TARGET_SAMPLE_RATE)
}
