//! Capture stream construction
//!
//! Builds the cpal input stream that feeds the service. The data callback
//! runs on the host's real-time audio thread: it folds interleaved frames
//! to mono and pushes them into a lock-free ring without blocking,
//! allocating or logging. Samples that do not fit are dropped.

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate};
use rtrb::RingBuffer;

use super::device;
use super::error::{CaptureError, CaptureResult};

/// Sample-rate floor for capture configs.
///
/// Some input devices advertise very low minimum rates; clamping to 40 kHz
/// keeps the time span of a fixed-length window consistent across devices.
const MIN_SAMPLE_RATE: u32 = 40_000;

/// Ring capacity between the audio callback and the service thread.
///
/// Holds a few hundred milliseconds at 48 kHz, enough to ride out a slow
/// service loop iteration without dropping samples.
const RING_CAPACITY: usize = 16_384;

/// A running capture stream and the consuming end of its sample ring.
///
/// The stream stops when this is dropped. cpal streams are not `Send`, so
/// the value must stay on the thread that built it.
pub struct ActiveCapture {
    consumer: rtrb::Consumer<f32>,
    _stream: cpal::Stream,
}

impl ActiveCapture {
    /// Pop the next buffered mono sample, if any.
    pub fn pop(&mut self) -> Option<f32> {
        self.consumer.pop().ok()
    }
}

/// Build and start a capture stream for the given device selection.
///
/// `None` selects the host's default input device.
pub fn open(device_name: Option<&str>) -> CaptureResult<ActiveCapture> {
    let device = device::find_input_device(device_name)?;
    let config = input_config(&device)?;
    let channels = config.channels.max(1) as usize;

    let (mut producer, consumer) = RingBuffer::<f32>::new(RING_CAPACITY);

    let stream = device
        .build_input_stream(
            &config,
            move |data: &[f32], _info: &cpal::InputCallbackInfo| {
                for frame in data.chunks_exact(channels) {
                    let _ = producer.push(fold_frame(frame));
                }
            },
            |err| {
                log::error!("Capture stream error: {}", err);
            },
            None,
        )
        .map_err(|e| CaptureError::StreamBuildError(e.to_string()))?;

    stream
        .play()
        .map_err(|e| CaptureError::StreamPlayError(e.to_string()))?;

    Ok(ActiveCapture {
        consumer,
        _stream: stream,
    })
}

/// Pick a stream config for the device, clamping the sample rate to the
/// supported range with a 40 kHz floor.
fn input_config(device: &cpal::Device) -> CaptureResult<cpal::StreamConfig> {
    let ranges: Vec<_> = device
        .supported_input_configs()
        .map_err(|e| CaptureError::ConfigError(e.to_string()))?
        .collect();

    // Prefer f32 so the callback consumes samples without conversion
    let range = ranges
        .iter()
        .find(|r| r.sample_format() == SampleFormat::F32)
        .or_else(|| ranges.first())
        .ok_or_else(|| CaptureError::ConfigError("No supported input configurations".to_string()))?
        .clone();

    let min_rate = range.min_sample_rate().0;
    let max_rate = range.max_sample_rate().0;
    let rate = min_rate.max(MIN_SAMPLE_RATE).min(max_rate);

    let config = range.with_sample_rate(SampleRate(rate)).config();
    log::info!(
        "Capture config: {} channels @ {} Hz",
        config.channels,
        config.sample_rate.0
    );

    Ok(config)
}

/// Fold one interleaved frame to a mono sample by averaging its channels.
fn fold_frame(frame: &[f32]) -> f32 {
    frame.iter().sum::<f32>() / frame.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_frame_passes_through() {
        assert_eq!(fold_frame(&[0.5]), 0.5);
        assert_eq!(fold_frame(&[-1.0]), -1.0);
    }

    #[test]
    fn test_stereo_frame_averages_channels() {
        assert_eq!(fold_frame(&[1.0, 0.0]), 0.5);
        assert_eq!(fold_frame(&[0.25, 0.75]), 0.5);
    }

    #[test]
    fn test_opposite_channels_cancel() {
        assert_eq!(fold_frame(&[1.0, -1.0]), 0.0);
    }

    #[test]
    fn test_multichannel_average() {
        let frame = [0.2, 0.4, 0.6, 0.8];
        assert!((fold_frame(&frame) - 0.5).abs() < 1e-6);
    }
}
