//! Latest-batch signal storage
//!
//! The scope never accumulates history. Each batch from the capture service
//! replaces the previous one wholesale, and the renderer reads whatever the
//! most recent batch happens to be at its own cadence.

/// Holds the most recently ingested sample batch.
///
/// Samples are normalized amplitudes in `[-1, 1]`, oldest first.
/// Replacement is total: a new batch discards the old one regardless of
/// their lengths.
#[derive(Debug, Default)]
pub struct SignalBuffer {
    samples: Vec<f32>,
}

impl SignalBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    /// Replace the contents with a new batch.
    pub fn ingest(&mut self, batch: Vec<f32>) {
        self.samples = batch;
    }

    /// The latest batch.
    pub fn current(&self) -> &[f32] {
        &self.samples
    }

    /// Number of samples in the latest batch.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds any samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
