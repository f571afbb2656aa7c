//! Ripple Core - capture service and signal domain logic
//!
//! Everything the scope binary needs that is not UI: the audio capture
//! service and its client handle, the resolution curve that maps slider
//! positions to window lengths, and the buffer holding the latest batch
//! of samples.

pub mod capture;
pub mod curve;
pub mod signal;

pub use capture::{CaptureError, CaptureHandle, CaptureResult};
pub use curve::ResolutionCurve;
pub use signal::SignalBuffer;
