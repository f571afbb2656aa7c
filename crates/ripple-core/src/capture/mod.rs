//! Audio capture service
//!
//! All cpal state lives on a dedicated service thread. Streams are not
//! `Send`, so the stream is built, owned and dropped by the thread that
//! talks to the audio host. The UI reaches that thread through
//! [`CaptureHandle`], and captured batches come back out through a
//! single-slot signal mailbox.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  CaptureCommand   ┌────────────────┐   rtrb ring   ┌───────────────┐
//! │ UI tasks │ ────────────────► │ CaptureService │ ◄──────────── │ cpal callback │
//! │  (tokio) │ ◄──────────────── │    (thread)    │               │  (RT thread)  │
//! └──────────┘  oneshot replies  └────────────────┘               └───────────────┘
//!       ▲                                │
//!       │         signal mailbox         │
//!       └────────────────────────────────┘
//!           (bounded(1), a fresh batch
//!            displaces an unconsumed one)
//! ```

mod device;
mod error;
mod reconfigure;
mod service;
mod stream;

pub use device::DEFAULT_DEVICE;
pub use error::{CaptureError, CaptureResult};
pub use reconfigure::{reconfigure, ReconfigurationRequest};
pub use service::{CaptureCommand, CaptureHandle, CaptureService, ServiceHandle};
