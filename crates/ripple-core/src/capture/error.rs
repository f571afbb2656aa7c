//! Capture service error types

use thiserror::Error;

/// Errors that can occur during capture operations
#[derive(Error, Debug)]
pub enum CaptureError {
    /// No input devices available on the host
    #[error("No audio input devices found")]
    NoDevices,

    /// Named device not present among the host's inputs
    #[error("Audio input device not found: {0}")]
    DeviceNotFound(String),

    /// Failed to get a usable device configuration
    #[error("Failed to get capture config: {0}")]
    ConfigError(String),

    /// Failed to build the input stream
    #[error("Failed to build capture stream: {0}")]
    StreamBuildError(String),

    /// Failed to start the input stream
    #[error("Failed to start capture stream: {0}")]
    StreamPlayError(String),

    /// Failed to spawn the service thread
    #[error("Failed to spawn capture service: {0}")]
    SpawnError(String),

    /// The service thread is no longer running
    #[error("Capture service stopped")]
    ServiceStopped,
}

/// Result type for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;
