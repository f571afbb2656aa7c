//! Capture plumbing handlers: signal polling, batch ingestion, viewport
//! tracking and the initial stream start

use iced::{Size, Task};

use super::super::app::ScopeApp;
use super::super::message::Message;

impl ScopeApp {
    /// Ask the service to publish the current sample window.
    ///
    /// Fire-and-forget: if the request cannot be delivered the next tick
    /// tries again.
    pub fn handle_poll_signal(&mut self) -> Task<Message> {
        self.capture.request_emit();
        Task::none()
    }

    /// Replace the signal buffer with a fresh batch.
    pub fn handle_signal_batch(&mut self, batch: Vec<f32>) -> Task<Message> {
        self.signal.ingest(batch);
        Task::none()
    }

    /// Record the latest window size.
    pub fn handle_viewport_resized(&mut self, size: Size) -> Task<Message> {
        log::debug!("Viewport resized to {}x{}", size.width, size.height);
        self.viewport = size;
        Task::none()
    }

    /// Record the outcome of the initial stream start.
    ///
    /// Failure leaves the scope open with an empty trace; the user can
    /// still pick a working device from the settings overlay.
    pub fn handle_capture_started(&mut self, result: Result<(), String>) -> Task<Message> {
        match result {
            Ok(()) => {
                log::info!("Capture running");
                self.live = true;
            }
            Err(e) => {
                log::error!("Failed to start capture stream: {}", e);
                self.live = false;
            }
        }
        Task::none()
    }
}
