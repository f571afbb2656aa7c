//! Application messages
//!
//! All state changes flow through [`Message`]. Settings interactions have
//! their own sub-enum so the handlers stay grouped by concern.

/// Messages that drive the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Display refresh tick; schedules a repaint at monitor cadence
    FrameTick,
    /// Periodic request for the capture service to publish a batch
    PollSignal,
    /// A sample batch arrived from the capture service
    SignalBatch(Vec<f32>),
    /// The window surface was resized
    ViewportResized(iced::Size),
    /// Outcome of the initial capture start
    CaptureStarted(Result<(), String>),
    /// Toggle the settings overlay (gear button or keyboard shortcut)
    ToggleSettings,
    /// Settings overlay interactions
    Settings(SettingsMessage),
}

/// Settings overlay messages
#[derive(Debug, Clone)]
pub enum SettingsMessage {
    /// The device list query finished
    DevicesLoaded(Result<Vec<String>, String>),
    /// The current device query finished
    CurrentDeviceLoaded(Result<String, String>),
    /// The resolution query finished, in window samples
    ResolutionLoaded(Result<u32, String>),
    /// A device was picked from the list
    DeviceSelected(String),
    /// The resolution slider moved, normalized position in [0, 1]
    PositionChanged(f32),
    /// Apply was pressed
    Apply,
    /// Cancel was requested: button, Escape or a backdrop click
    Cancel,
    /// The reconfiguration sequence has dispatched its restart
    Applied,
}
