//! Ripple Scope - live audio waveform viewer
//!
//! Entry point for the GUI application. It:
//! 1. Starts the capture service on a background thread
//! 2. Launches the iced GUI application
//! 3. Bridges captured batches into the update loop

mod config;
mod ui;

use std::sync::Arc;

use iced::{Size, Task};

use ripple_core::capture::{CaptureHandle, CaptureService};
use ripple_core::curve;
use ui::{ScopeApp, message::Message};

fn main() -> iced::Result {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("ripple-scope starting up");

    let config_path = config::default_config_path();
    let config = config::load_config(&config_path);
    let resolution_curve = config.resolution_curve();

    // All cpal state lives on the service thread; the UI only ever talks
    // to the cloneable handle
    let mut service = CaptureService::spawn(curve::BASE_WINDOW)
        .expect("Failed to start capture service - this is required for ripple-scope");
    let capture = CaptureHandle::new(&service);
    let signal_rx = Arc::new(service.signal_rx.clone());

    let boot_capture = capture.clone();
    let boot_rx = signal_rx.clone();

    let result = iced::application(
        move || {
            let app = ScopeApp::new(boot_capture.clone(), boot_rx.clone(), resolution_curve);

            // Start the stream as soon as the UI is up. Failure is logged
            // and the scope stays open with an empty trace.
            let startup = boot_capture.clone();
            let startup_task = Task::perform(
                async move { startup.start().await.map_err(|e| e.to_string()) },
                Message::CaptureStarted,
            );

            (app, startup_task)
        },
        update,
        view,
    )
    .subscription(subscription)
    .theme(theme)
    .title("Ripple Scope")
    .window_size(Size::new(960.0, 540.0))
    .run();

    // Shut the service down and wait for its thread
    capture.shutdown();
    if let Some(handle) = service.thread_handle.take() {
        if handle.join().is_err() {
            log::warn!("Capture service thread panicked during shutdown");
        }
    }
    log::info!("ripple-scope stopped");

    result
}

/// Update function for iced
fn update(app: &mut ScopeApp, message: Message) -> Task<Message> {
    app.update(message)
}

/// View function for iced
fn view(app: &ScopeApp) -> iced::Element<'_, Message> {
    app.view()
}

/// Subscription function for iced
fn subscription(app: &ScopeApp) -> iced::Subscription<Message> {
    app.subscription()
}

/// Theme function for iced
fn theme(app: &ScopeApp) -> iced::Theme {
    app.theme()
}
