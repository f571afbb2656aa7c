//! Settings overlay handlers: the Idle / Editing / Applying state machine
//!
//! Opening the overlay seeds it from the service with three independent
//! queries. Selections stay local until Apply hands them to the
//! reconfiguration sequence; Cancel throws them away without touching the
//! service.

use iced::Task;

use ripple_core::capture::{reconfigure, ReconfigurationRequest};
use ripple_core::curve;

use super::super::app::ScopeApp;
use super::super::message::{Message, SettingsMessage};
use super::super::settings::SettingsPhase;

impl ScopeApp {
    /// The gear button or the shortcut key.
    ///
    /// Opens the overlay from Idle, closes it from Editing, and does
    /// nothing while an apply is running.
    pub fn handle_toggle_settings(&mut self) -> Task<Message> {
        match self.settings.phase {
            SettingsPhase::Idle => self.handle_open_settings(),
            SettingsPhase::Editing => self.handle_close_settings(),
            SettingsPhase::Applying => Task::none(),
        }
    }

    /// Settings overlay interactions
    pub fn handle_settings(&mut self, message: SettingsMessage) -> Task<Message> {
        match message {
            SettingsMessage::DevicesLoaded(result) => {
                match result {
                    Ok(devices) => self.settings.devices = devices,
                    Err(e) => log::warn!("Failed to load device list: {}", e),
                }
                Task::none()
            }
            SettingsMessage::CurrentDeviceLoaded(result) => {
                match result {
                    Ok(name) => self.settings.selected_device = name,
                    Err(e) => log::warn!("Failed to load current device: {}", e),
                }
                Task::none()
            }
            SettingsMessage::ResolutionLoaded(result) => {
                match result {
                    Ok(samples) => {
                        let multiplier = curve::samples_to_multiplier(samples);
                        self.settings.multiplier = multiplier;
                        self.settings.position = self.curve.to_position(multiplier);
                    }
                    Err(e) => log::warn!("Failed to load resolution: {}", e),
                }
                Task::none()
            }
            SettingsMessage::DeviceSelected(name) => {
                if self.settings.phase == SettingsPhase::Editing {
                    self.settings.selected_device = name;
                }
                Task::none()
            }
            SettingsMessage::PositionChanged(position) => {
                if self.settings.phase == SettingsPhase::Editing {
                    self.settings.position = position;
                    // Full precision; the label rounds to one decimal on
                    // its own
                    self.settings.multiplier = self.curve.to_multiplier(position);
                }
                Task::none()
            }
            SettingsMessage::Apply => self.handle_apply_settings(),
            SettingsMessage::Cancel => self.handle_close_settings(),
            SettingsMessage::Applied => self.handle_settings_applied(),
        }
    }

    /// Open the overlay and seed it from the service.
    ///
    /// The three queries are independent: each one that fails logs a
    /// warning and leaves the previous value on screen.
    fn handle_open_settings(&mut self) -> Task<Message> {
        self.settings.phase = SettingsPhase::Editing;

        let list = self.capture.clone();
        let current = self.capture.clone();
        let resolution = self.capture.clone();

        Task::batch([
            Task::perform(
                async move { list.list_devices().await.map_err(|e| e.to_string()) },
                |result| Message::Settings(SettingsMessage::DevicesLoaded(result)),
            ),
            Task::perform(
                async move { current.current_device().await.map_err(|e| e.to_string()) },
                |result| Message::Settings(SettingsMessage::CurrentDeviceLoaded(result)),
            ),
            Task::perform(
                async move { resolution.resolution().await.map_err(|e| e.to_string()) },
                |result| Message::Settings(SettingsMessage::ResolutionLoaded(result)),
            ),
        ])
    }

    /// Close the overlay, discarding local selections.
    ///
    /// Only valid while editing; an apply in flight cannot be cancelled.
    fn handle_close_settings(&mut self) -> Task<Message> {
        if self.settings.phase == SettingsPhase::Editing {
            self.settings.phase = SettingsPhase::Idle;
        }
        Task::none()
    }

    /// Hand the confirmed selections to the reconfiguration sequence.
    fn handle_apply_settings(&mut self) -> Task<Message> {
        if self.settings.phase != SettingsPhase::Editing {
            return Task::none();
        }

        self.settings.phase = SettingsPhase::Applying;

        let request = self.pending_request();

        Task::perform(reconfigure(self.capture.clone(), request), |_| {
            Message::Settings(SettingsMessage::Applied)
        })
    }

    /// The request an Apply would send.
    ///
    /// Seeded readouts can sit below the curve minimum after one-decimal
    /// wire recovery; the committed multiplier is clamped back into the
    /// curve's range.
    fn pending_request(&self) -> ReconfigurationRequest {
        ReconfigurationRequest {
            device: self.settings.selected_device.clone(),
            multiplier: self
                .settings
                .multiplier
                .clamp(self.curve.min(), self.curve.max()),
        }
    }

    /// The restart was dispatched; the overlay's job is done.
    ///
    /// The stream is reported live optimistically. If the restart fails
    /// the error shows up in the log, not in the UI.
    fn handle_settings_applied(&mut self) -> Task<Message> {
        self.settings.phase = SettingsPhase::Idle;
        self.live = true;
        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ripple_core::capture::{CaptureHandle, CaptureService, ServiceHandle};
    use ripple_core::curve;
    use ripple_core::ResolutionCurve;

    use crate::ui::app::ScopeApp;
    use crate::ui::message::SettingsMessage;
    use crate::ui::settings::SettingsPhase;

    fn test_app() -> (ScopeApp, ServiceHandle) {
        let service = CaptureService::spawn(1024).unwrap();
        let capture = CaptureHandle::new(&service);
        let signal_rx = Arc::new(service.signal_rx.clone());
        let app = ScopeApp::new(capture, signal_rx, ResolutionCurve::default());
        (app, service)
    }

    fn stop(app: &ScopeApp, service: ServiceHandle) {
        app.capture.shutdown();
        if let Some(handle) = service.thread_handle {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_toggle_opens_and_closes() {
        let (mut app, service) = test_app();

        assert_eq!(app.settings.phase, SettingsPhase::Idle);
        let _ = app.handle_toggle_settings();
        assert_eq!(app.settings.phase, SettingsPhase::Editing);
        let _ = app.handle_toggle_settings();
        assert_eq!(app.settings.phase, SettingsPhase::Idle);

        stop(&app, service);
    }

    #[test]
    fn test_seed_results_update_local_state() {
        let (mut app, service) = test_app();
        let _ = app.handle_toggle_settings();

        let devices = vec!["Default".to_string(), "USB Mic".to_string()];
        let _ = app.handle_settings(SettingsMessage::DevicesLoaded(Ok(devices)));
        let _ = app.handle_settings(SettingsMessage::CurrentDeviceLoaded(Ok(
            "USB Mic".to_string()
        )));
        let _ = app.handle_settings(SettingsMessage::ResolutionLoaded(Ok(512)));

        assert_eq!(app.settings.devices.len(), 2);
        assert_eq!(app.settings.selected_device, "USB Mic");
        assert!((app.settings.multiplier - 0.5).abs() < 1e-6);

        stop(&app, service);
    }

    #[test]
    fn test_failed_seed_keeps_previous_values() {
        let (mut app, service) = test_app();
        let _ = app.handle_toggle_settings();

        let _ = app.handle_settings(SettingsMessage::DevicesLoaded(Err("gone".to_string())));
        let _ = app.handle_settings(SettingsMessage::CurrentDeviceLoaded(Err(
            "gone".to_string()
        )));
        let _ = app.handle_settings(SettingsMessage::ResolutionLoaded(Err("gone".to_string())));

        assert_eq!(app.settings.devices, vec!["Default".to_string()]);
        assert_eq!(app.settings.selected_device, "Default");
        assert!((app.settings.multiplier - 1.0).abs() < 1e-6);

        stop(&app, service);
    }

    #[test]
    fn test_slider_stores_full_precision_behind_the_readout() {
        let (mut app, service) = test_app();
        let _ = app.handle_toggle_settings();

        let _ = app.handle_settings(SettingsMessage::PositionChanged(0.5));
        // sqrt(300) / 100 with the default bounds; the label shows 0.2x
        assert!((app.settings.multiplier - 0.173205).abs() < 1e-4);
        assert!(((app.settings.multiplier * 10.0).round() / 10.0 - 0.2).abs() < 1e-6);
        assert!((app.settings.position - 0.5).abs() < 1e-6);

        stop(&app, service);
    }

    #[test]
    fn test_commit_does_not_quantize_to_the_display_decimal() {
        let (mut app, service) = test_app();
        let _ = app.handle_toggle_settings();

        // 0.2 on the slider maps to ~0.031, which displays as 0.0 but
        // must commit as-is
        let _ = app.handle_settings(SettingsMessage::PositionChanged(0.2));
        let request = app.pending_request();
        assert!(request.multiplier >= app.curve.min());
        assert_eq!(curve::multiplier_to_samples(request.multiplier), 32);

        stop(&app, service);
    }

    #[test]
    fn test_low_positions_commit_a_nonzero_window() {
        let (mut app, service) = test_app();
        let _ = app.handle_toggle_settings();

        // Every legal position commits at least the minimum window,
        // round(0.01 * 1024) = 10 samples
        for position in [0.0f32, 0.1, 0.2, 0.28] {
            let _ = app.handle_settings(SettingsMessage::PositionChanged(position));
            let committed = curve::multiplier_to_samples(app.pending_request().multiplier);
            assert!(
                committed >= 10,
                "position {} committed a {}-sample window",
                position,
                committed
            );
        }

        stop(&app, service);
    }

    #[test]
    fn test_reapplied_low_seed_commits_at_least_the_minimum() {
        let (mut app, service) = test_app();
        let _ = app.handle_toggle_settings();

        // A 51-sample window reads back as 0.0; applying without touching
        // the slider clamps the commit to the curve minimum
        let _ = app.handle_settings(SettingsMessage::ResolutionLoaded(Ok(51)));
        let request = app.pending_request();
        assert!((request.multiplier - 0.01).abs() < 1e-6);
        assert_eq!(curve::multiplier_to_samples(request.multiplier), 10);

        stop(&app, service);
    }

    #[test]
    fn test_in_range_seed_commits_the_same_window_back() {
        let (mut app, service) = test_app();
        let _ = app.handle_toggle_settings();

        let _ = app.handle_settings(SettingsMessage::ResolutionLoaded(Ok(512)));
        assert_eq!(
            curve::multiplier_to_samples(app.pending_request().multiplier),
            512
        );

        stop(&app, service);
    }

    #[test]
    fn test_edits_ignored_outside_editing() {
        let (mut app, service) = test_app();

        // Overlay closed: nothing should move
        let _ = app.handle_settings(SettingsMessage::DeviceSelected("USB Mic".to_string()));
        let _ = app.handle_settings(SettingsMessage::PositionChanged(0.9));
        assert_eq!(app.settings.selected_device, "Default");
        assert!((app.settings.multiplier - 1.0).abs() < 1e-6);

        stop(&app, service);
    }

    #[test]
    fn test_apply_locks_the_overlay_until_applied() {
        let (mut app, service) = test_app();
        let _ = app.handle_toggle_settings();

        let _ = app.handle_settings(SettingsMessage::Apply);
        assert_eq!(app.settings.phase, SettingsPhase::Applying);

        // No way out while the sequence runs
        let _ = app.handle_settings(SettingsMessage::Cancel);
        assert_eq!(app.settings.phase, SettingsPhase::Applying);
        let _ = app.handle_toggle_settings();
        assert_eq!(app.settings.phase, SettingsPhase::Applying);

        let _ = app.handle_settings(SettingsMessage::Applied);
        assert_eq!(app.settings.phase, SettingsPhase::Idle);
        assert!(app.live);

        stop(&app, service);
    }

    #[test]
    fn test_apply_requires_editing() {
        let (mut app, service) = test_app();

        let _ = app.handle_settings(SettingsMessage::Apply);
        assert_eq!(app.settings.phase, SettingsPhase::Idle);

        stop(&app, service);
    }

    #[test]
    fn test_cancel_leaves_the_service_untouched() {
        let (mut app, service) = test_app();
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let _ = app.handle_toggle_settings();
        let _ = app.handle_settings(SettingsMessage::DeviceSelected("USB Mic".to_string()));
        let _ = app.handle_settings(SettingsMessage::PositionChanged(0.9));
        let _ = app.handle_settings(SettingsMessage::Cancel);

        assert_eq!(rt.block_on(app.capture.current_device()).unwrap(), "Default");
        assert_eq!(rt.block_on(app.capture.resolution()).unwrap(), 1024);

        stop(&app, service);
    }

    #[test]
    fn test_local_selections_survive_reopening() {
        let (mut app, service) = test_app();

        let _ = app.handle_toggle_settings();
        let _ = app.handle_settings(SettingsMessage::DeviceSelected("USB Mic".to_string()));
        let _ = app.handle_toggle_settings();
        let _ = app.handle_toggle_settings();

        // Still there until a fresh seed result overwrites it
        assert_eq!(app.settings.selected_device, "USB Mic");

        stop(&app, service);
    }
}
