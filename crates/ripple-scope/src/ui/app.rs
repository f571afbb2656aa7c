//! Main iced application for the ripple scope
//!
//! Owns the signal buffer, the viewport tracker and the settings state
//! machine. Subscriptions drive everything that happens without user
//! input: display frames, signal polling, inbound batches, resize events
//! and the settings shortcut key.

use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::Receiver;
use iced::widget::{button, center, column, container, mouse_area, opaque, row, stack, text, Space};
use iced::{keyboard, time, window, Alignment, Element, Length, Size, Subscription, Task, Theme};

use ripple_core::capture::CaptureHandle;
use ripple_core::{ResolutionCurve, SignalBuffer};
use ripple_widgets::{channel_subscription, scope, theme};

use super::message::{Message, SettingsMessage};
use super::settings::{self, SettingsState};

/// Application state
pub struct ScopeApp {
    /// Client for the capture service
    pub(super) capture: CaptureHandle,
    /// Receiving end of the signal mailbox
    pub(super) signal_rx: Arc<Receiver<Vec<f32>>>,
    /// Latest sample batch
    pub(super) signal: SignalBuffer,
    /// Last observed window size
    pub(super) viewport: Size,
    /// Resolution curve from configuration
    pub(super) curve: ResolutionCurve,
    /// Settings overlay state machine
    pub(super) settings: SettingsState,
    /// Whether the capture stream is believed to be running
    pub(super) live: bool,
}

impl ScopeApp {
    /// Create the application state around a running capture service
    pub fn new(
        capture: CaptureHandle,
        signal_rx: Arc<Receiver<Vec<f32>>>,
        curve: ResolutionCurve,
    ) -> Self {
        Self {
            capture,
            signal_rx,
            signal: SignalBuffer::new(),
            viewport: Size::ZERO,
            curve,
            settings: SettingsState::new(&curve),
            live: false,
        }
    }

    /// Update application state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // The runtime repaints after every update pass; this tick
            // drives it at display cadence
            Message::FrameTick => Task::none(),
            Message::PollSignal => self.handle_poll_signal(),
            Message::SignalBatch(batch) => self.handle_signal_batch(batch),
            Message::ViewportResized(size) => self.handle_viewport_resized(size),
            Message::CaptureStarted(result) => self.handle_capture_started(result),
            Message::ToggleSettings => self.handle_toggle_settings(),
            Message::Settings(message) => self.handle_settings(message),
        }
    }

    /// Render the UI
    pub fn view(&self) -> Element<'_, Message> {
        let content = column![self.view_header(), scope(self.signal.current())].spacing(10);

        let base: Element<'_, Message> = container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(12)
            .into();

        if !self.settings.is_open() {
            return base;
        }

        // Clicking the dimmed backdrop closes the overlay
        let backdrop = mouse_area(
            container(Space::new())
                .width(Length::Fill)
                .height(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(theme::BACKDROP.into()),
                    ..container::Style::default()
                }),
        )
        .on_press(Message::Settings(SettingsMessage::Cancel));

        let overlay = center(opaque(settings::view(&self.settings)));

        stack![base, backdrop, overlay].into()
    }

    /// Application theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Everything that happens without user input
    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            // Repaint at the display's cadence
            window::frames().map(|_| Message::FrameTick),
            // Ask the service for fresh samples at roughly 60 Hz
            time::every(Duration::from_millis(16)).map(|_| Message::PollSignal),
            // Batches published by the service
            channel_subscription(self.signal_rx.clone()).map(Message::SignalBatch),
            window::resize_events().map(|(_id, size)| Message::ViewportResized(size)),
            keyboard::listen().filter_map(|event| match event {
                keyboard::Event::KeyPressed { key, .. } => match key.as_ref() {
                    keyboard::Key::Character("s") => Some(Message::ToggleSettings),
                    keyboard::Key::Named(keyboard::key::Named::Escape) => {
                        Some(Message::Settings(SettingsMessage::Cancel))
                    }
                    _ => None,
                },
                _ => None,
            }),
        ])
    }

    /// Header row: title, stream status, viewport readout, settings button
    fn view_header(&self) -> Element<'_, Message> {
        let status = if self.live {
            text("live").size(14).color(theme::SCOPE_TRACE)
        } else {
            text("stopped").size(14).color(theme::TEXT_DIM)
        };

        let dims = format!(
            "{}x{}",
            self.viewport.width as u32, self.viewport.height as u32
        );

        let settings_btn = button(text("⚙").size(20))
            .on_press(Message::ToggleSettings)
            .style(button::secondary);

        row![
            text("ripple").size(24),
            status,
            Space::new().width(Length::Fill),
            text(dims).size(14).color(theme::TEXT_DIM),
            settings_btn,
        ]
        .spacing(10)
        .align_y(Alignment::Center)
        .into()
    }
}
